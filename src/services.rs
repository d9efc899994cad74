use std::sync::Arc;

use crate::cpf::{self, CPF_DIGITS};
use crate::errors::AppError;
use crate::models::{Prospect, ProspectDto};
use crate::queue::ServiceQueue;
use crate::store::ProspectStore;

/// Business operations on prospects.
///
/// Writes go to the store first and are then appended to the service queue.
/// Nothing ties the two together: a request cancelled between them leaves a
/// saved row that was never queued.
#[derive(Clone)]
pub struct ProspectService {
    store: Arc<dyn ProspectStore>,
    queue: Arc<ServiceQueue>,
}

impl ProspectService {
    pub fn new(store: Arc<dyn ProspectStore>, queue: Arc<ServiceQueue>) -> Self {
        Self { store, queue }
    }

    /// Validates, normalizes the CPF and stores a new prospect, then queues it.
    ///
    /// The duplicate check looks up the CPF exactly as received, before
    /// normalization. Differently formatted inputs for the same digits pass
    /// it and are stopped by the store's unique constraint instead.
    pub async fn create(&self, dto: ProspectDto) -> Result<Prospect, AppError> {
        dto.validate()?;
        let cpf = cpf::normalize(&dto.cpf, CPF_DIGITS)?;

        if self.store.exists_by_cpf(&dto.cpf).await? {
            tracing::info!("Rejected prospect: cpf already in use");
            return Err(AppError::CpfConflict);
        }

        let saved = self.store.save(Prospect::from_dto(dto, cpf, None)).await?;
        self.queue.enqueue(saved.clone());

        tracing::info!("Created prospect {:?}", saved.id);
        Ok(saved)
    }

    /// Replaces every field of prospect `id` and queues the result again.
    ///
    /// No CPF uniqueness pre-check is made here; a collision with another
    /// record is reported by the store.
    pub async fn update(&self, id: i64, dto: ProspectDto) -> Result<Prospect, AppError> {
        dto.validate()?;

        let existing = self
            .store
            .find_by_id(id)
            .await?
            .ok_or(AppError::ProspectNotFound(id))?;

        let cpf = cpf::normalize(&dto.cpf, CPF_DIGITS)?;
        let saved = self
            .store
            .save(Prospect::from_dto(dto, cpf, existing.id))
            .await?;
        self.queue.enqueue(saved.clone());

        tracing::info!("Updated prospect {}", id);
        Ok(saved)
    }

    pub async fn get(&self, id: i64) -> Result<Prospect, AppError> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or(AppError::ProspectNotFound(id))
    }

    /// Removes the stored record. Entries already in the service queue stay.
    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        let existing = self.get(id).await?;
        self.store.delete(&existing).await?;

        tracing::info!("Deleted prospect {}", id);
        Ok(())
    }

    pub async fn list_all(&self) -> Result<Vec<Prospect>, AppError> {
        self.store.find_all().await
    }

    pub fn queue_snapshot(&self) -> Vec<Prospect> {
        self.queue.snapshot()
    }

    /// Hands out the prospect at the head of the service queue.
    pub fn queue_next(&self) -> Result<Prospect, AppError> {
        self.queue.poll().ok_or(AppError::QueueEmpty)
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::test_support::valid_dto;
    use crate::store::MemoryProspectStore;

    fn service() -> ProspectService {
        ProspectService::new(
            Arc::new(MemoryProspectStore::new()),
            Arc::new(ServiceQueue::new()),
        )
    }

    #[tokio::test]
    async fn create_normalizes_cpf_and_enqueues() {
        let service = service();
        let saved = service.create(valid_dto("123.456.789-00")).await.unwrap();

        assert_eq!(saved.id, Some(1));
        assert_eq!(saved.cpf, "12345678900");
        assert!(cpf::is_canonical(&saved.cpf));
        assert_eq!(service.queue_snapshot(), vec![saved.clone()]);
        assert_eq!(service.get(1).await.unwrap(), saved);
    }

    #[tokio::test]
    async fn create_with_taken_cpf_conflicts() {
        let service = service();
        service.create(valid_dto("12345678900")).await.unwrap();

        let err = service.create(valid_dto("12345678900")).await.unwrap_err();
        assert!(matches!(err, AppError::CpfConflict));
        assert_eq!(service.queue_len(), 1);
    }

    #[tokio::test]
    async fn differently_formatted_cpf_reaches_store_constraint() {
        let service = service();
        service.create(valid_dto("12345678900")).await.unwrap();

        let err = service.create(valid_dto("123.456.789-00")).await.unwrap_err();
        assert!(matches!(err, AppError::UniqueViolation(_)));
        assert_eq!(service.list_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn create_rejects_invalid_payload_before_storing() {
        let service = service();
        let err = service.create(valid_dto("")).await.unwrap_err();

        match err {
            AppError::Validation(errors) => assert!(errors.contains_key("cpf")),
            other => panic!("unexpected error: {other}"),
        }
        assert!(service.list_all().await.unwrap().is_empty());
        assert_eq!(service.queue_len(), 0);
    }

    #[tokio::test]
    async fn update_keeps_id_and_enqueues_again() {
        let service = service();
        let created = service.create(valid_dto("11111111111")).await.unwrap();

        let mut dto = valid_dto("222.222.222-22");
        dto.nome = "Nome Novo".to_string();
        let updated = service.update(1, dto).await.unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.cpf, "22222222222");
        assert_eq!(updated.nome, "Nome Novo");

        let queued: Vec<_> = service.queue_snapshot().into_iter().map(|p| p.id).collect();
        assert_eq!(queued, vec![Some(1), Some(1)]);
    }

    #[tokio::test]
    async fn update_of_unknown_id_is_not_found() {
        let service = service();
        let err = service.update(999, valid_dto("12345678900")).await.unwrap_err();
        assert!(matches!(err, AppError::ProspectNotFound(999)));
    }

    #[tokio::test]
    async fn update_may_collide_with_another_records_cpf() {
        let service = service();
        service.create(valid_dto("11111111111")).await.unwrap();
        service.create(valid_dto("22222222222")).await.unwrap();

        let err = service.update(2, valid_dto("11111111111")).await.unwrap_err();
        assert!(matches!(err, AppError::UniqueViolation(_)));
    }

    #[tokio::test]
    async fn delete_leaves_queue_untouched() {
        let service = service();
        let created = service.create(valid_dto("12345678900")).await.unwrap();

        service.delete(1).await.unwrap();

        assert!(matches!(
            service.get(1).await.unwrap_err(),
            AppError::ProspectNotFound(1)
        ));
        assert_eq!(service.queue_snapshot(), vec![created]);
    }

    #[tokio::test]
    async fn delete_of_unknown_id_is_not_found() {
        let service = service();
        assert!(matches!(
            service.delete(5).await.unwrap_err(),
            AppError::ProspectNotFound(5)
        ));
    }

    #[tokio::test]
    async fn queue_next_drains_in_fifo_order() {
        let service = service();
        let first = service.create(valid_dto("11111111111")).await.unwrap();
        let second = service.create(valid_dto("22222222222")).await.unwrap();

        assert_eq!(service.queue_next().unwrap(), first);
        assert_eq!(service.queue_next().unwrap(), second);
        assert!(matches!(
            service.queue_next().unwrap_err(),
            AppError::QueueEmpty
        ));
    }
}
