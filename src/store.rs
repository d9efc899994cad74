//! Storage abstraction for prospects and its in-memory implementation.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::errors::AppError;
use crate::models::Prospect;

/// Storage of record for prospects.
#[async_trait]
pub trait ProspectStore: Send + Sync {
    /// True iff a stored prospect has exactly this `cpf`.
    async fn exists_by_cpf(&self, cpf: &str) -> Result<bool, AppError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Prospect>, AppError>;

    /// Every stored prospect, ordered by id.
    async fn find_all(&self) -> Result<Vec<Prospect>, AppError>;

    /// Inserts when `prospect.id` is `None`, otherwise replaces the row with
    /// that id. Returns the stored record with id and timestamps filled in.
    ///
    /// Fails with [`AppError::UniqueViolation`] when another row owns the CPF
    /// and with [`AppError::ProspectNotFound`] when updating a missing id.
    async fn save(&self, prospect: Prospect) -> Result<Prospect, AppError>;

    /// Removes the row with `prospect.id`. Absent rows are ignored.
    async fn delete(&self, prospect: &Prospect) -> Result<(), AppError>;
}

#[derive(Debug, Default)]
struct MemoryTables {
    rows: BTreeMap<i64, Prospect>,
    last_id: i64,
}

/// Process-local store, used when no database is configured and in tests.
#[derive(Debug, Default)]
pub struct MemoryProspectStore {
    tables: RwLock<MemoryTables>,
}

impl MemoryProspectStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProspectStore for MemoryProspectStore {
    async fn exists_by_cpf(&self, cpf: &str) -> Result<bool, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.rows.values().any(|p| p.cpf == cpf))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Prospect>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.rows.get(&id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Prospect>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.rows.values().cloned().collect())
    }

    async fn save(&self, mut prospect: Prospect) -> Result<Prospect, AppError> {
        let mut tables = self.tables.write().await;

        let cpf_taken = tables
            .rows
            .values()
            .any(|p| p.cpf == prospect.cpf && p.id != prospect.id);
        if cpf_taken {
            return Err(AppError::UniqueViolation(prospect.cpf));
        }

        let id = match prospect.id {
            Some(id) => {
                let existing = tables
                    .rows
                    .get(&id)
                    .ok_or(AppError::ProspectNotFound(id))?;
                prospect.created_at = existing.created_at;
                prospect.updated_at = Some(Utc::now());
                id
            }
            None => {
                tables.last_id += 1;
                prospect.created_at = Some(Utc::now());
                prospect.updated_at = None;
                tables.last_id
            }
        };

        prospect.id = Some(id);
        tables.rows.insert(id, prospect.clone());
        Ok(prospect)
    }

    async fn delete(&self, prospect: &Prospect) -> Result<(), AppError> {
        if let Some(id) = prospect.id {
            self.tables.write().await.rows.remove(&id);
        }
        Ok(())
    }
}
