use std::env;
use std::sync::Arc;

use prospect_api::data::db::Database;
use prospect_api::data::db_storage::PgProspectStore;
use prospect_api::errors::AppError;
use prospect_api::models::{EnderecoDto, Prospect, ProspectDto};
use prospect_api::queue::ServiceQueue;
use prospect_api::services::ProspectService;
use prospect_api::store::ProspectStore;

fn dto(cpf: &str) -> ProspectDto {
    ProspectDto {
        nome: "Test Prospect".to_string(),
        cpf: cpf.to_string(),
        email: "test.prospect@example.com".to_string(),
        telefone: None,
        mcc: "5411".to_string(),
        endereco: EnderecoDto {
            logradouro: "Rua de Teste".to_string(),
            numero: "1".to_string(),
            complemento: Some("Sala 2".to_string()),
            bairro: "Centro".to_string(),
            cidade: "Curitiba".to_string(),
            uf: "PR".to_string(),
            cep: "80010-000".to_string(),
        },
    }
}

/// Integration smoke test for the PostgreSQL prospect store.
/// Marked ignored to avoid running against production by accident; set TEST_DATABASE_URL to run.
#[tokio::test]
#[ignore]
async fn prospect_lifecycle_smoke_test() -> anyhow::Result<()> {
    let db_url = env::var("TEST_DATABASE_URL")
        .or_else(|_| env::var("DATABASE_URL"))
        .map_err(|_| anyhow::anyhow!("Set TEST_DATABASE_URL or DATABASE_URL to run this test"))?;

    let db = Database::new(&db_url, 2).await?;
    let store = Arc::new(PgProspectStore::new(db.pool.clone()));
    let service = ProspectService::new(store.clone(), Arc::new(ServiceQueue::new()));

    // Use a unique CPF to avoid conflicts on repeated runs.
    let nanos = chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default();
    let cpf = format!("9{:010}", nanos.rem_euclid(10_000_000_000));

    let created = service.create(dto(&cpf)).await?;
    let id = created.id.expect("id assigned on insert");
    assert_eq!(created.cpf, cpf);

    let fetched = service.get(id).await?;
    assert_eq!(fetched, created);

    let duplicate = store.save(Prospect::from_dto(dto(&cpf), cpf.clone(), None)).await;
    assert!(matches!(duplicate, Err(AppError::UniqueViolation(_))));

    service.delete(id).await?;
    assert!(store.find_by_id(id).await?.is_none());
    assert_eq!(service.queue_snapshot(), vec![created]);

    Ok(())
}
