use sqlx::{postgres::PgPoolOptions, PgPool};

const CREATE_PROSPECT_TABLE: &str =
    include_str!("../migrations/0001_create_prospect_pessoa_fisica.sql");

pub struct Database {
    pub pool: PgPool,
}

impl Database {
    pub async fn new(database_url: &str, max_connections: u32) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        sqlx::query(CREATE_PROSPECT_TABLE).execute(&pool).await?;
        tracing::info!("Prospect schema ensured");

        Ok(Self { pool })
    }
}
