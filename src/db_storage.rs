use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use crate::errors::{AppError, ResultExt};
use crate::models::{Endereco, Prospect};
use crate::store::ProspectStore;

const SELECT_COLUMNS: &str = r#"
    id, nome, cpf, email, telefone, mcc,
    logradouro, numero, complemento, bairro, cidade, uf, cep,
    created_at, updated_at
"#;

/// Flat row of `tb_prospect_pessoa_fisica`.
#[derive(Debug, FromRow)]
struct ProspectRow {
    id: i64,
    nome: String,
    cpf: String,
    email: String,
    telefone: Option<String>,
    mcc: String,
    logradouro: String,
    numero: String,
    complemento: Option<String>,
    bairro: String,
    cidade: String,
    uf: String,
    cep: String,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
}

impl From<ProspectRow> for Prospect {
    fn from(row: ProspectRow) -> Self {
        Self {
            id: Some(row.id),
            nome: row.nome,
            cpf: row.cpf,
            email: row.email,
            telefone: row.telefone,
            mcc: row.mcc,
            endereco: Endereco {
                logradouro: row.logradouro,
                numero: row.numero,
                complemento: row.complemento,
                bairro: row.bairro,
                cidade: row.cidade,
                uf: row.uf,
                cep: row.cep,
            },
            created_at: Some(row.created_at),
            updated_at: row.updated_at,
        }
    }
}

/// Translates a failed INSERT/UPDATE, surfacing CPF collisions as their own kind.
fn write_error(err: sqlx::Error, cpf: &str) -> AppError {
    let unique = err
        .as_database_error()
        .map(|db| db.is_unique_violation())
        .unwrap_or(false);

    if unique {
        AppError::UniqueViolation(cpf.to_string())
    } else {
        AppError::DatabaseError(err)
    }
}

/// PostgreSQL-backed prospect storage.
pub struct PgProspectStore {
    pool: PgPool,
}

impl PgProspectStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn insert(&self, prospect: &Prospect) -> Result<ProspectRow, AppError> {
        let sql = format!(
            r#"
            INSERT INTO tb_prospect_pessoa_fisica
                (nome, cpf, email, telefone, mcc,
                 logradouro, numero, complemento, bairro, cidade, uf, cep,
                 created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, now())
            RETURNING {SELECT_COLUMNS}
            "#
        );

        let endereco = &prospect.endereco;
        sqlx::query_as::<_, ProspectRow>(&sql)
            .bind(&prospect.nome)
            .bind(&prospect.cpf)
            .bind(&prospect.email)
            .bind(&prospect.telefone)
            .bind(&prospect.mcc)
            .bind(&endereco.logradouro)
            .bind(&endereco.numero)
            .bind(&endereco.complemento)
            .bind(&endereco.bairro)
            .bind(&endereco.cidade)
            .bind(&endereco.uf)
            .bind(&endereco.cep)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| write_error(e, &prospect.cpf))
    }

    async fn update(&self, id: i64, prospect: &Prospect) -> Result<ProspectRow, AppError> {
        let sql = format!(
            r#"
            UPDATE tb_prospect_pessoa_fisica
            SET nome = $2, cpf = $3, email = $4, telefone = $5, mcc = $6,
                logradouro = $7, numero = $8, complemento = $9, bairro = $10,
                cidade = $11, uf = $12, cep = $13,
                updated_at = now()
            WHERE id = $1
            RETURNING {SELECT_COLUMNS}
            "#
        );

        let endereco = &prospect.endereco;
        sqlx::query_as::<_, ProspectRow>(&sql)
            .bind(id)
            .bind(&prospect.nome)
            .bind(&prospect.cpf)
            .bind(&prospect.email)
            .bind(&prospect.telefone)
            .bind(&prospect.mcc)
            .bind(&endereco.logradouro)
            .bind(&endereco.numero)
            .bind(&endereco.complemento)
            .bind(&endereco.bairro)
            .bind(&endereco.cidade)
            .bind(&endereco.uf)
            .bind(&endereco.cep)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| write_error(e, &prospect.cpf))?
            .ok_or(AppError::ProspectNotFound(id))
    }
}

#[async_trait]
impl ProspectStore for PgProspectStore {
    async fn exists_by_cpf(&self, cpf: &str) -> Result<bool, AppError> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM tb_prospect_pessoa_fisica WHERE cpf = $1)",
        )
        .bind(cpf)
        .fetch_one(&self.pool)
        .await
        .context("checking cpf uniqueness")
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Prospect>, AppError> {
        let sql = format!("SELECT {SELECT_COLUMNS} FROM tb_prospect_pessoa_fisica WHERE id = $1");

        let row = sqlx::query_as::<_, ProspectRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("loading prospect {}", id))?;

        Ok(row.map(Prospect::from))
    }

    async fn find_all(&self) -> Result<Vec<Prospect>, AppError> {
        let sql = format!("SELECT {SELECT_COLUMNS} FROM tb_prospect_pessoa_fisica ORDER BY id");

        let rows = sqlx::query_as::<_, ProspectRow>(&sql)
            .fetch_all(&self.pool)
            .await
            .context("listing prospects")?;

        Ok(rows.into_iter().map(Prospect::from).collect())
    }

    async fn save(&self, prospect: Prospect) -> Result<Prospect, AppError> {
        let row = match prospect.id {
            Some(id) => self.update(id, &prospect).await?,
            None => self.insert(&prospect).await?,
        };

        tracing::debug!("Stored prospect {}", row.id);
        Ok(row.into())
    }

    async fn delete(&self, prospect: &Prospect) -> Result<(), AppError> {
        let Some(id) = prospect.id else {
            return Ok(());
        };

        let result = sqlx::query("DELETE FROM tb_prospect_pessoa_fisica WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .with_context(|| format!("deleting prospect {}", id))?;

        if result.rows_affected() == 0 {
            tracing::debug!("Prospect {} was already absent on delete", id);
        }
        Ok(())
    }
}
