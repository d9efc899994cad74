use chrono::{DateTime, Utc};
use serde::de::{self, Unexpected};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

// ============ Domain Models ============

/// Postal address of a prospect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Endereco {
    /// Street name.
    pub logradouro: String,
    /// Street number.
    pub numero: String,
    /// Apartment, block, etc.
    pub complemento: Option<String>,
    /// Neighbourhood.
    pub bairro: String,
    /// City.
    pub cidade: String,
    /// Two-letter state code (e.g. "SP").
    pub uf: String,
    /// Postal code.
    pub cep: String,
}

/// A prospective customer who is an individual (pessoa física).
///
/// `id` and the timestamps are owned by the store: they are empty until the
/// record is saved for the first time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Prospect {
    /// Identifier assigned by the store on insert.
    pub id: Option<i64>,
    /// Full name.
    pub nome: String,
    /// CPF in canonical 11-digit form.
    #[schema(example = "12345678900")]
    pub cpf: String,
    /// Contact email.
    pub email: String,
    /// Contact phone, as informed.
    pub telefone: Option<String>,
    /// Merchant category code of the prospect's activity.
    #[schema(example = "5411")]
    pub mcc: String,
    /// Postal address.
    pub endereco: Endereco,
    /// Insert timestamp.
    pub created_at: Option<DateTime<Utc>>,
    /// Last update timestamp.
    pub updated_at: Option<DateTime<Utc>>,
}

impl Prospect {
    /// Builds an unsaved prospect from a request body.
    ///
    /// `cpf` is the already-normalized document; the raw `dto.cpf` is ignored.
    pub fn from_dto(dto: ProspectDto, cpf: String, id: Option<i64>) -> Self {
        Self {
            id,
            nome: dto.nome,
            cpf,
            email: dto.email,
            telefone: dto.telefone,
            mcc: dto.mcc,
            endereco: Endereco::from(dto.endereco),
            created_at: None,
            updated_at: None,
        }
    }
}

// ============ Request Models ============

/// Scalar JSON value as text. `null` and absent both become `None`;
/// numbers and booleans keep their JSON spelling.
fn scalar_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(v @ (Value::Number(_) | Value::Bool(_))) => Ok(Some(v.to_string())),
        Some(Value::Array(_)) => Err(de::Error::invalid_type(Unexpected::Seq, &"a string")),
        Some(Value::Object(_)) => Err(de::Error::invalid_type(Unexpected::Map, &"a string")),
    }
}

/// Required text field: `null` reads as empty so validation reports it.
fn text_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(scalar_text(deserializer)?.unwrap_or_default())
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Address as received in a request body.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct EnderecoDto {
    #[serde(deserialize_with = "text_or_empty")]
    pub logradouro: String,
    #[serde(deserialize_with = "text_or_empty")]
    pub numero: String,
    #[serde(deserialize_with = "scalar_text")]
    pub complemento: Option<String>,
    #[serde(deserialize_with = "text_or_empty")]
    pub bairro: String,
    #[serde(deserialize_with = "text_or_empty")]
    pub cidade: String,
    #[serde(deserialize_with = "text_or_empty")]
    #[schema(example = "SP")]
    pub uf: String,
    #[serde(deserialize_with = "text_or_empty")]
    #[schema(example = "01310-100")]
    pub cep: String,
}

impl From<EnderecoDto> for Endereco {
    fn from(dto: EnderecoDto) -> Self {
        Self {
            logradouro: dto.logradouro,
            numero: dto.numero,
            complemento: dto.complemento,
            bairro: dto.bairro,
            cidade: dto.cidade,
            uf: dto.uf,
            cep: dto.cep,
        }
    }
}

/// Request body for creating or replacing a prospect.
///
/// Missing or `null` fields deserialize to empty values so they are reported
/// by validation instead of failing JSON parsing. Numeric scalars are
/// accepted for text fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct ProspectDto {
    #[serde(deserialize_with = "text_or_empty")]
    pub nome: String,
    /// CPF, formatted or not.
    #[serde(deserialize_with = "text_or_empty")]
    #[schema(example = "123.456.789-00")]
    pub cpf: String,
    #[serde(deserialize_with = "text_or_empty")]
    pub email: String,
    #[serde(deserialize_with = "scalar_text")]
    #[schema(example = "(11) 98765-4321")]
    pub telefone: Option<String>,
    #[serde(deserialize_with = "text_or_empty")]
    pub mcc: String,
    #[serde(deserialize_with = "null_as_default")]
    pub endereco: EnderecoDto,
}


#[cfg(test)]
mod tests {
    use super::test_support::valid_dto;
    use super::*;

    #[test]
    fn from_dto_copies_every_field_and_uses_normalized_cpf() {
        let dto = valid_dto("123.456.789-00");
        let prospect = Prospect::from_dto(dto.clone(), "12345678900".to_string(), Some(4));

        assert_eq!(prospect.id, Some(4));
        assert_eq!(prospect.cpf, "12345678900");
        assert_eq!(prospect.nome, dto.nome);
        assert_eq!(prospect.email, dto.email);
        assert_eq!(prospect.telefone, dto.telefone);
        assert_eq!(prospect.mcc, dto.mcc);
        assert_eq!(prospect.endereco.cidade, "São Paulo");
        assert!(prospect.created_at.is_none());
    }

    #[test]
    fn missing_dto_fields_default_to_empty() {
        let dto: ProspectDto = serde_json::from_str(r#"{"nome":"A"}"#).unwrap();
        assert_eq!(dto.nome, "A");
        assert_eq!(dto.cpf, "");
        assert!(dto.telefone.is_none());
        assert_eq!(dto.endereco.uf, "");
    }

    #[test]
    fn null_fields_read_as_empty() {
        let dto: ProspectDto = serde_json::from_str(
            r#"{"nome":null,"cpf":null,"telefone":null,"endereco":{"cep":null,"complemento":null}}"#,
        )
        .unwrap();
        assert_eq!(dto.nome, "");
        assert_eq!(dto.cpf, "");
        assert!(dto.telefone.is_none());
        assert_eq!(dto.endereco.cep, "");
        assert!(dto.endereco.complemento.is_none());

        let dto: ProspectDto = serde_json::from_str(r#"{"endereco":null}"#).unwrap();
        assert_eq!(dto.endereco.uf, "");
    }

    #[test]
    fn numeric_scalars_are_read_as_text() {
        let dto: ProspectDto =
            serde_json::from_str(r#"{"cpf":12345678900,"mcc":5411,"endereco":{"numero":100}}"#)
                .unwrap();
        assert_eq!(dto.cpf, "12345678900");
        assert_eq!(dto.mcc, "5411");
        assert_eq!(dto.endereco.numero, "100");
    }

    #[test]
    fn structured_values_in_text_fields_are_rejected() {
        assert!(serde_json::from_str::<ProspectDto>(r#"{"nome":["A"]}"#).is_err());
        assert!(serde_json::from_str::<ProspectDto>(r#"{"cpf":{"n":1}}"#).is_err());
    }

    #[test]
    fn prospect_serializes_camel_case() {
        let json = serde_json::to_value(test_support::prospect_with_id(1)).unwrap();
        assert_eq!(json["id"], 1);
        assert!(json.get("createdAt").is_some());
        assert!(json.get("created_at").is_none());
    }
}
