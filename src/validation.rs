//! Field-level validation of incoming prospect payloads.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use phonenumber::country::Id as CountryId;
use regex::Regex;

use crate::models::{EnderecoDto, ProspectDto};

/// Field name → message. Nested address fields are keyed as `endereco.<field>`.
pub type ValidationErrors = BTreeMap<String, String>;

const NOT_BLANK: &str = "não deve estar em branco";
const INVALID_EMAIL: &str = "deve ser um endereço de e-mail bem formado";
const INVALID_PHONE: &str = "deve ser um telefone brasileiro válido";
const CPF_WITHOUT_DIGITS: &str = "deve conter dígitos";

fn size_message(min: usize, max: usize) -> String {
    format!("tamanho deve ser entre {} e {}", min, max)
}

/// Collects at most one message per field, keeping the first failing rule.
#[derive(Default)]
struct Collector {
    errors: ValidationErrors,
}

impl Collector {
    fn check(&mut self, field: &str, ok: bool, message: impl Into<String>) -> &mut Self {
        if !ok && !self.errors.contains_key(field) {
            self.errors.insert(field.to_string(), message.into());
        }
        self
    }

    fn not_blank(&mut self, field: &str, value: &str) -> &mut Self {
        self.check(field, !value.trim().is_empty(), NOT_BLANK)
    }

    fn size(&mut self, field: &str, value: &str, min: usize, max: usize) -> &mut Self {
        let len = value.chars().count();
        self.check(field, (min..=max).contains(&len), size_message(min, max))
    }

    fn finish(self) -> Result<(), ValidationErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}

impl ProspectDto {
    /// Checks the declared constraints of every field.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut c = Collector::default();

        c.not_blank("nome", &self.nome).size("nome", &self.nome, 1, 50);

        c.not_blank("cpf", &self.cpf)
            .size("cpf", &self.cpf, 1, 14)
            .check(
                "cpf",
                self.cpf.chars().any(|ch| ch.is_ascii_digit()),
                CPF_WITHOUT_DIGITS,
            );

        c.not_blank("email", &self.email)
            .check("email", is_well_formed_email(&self.email), INVALID_EMAIL);

        if let Some(telefone) = &self.telefone {
            c.check("telefone", is_valid_br_phone(telefone), INVALID_PHONE);
        }

        c.not_blank("mcc", &self.mcc).size("mcc", &self.mcc, 1, 4);

        validate_endereco(&mut c, &self.endereco);

        c.finish()
    }
}

fn validate_endereco(c: &mut Collector, endereco: &EnderecoDto) {
    c.not_blank("endereco.logradouro", &endereco.logradouro)
        .not_blank("endereco.numero", &endereco.numero)
        .not_blank("endereco.bairro", &endereco.bairro)
        .not_blank("endereco.cidade", &endereco.cidade)
        .size("endereco.uf", &endereco.uf, 2, 2)
        .not_blank("endereco.cep", &endereco.cep)
        .size("endereco.cep", &endereco.cep, 1, 9);
}

/// Syntactic email check (RFC 5322, simplified).
pub fn is_well_formed_email(email: &str) -> bool {
    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let re = EMAIL_REGEX.get_or_init(|| {
        Regex::new(
            r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
        )
        .expect("email regex is valid")
    });
    re.is_match(email)
}

/// Parses `raw` as a Brazilian number and checks it against libphonenumber's
/// metadata.
pub fn is_valid_br_phone(raw: &str) -> bool {
    if raw.trim().len() < 8 {
        return false;
    }

    match phonenumber::parse(Some(CountryId::BR), raw) {
        Ok(number) => phonenumber::is_valid(&number),
        Err(e) => {
            tracing::debug!("Failed to parse BR phone '{}': {:?}", raw, e);
            false
        }
    }
}
