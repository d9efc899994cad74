use std::fmt;

/// Canonical number of digits in a CPF.
pub const CPF_DIGITS: usize = 11;

/// Returned by [`normalize`] when the input carries no digits at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidInput {
    pub input: String,
}

impl fmt::Display for InvalidInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "no digits found in '{}'", self.input)
    }
}

impl std::error::Error for InvalidInput {}

/// Reduces a document number to exactly `width` digits.
///
/// Non-digit characters (dots, dashes, spaces) are dropped. Longer digit
/// sequences keep their first `width` digits; shorter ones are left-padded
/// with `0`.
///
/// ```
/// use prospect_api::cpf::normalize;
///
/// assert_eq!(normalize("123.456.789-00", 11).unwrap(), "12345678900");
/// assert_eq!(normalize("1234", 11).unwrap(), "00000001234");
/// ```
pub fn normalize(input: &str, width: usize) -> Result<String, InvalidInput> {
    if width == 0 {
        return Ok(String::new());
    }

    let digits: String = input
        .chars()
        .filter(|c| c.is_ascii_digit())
        .take(width)
        .collect();

    if digits.is_empty() {
        return Err(InvalidInput {
            input: input.to_string(),
        });
    }

    Ok(format!("{:0>width$}", digits, width = width))
}

/// True when `cpf` is already in canonical form.
pub fn is_canonical(cpf: &str) -> bool {
    cpf.len() == CPF_DIGITS && cpf.chars().all(|c| c.is_ascii_digit())
}
