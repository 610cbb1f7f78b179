use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NumberError {
    #[error("'{0}' is not a whole number once punctuation is removed")]
    NotACount(String),

    #[error("'{0}' is not a finite number")]
    NotADecimal(String),
}

/// How a count-like text column spells its numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericKind {
    /// Install-style counts: `"1,000,000+"`.
    Count,
    /// Plain decimals: `"2974676"`, `"0.99"`.
    Decimal,
}

impl NumericKind {
    pub fn parse(self, raw: &str) -> Result<f64, NumberError> {
        match self {
            NumericKind::Count => parse_count(raw).map(|n| n as f64),
            NumericKind::Decimal => parse_decimal(raw),
        }
    }
}

/// Strip ASCII punctuation (thousands separators, the open-ended `+`) and
/// parse what remains as a non-negative integer.
pub fn parse_count(raw: &str) -> Result<u64, NumberError> {
    let digits: String = raw.chars().filter(|c| !c.is_ascii_punctuation()).collect();
    digits
        .trim()
        .parse::<u64>()
        .map_err(|_| NumberError::NotACount(raw.to_string()))
}

pub fn parse_decimal(raw: &str) -> Result<f64, NumberError> {
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(NumberError::NotADecimal(raw.to_string())),
    }
}
