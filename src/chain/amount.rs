// Token amount parsing. On-chain amounts are Uint128 decimal strings; the
// denominations this coordinator handles fit in u64, anything larger is rejected.

use crate::error::AmountError;

/// Parse a base-10 amount string into a u64 without loss
pub fn parse_amount(raw: &str) -> Result<u64, AmountError> {
    let trimmed = raw.trim();

    if trimmed.is_empty() {
        return Err(AmountError::Empty);
    }

    if !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AmountError::NotDecimal(raw.to_string()));
    }

    trimmed
        .parse::<u64>()
        .map_err(|_| AmountError::Overflow(raw.to_string()))
}

/// Parse an optional amount, falling back to a documented default when absent
pub fn parse_amount_or(raw: Option<&str>, default: u64) -> Result<u64, AmountError> {
    match raw {
        Some(value) => parse_amount(value),
        None => Ok(default),
    }
}

/// Serde adapter for amounts carried as decimal strings
pub mod as_string {
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(amount: &u64, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&amount.to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<u64, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::parse_amount(&raw).map_err(D::Error::custom)
    }
}
