//! Shared value types: month buckets and category join keys.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

/// Exposes a stable identifier for records stored in the ledger state.
pub trait Identifiable {
    fn id(&self) -> Uuid;
}

/// Calendar month bucket.
///
/// Ordered the same way its `YYYY-MM` rendering sorts, so month sequences
/// derived from either representation agree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Self {
        Self {
            year,
            month: month.clamp(1, 12),
        }
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for MonthKey {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (year, month) = value
            .split_once('-')
            .ok_or_else(|| format!("invalid month key `{value}`"))?;
        let year: i32 = year
            .parse()
            .map_err(|_| format!("invalid year in month key `{value}`"))?;
        let month: u32 = month
            .parse()
            .map_err(|_| format!("invalid month in month key `{value}`"))?;
        if !(1..=12).contains(&month) {
            return Err(format!("month out of range in `{value}`"));
        }
        Ok(Self { year, month })
    }
}

impl Serialize for MonthKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MonthKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

/// Free-text join key linking a project to the incomes/expenses tagged
/// with it.
///
/// Matching is plain string equality with no referential integrity: a
/// renamed or deleted project silently orphans its tagged records. That
/// looseness is intentional; the newtype only makes the join visible.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryKey(String);

impl CategoryKey {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CategoryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CategoryKey {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for CategoryKey {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_key_orders_like_its_rendering() {
        let a = MonthKey::new(2024, 12);
        let b = MonthKey::new(2025, 1);
        let c = MonthKey::new(2025, 10);
        assert!(a < b && b < c);
        assert!(a.to_string() < b.to_string() && b.to_string() < c.to_string());
    }

    #[test]
    fn month_key_roundtrips_through_string() {
        let key = MonthKey::new(2025, 3);
        assert_eq!(key.to_string(), "2025-03");
        assert_eq!("2025-03".parse::<MonthKey>().unwrap(), key);
    }

    #[test]
    fn month_key_rejects_garbage() {
        assert!("2025".parse::<MonthKey>().is_err());
        assert!("2025-13".parse::<MonthKey>().is_err());
        assert!("año-mes".parse::<MonthKey>().is_err());
    }
}
