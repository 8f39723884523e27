//! Date of Birth Validation
//!
//! Pure logic deciding whether a submitted birth date is old enough.
//!
//! ## Normalization
//! The prompt collects three numeric fields whose order depends on the
//! configured [`FieldOrder`]. Whatever the order, the value is normalized to
//! an ISO `YYYY-MM-DD` form before it is parsed, so age computation never
//! sees the field order.
//!
//! ## Failure policy
//! Every parse failure is "not of age". Nothing here returns an error.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;

use crate::domain::value_objects::MinimumAge;

/// Order of the day/month/year fields in the prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldOrder {
    /// MM/DD/YYYY
    #[default]
    Mdy,
    /// DD/MM/YYYY
    Dmy,
    /// YYYY/MM/DD
    Ymd,
}

impl FieldOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldOrder::Mdy => "mdy",
            FieldOrder::Dmy => "dmy",
            FieldOrder::Ymd => "ymd",
        }
    }

    /// Map three fields, in prompt order, to `(year, month, day)`
    fn arrange<'a>(&self, first: &'a str, second: &'a str, third: &'a str) -> (&'a str, &'a str, &'a str) {
        match self {
            FieldOrder::Mdy => (third, first, second),
            FieldOrder::Dmy => (third, second, first),
            FieldOrder::Ymd => (first, second, third),
        }
    }
}

impl fmt::Display for FieldOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for an unknown field order name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown date format: {0:?} (expected mdy, dmy or ymd)")]
pub struct UnknownFieldOrder(pub String);

impl FromStr for FieldOrder {
    type Err = UnknownFieldOrder;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mdy" => Ok(FieldOrder::Mdy),
            "dmy" => Ok(FieldOrder::Dmy),
            "ymd" => Ok(FieldOrder::Ymd),
            other => Err(UnknownFieldOrder(other.to_string())),
        }
    }
}

/// Normalize three prompt fields to `YYYY-MM-DD`
///
/// Day and month accept one or two digits and are zero-padded. The year
/// must be exactly four digits. Returns `None` for anything else.
pub fn normalize_fields(first: &str, second: &str, third: &str, order: FieldOrder) -> Option<String> {
    let (year, month, day) = order.arrange(first.trim(), second.trim(), third.trim());

    if year.len() != 4 || !is_digits(year) {
        return None;
    }

    Some(format!("{}-{}-{}", year, pad_two(month)?, pad_two(day)?))
}

/// Parse birth date text into a calendar date
///
/// Canonical `YYYY-MM-DD` text (what the prompt script sends) is accepted
/// regardless of the field order. Other text must be three fields separated
/// by `-`, `/` or `.` in the configured order.
pub fn parse_birth_date(text: &str, order: FieldOrder) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let fields: Vec<&str> = text.split(['-', '/', '.']).collect();
    let [first, second, third] = fields.as_slice() else {
        return None;
    };

    let normalized = if is_iso_shape(first, second, third) {
        normalize_fields(first, second, third, FieldOrder::Ymd)?
    } else {
        normalize_fields(first, second, third, order)?
    };

    NaiveDate::parse_from_str(&normalized, "%Y-%m-%d").ok()
}

/// Whole completed years between `birth` and `today`
///
/// `None` when `birth` is in the future.
pub fn age_on(birth: NaiveDate, today: NaiveDate) -> Option<u32> {
    today.years_since(birth)
}

/// Decide whether the birth date text belongs to someone of age
pub fn is_of_age(text: &str, minimum_age: MinimumAge, order: FieldOrder, today: NaiveDate) -> bool {
    parse_birth_date(text, order)
        .and_then(|birth| age_on(birth, today))
        .is_some_and(|age| age >= u32::from(minimum_age.years()))
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

fn is_iso_shape(first: &str, second: &str, third: &str) -> bool {
    first.len() == 4 && second.len() == 2 && third.len() == 2 && is_digits(first)
}

fn pad_two(s: &str) -> Option<String> {
    match s.len() {
        1 | 2 if is_digits(s) => Some(format!("{:0>2}", s)),
        _ => None,
    }
}
