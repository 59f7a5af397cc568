//! Calendar look-back period for price retrieval (`30d`, `6mo`, `1y`).

use chrono::{Days, Months, NaiveDate};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookbackPeriod {
    Days(u32),
    Weeks(u32),
    Months(u32),
    Years(u32),
}

impl Default for LookbackPeriod {
    fn default() -> Self {
        LookbackPeriod::Years(1)
    }
}

impl LookbackPeriod {
    /// First date inside the period ending at `end` (exclusive of anything
    /// before it). Saturates at the earliest representable date.
    pub fn start_from(&self, end: NaiveDate) -> NaiveDate {
        let start = match *self {
            LookbackPeriod::Days(n) => end.checked_sub_days(Days::new(n.into())),
            LookbackPeriod::Weeks(n) => end.checked_sub_days(Days::new(u64::from(n) * 7)),
            LookbackPeriod::Months(n) => end.checked_sub_months(Months::new(n)),
            LookbackPeriod::Years(n) => n
                .checked_mul(12)
                .and_then(|m| end.checked_sub_months(Months::new(m))),
        };
        start.unwrap_or(NaiveDate::MIN)
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid lookback period '{0}' (expected e.g. 30d, 8w, 6mo, 1y)")]
pub struct LookbackParseError(pub String);

impl FromStr for LookbackPeriod {
    type Err = LookbackParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim().to_lowercase();
        let split = text
            .find(|c: char| !c.is_ascii_digit())
            .ok_or_else(|| LookbackParseError(s.to_string()))?;
        let (digits, unit) = text.split_at(split);

        let n: u32 = digits
            .parse()
            .map_err(|_| LookbackParseError(s.to_string()))?;
        if n == 0 {
            return Err(LookbackParseError(s.to_string()));
        }

        match unit {
            "d" => Ok(LookbackPeriod::Days(n)),
            "w" | "wk" => Ok(LookbackPeriod::Weeks(n)),
            "mo" => Ok(LookbackPeriod::Months(n)),
            "y" => Ok(LookbackPeriod::Years(n)),
            _ => Err(LookbackParseError(s.to_string())),
        }
    }
}

impl fmt::Display for LookbackPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookbackPeriod::Days(n) => write!(f, "{n}d"),
            LookbackPeriod::Weeks(n) => write!(f, "{n}w"),
            LookbackPeriod::Months(n) => write!(f, "{n}mo"),
            LookbackPeriod::Years(n) => write!(f, "{n}y"),
        }
    }
}
