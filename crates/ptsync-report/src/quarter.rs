//! Quarter vocabulary
//!
//! The fiscal calendar runs October to September:
//! Oct-Dec = Q1, Jan-Mar = Q2, Apr-Jun = Q3, Jul-Sep = Q4.
//!
//! Planning-sheet cells may instead hold a completion percentage (25%, 50%,
//! 75%) for a book's unit of work, sometimes spelled as the bare fraction
//! 0.25 / 0.5 / 0.75. [`QuarterToken`] covers both spellings; [`Quarter`]
//! is the calendar-only subset everything downstream stores.

use crate::error::ReportError;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A calendar reporting quarter.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Quarter {
    /// Oct-Dec
    Q1,
    /// Jan-Mar
    Q2,
    /// Apr-Jun
    Q3,
    /// Jul-Sep
    Q4,
}

impl Quarter {
    /// All quarters in fiscal order
    pub const ALL: [Quarter; 4] = [Quarter::Q1, Quarter::Q2, Quarter::Q3, Quarter::Q4];

    /// Two-digit reporting month for this quarter
    ///
    /// The reporting month is the last month of the quarter.
    #[inline]
    #[must_use]
    pub fn reporting_month(self) -> &'static str {
        match self {
            Quarter::Q1 => "12",
            Quarter::Q2 => "03",
            Quarter::Q3 => "06",
            Quarter::Q4 => "09",
        }
    }

    /// The token spelling, e.g. `"Q2"`
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Quarter::Q1 => "Q1",
            Quarter::Q2 => "Q2",
            Quarter::Q3 => "Q3",
            Quarter::Q4 => "Q4",
        }
    }
}

impl FromStr for Quarter {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Q1" => Ok(Quarter::Q1),
            "Q2" => Ok(Quarter::Q2),
            "Q3" => Ok(Quarter::Q3),
            "Q4" => Ok(Quarter::Q4),
            other => Err(ReportError::InvalidQuarter(other.to_string())),
        }
    }
}

impl fmt::Display for Quarter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A completion percentage of a book's unit of work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Percent {
    /// 25%
    TwentyFive,
    /// 50%
    Fifty,
    /// 75%
    SeventyFive,
}

impl Percent {
    /// The fraction this percentage represents
    #[inline]
    #[must_use]
    pub fn fraction(self) -> f64 {
        match self {
            Percent::TwentyFive => 0.25,
            Percent::Fifty => 0.5,
            Percent::SeventyFive => 0.75,
        }
    }

    /// The percent spelling, e.g. `"50%"`
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Percent::TwentyFive => "25%",
            Percent::Fifty => "50%",
            Percent::SeventyFive => "75%",
        }
    }

    fn from_fraction(value: f64) -> Option<Self> {
        // Cells only ever carry these three exact fractions
        if (value - 0.25).abs() < f64::EPSILON {
            Some(Percent::TwentyFive)
        } else if (value - 0.5).abs() < f64::EPSILON {
            Some(Percent::Fifty)
        } else if (value - 0.75).abs() < f64::EPSILON {
            Some(Percent::SeventyFive)
        } else {
            None
        }
    }
}

/// What a phase-quarter cell may hold: a calendar quarter or a percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuarterToken {
    /// A calendar quarter, used verbatim
    Calendar(Quarter),
    /// A completion percentage; the effective quarter becomes the report's own
    Percent(Percent),
}

impl QuarterToken {
    /// The calendar quarter, if this token is one
    #[inline]
    #[must_use]
    pub fn as_quarter(self) -> Option<Quarter> {
        match self {
            QuarterToken::Calendar(q) => Some(q),
            QuarterToken::Percent(_) => None,
        }
    }

    /// The percentage, if this token is one
    #[inline]
    #[must_use]
    pub fn percent(self) -> Option<Percent> {
        match self {
            QuarterToken::Calendar(_) => None,
            QuarterToken::Percent(p) => Some(p),
        }
    }

    /// The token spelling, e.g. `"Q2"` or `"50%"`
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            QuarterToken::Calendar(q) => q.as_str(),
            QuarterToken::Percent(p) => p.as_str(),
        }
    }
}

impl FromStr for QuarterToken {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "25%" => Ok(QuarterToken::Percent(Percent::TwentyFive)),
            "50%" => Ok(QuarterToken::Percent(Percent::Fifty)),
            "75%" => Ok(QuarterToken::Percent(Percent::SeventyFive)),
            other => other.parse::<Quarter>().map(QuarterToken::Calendar),
        }
    }
}

impl fmt::Display for QuarterToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for QuarterToken {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

struct QuarterTokenVisitor;

impl Visitor<'_> for QuarterTokenVisitor {
    type Value = QuarterToken;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a quarter (Q1..Q4), a percentage (25%/50%/75%), or 0.25/0.5/0.75")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
        value.parse().map_err(|_| {
            de::Error::invalid_value(de::Unexpected::Str(value), &self)
        })
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<Self::Value, E> {
        Percent::from_fraction(value)
            .map(QuarterToken::Percent)
            .ok_or_else(|| de::Error::invalid_value(de::Unexpected::Float(value), &self))
    }
}

impl<'de> Deserialize<'de> for QuarterToken {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(QuarterTokenVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reporting_months() {
        assert_eq!(Quarter::Q1.reporting_month(), "12");
        assert_eq!(Quarter::Q2.reporting_month(), "03");
        assert_eq!(Quarter::Q3.reporting_month(), "06");
        assert_eq!(Quarter::Q4.reporting_month(), "09");
    }

    #[test]
    fn calendar_tokens_are_quarters() {
        for q in Quarter::ALL {
            let token: QuarterToken = q.as_str().parse().unwrap();
            assert_eq!(token.as_quarter(), Some(q));
        }
    }

    #[test]
    fn percentage_tokens_are_not_quarters() {
        for s in ["25%", "50%", "75%"] {
            let token: QuarterToken = s.parse().unwrap();
            assert_eq!(token.as_quarter(), None);
            assert!(token.percent().is_some());
        }
    }

    #[test]
    fn invalid_tokens_are_rejected() {
        assert!("QCustom".parse::<QuarterToken>().is_err());
        assert!("10%".parse::<QuarterToken>().is_err());
        assert!("".parse::<QuarterToken>().is_err());
    }

    #[test]
    fn deserializes_fractional_spelling() {
        let token: QuarterToken = serde_json::from_str("0.25").unwrap();
        assert_eq!(token, QuarterToken::Percent(Percent::TwentyFive));

        let token: QuarterToken = serde_json::from_str("0.5").unwrap();
        assert_eq!(token, QuarterToken::Percent(Percent::Fifty));

        let token: QuarterToken = serde_json::from_str("0.75").unwrap();
        assert_eq!(token, QuarterToken::Percent(Percent::SeventyFive));

        assert!(serde_json::from_str::<QuarterToken>("0.33").is_err());
    }

    #[test]
    fn deserializes_string_spelling() {
        let token: QuarterToken = serde_json::from_str("\"Q3\"").unwrap();
        assert_eq!(token, QuarterToken::Calendar(Quarter::Q3));

        let token: QuarterToken = serde_json::from_str("\"75%\"").unwrap();
        assert_eq!(token, QuarterToken::Percent(Percent::SeventyFive));
    }

    #[test]
    fn quarter_serde_round_trip() {
        let json = serde_json::to_string(&Quarter::Q4).unwrap();
        assert_eq!(json, "\"Q4\"");
        let q: Quarter = serde_json::from_str(&json).unwrap();
        assert_eq!(q, Quarter::Q4);
    }
}
