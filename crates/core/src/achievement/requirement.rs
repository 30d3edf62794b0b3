//! What a customer must do to complete an achievement.
//!
//! Older data encoded the requirement as `item;amount;indefinite;begin;end`
//! next to a numeric type code. [`Requirement::parse_legacy`] turns that into
//! a [`Requirement`] once, at creation time.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::validity::{DateWindow, Validity, WindowStatus};

const LEGACY_DATE_FORMAT: &str = "%Y-%m-%d";

/// Errors from decoding a legacy requirement string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequirementError {
    /// Wrong number of `;`-separated fields.
    #[error("Invalid requirement: expected 5 fields, found {0}.")]
    FieldCount(usize),

    /// Type code has no matching goal.
    #[error("Invalid requirement type {0}.")]
    UnknownType(i32),

    /// Amount field is not an integer.
    #[error("Invalid requirement amount '{0}'.")]
    InvalidAmount(String),

    /// Indefinite flag is not a boolean.
    #[error("Invalid indefinite flag '{0}'.")]
    InvalidFlag(String),

    /// A date field is missing or malformed.
    #[error("Invalid {field} date '{value}'.")]
    InvalidDate {
        /// `begin` or `end`.
        field: &'static str,
        /// Raw field content.
        value: String,
    },

    /// End date precedes begin date.
    #[error("Invalid date interval, begin date must be before end date.")]
    InvertedWindow,
}

/// The counted action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Goal {
    /// Buy `item` `quantity` times.
    PurchaseItem {
        /// Menu item name.
        item: String,
        /// Purchases needed.
        quantity: i32,
    },
    /// Visit the restaurant `times` times.
    Visit {
        /// Visits needed.
        times: i32,
    },
}

impl Goal {
    /// Legacy numeric type code.
    #[must_use]
    pub const fn type_code(&self) -> i32 {
        match self {
            Self::PurchaseItem { .. } => 0,
            Self::Visit { .. } => 1,
        }
    }

    /// Number of counted actions needed.
    #[must_use]
    pub const fn target(&self) -> i32 {
        match self {
            Self::PurchaseItem { quantity, .. } => *quantity,
            Self::Visit { times } => *times,
        }
    }
}

/// Goal plus the window it can be worked on in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirement {
    /// The counted action.
    pub goal: Goal,
    /// When progress can be recorded.
    pub validity: Validity,
}

impl Requirement {
    /// Progress total a user must reach.
    #[must_use]
    pub const fn target(&self) -> i32 {
        self.goal.target()
    }

    /// Classifies `date` against the validity window.
    #[must_use]
    pub fn status_on(&self, date: NaiveDate) -> WindowStatus {
        self.validity.status_on(date)
    }

    /// Decodes a legacy `item;amount;indefinite;begin;end` value.
    ///
    /// The indefinite flag accepts `True`/`False` in any case. Dates use
    /// `YYYY-MM-DD` and are ignored when the flag is set.
    ///
    /// # Errors
    ///
    /// Returns the first malformed field.
    pub fn parse_legacy(type_code: i32, value: &str) -> Result<Self, RequirementError> {
        let fields: Vec<&str> = value.split(';').collect();
        let [item, amount, indefinite, begin, end] = fields[..] else {
            return Err(RequirementError::FieldCount(fields.len()));
        };

        let amount: i32 = amount
            .trim()
            .parse()
            .map_err(|_| RequirementError::InvalidAmount(amount.to_string()))?;

        let goal = match type_code {
            0 => Goal::PurchaseItem {
                item: item.trim().to_string(),
                quantity: amount,
            },
            1 => Goal::Visit { times: amount },
            other => return Err(RequirementError::UnknownType(other)),
        };

        let indefinite = match indefinite.trim().to_ascii_lowercase().as_str() {
            "true" => true,
            "false" => false,
            _ => return Err(RequirementError::InvalidFlag(indefinite.to_string())),
        };

        let validity = if indefinite {
            Validity::Indefinite
        } else {
            let begin = parse_date("begin", begin)?;
            let end = parse_date("end", end)?;
            Validity::Window(DateWindow::new(begin, end).ok_or(RequirementError::InvertedWindow)?)
        };

        Ok(Self { goal, validity })
    }

    /// Encodes into the legacy `(type_code, value)` pair.
    #[must_use]
    pub fn to_legacy(&self) -> (i32, String) {
        let item = match &self.goal {
            Goal::PurchaseItem { item, .. } => item.as_str(),
            Goal::Visit { .. } => "",
        };
        let (indefinite, begin, end) = match self.validity {
            Validity::Indefinite => ("True", String::new(), String::new()),
            Validity::Window(w) => (
                "False",
                w.begin().format(LEGACY_DATE_FORMAT).to_string(),
                w.end().format(LEGACY_DATE_FORMAT).to_string(),
            ),
        };
        (
            self.goal.type_code(),
            format!("{item};{};{indefinite};{begin};{end}", self.target()),
        )
    }
}

fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate, RequirementError> {
    NaiveDate::parse_from_str(value.trim(), LEGACY_DATE_FORMAT).map_err(|_| {
        RequirementError::InvalidDate {
            field,
            value: value.to_string(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_purchase_with_window() {
        let req = Requirement::parse_legacy(0, "Ramen;5;False;2020-05-01;2020-06-30").unwrap();

        assert_eq!(
            req.goal,
            Goal::PurchaseItem {
                item: "Ramen".to_string(),
                quantity: 5
            }
        );
        assert_eq!(req.validity.begin(), Some(date(2020, 5, 1)));
        assert_eq!(req.validity.end(), Some(date(2020, 6, 30)));
        assert_eq!(req.target(), 5);
    }

    #[test]
    fn test_parse_indefinite_visit_ignores_dates() {
        let req = Requirement::parse_legacy(1, ";3;True;;").unwrap();

        assert_eq!(req.goal, Goal::Visit { times: 3 });
        assert_eq!(req.validity, Validity::Indefinite);
    }

    #[rstest]
    #[case(0, "Ramen;5;False;2020-05-01", RequirementError::FieldCount(4))]
    #[case(7, "Ramen;5;True;;", RequirementError::UnknownType(7))]
    #[case(0, "Ramen;five;True;;", RequirementError::InvalidAmount("five".to_string()))]
    #[case(0, "Ramen;5;maybe;;", RequirementError::InvalidFlag("maybe".to_string()))]
    #[case(0, "Ramen;5;False;;2020-06-30", RequirementError::InvalidDate { field: "begin", value: String::new() })]
    #[case(0, "Ramen;5;False;2020-05-01;06/30/2020", RequirementError::InvalidDate { field: "end", value: "06/30/2020".to_string() })]
    #[case(0, "Ramen;5;False;2020-06-30;2020-05-01", RequirementError::InvertedWindow)]
    fn test_parse_rejects(
        #[case] type_code: i32,
        #[case] value: &str,
        #[case] expected: RequirementError,
    ) {
        assert_eq!(Requirement::parse_legacy(type_code, value), Err(expected));
    }

    #[test]
    fn test_legacy_encoding_survives_a_roundtrip() {
        let req = Requirement {
            goal: Goal::PurchaseItem {
                item: "Dumplings".to_string(),
                quantity: 4,
            },
            validity: Validity::Window(DateWindow::new(date(2021, 1, 1), date(2021, 2, 1)).unwrap()),
        };

        let (code, value) = req.to_legacy();
        assert_eq!(code, 0);
        assert_eq!(value, "Dumplings;4;False;2021-01-01;2021-02-01");
        assert_eq!(Requirement::parse_legacy(code, &value).unwrap(), req);
    }

    #[test]
    fn test_json_shape() {
        let req = Requirement {
            goal: Goal::Visit { times: 10 },
            validity: Validity::Indefinite,
        };
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            serde_json::json!({
                "goal": {"kind": "visit", "times": 10},
                "validity": {"kind": "indefinite"}
            })
        );
    }
}
