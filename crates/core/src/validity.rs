//! Validity windows for coupons and achievements.
//!
//! A window is either indefinite or a closed date range. Building a
//! [`DateWindow`] checks `begin <= end`, so an inverted or half-open window
//! cannot be represented.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Where a date falls relative to a validity window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowStatus {
    /// The window has not opened yet.
    Before,
    /// The date is inside the window, or the window is indefinite.
    Active,
    /// The window has closed.
    After,
}

/// Inclusive date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawWindow")]
pub struct DateWindow {
    begin: NaiveDate,
    end: NaiveDate,
}

#[derive(Deserialize)]
struct RawWindow {
    begin: NaiveDate,
    end: NaiveDate,
}

impl TryFrom<RawWindow> for DateWindow {
    type Error = String;

    fn try_from(raw: RawWindow) -> Result<Self, Self::Error> {
        Self::new(raw.begin, raw.end)
            .ok_or_else(|| format!("window begins {} after it ends {}", raw.begin, raw.end))
    }
}

impl DateWindow {
    /// Builds a window, or `None` when `end` is before `begin`.
    #[must_use]
    pub fn new(begin: NaiveDate, end: NaiveDate) -> Option<Self> {
        (begin <= end).then_some(Self { begin, end })
    }

    /// First valid day.
    #[must_use]
    pub const fn begin(&self) -> NaiveDate {
        self.begin
    }

    /// Last valid day.
    #[must_use]
    pub const fn end(&self) -> NaiveDate {
        self.end
    }

    /// Classifies `date` against the window.
    #[must_use]
    pub fn status_on(&self, date: NaiveDate) -> WindowStatus {
        if date > self.end {
            WindowStatus::After
        } else if date < self.begin {
            WindowStatus::Before
        } else {
            WindowStatus::Active
        }
    }
}

/// When a coupon or achievement applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Validity {
    /// No begin or end date; always active.
    Indefinite,
    /// Active between two dates, inclusive.
    Window(DateWindow),
}

impl Validity {
    /// Rebuilds a validity from nullable begin/end columns.
    ///
    /// Both absent means indefinite. `None` is returned for a half-filled or
    /// inverted pair, which no valid write produces.
    #[must_use]
    pub fn from_columns(begin: Option<NaiveDate>, end: Option<NaiveDate>) -> Option<Self> {
        match (begin, end) {
            (None, None) => Some(Self::Indefinite),
            (Some(begin), Some(end)) => DateWindow::new(begin, end).map(Self::Window),
            _ => None,
        }
    }

    /// Returns true for an indefinite validity.
    #[must_use]
    pub const fn is_indefinite(&self) -> bool {
        matches!(self, Self::Indefinite)
    }

    /// Begin date, if any.
    #[must_use]
    pub const fn begin(&self) -> Option<NaiveDate> {
        match self {
            Self::Indefinite => None,
            Self::Window(w) => Some(w.begin),
        }
    }

    /// End date, if any.
    #[must_use]
    pub const fn end(&self) -> Option<NaiveDate> {
        match self {
            Self::Indefinite => None,
            Self::Window(w) => Some(w.end),
        }
    }

    /// Classifies `date`. Indefinite validity is always active.
    #[must_use]
    pub fn status_on(&self, date: NaiveDate) -> WindowStatus {
        match self {
            Self::Indefinite => WindowStatus::Active,
            Self::Window(w) => w.status_on(date),
        }
    }

    /// Returns true once the end date has passed.
    #[must_use]
    pub fn has_ended_on(&self, date: NaiveDate) -> bool {
        self.end().is_some_and(|end| date > end)
    }
}

/// Today's date in UTC.
#[must_use]
pub fn today() -> NaiveDate {
    chrono::Utc::now().date_naive()
}
