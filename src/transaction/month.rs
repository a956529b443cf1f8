//! Month windows: the half-open date-time ranges that scope the report views.

use time::{Date, Month, OffsetDateTime};

/// A half-open date-time interval `[start, end)` covering one calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthWindow {
    /// Midnight UTC on the first day of the month.
    pub start: OffsetDateTime,
    /// Midnight UTC on the first day of the following month.
    pub end: OffsetDateTime,
}

impl MonthWindow {
    /// The window for `month` in `year`.
    ///
    /// Returns `None` if the window falls outside the dates `time` can
    /// represent.
    pub fn new(year: i32, month: Month) -> Option<Self> {
        let start = Date::from_calendar_date(year, month, 1).ok()?;
        let end_year = if month == Month::December {
            year.checked_add(1)?
        } else {
            year
        };
        let end = Date::from_calendar_date(end_year, month.next(), 1).ok()?;

        Some(Self {
            start: start.midnight().assume_utc(),
            end: end.midnight().assume_utc(),
        })
    }

    /// Whether `date_time` falls inside the window.
    pub fn contains(&self, date_time: OffsetDateTime) -> bool {
        self.start <= date_time && date_time < self.end
    }
}

/// How records are restricted by their date of sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateFilter {
    /// No restriction.
    #[default]
    Any,
    /// Only records sold within the window.
    Within(MonthWindow),
    /// No record matches, used when the requested month is missing or invalid.
    Nothing,
}

impl DateFilter {
    /// Build the date filter for the month named `month` in `reference_year`.
    ///
    /// A missing or unrecognised month name yields [DateFilter::Nothing] so
    /// that report views come back empty instead of failing.
    pub fn for_month(month: Option<&str>, reference_year: i32) -> Self {
        match month
            .and_then(parse_month)
            .and_then(|month| MonthWindow::new(reference_year, month))
        {
            Some(window) => Self::Within(window),
            None => {
                tracing::debug!("no valid month in {month:?}, date filter will match nothing");
                Self::Nothing
            }
        }
    }

    /// Whether a record sold at `date_time` passes the filter.
    pub fn matches(&self, date_time: OffsetDateTime) -> bool {
        match self {
            Self::Any => true,
            Self::Within(window) => window.contains(date_time),
            Self::Nothing => false,
        }
    }
}

const MONTHS: [Month; 12] = [
    Month::January,
    Month::February,
    Month::March,
    Month::April,
    Month::May,
    Month::June,
    Month::July,
    Month::August,
    Month::September,
    Month::October,
    Month::November,
    Month::December,
];

/// Parse an English month name, e.g. "March", "march" or "Mar".
///
/// Full names and three-letter abbreviations are accepted, ignoring case and
/// surrounding whitespace.
pub fn parse_month(text: &str) -> Option<Month> {
    let text = text.trim();

    MONTHS.into_iter().find(|month| {
        let name = month.to_string();
        name.eq_ignore_ascii_case(text) || name[..3].eq_ignore_ascii_case(text)
    })
}

/// The English names of all months, in calendar order.
pub fn month_names() -> impl Iterator<Item = String> {
    MONTHS.into_iter().map(|month| month.to_string())
}
