use chrono::{Months, NaiveDate};
use serde::Serialize;

/// Specifies the sort order for the bars.
#[derive(Clone, Copy, Debug, Serialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Sort {
    #[default]
    Asc,
    Desc,
}

/// Query string for one aggregates page.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct AggregatesQuery {
    pub adjusted: bool,
    pub sort: Sort,
    pub limit: u32,
    pub offset: u64,
}

/// Inclusive calendar-date window placed in the request path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    /// The `years` calendar years ending at `today`.
    ///
    /// Feb 29 clamps to Feb 28 when the start year is not a leap year.
    pub fn trailing_years(today: NaiveDate, years: u32) -> Self {
        let from = today
            .checked_sub_months(Months::new(years.saturating_mul(12)))
            .unwrap_or(NaiveDate::MIN);
        Self { from, to: today }
    }

    /// `"{from}/{to}"` as `YYYY-MM-DD/YYYY-MM-DD`.
    pub fn path_segment(&self) -> String {
        format!("{}/{}", self.from.format("%Y-%m-%d"), self.to.format("%Y-%m-%d"))
    }
}
