use serde::{Deserialize, Serialize};

/// Selects the records of one reporting period.
///
/// Only two shapes exist: a whole year, or one month of a year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PeriodSelector {
    Year { year: i32 },
    YearMonth { year: i32, month: u32 },
}

impl PeriodSelector {
    pub fn new(year: i32, month: Option<u32>) -> Self {
        match month {
            Some(month) => PeriodSelector::YearMonth { year, month },
            None => PeriodSelector::Year { year },
        }
    }

    pub fn year(&self) -> i32 {
        match self {
            PeriodSelector::Year { year } | PeriodSelector::YearMonth { year, .. } => *year,
        }
    }

    pub fn month(&self) -> Option<u32> {
        match self {
            PeriodSelector::Year { .. } => None,
            PeriodSelector::YearMonth { month, .. } => Some(*month),
        }
    }

    /// Same month constraint, one year earlier.
    pub fn previous_year(&self) -> Self {
        match *self {
            PeriodSelector::Year { year } => PeriodSelector::Year { year: year - 1 },
            PeriodSelector::YearMonth { year, month } => PeriodSelector::YearMonth {
                year: year - 1,
                month,
            },
        }
    }

    pub fn matches(&self, year: i32, month: u32) -> bool {
        match *self {
            PeriodSelector::Year { year: y } => year == y,
            PeriodSelector::YearMonth { year: y, month: m } => year == y && month == m,
        }
    }

    /// "2023" or "2023-06"
    pub fn describe(&self) -> String {
        match self {
            PeriodSelector::Year { year } => format!("{:04}", year),
            PeriodSelector::YearMonth { year, month } => format!("{:04}-{:02}", year, month),
        }
    }
}

impl std::fmt::Display for PeriodSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.describe())
    }
}

/// Inclusive year/month bounds. Every bound is optional and applied on its
/// own, so `start_month = 3, end_month = 5` keeps March to May of every year
/// inside the year bounds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    #[serde(default)]
    pub start_year: Option<i32>,
    #[serde(default)]
    pub end_year: Option<i32>,
    #[serde(default)]
    pub start_month: Option<u32>,
    #[serde(default)]
    pub end_month: Option<u32>,
}

impl DateRange {
    pub fn contains(&self, year: i32, month: u32) -> bool {
        self.start_year.map_or(true, |y| year >= y)
            && self.end_year.map_or(true, |y| year <= y)
            && self.start_month.map_or(true, |m| month >= m)
            && self.end_month.map_or(true, |m| month <= m)
    }

    pub fn describe(&self) -> String {
        fn bound<T: ToString>(v: Option<T>) -> String {
            v.map(|v| v.to_string()).unwrap_or_else(|| "all".to_string())
        }
        format!(
            "Years: {}-{}, Months: {}-{}",
            bound(self.start_year),
            bound(self.end_year),
            bound(self.start_month),
            bound(self.end_month)
        )
    }
}
