//! ISO period identifiers
//!
//! Used for annualization (periods per year) and to derive the `[days]`
//! count of a period.

use chrono::{Datelike, Months, NaiveDate, Weekday};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PeriodType {
    Daily,
    Weekly,
    BiWeekly,
    Monthly,
    BiMonthly,
    Quarterly,
    SixMonthly,
    SixMonthlyApril,
    Yearly,
    FinancialApril,
    FinancialJuly,
    FinancialOct,
}

static PATTERNS: LazyLock<Vec<(PeriodType, Regex)>> = LazyLock::new(|| {
    [
        (PeriodType::Daily, r"^(\d{4})(\d{2})(\d{2})$"),
        (PeriodType::Weekly, r"^(\d{4})W(\d{1,2})$"),
        (PeriodType::BiWeekly, r"^(\d{4})BiW(\d{1,2})$"),
        (PeriodType::Monthly, r"^(\d{4})(\d{2})$"),
        (PeriodType::BiMonthly, r"^(\d{4})(\d{2})B$"),
        (PeriodType::Quarterly, r"^(\d{4})Q(\d)$"),
        (PeriodType::SixMonthly, r"^(\d{4})S(\d)$"),
        (PeriodType::SixMonthlyApril, r"^(\d{4})AprilS(\d)$"),
        (PeriodType::Yearly, r"^(\d{4})$"),
        (PeriodType::FinancialApril, r"^(\d{4})April$"),
        (PeriodType::FinancialJuly, r"^(\d{4})July$"),
        (PeriodType::FinancialOct, r"^(\d{4})Oct$"),
    ]
    .into_iter()
    .filter_map(|(ty, pattern)| Regex::new(pattern).ok().map(|re| (ty, re)))
    .collect()
});

impl PeriodType {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Daily => "Daily",
            Self::Weekly => "Weekly",
            Self::BiWeekly => "BiWeekly",
            Self::Monthly => "Monthly",
            Self::BiMonthly => "BiMonthly",
            Self::Quarterly => "Quarterly",
            Self::SixMonthly => "SixMonthly",
            Self::SixMonthlyApril => "SixMonthlyApril",
            Self::Yearly => "Yearly",
            Self::FinancialApril => "FinancialApril",
            Self::FinancialJuly => "FinancialJuly",
            Self::FinancialOct => "FinancialOct",
        }
    }

    /// Type of an ISO period identifier, `None` when not recognised
    pub fn from_iso(iso: &str) -> Option<Self> {
        Period::parse(iso).map(|p| p.period_type)
    }

    /// Multiplier used to annualize indicator values
    pub const fn periods_per_year(&self) -> u32 {
        match self {
            Self::Daily => 365,
            Self::Weekly => 52,
            Self::BiWeekly => 26,
            Self::Monthly => 12,
            Self::BiMonthly => 6,
            Self::Quarterly => 4,
            Self::SixMonthly | Self::SixMonthlyApril => 2,
            Self::Yearly | Self::FinancialApril | Self::FinancialJuly | Self::FinancialOct => 1,
        }
    }
}

impl fmt::Display for PeriodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A concrete period with inclusive start and end dates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    pub iso: String,
    pub period_type: PeriodType,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Period {
    /// Parse an ISO period identifier such as `2001Q1` or `2001W3`
    pub fn parse(iso: &str) -> Option<Self> {
        PATTERNS.iter().find_map(|(ty, re)| {
            let caps = re.captures(iso)?;
            let year: i32 = caps.get(1)?.as_str().parse().ok()?;
            let n: u32 = caps.get(2).map_or(Some(1), |m| m.as_str().parse().ok())?;
            let (start, end) = bounds(*ty, year, n, caps.get(3).map(|m| m.as_str()))?;
            Some(Self {
                iso: iso.to_string(),
                period_type: *ty,
                start,
                end,
            })
        })
    }

    /// Number of days, both ends included
    pub fn days(&self) -> u32 {
        u32::try_from((self.end - self.start).num_days() + 1).unwrap_or(0)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.iso)
    }
}

/// First day of `month` (1-based, may overflow into following years)
fn month_start(year: i32, month: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, 1, 1)?.checked_add_months(Months::new(month.checked_sub(1)?))
}

/// Span of `count` months starting at `month`
fn months(year: i32, month: u32, count: u32) -> Option<(NaiveDate, NaiveDate)> {
    let start = month_start(year, month)?;
    let end = start.checked_add_months(Months::new(count))?.pred_opt()?;
    Some((start, end))
}

fn bounds(ty: PeriodType, year: i32, n: u32, day: Option<&str>) -> Option<(NaiveDate, NaiveDate)> {
    match ty {
        PeriodType::Daily => {
            let date = NaiveDate::from_ymd_opt(year, n, day?.parse().ok()?)?;
            Some((date, date))
        }
        PeriodType::Weekly => {
            let start = NaiveDate::from_isoywd_opt(year, n, Weekday::Mon)?;
            Some((start, start + chrono::Duration::days(6)))
        }
        PeriodType::BiWeekly => {
            let start = NaiveDate::from_isoywd_opt(year, n.checked_mul(2)?.checked_sub(1)?, Weekday::Mon)?;
            Some((start, start + chrono::Duration::days(13)))
        }
        PeriodType::Monthly if (1..=12).contains(&n) => months(year, n, 1),
        PeriodType::BiMonthly if (1..=6).contains(&n) => months(year, n * 2 - 1, 2),
        PeriodType::Quarterly if (1..=4).contains(&n) => months(year, n * 3 - 2, 3),
        PeriodType::SixMonthly if (1..=2).contains(&n) => months(year, n * 6 - 5, 6),
        PeriodType::SixMonthlyApril if (1..=2).contains(&n) => months(year, n * 6 - 2, 6),
        PeriodType::Yearly => months(year, 1, 12),
        PeriodType::FinancialApril => months(year, 4, 12),
        PeriodType::FinancialJuly => months(year, 7, 12),
        PeriodType::FinancialOct => months(year, 10, 12),
        _ => None,
    }
    .filter(|(start, _)| start.year() >= year)
}
