//! Period selection: which dates a statistics view covers.
//!
//! Two inclusion policies exist and the caller picks one explicitly:
//! calendar-aligned periods around an anchor date, or a trailing window of
//! N days ending on the anchor.

use anyhow::Result;
use chrono::{Datelike, Duration, Months, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Week,
    #[default]
    Month,
    Year,
    All,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodPolicy {
    /// Sunday-Saturday week, calendar month, calendar year.
    #[default]
    Calendar,
    /// Trailing 7/30/365 days ending on the anchor.
    Rolling,
}

impl Period {
    pub const ALL: [Period; 4] = [Period::Week, Period::Month, Period::Year, Period::All];

    pub fn label(&self) -> &'static str {
        match self {
            Period::Week => "This Week",
            Period::Month => "This Month",
            Period::Year => "This Year",
            Period::All => "All Time",
        }
    }

    /// Window length used by the rolling policy.
    pub fn rolling_days(&self) -> Option<i64> {
        match self {
            Period::Week => Some(7),
            Period::Month => Some(30),
            Period::Year => Some(365),
            Period::All => None,
        }
    }

    /// Inclusive first/last day of the calendar period containing `anchor`.
    pub fn calendar_range(&self, anchor: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
        match self {
            Period::Week => {
                let back = anchor.weekday().num_days_from_sunday() as i64;
                // Weeks at the edges of the date range are truncated.
                let first = anchor
                    .checked_sub_signed(Duration::days(back))
                    .unwrap_or(NaiveDate::MIN);
                let last = first
                    .checked_add_signed(Duration::days(6))
                    .unwrap_or(NaiveDate::MAX);
                Some((first, last))
            }
            Period::Month => {
                let first = anchor.with_day(1)?;
                let last = first
                    .checked_add_months(Months::new(1))
                    .and_then(|next| next.pred_opt())
                    .unwrap_or(NaiveDate::MAX);
                Some((first, last))
            }
            Period::Year => Some((
                NaiveDate::from_ymd_opt(anchor.year(), 1, 1)?,
                NaiveDate::from_ymd_opt(anchor.year(), 12, 31)?,
            )),
            Period::All => None,
        }
    }

    /// Move the anchor by whole periods. Month and year steps clamp to the
    /// last valid day (Mar 31 - 1 month = Feb 28/29). A shift that leaves the
    /// representable date range returns `anchor` unchanged.
    pub fn shift(&self, anchor: NaiveDate, steps: i32) -> NaiveDate {
        if steps == 0 {
            return anchor;
        }
        let months = match self {
            Period::Week => {
                return Duration::try_weeks(steps as i64)
                    .and_then(|d| anchor.checked_add_signed(d))
                    .unwrap_or(anchor);
            }
            Period::Month => Some(steps.unsigned_abs()),
            Period::Year => steps.unsigned_abs().checked_mul(12),
            Period::All => None,
        };
        let shifted = months.map(Months::new).and_then(|m| {
            if steps > 0 {
                anchor.checked_add_months(m)
            } else {
                anchor.checked_sub_months(m)
            }
        });
        shifted.unwrap_or(anchor)
    }

    /// True if `date` belongs to this period around `anchor` under `policy`.
    pub fn contains(&self, policy: PeriodPolicy, anchor: NaiveDate, date: NaiveDate) -> bool {
        match (self, policy) {
            (Period::All, _) => true,
            (Period::Week, PeriodPolicy::Calendar) => self
                .calendar_range(anchor)
                .is_some_and(|(first, last)| first <= date && date <= last),
            (Period::Month, PeriodPolicy::Calendar) => {
                date.year() == anchor.year() && date.month() == anchor.month()
            }
            (Period::Year, PeriodPolicy::Calendar) => date.year() == anchor.year(),
            (_, PeriodPolicy::Rolling) => {
                let age = (anchor - date).num_days();
                self.rolling_days().is_some_and(|n| (0..=n).contains(&age))
            }
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Period::Week => "week",
            Period::Month => "month",
            Period::Year => "year",
            Period::All => "all",
        })
    }
}

impl FromStr for Period {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "week" => Ok(Period::Week),
            "month" => Ok(Period::Month),
            "year" => Ok(Period::Year),
            "all" => Ok(Period::All),
            other => anyhow::bail!("unknown period: {other} (expected week|month|year|all)"),
        }
    }
}

impl fmt::Display for PeriodPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PeriodPolicy::Calendar => "calendar",
            PeriodPolicy::Rolling => "rolling",
        })
    }
}

impl FromStr for PeriodPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "calendar" => Ok(PeriodPolicy::Calendar),
            "rolling" => Ok(PeriodPolicy::Rolling),
            other => anyhow::bail!("unknown period policy: {other} (expected calendar|rolling)"),
        }
    }
}

/// Today's date on the wall clock of an IANA timezone like "Asia/Manila".
pub fn today_in(tz: &str) -> Result<NaiveDate> {
    let tz: Tz = tz
        .parse()
        .map_err(|_| anyhow::anyhow!("invalid timezone: {tz}"))?;
    Ok(Utc::now().with_timezone(&tz).date_naive())
}
