use std::fmt::{Display, Formatter};

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::macros::format_description;
use time::{Date, Duration, Month};

use crate::{FormatError, Granularity, ValidationError};

/// Calendar date carried by every series point, written as `MM/DD/YYYY`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SeriesDate(Date);

impl SeriesDate {
    /// Parse a strict `MM/DD/YYYY` date (zero padded month and day).
    pub fn parse(input: &str) -> Result<Self, FormatError> {
        let invalid = || FormatError::InvalidDate {
            value: input.to_owned(),
        };

        let bytes = input.as_bytes();
        let shaped = bytes.len() == 10
            && bytes.iter().enumerate().all(|(index, byte)| match index {
                2 | 5 => *byte == b'/',
                _ => byte.is_ascii_digit(),
            });
        if !shaped {
            return Err(invalid());
        }

        Date::parse(input, format_description!("[month]/[day]/[year]"))
            .map(Self)
            .map_err(|_| invalid())
    }

    pub fn from_calendar_date(year: i32, month: Month, day: u8) -> Result<Self, FormatError> {
        Date::from_calendar_date(year, month, day)
            .map(Self)
            .map_err(|_| FormatError::InvalidDate {
                value: format!("{:02}/{day:02}/{year:04}", u8::from(month)),
            })
    }

    pub const fn from_date(date: Date) -> Self {
        Self(date)
    }

    pub const fn into_inner(self) -> Date {
        self.0
    }

    /// `MM/DD/YYYY`, the wire representation.
    pub fn format_mdy(self) -> String {
        format!(
            "{:02}/{:02}/{:04}",
            u8::from(self.0.month()),
            self.0.day(),
            self.0.year()
        )
    }

    /// `YYYY-MM-DD`, used when handing date ranges to price providers.
    pub fn format_iso(self) -> String {
        format!(
            "{:04}-{:02}-{:02}",
            self.0.year(),
            u8::from(self.0.month()),
            self.0.day()
        )
    }

    /// Short month label such as `Jan 2024`.
    pub fn format_month_label(self) -> String {
        let month = self.0.month().to_string();
        format!("{} {:04}", &month[..3], self.0.year())
    }

    /// Signed number of days from `self` to `other`.
    pub fn days_until(self, other: Self) -> i64 {
        (other.0 - self.0).whole_days()
    }

    /// Move by `days`, or `None` past the representable calendar.
    pub fn checked_add_days(self, days: i64) -> Option<Self> {
        let seconds = days.checked_mul(86_400)?;
        self.0.checked_add(Duration::seconds(seconds)).map(Self)
    }

    /// Move by `days`, saturating at the calendar bounds.
    pub fn add_days(self, days: i64) -> Self {
        self.checked_add_days(days).unwrap_or(if days < 0 {
            Self(Date::MIN)
        } else {
            Self(Date::MAX)
        })
    }

    /// Step back `months` calendar months, clamping the day to the target
    /// month's length (`03/31` minus one month is `02/29` or `02/28`).
    /// `None` when the result predates the calendar.
    pub fn sub_months(self, months: u32) -> Option<Self> {
        let index = i64::from(self.0.year()) * 12 + i64::from(u8::from(self.0.month()))
            - 1
            - i64::from(months);
        let year = i32::try_from(index.div_euclid(12)).ok()?;
        let month = month_from_index(index.rem_euclid(12) as i32);
        let day = self.0.day().min(time::util::days_in_year_month(year, month));
        Date::from_calendar_date(year, month, day).ok().map(Self)
    }

    /// First day of the period containing this date.
    pub fn period_start(self, granularity: Granularity) -> Result<Self, ValidationError> {
        match granularity {
            Granularity::Daily => Ok(self),
            Granularity::Weekly => self
                .checked_add_days(-i64::from(self.0.weekday().number_days_from_monday()))
                .ok_or_else(|| self.out_of_range()),
            Granularity::Monthly => self
                .0
                .replace_day(1)
                .map(Self)
                .map_err(|_| self.out_of_range()),
        }
    }

    /// Last day of the period containing this date: the same day, the
    /// following Sunday, or the last day of the month. Fails when the
    /// following Sunday lies past the calendar's end (the week of
    /// `12/31/9999`).
    pub fn period_end(self, granularity: Granularity) -> Result<Self, ValidationError> {
        match granularity {
            Granularity::Daily => Ok(self),
            Granularity::Weekly => self
                .checked_add_days(6 - i64::from(self.0.weekday().number_days_from_monday()))
                .ok_or_else(|| self.out_of_range()),
            Granularity::Monthly => {
                let last = time::util::days_in_year_month(self.0.year(), self.0.month());
                self.0
                    .replace_day(last)
                    .map(Self)
                    .map_err(|_| self.out_of_range())
            }
        }
    }

    /// Number of calendar days in the period containing this date.
    pub fn period_len_days(self, granularity: Granularity) -> Result<i64, ValidationError> {
        let start = self.period_start(granularity)?;
        let end = self.period_end(granularity)?;
        Ok(start.days_until(end) + 1)
    }

    fn out_of_range(self) -> ValidationError {
        ValidationError::DateOutOfRange {
            date: self.format_mdy(),
        }
    }
}

fn month_from_index(index: i32) -> Month {
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
    MONTHS[index as usize]
}

impl Display for SeriesDate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.format_mdy())
    }
}

impl From<Date> for SeriesDate {
    fn from(value: Date) -> Self {
        Self(value)
    }
}

impl Serialize for SeriesDate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.format_mdy())
    }
}

impl<'de> Deserialize<'de> for SeriesDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Self::parse(&value).map_err(D::Error::custom)
    }
}
