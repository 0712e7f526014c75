use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Year under which every birthday is stored. 2000 is a leap year, so
/// Feb 29 birthdays stay representable.
pub const SENTINEL_YEAR: i32 = 2000;

/// Days per month, February permissively 29 so leap-day birthdays are
/// accepted year-round.
pub const DAYS_IN_MONTH: [u32; 12] = [31, 29, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// A birthday: month and day under the fixed sentinel year.
///
/// The canonical text form is `2000-MM-DD`. Month and day only ever move
/// between the struct and the text form by splitting the string — never
/// through a wall-clock date object, so the stored day cannot drift with
/// the host timezone or DST.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CanonDate {
    month: u32,
    day: u32,
}

impl CanonDate {
    pub fn new(month: u32, day: u32) -> Result<Self, Error> {
        if !(1..=12).contains(&month) {
            return Err(Error::InvalidDate { month, day });
        }
        if day < 1 || day > DAYS_IN_MONTH[(month - 1) as usize] {
            return Err(Error::InvalidDate { month, day });
        }
        Ok(Self { month, day })
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn day(&self) -> u32 {
        self.day
    }
}

impl fmt::Display for CanonDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{SENTINEL_YEAR}-{:02}-{:02}", self.month, self.day)
    }
}

impl FromStr for CanonDate {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        let mut parts = s.trim().splitn(3, '-');
        let _year = parts.next();
        let month = parts.next().and_then(|p| p.parse().ok()).unwrap_or(0);
        let day = parts.next().and_then(|p| p.parse().ok()).unwrap_or(0);
        Self::new(month, day)
    }
}

impl TryFrom<String> for CanonDate {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Error> {
        s.parse()
    }
}

impl From<CanonDate> for String {
    fn from(date: CanonDate) -> String {
        date.to_string()
    }
}
