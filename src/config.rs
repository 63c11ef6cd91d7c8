//! Parser configuration.

use chrono::NaiveDate;

use crate::err::Error;

/// Seconds between the unix epoch and 2000-01-01T00:00:00Z.
const Y2K_OFFSET: i64 = 946_684_800;

/// Settings that are fixed for the lifetime of a [`Parser`](../parser/struct.Parser.html).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    century: u16,
    century_offset: i64,
}

impl Config {
    /// Creates a configuration for dates in the century starting at
    /// `century`, e.g. `2000` for dates `000101` to `991231` meaning the years
    /// 2000 to 2099.
    pub fn new(century: u16) -> Result<Self, Error> {
        if century % 100 != 0 {
            return Err(Error::InvalidCentury(century));
        }
        let start = NaiveDate::from_ymd_opt(i32::from(century), 1, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .ok_or(Error::InvalidCentury(century))?;

        Ok(Config {
            century,
            century_offset: start.and_utc().timestamp(),
        })
    }

    #[inline]
    pub fn century(&self) -> u16 {
        self.century
    }

    /// Seconds between the unix epoch and the first day of the century.
    #[inline]
    pub fn century_offset(&self) -> i64 {
        self.century_offset
    }

    /// Whether the year the century starts with is a leap year.
    #[inline]
    pub fn century_is_leap(&self) -> bool {
        self.century % 400 == 0
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            century: 2000,
            century_offset: Y2K_OFFSET,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_y2k() {
        assert_eq!(Config::new(2000).unwrap(), Config::default());
        assert!(Config::default().century_is_leap());
    }

    #[test]
    fn other_centuries() {
        let c = Config::new(1900).unwrap();
        assert_eq!(c.century_offset(), -2_208_988_800);
        assert!(!c.century_is_leap());
        assert_eq!(Config::new(2100).unwrap().century_offset(), 4_102_444_800);
    }

    #[test]
    fn rejects_odd_centuries() {
        assert_matches!(Config::new(2019), Err(Error::InvalidCentury(2019)));
    }
}
