//! Per field decoding.
//!
//! Every [`Field`] kind has a start, a char and an end handler. The start
//! handler prepares the scratch, the char handler is fed every character of
//! the field and the end handler writes the result to the [`Fix`] once the
//! field's delimiter arrives.
//!
//! [`Fix`]: ../fix/struct.Fix.html

use crate::field::Field;
use crate::fix::{FixMode, FixQuality, Status, MAX_SATS};
use crate::fxp::{self, narrow, narrow_signed, Fxp};
use crate::parser::Parser;

const SECONDS_IN_DAY: i64 = 86_400;

/// Seconds per digit of a `hhmmss` time.
const TIME_WEIGHTS: [u32; 6] = [36_000, 3_600, 600, 60, 10, 1];

/// Number of digits of a `ddmmyy` date.
const DATE_DIGITS: usize = 6;

/// Days per month, December is never needed.
const MONTH_DAYS: [i64; 11] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30];

/// Number of degree digits in front of the minutes of a latitude.
const LAT_DEGREE_DIGITS: u8 = 2;
/// Number of degree digits in front of the minutes of a longitude.
const LONG_DEGREE_DIGITS: u8 = 3;

/// Per field decode state, reset by every start handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Scratch {
    Idle,
    Number(Fxp),
    /// `dddmm.mmmm`, integer degrees followed by fixed-point minutes.
    Coord { degrees: u64, digits: u8, minutes: Fxp },
    /// `hhmmss.ss`, fractional seconds are dropped.
    Clock { position: u8, seconds: u32 },
    /// `ddmmyy`, accumulated as days since the start of the century.
    Date {
        position: u8,
        days: i64,
        month: u8,
        year: u8,
    },
}

impl Default for Scratch {
    fn default() -> Self {
        Scratch::Idle
    }
}

impl Scratch {
    fn number(&self) -> u64 {
        match *self {
            Scratch::Number(ref f) => f.unsigned(),
            _ => 0,
        }
    }

    fn signed_number(&self) -> i64 {
        match *self {
            Scratch::Number(ref f) => f.signed(),
            _ => 0,
        }
    }

    fn coord_char(&mut self, c: u8, degree_digits: u8, q: u32) {
        if let Scratch::Coord {
            ref mut degrees,
            ref mut digits,
            ref mut minutes,
        } = *self
        {
            if *digits < degree_digits {
                if c.is_ascii_digit() {
                    *degrees = *degrees * 10 + u64::from(c - b'0');
                    *digits += 1;
                }
            } else {
                minutes.push(c, q);
            }
        }
    }

    /// `(degrees << q) + minutes / 60`, saturating.
    fn coord(&self, q: u32) -> i64 {
        let (degrees, minutes) = match *self {
            Scratch::Coord {
                degrees, minutes, ..
            } => (degrees, minutes),
            _ => return 0,
        };
        let degrees = if degrees > u64::MAX >> q {
            u64::MAX
        } else {
            degrees << q
        };
        let val = degrees.saturating_add(minutes.unsigned() / 60);
        if val > i64::MAX as u64 {
            i64::MAX
        } else {
            val as i64
        }
    }

    fn clock_char(&mut self, c: u8) {
        if let Scratch::Clock {
            ref mut position,
            ref mut seconds,
        } = *self
        {
            if c.is_ascii_digit() {
                if let Some(weight) = TIME_WEIGHTS.get(usize::from(*position)) {
                    *seconds += u32::from(c - b'0') * weight;
                }
            }
            *position = position.saturating_add(1);
        }
    }

    fn date_char(&mut self, c: u8, century_is_leap: bool) {
        if let Scratch::Date {
            ref mut position,
            ref mut days,
            ref mut month,
            ref mut year,
        } = *self
        {
            let p = *position;
            *position = position.saturating_add(1);
            if !c.is_ascii_digit() {
                return;
            }
            let digit = c - b'0';

            match p {
                0 => *days = i64::from(digit) * 10,
                // days are one relative
                1 => *days += i64::from(digit) - 1,
                2 => *month = digit * 10,
                3 => {
                    *month += digit;
                    if *month >= 1 && *month <= 12 {
                        *days += MONTH_DAYS[..usize::from(*month - 1)].iter().sum::<i64>();
                    }
                }
                4 => *year = digit * 10,
                5 => {
                    *year += digit;
                    let y = i64::from(*year);
                    // Counts the leap days of years 1..=y, so this year's is
                    // included and removed again below if still before March.
                    *days += y * 365 + y / 4;
                    if century_is_leap {
                        *days += 1;
                    }
                    let leap_year = *year % 4 == 0 && (*year != 0 || century_is_leap);
                    if leap_year && *month < 3 {
                        *days -= 1;
                    }
                }
                _ => (),
            }
        }
    }
}

impl Parser {
    pub(crate) fn start_field(&mut self) {
        self.scratch = match self.field {
            Field::Header => {
                self.classifier.arm();
                Scratch::Idle
            }
            Field::Latitude | Field::Longitude => Scratch::Coord {
                degrees: 0,
                digits: 0,
                minutes: Fxp::new(),
            },
            Field::Time => Scratch::Clock {
                position: 0,
                seconds: 0,
            },
            Field::Date => Scratch::Date {
                position: 0,
                days: 0,
                month: 0,
                year: 0,
            },
            Field::FixQuality
            | Field::SatellitesTracked
            | Field::SatellitesInView
            | Field::Altitude
            | Field::GeoidHeight
            | Field::FixMode
            | Field::PrnsTracked
            | Field::Prn
            | Field::Pdop
            | Field::Hdop
            | Field::Vdop
            | Field::Speed
            | Field::MagneticVariation
            | Field::GsvSentencesTotal
            | Field::GsvSentenceNo
            | Field::Azimuth
            | Field::Elevation
            | Field::Snr
            | Field::TrueTrack
            | Field::MagneticTrack => Scratch::Number(Fxp::new()),
            Field::LatitudeDir
            | Field::LongitudeDir
            | Field::MagneticVariationDir
            | Field::GllStatus
            | Field::RmcStatus
            | Field::Ignore => Scratch::Idle,
        }
    }

    pub(crate) fn char_field(&mut self, c: u8) {
        let field = self.field;
        match field {
            Field::Header => self.classifier.push(c),
            Field::Latitude => self.scratch.coord_char(c, LAT_DEGREE_DIGITS, fxp::Q_LATITUDE),
            Field::Longitude => self.scratch.coord_char(c, LONG_DEGREE_DIGITS, fxp::Q_LONGITUDE),
            Field::LatitudeDir => {
                let lat = &mut self.fix.latitude;
                if (c == b'S' && *lat > 0) || (c == b'N' && *lat < 0) {
                    *lat = -*lat;
                }
            }
            Field::LongitudeDir => {
                let long = &mut self.fix.longitude;
                if (c == b'W' && *long > 0) || (c == b'E' && *long < 0) {
                    *long = -*long;
                }
            }
            Field::MagneticVariationDir => {
                let var = &mut self.fix.magnetic_variation;
                if (c == b'W' && *var > 0) || (c == b'E' && *var < 0) {
                    *var = -*var;
                }
            }
            Field::GllStatus => self.fix.gll_status = Status::from_char(c),
            Field::RmcStatus => self.fix.rmc_status = Status::from_char(c),
            Field::Time => self.scratch.clock_char(c),
            Field::Date => {
                let leap = self.config.century_is_leap();
                self.scratch.date_char(c, leap)
            }
            Field::Altitude
            | Field::GeoidHeight
            | Field::MagneticVariation
            | Field::TrueTrack
            | Field::MagneticTrack => number_char!(self, field, c, signed),
            Field::FixQuality
            | Field::SatellitesTracked
            | Field::SatellitesInView
            | Field::FixMode
            | Field::PrnsTracked
            | Field::Prn
            | Field::Pdop
            | Field::Hdop
            | Field::Vdop
            | Field::Speed
            | Field::GsvSentencesTotal
            | Field::GsvSentenceNo
            | Field::Azimuth
            | Field::Elevation
            | Field::Snr => number_char!(self, field, c, unsigned),
            Field::Ignore => (),
        }
    }

    pub(crate) fn end_field(&mut self) {
        let n = self.scratch.number();
        match self.field {
            Field::Header => {
                self.sentence = self.classifier.finish();
                if self.sentence.is_none() {
                    trace!("ignoring unknown or ambiguous sentence header");
                }
                self.start_sentence();
            }
            Field::Latitude => self.fix.latitude = self.scratch.coord(fxp::Q_LATITUDE),
            Field::Longitude => self.fix.longitude = self.scratch.coord(fxp::Q_LONGITUDE),
            Field::FixQuality => self.fix.fix_quality = FixQuality::from_u64(n),
            Field::SatellitesTracked => self.fix.satellites_tracked = narrow(n),
            Field::SatellitesInView => self.fix.satellites_in_view = narrow(n),
            Field::Altitude => self.fix.altitude = narrow_signed(self.scratch.signed_number()),
            Field::GeoidHeight => {
                self.fix.geoid_height = narrow_signed(self.scratch.signed_number())
            }
            Field::FixMode => self.fix.fix_mode = FixMode::from_u64(n),
            Field::PrnsTracked => {
                // empty slots are sent as empty fields or zero
                let prn: u8 = narrow(n);
                if prn != 0 && self.fix.prns_tracked.try_push(prn).is_err() {
                    trace!("dropping tracked PRN {}, list is full", prn);
                }
            }
            Field::Prn => with_satellite!(self, sat => sat.prn = narrow(n)),
            Field::Elevation => with_satellite!(self, sat => sat.elevation = narrow(n)),
            Field::Azimuth => with_satellite!(self, sat => sat.azimuth = narrow(n)),
            Field::Snr => {
                if usize::from(self.gsv.index()) < MAX_SATS {
                    with_satellite!(self, sat => sat.snr = narrow(n));
                    self.gsv.advance();
                    self.fix.satellite_count = self.gsv.index();
                }
            }
            Field::Pdop => self.fix.pdop = narrow(n),
            Field::Hdop => self.fix.hdop = narrow(n),
            Field::Vdop => self.fix.vdop = narrow(n),
            Field::Speed => self.fix.speed = narrow(n),
            Field::Time => {
                if let Scratch::Clock {
                    position, seconds, ..
                } = self.scratch
                {
                    if usize::from(position) >= TIME_WEIGHTS.len() {
                        // floor to the last day boundary, keeps the date
                        let time = &mut self.fix.time;
                        *time = time.div_euclid(SECONDS_IN_DAY) * SECONDS_IN_DAY
                            + i64::from(seconds);
                    }
                }
            }
            Field::Date => {
                if let Scratch::Date { position, days, .. } = self.scratch {
                    if usize::from(position) >= DATE_DIGITS {
                        // keeps the time of day, so time has to come first
                        let time = &mut self.fix.time;
                        *time = time.rem_euclid(SECONDS_IN_DAY)
                            + self.config.century_offset()
                            + days * SECONDS_IN_DAY;
                    }
                }
            }
            Field::MagneticVariation => {
                self.fix.magnetic_variation = narrow_signed(self.scratch.signed_number())
            }
            Field::TrueTrack => self.fix.true_track = narrow_signed(self.scratch.signed_number()),
            Field::MagneticTrack => {
                self.fix.magnetic_track = narrow_signed(self.scratch.signed_number())
            }
            Field::GsvSentencesTotal => {
                let total = narrow(n);
                self.fix.gsv_sentences_total = total;
                self.gsv.set_total(total);
            }
            Field::GsvSentenceNo => {
                let no = narrow(n);
                self.fix.gsv_sentence_no = no;
                self.gsv.set_sentence_no(no);
            }
            Field::LatitudeDir
            | Field::LongitudeDir
            | Field::MagneticVariationDir
            | Field::GllStatus
            | Field::RmcStatus
            | Field::Ignore => (),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(mut scratch: Scratch, s: &str, f: impl Fn(&mut Scratch, u8)) -> Scratch {
        for c in s.bytes() {
            f(&mut scratch, c);
        }
        scratch
    }

    fn coord(s: &str, digits: u8, q: u32) -> f64 {
        let start = Scratch::Coord {
            degrees: 0,
            digits: 0,
            minutes: Fxp::new(),
        };
        let v = feed(start, s, |sc, c| sc.coord_char(c, digits, q)).coord(q);
        v as f64 / (1u64 << q) as f64
    }

    fn date(s: &str, century_is_leap: bool) -> i64 {
        let start = Scratch::Date {
            position: 0,
            days: 0,
            month: 0,
            year: 0,
        };
        match feed(start, s, |sc, c| sc.date_char(c, century_is_leap)) {
            Scratch::Date { days, .. } => days,
            _ => unreachable!(),
        }
    }

    fn days_since(y: i32, m: u32, d: u32, century: i32) -> i64 {
        use chrono::NaiveDate;
        let date = NaiveDate::from_ymd_opt(y, m, d).unwrap();
        let start = NaiveDate::from_ymd_opt(century, 1, 1).unwrap();
        (date - start).num_days()
    }

    #[test]
    fn latitude() {
        let lat = coord("5104.34432", LAT_DEGREE_DIGITS, fxp::Q_LATITUDE);
        assert!((lat - 51.072405).abs() < 1e-6);
    }

    #[test]
    fn longitude() {
        let long = coord("00147.29814", LONG_DEGREE_DIGITS, fxp::Q_LONGITUDE);
        assert!((long - 1.788302).abs() < 1e-6);
    }

    #[test]
    fn coordinate_degrees_saturate() {
        let v = feed(
            Scratch::Coord {
                degrees: 0,
                digits: 0,
                minutes: Fxp::new(),
            },
            "99959.9999",
            |sc, c| sc.coord_char(c, LONG_DEGREE_DIGITS, fxp::Q_LONGITUDE),
        )
        .coord(fxp::Q_LONGITUDE);
        assert_eq!(v, i64::MAX);
    }

    #[test]
    fn clock() {
        let start = Scratch::Clock {
            position: 0,
            seconds: 0,
        };
        assert_matches!(
            feed(start, "175456.00", |sc, c| sc.clock_char(c)),
            Scratch::Clock {
                position: 9,
                seconds: 64_496
            }
        );
    }

    #[test]
    fn dates_match_calendar() {
        for &(s, y, m, d) in [
            ("080321", 2021, 3, 8),
            ("010100", 2000, 1, 1),
            ("290200", 2000, 2, 29),
            ("010300", 2000, 3, 1),
            ("290220", 2020, 2, 29),
            ("010320", 2020, 3, 1),
            ("151220", 2020, 12, 15),
            ("311299", 2099, 12, 31),
        ]
        .iter()
        {
            assert_eq!(date(s, true), days_since(y, m, d, 2000), "{}", s);
        }
    }

    #[test]
    fn dates_in_non_leap_century() {
        for &(s, y, m, d) in [
            ("150200", 1900, 2, 15),
            ("010300", 1900, 3, 1),
            ("290296", 1996, 2, 29),
            ("010396", 1996, 3, 1),
        ]
        .iter()
        {
            assert_eq!(date(s, false), days_since(y, m, d, 1900), "{}", s);
        }
    }

    #[test]
    fn invalid_month_adds_nothing() {
        assert_eq!(date("011321", true), date("010121", true));
    }
}
