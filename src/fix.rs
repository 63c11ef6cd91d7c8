//! The decoded fix snapshot.
//!
//! All numeric values are fixed-point, see the `fxp` module for the number
//! of fractional bits of each field. A [`Fix`] is only updated by the parser,
//! which field groups are consistent is reported through
//! [`Parser::fields_ready`](../parser/struct.Parser.html#method.fields_ready).

use arrayvec::ArrayVec;
use chrono::{DateTime, NaiveTime, Utc};

/// Number of satellite slots filled from GSV sentences.
pub const MAX_SATS: usize = 20;
/// Number of PRNs kept from a GSA sentence.
pub const MAX_PRNS_TRACKED: usize = 12;

const SECONDS_IN_DAY: i64 = 86_400;

/// Indicator of the quality of gps data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixQuality {
    Invalid,
    Gps,
    Dgps,
    Pps,
    RealTimeKinematic,
    FloatRtk,
    Estimated,
    ManualInput,
    Simulation,
}

impl FixQuality {
    /// Values outside of `0..=8` are treated as an invalid fix.
    #[inline]
    pub(crate) fn from_u64(v: u64) -> Self {
        match v {
            1 => FixQuality::Gps,
            2 => FixQuality::Dgps,
            3 => FixQuality::Pps,
            4 => FixQuality::RealTimeKinematic,
            5 => FixQuality::FloatRtk,
            6 => FixQuality::Estimated,
            7 => FixQuality::ManualInput,
            8 => FixQuality::Simulation,
            _ => FixQuality::Invalid,
        }
    }
}

impl Default for FixQuality {
    fn default() -> Self {
        FixQuality::Invalid
    }
}

/// Fix dimension as reported by GSA.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixMode {
    NoFix,
    Fix2d,
    Fix3d,
}

impl FixMode {
    #[inline]
    pub(crate) fn from_u64(v: u64) -> Self {
        match v {
            2 => FixMode::Fix2d,
            3 => FixMode::Fix3d,
            _ => FixMode::NoFix,
        }
    }
}

impl Default for FixMode {
    fn default() -> Self {
        FixMode::NoFix
    }
}

/// The `A`/`V` status flag of GLL and RMC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Void,
    Active,
}

impl Status {
    #[inline]
    pub(crate) fn from_char(c: u8) -> Self {
        if c == b'A' {
            Status::Active
        } else {
            Status::Void
        }
    }
}

impl Default for Status {
    fn default() -> Self {
        Status::Void
    }
}

/// A satellite in view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Satellite {
    pub prn: u8,
    /// Elevation in degrees, 0 to 90.
    pub elevation: u8,
    /// Azimuth in degrees from true north, 0 to 359.
    pub azimuth: u16,
    /// Signal to noise ratio in dBHz, 0 while not tracking.
    pub snr: u8,
}

/// Everything decoded so far.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fix {
    /// Longitude in degrees, Q9.55. Positive values are east.
    pub longitude: i64,
    /// Latitude in degrees, Q8.56. Positive values are north.
    pub latitude: i64,
    /// Seconds since the unix epoch, updated by both time and date fields.
    pub time: i64,
    /// Dilution of precision values, Q16.
    pub hdop: u32,
    pub pdop: u32,
    pub vdop: u32,
    /// Speed over ground in knots (RMC) or as first reported by VTG, Q16.
    pub speed: u32,
    /// Track in degrees, Q16.
    pub true_track: i32,
    pub magnetic_track: i32,
    /// Magnetic variation in degrees, Q24. Positive values are east.
    pub magnetic_variation: i32,
    /// Antenna altitude above mean sea level in meters, Q10.
    pub altitude: i32,
    /// Height of the geoid above the WGS84 ellipsoid in meters, Q10.
    pub geoid_height: i32,
    pub fix_quality: FixQuality,
    pub fix_mode: FixMode,
    pub gll_status: Status,
    pub rmc_status: Status,
    pub satellites_tracked: u16,
    pub satellites_in_view: u16,
    /// Number of GSV sentences of the latest group.
    pub gsv_sentences_total: u8,
    /// Number of the latest GSV sentence within its group, 1-based.
    pub gsv_sentence_no: u8,
    /// PRNs used for the fix, in GSA order.
    pub prns_tracked: ArrayVec<u8, MAX_PRNS_TRACKED>,
    pub(crate) sats: [Satellite; MAX_SATS],
    pub(crate) satellite_count: u8,
}

impl Fix {
    /// The satellites written by the most recent GSV sentences, in order of
    /// arrival.
    pub fn satellites(&self) -> &[Satellite] {
        &self.sats[..usize::from(self.satellite_count).min(MAX_SATS)]
    }

    /// Whether `prn` is one of the satellites used for the fix.
    pub fn is_tracked(&self, prn: u8) -> bool {
        self.prns_tracked.contains(&prn)
    }

    /// The UTC time of day of the fix.
    pub fn time_of_day(&self) -> Option<NaiveTime> {
        let secs = self.time.rem_euclid(SECONDS_IN_DAY) as u32;
        NaiveTime::from_num_seconds_from_midnight_opt(secs, 0)
    }

    /// The date and time of the fix. Only meaningful after a date was
    /// received, before that the date part is the unix epoch.
    pub fn utc(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.time, 0)
    }
}
