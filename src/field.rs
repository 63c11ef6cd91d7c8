//! Field kinds and the bitmaps keyed by them.

use std::ops::BitOr;

use crate::fxp;

/// Every kind of field a supported sentence can carry.
///
/// The discriminant is the kind's bit position in a [`Fields`] bitmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Field {
    Longitude = 0,
    LongitudeDir,
    LatitudeDir,
    Latitude,

    FixQuality,
    SatellitesTracked,
    SatellitesInView,
    Altitude,

    GeoidHeight,
    FixMode,
    PrnsTracked,
    Prn,

    Pdop,
    Hdop,
    Vdop,
    GllStatus,

    RmcStatus,
    Speed,
    Time,
    Date,

    MagneticVariation,
    MagneticVariationDir,
    Ignore,
    GsvSentencesTotal,

    GsvSentenceNo,
    Azimuth,
    Elevation,
    Snr,

    TrueTrack,
    MagneticTrack,
    Header,
}

impl Field {
    /// Number of fractional bits used for this field's fixed-point value,
    /// `0` for plain integers and non-numeric fields.
    pub fn fractional_bits(self) -> u32 {
        match self {
            Field::Longitude => fxp::Q_LONGITUDE,
            Field::Latitude => fxp::Q_LATITUDE,
            Field::Altitude => fxp::Q_ALTITUDE,
            Field::GeoidHeight => fxp::Q_GEOID_HEIGHT,
            Field::Pdop | Field::Hdop | Field::Vdop => fxp::Q_DOP,
            Field::Speed => fxp::Q_SPEED,
            Field::MagneticVariation => fxp::Q_MAGNETIC_VARIATION,
            Field::TrueTrack | Field::MagneticTrack => fxp::Q_TRACK,
            _ => 0,
        }
    }

    /// The single-bit mask of this field.
    #[inline]
    pub const fn mask(self) -> Fields {
        Fields::from_bits_retain(1 << self as u32)
    }

    /// Whether a character in this field is recorded in the sentence's
    /// touched bitmap. Header and ignored fields never become ready.
    #[inline]
    pub(crate) fn is_tracked(self) -> bool {
        match self {
            Field::Ignore | Field::Header => false,
            _ => true,
        }
    }
}

bitflags! {
    /// A set of [`Field`]s, one bit per kind.
    ///
    /// Used for the readiness bitmap as well as for the masks a consumer polls
    /// with, see [`fields!`](../macro.fields.html).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Fields: u32 {
        const LONGITUDE = 1 << 0;
        const LONGITUDE_DIR = 1 << 1;
        const LATITUDE_DIR = 1 << 2;
        const LATITUDE = 1 << 3;

        const FIX_QUALITY = 1 << 4;
        const SATELLITES_TRACKED = 1 << 5;
        const SATELLITES_IN_VIEW = 1 << 6;
        const ALTITUDE = 1 << 7;

        const GEOID_HEIGHT = 1 << 8;
        const FIX_MODE = 1 << 9;
        const PRNS_TRACKED = 1 << 10;
        const PRN = 1 << 11;

        const PDOP = 1 << 12;
        const HDOP = 1 << 13;
        const VDOP = 1 << 14;
        const GLL_STATUS = 1 << 15;

        const RMC_STATUS = 1 << 16;
        const SPEED = 1 << 17;
        const TIME = 1 << 18;
        const DATE = 1 << 19;

        const MAGNETIC_VARIATION = 1 << 20;
        const MAGNETIC_VARIATION_DIR = 1 << 21;
        const IGNORE = 1 << 22;
        const GSV_SENTENCES_TOTAL = 1 << 23;

        const GSV_SENTENCE_NO = 1 << 24;
        const AZIMUTH = 1 << 25;
        const ELEVATION = 1 << 26;
        const SNR = 1 << 27;

        const TRUE_TRACK = 1 << 28;
        const MAGNETIC_TRACK = 1 << 29;
        const HEADER = 1 << 30;
    }
}

impl Fields {
    /// Clears `mask` and returns `true` if every bit of it was set, leaves
    /// `self` untouched and returns `false` otherwise.
    #[inline]
    pub fn take(&mut self, mask: Fields) -> bool {
        if self.contains(mask) {
            self.remove(mask);
            true
        } else {
            false
        }
    }
}

impl Default for Fields {
    fn default() -> Self {
        Fields::empty()
    }
}

impl From<Field> for Fields {
    fn from(field: Field) -> Self {
        field.mask()
    }
}

impl BitOr<Field> for Fields {
    type Output = Fields;

    fn bitor(self, rhs: Field) -> Fields {
        self.union(rhs.mask())
    }
}

impl BitOr for Field {
    type Output = Fields;

    fn bitor(self, rhs: Field) -> Fields {
        self.mask().union(rhs.mask())
    }
}
