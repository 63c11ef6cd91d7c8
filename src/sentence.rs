//! The supported sentence formats and the classifier picking one of them
//! from a sentence header.

use crate::field::Field;
use crate::field::Field::*;

/// Length of a sentence header, talker id and sentence type, e.g. `GPGGA`.
pub const HEADER_LENGTH: usize = 5;

const GGA_FIELDS: &[Field] = &[
    Time,
    Latitude,
    LatitudeDir,
    Longitude,
    LongitudeDir,
    FixQuality,
    SatellitesTracked,
    Hdop,
    Altitude,
    Ignore,
    GeoidHeight,
    Ignore,
    Ignore,
    Ignore,
];

const GLL_FIELDS: &[Field] = &[
    Latitude,
    LatitudeDir,
    Longitude,
    LongitudeDir,
    Time,
    GllStatus,
    Ignore,
];

const GSA_FIELDS: &[Field] = &[
    Ignore,
    FixMode,
    PrnsTracked,
    PrnsTracked,
    PrnsTracked,
    PrnsTracked,
    PrnsTracked,
    PrnsTracked,
    PrnsTracked,
    PrnsTracked,
    PrnsTracked,
    PrnsTracked,
    PrnsTracked,
    PrnsTracked,
    Pdop,
    Hdop,
    Vdop,
];

const GSV_FIELDS: &[Field] = &[
    GsvSentencesTotal,
    GsvSentenceNo,
    SatellitesInView,
    Prn,
    Elevation,
    Azimuth,
    Snr,
    Prn,
    Elevation,
    Azimuth,
    Snr,
    Prn,
    Elevation,
    Azimuth,
    Snr,
    Prn,
    Elevation,
    Azimuth,
    Snr,
];

const RMC_FIELDS: &[Field] = &[
    Time,
    RmcStatus,
    Latitude,
    LatitudeDir,
    Longitude,
    LongitudeDir,
    Speed,
    TrueTrack,
    Date,
    MagneticVariation,
    MagneticVariationDir,
    Ignore,
];

const VTG_FIELDS: &[Field] = &[
    TrueTrack,
    Ignore,
    MagneticTrack,
    Ignore,
    Speed,
    Ignore,
    Ignore,
    Ignore,
    Ignore,
];

/// A sentence format the parser can decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sentence {
    /// Global positioning system fix data.
    Gga,
    /// Geographic position, latitude and longitude.
    Gll,
    /// DOP and active satellites.
    Gsa,
    /// Satellites in view, may span several sentences.
    Gsv,
    /// Recommended minimum specific GPS data.
    Rmc,
    /// Track made good and ground speed.
    Vtg,
}

impl Sentence {
    pub const ALL: [Sentence; 6] = [
        Sentence::Gga,
        Sentence::Gll,
        Sentence::Gsa,
        Sentence::Gsv,
        Sentence::Rmc,
        Sentence::Vtg,
    ];

    /// The header literal following the `$`.
    pub fn header(self) -> &'static [u8; HEADER_LENGTH] {
        match self {
            Sentence::Gga => b"GPGGA",
            Sentence::Gll => b"GPGLL",
            Sentence::Gsa => b"GPGSA",
            Sentence::Gsv => b"GPGSV",
            Sentence::Rmc => b"GPRMC",
            Sentence::Vtg => b"GPVTG",
        }
    }

    /// The kinds of the comma separated fields after the header, in order.
    pub fn fields(self) -> &'static [Field] {
        match self {
            Sentence::Gga => GGA_FIELDS,
            Sentence::Gll => GLL_FIELDS,
            Sentence::Gsa => GSA_FIELDS,
            Sentence::Gsv => GSV_FIELDS,
            Sentence::Rmc => RMC_FIELDS,
            Sentence::Vtg => VTG_FIELDS,
        }
    }

    /// The kind of the field at `index`, excess fields are ignored.
    #[inline]
    pub fn field(self, index: usize) -> Field {
        self.fields().get(index).cloned().unwrap_or(Ignore)
    }
}

/// Picks a [`Sentence`] by eliminating candidates one header character at a
/// time.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Classifier {
    candidates: u8,
    position: usize,
}

impl Classifier {
    const ALL_CANDIDATES: u8 = (1 << Sentence::ALL.len()) - 1;

    /// Starts over with every format as a candidate.
    pub fn arm(&mut self) {
        self.candidates = Self::ALL_CANDIDATES;
        self.position = 0;
    }

    pub fn push(&mut self, c: u8) {
        for (i, sentence) in Sentence::ALL.iter().enumerate() {
            if sentence.header().get(self.position) != Some(&c) {
                self.candidates &= !(1 << i);
            }
        }
        self.position = self.position.saturating_add(1);
    }

    /// The one remaining candidate, `None` if the header was too short or
    /// not exactly one format matched.
    pub fn finish(&self) -> Option<Sentence> {
        if self.position != HEADER_LENGTH || !self.candidates.is_power_of_two() {
            return None;
        }
        Sentence::ALL
            .get(self.candidates.trailing_zeros() as usize)
            .cloned()
    }
}
