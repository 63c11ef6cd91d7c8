//! This module provides the streaming parser for the supported sentences of
//! the *NMEA 0183* protocol.

use std::io;

use crate::config::Config;
use crate::decode::Scratch;
use crate::err::Error;
use crate::field::{Field, Fields};
use crate::fix::Fix;
use crate::gsv::GsvGroup;
use crate::sentence::{Classifier, Sentence};

/// Where in a sentence the parser currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Waiting for the next `$`.
    Idle,
    /// Inside the header or the comma separated fields.
    Fields,
    /// Expecting the high nibble of the checksum.
    ChecksumHigh,
    /// Expecting the low nibble, `None` if the high one was not a hex digit.
    ChecksumLow(Option<u8>),
}

/// A byte at a time parser for `GPGGA`, `GPGLL`, `GPGSA`, `GPGSV`, `GPRMC` and
/// `GPVTG` sentences.
///
/// Decoded values are written to a [`Fix`](../fix/struct.Fix.html) as they
/// arrive, [`fields_ready`](#method.fields_ready) tells which of them belong
/// to a sentence that passed its checksum. Anything else is silently skipped,
/// the next `$` always starts over.
///
/// ```
/// # #[macro_use] extern crate lifeboat;
/// # fn main() {
/// use lifeboat::Parser;
///
/// let mut parser = Parser::new();
/// parser.parse_bytes(b"$GPGLL,5104.34432,N,00147.29814,W,175456.00,A,A*79\r\n");
///
/// assert!(parser.fields_ready(fields![Latitude, Longitude]));
/// assert!(parser.fix().latitude > 0 && parser.fix().longitude < 0);
/// // every arrival is reported once
/// assert!(!parser.fields_ready(fields![Latitude, Longitude]));
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Parser {
    pub(crate) config: Config,
    pub(crate) fix: Fix,
    /// Fields of committed sentences not yet consumed.
    ready: Fields,
    /// Fields that received characters in the current sentence.
    touched: Fields,
    pub(crate) sentence: Option<Sentence>,
    pub(crate) classifier: Classifier,
    pub(crate) field: Field,
    comma_count: usize,
    checksum: u8,
    mode: Mode,
    pub(crate) scratch: Scratch,
    pub(crate) gsv: GsvGroup,
}

impl Parser {
    pub fn new() -> Self {
        Parser::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        Parser {
            config,
            fix: Fix::default(),
            ready: Fields::empty(),
            touched: Fields::empty(),
            sentence: None,
            classifier: Classifier::default(),
            field: Field::Ignore,
            comma_count: 0,
            checksum: 0,
            mode: Mode::Idle,
            scratch: Scratch::Idle,
            gsv: GsvGroup::default(),
        }
    }

    /// Discards all state, including the fix and any partially received GSV
    /// group. The configuration is kept.
    pub fn reset(&mut self) {
        *self = Parser::with_config(self.config);
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The values decoded so far.
    #[inline]
    pub fn fix(&self) -> &Fix {
        &self.fix
    }

    /// The fields that are ready, without consuming them.
    #[inline]
    pub fn ready(&self) -> Fields {
        self.ready
    }

    /// Returns `true` if every field in `fields` is ready and marks them as
    /// consumed, so the next call only succeeds once they arrived again.
    /// Returns `false` and changes nothing otherwise.
    ///
    /// After `true` the fields can be read from [`fix`](#method.fix) until
    /// the next call to [`parse`](#method.parse).
    #[inline]
    pub fn fields_ready(&mut self, fields: Fields) -> bool {
        self.ready.take(fields)
    }

    /// Parses a single character of the input stream.
    pub fn parse(&mut self, c: u8) {
        if c == b'$' {
            self.start_sentence_header();
            return;
        }

        match self.mode {
            Mode::Idle => (),
            Mode::ChecksumHigh => self.mode = Mode::ChecksumLow(hex_to_nibble(c)),
            Mode::ChecksumLow(high) => {
                let received = high.and_then(|h| hex_to_nibble(c).map(|l| h << 4 | l));
                self.finish_sentence(received);
                self.mode = Mode::Idle;
            }
            Mode::Fields => match c {
                b',' => {
                    self.ready.remove(self.field.mask());
                    self.end_field();
                    self.next_field();
                    self.checksum ^= c;
                }
                b'*' => {
                    self.ready.remove(self.field.mask());
                    self.end_field();
                    self.mode = Mode::ChecksumHigh;
                }
                _ => {
                    if self.field.is_tracked() {
                        self.touched.insert(self.field.mask());
                        self.ready.remove(self.field.mask());
                    }
                    self.char_field(c);
                    self.checksum ^= c;
                }
            },
        }
    }

    /// Parses every character of `input`.
    pub fn parse_bytes(&mut self, input: &[u8]) {
        for &c in input {
            self.parse(c);
        }
    }

    fn start_sentence_header(&mut self) {
        self.touched = Fields::empty();
        self.checksum = 0;
        self.comma_count = 0;
        self.sentence = None;
        self.mode = Mode::Fields;
        self.field = Field::Header;
        self.start_field();
    }

    fn next_field(&mut self) {
        self.field = match self.sentence {
            Some(s) => s.field(self.comma_count),
            None => Field::Ignore,
        };
        self.comma_count = self.comma_count.saturating_add(1);
        self.start_field();
    }

    /// Runs once the header identified a sentence.
    pub(crate) fn start_sentence(&mut self) {
        if let Some(Sentence::Gsa) = self.sentence {
            self.fix.prns_tracked.clear();
        }
    }

    fn finish_sentence(&mut self, received: Option<u8>) {
        let sentence = match self.sentence {
            Some(s) => s,
            None => return,
        };

        if received != Some(self.checksum) {
            debug!(
                "{:?} checksum mismatch, computed {:02X}, received {:?}",
                sentence, self.checksum, received
            );
            if sentence == Sentence::Gsv {
                debug!("discarding partial GSV group");
                self.gsv.discard();
            }
            return;
        }

        match sentence {
            Sentence::Gsv => {
                if let Some(fields) = self.gsv.commit(self.touched) {
                    debug!("GSV group of {} complete", self.fix.gsv_sentences_total);
                    self.ready |= fields;
                }
            }
            _ => self.ready |= self.touched,
        }
    }
}

impl Default for Parser {
    fn default() -> Self {
        Parser::new()
    }
}

#[inline]
fn hex_to_nibble(c: u8) -> Option<u8> {
    (c as char).to_digit(16).map(|d| d as u8)
}

/// Feeds a [`Parser`] from a byte source such as a file or a serial port.
#[derive(Debug)]
pub struct Reader<R> {
    input: io::Bytes<R>,
    parser: Parser,
}

impl<R: io::Read> Reader<R> {
    /// Create a new reader that parses `input`.
    pub fn new(input: R) -> Self {
        Reader::with_parser(input, Parser::new())
    }

    pub fn with_parser(input: R, parser: Parser) -> Self {
        Reader {
            input: input.bytes(),
            parser,
        }
    }

    /// Reads until every field in `fields` is ready and returns the fix.
    /// Returns `None` if the input ended first.
    pub fn wait_for(&mut self, fields: Fields) -> Result<Option<&Fix>, Error> {
        loop {
            match self.input.next() {
                None => return Ok(None),
                Some(c) => self.parser.parse(c?),
            }
            if self.parser.fields_ready(fields) {
                return Ok(Some(self.parser.fix()));
            }
        }
    }

    /// The wrapped parser, e.g. to peek at [`Parser::ready`] between reads.
    pub fn parser(&self) -> &Parser {
        &self.parser
    }

    /// Mutable access to the wrapped parser, for consuming further fields or
    /// a [`Parser::reset`] after the source was reopened.
    pub fn parser_mut(&mut self) -> &mut Parser {
        &mut self.parser
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fix::{FixMode, FixQuality, Satellite, Status};
    use crate::fxp;

    const RMC: &[u8] =
        b"$GPRMC,175456.00,A,5104.34432,N,00147.29814,W,34.075,213.73,080321,,,A*47\r\n";
    const GGA: &[u8] =
        b"$GPGGA,175456.00,5104.34432,N,00147.29814,W,1,03,2.88,61.8,M,47.5,M,,*74\r\n";
    const GSV_1: &[u8] = b"$GPGSV,2,1,08,05,02,020,,07,,,33,16,76,272,33,18,58,069,31*48\r\n";
    const GSV_2: &[u8] = b"$GPGSV,2,2,08,20,,,24,23,28,121,20,26,,,31,27,46,274,32*7F\r\n";

    fn real(v: i64, q: u32) -> f64 {
        v as f64 / (1u64 << q) as f64
    }

    fn parsed(input: &[u8]) -> Parser {
        let mut p = Parser::new();
        p.parse_bytes(input);
        p
    }

    #[test]
    fn rmc() {
        let mut p = parsed(RMC);
        assert!(p.fields_ready(fields![
            Time,
            RmcStatus,
            Latitude,
            LatitudeDir,
            Longitude,
            LongitudeDir,
            Speed,
            TrueTrack,
            Date
        ]));
        assert!(p.ready().is_empty());

        let fix = p.fix();
        assert_eq!(fix.time, 1_615_226_096);
        assert_eq!(fix.rmc_status, Status::Active);
        assert!((real(fix.latitude, fxp::Q_LATITUDE) - 51.072405).abs() < 1e-6);
        assert!((real(fix.longitude, fxp::Q_LONGITUDE) + 1.788302).abs() < 1e-6);
        assert!((real(i64::from(fix.speed), fxp::Q_SPEED) - 34.075).abs() < 1e-3);
        assert!((real(i64::from(fix.true_track), fxp::Q_TRACK) - 213.73).abs() < 1e-3);
        assert_eq!(fix.magnetic_variation, 0);
    }

    #[test]
    fn gga() {
        let mut p = parsed(GGA);
        assert!(p.fields_ready(fields![
            Time,
            Latitude,
            LatitudeDir,
            Longitude,
            LongitudeDir,
            FixQuality,
            SatellitesTracked,
            Hdop,
            Altitude,
            GeoidHeight
        ]));
        assert!(p.ready().is_empty());

        let fix = p.fix();
        assert_eq!(fix.time, 0xfbf0);
        assert_eq!(fix.fix_quality, FixQuality::Gps);
        assert_eq!(fix.satellites_tracked, 3);
        assert!((real(i64::from(fix.hdop), fxp::Q_DOP) - 2.88).abs() < 1e-3);
        assert!((real(i64::from(fix.altitude), fxp::Q_ALTITUDE) - 61.8).abs() < 1e-3);
        assert!((real(i64::from(fix.geoid_height), fxp::Q_GEOID_HEIGHT) - 47.5).abs() < 1e-3);
    }

    #[test]
    fn gsa() {
        let mut p = parsed(b"$GPGSA,A,2,18,16,23,,,,,,,,,,3.05,2.88,1.00*09");
        assert!(p.fields_ready(fields![FixMode, PrnsTracked, Pdop, Hdop, Vdop]));
        assert!(p.ready().is_empty());

        let fix = p.fix();
        assert_eq!(fix.fix_mode, FixMode::Fix2d);
        assert_eq!(&fix.prns_tracked[..], &[18, 16, 23]);
        assert!(fix.is_tracked(16));
        assert!((real(i64::from(fix.pdop), fxp::Q_DOP) - 3.05).abs() < 1e-3);
        assert!((real(i64::from(fix.vdop), fxp::Q_DOP) - 1.0).abs() < 1e-3);
    }

    #[test]
    fn gsa_replaces_tracked_list() {
        let mut p = parsed(b"$GPGSA,A,2,18,16,23,,,,,,,,,,3.05,2.88,1.00*09");
        p.parse_bytes(b"$GPGSA,A,3,01,02,03,04,05,06,07,08,09,10,11,12,1.0,1.0,1.0*30");
        assert!(p.fields_ready(fields![PrnsTracked]));
        assert_eq!(p.fix().prns_tracked.len(), 12);
        assert!(!p.fix().is_tracked(18));
    }

    #[test]
    fn vtg() {
        let mut p = parsed(b"$GPVTG,213.73,T,,M,34.075,N,63.106,K,A*3E");
        assert!(p.fields_ready(fields![TrueTrack, Speed]));
        assert!(p.ready().is_empty());
        assert!((real(i64::from(p.fix().true_track), fxp::Q_TRACK) - 213.73).abs() < 1e-3);
        assert_eq!(p.fix().magnetic_track, 0);
    }

    #[test]
    fn gsv_group() {
        let mut p = parsed(GSV_1);
        assert!(p.ready().is_empty());
        p.parse_bytes(GSV_2);

        assert!(p.fields_ready(fields![
            GsvSentencesTotal,
            GsvSentenceNo,
            SatellitesInView,
            Prn,
            Elevation,
            Azimuth,
            Snr
        ]));
        assert!(p.ready().is_empty());
        assert_eq!(p.fix().gsv_sentences_total, 2);
        assert_eq!(p.fix().satellites_in_view, 8);

        let sat = |prn, elevation, azimuth, snr| Satellite {
            prn,
            elevation,
            azimuth,
            snr,
        };
        assert_eq!(
            p.fix().satellites(),
            &[
                sat(5, 2, 20, 0),
                sat(7, 0, 0, 33),
                sat(16, 76, 272, 33),
                sat(18, 58, 69, 31),
                sat(20, 0, 0, 24),
                sat(23, 28, 121, 20),
                sat(26, 0, 0, 31),
                sat(27, 46, 274, 32),
            ][..]
        );
    }

    #[test]
    fn gsv_checksum_failure_discards_group() {
        let mut corrupt = GSV_1.to_vec();
        // 16,76 -> 16,77
        let pos = corrupt.windows(5).position(|w| w == b"16,76").unwrap();
        corrupt[pos + 4] = b'7';

        let mut p = parsed(&corrupt);
        p.parse_bytes(GSV_2);
        assert!(p.ready().is_empty());

        p.parse_bytes(GSV_1);
        p.parse_bytes(GSV_2);
        assert!(p.fields_ready(fields![Prn, Snr]));
        assert_eq!(p.fix().satellites().len(), 8);
        assert_eq!(p.fix().satellites()[2].elevation, 76);
    }

    #[test]
    fn checksum_mismatch_is_silent() {
        let p = parsed(b"$GPVTG,213.73,T,,M,34.075,N,63.106,K,A*3F");
        assert!(p.ready().is_empty());

        let p = parsed(b"$GPVTG,213.73,T,,M,34.075,N,63.106,K,A*Z3");
        assert!(p.ready().is_empty());
    }

    #[test]
    fn lowercase_checksum() {
        let mut p = parsed(b"$GPVTG,213.73,T,,M,34.075,N,63.106,K,A*3e");
        assert!(p.fields_ready(fields![TrueTrack, Speed]));
    }

    #[test]
    fn truncated_sentence_resynchronizes() {
        let mut p = parsed(b"$GPGGA,175456.00,5104.3");
        p.parse_bytes(GGA);
        assert!(p.fields_ready(fields![Time, Latitude]));
        assert!((real(p.fix().latitude, fxp::Q_LATITUDE) - 51.072405).abs() < 1e-6);
    }

    #[test]
    fn unsupported_sentence_is_ignored() {
        let p = parsed(b"$GPTXT,01,01,02,ANTSTATUS=OK*3B");
        assert!(p.ready().is_empty());
        assert_eq!(p.fix(), &Fix::default());
    }

    #[test]
    fn reset_discards_everything() {
        let mut p = parsed(GSV_1);
        p.parse_bytes(RMC);
        p.reset();
        assert!(p.ready().is_empty());
        assert_eq!(p.fix(), &Fix::default());

        // the GSV group has to start over as well
        p.parse_bytes(GSV_2);
        assert!(p.ready().is_empty());
    }

    #[test]
    fn reader_waits_for_fields() {
        let mut input = GSV_1.to_vec();
        input.extend_from_slice(GSV_2);
        input.extend_from_slice(RMC);

        let mut reader = Reader::new(&input[..]);
        let fix = reader.wait_for(fields![Time, Date]).unwrap().unwrap();
        assert_eq!(fix.time, 1_615_226_096);
        assert_matches!(reader.wait_for(fields![Time, Date]), Ok(None));
    }

    #[test]
    fn reader_exposes_its_parser() {
        let config = Config::new(1900).unwrap();
        let mut reader = Reader::with_parser(RMC, Parser::with_config(config));
        assert_eq!(reader.parser().config(), &config);

        assert_matches!(reader.wait_for(fields![Date]), Ok(Some(_)));
        // only the awaited fields were consumed
        assert!(reader.parser().ready().contains(Field::Time.into()));
        assert!(reader.parser_mut().fields_ready(fields![Time, Latitude]));

        reader.parser_mut().reset();
        assert_eq!(reader.parser().fix(), &Fix::default());
        assert_eq!(reader.parser().config(), &config);
    }

    #[test]
    fn reader_reports_io_errors() {
        struct Broken;

        impl io::Read for Broken {
            fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::Other, "unplugged"))
            }
        }

        let mut reader = Reader::new(Broken);
        assert_matches!(reader.wait_for(fields![Time]), Err(Error::Io(_)));
    }
}
