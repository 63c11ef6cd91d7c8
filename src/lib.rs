//! Allocation-free parser for *NMEA 0183* GPS sentences.
//!
//! Input is consumed one byte at a time by a [`Parser`], which decodes the
//! `GPGGA`, `GPGLL`, `GPGSA`, `GPGSV`, `GPRMC` and `GPVTG` sentences into a
//! fixed-point [`Fix`]. No floating point and no heap allocation is involved.
//!
//! [`Parser`]: parser/struct.Parser.html
//! [`Fix`]: fix/struct.Fix.html

#[cfg(test)]
#[macro_use]
extern crate assert_matches;
extern crate arrayvec;
#[macro_use]
extern crate bitflags;
extern crate chrono;
#[macro_use]
extern crate log;
#[macro_use]
extern crate quick_error;

#[macro_use]
mod macros;
pub mod config;
mod decode;
pub mod err;
pub mod field;
pub mod fix;
pub mod fxp;
mod gsv;
pub mod parser;
pub mod sentence;

pub use config::Config;
pub use err::Error;
pub use field::{Field, Fields};
pub use fix::{Fix, FixMode, FixQuality, Satellite, Status, MAX_PRNS_TRACKED, MAX_SATS};
pub use gsv::MAX_GSV_SENTENCES;
pub use parser::{Parser, Reader};
pub use sentence::Sentence;
