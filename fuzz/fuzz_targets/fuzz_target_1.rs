#![no_main]
#[macro_use] extern crate libfuzzer_sys;
#[macro_use] extern crate lifeboat;

use std::io::Cursor;
use lifeboat::{Parser, Reader};

fuzz_target!(|data: &[u8]| {
    let mut parser = Parser::new();
    parser.parse_bytes(data);
    parser.fields_ready(fields![Time, Date]);
    let _ = parser.fix().utc();

    let mut reader = Reader::new(Cursor::new(data));
    while let Ok(Some(fix)) = reader.wait_for(fields![Latitude, Longitude]) {
        let _ = fix.satellites();
    }
});
