use std::io;

quick_error! {
    #[derive(Debug)]
    pub enum Error {
        Io(err: io::Error) {
            from()
            display("Encountered I/O error while reading sentences: {}", err)
            source(err)
        }
        InvalidCentury(century: u16) {
            display("Century {} is not a multiple of 100 or out of range", century)
        }
    }
}
