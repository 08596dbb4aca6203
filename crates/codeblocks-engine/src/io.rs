use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};

/// Source identifier that reads from standard input instead of a file.
pub const STDIN_SOURCE: &str = "-";

/// Open a source for line-oriented reading.
pub fn open_source(source: &str) -> io::Result<Box<dyn BufRead>> {
    if source == STDIN_SOURCE {
        Ok(Box::new(BufReader::new(io::stdin())))
    } else {
        Ok(Box::new(BufReader::new(File::open(source)?)))
    }
}

/// Read a source fully into memory.
pub fn read_source(source: &str) -> io::Result<String> {
    if source == STDIN_SOURCE {
        let mut content = String::new();
        io::stdin().read_to_string(&mut content)?;
        Ok(content)
    } else {
        std::fs::read_to_string(source)
    }
}
