//! Line-by-line input used to refill a scanner whose in-memory span ran out.

use std::io::{self, BufRead};

/// Source of further input lines for an interactive scan.
///
/// `next_line` blocks until a line is available and returns `Ok(None)` once
/// input is confirmed exhausted.  Returned lines keep their trailing newline
/// so the scanner's line counter stays accurate.
pub trait LineSource {
    fn next_line(&mut self) -> io::Result<Option<String>>;
}

impl<R: BufRead> LineSource for R {
    fn next_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();

        match self.read_line(&mut line)? {
            0 => Ok(None),
            _ => Ok(Some(line)),
        }
    }
}
