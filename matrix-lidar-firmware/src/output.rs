//! Text output over defmt
//!
//! Rendered frames are plain text; this sink collects characters into
//! lines and prints each completed line.

use core::fmt;

use heapless::String;

/// Longest line held before it is printed anyway
const LINE_CAPACITY: usize = 96;

/// `fmt::Write` sink that prints one defmt message per line
pub struct DefmtSink {
    line: String<LINE_CAPACITY>,
}

impl DefmtSink {
    pub const fn new() -> Self {
        Self {
            line: String::new(),
        }
    }

    fn flush_line(&mut self) {
        defmt::println!("{=str}", self.line.as_str());
        self.line.clear();
    }
}

impl fmt::Write for DefmtSink {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for c in s.chars() {
            if c == '\n' {
                self.flush_line();
            } else if self.line.push(c).is_err() {
                self.flush_line();
                // Fresh line always has room for one char
                let _ = self.line.push(c);
            }
        }
        Ok(())
    }
}
