//! Text sink over `std::io`

use std::fmt;
use std::io;

/// Adapts an [`io::Write`] to the [`fmt::Write`] the renderer prints into
///
/// The stream is flushed at every line break so readings show up as soon
/// as they are rendered, even when stdout is a pipe.
pub struct IoSink<W> {
    inner: W,
}

impl<W: io::Write> IoSink<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl IoSink<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: io::Write> fmt::Write for IoSink<W> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.inner.write_all(s.as_bytes()).map_err(|_| fmt::Error)?;
        if s.contains('\n') {
            self.inner.flush().map_err(|_| fmt::Error)?;
        }
        Ok(())
    }
}
