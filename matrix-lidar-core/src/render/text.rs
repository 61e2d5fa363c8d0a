//! Grid and fixed-point text formats

use core::fmt::{self, Write};

/// Line written after every frame
pub const SEPARATOR: &str = "-------------------";

/// Write samples as rows of `width` space-terminated values
///
/// A line break follows every `width`-th sample and the separator line
/// follows the last one. When the sample count is not a multiple of
/// `width` the final partial row runs straight into the separator. A
/// `width` of zero writes every sample on one line.
pub fn render_grid<W, I>(out: &mut W, samples: I, width: usize) -> fmt::Result
where
    W: Write,
    I: IntoIterator<Item = u16>,
{
    for (index, sample) in samples.into_iter().enumerate() {
        write!(out, "{} ", sample)?;
        if width != 0 && (index + 1) % width == 0 {
            out.write_char('\n')?;
        }
    }
    writeln!(out, "{}", SEPARATOR)
}

/// Write a single fixed-point reading
pub fn render_point<W: Write>(out: &mut W, value: u16) -> fmt::Result {
    writeln!(out, "data: {}", value)
}
