//! The line-oriented text protocol spoken to munin-node on stdout.
use std::{fmt, io};

/// Which pass a plugin invocation should run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Describe the graph and its fields.
    Config,
    /// Report the current value of each field.
    Values,
}

impl Mode {
    /// Select the mode from the first command line argument.
    ///
    /// Only the literal `config` selects [`Mode::Config`]; anything else, including no
    /// argument at all, selects [`Mode::Values`].
    pub fn from_arg(arg: Option<&str>) -> Self {
        match arg {
            Some("config") => Self::Config,
            _ => Self::Values,
        }
    }
}

/// Writes `<key> <value>` lines.
///
/// Each line is written as soon as [`Emitter::line`] is called. A newline inside a value
/// would start a new protocol line, so line breaks in values are replaced by spaces.
#[derive(Debug)]
pub struct Emitter<W> {
    writer: W,
    lines: usize,
}

impl<W: io::Write> Emitter<W> {
    /// Create an emitter writing to `writer`.
    pub fn new(writer: W) -> Self {
        Self { writer, lines: 0 }
    }

    /// Write a single `<key> <value>` line.
    pub fn line(&mut self, key: impl fmt::Display, value: impl fmt::Display) -> io::Result<()> {
        let mut value = value.to_string();
        if value.contains(is_line_break) {
            value = value.replace(is_line_break, " ");
        }
        writeln!(self.writer, "{key} {value}")?;
        self.lines += 1;
        Ok(())
    }

    /// The number of lines written so far.
    pub fn lines(&self) -> usize {
        self.lines
    }

    /// Flush the underlying writer and return it.
    pub fn finish(mut self) -> io::Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}

fn is_line_break(c: char) -> bool {
    c == '\n' || c == '\r'
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn mode_from_arg() {
        assert_eq!(Mode::from_arg(Some("config")), Mode::Config);
        assert_eq!(Mode::from_arg(None), Mode::Values);
        assert_eq!(Mode::from_arg(Some("")), Mode::Values);
        assert_eq!(Mode::from_arg(Some("autoconf")), Mode::Values);
        assert_eq!(Mode::from_arg(Some("CONFIG")), Mode::Values);
    }

    #[test]
    fn lines_are_key_space_value() {
        let mut emitter = Emitter::new(Vec::new());
        emitter.line("graph_title", "Load average").unwrap();
        emitter.line(format_args!("{}.value", "load"), 0.42).unwrap();
        assert_eq!(emitter.lines(), 2);
        let out = emitter.finish().unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "graph_title Load average\nload.value 0.42\n"
        );
    }

    #[test]
    fn line_breaks_in_values_are_flattened() {
        let mut emitter = Emitter::new(Vec::new());
        emitter.line("graph_info", "first\nsecond\r\nthird").unwrap();
        let out = emitter.finish().unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "graph_info first second  third\n"
        );
    }
}
