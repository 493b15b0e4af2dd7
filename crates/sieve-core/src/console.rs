//! Line-oriented reviewer I/O.

use std::io::{self, BufRead, Write};

/// Where the session prints messages and reads reviewer answers.
pub trait Console {
    /// Print one line of output.
    fn line(&mut self, text: &str) -> io::Result<()>;

    /// Print `prompt` and read one line of input without its line ending.
    /// Returns `Ok(None)` once input is exhausted.
    fn ask(&mut self, prompt: &str) -> io::Result<Option<String>>;
}

/// [`Console`] over any buffered reader and writer (stdin/stdout in the
/// binary, byte buffers in tests).
#[derive(Debug)]
pub struct IoConsole<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> IoConsole<R, W> {
    pub const fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub const fn output(&self) -> &W {
        &self.output
    }
}

impl<R: BufRead, W: Write> Console for IoConsole<R, W> {
    fn line(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.output, "{text}")
    }

    fn ask(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut buf = String::new();
        if self.input.read_line(&mut buf)? == 0 {
            return Ok(None);
        }
        Ok(Some(buf.trim_end_matches(['\n', '\r']).to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ask_strips_line_endings_and_reports_eof() {
        let mut console = IoConsole::new("yes\r\nnote text\n".as_bytes(), Vec::new());
        assert_eq!(console.ask("> ").expect("ask").as_deref(), Some("yes"));
        assert_eq!(console.ask("> ").expect("ask").as_deref(), Some("note text"));
        assert_eq!(console.ask("> ").expect("ask"), None);
        assert_eq!(String::from_utf8_lossy(console.output()), "> > > ");
    }

    #[test]
    fn line_appends_newline() {
        let mut console = IoConsole::new(io::empty(), Vec::new());
        console.line("1/3").expect("line");
        assert_eq!(console.output().as_slice(), b"1/3\n");
    }
}
