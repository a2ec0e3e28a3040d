use crossterm::style::{StyledContent, Stylize};
use std::fmt::Display;
use std::io::{self, IsTerminal, Write};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines, Stdin};

/// Line-oriented terminal: prompts read one line, everything else is written out.
pub struct Console<R, W> {
    input: Lines<R>,
    out: W,
    color: bool,
}

impl Console<BufReader<Stdin>, io::Stdout> {
    pub fn stdio() -> Self {
        let out = io::stdout();
        let color = out.is_terminal();
        Console::new(BufReader::new(tokio::io::stdin()), out, color)
    }
}

impl<R: AsyncBufRead + Unpin, W: Write> Console<R, W> {
    pub fn new(reader: R, out: W, color: bool) -> Self {
        Console {
            input: reader.lines(),
            out,
            color,
        }
    }

    pub fn say(&mut self, msg: impl Display) -> io::Result<()> {
        writeln!(self.out, "{msg}")
    }

    pub fn step(&mut self, n: u8, title: &str) -> io::Result<()> {
        let line = format!("Step {n}: {title}");
        let styled = self.paint(line, |s| s.bold().cyan());
        writeln!(self.out, "\n{styled}")
    }

    pub fn success(&mut self, msg: impl Display) -> io::Result<()> {
        let styled = self.paint(msg.to_string(), |s| s.green());
        writeln!(self.out, "{styled}")
    }

    pub fn warn(&mut self, msg: impl Display) -> io::Result<()> {
        let styled = self.paint(msg.to_string(), |s| s.yellow());
        writeln!(self.out, "{styled}")
    }

    /// Echo a command the way a shell would show it, then flush so it lands
    /// before the child's own output.
    pub fn command(&mut self, line: &str) -> io::Result<()> {
        let styled = self.paint(format!("$ {line}"), |s| s.bold());
        writeln!(self.out, "\n{styled}")?;
        self.out.flush()
    }

    /// Show `label`, read one line and trim it. `None` at end of input.
    pub async fn prompt(&mut self, label: &str) -> io::Result<Option<String>> {
        write!(self.out, "{label}")?;
        self.out.flush()?;
        let line = self.input.next_line().await?;
        Ok(line.map(|l| l.trim().to_string()))
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.out
    }

    fn paint(
        &self,
        text: String,
        style: impl FnOnce(StyledContent<String>) -> StyledContent<String>,
    ) -> String {
        if self.color {
            style(text.stylize()).to_string()
        } else {
            text
        }
    }
}

#[cfg(test)]
pub type TestConsole<'a> = Console<&'a [u8], Vec<u8>>;

#[cfg(test)]
pub fn test_console(input: &str) -> TestConsole<'_> {
    Console::new(input.as_bytes(), Vec::new(), false)
}

#[cfg(test)]
pub fn output_of(console: TestConsole<'_>) -> String {
    String::from_utf8(console.into_output()).unwrap()
}
