//! Colored terminal output for sync progress
//!
//! Progress goes to stdout, errors to stderr, all with a one-glyph prefix.

use std::io::Write;
use termcolor::{Buffer, BufferWriter, Color, ColorChoice, ColorSpec, WriteColor};

/// Leading whitespace for sub-items
const INDENT: &str = "    ";

/// Write `glyph message` with the glyph in `spec` and the text in `text_color`
fn write_prefixed(
    buffer: &mut Buffer,
    indent: &str,
    glyph: &str,
    spec: &ColorSpec,
    text_color: Option<Color>,
    message: &str,
) -> std::io::Result<()> {
    write!(buffer, "{indent}")?;
    buffer.set_color(spec)?;
    write!(buffer, "{glyph}")?;
    buffer.reset()?;
    buffer.set_color(ColorSpec::new().set_fg(text_color))?;
    writeln!(buffer, " {message}")?;
    buffer.reset()
}

fn success_spec() -> ColorSpec {
    let mut spec = ColorSpec::new();
    spec.set_fg(Some(Color::Green)).set_bold(true);
    spec
}

/// Output manager for consistent colored terminal output
#[derive(Debug)]
pub struct OutputManager {
    bufwtr: BufferWriter,
    quiet: bool,
}

impl Clone for OutputManager {
    fn clone(&self) -> Self {
        Self::new(self.quiet)
    }
}

impl OutputManager {
    /// Create a new output manager
    pub fn new(quiet: bool) -> Self {
        Self {
            bufwtr: BufferWriter::stdout(ColorChoice::Auto),
            quiet,
        }
    }

    fn prefixed(
        &self,
        indent: &str,
        glyph: &str,
        spec: &ColorSpec,
        text_color: Option<Color>,
        message: &str,
    ) -> std::io::Result<()> {
        if self.quiet {
            return Ok(());
        }

        let mut buffer = self.bufwtr.buffer();
        write_prefixed(&mut buffer, indent, glyph, spec, text_color, message)?;
        self.bufwtr.print(&buffer)
    }

    /// Print an info message (normal output)
    pub fn info(&self, message: &str) -> std::io::Result<()> {
        self.prefixed("", "ℹ", ColorSpec::new().set_fg(Some(Color::Cyan)), None, message)
    }

    /// Print a success message
    pub fn success(&self, message: &str) -> std::io::Result<()> {
        self.prefixed("", "✓", &success_spec(), None, message)
    }

    /// Print an indented success message (for completed sub-items)
    pub fn success_indent(&self, message: &str) -> std::io::Result<()> {
        self.prefixed(INDENT, "✓", &success_spec(), None, message)
    }

    /// Print a warning message
    pub fn warn(&self, message: &str) -> std::io::Result<()> {
        self.prefixed(
            "",
            "⚠",
            ColorSpec::new().set_fg(Some(Color::Yellow)).set_bold(true),
            Some(Color::Yellow),
            message,
        )
    }

    /// Print an error message (always shown, even in quiet mode)
    pub fn error(&self, message: &str) {
        let bufwtr = BufferWriter::stderr(ColorChoice::Auto);
        let mut buffer = bufwtr.buffer();

        let written = write_prefixed(
            &mut buffer,
            "",
            "✗",
            ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true),
            Some(Color::Red),
            message,
        )
        .and_then(|()| bufwtr.print(&buffer));

        if written.is_err() {
            eprintln!("✗ {message}");
        }
    }

    /// Print indented text (for sub-items)
    pub fn indent(&self, message: &str) -> std::io::Result<()> {
        self.println(&format!("{INDENT}{message}"))
    }

    /// Print a plain message (respects quiet mode)
    pub fn println(&self, message: &str) -> std::io::Result<()> {
        if self.quiet {
            return Ok(());
        }

        let mut buffer = self.bufwtr.buffer();
        writeln!(&mut buffer, "{message}")?;
        self.bufwtr.print(&buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(indent: &str, glyph: &str, message: &str) -> String {
        let mut buffer = Buffer::no_color();
        write_prefixed(&mut buffer, indent, glyph, &success_spec(), None, message).unwrap();
        String::from_utf8(buffer.into_inner()).unwrap()
    }

    #[test]
    fn test_prefixed_line_layout() {
        assert_eq!(render("", "✓", "Created release v1.2.0"), "✓ Created release v1.2.0\n");
    }

    #[test]
    fn test_indented_success_puts_glyph_after_indent() {
        assert_eq!(
            render(INDENT, "✓", "Successfully deleted old app.tar.gz artifact"),
            "    ✓ Successfully deleted old app.tar.gz artifact\n"
        );
    }
}
