//! Diagnostic rendering

#[cfg(feature = "lsp-types")]
pub mod diag_lsp;

use std::fmt;

use base::{
    span::{LineColumn, Span},
    InputFile,
};
use colored::Colorize;

pub const QUOTE: colored::Color = colored::Color::BrightBlue;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Warning,
    Info,
    Hint,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
            Severity::Hint => "hint",
        }
    }

    pub fn color(&self) -> colored::Color {
        match self {
            Self::Error => colored::Color::Red,
            Self::Warning => colored::Color::Green,
            Self::Info => colored::Color::Blue,
            Self::Hint => colored::Color::Yellow,
        }
    }
}

pub trait Diagnostic {
    // <severity>[<code>]: msg
    fn code(&self) -> &'static str;
    fn severity(&self) -> Severity;
    fn msg(&self) -> String;
    fn span(&self) -> Span;

    //    ^^^^ <reason>
    fn reason(&self) -> String {
        self.msg()
    }

    fn render<'a>(&self, input_file: &'a InputFile) -> Render<'a>
    where
        Self: Sized,
    {
        self::line(input_file, self)
    }
}

/// ```text
/// <severity>[code]: <msg>
/// --> <src_file>:<ln>:<col>
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header<'a> {
    pub code: &'static str,
    pub severity: Severity,
    pub msg: String,
    pub src_file: &'a str,
    pub ln_col: LineColumn,
}

impl<'a> fmt::Display for Header<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let severity_code = format!("{}[{}]", self.severity.as_str(), self.code);

        writeln!(
            f,
            "{}: {}\n--> {}:{}:{}",
            severity_code.color(self.severity.color()).bold(),
            self.msg.bold(),
            self.src_file,
            self.ln_col.line1(),
            self.ln_col.column1(),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MsgSpan {
    /// Span within the line string
    pub line_span: Span,
    /// Message for the spanned text
    pub msg: String,
}

/// ```text
///      |
/// <ln> | <line_text>
///      |    ^^^^ <msg>
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LineSpanMain<'a> {
    pub severity: Severity,
    /// Line number for display
    pub line1: u32,
    pub line_text: &'a str,
    pub main: MsgSpan,
}

impl<'a> fmt::Display for LineSpanMain<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n_digits = self::n_digits(self.line1 as usize);
        let indent = " ".repeat(n_digits);

        let vbar = "|".color(QUOTE).bold();
        let line = format!("{}", self.line1);

        writeln!(f, "{indent} {vbar}")?;
        writeln!(f, "{} {vbar} {}", line.color(QUOTE).bold(), self.line_text)?;
        writeln!(
            f,
            "{indent} {vbar} {} {}",
            self::reason_range_string(self.main.line_span)
                .color(self.severity.color())
                .bold(),
            self.main.msg.color(self.severity.color()).bold(),
        )?;

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Render<'a> {
    pub header: Header<'a>,
    pub window: LineSpanMain<'a>,
    /// Absolute span of the primary message
    pub span: Span,
}

impl<'a> fmt::Display for Render<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // NOTE: each format contains the last newline character, so don't use `writeln!`
        write!(f, "{}", self.header)?;
        write!(f, "{}", self.window)?;
        Ok(())
    }
}

/// Line diagnostic window
pub fn line<'a>(input_file: &'a InputFile, diag: &impl Diagnostic) -> Render<'a> {
    let src_text = input_file.source_text();
    let span = diag.span();

    let ln_tbl = input_file.line_column_table();
    let ln_col = ln_tbl.line_column(span.start);

    let header = Header {
        code: diag.code(),
        severity: diag.severity(),
        msg: diag.msg(),
        src_file: input_file.name(),
        ln_col,
    };

    let line_text_span = ln_tbl.line_span(span.start);
    let line_text = line_text_span.slice(src_text).trim_end();

    // multi-line spans are cut at the end of the first line
    let mut line_span = span - line_text_span.start;
    let line_len = line_text.len() as u32;
    if u32::from(line_span.end) > line_len {
        line_span.end = line_len.max(u32::from(line_span.start)).into();
    }

    let window = LineSpanMain {
        severity: diag.severity(),
        line1: ln_col.line1(),
        line_text,
        main: MsgSpan {
            line_span,
            msg: diag.reason(),
        },
    };

    Render {
        header,
        window,
        span,
    }
}

fn reason_range_string(line_span: Span) -> String {
    let mut s = String::new();

    s.push_str(&" ".repeat(line_span.start.into_usize()));
    // at least one caret for empty spans (e.g. end of file)
    s.push_str(&"^".repeat((line_span.len() as usize).max(1)));

    s
}

fn n_digits(mut x: usize) -> usize {
    let mut n_digits = 0;

    loop {
        x /= 10;
        n_digits += 1;

        if x == 0 {
            break;
        }
    }

    n_digits
}

#[cfg(test)]
mod test {
    use super::*;

    struct Dummy(Span);

    impl Diagnostic for Dummy {
        fn code(&self) -> &'static str {
            "E9999"
        }

        fn severity(&self) -> Severity {
            Severity::Error
        }

        fn msg(&self) -> String {
            "dummy".to_string()
        }

        fn span(&self) -> Span {
            self.0
        }

        fn reason(&self) -> String {
            "here".to_string()
        }
    }

    #[test]
    fn render_points_at_line() {
        colored::control::set_override(false);

        let file = InputFile::new("a.tip", "main() {\n  return x;\n}\n");
        let render = Dummy(Span::new(18u32, 19u32)).render(&file);

        assert_eq!(render.header.ln_col, LineColumn::new0(1, 9));
        assert_eq!(
            format!("{}", render),
            "error[E9999]: dummy\n--> a.tip:2:10\n  |\n2 |   return x;\n  |          ^ here\n"
        );
    }

    #[test]
    fn digits() {
        assert_eq!(n_digits(0), 1);
        assert_eq!(n_digits(9), 1);
        assert_eq!(n_digits(10), 2);
        assert_eq!(n_digits(123), 3);
    }
}
