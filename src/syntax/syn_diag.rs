//! Syntax diagnostics

use base::span::Span;

use crate::{
    syntax::cst::{lex::LexError, ParseError},
    util::diag,
};

impl diag::Diagnostic for LexError {
    fn code(&self) -> &'static str {
        match self {
            Self::UnknownChar { .. } => "E0000",
            Self::UnterminatedComment { .. } => "E0001",
        }
    }

    fn severity(&self) -> diag::Severity {
        diag::Severity::Error
    }

    fn msg(&self) -> String {
        format!("{}", self)
    }

    fn span(&self) -> Span {
        LexError::span(self)
    }
}

impl diag::Diagnostic for ParseError {
    fn code(&self) -> &'static str {
        match self {
            ParseError::UnexpectedToken { .. } => "E0010",
            ParseError::UnexpectedEof { .. } => "E0011",
            ParseError::MisplacedReturn { .. } => "E0012",
        }
    }

    fn severity(&self) -> diag::Severity {
        diag::Severity::Error
    }

    fn msg(&self) -> String {
        format!("{}", self)
    }

    fn span(&self) -> Span {
        ParseError::span(self)
    }

    fn reason(&self) -> String {
        match self {
            ParseError::UnexpectedToken { expected, .. }
            | ParseError::UnexpectedEof { expected, .. } => format!("expected {}", expected),
            ParseError::MisplacedReturn { .. } => "not at the end of the body".to_string(),
        }
    }
}
