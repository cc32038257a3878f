//! IR diagnostics: lowering and name resolution

use base::span::Span;

use crate::{
    ir::{lower::LowerError, resolve::ResolveError},
    util::diag,
};

impl diag::Diagnostic for LowerError {
    fn code(&self) -> &'static str {
        match self {
            LowerError::InvalidAssignTarget { .. } => "E0100",
            LowerError::AddressOfNonVariable { .. } => "E0101",
            LowerError::IntOverflow { .. } => "E0102",
            LowerError::DuplicateField { .. } => "E0103",
        }
    }

    fn severity(&self) -> diag::Severity {
        diag::Severity::Error
    }

    fn msg(&self) -> String {
        format!("{}", self)
    }

    fn span(&self) -> Span {
        LowerError::span(self)
    }

    fn reason(&self) -> String {
        match self {
            LowerError::InvalidAssignTarget { .. } => {
                "expected `x`, `*e`, `x.f` or `(*e).f`".to_string()
            }
            LowerError::AddressOfNonVariable { .. } => "not a variable".to_string(),
            LowerError::IntOverflow { .. } => "does not fit in 64 bits".to_string(),
            LowerError::DuplicateField { .. } => "specified again here".to_string(),
        }
    }
}

impl diag::Diagnostic for ResolveError {
    fn code(&self) -> &'static str {
        match self {
            ResolveError::Undeclared { .. } => "E0110",
            ResolveError::Duplicate { .. } => "E0111",
        }
    }

    fn severity(&self) -> diag::Severity {
        diag::Severity::Error
    }

    fn msg(&self) -> String {
        format!("{}", self)
    }

    fn span(&self) -> Span {
        ResolveError::span(self)
    }

    fn reason(&self) -> String {
        match self {
            ResolveError::Undeclared { .. } => "not found".to_string(),
            ResolveError::Duplicate { .. } => "redeclared here".to_string(),
        }
    }
}
