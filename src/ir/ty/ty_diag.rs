//! Type errors

use base::span::Span;
use thiserror::Error;

use crate::{
    ir::{body::Name, field::FieldTable, ty::Type},
    util::diag,
};

/// Fatal inference error
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TypeError {
    /// Incompatible terms met in one class
    #[error("mismatched types `{lhs_text}` and `{rhs_text}`")]
    UnificationConflict {
        lhs: Type,
        rhs: Type,
        /// Rendered with the program's field names
        lhs_text: String,
        rhs_text: String,
        span: Span,
    },
    #[error("field `{field}` is absent")]
    AbsentFieldRead { field: Name, span: Span },
    #[error("absent value is written to field `{field}`")]
    AbsentFieldWrite { field: Name, span: Span },
}

impl TypeError {
    pub fn conflict(lhs: Type, rhs: Type, fields: &FieldTable, span: Span) -> Self {
        let lhs_text = lhs.display(fields).to_string();
        let rhs_text = rhs.display(fields).to_string();

        Self::UnificationConflict {
            lhs,
            rhs,
            lhs_text,
            rhs_text,
            span,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            TypeError::UnificationConflict { span, .. }
            | TypeError::AbsentFieldRead { span, .. }
            | TypeError::AbsentFieldWrite { span, .. } => *span,
        }
    }
}

impl diag::Diagnostic for TypeError {
    fn code(&self) -> &'static str {
        match self {
            TypeError::UnificationConflict { .. } => "E0200",
            TypeError::AbsentFieldRead { .. } => "E0210",
            TypeError::AbsentFieldWrite { .. } => "E0211",
        }
    }

    fn severity(&self) -> diag::Severity {
        diag::Severity::Error
    }

    fn msg(&self) -> String {
        format!("{}", self)
    }

    fn span(&self) -> Span {
        TypeError::span(self)
    }

    fn reason(&self) -> String {
        match self {
            TypeError::UnificationConflict { .. } => "types conflict here".to_string(),
            TypeError::AbsentFieldRead { .. } => "no record literal provides this field".to_string(),
            TypeError::AbsentFieldWrite { .. } => "the right-hand side is absent".to_string(),
        }
    }
}
