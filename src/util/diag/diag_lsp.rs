//! LSP diagnostic type conversion

use base::{
    ln::LineTable,
    span::{LineColumn, Span},
};

use crate::util::diag;

impl diag::Severity {
    pub fn into_lsp_type(self) -> lsp_types::DiagnosticSeverity {
        use lsp_types::DiagnosticSeverity as D;

        match self {
            diag::Severity::Error => D::ERROR,
            diag::Severity::Warning => D::WARNING,
            diag::Severity::Info => D::INFORMATION,
            diag::Severity::Hint => D::HINT,
        }
    }
}

pub fn ln_col_to_lsp_position(ln_col: LineColumn) -> lsp_types::Position {
    lsp_types::Position {
        line: ln_col.line0(),
        character: ln_col.column0(),
    }
}

pub fn span_to_lsp_range(ln_tbl: &LineTable, span: Span) -> lsp_types::Range {
    let (start, end) = ln_tbl.line_column_span(span);

    lsp_types::Range {
        start: self::ln_col_to_lsp_position(start),
        end: self::ln_col_to_lsp_position(end),
    }
}

impl<'a> diag::Render<'a> {
    pub fn to_lsp_diagnostic(&self, ln_tbl: &LineTable) -> lsp_types::Diagnostic {
        let code = lsp_types::NumberOrString::String(self.header.code.to_string());

        lsp_types::Diagnostic {
            range: self::span_to_lsp_range(ln_tbl, self.span),
            severity: Some(self.header.severity.into_lsp_type()),
            code: Some(code),
            code_description: None,
            source: Some("tip".to_string()),
            message: self.header.msg.clone(),
            related_information: None,
            tags: None,
            data: None,
        }
    }
}

#[cfg(test)]
mod test {
    use base::InputFile;

    use crate::syntax::cst::lex::{self, LexError};

    use super::*;
    use crate::util::diag::Diagnostic;

    #[test]
    fn lex_error_to_lsp() {
        let file = InputFile::new("a.tip", "f() {\n  return $;\n}");
        let (_tks, errs) = lex::from_str(file.source_text());
        assert!(matches!(errs[..], [LexError::UnknownChar { .. }]));

        let render = errs[0].render(&file);
        let lsp = render.to_lsp_diagnostic(file.line_column_table());

        assert_eq!(lsp.severity, Some(lsp_types::DiagnosticSeverity::ERROR));
        assert_eq!(
            lsp.code,
            Some(lsp_types::NumberOrString::String("E0000".to_string()))
        );
        assert_eq!(lsp.range.start, lsp_types::Position::new(1, 9));
        assert_eq!(lsp.range.end, lsp_types::Position::new(1, 10));
    }
}
