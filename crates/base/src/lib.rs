//! Source handling
//!
//! Source files, byte spans and line/column tables shared by every compiler pass.

pub mod ln;
pub mod span;

/// Named source text along with its line table
#[derive(Debug)]
pub struct InputFile {
    name: String,
    source_text: String,
    line_table: ln::LineTable,
}

impl InputFile {
    pub fn new(name: impl Into<String>, source_text: impl Into<String>) -> Self {
        let source_text = source_text.into();
        let line_table = ln::LineTable::new(&source_text);

        Self {
            name: name.into(),
            source_text,
            line_table,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source_text(&self) -> &str {
        &self.source_text
    }

    pub fn line_column_table(&self) -> &ln::LineTable {
        &self.line_table
    }

    /// Converts a given offset into line/column information.
    pub fn line_column_at(&self, offset: span::Offset) -> span::LineColumn {
        self.line_table.line_column(offset)
    }
}

impl span::Span {
    pub fn from_rowan_range(range: rowan::TextRange) -> Self {
        let (start, end): (u32, u32) = (range.start().into(), range.end().into());
        Self::new(start, end)
    }

    pub fn into_rowan_range(self) -> rowan::TextRange {
        let (start, end): (u32, u32) = (self.start.into(), self.end.into());
        rowan::TextRange::new(start.into(), end.into())
    }
}
