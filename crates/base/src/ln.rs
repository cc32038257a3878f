//! Line, column and byte offset conversion

use crate::span::{LineColumn, Offset, Span};

#[derive(Debug, PartialEq, Eq, Hash)]
pub struct LineTable {
    /// Always has at least one element for the first line
    lines: Vec<LineInfo>,
    end_offset: Offset,
}

#[derive(Debug, PartialEq, Eq, Hash)]
struct LineInfo {
    /// Offset of line start
    start: Offset,
    /// Spans of chars with utf8 length > 1
    wide_chars: Vec<Span>,
}

impl LineTable {
    pub fn new(source_text: &str) -> Self {
        let mut lines = vec![LineInfo {
            start: Offset::from(0u32),
            wide_chars: Vec::new(),
        }];

        for (i, c) in source_text.char_indices() {
            if c == '\n' {
                lines.push(LineInfo {
                    start: Offset::from(i + 1),
                    wide_chars: Vec::new(),
                })
            } else if c.len_utf8() > 1 {
                if let Some(line) = lines.last_mut() {
                    line.wide_chars
                        .push(Span::new(Offset::from(i), Offset::from(i + c.len_utf8())));
                }
            }
        }

        LineTable {
            lines,
            end_offset: Offset::from(source_text.len()),
        }
    }

    pub fn num_lines(&self) -> usize {
        self.lines.len()
    }

    pub fn offset(&self, position: LineColumn) -> Offset {
        if position.line0_usize() >= self.num_lines() {
            return self.end_offset;
        }
        let line = &self.lines[position.line0_usize()];
        let mut offset = u32::from(line.start + position.column0());
        for wc in line.wide_chars.iter() {
            if u32::from(wc.start) < offset {
                offset += wc.len() - 1;
            }
        }
        Offset::from(offset).min(self.end_offset)
    }

    pub fn line_column(&self, position: Offset) -> LineColumn {
        match self.lines.binary_search_by_key(&position, |l| l.start) {
            Ok(line0) => LineColumn::new0(line0 as u32, 0),
            Err(next_line0) => {
                let line0 = next_line0 - 1;
                let line = &self.lines[line0];
                // byte offset from the line start; wide characters count as one column
                let mut column0 = position - line.start;
                for wc in line.wide_chars.iter() {
                    if wc.start >= position {
                        break;
                    }
                    column0 -= wc.len() - 1;
                }
                LineColumn::new0(line0 as u32, column0)
            }
        }
    }

    pub fn line_column_span(&self, span: Span) -> (LineColumn, LineColumn) {
        (self.line_column(span.start), self.line_column(span.end))
    }

    /// Span of the whole line containing the position, including the trailing newline
    pub fn line_span(&self, position: Offset) -> Span {
        let (i, start) = match self.lines.binary_search_by_key(&position, |l| l.start) {
            Ok(line0) => (line0, self.lines[line0].start),
            Err(next_line0) => (next_line0 - 1, self.lines[next_line0 - 1].start),
        };

        let end = match self.lines.get(i + 1) {
            Some(line) => line.start,
            None => self.end_offset,
        };

        Span { start, end }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn line_column_of_offsets() {
        let tbl = LineTable::new("main() {\n  return 0;\n}\n");

        assert_eq!(tbl.num_lines(), 4);
        assert_eq!(tbl.line_column(Offset::from(0u32)), LineColumn::new0(0, 0));
        assert_eq!(tbl.line_column(Offset::from(11u32)), LineColumn::new0(1, 2));
        assert_eq!(tbl.offset(LineColumn::new0(1, 2)), Offset::from(11u32));
    }

    #[test]
    fn wide_chars_count_as_one_column() {
        // `é` is two bytes
        let tbl = LineTable::new("é = 1;");
        assert_eq!(tbl.line_column(Offset::from(3u32)), LineColumn::new0(0, 2));
    }

    #[test]
    fn line_span_covers_newline() {
        let src = "a\nbc\n";
        let tbl = LineTable::new(src);
        let span = tbl.line_span(Offset::from(3u32));
        assert_eq!(span.slice(src), "bc\n");
    }
}
