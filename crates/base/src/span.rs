//! Byte offsets, spans and line/column positions in UTF-8 source text

use std::{fmt, ops};

/// Byte offset into a source text
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Offset(u32);

impl Offset {
    pub fn into_usize(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for Offset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for Offset {
    fn from(x: u32) -> Self {
        Self(x)
    }
}

impl From<usize> for Offset {
    fn from(x: usize) -> Self {
        assert!(x <= u32::MAX as usize, "offset overflow: {}", x);
        Self(x as u32)
    }
}

impl From<Offset> for u32 {
    fn from(x: Offset) -> Self {
        x.0
    }
}

impl From<Offset> for usize {
    fn from(x: Offset) -> Self {
        x.0 as usize
    }
}

impl ops::Add<u32> for Offset {
    type Output = Offset;

    fn add(self, rhs: u32) -> Self::Output {
        Offset(self.0 + rhs)
    }
}

impl ops::AddAssign<u32> for Offset {
    fn add_assign(&mut self, rhs: u32) {
        self.0 += rhs;
    }
}

/// Distance in bytes
impl ops::Sub<Offset> for Offset {
    type Output = u32;

    fn sub(self, rhs: Offset) -> Self::Output {
        self.0 - rhs.0
    }
}

/// Half-open byte range `[start, end)`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Span {
    pub start: Offset,
    pub end: Offset,
}

impl Span {
    pub fn new(start: impl Into<Offset>, end: impl Into<Offset>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }

    /// Empty span at the position
    pub fn at(pos: impl Into<Offset>) -> Self {
        let pos = pos.into();
        Self {
            start: pos,
            end: pos,
        }
    }

    pub fn len(&self) -> u32 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Smallest span that contains both
    pub fn cover(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    pub fn slice<'a>(&self, s: &'a str) -> &'a str {
        &s[self.start.into_usize()..self.end.into_usize()]
    }
}

/// Makes the span relative to the given base offset
impl ops::Sub<Offset> for Span {
    type Output = Span;

    fn sub(self, base: Offset) -> Self::Output {
        Span {
            start: Offset(self.start - base),
            end: Offset(self.end - base),
        }
    }
}

/// Zero-based line and column (column counted in characters)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LineColumn {
    line0: u32,
    column0: u32,
}

impl LineColumn {
    pub fn new0(line0: u32, column0: u32) -> Self {
        Self { line0, column0 }
    }

    pub fn line0(&self) -> u32 {
        self.line0
    }

    pub fn line0_usize(&self) -> usize {
        self.line0 as usize
    }

    pub fn column0(&self) -> u32 {
        self.column0
    }

    pub fn line1(&self) -> u32 {
        self.line0 + 1
    }

    pub fn column1(&self) -> u32 {
        self.column0 + 1
    }
}
