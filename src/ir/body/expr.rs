/*!
Lowered expressions (parentheses removed, names not yet resolved)
*/

use la_arena::Idx;

use crate::ir::body::Name;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// Placeholder for syntax that failed to parse
    Missing,
    Num(i64),
    /// `input`
    Input,
    /// `null`
    Null,
    Ident(Name),
    Binary {
        op: BinOp,
        lhs: Idx<Expr>,
        rhs: Idx<Expr>,
    },
    /// `-e`
    Neg(Idx<Expr>),
    /// `alloc e`
    Alloc(Idx<Expr>),
    /// `&x`, where the operand is always an [`Expr::Ident`]
    AddrOf(Idx<Expr>),
    /// `*e`
    Deref(Idx<Expr>),
    Call {
        callee: Idx<Expr>,
        args: Vec<Idx<Expr>>,
    },
    /// `{f: e, ..}`
    Record(Vec<RecordField>),
    /// `e.f`
    Field { base: Idx<Expr>, field: Name },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordField {
    pub name: Name,
    pub expr: Idx<Expr>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinOp {
    /// `==`
    Eq,
    /// `>`
    Gt,
    Add,
    Sub,
    Mul,
    Div,
}

impl BinOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Eq => "==",
            Self::Gt => ">",
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
        }
    }
}
