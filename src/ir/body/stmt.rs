//! Lowered statements
//!
//! Assignments are split by their target so that later passes never look into the left-hand side
//! shape again.

use la_arena::Idx;

use crate::ir::body::{expr::Expr, Name};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stmt {
    /// `x = e`. The target is an [`Expr::Ident`].
    Assign { target: Idx<Expr>, rhs: Idx<Expr> },
    /// `*p = e`
    DerefWrite { ptr: Idx<Expr>, rhs: Idx<Expr> },
    /// `x.f = e`. The target is an [`Expr::Ident`].
    FieldWrite {
        target: Idx<Expr>,
        field: Name,
        rhs: Idx<Expr>,
    },
    /// `(*p).f = e`
    IndirectFieldWrite {
        ptr: Idx<Expr>,
        field: Name,
        rhs: Idx<Expr>,
    },
    Output(Idx<Expr>),
    If {
        cond: Idx<Expr>,
        then: Idx<Stmt>,
        else_: Option<Idx<Stmt>>,
    },
    While { cond: Idx<Expr>, body: Idx<Stmt> },
    Block(Vec<Idx<Stmt>>),
}
