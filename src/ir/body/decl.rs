//! Declarations: functions, parameters and locals

use la_arena::Idx;

use crate::ir::body::{expr::Expr, stmt::Stmt, Name};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclKind {
    Fun,
    Param,
    /// `var x;`
    Local,
}

/// Named entity an identifier can refer to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decl {
    pub name: Name,
    pub kind: DeclKind,
}

/// Function definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fun {
    pub decl: Idx<Decl>,
    pub params: Vec<Idx<Decl>>,
    pub locals: Vec<Idx<Decl>>,
    pub body: Vec<Idx<Stmt>>,
    /// The returned expression
    pub ret: Idx<Expr>,
}
