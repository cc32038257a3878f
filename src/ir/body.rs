//! Lowered program: arenas of declarations, expressions and statements
//!
//! Every node is referred to by an [`Idx`] into the arenas of [`ProgramData`]. Spans are kept in a
//! separate [`ProgramSpans`] side table, since only diagnostics and printing need them.

pub mod decl;
pub mod expr;
pub mod stmt;

use std::{borrow::Borrow, fmt};

use base::span::Span;
use la_arena::{Arena, ArenaMap, Idx};

use self::{
    decl::{Decl, Fun},
    expr::Expr,
    stmt::Stmt,
};

/// Identifier or field name
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Name(String);

impl Name {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Name {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The whole program
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgramData {
    /// Functions in source order
    pub funs: Arena<Fun>,
    /// Functions, parameters and locals, in source order
    pub decls: Arena<Decl>,
    pub exprs: Arena<Expr>,
    pub stmts: Arena<Stmt>,
}

impl ProgramData {
    pub fn fun_decls(&self) -> impl Iterator<Item = Idx<Decl>> + '_ {
        self.funs.iter().map(|(_, fun)| fun.decl)
    }
}

/// Side table that contains the spans for everything in the program.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgramSpans {
    pub(crate) decls: ArenaMap<Idx<Decl>, Span>,
    pub(crate) exprs: ArenaMap<Idx<Expr>, Span>,
    pub(crate) stmts: ArenaMap<Idx<Stmt>, Span>,
}

impl ProgramSpans {
    pub fn decl(&self, decl: Idx<Decl>) -> Span {
        self.decls.get(decl).copied().unwrap_or_default()
    }

    pub fn expr(&self, expr: Idx<Expr>) -> Span {
        self.exprs.get(expr).copied().unwrap_or_default()
    }

    pub fn stmt(&self, stmt: Idx<Stmt>) -> Span {
        self.stmts.get(stmt).copied().unwrap_or_default()
    }
}
