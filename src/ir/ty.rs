//! Types of declarations and expressions
//!
//! Inference runs in three passes over the lowered program:
//!
//! 1. [`infer`] emits one unification per construct into the [`Unifier`]
//! 2. [`validate`] checks that no absent record field is read or written
//! 3. [`close`] turns the solved classes into finite [`Type`] values
//!
//! [`Unifier`]: crate::ir::ty::unify::Unifier

pub mod close;
pub mod infer;
pub mod term;
pub mod ty_debug;
pub mod ty_diag;
pub mod unify;
pub mod validate;

use std::ops;

use derivative::Derivative;
use la_arena::{ArenaMap, Idx};

use crate::ir::{
    body::{decl::Decl, expr::Expr, ProgramData, ProgramSpans},
    field::FieldTable,
    resolve::Resolution,
};

use self::{
    term::{Node, TermId},
    ty_diag::TypeError,
    unify::Unifier,
};

/// Read-only context shared by the inference passes
#[derive(Derivative, Clone, Copy)]
#[derivative(Debug)]
pub struct InferCtx<'a> {
    #[derivative(Debug = "ignore")]
    pub program: &'a ProgramData,
    #[derivative(Debug = "ignore")]
    pub spans: &'a ProgramSpans,
    #[derivative(Debug = "ignore")]
    pub resolution: &'a Resolution,
    pub fields: &'a FieldTable,
}

impl<'a> InferCtx<'a> {
    /// Node that owns the type variable of the expression. Identifiers share the variable of their
    /// declaration.
    pub fn expr_node(&self, expr: Idx<Expr>) -> Node {
        match &self.program.exprs[expr] {
            Expr::Ident(_) => match self.resolution.get(expr) {
                Some(decl) => Node::Decl(decl),
                None => Node::Expr(expr),
            },
            _ => Node::Expr(expr),
        }
    }
}

/// Generates and solves the constraints, checks field presence and closes every type
pub fn infer_types(cx: &InferCtx) -> Result<TypeTable, TypeError> {
    let mut unifier = Unifier::new();
    infer::generate(cx, &mut unifier)?;
    log::debug!("solved with {} terms", unifier.len());

    let sol = unifier.solution();
    validate::validate(cx, sol)?;

    Ok(close::close_all(cx, sol))
}

/// Closed type, free of unresolved structure
///
/// Variables only appear as free (unconstrained) type variables or as references to an enclosing
/// [`Type::Recursive`] binder.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    Int,
    Pointer(Box<Type>),
    Function {
        params: Vec<Type>,
        ret: Box<Type>,
    },
    /// One slot per program-wide field name, in sorted order
    Record(Vec<Type>),
    /// Field not provided by a record literal
    Absent,
    /// Type variable, named by its class
    Var(TermId),
    /// `μt.body`
    Recursive {
        binder: TermId,
        body: Box<Type>,
    },
}

/// Declaration / expression → closed type
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeTable {
    pub(crate) decls: ArenaMap<Idx<Decl>, Type>,
    /// Identifier expressions are not included; see their declaration
    pub(crate) exprs: ArenaMap<Idx<Expr>, Type>,
}

impl TypeTable {
    pub fn decl(&self, decl: Idx<Decl>) -> Option<&Type> {
        self.decls.get(decl)
    }

    pub fn expr(&self, expr: Idx<Expr>) -> Option<&Type> {
        self.exprs.get(expr)
    }
}

impl ops::Index<Idx<Decl>> for TypeTable {
    type Output = Type;
    fn index(&self, decl: Idx<Decl>) -> &Self::Output {
        &self.decls[decl]
    }
}

impl ops::Index<Idx<Expr>> for TypeTable {
    type Output = Type;
    fn index(&self, expr: Idx<Expr>) -> &Self::Output {
        &self.exprs[expr]
    }
}
