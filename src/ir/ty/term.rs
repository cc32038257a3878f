//! Terms: the structure unified by [`Unifier`]
//!
//! [`Unifier`]: crate::ir::ty::unify::Unifier

use la_arena::Idx;
use smallvec::SmallVec;

use crate::ir::body::{decl::Decl, expr::Expr};

/// Handle to a term (and the class it belongs to) in the unifier arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TermId(usize);

impl From<usize> for TermId {
    fn from(raw: usize) -> Self {
        Self(raw)
    }
}

impl From<TermId> for usize {
    fn from(id: TermId) -> Self {
        id.0
    }
}

/// Syntax node that owns a type variable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Node {
    Decl(Idx<Decl>),
    Expr(Idx<Expr>),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TermData {
    /// Variable bound to a syntax node
    Var(Node),
    /// Anonymous variable (record slots nobody cares about, `null` pointee)
    Fresh,
    Int,
    Pointer(TermId),
    Function {
        params: SmallVec<[TermId; 4]>,
        ret: TermId,
    },
    /// One slot per field name, in sorted order
    Record(Box<[TermId]>),
    /// Field not provided by a record literal
    Absent,
}

impl TermData {
    pub fn is_var(&self) -> bool {
        matches!(self, Self::Var(_) | Self::Fresh)
    }

    /// Constructor name for logs
    pub fn ctor_name(&self) -> &'static str {
        match self {
            Self::Var(_) => "var",
            Self::Fresh => "fresh",
            Self::Int => "int",
            Self::Pointer(_) => "pointer",
            Self::Function { .. } => "function",
            Self::Record(_) => "record",
            Self::Absent => "absent",
        }
    }
}
