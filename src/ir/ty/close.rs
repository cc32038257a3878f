//! Closure: solved classes → finite [`Type`] values
//!
//! Variables are replaced by the representative term of their class, recursively. A class that is
//! reached again while being closed becomes a reference to a recursive binder, so cyclic classes
//! close into `μt.T` types instead of looping forever.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::ir::{
    body::expr::Expr,
    ty::{
        term::{Node, TermData, TermId},
        unify::Solution,
        InferCtx, Type, TypeTable,
    },
};

/// Closes every declaration and non-identifier expression
pub fn close_all(cx: &InferCtx, sol: Solution) -> TypeTable {
    let mut closer = Closer::new(sol);
    let mut types = TypeTable::default();

    for (decl, _) in cx.program.decls.iter() {
        if let Some(var) = sol.node_var(Node::Decl(decl)) {
            types.decls.insert(decl, closer.close(var));
        }
    }

    for (expr, data) in cx.program.exprs.iter() {
        if matches!(data, Expr::Ident(_) | Expr::Missing) {
            continue;
        }

        if let Some(var) = sol.node_var(Node::Expr(expr)) {
            types.exprs.insert(expr, closer.close(var));
        }
    }

    log::debug!("closed {} classes", closer.memo.len());

    types
}

/// Closes terms under a frozen solution
#[derive(Debug, Clone)]
pub struct Closer<'a> {
    sol: Solution<'a>,
    /// Class root → closed type, for top-level closures only
    memo: FxHashMap<TermId, Type>,
}

/// Per-closure state
#[derive(Debug, Default)]
struct Visit {
    in_progress: FxHashSet<TermId>,
    /// In-progress classes that were reached again
    recursive: FxHashSet<TermId>,
}

impl<'a> Closer<'a> {
    pub fn new(sol: Solution<'a>) -> Self {
        Self {
            sol,
            memo: FxHashMap::default(),
        }
    }

    pub fn close(&mut self, id: TermId) -> Type {
        let root = self.sol.root(id);

        if let Some(ty) = self.memo.get(&root) {
            return ty.clone();
        }

        let ty = self.close_class(root, &mut Visit::default());
        self.memo.insert(root, ty.clone());
        ty
    }

    fn close_class(&self, id: TermId, visit: &mut Visit) -> Type {
        let root = self.sol.root(id);

        if visit.in_progress.contains(&root) {
            visit.recursive.insert(root);
            return Type::Var(root);
        }

        visit.in_progress.insert(root);

        let body = match self.sol.data(root) {
            TermData::Var(_) | TermData::Fresh => Type::Var(root),
            TermData::Int => Type::Int,
            TermData::Absent => Type::Absent,
            TermData::Pointer(pointee) => Type::Pointer(Box::new(self.close_class(*pointee, visit))),
            TermData::Function { params, ret } => {
                let params = params
                    .iter()
                    .map(|param| self.close_class(*param, visit))
                    .collect();
                let ret = Box::new(self.close_class(*ret, visit));
                Type::Function { params, ret }
            }
            TermData::Record(slots) => Type::Record(
                slots
                    .iter()
                    .map(|slot| self.close_class(*slot, visit))
                    .collect(),
            ),
        };

        visit.in_progress.remove(&root);

        if visit.recursive.remove(&root) {
            Type::Recursive {
                binder: root,
                body: Box::new(body),
            }
        } else {
            body
        }
    }
}
