//! Union-find over terms
//!
//! Each class has at most one non-variable term, stored on the class root. Classes are merged
//! before their children are unified, so cyclic terms (recursive types) terminate without an
//! occurs-check.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use typed_index_collections::TiVec;

use crate::ir::ty::term::{Node, TermData, TermId};

/// Incompatible terms met in one class
///
/// Both handles are class roots at the time of failure and are left unmerged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnifyError {
    pub lhs: TermId,
    pub rhs: TermId,
}

#[derive(Debug, Clone)]
struct Class {
    parent: TermId,
    rank: u32,
    /// Representative term. Only meaningful on the class root.
    data: TermData,
}

#[derive(Debug, Clone)]
pub struct Unifier {
    classes: TiVec<TermId, Class>,
    vars: FxHashMap<Node, TermId>,
    int: TermId,
    absent: TermId,
}

impl Default for Unifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Term constructors
impl Unifier {
    pub fn new() -> Self {
        let mut classes: TiVec<TermId, Class> = TiVec::new();

        let int = classes.next_key();
        classes.push(Class {
            parent: int,
            rank: 0,
            data: TermData::Int,
        });

        let absent = classes.next_key();
        classes.push(Class {
            parent: absent,
            rank: 0,
            data: TermData::Absent,
        });

        Self {
            classes,
            vars: FxHashMap::default(),
            int,
            absent,
        }
    }

    fn alloc(&mut self, data: TermData) -> TermId {
        let id = self.classes.next_key();
        self.classes.push(Class {
            parent: id,
            rank: 0,
            data,
        });
        id
    }

    /// Number of allocated terms
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn int(&self) -> TermId {
        self.int
    }

    pub fn absent(&self) -> TermId {
        self.absent
    }

    /// Variable of the node, created on first use
    pub fn var(&mut self, node: Node) -> TermId {
        if let Some(id) = self.vars.get(&node) {
            return *id;
        }

        let id = self.alloc(TermData::Var(node));
        self.vars.insert(node, id);
        id
    }

    pub fn fresh(&mut self) -> TermId {
        self.alloc(TermData::Fresh)
    }

    pub fn pointer(&mut self, pointee: TermId) -> TermId {
        self.alloc(TermData::Pointer(pointee))
    }

    pub fn function(&mut self, params: impl IntoIterator<Item = TermId>, ret: TermId) -> TermId {
        let params = params.into_iter().collect();
        self.alloc(TermData::Function { params, ret })
    }

    pub fn record(&mut self, slots: impl IntoIterator<Item = TermId>) -> TermId {
        let slots = slots.into_iter().collect();
        self.alloc(TermData::Record(slots))
    }
}

/// Union-find
impl Unifier {
    /// Finds the class root, compressing the path
    pub fn find(&mut self, id: TermId) -> TermId {
        let mut root = id;
        while self.classes[root].parent != root {
            root = self.classes[root].parent;
        }

        let mut cur = id;
        while cur != root {
            let next = self.classes[cur].parent;
            self.classes[cur].parent = root;
            cur = next;
        }

        root
    }

    /// Merges two roots. The merged class takes the term of `data_from`.
    ///
    /// Ties in rank are won by `a`.
    fn union(&mut self, a: TermId, b: TermId, data_from: TermId) {
        let data = self.classes[data_from].data.clone();

        let (root, child) = if self.classes[a].rank < self.classes[b].rank {
            (b, a)
        } else {
            (a, b)
        };

        self.classes[child].parent = root;
        if self.classes[root].rank == self.classes[child].rank {
            self.classes[root].rank += 1;
        }
        self.classes[root].data = data;
    }

    /// Child pairs of two non-variable terms with the same constructor
    fn match_children(
        &self,
        a: TermId,
        b: TermId,
    ) -> Result<SmallVec<[(TermId, TermId); 4]>, UnifyError> {
        let err = UnifyError { lhs: a, rhs: b };

        Ok(match (&self.classes[a].data, &self.classes[b].data) {
            (TermData::Int, TermData::Int) | (TermData::Absent, TermData::Absent) => {
                SmallVec::new()
            }
            (TermData::Pointer(x), TermData::Pointer(y)) => smallvec::smallvec![(*x, *y)],
            (
                TermData::Function {
                    params: p1,
                    ret: r1,
                },
                TermData::Function {
                    params: p2,
                    ret: r2,
                },
            ) => {
                if p1.len() != p2.len() {
                    return Err(err);
                }

                p1.iter()
                    .copied()
                    .zip(p2.iter().copied())
                    .chain(std::iter::once((*r1, *r2)))
                    .collect()
            }
            (TermData::Record(s1), TermData::Record(s2)) => {
                if s1.len() != s2.len() {
                    return Err(err);
                }

                s1.iter().copied().zip(s2.iter().copied()).collect()
            }
            _ => return Err(err),
        })
    }

    pub fn unify(&mut self, a: TermId, b: TermId) -> Result<(), UnifyError> {
        let mut work = vec![(a, b)];

        while let Some((a, b)) = work.pop() {
            let (a, b) = (self.find(a), self.find(b));
            if a == b {
                continue;
            }

            log::trace!(
                "unify {:?}: {} ~ {:?}: {}",
                a,
                self.classes[a].data.ctor_name(),
                b,
                self.classes[b].data.ctor_name(),
            );

            match (self.classes[a].data.is_var(), self.classes[b].data.is_var()) {
                (true, _) => self.union(a, b, b),
                (false, true) => self.union(a, b, a),
                (false, false) => {
                    let children = self.match_children(a, b)?;
                    // merge first so that revisiting this pair stops
                    self.union(a, b, a);
                    work.extend(children.into_iter().rev());
                }
            }
        }

        Ok(())
    }

    /// Read-only view to the (possibly partial) solution
    pub fn solution(&self) -> Solution<'_> {
        Solution { unifier: self }
    }
}

/// Read-only view to [`Unifier`]. Never compresses paths.
#[derive(Debug, Clone, Copy)]
pub struct Solution<'a> {
    unifier: &'a Unifier,
}

impl<'a> Solution<'a> {
    pub fn root(&self, id: TermId) -> TermId {
        let classes = &self.unifier.classes;

        let mut root = id;
        while classes[root].parent != root {
            root = classes[root].parent;
        }
        root
    }

    /// Representative term of the class
    pub fn data(&self, id: TermId) -> &'a TermData {
        let root = self.root(id);
        &self.unifier.classes[root].data
    }

    /// Variable of the node, if any rule has mentioned it
    pub fn node_var(&self, node: Node) -> Option<TermId> {
        self.unifier.vars.get(&node).copied()
    }
}

#[cfg(test)]
mod test {
    use la_arena::Arena;

    use super::*;
    use crate::ir::body::expr::Expr;

    fn nodes(n: usize) -> Vec<Node> {
        let mut arena = Arena::<Expr>::new();
        (0..n)
            .map(|_| Node::Expr(arena.alloc(Expr::Missing)))
            .collect()
    }

    #[test]
    fn var_adopts_concrete_term() {
        let ns = nodes(1);
        let mut u = Unifier::new();

        let x = u.var(ns[0]);
        let int = u.int();
        let p = u.pointer(int);
        u.unify(x, p).unwrap();

        let sol = u.solution();
        assert_eq!(sol.data(x), &TermData::Pointer(int));
        assert_eq!(sol.root(x), sol.root(p));
        assert_eq!(u.var(ns[0]), x, "node variable is created once");
    }

    #[test]
    fn children_are_unified() {
        let ns = nodes(2);
        let mut u = Unifier::new();

        let x = u.var(ns[0]);
        let y = u.var(ns[1]);
        let px = u.pointer(x);
        let py = u.pointer(y);
        u.unify(px, py).unwrap();

        let sol = u.solution();
        assert_eq!(sol.root(x), sol.root(y));
    }

    #[test]
    fn constructor_mismatch() {
        let mut u = Unifier::new();

        let int = u.int();
        let fresh = u.fresh();
        let p = u.pointer(fresh);

        let err = u.unify(int, p).unwrap_err();
        let sol = u.solution();
        assert_eq!(sol.data(err.lhs), &TermData::Int);
        assert!(matches!(sol.data(err.rhs), TermData::Pointer(_)));
    }

    #[test]
    fn arity_mismatch() {
        let mut u = Unifier::new();

        let int = u.int();
        let f1 = u.function([int, int], int);
        let f2 = u.function([int], int);
        assert!(u.unify(f1, f2).is_err());
    }

    #[test]
    fn absent_only_meets_absent_or_vars() {
        let mut u = Unifier::new();

        let absent = u.absent();
        let fresh = u.fresh();
        u.unify(fresh, absent).unwrap();
        u.unify(absent, absent).unwrap();

        let int = u.int();
        assert!(u.unify(absent, int).is_err());
        assert!(u.unify(fresh, int).is_err());
    }

    #[test]
    fn cyclic_terms_terminate() {
        let ns = nodes(2);
        let mut u = Unifier::new();

        // x = &x and y = &y, then x = y
        let x = u.var(ns[0]);
        let px = u.pointer(x);
        u.unify(x, px).unwrap();

        let y = u.var(ns[1]);
        let py = u.pointer(y);
        u.unify(y, py).unwrap();

        u.unify(x, y).unwrap();

        let sol = u.solution();
        assert_eq!(sol.root(x), sol.root(y));
        assert_eq!(sol.root(px), sol.root(py));
    }

    #[test]
    fn find_compresses_paths() {
        let ns = nodes(4);
        let mut u = Unifier::new();

        let vars = ns.iter().map(|n| u.var(*n)).collect::<Vec<_>>();
        for w in vars.windows(2) {
            u.unify(w[0], w[1]).unwrap();
        }

        let root = u.find(vars[3]);
        for v in &vars {
            assert_eq!(u.find(*v), root);
            assert_eq!(u.classes[*v].parent, root);
        }
    }
}
