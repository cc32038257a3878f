//! Resolves identifiers to declarations
//!
//! Functions live in the global scope. Each function body sees its own parameters and locals,
//! which shadow functions of the same name.

use base::span::Span;
use la_arena::{ArenaMap, Idx};
use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::ir::body::{
    decl::{Decl, Fun},
    expr::Expr,
    stmt::Stmt,
    Name, ProgramData, ProgramSpans,
};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("cannot find `{name}` in this scope")]
    Undeclared { name: Name, span: Span },
    #[error("`{name}` is declared more than once")]
    Duplicate { name: Name, span: Span },
}

impl ResolveError {
    pub fn span(&self) -> Span {
        match self {
            ResolveError::Undeclared { span, .. } | ResolveError::Duplicate { span, .. } => *span,
        }
    }
}

/// Identifier expression → declaration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    map: ArenaMap<Idx<Expr>, Idx<Decl>>,
}

impl Resolution {
    pub fn get(&self, expr: Idx<Expr>) -> Option<Idx<Decl>> {
        self.map.get(expr).copied()
    }
}

/// Name → declaration map of one scope
#[derive(Debug, Clone, Default)]
struct Scope {
    entries: FxHashMap<Name, Idx<Decl>>,
}

#[derive(Debug, Clone)]
struct Resolver<'a> {
    program: &'a ProgramData,
    spans: &'a ProgramSpans,
    /// Inner-most scope is the last item.
    ///
    /// Invariant: The global scope is always at the start of the vec.
    scopes: Vec<Scope>,
    resolution: Resolution,
    errs: Vec<ResolveError>,
}

pub fn resolve(program: &ProgramData, spans: &ProgramSpans) -> (Resolution, Vec<ResolveError>) {
    let mut r = Resolver {
        program,
        spans,
        scopes: Vec::new(),
        resolution: Default::default(),
        errs: Vec::new(),
    };

    let globals = program.fun_decls().collect::<Vec<_>>();
    r.push_scope(&globals);

    for (_, fun) in program.funs.iter() {
        r.resolve_fun(fun);
    }

    (r.resolution, r.errs)
}

/// Scopes
impl<'a> Resolver<'a> {
    /// Pushes a scope, reporting duplicate declarations in it
    fn push_scope(&mut self, decls: &[Idx<Decl>]) {
        let program = self.program;
        let mut scope = Scope::default();

        for &decl in decls {
            let name = &program.decls[decl].name;

            if scope.entries.contains_key(name) {
                self.errs.push(ResolveError::Duplicate {
                    name: name.clone(),
                    span: self.spans.decl(decl),
                });
                continue;
            }

            scope.entries.insert(name.clone(), decl);
        }

        self.scopes.push(scope);
    }

    fn pop_scope(&mut self) {
        self.scopes.pop();
    }

    fn lookup(&self, name: &Name) -> Option<Idx<Decl>> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.entries.get(name).copied())
    }
}

/// Traversal
impl<'a> Resolver<'a> {
    fn resolve_fun(&mut self, fun: &Fun) {
        let body_decls = fun
            .params
            .iter()
            .chain(fun.locals.iter())
            .copied()
            .collect::<Vec<_>>();

        self.push_scope(&body_decls);

        for &stmt in &fun.body {
            self.resolve_stmt(stmt);
        }
        self.resolve_expr(fun.ret);

        self.pop_scope();
    }

    fn resolve_stmt(&mut self, stmt: Idx<Stmt>) {
        let program = self.program;
        match &program.stmts[stmt] {
            Stmt::Assign { target, rhs }
            | Stmt::DerefWrite { ptr: target, rhs }
            | Stmt::FieldWrite { target, rhs, .. }
            | Stmt::IndirectFieldWrite {
                ptr: target, rhs, ..
            } => {
                self.resolve_expr(*target);
                self.resolve_expr(*rhs);
            }
            Stmt::Output(expr) => self.resolve_expr(*expr),
            Stmt::If { cond, then, else_ } => {
                self.resolve_expr(*cond);
                self.resolve_stmt(*then);
                if let Some(else_) = else_ {
                    self.resolve_stmt(*else_);
                }
            }
            Stmt::While { cond, body } => {
                self.resolve_expr(*cond);
                self.resolve_stmt(*body);
            }
            Stmt::Block(stmts) => {
                for &stmt in stmts {
                    self.resolve_stmt(stmt);
                }
            }
        }
    }

    fn resolve_expr(&mut self, expr: Idx<Expr>) {
        let program = self.program;
        match &program.exprs[expr] {
            Expr::Missing | Expr::Num(_) | Expr::Input | Expr::Null => {}
            Expr::Ident(name) => match self.lookup(name) {
                Some(decl) => {
                    self.resolution.map.insert(expr, decl);
                }
                None => self.errs.push(ResolveError::Undeclared {
                    name: name.clone(),
                    span: self.spans.expr(expr),
                }),
            },
            Expr::Binary { lhs, rhs, .. } => {
                self.resolve_expr(*lhs);
                self.resolve_expr(*rhs);
            }
            Expr::Neg(e) | Expr::Alloc(e) | Expr::AddrOf(e) | Expr::Deref(e) => {
                self.resolve_expr(*e)
            }
            Expr::Call { callee, args } => {
                self.resolve_expr(*callee);
                for &arg in args {
                    self.resolve_expr(arg);
                }
            }
            Expr::Record(fields) => {
                for field in fields {
                    self.resolve_expr(field.expr);
                }
            }
            Expr::Field { base, .. } => self.resolve_expr(*base),
        }
    }
}
