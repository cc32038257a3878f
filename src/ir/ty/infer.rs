//! Constraint generation
//!
//! Walks the program once, emitting unifications for each construct before visiting its children.
//! Unification is eager, so there's no separate solving phase. The first conflict aborts the
//! analysis.

use base::span::Span;
use la_arena::Idx;

use crate::ir::{
    body::{
        decl::Fun,
        expr::{BinOp, Expr},
        stmt::Stmt,
        Name,
    },
    ty::{
        close::Closer,
        term::{Node, TermId},
        ty_diag::TypeError,
        unify::Unifier,
        InferCtx,
    },
};

pub fn generate(cx: &InferCtx, unifier: &mut Unifier) -> Result<(), TypeError> {
    let mut gen = Generator { cx, u: unifier };

    for (_, fun) in cx.program.funs.iter() {
        gen.gen_fun(fun)?;
    }

    Ok(())
}

struct Generator<'a, 'cx> {
    cx: &'a InferCtx<'cx>,
    u: &'a mut Unifier,
}

/// Helpers
impl<'a, 'cx> Generator<'a, 'cx> {
    fn expr_var(&mut self, expr: Idx<Expr>) -> TermId {
        self.u.var(self.cx.expr_node(expr))
    }

    /// Unifies two terms, closing the conflicting pair on failure
    fn unify(&mut self, a: TermId, b: TermId, span: Span) -> Result<(), TypeError> {
        let err = match self.u.unify(a, b) {
            Ok(()) => return Ok(()),
            Err(err) => err,
        };

        let mut closer = Closer::new(self.u.solution());
        let lhs = closer.close(err.lhs);
        let rhs = closer.close(err.rhs);

        log::debug!("conflict at {:?}: {:?} ~ {:?}", span, lhs, rhs);
        Err(TypeError::conflict(lhs, rhs, self.cx.fields, span))
    }

    /// Record term with `field` at its slot and fresh variables elsewhere
    fn record_with(&mut self, field: &Name, ty: TermId) -> TermId {
        let slot = self
            .cx
            .fields
            .slot(field.as_str())
            .unwrap_or_else(|| unreachable!("field `{}` is not collected", field));

        let slots = (0..self.cx.fields.len())
            .map(|i| if i == slot { ty } else { self.u.fresh() })
            .collect::<Vec<_>>();

        self.u.record(slots)
    }
}

/// Items and statements
impl<'a, 'cx> Generator<'a, 'cx> {
    fn gen_fun(&mut self, fun: &Fun) -> Result<(), TypeError> {
        let fun_var = self.u.var(Node::Decl(fun.decl));

        let params = fun
            .params
            .iter()
            .map(|param| self.u.var(Node::Decl(*param)))
            .collect::<Vec<_>>();
        let ret = self.expr_var(fun.ret);
        let sig = self.u.function(params, ret);

        let span = self.cx.spans.decl(fun.decl);
        self.unify(fun_var, sig, span)?;

        // locals may be never used
        for local in &fun.locals {
            self.u.var(Node::Decl(*local));
        }

        for stmt in &fun.body {
            self.gen_stmt(*stmt)?;
        }

        self.gen_expr(fun.ret)
    }

    fn gen_stmt(&mut self, stmt: Idx<Stmt>) -> Result<(), TypeError> {
        let cx = self.cx;
        let span = cx.spans.stmt(stmt);

        match &cx.program.stmts[stmt] {
            Stmt::Assign { target, rhs } => {
                let (t, r) = (self.expr_var(*target), self.expr_var(*rhs));
                self.unify(t, r, span)?;

                self.gen_expr(*target)?;
                self.gen_expr(*rhs)
            }
            Stmt::DerefWrite { ptr, rhs } => {
                let p = self.expr_var(*ptr);
                let r = self.expr_var(*rhs);
                let pointer = self.u.pointer(r);
                self.unify(p, pointer, span)?;

                self.gen_expr(*ptr)?;
                self.gen_expr(*rhs)
            }
            Stmt::FieldWrite { target, field, rhs } => {
                let t = self.expr_var(*target);
                let r = self.expr_var(*rhs);
                let record = self.record_with(field, r);
                self.unify(t, record, span)?;

                self.gen_expr(*target)?;
                self.gen_expr(*rhs)
            }
            Stmt::IndirectFieldWrite { ptr, field, rhs } => {
                let p = self.expr_var(*ptr);
                let r = self.expr_var(*rhs);
                let record = self.record_with(field, r);
                let pointer = self.u.pointer(record);
                self.unify(p, pointer, span)?;

                self.gen_expr(*ptr)?;
                self.gen_expr(*rhs)
            }
            Stmt::Output(expr) => {
                let (e, int) = (self.expr_var(*expr), self.u.int());
                self.unify(e, int, span)?;

                self.gen_expr(*expr)
            }
            Stmt::If { cond, then, else_ } => {
                let (c, int) = (self.expr_var(*cond), self.u.int());
                self.unify(c, int, span)?;

                self.gen_expr(*cond)?;
                self.gen_stmt(*then)?;
                match else_ {
                    Some(else_) => self.gen_stmt(*else_),
                    None => Ok(()),
                }
            }
            Stmt::While { cond, body } => {
                let (c, int) = (self.expr_var(*cond), self.u.int());
                self.unify(c, int, span)?;

                self.gen_expr(*cond)?;
                self.gen_stmt(*body)
            }
            Stmt::Block(stmts) => {
                for stmt in stmts {
                    self.gen_stmt(*stmt)?;
                }
                Ok(())
            }
        }
    }
}

/// Expressions
impl<'a, 'cx> Generator<'a, 'cx> {
    fn gen_expr(&mut self, expr: Idx<Expr>) -> Result<(), TypeError> {
        let cx = self.cx;
        let span = cx.spans.expr(expr);
        let v = self.expr_var(expr);
        let int = self.u.int();

        match &cx.program.exprs[expr] {
            Expr::Missing | Expr::Ident(_) => Ok(()),
            Expr::Num(_) | Expr::Input => self.unify(v, int, span),
            Expr::Null => {
                let pointee = self.u.fresh();
                let pointer = self.u.pointer(pointee);
                self.unify(v, pointer, span)
            }
            Expr::Binary { op, lhs, rhs } => {
                let (l, r) = (self.expr_var(*lhs), self.expr_var(*rhs));

                if *op == BinOp::Eq {
                    self.unify(l, r, span)?;
                } else {
                    self.unify(l, int, span)?;
                    self.unify(r, int, span)?;
                }
                self.unify(v, int, span)?;

                self.gen_expr(*lhs)?;
                self.gen_expr(*rhs)
            }
            Expr::Neg(operand) => {
                let o = self.expr_var(*operand);
                self.unify(o, int, span)?;
                self.unify(v, int, span)?;

                self.gen_expr(*operand)
            }
            Expr::Alloc(operand) | Expr::AddrOf(operand) => {
                let o = self.expr_var(*operand);
                let pointer = self.u.pointer(o);
                self.unify(v, pointer, span)?;

                self.gen_expr(*operand)
            }
            Expr::Deref(operand) => {
                let o = self.expr_var(*operand);
                let pointer = self.u.pointer(v);
                self.unify(o, pointer, span)?;

                self.gen_expr(*operand)
            }
            Expr::Call { callee, args } => {
                let c = self.expr_var(*callee);
                let arg_vars = args
                    .iter()
                    .map(|arg| self.expr_var(*arg))
                    .collect::<Vec<_>>();
                let sig = self.u.function(arg_vars, v);
                self.unify(c, sig, span)?;

                self.gen_expr(*callee)?;
                for arg in args {
                    self.gen_expr(*arg)?;
                }
                Ok(())
            }
            Expr::Record(fields) => {
                let absent = self.u.absent();
                let slots = cx
                    .fields
                    .names()
                    .map(|name| match fields.iter().find(|f| f.name == *name) {
                        Some(f) => self.u.var(cx.expr_node(f.expr)),
                        None => absent,
                    })
                    .collect::<Vec<_>>();
                let record = self.u.record(slots);
                self.unify(v, record, span)?;

                for field in fields {
                    self.gen_expr(field.expr)?;
                }
                Ok(())
            }
            Expr::Field { base, field } => {
                let b = self.expr_var(*base);
                let record = self.record_with(field, v);
                self.unify(b, record, span)?;

                self.gen_expr(*base)
            }
        }
    }
}
