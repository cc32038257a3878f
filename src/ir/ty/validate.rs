//! Field presence check on the solved program
//!
//! Reading a field that no record literal provides, or writing such an absent value into a field,
//! is rejected. The first violation in program order is reported.

use la_arena::Idx;

use crate::ir::{
    body::{expr::Expr, stmt::Stmt},
    ty::{
        term::{Node, TermData},
        ty_diag::TypeError,
        unify::Solution,
        InferCtx,
    },
};

pub fn validate(cx: &InferCtx, sol: Solution) -> Result<(), TypeError> {
    let v = Validator { cx, sol };

    for (_, fun) in cx.program.funs.iter() {
        for stmt in &fun.body {
            v.visit_stmt(*stmt)?;
        }
        v.visit_expr(fun.ret)?;
    }

    Ok(())
}

struct Validator<'a, 'cx> {
    cx: &'a InferCtx<'cx>,
    sol: Solution<'a>,
}

impl<'a, 'cx> Validator<'a, 'cx> {
    fn is_absent(&self, node: Node) -> bool {
        self.sol
            .node_var(node)
            .map_or(false, |var| matches!(self.sol.data(var), TermData::Absent))
    }

    fn visit_stmt(&self, stmt: Idx<Stmt>) -> Result<(), TypeError> {
        match &self.cx.program.stmts[stmt] {
            Stmt::Assign { target, rhs } | Stmt::DerefWrite { ptr: target, rhs } => {
                self.visit_expr(*target)?;
                self.visit_expr(*rhs)
            }
            Stmt::FieldWrite { target, field, rhs }
            | Stmt::IndirectFieldWrite {
                ptr: target,
                field,
                rhs,
            } => {
                if self.is_absent(self.cx.expr_node(*rhs)) {
                    return Err(TypeError::AbsentFieldWrite {
                        field: field.clone(),
                        span: self.cx.spans.stmt(stmt),
                    });
                }

                self.visit_expr(*target)?;
                self.visit_expr(*rhs)
            }
            Stmt::Output(expr) => self.visit_expr(*expr),
            Stmt::If { cond, then, else_ } => {
                self.visit_expr(*cond)?;
                self.visit_stmt(*then)?;
                match else_ {
                    Some(else_) => self.visit_stmt(*else_),
                    None => Ok(()),
                }
            }
            Stmt::While { cond, body } => {
                self.visit_expr(*cond)?;
                self.visit_stmt(*body)
            }
            Stmt::Block(stmts) => stmts.iter().try_for_each(|stmt| self.visit_stmt(*stmt)),
        }
    }

    fn visit_expr(&self, expr: Idx<Expr>) -> Result<(), TypeError> {
        match &self.cx.program.exprs[expr] {
            Expr::Missing | Expr::Num(_) | Expr::Input | Expr::Null | Expr::Ident(_) => Ok(()),
            Expr::Binary { lhs, rhs, .. } => {
                self.visit_expr(*lhs)?;
                self.visit_expr(*rhs)
            }
            Expr::Neg(operand)
            | Expr::Alloc(operand)
            | Expr::AddrOf(operand)
            | Expr::Deref(operand) => self.visit_expr(*operand),
            Expr::Call { callee, args } => {
                self.visit_expr(*callee)?;
                args.iter().try_for_each(|arg| self.visit_expr(*arg))
            }
            Expr::Record(fields) => fields.iter().try_for_each(|f| self.visit_expr(f.expr)),
            Expr::Field { base, field } => {
                if self.is_absent(Node::Expr(expr)) {
                    return Err(TypeError::AbsentFieldRead {
                        field: field.clone(),
                        span: self.cx.spans.expr(expr),
                    });
                }

                self.visit_expr(*base)
            }
        }
    }
}
