//! Lowers AST into [`ProgramData`]
//!
//! Each expression and statement are given unique instance. Missing syntax is lowered into
//! [`Expr::Missing`] so that lowering never fails; the errors are collected instead.

use base::span::Span;
use la_arena::Idx;
use rustc_hash::FxHashSet;
use thiserror::Error;

use crate::{
    ir::body::{
        decl::{Decl, DeclKind, Fun},
        expr::{BinOp, Expr, RecordField},
        stmt::Stmt,
        Name, ProgramData, ProgramSpans,
    },
    syntax::{
        ast::{self, AstNode},
        cst::{SyntaxKind, SyntaxToken},
    },
};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LowerError {
    #[error("invalid assignment target")]
    InvalidAssignTarget { span: Span },
    #[error("`&` can only be applied to a variable")]
    AddressOfNonVariable { span: Span },
    #[error("integer literal is too large")]
    IntOverflow { span: Span },
    #[error("field `{name}` is specified more than once")]
    DuplicateField { name: Name, span: Span },
}

impl LowerError {
    pub fn span(&self) -> Span {
        match self {
            LowerError::InvalidAssignTarget { span }
            | LowerError::AddressOfNonVariable { span }
            | LowerError::IntOverflow { span }
            | LowerError::DuplicateField { span, .. } => *span,
        }
    }
}

pub fn lower(doc: &ast::Document) -> (ProgramData, ProgramSpans, Vec<LowerError>) {
    let lcx = LowerCtx {
        program: Default::default(),
        spans: Default::default(),
        errs: Vec::new(),
    };

    lcx.lower_doc(doc)
}

/// Removes redundant parentheses
fn strip_parens(mut expr: ast::Expr) -> ast::Expr {
    while let ast::ExprKind::ParenExpr(paren) = expr.kind() {
        match paren.expr() {
            Some(inner) => expr = inner,
            None => break,
        }
    }
    expr
}

fn token_kind(tk: Option<SyntaxToken>) -> Option<SyntaxKind> {
    tk.map(|tk| tk.kind())
}

struct LowerCtx {
    program: ProgramData,
    spans: ProgramSpans,
    errs: Vec<LowerError>,
}

/// Allocators
impl LowerCtx {
    fn alloc_decl(&mut self, tk: &SyntaxToken, kind: DeclKind) -> Idx<Decl> {
        let decl = Decl {
            name: Name::new(tk.text()),
            kind,
        };

        let idx = self.program.decls.alloc(decl);
        self.spans.decls.insert(idx, ast::token_span(tk));
        idx
    }

    fn alloc_expr(&mut self, expr: Expr, span: Span) -> Idx<Expr> {
        let idx = self.program.exprs.alloc(expr);
        self.spans.exprs.insert(idx, span);
        idx
    }

    fn alloc_missing_expr(&mut self, span: Span) -> Idx<Expr> {
        self.alloc_expr(Expr::Missing, span)
    }

    fn alloc_stmt(&mut self, stmt: Stmt, span: Span) -> Idx<Stmt> {
        let idx = self.program.stmts.alloc(stmt);
        self.spans.stmts.insert(idx, span);
        idx
    }
}

/// Items
impl LowerCtx {
    fn lower_doc(mut self, doc: &ast::Document) -> (ProgramData, ProgramSpans, Vec<LowerError>) {
        for fun in doc.funs() {
            self.lower_fun(fun);
        }

        (self.program, self.spans, self.errs)
    }

    fn lower_fun(&mut self, ast_fun: ast::Fun) {
        let name_tk = match ast_fun.name_tk() {
            Some(tk) => tk,
            None => return,
        };

        let decl = self.alloc_decl(&name_tk, DeclKind::Fun);

        let params = ast_fun
            .params()
            .into_iter()
            .flat_map(|params| params.params().collect::<Vec<_>>())
            .filter_map(|param| param.name_tk())
            .map(|tk| self.alloc_decl(&tk, DeclKind::Param))
            .collect::<Vec<_>>();

        let fun_span = ast_fun.span();
        let (locals, body, ret) = match ast_fun.body() {
            Some(ast_body) => {
                let locals = ast_body
                    .var_decls()
                    .filter_map(|decl| decl.name_tk())
                    .map(|tk| self.alloc_decl(&tk, DeclKind::Local))
                    .collect::<Vec<_>>();

                let body = ast_body
                    .stmts()
                    .filter_map(|stmt| self.lower_stmt(stmt))
                    .collect::<Vec<_>>();

                let ret_span = ast_body.ret().map_or(fun_span, |ret| ret.span());
                let ret_expr = ast_body.ret().and_then(|ret| ret.expr());
                let ret = self.lower_opt_expr(ret_expr, ret_span);

                (locals, body, ret)
            }
            None => {
                let ret = self.alloc_missing_expr(fun_span);
                (Vec::new(), Vec::new(), ret)
            }
        };

        self.program.funs.alloc(Fun {
            decl,
            params,
            locals,
            body,
            ret,
        });
    }
}

/// Statements
impl LowerCtx {
    fn lower_opt_stmt(&mut self, stmt: Option<ast::Stmt>, span: Span) -> Idx<Stmt> {
        match stmt.and_then(|stmt| self.lower_stmt(stmt)) {
            Some(stmt) => stmt,
            None => self.alloc_stmt(Stmt::Block(Vec::new()), span),
        }
    }

    fn lower_stmt(&mut self, ast_stmt: ast::Stmt) -> Option<Idx<Stmt>> {
        let span = ast_stmt.span();

        let stmt = match ast_stmt.kind() {
            ast::StmtKind::AssignStmt(assign) => self.lower_assign(assign)?,
            ast::StmtKind::OutputStmt(output) => {
                Stmt::Output(self.lower_opt_expr(output.expr(), span))
            }
            ast::StmtKind::IfStmt(if_) => {
                let cond = self.lower_opt_expr(if_.cond(), span);
                let then = self.lower_opt_stmt(if_.then_stmt(), span);
                let else_ = if_.else_stmt().and_then(|stmt| self.lower_stmt(stmt));
                Stmt::If { cond, then, else_ }
            }
            ast::StmtKind::WhileStmt(while_) => {
                let cond = self.lower_opt_expr(while_.cond(), span);
                let body = self.lower_opt_stmt(while_.body(), span);
                Stmt::While { cond, body }
            }
            ast::StmtKind::BlockStmt(block) => {
                let stmts = block
                    .stmts()
                    .filter_map(|stmt| self.lower_stmt(stmt))
                    .collect();
                Stmt::Block(stmts)
            }
            // `return` not at the end of a body, already reported by the parser
            ast::StmtKind::ReturnStmt(_) => return None,
        };

        Some(self.alloc_stmt(stmt, span))
    }

    /// Classifies the assignment by the target shape
    fn lower_assign(&mut self, assign: ast::AssignStmt) -> Option<Stmt> {
        let span = assign.span();
        let lhs = self::strip_parens(assign.lhs()?);
        let lhs_span = lhs.span();

        let invalid = |errs: &mut Vec<LowerError>| {
            errs.push(LowerError::InvalidAssignTarget { span: lhs_span });
            None
        };

        match lhs.kind() {
            ast::ExprKind::NameExpr(_) => {
                let target = self.lower_expr(lhs);
                let rhs = self.lower_opt_expr(assign.rhs(), span);
                Some(Stmt::Assign { target, rhs })
            }
            ast::ExprKind::PrefixExpr(deref)
                if self::token_kind(deref.op_tk()) == Some(SyntaxKind::Star) =>
            {
                let ptr = self.lower_opt_expr(deref.expr(), lhs_span);
                let rhs = self.lower_opt_expr(assign.rhs(), span);
                Some(Stmt::DerefWrite { ptr, rhs })
            }
            ast::ExprKind::FieldExpr(field_expr) => {
                // missing field name is a parse error
                let field = Name::new(field_expr.field_tk()?.text());

                let base = match field_expr.base() {
                    Some(base) => self::strip_parens(base),
                    None => return invalid(&mut self.errs),
                };

                match base.kind() {
                    ast::ExprKind::NameExpr(_) => {
                        let target = self.lower_expr(base);
                        let rhs = self.lower_opt_expr(assign.rhs(), span);
                        Some(Stmt::FieldWrite { target, field, rhs })
                    }
                    ast::ExprKind::PrefixExpr(deref)
                        if self::token_kind(deref.op_tk()) == Some(SyntaxKind::Star) =>
                    {
                        let ptr = self.lower_opt_expr(deref.expr(), base.span());
                        let rhs = self.lower_opt_expr(assign.rhs(), span);
                        Some(Stmt::IndirectFieldWrite { ptr, field, rhs })
                    }
                    _ => invalid(&mut self.errs),
                }
            }
            _ => invalid(&mut self.errs),
        }
    }
}

/// Expressions
impl LowerCtx {
    fn lower_opt_expr(&mut self, expr: Option<ast::Expr>, span: Span) -> Idx<Expr> {
        match expr {
            Some(expr) => self.lower_expr(expr),
            None => self.alloc_missing_expr(span),
        }
    }

    fn lower_expr(&mut self, ast_expr: ast::Expr) -> Idx<Expr> {
        let span = ast_expr.span();

        let expr = match ast_expr.kind() {
            ast::ExprKind::NumExpr(num) => match num.token() {
                Some(tk) => match tk.text().parse::<i64>() {
                    Ok(x) => Expr::Num(x),
                    Err(_) => {
                        self.errs.push(LowerError::IntOverflow { span });
                        Expr::Missing
                    }
                },
                None => Expr::Missing,
            },
            ast::ExprKind::NameExpr(name) => match name.token() {
                Some(tk) => Expr::Ident(Name::new(tk.text())),
                None => Expr::Missing,
            },
            ast::ExprKind::InputExpr(_) => Expr::Input,
            ast::ExprKind::NullExpr(_) => Expr::Null,
            ast::ExprKind::ParenExpr(paren) => return self.lower_opt_expr(paren.expr(), span),
            ast::ExprKind::BinExpr(bin) => {
                let lhs = self.lower_opt_expr(bin.lhs(), span);
                let rhs = self.lower_opt_expr(bin.rhs(), span);

                let op = match self::token_kind(bin.op_tk()) {
                    Some(SyntaxKind::EqEq) => BinOp::Eq,
                    Some(SyntaxKind::Gt) => BinOp::Gt,
                    Some(SyntaxKind::Plus) => BinOp::Add,
                    Some(SyntaxKind::Minus) => BinOp::Sub,
                    Some(SyntaxKind::Star) => BinOp::Mul,
                    Some(SyntaxKind::Slash) => BinOp::Div,
                    _ => return self.alloc_missing_expr(span),
                };

                Expr::Binary { op, lhs, rhs }
            }
            ast::ExprKind::PrefixExpr(prefix) => match self::token_kind(prefix.op_tk()) {
                Some(SyntaxKind::Star) => Expr::Deref(self.lower_opt_expr(prefix.expr(), span)),
                Some(SyntaxKind::Minus) => Expr::Neg(self.lower_opt_expr(prefix.expr(), span)),
                Some(SyntaxKind::Amp) => match prefix.expr().map(self::strip_parens) {
                    Some(var) if matches!(var.kind(), ast::ExprKind::NameExpr(_)) => {
                        Expr::AddrOf(self.lower_expr(var))
                    }
                    _ => {
                        self.errs.push(LowerError::AddressOfNonVariable { span });
                        Expr::Missing
                    }
                },
                _ => Expr::Missing,
            },
            ast::ExprKind::AllocExpr(alloc) => {
                Expr::Alloc(self.lower_opt_expr(alloc.expr(), span))
            }
            ast::ExprKind::CallExpr(call) => {
                let callee = self.lower_opt_expr(call.callee(), span);
                let args = call.args().map(|arg| self.lower_expr(arg)).collect();
                Expr::Call { callee, args }
            }
            ast::ExprKind::RecordExpr(record) => Expr::Record(self.lower_record_fields(record)),
            ast::ExprKind::FieldExpr(field_expr) => {
                let base = self.lower_opt_expr(field_expr.base(), span);
                match field_expr.field_tk() {
                    Some(tk) => Expr::Field {
                        base,
                        field: Name::new(tk.text()),
                    },
                    None => Expr::Missing,
                }
            }
        };

        self.alloc_expr(expr, span)
    }

    fn lower_record_fields(&mut self, record: ast::RecordExpr) -> Vec<RecordField> {
        let mut seen = FxHashSet::default();
        let mut fields = Vec::new();

        for ast_field in record.fields() {
            let name_tk = match ast_field.name_tk() {
                Some(tk) => tk,
                None => continue,
            };

            let name = Name::new(name_tk.text());
            if !seen.insert(name.clone()) {
                self.errs.push(LowerError::DuplicateField {
                    name,
                    span: ast::token_span(&name_tk),
                });
                continue;
            }

            let expr = self.lower_opt_expr(ast_field.expr(), ast_field.span());
            fields.push(RecordField { name, expr });
        }

        fields
    }
}
