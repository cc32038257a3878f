//! Tree of tokens
//!
//! # Implementation rules
//!
//! - Trivia tokens are bumped right after every non-trivia token, so a parse function always
//! starts at a non-trivia token (or EoF) and checkpoints never include leading trivia.
//! - Every loop consumes at least one token per iteration or breaks.

use base::span::{Offset, Span};
use rowan::{GreenNode, GreenNodeBuilder};
use thiserror::Error;

use crate::syntax::cst::{lex::Token, SyntaxKind, SyntaxNode};

/// Parse error
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("expected {expected}, found {}", found.kind.describe())]
    UnexpectedToken { expected: String, found: Token },
    #[error("expected {expected}, found end of file")]
    UnexpectedEof { expected: String, at: Offset },
    #[error("`return` is only allowed at the end of a function body")]
    MisplacedReturn { span: Span },
}

impl ParseError {
    pub fn span(&self) -> Span {
        match self {
            ParseError::UnexpectedToken { found, .. } => found.span,
            ParseError::UnexpectedEof { at, .. } => Span::at(*at),
            ParseError::MisplacedReturn { span } => *span,
        }
    }
}

/// Creates a CST
pub fn parse(src: &str, tks: &[Token]) -> (SyntaxNode, Vec<ParseError>) {
    let pcx = ParseContext { src, tks };
    let parser = ParseState::new();
    let (root, errs) = parser.run(&pcx);
    (SyntaxNode::new_root(root), errs)
}

/// Referred to as `pcx`
#[derive(Debug, Clone)]
struct ParseContext<'s, 't> {
    src: &'s str,
    tks: &'t [Token],
}

/// Binary operators from the lowest precedence to the highest
const BIN_OPS: &[&[SyntaxKind]] = &[
    &[SyntaxKind::EqEq],
    &[SyntaxKind::Gt],
    &[SyntaxKind::Plus, SyntaxKind::Minus],
    &[SyntaxKind::Star, SyntaxKind::Slash],
];

#[derive(Debug)]
struct ParseState {
    /// Index of the next token
    pos: usize,
    builder: GreenNodeBuilder<'static>,
    errs: Vec<ParseError>,
}

impl ParseState {
    pub fn new() -> Self {
        Self {
            pos: 0,
            builder: GreenNodeBuilder::new(),
            errs: vec![],
        }
    }

    pub fn run(mut self, pcx: &ParseContext) -> (GreenNode, Vec<ParseError>) {
        self.builder.start_node(SyntaxKind::ROOT.into());

        self.bump_trivia(pcx);
        while let Some(tk) = self.peek(pcx) {
            if tk.kind == SyntaxKind::Ident {
                self.bump_fun(pcx);
            } else {
                self.errs.push(ParseError::UnexpectedToken {
                    expected: "function definition".to_string(),
                    found: *tk,
                });
                self.bump(pcx);
            }
        }

        self.builder.finish_node();

        (self.builder.finish(), self.errs)
    }
}

/// Helpers
impl ParseState {
    fn peek<'pcx>(&self, pcx: &'pcx ParseContext) -> Option<&'pcx Token> {
        pcx.tks.get(self.pos)
    }

    fn at(&self, pcx: &ParseContext, kind: SyntaxKind) -> bool {
        self.peek(pcx).map(|tk| tk.kind) == Some(kind)
    }

    fn bump_trivia(&mut self, pcx: &ParseContext) {
        while let Some(tk) = pcx.tks.get(self.pos) {
            if !tk.kind.is_trivia() {
                break;
            }
            self.builder.token(tk.kind.into(), tk.slice(pcx.src));
            self.pos += 1;
        }
    }

    /// Consumes the next token along with the trivia following it
    fn bump<'pcx>(&mut self, pcx: &'pcx ParseContext) -> &'pcx Token {
        let tk = &pcx.tks[self.pos];
        self.builder.token(tk.kind.into(), tk.slice(pcx.src));
        self.pos += 1;
        self.bump_trivia(pcx);
        tk
    }

    fn maybe_bump_kind(&mut self, pcx: &ParseContext, kind: SyntaxKind) -> Option<()> {
        if self.at(pcx, kind) {
            self.bump(pcx);
            Some(())
        } else {
            None
        }
    }

    /// Bumps the token of the kind or records an error without consuming anything
    fn expect(&mut self, pcx: &ParseContext, kind: SyntaxKind) -> Option<()> {
        if self.maybe_bump_kind(pcx, kind).is_some() {
            return Some(());
        }

        self.error_expected(pcx, kind.describe());
        None
    }

    fn error_expected(&mut self, pcx: &ParseContext, expected: &str) {
        let err = match self.peek(pcx) {
            Some(tk) => ParseError::UnexpectedToken {
                expected: expected.to_string(),
                found: *tk,
            },
            None => ParseError::UnexpectedEof {
                expected: expected.to_string(),
                at: Offset::from(pcx.src.len()),
            },
        };
        self.errs.push(err);
    }

    /// Wraps a single token into a node
    fn bump_wrapped(&mut self, pcx: &ParseContext, kind: SyntaxKind) {
        self.builder.start_node(kind.into());
        self.bump(pcx);
        self.builder.finish_node();
    }
}

/// Items
impl ParseState {
    /// Fun → Ident Params Body
    fn bump_fun(&mut self, pcx: &ParseContext) {
        self.builder.start_node(SyntaxKind::Fun.into());

        self.bump(pcx);
        self.bump_params(pcx);
        self.bump_body(pcx);

        self.builder.finish_node();
    }

    /// Params → "(" (Param ("," Param)*)? ")"
    fn bump_params(&mut self, pcx: &ParseContext) {
        self.builder.start_node(SyntaxKind::Params.into());

        if self.expect(pcx, SyntaxKind::LParen).is_some() && !self.at(pcx, SyntaxKind::RParen) {
            loop {
                if self.at(pcx, SyntaxKind::Ident) {
                    self.bump_wrapped(pcx, SyntaxKind::Param);
                } else {
                    self.error_expected(pcx, "parameter");
                    break;
                }

                if self.maybe_bump_kind(pcx, SyntaxKind::Comma).is_none() {
                    break;
                }
            }
        }

        self.expect(pcx, SyntaxKind::RParen);
        self.builder.finish_node();
    }

    /// Body → "{" VarDecls* Stmt* ReturnStmt "}"
    fn bump_body(&mut self, pcx: &ParseContext) {
        self.builder.start_node(SyntaxKind::Body.into());

        if self.expect(pcx, SyntaxKind::LBrace).is_none() {
            self.builder.finish_node();
            return;
        }

        while self.at(pcx, SyntaxKind::VarKw) {
            self.bump_var_decls(pcx);
        }

        while let Some(tk) = self.peek(pcx) {
            if matches!(tk.kind, SyntaxKind::RBrace | SyntaxKind::ReturnKw) {
                break;
            }
            self.bump_stmt(pcx);
        }

        if self.at(pcx, SyntaxKind::ReturnKw) {
            self.bump_return(pcx);
        } else {
            self.error_expected(pcx, "`return`");
        }

        self.expect(pcx, SyntaxKind::RBrace);
        self.builder.finish_node();
    }

    /// VarDecls → "var" VarDecl ("," VarDecl)* ";"
    fn bump_var_decls(&mut self, pcx: &ParseContext) {
        self.builder.start_node(SyntaxKind::VarDecls.into());
        self.bump(pcx);

        loop {
            if self.at(pcx, SyntaxKind::Ident) {
                self.bump_wrapped(pcx, SyntaxKind::VarDecl);
            } else {
                self.error_expected(pcx, "variable name");
                break;
            }

            if self.maybe_bump_kind(pcx, SyntaxKind::Comma).is_none() {
                break;
            }
        }

        self.expect(pcx, SyntaxKind::Semi);
        self.builder.finish_node();
    }

    /// ReturnStmt → "return" Expr ";"
    fn bump_return(&mut self, pcx: &ParseContext) {
        self.builder.start_node(SyntaxKind::ReturnStmt.into());
        self.bump(pcx);
        self.bump_expr(pcx);
        self.expect(pcx, SyntaxKind::Semi);
        self.builder.finish_node();
    }
}

/// Statements
impl ParseState {
    fn bump_stmt(&mut self, pcx: &ParseContext) {
        let tk = match self.peek(pcx) {
            Some(tk) => *tk,
            None => {
                self.error_expected(pcx, "statement");
                return;
            }
        };

        match tk.kind {
            SyntaxKind::OutputKw => {
                self.builder.start_node(SyntaxKind::OutputStmt.into());
                self.bump(pcx);
                self.bump_expr(pcx);
                self.expect(pcx, SyntaxKind::Semi);
                self.builder.finish_node();
            }
            SyntaxKind::IfKw => {
                self.builder.start_node(SyntaxKind::IfStmt.into());
                self.bump(pcx);
                self.bump_guard(pcx);
                self.bump_stmt(pcx);

                if self.at(pcx, SyntaxKind::ElseKw) {
                    self.builder.start_node(SyntaxKind::ElseBranch.into());
                    self.bump(pcx);
                    self.bump_stmt(pcx);
                    self.builder.finish_node();
                }

                self.builder.finish_node();
            }
            SyntaxKind::WhileKw => {
                self.builder.start_node(SyntaxKind::WhileStmt.into());
                self.bump(pcx);
                self.bump_guard(pcx);
                self.bump_stmt(pcx);
                self.builder.finish_node();
            }
            SyntaxKind::LBrace => {
                self.builder.start_node(SyntaxKind::BlockStmt.into());
                self.bump(pcx);

                while let Some(tk) = self.peek(pcx) {
                    if tk.kind == SyntaxKind::RBrace {
                        break;
                    }
                    self.bump_stmt(pcx);
                }

                self.expect(pcx, SyntaxKind::RBrace);
                self.builder.finish_node();
            }
            SyntaxKind::ReturnKw => {
                // parse it anyway so that the rest of the body is not ruined
                self.errs.push(ParseError::MisplacedReturn { span: tk.span });
                self.bump_return(pcx);
            }
            _ if Self::can_start_expr(tk.kind) => self.bump_assign(pcx),
            _ => {
                self.errs.push(ParseError::UnexpectedToken {
                    expected: "statement".to_string(),
                    found: tk,
                });
                self.bump(pcx);
            }
        }
    }

    /// "(" Expr ")"
    fn bump_guard(&mut self, pcx: &ParseContext) {
        self.expect(pcx, SyntaxKind::LParen);
        self.bump_expr(pcx);
        self.expect(pcx, SyntaxKind::RParen);
    }

    /// AssignStmt → Expr "=" Expr ";"
    ///
    /// The target expression is validated on lowering.
    fn bump_assign(&mut self, pcx: &ParseContext) {
        let checkpoint = self.builder.checkpoint();
        self.bump_expr(pcx);

        self.builder
            .start_node_at(checkpoint, SyntaxKind::AssignStmt.into());

        if self.expect(pcx, SyntaxKind::Eq).is_some() {
            self.bump_expr(pcx);
        }

        self.expect(pcx, SyntaxKind::Semi);
        self.builder.finish_node();
    }
}

/// Expressions
impl ParseState {
    fn can_start_expr(kind: SyntaxKind) -> bool {
        matches!(
            kind,
            SyntaxKind::Num
                | SyntaxKind::Ident
                | SyntaxKind::InputKw
                | SyntaxKind::NullKw
                | SyntaxKind::AllocKw
                | SyntaxKind::LParen
                | SyntaxKind::LBrace
                | SyntaxKind::Star
                | SyntaxKind::Amp
                | SyntaxKind::Minus
        )
    }

    fn bump_expr(&mut self, pcx: &ParseContext) {
        self.bump_bin_expr(pcx, 0);
    }

    /// Left-associative binary operators, one precedence level per call
    fn bump_bin_expr(&mut self, pcx: &ParseContext, level: usize) {
        if level == BIN_OPS.len() {
            self.bump_prefix_expr(pcx);
            return;
        }

        let checkpoint = self.builder.checkpoint();
        self.bump_bin_expr(pcx, level + 1);

        while let Some(tk) = self.peek(pcx) {
            if !BIN_OPS[level].contains(&tk.kind) {
                break;
            }

            self.builder
                .start_node_at(checkpoint, SyntaxKind::BinExpr.into());
            self.bump(pcx);
            self.bump_bin_expr(pcx, level + 1);
            self.builder.finish_node();
        }
    }

    /// Prefix → ("*" | "&" | "-") Prefix | "alloc" Prefix | Postfix
    fn bump_prefix_expr(&mut self, pcx: &ParseContext) {
        let kind = match self.peek(pcx) {
            Some(tk) => tk.kind,
            None => {
                self.error_expected(pcx, "expression");
                return;
            }
        };

        let node_kind = match kind {
            SyntaxKind::Star | SyntaxKind::Amp | SyntaxKind::Minus => SyntaxKind::PrefixExpr,
            SyntaxKind::AllocKw => SyntaxKind::AllocExpr,
            _ => {
                self.bump_postfix_expr(pcx);
                return;
            }
        };

        self.builder.start_node(node_kind.into());
        self.bump(pcx);
        self.bump_prefix_expr(pcx);
        self.builder.finish_node();
    }

    /// Postfix → Primary ("(" Args ")" | "." Ident)*
    fn bump_postfix_expr(&mut self, pcx: &ParseContext) {
        let checkpoint = self.builder.checkpoint();

        if self.bump_primary_expr(pcx).is_none() {
            return;
        }

        loop {
            if self.at(pcx, SyntaxKind::LParen) {
                self.builder
                    .start_node_at(checkpoint, SyntaxKind::CallExpr.into());
                self.bump_arg_list(pcx);
                self.builder.finish_node();
            } else if self.at(pcx, SyntaxKind::Dot) {
                self.builder
                    .start_node_at(checkpoint, SyntaxKind::FieldExpr.into());
                self.bump(pcx);
                self.expect(pcx, SyntaxKind::Ident);
                self.builder.finish_node();
            } else {
                break;
            }
        }
    }

    /// ArgList → "(" (Expr ("," Expr)*)? ")"
    fn bump_arg_list(&mut self, pcx: &ParseContext) {
        self.builder.start_node(SyntaxKind::ArgList.into());
        self.bump(pcx);

        if !self.at(pcx, SyntaxKind::RParen) {
            loop {
                self.bump_expr(pcx);
                if self.maybe_bump_kind(pcx, SyntaxKind::Comma).is_none() {
                    break;
                }
            }
        }

        self.expect(pcx, SyntaxKind::RParen);
        self.builder.finish_node();
    }

    /// Primary → Num | Ident | "input" | "null" | "(" Expr ")" | Record
    ///
    /// Returns `None` if nothing was consumed.
    fn bump_primary_expr(&mut self, pcx: &ParseContext) -> Option<()> {
        let kind = match self.peek(pcx) {
            Some(tk) => tk.kind,
            None => {
                self.error_expected(pcx, "expression");
                return None;
            }
        };

        match kind {
            SyntaxKind::Num => self.bump_wrapped(pcx, SyntaxKind::NumExpr),
            SyntaxKind::Ident => self.bump_wrapped(pcx, SyntaxKind::NameExpr),
            SyntaxKind::InputKw => self.bump_wrapped(pcx, SyntaxKind::InputExpr),
            SyntaxKind::NullKw => self.bump_wrapped(pcx, SyntaxKind::NullExpr),
            SyntaxKind::LParen => {
                self.builder.start_node(SyntaxKind::ParenExpr.into());
                self.bump(pcx);
                self.bump_expr(pcx);
                self.expect(pcx, SyntaxKind::RParen);
                self.builder.finish_node();
            }
            SyntaxKind::LBrace => self.bump_record_expr(pcx),
            _ => {
                self.error_expected(pcx, "expression");
                return None;
            }
        }

        Some(())
    }

    /// Record → "{" (RecordField ("," RecordField)*)? "}"
    ///
    /// RecordField → Ident ":" Expr
    fn bump_record_expr(&mut self, pcx: &ParseContext) {
        self.builder.start_node(SyntaxKind::RecordExpr.into());
        self.bump(pcx);

        if !self.at(pcx, SyntaxKind::RBrace) {
            loop {
                self.builder.start_node(SyntaxKind::RecordField.into());
                self.expect(pcx, SyntaxKind::Ident);
                self.expect(pcx, SyntaxKind::Colon);
                self.bump_expr(pcx);
                self.builder.finish_node();

                if self.maybe_bump_kind(pcx, SyntaxKind::Comma).is_none() {
                    break;
                }
            }
        }

        self.expect(pcx, SyntaxKind::RBrace);
        self.builder.finish_node();
    }
}
