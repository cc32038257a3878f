//! Abstract syntax tree, typed tree layered on top of CST
//!
//! All AST nodes have the same internal structure, i.e, CST. As a result, AST nodes are just
//! wrappers around CST nodes. Each component is lazily retrieved via accessors traversing the
//! internal CST.

use base::span::Span;

use crate::syntax::cst::{
    self,
    lex::{self, LexError},
    ParseError, SyntaxKind, SyntaxNode, SyntaxToken,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseResult {
    pub doc: Document,
    pub lex_errs: Vec<LexError>,
    pub parse_errs: Vec<ParseError>,
}

impl ParseResult {
    pub fn has_errors(&self) -> bool {
        !self.lex_errs.is_empty() || !self.parse_errs.is_empty()
    }
}

/// Source text → tokens → CST → AST
pub fn parse(src: &str) -> ParseResult {
    let (tks, lex_errs) = lex::from_str(src);
    let (root, parse_errs) = cst::parse(src, &tks);

    ParseResult {
        doc: Document { syn: root },
        lex_errs,
        parse_errs,
    }
}

/// Span of the node without surrounding trivia
pub fn node_span(syn: &SyntaxNode) -> Span {
    let mut tks = syn
        .descendants_with_tokens()
        .filter_map(|elem| elem.into_token())
        .filter(|tk| !tk.kind().is_trivia());

    let first = match tks.next() {
        Some(tk) => tk,
        None => return Span::from_rowan_range(rowan::TextRange::empty(syn.text_range().start())),
    };

    let last = tks.last().unwrap_or_else(|| first.clone());
    Span::from_rowan_range(first.text_range().cover(last.text_range()))
}

pub fn token_span(tk: &SyntaxToken) -> Span {
    Span::from_rowan_range(tk.text_range())
}

/// Semantic node casted from syntax node
pub trait AstNode: Sized {
    fn can_cast(kind: SyntaxKind) -> bool;
    fn cast_node(syn: SyntaxNode) -> Option<Self>;
    fn syntax(&self) -> &SyntaxNode;

    fn span(&self) -> Span {
        self::node_span(self.syntax())
    }
}

macro_rules! def_node {
    (
        $(
            $( #[$meta:meta] )*
                $ty:ident: $pred:expr ;
        )*
    ) => {
        $(
            #[derive(Debug, Clone, PartialEq, Eq, Hash)]
            $( #[$meta] )*
            pub struct $ty {
                pub(crate) syn: SyntaxNode,
            }

            impl AstNode for $ty {
                fn can_cast(kind: SyntaxKind) -> bool {
                    ($pred)(kind)
                }

                fn cast_node(syn: SyntaxNode) -> Option<Self> {
                    if Self::can_cast(syn.kind()) {
                        Some(Self { syn })
                    } else {
                        None
                    }
                }

                fn syntax(&self) -> &SyntaxNode {
                    &self.syn
                }
            }
        )*
    };
}

/// Defines a node that wraps any of the given node kinds, along with an enum view to it
macro_rules! transparent_node_wrapper {
    (
        $( #[$meta:meta] )*
        $ty:ident;
        $( #[$kind_meta:meta] )*
        $kind:ident = $( $var:ident )|* ;
    ) => {
        def_node!{
            $( #[$meta] )*
            $ty: |kind| $( $var::can_cast(kind) )||* ;
        }

        impl $ty {
            pub fn kind(&self) -> $kind {
                let node = self.syn.clone();
                None
                    $(
                        .or_else(|| $var::cast_node(node.clone()).map($kind::$var))
                    )*
                    .unwrap_or_else(|| unreachable!("can't be casted as {}: {:?}", stringify!($kind), node))
            }
        }

        #[derive(Debug, Clone, PartialEq, Eq)]
        $( #[$kind_meta] )*
        pub enum $kind {
            $($var($var),)*
        }

        $(
            impl From<$var> for $kind {
                fn from(v: $var) -> Self {
                    Self::$var(v)
                }
            }
        )*
    };
}

fn first_child<N: AstNode>(syn: &SyntaxNode) -> Option<N> {
    syn.children().find_map(N::cast_node)
}

fn nth_child<N: AstNode>(syn: &SyntaxNode, n: usize) -> Option<N> {
    syn.children().filter_map(N::cast_node).nth(n)
}

/// Direct child token of the kind
fn child_tk(syn: &SyntaxNode, kind: SyntaxKind) -> Option<SyntaxToken> {
    syn.children_with_tokens()
        .filter_map(|elem| elem.into_token())
        .find(|tk| tk.kind() == kind)
}

/// AST of a file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub(crate) syn: SyntaxNode,
}

impl Document {
    pub fn from_root(syn: SyntaxNode) -> Option<Self> {
        if syn.kind() == SyntaxKind::ROOT {
            Some(Self { syn })
        } else {
            None
        }
    }

    pub fn syntax(&self) -> &SyntaxNode {
        &self.syn
    }

    pub fn funs(&self) -> impl Iterator<Item = Fun> {
        self.syn.children().filter_map(Fun::cast_node)
    }
}

// ----------------------------------------
// Items
// ----------------------------------------

def_node!(
    /// `name(params) { body }`
    Fun: |kind| matches!(kind, SyntaxKind::Fun);

    /// Function parameters
    Params: |kind| matches!(kind, SyntaxKind::Params);

    /// A single function parameter
    Param: |kind| matches!(kind, SyntaxKind::Param);

    /// Function body
    Body: |kind| matches!(kind, SyntaxKind::Body);

    /// `var x, y;`
    VarDecls: |kind| matches!(kind, SyntaxKind::VarDecls);

    /// A single local variable
    VarDecl: |kind| matches!(kind, SyntaxKind::VarDecl);
);

impl Fun {
    pub fn name_tk(&self) -> Option<SyntaxToken> {
        self::child_tk(&self.syn, SyntaxKind::Ident)
    }

    pub fn params(&self) -> Option<Params> {
        self::first_child(&self.syn)
    }

    pub fn body(&self) -> Option<Body> {
        self::first_child(&self.syn)
    }
}

impl Params {
    pub fn params(&self) -> impl Iterator<Item = Param> {
        self.syn.children().filter_map(Param::cast_node)
    }
}

impl Param {
    pub fn name_tk(&self) -> Option<SyntaxToken> {
        self::child_tk(&self.syn, SyntaxKind::Ident)
    }
}

impl Body {
    pub fn var_decls(&self) -> impl Iterator<Item = VarDecl> {
        self.syn
            .children()
            .filter_map(VarDecls::cast_node)
            .flat_map(|decls| decls.decls().collect::<Vec<_>>())
    }

    /// Statements before the `return`
    pub fn stmts(&self) -> impl Iterator<Item = Stmt> {
        self.syn
            .children()
            .filter_map(Stmt::cast_node)
            .filter(|stmt| stmt.syn.kind() != SyntaxKind::ReturnStmt)
    }

    pub fn ret(&self) -> Option<ReturnStmt> {
        self::first_child(&self.syn)
    }
}

impl VarDecls {
    pub fn decls(&self) -> impl Iterator<Item = VarDecl> {
        self.syn.children().filter_map(VarDecl::cast_node)
    }
}

impl VarDecl {
    pub fn name_tk(&self) -> Option<SyntaxToken> {
        self::child_tk(&self.syn, SyntaxKind::Ident)
    }
}

// ----------------------------------------
// Statements
// ----------------------------------------

transparent_node_wrapper!(
    /// Statement node (transparent wrapper around other nodes)
    Stmt;
    /// View to the [`Stmt`]
    StmtKind = AssignStmt | OutputStmt | IfStmt | WhileStmt | BlockStmt | ReturnStmt;
);

def_node!(
    /// `lhs = rhs;`
    AssignStmt: |kind| matches!(kind, SyntaxKind::AssignStmt);
    OutputStmt: |kind| matches!(kind, SyntaxKind::OutputStmt);
    IfStmt: |kind| matches!(kind, SyntaxKind::IfStmt);
    ElseBranch: |kind| matches!(kind, SyntaxKind::ElseBranch);
    WhileStmt: |kind| matches!(kind, SyntaxKind::WhileStmt);
    BlockStmt: |kind| matches!(kind, SyntaxKind::BlockStmt);
    ReturnStmt: |kind| matches!(kind, SyntaxKind::ReturnStmt);
);

impl AssignStmt {
    pub fn lhs(&self) -> Option<Expr> {
        self::nth_child(&self.syn, 0)
    }

    pub fn rhs(&self) -> Option<Expr> {
        self::nth_child(&self.syn, 1)
    }
}

impl OutputStmt {
    pub fn expr(&self) -> Option<Expr> {
        self::first_child(&self.syn)
    }
}

impl IfStmt {
    pub fn cond(&self) -> Option<Expr> {
        self::first_child(&self.syn)
    }

    pub fn then_stmt(&self) -> Option<Stmt> {
        self::first_child(&self.syn)
    }

    pub fn else_stmt(&self) -> Option<Stmt> {
        self::first_child::<ElseBranch>(&self.syn).and_then(|e| self::first_child(&e.syn))
    }
}

impl WhileStmt {
    pub fn cond(&self) -> Option<Expr> {
        self::first_child(&self.syn)
    }

    pub fn body(&self) -> Option<Stmt> {
        self::first_child(&self.syn)
    }
}

impl BlockStmt {
    pub fn stmts(&self) -> impl Iterator<Item = Stmt> {
        self.syn.children().filter_map(Stmt::cast_node)
    }
}

impl ReturnStmt {
    pub fn expr(&self) -> Option<Expr> {
        self::first_child(&self.syn)
    }
}

// ----------------------------------------
// Expressions
// ----------------------------------------

transparent_node_wrapper!(
    /// Expression node (transparent wrapper around other nodes)
    Expr;
    /// View to the [`Expr`]
    ExprKind = NumExpr
        | NameExpr
        | InputExpr
        | NullExpr
        | ParenExpr
        | BinExpr
        | PrefixExpr
        | AllocExpr
        | CallExpr
        | RecordExpr
        | FieldExpr;
);

def_node!(
    NumExpr: |kind| matches!(kind, SyntaxKind::NumExpr);
    NameExpr: |kind| matches!(kind, SyntaxKind::NameExpr);
    InputExpr: |kind| matches!(kind, SyntaxKind::InputExpr);
    NullExpr: |kind| matches!(kind, SyntaxKind::NullExpr);
    ParenExpr: |kind| matches!(kind, SyntaxKind::ParenExpr);
    BinExpr: |kind| matches!(kind, SyntaxKind::BinExpr);
    /// `*e`, `&e` or `-e`
    PrefixExpr: |kind| matches!(kind, SyntaxKind::PrefixExpr);
    AllocExpr: |kind| matches!(kind, SyntaxKind::AllocExpr);
    CallExpr: |kind| matches!(kind, SyntaxKind::CallExpr);
    ArgList: |kind| matches!(kind, SyntaxKind::ArgList);
    RecordExpr: |kind| matches!(kind, SyntaxKind::RecordExpr);
    RecordField: |kind| matches!(kind, SyntaxKind::RecordField);
    /// `e.f`
    FieldExpr: |kind| matches!(kind, SyntaxKind::FieldExpr);
);

impl NumExpr {
    pub fn token(&self) -> Option<SyntaxToken> {
        self::child_tk(&self.syn, SyntaxKind::Num)
    }
}

impl NameExpr {
    pub fn token(&self) -> Option<SyntaxToken> {
        self::child_tk(&self.syn, SyntaxKind::Ident)
    }
}

impl ParenExpr {
    pub fn expr(&self) -> Option<Expr> {
        self::first_child(&self.syn)
    }
}

impl BinExpr {
    pub fn lhs(&self) -> Option<Expr> {
        self::nth_child(&self.syn, 0)
    }

    pub fn op_tk(&self) -> Option<SyntaxToken> {
        self.syn
            .children_with_tokens()
            .filter_map(|elem| elem.into_token())
            .find(|tk| tk.kind().is_bin_op())
    }

    pub fn rhs(&self) -> Option<Expr> {
        self::nth_child(&self.syn, 1)
    }
}

impl PrefixExpr {
    pub fn op_tk(&self) -> Option<SyntaxToken> {
        self.syn
            .children_with_tokens()
            .filter_map(|elem| elem.into_token())
            .find(|tk| !tk.kind().is_trivia())
    }

    pub fn expr(&self) -> Option<Expr> {
        self::first_child(&self.syn)
    }
}

impl AllocExpr {
    pub fn expr(&self) -> Option<Expr> {
        self::first_child(&self.syn)
    }
}

impl CallExpr {
    pub fn callee(&self) -> Option<Expr> {
        self::first_child(&self.syn)
    }

    pub fn args(&self) -> impl Iterator<Item = Expr> {
        self::first_child::<ArgList>(&self.syn)
            .into_iter()
            .flat_map(|args| args.syn.children().filter_map(Expr::cast_node).collect::<Vec<_>>())
    }
}

impl RecordExpr {
    pub fn fields(&self) -> impl Iterator<Item = RecordField> {
        self.syn.children().filter_map(RecordField::cast_node)
    }
}

impl RecordField {
    pub fn name_tk(&self) -> Option<SyntaxToken> {
        self::child_tk(&self.syn, SyntaxKind::Ident)
    }

    pub fn expr(&self) -> Option<Expr> {
        self::first_child(&self.syn)
    }
}

impl FieldExpr {
    pub fn base(&self) -> Option<Expr> {
        self::first_child(&self.syn)
    }

    pub fn field_tk(&self) -> Option<SyntaxToken> {
        self::child_tk(&self.syn, SyntaxKind::Ident)
    }
}
