//! Concrete syntax tree
//!
//! `cst` is powered by [`rowan`]. It manages lossless structure of text, represented as a tree
//! (node) of untyped, homogeneous tokens.
//!
//! Semantic information is later added by casting the CST nodes to AST nodes.

pub mod lex;

mod parse;

#[doc(inline)]
pub use parse::{parse, ParseError};

/// Bridge to [`rowan`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Lang {}

impl rowan::Language for Lang {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        assert!(raw.0 <= SyntaxKind::ROOT as u16);
        unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}

/// Subtree. View to green tree (red tree) in words of "red-green tree"
pub type SyntaxNode = rowan::SyntaxNode<Lang>;

/// Leaf. View to green token (red token) in words of "red-green tree"
pub type SyntaxToken = rowan::SyntaxToken<Lang>;

/// Subtree or leaf: [`SyntaxNode`] | [`SyntaxToken`]
pub type SyntaxElement = rowan::SyntaxElement<Lang>;

pub use rowan::TextRange;

/// Syntactic kind of a tree element (a token or a node)
///
/// The `SyntaxKind` is shared by the lexer and the parser. The lexer only produces token kinds;
/// node kinds are introduced by the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u16)]
pub enum SyntaxKind {
    // ----------------------------------------
    // Tokens
    // ----------------------------------------
    Ws,
    /// `// ..` or `/* .. */`
    Comment,
    /// Decimal integer
    Num,
    Ident,
    /// Unknown character
    Error,
    VarKw,
    ReturnKw,
    IfKw,
    ElseKw,
    WhileKw,
    OutputKw,
    InputKw,
    AllocKw,
    NullKw,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `{`
    LBrace,
    /// `}`
    RBrace,
    /// `,`
    Comma,
    /// `;`
    Semi,
    /// `:`
    Colon,
    /// `.`
    Dot,
    /// `=`
    Eq,
    /// `==`
    EqEq,
    /// `>`
    Gt,
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `/`
    Slash,
    /// `&`
    Amp,
    // ----------------------------------------
    // Nodes (parser only, not used by lexer)
    // ----------------------------------------
    /// Function definition
    Fun,
    /// Function parameter list
    Params,
    /// A single function parameter
    Param,
    /// Function body
    Body,
    /// `var x, y;`
    VarDecls,
    /// A single local variable in `var` declarations
    VarDecl,
    AssignStmt,
    OutputStmt,
    IfStmt,
    /// `else <stmt>`
    ElseBranch,
    WhileStmt,
    BlockStmt,
    ReturnStmt,
    NumExpr,
    NameExpr,
    InputExpr,
    NullExpr,
    ParenExpr,
    BinExpr,
    /// `*e`, `&e` or `-e`
    PrefixExpr,
    AllocExpr,
    CallExpr,
    /// Call arguments
    ArgList,
    RecordExpr,
    /// `name: expr` in a record literal
    RecordField,
    FieldExpr,
    // ----------------------------------------
    /// Beginning of text
    ROOT,
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    fn from(kind: SyntaxKind) -> Self {
        Self(kind as u16)
    }
}

impl SyntaxKind {
    #[inline]
    pub fn is_trivia(self) -> bool {
        matches!(self, SyntaxKind::Ws | SyntaxKind::Comment)
    }

    /// Binary operator tokens
    pub fn is_bin_op(self) -> bool {
        matches!(
            self,
            SyntaxKind::EqEq
                | SyntaxKind::Gt
                | SyntaxKind::Plus
                | SyntaxKind::Minus
                | SyntaxKind::Star
                | SyntaxKind::Slash
        )
    }

    /// Human-readable description for parse errors
    pub fn describe(self) -> &'static str {
        match self {
            Self::Ws => "whitespace",
            Self::Comment => "comment",
            Self::Num => "number",
            Self::Ident => "identifier",
            Self::Error => "unknown character",
            Self::VarKw => "`var`",
            Self::ReturnKw => "`return`",
            Self::IfKw => "`if`",
            Self::ElseKw => "`else`",
            Self::WhileKw => "`while`",
            Self::OutputKw => "`output`",
            Self::InputKw => "`input`",
            Self::AllocKw => "`alloc`",
            Self::NullKw => "`null`",
            Self::LParen => "`(`",
            Self::RParen => "`)`",
            Self::LBrace => "`{`",
            Self::RBrace => "`}`",
            Self::Comma => "`,`",
            Self::Semi => "`;`",
            Self::Colon => "`:`",
            Self::Dot => "`.`",
            Self::Eq => "`=`",
            Self::EqEq => "`==`",
            Self::Gt => "`>`",
            Self::Plus => "`+`",
            Self::Minus => "`-`",
            Self::Star => "`*`",
            Self::Slash => "`/`",
            Self::Amp => "`&`",
            _ => "syntax node",
        }
    }
}
