//! Lexer / tokenizer

use base::span::Span;
use thiserror::Error;

use crate::syntax::cst::SyntaxKind;

/// Text span with syntactic kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Token {
    pub kind: SyntaxKind,
    pub span: Span,
}

impl Token {
    pub fn slice<'s>(&self, src: &'s str) -> &'s str {
        self.span.slice(src)
    }
}

/// Lexical error type
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LexError {
    #[error("unknown character")]
    UnknownChar { span: Span },
    #[error("unterminated block comment")]
    UnterminatedComment { span: Span },
}

impl LexError {
    pub fn span(&self) -> Span {
        match self {
            LexError::UnknownChar { span } | LexError::UnterminatedComment { span } => *span,
        }
    }
}

/// Converts text into tokens. It doesn't fail even if the given text has wrong syntax.
pub fn from_str(src: &str) -> (Vec<Token>, Vec<LexError>) {
    let lex = Lexer {
        src,
        sp: Span::new(0u32, 0u32),
        tks: vec![],
        errs: vec![],
    };
    lex.run()
}

/// Stateful lexer that converts given string into simple [`Token`] s
#[derive(Debug)]
struct Lexer<'s> {
    /// We mostly treat the UTF-8 source string as bytes, since every meaningful character is ASCII.
    /// Non-ASCII characters are consumed as a whole so that spans stay on char boundaries.
    src: &'s str,
    sp: Span,
    tks: Vec<Token>,
    errs: Vec<LexError>,
}

/// "Whitespace" = trivia
fn is_ws(c: u8) -> bool {
    matches!(c, b' ' | b'\n' | b'\t' | b'\r')
}

fn is_digit(c: u8) -> bool {
    c.is_ascii_digit()
}

fn is_ident_start(c: u8) -> bool {
    c.is_ascii_alphabetic() || c == b'_'
}

fn is_ident_body(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'_'
}

/// Lexing utilities
impl<'s> Lexer<'s> {
    fn bytes(&self) -> &'s [u8] {
        self.src.as_bytes()
    }

    fn peek_n(&self, n: usize) -> Option<u8> {
        self.bytes().get(self.sp.end.into_usize() + n).copied()
    }

    fn consume_span(&mut self) -> Span {
        let sp = self.sp;
        self.sp.start = self.sp.end;
        sp
    }

    fn consume_span_as(&mut self, kind: SyntaxKind) -> Token {
        let sp = self.consume_span();
        Token { kind, span: sp }
    }

    fn advance_if(&mut self, p: impl Fn(u8) -> bool) -> Option<()> {
        let peek = self.peek_n(0)?;

        if p(peek) {
            self.sp.end += 1u32;
            Some(())
        } else {
            None
        }
    }

    /// The predicate returns if we should continue scanning reading a byte
    fn advance_while(&mut self, p: impl Fn(u8) -> bool) {
        while let Some(peek) = self.peek_n(0) {
            if !p(peek) {
                return;
            }

            self.sp.end += 1u32;
        }
    }
}

macro_rules! apply_syntax {
    ($obj:ident, $syn:tt) => {
        if let Some(tk) = $obj.$syn() {
            $obj.tks.push(tk);
            return;
        }
    };
    ($obj:ident, $($syn:tt),* $(,)?) => {
        $(apply_syntax!($obj, $syn);)*
    };
}

impl<'s> Lexer<'s> {
    pub fn run(mut self) -> (Vec<Token>, Vec<LexError>) {
        while self.sp.start.into_usize() < self.src.len() {
            self.process_forward();
        }

        (self.tks, self.errs)
    }

    /// Processes one token and stores it in `self.tks`
    fn process_forward(&mut self) {
        apply_syntax!(
            self,
            lex_comment,
            lex_ws,
            lex_symbol,
            lex_num,
            lex_ident_or_kwd,
        );

        let tk = self.lex_unknown();
        self.tks.push(tk);
    }
}

/// Syntax utilities
impl<'s> Lexer<'s> {
    /// Lexes tokens in syntax `Start Body*`
    fn lex_syntax(
        &mut self,
        start: impl Fn(u8) -> bool,
        body: impl Fn(u8) -> bool,
        kind: SyntaxKind,
    ) -> Option<Token> {
        self.advance_if(start)?;
        self.advance_while(body);
        Some(self.consume_span_as(kind))
    }
}

/// Grammers (&mut self → Option<Token>)
impl<'s> Lexer<'s> {
    /// Trivia
    fn lex_ws(&mut self) -> Option<Token> {
        self.lex_syntax(self::is_ws, self::is_ws, SyntaxKind::Ws)
    }

    /// `// ..\n` or `/* .. */`
    fn lex_comment(&mut self) -> Option<Token> {
        if self.peek_n(0)? != b'/' {
            return None;
        }

        match self.peek_n(1)? {
            b'/' => {
                self.advance_while(|b| b != b'\n');
                Some(self.consume_span_as(SyntaxKind::Comment))
            }
            b'*' => {
                self.sp.end += 2u32;

                loop {
                    match (self.peek_n(0), self.peek_n(1)) {
                        (Some(b'*'), Some(b'/')) => {
                            self.sp.end += 2u32;
                            break;
                        }
                        (Some(_), _) => {
                            self.sp.end += 1u32;
                        }
                        (None, _) => {
                            self.errs
                                .push(LexError::UnterminatedComment { span: self.sp });
                            // allow non-terminated comment at EoF
                            break;
                        }
                    }
                }

                Some(self.consume_span_as(SyntaxKind::Comment))
            }
            _ => None,
        }
    }

    /// Punctuations and operators
    fn lex_symbol(&mut self) -> Option<Token> {
        let c = self.peek_n(0)?;

        let kind = match c {
            b'(' => SyntaxKind::LParen,
            b')' => SyntaxKind::RParen,
            b'{' => SyntaxKind::LBrace,
            b'}' => SyntaxKind::RBrace,
            b',' => SyntaxKind::Comma,
            b';' => SyntaxKind::Semi,
            b':' => SyntaxKind::Colon,
            b'.' => SyntaxKind::Dot,
            b'>' => SyntaxKind::Gt,
            b'+' => SyntaxKind::Plus,
            b'-' => SyntaxKind::Minus,
            b'*' => SyntaxKind::Star,
            b'/' => SyntaxKind::Slash,
            b'&' => SyntaxKind::Amp,
            b'=' => {
                if self.peek_n(1) == Some(b'=') {
                    self.sp.end += 2u32;
                    return Some(self.consume_span_as(SyntaxKind::EqEq));
                }
                SyntaxKind::Eq
            }
            _ => return None,
        };

        self.sp.end += 1u32;
        Some(self.consume_span_as(kind))
    }

    /// [0-9]+
    fn lex_num(&mut self) -> Option<Token> {
        self.lex_syntax(self::is_digit, self::is_digit, SyntaxKind::Num)
    }

    /// [a-zA-Z_][a-zA-Z0-9_]*
    fn lex_ident_or_kwd(&mut self) -> Option<Token> {
        let mut tk = self.lex_syntax(self::is_ident_start, self::is_ident_body, SyntaxKind::Ident)?;

        // overwrite keyword's syntax kind
        if let Some(kind) = to_kwd(tk.slice(self.src)) {
            tk.kind = kind;
        }

        return Some(tk);

        fn to_kwd(kwd: &str) -> Option<SyntaxKind> {
            Some(match kwd {
                "var" => SyntaxKind::VarKw,
                "return" => SyntaxKind::ReturnKw,
                "if" => SyntaxKind::IfKw,
                "else" => SyntaxKind::ElseKw,
                "while" => SyntaxKind::WhileKw,
                "output" => SyntaxKind::OutputKw,
                "input" => SyntaxKind::InputKw,
                "alloc" => SyntaxKind::AllocKw,
                "null" => SyntaxKind::NullKw,
                _ => return None,
            })
        }
    }

    /// Any other character. Consumes the whole UTF-8 sequence.
    fn lex_unknown(&mut self) -> Token {
        let rest = &self.src[self.sp.end.into_usize()..];
        let len = rest.chars().next().map_or(1, char::len_utf8);
        self.sp.end += len as u32;

        let tk = self.consume_span_as(SyntaxKind::Error);
        self.errs.push(LexError::UnknownChar { span: tk.span });
        tk
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn kinds(src: &str) -> Vec<SyntaxKind> {
        let (tks, errs) = from_str(src);
        assert!(errs.is_empty(), "{:?}", errs);
        tks.iter()
            .map(|tk| tk.kind)
            .filter(|k| !k.is_trivia())
            .collect()
    }

    #[test]
    fn keywords_and_operators() {
        use SyntaxKind::*;

        assert_eq!(
            kinds("x = alloc null; if (a == b) output *p;"),
            vec![
                Ident, Eq, AllocKw, NullKw, Semi, IfKw, LParen, Ident, EqEq, Ident, RParen,
                OutputKw, Star, Ident, Semi
            ]
        );
    }

    #[test]
    fn comments_are_trivia() {
        use SyntaxKind::*;

        assert_eq!(
            kinds("a // line\n/* block\n */ 12"),
            vec![Ident, Num]
        );
    }

    #[test]
    fn unknown_char_is_reported() {
        let (tks, errs) = from_str("x # y");
        assert_eq!(errs, vec![LexError::UnknownChar { span: Span::new(2u32, 3u32) }]);
        assert!(tks.iter().any(|tk| tk.kind == SyntaxKind::Error));
    }

    #[test]
    fn unterminated_comment() {
        let (_tks, errs) = from_str("x /* ..");
        assert!(matches!(errs[..], [LexError::UnterminatedComment { .. }]));
    }
}
