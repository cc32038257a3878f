/*!
Type inference for TIP, a tiny imperative language with pointers, records and first-class
functions

# Pipeline

1. [`syntax`]: source text → tokens → CST → AST
2. [`ir`]: AST → arenas of declarations, expressions and statements, resolved against the
   declarations in scope
3. [`ir::ty`]: unification-based type inference over the lowered program

[`check_str`] runs all of them, stopping at the first phase that reports errors.
*/

pub mod ir;
pub mod syntax;
pub mod util;

use std::fmt::Write as _;

use base::{span::Span, InputFile};
use la_arena::Idx;

use crate::{
    ir::{
        body::{decl::Decl, expr::Expr, ProgramData, ProgramSpans},
        field::FieldTable,
        lower::{self, LowerError},
        resolve::{self, Resolution, ResolveError},
        ty::{self, ty_diag::TypeError, InferCtx, Type, TypeTable},
    },
    syntax::{
        ast,
        cst::{lex::LexError, ParseError},
    },
    util::diag::{self, Diagnostic},
};

define_enum! {
    /// Diagnostic from any phase
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub AnyDiagnostic = LexError | ParseError | LowerError | ResolveError | TypeError;
}

impl Diagnostic for AnyDiagnostic {
    fn code(&self) -> &'static str {
        match self {
            Self::LexError(x) => x.code(),
            Self::ParseError(x) => x.code(),
            Self::LowerError(x) => x.code(),
            Self::ResolveError(x) => x.code(),
            Self::TypeError(x) => x.code(),
        }
    }

    fn severity(&self) -> diag::Severity {
        match self {
            Self::LexError(x) => x.severity(),
            Self::ParseError(x) => x.severity(),
            Self::LowerError(x) => x.severity(),
            Self::ResolveError(x) => x.severity(),
            Self::TypeError(x) => x.severity(),
        }
    }

    fn msg(&self) -> String {
        match self {
            Self::LexError(x) => x.msg(),
            Self::ParseError(x) => x.msg(),
            Self::LowerError(x) => x.msg(),
            Self::ResolveError(x) => x.msg(),
            Self::TypeError(x) => x.msg(),
        }
    }

    fn span(&self) -> Span {
        match self {
            Self::LexError(x) => Diagnostic::span(x),
            Self::ParseError(x) => Diagnostic::span(x),
            Self::LowerError(x) => Diagnostic::span(x),
            Self::ResolveError(x) => Diagnostic::span(x),
            Self::TypeError(x) => Diagnostic::span(x),
        }
    }

    fn reason(&self) -> String {
        match self {
            Self::LexError(x) => x.reason(),
            Self::ParseError(x) => x.reason(),
            Self::LowerError(x) => x.reason(),
            Self::ResolveError(x) => x.reason(),
            Self::TypeError(x) => x.reason(),
        }
    }
}

/// Failed check: the source file and the diagnostics of the first failing phase
#[derive(Debug)]
pub struct Failure {
    pub input_file: InputFile,
    pub diags: Vec<AnyDiagnostic>,
}

impl Failure {
    /// Renders every diagnostic against the source file
    pub fn render(&self) -> String {
        let mut s = String::new();
        for d in &self.diags {
            // writing into a `String` never fails
            let _ = writeln!(s, "{}", d.render(&self.input_file));
        }
        s
    }
}

/// Runs the whole pipeline on a source text
pub fn check_str(name: &str, src: &str) -> Result<Analysis, Vec<AnyDiagnostic>> {
    self::check_file(InputFile::new(name, src)).map_err(|failure| failure.diags)
}

/// Runs the whole pipeline, keeping the source file for rendering diagnostics
pub fn check_file(input_file: InputFile) -> Result<Analysis, Failure> {
    macro_rules! bail {
        ($errs:expr) => {{
            let diags = $errs
                .into_iter()
                .map(AnyDiagnostic::from)
                .collect::<Vec<_>>();
            log::debug!("{} error(s) in `{}`", diags.len(), input_file.name());
            return Err(Failure { input_file, diags });
        }};
    }

    let parse = ast::parse(input_file.source_text());
    if parse.has_errors() {
        let mut diags = Vec::new();
        diags.extend(parse.lex_errs.into_iter().map(AnyDiagnostic::from));
        diags.extend(parse.parse_errs.into_iter().map(AnyDiagnostic::from));
        bail!(diags);
    }

    let (program, spans, lower_errs) = lower::lower(&parse.doc);
    let (resolution, resolve_errs) = resolve::resolve(&program, &spans);
    if !lower_errs.is_empty() || !resolve_errs.is_empty() {
        let mut diags = Vec::new();
        diags.extend(lower_errs.into_iter().map(AnyDiagnostic::from));
        diags.extend(resolve_errs.into_iter().map(AnyDiagnostic::from));
        bail!(diags);
    }

    let fields = FieldTable::collect(&program);

    let cx = InferCtx {
        program: &program,
        spans: &spans,
        resolution: &resolution,
        fields: &fields,
    };

    let types = match ty::infer_types(&cx) {
        Ok(types) => types,
        Err(err) => bail!([err]),
    };

    Ok(Analysis {
        input_file,
        program,
        spans,
        resolution,
        fields,
        types,
    })
}

/// Well-typed program along with the inference result
#[derive(Debug)]
pub struct Analysis {
    input_file: InputFile,
    program: ProgramData,
    spans: ProgramSpans,
    resolution: Resolution,
    fields: FieldTable,
    types: TypeTable,
}

impl Analysis {
    pub fn input_file(&self) -> &InputFile {
        &self.input_file
    }

    pub fn program(&self) -> &ProgramData {
        &self.program
    }

    pub fn spans(&self) -> &ProgramSpans {
        &self.spans
    }

    pub fn resolution(&self) -> &Resolution {
        &self.resolution
    }

    pub fn fields(&self) -> &FieldTable {
        &self.fields
    }

    pub fn types(&self) -> &TypeTable {
        &self.types
    }

    /// Type of the first declaration with the name, printed
    pub fn decl_type_str(&self, name: &str) -> Option<String> {
        let (decl, _) = self
            .program
            .decls
            .iter()
            .find(|(_, data)| data.name.as_str() == name)?;
        self.decl_type_str_of(decl)
    }

    fn decl_type_str_of(&self, decl: Idx<Decl>) -> Option<String> {
        self.types
            .decl(decl)
            .map(|ty| ty.display(&self.fields).to_string())
    }

    /// Source text of an expression
    pub fn expr_text(&self, expr: Idx<Expr>) -> &str {
        self.spans.expr(expr).slice(self.input_file.source_text())
    }

    /// `[[name]] = type` for each declaration in source order
    pub fn render_decls(&self) -> String {
        let mut s = String::new();

        for (decl, data) in self.program.decls.iter() {
            if let Some(ty) = self.decl_type_str_of(decl) {
                let _ = writeln!(s, "[[{}]] = {}", data.name, ty);
            }
        }

        s
    }

    /// `[[expr]] = type` for each typed expression in lowering order
    pub fn render_exprs(&self) -> String {
        let mut s = String::new();

        for (expr, _) in self.program.exprs.iter() {
            if let Some(ty) = self.types.expr(expr) {
                let _ = writeln!(s, "[[{}]] = {}", self.expr_text(expr), ty.display(&self.fields));
            }
        }

        s
    }

    /// Closed type of an expression, looking through identifiers
    pub fn expr_type(&self, expr: Idx<Expr>) -> Option<&Type> {
        match &self.program.exprs[expr] {
            Expr::Ident(_) => self.types.decl(self.resolution.get(expr)?),
            _ => self.types.expr(expr),
        }
    }
}
