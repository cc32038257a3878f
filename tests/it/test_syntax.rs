//! Tests for `syntax` module.

use rowan::WalkEvent;

use tip::syntax::{
    ast::{self, AstNode, ExprKind, StmtKind},
    cst::{self, ParseError, SyntaxKind, SyntaxNode},
};

use crate::util::{self, Test, TestError};

/// Runs tests defined in the test case files
#[test]
fn cst() {
    let src = include_str!("test_cases/cst.txt");
    util::run_tests(src, runner)
}

fn runner(test: Test) -> Result<(), TestError> {
    let (tks, errs) = cst::lex::from_str(&test.code);
    assert!(errs.is_empty(), "{:?}", errs);

    let (cst, errs) = cst::parse(&test.code, &tks);

    if !errs.is_empty() {
        let s = errs
            .iter()
            .map(|e| format!("- {}", e))
            .collect::<Vec<_>>()
            .join("\n");
        panic!("Parse error:\n{}\nsource: {}", s, test.code);
    }

    // lossless
    assert_eq!(cst.text().to_string(), test.code);

    let cst_string = self::cst_display(&cst);
    test.result(&cst_string)
}

fn cst_display(cst: &SyntaxNode) -> String {
    let mut nest = 0;
    let mut lines = Vec::new();

    for ev in cst.preorder_with_tokens() {
        match ev {
            WalkEvent::Enter(elem) => {
                lines.push(format!(
                    "{}{:?}@{:?}",
                    "    ".repeat(nest),
                    elem.kind(),
                    elem.text_range()
                ));
                nest += 1;
            }
            WalkEvent::Leave(_) => {
                nest -= 1;
            }
        }
    }

    lines.join("\n")
}

#[test]
fn fun_accessors() {
    let src = r"f(a, b) {
    var x, y;
    var z;
    x = a;
    output b;
    return x;
}";

    let parse = ast::parse(src);
    assert!(!parse.has_errors(), "{:?}", parse.parse_errs);

    let funs = parse.doc.funs().collect::<Vec<_>>();
    assert_eq!(funs.len(), 1);

    let fun = &funs[0];
    assert_eq!(fun.name_tk().unwrap().text(), "f");

    let params = fun
        .params()
        .unwrap()
        .params()
        .map(|p| p.name_tk().unwrap().text().to_string())
        .collect::<Vec<_>>();
    assert_eq!(params, ["a", "b"]);

    let body = fun.body().unwrap();

    let locals = body
        .var_decls()
        .map(|d| d.name_tk().unwrap().text().to_string())
        .collect::<Vec<_>>();
    assert_eq!(locals, ["x", "y", "z"]);

    let stmts = body.stmts().collect::<Vec<_>>();
    assert_eq!(stmts.len(), 2);
    assert!(matches!(stmts[0].kind(), StmtKind::AssignStmt(_)));
    assert!(matches!(stmts[1].kind(), StmtKind::OutputStmt(_)));

    let ret = body.ret().unwrap().expr().unwrap();
    assert!(matches!(ret.kind(), ExprKind::NameExpr(_)));
    assert_eq!(ret.syntax().text().to_string(), "x");
}

#[test]
fn operator_precedence() {
    let src = "f() { return 1 + 2 * 3 == 7; }";

    let parse = ast::parse(src);
    assert!(!parse.has_errors(), "{:?}", parse.parse_errs);

    let fun = parse.doc.funs().next().unwrap();
    let ret = fun.body().unwrap().ret().unwrap().expr().unwrap();

    let eq = match ret.kind() {
        ExprKind::BinExpr(bin) => bin,
        _ => panic!("not a binary expression: {:?}", ret),
    };
    assert_eq!(eq.op_tk().unwrap().kind(), SyntaxKind::EqEq);

    let add = match eq.lhs().unwrap().kind() {
        ExprKind::BinExpr(bin) => bin,
        kind => panic!("not a binary expression: {:?}", kind),
    };
    assert_eq!(add.op_tk().unwrap().kind(), SyntaxKind::Plus);
    assert_eq!(add.span().slice(src), "1 + 2 * 3");

    match add.rhs().unwrap().kind() {
        ExprKind::BinExpr(mul) => assert_eq!(mul.op_tk().unwrap().kind(), SyntaxKind::Star),
        kind => panic!("not a binary expression: {:?}", kind),
    }
}

#[test]
fn missing_expression() {
    let src = "main() { x = ; return 0; }";
    let parse = ast::parse(src);

    assert!(parse.lex_errs.is_empty());
    assert_eq!(parse.parse_errs.len(), 1, "{:?}", parse.parse_errs);

    match &parse.parse_errs[0] {
        ParseError::UnexpectedToken { expected, found } => {
            assert_eq!(expected, "expression");
            assert_eq!(found.kind, SyntaxKind::Semi);
        }
        err => panic!("unexpected error: {:?}", err),
    }

    assert_eq!(
        parse.parse_errs[0].to_string(),
        "expected expression, found `;`"
    );
}

#[test]
fn missing_return() {
    let src = "main() { output 1; }";
    let parse = ast::parse(src);

    assert!(matches!(
        &parse.parse_errs[..],
        [ParseError::UnexpectedToken { expected, .. }] if expected == "`return`"
    ));
}

#[test]
fn unexpected_eof() {
    let src = "main() { return 0;";
    let parse = ast::parse(src);

    assert!(matches!(
        &parse.parse_errs[..],
        [ParseError::UnexpectedEof { .. }]
    ));
    assert_eq!(usize::from(parse.parse_errs[0].span().start), src.len());
}

#[test]
fn misplaced_return() {
    let src = "main() { if (1) return 1; return 2; }";
    let parse = ast::parse(src);

    assert!(matches!(
        &parse.parse_errs[..],
        [ParseError::MisplacedReturn { .. }]
    ));
    assert_eq!(parse.parse_errs[0].span().slice(src), "return");
}
