//! Tests for type inference

use tip::{
    ir::ty::{ty_diag::TypeError, Type},
    util::diag::Diagnostic,
    AnyDiagnostic,
};

use crate::util::{self, Test, TestError};

/// Runs tests defined in the test case files
#[test]
fn types() {
    let src = include_str!("test_cases/types.txt");
    util::run_tests(src, runner)
}

fn runner(test: Test) -> Result<(), TestError> {
    let output = match tip::check_str("main.tip", &test.code) {
        Ok(analysis) => analysis.render_decls(),
        Err(diags) => self::diag_lines(&diags),
    };

    test.result(&output)
}

fn diag_lines(diags: &[AnyDiagnostic]) -> String {
    diags
        .iter()
        .map(|d| format!("{}: {}", d.code(), d.msg()))
        .collect::<Vec<_>>()
        .join("\n")
}

fn type_error(src: &str) -> TypeError {
    match tip::check_str("main.tip", src) {
        Ok(analysis) => panic!("no type error:\n{}", analysis.render_decls()),
        Err(diags) => match &diags[..] {
            [AnyDiagnostic::TypeError(err)] => err.clone(),
            _ => panic!("not a type error:\n{}", self::diag_lines(&diags)),
        },
    }
}

#[test]
fn conflict_names_both_types() {
    let src = r"main() {
    var x;
    x = 1;
    x = alloc x;
    return 0;
}";

    let err = self::type_error(src);

    assert_eq!(err.code(), "E0200");
    assert_eq!(err.to_string(), "mismatched types `int` and `&int`");
    assert_eq!(err.span().slice(src), "alloc x");

    match err {
        TypeError::UnificationConflict { lhs, rhs, .. } => {
            assert_eq!(lhs, Type::Int);
            assert_eq!(rhs, Type::Pointer(Box::new(Type::Int)));
        }
        _ => unreachable!(),
    }
}

#[test]
fn arity_mismatch() {
    let src = r"f(a, b) {
    return a + b;
}
main() {
    return f(1);
}";

    let err = self::type_error(src);

    assert!(matches!(err, TypeError::UnificationConflict { .. }));
    assert!(err.to_string().contains("`(int,int) -> int`"), "{}", err);
    assert_eq!(err.span().slice(src), "f(1)");
}

#[test]
fn int_is_not_a_record() {
    let src = r"main() {
    var x;
    x = 1;
    return x.f;
}";

    let err = self::type_error(src);
    assert!(matches!(err, TypeError::UnificationConflict { .. }));
    assert!(err.to_string().contains("`int`"), "{}", err);
}

#[test]
fn output_requires_int() {
    let src = r"main() {
    output null;
    return 0;
}";

    let err = self::type_error(src);
    assert!(matches!(err, TypeError::UnificationConflict { .. }));
}

#[test]
fn absent_field_read_is_rendered() {
    colored::control::set_override(false);

    let src = "main() {\n    var r;\n    r = {a: 1};\n    return r.b;\n}";
    let input_file = base::InputFile::new("main.tip", src);

    let failure = match tip::check_file(input_file) {
        Ok(_) => panic!("no error"),
        Err(failure) => failure,
    };

    assert_eq!(
        failure.render(),
        "error[E0210]: field `b` is absent
--> main.tip:4:12
  |
4 |     return r.b;
  |            ^^^ no record literal provides this field

"
    );
}

#[test]
fn lex_errors_come_first() {
    let src = "main() { return 1 $ 2; }";

    let diags = match tip::check_str("main.tip", src) {
        Ok(_) => panic!("no error"),
        Err(diags) => diags,
    };

    assert!(matches!(diags[0], AnyDiagnostic::LexError(_)));
    assert_eq!(diags[0].code(), "E0000");
    assert_eq!(diags[0].span().slice(src), "$");
}

#[test]
fn expression_types() {
    let src = "main() { var x; x = 1 + 2; return x; }";
    let analysis = tip::check_str("main.tip", src).unwrap();

    assert_eq!(
        analysis.render_exprs(),
        "[[1]] = int
[[2]] = int
[[1 + 2]] = int
"
    );

    // identifiers are typed through their declaration
    let fun = analysis.program().funs.iter().next().unwrap().1;
    assert_eq!(analysis.expr_type(fun.ret), Some(&Type::Int));
    assert_eq!(analysis.types().expr(fun.ret), None);
}

#[test]
fn deref_of_alloc_is_the_allocated_type() {
    let src = "main() { var x; x = 5; return *(alloc x); }";
    let analysis = tip::check_str("main.tip", src).unwrap();

    let exprs = analysis.render_exprs();
    let lines = exprs.lines().collect::<Vec<_>>();
    assert!(lines.contains(&"[[alloc x]] = &int"), "{}", exprs);
    assert!(lines.contains(&"[[*(alloc x)]] = int"), "{}", exprs);

    let fun = analysis.program().funs.iter().next().unwrap().1;
    assert_eq!(analysis.expr_type(fun.ret), Some(&Type::Int));
}

#[test]
fn record_width_is_program_wide() {
    let src = r"main() {
    var r, s;
    r = {z: 1, m: 2};
    s = {a: alloc 3};
    return r.q;
}";

    let err = self::type_error(src);
    assert!(matches!(err, TypeError::AbsentFieldRead { .. }));

    let src = r"main() {
    var r, s;
    r = {z: 1, m: 2};
    s = {a: alloc 3};
    return r.m;
}";

    let analysis = tip::check_str("main.tip", src).unwrap();
    let names = analysis
        .fields()
        .names()
        .map(|n| n.as_str())
        .collect::<Vec<_>>();
    assert_eq!(names, ["a", "m", "z"]);

    assert_eq!(
        analysis.decl_type_str("r").unwrap(),
        "{a:absent,m:int,z:int}"
    );
    assert_eq!(
        analysis.decl_type_str("s").unwrap(),
        "{a:&int,m:absent,z:absent}"
    );
}

#[test]
fn recursive_type_is_closed() {
    let src = r"main() {
    var x;
    x = alloc x;
    return 0;
}";

    let analysis = tip::check_str("main.tip", src).unwrap();
    let decl = analysis
        .program()
        .decls
        .iter()
        .find(|(_, d)| d.name.as_str() == "x")
        .unwrap()
        .0;

    match &analysis.types()[decl] {
        Type::Recursive { binder, body } => {
            assert_eq!(**body, Type::Pointer(Box::new(Type::Var(*binder))));
        }
        ty => panic!("not a recursive type: {:?}", ty),
    }
}

#[test]
fn deterministic() {
    let src = r"apply(f, x) {
    return f(x);
}
main() {
    var p, r;
    p = alloc {a: null, b: 1};
    r = (*p).a;
    (*p).b = apply(id, 2);
    return *r;
}
id(y) {
    return y;
}";

    let render = || {
        let analysis = tip::check_str("main.tip", src).unwrap();
        (analysis.render_decls(), analysis.render_exprs())
    };

    let first = render();
    for _ in 0..4 {
        assert_eq!(render(), first);
    }
}
