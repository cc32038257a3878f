//! Tests for lowering and name resolution

use tip::{
    ir::{
        body::{decl::DeclKind, expr::Expr, stmt::Stmt, ProgramData, ProgramSpans},
        lower::{self, LowerError},
        resolve::{self, ResolveError},
    },
    syntax::ast,
};

fn lower(src: &str) -> (ProgramData, ProgramSpans, Vec<LowerError>) {
    let parse = ast::parse(src);
    assert!(
        !parse.has_errors(),
        "{:?} {:?}",
        parse.lex_errs,
        parse.parse_errs
    );
    lower::lower(&parse.doc)
}

fn lower_ok(src: &str) -> (ProgramData, ProgramSpans) {
    let (program, spans, errs) = self::lower(src);
    assert!(errs.is_empty(), "{:?}", errs);
    (program, spans)
}

#[test]
fn declarations() {
    let src = r"f(a) { var x; return a; }
g(b, c) { var y, z; return b; }";

    let (program, _spans) = self::lower_ok(src);

    let decls = program
        .decls
        .iter()
        .map(|(_, d)| (d.name.as_str(), d.kind))
        .collect::<Vec<_>>();

    assert_eq!(
        decls,
        [
            ("f", DeclKind::Fun),
            ("a", DeclKind::Param),
            ("x", DeclKind::Local),
            ("g", DeclKind::Fun),
            ("b", DeclKind::Param),
            ("c", DeclKind::Param),
            ("y", DeclKind::Local),
            ("z", DeclKind::Local),
        ]
    );

    let funs = program.funs.iter().map(|(_, f)| f).collect::<Vec<_>>();
    assert_eq!(funs.len(), 2);
    assert_eq!(funs[1].params.len(), 2);
    assert_eq!(funs[1].locals.len(), 2);
}

#[test]
fn assignment_targets() {
    let src = r"main() {
    var x, p, r;
    x = 1;
    *p = 2;
    r.f = 3;
    (*p).g = 4;
    (x) = 5;
    return 0;
}";

    let (program, _spans) = self::lower_ok(src);
    let main = program.funs.iter().next().unwrap().1;

    let stmts = main
        .body
        .iter()
        .map(|s| &program.stmts[*s])
        .collect::<Vec<_>>();
    assert_eq!(stmts.len(), 5);

    assert!(matches!(stmts[0], Stmt::Assign { .. }));
    assert!(matches!(stmts[1], Stmt::DerefWrite { .. }));
    assert!(matches!(stmts[2], Stmt::FieldWrite { field, .. } if field.as_str() == "f"));
    assert!(matches!(stmts[3], Stmt::IndirectFieldWrite { field, .. } if field.as_str() == "g"));
    assert!(matches!(stmts[4], Stmt::Assign { .. }));

    // `*p = 2`: the pointer is `p`, not `*p`
    match stmts[1] {
        Stmt::DerefWrite { ptr, .. } => {
            assert!(matches!(&program.exprs[*ptr], Expr::Ident(name) if name.as_str() == "p"));
        }
        _ => unreachable!(),
    }
}

#[test]
fn invalid_assignment_target() {
    let src = "main() { var x; 1 = x; x + 1 = 2; return 0; }";
    let (_program, _spans, errs) = self::lower(src);

    assert_eq!(errs.len(), 2, "{:?}", errs);
    assert!(errs
        .iter()
        .all(|e| matches!(e, LowerError::InvalidAssignTarget { .. })));
    assert_eq!(errs[0].span().slice(src), "1");
    assert_eq!(errs[1].span().slice(src), "x + 1");
}

#[test]
fn address_of_non_variable() {
    let src = "main() { var x; x = &1; return 0; }";
    let (_program, _spans, errs) = self::lower(src);

    assert!(matches!(
        &errs[..],
        [LowerError::AddressOfNonVariable { .. }]
    ));
}

#[test]
fn int_overflow() {
    let src = "main() { return 99999999999999999999; }";
    let (_program, _spans, errs) = self::lower(src);

    assert!(matches!(&errs[..], [LowerError::IntOverflow { .. }]));
}

#[test]
fn duplicate_record_field() {
    let src = "main() { return {a: 1, a: 2}; }";
    let (program, _spans, errs) = self::lower(src);

    assert!(matches!(
        &errs[..],
        [LowerError::DuplicateField { name, .. }] if name.as_str() == "a"
    ));

    // the first one is kept
    let record = program
        .exprs
        .iter()
        .find_map(|(_, e)| match e {
            Expr::Record(fields) => Some(fields.clone()),
            _ => None,
        })
        .unwrap();
    assert_eq!(record.len(), 1);
    assert!(matches!(program.exprs[record[0].expr], Expr::Num(1)));
}

#[test]
fn parentheses_are_lowered_away() {
    let src = "main() { return ((1)); }";
    let (program, spans) = self::lower_ok(src);

    let main = program.funs.iter().next().unwrap().1;
    assert!(matches!(program.exprs[main.ret], Expr::Num(1)));
    assert_eq!(spans.expr(main.ret).slice(src), "1");
}

#[test]
fn resolution() {
    let src = r"id(x) { return x; }
main() { var x; x = id(1); return x; }";

    let (program, spans) = self::lower_ok(src);
    let (resolution, errs) = resolve::resolve(&program, &spans);
    assert!(errs.is_empty(), "{:?}", errs);

    for (expr, data) in program.exprs.iter() {
        let name = match data {
            Expr::Ident(name) => name,
            _ => {
                assert_eq!(resolution.get(expr), None);
                continue;
            }
        };

        let decl = resolution.get(expr).unwrap();
        assert_eq!(&program.decls[decl].name, name);

        // `x` in `main` refers to the local of `main`, not the parameter of `id`
        if name.as_str() == "x" {
            let offset = usize::from(spans.expr(expr).start);
            let expected_kind = if offset < src.find("main").unwrap() {
                DeclKind::Param
            } else {
                DeclKind::Local
            };
            assert_eq!(program.decls[decl].kind, expected_kind);
        }
    }
}

#[test]
fn locals_shadow_functions() {
    let src = r"f() { return 1; }
main() { var f; f = 2; return f; }";

    let (program, spans) = self::lower_ok(src);
    let (resolution, errs) = resolve::resolve(&program, &spans);
    assert!(errs.is_empty(), "{:?}", errs);

    let main = program.funs.iter().nth(1).unwrap().1;
    let decl = resolution.get(main.ret).unwrap();
    assert_eq!(program.decls[decl].kind, DeclKind::Local);
}

#[test]
fn undeclared() {
    let src = "main() { var x; x = y; return x; }";

    let (program, spans) = self::lower_ok(src);
    let (_resolution, errs) = resolve::resolve(&program, &spans);

    assert!(matches!(
        &errs[..],
        [ResolveError::Undeclared { name, .. }] if name.as_str() == "y"
    ));
    assert_eq!(errs[0].span().slice(src), "y");
}

#[test]
fn duplicates() {
    let src = r"f(a, a) { var b, b; return 0; }
f() { return 0; }";

    let (program, spans) = self::lower_ok(src);
    let (_resolution, errs) = resolve::resolve(&program, &spans);

    let names = errs
        .iter()
        .map(|e| match e {
            ResolveError::Duplicate { name, .. } => name.as_str(),
            e => panic!("unexpected error: {:?}", e),
        })
        .collect::<Vec<_>>();

    assert_eq!(names, ["f", "a", "b"]);
}
