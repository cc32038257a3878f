//! Test utilities, including data-driven ones.
//!
//! A test case file is a sequence of test cases separated by 40 hyphens:
//!
//! ```text
//! <title>
//! <code>
//! ----------------------------------------
//! <expected output>
//! ----------------------------------------
//! ```
//!
//! Header lines starting with `//` are ignored.

use std::fmt::{self, Write};

pub type TestResult<T = ()> = Result<T, TestError>;

/// Parsed test case
#[derive(Debug, Clone)]
pub struct Test {
    pub title: String,
    pub code: String,
    pub expected: String,
}

impl Test {
    pub fn result(self, output: &str) -> TestResult {
        // REMARK: trimmed
        if output.trim() == self.expected.trim() {
            Ok(())
        } else {
            Err(TestError {
                test: self.clone(),
                output: output.to_string(),
            })
        }
    }
}

#[derive(Debug, Clone)]
pub struct TestError {
    pub test: Test,
    pub output: String,
}

impl fmt::Display for TestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}
--- code:
{}
--- output:
{}
--- expected:
{}",
            self.test.title,
            self.test.code,
            self.output.trim(),
            self.test.expected.trim(),
        )
    }
}

pub fn run_tests(src: &str, runner: fn(Test) -> TestResult) {
    let tests = self::collect_tests(src);
    assert!(!tests.is_empty(), "no test case found");

    let errs = tests
        .into_iter()
        .filter_map(|t| runner(t).err())
        .collect::<Vec<_>>();

    if errs.is_empty() {
        return;
    }

    let mut s = String::new();
    writeln!(s, "Errors:").unwrap();
    for e in &errs {
        writeln!(s, "{}", e).unwrap();
        writeln!(s).unwrap();
    }

    panic!("{}", s);
}

pub fn collect_tests(src: &str) -> Vec<Test> {
    let mut chunks = {
        // 40 hyphens
        let delim = r#"----------------------------------------"#;
        src.split(delim)
    };

    let mut tests = vec![];
    while let Some(header) = chunks.next() {
        let expected = match chunks.next() {
            Some(block) => block,
            None => break,
        };

        let mut header = header
            .lines()
            .filter(|ln| !ln.starts_with("//"))
            .skip_while(|ln| is_ws(ln));

        // first line: title
        let title = match header.next() {
            Some(t) => t,
            None => break,
        };

        // other lines: code
        let code = header.collect::<Vec<&str>>().join("\n");

        tests.push(Test {
            title: title.trim().to_string(),
            code: code.trim().to_string(),
            expected: expected.to_string(),
        });
    }

    tests
}

fn is_ws(ln: &str) -> bool {
    ln.bytes().all(|b| matches!(b, b' ' | b'\t' | b'\r'))
}

#[test]
fn collect() {
    let src = "
// comment
first
a = 1;
----------------------------------------
one
----------------------------------------

second
b = 2;
----------------------------------------
two
";

    let tests = self::collect_tests(src);
    assert_eq!(tests.len(), 2);

    assert_eq!(tests[0].title, "first");
    assert_eq!(tests[0].code, "a = 1;");
    assert_eq!(tests[0].expected.trim(), "one");

    assert_eq!(tests[1].title, "second");
    assert_eq!(tests[1].code, "b = 2;");
    assert_eq!(tests[1].expected.trim(), "two");
}
