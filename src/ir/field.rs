//! Program-wide field names
//!
//! Every record type has one slot per field name that appears anywhere in the program, in sorted
//! order. The table is built once before inference and never changes.

use indexmap::IndexSet;
use itertools::Itertools;

use crate::ir::body::{expr::Expr, stmt::Stmt, Name, ProgramData};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldTable {
    /// Sorted, deduplicated
    names: IndexSet<Name>,
}

impl FieldTable {
    pub fn collect(program: &ProgramData) -> Self {
        let from_exprs = program.exprs.iter().flat_map(|(_, expr)| match expr {
            Expr::Record(fields) => fields.iter().map(|f| &f.name).collect::<Vec<_>>(),
            Expr::Field { field, .. } => vec![field],
            _ => Vec::new(),
        });

        let from_stmts = program.stmts.iter().filter_map(|(_, stmt)| match stmt {
            Stmt::FieldWrite { field, .. } | Stmt::IndirectFieldWrite { field, .. } => Some(field),
            _ => None,
        });

        let names = from_exprs
            .chain(from_stmts)
            .sorted()
            .dedup()
            .cloned()
            .collect::<IndexSet<_>>();

        log::debug!("fields: [{}]", names.iter().join(", "));

        Self { names }
    }

    /// Number of slots in every record type
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn slot(&self, name: &str) -> Option<usize> {
        self.names.get_index_of(name)
    }

    pub fn name(&self, slot: usize) -> Option<&Name> {
        self.names.get_index(slot)
    }

    pub fn names(&self) -> impl Iterator<Item = &Name> {
        self.names.iter()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    use crate::{ir::lower, syntax::ast};

    fn table(src: &str) -> FieldTable {
        let parse = ast::parse(src);
        assert!(!parse.has_errors(), "{:?} {:?}", parse.lex_errs, parse.parse_errs);
        let (program, _spans, errs) = lower::lower(&parse.doc);
        assert!(errs.is_empty(), "{:?}", errs);
        FieldTable::collect(&program)
    }

    #[test]
    fn sorted_and_deduplicated() {
        let fields = table(
            "main() { var r, p; r = {z: 1, a: 2}; p = alloc r; (*p).m = r.a; r.z = 3; return r.q; }",
        );

        let names = fields.names().map(Name::as_str).collect::<Vec<_>>();
        assert_eq!(names, vec!["a", "m", "q", "z"]);
        assert_eq!(fields.slot("m"), Some(1));
        assert_eq!(fields.slot("nope"), None);
        assert_eq!(fields.name(3).map(Name::as_str), Some("z"));
    }

    #[test]
    fn no_records() {
        let fields = table("main() { return 0; }");
        assert!(fields.is_empty());
    }
}
