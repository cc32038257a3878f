//! Type printer
//!
//! ```text
//! int   &T   (T1,T2) -> R   {a:T,b:T}   absent   t0   μt0.T
//! ```
//!
//! Variables are renamed in order of first appearance, so the output does not depend on the class
//! numbering of the unifier.

use std::fmt;

use itertools::Itertools;

use crate::ir::{
    field::FieldTable,
    ty::{term::TermId, Type},
};

impl Type {
    pub fn display<'a>(&'a self, fields: &'a FieldTable) -> TypeDisplay<'a> {
        let mut names = Vec::new();
        self::collect_vars(self, &mut names);

        TypeDisplay {
            ty: self,
            fields,
            names,
        }
    }
}

/// Variables in order of first appearance
fn collect_vars(ty: &Type, names: &mut Vec<TermId>) {
    fn add(id: TermId, names: &mut Vec<TermId>) {
        if !names.contains(&id) {
            names.push(id);
        }
    }

    match ty {
        Type::Int | Type::Absent => {}
        Type::Var(id) => add(*id, names),
        Type::Pointer(pointee) => self::collect_vars(pointee, names),
        Type::Function { params, ret } => {
            for param in params {
                self::collect_vars(param, names);
            }
            self::collect_vars(ret, names);
        }
        Type::Record(slots) => {
            for slot in slots {
                self::collect_vars(slot, names);
            }
        }
        Type::Recursive { binder, body } => {
            add(*binder, names);
            self::collect_vars(body, names);
        }
    }
}

pub struct TypeDisplay<'a> {
    ty: &'a Type,
    fields: &'a FieldTable,
    names: Vec<TermId>,
}

impl<'a> TypeDisplay<'a> {
    fn var_name(&self, id: TermId) -> String {
        match self.names.iter().position(|x| *x == id) {
            Some(i) => format!("t{}", i),
            None => format!("t?{}", usize::from(id)),
        }
    }

    fn fmt_ty(&self, f: &mut fmt::Formatter<'_>, ty: &Type) -> fmt::Result {
        match ty {
            Type::Int => write!(f, "int"),
            Type::Absent => write!(f, "absent"),
            Type::Var(id) => write!(f, "{}", self.var_name(*id)),
            Type::Pointer(pointee) => {
                write!(f, "&")?;
                if matches!(**pointee, Type::Function { .. } | Type::Recursive { .. }) {
                    write!(f, "(")?;
                    self.fmt_ty(f, pointee)?;
                    write!(f, ")")
                } else {
                    self.fmt_ty(f, pointee)
                }
            }
            Type::Function { params, ret } => {
                write!(f, "(")?;
                for (i, param) in params.iter().enumerate() {
                    if i != 0 {
                        write!(f, ",")?;
                    }
                    self.fmt_ty(f, param)?;
                }
                write!(f, ") -> ")?;
                self.fmt_ty(f, ret)
            }
            Type::Record(slots) => {
                write!(f, "{{")?;
                for (i, slot) in slots.iter().enumerate() {
                    if i != 0 {
                        write!(f, ",")?;
                    }
                    match self.fields.name(i) {
                        Some(name) => write!(f, "{}:", name)?,
                        None => write!(f, "?:")?,
                    }
                    self.fmt_ty(f, slot)?;
                }
                write!(f, "}}")
            }
            Type::Recursive { binder, body } => {
                write!(f, "μ{}.", self.var_name(*binder))?;
                self.fmt_ty(f, body)
            }
        }
    }
}

impl<'a> fmt::Display for TypeDisplay<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_ty(f, self.ty)
    }
}

impl<'a> fmt::Debug for TypeDisplay<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (vars: [{}])",
            self,
            self.names.iter().map(|id| usize::from(*id)).join(", ")
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn variables_are_renamed_by_appearance() {
        let fields = FieldTable::default();

        let a = TermId::from(7usize);
        let b = TermId::from(3usize);
        let ty = Type::Function {
            params: vec![Type::Var(a), Type::Pointer(Box::new(Type::Var(b)))],
            ret: Box::new(Type::Var(a)),
        };

        assert_eq!(ty.display(&fields).to_string(), "(t0,&t1) -> t0");
    }

    #[test]
    fn recursive_pointee_is_parenthesized() {
        let fields = FieldTable::default();

        let r = TermId::from(5usize);
        let ty = Type::Pointer(Box::new(Type::Recursive {
            binder: r,
            body: Box::new(Type::Pointer(Box::new(Type::Var(r)))),
        }));

        assert_eq!(ty.display(&fields).to_string(), "&(μt0.&t0)");
    }
}
