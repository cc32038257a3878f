//! Syntax tree (source code → CST → AST)

pub mod ast;
pub mod cst;
pub mod syn_diag;
