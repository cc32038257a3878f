//! Intermediate representation and analyses on it
//!
//! # Data flow
//!
//! - Lower AST into [`ProgramData`] and [`ProgramSpans`]
//! - Resolve identifiers into declarations ([`Resolution`])
//! - Collect field names into [`FieldTable`]
//! - Infer types ([`ty`])
//!
//! [`ProgramData`]: crate::ir::body::ProgramData
//! [`ProgramSpans`]: crate::ir::body::ProgramSpans
//! [`Resolution`]: crate::ir::resolve::Resolution
//! [`FieldTable`]: crate::ir::field::FieldTable

pub mod body;
pub mod field;
pub mod ir_diag;
pub mod lower;
pub mod resolve;
pub mod ty;
