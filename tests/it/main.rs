//! The only integration test crate

pub mod test_ir;
pub mod test_syntax;
pub mod test_ty;

// defines test case DSL
pub mod util;
