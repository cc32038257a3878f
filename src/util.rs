//! Common utilities

pub mod diag;

/// Defines an enum that wraps each of the given types, along with `From` conversions
#[macro_export]
macro_rules! define_enum {
    ( $( #[ $meta:meta ] )* $vis:vis $ty:ident = $( $variant:ident )|* ; ) => {
        $( #[$meta] )*
        $vis enum $ty {
            $( $variant($variant), )*
        }

        $(
            impl From<$variant> for $ty {
                fn from(x: $variant) -> $ty {
                    Self::$variant(x)
                }
            }
        )*
    }
}

pub use define_enum;
