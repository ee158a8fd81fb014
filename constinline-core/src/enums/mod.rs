//! Const enum declarations and their member values.
//!
//! - [`enum_extractor`]: finds `const enum` declarations and classifies each
//!   member initializer
//! - [`enum_values`]: computes the literal text of every member
//! - [`value`]: literal and prefixed member values

pub mod enum_extractor;
pub mod enum_values;
pub mod value;

pub use enum_extractor::{
    classify_init, extract_enums, DeclarationIndex, EnumDecl, EnumMemberDef, MemberInit,
};
pub use enum_values::EnumValues;
pub use value::{Literal, MemberValue, PrefixOp};
