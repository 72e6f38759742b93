pub mod builtin;
pub mod check;
pub mod constant;
pub mod error;
pub mod scope;
pub mod ty;
pub mod unused;
pub mod validate;

pub use builtin::Builtin;
pub use check::{Checker, TypeInfo};
pub use constant::Constant;
pub use error::TypeError;
pub use ty::{BasicKind, Type, UntypedKind};
pub use validate::{ValidationError, validate_and_type_check};
