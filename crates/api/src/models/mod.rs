pub mod kind;
pub mod range;
pub mod type_ref;

pub use kind::*;
pub use range::*;
pub use type_ref::*;
