//! Offset-indexed structures rebuilt per file.

mod range_lookup;

pub use range_lookup::NestedRangeLookup;
