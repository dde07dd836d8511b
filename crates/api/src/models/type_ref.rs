use super::range::TextRange;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::fmt;

/// An as-written, unresolved mention of a type, e.g. `Outer.Inner<String>[]`.
///
/// Produced by the parser and immutable afterwards.
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Hash, Default)]
pub struct TypeReference {
    /// Name segments for qualified access, outer to inner.
    pub segments: Vec<SmolStr>,
    pub is_array: bool,
    pub type_arguments: Vec<TypeReference>,
    #[serde(default)]
    pub range: TextRange,
}

impl TypeReference {
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<SmolStr>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Reference to a single unqualified name.
    pub fn simple(name: impl Into<SmolStr>) -> Self {
        Self::new([name])
    }

    /// Split a dotted name (`java.util.List`) into segments.
    pub fn qualified(dotted: &str) -> Self {
        Self::new(dotted.split('.').filter(|s| !s.is_empty()))
    }

    pub fn with_arguments(mut self, args: Vec<TypeReference>) -> Self {
        self.type_arguments = args;
        self
    }

    pub fn array(mut self) -> Self {
        self.is_array = true;
        self
    }

    pub fn with_range(mut self, range: TextRange) -> Self {
        self.range = range;
        self
    }

    pub fn first_segment(&self) -> Option<&SmolStr> {
        self.segments.first()
    }

    pub fn is_qualified(&self) -> bool {
        self.segments.len() > 1
    }

    /// Same reference with the array flag cleared.
    pub fn element(&self) -> TypeReference {
        TypeReference {
            is_array: false,
            ..self.clone()
        }
    }
}

impl fmt::Display for TypeReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, seg) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            f.write_str(seg)?;
        }
        if !self.type_arguments.is_empty() {
            f.write_str("<")?;
            for (i, arg) in self.type_arguments.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{arg}")?;
            }
            f.write_str(">")?;
        }
        if self.is_array {
            f.write_str("[]")?;
        }
        Ok(())
    }
}

impl fmt::Debug for TypeReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeReference({self})")
    }
}
