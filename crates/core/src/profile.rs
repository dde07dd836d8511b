//! Host-language conventions the engine needs but cannot infer from
//! declarations: primitive names, widening and boxing rules, implicit imports.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Primitive {
    Boolean,
    Byte,
    Short,
    Char,
    Int,
    Long,
    Float,
    Double,
    Void,
}

impl Primitive {
    pub const ALL: [Primitive; 9] = [
        Primitive::Boolean,
        Primitive::Byte,
        Primitive::Short,
        Primitive::Char,
        Primitive::Int,
        Primitive::Long,
        Primitive::Float,
        Primitive::Double,
        Primitive::Void,
    ];

    pub fn keyword(self) -> &'static str {
        match self {
            Primitive::Boolean => "boolean",
            Primitive::Byte => "byte",
            Primitive::Short => "short",
            Primitive::Char => "char",
            Primitive::Int => "int",
            Primitive::Long => "long",
            Primitive::Float => "float",
            Primitive::Double => "double",
            Primitive::Void => "void",
        }
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Language plug-in consulted by the solver and the overload resolver.
pub trait LanguageProfile: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    /// Primitive denoted by an unqualified type name, if any.
    fn primitive(&self, name: &str) -> Option<Primitive>;

    /// Widening primitive conversion (`int` to `long`). Not reflexive.
    fn primitive_widens(&self, from: Primitive, to: Primitive) -> bool;

    /// Qualified name of the boxing class for a primitive.
    fn boxed_type(&self, primitive: Primitive) -> Option<&str>;

    /// Primitive unboxed from a qualified class name.
    fn unboxed_type(&self, qualified: &str) -> Option<Primitive> {
        Primitive::ALL
            .into_iter()
            .find(|p| self.boxed_type(*p) == Some(qualified))
    }

    /// Packages imported implicitly into every file, dotted.
    fn default_imports(&self) -> &[&str];

    /// Qualified name of the implicit supertype of every class, if any.
    fn root_type(&self) -> Option<&str>;
}

/// Profile with no primitives, no implicit imports and no root type.
#[derive(Debug, Default, Clone, Copy)]
pub struct BareProfile;

impl LanguageProfile for BareProfile {
    fn name(&self) -> &str {
        "bare"
    }

    fn primitive(&self, _name: &str) -> Option<Primitive> {
        None
    }

    fn primitive_widens(&self, _from: Primitive, _to: Primitive) -> bool {
        false
    }

    fn boxed_type(&self, _primitive: Primitive) -> Option<&str> {
        None
    }

    fn default_imports(&self) -> &[&str] {
        &[]
    }

    fn root_type(&self) -> Option<&str> {
        None
    }
}
