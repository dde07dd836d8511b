//! Java conventions: primitives, widening, boxing and `java.lang`.

use semascope_core::profile::{LanguageProfile, Primitive};

pub const JAVA_LANG: &str = "java.lang";
pub const OBJECT: &str = "java.lang.Object";

const DEFAULT_IMPORTS: [&str; 1] = [JAVA_LANG];

#[derive(Debug, Clone, Copy, Default)]
pub struct JavaProfile;

impl JavaProfile {
    pub fn new() -> Self {
        Self
    }
}

impl LanguageProfile for JavaProfile {
    fn name(&self) -> &str {
        "java"
    }

    fn primitive(&self, name: &str) -> Option<Primitive> {
        let primitive = match name {
            "boolean" => Primitive::Boolean,
            "byte" => Primitive::Byte,
            "short" => Primitive::Short,
            "char" => Primitive::Char,
            "int" => Primitive::Int,
            "long" => Primitive::Long,
            "float" => Primitive::Float,
            "double" => Primitive::Double,
            "void" => Primitive::Void,
            _ => return None,
        };
        Some(primitive)
    }

    fn primitive_widens(&self, from: Primitive, to: Primitive) -> bool {
        use Primitive::*;
        match from {
            Byte => matches!(to, Short | Int | Long | Float | Double),
            Short | Char => matches!(to, Int | Long | Float | Double),
            Int => matches!(to, Long | Float | Double),
            Long => matches!(to, Float | Double),
            Float => matches!(to, Double),
            Boolean | Double | Void => false,
        }
    }

    fn boxed_type(&self, primitive: Primitive) -> Option<&str> {
        let boxed = match primitive {
            Primitive::Boolean => "java.lang.Boolean",
            Primitive::Byte => "java.lang.Byte",
            Primitive::Short => "java.lang.Short",
            Primitive::Char => "java.lang.Character",
            Primitive::Int => "java.lang.Integer",
            Primitive::Long => "java.lang.Long",
            Primitive::Float => "java.lang.Float",
            Primitive::Double => "java.lang.Double",
            Primitive::Void => return None,
        };
        Some(boxed)
    }

    fn default_imports(&self) -> &[&str] {
        &DEFAULT_IMPORTS
    }

    fn root_type(&self) -> Option<&str> {
        Some(OBJECT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitive_keywords() {
        let profile = JavaProfile::new();
        for primitive in Primitive::ALL {
            assert_eq!(profile.primitive(primitive.keyword()), Some(primitive));
        }
        assert_eq!(profile.primitive("String"), None);
        assert_eq!(profile.primitive("Int"), None);
    }

    #[test]
    fn test_widening_is_not_reflexive() {
        let profile = JavaProfile::new();
        assert!(profile.primitive_widens(Primitive::Int, Primitive::Long));
        assert!(profile.primitive_widens(Primitive::Char, Primitive::Double));
        assert!(!profile.primitive_widens(Primitive::Int, Primitive::Int));
        assert!(!profile.primitive_widens(Primitive::Long, Primitive::Int));
        assert!(!profile.primitive_widens(Primitive::Byte, Primitive::Char));
        assert!(!profile.primitive_widens(Primitive::Boolean, Primitive::Int));
    }

    #[test]
    fn test_boxing_round_trip() {
        let profile = JavaProfile::new();
        assert_eq!(profile.boxed_type(Primitive::Char), Some("java.lang.Character"));
        assert_eq!(profile.unboxed_type("java.lang.Integer"), Some(Primitive::Int));
        assert_eq!(profile.unboxed_type("java.lang.String"), None);
        assert_eq!(profile.boxed_type(Primitive::Void), None);
    }
}
