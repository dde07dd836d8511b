use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of a declared entity.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Package,
    File,
    Class,
    Interface,
    Enum,
    Annotation,
    Method,
    Field,
    Variable,
    Parameter,
    Primitive,
}

impl EntityKind {
    /// Class-like kinds: entities that are both a type and a member scope.
    pub fn is_class_like(self) -> bool {
        matches!(
            self,
            EntityKind::Class | EntityKind::Interface | EntityKind::Enum | EntityKind::Annotation
        )
    }

    pub fn is_variable(self) -> bool {
        matches!(
            self,
            EntityKind::Field | EntityKind::Variable | EntityKind::Parameter
        )
    }

    /// Kinds that may be referenced as a type.
    pub fn is_type(self) -> bool {
        self.is_class_like() || self == EntityKind::Primitive
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Package => "package",
            EntityKind::File => "file",
            EntityKind::Class => "class",
            EntityKind::Interface => "interface",
            EntityKind::Enum => "enum",
            EntityKind::Annotation => "annotation",
            EntityKind::Method => "method",
            EntityKind::Field => "field",
            EntityKind::Variable => "variable",
            EntityKind::Parameter => "parameter",
            EntityKind::Primitive => "primitive",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for EntityKind {
    type Error = String;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "package" => Ok(EntityKind::Package),
            "file" => Ok(EntityKind::File),
            "class" => Ok(EntityKind::Class),
            "interface" => Ok(EntityKind::Interface),
            "enum" => Ok(EntityKind::Enum),
            "annotation" => Ok(EntityKind::Annotation),
            "method" => Ok(EntityKind::Method),
            "field" => Ok(EntityKind::Field),
            "variable" => Ok(EntityKind::Variable),
            "parameter" => Ok(EntityKind::Parameter),
            "primitive" => Ok(EntityKind::Primitive),
            other => Err(format!("unknown entity kind: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_string_round_trip() {
        for kind in [
            EntityKind::Package,
            EntityKind::Interface,
            EntityKind::Method,
            EntityKind::Parameter,
        ] {
            assert_eq!(EntityKind::try_from(kind.as_str()), Ok(kind));
        }
        assert!(EntityKind::try_from("module").is_err());
    }

    #[test]
    fn test_kind_serializes_lowercase() {
        let json = serde_json::to_string(&EntityKind::Annotation).unwrap();
        assert_eq!(json, "\"annotation\"");
    }
}
