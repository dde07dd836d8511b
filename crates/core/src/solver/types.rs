use crate::model::EntityRef;
use crate::profile::Primitive;
use indexmap::IndexMap;
use smol_str::SmolStr;

/// A type parameter identified by the class or method declaring it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeVariableKey {
    pub owner: EntityRef,
    pub name: SmolStr,
}

impl TypeVariableKey {
    pub fn new(owner: EntityRef, name: impl Into<SmolStr>) -> Self {
        Self {
            owner,
            name: name.into(),
        }
    }
}

/// Bindings of type parameters to actual types, in binding order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Substitution {
    map: IndexMap<TypeVariableKey, SolvedType>,
}

impl Substitution {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: TypeVariableKey, ty: SolvedType) {
        self.map.insert(key, ty);
    }

    pub fn get(&self, key: &TypeVariableKey) -> Option<&SolvedType> {
        self.map.get(key)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&TypeVariableKey, &SolvedType)> {
        self.map.iter()
    }
}

/// What a solved type denotes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SolvedEntity {
    /// A class-like entity.
    Entity(EntityRef),
    Primitive(Primitive),
    /// A type parameter without a binding at the resolution site.
    TypeVariable { owner: EntityRef, name: SmolStr },
}

/// A resolved type reference.
///
/// Only valid against the module snapshot it was computed from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolvedType {
    pub entity: SolvedEntity,
    pub is_array: bool,
    /// Type arguments in effect, keyed by the declaring type parameter.
    pub substitution: Substitution,
}

impl SolvedType {
    fn of(entity: SolvedEntity) -> Self {
        Self {
            entity,
            is_array: false,
            substitution: Substitution::new(),
        }
    }

    pub fn entity(entity: EntityRef) -> Self {
        Self::of(SolvedEntity::Entity(entity))
    }

    pub fn primitive(primitive: Primitive) -> Self {
        Self::of(SolvedEntity::Primitive(primitive))
    }

    pub fn type_variable(owner: EntityRef, name: impl Into<SmolStr>) -> Self {
        Self::of(SolvedEntity::TypeVariable {
            owner,
            name: name.into(),
        })
    }

    pub fn with_array(mut self, is_array: bool) -> Self {
        self.is_array = is_array;
        self
    }

    pub fn with_substitution(mut self, substitution: Substitution) -> Self {
        self.substitution = substitution;
        self
    }

    /// Element type of an array type; the type itself otherwise.
    pub fn element(&self) -> SolvedType {
        SolvedType {
            is_array: false,
            ..self.clone()
        }
    }

    pub fn entity_ref(&self) -> Option<EntityRef> {
        match self.entity {
            SolvedEntity::Entity(entity) => Some(entity),
            _ => None,
        }
    }

    /// The primitive, unless this is an array of it.
    pub fn as_primitive(&self) -> Option<Primitive> {
        match self.entity {
            SolvedEntity::Primitive(p) if !self.is_array => Some(p),
            _ => None,
        }
    }

    pub fn is_type_variable(&self) -> bool {
        matches!(self.entity, SolvedEntity::TypeVariable { .. })
    }

    /// Every type except a bare primitive is a reference type.
    pub fn is_reference(&self) -> bool {
        self.as_primitive().is_none()
    }

    /// Same entity and array-ness. Type arguments are not compared.
    pub fn same_type(&self, other: &SolvedType) -> bool {
        self.entity == other.entity && self.is_array == other.is_array
    }
}
