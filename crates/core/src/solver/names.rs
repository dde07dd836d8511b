use super::{SolvedEntity, SolvedType, TypeSolver, TypeVariableKey, split_dotted};
use semascope_api::models::TypeReference;

impl TypeSolver<'_> {
    /// Dotted name of the denoted type, without array brackets.
    pub fn qualified_name(&self, ty: &SolvedType) -> Option<String> {
        match &ty.entity {
            SolvedEntity::Primitive(p) => Some(p.keyword().to_string()),
            SolvedEntity::TypeVariable { name, .. } => Some(name.to_string()),
            SolvedEntity::Entity(class) => self.resolve(*class).map(|(_, e)| e.qualified_name()),
        }
    }

    /// A fully qualified reference that solves back to the same entity.
    ///
    /// Type arguments are emitted only when every parameter is bound.
    pub fn type_reference_for(&self, ty: &SolvedType) -> Option<TypeReference> {
        let reference = match &ty.entity {
            SolvedEntity::Primitive(p) => TypeReference::simple(p.keyword()),
            SolvedEntity::TypeVariable { name, .. } => TypeReference::simple(name.clone()),
            SolvedEntity::Entity(class) => {
                let (_, entity) = self.resolve(*class)?;
                let reference = TypeReference::qualified(&entity.qualified_name());
                let arguments: Option<Vec<TypeReference>> = entity
                    .type_parameters()
                    .iter()
                    .map(|param| {
                        ty.substitution
                            .get(&TypeVariableKey::new(*class, param.name.clone()))
                            .and_then(|bound| self.type_reference_for(bound))
                    })
                    .collect();
                match arguments {
                    Some(arguments) if !arguments.is_empty() => reference.with_arguments(arguments),
                    _ => reference,
                }
            }
        };
        Some(if ty.is_array {
            reference.array()
        } else {
            reference
        })
    }

    /// Class-like entity with a dotted name anywhere in the search chain.
    pub fn find_qualified_type(&self, dotted: &str) -> Option<SolvedType> {
        self.find_type_in(self.module, &split_dotted(dotted))
    }
}
