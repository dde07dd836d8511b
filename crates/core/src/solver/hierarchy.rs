//! Inheritance walks and member typing.

use super::{Lookup, SolvedEntity, SolvedType, Substitution, TypeSolver, split_dotted};
use crate::model::{Entity, EntityData, EntityRef, Module};
use semascope_api::models::TypeReference;
use std::collections::{HashSet, VecDeque};

impl<'a> TypeSolver<'a> {
    /// Direct supertypes: the superclass, then interfaces, solved in the
    /// class header under the current bindings. A class without a resolved
    /// superclass gets the profile's root type.
    pub fn supertypes(&self, ty: &SolvedType) -> Vec<SolvedType> {
        if ty.is_array {
            return self.root_type(self.module).into_iter().collect();
        }
        let class = match &ty.entity {
            SolvedEntity::Entity(class) => *class,
            SolvedEntity::TypeVariable { .. } => {
                return self.upper_bound(ty).into_iter().collect();
            }
            SolvedEntity::Primitive(_) => return Vec::new(),
        };
        let Some(_guard) = self.enter() else {
            return Vec::new();
        };
        let Some((module, entity)) = self.resolve(class) else {
            return Vec::new();
        };
        let Some(data) = entity.as_class() else {
            return Vec::new();
        };

        let solve = |reference: &TypeReference| {
            self.solve_in(module, reference, class.id, &ty.substitution, Lookup::Header)
                .filter(|t| matches!(t.entity, SolvedEntity::Entity(_)) && t.entity_ref() != Some(class))
        };
        let superclass = data.superclass.as_ref().and_then(solve);
        let has_superclass = superclass.is_some();
        let mut out: Vec<SolvedType> = superclass.into_iter().collect();
        out.extend(data.interfaces.iter().filter_map(solve));

        if !has_superclass {
            if let Some(root) = self.root_type(module) {
                if root.entity_ref() != Some(class) {
                    out.push(root);
                }
            }
        }
        out
    }

    /// All supertypes, breadth-first, each once.
    pub fn ancestors(&self, ty: &SolvedType) -> Vec<SolvedType> {
        let mut visited: HashSet<EntityRef> = ty.entity_ref().into_iter().collect();
        let mut queue: VecDeque<SolvedType> = self.supertypes(ty).into();
        let mut out = Vec::new();
        while let Some(current) = queue.pop_front() {
            let Some(class) = current.entity_ref() else {
                continue;
            };
            if !visited.insert(class) {
                continue;
            }
            queue.extend(self.supertypes(&current));
            out.push(current);
        }
        out
    }

    /// Whether `sub` is `sup` or inherits from it. Array-ness is ignored.
    pub fn is_subclass(&self, sub: &SolvedType, sup: &SolvedType) -> bool {
        let (Some(sub_class), Some(sup_class)) = (sub.entity_ref(), sup.entity_ref()) else {
            return false;
        };
        sub_class == sup_class
            || self
                .ancestors(&sub.element())
                .iter()
                .any(|a| a.entity_ref() == Some(sup_class))
    }

    /// Members named `name` at the first hierarchy level declaring any,
    /// each with the bindings in effect at the declaring class.
    pub fn find_members(&self, ty: &SolvedType, name: &str) -> Vec<(EntityRef, Substitution)> {
        self.find_members_where(ty, name, |_| true)
    }

    pub(crate) fn find_members_where<P>(
        &self,
        ty: &SolvedType,
        name: &str,
        accept: P,
    ) -> Vec<(EntityRef, Substitution)>
    where
        P: Fn(&Entity) -> bool,
    {
        let mut found = Vec::new();
        self.walk_hierarchy(ty, |module, class, current| {
            found.extend(
                module
                    .lookup(class.id, name)
                    .iter()
                    .filter(|id| module.entity(**id).is_some_and(&accept))
                    .map(|id| (module.entity_ref(*id), current.substitution.clone())),
            );
            !found.is_empty()
        });
        found
    }

    /// Members named `name` at every hierarchy level, own first. Used to
    /// gather overload candidates.
    pub fn all_members(&self, ty: &SolvedType, name: &str) -> Vec<(EntityRef, Substitution)> {
        let mut found = Vec::new();
        self.walk_hierarchy(ty, |module, class, current| {
            found.extend(
                module
                    .lookup(class.id, name)
                    .iter()
                    .map(|id| (module.entity_ref(*id), current.substitution.clone())),
            );
            false
        });
        found
    }

    /// Every member of a type, own first, then inherited level by level.
    pub fn members_of(&self, ty: &SolvedType) -> Vec<(EntityRef, Substitution)> {
        let mut found = Vec::new();
        self.walk_hierarchy(ty, |module, class, current| {
            if let Some(members) = module.entity(class.id).and_then(Entity::members) {
                found.extend(
                    members
                        .ids()
                        .map(|id| (module.entity_ref(id), current.substitution.clone())),
                );
            }
            false
        });
        found
    }

    /// Breadth-first over the class and its ancestors until `visit` returns
    /// true. Type variables are walked through their bound.
    fn walk_hierarchy<F>(&self, ty: &SolvedType, mut visit: F)
    where
        F: FnMut(&'a Module, EntityRef, &SolvedType) -> bool,
    {
        let Some(start) = self.member_owner(ty.clone()) else {
            return;
        };
        if start.is_array {
            return;
        }
        let mut queue = VecDeque::from([start]);
        let mut visited = HashSet::new();
        while let Some(current) = queue.pop_front() {
            let Some(class) = current.entity_ref() else {
                continue;
            };
            if !visited.insert(class) {
                continue;
            }
            let Some(module) = self.module.module(class.module) else {
                continue;
            };
            if visit(module, class, &current) {
                return;
            }
            queue.extend(self.supertypes(&current));
        }
    }

    /// Declared type of a variable, return type of a method, or the class
    /// itself, under `substitution`.
    pub fn type_of(&self, entity: EntityRef, substitution: &Substitution) -> Option<SolvedType> {
        let (module, e) = self.resolve(entity)?;
        match &e.data {
            EntityData::Variable(variable) => self.solve_in(
                module,
                &variable.type_ref,
                e.parent?,
                substitution,
                Lookup::Body,
            ),
            EntityData::Method(method) => self.solve_in(
                module,
                method.return_type.as_ref()?,
                entity.id,
                substitution,
                Lookup::Body,
            ),
            EntityData::Class(_) => {
                Some(SolvedType::entity(entity).with_substitution(substitution.clone()))
            }
            _ => None,
        }
    }

    /// First bound of a type variable, or the root type when it has none.
    /// Other types are returned unchanged.
    pub fn upper_bound(&self, ty: &SolvedType) -> Option<SolvedType> {
        let SolvedEntity::TypeVariable { owner, name } = &ty.entity else {
            return Some(ty.clone());
        };
        let (module, entity) = self.resolve(*owner)?;
        let bound = entity
            .type_parameters()
            .iter()
            .find(|p| p.name == *name)
            .and_then(|p| p.bounds.first());
        let solved = match bound {
            Some(bound) => {
                self.solve_in(module, bound, owner.id, &ty.substitution, Lookup::Header)?
            }
            None => self.root_type(module)?,
        };
        Some(solved.with_array(ty.is_array))
    }

    /// The type whose members a value of `ty` exposes.
    pub(super) fn member_owner(&self, ty: SolvedType) -> Option<SolvedType> {
        if !ty.is_type_variable() {
            return Some(ty);
        }
        let _guard = self.enter()?;
        let bound = self.upper_bound(&ty)?;
        self.member_owner(bound)
    }

    pub(crate) fn root_type(&self, m: &'a Module) -> Option<SolvedType> {
        let root = self.profile().root_type()?;
        self.find_type_in(m, &split_dotted(root))
    }
}
