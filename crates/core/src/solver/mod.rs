//! Type solver.
//!
//! Resolves as-written `TypeReference`s to `SolvedType`s relative to a base
//! scope. Resolution of the first segment walks, in order: type parameters
//! of the enclosing methods and classes, the scope chain (class levels
//! include inherited members), the file context (imports, own package,
//! implicit imports) and finally top-level names of every module in the
//! search chain. Later segments resolve as member access. A qualifier is
//! read as a package or type before a variable of the same name.
//!
//! Unresolvable references yield `None`; nothing here fails hard.

mod hierarchy;
mod names;
mod types;

pub use types::{SolvedEntity, SolvedType, Substitution, TypeVariableKey};

use crate::model::{Entity, EntityData, EntityId, EntityRef, FileData, Module};
use crate::profile::LanguageProfile;
use semascope_api::models::TypeReference;
use smol_str::SmolStr;
use std::cell::Cell;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lookup {
    /// Inside the scope: its members are visible.
    Body,
    /// In a class header (`extends`, `implements`, bounds): the class's type
    /// parameters are visible, its members are not.
    Header,
}

/// Intermediate result while walking the segments of a qualified name.
enum Step {
    Package(Vec<SmolStr>),
    Type(SolvedType),
    Variable(EntityRef, Substitution),
}

pub struct TypeSolver<'a> {
    module: &'a Module,
    max_depth: u32,
    depth: Cell<u32>,
}

struct DepthGuard<'s> {
    depth: &'s Cell<u32>,
}

impl Drop for DepthGuard<'_> {
    fn drop(&mut self) {
        self.depth.set(self.depth.get() - 1);
    }
}

impl<'a> TypeSolver<'a> {
    pub fn new(module: &'a Module) -> Self {
        Self {
            module,
            max_depth: module.config().solver.max_depth,
            depth: Cell::new(0),
        }
    }

    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn module(&self) -> &'a Module {
        self.module
    }

    pub fn profile(&self) -> &'a dyn LanguageProfile {
        self.module.profile().as_ref()
    }

    fn enter(&self) -> Option<DepthGuard<'_>> {
        let depth = self.depth.get();
        if depth >= self.max_depth {
            tracing::debug!("Type resolution gave up at depth {}", depth);
            return None;
        }
        self.depth.set(depth + 1);
        Some(DepthGuard { depth: &self.depth })
    }

    /// Module and entity behind a reference anywhere in the search chain.
    pub fn resolve(&self, entity: EntityRef) -> Option<(&'a Module, &'a Entity)> {
        self.module.resolve_ref(entity)
    }

    pub fn solve(&self, type_ref: &TypeReference, scope: EntityId) -> Option<SolvedType> {
        self.solve_with(type_ref, scope, &Substitution::new())
    }

    /// Solve under the bindings of `substitution`, e.g. the receiver's type
    /// arguments when solving a member's declared type.
    pub fn solve_with(
        &self,
        type_ref: &TypeReference,
        scope: EntityId,
        substitution: &Substitution,
    ) -> Option<SolvedType> {
        let solved = self.solve_in(self.module, type_ref, scope, substitution, Lookup::Body);
        if solved.is_none() {
            tracing::debug!("Unresolved type {} in scope {:?}", type_ref, scope);
        }
        solved
    }

    fn solve_in(
        &self,
        m: &'a Module,
        type_ref: &TypeReference,
        scope: EntityId,
        subst: &Substitution,
        lookup: Lookup,
    ) -> Option<SolvedType> {
        let _guard = self.enter()?;
        let (first, rest) = type_ref.segments.split_first()?;

        if rest.is_empty() && type_ref.type_arguments.is_empty() {
            if let Some(primitive) = self.profile().primitive(first) {
                return Some(SolvedType::primitive(primitive).with_array(type_ref.is_array));
            }
        }

        // A qualifier names a package or type first; a variable of the same
        // name is only tried when that walk fails.
        let solved = self
            .walk_segments(m, first, rest, scope, subst, lookup, true)
            .or_else(|| {
                if rest.is_empty() {
                    return None;
                }
                self.walk_segments(m, first, rest, scope, subst, lookup, false)
            })?;
        Some(self.apply_arguments(m, solved, type_ref, scope, subst, lookup))
    }

    #[allow(clippy::too_many_arguments)]
    fn walk_segments(
        &self,
        m: &'a Module,
        first: &SmolStr,
        rest: &[SmolStr],
        scope: EntityId,
        subst: &Substitution,
        lookup: Lookup,
        type_only: bool,
    ) -> Option<SolvedType> {
        let mut step = self.resolve_first(m, first, scope, subst, lookup, type_only)?;
        for (i, segment) in rest.iter().enumerate() {
            step = self.member_access(m, step, segment, i + 1 == rest.len())?;
        }
        match step {
            Step::Type(solved) => Some(solved),
            _ => None,
        }
    }

    /// Bind the declared type parameters of the resolved class to the
    /// reference's type arguments, positionally.
    fn apply_arguments(
        &self,
        m: &'a Module,
        mut solved: SolvedType,
        type_ref: &TypeReference,
        scope: EntityId,
        subst: &Substitution,
        lookup: Lookup,
    ) -> SolvedType {
        solved.is_array |= type_ref.is_array;
        if type_ref.type_arguments.is_empty() {
            return solved;
        }
        let Some(class) = solved.entity_ref() else {
            return solved;
        };
        let Some((_, entity)) = self.resolve(class) else {
            return solved;
        };
        for (param, arg) in entity.type_parameters().iter().zip(&type_ref.type_arguments) {
            let bound = self
                .solve_in(m, arg, scope, subst, lookup)
                .unwrap_or_else(|| SolvedType::type_variable(class, param.name.clone()));
            solved
                .substitution
                .insert(TypeVariableKey::new(class, param.name.clone()), bound);
        }
        solved
    }

    fn resolve_first(
        &self,
        m: &'a Module,
        name: &SmolStr,
        scope: EntityId,
        subst: &Substitution,
        lookup: Lookup,
        type_only: bool,
    ) -> Option<Step> {
        if let Some(solved) = self.type_parameter(m, name, scope, subst) {
            return Some(Step::Type(solved));
        }

        let accept = |e: &Entity| is_named_step(e, type_only);
        let mut current = Some(scope);
        while let Some(id) = current {
            let entity = m.entity(id)?;
            match &entity.data {
                EntityData::Class(_) => {
                    if lookup == Lookup::Body || id != scope {
                        let owner = SolvedType::entity(m.entity_ref(id))
                            .with_substitution(subst.clone());
                        let found = self.find_members_where(&owner, name, accept);
                        if let Some((member, bindings)) = found.into_iter().next() {
                            return self.member_step(member, bindings);
                        }
                    }
                }
                EntityData::Method(_) | EntityData::Package(_) => {
                    let found = m
                        .lookup(id, name)
                        .iter()
                        .find(|c| m.entity(**c).is_some_and(accept));
                    if let Some(found) = found {
                        return self.member_step(m.entity_ref(*found), subst.clone());
                    }
                }
                EntityData::File(file) => {
                    // The file context covers the package; nothing above it
                    // is lexically enclosing.
                    return self
                        .resolve_in_file(m, file, name, type_only)
                        .or_else(|| self.resolve_global(m, name));
                }
                EntityData::Variable(_) | EntityData::Primitive => {}
            }
            current = entity.parent;
        }
        self.resolve_global(m, name)
    }

    /// Type parameter `name` declared by `scope` or an enclosing scope.
    fn type_parameter(
        &self,
        m: &'a Module,
        name: &SmolStr,
        scope: EntityId,
        subst: &Substitution,
    ) -> Option<SolvedType> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let entity = m.entity(id)?;
            if entity.type_parameters().iter().any(|p| p.name == *name) {
                let key = TypeVariableKey::new(m.entity_ref(id), name.clone());
                return Some(
                    subst
                        .get(&key)
                        .cloned()
                        .unwrap_or_else(|| SolvedType::type_variable(key.owner, key.name)),
                );
            }
            current = entity.parent;
        }
        None
    }

    fn resolve_in_file(
        &self,
        m: &'a Module,
        file: &FileData,
        name: &SmolStr,
        type_only: bool,
    ) -> Option<Step> {
        if let Some(own) = file.members.get(name).first() {
            return self.member_step(m.entity_ref(*own), Substitution::new());
        }

        let single = file
            .imports
            .iter()
            .filter(|i| !i.is_static && !i.on_demand && i.simple_name() == Some(name));
        for import in single {
            if let Some(found) = self.find_type_in(m, &import.path) {
                return Some(Step::Type(found));
            }
        }

        for import in file.imports.iter().filter(|i| !i.is_static && i.on_demand) {
            if let Some(found) = self.find_type_in(m, &with_segment(&import.path, name)) {
                return Some(Step::Type(found));
            }
        }

        let accept = |e: &Entity| e.is_static && is_named_step(e, type_only);
        let static_single = file
            .imports
            .iter()
            .filter(|i| i.is_static && !i.on_demand && i.simple_name() == Some(name));
        for import in static_single {
            let owner_path = &import.path[..import.path.len() - 1];
            let Some(owner) = self.find_type_in(m, owner_path) else {
                continue;
            };
            if let Some((member, bindings)) =
                self.find_members_where(&owner, name, accept).into_iter().next()
            {
                return self.member_step(member, bindings);
            }
        }
        for import in file.imports.iter().filter(|i| i.is_static && i.on_demand) {
            let Some(owner) = self.find_type_in(m, &import.path) else {
                continue;
            };
            if let Some((member, bindings)) =
                self.find_members_where(&owner, name, accept).into_iter().next()
            {
                return self.member_step(member, bindings);
            }
        }

        if let Some(found) = self.find_type_in(m, &with_segment(&file.package, name)) {
            return Some(Step::Type(found));
        }

        self.profile().default_imports().iter().find_map(|package| {
            let path: Vec<SmolStr> = split_dotted(package);
            self.find_type_in(m, &with_segment(&path, name))
                .map(Step::Type)
        })
    }

    /// Top-level names across the search chain: default-package types, then
    /// root packages for fully qualified access.
    fn resolve_global(&self, m: &'a Module, name: &SmolStr) -> Option<Step> {
        let modules = m.modules();
        for module in &modules {
            let found = module
                .lookup(module.root(), name)
                .iter()
                .find(|id| module.entity(**id).is_some_and(|e| e.kind.is_class_like()));
            if let Some(found) = found {
                return Some(Step::Type(SolvedType::entity(module.entity_ref(*found))));
            }
        }
        modules
            .iter()
            .any(|module| module.package(name).is_some())
            .then(|| Step::Package(vec![name.clone()]))
    }

    fn member_access(
        &self,
        m: &'a Module,
        step: Step,
        segment: &SmolStr,
        last: bool,
    ) -> Option<Step> {
        match step {
            Step::Package(mut path) => {
                path.push(segment.clone());
                if let Some(found) = self.find_type_in(m, &path) {
                    return Some(Step::Type(found));
                }
                let dotted = path.join(".");
                m.modules()
                    .iter()
                    .any(|module| module.package(&dotted).is_some())
                    .then_some(Step::Package(path))
            }
            Step::Type(owner) => {
                let owner = self.member_owner(owner)?;
                if owner.is_array || owner.as_primitive().is_some() {
                    return None;
                }
                let (member, bindings) = self
                    .find_members_where(&owner, segment, |e| is_named_step(e, last))
                    .into_iter()
                    .next()?;
                self.member_step(member, bindings)
            }
            Step::Variable(variable, bindings) => {
                let ty = self.type_of(variable, &bindings)?;
                self.member_access(m, Step::Type(ty), segment, last)
            }
        }
    }

    fn member_step(&self, member: EntityRef, bindings: Substitution) -> Option<Step> {
        let (_, entity) = self.resolve(member)?;
        if entity.kind.is_class_like() {
            Some(Step::Type(
                SolvedType::entity(member).with_substitution(bindings),
            ))
        } else if entity.kind.is_variable() {
            Some(Step::Variable(member, bindings))
        } else {
            None
        }
    }

    /// Class-like entity at a dotted path, searched in `m` and its
    /// dependencies. Packages span modules, so each module is tried whole.
    fn find_type_in(&self, m: &'a Module, path: &[SmolStr]) -> Option<SolvedType> {
        if path.is_empty() {
            return None;
        }
        let dotted = path.join(".");
        m.modules().into_iter().find_map(|module| {
            let id = module.find_qualified(&dotted)?;
            module
                .entity(id)
                .filter(|e| e.kind.is_class_like())
                .map(|_| SolvedType::entity(module.entity_ref(id)))
        })
    }
}

/// Entities a name segment may stand for: types, and variables unless only
/// a type is acceptable.
fn is_named_step(entity: &Entity, type_only: bool) -> bool {
    entity.kind.is_class_like() || (!type_only && entity.kind.is_variable())
}

fn with_segment(path: &[SmolStr], name: &SmolStr) -> Vec<SmolStr> {
    let mut out = path.to_vec();
    out.push(name.clone());
    out
}

fn split_dotted(dotted: &str) -> Vec<SmolStr> {
    dotted
        .split('.')
        .filter(|s| !s.is_empty())
        .map(SmolStr::new)
        .collect()
}
