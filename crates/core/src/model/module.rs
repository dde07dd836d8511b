use super::arena::{Arena, EntityId};
use super::decl::{ClassDecl, FileDecl, MemberDecl, MethodDecl};
use super::entity::{ClassData, Entity, EntityData, EntityRef, FileData, MethodData, ModuleId};
use crate::config::EngineConfig;
use crate::error::{CoreError, Result};
use crate::index::NestedRangeLookup;
use crate::profile::LanguageProfile;
use indexmap::IndexMap;
use semascope_api::models::{EntityKind, LineCol, TextRange};
use smol_str::SmolStr;
use std::collections::HashSet;
use std::sync::Arc;

/// The index of one codebase: a package tree rooted at an unnamed package,
/// the files hanging off it, and read-only dependency modules searched after
/// the local one.
#[derive(Debug)]
pub struct Module {
    id: ModuleId,
    name: SmolStr,
    profile: Arc<dyn LanguageProfile>,
    config: EngineConfig,
    entities: Arena<Entity>,
    root: EntityId,
    files: IndexMap<String, EntityId>,
    dependencies: Vec<Arc<Module>>,
}

impl Module {
    pub fn new(name: impl Into<SmolStr>, profile: Arc<dyn LanguageProfile>) -> Self {
        Self::with_config(name, profile, EngineConfig::default())
    }

    pub fn with_config(
        name: impl Into<SmolStr>,
        profile: Arc<dyn LanguageProfile>,
        config: EngineConfig,
    ) -> Self {
        let mut entities = Arena::default();
        let root = entities.alloc(Entity::package(""));
        Self {
            id: ModuleId::fresh(),
            name: name.into(),
            profile,
            config,
            entities,
            root,
            files: IndexMap::new(),
            dependencies: Vec::new(),
        }
    }

    pub fn id(&self) -> ModuleId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn profile(&self) -> &Arc<dyn LanguageProfile> {
        &self.profile
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The unnamed root package.
    pub fn root(&self) -> EntityId {
        self.root
    }

    /// Live entity behind `id`; `None` once its subtree was removed.
    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id)
    }

    pub fn entity_ref(&self, id: EntityId) -> EntityRef {
        EntityRef::new(self.id, id)
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Entities declared directly in `scope` under `name`. No chain walk.
    pub fn lookup(&self, scope: EntityId, name: &str) -> &[EntityId] {
        self.entities
            .get(scope)
            .and_then(Entity::members)
            .map(|members| members.get(name))
            .unwrap_or(&[])
    }

    /// Attach a detached entity to `scope`.
    ///
    /// Methods join the overload set of their name. Any other kind replaces
    /// the non-method entries of that name, whose subtrees are freed.
    pub fn add_entity(&mut self, scope: EntityId, mut entity: Entity) -> Result<EntityId> {
        check_detached(&entity)?;
        if entity.range.start > entity.range.end {
            return Err(CoreError::InvalidRange {
                start: entity.range.start,
                end: entity.range.end,
            });
        }
        let owner = self
            .entities
            .get(scope)
            .ok_or(CoreError::UnknownScope(scope))?;
        let Some(members) = owner.members() else {
            return Err(CoreError::Invariant(format!(
                "{} `{}` cannot own members",
                owner.kind, owner.name
            )));
        };

        let replaced: Vec<EntityId> = if entity.kind == EntityKind::Method {
            Vec::new()
        } else {
            members
                .get(&entity.name)
                .iter()
                .copied()
                .filter(|id| {
                    self.entities
                        .get(*id)
                        .is_some_and(|e| e.kind != EntityKind::Method)
                })
                .collect()
        };
        // A class-like declared in a file is also visible through its package.
        let package = match owner.kind {
            EntityKind::File if entity.kind.is_class_like() => owner.parent,
            _ => None,
        };
        entity.qualifiers = owner.child_qualifiers();
        entity.parent = Some(scope);

        for old in replaced {
            self.detach(old);
            self.free_subtree(old);
        }

        let name = entity.name.clone();
        let kind = entity.kind;
        let id = self.entities.alloc(entity);
        if let Some(owner) = self.entities.get_mut(scope) {
            if let Some(members) = owner.members_mut() {
                members.push(name.clone(), id);
            }
            if let (EntityKind::Parameter, EntityData::Method(method)) = (kind, &mut owner.data) {
                method.parameters.push(id);
            }
        }
        if let Some(package) = package.and_then(|p| self.entities.get_mut(p)) {
            if let Some(members) = package.members_mut() {
                members.push(name, id);
            }
        }
        Ok(id)
    }

    /// Index a parsed file, replacing any previous file at the same path.
    ///
    /// On failure nothing of the new file is left behind; the previous
    /// version is gone either way.
    pub fn add_or_replace_file(&mut self, decl: FileDecl) -> Result<EntityId> {
        let path = normalize_path(&decl.path);
        if decl.range.start > decl.range.end {
            return Err(CoreError::InvalidRange {
                start: decl.range.start,
                end: decl.range.end,
            });
        }
        if self.remove_file(&path) {
            tracing::debug!("Replacing {} in module {}", path, self.name);
        }

        let package = self.ensure_package(&decl.package);
        let qualifiers = self
            .entities
            .get(package)
            .map(Entity::child_qualifiers)
            .unwrap_or_default();
        let mut file = Entity::file(FileData {
            path: path.clone(),
            package: decl.package,
            imports: decl.imports,
            line_map: decl.line_map,
            members: Default::default(),
            scopes: NestedRangeLookup::new(),
        })
        .with_range(decl.range);
        file.qualifiers = qualifiers;
        file.parent = Some(package);
        let file_id = self.entities.alloc(file);
        if let Some(EntityData::Package(data)) = self.entities.get_mut(package).map(|e| &mut e.data)
        {
            data.files.push(file_id);
        }
        self.files.insert(path.clone(), file_id);

        match self.populate_file(file_id, decl.range, decl.types) {
            Ok(scopes) => {
                if let Some(EntityData::File(data)) =
                    self.entities.get_mut(file_id).map(|e| &mut e.data)
                {
                    data.scopes = scopes;
                }
                tracing::debug!("Indexed {} in module {}", path, self.name);
                Ok(file_id)
            }
            Err(e) => {
                self.remove_file(&path);
                Err(e)
            }
        }
    }

    fn populate_file(
        &mut self,
        file: EntityId,
        range: TextRange,
        types: Vec<ClassDecl>,
    ) -> Result<NestedRangeLookup<EntityId>> {
        let mut scopes = vec![(range, file)];
        for class in types {
            self.insert_class(file, class, &mut scopes)?;
        }
        NestedRangeLookup::build(scopes)
    }

    fn insert_class(
        &mut self,
        scope: EntityId,
        decl: ClassDecl,
        scopes: &mut Vec<(TextRange, EntityId)>,
    ) -> Result<EntityId> {
        if !decl.kind.is_class_like() {
            return Err(CoreError::Invariant(format!(
                "type declaration `{}` has kind {}",
                decl.name, decl.kind
            )));
        }
        let entity = Entity::class(
            decl.name,
            decl.kind,
            ClassData {
                superclass: decl.superclass,
                interfaces: decl.interfaces,
                type_parameters: decl.type_parameters,
                members: Default::default(),
            },
        )
        .with_range(decl.range)
        .with_static(decl.is_static);
        let id = self.add_entity(scope, entity)?;
        scopes.push((decl.range, id));

        for member in decl.members {
            match member {
                MemberDecl::Field(field) => {
                    let entity = Entity::variable(field.name, EntityKind::Field, field.type_ref)
                        .with_range(field.range)
                        .with_static(field.is_static);
                    self.add_entity(id, entity)?;
                }
                MemberDecl::Method(method) => {
                    self.insert_method(id, method, scopes)?;
                }
                MemberDecl::Class(class) => {
                    self.insert_class(id, class, scopes)?;
                }
            }
        }
        Ok(id)
    }

    fn insert_method(
        &mut self,
        scope: EntityId,
        decl: MethodDecl,
        scopes: &mut Vec<(TextRange, EntityId)>,
    ) -> Result<EntityId> {
        let entity = Entity::method(
            decl.name,
            MethodData {
                return_type: decl.return_type,
                parameters: Vec::new(),
                type_parameters: decl.type_parameters,
                is_varargs: decl.is_varargs,
                members: Default::default(),
            },
        )
        .with_range(decl.range)
        .with_static(decl.is_static);
        let id = self.add_entity(scope, entity)?;
        scopes.push((decl.range, id));

        for param in decl.parameters {
            let entity = Entity::variable(param.name, EntityKind::Parameter, param.type_ref)
                .with_range(param.range);
            self.add_entity(id, entity)?;
        }
        for local in decl.locals {
            let entity = Entity::variable(local.name, EntityKind::Variable, local.type_ref)
                .with_range(local.range);
            self.add_entity(id, entity)?;
        }
        Ok(id)
    }

    /// Detach and free a file subtree. Handles into it go stale.
    pub fn remove_file(&mut self, path: &str) -> bool {
        let path = normalize_path(path);
        let Some(file) = self.files.shift_remove(&path) else {
            return false;
        };
        let top_level: Vec<(SmolStr, EntityId)> = self
            .entities
            .get(file)
            .and_then(Entity::members)
            .map(|members| {
                members
                    .iter()
                    .flat_map(|(name, ids)| ids.iter().map(move |id| (name.clone(), *id)))
                    .collect()
            })
            .unwrap_or_default();
        let package = self.entities.get(file).and_then(|e| e.parent);
        if let Some(members) = package
            .and_then(|p| self.entities.get_mut(p))
            .and_then(Entity::members_mut)
        {
            for (name, id) in &top_level {
                members.remove(name, *id);
            }
        }

        self.detach(file);
        self.free_subtree(file);
        tracing::debug!("Removed {} from module {}", path, self.name);
        true
    }

    /// Append a dependency searched after this module. A module already in
    /// the search chain is skipped.
    pub fn add_depending_module(&mut self, dependency: Arc<Module>) {
        if self.modules().iter().any(|m| m.id == dependency.id) {
            tracing::debug!(
                "Module {} already depends on {}",
                self.name,
                dependency.name
            );
            return;
        }
        tracing::debug!("Module {} now depends on {}", self.name, dependency.name);
        self.dependencies.push(dependency);
    }

    pub fn dependencies(&self) -> &[Arc<Module>] {
        &self.dependencies
    }

    /// Search chain: this module, then dependencies depth-first in
    /// declaration order, each module once.
    pub fn modules(&self) -> Vec<&Module> {
        fn visit<'a>(module: &'a Module, out: &mut Vec<&'a Module>, seen: &mut HashSet<ModuleId>) {
            if !seen.insert(module.id) {
                return;
            }
            out.push(module);
            for dependency in &module.dependencies {
                visit(dependency, out, seen);
            }
        }

        let mut out = Vec::new();
        visit(self, &mut out, &mut HashSet::new());
        out
    }

    pub fn module(&self, id: ModuleId) -> Option<&Module> {
        self.modules().into_iter().find(|m| m.id == id)
    }

    pub fn resolve_ref(&self, entity: EntityRef) -> Option<(&Module, &Entity)> {
        let module = self.module(entity.module)?;
        module.entity(entity.id).map(|e| (module, e))
    }

    pub fn file(&self, path: &str) -> Option<EntityId> {
        self.files.get(&normalize_path(path)).copied()
    }

    pub fn files(&self) -> impl Iterator<Item = (&str, EntityId)> {
        self.files.iter().map(|(path, id)| (path.as_str(), *id))
    }

    /// Package node for a dotted name; the empty string is the root.
    pub fn package(&self, dotted: &str) -> Option<EntityId> {
        dotted
            .split('.')
            .filter(|s| !s.is_empty())
            .try_fold(self.root, |current, segment| {
                self.entities
                    .get(current)?
                    .as_package()?
                    .subpackages
                    .get(segment)
                    .copied()
            })
    }

    /// Entity for a dotted name in this module only, e.g. `a.b.Outer.Inner`.
    ///
    /// At a package, a type of that name is preferred over a subpackage.
    pub fn find_qualified(&self, dotted: &str) -> Option<EntityId> {
        let mut current = self.root;
        for segment in dotted.split('.').filter(|s| !s.is_empty()) {
            let entity = self.entities.get(current)?;
            let next = entity.members().and_then(|m| m.get(segment).first().copied());
            current = match (next, entity.as_package()) {
                (Some(id), _) => id,
                (None, Some(package)) => *package.subpackages.get(segment)?,
                (None, None) => return None,
            };
        }
        Some(current)
    }

    pub fn qualified_name(&self, id: EntityId) -> Option<String> {
        self.entities.get(id).map(Entity::qualified_name)
    }

    /// Owning scope of `id`.
    pub fn enclosing(&self, id: EntityId) -> Option<EntityId> {
        self.entities.get(id)?.parent
    }

    /// File that declares `id`, if it lives in one.
    pub fn file_of(&self, id: EntityId) -> Option<EntityId> {
        let mut current = Some(id);
        while let Some(id) = current {
            let entity = self.entities.get(id)?;
            if entity.kind == EntityKind::File {
                return Some(id);
            }
            current = entity.parent;
        }
        None
    }

    /// Innermost scope at `offset` in a file, or the file scope itself when
    /// no nested scope covers the offset.
    pub fn scope_at(&self, path: &str, offset: u32) -> Option<EntityId> {
        let file = self.file(path)?;
        let data = self.entities.get(file)?.as_file()?;
        Some(
            data.scopes
                .query(offset)
                .copied()
                .filter(|id| self.entities.contains(*id))
                .unwrap_or(file),
        )
    }

    pub fn scope_at_position(&self, path: &str, pos: LineCol) -> Option<EntityId> {
        let file = self.file(path)?;
        let data = self.entities.get(file)?.as_file()?;
        match data.line_map.offset(pos) {
            Some(offset) => self.scope_at(path, offset),
            None => Some(file),
        }
    }

    fn ensure_package(&mut self, path: &[SmolStr]) -> EntityId {
        let mut current = self.root;
        for segment in path {
            let Some(parent) = self.entities.get(current) else {
                break;
            };
            if let Some(existing) = parent
                .as_package()
                .and_then(|p| p.subpackages.get(segment))
            {
                current = *existing;
                continue;
            }
            let mut package = Entity::package(segment.clone());
            package.qualifiers = parent.child_qualifiers();
            package.parent = Some(current);
            let id = self.entities.alloc(package);
            if let Some(EntityData::Package(data)) =
                self.entities.get_mut(current).map(|e| &mut e.data)
            {
                data.subpackages.insert(segment.clone(), id);
            }
            current = id;
        }
        current
    }

    /// Unlink `id` from its owner's member map, parameter list or file list.
    fn detach(&mut self, id: EntityId) {
        let Some(entity) = self.entities.get(id) else {
            return;
        };
        let (name, kind) = (entity.name.clone(), entity.kind);
        let Some(parent) = entity.parent else {
            return;
        };
        let package = self
            .entities
            .get(parent)
            .filter(|owner| owner.kind == EntityKind::File && kind.is_class_like())
            .and_then(|owner| owner.parent);

        if let Some(owner) = self.entities.get_mut(parent) {
            if let Some(members) = owner.members_mut() {
                members.remove(&name, id);
            }
            match &mut owner.data {
                EntityData::Method(method) => method.parameters.retain(|p| *p != id),
                EntityData::Package(data) => data.files.retain(|f| *f != id),
                _ => {}
            }
        }
        if let Some(members) = package
            .and_then(|p| self.entities.get_mut(p))
            .and_then(Entity::members_mut)
        {
            members.remove(&name, id);
        }
    }

    fn free_subtree(&mut self, id: EntityId) {
        let mut stack = vec![id];
        while let Some(id) = stack.pop() {
            let Some(entity) = self.entities.remove(id) else {
                continue;
            };
            match &entity.data {
                // Package members are owned by files.
                EntityData::Package(data) => {
                    stack.extend(data.subpackages.values().copied());
                    stack.extend(data.files.iter().copied());
                }
                _ => {
                    if let Some(members) = entity.members() {
                        stack.extend(members.ids());
                    }
                }
            }
        }
    }
}

/// An entity handed to `add_entity` must be fresh: unowned, memberless and
/// with data matching its kind.
fn check_detached(entity: &Entity) -> Result<()> {
    if entity.parent.is_some() {
        return Err(CoreError::Invariant(format!(
            "{} `{}` is already attached to a scope",
            entity.kind, entity.name
        )));
    }
    let shape_ok = match &entity.data {
        EntityData::Class(_) => entity.kind.is_class_like(),
        EntityData::Method(_) => entity.kind == EntityKind::Method,
        EntityData::Variable(_) => entity.kind.is_variable(),
        EntityData::Primitive => entity.kind == EntityKind::Primitive,
        EntityData::Package(_) | EntityData::File(_) => false,
    };
    if !shape_ok {
        return Err(CoreError::Invariant(format!(
            "{} `{}` cannot be added as a member",
            entity.kind, entity.name
        )));
    }
    let owns_children = entity.members().is_some_and(|m| !m.is_empty())
        || entity.as_method().is_some_and(|m| !m.parameters.is_empty());
    if owns_children {
        return Err(CoreError::Invariant(format!(
            "{} `{}` already owns members",
            entity.kind, entity.name
        )));
    }
    Ok(())
}

/// Canonical form of a file path used as the index key: forward slashes,
/// no empty or `.` segments, `..` folded where possible.
pub fn normalize_path(path: &str) -> String {
    let unified = path.replace('\\', "/");
    let absolute = unified.starts_with('/');
    let mut parts: Vec<&str> = Vec::new();
    for segment in unified.split('/') {
        match segment {
            "" | "." => {}
            ".." if parts.last().is_some_and(|last| *last != "..") => {
                parts.pop();
            }
            ".." if absolute => {}
            other => parts.push(other),
        }
    }
    let joined = parts.join("/");
    if absolute { format!("/{joined}") } else { joined }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Import, TypeParameter, VariableDecl};
    use crate::profile::BareProfile;
    use semascope_api::models::TypeReference;

    fn module() -> Module {
        Module::new("test", Arc::new(BareProfile))
    }

    fn ty(name: &str) -> TypeReference {
        TypeReference::simple(name)
    }

    fn sample_file() -> FileDecl {
        FileDecl::new("src/com/example/A.java")
            .package("com.example")
            .import(Import::single("java.util.List"))
            .at(0, 100)
            .class(
                ClassDecl::class("A")
                    .at(10, 90)
                    .type_param(TypeParameter::new("T"))
                    .field(VariableDecl::new("count", ty("int")).at(20, 30))
                    .method(
                        MethodDecl::new("run")
                            .returns(ty("void"))
                            .param("x", ty("int"))
                            .local(VariableDecl::new("y", ty("int")))
                            .at(40, 60),
                    )
                    .method(
                        MethodDecl::new("run")
                            .returns(ty("void"))
                            .param("s", ty("String"))
                            .at(60, 70),
                    )
                    .nested(ClassDecl::class("Inner").at(72, 88)),
            )
    }

    #[test]
    fn test_file_tree_and_qualifiers() {
        let mut m = module();
        let file = m.add_or_replace_file(sample_file()).unwrap();

        let a = m.lookup(file, "A")[0];
        let entity = m.entity(a).unwrap();
        assert_eq!(entity.qualifiers, vec!["com", "example"]);
        assert_eq!(m.qualified_name(a).as_deref(), Some("com.example.A"));

        let inner = m.lookup(a, "Inner")[0];
        assert_eq!(m.qualified_name(inner).as_deref(), Some("com.example.A.Inner"));
        assert_eq!(m.find_qualified("com.example.A.Inner"), Some(inner));
        assert_eq!(m.enclosing(inner), Some(a));
        assert_eq!(m.file_of(inner), Some(file));

        let run = m.lookup(a, "run");
        assert_eq!(run.len(), 2);
        let method = m.entity(run[0]).unwrap().as_method().unwrap();
        assert_eq!(method.parameters.len(), 1);
        let x = m.lookup(run[0], "x")[0];
        assert_eq!(m.entity(x).unwrap().kind, EntityKind::Parameter);
        assert_eq!(m.entity(x).unwrap().qualifiers, vec!["com", "example", "A", "run"]);
        assert_eq!(m.lookup(run[0], "y").len(), 1);

        let package = m.package("com.example").unwrap();
        assert_eq!(m.lookup(package, "A"), &[a]);
    }

    #[test]
    fn test_lookup_is_direct_only() {
        let mut m = module();
        let file = m.add_or_replace_file(sample_file()).unwrap();
        let a = m.lookup(file, "A")[0];
        assert!(m.lookup(a, "y").is_empty());
        assert!(m.lookup(file, "count").is_empty());
    }

    #[test]
    fn test_non_method_replaces_and_frees() {
        let mut m = module();
        let file = m.add_or_replace_file(sample_file()).unwrap();
        let a = m.lookup(file, "A")[0];
        let old = m.lookup(a, "count")[0];

        let new = m
            .add_entity(a, Entity::variable("count", EntityKind::Field, ty("long")))
            .unwrap();
        assert_eq!(m.lookup(a, "count"), &[new]);
        assert!(m.entity(old).is_none());

        // Replacing a class frees its members too
        let inner = m.lookup(a, "Inner")[0];
        let leaf = m
            .add_entity(inner, Entity::variable("z", EntityKind::Field, ty("int")))
            .unwrap();
        m.add_entity(a, Entity::class("Inner", EntityKind::Class, ClassData::default()))
            .unwrap();
        assert!(m.entity(inner).is_none());
        assert!(m.entity(leaf).is_none());
    }

    #[test]
    fn test_methods_accumulate_and_survive_field_of_same_name() {
        let mut m = module();
        let file = m.add_or_replace_file(sample_file()).unwrap();
        let a = m.lookup(file, "A")[0];
        m.add_entity(a, Entity::method("run", MethodData::default()))
            .unwrap();
        assert_eq!(m.lookup(a, "run").len(), 3);

        m.add_entity(a, Entity::variable("run", EntityKind::Field, ty("int")))
            .unwrap();
        let kinds: Vec<_> = m
            .lookup(a, "run")
            .iter()
            .map(|id| m.entity(*id).unwrap().kind)
            .collect();
        assert_eq!(kinds.iter().filter(|k| **k == EntityKind::Method).count(), 3);
        assert_eq!(kinds.iter().filter(|k| **k == EntityKind::Field).count(), 1);
    }

    #[test]
    fn test_add_entity_invariants() {
        let mut m = module();
        let file = m.add_or_replace_file(sample_file()).unwrap();
        let a = m.lookup(file, "A")[0];
        let count = m.lookup(a, "count")[0];

        let mut attached = Entity::variable("v", EntityKind::Field, ty("int"));
        attached.parent = Some(a);
        assert!(matches!(
            m.add_entity(a, attached),
            Err(CoreError::Invariant(_))
        ));

        // variables are not scopes
        assert!(matches!(
            m.add_entity(count, Entity::variable("v", EntityKind::Field, ty("int"))),
            Err(CoreError::Invariant(_))
        ));

        let bad_range =
            Entity::variable("v", EntityKind::Field, ty("int")).with_range(TextRange {
                start: 9,
                end: 2,
            });
        assert!(matches!(
            m.add_entity(a, bad_range),
            Err(CoreError::InvalidRange { start: 9, end: 2 })
        ));

        let wrong_shape = Entity::variable("v", EntityKind::Method, ty("int"));
        assert!(matches!(
            m.add_entity(a, wrong_shape),
            Err(CoreError::Invariant(_))
        ));

        m.remove_file("src/com/example/A.java");
        assert!(matches!(
            m.add_entity(a, Entity::variable("v", EntityKind::Field, ty("int"))),
            Err(CoreError::UnknownScope(_))
        ));
    }

    #[test]
    fn test_replace_file_invalidates_old_handles() {
        let mut m = module();
        let before = m.entity_count();
        let file = m.add_or_replace_file(sample_file()).unwrap();
        let a = m.lookup(file, "A")[0];
        let with_file = m.entity_count();

        let again = m
            .add_or_replace_file(FileDecl::new("./src\\com/example/A.java").package("com.example"))
            .unwrap();
        assert!(m.entity(file).is_none());
        assert!(m.entity(a).is_none());
        assert_eq!(m.file("src/com/example/A.java"), Some(again));
        assert!(m.lookup(m.package("com.example").unwrap(), "A").is_empty());
        assert!(m.entity_count() < with_file);

        assert!(m.remove_file("src/com/example/A.java"));
        assert!(!m.remove_file("src/com/example/A.java"));
        assert!(m.entity(again).is_none());
        assert_eq!(m.files().count(), 0);
        // only the two created packages remain beyond the initial root
        assert_eq!(m.entity_count(), before + 2);
    }

    #[test]
    fn test_failed_file_leaves_nothing_behind() {
        let mut m = module();
        let decl = FileDecl::new("Bad.java").class(
            ClassDecl::class("Bad")
                .at(0, 10)
                .field(VariableDecl::new("f", ty("int")).at(8, 3)),
        );
        assert!(matches!(
            m.add_or_replace_file(decl),
            Err(CoreError::InvalidRange { start: 8, end: 3 })
        ));
        assert!(m.file("Bad.java").is_none());
        assert!(m.lookup(m.root(), "Bad").is_empty());
        assert_eq!(m.entity_count(), 1);
    }

    #[test]
    fn test_scope_at_innermost() {
        let mut m = module();
        let file = m.add_or_replace_file(sample_file()).unwrap();
        let a = m.lookup(file, "A")[0];
        let runs = m.lookup(a, "run").to_vec();
        let inner = m.lookup(a, "Inner")[0];
        let path = "src/com/example/A.java";

        assert_eq!(m.scope_at(path, 5), Some(file));
        assert_eq!(m.scope_at(path, 15), Some(a));
        assert_eq!(m.scope_at(path, 45), Some(runs[0]));
        assert_eq!(m.scope_at(path, 65), Some(runs[1]));
        assert_eq!(m.scope_at(path, 80), Some(inner));
        assert_eq!(m.scope_at(path, 95), Some(file));
        // outside every range: the file scope
        assert_eq!(m.scope_at(path, 500), Some(file));
        assert_eq!(m.scope_at("missing.java", 0), None);
    }

    #[test]
    fn test_scope_at_position() {
        let mut m = module();
        let text = "class A {\n  void f() {\n  }\n}\n";
        let decl = FileDecl::new("A.java").with_text(text).class(
            ClassDecl::class("A")
                .at(0, 28)
                .method(MethodDecl::new("f").returns(ty("void")).at(12, 26)),
        );
        let file = m.add_or_replace_file(decl).unwrap();
        let a = m.lookup(file, "A")[0];
        let f = m.lookup(a, "f")[0];
        assert_eq!(m.scope_at_position("A.java", LineCol::new(1, 12)), Some(f));
        assert_eq!(m.scope_at_position("A.java", LineCol::new(0, 3)), Some(a));
        assert_eq!(m.scope_at_position("A.java", LineCol::new(40, 0)), Some(file));
    }

    #[test]
    fn test_dependency_chain_is_depth_first_and_deduplicated() {
        let profile: Arc<dyn LanguageProfile> = Arc::new(BareProfile);
        let base = Arc::new(Module::new("base", profile.clone()));
        let mut left = Module::new("left", profile.clone());
        left.add_depending_module(base.clone());
        let left = Arc::new(left);
        let right = Arc::new(Module::new("right", profile.clone()));

        let mut project = Module::new("project", profile);
        project.add_depending_module(left.clone());
        project.add_depending_module(right.clone());
        project.add_depending_module(base.clone());

        let names: Vec<_> = project.modules().iter().map(|m| m.name()).collect();
        assert_eq!(names, vec!["project", "left", "base", "right"]);
        assert_eq!(project.dependencies().len(), 2);
        assert!(project.module(base.id()).is_some());
    }

    #[test]
    fn test_resolve_ref_across_modules() {
        let mut lib = module();
        let file = lib
            .add_or_replace_file(FileDecl::new("L.java").package("lib").class(ClassDecl::class("L")))
            .unwrap();
        let l = lib.lookup(file, "L")[0];
        let lref = lib.entity_ref(l);
        let mut project = module();
        project.add_depending_module(Arc::new(lib));

        let (owner, entity) = project.resolve_ref(lref).unwrap();
        assert_eq!(entity.name, "L");
        assert_ne!(owner.id(), project.id());
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path("./a//b/./c.java"), "a/b/c.java");
        assert_eq!(normalize_path("a\\b\\..\\c.java"), "a/c.java");
        assert_eq!(normalize_path("/x/../y.java"), "/y.java");
        assert_eq!(normalize_path("../y.java"), "../y.java");
    }
}
