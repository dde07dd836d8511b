//! Entities and the scopes embedded in them.
//!
//! A class-like entity is both a named symbol and a container of members.
//! The member map lives inside the variant data, so entity identity
//! (name, kind, owner) and member storage stay separate.

use super::arena::EntityId;
use super::decl::{Import, TypeParameter};
use super::line_map::LineMap;
use crate::index::NestedRangeLookup;
use indexmap::IndexMap;
use semascope_api::models::{EntityKind, TextRange, TypeReference};
use smol_str::SmolStr;
use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

static NEXT_MODULE_ID: AtomicU32 = AtomicU32::new(1);

/// Identity of a `Module`, unique within the process.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct ModuleId(u32);

impl ModuleId {
    pub(crate) fn fresh() -> Self {
        ModuleId(NEXT_MODULE_ID.fetch_add(1, Ordering::SeqCst))
    }
}

impl fmt::Debug for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ModuleId({})", self.0)
    }
}

/// An entity handle qualified by the module that owns it.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct EntityRef {
    pub module: ModuleId,
    pub id: EntityId,
}

impl EntityRef {
    pub const fn new(module: ModuleId, id: EntityId) -> Self {
        Self { module, id }
    }
}

impl fmt::Debug for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}/{:?}", self.module, self.id)
    }
}

/// Simple name to the entities declared under it, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct Members {
    map: IndexMap<SmolStr, Vec<EntityId>>,
}

impl Members {
    pub fn get(&self, name: &str) -> &[EntityId] {
        self.map.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SmolStr, &[EntityId])> {
        self.map.iter().map(|(name, ids)| (name, ids.as_slice()))
    }

    pub fn ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.map.values().flatten().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub(crate) fn push(&mut self, name: SmolStr, id: EntityId) {
        self.map.entry(name).or_default().push(id);
    }

    /// Drop `id` from the entry for `name`; empty entries are removed.
    pub(crate) fn remove(&mut self, name: &str, id: EntityId) {
        if let Some(ids) = self.map.get_mut(name) {
            ids.retain(|existing| *existing != id);
            if ids.is_empty() {
                self.map.shift_remove(name);
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PackageData {
    pub subpackages: IndexMap<SmolStr, EntityId>,
    pub files: Vec<EntityId>,
    /// Top-level types visible in this package. Types declared in files
    /// are indexed here but owned by their file.
    pub members: Members,
}

#[derive(Debug, Clone)]
pub struct FileData {
    /// Normalized path, the key of the module's file index.
    pub path: String,
    pub package: Vec<SmolStr>,
    pub imports: Vec<Import>,
    pub line_map: LineMap,
    pub members: Members,
    /// Innermost scope (file, class or method) per offset.
    pub scopes: NestedRangeLookup<EntityId>,
}

#[derive(Debug, Clone, Default)]
pub struct ClassData {
    pub superclass: Option<TypeReference>,
    pub interfaces: Vec<TypeReference>,
    pub type_parameters: Vec<TypeParameter>,
    pub members: Members,
}

#[derive(Debug, Clone, Default)]
pub struct MethodData {
    /// `None` for constructors.
    pub return_type: Option<TypeReference>,
    pub parameters: Vec<EntityId>,
    pub type_parameters: Vec<TypeParameter>,
    /// The last parameter is an array accepting zero or more trailing arguments.
    pub is_varargs: bool,
    /// Parameters and locals.
    pub members: Members,
}

#[derive(Debug, Clone)]
pub struct VariableData {
    pub type_ref: TypeReference,
}

#[derive(Debug, Clone)]
pub enum EntityData {
    Package(PackageData),
    File(FileData),
    Class(ClassData),
    Method(MethodData),
    Variable(VariableData),
    Primitive,
}

#[derive(Debug, Clone)]
pub struct Entity {
    pub name: SmolStr,
    pub kind: EntityKind,
    /// Enclosing simple names, outer to inner, excluding the entity itself.
    pub qualifiers: Vec<SmolStr>,
    pub is_static: bool,
    pub range: TextRange,
    /// Owning scope. Set by the module when the entity is attached.
    pub parent: Option<EntityId>,
    pub data: EntityData,
}

impl Entity {
    fn new(name: impl Into<SmolStr>, kind: EntityKind, data: EntityData) -> Self {
        Self {
            name: name.into(),
            kind,
            qualifiers: Vec::new(),
            is_static: false,
            range: TextRange::default(),
            parent: None,
            data,
        }
    }

    /// A class-like entity of the given kind, without members.
    pub fn class(name: impl Into<SmolStr>, kind: EntityKind, data: ClassData) -> Self {
        Self::new(name, kind, EntityData::Class(data))
    }

    pub fn method(name: impl Into<SmolStr>, data: MethodData) -> Self {
        Self::new(name, EntityKind::Method, EntityData::Method(data))
    }

    /// A field, local variable or parameter depending on `kind`.
    pub fn variable(name: impl Into<SmolStr>, kind: EntityKind, type_ref: TypeReference) -> Self {
        Self::new(name, kind, EntityData::Variable(VariableData { type_ref }))
    }

    pub(crate) fn package(name: impl Into<SmolStr>) -> Self {
        Self::new(
            name,
            EntityKind::Package,
            EntityData::Package(PackageData::default()),
        )
    }

    pub(crate) fn file(data: FileData) -> Self {
        Self::new(data.path.clone(), EntityKind::File, EntityData::File(data))
    }

    pub fn with_range(mut self, range: TextRange) -> Self {
        self.range = range;
        self
    }

    pub fn with_static(mut self, is_static: bool) -> Self {
        self.is_static = is_static;
        self
    }

    pub fn members(&self) -> Option<&Members> {
        match &self.data {
            EntityData::Package(p) => Some(&p.members),
            EntityData::File(f) => Some(&f.members),
            EntityData::Class(c) => Some(&c.members),
            EntityData::Method(m) => Some(&m.members),
            EntityData::Variable(_) | EntityData::Primitive => None,
        }
    }

    pub(crate) fn members_mut(&mut self) -> Option<&mut Members> {
        match &mut self.data {
            EntityData::Package(p) => Some(&mut p.members),
            EntityData::File(f) => Some(&mut f.members),
            EntityData::Class(c) => Some(&mut c.members),
            EntityData::Method(m) => Some(&mut m.members),
            EntityData::Variable(_) | EntityData::Primitive => None,
        }
    }

    pub fn is_scope(&self) -> bool {
        self.members().is_some()
    }

    pub fn as_package(&self) -> Option<&PackageData> {
        match &self.data {
            EntityData::Package(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_file(&self) -> Option<&FileData> {
        match &self.data {
            EntityData::File(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_class(&self) -> Option<&ClassData> {
        match &self.data {
            EntityData::Class(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_method(&self) -> Option<&MethodData> {
        match &self.data {
            EntityData::Method(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_variable(&self) -> Option<&VariableData> {
        match &self.data {
            EntityData::Variable(v) => Some(v),
            _ => None,
        }
    }

    /// Type parameters declared directly on this entity.
    pub fn type_parameters(&self) -> &[TypeParameter] {
        match &self.data {
            EntityData::Class(c) => &c.type_parameters,
            EntityData::Method(m) => &m.type_parameters,
            _ => &[],
        }
    }

    /// Qualifier path handed down to entities declared inside this one.
    pub fn child_qualifiers(&self) -> Vec<SmolStr> {
        match &self.data {
            EntityData::File(f) => f.package.clone(),
            EntityData::Package(_) if self.name.is_empty() => Vec::new(),
            _ => {
                let mut qualifiers = self.qualifiers.clone();
                qualifiers.push(self.name.clone());
                qualifiers
            }
        }
    }

    /// Dotted name, e.g. `java.util.Map.Entry`.
    pub fn qualified_name(&self) -> String {
        match &self.data {
            EntityData::File(f) => f.path.clone(),
            _ => {
                let mut parts: Vec<&str> = self.qualifiers.iter().map(SmolStr::as_str).collect();
                if !self.name.is_empty() {
                    parts.push(&self.name);
                }
                parts.join(".")
            }
        }
    }
}
