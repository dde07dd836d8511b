use super::CompletionItem;
use crate::model::{Entity, EntityData, EntityId, EntityRef, FileData, Module};
use crate::solver::{SolvedType, TypeSolver};
use semascope_api::models::EntityKind;
use smol_str::SmolStr;
use std::collections::HashSet;

/// Gathers completion candidates from the model.
pub struct CompletionCollector<'s, 'a> {
    solver: &'s TypeSolver<'a>,
    offset: Option<u32>,
}

/// Inner names shadow outer ones, except methods: every overload stays,
/// deduplicated by handle.
#[derive(Default)]
struct Visible {
    names: HashSet<SmolStr>,
    methods: HashSet<EntityRef>,
    items: Vec<CompletionItem>,
}

impl Visible {
    fn offer(&mut self, name: &SmolStr, kind: EntityKind, entity: Option<EntityRef>) {
        if kind == EntityKind::Method {
            let Some(method) = entity else {
                return;
            };
            if !self.methods.insert(method) {
                return;
            }
        } else if !self.names.insert(name.clone()) {
            return;
        }
        self.items.push(CompletionItem::new(name.clone(), kind, entity));
    }

    fn offer_entity(&mut self, entity: &Entity, handle: EntityRef) {
        self.offer(&entity.name, entity.kind, Some(handle));
    }
}

impl<'s, 'a> CompletionCollector<'s, 'a> {
    pub fn new(solver: &'s TypeSolver<'a>) -> Self {
        Self {
            solver,
            offset: None,
        }
    }

    /// Cursor position; locals declared after it are not offered.
    pub fn at_offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    fn declared_before_cursor(&self, entity: &Entity) -> bool {
        entity.kind != EntityKind::Variable
            || self.offset.is_none_or(|offset| entity.range.start <= offset)
    }

    /// Every name visible from `scope`, innermost first: locals and
    /// parameters, class members with inherited ones, the enclosing classes,
    /// the file's types and imports, the package, then top-level names.
    pub fn visible_candidates(&self, scope: EntityId) -> Vec<CompletionItem> {
        let m = self.solver.module();
        let mut visible = Visible::default();

        let mut current = Some(scope);
        while let Some(id) = current {
            let Some(entity) = m.entity(id) else {
                break;
            };
            match &entity.data {
                EntityData::Method(method) => {
                    for member in method.members.ids() {
                        let local = m
                            .entity(member)
                            .filter(|e| self.declared_before_cursor(e));
                        if let Some(e) = local {
                            visible.offer_entity(e, m.entity_ref(member));
                        }
                    }
                }
                EntityData::Class(_) => {
                    let owner = SolvedType::entity(m.entity_ref(id));
                    self.offer_members(&owner, &mut visible);
                    visible.offer_entity(entity, m.entity_ref(id));
                }
                EntityData::File(file) => self.offer_file(m, file, &mut visible),
                _ => {}
            }
            current = entity.parent;
        }

        self.offer_top_level(m, &mut visible);
        tracing::trace!(
            "Collected {} visible names for scope {:?}",
            visible.items.len(),
            scope
        );
        visible.items
    }

    /// Members of a value of type `ty`, own first, then inherited.
    pub fn member_candidates(&self, ty: &SolvedType) -> Vec<CompletionItem> {
        let mut visible = Visible::default();
        self.offer_members(ty, &mut visible);
        visible.items
    }

    fn offer_members(&self, ty: &SolvedType, visible: &mut Visible) {
        for (member, _) in self.solver.members_of(ty) {
            if let Some((_, entity)) = self.solver.resolve(member) {
                visible.offer_entity(entity, member);
            }
        }
    }

    fn offer_file(&self, m: &'a Module, file: &FileData, visible: &mut Visible) {
        for id in file.members.ids() {
            if let Some(entity) = m.entity(id) {
                visible.offer_entity(entity, m.entity_ref(id));
            }
        }

        for import in file.imports.iter().filter(|i| !i.on_demand) {
            if import.is_static {
                let owner_path = import.path[..import.path.len().saturating_sub(1)].join(".");
                let (Some(owner), Some(name)) = (
                    self.solver.find_qualified_type(&owner_path),
                    import.simple_name(),
                ) else {
                    continue;
                };
                for (member, _) in self.solver.find_members(&owner, name) {
                    if let Some((_, entity)) = self.solver.resolve(member) {
                        if entity.is_static {
                            visible.offer_entity(entity, member);
                        }
                    }
                }
            } else if let Some(ty) = self.solver.find_qualified_type(&import.path.join(".")) {
                self.offer_type(&ty, visible);
            }
        }

        for import in file.imports.iter().filter(|i| i.on_demand) {
            let dotted = import.path.join(".");
            if !import.is_static {
                self.offer_package_types(m, &dotted, visible);
                continue;
            }
            let Some(owner) = self.solver.find_qualified_type(&dotted) else {
                continue;
            };
            for (member, _) in self.solver.members_of(&owner) {
                if let Some((_, entity)) = self.solver.resolve(member) {
                    if entity.is_static {
                        visible.offer_entity(entity, member);
                    }
                }
            }
        }

        self.offer_package_types(m, &file.package.join("."), visible);
        for package in self.solver.profile().default_imports() {
            self.offer_package_types(m, package, visible);
        }
    }

    fn offer_type(&self, ty: &SolvedType, visible: &mut Visible) {
        let Some(class) = ty.entity_ref() else {
            return;
        };
        if let Some((_, entity)) = self.solver.resolve(class) {
            visible.offer_entity(entity, class);
        }
    }

    /// Class-like members of a package, across the search chain.
    fn offer_package_types(&self, m: &'a Module, dotted: &str, visible: &mut Visible) {
        for module in m.modules() {
            let Some(members) = module
                .package(dotted)
                .and_then(|package| module.entity(package))
                .and_then(Entity::members)
            else {
                continue;
            };
            for id in members.ids() {
                if let Some(entity) = module.entity(id).filter(|e| e.kind.is_class_like()) {
                    visible.offer_entity(entity, module.entity_ref(id));
                }
            }
        }
    }

    /// Default-package types and root packages of every module.
    fn offer_top_level(&self, m: &'a Module, visible: &mut Visible) {
        self.offer_package_types(m, "", visible);
        for module in m.modules() {
            let Some(root) = module.entity(module.root()).and_then(Entity::as_package) else {
                continue;
            };
            for (name, package) in &root.subpackages {
                visible.offer(name, EntityKind::Package, Some(module.entity_ref(*package)));
            }
        }
    }
}
