//! Entity and scope model: an arena of entities per module, with scopes
//! embedded in the package, file, class and method variants.

mod arena;
pub mod decl;
mod entity;
mod line_map;
mod module;

pub use arena::EntityId;
pub use decl::{ClassDecl, FileDecl, Import, MemberDecl, MethodDecl, TypeParameter, VariableDecl};
pub use entity::{
    ClassData, Entity, EntityData, EntityRef, FileData, Members, MethodData, ModuleId, PackageData,
    VariableData,
};
pub use line_map::LineMap;
pub use module::{Module, normalize_path};
