#![allow(dead_code)]

use semascope_api::models::TypeReference;
use semascope_core::model::{
    ClassDecl, EntityId, EntityRef, FileDecl, MethodDecl, Module, TypeParameter, VariableDecl,
};
use semascope_core::solver::{SolvedType, TypeSolver};
use semascope_java::java_module;
use std::sync::Arc;

pub fn ty(dotted: &str) -> TypeReference {
    TypeReference::qualified(dotted)
}

pub fn generic(dotted: &str, args: &[&str]) -> TypeReference {
    ty(dotted).with_arguments(args.iter().map(|a| ty(a)).collect())
}

/// A small slice of the JDK, as a dependency module.
pub fn jdk() -> Arc<Module> {
    let mut m = java_module("jdk");
    m.add_or_replace_file(
        FileDecl::new("java/lang/Object.java")
            .package("java.lang")
            .class(
                ClassDecl::class("Object")
                    .method(MethodDecl::new("toString").returns(ty("String")))
                    .method(MethodDecl::new("hashCode").returns(ty("int"))),
            ),
    )
    .unwrap();
    m.add_or_replace_file(
        FileDecl::new("java/lang/String.java")
            .package("java.lang")
            .class(
                ClassDecl::class("String")
                    .method(MethodDecl::new("length").returns(ty("int")))
                    .method(
                        MethodDecl::new("valueOf")
                            .returns(ty("String"))
                            .param("i", ty("int"))
                            .with_static(),
                    )
                    .method(
                        MethodDecl::new("valueOf")
                            .returns(ty("String"))
                            .param("o", ty("Object"))
                            .with_static(),
                    )
                    .method(
                        MethodDecl::new("format")
                            .returns(ty("String"))
                            .param("pattern", ty("String"))
                            .varargs("args", ty("Object"))
                            .with_static(),
                    ),
            ),
    )
    .unwrap();
    m.add_or_replace_file(
        FileDecl::new("java/lang/Number.java")
            .package("java.lang")
            .class(ClassDecl::class("Number")),
    )
    .unwrap();
    m.add_or_replace_file(
        FileDecl::new("java/lang/Integer.java")
            .package("java.lang")
            .class(
                ClassDecl::class("Integer")
                    .extends(ty("Number"))
                    .field(VariableDecl::new("MAX_VALUE", ty("int")).with_static()),
            ),
    )
    .unwrap();
    m.add_or_replace_file(
        FileDecl::new("java/lang/Long.java")
            .package("java.lang")
            .class(ClassDecl::class("Long").extends(ty("Number"))),
    )
    .unwrap();
    m.add_or_replace_file(
        FileDecl::new("java/util/List.java")
            .package("java.util")
            .class(
                ClassDecl::interface("List")
                    .type_param(TypeParameter::new("E"))
                    .method(MethodDecl::new("get").returns(ty("E")).param("index", ty("int")))
                    .method(MethodDecl::new("add").returns(ty("boolean")).param("e", ty("E"))),
            ),
    )
    .unwrap();
    m.add_or_replace_file(
        FileDecl::new("java/util/ArrayList.java")
            .package("java.util")
            .class(
                ClassDecl::class("ArrayList")
                    .type_param(TypeParameter::new("E"))
                    .implements(generic("List", &["E"])),
            ),
    )
    .unwrap();
    Arc::new(m)
}

/// A project module depending on [`jdk`].
pub fn project() -> Module {
    let mut m = java_module("project");
    m.add_depending_module(jdk());
    m
}

pub fn top_class(m: &Module, path: &str, name: &str) -> EntityId {
    m.lookup(m.file(path).unwrap(), name)[0]
}

pub fn solved_name(solver: &TypeSolver, solved: Option<SolvedType>) -> Option<String> {
    solved.and_then(|t| solver.qualified_name(&t))
}

/// Handles of every method `name` declared directly in `class`.
pub fn methods(m: &Module, class: EntityId, name: &str) -> Vec<EntityRef> {
    m.lookup(class, name)
        .iter()
        .map(|id| m.entity_ref(*id))
        .collect()
}
