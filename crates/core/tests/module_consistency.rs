use semascope_api::models::TypeReference;
use semascope_core::model::{ClassDecl, FileDecl, MethodDecl, Module, VariableDecl};
use semascope_core::profile::BareProfile;
use semascope_core::solver::TypeSolver;
use std::sync::Arc;

fn ty(dotted: &str) -> TypeReference {
    TypeReference::qualified(dotted)
}

fn module() -> Module {
    Module::new("consistency", Arc::new(BareProfile))
}

fn service_file(version: u32) -> FileDecl {
    let mut service = ClassDecl::class("Service")
        .field(VariableDecl::new("config", ty("Config")))
        .nested(ClassDecl::class("Handle"));
    for i in 0..version {
        service = service.method(
            MethodDecl::new("call")
                .returns(ty("Config"))
                .param(format!("p{i}"), ty("Config")),
        );
    }
    FileDecl::new("a/b/Service.java")
        .package("a.b")
        .class(service)
        .class(ClassDecl::class("Config"))
}

#[test]
fn test_replacing_a_file_does_not_leak_entities() {
    let mut m = module();
    m.add_or_replace_file(service_file(2)).unwrap();
    let after_first = m.entity_count();

    for _ in 0..10 {
        m.add_or_replace_file(service_file(2)).unwrap();
    }
    assert_eq!(m.entity_count(), after_first);
    assert_eq!(m.files().count(), 1);

    // a different shape of the same file
    m.add_or_replace_file(service_file(3)).unwrap();
    assert_eq!(m.entity_count(), after_first + 2);
}

#[test]
fn test_remove_keeps_packages_only() {
    let mut m = module();
    m.add_or_replace_file(service_file(1)).unwrap();
    assert!(m.find_qualified("a.b.Service.Handle").is_some());

    assert!(m.remove_file("a/b/Service.java"));
    // root, a, a.b
    assert_eq!(m.entity_count(), 3);
    assert!(m.package("a.b").is_some());
    assert!(m.find_qualified("a.b.Service").is_none());
    assert!(m.file("a/b/Service.java").is_none());
}

#[test]
fn test_sibling_files_share_a_package() {
    let mut m = module();
    m.add_or_replace_file(service_file(1)).unwrap();
    m.add_or_replace_file(
        FileDecl::new("a/b/Client.java")
            .package("a.b")
            .class(ClassDecl::class("Client").field(VariableDecl::new("service", ty("Service")))),
    )
    .unwrap();

    let client = m.find_qualified("a.b.Client").unwrap();
    {
        let solver = TypeSolver::new(&m);
        let service = solver.solve(&ty("Service"), client).unwrap();
        assert_eq!(solver.qualified_name(&service).as_deref(), Some("a.b.Service"));
    }

    m.remove_file("a/b/Service.java");
    let solver = TypeSolver::new(&m);
    assert!(solver.solve(&ty("Service"), client).is_none());
    assert!(m.find_qualified("a.b.Client").is_some());
}

#[test]
fn test_paths_are_normalized() {
    let mut m = module();
    let id = m
        .add_or_replace_file(FileDecl::new("./a//b/../b/Service.java").package("a.b"))
        .unwrap();
    assert_eq!(m.file("a/b/Service.java"), Some(id));
    assert_eq!(m.file("a\\b\\Service.java"), Some(id));
    assert_eq!(m.qualified_name(id).as_deref(), Some("a/b/Service.java"));

    let again = m
        .add_or_replace_file(FileDecl::new("a/b/Service.java").package("a.b"))
        .unwrap();
    assert_ne!(id, again);
    assert_eq!(m.files().count(), 1);
}

#[test]
fn test_nested_names_and_enclosing() {
    let mut m = module();
    m.add_or_replace_file(service_file(1)).unwrap();
    let handle = m.find_qualified("a.b.Service.Handle").unwrap();
    assert_eq!(m.qualified_name(handle).as_deref(), Some("a.b.Service.Handle"));

    let service = m.enclosing(handle).unwrap();
    assert_eq!(m.entity(service).unwrap().name, "Service");
    let file = m.file_of(handle).unwrap();
    assert_eq!(m.file("a/b/Service.java"), Some(file));
}
