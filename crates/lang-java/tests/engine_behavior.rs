mod common;

use common::{jdk, methods, top_class, ty};
use semascope_core::error::CoreError;
use semascope_core::model::{ClassDecl, FileDecl, MethodDecl, VariableDecl};
use semascope_core::profile::Primitive;
use semascope_core::runtime::Engine;
use semascope_core::solver::SolvedType;
use semascope_java::java_module;

const SOURCE: &str = "package app;
class Counter {
    long total;
    void add(long amount) {
        // here
    }
}
";

fn counter_file() -> FileDecl {
    let here = SOURCE.find("// here").unwrap() as u32;
    let method_start = SOURCE.find("void add").unwrap() as u32;
    let class_start = SOURCE.find("class Counter").unwrap() as u32;
    FileDecl::new("app/Counter.java")
        .package("app")
        .class(
            ClassDecl::class("Counter")
                .field(VariableDecl::new("total", ty("long")))
                .method(
                    MethodDecl::new("add")
                        .returns(ty("void"))
                        .param("amount", ty("long"))
                        .at(method_start, here + 10),
                )
                .at(class_start, SOURCE.len() as u32 - 1),
        )
        .with_text(SOURCE)
}

#[tokio::test]
async fn test_index_query_and_complete() {
    let engine = Engine::spawn(java_module("project"));
    engine.add_depending_module(jdk()).await.unwrap();
    engine.add_or_replace_file(counter_file()).await.unwrap();

    let here = SOURCE.find("// here").unwrap() as u32;
    let string = engine
        .solve_at("app/Counter.java", here, ty("String"))
        .await
        .unwrap()
        .unwrap();
    let name = engine
        .execute(move |m| semascope_core::solver::TypeSolver::new(m).qualified_name(&string))
        .await
        .unwrap();
    assert_eq!(name.as_deref(), Some("java.lang.String"));

    let items = engine.complete("app/Counter.java", here, "a").await.unwrap();
    let names: Vec<&str> = items.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, vec!["add", "app", "amount"]);

    let none = engine.complete("app/Missing.java", 0, "").await.unwrap();
    assert!(none.is_empty());
}

#[tokio::test]
async fn test_overload_through_engine() {
    let engine = Engine::spawn(java_module("project"));
    engine.add_or_replace_file(counter_file()).await.unwrap();
    let candidates = engine
        .execute(|m| {
            let counter = top_class(m, "app/Counter.java", "Counter");
            methods(m, counter, "add")
        })
        .await
        .unwrap();

    let chosen = engine
        .resolve_overload("add", candidates.clone(), vec![SolvedType::primitive(Primitive::Int)])
        .await
        .unwrap();
    assert_eq!(chosen, Some(candidates[0]));

    let rejected = engine
        .resolve_overload("add", candidates, vec![SolvedType::primitive(Primitive::Double)])
        .await
        .unwrap();
    assert_eq!(rejected, None);
}

#[tokio::test]
async fn test_replace_and_remove_through_engine() {
    let engine = Engine::spawn(java_module("project"));
    let first = engine.add_or_replace_file(counter_file()).await.unwrap();
    let second = engine.add_or_replace_file(counter_file()).await.unwrap();
    assert_ne!(first, second);

    let stale = engine
        .solve(ty("Counter"), first)
        .await
        .unwrap();
    assert!(stale.is_none());
    assert!(engine.solve(ty("Counter"), second).await.unwrap().is_some());

    assert!(engine.remove_file("app/Counter.java").await.unwrap());
    assert!(!engine.remove_file("app/Counter.java").await.unwrap());

    engine.shutdown();
    let err = engine.remove_file("app/Counter.java").await.unwrap_err();
    assert!(matches!(err, CoreError::WorkerStopped));
}
