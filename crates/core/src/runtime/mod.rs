//! Single-worker engine.
//!
//! The model, solver and lookup structures are not synchronized. The engine
//! owns the `Module` on one background task and runs every mutation and
//! query as a task on it, in submission order. Callers await a oneshot
//! reply; a caller that loses interest simply drops the future.

use crate::completion::{CompletionCollector, CompletionItem, CompletionRanker};
use crate::error::{CoreError, Result};
use crate::model::{EntityId, EntityRef, FileDecl, Module};
use crate::overload::OverloadResolver;
use crate::solver::{SolvedType, TypeSolver};
use semascope_api::models::TypeReference;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;

type Task = Box<dyn FnOnce(&mut Module) + Send>;

/// Handle to the worker owning a `Module`. Cheap to clone; all clones feed
/// the same queue.
#[derive(Clone)]
pub struct Engine {
    tx: mpsc::UnboundedSender<Task>,
    cancel_token: CancellationToken,
}

impl Engine {
    /// Move `module` onto a new worker task. Must be called within a tokio
    /// runtime.
    pub fn spawn(module: Module) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let cancel_token = CancellationToken::new();
        tokio::spawn(run_worker(module, rx, cancel_token.clone()));
        Self { tx, cancel_token }
    }

    /// Run `f` against the module once every earlier task has finished.
    pub async fn execute<F, R>(&self, f: F) -> Result<R>
    where
        F: FnOnce(&mut Module) -> R + Send + 'static,
        R: Send + 'static,
    {
        let (reply_tx, reply_rx) = oneshot::channel();
        let task: Task = Box::new(move |module| {
            // The caller may have gone away
            let _ = reply_tx.send(f(module));
        });
        self.tx.send(task).map_err(|_| CoreError::WorkerStopped)?;
        reply_rx.await.map_err(|_| CoreError::WorkerStopped)
    }

    pub async fn add_or_replace_file(&self, decl: FileDecl) -> Result<EntityId> {
        self.execute(move |module| module.add_or_replace_file(decl))
            .await?
    }

    pub async fn remove_file(&self, path: impl Into<String>) -> Result<bool> {
        let path = path.into();
        self.execute(move |module| module.remove_file(&path)).await
    }

    pub async fn add_depending_module(&self, dependency: Arc<Module>) -> Result<()> {
        self.execute(move |module| module.add_depending_module(dependency))
            .await
    }

    pub async fn solve(
        &self,
        type_ref: TypeReference,
        scope: EntityId,
    ) -> Result<Option<SolvedType>> {
        self.execute(move |module| TypeSolver::new(module).solve(&type_ref, scope))
            .await
    }

    /// Solve in the innermost scope enclosing `offset` in the file at `path`.
    pub async fn solve_at(
        &self,
        path: impl Into<String>,
        offset: u32,
        type_ref: TypeReference,
    ) -> Result<Option<SolvedType>> {
        let path = path.into();
        self.execute(move |module| {
            let scope = module.scope_at(&path, offset)?;
            TypeSolver::new(module).solve(&type_ref, scope)
        })
        .await
    }

    pub async fn resolve_overload(
        &self,
        name: impl Into<String>,
        candidates: Vec<EntityRef>,
        arg_types: Vec<SolvedType>,
    ) -> Result<Option<EntityRef>> {
        let name = name.into();
        self.execute(move |module| {
            let solver = TypeSolver::new(module);
            OverloadResolver::new(&solver).resolve(&name, &candidates, &arg_types)
        })
        .await
    }

    /// Names visible at `offset` in the file at `path`, ranked against
    /// `prefix`. An unknown file yields nothing.
    pub async fn complete(
        &self,
        path: impl Into<String>,
        offset: u32,
        prefix: impl Into<String>,
    ) -> Result<Vec<CompletionItem>> {
        let path = path.into();
        let prefix = prefix.into();
        self.execute(move |module| {
            let Some(scope) = module.scope_at(&path, offset) else {
                tracing::debug!("No scope at {}:{}", path, offset);
                return Vec::new();
            };
            let solver = TypeSolver::new(module);
            let candidates = CompletionCollector::new(&solver)
                .at_offset(offset)
                .visible_candidates(scope);
            CompletionRanker::from_config(&module.config().completion).rank(&prefix, candidates)
        })
        .await
    }

    /// Stop the worker. Tasks not yet started are dropped and their callers
    /// get `WorkerStopped`.
    pub fn shutdown(&self) {
        self.cancel_token.cancel();
    }

    pub fn is_running(&self) -> bool {
        !self.cancel_token.is_cancelled() && !self.tx.is_closed()
    }
}

async fn run_worker(
    mut module: Module,
    mut rx: mpsc::UnboundedReceiver<Task>,
    cancel_token: CancellationToken,
) {
    tracing::info!("Engine worker started for module {}", module.name());
    let mut executed: u64 = 0;
    loop {
        tokio::select! {
            biased;
            _ = cancel_token.cancelled() => break,
            task = rx.recv() => match task {
                Some(task) => {
                    task(&mut module);
                    executed += 1;
                }
                None => break,
            },
        }
    }
    tracing::info!(
        "Engine worker for module {} stopped after {} task(s)",
        module.name(),
        executed
    );
}
