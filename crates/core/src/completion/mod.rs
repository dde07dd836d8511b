//! Completion: collecting the names visible at a cursor and ranking them
//! against the typed prefix.

mod collector;
mod ranker;

pub use collector::CompletionCollector;
pub use ranker::{CompletionCandidate, CompletionRanker};

use crate::model::EntityRef;
use semascope_api::models::EntityKind;
use serde::Serialize;
use smol_str::SmolStr;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletionItem {
    pub name: SmolStr,
    pub kind: EntityKind,
    /// Declaring entity; handles are not serialized.
    #[serde(skip)]
    pub entity: Option<EntityRef>,
}

impl CompletionItem {
    pub fn new(name: impl Into<SmolStr>, kind: EntityKind, entity: Option<EntityRef>) -> Self {
        Self {
            name: name.into(),
            kind,
            entity,
        }
    }
}
