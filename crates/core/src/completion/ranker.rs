use super::CompletionItem;
use crate::config::CompletionConfig;
use std::cmp::Ordering;

/// Anything with a display name can be ranked.
pub trait CompletionCandidate {
    fn name(&self) -> &str;
}

impl CompletionCandidate for CompletionItem {
    fn name(&self) -> &str {
        &self.name
    }
}

impl CompletionCandidate for &str {
    fn name(&self) -> &str {
        self
    }
}

impl CompletionCandidate for String {
    fn name(&self) -> &str {
        self.as_str()
    }
}

/// Filters candidates by prefix and orders them for presentation.
///
/// A name starting with the prefix as typed is tier 0; one that only matches
/// ignoring case is tier 1; anything else is dropped. Shorter names come
/// first, then lower tier, then case-sensitive lexical order. The sort is
/// stable, so equal names keep their input order and ranking a ranked list
/// again changes nothing.
#[derive(Debug, Clone, Default)]
pub struct CompletionRanker {
    limit: Option<usize>,
}

impl CompletionRanker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &CompletionConfig) -> Self {
        Self {
            limit: config.max_results,
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn rank<C, I>(&self, prefix: &str, candidates: I) -> Vec<C>
    where
        C: CompletionCandidate,
        I: IntoIterator<Item = C>,
    {
        let folded_prefix = prefix.to_lowercase();
        let mut tiered: Vec<(u8, C)> = candidates
            .into_iter()
            .filter_map(|candidate| {
                let tier = match_tier(candidate.name(), prefix, &folded_prefix)?;
                Some((tier, candidate))
            })
            .collect();

        tiered.sort_by(|(left_tier, left), (right_tier, right)| {
            compare(left.name(), *left_tier, right.name(), *right_tier)
        });

        let mut ranked: Vec<C> = tiered.into_iter().map(|(_, candidate)| candidate).collect();
        if let Some(limit) = self.limit {
            ranked.truncate(limit);
        }
        ranked
    }
}

fn match_tier(name: &str, prefix: &str, folded_prefix: &str) -> Option<u8> {
    if name.starts_with(prefix) {
        Some(0)
    } else if name.to_lowercase().starts_with(folded_prefix) {
        Some(1)
    } else {
        None
    }
}

fn compare(left: &str, left_tier: u8, right: &str, right_tier: u8) -> Ordering {
    left.chars()
        .count()
        .cmp(&right.chars().count())
        .then(left_tier.cmp(&right_tier))
        .then_with(|| left.cmp(right))
}
