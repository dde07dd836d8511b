//! Overload resolution.
//!
//! Candidates are matched in three phases, the first phase with any match
//! wins: strict (identity and reference widening), loose (adds primitive
//! widening, boxing and unboxing), then variable arity. Within a phase the
//! most specific candidate is chosen; without a unique one, the first match
//! in declaration order.

mod conversion;

pub use conversion::Conversions;

use crate::model::EntityRef;
use crate::solver::{SolvedType, Substitution, TypeSolver};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Strict,
    Loose,
}

/// Parameter types of a candidate. A parameter whose type does not resolve
/// is `None` and never matches.
struct Signature {
    method: EntityRef,
    params: Vec<Option<SolvedType>>,
    is_varargs: bool,
}

pub struct OverloadResolver<'s, 'a> {
    solver: &'s TypeSolver<'a>,
    conversions: Conversions<'s, 'a>,
}

impl<'s, 'a> OverloadResolver<'s, 'a> {
    pub fn new(solver: &'s TypeSolver<'a>) -> Self {
        Self {
            solver,
            conversions: Conversions::new(solver),
        }
    }

    pub fn resolve(
        &self,
        name: &str,
        candidates: &[EntityRef],
        arg_types: &[SolvedType],
    ) -> Option<EntityRef> {
        self.resolve_with_receiver(name, candidates, arg_types, &Substitution::new())
    }

    /// Resolve with the receiver's type arguments bound, so a parameter
    /// typed `T` on `Box<String>` accepts a `String`.
    pub fn resolve_with_receiver(
        &self,
        name: &str,
        candidates: &[EntityRef],
        arg_types: &[SolvedType],
        receiver: &Substitution,
    ) -> Option<EntityRef> {
        let signatures: Vec<Signature> = candidates
            .iter()
            .filter_map(|candidate| self.signature(*candidate, name, receiver))
            .collect();
        if signatures.is_empty() {
            return None;
        }

        for phase in [Phase::Strict, Phase::Loose] {
            let matched: Vec<&Signature> = signatures
                .iter()
                .filter(|s| !s.is_varargs && self.matches_fixed_arity(s, arg_types, phase))
                .collect();
            if !matched.is_empty() {
                return self.select_most_specific(&matched, arg_types.len());
            }
        }

        let matched: Vec<&Signature> = signatures
            .iter()
            .filter(|s| s.is_varargs && self.matches_varargs_arity(s, arg_types))
            .collect();
        if matched.is_empty() {
            tracing::debug!(
                "No overload of {} accepts {} argument(s)",
                name,
                arg_types.len()
            );
            return None;
        }
        // Compare at least the declared arity, so the varargs parameters
        // take part even when no trailing argument was passed.
        let arity = matched
            .iter()
            .map(|s| s.params.len())
            .max()
            .unwrap_or(0)
            .max(arg_types.len());
        self.select_most_specific(&matched, arity)
    }

    fn signature(&self, method: EntityRef, name: &str, receiver: &Substitution) -> Option<Signature> {
        let (module, entity) = self.solver.resolve(method)?;
        let data = entity.as_method()?;
        if entity.name != name {
            return None;
        }
        let params = data
            .parameters
            .iter()
            .map(|param| self.solver.type_of(module.entity_ref(*param), receiver))
            .collect();
        Some(Signature {
            method,
            params,
            is_varargs: data.is_varargs,
        })
    }

    fn assignable(&self, arg: &SolvedType, param: &Option<SolvedType>, phase: Phase) -> bool {
        let Some(param) = param else {
            return false;
        };
        match phase {
            Phase::Strict => self.conversions.is_strictly_assignable(arg, param),
            Phase::Loose => self.conversions.is_loosely_assignable(arg, param),
        }
    }

    fn matches_fixed_arity(&self, sig: &Signature, arg_types: &[SolvedType], phase: Phase) -> bool {
        sig.params.len() == arg_types.len()
            && sig
                .params
                .iter()
                .zip(arg_types)
                .all(|(param, arg)| self.assignable(arg, param, phase))
    }

    fn matches_varargs_arity(&self, sig: &Signature, arg_types: &[SolvedType]) -> bool {
        let Some((last, fixed)) = sig.params.split_last() else {
            return false;
        };
        let fixed_count = fixed.len();
        if arg_types.len() < fixed_count {
            return false;
        }
        if !fixed
            .iter()
            .zip(arg_types)
            .all(|(param, arg)| self.assignable(arg, param, Phase::Loose))
        {
            return false;
        }

        // No trailing arguments
        if arg_types.len() == fixed_count {
            return true;
        }

        // Direct array pass-through: f(Foo...) called with one Foo[]
        if arg_types.len() == sig.params.len()
            && self.assignable(&arg_types[fixed_count], last, Phase::Loose)
        {
            return true;
        }

        let element = last.as_ref().map(SolvedType::element);
        arg_types[fixed_count..]
            .iter()
            .all(|arg| self.assignable(arg, &element, Phase::Loose))
    }

    fn select_most_specific(&self, matched: &[&Signature], arity: usize) -> Option<EntityRef> {
        if let [only] = matched {
            return Some(only.method);
        }
        let effective: Vec<Option<Vec<SolvedType>>> = matched
            .iter()
            .map(|sig| effective_param_types(sig, arity))
            .collect();

        let winner = (0..matched.len()).find(|&i| {
            (0..matched.len())
                .filter(|&j| j != i)
                .all(|j| self.is_more_specific(&effective[i], &effective[j]))
        });
        matched
            .get(winner.unwrap_or(0))
            .map(|sig| sig.method)
    }

    /// Every parameter of `left` is assignable to the one of `right`, and
    /// not the other way round.
    fn is_more_specific(
        &self,
        left: &Option<Vec<SolvedType>>,
        right: &Option<Vec<SolvedType>>,
    ) -> bool {
        let (Some(left), Some(right)) = (left, right) else {
            return false;
        };
        if left.len() != right.len() {
            return false;
        }
        let all_assignable = |from: &[SolvedType], to: &[SolvedType]| {
            from.iter()
                .zip(to)
                .all(|(f, t)| self.conversions.is_loosely_assignable(f, t))
        };
        all_assignable(left, right) && !all_assignable(right, left)
    }
}

/// Parameter types as seen by a call of `arg_count` positions; the varargs
/// parameter is expanded to its element type.
fn effective_param_types(sig: &Signature, arg_count: usize) -> Option<Vec<SolvedType>> {
    let params: Vec<SolvedType> = sig.params.iter().cloned().collect::<Option<_>>()?;
    if !sig.is_varargs {
        return (params.len() == arg_count).then_some(params);
    }
    let (last, fixed) = params.split_last()?;
    if arg_count < fixed.len() {
        return None;
    }
    let element = last.element();
    let mut types = fixed.to_vec();
    types.extend(std::iter::repeat_n(element, arg_count - fixed.len()));
    Some(types)
}
