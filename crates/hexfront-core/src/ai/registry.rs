use std::collections::BTreeMap;

use hexfront_protocol::Command;

use super::{
    action::{ActionDefinition, EntityKind},
    actions::{AttackAction, EndTurnAction, FoundCityAction, MoveAction, SetProductionAction},
    context::AiContext,
};

pub const MIN_SCORE: f64 = 0.0;
pub const MAX_SCORE: f64 = 100.0;

/// Action definitions in registration order, indexed by the entity kinds they apply to.
///
/// Built explicitly and passed by reference; there is no global instance.
#[derive(Default)]
pub struct ActionRegistry {
    actions: Vec<Box<dyn ActionDefinition>>,
    by_kind: BTreeMap<EntityKind, Vec<usize>>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move, attack, found city, set production and end turn, in that order.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(MoveAction));
        registry.register(Box::new(AttackAction));
        registry.register(Box::new(FoundCityAction));
        registry.register(Box::new(SetProductionAction));
        registry.register(Box::new(EndTurnAction));
        registry
    }

    pub fn register(&mut self, action: Box<dyn ActionDefinition>) {
        let index = self.actions.len();
        for &kind in action.applicable_to() {
            self.by_kind.entry(kind).or_default().push(index);
        }
        self.actions.push(action);
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&dyn ActionDefinition> {
        self.actions
            .iter()
            .find(|a| a.id() == id)
            .map(|a| a.as_ref())
    }

    /// Actions applicable to `kind`, in registration order.
    pub fn actions_for(&self, kind: EntityKind) -> impl Iterator<Item = &dyn ActionDefinition> {
        self.by_kind
            .get(&kind)
            .into_iter()
            .flatten()
            .map(|&index| self.actions[index].as_ref())
    }

    /// Score through `action`, clamped to `[0, 100]`. NaN scores as 0.
    pub fn score(
        &self,
        action: &dyn ActionDefinition,
        ctx: &AiContext<'_>,
        candidate: &Command,
    ) -> f64 {
        clamp_score(action.score_candidate(ctx, candidate))
    }
}

pub fn clamp_score(score: f64) -> f64 {
    if score.is_nan() {
        MIN_SCORE
    } else {
        score.clamp(MIN_SCORE, MAX_SCORE)
    }
}
