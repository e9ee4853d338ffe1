use hexfront_protocol::Command;

use crate::pipeline::validate;

use super::{action::AiEntity, context::AiContext, registry::ActionRegistry};

#[derive(Clone, Debug, PartialEq)]
pub struct ScoredCandidate {
    pub action: &'static str,
    pub command: Command,
    pub score: f64,
}

/// Every valid candidate for `entity`, scored, in registry then generation order.
pub fn rank_candidates(
    registry: &ActionRegistry,
    ctx: &AiContext<'_>,
    entity: AiEntity,
) -> Vec<ScoredCandidate> {
    let mut generated = 0_usize;
    let mut ranked = Vec::new();
    for action in registry.actions_for(entity.kind()) {
        for command in action.generate_candidates(ctx, entity) {
            generated += 1;
            if validate(&command, ctx.state()).is_err() {
                continue;
            }
            let score = registry.score(action, ctx, &command);
            ranked.push(ScoredCandidate {
                action: action.id(),
                command,
                score,
            });
        }
    }
    tracing::trace!(?entity, generated, valid = ranked.len(), "candidates generated");
    ranked
}

/// Highest-scoring valid candidate. Ties go to the earliest candidate.
pub fn decide(
    registry: &ActionRegistry,
    ctx: &AiContext<'_>,
    entity: AiEntity,
) -> Option<ScoredCandidate> {
    let mut best: Option<ScoredCandidate> = None;
    for candidate in rank_candidates(registry, ctx, entity) {
        if best.as_ref().map_or(true, |b| candidate.score > b.score) {
            best = Some(candidate);
        }
    }
    if let Some(choice) = &best {
        tracing::debug!(
            player = %ctx.player,
            ?entity,
            action = choice.action,
            score = choice.score,
            "ai decision"
        );
    }
    best
}
