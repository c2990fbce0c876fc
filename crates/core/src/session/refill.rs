use crate::{CandidateCard, Catalog, EngineConfig, EscalationPolicy, PoolTier, Program, RngState};
use std::collections::HashSet;

/// Snapshot of the session state the refill decision depends on.
#[derive(Debug, Clone, Copy)]
pub struct RefillContext<'a> {
    pub program: Program,
    pub tier: PoolTier,
    pub seen: &'a HashSet<String>,
    pub matches: &'a [CandidateCard],
    pub last_swiped: Option<&'a str>,
    pub next_variant: u64,
}

#[derive(Debug, Clone)]
pub struct RefillPlan {
    pub tier: PoolTier,
    pub cards: Vec<CandidateCard>,
    pub next_variant: u64,
}

/// Picks the next deck and its order. Pure apart from the random source:
/// the same context and seed always give the same plan.
///
/// Cards already in `seen` are only ever returned by the safety net, and the
/// safety net never returns a matched card.
pub fn plan_refill(
    catalog: &Catalog,
    config: &EngineConfig,
    ctx: &RefillContext<'_>,
    rng: &mut RngState,
) -> RefillPlan {
    let mut next_variant = ctx.next_variant;
    let found = match config.policy {
        EscalationPolicy::Ladder => ladder_candidates(catalog, config, ctx, &mut next_variant),
        EscalationPolicy::Priority => priority_candidates(catalog, ctx),
    };
    let (tier, mut cards) =
        found.unwrap_or_else(|| (PoolTier::SafetyNet, safety_net(catalog, ctx)));
    rng.shuffle(&mut cards);
    RefillPlan {
        tier,
        cards,
        next_variant,
    }
}

fn unseen(cards: Vec<CandidateCard>, seen: &HashSet<String>) -> Vec<CandidateCard> {
    cards
        .into_iter()
        .filter(|card| !seen.contains(&card.id))
        .collect()
}

fn ladder_candidates(
    catalog: &Catalog,
    config: &EngineConfig,
    ctx: &RefillContext<'_>,
    next_variant: &mut u64,
) -> Option<(PoolTier, Vec<CandidateCard>)> {
    if ctx.tier < PoolTier::Curated {
        let curated = unseen(catalog.curated_pool(), ctx.seen);
        if !curated.is_empty() {
            return Some((PoolTier::Curated, curated));
        }
    }
    // `seen` is finite, so some batch past it always has unseen ids.
    loop {
        let batch = unseen(
            catalog.global_batch(*next_variant, config.global_batch_size),
            ctx.seen,
        );
        *next_variant = (*next_variant)
            .max(1)
            .saturating_add(config.global_batch_size as u64);
        if !batch.is_empty() {
            return Some((PoolTier::Global, batch));
        }
        if *next_variant == u64::MAX {
            return None;
        }
    }
}

fn priority_candidates(
    catalog: &Catalog,
    ctx: &RefillContext<'_>,
) -> Option<(PoolTier, Vec<CandidateCard>)> {
    let same = unseen(catalog.primary_for(ctx.program), ctx.seen);
    if !same.is_empty() {
        return Some((PoolTier::SameProgram, same));
    }
    let other = unseen(catalog.primary_elsewhere(ctx.program), ctx.seen);
    if !other.is_empty() {
        return Some((PoolTier::OtherPrograms, other));
    }
    None
}

/// Any primary card that is not a match and not the card swiped last. Only
/// when that leaves nothing does the last card come back.
fn safety_net(catalog: &Catalog, ctx: &RefillContext<'_>) -> Vec<CandidateCard> {
    let matched: HashSet<&str> = ctx.matches.iter().map(|card| card.id.as_str()).collect();
    let recycled: Vec<CandidateCard> = catalog
        .primary
        .iter()
        .filter(|card| !matched.contains(card.id.as_str()))
        .filter(|card| Some(card.id.as_str()) != ctx.last_swiped)
        .cloned()
        .collect();
    if !recycled.is_empty() {
        return recycled;
    }
    ctx.last_swiped
        .and_then(|id| catalog.card_by_id(id))
        .filter(|card| !matched.contains(card.id.as_str()))
        .cloned()
        .into_iter()
        .collect()
}
