//! Skill-based agent selection
//!
//! Score is the number of required skills an agent has. The highest score
//! wins, then the lightest workload, then the lowest id. When nobody scores,
//! the pick is uniformly random over the whole active pool.

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use crate::domain::aggregates::User;
use crate::domain::value_objects::SkillSet;

/// An agent together with its current number of unresolved tickets.
#[derive(Clone, Debug)]
pub struct AgentCandidate {
    pub agent: User,
    pub workload: usize,
}

impl AgentCandidate {
    pub fn new(agent: User, workload: usize) -> Self {
        Self { agent, workload }
    }
}

/// Number of required skills the agent has.
pub fn skill_score(agent: &User, required: &SkillSet) -> usize {
    agent.skills().map_or(0, |skills| skills.overlap(required))
}

/// Pick the best candidate for `required`. Candidates that are not active
/// skilled agents are ignored; an empty pool yields `None`.
pub fn select_agent<'a, R>(pool: &'a [AgentCandidate], required: &SkillSet, rng: &mut R) -> Option<&'a AgentCandidate>
where
    R: Rng + ?Sized,
{
    let scored: Vec<(usize, &AgentCandidate)> = pool
        .iter()
        .filter(|c| c.agent.is_assignable())
        .map(|c| (skill_score(&c.agent, required), c))
        .collect();

    for (score, c) in &scored {
        debug!(agent = %c.agent.id(), score, workload = c.workload, "scored agent");
    }

    let best = scored.iter().map(|(score, _)| *score).max()?;
    if best == 0 {
        return scored.choose(rng).map(|(_, c)| *c);
    }

    scored
        .into_iter()
        .filter(|(score, _)| *score == best)
        .map(|(_, c)| c)
        .min_by(|a, b| {
            a.workload
                .cmp(&b.workload)
                .then_with(|| a.agent.id().cmp(b.agent.id()))
        })
}
