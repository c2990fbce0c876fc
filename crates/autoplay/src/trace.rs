use crate::AutoplayError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use swipematch_core::{EscalationPolicy, MatchLine, PoolTier, Program, SwipeDirection};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RunStatus {
    Completed,
    MaxSwipes,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepRecord {
    pub step: u32,
    pub card_id: String,
    pub title: String,
    pub archetype: String,
    pub tier_before: PoolTier,
    /// `None` when a drag snapped back.
    pub direction: Option<SwipeDirection>,
    pub matches_after: usize,
    pub tier_after: PoolTier,
    pub refilled: bool,
    pub event_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryStats {
    pub swipes: u32,
    pub snap_backs: u32,
    pub refills: u32,
    pub final_tier: PoolTier,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResult {
    pub status: RunStatus,
    pub seed: u64,
    pub program: Program,
    pub policy: EscalationPolicy,
    pub matches: Vec<MatchLine>,
    pub skills: Vec<String>,
    pub steps: Vec<StepRecord>,
    pub summary: SummaryStats,
}

impl SessionResult {
    pub fn to_text_report(&self) -> String {
        let mut lines = vec![
            format!("status: {}", run_status_label(self.status)),
            format!(
                "session: seed={} program={} policy={}",
                self.seed,
                self.program.label(),
                self.policy.label()
            ),
            format!(
                "summary: swipes={} snap_backs={} refills={} final_tier={}",
                self.summary.swipes,
                self.summary.snap_backs,
                self.summary.refills,
                self.summary.final_tier.label()
            ),
            String::new(),
            "matches:".to_string(),
        ];
        if self.matches.is_empty() {
            lines.push("  (none)".to_string());
        }
        for (index, line) in self.matches.iter().enumerate() {
            lines.push(format!("  {}. {} ({})", index + 1, line.title, line.archetype));
        }
        if !self.skills.is_empty() {
            lines.push(format!("skills: {}", self.skills.join(", ")));
        }
        lines.push(String::new());
        lines.push("steps:".to_string());
        for step in &self.steps {
            let direction = step.direction.map_or("snap-back", |dir| dir.label());
            lines.push(format!(
                "  step {:>4} | {:<9} | {} [{}]",
                step.step, direction, step.title, step.card_id
            ));
            lines.push(format!(
                "    tier: {} -> {} matches={} events={}{}",
                step.tier_before.label(),
                step.tier_after.label(),
                step.matches_after,
                step.event_count,
                if step.refilled { " refilled" } else { "" }
            ));
        }
        lines.join("\n")
    }
}

fn run_status_label(status: RunStatus) -> &'static str {
    match status {
        RunStatus::Completed => "Completed",
        RunStatus::MaxSwipes => "MaxSwipes",
    }
}

pub fn write_json(path: &Path, result: &SessionResult) -> Result<(), AutoplayError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let body = serde_json::to_string_pretty(result)?;
    fs::write(path, body)?;
    Ok(())
}

pub fn write_text(path: &Path, result: &SessionResult) -> Result<(), AutoplayError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, result.to_text_report())?;
    Ok(())
}
