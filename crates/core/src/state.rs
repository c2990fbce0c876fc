use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SessionPhase {
    Priming,
    Active,
    Refilling,
    Completed,
}

impl SessionPhase {
    pub fn accepts_swipes(self) -> bool {
        matches!(self, Self::Active)
    }
}

/// Source currently supplying the deck. Ladder sessions walk
/// `Primary -> Curated -> Global`; priority sessions walk
/// `Primary -> SameProgram -> OtherPrograms -> SafetyNet`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PoolTier {
    Primary,
    Curated,
    Global,
    SameProgram,
    OtherPrograms,
    SafetyNet,
}

impl PoolTier {
    pub fn label(self) -> &'static str {
        match self {
            Self::Primary => "primary catalog",
            Self::Curated => "curated roles",
            Self::Global => "global discovery",
            Self::SameProgram => "more from your program",
            Self::OtherPrograms => "other programs",
            Self::SafetyNet => "second look",
        }
    }
}
