use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Program {
    #[serde(rename = "Business")]
    Business,
    #[serde(rename = "Hospitality & Tourism")]
    HospitalityTourism,
    #[serde(rename = "Health & Care")]
    HealthCare,
    #[serde(rename = "Others")]
    Others,
}

impl Program {
    pub const ALL: [Program; 4] = [
        Program::Business,
        Program::HospitalityTourism,
        Program::HealthCare,
        Program::Others,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Business => "Business",
            Self::HospitalityTourism => "Hospitality & Tourism",
            Self::HealthCare => "Health & Care",
            Self::Others => "Others",
        }
    }

    /// Accepts the display label or a loose short form ("health", "hospitality").
    pub fn from_label(value: &str) -> Option<Self> {
        let key = normalize(value);
        match key.as_str() {
            "business" => Some(Self::Business),
            "hospitality_&_tourism" | "hospitality_and_tourism" | "hospitality" | "tourism" => {
                Some(Self::HospitalityTourism)
            }
            "health_&_care" | "health_and_care" | "health" | "care" => Some(Self::HealthCare),
            "others" | "other" => Some(Self::Others),
            _ => None,
        }
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Which users a card is eligible for: one program, or every program.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub enum Audience {
    Any,
    Program(Program),
}

impl Audience {
    pub fn admits(self, program: Program) -> bool {
        match self {
            Self::Any => true,
            Self::Program(own) => own == program,
        }
    }

    pub fn is_wildcard(self) -> bool {
        matches!(self, Self::Any)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Any => "Any",
            Self::Program(program) => program.label(),
        }
    }
}

impl TryFrom<String> for Audience {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if normalize(&value) == "any" {
            return Ok(Self::Any);
        }
        Program::from_label(&value)
            .map(Self::Program)
            .ok_or_else(|| format!("unknown program '{value}'"))
    }
}

impl From<Audience> for String {
    fn from(value: Audience) -> Self {
        value.label().to_string()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Archetype {
    #[serde(rename = "The Visionary")]
    Visionary,
    #[serde(rename = "The Caregiver")]
    Caregiver,
    #[serde(rename = "The Tech Wizard")]
    TechWizard,
    #[serde(rename = "The Experience Architect")]
    ExperienceArchitect,
    #[serde(rename = "The Eco-Warrior")]
    EcoWarrior,
    #[serde(rename = "The Alchemist")]
    Alchemist,
    #[serde(rename = "The Guardian")]
    Guardian,
    #[serde(rename = "The Data Poet")]
    DataPoet,
    #[serde(rename = "The Human Connector")]
    HumanConnector,
    #[serde(rename = "The Growth Catalyst")]
    GrowthCatalyst,
    #[serde(rename = "The Maker")]
    Maker,
    #[serde(rename = "The Curator")]
    Curator,
    #[serde(rename = "The Peacekeeper")]
    Peacekeeper,
    #[serde(rename = "The Disruptor")]
    Disruptor,
    #[serde(rename = "The Analyst")]
    Analyst,
    #[serde(rename = "The Storyteller")]
    Storyteller,
    #[serde(rename = "The Optimizer")]
    Optimizer,
    #[serde(rename = "The Navigator")]
    Navigator,
    #[serde(rename = "The Specialist")]
    Specialist,
    #[serde(rename = "The Strategist")]
    Strategist,
}

impl Archetype {
    /// Fixed cycling order for procedurally generated pools.
    pub const ALL: [Archetype; 20] = [
        Archetype::Visionary,
        Archetype::Caregiver,
        Archetype::TechWizard,
        Archetype::ExperienceArchitect,
        Archetype::EcoWarrior,
        Archetype::Alchemist,
        Archetype::Guardian,
        Archetype::DataPoet,
        Archetype::HumanConnector,
        Archetype::GrowthCatalyst,
        Archetype::Maker,
        Archetype::Curator,
        Archetype::Peacekeeper,
        Archetype::Disruptor,
        Archetype::Analyst,
        Archetype::Storyteller,
        Archetype::Optimizer,
        Archetype::Navigator,
        Archetype::Specialist,
        Archetype::Strategist,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Visionary => "The Visionary",
            Self::Caregiver => "The Caregiver",
            Self::TechWizard => "The Tech Wizard",
            Self::ExperienceArchitect => "The Experience Architect",
            Self::EcoWarrior => "The Eco-Warrior",
            Self::Alchemist => "The Alchemist",
            Self::Guardian => "The Guardian",
            Self::DataPoet => "The Data Poet",
            Self::HumanConnector => "The Human Connector",
            Self::GrowthCatalyst => "The Growth Catalyst",
            Self::Maker => "The Maker",
            Self::Curator => "The Curator",
            Self::Peacekeeper => "The Peacekeeper",
            Self::Disruptor => "The Disruptor",
            Self::Analyst => "The Analyst",
            Self::Storyteller => "The Storyteller",
            Self::Optimizer => "The Optimizer",
            Self::Navigator => "The Navigator",
            Self::Specialist => "The Specialist",
            Self::Strategist => "The Strategist",
        }
    }

    /// Label without the leading article, e.g. "Tech Wizard".
    pub fn short_name(self) -> &'static str {
        let label = self.label();
        label.strip_prefix("The ").unwrap_or(label)
    }

    pub fn from_label(value: &str) -> Option<Self> {
        let key = normalize(value);
        let key = key.strip_prefix("the_").unwrap_or(&key);
        Self::ALL
            .into_iter()
            .find(|archetype| normalize(archetype.short_name()) == key)
    }
}

impl fmt::Display for Archetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One role presented for swiping. Every field read by presentation is
/// non-empty once the card has been through synthesis.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CandidateCard {
    pub id: String,
    pub title: String,
    #[serde(rename = "program")]
    pub audience: Audience,
    pub archetype: Archetype,
    pub image: String,
    pub location: String,
    pub bio: String,
    pub looking_for: String,
    pub skills: Vec<String>,
    #[serde(rename = "loveLanguage")]
    pub compatibility: Vec<String>,
    pub swipe_right_if: Vec<String>,
    pub fun_fact: String,
    pub tags: Vec<String>,
    #[serde(default, rename = "isAI")]
    pub generated: bool,
}

impl CandidateCard {
    /// Names of presentation fields that are blank, in declaration order.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        let text = [
            ("id", &self.id),
            ("title", &self.title),
            ("image", &self.image),
            ("location", &self.location),
            ("bio", &self.bio),
            ("lookingFor", &self.looking_for),
            ("funFact", &self.fun_fact),
        ];
        for (name, value) in text {
            if value.trim().is_empty() {
                missing.push(name);
            }
        }
        let lists = [
            ("skills", &self.skills),
            ("loveLanguage", &self.compatibility),
            ("swipeRightIf", &self.swipe_right_if),
            ("tags", &self.tags),
        ];
        for (name, values) in lists {
            if values.iter().all(|value| value.trim().is_empty()) {
                missing.push(name);
            }
        }
        missing
    }

    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }
}

pub(crate) fn normalize(value: &str) -> String {
    value
        .trim()
        .to_ascii_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .replace('-', "_")
}
