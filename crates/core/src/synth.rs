use crate::{Archetype, ArchetypeRules, ArchetypeTable, Audience, CandidateCard};
use serde::{Deserialize, Serialize};

/// Shown when every other image source is empty.
pub const FALLBACK_IMAGE_URL: &str =
    "https://api.dicebear.com/9.x/avataaars/svg?seed=professional-fallback";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImagePool {
    urls: Vec<String>,
}

impl ImagePool {
    pub fn new(urls: Vec<String>) -> Self {
        let urls = urls
            .into_iter()
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty())
            .collect();
        Self { urls }
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    /// `pool[index mod len]`.
    pub fn get(&self, index: usize) -> Option<&str> {
        if self.urls.is_empty() {
            return None;
        }
        self.urls.get(index % self.urls.len()).map(String::as_str)
    }

    /// Stable pick keyed by an arbitrary string, so the same seed always
    /// lands on the same image.
    pub fn pick_for_seed(&self, seed: &str) -> Option<&str> {
        if self.urls.is_empty() {
            return None;
        }
        let index = seed_hash(seed).unsigned_abs() as usize % self.urls.len();
        self.urls.get(index).map(String::as_str)
    }
}

/// 31-multiplier rolling hash over UTF-16 code units with 32-bit wrapping.
pub fn seed_hash(seed: &str) -> i32 {
    seed.encode_utf16().fold(0i32, |hash, unit| {
        (unit as i32).wrapping_add(hash.wrapping_shl(5).wrapping_sub(hash))
    })
}

/// A card definition where anything but the title may be absent. Blank
/// strings and empty lists count as absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialCard {
    #[serde(default)]
    pub id: Option<String>,
    pub title: String,
    #[serde(default, rename = "program")]
    pub audience: Option<Audience>,
    #[serde(default)]
    pub archetype: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default, rename = "seed")]
    pub image_seed: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub looking_for: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default, rename = "loveLanguage")]
    pub compatibility: Vec<String>,
    #[serde(default)]
    pub swipe_right_if: Vec<String>,
    #[serde(default)]
    pub fun_fact: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, rename = "isAI")]
    pub generated: bool,
}

impl PartialCard {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

/// Last-resort text for fields that neither the source record nor the
/// archetype defaults supply.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SynthFallbacks {
    pub title: String,
    pub bio: String,
    pub skills: Vec<String>,
    #[serde(rename = "loveLanguage")]
    pub compatibility: Vec<String>,
    pub swipe_right_if: Vec<String>,
    pub fun_fact: String,
    pub location: String,
    pub looking_for: String,
    pub tags: Vec<String>,
    pub image: String,
}

impl Default for SynthFallbacks {
    fn default() -> Self {
        Self {
            title: "Career Pathway".to_string(),
            bio: "Strategic professional role.".to_string(),
            skills: vec!["Strategy".to_string()],
            compatibility: vec!["✨ Growth".to_string()],
            swipe_right_if: vec!["Impact".to_string()],
            fun_fact: "Strategic role.".to_string(),
            location: "Innovation Hub".to_string(),
            looking_for: "A dedicated team player.".to_string(),
            tags: vec!["Career".to_string()],
            image: FALLBACK_IMAGE_URL.to_string(),
        }
    }
}

/// Borrowed view of everything needed to turn a [`PartialCard`] into a
/// complete [`CandidateCard`]. Pure: the only variation comes from `index`.
#[derive(Debug, Clone, Copy)]
pub struct CardSynth<'a> {
    pub rules: &'a ArchetypeRules,
    pub archetypes: &'a ArchetypeTable,
    pub images: &'a ImagePool,
    pub fallbacks: &'a SynthFallbacks,
}

impl<'a> CardSynth<'a> {
    pub fn synthesize(&self, partial: PartialCard, index: usize) -> CandidateCard {
        let title = non_blank(Some(partial.title)).unwrap_or_else(|| self.fallbacks.title.clone());
        let archetype = partial
            .archetype
            .as_deref()
            .and_then(Archetype::from_label)
            .unwrap_or_else(|| self.rules.resolve(&title));
        let defaults = self.archetypes.get(archetype);

        let image = non_blank(partial.image)
            .or_else(|| {
                non_blank(partial.image_seed)
                    .and_then(|seed| self.images.pick_for_seed(&seed).map(str::to_string))
            })
            .or_else(|| self.images.get(index).map(str::to_string))
            .or_else(|| defaults.and_then(|d| non_blank(d.image.clone())))
            .unwrap_or_else(|| self.fallbacks.image.clone());

        CandidateCard {
            id: non_blank(partial.id).unwrap_or_else(|| format!("card-{index}")),
            title,
            audience: partial.audience.unwrap_or(Audience::Any),
            archetype,
            image,
            location: non_blank(partial.location)
                .unwrap_or_else(|| self.fallbacks.location.clone()),
            bio: non_blank(partial.bio)
                .or_else(|| defaults.and_then(|d| non_blank(d.bio.clone())))
                .unwrap_or_else(|| self.fallbacks.bio.clone()),
            looking_for: non_blank(partial.looking_for)
                .unwrap_or_else(|| self.fallbacks.looking_for.clone()),
            skills: non_empty(partial.skills)
                .or_else(|| defaults.and_then(|d| non_empty(d.skills.clone())))
                .unwrap_or_else(|| self.fallbacks.skills.clone()),
            compatibility: non_empty(partial.compatibility)
                .or_else(|| defaults.and_then(|d| non_empty(d.compatibility.clone())))
                .unwrap_or_else(|| self.fallbacks.compatibility.clone()),
            swipe_right_if: non_empty(partial.swipe_right_if)
                .unwrap_or_else(|| self.fallbacks.swipe_right_if.clone()),
            fun_fact: non_blank(partial.fun_fact)
                .or_else(|| defaults.and_then(|d| non_blank(d.fun_fact.clone())))
                .unwrap_or_else(|| self.fallbacks.fun_fact.clone()),
            tags: non_empty(partial.tags).unwrap_or_else(|| self.fallbacks.tags.clone()),
            generated: partial.generated,
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}

fn non_empty(values: Vec<String>) -> Option<Vec<String>> {
    let values: Vec<String> = values
        .into_iter()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .collect();
    if values.is_empty() {
        None
    } else {
        Some(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ArchetypeProfile, ArchetypeRule, Program};

    struct Fixture {
        rules: ArchetypeRules,
        archetypes: ArchetypeTable,
        images: ImagePool,
        fallbacks: SynthFallbacks,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                rules: ArchetypeRules::new(
                    vec![ArchetypeRule {
                        keywords: vec!["chef".into()],
                        archetype: Archetype::Alchemist,
                    }],
                    Archetype::Specialist,
                ),
                archetypes: ArchetypeTable::new(vec![ArchetypeProfile {
                    archetype: Archetype::Alchemist,
                    bio: Some("I synthesize transformative products.".into()),
                    skills: vec!["R&D".into(), "Design".into()],
                    compatibility: vec!["✨ Discovery".into()],
                    fun_fact: Some("Alchemists ship breakthroughs.".into()),
                    image: Some("https://img/alch.jpg".into()),
                }]),
                images: ImagePool::new(vec!["https://img/0.jpg".into(), "https://img/1.jpg".into()]),
                fallbacks: SynthFallbacks::default(),
            }
        }

        fn synth(&self) -> CardSynth<'_> {
            CardSynth {
                rules: &self.rules,
                archetypes: &self.archetypes,
                images: &self.images,
                fallbacks: &self.fallbacks,
            }
        }
    }

    #[test]
    fn sparse_title_only_card_is_complete() {
        let fixture = Fixture::new();
        let card = fixture.synth().synthesize(PartialCard::titled("X"), 3);
        assert!(card.is_complete(), "missing {:?}", card.missing_fields());
        assert_eq!(card.archetype, Archetype::Specialist);
        assert_eq!(card.bio, "Strategic professional role.");
        assert_eq!(card.swipe_right_if, vec!["Impact".to_string()]);
        assert_eq!(card.image, "https://img/1.jpg");
        assert_eq!(card.id, "card-3");
        assert_eq!(card.audience, Audience::Any);
    }

    #[test]
    fn archetype_defaults_fill_narrative_fields() {
        let fixture = Fixture::new();
        let card = fixture
            .synth()
            .synthesize(PartialCard::titled("Executive Chef"), 0);
        assert_eq!(card.archetype, Archetype::Alchemist);
        assert_eq!(card.bio, "I synthesize transformative products.");
        assert_eq!(card.skills, vec!["R&D".to_string(), "Design".to_string()]);
        assert_eq!(card.fun_fact, "Alchemists ship breakthroughs.");
        // The shared pool takes precedence over the archetype portrait.
        assert_eq!(card.image, "https://img/0.jpg");
    }

    #[test]
    fn explicit_fields_are_kept() {
        let fixture = Fixture::new();
        let partial = PartialCard {
            id: Some("hc-01".into()),
            title: "Pediatric Unit Supervisor".into(),
            audience: Some(Audience::Program(Program::HealthCare)),
            archetype: Some("The Guardian".into()),
            bio: Some("I oversee daily operations.".into()),
            skills: vec!["Pediatrics".into(), "  ".into()],
            ..PartialCard::default()
        };
        let card = fixture.synth().synthesize(partial, 9);
        assert_eq!(card.id, "hc-01");
        assert_eq!(card.archetype, Archetype::Guardian);
        assert_eq!(card.skills, vec!["Pediatrics".to_string()]);
        assert_eq!(card.audience, Audience::Program(Program::HealthCare));
    }

    #[test]
    fn unknown_archetype_label_resolves_from_title() {
        let fixture = Fixture::new();
        let partial = PartialCard {
            archetype: Some("The Wizard of Oz".into()),
            ..PartialCard::titled("Pastry Chef")
        };
        let card = fixture.synth().synthesize(partial, 0);
        assert_eq!(card.archetype, Archetype::Alchemist);
    }

    #[test]
    fn blank_values_count_as_missing() {
        let fixture = Fixture::new();
        let partial = PartialCard {
            bio: Some("   ".into()),
            location: Some(String::new()),
            tags: vec![String::new()],
            ..PartialCard::titled("   ")
        };
        let card = fixture.synth().synthesize(partial, 0);
        assert_eq!(card.title, "Career Pathway");
        assert_eq!(card.location, "Innovation Hub");
        assert_eq!(card.tags, vec!["Career".to_string()]);
        assert!(card.is_complete());
    }

    #[test]
    fn image_seed_is_stable() {
        let fixture = Fixture::new();
        let partial = PartialCard {
            image_seed: Some("Pediatric-Supervisor".into()),
            ..PartialCard::titled("Role")
        };
        let first = fixture.synth().synthesize(partial.clone(), 0);
        let second = fixture.synth().synthesize(partial, 1);
        assert_eq!(first.image, second.image);
    }

    #[test]
    fn empty_image_pool_falls_back_to_archetype_then_constant() {
        let mut fixture = Fixture::new();
        fixture.images = ImagePool::new(Vec::new());
        let chef = fixture.synth().synthesize(PartialCard::titled("Chef"), 0);
        assert_eq!(chef.image, "https://img/alch.jpg");
        let other = fixture.synth().synthesize(PartialCard::titled("Juggler"), 0);
        assert_eq!(other.image, FALLBACK_IMAGE_URL);
    }

    #[test]
    fn seed_hash_matches_rolling_hash() {
        assert_eq!(seed_hash(""), 0);
        assert_eq!(seed_hash("a"), 97);
        assert_eq!(seed_hash("ab"), 97 * 31 + 98);
        // Long inputs wrap instead of overflowing.
        let long = "x".repeat(200);
        let _ = seed_hash(&long);
    }

    #[test]
    fn pool_indexing_wraps() {
        let pool = ImagePool::new(vec!["a".into(), " ".into(), "b".into()]);
        assert_eq!(pool.len(), 2);
        assert_eq!(pool.get(0), Some("a"));
        assert_eq!(pool.get(3), Some("b"));
        assert_eq!(ImagePool::default().get(0), None);
    }
}
