use crate::ServiceConfig;
use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::time::Duration;
use swipematch_core::{Audience, CandidateCard, Catalog, PartialCard, UserProfile};
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

/// Cards kept from one deck generation, whatever the model returns.
pub const MAX_GENERATED_CARDS: usize = 5;

#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("generator returned empty content")]
    EmptyContent,
    #[error("generator timed out after {0:?}")]
    Timeout(Duration),
    #[error("generation is disabled")]
    Disabled,
}

/// A role as returned by the deck generator. Only the title is required.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedCard {
    pub title: String,
    #[serde(default)]
    pub archetype: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub looking_for: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub love_language: Vec<String>,
    #[serde(default)]
    pub swipe_right_if: Vec<String>,
    #[serde(default)]
    pub seed: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub fun_fact: Option<String>,
}

impl GeneratedCard {
    /// Sparse card for the user's program, marked as generated. The image
    /// is picked from the seed, or the title when no seed came back.
    pub fn into_partial(self, profile: &UserProfile) -> PartialCard {
        let image_seed = self
            .seed
            .filter(|seed| !seed.trim().is_empty())
            .unwrap_or_else(|| self.title.clone());
        let swipe_right_if = if self.swipe_right_if.is_empty() {
            vec!["Innovation".to_string()]
        } else {
            self.swipe_right_if
        };
        PartialCard {
            id: Some(format!("ai-{}", Uuid::new_v4())),
            title: self.title,
            audience: Some(Audience::Program(profile.program)),
            archetype: self.archetype,
            image_seed: Some(image_seed),
            location: self.location,
            bio: self.bio,
            looking_for: self.looking_for,
            skills: self.skills,
            compatibility: self.love_language,
            swipe_right_if,
            fun_fact: self.fun_fact,
            tags: self.tags,
            generated: true,
            ..PartialCard::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Persona {
    pub title: String,
    pub analysis: String,
}

impl Persona {
    pub fn fallback() -> Self {
        Self {
            title: "The Executive Strategist".to_string(),
            analysis: "Analytical leadership.".to_string(),
        }
    }
}

#[async_trait]
pub trait DeckGenerator: Send + Sync {
    async fn generate_deck(
        &self,
        profile: &UserProfile,
    ) -> Result<Vec<GeneratedCard>, GeneratorError>;
}

#[async_trait]
pub trait PersonaGenerator: Send + Sync {
    async fn generate_persona(
        &self,
        profile: &UserProfile,
        matches: &[CandidateCard],
    ) -> Result<Persona, GeneratorError>;
}

/// Stand-in used when no API key is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledGenerator;

#[async_trait]
impl DeckGenerator for DisabledGenerator {
    async fn generate_deck(
        &self,
        _profile: &UserProfile,
    ) -> Result<Vec<GeneratedCard>, GeneratorError> {
        Err(GeneratorError::Disabled)
    }
}

#[async_trait]
impl PersonaGenerator for DisabledGenerator {
    async fn generate_persona(
        &self,
        _profile: &UserProfile,
        _matches: &[CandidateCard],
    ) -> Result<Persona, GeneratorError> {
        Err(GeneratorError::Disabled)
    }
}

pub fn deck_prompt(profile: &UserProfile) -> String {
    format!(
        "Create 5 professional job roles for {name} who is studying {program}. \
         Passions: {passions}. Strength: {strength}. Happiness trigger: {happiness}. \
         Return JSON array of objects with these keys: title, archetype, \
         bio (must be at least 3 detailed sentences), location, lookingFor, \
         skills (array of 5), loveLanguage (array of 5), swipeRightIf (array of 3), \
         seed, tags (array of 1), funFact (a unique industry statistic or lighthearted fact), \
         isAI: true. Tone: Corporate yet engaging.",
        name = profile.name,
        program = profile.program.label(),
        passions = profile.passions.join(", "),
        strength = profile.strength,
        happiness = profile.happiness,
    )
}

pub fn persona_prompt(profile: &UserProfile, matches: &[CandidateCard]) -> String {
    let titles: Vec<&str> = matches.iter().map(|card| card.title.as_str()).collect();
    format!(
        "User: {name}. Matches: {titles}. Passions: {passions}. \
         JSON: {{title: \"Persona Title\", analysis: \"2-sentence linking matches to potential\"}}.",
        name = profile.name,
        titles = titles.join(", "),
        passions = profile.passions.join(", "),
    )
}

/// Removes a surrounding markdown code fence, if the model added one.
pub fn strip_json_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

pub fn parse_generated_json<T: DeserializeOwned>(text: &str) -> Result<T, GeneratorError> {
    let body = strip_json_fences(text);
    if body.is_empty() {
        return Err(GeneratorError::EmptyContent);
    }
    Ok(serde_json::from_str(body)?)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<RequestContent<'a>>,
    generation_config: GenerationConfig<'a>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    response_mime_type: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<ResponseCandidate>,
}

#[derive(Debug, Deserialize)]
struct ResponseCandidate {
    content: Option<ResponseContent>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl GenerateResponse {
    fn text(&self) -> Option<&str> {
        self.candidates
            .iter()
            .filter_map(|candidate| candidate.content.as_ref())
            .flat_map(|content| content.parts.iter())
            .find_map(|part| part.text.as_deref())
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorMessage,
}

#[derive(Debug, Deserialize)]
struct ApiErrorMessage {
    message: String,
}

/// JSON-mode text generation over the `generateContent` REST endpoint.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
    api_base: String,
}

impl GeminiClient {
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        api_base: impl Into<String>,
    ) -> Result<Self, GeneratorError> {
        let client = Client::builder().timeout(Duration::from_secs(60)).build()?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            model: model.into(),
            api_base: api_base.into(),
        })
    }

    /// `None` when the configuration has no API key.
    pub fn from_config(config: &ServiceConfig) -> Result<Option<Self>, GeneratorError> {
        config
            .api_key
            .as_ref()
            .map(|key| Self::new(key.clone(), config.model.clone(), config.api_base.clone()))
            .transpose()
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.api_base, self.model)
    }

    pub async fn generate_text(&self, prompt: &str) -> Result<String, GeneratorError> {
        let body = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
            },
        };
        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .map(|err| err.error.message)
                .unwrap_or(body);
            return Err(GeneratorError::Api {
                status: status.as_u16(),
                message,
            });
        }
        let parsed: GenerateResponse = response.json().await?;
        let text = parsed.text().ok_or(GeneratorError::EmptyContent)?;
        debug!(model = %self.model, chars = text.len(), "generation succeeded");
        Ok(text.to_string())
    }
}

#[async_trait]
impl DeckGenerator for GeminiClient {
    async fn generate_deck(
        &self,
        profile: &UserProfile,
    ) -> Result<Vec<GeneratedCard>, GeneratorError> {
        let text = self.generate_text(&deck_prompt(profile)).await?;
        parse_generated_json(&text)
    }
}

#[async_trait]
impl PersonaGenerator for GeminiClient {
    async fn generate_persona(
        &self,
        profile: &UserProfile,
        matches: &[CandidateCard],
    ) -> Result<Persona, GeneratorError> {
        let text = self.generate_text(&persona_prompt(profile, matches)).await?;
        let persona: Persona = parse_generated_json(&text)?;
        if persona.title.trim().is_empty() || persona.analysis.trim().is_empty() {
            return Err(GeneratorError::EmptyContent);
        }
        Ok(persona)
    }
}

/// Profile-tailored priming cards, fully synthesized against `catalog`.
/// Any failure, including a timeout or an untitled entry, yields no cards.
pub async fn generated_cards_or_empty(
    generator: &dyn DeckGenerator,
    profile: &UserProfile,
    catalog: &Catalog,
    timeout: Duration,
) -> Vec<CandidateCard> {
    let result = match tokio::time::timeout(timeout, generator.generate_deck(profile)).await {
        Ok(result) => result,
        Err(_) => Err(GeneratorError::Timeout(timeout)),
    };
    // A card without a title means the reply is malformed; keep none of it.
    let result = result.and_then(|cards| {
        if cards.iter().any(|card| card.title.trim().is_empty()) {
            Err(GeneratorError::EmptyContent)
        } else {
            Ok(cards)
        }
    });
    match result {
        Ok(cards) => {
            let synth = catalog.synth();
            cards
                .into_iter()
                .take(MAX_GENERATED_CARDS)
                .enumerate()
                .map(|(index, card)| synth.synthesize(card.into_partial(profile), index))
                .collect()
        }
        Err(GeneratorError::Disabled) => Vec::new(),
        Err(err) => {
            warn!(error = %err, "deck generation failed; continuing with the catalog only");
            Vec::new()
        }
    }
}

pub async fn persona_or_fallback(
    generator: &dyn PersonaGenerator,
    profile: &UserProfile,
    matches: &[CandidateCard],
    timeout: Duration,
) -> Persona {
    let result = match tokio::time::timeout(timeout, generator.generate_persona(profile, matches))
        .await
    {
        Ok(result) => result,
        Err(_) => Err(GeneratorError::Timeout(timeout)),
    };
    match result {
        Ok(persona) => persona,
        Err(GeneratorError::Disabled) => Persona::fallback(),
        Err(err) => {
            warn!(error = %err, "persona generation failed; using fallback");
            Persona::fallback()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use swipematch_core::Program;

    fn profile() -> UserProfile {
        UserProfile {
            name: "Sam".to_string(),
            program: Program::HospitalityTourism,
            passions: ["Food".to_string(), "Travel".to_string()],
            strength: "Organising".to_string(),
            happiness: "Happy guests".to_string(),
            avatar: "https://avatars/3.png".to_string(),
        }
    }

    #[test]
    fn fences_are_stripped() {
        assert_eq!(strip_json_fences("```json\n[1]\n```"), "[1]");
        assert_eq!(strip_json_fences("```\n{}\n```"), "{}");
        assert_eq!(strip_json_fences("  [] "), "[]");
    }

    #[test]
    fn object_where_array_expected_is_an_error() {
        let result = parse_generated_json::<Vec<GeneratedCard>>(r#"{"title": "Solo"}"#);
        assert!(matches!(result, Err(GeneratorError::Parse(_))));
        let empty = parse_generated_json::<Vec<GeneratedCard>>("``````");
        assert!(matches!(empty, Err(GeneratorError::EmptyContent)));
    }

    #[test]
    fn generated_cards_target_the_users_program() {
        let partial = GeneratedCard {
            title: "Food Tour Curator".to_string(),
            ..GeneratedCard::default()
        }
        .into_partial(&profile());
        assert_eq!(
            partial.audience,
            Some(Audience::Program(Program::HospitalityTourism))
        );
        assert!(partial.generated);
        assert!(partial.id.as_deref().is_some_and(|id| id.starts_with("ai-")));
        assert_eq!(partial.image_seed.as_deref(), Some("Food Tour Curator"));
        assert_eq!(partial.swipe_right_if, vec!["Innovation".to_string()]);
    }

    #[test]
    fn prompts_mention_the_profile() {
        let prompt = deck_prompt(&profile());
        assert!(prompt.contains("for Sam who is studying Hospitality & Tourism"));
        assert!(prompt.contains("Passions: Food, Travel."));
        let persona = persona_prompt(&profile(), &[]);
        assert!(persona.starts_with("User: Sam. Matches: ."));
    }
}
