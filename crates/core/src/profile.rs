use crate::Program;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProfileError {
    #[error("missing {0}")]
    MissingField(&'static str),
}

/// Setup answers as typed, before validation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileDraft {
    pub name: String,
    pub program: Option<Program>,
    pub passions: [String; 2],
    pub strength: String,
    pub happiness: String,
    pub avatar: String,
}

/// A validated profile. Fixed for the rest of the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
    pub program: Program,
    pub passions: [String; 2],
    pub strength: String,
    pub happiness: String,
    pub avatar: String,
}

impl ProfileDraft {
    pub fn finish(&self) -> Result<UserProfile, ProfileError> {
        Ok(UserProfile {
            name: required("name", &self.name)?,
            program: self.program.ok_or(ProfileError::MissingField("program"))?,
            passions: [
                required("first passion", &self.passions[0])?,
                required("second passion", &self.passions[1])?,
            ],
            strength: required("strength", &self.strength)?,
            happiness: required("happiness trigger", &self.happiness)?,
            avatar: required("avatar", &self.avatar)?,
        })
    }
}

fn required(field: &'static str, value: &str) -> Result<String, ProfileError> {
    let value = value.trim();
    if value.is_empty() {
        Err(ProfileError::MissingField(field))
    } else {
        Ok(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> ProfileDraft {
        ProfileDraft {
            name: "  Ada ".to_string(),
            program: Some(Program::HealthCare),
            passions: ["Sport".to_string(), "Travel".to_string()],
            strength: "Listening".to_string(),
            happiness: "Helping people".to_string(),
            avatar: "https://avatars/1.png".to_string(),
        }
    }

    #[test]
    fn finish_trims_values() {
        let profile = draft().finish().expect("complete profile");
        assert_eq!(profile.name, "Ada");
        assert_eq!(profile.program, Program::HealthCare);
    }

    #[test]
    fn blank_fields_are_rejected() {
        let mut missing_passion = draft();
        missing_passion.passions[1] = "   ".to_string();
        assert_eq!(
            missing_passion.finish(),
            Err(ProfileError::MissingField("second passion"))
        );

        let mut missing_program = draft();
        missing_program.program = None;
        assert_eq!(
            missing_program.finish(),
            Err(ProfileError::MissingField("program"))
        );

        let mut missing_avatar = draft();
        missing_avatar.avatar.clear();
        assert_eq!(
            missing_avatar.finish(),
            Err(ProfileError::MissingField("avatar"))
        );
    }
}
