use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SurveyError {
    #[error("question {0} is unanswered")]
    Unanswered(&'static str),
    #[error("question {0}: '{1}' is not one of the options")]
    UnknownOption(&'static str, String),
    #[error("question {0}: 'Others' needs a description")]
    MissingOther(&'static str),
}

macro_rules! survey_choice {
    ($name:ident { $($variant:ident => $label:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $label)] $variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];
            /// Labels in the same order as [`Self::ALL`].
            pub const LABELS: &'static [&'static str] = &[$($label),+];

            pub fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }

            pub fn from_label(value: &str) -> Option<Self> {
                let value = value.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|choice| choice.label().eq_ignore_ascii_case(value))
            }
        }
    };
}

survey_choice!(NewTitles {
    Zero => "Zero",
    OneOrTwo => "1-2",
    ThreeOrMore => "3+",
});

survey_choice!(PersonaAccuracy {
    Accurate => "Accurate",
    Mostly => "Mostly",
    Generic => "Generic",
});

survey_choice!(Takeaway {
    UpdateCv => "Update CV",
    LearnAi => "Learn AI",
    Confident => "Confident",
    Confused => "Confused",
    Others => "Others",
});

survey_choice!(Experience {
    FunLessInfo => "Fun but less info",
    FunInformative => "Fun and informative",
    Annoying => "Annoying",
});

survey_choice!(Verdict {
    Yes => "YES",
    Maybe => "Maybe",
    No => "No",
});

survey_choice!(NextFeature {
    RealLinks => "Real Links",
    Save => "Save",
    Chat => "Chat",
    Others => "Others",
});

/// Prompt text and option labels, in asking order.
pub struct SurveyQuestion {
    pub id: &'static str,
    pub text: &'static str,
    pub options: &'static [&'static str],
}

pub const SURVEY_QUESTIONS: [SurveyQuestion; 7] = [
    SurveyQuestion {
        id: "q1",
        text: "How many job titles were new to you today?",
        options: NewTitles::LABELS,
    },
    SurveyQuestion {
        id: "q2",
        text: "Accuracy of AI persona?",
        options: PersonaAccuracy::LABELS,
    },
    SurveyQuestion {
        id: "q3",
        text: "Top takeaway?",
        options: Takeaway::LABELS,
    },
    SurveyQuestion {
        id: "q4",
        text: "App experience vs standard board?",
        options: Experience::LABELS,
    },
    SurveyQuestion {
        id: "q5",
        text: "Verdict for CareersFest?",
        options: Verdict::LABELS,
    },
    SurveyQuestion {
        id: "q6",
        text: "Feature for next update?",
        options: NextFeature::LABELS,
    },
    SurveyQuestion {
        id: "q7",
        text: "Anything else you'd like to share?",
        options: &[],
    },
];

/// Raw answers keyed the way the sync collector expects them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveyDraft {
    pub q1: String,
    pub q2: String,
    pub q3: String,
    pub q3_other: String,
    pub q4: String,
    pub q5: String,
    pub q6: String,
    pub q6_other: String,
    pub q7: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveyAnswers {
    pub new_titles: NewTitles,
    pub persona_accuracy: PersonaAccuracy,
    pub takeaway: Takeaway,
    pub takeaway_other: Option<String>,
    pub experience: Experience,
    pub verdict: Verdict,
    pub next_feature: NextFeature,
    pub next_feature_other: Option<String>,
    pub comments: Option<String>,
}

impl SurveyDraft {
    pub fn finish(&self) -> Result<SurveyAnswers, SurveyError> {
        let takeaway = choice("q3", &self.q3, Takeaway::from_label)?;
        let next_feature = choice("q6", &self.q6, NextFeature::from_label)?;
        Ok(SurveyAnswers {
            new_titles: choice("q1", &self.q1, NewTitles::from_label)?,
            persona_accuracy: choice("q2", &self.q2, PersonaAccuracy::from_label)?,
            takeaway,
            takeaway_other: other("q3", takeaway == Takeaway::Others, &self.q3_other)?,
            experience: choice("q4", &self.q4, Experience::from_label)?,
            verdict: choice("q5", &self.q5, Verdict::from_label)?,
            next_feature,
            next_feature_other: other(
                "q6",
                next_feature == NextFeature::Others,
                &self.q6_other,
            )?,
            comments: non_blank(&self.q7),
        })
    }
}

impl SurveyAnswers {
    /// Takeaway as displayed; "Others" is replaced by its description.
    pub fn takeaway_text(&self) -> &str {
        self.takeaway_other
            .as_deref()
            .unwrap_or(self.takeaway.label())
    }

    pub fn next_feature_text(&self) -> &str {
        self.next_feature_other
            .as_deref()
            .unwrap_or(self.next_feature.label())
    }

    pub fn to_draft(&self) -> SurveyDraft {
        SurveyDraft {
            q1: self.new_titles.label().to_string(),
            q2: self.persona_accuracy.label().to_string(),
            q3: self.takeaway.label().to_string(),
            q3_other: self.takeaway_other.clone().unwrap_or_default(),
            q4: self.experience.label().to_string(),
            q5: self.verdict.label().to_string(),
            q6: self.next_feature.label().to_string(),
            q6_other: self.next_feature_other.clone().unwrap_or_default(),
            q7: self.comments.clone().unwrap_or_default(),
        }
    }
}

fn choice<T>(
    id: &'static str,
    value: &str,
    parse: impl Fn(&str) -> Option<T>,
) -> Result<T, SurveyError> {
    if value.trim().is_empty() {
        return Err(SurveyError::Unanswered(id));
    }
    parse(value).ok_or_else(|| SurveyError::UnknownOption(id, value.trim().to_string()))
}

fn other(id: &'static str, selected: bool, value: &str) -> Result<Option<String>, SurveyError> {
    if !selected {
        return Ok(None);
    }
    non_blank(value)
        .map(Some)
        .ok_or(SurveyError::MissingOther(id))
}

fn non_blank(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}
