//! Onboarding step definitions.

use serde::{Deserialize, Serialize};

/// How a step collects its answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    /// Two mutually exclusive options.
    Binary,
    /// A small grid of options.
    Grid,
    /// A longer list picked from a dropdown.
    Dropdown,
    /// Free text.
    Text,
    /// File upload, answered with the uploaded file name.
    File,
}

impl StepKind {
    /// Binary, grid, and dropdown steps pick from a fixed option list.
    pub fn is_choice(&self) -> bool {
        matches!(self, Self::Binary | Self::Grid | Self::Dropdown)
    }

    /// Whether recording an answer moves straight on to the next step.
    /// Text and file steps wait for an explicit "next" so typing or an
    /// in-flight upload is never cut short.
    pub fn auto_advances(&self) -> bool {
        self.is_choice()
    }
}

impl std::fmt::Display for StepKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Binary => "binary",
            Self::Grid => "grid",
            Self::Dropdown => "dropdown",
            Self::Text => "text",
            Self::File => "file",
        };
        write!(f, "{s}")
    }
}

/// Which generate-request field a step's answer feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepField {
    Location,
    Industry,
    EducationLevel,
    YearsExperience,
    CurrentRole,
    CareerGoals,
    Resume,
}

/// One screen of the onboarding wizard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub title: String,
    pub subtitle: String,
    pub kind: StepKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    pub field: StepField,
}

impl Step {
    pub fn new(title: &str, subtitle: &str, kind: StepKind, field: StepField) -> Self {
        Self {
            title: title.to_string(),
            subtitle: subtitle.to_string(),
            kind,
            options: Vec::new(),
            placeholder: None,
            field,
        }
    }

    pub fn with_options(mut self, options: &[&str]) -> Self {
        self.options = options.iter().map(|o| o.to_string()).collect();
        self
    }

    pub fn with_placeholder(mut self, placeholder: &str) -> Self {
        self.placeholder = Some(placeholder.to_string());
        self
    }

    pub fn has_option(&self, value: &str) -> bool {
        self.options.iter().any(|o| o == value)
    }
}

/// The standard onboarding flow.
pub fn default_steps() -> Vec<Step> {
    vec![
        Step::new(
            "Location",
            "Are you currently based in Ireland?",
            StepKind::Binary,
            StepField::Location,
        )
        .with_options(&["Yes", "No"]),
        Step::new(
            "Industry",
            "Which industry are you currently in?",
            StepKind::Grid,
            StepField::Industry,
        )
        .with_options(&["Sales", "Tech", "Retail", "Legal", "Other"]),
        Step::new(
            "Education",
            "What is your highest level of education?",
            StepKind::Dropdown,
            StepField::EducationLevel,
        )
        .with_options(&["High School", "Bachelor's", "Master's", "PhD"])
        .with_placeholder("Select your education level"),
        Step::new(
            "Years",
            "How many years have you been in this industry?",
            StepKind::Dropdown,
            StepField::YearsExperience,
        )
        .with_options(&["1-2 years", "3-5 years", "5+ years"])
        .with_placeholder("1-2 years"),
        Step::new(
            "Current role",
            "What is your current role?",
            StepKind::Dropdown,
            StepField::CurrentRole,
        )
        .with_options(&["Engineer", "Manager", "Director", "Other"])
        .with_placeholder("Select your current role"),
        Step::new(
            "Motivation",
            "Tell us about your career goals",
            StepKind::Text,
            StepField::CareerGoals,
        )
        .with_placeholder("Tell us about your career goals..."),
        Step::new(
            "Resume",
            "Upload your CV so we can tailor your roadmap",
            StepKind::File,
            StepField::Resume,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn choice_kinds_auto_advance() {
        assert!(StepKind::Binary.auto_advances());
        assert!(StepKind::Grid.auto_advances());
        assert!(StepKind::Dropdown.auto_advances());
        assert!(!StepKind::Text.auto_advances());
        assert!(!StepKind::File.auto_advances());
    }

    #[test]
    fn display_matches_serde() {
        for kind in [
            StepKind::Binary,
            StepKind::Grid,
            StepKind::Dropdown,
            StepKind::Text,
            StepKind::File,
        ] {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(format!("\"{kind}\""), json);
        }
    }

    #[test]
    fn default_flow_shape() {
        let steps = default_steps();
        assert_eq!(steps.len(), 7);
        assert_eq!(steps[0].kind, StepKind::Binary);
        assert_eq!(steps[5].kind, StepKind::Text);
        assert_eq!(steps.last().unwrap().kind, StepKind::File);
        // every choice step has options, no free-form step does
        for step in &steps {
            assert_eq!(step.kind.is_choice(), !step.options.is_empty(), "{}", step.title);
        }
        assert!(steps[1].has_option("Tech"));
        assert!(!steps[1].has_option("tech"));
    }
}
