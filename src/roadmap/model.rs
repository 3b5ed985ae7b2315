//! Roadmap types and ingestion.
//!
//! A payload is classified exactly once into a [`RoadmapPayload`]; only the
//! current `career_roadmap` schema becomes a [`Roadmap`]. Everything past that
//! point is typed.

use serde::Serialize;
use serde_json::Value;

use super::accessors::{number, object, object_list, text, text_list};
use crate::error::RoadmapError;

/// Number of fixed stages in a roadmap.
pub const STAGE_COUNT: u8 = 5;

/// The two payload shapes the backend has produced over time.
#[derive(Debug, Clone, PartialEq)]
pub enum RoadmapPayload {
    /// `{ career_roadmap: { stage_1.., user_profile } }`
    Current(Value),
    /// `{ career_path: { summary, milestones[] } }`. Recognized but not rendered.
    Legacy(Value),
}

impl RoadmapPayload {
    /// Classify by top-level key. `career_roadmap` wins when both exist.
    pub fn classify(payload: &Value) -> Result<Self, RoadmapError> {
        let Some(fields) = payload.as_object() else {
            return Err(RoadmapError::UnrecognizedShape);
        };
        if let Some(roadmap) = fields.get("career_roadmap") {
            return Ok(Self::Current(roadmap.clone()));
        }
        if let Some(legacy) = fields.get("career_path") {
            return Ok(Self::Legacy(legacy.clone()));
        }
        Err(RoadmapError::UnrecognizedShape)
    }
}

/// A link from a stage's `helpful_resources`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resource {
    pub title: String,
    pub url: String,
}

/// Fields every stage carries.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct StageHeader {
    pub title: String,
    /// Percentage in `0..=100`.
    pub confidence_score: u8,
    pub description: String,
    pub helpful_resources: Vec<Resource>,
}

impl StageHeader {
    fn read(data: &Value) -> Self {
        Self {
            title: text(data, "title"),
            confidence_score: clamp_percent(number(data, "confidence_score")),
            description: text(data, "description"),
            helpful_resources: object_list(data, "helpful_resources")
                .into_iter()
                .map(|r| Resource {
                    title: text(r, "title"),
                    url: text(r, "url"),
                })
                .filter(|r| !r.title.is_empty() || !r.url.is_empty())
                .collect(),
        }
    }
}

/// Stage 1: skills audit.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct MirrorStage {
    pub header: StageHeader,
    pub current_skills: Vec<String>,
    pub transferable_skills: Vec<String>,
    pub strengths: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct SkillGap {
    pub skill: String,
    pub current_level: String,
    pub target_level: String,
    pub priority: String,
}

/// Stage 2: gap analysis.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct GapStage {
    pub header: StageHeader,
    pub skill_gaps: Vec<SkillGap>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Sprint {
    pub name: String,
    pub duration_weeks: u32,
    pub goals: Vec<String>,
}

/// Stage 3: sprint plan.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SprintStage {
    pub header: StageHeader,
    pub sprints: Vec<Sprint>,
}

/// Stage 4: readiness index.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ReadinessStage {
    pub header: StageHeader,
    pub readiness_score: u8,
    pub criteria: Vec<String>,
    pub blockers: Vec<String>,
}

/// Stage 5: launch.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct LaunchStage {
    pub header: StageHeader,
    pub target_roles: Vec<String>,
    pub next_steps: Vec<String>,
    pub networking: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Stage {
    Mirror(MirrorStage),
    Gap(GapStage),
    Sprint(SprintStage),
    Readiness(ReadinessStage),
    Launch(LaunchStage),
}

impl Stage {
    /// Build the stage at `position` (1-based) from its raw data.
    fn read(position: u8, data: &Value) -> Option<Self> {
        let header = StageHeader::read(data);
        let stage = match position {
            1 => Self::Mirror(MirrorStage {
                header,
                current_skills: text_list(data, "current_skills"),
                transferable_skills: text_list(data, "transferable_skills"),
                strengths: text_list(data, "strengths"),
            }),
            2 => Self::Gap(GapStage {
                header,
                skill_gaps: object_list(data, "skill_gaps")
                    .into_iter()
                    .map(|g| SkillGap {
                        skill: text(g, "skill"),
                        current_level: text(g, "current_level"),
                        target_level: text(g, "target_level"),
                        priority: text(g, "priority"),
                    })
                    .collect(),
            }),
            3 => Self::Sprint(SprintStage {
                header,
                sprints: object_list(data, "sprints")
                    .into_iter()
                    .map(|s| Sprint {
                        name: text(s, "name"),
                        duration_weeks: number(s, "duration_weeks").max(0.0).round() as u32,
                        goals: text_list(s, "goals"),
                    })
                    .collect(),
            }),
            4 => Self::Readiness(ReadinessStage {
                header,
                readiness_score: clamp_percent(number(data, "readiness_score")),
                criteria: text_list(data, "criteria"),
                blockers: text_list(data, "blockers"),
            }),
            5 => Self::Launch(LaunchStage {
                header,
                target_roles: text_list(data, "target_roles"),
                next_steps: text_list(data, "next_steps"),
                networking: text_list(data, "networking"),
            }),
            _ => return None,
        };
        Some(stage)
    }

    /// 1-based position in the roadmap.
    pub fn number(&self) -> u8 {
        match self {
            Self::Mirror(_) => 1,
            Self::Gap(_) => 2,
            Self::Sprint(_) => 3,
            Self::Readiness(_) => 4,
            Self::Launch(_) => 5,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Mirror(_) => "Skills Mirror",
            Self::Gap(_) => "Gap Analysis",
            Self::Sprint(_) => "Sprint Plan",
            Self::Readiness(_) => "Readiness Index",
            Self::Launch(_) => "Launch",
        }
    }

    pub fn header(&self) -> &StageHeader {
        match self {
            Self::Mirror(s) => &s.header,
            Self::Gap(s) => &s.header,
            Self::Sprint(s) => &s.header,
            Self::Readiness(s) => &s.header,
            Self::Launch(s) => &s.header,
        }
    }
}

/// The `user_profile` block of a roadmap.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct UserProfileSummary {
    pub name: String,
    pub current_role: String,
    pub target_role: String,
    pub industry: String,
    pub experience: String,
    pub location: String,
}

impl UserProfileSummary {
    fn read(data: &Value) -> Self {
        Self {
            name: text(data, "name"),
            current_role: text(data, "current_role"),
            target_role: text(data, "target_role"),
            industry: text(data, "industry"),
            experience: text(data, "experience"),
            location: text(data, "location"),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// A renderable roadmap. Stages absent from the payload are absent here.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Roadmap {
    pub profile: UserProfileSummary,
    /// Present stages in ascending order.
    pub stages: Vec<Stage>,
}

impl Roadmap {
    /// Classify and read a raw payload.
    pub fn from_payload(payload: &Value) -> Result<Self, RoadmapError> {
        match RoadmapPayload::classify(payload)? {
            RoadmapPayload::Current(roadmap) => Self::from_current(&roadmap),
            RoadmapPayload::Legacy(_) => {
                tracing::warn!("Legacy career_path payload is not supported");
                Err(RoadmapError::LegacyShape)
            }
        }
    }

    fn from_current(roadmap: &Value) -> Result<Self, RoadmapError> {
        let Some(fields) = roadmap.as_object() else {
            return Err(RoadmapError::Malformed(
                "career_roadmap is not an object".to_string(),
            ));
        };

        let mut stages = Vec::new();
        for n in 1..=STAGE_COUNT {
            let exact = format!("stage_{n}");
            let prefix = format!("stage_{n}_");
            let data = fields.get(&exact).or_else(|| {
                fields
                    .iter()
                    .find(|(key, _)| key.starts_with(&prefix))
                    .map(|(_, value)| value)
            });
            if let Some(data) = data
                && data.is_object()
                && let Some(stage) = Stage::read(n, data)
            {
                stages.push(stage);
            }
        }

        let profile = Value::Object(object(roadmap, "user_profile"));
        Ok(Self {
            profile: UserProfileSummary::read(&profile),
            stages,
        })
    }

    /// Stage `n` (1-based), if present.
    pub fn stage(&self, n: u8) -> Option<&Stage> {
        self.stages.iter().find(|s| s.number() == n)
    }
}

fn clamp_percent(raw: f64) -> u8 {
    raw.clamp(0.0, 100.0).round() as u8
}
