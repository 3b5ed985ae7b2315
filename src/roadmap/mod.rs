//! Roadmap ingestion and rendering.
//!
//! Backend payloads are loosely typed JSON. [`Roadmap::from_payload`]
//! classifies a payload once, rejecting the legacy `career_path` shape and
//! anything unrecognized, and reads the five fixed stages through defensive
//! [`accessors`]. [`render`] and [`render_not_found`] produce the text shown
//! to the user.

pub mod accessors;
pub mod model;
pub mod render;
pub mod source;

pub use model::{
    GapStage, LaunchStage, MirrorStage, ReadinessStage, Resource, Roadmap, RoadmapPayload,
    SkillGap, Sprint, SprintStage, Stage, StageHeader, UserProfileSummary,
};
pub use render::{render, render_not_found};
pub use source::{decode_shared_roadmap, encode_shared_roadmap, load_stored_roadmap};

use serde_json::Value;

/// Render any payload: the roadmap when it resolves, the not-found text
/// otherwise.
pub fn render_payload(payload: &Value) -> String {
    match Roadmap::from_payload(payload) {
        Ok(roadmap) => render(&roadmap),
        Err(e) => {
            tracing::warn!(error = %e, "Career path payload not renderable");
            render_not_found()
        }
    }
}
