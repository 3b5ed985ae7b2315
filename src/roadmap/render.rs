//! Plain-text rendering of a roadmap.

use std::fmt::Write;

use super::model::{Roadmap, Stage, UserProfileSummary};

pub const NOT_FOUND_TITLE: &str = "Career Path Not Found";
pub const NOT_FOUND_BODY: &str = "No career path data available.";

/// Shown when a payload could not be turned into a roadmap.
pub fn render_not_found() -> String {
    format!("{NOT_FOUND_TITLE}\n\n{NOT_FOUND_BODY}\n")
}

/// Render a roadmap. Empty fields and empty sections are left out.
pub fn render(roadmap: &Roadmap) -> String {
    let mut out = String::new();
    out.push_str("Your Career Roadmap\n");
    out.push_str("===================\n");

    if !roadmap.profile.is_empty() {
        out.push('\n');
        render_profile(&mut out, &roadmap.profile);
    }

    for stage in &roadmap.stages {
        out.push('\n');
        render_stage(&mut out, stage);
    }
    out
}

fn render_profile(out: &mut String, profile: &UserProfileSummary) {
    let rows = [
        ("Name", &profile.name),
        ("Current role", &profile.current_role),
        ("Target role", &profile.target_role),
        ("Industry", &profile.industry),
        ("Experience", &profile.experience),
        ("Location", &profile.location),
    ];
    for (label, value) in rows {
        if !value.is_empty() {
            let _ = writeln!(out, "{label}: {value}");
        }
    }
}

fn render_stage(out: &mut String, stage: &Stage) {
    let header = stage.header();
    if header.title.is_empty() {
        let _ = writeln!(out, "Stage {}: {}", stage.number(), stage.label());
    } else {
        let _ = writeln!(
            out,
            "Stage {}: {} ({})",
            stage.number(),
            header.title,
            stage.label()
        );
    }
    let _ = writeln!(out, "Confidence: {}%", header.confidence_score);
    if !header.description.is_empty() {
        let _ = writeln!(out, "{}", header.description);
    }

    match stage {
        Stage::Mirror(s) => {
            list(out, "Current skills", &s.current_skills);
            list(out, "Transferable skills", &s.transferable_skills);
            list(out, "Strengths", &s.strengths);
        }
        Stage::Gap(s) => {
            if !s.skill_gaps.is_empty() {
                out.push_str("Skill gaps:\n");
                for gap in &s.skill_gaps {
                    let _ = write!(out, "  - {}", or_dash(&gap.skill));
                    if !gap.current_level.is_empty() || !gap.target_level.is_empty() {
                        let _ = write!(
                            out,
                            ": {} -> {}",
                            or_dash(&gap.current_level),
                            or_dash(&gap.target_level)
                        );
                    }
                    if !gap.priority.is_empty() {
                        let _ = write!(out, " [{} priority]", gap.priority);
                    }
                    out.push('\n');
                }
            }
        }
        Stage::Sprint(s) => {
            if !s.sprints.is_empty() {
                out.push_str("Sprints:\n");
                for sprint in &s.sprints {
                    let _ = write!(out, "  - {}", or_dash(&sprint.name));
                    if sprint.duration_weeks > 0 {
                        let _ = write!(out, " ({} weeks)", sprint.duration_weeks);
                    }
                    out.push('\n');
                    for goal in &sprint.goals {
                        let _ = writeln!(out, "      * {goal}");
                    }
                }
            }
        }
        Stage::Readiness(s) => {
            let _ = writeln!(out, "Readiness: {}%", s.readiness_score);
            list(out, "Criteria", &s.criteria);
            list(out, "Blockers", &s.blockers);
        }
        Stage::Launch(s) => {
            list(out, "Target roles", &s.target_roles);
            list(out, "Next steps", &s.next_steps);
            list(out, "Networking", &s.networking);
        }
    }

    if !header.helpful_resources.is_empty() {
        out.push_str("Helpful resources:\n");
        for resource in &header.helpful_resources {
            if resource.url.is_empty() {
                let _ = writeln!(out, "  - {}", resource.title);
            } else {
                let _ = writeln!(out, "  - {} <{}>", or_dash(&resource.title), resource.url);
            }
        }
    }
}

fn list(out: &mut String, heading: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    let _ = writeln!(out, "{heading}:");
    for item in items {
        let _ = writeln!(out, "  - {item}");
    }
}

fn or_dash(value: &str) -> &str {
    if value.is_empty() { "-" } else { value }
}
