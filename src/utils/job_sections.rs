//! Splits generated posting text into a description and a requirements section.
//!
//! Best effort: the section markers are tried in order, then a split at the first
//! paragraph break past the midpoint for long text, then the text is passed through
//! whole with a default requirements line.

use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

pub const DEFAULT_REQUIREMENTS: &str =
    "Requirements will be discussed during the interview process.";

const MIDPOINT_SPLIT_MIN_LEN: usize = 500;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobSections {
    pub description: String,
    pub requirements: String,
}

struct Patterns {
    markers: Vec<Regex>,
    description_noise: Regex,
    requirements_noise: Regex,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        let compile = |p: &str| Regex::new(p).expect("section pattern is valid");
        Patterns {
            markers: vec![
                compile(r"(?i)\*\*SECTION 2:|REQUIREMENTS?:"),
                compile(r"(?i)## Requirements?"),
                compile(r"(?i)Requirements?:"),
                compile(r"(?i)\n\nRequirements?:"),
            ],
            description_noise: compile(r"(?i)\*\*SECTION 1:|JOB DESCRIPTION:?"),
            requirements_noise: compile(r"(?i)\*\*SECTION 2:|REQUIREMENTS?:?"),
        }
    })
}

pub fn split_sections(text: &str) -> JobSections {
    let patterns = patterns();

    let mut description = text.to_string();
    let mut requirements = String::new();

    for marker in &patterns.markers {
        let parts: Vec<&str> = marker.split(text).collect();
        if parts.len() >= 2 {
            description = parts[0].trim().to_string();
            requirements = parts[1..].concat().trim().to_string();
            break;
        }
    }

    description = patterns
        .description_noise
        .replace_all(&description, "")
        .trim()
        .to_string();
    requirements = patterns
        .requirements_noise
        .replace_all(&requirements, "")
        .trim()
        .to_string();

    if requirements.is_empty() && description.chars().count() > MIDPOINT_SPLIT_MIN_LEN {
        if let Some((head, tail)) = split_after_midpoint(&description) {
            requirements = tail;
            description = head;
        }
    }

    JobSections {
        description: if description.is_empty() {
            text.to_string()
        } else {
            description
        },
        requirements: if requirements.is_empty() {
            DEFAULT_REQUIREMENTS.to_string()
        } else {
            requirements
        },
    }
}

/// Splits at the first blank line at or after the middle of `text`.
fn split_after_midpoint(text: &str) -> Option<(String, String)> {
    let mut mid = text.len() / 2;
    while !text.is_char_boundary(mid) {
        mid += 1;
    }
    let split_at = text[mid..].find("\n\n")? + mid;
    if split_at == 0 {
        return None;
    }
    Some((
        text[..split_at].trim().to_string(),
        text[split_at..].trim().to_string(),
    ))
}
