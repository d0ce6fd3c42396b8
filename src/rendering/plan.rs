/*!
 * Render plans: extraction, markdown and restoration in one call.
 */

use log::debug;
use regex::Captures;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::escape::escape_attribute;
use super::markdown;
use super::math::{self, MathSegment, PLACEHOLDER_REGEX};

/// Body used when a term has no definition text
pub const NO_DEFINITION_HTML: &str = "<p class=\"no-definition\">No definition available.</p>";

/// CSS class carried by every math element
pub const MATH_CLASS: &str = "math";

/// Renderable definition
///
/// Every math element in `html_body` carries a `data-math-id` naming exactly
/// one entry of `math_segments`, and every entry is referenced exactly once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderPlan {
    pub html_body: String,
    pub math_segments: Vec<MathSegment>,
}

impl RenderPlan {
    /// Plan shown for a missing or empty definition
    pub fn no_definition() -> Self {
        Self {
            html_body: NO_DEFINITION_HTML.to_string(),
            math_segments: Vec::new(),
        }
    }

    /// Whether this is the "no definition" plan
    pub fn is_empty_definition(&self) -> bool {
        self.html_body == NO_DEFINITION_HTML && self.math_segments.is_empty()
    }
}

/// Converts raw definition text into a [`RenderPlan`]
///
/// Rendering is a pure function of the input. Math is never typeset here;
/// the plan only marks where a typesetter should draw each formula.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContentRenderer;

impl ContentRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Render a definition
    pub fn render(&self, definition: Option<&str>) -> RenderPlan {
        let Some(definition) = definition.filter(|d| !d.is_empty()) else {
            return RenderPlan::no_definition();
        };

        let extraction = math::extract(definition);
        let html = markdown::to_html(&extraction.text);
        let (html_body, math_segments) = restore(&html, extraction.segments);

        debug!(
            "Rendered definition ({} bytes) with {} math segment(s)",
            html_body.len(),
            math_segments.len()
        );

        RenderPlan { html_body, math_segments }
    }
}

/// Replace placeholders with inert math elements
///
/// Segments whose placeholder did not survive the markdown pass (for
/// example inside a link destination) are dropped, as is any repeated
/// placeholder, so that ids and elements stay one-to-one.
fn restore(html: &str, segments: Vec<MathSegment>) -> (String, Vec<MathSegment>) {
    let mut referenced = BTreeSet::new();

    let body = PLACEHOLDER_REGEX
        .replace_all(html, |caps: &Captures| {
            let segment = caps[1]
                .parse::<usize>()
                .ok()
                .and_then(|id| segments.get(id));

            match segment {
                Some(segment) if referenced.insert(segment.id) => math_element(segment),
                _ => String::new(),
            }
        })
        .into_owned();

    let segments = segments
        .into_iter()
        .filter(|segment| referenced.contains(&segment.id))
        .collect();

    (body, segments)
}

/// Inert element a typesetter later renders in place
pub fn math_element(segment: &MathSegment) -> String {
    let class = if segment.display_mode {
        "math math-display"
    } else {
        MATH_CLASS
    };

    format!(
        "<span class=\"{}\" data-math-id=\"{}\" data-display=\"{}\" data-formula=\"{}\"></span>",
        class,
        segment.id,
        segment.display_mode,
        escape_attribute(&segment.formula)
    )
}
