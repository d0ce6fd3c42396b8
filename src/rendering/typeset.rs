/*!
 * Typesetting seam for math elements.
 *
 * A typesetter renders one formula at a time. When it fails, only that
 * formula degrades to its escaped source text; the rest of the document
 * is unaffected.
 */

use log::warn;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use super::escape::escape_html;
use super::plan::RenderPlan;
use crate::errors::TypesetError;

/// Matches elements produced by `plan::math_element`
static MATH_ELEMENT_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"<span class="math[^"]*" data-math-id="(\d+)"[^>]*></span>"#)
        .expect("Invalid math element regex")
});

/// Renders a formula to markup
pub trait MathTypesetter {
    /// Render `formula`, as a centered block when `display_mode` is set
    fn typeset(&self, formula: &str, display_mode: bool) -> Result<String, TypesetError>;
}

/// Final markup plus any formulas that fell back to source text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypesetOutput {
    pub html: String,
    pub degraded: Vec<TypesetError>,
}

/// Typesetter that shows TeX source in a code element
#[derive(Debug, Clone, Copy, Default)]
pub struct SourceTypesetter;

impl MathTypesetter for SourceTypesetter {
    fn typeset(&self, formula: &str, display_mode: bool) -> Result<String, TypesetError> {
        let (open, close) = if display_mode { ("$$", "$$") } else { ("$", "$") };
        Ok(format!(
            "<code class=\"tex\">{}{}{}</code>",
            open,
            escape_html(formula),
            close
        ))
    }
}

/// Fallback markup for a formula that could not be typeset
pub fn fallback_markup(formula: &str) -> String {
    format!("<span class=\"math-fallback\">{}</span>", escape_html(formula))
}

/// Replace every math element of `plan` with typeset markup
pub fn typeset_plan(plan: &RenderPlan, typesetter: &dyn MathTypesetter) -> TypesetOutput {
    let mut degraded = Vec::new();

    let html = MATH_ELEMENT_REGEX
        .replace_all(&plan.html_body, |caps: &Captures| {
            let segment = caps[1]
                .parse::<usize>()
                .ok()
                .and_then(|id| plan.math_segments.iter().find(|s| s.id == id));

            let Some(segment) = segment else {
                return String::new();
            };

            match typesetter.typeset(&segment.formula, segment.display_mode) {
                Ok(markup) => markup,
                Err(e) => {
                    warn!("Math rendering degraded: {}", e);
                    degraded.push(e);
                    fallback_markup(&segment.formula)
                }
            }
        })
        .into_owned();

    TypesetOutput { html, degraded }
}
