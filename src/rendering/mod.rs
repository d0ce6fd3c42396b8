/*!
 * Content rendering for definitions.
 *
 * - `math`: formula extraction into placeholders
 * - `markdown`: line-break-sensitive markdown to safe HTML
 * - `plan`: restoration of placeholders into inert math elements
 * - `escape`: text and attribute escaping
 * - `typeset`: typesetter seam with per-formula fallback
 */

pub mod escape;
pub mod markdown;
pub mod math;
pub mod plan;
pub mod typeset;

pub use escape::{escape_attribute, escape_html, is_script_url};
pub use math::MathSegment;
pub use plan::{ContentRenderer, RenderPlan, NO_DEFINITION_HTML};
pub use typeset::{typeset_plan, MathTypesetter, SourceTypesetter, TypesetOutput};
