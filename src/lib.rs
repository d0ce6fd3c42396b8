/*!
 * # Lexis - browsable dictionary core
 *
 * A Rust library that serves a read-only dictionary out of an arbitrary
 * SQLite table and turns its entries into safely renderable content.
 *
 * ## Features
 *
 * - Schema inference over a table with no fixed contract, or an explicit override
 * - Alphabetical term listing and literal substring search
 * - Markdown definitions with inline and display math extracted for a typesetter
 * - Ordered, failure-tolerant audio playback plans
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `database`: Read-only store access:
 *   - `database::schema`: Schema inference and overrides
 *   - `database::repository`: Term listing, search and lookup
 * - `rendering`: Definition rendering:
 *   - `rendering::math`: Formula extraction
 *   - `rendering::markdown`: Markdown to safe HTML
 *   - `rendering::plan`: Render plans and placeholder restoration
 *   - `rendering::typeset`: Typesetter seam with per-formula fallback
 * - `audio`: Playback plans and the sequential player
 * - `dictionary`: Facade combining the above into term details
 * - `lookup`: Debounced search and last-write-wins selection
 * - `app_config`: Configuration management
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod audio;
pub mod database;
pub mod dictionary;
pub mod errors;
pub mod lookup;
pub mod rendering;

// Re-export main types for easier usage
pub use app_config::Config;
pub use audio::{build_audio_plan, AudioSequencer, PlaybackPlan};
pub use database::{SchemaBinding, SchemaOverride, TermRecord};
pub use dictionary::{Dictionary, TermDetail, TermList, TextDirection};
pub use errors::{AppError, PlaybackFailure, RepositoryError, SchemaError, TypesetError};
pub use rendering::{ContentRenderer, RenderPlan};
