/*!
 * Dictionary facade.
 *
 * The operations an outer layer (HTTP handler, CLI, UI) calls into:
 * listing and searching terms, exact lookup, rendering a definition and
 * building an audio plan, plus `resolve_detail` which combines them into
 * the detail view for one term.
 */

use log::debug;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::audio::{build_audio_plan, PlaybackPlan};
use crate::database::{RepositoryContext, SchemaBinding, SchemaOverride, TermRecord, TermRepository};
use crate::errors::{AppError, RepositoryError};
use crate::rendering::{escape_html, ContentRenderer, RenderPlan};

/// Result of a listing or search
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermList {
    pub items: Vec<String>,
}

/// Writing direction of a term
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextDirection {
    #[default]
    Ltr,
    Rtl,
}

impl TextDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ltr => "ltr",
            Self::Rtl => "rtl",
        }
    }

    /// Direction of the first strongly directional character
    pub fn detect(text: &str) -> Self {
        text.chars()
            .find_map(|c| {
                if is_rtl_char(c) {
                    Some(Self::Rtl)
                } else if c.is_alphabetic() {
                    Some(Self::Ltr)
                } else {
                    None
                }
            })
            .unwrap_or_default()
    }
}

fn is_rtl_char(c: char) -> bool {
    matches!(
        c as u32,
        0x0590..=0x08FF | 0xFB1D..=0xFDFF | 0xFE70..=0xFEFF | 0x10800..=0x10FFF | 0x1E800..=0x1EFFF
    )
}

/// Everything needed to display one term
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermDetail {
    /// Raw headword
    pub term: String,
    /// Headword escaped for literal display
    pub heading_html: String,
    pub direction: TextDirection,
    pub body: RenderPlan,
    pub audio: PlaybackPlan,
    pub link: Option<String>,
}

/// Read-only dictionary over a resolved schema binding
#[derive(Clone)]
pub struct Dictionary {
    repository: TermRepository,
    renderer: ContentRenderer,
}

impl Dictionary {
    pub fn new(context: RepositoryContext) -> Self {
        Self {
            repository: TermRepository::new(context),
            renderer: ContentRenderer::new(),
        }
    }

    /// Open a dictionary file, inferring the schema unless overridden
    pub fn open<P: AsRef<Path>>(db_path: P, schema_override: &SchemaOverride) -> Result<Self, AppError> {
        Ok(Self::new(RepositoryContext::open(db_path, schema_override)?))
    }

    pub fn binding(&self) -> &SchemaBinding {
        self.repository.context().binding()
    }

    /// List every term, or only those containing `query`
    pub async fn list_terms(&self, query: Option<&str>) -> Result<TermList, RepositoryError> {
        let items = self.repository.list_terms(query.unwrap_or_default()).await?;
        Ok(TermList { items })
    }

    /// Exact lookup; `None` when the term does not exist
    pub async fn get_term(&self, term: &str) -> Result<Option<TermRecord>, RepositoryError> {
        self.repository.get_term(term).await
    }

    pub fn render(&self, definition: Option<&str>) -> RenderPlan {
        self.renderer.render(definition)
    }

    pub fn build_audio_plan(&self, audio_ref: Option<&str>) -> PlaybackPlan {
        build_audio_plan(audio_ref)
    }

    /// Look up a term and prepare it for display
    pub async fn resolve_detail(&self, term: &str) -> Result<Option<TermDetail>, RepositoryError> {
        let Some(record) = self.get_term(term).await? else {
            debug!("No entry for {:?}", term);
            return Ok(None);
        };

        Ok(Some(self.detail_for(record)))
    }

    /// Build the detail view for an already fetched record
    pub fn detail_for(&self, record: TermRecord) -> TermDetail {
        TermDetail {
            heading_html: escape_html(&record.term),
            direction: TextDirection::detect(&record.term),
            body: self.render(Some(&record.definition)),
            audio: self.build_audio_plan(record.audio_ref.as_deref()),
            link: record.link_ref.filter(|link| !link.trim().is_empty()),
            term: record.term,
        }
    }
}
