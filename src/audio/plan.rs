/*!
 * Playback plans built from raw audio reference strings.
 */

use serde::{Deserialize, Serialize};

/// Ordered audio references to attempt one after another
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlaybackPlan {
    entries: Vec<String>,
}

impl PlaybackPlan {
    /// Split a reference string on whitespace runs, keeping order
    pub fn from_reference(audio_ref: Option<&str>) -> Self {
        let entries = audio_ref
            .map(|raw| raw.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default();
        Self { entries }
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Build the playback plan for a term's audio reference
pub fn build_audio_plan(audio_ref: Option<&str>) -> PlaybackPlan {
    PlaybackPlan::from_reference(audio_ref)
}
