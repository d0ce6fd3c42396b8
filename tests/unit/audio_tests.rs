/*!
 * Tests for audio plans and sequential playback
 */

use async_trait::async_trait;
use std::sync::Mutex;
use std::time::Duration;

use lexis::audio::{build_audio_plan, AudioSequencer, AudioSink};
use lexis::PlaybackFailure;

/// Sink that records what it was asked to play and fails on missing files
struct FakeDevice {
    available: Vec<&'static str>,
    log: Mutex<Vec<String>>,
}

impl FakeDevice {
    fn with(available: Vec<&'static str>) -> Self {
        Self {
            available,
            log: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl AudioSink for FakeDevice {
    async fn play(&self, reference: &str) -> Result<(), PlaybackFailure> {
        self.log.lock().unwrap().push(reference.to_string());
        if self.available.iter().any(|a| *a == reference) {
            Ok(())
        } else {
            Err(PlaybackFailure {
                reference: reference.to_string(),
                reason: "missing resource".to_string(),
            })
        }
    }
}

#[test]
fn test_buildAudioPlan_withMultipleSpaces_shouldKeepOrder() {
    let plan = build_audio_plan(Some("a.mp3  b.mp3   c.mp3"));
    assert_eq!(plan.entries(), ["a.mp3", "b.mp3", "c.mp3"]);
}

#[test]
fn test_buildAudioPlan_withOnlyWhitespace_shouldBeEmpty() {
    assert!(build_audio_plan(Some("   ")).entries().is_empty());
}

#[tokio::test]
async fn test_sequencer_allFailing_shouldTryEachOnceAndStop() {
    let device = FakeDevice::with(vec![]);
    let plan = build_audio_plan(Some("x.mp3 y.mp3"));

    let report = AudioSequencer::new(Duration::from_millis(10)).play(&plan, &device).await;

    assert_eq!(*device.log.lock().unwrap(), vec!["x.mp3", "y.mp3"]);
    assert!(report.played.is_empty());
    assert_eq!(report.failed.len(), 2);
}

#[tokio::test]
async fn test_sequencer_withDuplicates_shouldPlayEachEntry() {
    let device = FakeDevice::with(vec!["a.mp3"]);
    let plan = build_audio_plan(Some("a.mp3 a.mp3"));

    let report = AudioSequencer::new(Duration::ZERO).play(&plan, &device).await;

    assert_eq!(report.played, vec!["a.mp3", "a.mp3"]);
}
