/*!
 * Audio playback planning and sequencing.
 */

pub mod plan;
pub mod sequencer;

pub use plan::{build_audio_plan, PlaybackPlan};
pub use sequencer::{
    AudioSequencer, AudioSink, CommandSink, PlaybackAction, PlaybackEvent, PlaybackMachine,
    PlaybackReport, PlaybackState, DEFAULT_ENTRY_GAP,
};
