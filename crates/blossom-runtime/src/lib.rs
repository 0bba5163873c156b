//! Blossom Runtime - Frame loop infrastructure
//!
//! Provides the building blocks the frame driver consumes each refresh:
//! - `FrameClock`: clamped frame delta and pausable simulation time
//! - `Timeline`: ordered fixed-duration phases, time → (phase, local progress)
//! - `CurveSet` / `CueSet`: eased control scalars and one-shot threshold cues
//! - `InputState`: pointer, wheel, pinch and keyboard tracking with action bindings
//! - `FrameEvent` / `FrameEvents`: the ordered events of one frame
//! - `host`: best-effort collaborator traits (audio, fullscreen, navigation)

mod clock;
pub mod curves;
mod event;
pub mod host;
mod input;
mod timeline;

pub use clock::FrameClock;
pub use curves::{ControlScalars, Cue, CueLatch, CueSet, CurveSegment, CurveSet, Scalar};
pub use event::{FrameEvent, FrameEvents};
pub use host::{best_effort, AudioHandle, Collaborators, Fullscreen, Navigator};
pub use input::{Action, InputState};
pub use timeline::{Phase, PhaseSample, Timeline};
