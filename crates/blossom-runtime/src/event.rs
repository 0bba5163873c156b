//! Events raised by the frame driver during a frame

use crate::curves::Cue;

/// Something that happened during a frame, for collaborators to react to
#[derive(Debug, Clone, PartialEq)]
pub enum FrameEvent {
    /// The timeline moved into a new phase
    PhaseEntered { index: usize, name: String },
    /// A threshold cue fired
    Cue(Cue),
    /// Simulation time reached the end of the timeline
    TimelineFinished,
    /// The user asked to leave (back binding)
    NavigateRequested(String),
}

/// Events of one frame, in the order they were raised
///
/// The driver collects into a batch while stepping, then hands the whole
/// batch to the frame report with `take`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameEvents {
    events: Vec<FrameEvent>,
}

impl FrameEvents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: FrameEvent) {
        self.events.push(event);
    }

    /// Move the batch out, leaving this one empty for the next frame
    pub fn take(&mut self) -> FrameEvents {
        std::mem::take(self)
    }

    /// Cues in firing order
    pub fn cues(&self) -> impl Iterator<Item = Cue> + '_ {
        self.events.iter().filter_map(|e| match e {
            FrameEvent::Cue(cue) => Some(*cue),
            _ => None,
        })
    }

    /// Screens requested this frame, oldest first
    pub fn navigation(&self) -> impl Iterator<Item = &str> + '_ {
        self.events.iter().filter_map(|e| match e {
            FrameEvent::NavigateRequested(target) => Some(target.as_str()),
            _ => None,
        })
    }

    /// Phase indices entered this frame
    pub fn phases_entered(&self) -> impl Iterator<Item = usize> + '_ {
        self.events.iter().filter_map(|e| match e {
            FrameEvent::PhaseEntered { index, .. } => Some(*index),
            _ => None,
        })
    }

    pub fn finished(&self) -> bool {
        self.events.contains(&FrameEvent::TimelineFinished)
    }

    pub fn contains(&self, event: &FrameEvent) -> bool {
        self.events.contains(event)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FrameEvent> {
        self.events.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl IntoIterator for FrameEvents {
    type Item = FrameEvent;
    type IntoIter = std::vec::IntoIter<FrameEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.into_iter()
    }
}

impl<'a> IntoIterator for &'a FrameEvents {
    type Item = &'a FrameEvent;
    type IntoIter = std::slice::Iter<'a, FrameEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}
