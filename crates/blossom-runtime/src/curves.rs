//! Per-phase control scalars and threshold cues
//!
//! Each curve segment stores only its easing and its END values. The start
//! of segment `i` is the end of segment `i - 1` (or the initial scalars), so
//! adjacent phases can never disagree at a boundary.

use crate::timeline::{PhaseSample, Timeline};
use blossom_core::math::lerp;
use blossom_core::Easing;
use serde::{Deserialize, Serialize};

/// The named values that parameterize every simulation for one frame
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlScalars {
    /// Orbital swirl intensity, 0..1
    pub swirl: f32,
    /// Inward pull toward the axis
    pub pull: f32,
    /// Angular velocity (rad/s)
    pub omega: f32,
    /// Fog / mist density, 0..1
    pub fog: f32,
    /// Bloom opening progress, 0..1
    pub bloom: f32,
    /// Afterglow fade progress, 0..1
    pub afterglow: f32,
}

/// Selector for one field of `ControlScalars`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scalar {
    Swirl,
    Pull,
    Omega,
    Fog,
    Bloom,
    Afterglow,
}

impl ControlScalars {
    pub fn lerp(&self, other: &Self, t: f32) -> Self {
        Self {
            swirl: lerp(self.swirl, other.swirl, t),
            pull: lerp(self.pull, other.pull, t),
            omega: lerp(self.omega, other.omega, t),
            fog: lerp(self.fog, other.fog, t),
            bloom: lerp(self.bloom, other.bloom, t),
            afterglow: lerp(self.afterglow, other.afterglow, t),
        }
    }

    pub fn get(&self, scalar: Scalar) -> f32 {
        match scalar {
            Scalar::Swirl => self.swirl,
            Scalar::Pull => self.pull,
            Scalar::Omega => self.omega,
            Scalar::Fog => self.fog,
            Scalar::Bloom => self.bloom,
            Scalar::Afterglow => self.afterglow,
        }
    }

    /// Largest absolute per-field difference
    pub fn max_abs_diff(&self, other: &Self) -> f32 {
        [
            self.swirl - other.swirl,
            self.pull - other.pull,
            self.omega - other.omega,
            self.fog - other.fog,
            self.bloom - other.bloom,
            self.afterglow - other.afterglow,
        ]
        .iter()
        .fold(0.0_f32, |m, d| m.max(d.abs()))
    }
}

/// One phase's curve: easing plus the values reached at `local_t = 1`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurveSegment {
    pub easing: Easing,
    pub end: ControlScalars,
}

/// Curves for every phase, chained end-to-start
#[derive(Debug, Clone)]
pub struct CurveSet {
    initial: ControlScalars,
    segments: Vec<CurveSegment>,
}

impl CurveSet {
    pub fn new(initial: ControlScalars, segments: Vec<CurveSegment>) -> Self {
        Self { initial, segments }
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Values at the start of phase `index`
    pub fn start_of(&self, index: usize) -> ControlScalars {
        match index.checked_sub(1).and_then(|i| self.segments.get(i)) {
            Some(prev) => prev.end,
            None if index == 0 => self.initial,
            None => self.segments.last().map(|s| s.end).unwrap_or(self.initial),
        }
    }

    pub fn end_of(&self, index: usize) -> ControlScalars {
        self.segments
            .get(index)
            .or_else(|| self.segments.last())
            .map(|s| s.end)
            .unwrap_or(self.initial)
    }

    pub fn evaluate(&self, sample: &PhaseSample) -> ControlScalars {
        let Some(segment) = self.segments.get(sample.index) else {
            return self.end_of(sample.index);
        };
        let start = self.start_of(sample.index);
        start.lerp(&segment.end, segment.easing.apply(sample.local_t))
    }

    pub fn evaluate_at(&self, timeline: &Timeline, t: f64) -> ControlScalars {
        self.evaluate(&timeline.phase_at(t))
    }
}

/// One-shot visual/audio cue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cue {
    Whoosh,
    Sparkle,
    BloomBegins,
}

/// Fires `cue` once when `scalar` rises through `threshold`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CueLatch {
    pub cue: Cue,
    pub scalar: Scalar,
    pub threshold: f32,
    #[serde(skip)]
    fired: bool,
}

impl CueLatch {
    pub fn new(cue: Cue, scalar: Scalar, threshold: f32) -> Self {
        Self {
            cue,
            scalar,
            threshold,
            fired: false,
        }
    }

    pub fn has_fired(&self) -> bool {
        self.fired
    }

    /// Interval test between the previous and current frame values, so a
    /// large step that jumps over the threshold still fires.
    fn observe(&mut self, prev: &ControlScalars, cur: &ControlScalars) -> bool {
        if self.fired {
            return false;
        }
        let (a, b) = (prev.get(self.scalar), cur.get(self.scalar));
        if a < self.threshold && b >= self.threshold {
            self.fired = true;
            return true;
        }
        false
    }
}

/// All latches for a run, plus the last observed scalars
#[derive(Debug, Clone, Default)]
pub struct CueSet {
    latches: Vec<CueLatch>,
    last: Option<ControlScalars>,
}

impl CueSet {
    pub fn new(latches: Vec<CueLatch>) -> Self {
        Self { latches, last: None }
    }

    /// The cues of the bloom experience
    pub fn standard() -> Self {
        Self::new(vec![
            CueLatch::new(Cue::Whoosh, Scalar::Swirl, 0.85),
            CueLatch::new(Cue::BloomBegins, Scalar::Bloom, 0.001),
            CueLatch::new(Cue::Sparkle, Scalar::Bloom, 0.25),
        ])
    }

    /// Feed this frame's scalars; returns the cues crossing now
    pub fn observe(&mut self, cur: &ControlScalars) -> Vec<Cue> {
        let prev = self.last.unwrap_or(*cur);
        self.last = Some(*cur);
        self.latches
            .iter_mut()
            .filter_map(|l| l.observe(&prev, cur).then_some(l.cue))
            .collect()
    }

    /// Re-arm every latch for a new run
    pub fn reset(&mut self) {
        self.last = None;
        for latch in &mut self.latches {
            latch.fired = false;
        }
    }

    pub fn latches(&self) -> &[CueLatch] {
        &self.latches
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scalars(swirl: f32, pull: f32, omega: f32, fog: f32, bloom: f32, afterglow: f32) -> ControlScalars {
        ControlScalars {
            swirl,
            pull,
            omega,
            fog,
            bloom,
            afterglow,
        }
    }

    fn sample_set() -> (Timeline, CurveSet) {
        let timeline = Timeline::from_durations(&[2.2, 8.4, 3.4]);
        let curves = CurveSet::new(
            scalars(0.0, 0.0, 0.22, 0.0, 0.0, 0.0),
            vec![
                CurveSegment {
                    easing: Easing::Smoothstep,
                    end: scalars(0.10, 0.0, 0.35, 0.25, 0.0, 0.0),
                },
                CurveSegment {
                    easing: Easing::EaseInOutCubic,
                    end: scalars(0.86, 0.30, 4.8, 0.58, 0.0, 0.0),
                },
                CurveSegment {
                    easing: Easing::EaseOutCubic,
                    end: scalars(1.0, 1.55, 18.5, 0.70, 0.0, 0.0),
                },
            ],
        );
        (timeline, curves)
    }

    #[test]
    fn boundaries_are_continuous() {
        let (_, curves) = sample_set();
        for i in 0..curves.len() - 1 {
            let end = curves.evaluate(&PhaseSample {
                index: i,
                local_t: 1.0,
                start: 0.0,
            });
            let next = curves.evaluate(&PhaseSample {
                index: i + 1,
                local_t: 0.0,
                start: 0.0,
            });
            assert!(end.max_abs_diff(&next) < 1e-6, "pop at boundary {i}");
        }
    }

    #[test]
    fn no_pop_across_boundary_in_time() {
        let (timeline, curves) = sample_set();
        let before = curves.evaluate_at(&timeline, 2.2 - 1e-7);
        let after = curves.evaluate_at(&timeline, 2.2 + 1e-7);
        assert!(before.max_abs_diff(&after) < 1e-4);
    }

    #[test]
    fn evaluates_midpoint_with_easing() {
        let (timeline, curves) = sample_set();
        let mid = curves.evaluate_at(&timeline, 2.2 + 4.2);
        // ease_in_out_cubic(0.5) == 0.5
        assert!((mid.swirl - 0.48).abs() < 1e-5);
        assert!((mid.omega - (0.35 + (4.8 - 0.35) * 0.5)).abs() < 1e-4);
    }

    #[test]
    fn past_last_segment_holds_final_values() {
        let (_, curves) = sample_set();
        let s = curves.evaluate(&PhaseSample {
            index: 9,
            local_t: 0.3,
            start: 0.0,
        });
        assert_eq!(s, curves.end_of(2));
    }

    #[test]
    fn cue_fires_once_per_run() {
        let mut cues = CueSet::new(vec![CueLatch::new(Cue::Whoosh, Scalar::Swirl, 0.5)]);
        assert!(cues.observe(&scalars(0.1, 0.0, 0.0, 0.0, 0.0, 0.0)).is_empty());
        assert_eq!(cues.observe(&scalars(0.6, 0.0, 0.0, 0.0, 0.0, 0.0)), vec![Cue::Whoosh]);
        // dips and rises again: latched
        cues.observe(&scalars(0.2, 0.0, 0.0, 0.0, 0.0, 0.0));
        assert!(cues.observe(&scalars(0.9, 0.0, 0.0, 0.0, 0.0, 0.0)).is_empty());

        cues.reset();
        cues.observe(&scalars(0.1, 0.0, 0.0, 0.0, 0.0, 0.0));
        assert_eq!(cues.observe(&scalars(0.7, 0.0, 0.0, 0.0, 0.0, 0.0)), vec![Cue::Whoosh]);
    }

    #[test]
    fn large_step_over_threshold_still_fires() {
        let mut cues = CueSet::new(vec![CueLatch::new(Cue::Sparkle, Scalar::Bloom, 0.25)]);
        cues.observe(&scalars(0.0, 0.0, 0.0, 0.0, 0.0, 0.0));
        assert_eq!(cues.observe(&scalars(0.0, 0.0, 0.0, 0.0, 0.9, 0.0)), vec![Cue::Sparkle]);
    }

    #[test]
    fn first_observation_never_fires() {
        let mut cues = CueSet::standard();
        assert!(cues.observe(&scalars(1.0, 0.0, 0.0, 0.0, 1.0, 0.0)).is_empty());
    }
}
