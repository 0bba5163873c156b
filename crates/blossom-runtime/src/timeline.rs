//! Ordered fixed-duration phases and the time → phase mapping

/// Tolerance used when a time sits on an accumulated phase boundary
const BOUNDARY_EPS: f64 = 1e-9;

/// One timeline entry
#[derive(Debug, Clone, PartialEq)]
pub struct Phase {
    pub name: String,
    /// Duration in seconds (always > 0)
    pub duration: f64,
}

/// Where a point in time falls on the timeline
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseSample {
    pub index: usize,
    /// Progress through the phase in [0, 1]
    pub local_t: f32,
    /// Accumulated start time of the phase
    pub start: f64,
}

/// Immutable ordered list of phases
#[derive(Debug, Clone)]
pub struct Timeline {
    phases: Vec<Phase>,
    /// Accumulated end time of each phase
    ends: Vec<f64>,
}

impl Timeline {
    /// Build from phases. Callers validate durations; non-positive or
    /// non-finite durations are raised to a tiny positive value so the
    /// mapping stays total.
    pub fn new(phases: Vec<Phase>) -> Self {
        let mut ends = Vec::with_capacity(phases.len());
        let mut acc = 0.0;
        let phases: Vec<Phase> = phases
            .into_iter()
            .map(|mut p| {
                if !(p.duration.is_finite() && p.duration > 0.0) {
                    p.duration = 1e-6;
                }
                acc += p.duration;
                ends.push(acc);
                p
            })
            .collect();
        Self { phases, ends }
    }

    /// Convenience constructor with generated names
    pub fn from_durations(durations: &[f64]) -> Self {
        Self::new(
            durations
                .iter()
                .enumerate()
                .map(|(i, &duration)| Phase {
                    name: format!("phase{i}"),
                    duration,
                })
                .collect(),
        )
    }

    pub fn phases(&self) -> &[Phase] {
        &self.phases
    }

    pub fn phase_count(&self) -> usize {
        self.phases.len()
    }

    pub fn total_duration(&self) -> f64 {
        self.ends.last().copied().unwrap_or(0.0)
    }

    pub fn phase_name(&self, index: usize) -> &str {
        self.phases.get(index).map(|p| p.name.as_str()).unwrap_or("")
    }

    /// Map elapsed time to the active phase and its local progress.
    ///
    /// Total over all inputs: negative/NaN time reads as 0, time past the
    /// end clamps to the last phase at `local_t = 1`. A time on a boundary
    /// belongs to the earlier phase (`local_t = 1`).
    pub fn phase_at(&self, t: f64) -> PhaseSample {
        if self.phases.is_empty() {
            return PhaseSample {
                index: 0,
                local_t: 1.0,
                start: 0.0,
            };
        }
        let t = if t.is_finite() { t.max(0.0) } else { 0.0 };

        let mut start = 0.0;
        for (index, (phase, &end)) in self.phases.iter().zip(&self.ends).enumerate() {
            if t <= end + BOUNDARY_EPS {
                let local = ((t - start) / phase.duration).clamp(0.0, 1.0);
                return PhaseSample {
                    index,
                    local_t: local as f32,
                    start,
                };
            }
            start = end;
        }

        let last = self.phases.len() - 1;
        PhaseSample {
            index: last,
            local_t: 1.0,
            start: self.ends[last] - self.phases[last].duration,
        }
    }
}
