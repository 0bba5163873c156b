//! Timeline inspection command

use super::load_config;
use anyhow::{Context, Result};
use blossom_core::math::Easing;
use blossom_runtime::ControlScalars;
use blossom_scene::SceneConfig;
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct PhaseRow {
    pub index: usize,
    pub name: String,
    pub start: f64,
    pub duration: f64,
    pub easing: Easing,
}

#[derive(Debug, Serialize)]
pub struct SampleRow {
    pub time: f64,
    pub phase: usize,
    pub local_t: f32,
    pub scalars: ControlScalars,
}

#[derive(Debug, Serialize)]
pub struct TimelineReport {
    pub total: f64,
    pub bloom_phase: usize,
    pub phases: Vec<PhaseRow>,
    pub samples: Vec<SampleRow>,
}

impl TimelineReport {
    /// Phase table plus `samples` evenly spaced points from 0 to the total
    pub fn build(config: &SceneConfig, samples: usize) -> Self {
        let timeline = config.timeline.timeline();
        let curves = config.timeline.curves();
        let total = timeline.total_duration();

        let mut start = 0.0;
        let phases = config
            .timeline
            .phases
            .iter()
            .enumerate()
            .map(|(index, p)| {
                let row = PhaseRow {
                    index,
                    name: p.name.clone(),
                    start,
                    duration: p.duration,
                    easing: p.easing,
                };
                start += p.duration;
                row
            })
            .collect();

        let samples = (0..samples)
            .map(|i| {
                let time = if samples > 1 {
                    total * i as f64 / (samples - 1) as f64
                } else {
                    0.0
                };
                let sample = timeline.phase_at(time);
                SampleRow {
                    time,
                    phase: sample.index,
                    local_t: sample.local_t,
                    scalars: curves.evaluate(&sample),
                }
            })
            .collect();

        Self {
            total,
            bloom_phase: config.timeline.bloom_phase,
            phases,
            samples,
        }
    }

    pub fn to_text(&self) -> String {
        let mut out = format!("Timeline: {:.2}s (bloom from phase {})\n\n", self.total, self.bloom_phase);
        out.push_str("  #  name         start   duration  easing\n");
        for p in &self.phases {
            out.push_str(&format!(
                "  {}  {:<11} {:>6.2}   {:>7.2}  {:?}\n",
                p.index, p.name, p.start, p.duration, p.easing
            ));
        }
        out.push_str("\n   time  phase  local    swirl   pull   omega    fog  bloom  afterglow\n");
        for s in &self.samples {
            let c = &s.scalars;
            out.push_str(&format!(
                "  {:>5.2}  {:>5}  {:>5.3}   {:>5.3}  {:>5.3}  {:>6.3}  {:>5.3}  {:>5.3}  {:>9.3}\n",
                s.time, s.phase, s.local_t, c.swirl, c.pull, c.omega, c.fog, c.bloom, c.afterglow
            ));
        }
        out
    }
}

pub fn run(config_path: Option<&Path>, samples: usize, format: &str) -> Result<()> {
    let config = load_config(config_path)?;
    let report = TimelineReport::build(&config, samples);
    match format {
        "json" => {
            let json = serde_json::to_string_pretty(&report).context("Failed to serialize timeline")?;
            println!("{json}");
        }
        _ => print!("{}", report.to_text()),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_covers_the_whole_run() {
        let report = TimelineReport::build(&SceneConfig::default(), 5);
        assert_eq!(report.phases.len(), 6);
        assert!((report.phases[2].start - 10.6).abs() < 1e-9);
        assert_eq!(report.samples.len(), 5);
        assert_eq!(report.samples[0].time, 0.0);
        let last = report.samples.last().unwrap();
        assert!((last.time - 28.9).abs() < 1e-9);
        assert_eq!(last.phase, 5);
        assert!((last.scalars.afterglow - 1.0).abs() < 1e-5);
    }

    #[test]
    fn single_sample_is_the_start() {
        let report = TimelineReport::build(&SceneConfig::default(), 1);
        assert_eq!(report.samples.len(), 1);
        assert_eq!(report.samples[0].phase, 0);
        assert!((report.samples[0].scalars.omega - 0.22).abs() < 1e-6);
    }

    #[test]
    fn json_names_every_scalar() {
        let report = TimelineReport::build(&SceneConfig::default(), 2);
        let json = serde_json::to_value(&report).unwrap();
        let scalars = &json["samples"][1]["scalars"];
        for key in ["swirl", "pull", "omega", "fog", "bloom", "afterglow"] {
            assert!(scalars.get(key).is_some(), "{key}");
        }
        assert_eq!(json["phases"][1]["easing"], "ease_in_out_cubic");
    }

    #[test]
    fn text_lists_phase_names() {
        let text = TimelineReport::build(&SceneConfig::default(), 3).to_text();
        for name in ["gather", "swirl", "vortex", "release", "bloom", "afterglow"] {
            assert!(text.contains(name), "{name}");
        }
    }
}
