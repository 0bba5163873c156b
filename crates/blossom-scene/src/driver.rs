//! Frame driver and the simulation context it owns
//!
//! One `frame` call advances time, derives the phase and control scalars,
//! steps every simulation and paints the layers back to front:
//! background, rear mist, stars, flakes and motes, vignette, core glow,
//! bloom, sparks, front mist, afterglow flash.

use crate::bloom::{Bloom, BloomState};
use crate::config::SceneConfig;
use crate::glow::{self, CoreGlow, CORE_PHASE};
use crate::overlay;
use blossom_core::Vec3;
use blossom_particles::{
    Bounds, DrawContext, Flake, MistPuff, Mote, ParticleRng, ResettingPool, SparkPool, Star, StepContext,
};
use blossom_render::{Camera, Layer, Surface};
use blossom_runtime::{
    best_effort, Action, Collaborators, ControlScalars, CueSet, CurveSet, FrameClock, FrameEvent, FrameEvents,
    InputState, PhaseSample, Timeline,
};

/// Host viewport in logical pixels plus device pixel ratio
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
    pub dpr: f32,
}

impl Viewport {
    pub fn new(width: u32, height: u32, dpr: f32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
            dpr: if dpr.is_finite() && dpr > 0.0 { dpr } else { 1.0 },
        }
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.width as f32, self.height as f32)
    }

    /// Same viewport with the pixel ratio capped
    pub fn with_dpr_cap(self, dpr_max: f32) -> Self {
        Self {
            dpr: self.dpr.min(dpr_max),
            ..self
        }
    }
}

/// What happened during one frame
#[derive(Debug, Clone)]
pub struct FrameReport {
    pub time: f64,
    /// Simulation step applied (0 while paused or awaiting unlock)
    pub step: f64,
    pub phase: usize,
    pub local_t: f32,
    pub scalars: ControlScalars,
    pub bloom: BloomState,
    pub sparks_active: usize,
    /// Spark spawns dropped since the previous frame
    pub sparks_dropped: u32,
    pub paused: bool,
    pub events: FrameEvents,
}

/// Everything the simulation owns, threaded through the frame driver
pub struct SimulationContext {
    pub timeline: Timeline,
    pub curves: CurveSet,
    pub cues: CueSet,
    pub clock: FrameClock,
    pub camera: Camera,
    pub stars: ResettingPool<Star>,
    pub motes: ResettingPool<Mote>,
    pub flakes: ResettingPool<Flake>,
    pub mist: ResettingPool<MistPuff>,
    pub sparks: SparkPool,
    pub bloom: Bloom,
    pub glow: CoreGlow,
    /// Absent when the offscreen layer could not be allocated
    pub vignette: Option<Layer>,
    pub events: FrameEvents,
    pub rng: ParticleRng,
    pub viewport: Viewport,
    pub muted: bool,
    pub unlocked: bool,
    sample: PhaseSample,
    scalars: ControlScalars,
    /// Simulation steps taken; seeds draw-time jitter
    ticks: u64,
    entered: Option<usize>,
    finished: bool,
}

impl SimulationContext {
    pub fn new(config: &SceneConfig, viewport: Viewport) -> Self {
        let viewport = viewport.with_dpr_cap(config.frame.dpr_max);
        let bounds = viewport.bounds();
        let mut rng = ParticleRng::new(config.seed.seed);
        let pools = &config.pools;

        let timeline = config.timeline.timeline();
        let curves = config.timeline.curves();
        let mut clock = FrameClock::new(timeline.total_duration(), config.frame.max_dt);
        clock.set_held(config.experience.wait_for_unlock);

        let stars = ResettingPool::new(pools.stars.count(&bounds), &mut rng, &bounds);
        let mist = ResettingPool::new(pools.mist.count(&bounds), &mut rng, &bounds);
        let motes = ResettingPool::new(pools.motes.count(&bounds), &mut rng, &bounds);
        let flakes = ResettingPool::new(pools.flakes.count(&bounds), &mut rng, &bounds);
        let bloom = Bloom::new(&config.bloom, &mut rng);
        let sample = timeline.phase_at(0.0);
        let scalars = curves.evaluate(&sample);

        log::info!(
            "[scene] {}x{} @{:.2}x: {} stars, {} mist, {} motes, {} flakes, {} petals",
            viewport.width,
            viewport.height,
            viewport.dpr,
            stars.len(),
            mist.len(),
            motes.len(),
            flakes.len(),
            bloom.petals().len()
        );

        Self {
            timeline,
            curves,
            cues: CueSet::standard(),
            clock,
            camera: Camera::new(config.camera.orbit(), config.camera.lens()),
            stars,
            motes,
            flakes,
            mist,
            sparks: SparkPool::new(pools.sparks),
            bloom,
            glow: CoreGlow::default(),
            vignette: best_effort("vignette", overlay::build_vignette(viewport.width, viewport.height, viewport.dpr)),
            events: FrameEvents::new(),
            rng,
            viewport,
            muted: config.audio.muted,
            unlocked: false,
            sample,
            scalars,
            ticks: 0,
            entered: None,
            finished: false,
        }
    }

    pub fn sample(&self) -> PhaseSample {
        self.sample
    }

    pub fn scalars(&self) -> ControlScalars {
        self.scalars
    }

    fn last_phase(&self) -> usize {
        self.timeline.phase_count().saturating_sub(1)
    }

    /// Phase transitions, cues and the end of the timeline
    fn track_progress(&mut self, config: &SceneConfig) {
        let index = self.sample.index;
        if self.entered != Some(index) {
            self.entered = Some(index);
            let name = self.timeline.phase_name(index).to_string();
            log::info!("[timeline] phase {index} '{name}' at {:.2}s", self.clock.time);
            self.events.push(FrameEvent::PhaseEntered { index, name });
        }

        for cue in self.cues.observe(&self.scalars) {
            log::debug!("[timeline] cue {cue:?} at {:.2}s", self.clock.time);
            self.events.push(FrameEvent::Cue(cue));
        }

        if !self.finished && self.clock.is_finished() {
            self.finished = true;
            log::info!("[timeline] finished after {:.2}s", self.clock.time);
            self.events.push(FrameEvent::TimelineFinished);
            if config.experience.navigate_on_finish {
                self.events
                    .push(FrameEvent::NavigateRequested(config.experience.next_screen.clone()));
            }
        }
    }

    fn step(&mut self, dt: f32, config: &SceneConfig) {
        self.ticks += 1;
        let s = self.scalars;
        let bounds = self.viewport.bounds();
        let ctx = StepContext { dt, scalars: s, bounds };

        self.camera.orbit.auto_rotate_step(dt);
        self.camera
            .advance_spin(dt, s.swirl, config.camera.spin_min, config.camera.spin_max);

        self.mist.update(&ctx, &mut self.rng);
        self.stars.update(&ctx, &mut self.rng);
        self.motes.update(&ctx, &mut self.rng);
        self.flakes.update(&ctx, &mut self.rng);

        let growth = glow::core_growth(self.sample.index, self.sample.local_t);
        self.glow.update(dt, &s, growth, bounds.min_side());

        let active = self.sample.index >= config.timeline.bloom_phase;
        self.bloom
            .update(dt, s.bloom, active, &mut self.sparks, &mut self.rng);
        self.sparks.update(dt);
    }

    fn draw(&self, surface: &mut dyn Surface, config: &SceneConfig) {
        let s = self.scalars;
        let phase = self.sample.index;
        let origin = self.viewport.bounds().center();
        let ctx = DrawContext::new(self.camera.projector(), origin, s);
        let mut rng = ParticleRng::for_tick(config.seed.seed, self.ticks);

        overlay::draw_background(surface);
        self.mist.draw(&ctx.with_fog(s.fog * 0.5), surface, &mut rng);
        self.stars.draw(&ctx, surface, &mut rng);
        self.flakes.draw(&ctx, surface, &mut rng);
        self.motes.draw(&ctx, surface, &mut rng);
        if let Some(vignette) = &self.vignette {
            surface.draw_layer(vignette);
        }

        let core = ctx.project(Vec3::ZERO);
        let center = (core.x, core.y);
        let fade = glow::glow_fade(phase, self.last_phase(), s.afterglow);
        if phase >= CORE_PHASE {
            self.glow.draw(surface, center, glow::phase_glow(phase) * fade);
        }

        if self.bloom.state() != BloomState::Dormant {
            self.bloom.draw(&ctx, surface, &mut rng, fade);
            glow::draw_stamens(
                surface,
                center,
                self.glow.radius * 1.15,
                self.bloom.progress(),
                fade,
                config.bloom.stamens,
                &mut rng,
            );
            glow::draw_heart(surface, center, self.glow.radius, fade);
        }

        self.sparks.draw(&ctx, surface);
        self.mist.draw(&ctx, surface, &mut rng);

        if phase == self.last_phase() {
            overlay::draw_flash(surface, s.afterglow);
        }
    }
}

/// Drives one simulation context from host frames and input
pub struct FrameDriver {
    config: SceneConfig,
    ctx: SimulationContext,
}

impl FrameDriver {
    pub fn new(config: SceneConfig, viewport: Viewport) -> Self {
        let ctx = SimulationContext::new(&config, viewport);
        Self { config, ctx }
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn context(&self) -> &SimulationContext {
        &self.ctx
    }

    pub fn context_mut(&mut self) -> &mut SimulationContext {
        &mut self.ctx
    }

    /// Viewport with the pixel ratio cap applied; size rasters from this
    pub fn viewport(&self) -> Viewport {
        self.ctx.viewport
    }

    pub fn is_unlocked(&self) -> bool {
        self.ctx.unlocked
    }

    pub fn is_paused(&self) -> bool {
        self.ctx.clock.is_paused()
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.ctx.clock.set_paused(paused);
    }

    pub fn is_muted(&self) -> bool {
        self.ctx.muted
    }

    /// Re-seed pool counts and rebuild the vignette for a new viewport
    pub fn resize(&mut self, viewport: Viewport) {
        let viewport = viewport.with_dpr_cap(self.config.frame.dpr_max);
        if viewport == self.ctx.viewport {
            return;
        }
        let ctx = &mut self.ctx;
        let bounds = viewport.bounds();
        let pools = &self.config.pools;
        ctx.viewport = viewport;
        ctx.stars.reseed(pools.stars.count(&bounds), &mut ctx.rng, &bounds);
        ctx.mist.reseed(pools.mist.count(&bounds), &mut ctx.rng, &bounds);
        ctx.motes.reseed(pools.motes.count(&bounds), &mut ctx.rng, &bounds);
        ctx.flakes.reseed(pools.flakes.count(&bounds), &mut ctx.rng, &bounds);
        ctx.vignette = best_effort("vignette", overlay::build_vignette(viewport.width, viewport.height, viewport.dpr));
        log::info!(
            "[particles] re-seeded for {}x{}: {} stars, {} mist, {} motes, {} flakes",
            viewport.width,
            viewport.height,
            ctx.stars.len(),
            ctx.mist.len(),
            ctx.motes.len(),
            ctx.flakes.len()
        );
    }

    /// Release the timeline and start the audio (first user gesture)
    pub fn unlock(&mut self, host: &mut Collaborators) {
        if self.ctx.unlocked {
            return;
        }
        self.ctx.unlocked = true;
        self.ctx.clock.set_held(false);
        log::info!("[scene] unlocked");
        best_effort("fullscreen", host.fullscreen.request_fullscreen());
        best_effort("audio volume", host.audio.set_volume(self.config.audio.volume));
        best_effort("audio mute", host.audio.set_muted(self.ctx.muted));
        best_effort("audio play", host.audio.play());
    }

    /// Start a new run from t = 0 with re-armed cues and a fresh bloom
    pub fn restart(&mut self) {
        let ctx = &mut self.ctx;
        let paused = ctx.clock.is_paused();
        ctx.clock = FrameClock::new(ctx.timeline.total_duration(), self.config.frame.max_dt);
        ctx.clock.set_paused(paused);
        ctx.clock.set_held(!ctx.unlocked);
        ctx.cues.reset();
        ctx.sparks.clear();
        ctx.bloom.rebuild(&self.config.bloom, &mut ctx.rng);
        ctx.glow = CoreGlow::default();
        ctx.entered = None;
        ctx.finished = false;
        log::info!("[scene] restarted");
    }

    /// Apply this frame's accumulated input
    pub fn apply_input(&mut self, input: &InputState, host: &mut Collaborators) {
        let unlocking = !self.ctx.unlocked && input.gesture_this_frame();
        if unlocking {
            self.unlock(host);
        }

        let orbit = &mut self.ctx.camera.orbit;
        orbit.dragging = input.is_dragging();
        let (dx, dy) = input.drag_delta();
        if dx != 0.0 || dy != 0.0 {
            orbit.drag_by(dx as f32, dy as f32);
        }
        if input.wheel_steps() != 0 {
            orbit.wheel(input.wheel_steps());
        }
        let pinch = input.pinch_ratio();
        if (pinch - 1.0).abs() > f64::EPSILON {
            orbit.pinch(pinch as f32);
        }

        // The unlocking gesture is consumed
        if unlocking {
            return;
        }
        for action in input.actions_just_pressed() {
            self.apply_action(action, host);
        }
    }

    fn apply_action(&mut self, action: Action, host: &mut Collaborators) {
        match action {
            Action::Unlock => self.unlock(host),
            Action::Pause => {
                let paused = self.ctx.clock.toggle_pause();
                log::info!("[scene] {}", if paused { "paused" } else { "resumed" });
            }
            Action::Mute => {
                self.ctx.muted = !self.ctx.muted;
                log::info!("[audio] {}", if self.ctx.muted { "muted" } else { "unmuted" });
                best_effort("audio mute", host.audio.set_muted(self.ctx.muted));
            }
            Action::AutoRotate => {
                let orbit = &mut self.ctx.camera.orbit;
                orbit.auto_rotate = !orbit.auto_rotate;
                log::info!("[scene] auto-rotate {}", if orbit.auto_rotate { "on" } else { "off" });
            }
            Action::Fullscreen => {
                best_effort("fullscreen", host.fullscreen.request_fullscreen());
            }
            Action::Back => {
                let target = self.config.experience.back_screen.clone();
                self.ctx.events.push(FrameEvent::NavigateRequested(target));
            }
        }
    }

    /// Advance by a host delta and paint one frame; never fails
    pub fn frame(&mut self, host_dt: f64, surface: &mut dyn Surface, host: &mut Collaborators) -> FrameReport {
        if !self.ctx.unlocked && !self.config.experience.wait_for_unlock {
            self.unlock(host);
        }

        let ctx = &mut self.ctx;
        let step = ctx.clock.advance(host_dt);
        ctx.sample = ctx.timeline.phase_at(ctx.clock.time);
        ctx.scalars = ctx.curves.evaluate(&ctx.sample);
        ctx.track_progress(&self.config);

        if step > 0.0 {
            ctx.step(step as f32, &self.config);
        }
        ctx.draw(surface, &self.config);

        let events = ctx.events.take();
        for cue in events.cues() {
            best_effort("cue sound", host.audio.play_cue(cue));
        }
        for target in events.navigation() {
            best_effort("navigation", host.navigator.navigate(target));
        }

        FrameReport {
            time: ctx.clock.time,
            step,
            phase: ctx.sample.index,
            local_t: ctx.sample.local_t,
            scalars: ctx.scalars,
            bloom: ctx.bloom.state(),
            sparks_active: ctx.sparks.active_count(),
            sparks_dropped: ctx.sparks.take_frame_drops(),
            paused: ctx.clock.is_paused(),
            events,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blossom_core::{Color, Result};
    use blossom_render::{Paint, Path, Raster};
    use blossom_runtime::host::{LogNavigator, NoFullscreen};
    use blossom_runtime::{AudioHandle, Cue};
    use winit::keyboard::KeyCode;

    const DT: f64 = 1.0 / 30.0;

    #[derive(Default)]
    struct RecordingAudio {
        calls: Vec<String>,
    }

    impl AudioHandle for RecordingAudio {
        fn play(&mut self) -> Result<()> {
            self.calls.push("play".into());
            Ok(())
        }
        fn pause(&mut self) -> Result<()> {
            self.calls.push("pause".into());
            Ok(())
        }
        fn set_volume(&mut self, volume: f64) -> Result<()> {
            self.calls.push(format!("volume {volume}"));
            Ok(())
        }
        fn set_muted(&mut self, muted: bool) -> Result<()> {
            self.calls.push(format!("muted {muted}"));
            Ok(())
        }
        fn play_cue(&mut self, cue: Cue) -> Result<()> {
            self.calls.push(format!("cue {cue:?}"));
            Ok(())
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Op {
        Clear,
        Rect,
        Circle,
        Ellipse,
        Line,
        FillPath,
        StrokePath,
        Layer,
    }

    /// Surface that records primitive kinds instead of painting
    struct Recorder {
        ops: Vec<Op>,
    }

    impl Recorder {
        fn new() -> Self {
            Self { ops: Vec::new() }
        }
    }

    impl Surface for Recorder {
        fn width(&self) -> f32 {
            320.0
        }
        fn height(&self) -> f32 {
            180.0
        }
        fn clear(&mut self, _color: Color) {
            self.ops.push(Op::Clear);
        }
        fn fill_rect(&mut self, _x: f32, _y: f32, _w: f32, _h: f32, _paint: &Paint) {
            self.ops.push(Op::Rect);
        }
        fn fill_circle(&mut self, _cx: f32, _cy: f32, _r: f32, _paint: &Paint) {
            self.ops.push(Op::Circle);
        }
        fn fill_ellipse(&mut self, _cx: f32, _cy: f32, _rx: f32, _ry: f32, _rot: f32, _color: Color) {
            self.ops.push(Op::Ellipse);
        }
        fn stroke_line(&mut self, _x0: f32, _y0: f32, _x1: f32, _y1: f32, _w: f32, _color: Color) {
            self.ops.push(Op::Line);
        }
        fn fill_path(&mut self, _path: &Path, _paint: &Paint) {
            self.ops.push(Op::FillPath);
        }
        fn stroke_path(&mut self, _path: &Path, _width: f32, _color: Color) {
            self.ops.push(Op::StrokePath);
        }
        fn draw_layer(&mut self, _layer: &Layer) {
            self.ops.push(Op::Layer);
        }
    }

    struct Host {
        audio: RecordingAudio,
        fullscreen: NoFullscreen,
        navigator: LogNavigator,
    }

    impl Host {
        fn new() -> Self {
            Self {
                audio: RecordingAudio::default(),
                fullscreen: NoFullscreen,
                navigator: LogNavigator::default(),
            }
        }

        fn collaborators(&mut self) -> Collaborators<'_> {
            Collaborators::new(&mut self.audio, &mut self.fullscreen, &mut self.navigator)
        }
    }

    fn driver(unlocked: bool) -> FrameDriver {
        let mut config = SceneConfig::default();
        config.experience.wait_for_unlock = !unlocked;
        FrameDriver::new(config, Viewport::new(320, 180, 1.0))
    }

    fn run(driver: &mut FrameDriver, host: &mut Host, frames: usize) -> Vec<FrameReport> {
        let mut surface = Recorder::new();
        (0..frames)
            .map(|_| driver.frame(DT, &mut surface, &mut host.collaborators()))
            .collect()
    }

    fn mote_ages(driver: &FrameDriver) -> Vec<f32> {
        driver.context().motes.iter().map(|m| m.age).collect()
    }

    #[test]
    fn holds_time_until_unlocked() {
        let mut d = driver(false);
        let mut host = Host::new();
        let reports = run(&mut d, &mut host, 10);
        assert!(reports.iter().all(|r| r.time == 0.0 && r.step == 0.0));
        assert!(host.audio.calls.is_empty());

        let mut input = InputState::new();
        input.process_pointer_down(10.0, 10.0);
        d.apply_input(&input, &mut host.collaborators());
        assert!(d.is_unlocked());
        assert_eq!(host.audio.calls, vec!["volume 0.55", "muted false", "play"]);

        let report = run(&mut d, &mut host, 1).remove(0);
        assert!((report.time - DT).abs() < 1e-9);
    }

    #[test]
    fn pause_freezes_phase_and_ages() {
        let mut d = driver(true);
        let mut host = Host::new();
        let before = run(&mut d, &mut host, 150).pop().unwrap();
        assert!((before.time - 5.0).abs() < 1e-6);
        assert_eq!(before.phase, 1);

        d.set_paused(true);
        let ages = mote_ages(&d);
        let yaw = d.context().camera.orbit.yaw;
        let sparks = d.context().sparks.active_count();

        // Two seconds of host time while paused
        let reports = run(&mut d, &mut host, 60);
        for r in &reports {
            assert_eq!(r.time, before.time);
            assert_eq!(r.phase, before.phase);
            assert_eq!(r.local_t, before.local_t);
            assert_eq!(r.step, 0.0);
            assert!(r.paused);
        }
        assert_eq!(mote_ages(&d), ages);
        assert_eq!(d.context().camera.orbit.yaw, yaw);
        assert_eq!(d.context().sparks.active_count(), sparks);
    }

    #[test]
    fn frozen_frame_renders_identically() {
        let mut d = driver(true);
        let mut host = Host::new();
        run(&mut d, &mut host, 45);
        d.set_paused(true);

        let mut a = Raster::new(320, 180, 1.0).unwrap();
        let mut b = Raster::new(320, 180, 1.0).unwrap();
        d.frame(DT, &mut a, &mut host.collaborators());
        d.frame(DT, &mut b, &mut host.collaborators());
        assert!(a.to_image() == b.to_image());
    }

    #[test]
    fn spark_pool_never_exceeds_capacity() {
        let mut d = driver(true);
        let mut host = Host::new();
        d.set_paused(true);
        {
            let ctx = d.context_mut();
            for _ in 0..400 {
                ctx.sparks.spawn(Vec3::new(0.0, 0.0, 100.0), &mut ctx.rng);
            }
        }
        let report = run(&mut d, &mut host, 1).remove(0);
        assert_eq!(report.sparks_active, 260);
        assert_eq!(report.sparks_dropped, 140);
        assert_eq!(d.context().sparks.capacity(), 260);
    }

    #[test]
    fn full_run_emits_each_event_once() {
        let mut config = SceneConfig::default();
        config.experience.wait_for_unlock = false;
        config.experience.navigate_on_finish = true;
        let mut d = FrameDriver::new(config, Viewport::new(320, 180, 1.0));
        let mut host = Host::new();

        let frames = (28.9 / DT) as usize + 30;
        let events: Vec<FrameEvent> = run(&mut d, &mut host, frames)
            .into_iter()
            .flat_map(|r| r.events)
            .collect();

        let phases: Vec<usize> = events
            .iter()
            .filter_map(|e| match e {
                FrameEvent::PhaseEntered { index, .. } => Some(*index),
                _ => None,
            })
            .collect();
        assert_eq!(phases, vec![0, 1, 2, 3, 4, 5]);

        for cue in [Cue::Whoosh, Cue::BloomBegins, Cue::Sparkle] {
            assert_eq!(events.iter().filter(|e| **e == FrameEvent::Cue(cue)).count(), 1, "{cue:?}");
        }
        assert_eq!(events.iter().filter(|e| **e == FrameEvent::TimelineFinished).count(), 1);
        assert_eq!(host.navigator.visited, vec!["next".to_string()]);
        assert_eq!(host.audio.calls.iter().filter(|c| c.starts_with("cue")).count(), 3);
        assert_eq!(d.context().bloom.state(), BloomState::Open);

        for pool_len in [d.context().stars.len(), d.context().motes.len()] {
            assert!(pool_len > 0);
        }
        assert!(d.context().motes.iter().all(|m| m.age >= 0.0 && m.age < m.life));
    }

    #[test]
    fn layers_paint_in_order() {
        let mut d = driver(true);
        let mut host = Host::new();
        // Into the afterglow phase
        run(&mut d, &mut host, (26.0 / DT) as usize);

        let mut surface = Recorder::new();
        let report = d.frame(DT, &mut surface, &mut host.collaborators());
        assert_eq!(report.phase, 5);
        let ops = &surface.ops;
        assert_eq!(ops[0], Op::Clear);
        assert_eq!(ops.iter().filter(|o| **o == Op::Layer).count(), 1);
        let layer_at = ops.iter().position(|o| *o == Op::Layer).unwrap();
        assert!(ops[..layer_at].iter().all(|o| *o != Op::FillPath));
        assert!(ops[layer_at..].iter().all(|o| *o != Op::Ellipse));
        assert!(ops[layer_at..].contains(&Op::FillPath));
        assert_eq!(*ops.last().unwrap(), Op::Rect);
    }

    #[test]
    fn keyboard_actions_reach_collaborators() {
        let mut d = driver(true);
        let mut host = Host::new();
        run(&mut d, &mut host, 1);

        let mut input = InputState::new();
        input.process_key_down(KeyCode::Space);
        input.process_key_down(KeyCode::KeyM);
        input.process_key_down(KeyCode::Escape);
        d.apply_input(&input, &mut host.collaborators());
        assert!(d.is_paused());
        assert!(d.is_muted());
        assert!(host.audio.calls.contains(&"muted true".to_string()));

        let report = run(&mut d, &mut host, 1).remove(0);
        assert!(report.events.contains(&FrameEvent::NavigateRequested("back".into())));
        assert_eq!(host.navigator.visited, vec!["back".to_string()]);
    }

    #[test]
    fn pointer_input_moves_the_orbit() {
        let mut d = driver(true);
        let mut host = Host::new();
        let pitch = d.context().camera.orbit.pitch;

        let mut input = InputState::new();
        input.process_pointer_down(100.0, 100.0);
        input.process_pointer_move(100.0, 150.0);
        input.process_wheel(1.0);
        d.apply_input(&input, &mut host.collaborators());

        let orbit = &d.context().camera.orbit;
        assert!(orbit.dragging);
        assert!((orbit.pitch - (pitch + 50.0 * 0.004)).abs() < 1e-5);
        assert!((orbit.zoom - 1.06).abs() < 1e-5);
    }

    #[test]
    fn resize_reseeds_pools() {
        let mut d = driver(true);
        assert_eq!(d.context().stars.len(), 560);
        d.resize(Viewport::new(1920, 1080, 3.0));
        assert_eq!(d.context().stars.len(), 1200);
        assert_eq!(d.context().mist.len(), 22);
        assert_eq!(d.viewport().dpr, 2.0);
        assert_eq!(d.context().vignette.as_ref().map(Layer::device_size), Some((3840, 2160)));
    }

    #[test]
    fn restart_rearms_cues() {
        let mut d = driver(true);
        let mut host = Host::new();
        let first: usize = run(&mut d, &mut host, 420)
            .iter()
            .map(|r| r.events.cues().count())
            .sum();
        assert_eq!(first, 1);

        d.restart();
        assert_eq!(d.context().bloom.state(), BloomState::Dormant);
        let second: usize = run(&mut d, &mut host, 420)
            .iter()
            .map(|r| r.events.cues().count())
            .sum();
        assert_eq!(second, 1);
    }
}
