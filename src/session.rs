//! Session state machine and frame scheduler
//!
//! The session owns the one [`GameState`] and runs it frame by frame while
//! in [`SessionPhase::Playing`]. The host (browser `requestAnimationFrame`,
//! or a test double) calls [`Session::on_frame`]; the session asks for the
//! next frame only while still playing, so at most one request is ever
//! outstanding and leaving `Playing` cancels it.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::sim::{GameState, ScoreReport, SessionConfig, TickInput, TickOutcome, tick};

/// Outer game state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Title overlay, nothing scheduled
    NotStarted,
    /// Frames running
    Playing,
    /// Clock ran out, waiting for the lead form
    Ended,
    /// Score handed to the leaderboard
    Submitted,
}

/// Display-refresh scheduling (`requestAnimationFrame` on the web)
pub trait FrameHost {
    type Handle: Copy + fmt::Debug;

    /// Ask for one callback to [`Session::on_frame`] on the next refresh
    fn request_frame(&mut self) -> Self::Handle;

    /// Drop an outstanding request
    fn cancel_frame(&mut self, handle: Self::Handle);
}

/// The page around the game: draws frames and receives pushed updates.
///
/// Everything passed out is a copy or a shared borrow for the call only.
pub trait HostSurface {
    fn render(&mut self, state: &GameState);
    fn score_changed(&mut self, score: ScoreReport);
    fn time_changed(&mut self, seconds_left: u32);
    fn phase_changed(&mut self, _phase: SessionPhase) {}
}

/// One embedded game: state machine plus frame scheduler
pub struct Session<H: FrameHost, S: HostSurface> {
    phase: SessionPhase,
    state: GameState,
    config: SessionConfig,
    input: TickInput,
    host: H,
    surface: S,
    pending: Option<H::Handle>,
    last_frame_ms: f64,
}

impl<H: FrameHost, S: HostSurface> Session<H, S> {
    pub fn new(config: SessionConfig, host: H, surface: S) -> Self {
        Self {
            phase: SessionPhase::NotStarted,
            state: GameState::new(0, config.clone()),
            config,
            input: TickInput::default(),
            host,
            surface,
            pending: None,
            last_frame_ms: 0.0,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Direct access for debugging and tests
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    /// Persistent input flags (autopilot, spawn hold)
    pub fn input_mut(&mut self) -> &mut TickInput {
        &mut self.input
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Whether a frame request is outstanding
    pub fn is_scheduled(&self) -> bool {
        self.pending.is_some()
    }

    pub fn score(&self) -> ScoreReport {
        self.state.score.report()
    }

    /// Start a run. Accepted from `NotStarted`, `Ended` and `Submitted`;
    /// a no-op while already playing.
    ///
    /// `now_ms` is the host clock at the moment of starting; the first
    /// frame's delta is measured from it.
    pub fn start(&mut self, seed: u64, now_ms: f64) -> bool {
        match self.phase {
            SessionPhase::Playing => {
                log::debug!("start ignored: already playing");
                return false;
            }
            SessionPhase::Ended | SessionPhase::Submitted => {
                self.restart();
            }
            SessionPhase::NotStarted => {}
        }

        self.cancel_pending();
        self.state = GameState::new(seed, self.config.clone());
        self.last_frame_ms = now_ms;
        self.set_phase(SessionPhase::Playing);
        self.surface.score_changed(self.state.score.report());
        self.surface.time_changed(self.state.seconds_left());
        self.pending = Some(self.host.request_frame());
        log::info!("Session started with seed {}", seed);
        true
    }

    /// Back to the title screen. Only from `Ended` or `Submitted`.
    pub fn restart(&mut self) -> bool {
        if !matches!(self.phase, SessionPhase::Ended | SessionPhase::Submitted) {
            log::debug!("restart ignored in {:?}", self.phase);
            return false;
        }
        self.cancel_pending();
        self.state = GameState::new(self.state.seed, self.config.clone());
        self.set_phase(SessionPhase::NotStarted);
        self.surface.render(&self.state);
        true
    }

    /// The lead form took the final score. Only from `Ended`.
    pub fn submit(&mut self) -> Option<ScoreReport> {
        if self.phase != SessionPhase::Ended {
            log::debug!("submit ignored in {:?}", self.phase);
            return None;
        }
        self.set_phase(SessionPhase::Submitted);
        Some(self.state.score.report())
    }

    /// Draw the current state without advancing it (title screen, reloads)
    pub fn redraw(&mut self) {
        self.surface.render(&self.state);
    }

    /// Jump command (key or tap). Ignored unless playing and grounded.
    pub fn jump(&mut self) -> bool {
        self.phase == SessionPhase::Playing && self.state.player.jump()
    }

    /// Host refresh callback
    pub fn on_frame(&mut self, timestamp_ms: f64) {
        if self.phase != SessionPhase::Playing {
            log::debug!("stale frame ignored in {:?}", self.phase);
            return;
        }
        // This callback is the request we had outstanding
        self.pending = None;

        // rAF timestamps can trail the clock read at start
        let dt = (timestamp_ms - self.last_frame_ms).max(0.0);
        self.last_frame_ms = timestamp_ms;

        match tick(&mut self.state, &self.input, dt) {
            TickOutcome::Expired => {
                log::info!(
                    "Session ended: {} customers, ${} revenue",
                    self.state.score.customers(),
                    self.state.score.revenue()
                );
                self.set_phase(SessionPhase::Ended);
            }
            TickOutcome::Stepped(report) => {
                self.surface.render(&self.state);
                self.surface.time_changed(report.seconds_left);
                self.surface.score_changed(report.score);
                self.pending = Some(self.host.request_frame());
            }
        }
    }

    /// Tear down: no callback may arrive after this.
    ///
    /// A run in progress is abandoned and the session goes back to
    /// `NotStarted`, so a remounted page can start again.
    pub fn unmount(&mut self) {
        self.cancel_pending();
        if self.phase == SessionPhase::Playing {
            log::info!("Run abandoned on unmount");
            self.state = GameState::new(self.state.seed, self.config.clone());
            self.set_phase(SessionPhase::NotStarted);
        }
    }

    fn cancel_pending(&mut self) {
        if let Some(handle) = self.pending.take() {
            self.host.cancel_frame(handle);
        }
    }

    fn set_phase(&mut self, phase: SessionPhase) {
        if phase != SessionPhase::Playing {
            self.cancel_pending();
        }
        log::info!("Session phase: {:?} -> {:?}", self.phase, phase);
        self.phase = phase;
        self.surface.phase_changed(phase);
    }
}

impl<H: FrameHost, S: HostSurface> Drop for Session<H, S> {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}

/// Host for headless runs: frames fire only when the caller pumps them
#[derive(Debug, Default)]
pub struct ManualFrameHost {
    next_handle: u32,
    /// Requests not yet fired or cancelled
    pub outstanding: Vec<u32>,
    pub cancelled: Vec<u32>,
}

impl ManualFrameHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume the oldest outstanding request, if any
    pub fn take_request(&mut self) -> Option<u32> {
        if self.outstanding.is_empty() {
            None
        } else {
            Some(self.outstanding.remove(0))
        }
    }
}

impl FrameHost for ManualFrameHost {
    type Handle = u32;

    fn request_frame(&mut self) -> u32 {
        self.next_handle += 1;
        self.outstanding.push(self.next_handle);
        self.next_handle
    }

    fn cancel_frame(&mut self, handle: u32) {
        self.outstanding.retain(|&h| h != handle);
        self.cancelled.push(handle);
    }
}

/// Pump frames at a fixed interval until the host stops asking.
///
/// Returns the number of frames delivered.
pub fn run_headless<S: HostSurface>(
    session: &mut Session<ManualFrameHost, S>,
    start_ms: f64,
    frame_ms: f64,
    max_frames: usize,
) -> usize {
    let mut now = start_ms;
    let mut frames = 0;
    while frames < max_frames && session.host.outstanding.first().is_some() {
        session.host.take_request();
        now += frame_ms;
        session.on_frame(now);
        frames += 1;
    }
    frames
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::{ActiveItem, ItemKind};
    use glam::Vec2;

    const FRAME_MS: f64 = 1000.0 / 60.0;

    #[derive(Default)]
    struct RecordingSurface {
        renders: usize,
        scores: Vec<ScoreReport>,
        times: Vec<u32>,
        phases: Vec<SessionPhase>,
    }

    impl HostSurface for RecordingSurface {
        fn render(&mut self, _state: &GameState) {
            self.renders += 1;
        }
        fn score_changed(&mut self, score: ScoreReport) {
            self.scores.push(score);
        }
        fn time_changed(&mut self, seconds_left: u32) {
            self.times.push(seconds_left);
        }
        fn phase_changed(&mut self, phase: SessionPhase) {
            self.phases.push(phase);
        }
    }

    type TestSession = Session<ManualFrameHost, RecordingSurface>;

    fn session() -> TestSession {
        Session::new(
            SessionConfig::default(),
            ManualFrameHost::new(),
            RecordingSurface::default(),
        )
    }

    /// Deliver the outstanding frame request
    fn fire(session: &mut TestSession, timestamp_ms: f64) {
        session.host.take_request();
        session.on_frame(timestamp_ms);
    }

    fn put_item_on_player(session: &mut TestSession, kind: ItemKind) {
        let state = session.state_mut();
        let id = state.next_entity_id();
        // Close enough that one frame of scrolling still overlaps
        let pos = state.player.pos - Vec2::new(20.0, 20.0);
        state.items.push(ActiveItem {
            id,
            archetype: kind.archetype(),
            pos,
            size: Vec2::new(ITEM_WIDTH, ITEM_HEIGHT),
            speed: 9.0,
        });
    }

    #[test]
    fn test_start_schedules_one_frame() {
        let mut s = session();
        assert_eq!(s.phase(), SessionPhase::NotStarted);
        assert!(!s.is_scheduled());

        assert!(s.start(1, 0.0));
        assert_eq!(s.phase(), SessionPhase::Playing);
        assert_eq!(s.host().outstanding.len(), 1);
        assert_eq!(s.surface().scores, vec![ScoreReport::default()]);
        assert_eq!(s.surface().times, vec![30]);

        // Second start while playing: no second chain
        assert!(!s.start(2, 5.0));
        assert_eq!(s.host().outstanding.len(), 1);
        assert_eq!(s.state().seed, 1);
    }

    #[test]
    fn test_frames_chain_one_at_a_time() {
        let mut s = session();
        s.start(1, 0.0);
        let frames = run_headless(&mut s, 0.0, FRAME_MS, 10);
        assert_eq!(frames, 10);
        assert_eq!(s.host().outstanding.len(), 1);
        assert_eq!(s.surface().renders, 10);
        assert_eq!(s.state().frame_count, 10);
    }

    #[test]
    fn test_jump_only_while_playing() {
        let mut s = session();
        assert!(!s.jump());
        s.start(1, 0.0);
        assert!(s.jump());
        assert!(!s.jump());
    }

    #[test]
    fn test_thirty_seconds_without_spawns() {
        let mut s = session();
        s.input_mut().hold_spawns = true;
        s.start(1, 0.0);
        run_headless(&mut s, 0.0, FRAME_MS, 10_000);

        assert_eq!(s.phase(), SessionPhase::Ended);
        assert_eq!(s.score(), ScoreReport { revenue: 0, customers: 0 });
        assert!(!s.is_scheduled());
        assert!(s.host().outstanding.is_empty());
        assert_eq!(s.surface().times.last(), Some(&0));
        // ~1800 frames at 60 Hz
        let frames = s.state().frame_count;
        assert!((1795..=1805).contains(&frames), "frames {frames}");
    }

    #[test]
    fn test_single_positive_catch_reports_score() {
        let mut s = session();
        s.input_mut().hold_spawns = true;
        s.start(1, 0.0);
        put_item_on_player(&mut s, ItemKind::Seo);
        fire(&mut s, FRAME_MS);
        assert_eq!(
            s.surface().scores.last(),
            Some(&ScoreReport {
                revenue: 37_500,
                customers: 25
            })
        );
    }

    #[test]
    fn test_negative_catches_never_go_below_zero() {
        let mut s = session();
        s.input_mut().hold_spawns = true;
        s.start(1, 0.0);
        let mut now = 0.0;
        for _ in 0..5 {
            put_item_on_player(&mut s, ItemKind::Competitor);
            now += FRAME_MS;
            fire(&mut s, now);
        }
        assert!(s.surface().scores.iter().all(|r| r.customers == 0 && r.revenue == 0));
    }

    #[test]
    fn test_clock_reports_ceiling_and_ends_on_next_frame() {
        let mut s = session();
        s.input_mut().hold_spawns = true;
        s.start(1, 0.0);
        s.state_mut().time_left = 10.6 + (FRAME_MS / 1000.0) as f32;
        fire(&mut s, FRAME_MS);
        assert_eq!(s.surface().times.last(), Some(&11));

        s.state_mut().time_left = 0.0;
        fire(&mut s, 2.0 * FRAME_MS);
        assert_eq!(s.phase(), SessionPhase::Ended);
    }

    #[test]
    fn test_ending_cancels_and_ignores_stale_frames() {
        let mut s = session();
        s.start(1, 0.0);
        s.state_mut().time_left = 0.0;
        fire(&mut s, FRAME_MS);
        assert_eq!(s.phase(), SessionPhase::Ended);
        assert!(s.host().outstanding.is_empty());

        let frames = s.state().frame_count;
        s.on_frame(2.0 * FRAME_MS);
        assert_eq!(s.state().frame_count, frames);
    }

    #[test]
    fn test_illegal_transitions_are_noops() {
        let mut s = session();
        assert!(!s.restart());
        assert!(s.submit().is_none());
        assert_eq!(s.phase(), SessionPhase::NotStarted);

        s.start(1, 0.0);
        assert!(!s.restart());
        assert!(s.submit().is_none());
        assert_eq!(s.phase(), SessionPhase::Playing);
        assert!(s.is_scheduled());
    }

    #[test]
    fn test_submit_then_restart() {
        let mut s = session();
        s.input_mut().hold_spawns = true;
        s.start(1, 0.0);
        put_item_on_player(&mut s, ItemKind::Email);
        fire(&mut s, FRAME_MS);
        s.state_mut().time_left = 0.0;
        fire(&mut s, 2.0 * FRAME_MS);

        assert_eq!(s.submit(), Some(ScoreReport { revenue: 37_500, customers: 25 }));
        assert_eq!(s.phase(), SessionPhase::Submitted);
        assert!(s.submit().is_none());

        assert!(s.restart());
        assert_eq!(s.phase(), SessionPhase::NotStarted);
        assert_eq!(
            s.surface().phases,
            vec![
                SessionPhase::Playing,
                SessionPhase::Ended,
                SessionPhase::Submitted,
                SessionPhase::NotStarted
            ]
        );
    }

    #[test]
    fn test_restart_resets_before_next_frame() {
        let mut s = session();
        s.start(1, 0.0);
        run_headless(&mut s, 0.0, FRAME_MS, 120);
        put_item_on_player(&mut s, ItemKind::Ads);
        fire(&mut s, 121.0 * FRAME_MS);
        assert!(s.score().customers > 0);
        assert!(!s.state().particles.is_empty());
        s.state_mut().time_left = 0.0;
        fire(&mut s, 122.0 * FRAME_MS);
        assert_eq!(s.phase(), SessionPhase::Ended);

        assert!(s.restart());
        assert!(s.start(2, 10_000.0));
        let state = s.state();
        assert_eq!(state.score.report(), ScoreReport::default());
        assert_eq!(state.time_left, GAME_DURATION);
        assert!(state.items.is_empty());
        assert!(state.particles.is_empty());
        assert_eq!(state.frame_count, 0);
        assert!(state.player.grounded);
        assert_eq!(s.host().outstanding.len(), 1);
    }

    #[test]
    fn test_start_from_ended_restarts() {
        let mut s = session();
        s.start(1, 0.0);
        s.state_mut().time_left = 0.0;
        fire(&mut s, FRAME_MS);
        assert!(s.start(3, 100.0));
        assert_eq!(s.phase(), SessionPhase::Playing);
        assert_eq!(s.state().seed, 3);
        assert_eq!(s.host().outstanding.len(), 1);
    }

    #[test]
    fn test_unmount_cancels_pending() {
        let mut s = session();
        s.start(1, 0.0);
        let handle = s.host().outstanding[0];
        s.unmount();
        assert!(s.host().outstanding.is_empty());
        assert_eq!(s.host().cancelled, vec![handle]);
        assert_eq!(s.phase(), SessionPhase::NotStarted);
    }

    #[test]
    fn test_start_after_unmount() {
        let mut s = session();
        s.start(1, 0.0);
        fire(&mut s, FRAME_MS);
        s.unmount();
        assert!(!s.is_scheduled());
        assert_eq!(s.state().frame_count, 0);

        assert!(s.start(2, 100.0));
        assert_eq!(s.phase(), SessionPhase::Playing);
        assert!(s.is_scheduled());
        assert_eq!(s.host().outstanding.len(), 1);
        fire(&mut s, 100.0 + FRAME_MS);
        assert_eq!(s.state().frame_count, 1);
    }

    #[test]
    fn test_unmount_outside_play_keeps_phase() {
        let mut s = session();
        s.unmount();
        assert_eq!(s.phase(), SessionPhase::NotStarted);
        assert!(s.surface().phases.is_empty());
    }

    #[test]
    fn test_redraw_does_not_step_or_schedule() {
        let mut s = session();
        s.redraw();
        assert_eq!(s.surface().renders, 1);
        assert_eq!(s.state().frame_count, 0);
        assert!(!s.is_scheduled());
    }

    #[test]
    fn test_first_frame_delta_from_start_time() {
        let mut s = session();
        s.input_mut().hold_spawns = true;
        s.start(1, 5_000.0);
        fire(&mut s, 5_500.0);
        assert!((s.state().time_left - 29.5).abs() < 1e-4);
    }

    #[test]
    fn test_early_first_frame_does_not_add_time() {
        let mut s = session();
        s.input_mut().hold_spawns = true;
        s.start(1, 1_000.0);
        fire(&mut s, 995.0);
        assert_eq!(s.state().time_left, GAME_DURATION);
        assert_eq!(s.surface().times, vec![30, 30]);
    }
}
