//! Start/pause/resume lifecycle around a [`RunnerState`]
//!
//! The host decides when the runner is visible; the session decides whether a
//! frame actually advances the simulation. [`SessionHandle`] lets host
//! callbacks issue commands while a frame is in progress, for instance from
//! inside a reward sink.

use std::cell::RefCell;

use super::reward::RewardSink;
use super::state::{RunnerEvent, RunnerState, Viewport};
use super::tick::{TickInput, tick};
use crate::config::RunnerConfig;

/// Session phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    /// Built but never started
    #[default]
    Idle,
    Running,
    Paused,
}

/// Host request that changes the session between ticks
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SessionCommand {
    Start,
    Pause,
    Resume,
    Activate,
    SetSkin(i32),
    Resize { width: f32, height: f32 },
}

/// A runner session the host drives once per animation frame
#[derive(Debug, Clone)]
pub struct RunnerSession {
    state: RunnerState,
    phase: SessionPhase,
    /// Activation queued for the next frame
    pending: TickInput,
}

impl RunnerSession {
    pub fn new(seed: u64, config: RunnerConfig, viewport: Viewport) -> Self {
        Self {
            state: RunnerState::new(seed, config, viewport),
            phase: SessionPhase::Idle,
            pending: TickInput::default(),
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == SessionPhase::Running
    }

    pub fn state(&self) -> &RunnerState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut RunnerState {
        &mut self.state
    }

    /// Activate and unpause. State is kept, so a second start is harmless.
    pub fn start(&mut self) {
        if self.phase != SessionPhase::Running {
            log::info!("Runner started (seed {})", self.state.seed);
        }
        self.phase = SessionPhase::Running;
    }

    pub fn pause(&mut self) {
        if self.phase == SessionPhase::Running {
            log::info!("Runner paused");
            self.phase = SessionPhase::Paused;
            self.pending = TickInput::default();
        }
    }

    /// Only leaves Paused; an idle session must be started first
    pub fn resume(&mut self) {
        if self.phase == SessionPhase::Paused {
            log::info!("Runner resumed");
            self.phase = SessionPhase::Running;
        }
    }

    /// Throw the current run away and start over with `seed`
    ///
    /// The phase is kept, and so is the viewport and skin.
    pub fn restart(&mut self, seed: u64) {
        let viewport = self.state.viewport;
        let skin = self.state.player.skin_index;
        let config = self.state.config.clone();
        self.state = RunnerState::new(seed, config, viewport);
        self.state.set_skin(skin);
        self.pending = TickInput::default();
        log::info!("Runner restarted (seed {})", seed);
    }

    /// Jump/flap on the next frame. Ignored unless running.
    pub fn activate(&mut self) {
        if self.is_running() {
            self.pending.activate = true;
        }
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.state.resize(width, height);
    }

    pub fn set_skin(&mut self, index: i32) {
        self.state.set_skin(index);
    }

    /// Advance one frame if running. Returns whether the simulation ticked.
    pub fn frame(&mut self, rewards: Option<&mut dyn RewardSink>) -> bool {
        if !self.is_running() {
            return false;
        }
        let input = std::mem::take(&mut self.pending);
        tick(&mut self.state, &input, rewards);
        true
    }

    pub fn take_events(&mut self) -> Vec<RunnerEvent> {
        self.state.take_events()
    }

    pub fn apply(&mut self, command: SessionCommand) {
        match command {
            SessionCommand::Start => self.start(),
            SessionCommand::Pause => self.pause(),
            SessionCommand::Resume => self.resume(),
            SessionCommand::Activate => self.activate(),
            SessionCommand::SetSkin(index) => self.set_skin(index),
            SessionCommand::Resize { width, height } => self.resize(width, height),
        }
    }
}

/// Shared owner of a [`RunnerSession`] for callback-driven hosts
///
/// Commands that arrive while a frame holds the session are queued and
/// applied in arrival order once the tick has finished.
#[derive(Debug)]
pub struct SessionHandle {
    session: RefCell<RunnerSession>,
    deferred: RefCell<Vec<SessionCommand>>,
}

impl SessionHandle {
    pub fn new(session: RunnerSession) -> Self {
        Self {
            session: RefCell::new(session),
            deferred: RefCell::new(Vec::new()),
        }
    }

    /// Apply now, or after the frame in progress
    pub fn command(&self, command: SessionCommand) {
        match self.session.try_borrow_mut() {
            Ok(mut session) => session.apply(command),
            Err(_) => {
                log::debug!("Session busy, deferring {:?}", command);
                self.deferred.borrow_mut().push(command);
            }
        }
    }

    /// Advance one frame. A nested call from inside a running frame is
    /// refused and returns false.
    pub fn frame(&self, rewards: Option<&mut dyn RewardSink>) -> bool {
        let Ok(mut session) = self.session.try_borrow_mut() else {
            log::warn!("Nested frame request ignored");
            return false;
        };
        let ticked = session.frame(rewards);
        let queued = std::mem::take(&mut *self.deferred.borrow_mut());
        for command in queued {
            session.apply(command);
        }
        ticked
    }

    /// Read the session, unless a frame is in progress
    pub fn with<R>(&self, f: impl FnOnce(&RunnerSession) -> R) -> Option<R> {
        self.session.try_borrow().ok().map(|session| f(&session))
    }

    pub fn with_mut<R>(&self, f: impl FnOnce(&mut RunnerSession) -> R) -> Option<R> {
        self.session
            .try_borrow_mut()
            .ok()
            .map(|mut session| f(&mut session))
    }

    pub fn take_events(&self) -> Vec<RunnerEvent> {
        self.with_mut(RunnerSession::take_events).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::error::RewardError;
    use crate::sim::obstacle::{Obstacle, ObstacleKind};
    use crate::sim::rect::Rect;
    use crate::sim::reward::Wallet;

    fn session() -> RunnerSession {
        RunnerSession::new(3, RunnerConfig::default(), Viewport::new(800.0, 600.0))
    }

    #[test]
    fn test_idle_session_does_not_tick() {
        let mut s = session();
        assert_eq!(s.phase(), SessionPhase::Idle);
        assert!(!s.frame(None));
        s.resume();
        assert_eq!(s.phase(), SessionPhase::Idle);
        assert_eq!(s.state().time_ticks, 0);
    }

    #[test]
    fn test_pause_resume() {
        let mut s = session();
        s.start();
        assert!(s.frame(None));

        s.pause();
        s.pause();
        assert_eq!(s.phase(), SessionPhase::Paused);
        assert!(!s.frame(None));
        assert_eq!(s.state().time_ticks, 1);

        s.resume();
        assert!(s.frame(None));
        assert_eq!(s.state().time_ticks, 2);
    }

    #[test]
    fn test_start_keeps_progress() {
        let mut s = session();
        s.start();
        for _ in 0..10 {
            s.frame(None);
        }
        // Switching back to the runner calls start then resume
        s.pause();
        s.start();
        s.resume();
        assert!(s.is_running());
        assert_eq!(s.state().time_ticks, 10);
    }

    #[test]
    fn test_activate_only_while_running() {
        let mut s = session();
        s.activate();
        s.start();
        s.frame(None);
        assert!(s.state().player.is_grounded);

        s.activate();
        s.frame(None);
        assert!(s.state().player.vy < 0.0);
        assert!(!s.state().player.is_grounded);
    }

    #[test]
    fn test_pause_drops_queued_jump() {
        let mut s = session();
        s.start();
        s.activate();
        s.pause();
        s.resume();
        s.frame(None);
        assert!(s.state().player.is_grounded);
    }

    #[test]
    fn test_restart_keeps_skin_and_phase() {
        let mut s = session();
        s.start();
        s.set_skin(4);
        let mut wallet = Wallet::default();
        for _ in 0..200 {
            s.frame(Some(&mut wallet));
        }
        s.restart(9);
        assert!(s.is_running());
        assert_eq!(s.state().time_ticks, 0);
        assert_eq!(s.state().seed, 9);
        assert_eq!(s.state().player.skin_index, 4);
        assert!(s.state().obstacles.is_empty());
    }

    #[test]
    fn test_apply_matches_direct_calls() {
        let mut s = session();
        s.apply(SessionCommand::Resume);
        assert_eq!(s.phase(), SessionPhase::Idle);
        s.apply(SessionCommand::Start);
        s.apply(SessionCommand::SetSkin(6));
        s.apply(SessionCommand::Resize {
            width: 800.0,
            height: 450.0,
        });
        assert!(s.is_running());
        assert_eq!(s.state().player.skin_index, 6);
        assert_eq!(s.state().ground_level, 400.0);
    }

    #[test]
    fn test_commands_from_reward_sink_are_deferred() {
        let handle = Rc::new(SessionHandle::new(session()));
        handle.command(SessionCommand::Start);
        // Already behind the player, so it pays out on the first tick
        handle
            .with_mut(|s| {
                s.state_mut().obstacles.push(Obstacle::new(
                    ObstacleKind::Tall,
                    Rect::new(10.0, 0.0, 20.0, 100.0),
                ))
            })
            .unwrap();

        let inner = Rc::clone(&handle);
        let mut nested_frame = None;
        let mut sink = |amount: u32| -> Result<u32, RewardError> {
            // A page handler reacting to the credit
            inner.command(SessionCommand::Pause);
            inner.command(SessionCommand::SetSkin(3));
            nested_frame = Some(inner.frame(None));
            assert!(inner.with(|s| s.phase()).is_none());
            Ok(amount)
        };

        assert!(handle.frame(Some(&mut sink)));
        assert_eq!(nested_frame, Some(false));
        handle
            .with(|s| {
                assert_eq!(s.phase(), SessionPhase::Paused);
                assert_eq!(s.state().player.skin_index, 3);
                assert_eq!(s.state().earned, 50);
                assert_eq!(s.state().time_ticks, 1);
            })
            .unwrap();
        assert!(!handle.frame(None));

        handle.command(SessionCommand::Resume);
        assert!(handle.frame(None));
        assert_eq!(handle.with(|s| s.state().time_ticks), Some(2));
    }
}
