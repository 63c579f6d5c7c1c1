//! Runner state and core simulation types
//!
//! Everything the simulation step reads or writes lives in [`RunnerState`];
//! the host only adds a reward sink and input per tick.

use std::collections::VecDeque;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::movement::{Gravity, Mode, Movement, PortalKind};
use super::obstacle::{Obstacle, ObstacleKind};
use super::player::PlayerBody;
use super::spawn::{SpawnContext, spawn_obstacle};
use crate::config::RunnerConfig;
use crate::consts::MIN_GROUND_LEVEL;
use crate::error::RewardError;

/// Visible area in world units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Feedback for the host (banners, floating text); never read back by the sim
#[derive(Debug, Clone, PartialEq)]
pub enum RunnerEvent {
    /// A portal changed mode and/or gravity
    Transition {
        portal: PortalKind,
        movement: Movement,
        banner: String,
    },
    /// Hit a hazard (or a landable block from the wrong side)
    Crashed { kind: ObstacleKind, at: Vec2 },
    /// Reward credited; `granted` is what the currency owner reported
    Rewarded { requested: u32, granted: u32, at: Vec2 },
    /// Reward could not be credited; the obstacle is still settled
    RewardSkipped { requested: u32, reason: RewardError },
}

/// Oldest events are dropped past this if the host never drains them
pub const MAX_EVENTS: usize = 64;

/// Complete runner state
#[derive(Debug, Clone)]
pub struct RunnerState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub config: RunnerConfig,
    /// Current mode and gravity direction
    pub movement: Movement,
    pub viewport: Viewport,
    /// Bottom edge of the playfield (y grows downward)
    pub ground_level: f32,
    /// Horizontal obstacle speed, fixed for the session
    pub scroll_speed: f32,
    /// Frames since the last spawn
    pub spawn_timer: u32,
    pub player: PlayerBody,
    /// Active obstacles in spawn order
    pub obstacles: Vec<Obstacle>,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Sum of granted rewards this session
    pub earned: u64,
    /// Undrained feedback events
    pub events: VecDeque<RunnerEvent>,
    rng: Pcg32,
}

impl RunnerState {
    /// Fresh session: normal-gravity cube resting on the ground
    pub fn new(seed: u64, config: RunnerConfig, viewport: Viewport) -> Self {
        let ground_level = ground_level_for(viewport.height, config.ground_margin);
        let player = PlayerBody::new(&config, ground_level);
        Self {
            seed,
            scroll_speed: config.scroll_speed,
            movement: Movement::default(),
            viewport,
            ground_level,
            spawn_timer: 0,
            player,
            obstacles: Vec::new(),
            time_ticks: 0,
            earned: 0,
            events: VecDeque::with_capacity(MAX_EVENTS),
            rng: Pcg32::seed_from_u64(seed),
            config,
        }
    }

    pub fn mode(&self) -> Mode {
        self.movement.mode
    }

    pub fn gravity(&self) -> Gravity {
        self.movement.gravity
    }

    /// Frames between spawns for the current mode
    pub fn spawn_interval(&self) -> u32 {
        match self.movement.mode {
            Mode::Cube => self.config.cube_spawn_interval,
            Mode::Ship => self.config.ship_spawn_interval,
        }
    }

    /// Track a new viewport size. The player is reconciled against the new
    /// ground by the next tick's bound clamp.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.viewport = Viewport::new(width.max(0.0), height.max(0.0));
        self.ground_level = ground_level_for(height, self.config.ground_margin);
    }

    /// Generator input for the current moment
    pub fn spawn_context(&self) -> SpawnContext {
        SpawnContext {
            movement: self.movement,
            ground_level: self.ground_level,
            spawn_x: self.viewport.width,
        }
    }

    /// Spawn one random obstacle at the right edge
    pub fn spawn(&mut self) {
        let ctx = self.spawn_context();
        let obstacle = spawn_obstacle(&mut self.rng, &ctx);
        self.obstacles.push(obstacle);
    }

    /// Cosmetic only; any index is accepted and resolved at render time
    pub fn set_skin(&mut self, index: i32) {
        self.player.skin_index = index;
    }

    pub fn push_event(&mut self, event: RunnerEvent) {
        if self.events.len() >= MAX_EVENTS {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }

    /// Hand all pending events to the host
    pub fn take_events(&mut self) -> Vec<RunnerEvent> {
        self.events.drain(..).collect()
    }
}

/// Ground level for a viewport height, never below [`MIN_GROUND_LEVEL`]
pub fn ground_level_for(height: f32, margin: f32) -> f32 {
    let ground = height - margin;
    if ground.is_finite() && ground >= MIN_GROUND_LEVEL {
        ground
    } else {
        log::warn!(
            "Viewport height {} too small, clamping ground to {}",
            height,
            MIN_GROUND_LEVEL
        );
        MIN_GROUND_LEVEL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state() {
        let state = RunnerState::new(1, RunnerConfig::default(), Viewport::new(800.0, 600.0));
        assert_eq!(state.ground_level, 550.0);
        assert_eq!(state.movement, Movement::default());
        assert_eq!(state.player.y, 520.0);
        assert!(state.player.is_grounded);
        assert_eq!(state.spawn_interval(), 120);
        assert!(state.obstacles.is_empty());
    }

    #[test]
    fn test_spawn_interval_follows_mode() {
        let mut state = RunnerState::new(1, RunnerConfig::default(), Viewport::new(800.0, 600.0));
        state.movement.enter_portal(PortalKind::Fly);
        assert_eq!(state.spawn_interval(), 15);
    }

    #[test]
    fn test_degenerate_viewport_clamps_ground() {
        let mut state = RunnerState::new(1, RunnerConfig::default(), Viewport::new(800.0, 600.0));
        state.resize(300.0, 120.0);
        assert_eq!(state.ground_level, MIN_GROUND_LEVEL);
        state.resize(300.0, -5.0);
        assert_eq!(state.ground_level, MIN_GROUND_LEVEL);
        assert_eq!(state.viewport.height, 0.0);
        state.resize(300.0, f32::NAN);
        assert_eq!(state.ground_level, MIN_GROUND_LEVEL);
    }

    #[test]
    fn test_spawn_places_at_right_edge() {
        let mut state = RunnerState::new(5, RunnerConfig::default(), Viewport::new(640.0, 480.0));
        state.spawn();
        assert_eq!(state.obstacles.len(), 1);
        assert_eq!(state.obstacles[0].rect.x, 640.0);
    }

    #[test]
    fn test_event_queue_is_bounded() {
        let mut state = RunnerState::new(1, RunnerConfig::default(), Viewport::new(800.0, 600.0));
        for requested in 0..(MAX_EVENTS as u32 + 10) {
            state.push_event(RunnerEvent::RewardSkipped {
                requested,
                reason: RewardError::Unavailable,
            });
        }
        let events = state.take_events();
        assert_eq!(events.len(), MAX_EVENTS);
        assert_eq!(
            events[0],
            RunnerEvent::RewardSkipped {
                requested: 10,
                reason: RewardError::Unavailable
            }
        );
        assert_eq!(
            events[MAX_EVENTS - 1],
            RunnerEvent::RewardSkipped {
                requested: MAX_EVENTS as u32 + 9,
                reason: RewardError::Unavailable
            }
        );
        assert!(state.events.is_empty());

        // Capacity is reusable after a drain
        state.push_event(RunnerEvent::RewardSkipped {
            requested: 1,
            reason: RewardError::Unavailable,
        });
        assert_eq!(state.take_events().len(), 1);
    }
}
