//! Fixed timestep simulation tick
//!
//! One frame of the runner, advanced deterministically from the state, the
//! input and the reward sink's answers.

use glam::Vec2;

use super::collision::{CollisionOutcome, resolve_collision};
use super::reward::RewardSink;
use super::state::{RunnerEvent, RunnerState};
use crate::consts::SIM_DT;
use crate::error::RewardError;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Jump (cube) or flap (ship): Space, ArrowUp, click or tap
    pub activate: bool,
}

/// Floating text sits a little above the player
const FEEDBACK_OFFSET: f32 = 20.0;

/// Advance the runner by one fixed step
///
/// Order matters: player physics, spawning, scroll + collisions, rewards,
/// then culling. `rewards` is consulted once per obstacle that has been
/// passed cleanly; `None` means no currency owner is attached.
pub fn tick(state: &mut RunnerState, input: &TickInput, mut rewards: Option<&mut dyn RewardSink>) {
    state.time_ticks += 1;

    if input.activate {
        state
            .player
            .jump(state.movement, state.config.jump_impulse);
    }

    // Player physics
    state
        .player
        .apply_gravity(&state.config, state.movement, SIM_DT);
    state
        .player
        .clamp_to_world_bounds(state.ground_level, state.movement);

    // Spawning
    state.spawn_timer += 1;
    if state.spawn_timer >= state.spawn_interval() {
        state.spawn_timer = 0;
        state.spawn();
    }

    let mut events = Vec::new();

    // Scroll and collide
    let speed = state.scroll_speed * SIM_DT;
    let tolerance = state.config.landing_tolerance;
    for obstacle in state.obstacles.iter_mut() {
        obstacle.rect.x -= speed;
        if obstacle.resolved || !obstacle.rect.overlaps(&state.player.rect()) {
            continue;
        }

        let outcome = resolve_collision(
            obstacle,
            &mut state.player,
            &mut state.movement,
            tolerance,
            state.ground_level,
        );
        match outcome {
            CollisionOutcome::Transition(portal) => {
                let banner = state.movement.banner(portal);
                log::info!(
                    "Portal {:?}: now {} ({:?} gravity)",
                    portal,
                    state.movement.mode.as_str(),
                    state.movement.gravity
                );
                events.push(RunnerEvent::Transition {
                    portal,
                    movement: state.movement,
                    banner,
                });
            }
            CollisionOutcome::Landed => {}
            CollisionOutcome::Crashed => {
                log::debug!("Crashed into {:?} at x={:.1}", obstacle.kind, obstacle.rect.x);
                events.push(RunnerEvent::Crashed {
                    kind: obstacle.kind,
                    at: feedback_point(state.player.x, state.player.y),
                });
            }
        }
    }

    // Rewards for obstacles that made it past the player untouched
    let player_x = state.player.x;
    for obstacle in state.obstacles.iter_mut() {
        if !obstacle.pays_out() || !obstacle.has_passed(player_x) {
            continue;
        }
        obstacle.rewarded = true;

        let requested = obstacle.value;
        let result = match rewards.as_deref_mut() {
            Some(sink) => sink.award(requested),
            None => Err(RewardError::Unavailable),
        };
        match result {
            Ok(granted) => {
                state.earned += u64::from(granted);
                events.push(RunnerEvent::Rewarded {
                    requested,
                    granted,
                    at: feedback_point(state.player.x, state.player.y),
                });
            }
            Err(reason) => {
                log::warn!("Reward of {} not credited: {}", requested, reason);
                events.push(RunnerEvent::RewardSkipped { requested, reason });
            }
        }
    }

    // Cull
    let margin = state.config.despawn_margin;
    state.obstacles.retain(|o| !o.is_offscreen(margin));

    for event in events {
        state.push_event(event);
    }
}

fn feedback_point(x: f32, y: f32) -> Vec2 {
    Vec2::new(x, y - FEEDBACK_OFFSET)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RunnerConfig;
    use crate::sim::movement::{Gravity, Mode, Movement, PortalKind};
    use crate::sim::obstacle::{Obstacle, ObstacleKind};
    use crate::sim::rect::Rect;
    use crate::sim::reward::Wallet;
    use crate::sim::state::Viewport;

    fn new_state() -> RunnerState {
        RunnerState::new(42, RunnerConfig::default(), Viewport::new(800.0, 600.0))
    }

    fn idle() -> TickInput {
        TickInput::default()
    }

    #[test]
    fn test_floor_spike_crash_forfeits_reward() {
        let mut state = new_state();
        // Floor-anchored 30x30 spike sharing the player's row
        state.obstacles.push(Obstacle::new(
            ObstacleKind::Spike,
            Rect::new(500.0, 520.0, 30.0, 30.0),
        ));
        let mut wallet = Wallet::default();

        for _ in 0..100 {
            tick(&mut state, &idle(), Some(&mut wallet));
        }

        assert_eq!(state.obstacles.len(), 1);
        let spike = &state.obstacles[0];
        assert!(spike.rect.x.abs() < 1e-3);
        assert!(spike.resolved);
        assert!(!spike.rewarded);
        assert_eq!(wallet.balance, 0);
        assert_eq!(state.earned, 0);

        let events = state.take_events();
        let crashes = events
            .iter()
            .filter(|e| matches!(e, RunnerEvent::Crashed { .. }))
            .count();
        assert_eq!(crashes, 1);
    }

    #[test]
    fn test_lands_on_platform() {
        let mut state = new_state();
        state.obstacles.push(Obstacle::new(
            ObstacleKind::Platform,
            Rect::new(60.0, 400.0, 60.0, 60.0),
        ));
        state.player.y = 365.0;
        state.player.vy = 6.0;
        state.player.is_grounded = false;

        tick(&mut state, &idle(), None);
        assert_eq!(state.player.y, 370.0);
        assert_eq!(state.player.vy, 0.0);
        assert!(state.player.is_grounded);
        assert!(!state.obstacles[0].resolved);

        // Stays on top while the platform is underneath
        tick(&mut state, &idle(), None);
        assert_eq!(state.player.y, 370.0);
        assert!(state.player.is_grounded);
        assert!(state.take_events().is_empty());
    }

    #[test]
    fn test_jump_from_platform() {
        let mut state = new_state();
        state.obstacles.push(Obstacle::new(
            ObstacleKind::Platform,
            Rect::new(60.0, 400.0, 60.0, 60.0),
        ));
        state.player.y = 365.0;
        state.player.vy = 6.0;
        tick(&mut state, &idle(), None);
        assert!(state.player.is_grounded);

        tick(&mut state, &TickInput { activate: true }, None);
        assert!(!state.player.is_grounded);
        assert!(state.player.vy < 0.0);
        assert!(state.player.y < 370.0);
    }

    #[test]
    fn test_portal_fires_once() {
        let mut state = new_state();
        state.obstacles.push(Obstacle::new(
            ObstacleKind::Portal(PortalKind::Fly),
            Rect::new(60.0, 470.0, 30.0, 60.0),
        ));

        tick(&mut state, &idle(), None);
        assert_eq!(state.movement, Movement::new(Mode::Ship, Gravity::Normal));
        assert!(state.obstacles[0].resolved);

        // Still overlapping next frame, no second transition
        tick(&mut state, &idle(), None);
        let transitions: Vec<_> = state
            .take_events()
            .into_iter()
            .filter(|e| matches!(e, RunnerEvent::Transition { .. }))
            .collect();
        assert_eq!(transitions.len(), 1);
        assert_eq!(
            transitions[0],
            RunnerEvent::Transition {
                portal: PortalKind::Fly,
                movement: Movement::new(Mode::Ship, Gravity::Normal),
                banner: "SHIP MODE!".to_string(),
            }
        );
    }

    #[test]
    fn test_resolved_gravity_portal_does_not_retrigger() {
        let mut state = new_state();
        state.obstacles.push(Obstacle::new(
            ObstacleKind::Portal(PortalKind::Gravity),
            Rect::new(60.0, 470.0, 30.0, 60.0),
        ));
        for _ in 0..3 {
            tick(&mut state, &idle(), None);
        }
        let transitions = state
            .take_events()
            .iter()
            .filter(|e| matches!(e, RunnerEvent::Transition { .. }))
            .count();
        assert_eq!(transitions, 1);
        assert_eq!(state.gravity(), Gravity::Inverted);
    }

    #[test]
    fn test_gravity_portal_inverts_cube() {
        let mut state = new_state();
        state.obstacles.push(Obstacle::new(
            ObstacleKind::Portal(PortalKind::Gravity),
            Rect::new(60.0, 470.0, 30.0, 60.0),
        ));
        tick(&mut state, &idle(), None);
        assert_eq!(state.gravity(), Gravity::Inverted);

        // Falls upward until it rests on the top edge
        for _ in 0..60 {
            tick(&mut state, &idle(), None);
        }
        assert_eq!(state.player.y, 0.0);
        assert!(state.player.is_grounded);
    }

    #[test]
    fn test_reward_paid_exactly_once() {
        let mut state = new_state();
        // Already behind the player, never touched
        state.obstacles.push(Obstacle::new(
            ObstacleKind::Tall,
            Rect::new(10.0, 450.0, 20.0, 100.0),
        ));
        let mut calls = Vec::new();
        let mut sink = |amount: u32| -> Result<u32, RewardError> {
            calls.push(amount);
            Ok(amount * 2)
        };

        for _ in 0..5 {
            tick(&mut state, &idle(), Some(&mut sink));
        }

        assert_eq!(calls, vec![50]);
        assert_eq!(state.earned, 100);
        assert!(state.obstacles[0].rewarded);
        let events = state.take_events();
        assert!(events.contains(&RunnerEvent::Rewarded {
            requested: 50,
            granted: 100,
            at: Vec2::new(50.0, 500.0),
        }));
    }

    #[test]
    fn test_reward_waits_for_trailing_edge() {
        let mut state = new_state();
        // High wall that never touches the grounded player; right edge at 120
        state.obstacles.push(Obstacle::new(
            ObstacleKind::Tall,
            Rect::new(100.0, 0.0, 20.0, 100.0),
        ));
        let mut wallet = Wallet::default();

        for _ in 0..14 {
            tick(&mut state, &idle(), Some(&mut wallet));
            assert!(state.obstacles[0].rect.right() >= state.player.x);
            assert_eq!(wallet.balance, 0);
            assert!(!state.obstacles[0].rewarded);
        }
        // Trailing edge level with the player's leading edge is not a pass
        assert_eq!(state.obstacles[0].rect.right(), state.player.x);

        tick(&mut state, &idle(), Some(&mut wallet));
        assert_eq!(wallet.balance, 50);
        assert!(state.obstacles[0].rewarded);

        for _ in 0..5 {
            tick(&mut state, &idle(), Some(&mut wallet));
        }
        assert_eq!(wallet.balance, 50);
    }

    #[test]
    fn test_ship_landing_near_top_edge_stays_in_world() {
        let mut state = new_state();
        state.movement = Movement::new(Mode::Ship, Gravity::Normal);
        state.player.y = 0.0;
        state.player.vy = 0.0;
        // Floating block 20 below the top edge, shorter gap than the body
        state.obstacles.push(Obstacle::new(
            ObstacleKind::Floating,
            Rect::new(60.0, 20.0, 50.0, 40.0),
        ));

        for _ in 0..3 {
            tick(&mut state, &idle(), None);
            assert!(state.player.y >= 0.0, "y = {}", state.player.y);
            assert!(state.player.y <= state.ground_level - state.player.height);
        }
    }

    #[test]
    fn test_inverted_ship_landing_near_ground_stays_in_world() {
        let mut state = new_state();
        state.movement = Movement::new(Mode::Ship, Gravity::Inverted);
        let lowest = state.ground_level - state.player.height;
        state.player.y = lowest;
        state.player.vy = 0.0;
        // Bottom face 20 above the ground
        state.obstacles.push(Obstacle::new(
            ObstacleKind::Floating,
            Rect::new(60.0, 490.0, 50.0, 40.0),
        ));

        for _ in 0..3 {
            tick(&mut state, &idle(), None);
            assert!(state.player.y <= lowest, "y = {}", state.player.y);
            assert!(state.player.y >= 0.0);
        }
        assert!(state.player.is_grounded);
    }

    #[test]
    fn test_missing_sink_still_settles() {
        let mut state = new_state();
        state.obstacles.push(Obstacle::new(
            ObstacleKind::Spike,
            Rect::new(10.0, 520.0, 30.0, 30.0),
        ));

        tick(&mut state, &idle(), None);
        assert!(state.obstacles[0].rewarded);
        assert_eq!(state.earned, 0);
        assert_eq!(
            state.take_events(),
            vec![RunnerEvent::RewardSkipped {
                requested: 15,
                reason: RewardError::Unavailable
            }]
        );

        // A sink attached later does not get a retry
        let mut wallet = Wallet::default();
        tick(&mut state, &idle(), Some(&mut wallet));
        assert_eq!(wallet.balance, 0);
    }

    #[test]
    fn test_failed_sink_is_not_retried() {
        let mut state = new_state();
        state.obstacles.push(Obstacle::new(
            ObstacleKind::Spike,
            Rect::new(10.0, 520.0, 30.0, 30.0),
        ));
        let mut attempts = 0;
        let mut sink = |_: u32| -> Result<u32, RewardError> {
            attempts += 1;
            Err(RewardError::Rejected("closed".to_string()))
        };
        for _ in 0..3 {
            tick(&mut state, &idle(), Some(&mut sink));
        }
        assert_eq!(attempts, 1);
        assert!(state.obstacles[0].rewarded);
    }

    #[test]
    fn test_cube_spawn_interval() {
        let mut state = new_state();
        for _ in 0..119 {
            tick(&mut state, &idle(), None);
        }
        assert!(state.obstacles.is_empty());
        tick(&mut state, &idle(), None);
        assert_eq!(state.obstacles.len(), 1);
        assert_eq!(state.spawn_timer, 0);
    }

    #[test]
    fn test_ship_spawn_interval() {
        let mut state = new_state();
        state.movement = Movement::new(Mode::Ship, Gravity::Normal);
        for _ in 0..14 {
            tick(&mut state, &idle(), None);
        }
        assert!(state.obstacles.is_empty());
        tick(&mut state, &idle(), None);
        assert_eq!(state.obstacles.len(), 1);
        for _ in 0..15 {
            tick(&mut state, &idle(), None);
        }
        assert_eq!(state.obstacles.len(), 2);
    }

    #[test]
    fn test_offscreen_obstacles_are_culled() {
        let mut state = new_state();
        state.obstacles.push(Obstacle::new(
            ObstacleKind::Spike,
            Rect::new(-124.0, 0.0, 30.0, 30.0),
        ));
        // Right edge at -99 after one scroll, -104 after two
        tick(&mut state, &idle(), None);
        assert_eq!(state.obstacles.len(), 1);
        tick(&mut state, &idle(), None);
        assert!(state.obstacles.is_empty());
    }

    #[test]
    fn test_resize_moves_player_to_new_ground() {
        let mut state = new_state();
        state.resize(800.0, 400.0);
        assert_eq!(state.ground_level, 350.0);
        tick(&mut state, &idle(), None);
        assert_eq!(state.player.y, 320.0);
        assert!(state.player.is_grounded);
    }

    #[test]
    fn test_same_seed_same_run() {
        let run = |seed: u64| {
            let mut state =
                RunnerState::new(seed, RunnerConfig::default(), Viewport::new(800.0, 600.0));
            let mut wallet = Wallet::default();
            for frame in 0..3000u32 {
                let input = TickInput {
                    activate: frame % 37 == 0 || (state.mode() == Mode::Ship && frame % 9 == 0),
                };
                tick(&mut state, &input, Some(&mut wallet));
            }
            let layout: Vec<(ObstacleKind, Rect, bool, bool)> = state
                .obstacles
                .iter()
                .map(|o| (o.kind, o.rect, o.resolved, o.rewarded))
                .collect();
            (layout, state.player.y, state.movement, wallet.balance)
        };

        assert_eq!(run(7), run(7));
        assert_ne!(run(7).0, run(8).0);
    }
}
