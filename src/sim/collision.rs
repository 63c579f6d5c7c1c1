//! Collision resolution between the player and one obstacle
//!
//! Overlap is a plain rectangle test; what it means depends on the obstacle:
//! portals switch mode/gravity, landable blocks can be stood on when
//! approached from the floor side, everything else is a crash. A crash only
//! forfeits that obstacle's reward; the run carries on.

use super::movement::{Gravity, Movement, PortalKind};
use super::obstacle::{Contact, Obstacle};
use super::player::PlayerBody;
use super::rect::Rect;

/// Result of resolving an overlap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionOutcome {
    /// A portal changed the movement state
    Transition(PortalKind),
    /// The player now rests on the obstacle
    Landed,
    /// The obstacle was hit; its reward is forfeit
    Crashed,
}

/// Resolve an overlap between the player and `obstacle`
///
/// The caller has already checked the overlap and that the obstacle is not
/// resolved. Mutates the obstacle flags, the player and the movement state.
/// A landing never leaves the body outside `[0, ground_level - height]`.
pub fn resolve_collision(
    obstacle: &mut Obstacle,
    player: &mut PlayerBody,
    movement: &mut Movement,
    tolerance: f32,
    ground_level: f32,
) -> CollisionOutcome {
    match obstacle.kind.contact() {
        Contact::Portal(portal) => {
            movement.enter_portal(portal);
            player.reset_motion();
            obstacle.resolved = true;
            CollisionOutcome::Transition(portal)
        }
        Contact::Landable => {
            let landed = try_land(
                &obstacle.rect,
                player,
                movement.gravity,
                tolerance,
                ground_level,
            );
            if landed {
                CollisionOutcome::Landed
            } else {
                obstacle.resolved = true;
                CollisionOutcome::Crashed
            }
        }
        Contact::Hazard => {
            obstacle.resolved = true;
            CollisionOutcome::Crashed
        }
    }
}

/// Snap onto the obstacle's near face if the player came from the floor side
///
/// "Near face" is the top under normal gravity and the bottom when inverted.
/// The player must have been on that side before this step (within
/// `tolerance` of overlap) and be moving toward the face or at rest. Blocks
/// closer to an edge than the body is tall leave it pinned at that edge.
fn try_land(
    face: &Rect,
    player: &mut PlayerBody,
    gravity: Gravity,
    tolerance: f32,
    ground_level: f32,
) -> bool {
    match gravity {
        Gravity::Normal => {
            let was_above = player.prev_y + player.height <= face.y + tolerance;
            if was_above && player.vy >= 0.0 {
                player.land_at((face.y - player.height).max(0.0));
                return true;
            }
        }
        Gravity::Inverted => {
            let was_below = player.prev_y >= face.bottom() - tolerance;
            if was_below && player.vy <= 0.0 {
                player.land_at(face.bottom().min(ground_level - player.height));
                return true;
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RunnerConfig;
    use crate::sim::movement::Mode;
    use crate::sim::obstacle::ObstacleKind;

    const TOLERANCE: f32 = 15.0;
    const GROUND: f32 = 500.0;

    fn player_at(y: f32, vy: f32) -> PlayerBody {
        let mut p = PlayerBody::new(&RunnerConfig::default(), GROUND);
        p.prev_y = y - vy;
        p.y = y;
        p.vy = vy;
        p.is_grounded = false;
        p
    }

    fn platform(y: f32) -> Obstacle {
        Obstacle::new(ObstacleKind::Platform, Rect::new(40.0, y, 60.0, 60.0))
    }

    #[test]
    fn test_portal_transitions_and_resolves() {
        let mut obs = Obstacle::new(
            ObstacleKind::Portal(PortalKind::Gravity),
            Rect::new(50.0, 400.0, 30.0, 60.0),
        );
        let mut p = player_at(420.0, 3.0);
        p.is_grounded = true;
        let mut m = Movement::new(Mode::Ship, Gravity::Normal);

        let outcome = resolve_collision(&mut obs, &mut p, &mut m, TOLERANCE, GROUND);
        assert_eq!(outcome, CollisionOutcome::Transition(PortalKind::Gravity));
        assert_eq!(m, Movement::new(Mode::Cube, Gravity::Inverted));
        assert!(obs.resolved);
        assert!(!obs.rewarded);
        assert_eq!(p.vy, 0.0);
        assert!(!p.is_grounded);
    }

    #[test]
    fn test_lands_on_platform_from_above() {
        let mut obs = platform(440.0);
        // Came down from 5 above the top face
        let mut p = player_at(412.0, 7.0);
        let mut m = Movement::default();

        let outcome = resolve_collision(&mut obs, &mut p, &mut m, TOLERANCE, GROUND);
        assert_eq!(outcome, CollisionOutcome::Landed);
        assert_eq!(p.y, 410.0);
        assert_eq!(p.vy, 0.0);
        assert!(p.is_grounded);
        assert!(!obs.resolved);
    }

    #[test]
    fn test_landing_tolerance() {
        // Previous bottom 14 below the face still lands
        let mut p = player_at(430.0, 6.0);
        p.prev_y = 424.0;
        let outcome = resolve_collision(
            &mut platform(440.0),
            &mut p,
            &mut Movement::default(),
            TOLERANCE,
            GROUND,
        );
        assert_eq!(outcome, CollisionOutcome::Landed);

        // 16 below does not
        let mut p = player_at(432.0, 6.0);
        p.prev_y = 426.0;
        let mut obs = platform(440.0);
        let outcome = resolve_collision(
            &mut obs,
            &mut p,
            &mut Movement::default(),
            TOLERANCE,
            GROUND,
        );
        assert_eq!(outcome, CollisionOutcome::Crashed);
        assert!(obs.resolved);
    }

    #[test]
    fn test_rising_into_platform_crashes() {
        let mut obs = platform(300.0);
        // Moving up into the bottom face under normal gravity
        let mut p = player_at(355.0, -6.0);
        let outcome = resolve_collision(
            &mut obs,
            &mut p,
            &mut Movement::default(),
            TOLERANCE,
            GROUND,
        );
        assert_eq!(outcome, CollisionOutcome::Crashed);
        assert!(obs.resolved);
    }

    #[test]
    fn test_inverted_lands_on_bottom_face() {
        let mut obs = Obstacle::new(ObstacleKind::Floating, Rect::new(40.0, 60.0, 50.0, 30.0));
        let mut p = player_at(85.0, -6.0);
        let mut m = Movement::new(Mode::Cube, Gravity::Inverted);

        let outcome = resolve_collision(&mut obs, &mut p, &mut m, TOLERANCE, GROUND);
        assert_eq!(outcome, CollisionOutcome::Landed);
        assert_eq!(p.y, 90.0);
        assert_eq!(p.vy, 0.0);
        assert!(p.is_grounded);
    }

    #[test]
    fn test_landing_stays_inside_world() {
        // Block 20 below the top edge, body 30 tall
        let mut obs = Obstacle::new(ObstacleKind::Floating, Rect::new(40.0, 20.0, 50.0, 40.0));
        let mut p = player_at(0.5, 0.5);
        let mut m = Movement::new(Mode::Ship, Gravity::Normal);
        let outcome = resolve_collision(&mut obs, &mut p, &mut m, TOLERANCE, GROUND);
        assert_eq!(outcome, CollisionOutcome::Landed);
        assert_eq!(p.y, 0.0);

        // Bottom face 20 above the ground, inverted
        let mut obs = Obstacle::new(ObstacleKind::Floating, Rect::new(40.0, 440.0, 50.0, 40.0));
        let mut p = player_at(469.5, -0.5);
        let mut m = Movement::new(Mode::Ship, Gravity::Inverted);
        let outcome = resolve_collision(&mut obs, &mut p, &mut m, TOLERANCE, GROUND);
        assert_eq!(outcome, CollisionOutcome::Landed);
        assert_eq!(p.y, GROUND - p.height);
    }

    #[test]
    fn test_hazards_always_crash() {
        for kind in [
            ObstacleKind::Normal,
            ObstacleKind::Spike,
            ObstacleKind::FloorSpike,
            ObstacleKind::CeilingSpike,
            ObstacleKind::Tall,
        ] {
            let mut obs = Obstacle::new(kind, Rect::new(40.0, 440.0, 30.0, 60.0));
            // Even from directly above
            let mut p = player_at(412.0, 7.0);
            let mut m = Movement::default();
            let outcome = resolve_collision(&mut obs, &mut p, &mut m, TOLERANCE, GROUND);
            assert_eq!(outcome, CollisionOutcome::Crashed);
            assert!(obs.resolved);
            assert_eq!(m, Movement::default());
        }
    }
}
