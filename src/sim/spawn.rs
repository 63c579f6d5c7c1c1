//! Obstacle generation
//!
//! One uniform roll picks the kind from fixed cumulative bands (first match
//! wins). Portals come first and are mode-independent; the rest of the table
//! depends on the current mode, and every edge-anchored obstacle follows the
//! gravity-relevant edge.

use rand::Rng;

use super::movement::{Gravity, Mode, Movement, PortalKind};
use super::obstacle::{Obstacle, ObstacleKind};
use super::rect::Rect;
use crate::consts::*;

/// World facts the generator needs at spawn time
#[derive(Debug, Clone, Copy)]
pub struct SpawnContext {
    pub movement: Movement,
    pub ground_level: f32,
    /// Left edge of a fresh obstacle (the viewport's right edge)
    pub spawn_x: f32,
}

/// Pick an obstacle kind from two uniform rolls in `[0, 1)`
///
/// `ship_roll` is only consulted in ship mode, after the portal bands.
pub fn select_kind(type_roll: f32, ship_roll: f32, mode: Mode) -> ObstacleKind {
    if type_roll < PORTAL_FLY_BAND {
        return ObstacleKind::Portal(PortalKind::Fly);
    }
    if type_roll < PORTAL_GRAVITY_BAND {
        return ObstacleKind::Portal(PortalKind::Gravity);
    }
    if type_roll < PORTAL_NORMAL_BAND {
        return ObstacleKind::Portal(PortalKind::Normal);
    }

    match mode {
        Mode::Ship => {
            if ship_roll < SHIP_CEILING_BAND {
                ObstacleKind::CeilingSpike
            } else if ship_roll < SHIP_FLOOR_BAND {
                ObstacleKind::FloorSpike
            } else {
                ObstacleKind::Floating
            }
        }
        Mode::Cube => {
            if type_roll < CUBE_FLOATING_BAND {
                ObstacleKind::Floating
            } else if type_roll < CUBE_TALL_BAND {
                ObstacleKind::Tall
            } else if type_roll < CUBE_SPIKE_BAND {
                ObstacleKind::Spike
            } else if type_roll < CUBE_NORMAL_BAND {
                ObstacleKind::Normal
            } else {
                ObstacleKind::Platform
            }
        }
    }
}

/// Produce one obstacle at the right edge of the viewport
pub fn spawn_obstacle<R: Rng + ?Sized>(rng: &mut R, ctx: &SpawnContext) -> Obstacle {
    let type_roll: f32 = rng.random();
    let ship_roll: f32 = rng.random();
    let kind = select_kind(type_roll, ship_roll, ctx.movement.mode);
    let rect = place(kind, rng, ctx);

    log::debug!(
        "Spawned {:?} at y={:.1} ({:.0}x{:.0})",
        kind,
        rect.y,
        rect.width,
        rect.height
    );
    Obstacle::new(kind, rect)
}

/// Size and vertical position for a kind
fn place<R: Rng + ?Sized>(kind: ObstacleKind, rng: &mut R, ctx: &SpawnContext) -> Rect {
    let ground = ctx.ground_level;
    let gravity = ctx.movement.gravity;

    let (width, height, y) = match kind {
        ObstacleKind::Portal(_) => {
            let center = match gravity {
                Gravity::Normal => ground - PORTAL_OFFSET,
                Gravity::Inverted => PORTAL_OFFSET,
            };
            (PORTAL_WIDTH, PORTAL_HEIGHT, center - PORTAL_HEIGHT / 2.0)
        }
        ObstacleKind::CeilingSpike => {
            let width = sample(rng, EDGE_SPIKE_WIDTH);
            let height = sample(rng, EDGE_SPIKE_HEIGHT);
            (width, height, 0.0)
        }
        ObstacleKind::FloorSpike => {
            let width = sample(rng, EDGE_SPIKE_WIDTH);
            let height = sample(rng, EDGE_SPIKE_HEIGHT);
            (width, height, ground - height)
        }
        ObstacleKind::Floating => match ctx.movement.mode {
            Mode::Ship => {
                let width = sample(rng, SHIP_FLOATING_WIDTH);
                let height = sample(rng, SHIP_FLOATING_HEIGHT);
                let band = (ground - height - 2.0 * SHIP_FLOATING_MARGIN).max(0.0);
                let y = SHIP_FLOATING_MARGIN + rng.random::<f32>() * band;
                (width, height, y)
            }
            Mode::Cube => {
                let width = sample(rng, CUBE_FLOATING_WIDTH);
                let dist = sample(rng, CUBE_FLOATING_DISTANCE);
                let y = match gravity {
                    Gravity::Normal => ground - dist,
                    Gravity::Inverted => dist,
                };
                (width, CUBE_FLOATING_HEIGHT, y)
            }
        },
        ObstacleKind::Tall => {
            let height = sample(rng, TALL_HEIGHT);
            (TALL_WIDTH, height, on_floor_edge(height, ground, gravity))
        }
        ObstacleKind::Spike => (
            SPIKE_SIZE,
            SPIKE_SIZE,
            on_floor_edge(SPIKE_SIZE, ground, gravity),
        ),
        ObstacleKind::Normal => {
            let width = sample(rng, NORMAL_WIDTH);
            let height = sample(rng, NORMAL_HEIGHT);
            (width, height, on_floor_edge(height, ground, gravity))
        }
        ObstacleKind::Platform => (
            PLATFORM_SIZE,
            PLATFORM_SIZE,
            on_floor_edge(PLATFORM_SIZE, ground, gravity),
        ),
    };

    Rect::new(ctx.spawn_x, y, width, height)
}

/// `min + roll * span`
fn sample<R: Rng + ?Sized>(rng: &mut R, (min, span): (f32, f32)) -> f32 {
    min + rng.random::<f32>() * span
}

/// Top edge of an obstacle resting on whichever edge is the floor
fn on_floor_edge(height: f32, ground: f32, gravity: Gravity) -> f32 {
    match gravity {
        Gravity::Normal => ground - height,
        Gravity::Inverted => 0.0,
    }
}
