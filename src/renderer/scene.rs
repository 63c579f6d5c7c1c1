//! Scene assembly: runner state to a triangle list in world coordinates

use glam::Vec2;

use super::shapes;
use super::vertex::{Vertex, colors};
use crate::sim::{Obstacle, Rect, RunnerState};
use crate::skins::skin_for;

const PORTAL_SEGMENTS: u32 = 32;
const PORTAL_STROKE: f32 = 2.0;

/// Build this frame's vertices: ground, then player, then obstacles on top
pub fn build_scene(state: &RunnerState) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(64 + state.obstacles.len() * 6);

    let ground = Rect::new(
        0.0,
        state.ground_level,
        state.viewport.width,
        state.config.ground_margin,
    );
    vertices.extend(shapes::rect(ground, colors::GROUND));

    let player = state.player.rect();
    let skin = skin_for(state.player.skin_index);
    vertices.extend(shapes::fan(
        player.center(),
        &skin.shape.outline(player),
        skin.color,
    ));

    for obstacle in &state.obstacles {
        vertices.extend(obstacle_vertices(obstacle));
    }

    vertices
}

fn obstacle_vertices(obstacle: &Obstacle) -> Vec<Vertex> {
    let fill = if obstacle.resolved {
        colors::RESOLVED
    } else {
        obstacle.color
    };

    if !obstacle.kind.is_portal() {
        return shapes::rect(obstacle.rect, fill);
    }

    let center = obstacle.rect.center();
    let radii = Vec2::new(obstacle.rect.width, obstacle.rect.height) / 2.0;
    let mut vertices = shapes::ellipse(center, radii, fill, PORTAL_SEGMENTS);
    vertices.extend(shapes::ellipse_ring(
        center,
        radii,
        PORTAL_STROKE,
        colors::PORTAL_RING,
        PORTAL_SEGMENTS,
    ));
    vertices
}
