//! Shape generation for 2D primitives
//!
//! Everything is emitted as a plain triangle list in world coordinates.

use glam::Vec2;
use std::f32::consts::TAU;

use super::vertex::Vertex;
use crate::sim::Rect;

/// Two triangles covering `rect`
pub fn rect(rect: Rect, color: [f32; 4]) -> Vec<Vertex> {
    let tl = Vertex::new(rect.x, rect.y, color);
    let tr = Vertex::new(rect.right(), rect.y, color);
    let bl = Vertex::new(rect.x, rect.bottom(), color);
    let br = Vertex::new(rect.right(), rect.bottom(), color);
    vec![tl, bl, tr, tr, bl, br]
}

fn ellipse_point(center: Vec2, radii: Vec2, theta: f32) -> Vec2 {
    center + Vec2::new(radii.x * theta.cos(), radii.y * theta.sin())
}

/// Generate vertices for a filled ellipse
pub fn ellipse(center: Vec2, radii: Vec2, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * TAU;
        let theta2 = ((i + 1) as f32 / segments as f32) * TAU;

        // Triangle from center to edge
        vertices.push(Vertex::at(center, color));
        vertices.push(Vertex::at(ellipse_point(center, radii, theta1), color));
        vertices.push(Vertex::at(ellipse_point(center, radii, theta2), color));
    }

    vertices
}

/// Generate vertices for an elliptical outline of the given stroke width,
/// centered on the ellipse edge
pub fn ellipse_ring(
    center: Vec2,
    radii: Vec2,
    stroke: f32,
    color: [f32; 4],
    segments: u32,
) -> Vec<Vertex> {
    let half = stroke / 2.0;
    let inner_radii = (radii - Vec2::splat(half)).max(Vec2::ZERO);
    let outer_radii = radii + Vec2::splat(half);
    let mut vertices = Vec::with_capacity((segments * 6) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * TAU;
        let theta2 = ((i + 1) as f32 / segments as f32) * TAU;

        let inner1 = ellipse_point(center, inner_radii, theta1);
        let outer1 = ellipse_point(center, outer_radii, theta1);
        let inner2 = ellipse_point(center, inner_radii, theta2);
        let outer2 = ellipse_point(center, outer_radii, theta2);

        // Two triangles per segment
        vertices.push(Vertex::at(inner1, color));
        vertices.push(Vertex::at(outer1, color));
        vertices.push(Vertex::at(inner2, color));

        vertices.push(Vertex::at(inner2, color));
        vertices.push(Vertex::at(outer1, color));
        vertices.push(Vertex::at(outer2, color));
    }

    vertices
}

/// Fill a closed outline as a fan around `center`
///
/// The outline must be star-shaped around `center` (every skin outline is).
pub fn fan(center: Vec2, outline: &[Vec2], color: [f32; 4]) -> Vec<Vertex> {
    if outline.len() < 3 {
        return Vec::new();
    }
    let mut vertices = Vec::with_capacity(outline.len() * 3);
    for (i, &p) in outline.iter().enumerate() {
        let next = outline[(i + 1) % outline.len()];
        vertices.push(Vertex::at(center, color));
        vertices.push(Vertex::at(p, color));
        vertices.push(Vertex::at(next, color));
    }
    vertices
}
