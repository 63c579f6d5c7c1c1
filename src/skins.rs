//! Cosmetic player skins
//!
//! A skin is a color plus an outline fitted to the player's box. Physics never
//! looks at it; out-of-range indices fall back to the first skin.

use std::f32::consts::{PI, TAU};

use glam::Vec2;

use crate::sim::Rect;

/// Outline family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkinShape {
    Triangle,
    Square,
    Circle,
    Diamond,
    Star,
    Pentagon,
    Hexagon,
    Arrow,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Skin {
    pub name: &'static str,
    pub color: [f32; 4],
    pub shape: SkinShape,
}

/// `0xRRGGBB` to linear-ish RGBA
const fn rgb(hex: u32) -> [f32; 4] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
        1.0,
    ]
}

pub const SKINS: [Skin; 8] = [
    Skin {
        name: "Triangle",
        color: rgb(0x00CED1),
        shape: SkinShape::Triangle,
    },
    Skin {
        name: "Square",
        color: rgb(0xFF69B4),
        shape: SkinShape::Square,
    },
    Skin {
        name: "Circle",
        color: rgb(0xFFD700),
        shape: SkinShape::Circle,
    },
    Skin {
        name: "Diamond",
        color: rgb(0x9370DB),
        shape: SkinShape::Diamond,
    },
    Skin {
        name: "Star",
        color: rgb(0xFF4500),
        shape: SkinShape::Star,
    },
    Skin {
        name: "Pentagon",
        color: rgb(0x32CD32),
        shape: SkinShape::Pentagon,
    },
    Skin {
        name: "Hexagon",
        color: rgb(0xFF1493),
        shape: SkinShape::Hexagon,
    },
    Skin {
        name: "Arrow",
        color: rgb(0x00BFFF),
        shape: SkinShape::Arrow,
    },
];

const CIRCLE_SEGMENTS: usize = 24;

/// Skin for a selected index, falling back to the first for anything unknown
pub fn skin_for(index: i32) -> &'static Skin {
    usize::try_from(index)
        .ok()
        .and_then(|i| SKINS.get(i))
        .unwrap_or(&SKINS[0])
}

impl SkinShape {
    /// Closed outline inside `rect`, in drawing order
    ///
    /// Every outline is star-shaped around the box center, so it can be
    /// filled as a triangle fan from there.
    pub fn outline(&self, rect: Rect) -> Vec<Vec2> {
        let (x, y, w, h) = (rect.x, rect.y, rect.width, rect.height);
        let c = rect.center();
        let r = w / 2.0;

        match self {
            SkinShape::Triangle => vec![
                Vec2::new(x, y + h),
                Vec2::new(c.x, y),
                Vec2::new(x + w, y + h),
            ],
            SkinShape::Square => vec![
                Vec2::new(x, y),
                Vec2::new(x + w, y),
                Vec2::new(x + w, y + h),
                Vec2::new(x, y + h),
            ],
            SkinShape::Circle => regular(c, r, CIRCLE_SEGMENTS, 0.0),
            SkinShape::Diamond => vec![
                Vec2::new(c.x, y),
                Vec2::new(x + w, c.y),
                Vec2::new(c.x, y + h),
                Vec2::new(x, c.y),
            ],
            SkinShape::Star => (0..10)
                .map(|i| {
                    let radius = if i % 2 == 0 { r } else { r / 2.0 };
                    let angle = PI / 5.0 * i as f32 - PI / 2.0;
                    c + Vec2::from_angle(angle) * radius
                })
                .collect(),
            SkinShape::Pentagon => regular(c, r, 5, -PI / 2.0),
            SkinShape::Hexagon => regular(c, r, 6, 0.0),
            SkinShape::Arrow => vec![
                Vec2::new(x + w, c.y),
                Vec2::new(x + w / 2.0, y),
                Vec2::new(x + w / 2.0, y + h / 3.0),
                Vec2::new(x, y + h / 3.0),
                Vec2::new(x, y + h * 2.0 / 3.0),
                Vec2::new(x + w / 2.0, y + h * 2.0 / 3.0),
                Vec2::new(x + w / 2.0, y + h),
            ],
        }
    }
}

fn regular(center: Vec2, radius: f32, sides: usize, start: f32) -> Vec<Vec2> {
    (0..sides)
        .map(|i| center + Vec2::from_angle(start + TAU * i as f32 / sides as f32) * radius)
        .collect()
}
