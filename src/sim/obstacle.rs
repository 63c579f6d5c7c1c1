//! Obstacles scrolling toward the player

use serde::{Deserialize, Serialize};

use super::movement::PortalKind;
use super::rect::Rect;
use crate::consts::REWARD_PER_HEIGHT;

/// Obstacle types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    /// Changes mode/gravity on contact, never pays
    Portal(PortalKind),
    /// 60x60 block that can be stood on
    Platform,
    /// Free-standing block that can be stood on
    Floating,
    /// Plain block on the floor edge
    Normal,
    /// 30x30 cube-mode spike
    Spike,
    /// Ship-mode spike on the floor edge
    FloorSpike,
    /// Ship-mode spike hanging from y = 0
    CeilingSpike,
    /// Narrow high wall
    Tall,
}

/// What touching an obstacle can mean
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    Portal(PortalKind),
    Landable,
    Hazard,
}

impl ObstacleKind {
    pub fn contact(&self) -> Contact {
        match *self {
            ObstacleKind::Portal(portal) => Contact::Portal(portal),
            ObstacleKind::Platform | ObstacleKind::Floating => Contact::Landable,
            ObstacleKind::Normal
            | ObstacleKind::Spike
            | ObstacleKind::FloorSpike
            | ObstacleKind::CeilingSpike
            | ObstacleKind::Tall => Contact::Hazard,
        }
    }

    pub fn is_portal(&self) -> bool {
        matches!(self, ObstacleKind::Portal(_))
    }

    /// Base fill color
    pub fn color(&self) -> [f32; 4] {
        match self {
            ObstacleKind::Portal(PortalKind::Fly) => [0.0, 0.81, 0.82, 1.0], // Cyan
            ObstacleKind::Portal(PortalKind::Gravity) => [0.2, 0.8, 0.2, 1.0], // Lime
            ObstacleKind::Portal(PortalKind::Normal) => [1.0, 0.65, 0.0, 1.0], // Orange
            ObstacleKind::Platform => [1.0, 0.41, 0.71, 1.0],                  // Hot pink
            ObstacleKind::Floating => [1.0, 0.84, 0.0, 1.0],                   // Gold
            ObstacleKind::Normal => [1.0, 0.27, 0.27, 1.0],
            ObstacleKind::Spike | ObstacleKind::FloorSpike | ObstacleKind::CeilingSpike => {
                [1.0, 0.27, 0.0, 1.0] // Red orange
            }
            ObstacleKind::Tall => [0.54, 0.17, 0.89, 1.0], // Violet
        }
    }

    /// Reward for passing an obstacle of this kind and height
    pub fn reward_for_height(&self, height: f32) -> u32 {
        if self.is_portal() {
            return 0;
        }
        ((height * REWARD_PER_HEIGHT).floor() as u32).max(1)
    }
}

/// An obstacle entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub kind: ObstacleKind,
    pub rect: Rect,
    /// Cosmetic fill color
    pub color: [f32; 4],
    /// Currency paid when passed cleanly (0 for portals)
    pub value: u32,
    /// Crashed into or consumed as a portal; no further collision effects
    pub resolved: bool,
    /// Reward already attempted; never paid twice
    pub rewarded: bool,
}

impl Obstacle {
    pub fn new(kind: ObstacleKind, rect: Rect) -> Self {
        Self {
            kind,
            rect,
            color: kind.color(),
            value: kind.reward_for_height(rect.height),
            resolved: false,
            rewarded: false,
        }
    }

    /// Still owed a reward once it scrolls past the player
    pub fn pays_out(&self) -> bool {
        !self.resolved && !self.rewarded && !self.kind.is_portal()
    }

    /// Trailing edge is left of `x`
    pub fn has_passed(&self, x: f32) -> bool {
        self.rect.right() < x
    }

    /// Far enough off the left edge to drop
    pub fn is_offscreen(&self, margin: f32) -> bool {
        self.rect.right() < -margin
    }
}
