//! The runner's body: vertical kinematics only, x never changes

use serde::{Deserialize, Serialize};

use super::movement::{Gravity, Mode, Movement};
use super::rect::Rect;
use crate::config::RunnerConfig;
use crate::consts::SHIP_GRAVITY_FACTOR;

/// The player body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerBody {
    pub x: f32,
    pub y: f32,
    /// Vertical velocity (positive = down the screen)
    pub vy: f32,
    pub width: f32,
    pub height: f32,
    /// Standing on a floor or platform (cube mode only)
    pub is_grounded: bool,
    /// `y` before the last integration step, used to tell landings from crashes
    pub prev_y: f32,
    /// Cosmetic skin, never read by physics
    pub skin_index: i32,
}

impl PlayerBody {
    /// A body resting on the normal-gravity floor
    pub fn new(config: &RunnerConfig, ground_level: f32) -> Self {
        let y = ground_level - config.player_height;
        Self {
            x: config.player_x,
            y,
            vy: 0.0,
            width: config.player_width,
            height: config.player_height,
            is_grounded: true,
            prev_y: y,
            skin_index: 0,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// Jump (cube, grounded only) or flap (ship, always)
    ///
    /// Returns true if the impulse was applied.
    pub fn jump(&mut self, movement: Movement, impulse: f32) -> bool {
        match movement.mode {
            Mode::Ship => {
                self.vy = -impulse * movement.gravity.scale();
                true
            }
            Mode::Cube if self.is_grounded => {
                self.vy = -impulse * movement.gravity.scale();
                self.is_grounded = false;
                true
            }
            Mode::Cube => false,
        }
    }

    /// Integrate velocity and position for one step
    ///
    /// Grounding is dropped here and re-established by the bound clamp or a
    /// landing, so stepping off a platform leaves the body airborne.
    pub fn apply_gravity(&mut self, config: &RunnerConfig, movement: Movement, dt: f32) {
        self.prev_y = self.y;
        self.is_grounded = false;

        let scale = movement.gravity.scale();
        match movement.mode {
            Mode::Cube => {
                self.vy += config.gravity * scale * dt;
            }
            Mode::Ship => {
                self.vy += config.gravity * SHIP_GRAVITY_FACTOR * scale * dt;
                self.vy = self.vy.clamp(-config.ship_max_speed, config.ship_max_speed);
            }
        }
        self.y += self.vy * dt;
    }

    /// Keep the body between the top edge and the ground
    ///
    /// The gravity-side edge is the floor (lands the cube, the ship slides on
    /// it); the opposite edge is a ceiling that just stops the body.
    pub fn clamp_to_world_bounds(&mut self, ground_level: f32, movement: Movement) {
        let lowest = ground_level - self.height;
        let lands = movement.mode == Mode::Cube;

        match movement.gravity {
            Gravity::Normal => {
                if self.y >= lowest {
                    self.y = lowest;
                    self.vy = 0.0;
                    self.is_grounded |= lands;
                }
                if self.y < 0.0 {
                    self.y = 0.0;
                    self.vy = 0.0;
                }
            }
            Gravity::Inverted => {
                if self.y <= 0.0 {
                    self.y = 0.0;
                    self.vy = 0.0;
                    self.is_grounded |= lands;
                }
                if self.y >= lowest {
                    self.y = lowest;
                    self.vy = 0.0;
                }
            }
        }
    }

    /// Rest on a surface at `y`
    pub fn land_at(&mut self, y: f32) {
        self.y = y;
        self.vy = 0.0;
        self.is_grounded = true;
    }

    /// Mode/gravity transitions start from rest, airborne
    pub fn reset_motion(&mut self) {
        self.vy = 0.0;
        self.is_grounded = false;
    }
}
