//! Movement mode and gravity direction
//!
//! The runner is always in one of four `(Mode, Gravity)` combinations. The
//! only way to move between them is touching a portal; player input and
//! timers never change them.

use serde::{Deserialize, Serialize};

/// How the body moves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Mode {
    /// Ground-bound; jumps only when grounded
    #[default]
    Cube,
    /// Free flight; every activate is a flap, lighter gravity
    Ship,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Cube => "CUBE",
            Mode::Ship => "SHIP",
        }
    }
}

/// Which screen edge acts as the floor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Gravity {
    /// Falls toward the ground at the bottom of the screen
    #[default]
    Normal,
    /// Falls toward the top edge (y = 0)
    Inverted,
}

impl Gravity {
    /// Sign multiplier applied to acceleration and jump impulse
    #[inline]
    pub fn scale(&self) -> f32 {
        match self {
            Gravity::Normal => 1.0,
            Gravity::Inverted => -1.0,
        }
    }
}

/// The three portal flavours
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PortalKind {
    /// Switch to ship, gravity untouched
    Fly,
    /// Force inverted cube
    Gravity,
    /// Force normal cube
    Normal,
}

/// Current `(mode, gravity)` pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Movement {
    pub mode: Mode,
    pub gravity: Gravity,
}

impl Movement {
    pub const fn new(mode: Mode, gravity: Gravity) -> Self {
        Self { mode, gravity }
    }

    /// Apply a portal's transition. Portals force their target state, so
    /// entering one that matches the current state is still a transition.
    pub fn enter_portal(&mut self, portal: PortalKind) {
        match portal {
            PortalKind::Fly => self.mode = Mode::Ship,
            PortalKind::Gravity => {
                self.mode = Mode::Cube;
                self.gravity = Gravity::Inverted;
            }
            PortalKind::Normal => {
                self.mode = Mode::Cube;
                self.gravity = Gravity::Normal;
            }
        }
    }

    /// Short banner shown when a portal is taken
    pub fn banner(&self, portal: PortalKind) -> String {
        match portal {
            PortalKind::Fly => format!("{} MODE!", self.mode.as_str()),
            PortalKind::Gravity => "INVERTED!".to_string(),
            PortalKind::Normal => "NORMAL GRAVITY".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Movement; 4] = [
        Movement::new(Mode::Cube, Gravity::Normal),
        Movement::new(Mode::Cube, Gravity::Inverted),
        Movement::new(Mode::Ship, Gravity::Normal),
        Movement::new(Mode::Ship, Gravity::Inverted),
    ];

    #[test]
    fn test_initial_state() {
        let m = Movement::default();
        assert_eq!(m.mode, Mode::Cube);
        assert_eq!(m.gravity, Gravity::Normal);
        assert_eq!(m.gravity.scale(), 1.0);
    }

    #[test]
    fn test_fly_portal_keeps_gravity() {
        for start in ALL {
            let mut m = start;
            m.enter_portal(PortalKind::Fly);
            assert_eq!(m.mode, Mode::Ship);
            assert_eq!(m.gravity, start.gravity);
        }
    }

    #[test]
    fn test_gravity_portals_force_cube() {
        for start in ALL {
            let mut m = start;
            m.enter_portal(PortalKind::Gravity);
            assert_eq!(m, Movement::new(Mode::Cube, Gravity::Inverted));

            let mut m = start;
            m.enter_portal(PortalKind::Normal);
            assert_eq!(m, Movement::new(Mode::Cube, Gravity::Normal));
        }
    }

    #[test]
    fn test_banner() {
        let mut m = Movement::default();
        m.enter_portal(PortalKind::Fly);
        assert_eq!(m.banner(PortalKind::Fly), "SHIP MODE!");
        assert_eq!(m.banner(PortalKind::Gravity), "INVERTED!");
    }
}
