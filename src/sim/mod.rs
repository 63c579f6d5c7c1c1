//! Deterministic simulation module
//!
//! All runner logic lives here. This module must stay pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Obstacles processed in spawn order
//! - No rendering or platform dependencies

pub mod collision;
pub mod movement;
pub mod obstacle;
pub mod player;
pub mod rect;
pub mod reward;
pub mod session;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{CollisionOutcome, resolve_collision};
pub use movement::{Gravity, Mode, Movement, PortalKind};
pub use obstacle::{Contact, Obstacle, ObstacleKind};
pub use player::PlayerBody;
pub use rect::Rect;
pub use reward::{RewardSink, Wallet};
pub use session::{RunnerSession, SessionCommand, SessionHandle, SessionPhase};
pub use spawn::{SpawnContext, select_kind, spawn_obstacle};
pub use state::{RunnerEvent, RunnerState, Viewport};
pub use tick::{TickInput, tick};
