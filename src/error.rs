//! Error types
//!
//! The simulation never fails a tick; these errors come from the edges
//! (currency collaborator, configuration input, GPU setup).

use thiserror::Error;

/// Failure to credit a reward through the currency collaborator
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RewardError {
    /// No currency collaborator is attached
    #[error("no currency collaborator is available")]
    Unavailable,
    /// The collaborator refused or failed the credit
    #[error("currency collaborator rejected the reward: {0}")]
    Rejected(String),
}

/// Invalid runner configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("malformed runner config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid runner config field `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// GPU setup failure
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("no compatible GPU adapter: {0}")]
    NoAdapter(#[from] wgpu::RequestAdapterError),
    #[error("failed to create GPU device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),
    #[error("failed to create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),
    #[error("surface reports no supported formats")]
    NoSurfaceFormat,
}
