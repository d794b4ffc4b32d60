use thiserror::Error;

/// Rejected configuration values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("node size must be positive and finite, got {0}")]
    InvalidNodeSize(f32),
    #[error("node radius must be non-negative, got {0}")]
    InvalidNodeRadius(f32),
    #[error("view margin must be non-negative, got {0}")]
    InvalidViewMargin(f32),
    #[error("diagonal factor must be within [1, 2], got {0}")]
    InvalidDiagonalFactor(f32),
    #[error("shortcut distance factor must be non-negative, got {0}")]
    InvalidShortcutFactor(f32),
    #[error("clearance fraction must be within [0, 0.5), got {0}")]
    InvalidClearanceFraction(f32),
    #[error("iteration cap must be at least 1")]
    ZeroIterationCap,
    #[error("maximum path length must be at least 2, got {0}")]
    PathLengthTooShort(usize),
    #[error("world size must be positive and finite, got {0}")]
    InvalidWorldSize(f32),
    #[error("view size must be positive and finite, got {0}x{1}")]
    InvalidViewSize(f32, f32),
    #[error("camera speed must be non-negative and finite, got {0}")]
    InvalidCameraSpeed(f32),
    #[error("agent speed must be non-negative and finite, got {0}")]
    InvalidAgentSpeed(f32),
}
