//! Error taxonomy for the panel manager and file router.
//!
//! None of these are fatal. Manager operations return them so callers can
//! observe a rejection, but ignoring the result is always safe: a rejected
//! operation leaves the model exactly as it was.

use thiserror::Error;

use crate::window::{LifecycleState, PanelId};

#[derive(Debug, Error)]
pub enum WmError {
    #[error("{operation} is not allowed on panel {panel} while {state:?}")]
    InvalidTransition {
        panel: PanelId,
        operation: &'static str,
        state: LifecycleState,
    },

    #[error("no renderer registered for panel type {0:?}")]
    UnknownPanelType(String),

    #[error("file classifier failed: {0}")]
    ClassificationFailure(String),

    #[error("geometry {width}x{height} violates the minimum size for a {state:?} panel")]
    GeometryConstraintViolation {
        width: i32,
        height: i32,
        state: LifecycleState,
    },

    #[error("panel {0} has been removed")]
    OperationOnRemovedPanel(PanelId),

    #[error("layout i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("layout serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}
