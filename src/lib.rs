//! A panel window manager for a single canvas.
//!
//! [`window::PanelManager`] owns every panel's geometry, stacking and
//! Normal/Minimized/Fullscreen lifecycle, and turns pointer sessions into
//! committed geometry. [`router`] decides which panel type a dropped file
//! opens in.

pub mod config;
pub mod constants;
pub mod error;
pub mod geometry;
pub mod layout;
pub mod router;
pub mod term;
pub mod tracing_sub;
pub mod window;

pub use config::WmConfig;
pub use error::WmError;
pub use geometry::{Geometry, Point, Size, Viewport};
pub use router::{DropDispatcher, DroppedFile, FileCategory, FileRouter, PanelContent};
pub use window::{LifecycleState, PanelId, PanelKind, PanelManager};
