//! Shared crate-wide constants.
//!
//! Units are canvas units (CSS pixels for a browser host, scaled cells for the
//! terminal demo).

use std::time::Duration;

/// Narrowest a panel may become in any lifecycle state.
pub const MIN_WIDTH: i32 = 200;

/// Shortest a `Normal` panel may become.
pub const MIN_HEIGHT: i32 = 200;

/// Height of a minimized panel: only the title bar remains.
pub const MINIMIZED_HEIGHT: i32 = 40;

/// Vertical space reserved for the host's own chrome (menu bar, dock) when a
/// panel goes fullscreen. Fullscreen height is `viewport.height - FULLSCREEN_CHROME_OFFSET`.
pub const FULLSCREEN_CHROME_OFFSET: i32 = 40;

/// Offset applied to each newly opened panel relative to the last one opened.
pub const CASCADE_OFFSET: i32 = 30;

/// Origin of the first panel of a cascade.
pub const CASCADE_ORIGIN: i32 = 20;

/// Size given to panels opened without an explicit size.
pub const DEFAULT_WIDTH: i32 = 480;
pub const DEFAULT_HEIGHT: i32 = 360;

/// Minimum number of units a panel must keep within the viewport so the user
/// can grab its title bar again.
pub const MIN_VISIBLE_MARGIN: i32 = 40;

/// Length of the cosmetic acknowledgment pulse.
pub const PULSE_DURATION: Duration = Duration::from_millis(500);

/// Two header clicks within this window toggle fullscreen.
pub const DOUBLE_CLICK_WINDOW: Duration = Duration::from_millis(500);
