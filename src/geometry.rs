//! Pure geometry values: positions, sizes and the clamping rules that keep a
//! panel within its minimums.

use serde::{Deserialize, Serialize};

use crate::constants::{MIN_HEIGHT, MIN_WIDTH, MINIMIZED_HEIGHT};
use crate::error::WmError;
use crate::window::LifecycleState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Component-wise `self - origin`.
    pub fn delta_from(self, origin: Point) -> Delta {
        Delta {
            dx: self.x.saturating_sub(origin.x),
            dy: self.y.saturating_sub(origin.y),
        }
    }

    pub fn offset(self, delta: Delta) -> Point {
        Point {
            x: self.x.saturating_add(delta.dx),
            y: self.y.saturating_add(delta.dy),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Delta {
    pub dx: i32,
    pub dy: i32,
}

/// The extent of the canvas panels live in. Origin is always `(0, 0)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: i32,
    pub height: i32,
}

impl Viewport {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

/// Minimum-size policy consulted by [`Geometry::clamp_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    pub min_width: i32,
    pub min_height: i32,
    pub minimized_height: i32,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            min_width: MIN_WIDTH,
            min_height: MIN_HEIGHT,
            minimized_height: MINIMIZED_HEIGHT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Geometry {
    pub position: Point,
    pub size: Size,
}

impl Geometry {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            position: Point::new(x, y),
            size: Size::new(width, height),
        }
    }

    pub fn with_position(self, position: Point) -> Self {
        Self { position, ..self }
    }

    pub fn with_size(self, size: Size) -> Self {
        Self { size, ..self }
    }

    pub fn right(&self) -> i32 {
        self.position.x.saturating_add(self.size.width)
    }

    pub fn bottom(&self) -> i32 {
        self.position.y.saturating_add(self.size.height)
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.position.x
            && point.x < self.right()
            && point.y >= self.position.y
            && point.y < self.bottom()
    }

    /// Enforce the crate-wide minimums for `state`.
    pub fn clamp_to_minimums(self, state: LifecycleState) -> Self {
        self.clamp_with(Limits::default(), state)
    }

    pub fn clamp_with(self, limits: Limits, state: LifecycleState) -> Self {
        let width = self.size.width.max(limits.min_width);
        let height = match state {
            LifecycleState::Minimized => limits.minimized_height,
            LifecycleState::Normal | LifecycleState::Fullscreen => {
                self.size.height.max(limits.min_height)
            }
        };
        self.with_size(Size::new(width, height))
    }

    pub fn check_minimums(&self, limits: Limits, state: LifecycleState) -> Result<(), WmError> {
        if self.clamp_with(limits, state) == *self {
            Ok(())
        } else {
            Err(WmError::GeometryConstraintViolation {
                width: self.size.width,
                height: self.size.height,
                state,
            })
        }
    }

    /// Pull the geometry back so at least `margin` units of it stay inside
    /// `viewport` and its top edge (the title bar) is never above the canvas.
    pub fn clamp_into(self, viewport: Viewport, margin: i32) -> Self {
        let min_x = margin.saturating_sub(self.size.width);
        let max_x = viewport.width.saturating_sub(margin).max(min_x);
        let max_y = viewport.height.saturating_sub(margin).max(0);
        self.with_position(Point::new(
            self.position.x.clamp(min_x, max_x),
            self.position.y.clamp(0, max_y),
        ))
    }

    /// Fit the whole geometry inside `viewport` where the minimums allow it.
    pub fn fit_into(self, viewport: Viewport, limits: Limits, state: LifecycleState) -> Self {
        let shrunk = self.with_size(Size::new(
            self.size.width.min(viewport.width),
            self.size.height.min(viewport.height),
        ));
        let sized = shrunk.clamp_with(limits, state);
        let max_x = viewport.width.saturating_sub(sized.size.width).max(0);
        let max_y = viewport.height.saturating_sub(sized.size.height).max(0);
        sized.with_position(Point::new(
            sized.position.x.clamp(0, max_x),
            sized.position.y.clamp(0, max_y),
        ))
    }
}
