use serde::{Deserialize, Serialize};

use crate::geometry::{Delta, Geometry, Limits, Point, Size};
use crate::window::LifecycleState;

/// The edge or corner a resize session was started from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResizeEdge {
    Left,
    Right,
    Top,
    Bottom,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl ResizeEdge {
    pub fn moves_left(self) -> bool {
        matches!(
            self,
            ResizeEdge::Left | ResizeEdge::TopLeft | ResizeEdge::BottomLeft
        )
    }

    pub fn moves_right(self) -> bool {
        matches!(
            self,
            ResizeEdge::Right | ResizeEdge::TopRight | ResizeEdge::BottomRight
        )
    }

    pub fn moves_top(self) -> bool {
        matches!(
            self,
            ResizeEdge::Top | ResizeEdge::TopLeft | ResizeEdge::TopRight
        )
    }

    pub fn moves_bottom(self) -> bool {
        matches!(
            self,
            ResizeEdge::Bottom | ResizeEdge::BottomLeft | ResizeEdge::BottomRight
        )
    }
}

/// Translate `start` by `delta`. Size is untouched.
pub fn apply_drag(start: Geometry, delta: Delta) -> Geometry {
    start.with_position(start.position.offset(delta))
}

/// Resize `start` from `edge` by the pointer `delta`.
///
/// Left/top edges move the origin and shrink the size; right/bottom edges only
/// grow the size. When the result is clamped to the minimums from a left/top
/// edge, the opposite edge stays where it was.
pub fn apply_resize(
    start: Geometry,
    edge: ResizeEdge,
    delta: Delta,
    limits: Limits,
    state: LifecycleState,
) -> Geometry {
    let mut x = start.position.x;
    let mut y = start.position.y;
    let mut width = start.size.width;
    let mut height = start.size.height;

    if edge.moves_left() {
        x = x.saturating_add(delta.dx);
        width = width.saturating_sub(delta.dx);
    } else if edge.moves_right() {
        width = width.saturating_add(delta.dx);
    }
    if edge.moves_top() {
        y = y.saturating_add(delta.dy);
        height = height.saturating_sub(delta.dy);
    } else if edge.moves_bottom() {
        height = height.saturating_add(delta.dy);
    }

    let raw = Geometry {
        position: Point::new(x, y),
        size: Size::new(width, height),
    };
    let clamped = raw.clamp_with(limits, state);
    let mut position = clamped.position;
    if edge.moves_left() {
        position.x = start.right().saturating_sub(clamped.size.width);
    }
    if edge.moves_top() {
        position.y = start.bottom().saturating_sub(clamped.size.height);
    }
    clamped.with_position(position)
}
