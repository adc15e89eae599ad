//! Terminal front-end helpers: mapping canvas units onto terminal cells and
//! hit-testing panel chrome.
//!
//! The panel model works in canvas units; one terminal cell covers
//! `CellScale::x` by `CellScale::y` units.

pub mod mouse;

use ratatui::prelude::Rect;

use crate::geometry::{Geometry, Point, Viewport};
use crate::layout::ResizeEdge;

pub use mouse::MouseController;

/// Width of each title-bar button, in cells.
pub const BUTTON_WIDTH: u16 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellScale {
    pub x: i32,
    pub y: i32,
}

impl Default for CellScale {
    fn default() -> Self {
        // roughly the aspect ratio of a terminal cell
        Self { x: 10, y: 20 }
    }
}

impl CellScale {
    pub fn viewport(&self, area: Rect) -> Viewport {
        Viewport::new(
            i32::from(area.width) * self.x,
            i32::from(area.height) * self.y,
        )
    }

    /// Canvas point at the top-left of a cell, relative to `area`.
    pub fn to_canvas(&self, area: Rect, column: u16, row: u16) -> Point {
        Point::new(
            (i32::from(column) - i32::from(area.x)) * self.x,
            (i32::from(row) - i32::from(area.y)) * self.y,
        )
    }

    /// Cells covered by `geometry`, clipped to `area`. `None` when nothing is
    /// visible.
    pub fn to_cells(&self, area: Rect, geometry: Geometry) -> Option<Rect> {
        let left = i32::from(area.x) + geometry.position.x.div_euclid(self.x);
        let top = i32::from(area.y) + geometry.position.y.div_euclid(self.y);
        let right = left + (geometry.size.width / self.x).max(1);
        let bottom = top + (geometry.size.height / self.y).max(1);
        let clip_left = left.max(i32::from(area.x));
        let clip_top = top.max(i32::from(area.y));
        let clip_right = right.min(i32::from(area.x) + i32::from(area.width));
        let clip_bottom = bottom.min(i32::from(area.y) + i32::from(area.height));
        if clip_right <= clip_left || clip_bottom <= clip_top {
            return None;
        }
        Some(Rect {
            x: clip_left as u16,
            y: clip_top as u16,
            width: (clip_right - clip_left) as u16,
            height: (clip_bottom - clip_top) as u16,
        })
    }
}

/// What a pointer press on a panel's cells lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelHit {
    Minimize,
    Fullscreen,
    Close,
    Header,
    Resize(ResizeEdge),
    Body,
}

/// Title-bar buttons sit at the right end of the header: `[-][+][x]`.
pub fn hit_test(rect: Rect, column: u16, row: u16) -> Option<PanelHit> {
    if rect.width == 0 || rect.height == 0 {
        return None;
    }
    let right = rect.x.saturating_add(rect.width.saturating_sub(1));
    let bottom = rect.y.saturating_add(rect.height.saturating_sub(1));
    if column < rect.x || column > right || row < rect.y || row > bottom {
        return None;
    }
    if row == rect.y {
        let from_right = right.saturating_sub(column);
        if rect.width > BUTTON_WIDTH * 3 + 2 && from_right >= 1 {
            return Some(match (from_right - 1) / BUTTON_WIDTH {
                0 => PanelHit::Close,
                1 => PanelHit::Fullscreen,
                2 => PanelHit::Minimize,
                _ => PanelHit::Header,
            });
        }
        return Some(PanelHit::Header);
    }
    let edge = match (column == rect.x, column == right, row == bottom) {
        (true, _, true) => Some(ResizeEdge::BottomLeft),
        (_, true, true) => Some(ResizeEdge::BottomRight),
        (true, _, false) => Some(ResizeEdge::Left),
        (_, true, false) => Some(ResizeEdge::Right),
        (false, false, true) => Some(ResizeEdge::Bottom),
        (false, false, false) => None,
    };
    Some(edge.map_or(PanelHit::Body, PanelHit::Resize))
}
