use std::time::Instant;

use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use ratatui::prelude::Rect;

use super::{CellScale, PanelHit, hit_test};
use crate::window::{ContentHost, PanelId, PanelManager};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Grab {
    Drag(PanelId),
    Resize(PanelId),
}

/// Translates terminal mouse events into panel manager operations.
#[derive(Debug, Default)]
pub struct MouseController {
    scale: CellScale,
    grab: Option<Grab>,
}

impl MouseController {
    pub fn new(scale: CellScale) -> Self {
        Self { scale, grab: None }
    }

    pub fn scale(&self) -> CellScale {
        self.scale
    }

    /// Topmost panel whose cells contain the pointer.
    fn panel_at<H: ContentHost>(
        &self,
        wm: &PanelManager<H>,
        area: Rect,
        column: u16,
        row: u16,
    ) -> Option<(PanelId, PanelHit)> {
        wm.stacking_order().into_iter().rev().find_map(|id| {
            let geometry = wm.live_geometry(id)?;
            let rect = self.scale.to_cells(area, geometry)?;
            hit_test(rect, column, row).map(|hit| (id, hit))
        })
    }

    /// Returns whether the event was consumed.
    pub fn handle<H: ContentHost>(
        &mut self,
        wm: &mut PanelManager<H>,
        area: Rect,
        mouse: MouseEvent,
        now: Instant,
    ) -> bool {
        let pointer = self.scale.to_canvas(area, mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some(stale) = self.grab.take() {
                    let (Grab::Drag(id) | Grab::Resize(id)) = stale;
                    wm.cancel_session(id);
                }
                let Some((id, hit)) = self.panel_at(wm, area, mouse.column, mouse.row) else {
                    return false;
                };
                let _ = match hit {
                    PanelHit::Close => wm.close_panel(id),
                    PanelHit::Minimize => wm.toggle_minimize(id),
                    PanelHit::Fullscreen => wm.toggle_fullscreen(id),
                    PanelHit::Header => match wm.header_clicked(id, now) {
                        Ok(false) => wm.begin_drag(id, pointer).map(|()| {
                            self.grab = Some(Grab::Drag(id));
                        }),
                        other => other.map(|_| ()),
                    },
                    PanelHit::Resize(edge) => wm.begin_resize(id, edge, pointer).map(|()| {
                        self.grab = Some(Grab::Resize(id));
                    }),
                    PanelHit::Body => wm.focus(id),
                };
                true
            }
            MouseEventKind::Drag(MouseButton::Left) => match self.grab {
                Some(Grab::Drag(id)) => {
                    let _ = wm.update_drag(id, pointer);
                    true
                }
                Some(Grab::Resize(id)) => {
                    let _ = wm.update_resize(id, pointer);
                    true
                }
                None => false,
            },
            MouseEventKind::Up(MouseButton::Left) => match self.grab.take() {
                Some(Grab::Drag(id)) => {
                    let _ = wm.end_drag(id, pointer);
                    true
                }
                Some(Grab::Resize(id)) => {
                    let _ = wm.end_resize(id, pointer);
                    true
                }
                None => false,
            },
            _ => false,
        }
    }

    /// Abandon whatever the pointer was holding, e.g. when the terminal loses
    /// focus mid-drag.
    pub fn release(&mut self, wm: &mut PanelManager<impl ContentHost>) {
        if let Some(Grab::Drag(id) | Grab::Resize(id)) = self.grab.take() {
            wm.cancel_session(id);
        }
    }
}
