//! Pointer-driven drag and resize sessions.
//!
//! A session only ever produces presentation geometry. The committed panel
//! geometry changes once, when the owning manager ends the session.

use crate::geometry::{Delta, Geometry, Limits, Point};
use crate::layout::{ResizeEdge, apply_drag, apply_resize};

use super::{LifecycleState, PanelId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionKind {
    Drag,
    Resize(ResizeEdge),
}

#[derive(Debug, Clone, Copy)]
pub struct Session {
    pub panel: PanelId,
    pub kind: SessionKind,
    pub origin_pointer: Point,
    pub origin_geometry: Geometry,
    pub live_delta: Delta,
}

impl Session {
    pub fn new(panel: PanelId, kind: SessionKind, pointer: Point, origin: Geometry) -> Self {
        Self {
            panel,
            kind,
            origin_pointer: pointer,
            origin_geometry: origin,
            live_delta: Delta::default(),
        }
    }

    pub fn is_drag(&self) -> bool {
        self.kind == SessionKind::Drag
    }

    pub fn track(&mut self, pointer: Point) {
        self.live_delta = pointer.delta_from(self.origin_pointer);
    }

    /// Geometry the renderer should draw for the current pointer position.
    pub fn live_geometry(&self, limits: Limits, state: LifecycleState) -> Geometry {
        match self.kind {
            SessionKind::Drag => apply_drag(self.origin_geometry, self.live_delta),
            SessionKind::Resize(edge) => {
                apply_resize(self.origin_geometry, edge, self.live_delta, limits, state)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn track_is_relative_to_origin_pointer() {
        let origin = Geometry::new(10, 10, 300, 300);
        let mut session = Session::new(
            PanelId::from_raw(1),
            SessionKind::Drag,
            Point::new(50, 20),
            origin,
        );
        session.track(Point::new(70, 5));
        session.track(Point::new(60, 25));
        assert_eq!(session.live_delta, Delta { dx: 10, dy: 5 });
        assert_eq!(
            session.live_geometry(Limits::default(), LifecycleState::Normal),
            Geometry::new(20, 15, 300, 300)
        );
        assert_eq!(session.origin_geometry, origin);
    }
}
