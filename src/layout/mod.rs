pub mod floating;
pub mod persist;

pub use floating::{ResizeEdge, apply_drag, apply_resize};

use crate::config::WmConfig;
use crate::geometry::{Geometry, Point, Size, Viewport};
use crate::window::LifecycleState;

/// Placement policy for a newly opened panel: cascade down-right from the
/// last-opened panel, wrapping back to the cascade origin once the new panel
/// would leave the viewport.
pub fn cascade_geometry(
    last_opened: Option<Point>,
    size: Size,
    viewport: Viewport,
    config: &WmConfig,
) -> Geometry {
    let origin = Point::new(config.cascade_origin, config.cascade_origin);
    let candidate = match last_opened {
        Some(last) => Point::new(
            last.x.saturating_add(config.cascade_offset),
            last.y.saturating_add(config.cascade_offset),
        ),
        None => origin,
    };
    let overflows = candidate.x.saturating_add(size.width) > viewport.width
        || candidate.y.saturating_add(size.height) > viewport.height;
    let position = if overflows { origin } else { candidate };
    Geometry { position, size }.fit_into(viewport, config.limits(), LifecycleState::Normal)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> WmConfig {
        WmConfig::default()
    }

    #[test]
    fn first_panel_starts_at_cascade_origin() {
        let c = config();
        let g = cascade_geometry(None, c.default_size(), Viewport::new(1600, 900), &c);
        assert_eq!(g.position, Point::new(c.cascade_origin, c.cascade_origin));
        assert_eq!(g.size, c.default_size());
    }

    #[test]
    fn subsequent_panels_step_by_offset() {
        let c = config();
        let g = cascade_geometry(
            Some(Point::new(100, 80)),
            c.default_size(),
            Viewport::new(1600, 900),
            &c,
        );
        assert_eq!(
            g.position,
            Point::new(100 + c.cascade_offset, 80 + c.cascade_offset)
        );
    }

    #[test]
    fn cascade_wraps_when_leaving_viewport() {
        let c = config();
        let viewport = Viewport::new(800, 600);
        let g = cascade_geometry(Some(Point::new(500, 300)), c.default_size(), viewport, &c);
        assert_eq!(g.position, Point::new(c.cascade_origin, c.cascade_origin));
    }

    #[test]
    fn oversized_request_is_clamped_into_small_viewport() {
        let c = config();
        let viewport = Viewport::new(300, 250);
        let g = cascade_geometry(None, Size::new(900, 900), viewport, &c);
        assert_eq!(g, Geometry::new(0, 0, 300, 250));
    }
}
