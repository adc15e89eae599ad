use std::collections::BTreeMap;
use std::time::Instant;

use super::pulse::{Pulse, PulseReason, PulseTracker};
use super::session::{Session, SessionKind};
use super::z_order::{FocusRing, ZOrder};
use super::{LifecycleState, Panel, PanelId, PanelKind};
use crate::config::WmConfig;
use crate::error::WmError;
use crate::geometry::{Geometry, Point, Size, Viewport};
use crate::layout::ResizeEdge;
use crate::layout::cascade_geometry;
use crate::layout::persist::{LayoutRecord, LayoutSnapshot};
use crate::router::{PanelContent, PanelRequest};

/// Largest id a restored layout may keep. Higher ids are remapped so fresh
/// allocation never runs out of ids.
pub const MAX_RESTORED_ID: u64 = u32::MAX as u64;

/// The rendering collaborator that owns whatever is drawn inside a panel.
///
/// The manager never looks inside a handle: it hands it to `mount` when a
/// panel opens and gives ownership back through `unmount` when it closes.
pub trait ContentHost {
    type Handle;

    fn mount(&mut self, id: PanelId, handle: &Self::Handle);
    fn unmount(&mut self, id: PanelId, handle: Self::Handle);
}

/// A host that renders nothing. Handles are unit values.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullHost;

impl ContentHost for NullHost {
    type Handle = ();

    fn mount(&mut self, _id: PanelId, _handle: &()) {}
    fn unmount(&mut self, _id: PanelId, _handle: ()) {}
}

/// Result of applying a routed [`PanelRequest`].
#[derive(Debug)]
pub struct OpenedPanel {
    pub id: PanelId,
    /// Non-fatal problem worth showing the user, e.g. an unknown panel type
    /// that was opened as notes instead.
    pub notice: Option<WmError>,
}

/// Owns every open panel and funnels all geometry, lifecycle and stacking
/// changes through one place.
pub struct PanelManager<H: ContentHost> {
    host: H,
    config: WmConfig,
    viewport: Viewport,
    panels: BTreeMap<PanelId, Panel<H::Handle>>,
    sessions: BTreeMap<PanelId, Session>,
    z_order: ZOrder,
    pulses: PulseTracker,
    next_id: u64,
    last_opened: Option<PanelId>,
    last_header_click: Option<(PanelId, Instant)>,
}

impl<H: ContentHost> PanelManager<H> {
    pub fn new(host: H, viewport: Viewport) -> Self {
        Self::with_config(host, viewport, WmConfig::default())
    }

    pub fn with_config(host: H, viewport: Viewport, config: WmConfig) -> Self {
        Self {
            host,
            config,
            viewport,
            panels: BTreeMap::new(),
            sessions: BTreeMap::new(),
            z_order: ZOrder::new(),
            pulses: PulseTracker::new(config.pulse_duration()),
            next_id: 1,
            last_opened: None,
            last_header_click: None,
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn config(&self) -> &WmConfig {
        &self.config
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn len(&self) -> usize {
        self.panels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }

    pub fn contains(&self, id: PanelId) -> bool {
        self.panels.contains_key(&id)
    }

    pub fn panel(&self, id: PanelId) -> Option<&Panel<H::Handle>> {
        self.panels.get(&id)
    }

    /// Panels in creation order.
    pub fn panels(&self) -> impl Iterator<Item = &Panel<H::Handle>> {
        self.panels.values()
    }

    fn panel_mut(&mut self, id: PanelId) -> Result<&mut Panel<H::Handle>, WmError> {
        match self.panels.get_mut(&id) {
            Some(panel) => Ok(panel),
            None => {
                tracing::debug!(panel = %id, "operation on removed panel ignored");
                Err(WmError::OperationOnRemovedPanel(id))
            }
        }
    }

    fn state_of(&self, id: PanelId) -> Result<LifecycleState, WmError> {
        match self.panels.get(&id) {
            Some(panel) => Ok(panel.state),
            None => {
                tracing::debug!(panel = %id, "operation on removed panel ignored");
                Err(WmError::OperationOnRemovedPanel(id))
            }
        }
    }

    fn allocate_id(&mut self) -> PanelId {
        let id = PanelId::from_raw(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        id
    }

    /// A panel displaced from an occupied slot is released like a closed one.
    fn insert_panel(&mut self, panel: Panel<H::Handle>) {
        let id = panel.id;
        if let Some(displaced) = self.panels.insert(id, panel) {
            tracing::error!(panel = %id, "panel id reused; releasing displaced content");
            self.host.unmount(id, displaced.content);
        }
    }

    fn reject(id: PanelId, operation: &'static str, state: LifecycleState) -> WmError {
        tracing::debug!(panel = %id, operation, ?state, "transition rejected");
        WmError::InvalidTransition {
            panel: id,
            operation,
            state,
        }
    }

    // ---- creation / removal -------------------------------------------------

    /// Open a panel with cascaded default geometry and bring it to the front.
    pub fn open_panel(
        &mut self,
        kind: PanelKind,
        title: impl Into<String>,
        content: H::Handle,
    ) -> PanelId {
        let id = self.allocate_id();
        let last = self
            .last_opened
            .and_then(|prev| self.panels.get(&prev))
            .map(|prev| prev.position());
        let geometry =
            cascade_geometry(last, self.config.default_size(), self.viewport, &self.config);
        self.host.mount(id, &content);
        self.insert_panel(Panel::new(id, kind, title.into(), content, geometry));
        self.last_opened = Some(id);
        self.raise(id);
        tracing::debug!(panel = %id, %kind, ?geometry, "opened panel");
        id
    }

    /// Apply a routed file drop. Always opens exactly one panel.
    pub fn open_requested(&mut self, request: PanelRequest) -> OpenedPanel
    where
        H::Handle: From<PanelContent>,
    {
        let PanelRequest {
            kind,
            title,
            content,
            notice,
        } = request;
        if let Some(notice) = &notice {
            tracing::warn!(%notice, %kind, "opening dropped file with fallback panel");
        }
        let id = self.open_panel(kind, title, content.into());
        OpenedPanel { id, notice }
    }

    /// Remove a panel from any state and hand its content back to the host.
    pub fn close_panel(&mut self, id: PanelId) -> Result<(), WmError> {
        let Some(panel) = self.panels.remove(&id) else {
            tracing::debug!(panel = %id, "close on removed panel ignored");
            return Err(WmError::OperationOnRemovedPanel(id));
        };
        self.sessions.remove(&id);
        self.pulses.cancel(id);
        if self.last_header_click.is_some_and(|(prev, _)| prev == id) {
            self.last_header_click = None;
        }
        tracing::debug!(panel = %id, state = ?panel.state, "closing panel");
        self.host.unmount(id, panel.content);
        Ok(())
    }

    /// Clear every `is_new` flag once the renderer has played entrance
    /// animations.
    pub fn finish_render_cycle(&mut self) {
        for panel in self.panels.values_mut() {
            panel.is_new = false;
        }
    }

    // ---- lifecycle ----------------------------------------------------------

    pub fn minimize(&mut self, id: PanelId) -> Result<(), WmError> {
        match self.state_of(id)? {
            LifecycleState::Minimized => {
                return Err(Self::reject(id, "minimize", LifecycleState::Minimized));
            }
            LifecycleState::Fullscreen => self.exit_fullscreen(id)?,
            LifecycleState::Normal => {}
        }
        self.cancel_session(id);
        let limits = self.config.limits();
        let panel = self.panel_mut(id)?;
        panel.minimized_from = Some(panel.geometry.size.height);
        panel.geometry = panel.geometry.clamp_with(limits, LifecycleState::Minimized);
        panel.state = LifecycleState::Minimized;
        self.pulses.cancel(id);
        tracing::debug!(panel = %id, "minimized");
        Ok(())
    }

    pub fn restore(&mut self, id: PanelId) -> Result<(), WmError> {
        let state = self.state_of(id)?;
        if state != LifecycleState::Minimized {
            return Err(Self::reject(id, "restore", state));
        }
        self.cancel_session(id);
        let limits = self.config.limits();
        let panel = self.panel_mut(id)?;
        let height = panel.minimized_from.take().unwrap_or(limits.min_height);
        panel.geometry = panel
            .geometry
            .with_size(Size::new(panel.geometry.size.width, height))
            .clamp_with(limits, LifecycleState::Normal);
        panel.state = LifecycleState::Normal;
        let geometry = panel.geometry;
        self.pulses.cancel(id);
        tracing::debug!(panel = %id, ?geometry, "restored from minimized");
        Ok(())
    }

    pub fn toggle_minimize(&mut self, id: PanelId) -> Result<(), WmError> {
        if self.state_of(id)? == LifecycleState::Minimized {
            self.restore(id)
        } else {
            self.minimize(id)
        }
    }

    fn fullscreen_geometry(&self) -> Geometry {
        Geometry::new(
            0,
            0,
            self.viewport.width,
            self.viewport.height.saturating_sub(self.config.chrome_offset),
        )
        .clamp_with(self.config.limits(), LifecycleState::Fullscreen)
    }

    /// Snapshot the current geometry and fill the viewport. A minimized panel
    /// is restored first.
    pub fn enter_fullscreen(&mut self, id: PanelId) -> Result<(), WmError> {
        match self.state_of(id)? {
            LifecycleState::Fullscreen => {
                return Err(Self::reject(id, "enter_fullscreen", LifecycleState::Fullscreen));
            }
            LifecycleState::Minimized => self.restore(id)?,
            LifecycleState::Normal => {}
        }
        self.cancel_session(id);
        let full = self.fullscreen_geometry();
        let panel = self.panel_mut(id)?;
        panel.saved = Some(panel.geometry);
        panel.geometry = full;
        panel.state = LifecycleState::Fullscreen;
        self.raise(id);
        self.pulses
            .schedule(id, PulseReason::EnterFullscreen, Instant::now());
        tracing::debug!(panel = %id, "entered fullscreen");
        Ok(())
    }

    /// Put back the geometry saved on entry, verbatim.
    pub fn exit_fullscreen(&mut self, id: PanelId) -> Result<(), WmError> {
        let state = self.state_of(id)?;
        if state != LifecycleState::Fullscreen {
            return Err(Self::reject(id, "exit_fullscreen", state));
        }
        let panel = self.panel_mut(id)?;
        if let Some(saved) = panel.saved.take() {
            panel.geometry = saved;
        }
        panel.state = LifecycleState::Normal;
        self.pulses
            .schedule(id, PulseReason::ExitFullscreen, Instant::now());
        tracing::debug!(panel = %id, "exited fullscreen");
        Ok(())
    }

    pub fn toggle_fullscreen(&mut self, id: PanelId) -> Result<(), WmError> {
        if self.state_of(id)? == LifecycleState::Fullscreen {
            self.exit_fullscreen(id)
        } else {
            self.enter_fullscreen(id)
        }
    }

    /// Record a click on a panel's title bar. Two clicks on the same panel
    /// within the double-click window toggle fullscreen; returns whether that
    /// happened.
    pub fn header_clicked(&mut self, id: PanelId, now: Instant) -> Result<bool, WmError> {
        self.state_of(id)?;
        let window = self.config.double_click_window();
        if let Some((prev_id, prev)) = self.last_header_click
            && prev_id == id
            && now.saturating_duration_since(prev) <= window
        {
            self.last_header_click = None;
            self.toggle_fullscreen(id)?;
            return Ok(true);
        }
        self.last_header_click = Some((id, now));
        self.focus(id)?;
        Ok(false)
    }

    /// Explicitly set a panel's committed geometry. The result is clamped to
    /// the minimums; a minimized panel keeps its title-bar height.
    pub fn set_geometry(&mut self, id: PanelId, geometry: Geometry) -> Result<Geometry, WmError> {
        let state = self.state_of(id)?;
        if state == LifecycleState::Fullscreen {
            return Err(Self::reject(id, "set_geometry", state));
        }
        self.cancel_session(id);
        let limits = self.config.limits();
        if let Err(violation) = geometry.check_minimums(limits, state) {
            tracing::trace!(panel = %id, %violation, "clamping explicit geometry");
        }
        let panel = self.panel_mut(id)?;
        panel.geometry = geometry.clamp_with(limits, state);
        Ok(panel.geometry)
    }

    /// Resize the canvas. Fullscreen panels are refit; every other panel is
    /// pulled back so its title bar stays reachable.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        let full = self.fullscreen_geometry();
        let margin = self.config.visible_margin;
        for panel in self.panels.values_mut() {
            panel.geometry = match panel.state {
                LifecycleState::Fullscreen => full,
                LifecycleState::Normal | LifecycleState::Minimized => {
                    panel.geometry.clamp_into(viewport, margin)
                }
            };
        }
        tracing::debug!(?viewport, "viewport changed");
    }

    // ---- z-order / focus ----------------------------------------------------

    fn raise(&mut self, id: PanelId) {
        let others_max = self
            .panels
            .values()
            .filter(|panel| panel.id != id)
            .map(|panel| panel.z_index)
            .max()
            .unwrap_or(0);
        let seq = self.z_order.next_focus_seq();
        let Some(panel) = self.panels.get_mut(&id) else {
            return;
        };
        if panel.z_index <= others_max {
            panel.z_index = self.z_order.raise_above(others_max);
        }
        panel.focus_seq = seq;
    }

    /// Give `id` a z-index strictly above every other panel.
    pub fn bring_to_front(&mut self, id: PanelId) -> Result<(), WmError> {
        self.state_of(id)?;
        self.raise(id);
        Ok(())
    }

    /// Focus follows stacking: the focused panel is the front-most one.
    pub fn focus(&mut self, id: PanelId) -> Result<(), WmError> {
        self.bring_to_front(id)
    }

    /// Ids back-to-front. Equal z-indices are ordered by last focus.
    pub fn stacking_order(&self) -> Vec<PanelId> {
        let mut order: Vec<&Panel<H::Handle>> = self.panels.values().collect();
        order.sort_by_key(|panel| (panel.z_index, panel.focus_seq));
        order.into_iter().map(|panel| panel.id).collect()
    }

    pub fn focused(&self) -> Option<PanelId> {
        self.panels
            .values()
            .max_by_key(|panel| (panel.z_index, panel.focus_seq))
            .map(|panel| panel.id)
    }

    pub fn focus_next(&mut self) -> Option<PanelId> {
        self.cycle_focus(true)
    }

    pub fn focus_prev(&mut self) -> Option<PanelId> {
        self.cycle_focus(false)
    }

    fn cycle_focus(&mut self, forward: bool) -> Option<PanelId> {
        let ring = FocusRing::new(
            self.panels
                .values()
                .filter(|panel| !panel.is_minimized())
                .map(|panel| panel.id)
                .collect(),
        );
        let next = ring.step(self.focused(), forward)?;
        self.raise(next);
        Some(next)
    }

    // ---- drag / resize sessions ---------------------------------------------

    fn begin_session(
        &mut self,
        id: PanelId,
        kind: SessionKind,
        pointer: Point,
        operation: &'static str,
    ) -> Result<(), WmError> {
        let state = self.state_of(id)?;
        let allowed = match (state, kind) {
            (LifecycleState::Fullscreen, _) => false,
            (LifecycleState::Minimized, SessionKind::Resize(_)) => false,
            _ => !self.sessions.contains_key(&id),
        };
        if !allowed {
            return Err(Self::reject(id, operation, state));
        }
        let origin = self.panels[&id].geometry;
        self.sessions
            .insert(id, Session::new(id, kind, pointer, origin));
        tracing::trace!(panel = %id, ?kind, ?pointer, "session started");
        Ok(())
    }

    fn track_session(
        &mut self,
        id: PanelId,
        pointer: Point,
        want_drag: bool,
        operation: &'static str,
    ) -> Result<Geometry, WmError> {
        let state = self.state_of(id)?;
        let limits = self.config.limits();
        match self.sessions.get_mut(&id) {
            Some(session) if session.is_drag() == want_drag => {
                session.track(pointer);
                Ok(session.live_geometry(limits, state))
            }
            _ => Err(Self::reject(id, operation, state)),
        }
    }

    fn end_session(
        &mut self,
        id: PanelId,
        pointer: Point,
        want_drag: bool,
        operation: &'static str,
    ) -> Result<Geometry, WmError> {
        let state = self.state_of(id)?;
        let mut session = match self.sessions.remove(&id) {
            Some(session) if session.is_drag() == want_drag => session,
            Some(other) => {
                self.sessions.insert(id, other);
                return Err(Self::reject(id, operation, state));
            }
            None => return Err(Self::reject(id, operation, state)),
        };
        session.track(pointer);
        let limits = self.config.limits();
        let mut committed = session.live_geometry(limits, state).clamp_with(limits, state);
        if want_drag {
            committed = committed.clamp_into(self.viewport, self.config.visible_margin);
        }
        let panel = self.panel_mut(id)?;
        panel.geometry = committed;
        self.raise(id);
        if want_drag {
            self.pulses
                .schedule(id, PulseReason::DragDropped, Instant::now());
        }
        tracing::debug!(panel = %id, geometry = ?committed, "session committed");
        Ok(committed)
    }

    pub fn begin_drag(&mut self, id: PanelId, pointer: Point) -> Result<(), WmError> {
        self.begin_session(id, SessionKind::Drag, pointer, "begin_drag")
    }

    /// Returns the presentation geometry for this frame. Nothing is committed.
    pub fn update_drag(&mut self, id: PanelId, pointer: Point) -> Result<Geometry, WmError> {
        self.track_session(id, pointer, true, "update_drag")
    }

    pub fn end_drag(&mut self, id: PanelId, pointer: Point) -> Result<Geometry, WmError> {
        self.end_session(id, pointer, true, "end_drag")
    }

    pub fn begin_resize(
        &mut self,
        id: PanelId,
        edge: ResizeEdge,
        pointer: Point,
    ) -> Result<(), WmError> {
        self.begin_session(id, SessionKind::Resize(edge), pointer, "begin_resize")
    }

    pub fn update_resize(&mut self, id: PanelId, pointer: Point) -> Result<Geometry, WmError> {
        self.track_session(id, pointer, false, "update_resize")
    }

    pub fn end_resize(&mut self, id: PanelId, pointer: Point) -> Result<Geometry, WmError> {
        self.end_session(id, pointer, false, "end_resize")
    }

    /// Abandon a session (pointer lost). Committed geometry is untouched.
    pub fn cancel_session(&mut self, id: PanelId) -> bool {
        let cancelled = self.sessions.remove(&id).is_some();
        if cancelled {
            tracing::trace!(panel = %id, "session cancelled");
        }
        cancelled
    }

    pub fn session(&self, id: PanelId) -> Option<&Session> {
        self.sessions.get(&id)
    }

    /// What the renderer should draw: the in-flight session geometry when one
    /// is active, the committed geometry otherwise.
    pub fn live_geometry(&self, id: PanelId) -> Option<Geometry> {
        let panel = self.panels.get(&id)?;
        Some(match self.sessions.get(&id) {
            Some(session) => session.live_geometry(self.config.limits(), panel.state),
            None => panel.geometry,
        })
    }

    // ---- pulses -------------------------------------------------------------

    pub fn pulse(&self, id: PanelId, now: Instant) -> Option<Pulse> {
        self.pulses.get(id, now)
    }

    pub fn expire_pulses(&mut self, now: Instant) -> usize {
        self.pulses.expire(now)
    }

    // ---- layout persistence -------------------------------------------------

    /// One record per panel, back-to-front. Records carry the panel's
    /// `Normal` geometry: the pre-minimize height for minimized panels and
    /// the saved snapshot for fullscreen ones.
    pub fn snapshot_layout(&self) -> LayoutSnapshot {
        let panels = self
            .stacking_order()
            .into_iter()
            .filter_map(|id| self.panels.get(&id))
            .map(|panel| {
                let normal = match panel.state {
                    LifecycleState::Fullscreen => panel.saved.unwrap_or(panel.geometry),
                    LifecycleState::Minimized => panel.geometry.with_size(Size::new(
                        panel.geometry.size.width,
                        panel.minimized_from.unwrap_or(panel.geometry.size.height),
                    )),
                    LifecycleState::Normal => panel.geometry,
                };
                LayoutRecord {
                    id: panel.id,
                    panel_type: panel.kind,
                    title: panel.title.clone(),
                    position: normal.position,
                    size: normal.size,
                    z_index: panel.z_index,
                    lifecycle_state: panel.state,
                }
            })
            .collect();
        LayoutSnapshot { panels }
    }

    /// Re-open the panels of a snapshot. Geometry that no longer fits the
    /// viewport is clamped into it instead of being rejected. A recorded id
    /// is kept only if this manager has never handed it out and it is at most
    /// [`MAX_RESTORED_ID`]; every other record gets a fresh id. Returns the
    /// ids back-to-front.
    pub fn restore_layout<F>(
        &mut self,
        snapshot: &LayoutSnapshot,
        mut content_for: F,
    ) -> Vec<PanelId>
    where
        F: FnMut(&LayoutRecord) -> H::Handle,
    {
        let limits = self.config.limits();
        let mut records: Vec<&LayoutRecord> = snapshot.panels.iter().collect();
        records.sort_by_key(|record| record.id);
        let mut assigned: Vec<(&LayoutRecord, PanelId)> = records
            .into_iter()
            .map(|record| {
                let raw = record.id.raw();
                let id = if raw >= self.next_id && raw <= MAX_RESTORED_ID {
                    self.next_id = raw + 1;
                    record.id
                } else {
                    self.allocate_id()
                };
                (record, id)
            })
            .collect();
        assigned.sort_by_key(|(record, _)| record.z_index);

        let mut restored = Vec::with_capacity(assigned.len());
        for (record, id) in assigned {
            let normal = Geometry {
                position: record.position,
                size: record.size,
            }
            .fit_into(self.viewport, limits, LifecycleState::Normal);
            let content = content_for(record);
            self.host.mount(id, &content);
            let mut panel =
                Panel::new(id, record.panel_type, record.title.clone(), content, normal);
            match record.lifecycle_state {
                LifecycleState::Normal => {}
                LifecycleState::Minimized => {
                    panel.minimized_from = Some(normal.size.height);
                    panel.geometry = normal.clamp_with(limits, LifecycleState::Minimized);
                }
                LifecycleState::Fullscreen => {
                    panel.saved = Some(normal);
                    panel.geometry = self.fullscreen_geometry();
                }
            }
            panel.state = record.lifecycle_state;
            panel.z_index = record.z_index;
            panel.focus_seq = self.z_order.next_focus_seq();
            self.z_order.observe(record.z_index);
            self.insert_panel(panel);
            self.last_opened = Some(id);
            restored.push(id);
        }
        tracing::debug!(count = restored.len(), "restored layout");
        restored
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[derive(Debug, Default)]
    struct RecordingHost {
        mounted: Vec<(PanelId, String)>,
        unmounted: Vec<(PanelId, String)>,
    }

    impl ContentHost for RecordingHost {
        type Handle = String;

        fn mount(&mut self, id: PanelId, handle: &String) {
            self.mounted.push((id, handle.clone()));
        }

        fn unmount(&mut self, id: PanelId, handle: String) {
            self.unmounted.push((id, handle));
        }
    }

    fn manager() -> PanelManager<RecordingHost> {
        PanelManager::new(RecordingHost::default(), Viewport::new(1600, 900))
    }

    fn open(wm: &mut PanelManager<RecordingHost>, title: &str) -> PanelId {
        wm.open_panel(PanelKind::Notes, title, title.to_string())
    }

    #[test]
    fn open_mounts_cascades_and_fronts() {
        let mut wm = manager();
        let a = open(&mut wm, "a");
        let b = open(&mut wm, "b");
        let pa = wm.panel(a).unwrap();
        let pb = wm.panel(b).unwrap();
        assert_eq!(
            pb.position(),
            Point::new(
                pa.position().x + wm.config().cascade_offset,
                pa.position().y + wm.config().cascade_offset
            )
        );
        assert!(pb.z_index() > pa.z_index());
        assert!(pb.is_new());
        assert_eq!(pb.state(), LifecycleState::Normal);
        assert_eq!(wm.host().mounted.len(), 2);
        assert_eq!(wm.focused(), Some(b));
    }

    #[test]
    fn finish_render_cycle_clears_new_flags() {
        let mut wm = manager();
        let a = open(&mut wm, "a");
        wm.finish_render_cycle();
        assert!(!wm.panel(a).unwrap().is_new());
    }

    #[test]
    fn close_unmounts_and_later_ops_fail_fast() {
        let mut wm = manager();
        let a = open(&mut wm, "a");
        wm.close_panel(a).unwrap();
        assert_eq!(wm.host().unmounted, vec![(a, "a".to_string())]);
        assert!(!wm.contains(a));
        assert!(matches!(
            wm.minimize(a),
            Err(WmError::OperationOnRemovedPanel(id)) if id == a
        ));
        assert!(wm.close_panel(a).is_err());
        assert!(wm.begin_drag(a, Point::new(0, 0)).is_err());
        assert!(wm.bring_to_front(a).is_err());
        assert!(wm.live_geometry(a).is_none());
    }

    #[test]
    fn ids_are_not_recycled() {
        let mut wm = manager();
        let a = open(&mut wm, "a");
        wm.close_panel(a).unwrap();
        let b = open(&mut wm, "b");
        assert_ne!(a, b);
    }

    #[test]
    fn minimize_round_trip_restores_size() {
        let mut wm = manager();
        let a = open(&mut wm, "a");
        wm.set_geometry(a, Geometry::new(50, 60, 420, 333)).unwrap();
        wm.minimize(a).unwrap();
        let p = wm.panel(a).unwrap();
        assert_eq!(p.size().height, crate::constants::MINIMIZED_HEIGHT);
        assert_eq!(p.size().width, 420);
        assert!(p.saved_geometry().is_none());
        wm.restore(a).unwrap();
        assert_eq!(wm.panel(a).unwrap().geometry(), Geometry::new(50, 60, 420, 333));
    }

    #[test]
    fn minimize_twice_is_invalid() {
        let mut wm = manager();
        let a = open(&mut wm, "a");
        wm.minimize(a).unwrap();
        assert!(matches!(
            wm.minimize(a),
            Err(WmError::InvalidTransition { operation: "minimize", .. })
        ));
        assert!(matches!(
            wm.exit_fullscreen(a),
            Err(WmError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn fullscreen_round_trip_restores_exactly() {
        let mut wm = manager();
        let a = open(&mut wm, "a");
        let before = wm.set_geometry(a, Geometry::new(-20, 35, 512, 288)).unwrap();
        wm.enter_fullscreen(a).unwrap();
        let p = wm.panel(a).unwrap();
        assert_eq!(p.saved_geometry(), Some(before));
        assert_eq!(
            p.geometry(),
            Geometry::new(0, 0, 1600, 900 - crate::constants::FULLSCREEN_CHROME_OFFSET)
        );
        wm.exit_fullscreen(a).unwrap();
        let p = wm.panel(a).unwrap();
        assert_eq!(p.geometry(), before);
        assert!(p.saved_geometry().is_none());
    }

    #[test]
    fn fullscreen_from_minimized_restores_first() {
        let mut wm = manager();
        let a = open(&mut wm, "a");
        let normal = wm.set_geometry(a, Geometry::new(10, 10, 300, 300)).unwrap();
        wm.minimize(a).unwrap();
        wm.toggle_fullscreen(a).unwrap();
        assert_eq!(wm.panel(a).unwrap().state(), LifecycleState::Fullscreen);
        assert_eq!(wm.panel(a).unwrap().saved_geometry(), Some(normal));
        wm.toggle_fullscreen(a).unwrap();
        assert_eq!(wm.panel(a).unwrap().geometry(), normal);
    }

    #[test]
    fn fullscreen_schedules_pulse() {
        let mut wm = manager();
        let a = open(&mut wm, "a");
        wm.enter_fullscreen(a).unwrap();
        let pulse = wm.pulse(a, Instant::now()).unwrap();
        assert_eq!(pulse.reason, PulseReason::EnterFullscreen);
        wm.exit_fullscreen(a).unwrap();
        let pulse = wm.pulse(a, Instant::now()).unwrap();
        assert_eq!(pulse.reason, PulseReason::ExitFullscreen);
        assert_eq!(wm.expire_pulses(Instant::now() + Duration::from_secs(1)), 1);
    }

    #[test]
    fn sessions_rejected_while_fullscreen() {
        let mut wm = manager();
        let a = open(&mut wm, "a");
        wm.enter_fullscreen(a).unwrap();
        assert!(wm.begin_drag(a, Point::new(5, 5)).is_err());
        assert!(wm.begin_resize(a, ResizeEdge::Right, Point::new(5, 5)).is_err());
        assert!(wm.set_geometry(a, Geometry::new(0, 0, 300, 300)).is_err());
    }

    #[test]
    fn minimized_panel_drags_but_does_not_resize() {
        let mut wm = manager();
        let a = open(&mut wm, "a");
        wm.minimize(a).unwrap();
        assert!(wm.begin_resize(a, ResizeEdge::BottomRight, Point::new(0, 0)).is_err());
        let start = wm.panel(a).unwrap().position();
        wm.begin_drag(a, Point::new(100, 100)).unwrap();
        let moved = wm.end_drag(a, Point::new(150, 120)).unwrap();
        assert_eq!(moved.position, Point::new(start.x + 50, start.y + 20));
        assert_eq!(moved.size.height, crate::constants::MINIMIZED_HEIGHT);
    }

    #[test]
    fn one_session_per_panel_but_panels_are_independent() {
        let mut wm = manager();
        let a = open(&mut wm, "a");
        let b = open(&mut wm, "b");
        wm.begin_drag(a, Point::new(0, 0)).unwrap();
        assert!(wm.begin_resize(a, ResizeEdge::Left, Point::new(0, 0)).is_err());
        wm.begin_resize(b, ResizeEdge::Left, Point::new(0, 0)).unwrap();
        assert!(wm.update_resize(a, Point::new(1, 1)).is_err());
        assert!(wm.end_drag(b, Point::new(1, 1)).is_err());
        assert!(wm.session(b).is_some());
    }

    #[test]
    fn abandoned_drag_leaves_committed_geometry() {
        let mut wm = manager();
        let a = open(&mut wm, "a");
        let origin = wm.panel(a).unwrap().geometry();
        wm.begin_drag(a, Point::new(10, 10)).unwrap();
        let live = wm.update_drag(a, Point::new(210, 110)).unwrap();
        assert_eq!(live.position, Point::new(origin.position.x + 200, origin.position.y + 100));
        assert_eq!(wm.live_geometry(a), Some(live));
        assert_eq!(wm.panel(a).unwrap().geometry(), origin);
        assert!(wm.cancel_session(a));
        assert_eq!(wm.panel(a).unwrap().geometry(), origin);
        assert_eq!(wm.live_geometry(a), Some(origin));
    }

    #[test]
    fn completed_drag_commits_fronts_and_pulses() {
        let mut wm = manager();
        let a = open(&mut wm, "a");
        let _b = open(&mut wm, "b");
        let origin = wm.panel(a).unwrap().geometry();
        wm.begin_drag(a, Point::new(0, 0)).unwrap();
        wm.update_drag(a, Point::new(5, 5)).unwrap();
        let committed = wm.end_drag(a, Point::new(40, 30)).unwrap();
        assert_eq!(committed.position, Point::new(origin.position.x + 40, origin.position.y + 30));
        assert_eq!(wm.panel(a).unwrap().geometry(), committed);
        assert_eq!(wm.focused(), Some(a));
        assert_eq!(
            wm.pulse(a, Instant::now()).map(|p| p.reason),
            Some(PulseReason::DragDropped)
        );
        assert!(wm.session(a).is_none());
    }

    #[test]
    fn drag_end_keeps_title_bar_reachable() {
        let mut wm = manager();
        let a = open(&mut wm, "a");
        wm.begin_drag(a, Point::new(0, 0)).unwrap();
        let committed = wm.end_drag(a, Point::new(-10_000, -10_000)).unwrap();
        assert_eq!(committed.position.y, 0);
        assert_eq!(
            committed.right(),
            wm.config().visible_margin
        );
    }

    #[test]
    fn bottom_right_resize_clamps_to_min_width() {
        let mut wm = manager();
        let a = open(&mut wm, "a");
        wm.set_geometry(a, Geometry::new(0, 0, 400, 300)).unwrap();
        wm.begin_resize(a, ResizeEdge::BottomRight, Point::new(400, 300)).unwrap();
        let done = wm.end_resize(a, Point::new(50, 300)).unwrap();
        assert_eq!(done, Geometry::new(0, 0, 200, 300));
    }

    #[test]
    fn bring_to_front_is_strictly_above_others() {
        let mut wm = manager();
        let ids: Vec<PanelId> = (0..4).map(|i| open(&mut wm, &i.to_string())).collect();
        for &id in ids.iter().rev() {
            let before: Vec<i64> = ids
                .iter()
                .filter(|other| **other != id)
                .map(|other| wm.panel(*other).unwrap().z_index())
                .collect();
            wm.bring_to_front(id).unwrap();
            let z = wm.panel(id).unwrap().z_index();
            assert!(before.iter().all(|other| z > *other));
            assert_eq!(wm.focused(), Some(id));
        }
    }

    #[test]
    fn z_index_never_decreases() {
        let mut wm = manager();
        let a = open(&mut wm, "a");
        let b = open(&mut wm, "b");
        let mut last = 0;
        for _ in 0..5 {
            for id in [a, b] {
                wm.focus(id).unwrap();
                let z = wm.panel(id).unwrap().z_index();
                assert!(z > last);
                last = z;
            }
        }
        let order = wm.stacking_order();
        assert_eq!(order.last().copied(), Some(b));
    }

    #[test]
    fn focus_cycle_skips_minimized() {
        let mut wm = manager();
        let a = open(&mut wm, "a");
        let b = open(&mut wm, "b");
        let c = open(&mut wm, "c");
        wm.minimize(b).unwrap();
        wm.focus(a).unwrap();
        assert_eq!(wm.focus_next(), Some(c));
        assert_eq!(wm.focus_next(), Some(a));
        assert_eq!(wm.focus_prev(), Some(c));
    }

    #[test]
    fn double_click_header_toggles_fullscreen() {
        let mut wm = manager();
        let a = open(&mut wm, "a");
        let t0 = Instant::now();
        assert!(!wm.header_clicked(a, t0).unwrap());
        assert!(wm.header_clicked(a, t0 + Duration::from_millis(200)).unwrap());
        assert!(wm.panel(a).unwrap().is_fullscreen());
        assert!(!wm.header_clicked(a, t0 + Duration::from_secs(5)).unwrap());
        assert!(!wm.header_clicked(a, t0 + Duration::from_secs(7)).unwrap());
        assert!(wm.panel(a).unwrap().is_fullscreen());
    }

    #[test]
    fn viewport_change_refits_fullscreen_and_clamps_others() {
        let mut wm = manager();
        let a = open(&mut wm, "a");
        let b = open(&mut wm, "b");
        wm.set_geometry(b, Geometry::new(1400, 700, 300, 300)).unwrap();
        wm.enter_fullscreen(a).unwrap();
        wm.set_viewport(Viewport::new(800, 600));
        assert_eq!(
            wm.panel(a).unwrap().geometry(),
            Geometry::new(0, 0, 800, 600 - crate::constants::FULLSCREEN_CHROME_OFFSET)
        );
        let pb = wm.panel(b).unwrap().position();
        let margin = wm.config().visible_margin;
        assert_eq!(pb, Point::new(800 - margin, 600 - margin));
    }

    #[test]
    fn transitions_cancel_in_flight_sessions() {
        let mut wm = manager();
        let a = open(&mut wm, "a");
        let origin = wm.panel(a).unwrap().geometry();
        wm.begin_resize(a, ResizeEdge::Right, Point::new(0, 0)).unwrap();
        wm.update_resize(a, Point::new(100, 0)).unwrap();
        wm.enter_fullscreen(a).unwrap();
        assert!(wm.session(a).is_none());
        wm.exit_fullscreen(a).unwrap();
        assert_eq!(wm.panel(a).unwrap().geometry(), origin);
    }

    #[test]
    fn layout_snapshot_round_trip_reclamps() {
        let mut wm = manager();
        let a = open(&mut wm, "a");
        let b = open(&mut wm, "b");
        wm.set_geometry(a, Geometry::new(1300, 100, 400, 400)).unwrap();
        wm.set_geometry(b, Geometry::new(10, 10, 350, 250)).unwrap();
        wm.minimize(b).unwrap();
        let snapshot = wm.snapshot_layout();
        assert_eq!(snapshot.panels.len(), 2);
        assert_eq!(snapshot.panels[1].size, Size::new(350, 250));

        let mut small = PanelManager::new(RecordingHost::default(), Viewport::new(1000, 700));
        let ids = small.restore_layout(&snapshot, |record| record.title.clone());
        assert_eq!(ids, vec![a, b]);
        let ra = small.panel(a).unwrap();
        assert_eq!(ra.geometry(), Geometry::new(600, 100, 400, 400));
        let rb = small.panel(b).unwrap();
        assert!(rb.is_minimized());
        small.restore(b).unwrap();
        assert_eq!(small.panel(b).unwrap().size(), Size::new(350, 250));
        assert_eq!(small.focused(), Some(b));
        let c = small.open_panel(PanelKind::Code, "c", "c".into());
        assert!(c.raw() > b.raw());
        assert!(small.panel(c).unwrap().z_index() > small.panel(b).unwrap().z_index());
    }

    fn record(id: u64, z_index: i64) -> LayoutRecord {
        LayoutRecord {
            id: PanelId::from_raw(id),
            panel_type: PanelKind::Notes,
            title: format!("restored {id}"),
            position: Point::new(10, 10),
            size: Size::new(300, 300),
            z_index,
            lifecycle_state: LifecycleState::Normal,
        }
    }

    #[test]
    fn restore_never_reuses_a_closed_id() {
        let mut wm = manager();
        let a = open(&mut wm, "a");
        let _b = open(&mut wm, "b");
        wm.close_panel(a).unwrap();

        let snapshot = LayoutSnapshot {
            panels: vec![record(a.raw(), 1)],
        };
        let ids = wm.restore_layout(&snapshot, |record| record.title.clone());
        assert_eq!(ids.len(), 1);
        assert_ne!(ids[0], a);
        assert!(matches!(
            wm.minimize(a),
            Err(WmError::OperationOnRemovedPanel(id)) if id == a
        ));
    }

    #[test]
    fn restore_keeps_unused_ids_and_remaps_duplicates() {
        let mut wm = manager();
        let snapshot = LayoutSnapshot {
            panels: vec![record(40, 2), record(40, 1), record(7, 3)],
        };
        let ids = wm.restore_layout(&snapshot, |record| record.title.clone());
        assert_eq!(ids.len(), 3);
        assert!(ids.contains(&PanelId::from_raw(7)));
        assert!(ids.contains(&PanelId::from_raw(40)));
        assert_eq!(wm.len(), 3);
        let fresh = open(&mut wm, "fresh");
        assert!(fresh.raw() > 41);
    }

    #[test]
    fn huge_restored_id_is_remapped_and_nothing_is_overwritten() {
        let mut wm = manager();
        let snapshot = LayoutSnapshot {
            panels: vec![record(u64::MAX, 1)],
        };
        let ids = wm.restore_layout(&snapshot, |record| record.title.clone());
        assert!(ids[0].raw() <= MAX_RESTORED_ID);

        let fresh = open(&mut wm, "fresh");
        assert_ne!(fresh, ids[0]);
        assert_eq!(wm.len(), 2);
        assert!(wm.host().unmounted.is_empty());
    }

    #[test]
    fn minimize_and_restore_cancel_running_pulse() {
        let mut wm = manager();
        let a = open(&mut wm, "a");
        wm.enter_fullscreen(a).unwrap();
        wm.minimize(a).unwrap();
        assert!(wm.pulse(a, Instant::now()).is_none());

        wm.restore(a).unwrap();
        wm.begin_drag(a, Point::new(0, 0)).unwrap();
        wm.end_drag(a, Point::new(5, 5)).unwrap();
        assert!(wm.pulse(a, Instant::now()).is_some());
        wm.minimize(a).unwrap();
        wm.restore(a).unwrap();
        assert!(wm.pulse(a, Instant::now()).is_none());
    }
}
