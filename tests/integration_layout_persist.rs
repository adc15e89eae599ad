use panel_wm::layout::persist::LayoutSnapshot;
use panel_wm::window::NullHost;
use panel_wm::{Geometry, LifecycleState, PanelKind, PanelManager, Viewport};

#[test]
fn layout_survives_a_save_and_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("layout.json");

    let mut wm = PanelManager::new(NullHost, Viewport::new(1600, 900));
    let notes = wm.open_panel(PanelKind::Notes, "todo", ());
    wm.set_geometry(notes, Geometry::new(40, 50, 500, 400)).unwrap();
    let code = wm.open_panel(PanelKind::Code, "main.rs", ());
    wm.set_geometry(code, Geometry::new(300, 200, 640, 480)).unwrap();
    wm.minimize(notes).unwrap();
    wm.enter_fullscreen(code).unwrap();
    wm.snapshot_layout().save(&path).unwrap();

    let snapshot = LayoutSnapshot::load(&path).unwrap();
    let mut restored = PanelManager::new(NullHost, Viewport::new(1600, 900));
    let ids = restored.restore_layout(&snapshot, |_| ());
    assert_eq!(ids.len(), 2);

    let notes = restored.panel(notes).unwrap();
    assert_eq!(notes.state(), LifecycleState::Minimized);
    assert_eq!(notes.geometry(), Geometry::new(40, 50, 500, 40));
    let code = restored.panel(code).unwrap();
    assert_eq!(code.state(), LifecycleState::Fullscreen);
    assert_eq!(code.saved_geometry(), Some(Geometry::new(300, 200, 640, 480)));
    assert_eq!(restored.focused(), Some(code.id()));
}

#[test]
fn restore_pulls_offscreen_panels_back_into_a_smaller_viewport() {
    let mut wm = PanelManager::new(NullHost, Viewport::new(3000, 2000));
    let id = wm.open_panel(PanelKind::Browser, "web", ());
    wm.set_geometry(id, Geometry::new(2500, 1700, 400, 300)).unwrap();
    let json = wm.snapshot_layout().to_json().unwrap();

    let mut small = PanelManager::new(NullHost, Viewport::new(1000, 800));
    small.restore_layout(&LayoutSnapshot::from_json(&json).unwrap(), |_| ());
    assert_eq!(small.panel(id).unwrap().geometry(), Geometry::new(600, 500, 400, 300));
}

#[test]
fn missing_layout_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = LayoutSnapshot::load(dir.path().join("nope.json")).unwrap_err();
    assert!(matches!(err, panel_wm::WmError::Io(_)));
}
