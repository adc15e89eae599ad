use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::{DroppedFile, FileRouter, PanelContent, PanelRequest};
use crate::window::{ContentHost, OpenedPanel, PanelManager};

/// Runs each file drop as its own classification task and hands finished
/// requests back to the single owner of the [`PanelManager`].
///
/// Drops are never cancelled: a response that arrives late still opens its
/// panel when the owner next applies ready requests.
#[derive(Debug)]
pub struct DropDispatcher {
    router: FileRouter,
    tx: mpsc::UnboundedSender<PanelRequest>,
    rx: mpsc::UnboundedReceiver<PanelRequest>,
}

impl DropDispatcher {
    pub fn new(router: FileRouter) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { router, tx, rx }
    }

    /// Start routing `file`. Must be called from within a tokio runtime.
    pub fn dispatch(&self, file: DroppedFile) -> JoinHandle<()> {
        let router = self.router.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let request = router.route(&file).await;
            if tx.send(request).is_err() {
                tracing::debug!(file = %file.name, "drop dispatcher gone; request discarded");
            }
        })
    }

    /// Wait for the next finished request.
    pub async fn next_request(&mut self) -> Option<PanelRequest> {
        self.rx.recv().await
    }

    pub fn try_next_request(&mut self) -> Option<PanelRequest> {
        self.rx.try_recv().ok()
    }

    /// Open a panel for every request that has finished so far, in arrival
    /// order.
    pub fn apply_ready<H>(&mut self, wm: &mut PanelManager<H>) -> Vec<OpenedPanel>
    where
        H: ContentHost,
        H::Handle: From<PanelContent>,
    {
        let mut opened = Vec::new();
        while let Some(request) = self.try_next_request() {
            opened.push(wm.open_requested(request));
        }
        opened
    }
}
