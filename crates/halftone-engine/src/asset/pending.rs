use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use anyhow::anyhow;

use super::{AssetLoader, NodeGraph};

/// An asset being loaded on a background thread.
///
/// The result crosses back over a channel and is picked up by [`poll`](Self::poll)
/// on the render thread. There is no cancellation and no retry.
#[derive(Debug)]
pub struct PendingAsset {
    path: PathBuf,
    receiver: Receiver<anyhow::Result<NodeGraph>>,
}

impl PendingAsset {
    pub fn spawn(loader: impl AssetLoader, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let (sender, receiver) = mpsc::channel();

        let worker_path = path.clone();
        let spawned = thread::Builder::new()
            .name("asset-loader".into())
            .spawn(move || {
                let result = loader.load(&worker_path);
                // The receiver may be gone if the app shut down first.
                let _ = sender.send(result);
            });

        // On spawn failure the sender is dropped with the closure, so `poll`
        // reports a disconnect.
        if let Err(err) = spawned {
            log::warn!("could not start loader thread for {}: {err}", path.display());
        } else {
            log::info!("loading asset {}", path.display());
        }

        Self { path, receiver }
    }

    /// Wraps an already-available result. Useful when loading happened elsewhere.
    pub fn ready(path: impl Into<PathBuf>, result: anyhow::Result<NodeGraph>) -> Self {
        let (sender, receiver) = mpsc::channel();
        let _ = sender.send(result);
        Self { path: path.into(), receiver }
    }

    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Non-blocking check. `None` while still loading; `Some` exactly once.
    pub fn poll(&self) -> Option<anyhow::Result<NodeGraph>> {
        match self.receiver.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(anyhow!(
                "loader for {} exited before returning a result",
                self.path.display()
            ))),
        }
    }
}
