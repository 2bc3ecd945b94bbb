use std::sync::{Arc, mpsc};
use std::thread::JoinHandle;
use std::time::Duration;

use crate::assets::source::{AssetKey, AssetSource};
use crate::foundation::error::ArborResult;

/// Raw bytes (or failure) for one requested asset.
#[derive(Debug)]
pub struct FetchedAsset {
    /// Requested key.
    pub key: AssetKey,
    /// Fetch outcome.
    pub bytes: ArborResult<Vec<u8>>,
}

/// Background fetcher for template assets.
///
/// Fetching happens on a worker thread; parsing and installation stay on the UI turn
/// (see [`crate::CanvasEngine::poll_assets`]), so the library is never touched concurrently.
pub struct AssetLoader {
    rx: mpsc::Receiver<FetchedAsset>,
    handle: Option<JoinHandle<()>>,
    expected: usize,
    received: usize,
}

impl AssetLoader {
    /// Start fetching `requests` (key + stem pairs) from `source`.
    pub fn spawn(source: Arc<dyn AssetSource>, requests: Vec<(AssetKey, String)>) -> Self {
        let (tx, rx) = mpsc::channel();
        let expected = requests.len();
        let handle = std::thread::spawn(move || {
            for (key, stem) in requests {
                let bytes = source.fetch(&key, &stem);
                if tx.send(FetchedAsset { key, bytes }).is_err() {
                    // Receiver dropped: the engine went away.
                    return;
                }
            }
        });
        Self {
            rx,
            handle: Some(handle),
            expected,
            received: 0,
        }
    }

    /// Everything fetched so far, without blocking.
    pub fn drain(&mut self) -> Vec<FetchedAsset> {
        let out: Vec<FetchedAsset> = self.rx.try_iter().collect();
        self.received += out.len();
        out
    }

    /// Block up to `timeout` for the next fetched asset.
    pub fn recv_timeout(&mut self, timeout: Duration) -> Option<FetchedAsset> {
        let got = self.rx.recv_timeout(timeout).ok();
        if got.is_some() {
            self.received += 1;
        }
        got
    }

    /// Whether every requested asset has been handed out.
    pub fn is_done(&self) -> bool {
        self.received >= self.expected
    }
}

impl Drop for AssetLoader {
    fn drop(&mut self) {
        if self.is_done()
            && let Some(h) = self.handle.take()
        {
            let _ = h.join();
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/loader.rs"]
mod tests;
