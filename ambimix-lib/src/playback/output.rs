use std::sync::Arc;

use log::{info, warn};
use rodio::OutputStream;

use super::backend::PlaybackBackend;
use super::rodio_backend::RodioBackend;
use super::silent::SilentBackend;

/// A backend plus whatever keeps its device open.
pub struct AudioOutput {
    backend: Arc<dyn PlaybackBackend>,
    _stream: Option<OutputStream>,
}

impl AudioOutput {
    /// Default output device, or a silent backend when none can be opened.
    pub fn open_default_or_silent() -> Self {
        match RodioBackend::open_default() {
            Ok((backend, stream)) => {
                info!("audio output ready");
                Self {
                    backend: Arc::new(backend),
                    _stream: Some(stream),
                }
            }
            Err(err) => {
                warn!("no audio output ({}), continuing silently", err);
                Self::silent()
            }
        }
    }

    pub fn silent() -> Self {
        Self {
            backend: Arc::new(SilentBackend),
            _stream: None,
        }
    }

    pub fn backend(&self) -> Arc<dyn PlaybackBackend> {
        self.backend.clone()
    }
}
