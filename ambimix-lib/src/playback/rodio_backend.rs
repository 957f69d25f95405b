//! rodio-backed voices: one `Sink` per sound, all connected to the default
//! output stream's mixer.

use std::fs::File;
use std::io::BufReader;
use std::thread;
use std::time::Duration;

use log::{debug, error, warn};
use rodio::mixer::Mixer;
use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink};

use super::backend::{PlaybackBackend, Voice, VoiceRequest};
use crate::MixerError;

const OUTPUT_STREAM_OPEN_RETRIES: usize = 20;
const OUTPUT_STREAM_OPEN_RETRY_MS: u64 = 100;

pub struct RodioBackend {
    mixer: Mixer,
}

impl RodioBackend {
    /// Open the default output device.
    ///
    /// The returned `OutputStream` must be kept alive by the caller for as
    /// long as anything should be heard.
    pub fn open_default() -> Result<(Self, OutputStream), MixerError> {
        let mut last_error = String::new();
        for attempt in 1..=OUTPUT_STREAM_OPEN_RETRIES {
            match OutputStreamBuilder::open_default_stream() {
                Ok(stream) => {
                    let mixer = stream.mixer().clone();
                    debug!("output stream opened on attempt {}", attempt);
                    return Ok((Self { mixer }, stream));
                }
                Err(err) => {
                    warn!(
                        "open_default_stream attempt {}/{} failed: {}",
                        attempt, OUTPUT_STREAM_OPEN_RETRIES, err
                    );
                    last_error = err.to_string();
                    if attempt < OUTPUT_STREAM_OPEN_RETRIES {
                        thread::sleep(Duration::from_millis(OUTPUT_STREAM_OPEN_RETRY_MS));
                    }
                }
            }
        }
        error!(
            "failed to open default output stream after {} attempts",
            OUTPUT_STREAM_OPEN_RETRIES
        );
        Err(MixerError::OutputStream(last_error))
    }

    fn reader(request: &VoiceRequest) -> Result<BufReader<File>, MixerError> {
        File::open(&request.path)
            .map(BufReader::new)
            .map_err(|err| MixerError::resource_load(&request.id, err))
    }

    fn silent_sink(&self) -> Sink {
        let sink = Sink::connect_new(&self.mixer);
        sink.set_volume(0.0);
        sink
    }
}

impl PlaybackBackend for RodioBackend {
    fn open(&self, request: &VoiceRequest) -> Result<Box<dyn Voice>, MixerError> {
        // Decoding streams on the mixer thread; only the header is read here.
        let reader = Self::reader(request)?;
        let sink = if request.looped {
            let source = Decoder::new_looped(reader)
                .map_err(|err| MixerError::resource_load(&request.id, err))?;
            let sink = self.silent_sink();
            sink.append(source);
            sink
        } else {
            let source =
                Decoder::new(reader).map_err(|err| MixerError::resource_load(&request.id, err))?;
            let sink = self.silent_sink();
            sink.append(source);
            sink
        };
        sink.play();
        debug!("sink ready (silent): {}", request.id);

        Ok(Box::new(RodioVoice { sink }))
    }

    fn name(&self) -> &'static str {
        "rodio"
    }
}

struct RodioVoice {
    sink: Sink,
}

impl Voice for RodioVoice {
    fn set_volume(&self, volume: f32) {
        self.sink.set_volume(volume);
    }

    fn pause(&self) {
        self.sink.pause();
    }

    fn resume(&self) {
        self.sink.play();
    }

    fn stop(&self) {
        self.sink.stop();
    }

    fn finished(&self) -> bool {
        self.sink.empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn missing_file_fails_before_a_sink_exists() {
        let request = VoiceRequest {
            id: "rain".to_string(),
            path: PathBuf::from("/nonexistent/rain.mp3"),
            looped: true,
        };
        match RodioBackend::reader(&request) {
            Err(MixerError::ResourceLoad { id, .. }) => assert_eq!(id, "rain"),
            other => panic!("unexpected result: {:?}", other.map(|_| ())),
        }
    }
}
