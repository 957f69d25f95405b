//! Resource probing.
//!
//! Reads just enough of an audio resource to report its shape, without
//! decoding any packets. Used to validate locators before playback and to
//! show durations in listings.

use std::fs::File;
use std::path::Path;

use log::debug;
use serde::Serialize;
use symphonia::core::{
    codecs::{CodecParameters, CODEC_TYPE_NULL},
    formats::FormatOptions,
    io::{MediaSource, MediaSourceStream},
    meta::MetadataOptions,
    probe::Hint,
};

use crate::MixerError;

/// Shape of a probed audio resource.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceInfo {
    pub duration_secs: f64,
    pub channels: u16,
    pub sample_rate: u32,
    pub codec: String,
}

/// Convert codec parameters to seconds using time base and frame count.
fn duration_from_params(codec_params: &CodecParameters) -> f64 {
    let (Some(tb), Some(frames)) = (codec_params.time_base, codec_params.n_frames) else {
        return 0.0;
    };
    let time = tb.calc_time(codec_params.start_ts + frames);
    time.seconds as f64 + time.frac
}

/// Probe a file on disk.
pub fn probe_resource(path: &Path) -> Result<ResourceInfo, MixerError> {
    let file = File::open(path)?;
    let source = Box::new(file) as Box<dyn MediaSource>;

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|ext| ext.to_str()) {
        hint.with_extension(&ext.to_lowercase());
    }

    let mss = MediaSourceStream::new(source, Default::default());
    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|err| MixerError::Probe(format!("{}: {}", path.display(), err)))?;

    let track = probed
        .format
        .tracks()
        .iter()
        .find(|track| track.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| MixerError::Probe(format!("{}: no audio track", path.display())))?;

    let params = &track.codec_params;
    let codec = symphonia::default::get_codecs()
        .get_codec(params.codec)
        .map(|descriptor| descriptor.short_name.to_string())
        .unwrap_or_else(|| "unknown".to_string());

    let info = ResourceInfo {
        duration_secs: duration_from_params(params),
        channels: params.channels.map(|c| c.count() as u16).unwrap_or(0),
        sample_rate: params.sample_rate.unwrap_or(0),
        codec,
    };
    debug!("probed {}: {:?}", path.display(), info);

    Ok(info)
}
