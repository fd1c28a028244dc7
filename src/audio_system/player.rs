/// Rodio media backend
///
/// Audio files are read into memory once at startup; every play decodes
/// from that in-memory copy, so triggering a sound never touches the disk.
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};

use super::source::{AssetProvider, PlayRequest, SoundHandle};
use crate::catalog::{self, MUSIC_NAME};
use crate::error::AudioError;

/// Locates `<asset_dir>/<asset_id>.<extension>` and preloads it.
///
/// Owns the output stream; it must outlive every handle it hands out.
pub struct RodioProvider {
    _stream: OutputStream,
    stream_handle: OutputStreamHandle,
    asset_dir: PathBuf,
    extension: String,
}

impl RodioProvider {
    pub fn new(asset_dir: impl AsRef<Path>, extension: &str) -> Result<Self, AudioError> {
        let (stream, stream_handle) = OutputStream::try_default()
            .map_err(|e| AudioError::StreamInitFailed(e.to_string()))?;

        Ok(Self {
            _stream: stream,
            stream_handle,
            asset_dir: asset_dir.as_ref().to_path_buf(),
            extension: extension.trim_start_matches('.').to_string(),
        })
    }

    fn asset_path(&self, asset_id: &str) -> PathBuf {
        self.asset_dir.join(format!("{}.{}", asset_id, self.extension))
    }
}

impl AssetProvider for RodioProvider {
    fn locate(&self, asset_id: &str) -> Result<Box<dyn SoundHandle>, AudioError> {
        let path = self.asset_path(asset_id);
        if !path.exists() {
            return Err(AudioError::MissingResource(path.display().to_string()));
        }

        let audio_data = std::fs::read(&path).map_err(|e| AudioError::LoadFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        tracing::info!(
            "Preloaded audio file: {} ({} bytes)",
            path.display(),
            audio_data.len()
        );

        let looping = asset_id == catalog::asset_id(MUSIC_NAME);
        let handle = RodioHandle::new(
            asset_id,
            Arc::new(audio_data),
            self.stream_handle.clone(),
            looping,
        )?;
        Ok(Box::new(handle))
    }
}

/// One pre-loaded resource with its own sink.
pub struct RodioHandle {
    name: String,
    stream_handle: OutputStreamHandle,
    sink: Sink,
    audio_data: Arc<Vec<u8>>,
    looping: bool,
    volume: f32,
    muted: bool,
    /// Whether the sink currently holds a decoded source.
    loaded: bool,
}

impl RodioHandle {
    pub fn new(
        name: &str,
        audio_data: Arc<Vec<u8>>,
        stream_handle: OutputStreamHandle,
        looping: bool,
    ) -> Result<Self, AudioError> {
        // Verify the audio can be decoded
        let decoder = Decoder::new(Cursor::new((*audio_data).clone())).map_err(|e| {
            AudioError::DecodeFailed {
                name: name.to_string(),
                reason: e.to_string(),
            }
        })?;
        let _sample_count = decoder.count();

        let sink = Sink::try_new(&stream_handle)
            .map_err(|e| AudioError::StreamInitFailed(e.to_string()))?;

        tracing::debug!("Created audio handle for {} (looping={})", name, looping);

        Ok(Self {
            name: name.to_string(),
            stream_handle,
            sink,
            audio_data,
            looping,
            volume: 1.0,
            muted: false,
            loaded: false,
        })
    }

    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.volume
        }
    }
}

impl SoundHandle for RodioHandle {
    fn pause(&mut self) {
        self.sink.pause();
    }

    fn rewind(&mut self) {
        // A stopped sink cannot be reused, so swap in a fresh one
        self.sink.stop();
        match Sink::try_new(&self.stream_handle) {
            Ok(sink) => self.sink = sink,
            Err(e) => tracing::warn!("Failed to recreate sink for {}: {}", self.name, e),
        }
        self.sink.set_volume(self.effective_volume());
        self.loaded = false;
    }

    fn play(&mut self) -> PlayRequest {
        if !self.loaded {
            // Note: We must clone here as rodio's Decoder requires owned data with 'static lifetime
            let cursor = Cursor::new((*self.audio_data).clone());
            let decoder = match Decoder::new(cursor) {
                Ok(decoder) => decoder,
                Err(e) => return PlayRequest::Rejected(AudioError::rejected(&self.name, e)),
            };

            if self.looping {
                self.sink.append(decoder.repeat_infinite());
            } else {
                self.sink.append(decoder);
            }
            self.loaded = true;
        }

        self.sink.set_volume(self.effective_volume());
        self.sink.play();
        PlayRequest::Started
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
        self.sink.set_volume(self.effective_volume());
    }

    fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        self.sink.set_volume(self.effective_volume());
    }

    fn has_ended(&self) -> bool {
        self.loaded && self.sink.empty()
    }
}
