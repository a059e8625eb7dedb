//! Audio device output over cpal.
//!
//! [`AudioOutput`] owns the device stream for as long as it runs. The caller
//! supplies a factory that receives the negotiated [`StreamInfo`] and returns
//! the realtime callback, so the render side can be built for the rate the
//! device actually picked.
//!
//! ```rust,ignore
//! let mut handle = SynthHandle::new(SynthConfig::default());
//! let mut output = AudioOutput::new(OutputConfig::default());
//! output.start(|info| {
//!     let mut renderer = handle.attach(info.sample_rate);
//!     let channels = info.channels;
//!     move |data: &mut [f32]| renderer.render_interleaved(data, channels)
//! })?;
//! ```

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};

/// Failures while acquiring or starting the output device.
///
/// None of these are fatal: the output stays stopped and `start` may be
/// retried.
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    /// No default output device on this host.
    #[error("No audio output device available")]
    NoDevice,

    /// No output device name contains the requested text.
    #[error("Device not found: {0}")]
    DeviceNotFound(String),

    /// Enumerating output devices failed.
    #[error("Failed to list output devices: {0}")]
    Devices(#[from] cpal::DevicesError),

    /// The device would not report a default configuration.
    #[error("Failed to fetch default output config: {0}")]
    Config(#[from] cpal::DefaultStreamConfigError),

    /// The stream could not be built with the negotiated configuration.
    #[error("Failed to build output stream: {0}")]
    Build(#[from] cpal::BuildStreamError),

    /// The stream was built but would not start.
    #[error("Failed to start output stream: {0}")]
    Play(#[from] cpal::PlayStreamError),

    /// The device's native sample format is not 32-bit float.
    #[error("Unsupported sample format: {0}")]
    UnsupportedFormat(String),
}

pub type Result<T> = std::result::Result<T, OutputError>;

/// Device and buffer preferences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputConfig {
    /// Preferred callback size in frames. `None` leaves it to the device.
    pub buffer_frames: Option<u32>,
    /// Case-insensitive substring of the device name. `None` picks the
    /// host default.
    pub device_name: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            buffer_frames: Some(256),
            device_name: None,
        }
    }
}

/// What the device agreed to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StreamInfo {
    pub sample_rate: f64,
    pub channels: usize,
}

pub struct AudioOutput {
    config: OutputConfig,
    stream: Option<cpal::Stream>,
    info: Option<StreamInfo>,
}

impl AudioOutput {
    pub fn new(config: OutputConfig) -> Self {
        Self {
            config,
            stream: None,
            info: None,
        }
    }

    /// Acquire the device and start playing.
    ///
    /// `make_callback` runs once, on this thread, after the format has been
    /// negotiated. The callback it returns fills interleaved `f32` buffers on
    /// the device thread. Does nothing if already running.
    pub fn start<F, C>(&mut self, make_callback: F) -> Result<StreamInfo>
    where
        F: FnOnce(&StreamInfo) -> C,
        C: FnMut(&mut [f32]) + Send + 'static,
    {
        if let (Some(_), Some(info)) = (&self.stream, self.info) {
            return Ok(info);
        }

        let device = self.find_device()?;
        let supported = device.default_output_config()?;

        if supported.sample_format() != cpal::SampleFormat::F32 {
            return Err(OutputError::UnsupportedFormat(format!(
                "{:?}",
                supported.sample_format()
            )));
        }

        let info = StreamInfo {
            sample_rate: supported.sample_rate().0 as f64,
            channels: supported.channels() as usize,
        };

        let mut stream_config = supported.config();
        if let Some(frames) = self.config.buffer_frames {
            stream_config.buffer_size = cpal::BufferSize::Fixed(frames);
        }

        let mut callback = make_callback(&info);
        let stream = device.build_output_stream(
            &stream_config,
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| callback(data),
            |err| tracing::error!(%err, "output stream error"),
            None,
        )?;
        stream.play()?;

        let name = device.name().unwrap_or_default();
        tracing::info!(
            device = %name,
            sample_rate = info.sample_rate,
            channels = info.channels,
            buffer_frames = ?self.config.buffer_frames,
            "output stream started"
        );

        self.stream = Some(stream);
        self.info = Some(info);
        Ok(info)
    }

    /// Release the device. Safe to call when not running.
    pub fn stop(&mut self) {
        if self.stream.take().is_some() {
            tracing::info!("output stream stopped");
        }
        self.info = None;
    }

    pub fn is_running(&self) -> bool {
        self.stream.is_some()
    }

    /// Format of the running stream.
    pub fn info(&self) -> Option<StreamInfo> {
        self.info
    }

    fn find_device(&self) -> Result<cpal::Device> {
        let host = cpal::default_host();

        match self.config.device_name.as_deref() {
            Some(search) => {
                let search_lower = search.to_lowercase();
                for device in host.output_devices()? {
                    if let Ok(name) = device.name() {
                        if name.to_lowercase().contains(&search_lower) {
                            return Ok(device);
                        }
                    }
                }
                Err(OutputError::DeviceNotFound(format!(
                    "no output device matching '{}'",
                    search
                )))
            }
            None => host.default_output_device().ok_or(OutputError::NoDevice),
        }
    }
}

impl Default for AudioOutput {
    fn default() -> Self {
        Self::new(OutputConfig::default())
    }
}

impl Drop for AudioOutput {
    fn drop(&mut self) {
        self.stop();
    }
}
