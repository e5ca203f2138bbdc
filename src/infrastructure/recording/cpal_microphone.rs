//! Microphone adapter using cpal
//!
//! cpal::Stream is not Send, so each capture owns a dedicated thread that
//! builds the stream, forwards callbacks as events and drops the stream
//! when asked to stop.

use async_trait::async_trait;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleFormat, StreamConfig};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, warn};

use crate::application::ports::{CaptureEvent, CaptureStream, DeviceAccessError, Microphone};
use crate::domain::recording::{AudioEncoding, AudioFragment};

type EventSender = mpsc::UnboundedSender<CaptureEvent>;

/// Default input device of the default host
#[derive(Debug, Clone, Copy, Default)]
pub struct CpalMicrophone;

impl CpalMicrophone {
    pub fn new() -> Self {
        Self
    }

    fn input_device() -> Result<cpal::Device, DeviceAccessError> {
        cpal::default_host()
            .default_input_device()
            .ok_or(DeviceAccessError::NoInputDevice)
    }

    fn input_config(device: &cpal::Device) -> Result<(StreamConfig, SampleFormat), DeviceAccessError> {
        let supported = device
            .default_input_config()
            .map_err(|e| DeviceAccessError::Unavailable(e.to_string()))?;
        let format = supported.sample_format();
        Ok((supported.into(), format))
    }

    /// Build and start the stream, returning it with its sample rate
    fn start_stream(events: &EventSender) -> Result<(cpal::Stream, u32), DeviceAccessError> {
        let device = Self::input_device()?;
        let (config, format) = Self::input_config(&device)?;
        let channels = config.channels;
        let sample_rate = config.sample_rate.0;
        debug!(
            device = %device.name().unwrap_or_default(),
            sample_rate,
            channels,
            ?format,
            "opening input stream"
        );

        let on_error = {
            let events = events.clone();
            move |err: cpal::StreamError| {
                error!(error = %err, "input stream error");
                let _ = events.send(CaptureEvent::Failed(err.to_string()));
            }
        };

        let stream = match format {
            SampleFormat::I16 => {
                let events = events.clone();
                device.build_input_stream(
                    &config,
                    move |data: &[i16], _: &cpal::InputCallbackInfo| {
                        forward(&events, &downmix(data, channels));
                    },
                    on_error,
                    None,
                )
            }
            SampleFormat::F32 => {
                let events = events.clone();
                device.build_input_stream(
                    &config,
                    move |data: &[f32], _: &cpal::InputCallbackInfo| {
                        let pcm: Vec<i16> = data.iter().map(|&s| f32_to_i16(s)).collect();
                        forward(&events, &downmix(&pcm, channels));
                    },
                    on_error,
                    None,
                )
            }
            other => {
                return Err(DeviceAccessError::Unavailable(format!(
                    "unsupported sample format {other:?}"
                )))
            }
        }
        .map_err(|e| DeviceAccessError::Denied(e.to_string()))?;

        stream
            .play()
            .map_err(|e| DeviceAccessError::Denied(e.to_string()))?;

        Ok((stream, sample_rate))
    }

    fn run(
        events: EventSender,
        stop: oneshot::Receiver<()>,
        ready: oneshot::Sender<Result<u32, DeviceAccessError>>,
    ) {
        let stream = match Self::start_stream(&events) {
            Ok((stream, sample_rate)) => {
                if ready.send(Ok(sample_rate)).is_err() {
                    return;
                }
                stream
            }
            Err(err) => {
                let _ = ready.send(Err(err));
                return;
            }
        };

        // Resolves on an explicit stop and when the CaptureStream is dropped.
        let _ = stop.blocking_recv();
        drop(stream);
        debug!("input stream released");
        let _ = events.send(CaptureEvent::Stopped);
    }
}

#[async_trait]
impl Microphone for CpalMicrophone {
    async fn open(&self) -> Result<CaptureStream, DeviceAccessError> {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (stop_tx, stop_rx) = oneshot::channel();
        let (ready_tx, ready_rx) = oneshot::channel();

        std::thread::Builder::new()
            .name("vocawork-capture".to_string())
            .spawn(move || Self::run(events_tx, stop_rx, ready_tx))
            .map_err(|e| DeviceAccessError::Unavailable(e.to_string()))?;

        let sample_rate = ready_rx.await.map_err(|_| {
            warn!("capture thread exited before the device was ready");
            DeviceAccessError::Unavailable("capture thread exited".to_string())
        })??;

        Ok(CaptureStream::new(
            AudioEncoding::Pcm16Mono { sample_rate },
            events_rx,
            stop_tx,
        ))
    }
}

fn forward(events: &EventSender, mono: &[i16]) {
    if !mono.is_empty() {
        let _ = events.send(CaptureEvent::Fragment(AudioFragment::from_samples(mono)));
    }
}

fn f32_to_i16(sample: f32) -> i16 {
    (sample.clamp(-1.0, 1.0) * 32767.0) as i16
}

/// Average interleaved channels into one
fn downmix(samples: &[i16], channels: u16) -> Vec<i16> {
    if channels <= 1 {
        return samples.to_vec();
    }

    samples
        .chunks(channels as usize)
        .map(|frame| {
            let sum: i32 = frame.iter().map(|&s| s as i32).sum();
            (sum / frame.len() as i32) as i16
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn downmix_mono_is_unchanged() {
        let mono = vec![100i16, -200, 300];
        assert_eq!(downmix(&mono, 1), mono);
    }

    #[test]
    fn downmix_averages_frames() {
        let stereo = vec![100i16, 200, 300, 400];
        assert_eq!(downmix(&stereo, 2), vec![150, 350]);
    }

    #[test]
    fn downmix_handles_partial_frame() {
        let samples = vec![10i16, 20, 30, 40, 50];
        assert_eq!(downmix(&samples, 2), vec![15, 35, 50]);
    }

    #[test]
    fn f32_samples_are_clamped() {
        assert_eq!(f32_to_i16(0.0), 0);
        assert_eq!(f32_to_i16(1.0), 32767);
        assert_eq!(f32_to_i16(4.0), 32767);
        assert_eq!(f32_to_i16(-4.0), -32767);
    }

    #[test]
    fn empty_callbacks_are_not_forwarded() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        forward(&tx, &[]);
        forward(&tx, &[1, 2]);
        drop(tx);

        let event = rx.try_recv().unwrap();
        assert_eq!(
            event,
            CaptureEvent::Fragment(AudioFragment::from_samples(&[1, 2]))
        );
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    #[ignore = "Requires audio hardware"]
    async fn opens_default_device() {
        let stream = CpalMicrophone::new().open().await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(200)).await;
        let fragments = stream.finish().await.unwrap();
        assert!(!fragments.is_empty());
    }
}
