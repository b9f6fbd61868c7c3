use crate::playback::{PlaybackEvent, PlaybackSink};
use cpal::traits::{DeviceTrait, StreamTrait};
use cpal::{Device, SampleRate, Stream, StreamConfig};
use mobivox_core::{AudioError, SampleBuffer};
use ringbuf::traits::{Consumer, Producer, Split};
use ringbuf::HeapRb;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

// ── StreamHandle ──────────────────────────────────────────────

/// The live output session. Dropping it halts the stream.
pub struct StreamHandle {
    _stream: Stream,
}

// ── CpalSink ──────────────────────────────────────────────────

/// Plays a `SampleBuffer` through a cpal output device. The whole clip is
/// staged in a ring buffer; the stream callback drains it and emits exactly
/// one `Finished` event once the buffer underruns after exhaustion.
pub struct CpalSink {
    device: Device,
}

impl CpalSink {
    pub fn new(device: Device) -> Self {
        Self { device }
    }
}

impl PlaybackSink for CpalSink {
    type Handle = StreamHandle;

    fn start(
        &mut self,
        buffer: &SampleBuffer,
        generation: u64,
        events: mpsc::UnboundedSender<PlaybackEvent>,
    ) -> Result<StreamHandle, AudioError> {
        let channels = buffer.channel_count().max(1) as u16;
        let frame_count = buffer.frame_count();
        let total = frame_count * buffer.channel_count();

        // Re-interleave the clip into the ring buffer up front.
        let rb = HeapRb::<f32>::new(total.max(1));
        let (mut producer, consumer) = rb.split();
        for i in 0..frame_count {
            for c in 0..buffer.channel_count() {
                let _ = producer.try_push(buffer.channel(c)[i]);
            }
        }

        let consumer = Arc::new(Mutex::new(consumer));
        let notified = Arc::new(AtomicBool::new(false));
        let notified_flag = Arc::clone(&notified);
        let err_events = events.clone();

        let config = StreamConfig {
            channels,
            sample_rate: SampleRate(buffer.sample_rate()),
            buffer_size: cpal::BufferSize::Default,
        };

        let err_callback = move |err: cpal::StreamError| {
            tracing::error!("output stream error: {}", err);
            // Unblock the controller; the session cannot make progress.
            if !notified_flag.swap(true, Ordering::Relaxed) {
                let _ = err_events.send(PlaybackEvent::Finished { generation });
            }
        };

        let notified_cb = Arc::clone(&notified);
        let stream = self
            .device
            .build_output_stream(
                &config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    let drained = match consumer.lock() {
                        Ok(mut cons) => cons.pop_slice(data),
                        Err(_) => 0,
                    };
                    if drained < data.len() {
                        data[drained..].fill(0.0);
                        if !notified_cb.swap(true, Ordering::Relaxed) {
                            let _ = events.send(PlaybackEvent::Finished { generation });
                        }
                    }
                },
                err_callback,
                None,
            )
            .map_err(|e| match e {
                cpal::BuildStreamError::DeviceNotAvailable => {
                    AudioError::PermissionDenied("output device not available".to_string())
                }
                other => AudioError::StreamBuild(other.to_string()),
            })?;

        // Resumes the device if the platform suspended it.
        stream
            .play()
            .map_err(|e| AudioError::StreamBuild(e.to_string()))?;

        Ok(StreamHandle { _stream: stream })
    }
}
