//! CPAL-based audio output backend.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, Stream, StreamConfig};
use ringbuf::traits::{Consumer, Producer, Split};
use ringbuf::{HeapCons, HeapProd, HeapRb};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::traits::{AudioError, AudioOutput};

/// CPAL output fed with mono samples through a ring buffer.
///
/// Each mono sample is copied to every device channel.
pub struct CpalOutput {
    device: Device,
    config: StreamConfig,
    stream: Option<Stream>,
    producer: HeapProd<f32>,
    running: Arc<AtomicBool>,
}

impl CpalOutput {
    /// Open the default output device with roughly 100ms of buffering.
    pub fn new() -> Result<(Self, HeapCons<f32>), AudioError> {
        let host = cpal::default_host();
        let device = host.default_output_device().ok_or(AudioError::NoDevice)?;
        if let Ok(name) = device.name() {
            log::info!("audio device: {name}");
        }

        let config: StreamConfig = device
            .default_output_config()
            .map_err(|e| AudioError::DeviceInit(e.to_string()))?
            .into();
        log::debug!(
            "stream config: {} Hz, {} channels",
            config.sample_rate.0,
            config.channels
        );

        let rb = HeapRb::<f32>::new((config.sample_rate.0 as usize / 10).max(64));
        let (producer, consumer) = rb.split();

        let output = Self {
            device,
            config,
            stream: None,
            producer,
            running: Arc::new(AtomicBool::new(false)),
        };
        Ok((output, consumer))
    }

    /// Build and start the device stream draining `consumer`.
    pub fn build_stream(&mut self, mut consumer: HeapCons<f32>) -> Result<(), AudioError> {
        let running = self.running.clone();
        let channels = self.config.channels.max(1) as usize;

        let stream = self
            .device
            .build_output_stream(
                &self.config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    if !running.load(Ordering::Relaxed) {
                        data.fill(0.0);
                        return;
                    }
                    for frame in data.chunks_mut(channels) {
                        let sample = consumer.try_pop().unwrap_or(0.0);
                        frame.fill(sample);
                    }
                },
                |err| log::error!("audio stream error: {err}"),
                None,
            )
            .map_err(|e| AudioError::StreamCreate(e.to_string()))?;

        stream.play().map_err(|e| AudioError::Playback(e.to_string()))?;
        self.stream = Some(stream);
        Ok(())
    }

    /// Push one sample, spinning until the ring buffer has room.
    pub fn write_spin(&mut self, sample: f32) {
        while self.producer.try_push(sample).is_err() {
            std::hint::spin_loop();
        }
    }
}

impl AudioOutput for CpalOutput {
    fn sample_rate(&self) -> u32 {
        self.config.sample_rate.0
    }

    fn write(&mut self, samples: &[f32]) -> usize {
        self.producer.push_slice(samples)
    }

    fn start(&mut self) -> Result<(), AudioError> {
        self.running.store(true, Ordering::Relaxed);
        if let Some(ref stream) = self.stream {
            stream.play().map_err(|e| AudioError::Playback(e.to_string()))?;
        }
        Ok(())
    }

    fn stop(&mut self) -> Result<(), AudioError> {
        self.running.store(false, Ordering::Relaxed);
        if let Some(ref stream) = self.stream {
            stream.pause().map_err(|e| AudioError::Playback(e.to_string()))?;
        }
        Ok(())
    }
}
