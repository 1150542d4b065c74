//! Audio output - plays rendered kicks on the default device
//!
//! The audio callback owns a cursor into the kick being played. New kicks
//! arrive over an rtrb ring and replace the current one immediately, the way
//! a retriggered drum machine voice restarts. Replaced kicks travel back over
//! a second ring and are freed by the player, never on the audio thread.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use kick_synth::{RenderedSignal, SAMPLE_RATE};
use rtrb::{Consumer, Producer, RingBuffer};
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};
use tracing::{info, warn};

/// Pending kicks the callback has not picked up yet
const QUEUE_CAPACITY: usize = 8;
/// Every queued kick can retire one buffer, plus the one playing
const RETIRED_CAPACITY: usize = QUEUE_CAPACITY + 1;

/// Control side: sends kicks to the audio callback
pub struct KickPlayer {
    tx: Producer<Arc<[f32]>>,
    retired: Consumer<Arc<[f32]>>,
    /// Samples of the current kick already played (shared with the callback)
    position: Arc<AtomicUsize>,
    /// Length of the most recently sent kick
    length: usize,
}

impl KickPlayer {
    /// Start playing `signal` from its first sample, cutting off whatever was playing.
    pub fn play(&mut self, signal: &RenderedSignal) {
        self.reclaim();
        let samples: Arc<[f32]> = signal.amplitude.as_slice().into();
        self.length = samples.len();
        if self.tx.push(samples).is_err() {
            warn!("playback queue full, dropping kick");
        }
    }

    /// Free the kicks the callback has finished with. Returns how many.
    pub fn reclaim(&mut self) -> usize {
        let mut freed = 0;
        while self.retired.pop().is_ok() {
            freed += 1;
        }
        freed
    }

    /// Playback progress of the latest kick in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        if self.length == 0 {
            return 0.0;
        }
        let played = self.position.load(Ordering::Relaxed).min(self.length);
        played as f64 / self.length as f64
    }
}

/// Audio-thread side: the kick being played and the cursor into it
struct Playback {
    incoming: Consumer<Arc<[f32]>>,
    retired: Producer<Arc<[f32]>>,
    current: Option<Arc<[f32]>>,
    cursor: usize,
    position: Arc<AtomicUsize>,
}

impl Playback {
    /// Fill one interleaved output buffer. Allocation- and free-free.
    fn fill(&mut self, data: &mut [f32], channels: usize) {
        // Latest kick wins
        while let Ok(kick) = self.incoming.pop() {
            if let Some(old) = self.current.replace(kick) {
                // Cannot be full: RETIRED_CAPACITY covers every queued kick
                let _ = self.retired.push(old);
            }
            self.cursor = 0;
        }

        // Duplicate mono to all channels, silence once the kick ends
        for frame in data.chunks_mut(channels.max(1)) {
            let sample = match &self.current {
                Some(kick) if self.cursor < kick.len() => {
                    let s = kick[self.cursor];
                    self.cursor += 1;
                    s
                }
                _ => 0.0,
            };
            frame.fill(sample);
        }
        self.position.store(self.cursor, Ordering::Relaxed);
    }
}

/// Connected control and audio-thread halves.
fn playback_pair() -> (KickPlayer, Playback) {
    let (tx, incoming) = RingBuffer::<Arc<[f32]>>::new(QUEUE_CAPACITY);
    let (retired_tx, retired_rx) = RingBuffer::<Arc<[f32]>>::new(RETIRED_CAPACITY);
    let position = Arc::new(AtomicUsize::new(0));

    let player = KickPlayer {
        tx,
        retired: retired_rx,
        position: position.clone(),
        length: 0,
    };
    let playback = Playback {
        incoming,
        retired: retired_tx,
        current: None,
        cursor: 0,
        position,
    };
    (player, playback)
}

pub type SharedPlayer = Arc<Mutex<KickPlayer>>;

/// Open output stream plus the player that feeds it
pub struct AudioOut {
    // Kept alive for as long as audio should play
    _stream: cpal::Stream,
    player: SharedPlayer,
}

impl AudioOut {
    pub fn open() -> EyreResult<Self> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| eyre!("no default output device available"))?;
        let default_config = device
            .default_output_config()
            .wrap_err("failed to fetch default output config")?;

        let channels = default_config.channels() as usize;
        let config = cpal::StreamConfig {
            channels: default_config.channels(),
            sample_rate: cpal::SampleRate(SAMPLE_RATE),
            buffer_size: cpal::BufferSize::Default,
        };

        let (player, mut playback) = playback_pair();

        let stream = device
            .build_output_stream(
                &config,
                move |data: &mut [f32], _| playback.fill(data, channels),
                |err| eprintln!("Stream error: {err}"),
                None,
            )
            .wrap_err("failed to build output stream")?;

        stream.play().wrap_err("failed to start output stream")?;
        info!(channels, sample_rate = SAMPLE_RATE, "audio output ready");

        Ok(Self {
            _stream: stream,
            player: Arc::new(Mutex::new(player)),
        })
    }

    pub fn player(&self) -> SharedPlayer {
        self.player.clone()
    }
}
