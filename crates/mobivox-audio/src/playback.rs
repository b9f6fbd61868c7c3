use mobivox_core::{AudioError, SampleBuffer};
use tokio::sync::mpsc;

// ── Events & state ────────────────────────────────────────────

/// Lifecycle messages delivered to the controller. Completion is an explicit
/// event, not a callback mutating controller state from the audio thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackEvent {
    /// The sink drained the whole buffer for the given generation.
    Finished { generation: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Idle,
    Playing,
}

// ── Sink seam ─────────────────────────────────────────────────

/// Backend seam for the playback state machine. A sink starts audible output
/// for a buffer and reports natural completion on the event channel, tagged
/// with the generation it was started under. Dropping the returned handle
/// halts output.
pub trait PlaybackSink {
    type Handle;

    fn start(
        &mut self,
        buffer: &SampleBuffer,
        generation: u64,
        events: mpsc::UnboundedSender<PlaybackEvent>,
    ) -> Result<Self::Handle, AudioError>;
}

// ── Controller ────────────────────────────────────────────────

/// Owns the single live playback handle. Transitions are exactly
/// Idle → Playing (play) and Playing → Idle (stop or Finished event);
/// at most one handle exists at any time.
pub struct PlaybackController<S: PlaybackSink> {
    sink: S,
    handle: Option<S::Handle>,
    generation: u64,
    events_tx: mpsc::UnboundedSender<PlaybackEvent>,
    events_rx: Option<mpsc::UnboundedReceiver<PlaybackEvent>>,
}

impl<S: PlaybackSink> PlaybackController<S> {
    pub fn new(sink: S) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            sink,
            handle: None,
            generation: 0,
            events_tx,
            events_rx: Some(events_rx),
        }
    }

    /// Take the receiving half of the event channel; the owner feeds received
    /// events back through `handle_event`.
    pub fn take_event_receiver(&mut self) -> Option<mpsc::UnboundedReceiver<PlaybackEvent>> {
        self.events_rx.take()
    }

    pub fn state(&self) -> PlaybackState {
        if self.handle.is_some() {
            PlaybackState::Playing
        } else {
            PlaybackState::Idle
        }
    }

    /// Start playing a buffer. A request while already playing supersedes the
    /// live handle: it is stopped and released before the new one starts.
    pub fn play(&mut self, buffer: &SampleBuffer) -> Result<(), AudioError> {
        if self.handle.is_some() {
            tracing::debug!(generation = self.generation, "replacing live playback");
            self.stop();
        }
        self.generation += 1;
        let handle = self
            .sink
            .start(buffer, self.generation, self.events_tx.clone())?;
        self.handle = Some(handle);
        tracing::debug!(
            generation = self.generation,
            frames = buffer.frame_count(),
            "playback started"
        );
        Ok(())
    }

    /// Halt the live handle immediately and release it. No-op while idle.
    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            drop(handle);
            tracing::debug!(generation = self.generation, "playback stopped");
        }
    }

    /// Apply a lifecycle event. A `Finished` for anything but the live
    /// generation is stale (its handle was already stopped) and is ignored.
    pub fn handle_event(&mut self, event: PlaybackEvent) {
        match event {
            PlaybackEvent::Finished { generation } => {
                if generation == self.generation && self.handle.is_some() {
                    self.handle = None;
                    tracing::debug!(generation, "playback finished");
                }
            }
        }
    }
}
