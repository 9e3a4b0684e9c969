//! Cue scheduling driven by an external playback clock.
//!
//! [`CueScheduler`] turns note tracks into a time-ordered table of bindings.
//! It never polls: whoever owns the clock decides when a binding is due and
//! calls [`CueScheduler::fire`]. [`CueCursor`] is such a clock-side helper for
//! hosts that step time manually.

use std::{collections::HashMap, fmt, path::Path};

use serde::{Deserialize, Serialize};

use crate::{Result, TunnelError};

/// Stable identifier of a cue handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallbackId {
    /// Moves the camera one segment, or switches band for short notes.
    Travel,
    /// Always switches to the next band.
    Layer,
}

/// One timed note as delivered by the cue source.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteEvent {
    /// Quantised position in ticks; notes sharing it are simultaneous.
    pub ticks: u64,
    /// Absolute time in seconds.
    pub time: f64,
    pub duration_ticks: u64,
}

/// A note accepted for firing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cue {
    pub firing_time: f64,
    pub event: NoteEvent,
    /// 1-based position within the registered sequence.
    pub sequence_number: u32,
    pub callback: CallbackId,
}

/// Function invoked with the simulation context when a cue fires.
pub type CueHandler<C> = fn(&mut C, &Cue);

struct Binding<C> {
    cue: Cue,
    handler: CueHandler<C>,
}

/// Table of time → handler bindings for a context type `C`.
pub struct CueScheduler<C> {
    handlers: HashMap<CallbackId, CueHandler<C>>,
    bindings: Vec<Binding<C>>,
}

impl<C> Default for CueScheduler<C> {
    fn default() -> Self {
        Self {
            handlers: HashMap::new(),
            bindings: Vec::new(),
        }
    }
}

impl<C> CueScheduler<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Associates `callback` with `handler`. Later registrations resolve the
    /// id to this function; sequences registered earlier keep their handler.
    pub fn bind(&mut self, callback: CallbackId, handler: CueHandler<C>) {
        self.handlers.insert(callback, handler);
    }

    /// Registers a time-ordered note sequence and returns how many cues were
    /// accepted. Unless `polyphonic` is set, notes sharing the tick of the
    /// previously accepted note are dropped.
    pub fn register_sequence(
        &mut self,
        events: &[NoteEvent],
        callback: CallbackId,
        polyphonic: bool,
    ) -> Result<usize> {
        let handler = *self
            .handlers
            .get(&callback)
            .ok_or(TunnelError::UnknownCallback(callback))?;

        let mut last_tick = None;
        let mut sequence_number = 1;
        let before = self.bindings.len();

        for event in events {
            if last_tick == Some(event.ticks) && !polyphonic {
                continue;
            }
            self.bindings.push(Binding {
                cue: Cue {
                    firing_time: event.time,
                    event: *event,
                    sequence_number,
                    callback,
                },
                handler,
            });
            last_tick = Some(event.ticks);
            sequence_number += 1;
        }

        // Stable, so simultaneous cues keep their registration order.
        self.bindings
            .sort_by(|a, b| a.cue.firing_time.total_cmp(&b.cue.firing_time));

        let accepted = self.bindings.len() - before;
        tracing::debug!(
            ?callback,
            polyphonic,
            accepted,
            dropped = events.len() - accepted,
            "registered cue sequence"
        );
        Ok(accepted)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn cue(&self, index: usize) -> Option<&Cue> {
        self.bindings.get(index).map(|binding| &binding.cue)
    }

    /// Cues in firing order.
    pub fn cues(&self) -> impl Iterator<Item = &Cue> {
        self.bindings.iter().map(|binding| &binding.cue)
    }

    /// Entry point for the clock: runs the handler bound to `index`.
    pub fn fire(&self, index: usize, context: &mut C) -> Result<()> {
        let binding = self
            .bindings
            .get(index)
            .ok_or(TunnelError::ResourceNotReady(index))?;
        (binding.handler)(context, &binding.cue);
        Ok(())
    }
}

impl<C> fmt::Debug for CueScheduler<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CueScheduler")
            .field("handlers", &self.handlers.keys().collect::<Vec<_>>())
            .field("bindings", &self.bindings.len())
            .finish()
    }
}

/// Read access to the playback position of an audio transport.
pub trait AudioClock {
    /// Seconds since the start of the track.
    fn current_time(&self) -> f64;
    fn is_playing(&self) -> bool;
}

/// Manually stepped transport used by headless hosts and tests.
#[derive(Debug, Default, Clone)]
pub struct PlaybackClock {
    time_seconds: f64,
    playing: bool,
}

impl PlaybackClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn play(&mut self) {
        self.playing = true;
    }

    pub fn pause(&mut self) {
        self.playing = false;
    }

    pub fn reset(&mut self) {
        self.time_seconds = 0.0;
    }

    /// Moves time forward while playing; paused clocks ignore the delta.
    pub fn advance(&mut self, delta: f64) {
        if self.playing {
            self.time_seconds = (self.time_seconds + delta).max(0.0);
        }
    }
}

impl AudioClock for PlaybackClock {
    fn current_time(&self) -> f64 {
        self.time_seconds
    }

    fn is_playing(&self) -> bool {
        self.playing
    }
}

/// Clock-side cursor that fires every binding whose time has been reached.
#[derive(Debug, Default, Clone)]
pub struct CueCursor {
    next: usize,
}

impl CueCursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fires, in order, all not yet fired cues with `firing_time <= now`.
    /// Returns the number of cues fired.
    pub fn fire_due<C>(
        &mut self,
        scheduler: &CueScheduler<C>,
        now: f64,
        context: &mut C,
    ) -> Result<usize> {
        let start = self.next;
        while let Some(cue) = scheduler.cue(self.next) {
            if cue.firing_time > now {
                break;
            }
            scheduler.fire(self.next, context)?;
            self.next += 1;
        }
        Ok(self.next - start)
    }

    pub fn rewind(&mut self) {
        self.next = 0;
    }

    pub fn is_exhausted<C>(&self, scheduler: &CueScheduler<C>) -> bool {
        self.next >= scheduler.len()
    }
}

/// One note track inside a [`CueSheet`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CueTrack {
    pub callback: CallbackId,
    #[serde(default)]
    pub polyphonic: bool,
    pub notes: Vec<NoteEvent>,
}

/// Serialisable bundle of note tracks handed over once loading completes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CueSheet {
    pub tracks: Vec<CueTrack>,
}

impl CueSheet {
    pub fn from_json_str(source: &str) -> Result<Self> {
        Ok(serde_json::from_str(source)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_json_str(&source)
    }

    /// Registers every track with `scheduler`, returning the accepted total.
    pub fn register_all<C>(&self, scheduler: &mut CueScheduler<C>) -> Result<usize> {
        self.tracks.iter().try_fold(0, |total, track| {
            scheduler
                .register_sequence(&track.notes, track.callback, track.polyphonic)
                .map(|accepted| total + accepted)
        })
    }
}
