use serde::Serialize;

use crate::{
    config::{CameraConfig, TempoConfig, TunnelConfig},
    timeline::{CallbackId, Cue, CueScheduler},
    CameraAnimator, DepthStack, TickReport,
};

/// Explicit context shared by the frame loop and the cue handlers.
#[derive(Debug, Clone)]
pub struct Simulation {
    stack: DepthStack,
    camera: CameraAnimator,
    camera_config: CameraConfig,
    tempo: TempoConfig,
    frame_index: u64,
}

/// Snapshot of what the last frame produced.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct FrameSummary {
    pub frame_index: u64,
    pub camera_depth: f64,
    pub current_layer: usize,
    pub tick: TickReport,
}

impl Simulation {
    pub fn new(config: &TunnelConfig) -> Self {
        Self {
            stack: DepthStack::new(config),
            camera: CameraAnimator::new(),
            camera_config: config.camera,
            tempo: config.tempo,
            frame_index: 0,
        }
    }

    /// Scheduler with every [`CallbackId`] bound to its handler.
    pub fn scheduler() -> CueScheduler<Self> {
        let mut scheduler = CueScheduler::new();
        scheduler.bind(CallbackId::Travel, Self::on_travel_cue);
        scheduler.bind(CallbackId::Layer, Self::on_layer_cue);
        scheduler
    }

    pub fn stack(&self) -> &DepthStack {
        &self.stack
    }

    pub fn camera(&self) -> &CameraAnimator {
        &self.camera
    }

    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    /// Grows the current band by one tick and moves the camera to `now`.
    pub fn frame(&mut self, now: f64) -> FrameSummary {
        let tick = self.stack.advance_one_tick(self.frame_index);
        let camera_depth = self.camera.update(now);
        let summary = FrameSummary {
            frame_index: self.frame_index,
            camera_depth,
            current_layer: self.stack.current_index(),
            tick,
        };
        self.frame_index += 1;
        summary
    }

    /// Short notes flip to the next band, longer ones carry the camera one
    /// segment deeper over the note's length.
    pub fn on_travel_cue(&mut self, cue: &Cue) {
        let duration = self.tempo.ticks_to_seconds(cue.event.duration_ticks);
        if duration < self.camera_config.short_cue_threshold {
            self.stack.advance_current();
            return;
        }
        self.camera
            .start(cue.firing_time, duration, self.camera_config.segment_length);
    }

    pub fn on_layer_cue(&mut self, _cue: &Cue) {
        self.stack.advance_current();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        camera::CameraState,
        config::StackConfig,
        timeline::{CueCursor, NoteEvent},
    };

    fn config() -> TunnelConfig {
        TunnelConfig {
            stack: StackConfig {
                layers: 3,
                spacing: 2400.0,
            },
            tempo: TempoConfig {
                ppq: 480.0,
                bpm: 60.0,
            },
            ..Default::default()
        }
    }

    fn note(time: f64, duration_ticks: u64) -> NoteEvent {
        NoteEvent {
            ticks: (time * 480.0) as u64,
            time,
            duration_ticks,
        }
    }

    #[test]
    fn long_note_moves_camera() {
        let mut sim = Simulation::new(&config());
        let mut scheduler = Simulation::scheduler();
        scheduler
            .register_sequence(&[note(1.0, 960)], CallbackId::Travel, false)
            .unwrap();

        let mut cursor = CueCursor::new();
        cursor.fire_due(&scheduler, 1.0, &mut sim).unwrap();

        match sim.camera().state() {
            CameraState::Animating(animation) => {
                assert_eq!(animation.duration, 2.0);
                assert_eq!(animation.target_depth, 2400.0);
            }
            CameraState::Idle => panic!("long notes should animate"),
        }
        assert_eq!(sim.frame(2.0).camera_depth, 1200.0);
        assert_eq!(sim.frame(3.0).camera_depth, 2400.0);
        assert!(!sim.camera().is_animating());
        assert_eq!(sim.stack().current_index(), 0);
    }

    #[test]
    fn short_note_switches_layer_only() {
        let mut sim = Simulation::new(&config());
        let mut scheduler = Simulation::scheduler();
        scheduler
            .register_sequence(&[note(0.0, 120), note(0.5, 120)], CallbackId::Travel, false)
            .unwrap();

        CueCursor::new().fire_due(&scheduler, 1.0, &mut sim).unwrap();

        assert_eq!(sim.stack().current_index(), 2);
        assert!(!sim.camera().is_animating());
        assert_eq!(sim.camera().depth(), 0.0);
    }

    #[test]
    fn layer_cue_wraps() {
        let mut sim = Simulation::new(&config());
        let scheduler = {
            let mut scheduler = Simulation::scheduler();
            let notes: Vec<_> = (0..3).map(|i| note(i as f64, 10_000)).collect();
            scheduler
                .register_sequence(&notes, CallbackId::Layer, false)
                .unwrap();
            scheduler
        };

        CueCursor::new().fire_due(&scheduler, 10.0, &mut sim).unwrap();
        assert_eq!(sim.stack().current_index(), 0);
    }

    #[test]
    fn frames_advance_the_current_band() {
        let mut sim = Simulation::new(&config());
        let first = sim.frame(0.0);
        let second = sim.frame(1.0 / 60.0);

        assert_eq!(first.frame_index, 0);
        assert_eq!(second.frame_index, 1);
        assert_eq!(sim.frame_index(), 2);
        assert_eq!(first.tick.grown, 1);
        assert!(sim.stack().current_set().circles().len() > 1);
    }
}
