//! Core library for the Circle Tunnel simulation.
//!
//! Discs grow inside a rectangle until they fill it, several such fillings
//! are stacked along the depth axis to form a tunnel, and a camera travels
//! through that tunnel on cues taken from a note track. Each module owns one
//! subsystem; the host application supplies the clock, the window and the
//! actual drawing.

pub mod camera;
pub mod circle;
pub mod config;
pub mod error;
pub mod packing;
pub mod render;
pub mod scene;
pub mod timeline;
pub mod tunnel;

pub use camera::{CameraAnimation, CameraAnimator, CameraState};
pub use circle::Circle;
pub use config::{
    CameraConfig, CanvasConfig, PackingConfig, StackConfig, TempoConfig, TunnelConfig,
};
pub use error::{Result, TunnelError};
pub use packing::{PackingSet, TickReport, MIRROR_GENERATIONS};
pub use render::{DiscInstance, Material, RenderGraph};
pub use scene::{FrameSummary, Simulation};
pub use timeline::{
    AudioClock, CallbackId, Cue, CueCursor, CueHandler, CueScheduler, CueSheet, CueTrack,
    NoteEvent, PlaybackClock,
};
pub use tunnel::DepthStack;
