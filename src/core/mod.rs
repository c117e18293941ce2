//! Platform-agnostic core - shared between the WASM app and the CLI

pub mod backdrop;
pub mod circuit;
pub mod config;
pub mod drift;
pub mod frame_loop;
pub mod math;
pub mod palette;
pub mod stats;
pub mod surface;

pub use backdrop::{Backdrop, Field};
pub use config::{BackdropConfig, CircuitParams, ConfigError, DriftParams, Variant};
pub use math::Vec2;
pub use palette::Rgba;
pub use stats::{FpsCounter, FrameStats};
pub use surface::{DrawCommand, RecordingSurface, Surface};
