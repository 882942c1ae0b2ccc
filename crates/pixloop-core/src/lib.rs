//! # pixloop-core
//!
//! Core types and primitives for the Pixloop scene engine.
//! This crate contains foundational types shared across all Pixloop crates:
//! colors and blending, the RGB canvas with its draw primitives, geometry,
//! render settings, content hashing, the encoder seam, and error types.

pub mod canvas;
pub mod color;
pub mod config;
pub mod encoder;
pub mod error;
pub mod hash;
pub mod math;

pub use config::*;

pub use canvas::Canvas;
pub use color::Rgb;
pub use encoder::{AnimationEncoder, FrameTiming, LoopMode};
pub use error::{PixloopError, PixloopResult};
pub use math::{BBox, Point2D};
