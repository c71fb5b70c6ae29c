#![deny(unsafe_code)]
//! Core types and traits for the contour-field animation system.
//!
//! Provides the coarse scalar [`Field`] grid, shared geometry (`Segment`,
//! `Path`), colors (`Srgb`, `Rgba`, `Hsla`), the [`Canvas2D`] drawing trait
//! with a recording implementation, the object-safe [`Scene`] trait, the
//! host-agnostic [`AnimationDriver`], and parameter helpers.

pub mod canvas;
pub mod color;
pub mod driver;
pub mod error;
pub mod field;
pub mod geometry;
pub mod params;
pub mod scene;

pub use canvas::{Canvas2D, DrawCommand, Gradient, Paint, RecordingCanvas, StrokeStyle};
pub use color::{Hsla, Rgba, Srgb};
pub use driver::{AnimationDriver, DriverState, FrameHost, FrameRequest};
pub use error::FieldError;
pub use field::Field;
pub use geometry::{Path, Point, Segment};
pub use scene::Scene;
