//! Data models for the weather route service
//!
//! This module contains the core domain models organized by concern:
//! - Coordinate: validated geographic coordinates and bounds
//! - Route: legs, steps and encoded geometry as delivered by a directions provider
//! - Weather: observations and the time-annotated points they are attached to

pub mod coordinate;
pub mod route;
pub mod weather;

// Re-export all public types for convenient access
pub use coordinate::{Bounds, Coordinate, Path};
pub use route::{EncodedPath, Leg, Route, Step};
pub use weather::{TimedPoint, WeatherObservation, WeatherPoint};
