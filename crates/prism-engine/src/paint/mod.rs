//! Paint model: colors used for clears and constant shader outputs.

pub mod color;

pub use color::Color;
