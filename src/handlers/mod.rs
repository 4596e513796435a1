//! HTTP handlers for the entrepreneur resource.

pub mod entrepreneurs;

pub use entrepreneurs::*;
