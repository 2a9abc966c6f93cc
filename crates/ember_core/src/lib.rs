//! Ember Core - assets and settings consumed by the path tracer.
//!
//! This crate provides:
//!
//! - **Images**: decoded, linear-space pixel buffers for image textures
//! - **Meshes**: triangle batches with optional per-vertex UVs
//! - **Settings**: serde-backed render and camera configuration
//!
//! # Example
//!
//! ```ignore
//! use ember_core::{ImageData, RenderSettings};
//!
//! let settings = RenderSettings::load("scene.json")?;
//! let earth = ImageData::load("textures/earthmap.jpg")?;
//! println!("{}x{} @ {} spp", settings.image_width, settings.image_height, settings.samples_per_pixel);
//! ```

pub mod error;
pub mod image_data;
pub mod mesh;
pub mod settings;

// Re-export commonly used types
pub use error::{CoreError, Result};
pub use image_data::ImageData;
pub use mesh::Mesh;
pub use settings::{CameraSettings, RenderSettings};
