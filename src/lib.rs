//! aiworx - writing, coding, vision and voice tools on top of the Gemini API
//!
//! The core is a set of generation adapters (text, image, vision, audio)
//! that shape provider requests, decode the modality-specific responses and
//! report every outcome as a [`models::GenerationResult`]. Around it sit the
//! prompt templates for each tool and small local stores for the API key and
//! saved results.

pub mod ai;
pub mod app;
pub mod credentials;
pub mod error;
pub mod models;
pub mod prompts;
pub mod store;
pub mod workspace;

pub use error::{Error, Result};
