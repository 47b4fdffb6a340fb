#![deny(missing_docs)]

//! An HTTP service that captions images with the Google Gemini API.
//!
//! Clients POST an image reference — a remote URL, an inline base64 data
//! URI, or a provider file URI — and receive a short accessibility-oriented
//! text description. Source normalization lives in [`source`], the API
//! client in [`client`], and the HTTP surface in [`server`].

pub mod client;
pub mod error;
pub mod models;
pub mod server;
pub mod source;

pub use client::{CaptionModel, CAPTION_PROMPT};
pub use error::CaptionError;
pub use source::ImageSource;
