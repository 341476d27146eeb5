//! Generative image and video API integration.
//!
//! # Endpoints
//!
//! ```text
//! POST {base}/models/{model}:generateContent      try-on composition
//! POST {base}/models/{model}:predictLongRunning   start look animation
//! GET  {base}/{operation}                         poll an operation
//! GET  {uri}                                      download a generated video
//! ```
//!
//! Errors are classified at this boundary (see [`ErrorKind`]); callers never
//! need to inspect messages.

pub mod client;
pub mod error;
pub mod types;
pub mod video;

pub use client::GeminiClient;
pub use error::{ErrorKind, GenerationError};
pub use types::{Blob, Part};
pub use video::{GeneratedVideo, PollSchedule, VideoGenerator};
