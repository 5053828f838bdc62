//! qr_reveal - animated reveal of QR code modules
//!
//! Encodes text with an external QR encoder, then paints the symbol's dark
//! modules one at a time in a chosen order (sequential, spiral, random, wave
//! or corners-first) at a configurable speed.
//!
//! # Example
//! ```
//! use std::time::Duration;
//! use qr_reveal::{AnimationMode, GenerateRequest, ImageSurface, QrcodegenEncoder, Session};
//!
//! let mut session = Session::new(QrcodegenEncoder, ImageSurface::new());
//! let request = GenerateRequest::new("HELLO")
//!     .mode(AnimationMode::Spiral)
//!     .delay(Duration::from_millis(10));
//! let generation = session.generate(&request).unwrap();
//!
//! // Drive the animation clock until every module is drawn
//! session.advance(Duration::from_secs(60));
//! assert_eq!(session.progress().current_step, generation.dark_modules);
//! let png = session.save().unwrap();
//! assert!(!png.is_empty());
//! ```

#![warn(missing_docs)]
#![allow(clippy::missing_docs_in_private_items)]

/// Module extraction, reveal orders and the step scheduler
pub mod animator;
/// Environment-driven defaults
pub mod config;
/// QR encoder boundary
pub mod encoder;
/// Error types
pub mod error;
/// Core data structures (BitMatrix, Module, CanvasSettings, ECLevel)
pub mod models;
/// Session controller tying encoder, scheduler and surface together
pub mod session;
/// Drawing surfaces (image-backed and recording)
pub mod surface;
/// Helpers for the command-line tool
pub mod tools;

pub use animator::{AnimationMode, Phase, Progress, Scheduler, StepTicket, Tick};
pub use encoder::{EncodeError, FixedEncoder, QrEncoder, QrcodegenEncoder};
pub use error::{Error, ErrorKind, Result, SaveError};
pub use models::{BitMatrix, CanvasSettings, ECLevel, MAX_MODULE_SIZE, Module, ModuleGrid, Version};
pub use session::{Controls, DEFAULT_FILE_NAME, GenerateRequest, Generation, Session, SessionEvent};
pub use surface::{DrawingSurface, ImageSurface, Palette, RecordingSurface};
pub use tools::{LengthHint, RevealPlan, plan_reveal};
