//! Module extraction, reveal ordering and the timed draw loop
//!
//! - Extraction turns a module grid into positioned dark modules
//! - Pattern generators reorder those modules for a chosen effect
//! - The scheduler replays the order one module per step

/// Dark-module extraction from a module grid
pub mod extract;
/// Reveal-order generators
pub mod patterns;
/// Pausable, cancellable step loop
pub mod scheduler;

pub use extract::extract_modules;
pub use patterns::{AnimationMode, generate_pattern, generate_pattern_with_rng};
pub use scheduler::{PendingStep, Phase, Progress, Scheduler, StepTicket, Tick};
