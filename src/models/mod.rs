pub mod matrix;
pub mod module;
pub mod symbol;

pub use matrix::{BitMatrix, ModuleGrid};
pub use module::{CanvasSettings, MAX_MODULE_SIZE, Module, QUIET_ZONE};
pub use symbol::{ECLevel, EncodedSymbol, ParseLevelError, Version};
