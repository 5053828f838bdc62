use crate::animator::{AnimationMode, extract_modules, generate_pattern};
use crate::encoder::{AUTO_VERSION, EncodeError, QrEncoder};
use crate::error::{Error, Result};
use crate::models::{CanvasSettings, ECLevel, EncodedSymbol, MAX_MODULE_SIZE, Module};

/// Advice about input length, shown next to the character count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthHint {
    /// No text yet
    Empty,
    /// Comfortably small
    Good,
    /// Over 500 characters
    Long,
    /// Over 1000 characters
    VeryLong,
}

impl LengthHint {
    /// Classify `text` by character count
    pub fn for_text(text: &str) -> Self {
        match text.chars().count() {
            0 => LengthHint::Empty,
            n if n > 1000 => LengthHint::VeryLong,
            n if n > 500 => LengthHint::Long,
            _ => LengthHint::Good,
        }
    }

    /// User-facing advice
    pub fn message(&self) -> &'static str {
        match self {
            LengthHint::Empty => "Enter some text",
            LengthHint::Good => "Good length",
            LengthHint::Long => "Long text - may need larger QR version",
            LengthHint::VeryLong => "Very long - use high error correction",
        }
    }
}

/// Encoded symbol plus its reveal order, without animating it
#[derive(Debug, Clone)]
pub struct RevealPlan {
    /// Encoder output
    pub symbol: EncodedSymbol,
    /// Canvas geometry
    pub settings: CanvasSettings,
    /// Dark modules in reveal order
    pub order: Vec<Module>,
}

/// Encode `text` and compute its reveal order in one go
pub fn plan_reveal<E: QrEncoder>(
    encoder: &E,
    text: &str,
    mode: AnimationMode,
    level: ECLevel,
    module_size: u32,
) -> Result<RevealPlan> {
    let text = text.trim();
    if text.is_empty() {
        return Err(Error::EmptyInput);
    }
    if !(1..=MAX_MODULE_SIZE).contains(&module_size) {
        return Err(Error::InvalidModuleSize(module_size));
    }
    let symbol = encoder.encode(text, AUTO_VERSION, level)?;
    let settings = CanvasSettings::new(module_size, symbol.module_count())
        .ok_or_else(|| EncodeError::Internal("encoder returned an empty symbol".into()))?;
    let modules = extract_modules(&symbol.modules, &settings);
    let order = generate_pattern(&modules, mode, settings.module_count);
    Ok(RevealPlan {
        symbol,
        settings,
        order,
    })
}

/// Text rendering of the first `drawn` modules of `order`, two columns per module
pub fn ascii_preview(order: &[Module], module_count: usize, drawn: usize) -> String {
    let mut cells = vec![false; module_count * module_count];
    for m in order.iter().take(drawn) {
        if m.row < module_count && m.col < module_count {
            cells[m.row * module_count + m.col] = true;
        }
    }
    let mut out = String::with_capacity(module_count * (module_count * 2 + 1));
    for row in cells.chunks(module_count.max(1)) {
        for &dark in row {
            out.push_str(if dark { "██" } else { "  " });
        }
        out.push('\n');
    }
    out
}
