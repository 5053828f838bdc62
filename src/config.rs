use std::sync::OnceLock;
use std::time::Duration;

use crate::animator::AnimationMode;
use crate::models::{ECLevel, MAX_MODULE_SIZE};

fn parse_env_u64(name: &str, default: u64) -> u64 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(default)
}

fn parse_env_u32(name: &str, default: u32) -> u32 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<u32>().ok())
        .unwrap_or(default)
}

static DELAY_MS: OnceLock<u64> = OnceLock::new();

/// Default pause between two drawn modules (`QR_ANIM_DELAY_MS`, 0-5000)
pub fn default_delay() -> Duration {
    Duration::from_millis(*DELAY_MS.get_or_init(|| parse_env_u64("QR_ANIM_DELAY_MS", 50).min(5000)))
}

static MODULE_SIZE: OnceLock<u32> = OnceLock::new();

/// Default module side in pixels (`QR_ANIM_MODULE_SIZE`, 1-64)
pub fn default_module_size() -> u32 {
    *MODULE_SIZE.get_or_init(|| parse_env_u32("QR_ANIM_MODULE_SIZE", 8).clamp(1, MAX_MODULE_SIZE))
}

static MODE: OnceLock<AnimationMode> = OnceLock::new();

/// Default reveal order (`QR_ANIM_MODE`)
pub fn default_mode() -> AnimationMode {
    *MODE.get_or_init(|| {
        std::env::var("QR_ANIM_MODE")
            .map(|v| AnimationMode::from(v.as_str()))
            .unwrap_or_default()
    })
}

static EC_LEVEL: OnceLock<ECLevel> = OnceLock::new();

/// Default error correction level (`QR_ANIM_EC_LEVEL`)
pub fn default_ec_level() -> ECLevel {
    *EC_LEVEL.get_or_init(|| {
        std::env::var("QR_ANIM_EC_LEVEL")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_default()
    })
}
