//! Reveal orders
//!
//! Each generator returns a permutation of its input. Every sort here is
//! stable, so modules with equal keys keep their incoming (row-major) order
//! and the non-random orders are deterministic.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use rand::Rng;
use rand::seq::SliceRandom;

use crate::models::Module;

/// Order in which dark modules are revealed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnimationMode {
    /// Raster order, row by row
    #[default]
    Sequential,
    /// Outward from the symbol center
    Spiral,
    /// Uniform shuffle
    Random,
    /// Rows bent by a sine of the column
    Wave,
    /// Inward from the four corners
    Corners,
    /// Input order unchanged; what unrecognised names parse to
    Insertion,
}

impl AnimationMode {
    /// Modes a user can pick by name
    pub const NAMED: [AnimationMode; 5] = [
        AnimationMode::Sequential,
        AnimationMode::Spiral,
        AnimationMode::Random,
        AnimationMode::Wave,
        AnimationMode::Corners,
    ];

    /// Name accepted by [`FromStr`]
    pub fn as_str(&self) -> &'static str {
        match self {
            AnimationMode::Sequential => "sequential",
            AnimationMode::Spiral => "spiral",
            AnimationMode::Random => "random",
            AnimationMode::Wave => "wave",
            AnimationMode::Corners => "corners",
            AnimationMode::Insertion => "insertion",
        }
    }

    /// Whether repeated calls on the same input give the same order
    pub fn is_deterministic(&self) -> bool {
        !matches!(self, AnimationMode::Random)
    }
}

impl fmt::Display for AnimationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Never fails: unknown names fall back to [`AnimationMode::Insertion`]
impl FromStr for AnimationMode {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "sequential" => AnimationMode::Sequential,
            "spiral" => AnimationMode::Spiral,
            "random" => AnimationMode::Random,
            "wave" => AnimationMode::Wave,
            "corners" => AnimationMode::Corners,
            _ => AnimationMode::Insertion,
        })
    }
}

impl From<&str> for AnimationMode {
    fn from(s: &str) -> Self {
        match s.parse() {
            Ok(mode) => mode,
            Err(never) => match never {},
        }
    }
}

/// Order `modules` for `mode` on a symbol of `module_count` modules per side
///
/// [`AnimationMode::Random`] draws from the thread-local RNG.
pub fn generate_pattern(modules: &[Module], mode: AnimationMode, module_count: usize) -> Vec<Module> {
    generate_pattern_with_rng(modules, mode, module_count, &mut rand::thread_rng())
}

/// [`generate_pattern`] with an explicit RNG for the random order
pub fn generate_pattern_with_rng<R: Rng + ?Sized>(
    modules: &[Module],
    mode: AnimationMode,
    module_count: usize,
    rng: &mut R,
) -> Vec<Module> {
    match mode {
        AnimationMode::Sequential => sequential(modules),
        AnimationMode::Spiral => spiral(modules, module_count),
        AnimationMode::Random => shuffled(modules, rng),
        AnimationMode::Wave => wave(modules),
        AnimationMode::Corners => corners(modules, module_count),
        AnimationMode::Insertion => modules.to_vec(),
    }
}

/// Raster order by (row, col)
pub fn sequential(modules: &[Module]) -> Vec<Module> {
    let mut ordered = modules.to_vec();
    ordered.sort_by_key(|m| (m.row, m.col));
    ordered
}

/// Nearest to the center first
pub fn spiral(modules: &[Module], module_count: usize) -> Vec<Module> {
    sort_by_float_key(modules, |m| m.center_distance(module_count))
}

/// Fisher-Yates shuffle
pub fn shuffled<R: Rng + ?Sized>(modules: &[Module], rng: &mut R) -> Vec<Module> {
    let mut ordered = modules.to_vec();
    ordered.shuffle(rng);
    ordered
}

/// Sinusoidal sweep from the top
pub fn wave(modules: &[Module]) -> Vec<Module> {
    sort_by_float_key(modules, Module::wave_key)
}

/// All four corners first, center last
pub fn corners(modules: &[Module], module_count: usize) -> Vec<Module> {
    let mut ordered = modules.to_vec();
    ordered.sort_by_key(|m| m.corner_distance(module_count));
    ordered
}

fn sort_by_float_key<F>(modules: &[Module], key: F) -> Vec<Module>
where
    F: Fn(&Module) -> f64,
{
    let mut keyed: Vec<(f64, Module)> = modules.iter().map(|m| (key(m), *m)).collect();
    keyed.sort_by(|a, b| a.0.total_cmp(&b.0));
    keyed.into_iter().map(|(_, m)| m).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CanvasSettings;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn grid(n: usize) -> Vec<Module> {
        let settings = CanvasSettings::new(1, n).unwrap();
        let mut modules = Vec::new();
        for row in 0..n {
            for col in 0..n {
                modules.push(settings.module_at(row, col));
            }
        }
        modules
    }

    #[test]
    fn test_parse_modes() {
        for mode in AnimationMode::NAMED {
            assert_eq!(AnimationMode::from(mode.as_str()), mode);
        }
        assert_eq!(AnimationMode::from(" Spiral "), AnimationMode::Spiral);
        assert_eq!(AnimationMode::from("zigzag"), AnimationMode::Insertion);
        assert_eq!(AnimationMode::from(""), AnimationMode::Insertion);
    }

    #[test]
    fn test_sequential_restores_raster_order() {
        let modules = grid(4);
        let reversed: Vec<_> = modules.iter().rev().copied().collect();
        assert_eq!(sequential(&reversed), modules);
    }

    #[test]
    fn test_spiral_starts_at_center() {
        let ordered = spiral(&grid(5), 5);
        // Center is (2.5, 2.5); the four nearest modules tie and keep row-major order
        let first: Vec<_> = ordered[..4].iter().map(|m| (m.row, m.col)).collect();
        assert_eq!(first, vec![(2, 2), (2, 3), (3, 2), (3, 3)]);
        let last = ordered.last().unwrap();
        assert_eq!((last.row, last.col), (0, 0));
    }

    #[test]
    fn test_wave_key_order() {
        let ordered = wave(&grid(6));
        for pair in ordered.windows(2) {
            assert!(pair[0].wave_key() <= pair[1].wave_key());
        }
    }

    #[test]
    fn test_corners_first_and_center_last() {
        let ordered = corners(&grid(5), 5);
        let first: Vec<_> = ordered[..4].iter().map(|m| (m.row, m.col)).collect();
        assert_eq!(first, vec![(0, 0), (0, 4), (4, 0), (4, 4)]);
        let last = ordered.last().unwrap();
        assert_eq!((last.row, last.col), (2, 2));
    }

    #[test]
    fn test_insertion_is_identity() {
        let modules: Vec<_> = grid(3).into_iter().rev().collect();
        let ordered = generate_pattern(&modules, AnimationMode::Insertion, 3);
        assert_eq!(ordered, modules);
    }

    #[test]
    fn test_seeded_shuffle_is_reproducible() {
        let modules = grid(6);
        let a = generate_pattern_with_rng(&modules, AnimationMode::Random, 6, &mut StdRng::seed_from_u64(7));
        let b = generate_pattern_with_rng(&modules, AnimationMode::Random, 6, &mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);
        assert_ne!(a, modules);
    }

    #[test]
    fn test_empty_input() {
        for mode in AnimationMode::NAMED {
            assert!(generate_pattern(&[], mode, 21).is_empty());
        }
    }
}
