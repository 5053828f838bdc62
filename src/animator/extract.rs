use rayon::prelude::*;

use crate::models::{CanvasSettings, Module, ModuleGrid};

/// Collect every dark module of `grid` in row-major order
///
/// Rows are scanned in parallel; the result keeps the serial row-major
/// order. Only `settings.module_count` rows and columns are read.
pub fn extract_modules<G>(grid: &G, settings: &CanvasSettings) -> Vec<Module>
where
    G: ModuleGrid + Sync + ?Sized,
{
    let count = settings.module_count;
    (0..count)
        .into_par_iter()
        .flat_map_iter(|row| {
            (0..count)
                .filter(move |&col| grid.is_dark(row, col))
                .map(move |col| settings.module_at(row, col))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BitMatrix;

    #[test]
    fn test_extracts_dark_modules_row_major() {
        let grid = BitMatrix::from_rows(&["#.#", "...", ".##"]).unwrap();
        let settings = CanvasSettings::new(2, 3).unwrap();
        let modules = extract_modules(&grid, &settings);

        let coords: Vec<_> = modules.iter().map(|m| (m.row, m.col)).collect();
        assert_eq!(coords, vec![(0, 0), (0, 2), (2, 1), (2, 2)]);

        // offset = 4 * 2
        assert_eq!((modules[0].x, modules[0].y), (8, 8));
        assert_eq!((modules[1].x, modules[1].y), (12, 8));
        assert_eq!((modules[3].x, modules[3].y), (12, 12));
    }

    #[test]
    fn test_all_light_grid() {
        let grid = BitMatrix::square(5);
        let settings = CanvasSettings::new(3, 5).unwrap();
        assert!(extract_modules(&grid, &settings).is_empty());
    }

    #[test]
    fn test_positions_stay_inside_symbol() {
        let mut grid = BitMatrix::square(25);
        for i in 0..25 {
            grid.set(i, i, true);
            grid.set(24 - i, i, true);
        }
        let settings = CanvasSettings::new(7, 25).unwrap();
        let modules = extract_modules(&grid, &settings);
        assert_eq!(modules.len(), grid.count_ones());

        let span = settings.symbol_span();
        for m in &modules {
            assert!(span.contains(&m.x) && span.contains(&m.y));
        }
    }
}
