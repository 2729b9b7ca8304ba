use std::collections::{BTreeMap, BTreeSet};

use palette::{Hsl, IntoColor, Srgb};
use plotters::style::RGBColor;

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<RGBColor> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.55, 0.65);
            let rgb: Srgb = hsl.into_color();
            RGBColor(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Color mapping: calendar year → box colour
// ---------------------------------------------------------------------------

/// Maps each calendar year of a series to a distinct fill colour.
#[derive(Debug, Clone)]
pub struct YearColors {
    mapping: BTreeMap<i32, RGBColor>,
    default_color: RGBColor,
}

impl YearColors {
    pub fn new(years: &BTreeSet<i32>) -> Self {
        let mapping = years
            .iter()
            .copied()
            .zip(generate_palette(years.len()))
            .collect();
        YearColors {
            mapping,
            default_color: RGBColor(160, 160, 160),
        }
    }

    /// Look up the colour for a year.
    pub fn color_for(&self, year: i32) -> RGBColor {
        self.mapping
            .get(&year)
            .copied()
            .unwrap_or(self.default_color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_is_distinct() {
        let colors = generate_palette(6);
        assert_eq!(colors.len(), 6);
        let unique: BTreeSet<(u8, u8, u8)> = colors.iter().map(|c| (c.0, c.1, c.2)).collect();
        assert_eq!(unique.len(), 6);
        assert!(generate_palette(0).is_empty());
    }

    #[test]
    fn test_unknown_year_uses_default() {
        let years: BTreeSet<i32> = [2019, 2020].into_iter().collect();
        let colors = YearColors::new(&years);
        let c = colors.color_for(1999);
        assert_eq!((c.0, c.1, c.2), (160, 160, 160));
        assert_ne!(
            (colors.color_for(2019).0, colors.color_for(2019).1, colors.color_for(2019).2),
            (colors.color_for(2020).0, colors.color_for(2020).1, colors.color_for(2020).2)
        );
    }
}
