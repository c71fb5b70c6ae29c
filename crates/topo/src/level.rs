//! Threshold levels and their pseudo-elevation stroke styles.

use contour_field_core::canvas::StrokeStyle;
use contour_field_core::color::Hsla;

/// One contour threshold and its position in the level sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Level {
    pub threshold: f64,
    pub index: usize,
}

/// `count` thresholds spread evenly over `[min, max]`, strictly increasing.
///
/// A single level sits at the midpoint. Callers validate `min < max`.
pub fn levels(count: usize, min: f64, max: f64) -> Vec<Level> {
    match count {
        0 => Vec::new(),
        1 => vec![Level {
            threshold: min + (max - min) * 0.5,
            index: 0,
        }],
        n => {
            let step = (max - min) / (n - 1) as f64;
            (0..n)
                .map(|i| Level {
                    threshold: if i == n - 1 { max } else { min + step * i as f64 },
                    index: i,
                })
                .collect()
        }
    }
}

/// Stroke for `level` out of `count`.
///
/// Low levels are thin and faint, high levels thicker and more opaque, and
/// the hue drifts by `hue_span` degrees across the sequence.
pub fn level_style(level: &Level, count: usize, hue: f64, hue_span: f64) -> StrokeStyle {
    let t = if count > 1 {
        level.index as f64 / (count - 1) as f64
    } else {
        1.0
    };
    let color = Hsla {
        h: hue + hue_span * t,
        s: 0.45 + 0.2 * t,
        l: 0.55 + 0.15 * t,
        a: 0.18 + 0.5 * t,
    };
    StrokeStyle::new(color.into(), 0.6 + 1.1 * t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_level_is_midpoint() {
        let l = levels(1, -0.6, 0.6);
        assert_eq!(l, vec![Level { threshold: 0.0, index: 0 }]);
    }

    #[test]
    fn zero_levels_is_empty() {
        assert!(levels(0, -1.0, 1.0).is_empty());
    }

    #[test]
    fn levels_span_inclusive_range() {
        let l = levels(12, -0.6, 0.6);
        assert_eq!(l.len(), 12);
        assert_eq!(l[0].threshold, -0.6);
        assert_eq!(l[11].threshold, 0.6);
        assert!(l.iter().enumerate().all(|(i, lv)| lv.index == i));
    }

    #[test]
    fn levels_stay_inside_field_range() {
        // The default range leaves the field's extremes free of lines.
        let l = levels(12, -0.6, 0.6);
        assert!(l.iter().all(|lv| lv.threshold.abs() < 1.0));
    }

    #[test]
    fn styles_grow_with_index() {
        let l = levels(5, -1.0, 1.0);
        let styles: Vec<_> = l.iter().map(|lv| level_style(lv, 5, 200.0, 40.0)).collect();
        for w in styles.windows(2) {
            assert!(w[1].width > w[0].width);
            assert!(w[1].color.a > w[0].color.a);
        }
        assert!((styles[0].width - 0.6).abs() < 1e-12);
        assert!((styles[4].width - 1.7).abs() < 1e-12);
        assert!((styles[0].color.a - 0.18).abs() < 1e-12);
    }

    #[test]
    fn single_level_uses_top_style() {
        let s = level_style(&Level { threshold: 0.0, index: 0 }, 1, 200.0, 40.0);
        assert!((s.width - 1.7).abs() < 1e-12);
        assert!((s.color.a - 0.68).abs() < 1e-12);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn thresholds_strictly_increase(
                count in 2usize..64,
                min in -10.0_f64..10.0,
                span in 0.001_f64..20.0,
            ) {
                let l = levels(count, min, min + span);
                prop_assert_eq!(l.len(), count);
                for w in l.windows(2) {
                    prop_assert!(w[1].threshold > w[0].threshold);
                }
            }
        }
    }
}
