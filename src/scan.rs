use crate::std::vec::Vec;

use crate::catalog::{self, CodeSet, REVERSE_STOP};

/// Samples at or below this brightness count as bar.
pub const DEFAULT_TOLERANCE: f32 = 0.7;

/// Normalized run lengths of a scanline.
#[derive(Debug, PartialEq, Clone, Default)]
pub struct Segments {
    /// Alternating space and bar widths in modules, starting and ending with
    /// a space.
    pub widths: Vec<u32>,
    /// The scanline started on a bar, a zero width space was put in front.
    pub leading_quiet_zone_missing: bool,
    /// The scanline ended on a bar, a zero width space was appended.
    pub trailing_quiet_zone_missing: bool,
}

impl Segments {
    /// Turn the widths around if they were scanned right to left.
    ///
    /// The quiet zone flags are swapped along with the widths.
    pub fn fix_direction(&mut self) -> bool {
        let reversed = detect_and_fix(&mut self.widths);
        if reversed {
            core::mem::swap(
                &mut self.leading_quiet_zone_missing,
                &mut self.trailing_quiet_zone_missing,
            );
        }
        reversed
    }
}

/// Split a scanline into runs of bars and spaces measured in modules.
///
/// The module size is taken from the first bar, which belongs to a start
/// symbol and is therefore 2X wide. All runs are divided by it and rounded to
/// the closest integer. Missing quiet zones are replaced by zero width runs
/// so the layout of the widths stays the same.
///
/// ```
/// # use code128_codec::segment;
/// let scanline = [1.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0];
/// assert_eq!(segment(&scanline, 0.7).widths, vec![1, 2, 1, 1, 1]);
/// ```
pub fn segment(scanline: &[f32], tolerance: f32) -> Segments {
    let mut runs = Vec::new();
    let mut dark = false;
    let mut run = 0u32;
    for sample in scanline {
        let bar = *sample <= tolerance;
        if bar == dark {
            run += 1;
        } else {
            // a bar right at the start closes an empty quiet zone
            runs.push(run);
            dark = bar;
            run = 1;
        }
    }
    runs.push(run);

    let leading_quiet_zone_missing = scanline.first().is_some_and(|s| *s <= tolerance);
    let trailing_quiet_zone_missing = dark;
    if trailing_quiet_zone_missing {
        runs.push(0);
    }
    if leading_quiet_zone_missing {
        log::debug!("scanline starts without quiet zone");
    }
    if trailing_quiet_zone_missing {
        log::debug!("scanline ends without quiet zone");
    }

    if let Some(&first_bar) = runs.get(1).filter(|w| **w > 0) {
        log::trace!("module unit is {} samples", first_bar as f32 / 2.0);
        for width in runs.iter_mut() {
            *width = (4 * *width + first_bar) / (2 * first_bar);
        }
    }

    Segments {
        widths: runs,
        leading_quiet_zone_missing,
        trailing_quiet_zone_missing,
    }
}

/// Reverse the widths if they begin with a stop pattern read backwards.
///
/// Returns whether the widths were reversed.
pub fn detect_and_fix(widths: &mut [u32]) -> bool {
    let Some(start) = widths.get(1..7) else {
        return false;
    };
    if catalog::symbol_of(start, CodeSet::A) != Ok(REVERSE_STOP) {
        return false;
    }
    log::debug!("scanline was read right to left");
    widths.reverse();
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::std::vec;

    fn scanline(widths: &[u32], scale: usize) -> Vec<f32> {
        let mut samples = Vec::new();
        for (i, width) in widths.iter().enumerate() {
            let value = if i % 2 == 0 { 1.0 } else { 0.0 };
            samples.extend(core::iter::repeat(value).take(*width as usize * scale));
        }
        samples
    }

    #[test]
    fn test_unit_scale() {
        let widths = [10, 2, 1, 1, 2, 1, 4, 3, 10];
        for scale in 1..=5 {
            let segments = segment(&scanline(&widths, scale), DEFAULT_TOLERANCE);
            assert_eq!(segments.widths, widths);
            assert!(!segments.leading_quiet_zone_missing);
            assert!(!segments.trailing_quiet_zone_missing);
        }
    }

    #[test]
    fn test_rounding() {
        // first bar 4 samples wide, a 2X space measured as 5 samples
        let mut samples: Vec<f32> = vec![1.0; 20];
        samples.extend([0.0; 4]);
        samples.extend([1.0; 5]);
        samples.extend([0.0; 2]);
        samples.extend([1.0; 20]);
        assert_eq!(
            segment(&samples, DEFAULT_TOLERANCE).widths,
            vec![10, 2, 3, 1, 10]
        );
    }

    #[test]
    fn test_tolerance() {
        let samples: [f32; 8] = [0.9, 0.8, 0.65, 0.7, 0.8, 0.1, 0.1, 0.9];
        assert_eq!(
            segment(&samples, DEFAULT_TOLERANCE).widths,
            vec![2, 2, 1, 2, 1]
        );
        assert_eq!(segment(&samples, 0.5).widths, vec![5, 2, 1]);
    }

    #[test]
    fn test_missing_quiet_zones() {
        let segments = segment(&scanline(&[0, 2, 1, 1, 3, 1], 2), DEFAULT_TOLERANCE);
        assert_eq!(segments.widths, vec![0, 2, 1, 1, 3, 1, 0]);
        assert!(segments.leading_quiet_zone_missing);
        assert!(segments.trailing_quiet_zone_missing);
    }

    #[test]
    fn test_degenerate() {
        assert_eq!(segment(&[], DEFAULT_TOLERANCE).widths, vec![0]);
        assert_eq!(segment(&[1.0; 7], DEFAULT_TOLERANCE).widths, vec![7]);
        let segments = segment(&[0.0; 3], DEFAULT_TOLERANCE);
        assert_eq!(segments.widths, vec![0, 2, 0]);
        assert!(segments.leading_quiet_zone_missing);
    }

    #[test]
    fn test_detect_and_fix() {
        let mut forward = vec![10, 2, 1, 1, 2, 1, 4, 2, 3, 3, 1, 1, 1, 2, 10];
        assert!(!detect_and_fix(&mut forward));
        assert_eq!(forward[1], 2);

        let mut backward = forward.clone();
        backward.reverse();
        assert!(detect_and_fix(&mut backward));
        assert_eq!(backward, forward);

        assert!(!detect_and_fix(&mut [10, 2, 1]));
    }

    #[test]
    fn test_fix_direction_swaps_flags() {
        let mut segments = Segments {
            widths: vec![0, 2, 1, 1, 1, 3, 3, 2, 10],
            leading_quiet_zone_missing: false,
            trailing_quiet_zone_missing: true,
        };
        assert!(segments.fix_direction());
        assert_eq!(segments.widths, vec![10, 2, 3, 3, 1, 1, 1, 2, 0]);
        assert!(segments.leading_quiet_zone_missing);
        assert!(!segments.trailing_quiet_zone_missing);
    }
}
