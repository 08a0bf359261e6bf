use core::iter::repeat;

use crate::std::string::String;
use crate::std::vec::Vec;

use crate::{Bar, QUIET_ZONE};

fn half_blocks(left: bool, right: bool) -> char {
    match (left, right) {
        (true, true) => '█',
        (true, false) => '▌',
        (false, true) => '▐',
        (false, false) => ' ',
    }
}

/// Create a string representation of the bars using Unicode block characters.
///
/// Each character covers two modules. The quiet zones are included.
///
/// ## Example
/// ```
/// # use code128_codec::{Code128, bars_to_blocks};
/// assert_eq!(
///     bars_to_blocks(Code128::encode(b"<3").unwrap().bars()),
///     "     █▐ ▌ ▐█ █▐ █ ▌█▌▐  ▌█ █ ▐█▐▐▌     ",
/// );
/// ```
pub fn bars_to_blocks(bars: impl IntoIterator<Item = Bar>) -> String {
    let quiet_zone = repeat(false).take(QUIET_ZONE as usize);
    let modules: Vec<bool> = quiet_zone
        .clone()
        .chain(bars.into_iter().flat_map(|bar| {
            repeat(true)
                .take(bar.width as usize)
                .chain(repeat(false).take(bar.space as usize))
        }))
        .chain(quiet_zone)
        .collect();
    modules
        .chunks(2)
        .map(|pair| half_blocks(pair[0], pair.get(1).copied().unwrap_or(false)))
        .collect()
}

#[test]
fn test_odd_module_count() {
    let bars = [Bar { width: 1, space: 0 }];
    assert_eq!(bars_to_blocks(bars), "     ▌     ");
}
