//! This crate implements encoding and decoding of Code 128 linear barcodes
//! as defined in ISO/IEC 15417:2007.
//!
//! Encoding turns bytes into a sequence of module widths, alternating
//! between space and bar, that a renderer maps to pixels. Decoding goes the
//! other way: it takes one scanline of brightness samples, locks onto the
//! module size, and reads the symbols back, verifying the checksum.
//!
//! ## Example
//!
//! ```rust
//! use code128_codec::{bars_to_blocks, decode, Code128};
//!
//! let code = Code128::encode(b"Hello!")?;
//! println!("{}", bars_to_blocks(code.bars()));
//!
//! let decoded = decode(&code.scanline(2))?;
//! assert_eq!(decoded.data, b"Hello!");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Charsets
//!
//! Only ASCII, `0x00` to `0x7F`, can be encoded. Control characters use code
//! set A, pairs of digits code set C, and everything else code set B. The
//! code set is picked by looking at the next two bytes only, so the result
//! is not always the shortest possible code.
//!
//! The special functions FNC1 to FNC4 and SHIFT are recognized when
//! decoding but carry no data.
#![no_std]

#[cfg(not(feature = "std"))]
extern crate alloc as std;
#[cfg(feature = "std")]
extern crate std;

use std::vec::Vec;

mod catalog;
mod decode;
mod encode;
mod scan;
#[cfg(feature = "unicode")]
mod unicode;

pub use catalog::{meaning_of, pattern_of, symbol_of, CodeSet, Function, Meaning};
pub use decode::{decode, decode_widths, Decoded, Decoder, DecodingError};
pub use encode::{choose, EncodingError};
pub use scan::{detect_and_fix, segment, Segments, DEFAULT_TOLERANCE};

#[cfg(feature = "unicode")]
pub use unicode::bars_to_blocks;

/// Width of the quiet zones on both sides, in modules.
pub const QUIET_ZONE: u32 = 10;

fn checksum(symbols: impl Iterator<Item = u8>) -> u8 {
    (symbols
        .enumerate()
        .map(|(i, idx)| (i.max(1) as u64) * idx as u64)
        .sum::<u64>()
        % 103) as u8
}

/// Representation of a "black line" in the code.
#[derive(PartialEq, Debug, Clone, Copy)]
pub struct Bar {
    /// The width of the line.
    ///
    /// Ranges from one to four.
    pub width: u8,
    /// White space after the line.
    pub space: u8,
}

/// A coordinate of a bar in a barcode.
#[derive(PartialEq, Debug, Clone, Copy)]
pub struct BarCoordinate {
    /// The x coordinate, started from the left.
    ///
    /// The first bar will always be at 10, which is the
    /// offset for the left quiet zone.
    pub x: u32,
    /// The width of the bar.
    pub width: u8,
}

/// A Code 128.
///
/// The raw output is [`widths()`](Self::widths): the module widths from the
/// left quiet zone to the right one, starting with a space. You can also use
/// the bars iterators [`bars()`](Self::bars) or
/// [`bar_coordinates()`](Self::bar_coordinates), and the [size](Self::len)
/// to compute a visualization. A bar corresponds to a "black line" of the
/// code and has a unitless width between one and four, as well as a free
/// space after it, also sized between one and four.
///
/// A bar with width one is called a "module". The width of a module is often
/// called "X", denoting one unit in the "x-dimension" of the barcode.
///
/// ## Pseudo code for visualization
///
/// ```rust
/// # use code128_codec::Code128;
/// let code = Code128::encode(b"Code128 <3")?;
/// let available_space = 100.0; // unit is, say, "pt"
/// let line_width = available_space / code.len() as f64;
/// for bar in code.bar_coordinates() {
///      let x = bar.x as f64 * line_width;
///      let width = bar.width as f64 * line_width;
///      // print line at `x` pt, `width` pt wide
/// }
/// # Ok::<(), code128_codec::EncodingError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Code128 {
    symbols: Vec<u8>,
}

impl Code128 {
    /// Encode the bytes as Code 128.
    ///
    /// Fails without output if a byte is not ASCII.
    pub fn encode(data: &[u8]) -> Result<Self, EncodingError> {
        let mut symbols = encode::encode_as_symbols(data)?;
        symbols.push(checksum(symbols.iter().cloned()));
        Ok(Code128 { symbols })
    }

    /// The symbol values: start, data including code set switches, and
    /// checksum.
    pub fn symbols(&self) -> &[u8] {
        &self.symbols
    }

    /// The module widths of the whole code, quiet zones included.
    ///
    /// Widths alternate between space and bar, starting and ending with a
    /// quiet zone.
    pub fn widths(&self) -> Vec<u32> {
        let mut widths = Vec::with_capacity(self.symbols.len() * 6 + 9);
        widths.push(QUIET_ZONE);
        widths.extend(
            self.symbols
                .iter()
                .filter_map(|symbol| catalog::pattern_of(*symbol))
                .flatten(),
        );
        widths.extend(catalog::STOP_WIDTHS);
        widths.push(QUIET_ZONE);
        widths
    }

    /// Get the sequence of bars this Code 128 consists of.
    pub fn bars(&self) -> impl Iterator<Item = Bar> + '_ {
        self.symbols
            .iter()
            .filter_map(|symbol| catalog::pattern_of(*symbol))
            .flat_map(|widths| {
                [0, 2, 4].map(|i| Bar {
                    width: widths[i] as u8,
                    space: widths[i + 1] as u8,
                })
            })
            .chain(STOP_BARS)
    }

    /// Get the coordinates of the bars this Code 128 consists of.
    pub fn bar_coordinates(&self) -> impl Iterator<Item = BarCoordinate> + '_ {
        self.bars().scan(QUIET_ZONE, |pos, bar| {
            let x = *pos;
            *pos += bar.width as u32 + bar.space as u32;
            Some(BarCoordinate {
                x,
                width: bar.width,
            })
        })
    }

    /// Render a scanline with `scale` samples per module.
    ///
    /// Bars are `0.0`, spaces `1.0`.
    pub fn scanline(&self, scale: usize) -> Vec<f32> {
        let mut samples = Vec::with_capacity(self.len() * scale);
        for (i, width) in self.widths().into_iter().enumerate() {
            let sample = if i % 2 == 0 { 1.0 } else { 0.0 };
            samples.extend(core::iter::repeat(sample).take(width as usize * scale));
        }
        samples
    }

    /// Get the total width of the code in units of the [Bar](crate::Bar)
    /// with the quiet zone included.
    pub fn len(&self) -> usize {
        self.symbols.len() * 11 + 13 + 2 * QUIET_ZONE as usize
    }

    /// Whether this Code 128 encodes empty data.
    pub fn is_empty(&self) -> bool {
        self.symbols.len() == 2
    }
}

const STOP_BARS: [Bar; 4] = [
    Bar { width: 2, space: 3 },
    Bar { width: 3, space: 1 },
    Bar { width: 1, space: 1 },
    Bar { width: 2, space: 0 },
];

/// Encode the bytes as Code 128 and return the module widths.
///
/// Shorthand for [`Code128::encode`] followed by [`Code128::widths`].
pub fn encode(data: &[u8]) -> Result<Vec<u32>, EncodingError> {
    Code128::encode(data).map(|code| code.widths())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CODE_B, START_B, START_C};
    use crate::std::vec;

    #[test]
    fn test_bar_size() {
        for symbol in 0..=107 {
            let size: u32 = pattern_of(symbol).unwrap().iter().sum();
            assert_eq!(size, 11);
        }
        let size: u32 = STOP_BARS
            .iter()
            .map(|m| m.width as u32 + m.space as u32)
            .sum();
        assert_eq!(size, 13);
        assert_eq!(size, catalog::STOP_WIDTHS.iter().sum::<u32>());
    }

    #[test]
    fn test_code_size() {
        let code = Code128::encode(b"foo").unwrap();
        let size = code
            .bars()
            .map(|m| m.width as u32 + m.space as u32)
            .sum::<u32>()
            + 20;
        assert_eq!(code.len(), size as usize);
        assert_eq!(code.len(), code.widths().iter().sum::<u32>() as usize);
        assert_eq!(code.len(), code.scanline(1).len());
    }

    #[test]
    fn test_is_empty() {
        assert!(Code128::encode(b"").unwrap().is_empty());
        assert!(!Code128::encode(b".").unwrap().is_empty());
    }

    #[test]
    fn test_bar_coordinates() {
        let code = Code128::encode(b"").unwrap();
        let bars: Vec<_> = code.bar_coordinates().collect();
        assert_eq!(bars[0], BarCoordinate { x: 10, width: 2 });
        assert_eq!(bars[1], BarCoordinate { x: 13, width: 1 });
        assert_eq!(bars[2], BarCoordinate { x: 16, width: 1 });
        assert_eq!(bars[3], BarCoordinate { x: 21, width: 2 });
        assert_eq!(bars[4], BarCoordinate { x: 25, width: 2 });
        assert_eq!(bars[5], BarCoordinate { x: 28, width: 2 });
        assert_eq!(bars[6], BarCoordinate { x: 32, width: 2 });
        assert_eq!(bars[7], BarCoordinate { x: 37, width: 3 });
        assert_eq!(bars[8], BarCoordinate { x: 41, width: 1 });
        assert_eq!(bars[9], BarCoordinate { x: 43, width: 2 });
        assert_eq!(bars.len(), 10);
    }

    #[test]
    fn test_bars_match_widths() {
        let code = Code128::encode(b"3456abcd").unwrap();
        let widths = code.widths();
        let from_bars: Vec<u32> = code
            .bars()
            .flat_map(|bar| [bar.width as u32, bar.space as u32])
            .collect();
        // the last bar has no space after it
        assert_eq!(from_bars[..from_bars.len() - 1], widths[1..widths.len() - 1]);
    }

    #[test]
    fn test_hello_world_layout() {
        let code = Code128::encode(b"Hello, World!").unwrap();
        let symbols = code.symbols();
        assert_eq!(symbols.len(), 1 + 13 + 1);
        assert_eq!(symbols[0], START_B);
        assert_eq!(symbols.iter().filter(|s| **s >= 103).count(), 1);
        assert_eq!(symbols[14], 76);

        let widths = code.widths();
        assert_eq!(widths.len(), 1 + 15 * 6 + 7 + 1);
        assert_eq!(widths[..7], [10, 2, 1, 1, 2, 1, 4]);
        assert_eq!(widths[widths.len() - 8..], [2, 3, 3, 1, 1, 1, 2, 10]);

        let decoded = decode(&code.scanline(1)).unwrap();
        assert_eq!(decoded.data, b"Hello, World!");
        assert!(!decoded.reversed);
    }

    #[test]
    fn test_digits_then_letters() {
        for (msg, pairs) in [(&b"1234abc"[..], [12, 34]), (&b"3456abcd"[..], [34, 56])] {
            let code = Code128::encode(msg).unwrap();
            assert_eq!(code.symbols()[..4], [START_C, pairs[0], pairs[1], CODE_B]);
            assert_eq!(
                code.symbols().iter().filter(|s| **s == CODE_B).count(),
                1
            );
            assert_eq!(decode(&code.scanline(1)).unwrap().data, msg);
        }
    }

    #[test]
    fn test_unit_scale_invariance() {
        let code = Code128::encode(b"ABCD-1234-abcd").unwrap();
        for scale in 1..=3 {
            let decoded = decode(&code.scanline(scale)).unwrap();
            assert_eq!(decoded.data, b"ABCD-1234-abcd");
        }
    }

    #[test]
    fn test_reversed() {
        let code = Code128::encode(b"hello, world!").unwrap();
        for scale in 1..=3 {
            let mut scanline = code.scanline(scale);
            scanline.reverse();
            let decoded = decode(&scanline).unwrap();
            assert!(decoded.reversed);
            assert_eq!(decoded.data, b"hello, world!");
        }
    }

    #[test]
    fn test_missing_quiet_zone() {
        let code = Code128::encode(b"3456abcd").unwrap();
        for scale in 1..=3 {
            let scanline = code.scanline(scale);
            let decoded = decode(&scanline[10 * scale..]).unwrap();
            assert_eq!(decoded.data, b"3456abcd");
            assert!(decoded.leading_quiet_zone_missing);
            assert!(!decoded.trailing_quiet_zone_missing);

            let mut reversed = scanline[10 * scale..].to_vec();
            reversed.reverse();
            let decoded = decode(&reversed).unwrap();
            assert_eq!(decoded.data, b"3456abcd");
            assert!(decoded.reversed);
            assert!(decoded.leading_quiet_zone_missing);
        }
    }

    #[test]
    fn test_encode_errors() {
        assert_eq!(
            encode(b"caf\xE9"),
            Err(EncodingError::UnsupportedCharacter {
                byte: 0xE9,
                offset: 3
            })
        );
        assert_eq!(encode(b"\x16\x15").map(|w| w.len()), Ok(1 + 4 * 6 + 7 + 1));
        assert_eq!(decode_widths(&encode(b"\x16\x15").unwrap()), Ok(vec![0x16, 0x15]));
    }

    #[test]
    fn test_all_ascii() {
        for x in 0..=0x7F {
            let code = Code128::encode(&[x]).unwrap();
            assert_eq!(decode_widths(&code.widths()), Ok(vec![x]));
        }
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::std::vec::Vec;
    use proptest::prelude::*;

    fn ascii() -> impl Strategy<Value = Vec<u8>> {
        proptest::collection::vec(0u8..=0x7F, 0..48)
    }

    proptest! {
        #[test]
        fn round_trip(data in ascii()) {
            let code = Code128::encode(&data).unwrap();
            let decoded = decode(&code.scanline(1)).unwrap();
            prop_assert_eq!(decoded.data, data);
        }

        #[test]
        fn round_trip_scaled(data in ascii(), scale in 1usize..6) {
            let code = Code128::encode(&data).unwrap();
            let decoded = decode(&code.scanline(scale)).unwrap();
            prop_assert_eq!(decoded.data, data);
        }

        #[test]
        fn round_trip_reversed(data in ascii(), scale in 1usize..4) {
            let mut scanline = Code128::encode(&data).unwrap().scanline(scale);
            scanline.reverse();
            let decoded = decode(&scanline).unwrap();
            prop_assert!(decoded.reversed);
            prop_assert_eq!(decoded.data, data);
        }

        #[test]
        fn non_ascii_is_rejected(prefix in ascii(), byte in 0x80u8..) {
            let mut data = prefix.clone();
            data.push(byte);
            prop_assert_eq!(
                Code128::encode(&data),
                Err(EncodingError::UnsupportedCharacter { byte, offset: prefix.len() })
            );
        }
    }
}
