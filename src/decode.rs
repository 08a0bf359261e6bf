use crate::std::vec::Vec;

#[cfg(feature = "std")]
use thiserror::Error;

use crate::catalog::{self, CodeSet, Function, Meaning};
use crate::scan::{self, DEFAULT_TOLERANCE};

/// Quiet zone, start, checksum, stop and quiet zone.
const FRAME_WIDTHS: usize = 1 + 6 + 6 + 7 + 1;

/// Errors that can occur during decoding.
#[derive(Debug, PartialEq)]
#[cfg_attr(feature = "std", derive(Error))]
pub enum DecodingError {
    /// The value is not a symbol of the code set.
    #[cfg_attr(feature = "std", error("symbol {0} unknown in this code set"))]
    UnknownSymbol(u8),
    /// Six widths that do not form the pattern of any symbol.
    #[cfg_attr(
        feature = "std",
        error("widths {widths:?} match no symbol (code set {code_set:?})")
    )]
    NoMatchingSymbol { widths: [u32; 6], code_set: CodeSet },
    /// The number of widths does not fit start, data symbols, checksum and
    /// stop.
    #[cfg_attr(feature = "std", error("{0} widths can not be split into symbols"))]
    InvalidDataLength(usize),
    /// The code did not begin with a start symbol.
    #[cfg_attr(feature = "std", error("symbol {0} is not a start symbol"))]
    InvalidStartSymbol(u8),
    /// A start or stop symbol appeared among the data.
    #[cfg_attr(
        feature = "std",
        error("symbol {symbol} is not allowed at data position {position}")
    )]
    UnexpectedStructuralSymbol { symbol: u8, position: usize },
    /// The checksum did not match.
    ///
    /// `expected` is `None` when the checksum symbol itself was unreadable.
    /// `data` holds everything decoded anyway.
    #[cfg_attr(
        feature = "std",
        error("checksum mismatch, computed {computed} but found {expected:?}")
    )]
    ChecksumMismatch {
        expected: Option<u8>,
        computed: u8,
        data: Vec<u8>,
    },
}

/// The result of reading a scanline.
#[derive(Debug, PartialEq, Clone)]
pub struct Decoded {
    pub data: Vec<u8>,
    /// The scanline ran from the stop to the start pattern.
    pub reversed: bool,
    /// No quiet zone in front of the start symbol, after correcting the
    /// direction.
    pub leading_quiet_zone_missing: bool,
    /// No quiet zone behind the stop pattern, after correcting the direction.
    pub trailing_quiet_zone_missing: bool,
}

/// Reads scanlines.
///
/// ```
/// # use code128_codec::{Code128, Decoder};
/// let code = Code128::encode(b"PJJ123C")?;
/// let scanline: Vec<f32> = code
///     .scanline(3)
///     .into_iter()
///     .map(|s| if s > 0.5 { 0.9 } else { 0.4 })
///     .collect();
/// let decoded = Decoder::default().with_tolerance(0.5).decode(&scanline)?;
/// assert_eq!(decoded.data, b"PJJ123C");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Decoder {
    tolerance: f32,
}

impl Default for Decoder {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

impl Decoder {
    /// Samples with a brightness at or below `tolerance` are bars.
    pub fn with_tolerance(self, tolerance: f32) -> Self {
        Self { tolerance }
    }

    /// Decode a scanline of brightness samples in `[0, 1]`, one per column.
    pub fn decode(&self, scanline: &[f32]) -> Result<Decoded, DecodingError> {
        let mut segments = scan::segment(scanline, self.tolerance);
        let reversed = segments.fix_direction();
        let data = decode_widths(&segments.widths)?;
        Ok(Decoded {
            data,
            reversed,
            leading_quiet_zone_missing: segments.leading_quiet_zone_missing,
            trailing_quiet_zone_missing: segments.trailing_quiet_zone_missing,
        })
    }
}

/// Decode a scanline with the default tolerance.
pub fn decode(scanline: &[f32]) -> Result<Decoded, DecodingError> {
    Decoder::default().decode(scanline)
}

/// Decode normalized widths, starting with the leading quiet zone.
///
/// The widths must be in reading order, see
/// [`detect_and_fix`](crate::detect_and_fix). Quiet zones and the stop
/// pattern are not inspected.
pub fn decode_widths(widths: &[u32]) -> Result<Vec<u8>, DecodingError> {
    if widths.len() < FRAME_WIDTHS || (widths.len() - FRAME_WIDTHS) % 6 != 0 {
        return Err(DecodingError::InvalidDataLength(widths.len()));
    }
    let start = &widths[1..7];
    let (data, rest) = widths[7..].split_at(widths.len() - FRAME_WIDTHS);
    let checksum = &rest[..6];

    let start = catalog::symbol_of(start, CodeSet::A)?;
    let mut code_set = match catalog::meaning_of(start, CodeSet::A)? {
        Meaning::Function(Function::Start(code_set)) => code_set,
        _ => return Err(DecodingError::InvalidStartSymbol(start)),
    };

    let mut symbols = Vec::with_capacity(data.len() / 6 + 1);
    symbols.push(start);
    let mut output = Vec::with_capacity(data.len() / 6);
    for (i, chunk) in data.chunks_exact(6).enumerate() {
        let symbol = catalog::symbol_of(chunk, code_set)?;
        symbols.push(symbol);
        match catalog::meaning_of(symbol, code_set)? {
            Meaning::Byte(byte) => output.push(byte),
            Meaning::Digits(pair) => {
                output.push(pair / 10 + b'0');
                output.push(pair % 10 + b'0');
            }
            Meaning::Function(Function::Code(next)) => code_set = next,
            Meaning::Function(Function::Start(_) | Function::Stop | Function::ReverseStop) => {
                return Err(DecodingError::UnexpectedStructuralSymbol {
                    symbol,
                    position: i + 1,
                })
            }
            // FNC1 to FNC4 and SHIFT carry no data of their own
            Meaning::Function(_) => (),
        }
    }

    let computed = crate::checksum(symbols.iter().cloned());
    let expected = catalog::symbol_of(checksum, CodeSet::A).ok();
    if expected != Some(computed) {
        return Err(DecodingError::ChecksumMismatch {
            expected,
            computed,
            data: output,
        });
    }
    Ok(output)
}
