use crate::std::vec::Vec;

#[cfg(feature = "std")]
use thiserror::Error;

use crate::catalog::{self, CodeSet};

/// Errors that can occur during encoding.
#[derive(Debug, PartialEq)]
#[cfg_attr(feature = "std", derive(Error))]
pub enum EncodingError {
    /// A byte outside of ASCII, no code set can represent it.
    #[cfg_attr(
        feature = "std",
        error("byte {byte:#04x} at offset {offset} is not supported by any code set")
    )]
    UnsupportedCharacter { byte: u8, offset: usize },
}

/// Pick the code set for the next symbol.
///
/// Only the next two bytes are considered: a pair of digits selects C, any
/// other printable character B, and a control character A. This does not
/// minimize the number of switches.
///
/// With nothing left to encode the current code set is kept, or B if there
/// is none yet. `offset` is only used for the error report.
pub fn choose(
    remaining: &[u8],
    current: Option<CodeSet>,
    offset: usize,
) -> Result<CodeSet, EncodingError> {
    match remaining {
        [] => Ok(current.unwrap_or(CodeSet::B)),
        [b'0'..=b'9', b'0'..=b'9', ..] => Ok(CodeSet::C),
        [b' '..=0x7F, ..] => Ok(CodeSet::B),
        [0x00..=0x1F, ..] => Ok(CodeSet::A),
        [byte, ..] => Err(EncodingError::UnsupportedCharacter {
            byte: *byte,
            offset,
        }),
    }
}

/// Translate the data to symbol values, starting with the start symbol.
///
/// Neither checksum nor stop are included.
pub(crate) fn encode_as_symbols(data: &[u8]) -> Result<Vec<u8>, EncodingError> {
    let mut code_set = choose(data, None, 0)?;
    let mut symbols = Vec::with_capacity(data.len() + 3);
    symbols.push(code_set.start());

    let mut bytes = data;
    while !bytes.is_empty() {
        let offset = data.len() - bytes.len();
        let next = choose(bytes, Some(code_set), offset)?;
        if next != code_set {
            symbols.push(next.switch());
            code_set = next;
        }
        match (code_set, bytes) {
            (CodeSet::C, [c1 @ b'0'..=b'9', c2 @ b'0'..=b'9', rest @ ..]) => {
                symbols.push((c1 - b'0') * 10 + (c2 - b'0'));
                bytes = rest;
            }
            (_, [byte, rest @ ..]) => {
                let value = catalog::value_of(*byte, code_set).ok_or(
                    EncodingError::UnsupportedCharacter {
                        byte: *byte,
                        offset,
                    },
                )?;
                symbols.push(value);
                bytes = rest;
            }
            (_, []) => unreachable!(),
        }
    }
    Ok(symbols)
}
