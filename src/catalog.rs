//! The Code 128 symbol table.
//!
//! Every symbol is stored as an 11 bit pattern, most significant bit first,
//! where a set bit is a dark module. The first module is always dark and the
//! last always light, so a pattern splits into exactly three bars and three
//! spaces.
use crate::decode::DecodingError;

pub(crate) const FNC3: u8 = 96;
pub(crate) const FNC2: u8 = 97;
pub(crate) const SHIFT: u8 = 98;
pub(crate) const CODE_C: u8 = 99;
pub(crate) const CODE_B: u8 = 100;
pub(crate) const CODE_A: u8 = 101;
pub(crate) const FNC1: u8 = 102;
pub(crate) const START_A: u8 = 103;
pub(crate) const START_B: u8 = 104;
pub(crate) const START_C: u8 = 105;
pub(crate) const STOP: u8 = 106;
/// Mirror image of the first six widths of [`STOP_WIDTHS`].
///
/// Not a real symbol value. It only shows up where a start symbol is expected
/// on a scan taken right to left.
pub(crate) const REVERSE_STOP: u8 = 107;

/// The complete stop pattern, including the trailing 2X bar.
pub(crate) const STOP_WIDTHS: [u32; 7] = [2, 3, 3, 1, 1, 1, 2];

pub(crate) const PATTERNS: [u16; 108] = [
    0x6cc, 0x66c, 0x666, 0x498, 0x48c, 0x44c, 0x4c8, 0x4c4, 0x464, 0x648, 0x644, 0x624, 0x59c,
    0x4dc, 0x4ce, 0x5cc, 0x4ec, 0x4e6, 0x672, 0x65c, 0x64e, 0x6e4, 0x674, 0x76e, 0x74c, 0x72c,
    0x726, 0x764, 0x734, 0x732, 0x6d8, 0x6c6, 0x636, 0x518, 0x458, 0x446, 0x588, 0x468, 0x462,
    0x688, 0x628, 0x622, 0x5b8, 0x58e, 0x46e, 0x5d8, 0x5c6, 0x476, 0x776, 0x68e, 0x62e, 0x6e8,
    0x6e2, 0x6ee, 0x758, 0x746, 0x716, 0x768, 0x762, 0x71a, 0x77a, 0x642, 0x78a, 0x530, 0x50c,
    0x4b0, 0x486, 0x42c, 0x426, 0x590, 0x584, 0x4d0, 0x4c2, 0x434, 0x432, 0x612, 0x650, 0x7ba,
    0x614, 0x47a, 0x53c, 0x4bc, 0x49e, 0x5e4, 0x4f4, 0x4f2, 0x7a4, 0x794, 0x792, 0x6de, 0x6f6,
    0x7b6, 0x578, 0x51e, 0x45e, 0x5e8, 0x5e2, 0x7a8, 0x7a2, 0x5de, 0x5ee, 0x75e, 0x7ae, 0x684,
    0x690, 0x69c, 0x63a, 0x6b8,
];

/// One of the three alphabets of Code 128.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum CodeSet {
    /// Upper case ASCII, digits, punctuation and the control characters.
    A,
    /// Printable ASCII including lower case letters and `DEL`.
    B,
    /// Pairs of digits, `00` to `99`.
    C,
}

impl CodeSet {
    pub(crate) fn start(self) -> u8 {
        match self {
            CodeSet::A => START_A,
            CodeSet::B => START_B,
            CodeSet::C => START_C,
        }
    }

    pub(crate) fn switch(self) -> u8 {
        match self {
            CodeSet::A => CODE_A,
            CodeSet::B => CODE_B,
            CodeSet::C => CODE_C,
        }
    }
}

/// A special function symbol.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Function {
    Fnc1,
    Fnc2,
    Fnc3,
    Fnc4,
    Shift,
    /// Switch the active code set.
    Code(CodeSet),
    /// Start the code in the given code set.
    Start(CodeSet),
    Stop,
    /// A stop pattern read backwards.
    ReverseStop,
}

/// What a symbol stands for in a given code set.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Meaning {
    /// A single ASCII byte (code sets A and B).
    Byte(u8),
    /// Two digits packed as `0..=99` (code set C).
    Digits(u8),
    Function(Function),
}

/// The module widths of a symbol: bar, space, bar, space, bar, space.
///
/// A pattern is identical in all code sets, only its [meaning](meaning_of)
/// changes. Returns `None` for values above the reverse stop.
///
/// ```
/// # use code128_codec::pattern_of;
/// // START_B
/// assert_eq!(pattern_of(104), Some([2, 1, 1, 2, 1, 4]));
/// assert_eq!(pattern_of(200), None);
/// ```
pub fn pattern_of(symbol: u8) -> Option<[u32; 6]> {
    PATTERNS
        .get(symbol as usize)
        .map(|bits| bits_to_widths(*bits))
}

/// Interpret a symbol value in a code set.
pub fn meaning_of(symbol: u8, code_set: CodeSet) -> Result<Meaning, DecodingError> {
    use Function::*;
    let function = |f: Function| -> Result<Meaning, DecodingError> {
        Ok(Meaning::Function(f))
    };
    match (code_set, symbol) {
        (CodeSet::A, 0..=63) => Ok(Meaning::Byte(symbol + b' ')),
        (CodeSet::A, 64..=95) => Ok(Meaning::Byte(symbol - 64)),
        (CodeSet::B, 0..=95) => Ok(Meaning::Byte(symbol + b' ')),
        (CodeSet::C, 0..=99) => Ok(Meaning::Digits(symbol)),
        (CodeSet::A | CodeSet::B, FNC3) => function(Fnc3),
        (CodeSet::A | CodeSet::B, FNC2) => function(Fnc2),
        (CodeSet::A | CodeSet::B, SHIFT) => function(Shift),
        (CodeSet::A | CodeSet::B, CODE_C) => function(Code(CodeSet::C)),
        (CodeSet::A | CodeSet::C, CODE_B) => function(Code(CodeSet::B)),
        (CodeSet::B, CODE_B) => function(Fnc4),
        (CodeSet::B | CodeSet::C, CODE_A) => function(Code(CodeSet::A)),
        (CodeSet::A, CODE_A) => function(Fnc4),
        (_, FNC1) => function(Fnc1),
        (_, START_A) => function(Start(CodeSet::A)),
        (_, START_B) => function(Start(CodeSet::B)),
        (_, START_C) => function(Start(CodeSet::C)),
        (_, STOP) => function(Stop),
        (_, REVERSE_STOP) => function(ReverseStop),
        _ => Err(DecodingError::UnknownSymbol(symbol)),
    }
}

/// Find the symbol with exactly these six module widths.
///
/// The code set only serves the error report; patterns do not depend on it.
pub fn symbol_of(widths: &[u32], code_set: CodeSet) -> Result<u8, DecodingError> {
    widths_to_bits(widths)
        .and_then(lookup)
        .ok_or_else(|| DecodingError::NoMatchingSymbol {
            widths: window(widths),
            code_set,
        })
}

/// The symbol value for a byte in code set A or B.
pub(crate) fn value_of(byte: u8, code_set: CodeSet) -> Option<u8> {
    match (code_set, byte) {
        (CodeSet::A, 0x00..=0x1F) => Some(byte + 64),
        (CodeSet::A, b' '..=b'_') => Some(byte - b' '),
        (CodeSet::B, b' '..=0x7F) => Some(byte - b' '),
        _ => None,
    }
}

fn lookup(pattern: u16) -> Option<u8> {
    const PATTERN_SORTED: [u16; 108] = [
        0x426, 0x42c, 0x432, 0x434, 0x446, 0x44c, 0x458, 0x45e, 0x462, 0x464, 0x468, 0x46e, 0x476,
        0x47a, 0x486, 0x48c, 0x498, 0x49e, 0x4b0, 0x4bc, 0x4c2, 0x4c4, 0x4c8, 0x4ce, 0x4d0, 0x4dc,
        0x4e6, 0x4ec, 0x4f2, 0x4f4, 0x50c, 0x518, 0x51e, 0x530, 0x53c, 0x578, 0x584, 0x588, 0x58e,
        0x590, 0x59c, 0x5b8, 0x5c6, 0x5cc, 0x5d8, 0x5de, 0x5e2, 0x5e4, 0x5e8, 0x5ee, 0x612, 0x614,
        0x622, 0x624, 0x628, 0x62e, 0x636, 0x63a, 0x642, 0x644, 0x648, 0x64e, 0x650, 0x65c, 0x666,
        0x66c, 0x672, 0x674, 0x684, 0x688, 0x68e, 0x690, 0x69c, 0x6b8, 0x6c6, 0x6cc, 0x6d8, 0x6de,
        0x6e2, 0x6e4, 0x6e8, 0x6ee, 0x6f6, 0x716, 0x71a, 0x726, 0x72c, 0x732, 0x734, 0x746, 0x74c,
        0x758, 0x75e, 0x762, 0x764, 0x768, 0x76e, 0x776, 0x77a, 0x78a, 0x792, 0x794, 0x7a2, 0x7a4,
        0x7a8, 0x7ae, 0x7b6, 0x7ba,
    ];
    const SYMBOL_OF_SORTED: [u8; 108] = [
        0x44, 0x43, 0x4a, 0x49, 0x23, 0x05, 0x22, 0x5e, 0x26, 0x08, 0x25, 0x2c, 0x2f, 0x4f, 0x42,
        0x04, 0x03, 0x52, 0x41, 0x51, 0x48, 0x07, 0x06, 0x0e, 0x47, 0x0d, 0x11, 0x10, 0x55, 0x54,
        0x40, 0x21, 0x5d, 0x3f, 0x50, 0x5c, 0x46, 0x24, 0x2b, 0x45, 0x0c, 0x2a, 0x2e, 0x0f, 0x2d,
        0x63, 0x60, 0x53, 0x5f, 0x64, 0x4b, 0x4e, 0x29, 0x0b, 0x28, 0x32, 0x20, 0x6a, 0x3d, 0x0a,
        0x09, 0x14, 0x4c, 0x13, 0x02, 0x01, 0x12, 0x16, 0x67, 0x27, 0x31, 0x68, 0x69, 0x6b, 0x1f,
        0x00, 0x1e, 0x59, 0x34, 0x15, 0x33, 0x35, 0x5a, 0x38, 0x3b, 0x1a, 0x19, 0x1d, 0x1c, 0x37,
        0x18, 0x36, 0x65, 0x3a, 0x1b, 0x39, 0x17, 0x30, 0x3c, 0x3e, 0x58, 0x57, 0x62, 0x56, 0x61,
        0x66, 0x5b, 0x4d,
    ];
    PATTERN_SORTED
        .binary_search(&pattern)
        .ok()
        .map(|i| SYMBOL_OF_SORTED[i])
}

fn widths_to_bits(widths: &[u32]) -> Option<u16> {
    if widths.len() != 6
        || widths.iter().any(|w| !(1..=4).contains(w))
        || widths.iter().sum::<u32>() != 11
    {
        return None;
    }
    let mut bits = 0u16;
    for (i, &width) in widths.iter().enumerate() {
        bits <<= width;
        if i % 2 == 0 {
            bits |= (1 << width) - 1;
        }
    }
    Some(bits)
}

fn bits_to_widths(bits: u16) -> [u32; 6] {
    let mut widths = [0; 6];
    let mut run = 0;
    let mut dark = true;
    for i in (0..11).rev() {
        let bit = bits & (1 << i) != 0;
        if bit != dark {
            run += 1;
            dark = bit;
        }
        widths[run] += 1;
    }
    widths
}

fn window(widths: &[u32]) -> [u32; 6] {
    let mut window = [0; 6];
    for (slot, width) in window.iter_mut().zip(widths) {
        *slot = *width;
    }
    window
}

#[test]
fn test_bits_to_widths() {
    assert_eq!(bits_to_widths(0b11010011100), [2, 1, 1, 2, 3, 2]);
    assert_eq!(bits_to_widths(PATTERNS[STOP as usize]), [2, 3, 3, 1, 1, 1]);
    assert_eq!(
        bits_to_widths(PATTERNS[REVERSE_STOP as usize]),
        [2, 1, 1, 1, 3, 3]
    );
}

#[test]
fn test_widths_to_bits() {
    assert_eq!(widths_to_bits(&[2, 1, 1, 2, 3, 2]), Some(0b11010011100));
    assert_eq!(widths_to_bits(&[2, 1, 1, 2, 3, 3]), None);
    assert_eq!(widths_to_bits(&[2, 1, 1, 2, 5, 0]), None);
    assert_eq!(widths_to_bits(&[2, 1, 1, 2, 3]), None);
}

#[test]
fn test_patterns() {
    for (i, bits) in PATTERNS.iter().enumerate() {
        let widths = bits_to_widths(*bits);
        assert_eq!(widths.iter().sum::<u32>(), 11);
        assert_eq!(symbol_of(&widths, CodeSet::B), Ok(i as u8));
    }
}

#[test]
fn test_stop_widths() {
    assert_eq!(STOP_WIDTHS.iter().sum::<u32>(), 13);
    assert_eq!(pattern_of(STOP).unwrap()[..], STOP_WIDTHS[..6]);
}

#[test]
fn test_no_match() {
    assert_eq!(
        symbol_of(&[1, 1, 1, 1, 1, 6], CodeSet::C),
        Err(DecodingError::NoMatchingSymbol {
            widths: [1, 1, 1, 1, 1, 6],
            code_set: CodeSet::C,
        })
    );
    // odd bar total, not a Code 128 pattern
    assert!(symbol_of(&[1, 1, 1, 1, 3, 4], CodeSet::A).is_err());
    assert!(symbol_of(&[2, 1, 1, 2, 1], CodeSet::A).is_err());
    assert!(symbol_of(&[4, 4, 1, 1, 1, 0], CodeSet::A).is_err());
}

#[test]
fn test_meanings() {
    assert_eq!(meaning_of(33, CodeSet::A), Ok(Meaning::Byte(b'A')));
    assert_eq!(meaning_of(65, CodeSet::A), Ok(Meaning::Byte(0x01)));
    assert_eq!(meaning_of(65, CodeSet::B), Ok(Meaning::Byte(b'a')));
    assert_eq!(meaning_of(95, CodeSet::B), Ok(Meaning::Byte(0x7F)));
    assert_eq!(meaning_of(65, CodeSet::C), Ok(Meaning::Digits(65)));
    assert_eq!(
        meaning_of(CODE_B, CodeSet::A),
        Ok(Meaning::Function(Function::Code(CodeSet::B)))
    );
    assert_eq!(
        meaning_of(CODE_B, CodeSet::B),
        Ok(Meaning::Function(Function::Fnc4))
    );
    assert_eq!(
        meaning_of(CODE_A, CodeSet::A),
        Ok(Meaning::Function(Function::Fnc4))
    );
    assert_eq!(
        meaning_of(CODE_A, CodeSet::C),
        Ok(Meaning::Function(Function::Code(CodeSet::A)))
    );
    assert_eq!(
        meaning_of(START_C, CodeSet::A),
        Ok(Meaning::Function(Function::Start(CodeSet::C)))
    );
    assert_eq!(meaning_of(FNC3, CodeSet::C), Ok(Meaning::Digits(96)));
    assert_eq!(meaning_of(108, CodeSet::B), Err(DecodingError::UnknownSymbol(108)));
}

#[test]
fn test_value_of_inverts_meaning() {
    for byte in 0..=0x7F {
        for code_set in [CodeSet::A, CodeSet::B] {
            if let Some(value) = value_of(byte, code_set) {
                assert_eq!(meaning_of(value, code_set), Ok(Meaning::Byte(byte)));
            }
        }
    }
    assert_eq!(value_of(b'a', CodeSet::A), None);
    assert_eq!(value_of(b'\n', CodeSet::B), None);
    assert_eq!(value_of(0x80, CodeSet::B), None);
}
