//! Digit pattern table
//!
//! Every digit maps to one 5-bit pattern. The same marker pattern opens and
//! closes each encoded sequence, so it must never collide with a digit pattern.
//! Patterns are stored as their 5-bit value (most significant bit first), which
//! lets the reverse lookup be a plain 32-entry array.

use super::error::TableError;
use super::types::Digit;
use std::fmt;

/// Width of every pattern, in bits
pub const PATTERN_LEN: usize = 5;

/// Number of encodable digits
pub const DIGIT_COUNT: usize = 10;

const PATTERN_SPACE: usize = 1 << PATTERN_LEN;
const PATTERN_MASK: u8 = (PATTERN_SPACE - 1) as u8;

/// A fixed-width binary pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pattern(u8);

impl Pattern {
    /// Build a pattern from its low 5 bits
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & PATTERN_MASK)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Parse exactly `PATTERN_LEN` ASCII `'0'`/`'1'` bytes
    pub fn from_ascii(chunk: &[u8]) -> Option<Self> {
        if chunk.len() != PATTERN_LEN {
            return None;
        }
        let mut bits = 0u8;
        for &b in chunk {
            let bit = match b {
                b'0' => 0,
                b'1' => 1,
                _ => return None,
            };
            bits = (bits << 1) | bit;
        }
        Some(Self(bits))
    }

    /// Bits as `'0'`/`'1'` characters, most significant first
    pub fn chars(self) -> impl Iterator<Item = char> {
        (0..PATTERN_LEN).rev().map(move |shift| if (self.0 >> shift) & 1 == 1 { '1' } else { '0' })
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in self.chars() {
            fmt::Write::write_char(f, c)?;
        }
        Ok(())
    }
}

const STANDARD_PATTERNS: [Pattern; DIGIT_COUNT] = [
    Pattern::from_bits(0b00110),
    Pattern::from_bits(0b10001),
    Pattern::from_bits(0b01001),
    Pattern::from_bits(0b11000),
    Pattern::from_bits(0b00101),
    Pattern::from_bits(0b10100),
    Pattern::from_bits(0b01100),
    Pattern::from_bits(0b00011),
    Pattern::from_bits(0b11100),
    Pattern::from_bits(0b01110),
];

const STANDARD_MARKER: Pattern = Pattern::from_bits(0b10101);

/// Bijective digit <-> pattern map plus the start/stop marker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternTable {
    patterns: [Pattern; DIGIT_COUNT],
    marker: Pattern,
    reverse: [Option<Digit>; PATTERN_SPACE],
}

// The built-in table must be injective and disjoint from its marker.
const _: () = assert!(
    PatternTable::STANDARD.is_well_formed(),
    "standard pattern table is ambiguous"
);

impl PatternTable {
    /// The table every barcode in the store is written with
    pub const STANDARD: PatternTable = PatternTable::build(STANDARD_PATTERNS, STANDARD_MARKER);

    const fn build(patterns: [Pattern; DIGIT_COUNT], marker: Pattern) -> Self {
        let mut reverse = [None; PATTERN_SPACE];
        let mut d = 0;
        while d < DIGIT_COUNT {
            reverse[patterns[d].bits() as usize] = Some(Digit::from_index(d));
            d += 1;
        }
        Self { patterns, marker, reverse }
    }

    /// Build a custom table, rejecting ambiguous pattern sets
    pub fn new(patterns: [Pattern; DIGIT_COUNT], marker: Pattern) -> Result<Self, TableError> {
        let table = Self::build(patterns, marker);
        table.validate()?;
        Ok(table)
    }

    const fn is_well_formed(&self) -> bool {
        let mut i = 0;
        while i < DIGIT_COUNT {
            if self.patterns[i].bits() == self.marker.bits() {
                return false;
            }
            let mut j = i + 1;
            while j < DIGIT_COUNT {
                if self.patterns[i].bits() == self.patterns[j].bits() {
                    return false;
                }
                j += 1;
            }
            i += 1;
        }
        true
    }

    fn validate(&self) -> Result<(), TableError> {
        for (i, pattern) in self.patterns.iter().enumerate() {
            if *pattern == self.marker {
                return Err(TableError::MarkerCollision { digit: i as u8 });
            }
            if let Some(j) = self.patterns[i + 1..].iter().position(|p| p == pattern) {
                return Err(TableError::DuplicatePattern { first: i as u8, second: (i + 1 + j) as u8 });
            }
        }
        Ok(())
    }

    #[inline]
    pub fn pattern_for(&self, digit: Digit) -> Pattern {
        self.patterns[digit.value() as usize]
    }

    /// Reverse lookup; `None` for the marker and any unassigned pattern
    #[inline]
    pub fn digit_for(&self, pattern: Pattern) -> Option<Digit> {
        self.reverse[pattern.bits() as usize]
    }

    #[inline]
    pub fn marker(&self) -> Pattern {
        self.marker
    }
}

impl Default for PatternTable {
    fn default() -> Self {
        Self::STANDARD
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn digit(n: u8) -> Digit {
        Digit::new(n).unwrap()
    }

    #[test]
    fn test_standard_patterns_are_distinct() {
        let table = PatternTable::STANDARD;
        for a in 0..10 {
            for b in 0..10 {
                if a != b {
                    assert_ne!(table.pattern_for(digit(a)), table.pattern_for(digit(b)));
                }
            }
            assert_ne!(table.pattern_for(digit(a)), table.marker());
        }
    }

    #[test]
    fn test_standard_patterns_match_known_values() {
        let table = PatternTable::STANDARD;
        assert_eq!(table.pattern_for(digit(0)).to_string(), "00110");
        assert_eq!(table.pattern_for(digit(7)).to_string(), "00011");
        assert_eq!(table.pattern_for(digit(9)).to_string(), "01110");
        assert_eq!(table.marker().to_string(), "10101");
    }

    #[test]
    fn test_reverse_lookup_inverts_forward() {
        let table = PatternTable::STANDARD;
        for n in 0..10 {
            let d = digit(n);
            assert_eq!(table.digit_for(table.pattern_for(d)), Some(d));
        }
    }

    #[test]
    fn test_marker_and_unknown_patterns_not_found() {
        let table = PatternTable::STANDARD;
        assert_eq!(table.digit_for(table.marker()), None);
        assert_eq!(table.digit_for(Pattern::from_bits(0b11111)), None);
        assert_eq!(table.digit_for(Pattern::from_bits(0b00000)), None);

        let assigned = (0..32u8).filter(|&b| table.digit_for(Pattern::from_bits(b)).is_some()).count();
        assert_eq!(assigned, DIGIT_COUNT);
    }

    #[test]
    fn test_from_bits_keeps_low_five_bits() {
        assert_eq!(Pattern::from_bits(0b1110_0110).bits(), 0b00110);
        assert_eq!(Pattern::from_ascii(b"10101").map(Pattern::bits), Some(0b10101));
    }

    #[test]
    fn test_from_ascii() {
        assert_eq!(Pattern::from_ascii(b"00110"), Some(Pattern::from_bits(0b00110)));
        assert_eq!(Pattern::from_ascii(b"0011"), None);
        assert_eq!(Pattern::from_ascii(b"001100"), None);
        assert_eq!(Pattern::from_ascii(b"0a110"), None);
    }

    #[test]
    fn test_new_rejects_duplicate_patterns() {
        let mut patterns = STANDARD_PATTERNS;
        patterns[8] = patterns[3];
        assert_eq!(
            PatternTable::new(patterns, STANDARD_MARKER),
            Err(TableError::DuplicatePattern { first: 3, second: 8 })
        );
    }

    #[test]
    fn test_new_rejects_marker_collision() {
        let mut patterns = STANDARD_PATTERNS;
        patterns[5] = STANDARD_MARKER;
        assert_eq!(
            PatternTable::new(patterns, STANDARD_MARKER),
            Err(TableError::MarkerCollision { digit: 5 })
        );
    }

    #[test]
    fn test_new_accepts_standard() {
        let table = PatternTable::new(STANDARD_PATTERNS, STANDARD_MARKER).unwrap();
        assert_eq!(table, PatternTable::STANDARD);
    }
}
