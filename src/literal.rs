//! AIGER literal representation
//!
//! An AIGER literal is a non-negative integer exactly as written in an AAG
//! file. The low bit carries the polarity (0 = positive, 1 = negated); the
//! remaining bits identify the variable. Literal 0 is constant false,
//! literal 1 is constant true. Unlike an in-memory AIG representation,
//! nothing here renumbers variables: a `Lit` is the literal value itself.

use std::fmt;

/// A single AIGER literal, as found verbatim in the input/output/AND-gate
/// fields of an AAG file.
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Debug, Default)]
pub struct Lit(u32);

impl Lit {
    /// Constant false.
    pub fn zero() -> Lit {
        Lit(0)
    }

    /// Constant true.
    pub fn one() -> Lit {
        Lit(1)
    }

    /// Build a literal from its raw numeric value.
    pub fn new(val: u32) -> Lit {
        Lit(val)
    }

    /// The raw numeric value, as it appears in the AAG text.
    pub fn value(&self) -> u32 {
        self.0
    }

    /// True for literal 0 or 1.
    pub fn is_constant(&self) -> bool {
        self.0 <= 1
    }

    /// Polarity of the literal: true if negated (odd).
    pub fn polarity(&self) -> bool {
        self.0 & 1 != 0
    }

    /// Strip the polarity bit, returning the positive-polarity literal for
    /// the same variable. `support(even) = support(odd) = support(ℓ & ~1)`.
    pub fn strip(&self) -> Lit {
        Lit(self.0 & !1)
    }

    /// Parse a single decimal literal. Returns `None` on anything that is
    /// not a bare non-negative integer; callers skip the owning record on
    /// `None` rather than failing the whole parse.
    pub fn parse(s: &str) -> Option<Lit> {
        s.trim().parse::<u32>().ok().map(Lit)
    }
}

impl fmt::Display for Lit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants() {
        assert!(Lit::zero().is_constant());
        assert!(Lit::one().is_constant());
        assert!(!Lit::zero().polarity());
        assert!(Lit::one().polarity());
    }

    #[test]
    fn test_strip() {
        assert_eq!(Lit::new(6).strip(), Lit::new(6));
        assert_eq!(Lit::new(7).strip(), Lit::new(6));
        assert_eq!(Lit::new(2).strip(), Lit::new(2));
    }

    #[test]
    fn test_parse() {
        assert_eq!(Lit::parse("42"), Some(Lit::new(42)));
        assert_eq!(Lit::parse("  7 "), Some(Lit::new(7)));
        assert_eq!(Lit::parse("-3"), None);
        assert_eq!(Lit::parse("abc"), None);
    }
}
