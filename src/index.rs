//! Derived indices built once from the record model
//!
//! The `CircuitIndex` never mutates the [`crate::record::AagRecord`] it is
//! built from; it is a set of read-only lookup tables computed by a
//! single linear scan of `in_lits` and `and_gates`.

use std::collections::HashMap;

use crate::literal::Lit;
use crate::record::AagRecord;

/// Input-literal map, AND map and fan lists derived from one [`AagRecord`].
#[derive(Debug, Clone, Default)]
pub struct CircuitIndex {
    /// Maps a stripped (even) input literal to its dense input index.
    lit_to_input: HashMap<u32, usize>,
    /// Maps an AND-gate output literal to its two operand literals.
    and_map: HashMap<u32, (Lit, Lit)>,
    /// For each node literal (stripped), the AND-gate output literals that
    /// consume it directly.
    forward: HashMap<u32, Vec<Lit>>,
    /// For each AND-gate output literal, its two operands (same content
    /// as `and_map`, kept as a list for uniform fan traversal).
    backward: HashMap<u32, Vec<Lit>>,
}

impl CircuitIndex {
    /// Build the index from a parsed record. Malformed lines (not three
    /// parseable integers for an AND gate, or an unparseable input
    /// literal) are skipped. If two AND gates declare the same output
    /// literal, the last one wins.
    pub fn build(record: &AagRecord) -> CircuitIndex {
        let mut lit_to_input = HashMap::new();
        for (idx, raw) in record.in_lits.iter().enumerate() {
            if let Some(lit) = Lit::parse(raw) {
                lit_to_input.insert(lit.strip().value(), idx);
            }
        }

        let mut and_map = HashMap::new();
        let mut forward: HashMap<u32, Vec<Lit>> = HashMap::new();
        let mut backward: HashMap<u32, Vec<Lit>> = HashMap::new();
        for raw in &record.and_gates {
            let fields: Vec<&str> = raw.split_whitespace().collect();
            if fields.len() != 3 {
                continue;
            }
            let (Some(out), Some(in1), Some(in2)) = (
                Lit::parse(fields[0]),
                Lit::parse(fields[1]),
                Lit::parse(fields[2]),
            ) else {
                continue;
            };
            let out = out.strip();
            and_map.insert(out.value(), (in1, in2));
            forward.entry(in1.strip().value()).or_default().push(out);
            forward.entry(in2.strip().value()).or_default().push(out);
            backward.insert(out.value(), vec![in1, in2]);
        }

        CircuitIndex {
            lit_to_input,
            and_map,
            forward,
            backward,
        }
    }

    /// Dense input index for a (possibly negated) input literal, if any.
    pub fn input_index(&self, lit: Lit) -> Option<usize> {
        self.lit_to_input.get(&lit.strip().value()).copied()
    }

    /// The two operand literals of the AND gate whose output is `lit`
    /// (polarity of `lit` ignored), if any.
    pub fn and_operands(&self, lit: Lit) -> Option<(Lit, Lit)> {
        self.and_map.get(&lit.strip().value()).copied()
    }

    /// AND-gate output literals that directly consume `lit` as an operand.
    pub fn fanout(&self, lit: Lit) -> &[Lit] {
        self.forward
            .get(&lit.strip().value())
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// The operands of the AND gate whose output is `lit`, as a slice (for
    /// uniform fan-in traversal). Empty if `lit` is not an AND-gate output.
    pub fn fanin(&self, lit: Lit) -> &[Lit] {
        self.backward
            .get(&lit.strip().value())
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::parse_aag;

    #[test]
    fn test_input_map() {
        let rec = parse_aag("aag 3 2 0 1 1\n2\n4\n6\n6 2 4\n").unwrap();
        let idx = CircuitIndex::build(&rec);
        assert_eq!(idx.input_index(Lit::new(2)), Some(0));
        assert_eq!(idx.input_index(Lit::new(3)), Some(0));
        assert_eq!(idx.input_index(Lit::new(4)), Some(1));
        assert_eq!(idx.input_index(Lit::new(6)), None);
    }

    #[test]
    fn test_and_map_and_fanout() {
        let rec = parse_aag("aag 3 2 0 1 1\n2\n4\n6\n6 2 4\n").unwrap();
        let idx = CircuitIndex::build(&rec);
        assert_eq!(idx.and_operands(Lit::new(6)), Some((Lit::new(2), Lit::new(4))));
        assert_eq!(idx.and_operands(Lit::new(7)), Some((Lit::new(2), Lit::new(4))));
        assert_eq!(idx.fanout(Lit::new(2)), &[Lit::new(6)]);
        assert_eq!(idx.fanin(Lit::new(6)), &[Lit::new(2), Lit::new(4)]);
    }

    #[test]
    fn test_skips_malformed() {
        let rec = parse_aag("aag 1 1 0 1 1\n2\n2\nbad line here\n").unwrap();
        let idx = CircuitIndex::build(&rec);
        assert!(idx.and_operands(Lit::new(2)).is_none());
    }

    #[test]
    fn test_duplicate_output_last_wins() {
        let mut rec = parse_aag("aag 3 2 0 1 2\n2\n4\n6\n6 2 4\n6 4 2\n").unwrap();
        rec.header.a = 2;
        let idx = CircuitIndex::build(&rec);
        assert_eq!(idx.and_operands(Lit::new(6)), Some((Lit::new(4), Lit::new(2))));
    }
}
