//! Support-set computation over the AND-gate graph
//!
//! `support(literal)` is the smallest set of input indices such that the
//! sub-DAG rooted at `literal` mentions only those inputs. It is computed
//! by a memoised, explicit-stack (non-recursive) traversal so that a
//! worst-case-deep AIG cannot blow the call stack, and so a malformed
//! cyclic AND graph cannot loop forever: a literal revisited while still
//! on the active path contributes the empty set for that re-entry instead
//! of aborting.

use std::collections::{BTreeSet, HashMap};

use crate::index::CircuitIndex;
use crate::literal::Lit;

/// A set of dense input indices.
pub type Support = BTreeSet<usize>;

enum Frame {
    Enter(u32),
    Exit(u32),
}

/// Computes and memoises support sets over one [`CircuitIndex`].
pub struct SupportAnalyzer<'a> {
    index: &'a CircuitIndex,
    cache: HashMap<u32, Support>,
}

impl<'a> SupportAnalyzer<'a> {
    /// Build an analyzer over the given index. Nothing is computed until
    /// [`support`](Self::support) is called.
    pub fn new(index: &'a CircuitIndex) -> SupportAnalyzer<'a> {
        SupportAnalyzer {
            index,
            cache: HashMap::new(),
        }
    }

    /// Support set of `lit`. `support(even) == support(odd)`: only the
    /// stripped literal is ever looked up or cached.
    pub fn support(&mut self, lit: Lit) -> Support {
        let root = lit.strip().value();
        if let Some(s) = self.cache.get(&root) {
            return s.clone();
        }
        self.compute(root);
        self.cache.get(&root).cloned().unwrap_or_default()
    }

    /// Iterative post-order traversal computing and caching the support of
    /// `root` and every literal it transitively depends on.
    fn compute(&mut self, root: u32) {
        let mut stack = vec![Frame::Enter(root)];
        let mut on_path: HashMap<u32, ()> = HashMap::new();

        while let Some(frame) = stack.pop() {
            match frame {
                Frame::Enter(lit) => {
                    if self.cache.contains_key(&lit) || on_path.contains_key(&lit) {
                        // Already resolved, or a cycle: the re-entry
                        // contributes nothing and is not cached here.
                        continue;
                    }
                    if let Some(idx) = self.index.input_index(Lit::new(lit)) {
                        self.cache.insert(lit, Support::from([idx]));
                        continue;
                    }
                    if let Some((in1, in2)) = self.index.and_operands(Lit::new(lit)) {
                        on_path.insert(lit, ());
                        stack.push(Frame::Exit(lit));
                        stack.push(Frame::Enter(in2.strip().value()));
                        stack.push(Frame::Enter(in1.strip().value()));
                    } else {
                        // Constant, or a literal with no known definition.
                        self.cache.insert(lit, Support::new());
                    }
                }
                Frame::Exit(lit) => {
                    on_path.remove(&lit);
                    let (in1, in2) = self
                        .index
                        .and_operands(Lit::new(lit))
                        .expect("Exit frame only pushed for AND-gate outputs");
                    let mut combined = self
                        .cache
                        .get(&in1.strip().value())
                        .cloned()
                        .unwrap_or_default();
                    combined.extend(
                        self.cache
                            .get(&in2.strip().value())
                            .cloned()
                            .unwrap_or_default(),
                    );
                    self.cache.insert(lit, combined);
                }
            }
        }
    }

    /// Build the `[O x I]` support matrix: row `o` is the support set of
    /// output `o`, as a boolean vector over `[0, n_inputs)`.
    pub fn support_matrix(&mut self, outputs: &[Lit], n_inputs: usize) -> Vec<Vec<bool>> {
        outputs
            .iter()
            .map(|&lit| {
                let support = self.support(lit);
                let mut row = vec![false; n_inputs];
                for i in support {
                    if i < n_inputs {
                        row[i] = true;
                    }
                }
                row
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::parse_aag;

    #[test]
    fn test_input_support() {
        let rec = parse_aag("aag 3 2 0 1 1\n2\n4\n6\n6 2 4\n").unwrap();
        let idx = CircuitIndex::build(&rec);
        let mut sup = SupportAnalyzer::new(&idx);
        assert_eq!(sup.support(Lit::new(2)), Support::from([0]));
        assert_eq!(sup.support(Lit::new(3)), Support::from([0]));
        assert_eq!(sup.support(Lit::new(6)), Support::from([0, 1]));
        assert_eq!(sup.support(Lit::new(7)), Support::from([0, 1]));
    }

    #[test]
    fn test_constant_support_empty() {
        let rec = parse_aag("aag 1 1 0 1 0\n2\n0\n").unwrap();
        let idx = CircuitIndex::build(&rec);
        let mut sup = SupportAnalyzer::new(&idx);
        assert_eq!(sup.support(Lit::zero()), Support::new());
        assert_eq!(sup.support(Lit::one()), Support::new());
    }

    #[test]
    fn test_shared_subexpression_memoised() {
        // out = (a & b) & (a & b), sharing literal 6.
        let rec = parse_aag("aag 4 2 0 1 2\n2\n4\n8\n6 2 4\n8 6 6\n").unwrap();
        let idx = CircuitIndex::build(&rec);
        let mut sup = SupportAnalyzer::new(&idx);
        assert_eq!(sup.support(Lit::new(8)), Support::from([0, 1]));
    }

    #[test]
    fn test_cyclic_support_defended() {
        // Malformed: 6 depends on 8, 8 depends on 6. Neither is a real
        // input, so this cannot arise from a valid AIGER file, but the
        // traversal must not hang.
        let rec = parse_aag("aag 4 1 0 1 2\n2\n8\n6 8 2\n8 6 2\n").unwrap();
        let idx = CircuitIndex::build(&rec);
        let mut sup = SupportAnalyzer::new(&idx);
        let s = sup.support(Lit::new(8));
        assert_eq!(s, Support::from([0]));
    }

    #[test]
    fn test_support_matrix() {
        let rec = parse_aag("aag 3 2 0 1 1\n2\n4\n6\n6 2 4\n").unwrap();
        let idx = CircuitIndex::build(&rec);
        let mut sup = SupportAnalyzer::new(&idx);
        let matrix = sup.support_matrix(&[Lit::new(6)], 2);
        assert_eq!(matrix, vec![vec![true, true]]);
    }
}
