//! Cost surrogates used by the local-search ordering algorithms
//!
//! Neither surrogate builds an actual BDD; both are cheap proxies that
//! `sift` and `window` evaluate many times over small candidate moves.

use crate::features::FeatureTable;

/// Total BDD-width surrogate of `order`, the ordering `sift` minimises.
///
/// `support_matrix[o][v]` is true when output `o`'s support contains
/// input `v`. For each level `l`, the width is the number of outputs
/// whose support reaches into the suffix `order[l..]` from `order[l]`'s
/// own position, i.e. the number of `order[k]` (`k >= l`) that some
/// output supporting `order[l]` also supports.
pub fn bdd_width_surrogate(order: &[usize], support_matrix: &[Vec<bool>]) -> u64 {
    let n = order.len();
    let mut total = 0u64;
    for l in 0..n {
        let v = order[l];
        let mut active: std::collections::BTreeSet<usize> = std::collections::BTreeSet::new();
        for row in support_matrix {
            if !row[v] {
                continue;
            }
            for &u in order.iter().skip(l) {
                if row[u] {
                    active.insert(u);
                }
            }
        }
        total += active.len() as u64;
    }
    total
}

/// Count of AND gates whose two operands are exactly the input literals
/// of `a` and `b`, in either order. The feature table's
/// `interaction_count` is a per-input total and can't answer this
/// pairwise question, so this scans the AND-gate operand list directly.
pub fn pairwise_interaction(
    and_gates: &[(Option<usize>, Option<usize>)],
    a: usize,
    b: usize,
) -> u32 {
    and_gates
        .iter()
        .filter(|&&(v1, v2)| {
            matches!((v1, v2), (Some(x), Some(y)) if (x == a && y == b) || (x == b && y == a))
        })
        .count() as u32
}

/// Window cost surrogate for a short window of input indices (length
/// `<= 4` by construction in `window`'s caller).
///
/// Lower is better: adjacent same-`var_name` pairs are rewarded with a
/// `-2` bonus, and every adjacent pair is penalised by its pairwise
/// interaction count scaled by how far apart its bit positions are.
pub fn window_cost(
    window: &[usize],
    features: &FeatureTable,
    and_gates: &[(Option<usize>, Option<usize>)],
) -> i64 {
    let mut cost = 0i64;
    for pair in window.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        let fa = &features.inputs[a];
        let fb = &features.inputs[b];
        if fa.var_name == fb.var_name {
            cost -= 2;
        }
        let interaction = pairwise_interaction(and_gates, a, b) as i64;
        let bit_gap = (fa.bit_position - fb.bit_position).abs() + 1;
        cost += interaction * bit_gap;
    }
    cost
}
