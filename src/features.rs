//! Per-input structural feature extraction
//!
//! One [`InputFeatures`] record is computed for every primary input. The
//! fields mirror the feature table of the design doc exactly, including
//! the intentionally degenerate `depth_from_input` (see the module-level
//! note below) that downstream algorithms (`dfs`, `mincut`, `lifetime`,
//! `cofactor`, `hybrid`) are specified against.

use std::collections::HashMap;

use crate::index::CircuitIndex;
use crate::literal::Lit;
use crate::record::AagRecord;
use crate::support::SupportAnalyzer;

/// Structural features of one primary input.
#[derive(Debug, Clone)]
pub struct InputFeatures {
    /// Number of outputs whose support contains this input.
    pub support_count: usize,
    /// Sum over AND gates with both operands direct inputs, of
    /// occurrences of this input (counted symmetrically).
    pub interaction_count: u32,
    /// Longest-path depth of the input literal itself. Always 0: inputs
    /// are leaves, and the depth relaxation this is nominally drawn from
    /// never updates an input literal's own entry (see module docs).
    pub depth_from_input: u32,
    /// Minimum gate level at which this input appears as an AND-gate
    /// operand. `None` if the input is never used directly.
    pub first_use_level: Option<u32>,
    /// Maximum gate level at which this input appears as an AND-gate
    /// operand. `None` if the input is never used directly.
    pub last_use_level: Option<u32>,
    /// `last_use_level - first_use_level + 1`, or 0 if unused.
    pub variable_span: u32,
    /// Count of AND-gate operand occurrences of the positive literal.
    pub pos_uses: u32,
    /// Count of AND-gate operand occurrences of the negated literal.
    pub neg_uses: u32,
    /// `(1 - 2*|ratio - 1/2|) * total_uses`, 0 if unused.
    pub cofactor_weight: f64,
    /// Name parsed from the input symbol (`var_<idx>` if absent).
    pub var_name: String,
    /// Bit index parsed from `name[bit]` (0 if absent or unparseable).
    pub bit_position: i64,
    /// Number of inputs sharing `var_name`.
    pub bitwidth: usize,
    /// Input indices sharing `var_name`, sorted by `bit_position`.
    pub symmetry_group: Vec<usize>,
    /// `0.6/max(1,support_count) + 0.4/max(1,interaction_count)`.
    pub early_quant_priority: f64,
    /// Normalised weighted combination of depth, inverse span, cofactor
    /// weight and bitwidth.
    pub structural_importance: f64,
}

/// Feature table for every primary input of one [`AagRecord`].
#[derive(Debug, Clone, Default)]
pub struct FeatureTable {
    /// One entry per input index, in `[0, I)` order.
    pub inputs: Vec<InputFeatures>,
}

impl FeatureTable {
    /// Number of inputs in the table.
    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    /// True if there are no inputs.
    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }
}

/// Build the feature table for `record`, given its derived index and a
/// support analyzer to query output supports from.
pub fn extract_features(
    record: &AagRecord,
    index: &CircuitIndex,
    support: &mut SupportAnalyzer,
) -> FeatureTable {
    let n = record.num_inputs();
    if n == 0 {
        return FeatureTable::default();
    }

    let output_lits: Vec<Lit> = record.outputs.iter().filter_map(|s| Lit::parse(s)).collect();
    let support_matrix = support.support_matrix(&output_lits, n);

    let mut support_count = vec![0usize; n];
    for row in &support_matrix {
        for (i, used) in row.iter().enumerate() {
            if *used {
                support_count[i] += 1;
            }
        }
    }

    let and_gates = parse_and_gates(record);

    let interaction_count = calculate_interactions(&and_gates, index, n);
    let (first_use_level, last_use_level, variable_span) =
        calculate_variable_spans(&and_gates, index, n);
    let (pos_uses, neg_uses, cofactor_weight) = calculate_cofactor_weights(record, index, n);
    let (var_name, bit_position, bitwidth, symmetry_group) = extract_datapath_structure(record, n);

    let mut inputs: Vec<InputFeatures> = (0..n)
        .map(|i| InputFeatures {
            support_count: support_count[i],
            interaction_count: interaction_count[i],
            depth_from_input: 0,
            first_use_level: first_use_level[i],
            last_use_level: last_use_level[i],
            variable_span: variable_span[i],
            pos_uses: pos_uses[i],
            neg_uses: neg_uses[i],
            cofactor_weight: cofactor_weight[i],
            var_name: var_name[i].clone(),
            bit_position: bit_position[i],
            bitwidth: bitwidth[i],
            symmetry_group: symmetry_group[i].clone(),
            early_quant_priority: 0.0,
            structural_importance: 0.0,
        })
        .collect();

    for f in inputs.iter_mut() {
        let support_score = 1.0 / (f.support_count.max(1) as f64);
        let interaction_score = 1.0 / (f.interaction_count.max(1) as f64);
        f.early_quant_priority = support_score * 0.6 + interaction_score * 0.4;
    }

    let max_depth = inputs.iter().map(|f| f.depth_from_input).max().unwrap_or(0);
    let max_cofactor = inputs
        .iter()
        .fold(0.0f64, |acc, f| acc.max(f.cofactor_weight));
    let max_bitwidth = inputs.iter().map(|f| f.bitwidth).max().unwrap_or(0);
    for f in inputs.iter_mut() {
        let depth_score = f.depth_from_input as f64 / (max_depth.max(1) as f64);
        let span_score = 1.0 / (f.variable_span.max(1) as f64);
        let cofactor_score = f.cofactor_weight / max_cofactor.max(1.0);
        let bitwidth_score = f.bitwidth as f64 / (max_bitwidth.max(1) as f64);
        f.structural_importance =
            depth_score * 0.3 + span_score * 0.3 + cofactor_score * 0.2 + bitwidth_score * 0.2;
    }

    FeatureTable { inputs }
}

struct AndGate {
    in1: Lit,
    in2: Lit,
}

fn parse_and_gates(record: &AagRecord) -> Vec<AndGate> {
    record
        .and_gates
        .iter()
        .filter_map(|raw| {
            let fields: Vec<&str> = raw.split_whitespace().collect();
            if fields.len() != 3 {
                return None;
            }
            let in1 = Lit::parse(fields[1])?;
            let in2 = Lit::parse(fields[2])?;
            Some(AndGate { in1, in2 })
        })
        .collect()
}

/// Direct-operand occurrence count of each input, symmetrically summed
/// over every AND gate whose two operands are both input literals.
fn calculate_interactions(and_gates: &[AndGate], index: &CircuitIndex, n: usize) -> Vec<u32> {
    let mut interaction_count = vec![0u32; n];
    for gate in and_gates {
        let v1 = index.input_index(gate.in1);
        let v2 = index.input_index(gate.in2);
        if let (Some(v1), Some(v2)) = (v1, v2) {
            interaction_count[v1] += 1;
            interaction_count[v2] += 1;
        }
    }
    interaction_count
}

/// Gate level assignment degenerates to a constant 1 for every AND gate:
/// `level(operand)` only has a non-default value when the operand is a
/// direct input, and every input's `depth_from_input` is 0 by
/// construction, so `gate_level = max(level1, level2) + 1` is always 1.
/// This mirrors the original analyzer's behaviour exactly rather than
/// computing a real topological gate level.
fn calculate_variable_spans(
    and_gates: &[AndGate],
    index: &CircuitIndex,
    n: usize,
) -> (Vec<Option<u32>>, Vec<Option<u32>>, Vec<u32>) {
    let mut first_use_level = vec![None; n];
    let mut last_use_level = vec![None; n];
    let depth_from_input = 0u32;

    for gate in and_gates {
        let v1 = index.input_index(gate.in1);
        let v2 = index.input_index(gate.in2);
        let level1 = if v1.is_some() { depth_from_input } else { 0 };
        let level2 = if v2.is_some() { depth_from_input } else { 0 };
        let gate_level = level1.max(level2) + 1;
        for v in [v1, v2].into_iter().flatten() {
            first_use_level[v] = Some(first_use_level[v].map_or(gate_level, |cur| cur.min(gate_level)));
            last_use_level[v] = Some(last_use_level[v].map_or(gate_level, |cur| cur.max(gate_level)));
        }
    }

    let variable_span = (0..n)
        .map(|v| match (first_use_level[v], last_use_level[v]) {
            (Some(first), Some(last)) => last - first + 1,
            _ => 0,
        })
        .collect();

    (first_use_level, last_use_level, variable_span)
}

fn calculate_cofactor_weights(
    record: &AagRecord,
    index: &CircuitIndex,
    n: usize,
) -> (Vec<u32>, Vec<u32>, Vec<f64>) {
    let mut pos_uses = vec![0u32; n];
    let mut neg_uses = vec![0u32; n];

    for raw in &record.and_gates {
        let fields: Vec<&str> = raw.split_whitespace().collect();
        if fields.len() != 3 {
            continue;
        }
        let Some(in1) = Lit::parse(fields[1]) else {
            continue;
        };
        let Some(in2) = Lit::parse(fields[2]) else {
            continue;
        };
        for lit in [in1, in2] {
            if let Some(v) = index.input_index(lit) {
                if lit.polarity() {
                    neg_uses[v] += 1;
                } else {
                    pos_uses[v] += 1;
                }
            }
        }
    }

    let cofactor_weight = (0..n)
        .map(|v| {
            let total = pos_uses[v] + neg_uses[v];
            if total == 0 {
                0.0
            } else {
                let ratio = pos_uses[v] as f64 / total as f64;
                let balance = 1.0 - (ratio - 0.5).abs() * 2.0;
                balance * total as f64
            }
        })
        .collect();

    (pos_uses, neg_uses, cofactor_weight)
}

/// Parse `iK name` / `iK name[bit]` symbol lines into per-input
/// `(var_name, bit_position)` pairs, then derive `bitwidth` and
/// `symmetry_group` from the resulting name groups.
fn extract_datapath_structure(
    record: &AagRecord,
    n: usize,
) -> (Vec<String>, Vec<i64>, Vec<usize>, Vec<Vec<usize>>) {
    let mut var_name: Vec<String> = (0..n).map(|i| format!("var_{i}")).collect();
    let mut bit_position = vec![0i64; n];

    for sym in &record.symbols {
        if !sym.starts_with('i') {
            continue;
        }
        let Some((idx_str, name)) = sym[1..].split_once(char::is_whitespace) else {
            continue;
        };
        let Ok(idx) = idx_str.parse::<usize>() else {
            continue;
        };
        if idx >= n {
            continue;
        }
        let name = name.trim_start();
        let (name_part, bit) = match (name.find('['), name.find(']')) {
            (Some(open), Some(close)) if open < close => {
                let bit_str = &name[open + 1..close];
                let bit = bit_str.parse::<i64>().unwrap_or(0);
                (&name[..open], bit)
            }
            _ => (name, 0),
        };
        var_name[idx] = name_part.to_string();
        bit_position[idx] = bit;
    }

    let mut groups: HashMap<&str, Vec<usize>> = HashMap::new();
    for (i, name) in var_name.iter().enumerate() {
        groups.entry(name.as_str()).or_default().push(i);
    }
    let mut bitwidth = vec![1usize; n];
    let mut symmetry_group = vec![Vec::new(); n];
    for members in groups.values() {
        let width = members.len();
        let mut sorted_members = members.clone();
        sorted_members.sort_by_key(|&i| bit_position[i]);
        for &i in members {
            bitwidth[i] = width;
            symmetry_group[i] = sorted_members.clone();
        }
    }

    (var_name, bit_position, bitwidth, symmetry_group)
}
