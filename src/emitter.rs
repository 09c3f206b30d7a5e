//! Apply a permutation to a parsed record and render the output AAG text
//!
//! Everything except the input-literal block and the input-symbol
//! indices is passed through byte-identical to the parsed input.

use crate::record::AagRecord;

/// Check that `permutation` is a genuine permutation of `[0, n)`. If it
/// is not (wrong length, duplicate, or out-of-range entry), print a
/// diagnostic and fall back to the identity permutation, so a
/// well-formed AAG is always emitted once parsing has succeeded.
pub fn validate_or_identity(permutation: Vec<usize>, n: usize) -> Vec<usize> {
    let mut sorted = permutation.clone();
    sorted.sort_unstable();
    let is_valid = sorted.len() == n && sorted.iter().enumerate().all(|(i, &v)| i == v);
    if is_valid {
        permutation
    } else {
        eprintln!(
            "warning: algorithm produced an invalid permutation (expected a permutation of [0, {n})); falling back to identity order"
        );
        (0..n).collect()
    }
}

/// Render the output AAG text for `record` reordered by `permutation`,
/// where `permutation[new_pos]` is the old input index placed at
/// `new_pos`. `permutation` must already be a valid permutation of
/// `[0, record.num_inputs())`.
pub fn emit_aag(record: &AagRecord, permutation: &[usize]) -> String {
    let header = &record.header;
    let mut out = String::new();
    out.push_str(&format!(
        "aag {} {} {} {} {}\n",
        header.m, header.i, header.l, header.o, header.a
    ));

    for &old in permutation {
        out.push_str(&record.in_lits[old]);
        out.push('\n');
    }
    for line in &record.latches {
        out.push_str(line);
        out.push('\n');
    }
    for line in &record.outputs {
        out.push_str(line);
        out.push('\n');
    }
    for line in &record.and_gates {
        out.push_str(line);
        out.push('\n');
    }

    let mut old_to_new = vec![0usize; permutation.len()];
    for (new_pos, &old) in permutation.iter().enumerate() {
        old_to_new[old] = new_pos;
    }

    for line in &record.symbols {
        out.push_str(&rewrite_symbol_line(line, &old_to_new));
        out.push('\n');
    }
    for line in &record.comments {
        out.push_str(line);
        out.push('\n');
    }

    out
}

/// Rewrite an `i<k> name` symbol line's index through `old_to_new`.
/// Any other symbol line (`l*`, `o*`, or unparseable) is returned
/// unchanged.
fn rewrite_symbol_line(line: &str, old_to_new: &[usize]) -> String {
    let Some(rest) = line.strip_prefix('i') else {
        return line.to_string();
    };
    let Some((idx_str, name)) = rest.split_once(char::is_whitespace) else {
        return line.to_string();
    };
    let Ok(old) = idx_str.parse::<usize>() else {
        return line.to_string();
    };
    let Some(&new) = old_to_new.get(old) else {
        return line.to_string();
    };
    format!("i{new} {name}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::parse_aag;

    #[test]
    fn test_validate_accepts_permutation() {
        assert_eq!(validate_or_identity(vec![1, 0], 2), vec![1, 0]);
    }

    #[test]
    fn test_validate_rejects_wrong_length() {
        assert_eq!(validate_or_identity(vec![0], 2), vec![0, 1]);
    }

    #[test]
    fn test_validate_rejects_duplicate() {
        assert_eq!(validate_or_identity(vec![0, 0], 2), vec![0, 1]);
    }

    #[test]
    fn test_emit_reorders_inputs_and_symbols() {
        let text = "aag 3 2 0 1 1\n2\n4\n6\n6 2 4\ni0 a\ni1 b\n";
        let rec = parse_aag(text).unwrap();
        let out = emit_aag(&rec, &[1, 0]);
        // Input block reordered to [old 1, old 0]; symbol lines keep
        // their original order but each index is rewritten to the new
        // position of that old input (old 0 -> new 1, old 1 -> new 0).
        assert_eq!(
            out,
            "aag 3 2 0 1 1\n4\n2\n6 2 4\ni1 a\ni0 b\n"
        );
    }

    #[test]
    fn test_emit_identity_roundtrips() {
        let text = "aag 3 2 0 1 1\n2\n4\n6\n6 2 4\ni0 a\ni1 b\nc\nhello\n";
        let rec = parse_aag(text).unwrap();
        let out = emit_aag(&rec, &[0, 1]);
        assert_eq!(out, text);
    }

    #[test]
    fn test_emit_empty_inputs() {
        let text = "aag 0 0 0 0 0\n";
        let rec = parse_aag(text).unwrap();
        let out = emit_aag(&rec, &[]);
        assert_eq!(out, text);
    }
}
