//! Read and write AAG (AIGER ASCII) files
//!
//! This is treated as opaque I/O with a fixed record contract: split the
//! text into the header and the six line blocks it specifies, with no
//! interpretation of the contents. Individual malformed lines inside a
//! block are not rejected here — only the header and the overall line
//! count are validated, per the error design in [`crate::error`].

use std::fs;
use std::path::Path;

use crate::error::AagError;
use crate::record::{AagRecord, Header};

/// Parse an AAG file already read into memory.
///
/// The first non-empty line must start with `aag ` and carry at least 6
/// whitespace-separated fields (`aag M I L O A`). The following
/// `I + L + O + A` lines are split into their respective blocks; whatever
/// remains up to (but not including) the first line starting with `c` is
/// the symbol block, and the rest (that `c` line included) is comments.
pub fn parse_aag(text: &str) -> Result<AagRecord, AagError> {
    let lines: Vec<&str> = text.lines().collect();

    let Some(header_pos) = lines.iter().position(|l| !l.is_empty()) else {
        return Err(AagError::MalformedHeader(String::new()));
    };
    let header_line = lines[header_pos];
    if !header_line.starts_with("aag ") {
        return Err(AagError::MalformedHeader(header_line.to_string()));
    }
    let fields: Vec<&str> = header_line.split_whitespace().collect();
    if fields.len() < 6 {
        return Err(AagError::MalformedHeader(header_line.to_string()));
    }
    let counts: Option<Vec<usize>> = fields[1..6].iter().map(|f| f.parse().ok()).collect();
    let Some(counts) = counts else {
        return Err(AagError::MalformedHeader(header_line.to_string()));
    };
    let header = Header {
        m: counts[0],
        i: counts[1],
        l: counts[2],
        o: counts[3],
        a: counts[4],
    };

    let mut idx = header_pos + 1;

    let in_lits = take_block(&lines, &mut idx, header.i, "input")?;
    let latches = take_block(&lines, &mut idx, header.l, "latch")?;
    let outputs = take_block(&lines, &mut idx, header.o, "output")?;
    let and_gates = take_block(&lines, &mut idx, header.a, "and")?;

    let mut symbols = Vec::new();
    while idx < lines.len() && !lines[idx].starts_with('c') {
        symbols.push(lines[idx].to_string());
        idx += 1;
    }
    let comments = lines[idx..].iter().map(|l| l.to_string()).collect();

    Ok(AagRecord {
        header,
        in_lits,
        latches,
        outputs,
        and_gates,
        symbols,
        comments,
    })
}

fn take_block(
    lines: &[&str],
    idx: &mut usize,
    count: usize,
    block: &'static str,
) -> Result<Vec<String>, AagError> {
    if *idx + count > lines.len() {
        return Err(AagError::TruncatedBlock {
            block,
            expected: count,
            found: lines.len().saturating_sub(*idx),
        });
    }
    let block_lines = lines[*idx..*idx + count]
        .iter()
        .map(|l| l.to_string())
        .collect();
    *idx += count;
    Ok(block_lines)
}

/// Copy a file byte-for-byte, used for the `I = 0` passthrough case.
pub fn copy_file(src: &Path, dst: &Path) {
    fs::copy(src, dst).unwrap_or_else(|e| {
        panic!(
            "could not copy {} to {}: {e}",
            src.display(),
            dst.display()
        )
    });
}
