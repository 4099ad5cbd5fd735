//! Rewrite a GPR string to exclude genes carrying an identifier prefix
//!
//! Used for multi-species models (e.g. a mouse/human hybrid mitochondrial
//! model) where one species' genes must not participate in evaluation.

use std::collections::HashSet;

fn is_connective(token: &str) -> bool {
    matches!(token, "and" | "AND" | "or" | "OR")
}

/// Remove every gene token containing `prefix`, each with one adjacent connective
///
/// The string is split on whitespace and scanned right to left. A matched
/// token is marked for removal together with exactly one neighboring
/// connective: the preceding one when present and not already marked,
/// otherwise the following one. Marks are kept in a set so adjacent matches
/// never double-remove, and any connective left dangling at either end is
/// dropped. The result is rejoined with single spaces; filtering a prefix
/// that matches nothing is an identity transform (modulo whitespace), and the
/// operation is idempotent.
///
/// # Examples
/// ```rust
/// use eflux_core::eflux::strip_gene_prefix;
/// assert_eq!(strip_gene_prefix("g1 and ENSMUSG001 or g3", "ENSMUS"), "g1 or g3");
/// assert_eq!(strip_gene_prefix("g1 and g2", "ENSMUS"), "g1 and g2");
/// ```
pub fn strip_gene_prefix(gpr: &str, prefix: &str) -> String {
    let tokens: Vec<&str> = gpr.split_whitespace().collect();
    let mut removed: HashSet<usize> = HashSet::new();

    for index in (0..tokens.len()).rev() {
        if !tokens[index].contains(prefix) {
            continue;
        }
        removed.insert(index);
        if index > 0 && is_connective(tokens[index - 1]) && !removed.contains(&(index - 1)) {
            removed.insert(index - 1);
        } else if index + 1 < tokens.len()
            && is_connective(tokens[index + 1])
            && !removed.contains(&(index + 1))
        {
            removed.insert(index + 1);
        }
    }

    let mut kept: Vec<&str> = tokens
        .iter()
        .enumerate()
        .filter(|(index, _)| !removed.contains(index))
        .map(|(_, token)| *token)
        .collect();

    // Cascading removals can strand a connective at a boundary
    while kept.first().is_some_and(|token| is_connective(token)) {
        kept.remove(0);
    }
    while kept.last().is_some_and(|token| is_connective(token)) {
        kept.pop();
    }

    kept.join(" ")
}
