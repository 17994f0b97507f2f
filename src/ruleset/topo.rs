//! Stable topological pre-ordering of fields referenced by cross-field
//! comparators, so referenced values are converted before the referrer
//! compares against them. Cycles are tolerated: relative order is left as
//! declared and the visit never loops.

use super::Field;
use crate::path;
use indexmap::IndexSet;

pub(super) fn order(fields: &[Field]) -> Vec<usize> {
    let paths: Vec<String> = fields.iter().map(|f| f.path().to_string()).collect();

    let mut deps: Vec<Vec<usize>> = vec![Vec::new(); fields.len()];
    for (i, field) in fields.iter().enumerate() {
        let prefix = field.path().prefix(field.prefix_depth()).to_string();
        for reference in field.referenced_fields() {
            let absolute = path::join(&prefix, &reference);
            if let Some(j) = containing_field(&paths, &absolute) {
                if j != i && !deps[i].contains(&j) {
                    deps[i].push(j);
                }
            }
        }
    }

    let mut visited: IndexSet<usize> = IndexSet::with_capacity(fields.len());
    let mut visiting: IndexSet<usize> = IndexSet::new();
    for i in 0..fields.len() {
        visit(i, &deps, &mut visited, &mut visiting);
    }
    visited.into_iter().collect()
}

fn visit(
    node: usize,
    deps: &[Vec<usize>],
    visited: &mut IndexSet<usize>,
    visiting: &mut IndexSet<usize>,
) {
    // Cycle: leave relative order as declared.
    if visiting.contains(&node) || visited.contains(&node) {
        return;
    }
    visiting.insert(node);
    for &dep in &deps[node] {
        visit(dep, deps, visited, visiting);
    }
    visiting.swap_remove(&node);
    visited.insert(node);
}

/// Resolve a referenced path to the top-level field containing it,
/// stripping trailing segments until one matches. References to plain
/// data paths with no rules are ignored.
fn containing_field(paths: &[String], reference: &str) -> Option<usize> {
    let mut candidate = reference.to_string();
    loop {
        if let Some(found) = paths.iter().position(|p| *p == candidate) {
            return Some(found);
        }
        candidate = strip_last_segment(&candidate)?;
    }
}

fn strip_last_segment(path: &str) -> Option<String> {
    if let Some(stripped) = path.strip_suffix("[]") {
        return Some(stripped.to_string());
    }
    if path.ends_with(']') {
        if let Some(open) = path.rfind('[') {
            return Some(path[..open].to_string());
        }
    }
    path.rfind('.').map(|dot| path[..dot].to_string())
}
