//! RuleSet → Rules compilation: flattening with prefix joining, synthetic
//! array parents, duplicate rejection, element lifting and cross-field
//! ordering.

use super::topo;
use super::{CompileError, Field, FieldRules, RuleSet, Rules};
use crate::path::{self, Path, Step, StepVec};
use crate::rules::{array, List};
use std::collections::HashSet;

struct FlatEntry {
    path: String,
    validators: List,
    prefix_depth: usize,
}

pub(super) fn compile(ruleset: RuleSet) -> Result<Rules, CompileError> {
    let mut flat = Vec::new();
    flatten(ruleset, "", 0, &mut flat)?;
    synthesize_parents(&mut flat);

    let mut fields = Vec::with_capacity(flat.len());
    let mut seen: HashSet<String> = HashSet::with_capacity(flat.len());
    for entry in flat {
        let parsed = Path::parse(&entry.path)?;
        if !seen.insert(parsed.to_string()) {
            return Err(CompileError::DuplicatePath(parsed.to_string()));
        }
        fields.push(Field::new(parsed, entry.validators, entry.prefix_depth));
    }

    lift_elements(&mut fields)?;

    let order = topo::order(&fields);
    let mut slots: Vec<Option<Field>> = fields.into_iter().map(Some).collect();
    let ordered = order
        .into_iter()
        .map(|i| slots[i].take().expect("order is a permutation"))
        .collect();

    Rules::from_fields(ordered)
}

/// Depth-first flattening preserving declaration order. Composition
/// prefixes are joined textually and recorded as the contained fields'
/// prefix depth.
fn flatten(
    set: RuleSet,
    prefix: &str,
    prefix_depth: usize,
    out: &mut Vec<FlatEntry>,
) -> Result<(), CompileError> {
    for (raw_path, rules) in set.into_entries() {
        let joined = path::join(prefix, &raw_path);
        match rules {
            FieldRules::List(validators) => out.push(FlatEntry {
                path: joined,
                validators,
                prefix_depth,
            }),
            FieldRules::Compose(nested) => {
                let depth = Path::parse(&joined)?.depth() - 1;
                flatten(nested, &joined, depth, out)?;
            }
        }
    }
    Ok(())
}

/// Every path addressing array elements needs a field for the array
/// itself; missing parents get a bare `array()` entry right after the
/// child, iteratively for multi-dimensional paths.
fn synthesize_parents(entries: &mut Vec<FlatEntry>) {
    let mut i = 0;
    while i < entries.len() {
        if let Some(parent) = parent_array_text(&entries[i].path) {
            if !parent.is_empty() && !entries.iter().any(|e| e.path == parent) {
                let prefix_depth = entries[i].prefix_depth;
                entries.insert(
                    i + 1,
                    FlatEntry {
                        path: parent,
                        validators: vec![array()],
                        prefix_depth,
                    },
                );
            }
        }
        i += 1;
    }
}

fn parent_array_text(path: &str) -> Option<String> {
    if !path.ends_with(']') {
        return None;
    }
    path.rfind('[').map(|open| path[..open].to_string())
}

/// Move every `p[]`-shaped field into the `elements` slot of its parent
/// array field, deepest first so chains nest correctly. The lifted walk
/// path becomes the trailing array step relative to the parent value.
fn lift_elements(fields: &mut Vec<Field>) -> Result<(), CompileError> {
    loop {
        let candidate = fields
            .iter()
            .enumerate()
            .filter(|(_, f)| f.path().targets_array_elements())
            .max_by_key(|(_, f)| f.path().depth())
            .map(|(i, _)| i);
        let Some(index) = candidate else {
            break;
        };

        let mut field = fields.remove(index);
        let parent_path = field
            .path()
            .parent_array()
            .expect("candidate targets array elements")
            .to_string();

        let steps = field.path().steps();
        let mut walk_steps = StepVec::new();
        walk_steps.push(steps[steps.len() - 2].clone());
        walk_steps.push(Step::Element);
        field.rebase_walk_path(Path::from_steps(walk_steps));

        let parent = fields
            .iter_mut()
            .find(|f| f.path().to_string() == parent_path)
            .ok_or_else(|| CompileError::MissingParentArray(field.path().to_string()))?;
        parent.set_elements(field);
    }
    Ok(())
}
