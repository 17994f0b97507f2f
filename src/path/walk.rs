//! Tree walking: visit every location a path addresses inside a value.

use super::{Path, Step, StepVec};
use crate::value::Value;

/// Whether the walker reached the addressed location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Found {
    /// The location exists.
    Found,
    /// An intermediate container is missing or has the wrong shape.
    ParentNotFound,
    /// Every parent exists but the terminal element does not.
    ElementNotFound,
}

/// Kind of the container holding the visited value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parent {
    /// The visited value is the walk root itself.
    Root,
    Object,
    Array,
}

/// One walker hit. `path` is fully resolved: array steps crossed during
/// the walk carry their concrete index, while unreachable array levels
/// keep `index: None` (surfacing as the `-1` error slot).
#[derive(Debug, Clone)]
pub struct WalkContext<'a> {
    pub value: Option<&'a Value>,
    pub path: Path,
    pub found: Found,
    /// Object key of the visited value, when its parent is an object.
    pub name: Option<String>,
    /// Index of the visited value, when its parent is an array.
    pub index: Option<usize>,
    pub parent: Parent,
    stop: bool,
}

impl WalkContext<'_> {
    /// Abort the walk after this visit.
    pub fn stop(&mut self) {
        self.stop = true;
    }
}

impl Path {
    /// Invoke `visit` for every leaf location this path matches in `root`.
    /// Missing locations produce exactly one visit carrying the completed
    /// path and a not-found status. Arrays are visited in ascending order.
    pub fn walk<'a, F>(&self, root: &'a Value, visit: &mut F)
    where
        F: FnMut(&mut WalkContext<'a>),
    {
        let mut resolved = StepVec::new();
        walk_steps(self.steps(), Some(root), &mut resolved, Parent::Root, visit);
    }

    /// The first matched value, if any location exists.
    pub fn first<'a>(&self, root: &'a Value) -> Option<&'a Value> {
        let mut hit: Option<&'a Value> = None;
        self.walk(root, &mut |ctx| {
            if ctx.found == Found::Found {
                hit = ctx.value;
                ctx.stop();
            }
        });
        hit
    }
}

/// Returns false when the walk was stopped by the visitor.
fn walk_steps<'a, F>(
    steps: &[Step],
    current: Option<&'a Value>,
    resolved: &mut StepVec,
    parent: Parent,
    visit: &mut F,
) -> bool
where
    F: FnMut(&mut WalkContext<'a>),
{
    match &steps[0] {
        Step::Element => {
            resolved.push(Step::Element);
            let path = Path::from_steps(resolved.clone());
            resolved.pop();
            emit(path, current, Found::Found, parent, visit)
        }
        Step::Object { name } => {
            let child = current.and_then(Value::as_object).and_then(|map| map.get(name));
            match child {
                Some(value) => {
                    resolved.push(Step::Object { name: name.clone() });
                    let keep_going =
                        walk_steps(&steps[1..], Some(value), resolved, Parent::Object, visit);
                    resolved.pop();
                    keep_going
                }
                None => {
                    let found = match current.and_then(Value::as_object) {
                        Some(_) if terminal_only(&steps[1..]) => Found::ElementNotFound,
                        _ => Found::ParentNotFound,
                    };
                    miss(steps, resolved, found, Parent::Object, visit)
                }
            }
        }
        Step::Array { index } => match current.and_then(Value::as_array) {
            Some(items) => match index {
                Some(i) => match items.get(*i) {
                    Some(value) => {
                        resolved.push(Step::Array { index: Some(*i) });
                        let keep_going =
                            walk_steps(&steps[1..], Some(value), resolved, Parent::Array, visit);
                        resolved.pop();
                        keep_going
                    }
                    None => {
                        let found = if terminal_only(&steps[1..]) {
                            Found::ElementNotFound
                        } else {
                            Found::ParentNotFound
                        };
                        miss(steps, resolved, found, Parent::Array, visit)
                    }
                },
                None => {
                    for (i, item) in items.iter().enumerate() {
                        resolved.push(Step::Array { index: Some(i) });
                        let keep_going =
                            walk_steps(&steps[1..], Some(item), resolved, Parent::Array, visit);
                        resolved.pop();
                        if !keep_going {
                            return false;
                        }
                    }
                    true
                }
            },
            None => {
                let found = if terminal_only(&steps[1..]) {
                    Found::ElementNotFound
                } else {
                    Found::ParentNotFound
                };
                miss(steps, resolved, found, Parent::Array, visit)
            }
        },
    }
}

fn terminal_only(rest: &[Step]) -> bool {
    matches!(rest, [Step::Element])
}

/// Complete the resolved path with the unreachable remainder and emit a
/// single nil visit.
fn miss<'a, F>(
    remaining: &[Step],
    resolved: &mut StepVec,
    found: Found,
    parent: Parent,
    visit: &mut F,
) -> bool
where
    F: FnMut(&mut WalkContext<'a>),
{
    let mut steps = resolved.clone();
    steps.extend(remaining.iter().cloned());
    emit(Path::from_steps(steps), None, found, parent, visit)
}

fn emit<'a, F>(
    path: Path,
    value: Option<&'a Value>,
    found: Found,
    parent: Parent,
    visit: &mut F,
) -> bool
where
    F: FnMut(&mut WalkContext<'a>),
{
    let (name, index) = terminal_identity(&path);
    let mut ctx = WalkContext {
        value,
        path,
        found,
        name,
        index,
        parent,
        stop: false,
    };
    visit(&mut ctx);
    !ctx.stop
}

fn terminal_identity(path: &Path) -> (Option<String>, Option<usize>) {
    match path.last_parent() {
        Some(Step::Object { name }) => (Some(name.clone()), None),
        Some(Step::Array { index }) => (None, *index),
        _ => (None, None),
    }
}
