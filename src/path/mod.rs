//! Path language addressing nested locations inside a value tree.
//!
//! Textual form: `name ( '.' name | '[]' )*`. `[]` selects every element
//! of an array (an optional decimal index pins a single one). The `"."`
//! sentinel (or an empty string) addresses the current element itself.

pub mod walk;

use crate::value::Value;
use smallvec::SmallVec;
use std::fmt;
use thiserror::Error;

pub use walk::{Found, Parent, WalkContext};

/// Sentinel path addressing the element under validation itself.
pub const CURRENT_ELEMENT: &str = ".";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Step {
    /// Descend into an object by key.
    Object { name: String },
    /// Iterate an array; `index` pins a single element, `None` means all.
    Array { index: Option<usize> },
    /// Terminal step: the addressed value.
    Element,
}

/// SmallVec for path steps - avoids heap allocation for common cases (<= 6 steps)
pub type StepVec = SmallVec<[Step; 6]>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PathError {
    #[error("empty segment in path {0:?}")]
    EmptySegment(String),
    #[error("unbalanced brackets in path {0:?}")]
    UnbalancedBrackets(String),
    #[error("illegal bracket content {content:?} in path {path:?}")]
    IllegalIndex { path: String, content: String },
    #[error("trailing dot in path {0:?}")]
    TrailingDot(String),
    #[error("unexpected character after bracket in path {0:?}")]
    DanglingBracket(String),
}

/// A parsed chain of steps. The final step is always [`Step::Element`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Path {
    steps: StepVec,
}

impl Path {
    /// Parse the textual form.
    pub fn parse(input: &str) -> Result<Self, PathError> {
        let mut steps = StepVec::new();
        if input.is_empty() || input == CURRENT_ELEMENT {
            steps.push(Step::Element);
            return Ok(Self { steps });
        }

        let bytes = input.as_bytes();
        let mut i = 0;
        let mut expect_name = true;
        while i < bytes.len() {
            match bytes[i] {
                b'.' => {
                    if expect_name {
                        return Err(PathError::EmptySegment(input.to_string()));
                    }
                    expect_name = true;
                    i += 1;
                    if i == bytes.len() {
                        return Err(PathError::TrailingDot(input.to_string()));
                    }
                }
                b'[' => {
                    if expect_name && !steps.is_empty() {
                        return Err(PathError::EmptySegment(input.to_string()));
                    }
                    let close = input[i..]
                        .find(']')
                        .map(|off| i + off)
                        .ok_or_else(|| PathError::UnbalancedBrackets(input.to_string()))?;
                    let content = &input[i + 1..close];
                    let index = if content.is_empty() {
                        None
                    } else {
                        Some(content.parse::<usize>().map_err(|_| {
                            PathError::IllegalIndex {
                                path: input.to_string(),
                                content: content.to_string(),
                            }
                        })?)
                    };
                    steps.push(Step::Array { index });
                    expect_name = false;
                    i = close + 1;
                    if i < bytes.len() && bytes[i] != b'.' && bytes[i] != b'[' {
                        return Err(PathError::DanglingBracket(input.to_string()));
                    }
                }
                b']' => return Err(PathError::UnbalancedBrackets(input.to_string())),
                _ => {
                    let rest = &input[i..];
                    let end = rest
                        .find(|c| c == '.' || c == '[' || c == ']')
                        .unwrap_or(rest.len());
                    steps.push(Step::Object {
                        name: rest[..end].to_string(),
                    });
                    expect_name = false;
                    i += end;
                }
            }
        }
        steps.push(Step::Element);
        Ok(Self { steps })
    }

    pub(crate) fn from_steps(steps: StepVec) -> Self {
        Self { steps }
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Number of steps, terminal included.
    pub fn depth(&self) -> usize {
        self.steps.len()
    }

    /// The terminal step.
    pub fn tail(&self) -> &Step {
        self.steps.last().expect("path is never empty")
    }

    /// The last non-terminal step, if any.
    pub fn last_parent(&self) -> Option<&Step> {
        let len = self.steps.len();
        if len < 2 {
            None
        } else {
            Some(&self.steps[len - 2])
        }
    }

    /// The suffix remaining after dropping `depth` leading steps. The
    /// terminal element is always retained.
    pub fn truncate(&self, depth: usize) -> Path {
        let keep = depth.min(self.steps.len() - 1);
        Self {
            steps: self.steps[keep..].iter().cloned().collect(),
        }
    }

    /// The first `depth` steps, closed with a terminal element. Used to
    /// locate the root of a composed rule set from a resolved hit path.
    pub fn prefix(&self, depth: usize) -> Path {
        let keep = depth.min(self.steps.len() - 1);
        let mut steps: StepVec = self.steps[..keep].iter().cloned().collect();
        steps.push(Step::Element);
        Self { steps }
    }

    /// True for a bare `name` path: a single object key at the root.
    pub fn is_simple_name(&self) -> bool {
        self.steps.len() == 2 && matches!(self.steps[0], Step::Object { .. })
    }

    /// True when the addressed location is an array element (the step
    /// before the terminal is an array step).
    pub fn targets_array_elements(&self) -> bool {
        matches!(self.last_parent(), Some(Step::Array { .. }))
    }

    /// For a `p[]`-shaped path, the path of the enclosing array `p`.
    pub fn parent_array(&self) -> Option<Path> {
        if !self.targets_array_elements() {
            return None;
        }
        let mut steps: StepVec = self.steps[..self.steps.len() - 2].iter().cloned().collect();
        steps.push(Step::Element);
        Some(Self { steps })
    }

    /// Last named step, used as the field display name.
    pub fn last_name(&self) -> Option<&str> {
        self.steps.iter().rev().find_map(|step| match step {
            Step::Object { name } => Some(name.as_str()),
            _ => None,
        })
    }

    /// Clone this path, retag its terminal as an array step carrying
    /// `index`, and close with a new terminal. Turns the resolved path of
    /// an array hit into the error path of one of its elements.
    pub fn child_element(&self, index: Option<usize>) -> Path {
        let mut steps: StepVec = self.steps[..self.steps.len() - 1].iter().cloned().collect();
        steps.push(Step::Array { index });
        steps.push(Step::Element);
        Self { steps }
    }

    /// Follow a fully-resolved path (no `index: None` array steps) to the
    /// addressed value.
    pub fn resolve<'a>(&self, root: &'a Value) -> Option<&'a Value> {
        let mut current = root;
        for step in &self.steps {
            match step {
                Step::Object { name } => current = current.as_object()?.get(name)?,
                Step::Array { index } => current = current.as_array()?.get((*index)?)?,
                Step::Element => return Some(current),
            }
        }
        Some(current)
    }

    /// Replace the addressed value. Returns false when the parent does not
    /// exist or has the wrong shape; intermediate containers are never
    /// created.
    pub fn set_in(&self, root: &mut Value, new: Value) -> bool {
        let len = self.steps.len();
        if len == 1 {
            *root = new;
            return true;
        }
        let Some(parent) = navigate_mut(root, &self.steps[..len - 2]) else {
            return false;
        };
        match &self.steps[len - 2] {
            Step::Object { name } => match parent.as_object_mut() {
                Some(map) => {
                    map.insert(name.clone(), new);
                    true
                }
                None => false,
            },
            Step::Array { index: Some(i) } => match parent.as_array_mut() {
                Some(items) if *i < items.len() => {
                    items[*i] = new;
                    true
                }
                _ => false,
            },
            _ => false,
        }
    }

    /// Remove the addressed key from its object parent. No-op for array
    /// elements and the root.
    pub fn remove_from(&self, root: &mut Value) -> bool {
        let len = self.steps.len();
        if len < 2 {
            return false;
        }
        let Some(parent) = navigate_mut(root, &self.steps[..len - 2]) else {
            return false;
        };
        match (&self.steps[len - 2], parent.as_object_mut()) {
            (Step::Object { name }, Some(map)) => map.shift_remove(name).is_some(),
            _ => false,
        }
    }
}

fn navigate_mut<'a>(root: &'a mut Value, steps: &[Step]) -> Option<&'a mut Value> {
    let mut current = root;
    for step in steps {
        match step {
            Step::Object { name } => current = current.as_object_mut()?.get_mut(name)?,
            Step::Array { index } => current = current.as_array_mut()?.get_mut((*index)?)?,
            Step::Element => return Some(current),
        }
    }
    Some(current)
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.steps.len() == 1 {
            return write!(f, "{CURRENT_ELEMENT}");
        }
        let mut first = true;
        for step in &self.steps {
            match step {
                Step::Object { name } => {
                    if !first {
                        write!(f, ".")?;
                    }
                    write!(f, "{name}")?;
                    first = false;
                }
                Step::Array { index: Some(i) } => {
                    write!(f, "[{i}]")?;
                    first = false;
                }
                Step::Array { index: None } => {
                    write!(f, "[]")?;
                    first = false;
                }
                Step::Element => {}
            }
        }
        Ok(())
    }
}

/// Textual prefix joining used by rule-set composition.
pub fn join(prefix: &str, child: &str) -> String {
    if child == CURRENT_ELEMENT || child.is_empty() {
        return prefix.to_string();
    }
    if prefix.is_empty() || prefix == CURRENT_ELEMENT {
        return child.to_string();
    }
    if child.starts_with('[') {
        format!("{prefix}{child}")
    } else {
        format!("{prefix}.{child}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_nested() {
        let path = Path::parse("a.b[].c").unwrap();
        assert_eq!(
            path.steps(),
            &[
                Step::Object { name: "a".into() },
                Step::Object { name: "b".into() },
                Step::Array { index: None },
                Step::Object { name: "c".into() },
                Step::Element,
            ]
        );
        assert_eq!(path.depth(), 5);
        assert_eq!(path.to_string(), "a.b[].c");
    }

    #[test]
    fn test_parse_current_element() {
        let path = Path::parse(".").unwrap();
        assert_eq!(path.steps(), &[Step::Element]);
        assert_eq!(Path::parse("").unwrap(), path);
    }

    #[test]
    fn test_parse_fixed_index() {
        let path = Path::parse("xs[2]").unwrap();
        assert_eq!(
            path.steps(),
            &[
                Step::Object { name: "xs".into() },
                Step::Array { index: Some(2) },
                Step::Element,
            ]
        );
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(matches!(
            Path::parse("a."),
            Err(PathError::TrailingDot(_))
        ));
        assert!(matches!(
            Path::parse("a..b"),
            Err(PathError::EmptySegment(_))
        ));
        assert!(matches!(
            Path::parse("a["),
            Err(PathError::UnbalancedBrackets(_))
        ));
        assert!(matches!(
            Path::parse("a]"),
            Err(PathError::UnbalancedBrackets(_))
        ));
        assert!(matches!(
            Path::parse("a[x]"),
            Err(PathError::IllegalIndex { .. })
        ));
        assert!(matches!(
            Path::parse("a[]b"),
            Err(PathError::DanglingBracket(_))
        ));
    }

    #[test]
    fn test_truncate_and_prefix() {
        let path = Path::parse("a.b[].c").unwrap();
        assert_eq!(path.truncate(2).to_string(), "[].c");
        assert_eq!(path.prefix(1).to_string(), "a");
        assert_eq!(path.prefix(0).to_string(), ".");
    }

    #[test]
    fn test_parent_array() {
        let path = Path::parse("a.b[]").unwrap();
        assert_eq!(path.parent_array().unwrap().to_string(), "a.b");
        assert!(Path::parse("a.b").unwrap().parent_array().is_none());
    }

    #[test]
    fn test_child_element() {
        let parent = Path::parse("items").unwrap();
        assert_eq!(parent.child_element(Some(1)).to_string(), "items[1]");
        assert_eq!(parent.child_element(None).to_string(), "items[]");
    }

    #[test]
    fn test_join() {
        assert_eq!(join("items", "qty"), "items.qty");
        assert_eq!(join("items", "[]"), "items[]");
        assert_eq!(join("", "qty"), "qty");
        assert_eq!(join("items[]", "qty"), "items[].qty");
        assert_eq!(join("items", "."), "items");
    }
}
