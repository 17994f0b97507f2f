//! Declarative rule sets and their compiled form.
//!
//! A [`RuleSet`] is an ordered list of `{path, validators-or-nested-set}`
//! entries. [`RuleSet::check`] compiles it into [`Rules`]: ordered
//! [`Field`] records with parsed paths, lifted array-element chains and a
//! cross-field-aware ordering. Compiled rules are immutable and safe to
//! share across validation runs.

mod compile;
mod topo;

use crate::engine::context::Context;
use crate::path::{Path, PathError, Step};
use crate::rules::{List, Marker, Rule};
use thiserror::Error;

/// Programmer error detected while compiling a rule set. These fail fast:
/// the rule set cannot be used.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error(transparent)]
    Path(#[from] PathError),
    #[error("duplicate path {0:?}")]
    DuplicatePath(String),
    #[error("no parent array field for {0:?}")]
    MissingParentArray(String),
    #[error("invalid parameter for rule {rule:?}: {reason}")]
    InvalidParameter {
        rule: &'static str,
        reason: String,
    },
}

/// Entry value of a rule set: either a validator list or a nested rule
/// set composed under the entry's path.
pub enum FieldRules {
    List(List),
    Compose(RuleSet),
}

/// User-facing, order-preserving rule collection.
#[derive(Default)]
pub struct RuleSet {
    entries: Vec<(String, FieldRules)>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a validator list to `path`.
    pub fn field(mut self, path: impl Into<String>, rules: List) -> Self {
        self.entries.push((path.into(), FieldRules::List(rules)));
        self
    }

    /// Compose another rule set under `path`. Contained paths are
    /// prefixed and their cross-field references resolve relative to
    /// `path`.
    pub fn compose(mut self, path: impl Into<String>, nested: RuleSet) -> Self {
        self.entries.push((path.into(), FieldRules::Compose(nested)));
        self
    }

    pub(crate) fn into_entries(self) -> Vec<(String, FieldRules)> {
        self.entries
    }

    /// Compile into ordered [`Rules`]. Fails fast on malformed paths,
    /// duplicate paths and invalid rule parameters.
    pub fn check(self) -> Result<Rules, CompileError> {
        compile::compile(self)
    }
}

/// How a field's requirement is decided.
enum Required {
    No,
    /// Index of the Required-family validator carrying the predicate.
    At(usize),
}

/// A compiled field: parsed path, ordered validators, optional element
/// chain and flags cached from the validator list.
pub struct Field {
    path: Path,
    walk_path: Path,
    validators: List,
    elements: Option<Box<Field>>,
    is_array: bool,
    is_object: bool,
    is_nullable: bool,
    required: Required,
    prefix_depth: usize,
}

impl Field {
    pub(crate) fn new(path: Path, validators: List, prefix_depth: usize) -> Self {
        let mut is_array = false;
        let mut is_object = false;
        let mut is_nullable = false;
        let mut required = Required::No;
        for (i, validator) in validators.iter().enumerate() {
            match validator.marker() {
                Some(Marker::Array) => is_array = true,
                Some(Marker::Object) => is_object = true,
                Some(Marker::Nullable) => is_nullable = true,
                Some(Marker::Required) => {
                    if matches!(required, Required::No) {
                        required = Required::At(i);
                    }
                }
                None => {}
            }
        }
        Self {
            walk_path: path.clone(),
            path,
            validators,
            elements: None,
            is_array,
            is_object,
            is_nullable,
            required,
            prefix_depth,
        }
    }

    /// Absolute path of the field inside the rule set.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path walked against the field's scope. Identical to [`Self::path`]
    /// except for lifted element fields, which walk `[]` relative to
    /// their parent array value.
    pub fn walk_path(&self) -> &Path {
        &self.walk_path
    }

    pub fn validators(&self) -> &List {
        &self.validators
    }

    /// Rules applying to the elements of this array field.
    pub fn elements(&self) -> Option<&Field> {
        self.elements.as_deref()
    }

    pub fn is_array(&self) -> bool {
        self.is_array
    }

    pub fn is_object(&self) -> bool {
        self.is_object
    }

    pub fn is_nullable(&self) -> bool {
        self.is_nullable
    }

    /// Path steps contributed by an enclosing composition.
    pub fn prefix_depth(&self) -> usize {
        self.prefix_depth
    }

    /// Evaluate the required predicate for a walker hit.
    pub fn is_required(&self, ctx: &Context) -> bool {
        match self.required {
            Required::No => false,
            Required::At(i) => self.validators[i].required_when(ctx),
        }
    }

    /// Raw field name used for `:field` message expansion.
    pub fn name(&self) -> &str {
        self.path.last_name().unwrap_or("element")
    }

    /// Message-key suffix of the declared type, from the first type rule.
    pub fn declared_type(&self) -> Option<&'static str> {
        self.validators
            .iter()
            .find(|v| v.is_type())
            .and_then(|v| v.expected_type())
    }

    /// True when the field addresses array elements, adding the `.array`
    /// message-key suffix.
    pub fn targets_array_elements(&self) -> bool {
        matches!(self.path.last_parent(), Some(Step::Array { .. }))
    }

    pub(crate) fn set_elements(&mut self, elements: Field) {
        self.elements = Some(Box::new(elements));
    }

    pub(crate) fn rebase_walk_path(&mut self, walk_path: Path) {
        self.walk_path = walk_path;
    }

    /// Referenced paths of every validator, elements chain included.
    pub(crate) fn referenced_fields(&self) -> Vec<String> {
        let mut refs: Vec<String> = self
            .validators
            .iter()
            .flat_map(|v| v.referenced_fields())
            .collect();
        if let Some(elements) = &self.elements {
            refs.extend(elements.referenced_fields());
        }
        refs
    }

    fn check_validators(&self) -> Result<(), CompileError> {
        for validator in &self.validators {
            validator.check()?;
        }
        if let Some(elements) = &self.elements {
            elements.check_validators()?;
        }
        Ok(())
    }
}

/// Compiled, ordered field sequence. Reusable and immutable.
pub struct Rules {
    fields: Vec<Field>,
}

impl Rules {
    pub(crate) fn from_fields(fields: Vec<Field>) -> Result<Self, CompileError> {
        let rules = Self { fields };
        for field in &rules.fields {
            field.check_validators()?;
        }
        Ok(rules)
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Compiling compiled rules is a no-op.
    pub fn check(self) -> Self {
        self
    }
}
