//! Validation driver: walks every compiled field over the input tree,
//! runs the per-location rule loop and accumulates the mirrored error
//! tree. The run is synchronous and owns the input for its duration.

pub mod context;

use crate::errors::Errors;
use crate::lang::placeholders::{self, ExpandContext};
use crate::lang::Language;
use crate::path::{Found, Parent, Path, Step, StepVec};
use crate::rules::database::Database;
use crate::rules::{Marker, Rule};
use crate::ruleset::{Field, Rules};
use crate::value::Value;
use ahash::AHashMap;
use chrono::{DateTime, Utc};

pub use context::{Context, RuleError};

static NULL: Value = Value::Null;

/// Inputs of one validation run.
pub struct Options<'a> {
    /// The input tree. Mutated in place: normalized values are written
    /// back, non-nullable nil keys are dropped.
    pub data: &'a mut Value,
    pub rules: &'a Rules,
    pub language: &'a Language,
    /// Wrap single values into one-element arrays for top-level
    /// array-typed fields.
    pub convert_single_value_arrays: bool,
    /// Timestamp override. Defaults to the wall clock, captured once.
    pub now: Option<DateTime<Utc>>,
    /// Opaque state handed to every rule context.
    pub extra: AHashMap<String, Value>,
    pub database: Option<&'a dyn Database>,
    pub config: Option<&'a Value>,
}

impl<'a> Options<'a> {
    pub fn new(data: &'a mut Value, rules: &'a Rules, language: &'a Language) -> Self {
        Self {
            data,
            rules,
            language,
            convert_single_value_arrays: false,
            now: None,
            extra: AHashMap::new(),
            database: None,
            config: None,
        }
    }
}

/// Validate `options.data` against the compiled rules.
///
/// Returns `Ok(None)` when the input conforms, `Ok(Some(tree))` with the
/// mirrored error tree on validation failure, and `Err(op_errors)` when a
/// rule reported operational errors (the outcome is indeterminate and no
/// error tree is returned).
pub fn validate(options: Options<'_>) -> Result<Option<Errors>, Vec<RuleError>> {
    let now = options.now.unwrap_or_else(Utc::now);
    let mut runner = Runner {
        data: std::mem::replace(options.data, Value::Null),
        language: options.language,
        convert_single_value_arrays: options.convert_single_value_arrays,
        now,
        extra: &options.extra,
        database: options.database,
        config: options.config,
        errors: Errors::new(),
        op_errors: Vec::new(),
    };

    let root = current_element_path();
    for field in options.rules.fields() {
        runner.walk_field(field, &root, None);
    }

    *options.data = runner.data;
    if !runner.op_errors.is_empty() {
        return Err(runner.op_errors);
    }
    if runner.errors.is_empty() {
        Ok(None)
    } else {
        Ok(Some(runner.errors))
    }
}

fn current_element_path() -> Path {
    let mut steps = StepVec::new();
    steps.push(Step::Element);
    Path::from_steps(steps)
}

struct Runner<'a> {
    data: Value,
    language: &'a Language,
    convert_single_value_arrays: bool,
    now: DateTime<Utc>,
    extra: &'a AHashMap<String, Value>,
    database: Option<&'a dyn Database>,
    config: Option<&'a Value>,
    errors: Errors,
    op_errors: Vec<RuleError>,
}

struct Hit {
    path: Path,
    found: Found,
    name: Option<String>,
    index: Option<usize>,
    parent: Parent,
}

impl Runner<'_> {
    /// Walk one field against the scope at `scope_path` (the input root
    /// for top-level fields, the enclosing array for lifted elements).
    fn walk_field(&mut self, field: &Field, scope_path: &Path, parent_err_path: Option<&Path>) {
        let scope = scope_path.resolve(&self.data).cloned().unwrap_or(Value::Null);
        let mut hits: Vec<Hit> = Vec::new();
        field.walk_path().walk(&scope, &mut |ctx| {
            hits.push(Hit {
                path: ctx.path.clone(),
                found: ctx.found,
                name: ctx.name.clone(),
                index: ctx.index,
                parent: ctx.parent,
            });
        });

        for hit in hits {
            self.process_hit(field, scope_path, &hit, parent_err_path);
        }
    }

    fn process_hit(
        &mut self,
        field: &Field,
        scope_path: &Path,
        hit: &Hit,
        parent_err_path: Option<&Path>,
    ) {
        let abs_path = concat(scope_path, &hit.path);
        let err_path = match parent_err_path {
            Some(parent) => parent.child_element(hit.index),
            None => abs_path.clone(),
        };

        let mut value = if hit.found == Found::Found {
            abs_path.resolve(&self.data).cloned().unwrap_or(Value::Null)
        } else {
            Value::Null
        };

        // Non-nullable nil keys are dropped; `required` then evaluates
        // the deleted state.
        let mut deleted = false;
        if hit.parent == Parent::Object
            && hit.found == Found::Found
            && !field.is_nullable()
            && value.is_null()
        {
            abs_path.remove_from(&mut self.data);
            deleted = true;
        }

        if self.convert_single_value_arrays
            && field.path().is_simple_name()
            && hit.found == Found::Found
            && !deleted
            && field.is_array()
            && !value.is_null()
            && !matches!(value, Value::Array(_))
        {
            let wrapped = Value::Array(vec![value]);
            abs_path.set_in(&mut self.data, wrapped.clone());
            value = wrapped;
        }

        // Element rules run first so conversions land before the array's
        // own rules, and missing arrays still surface their element
        // errors under the -1 slot.
        if let Some(elements) = field.elements() {
            self.walk_field(elements, &abs_path, Some(&err_path));
            if hit.found == Found::Found && !deleted {
                value = abs_path.resolve(&self.data).cloned().unwrap_or(Value::Null);
            }
        }

        // Nullable is a field-level property, independent of where the
        // marker sits in the validator list: an explicit nil on a present
        // key skips every rule silently. Missing keys fall through so
        // `required` still applies to them.
        let nullable_nil =
            field.is_nullable() && value.is_null() && hit.found == Found::Found;

        let (messages, ops, final_value, ran) = if nullable_nil {
            (Vec::new(), Vec::new(), value, false)
        } else {
            let data = self.resolve_data_root(field, &abs_path);

            let required = {
                let probe = self.make_context(data, field, hit, value.clone());
                field.is_required(&probe)
            };
            if value.is_null() && !required {
                (Vec::new(), Vec::new(), value, false)
            } else {
                self.run_rules(data, field, hit, value)
            }
        };

        if ran && hit.found == Found::Found && !deleted {
            abs_path.set_in(&mut self.data, final_value);
        }
        for message in messages {
            self.errors.add(&err_path, message);
        }
        self.op_errors.extend(ops);
    }

    /// Composition root: the hit path truncated to the composed prefix,
    /// resolved against the run data. Top-level rule sets see the whole
    /// input.
    fn resolve_data_root(&self, field: &Field, abs_path: &Path) -> &Value {
        if field.prefix_depth() == 0 {
            &self.data
        } else {
            abs_path
                .prefix(field.prefix_depth())
                .resolve(&self.data)
                .unwrap_or(&NULL)
        }
    }

    fn run_rules(
        &self,
        data: &Value,
        field: &Field,
        hit: &Hit,
        mut value: Value,
    ) -> (Vec<String>, Vec<RuleError>, Value, bool) {
        let mut messages = Vec::new();
        let mut ops = Vec::new();
        for validator in field.validators() {
            if validator.marker() == Some(Marker::Nullable) {
                if value.is_null() {
                    break;
                }
                continue;
            }

            let mut ctx = self.make_context(data, field, hit, value.clone());
            let ok = validator.validate(&mut ctx);
            if ctx.has_errors() {
                ops.extend(ctx.take_errors());
                continue;
            }
            if !ok {
                messages.push(self.assemble_message(field, validator.as_ref(), &ctx));
                // An absent required location gets exactly one
                // required-kind message; no other rules run for it.
                if validator.marker() == Some(Marker::Required) {
                    break;
                }
                continue;
            }
            value = ctx.value;
        }
        (messages, ops, value, true)
    }

    fn make_context<'b>(
        &'b self,
        data: &'b Value,
        field: &'b Field,
        hit: &'b Hit,
        value: Value,
    ) -> Context<'b> {
        Context {
            data,
            value,
            parent: hit.parent,
            name: hit.name.as_deref(),
            field,
            now: self.now,
            extra: self.extra,
            language: self.language,
            database: self.database,
            config: self.config,
            errors: Vec::new(),
        }
    }

    /// Assemble and expand the localized message for a failed rule:
    /// `validation.rules.<name>[.<expected-type>][.array]`, most specific
    /// key first.
    fn assemble_message(&self, field: &Field, validator: &dyn Rule, ctx: &Context) -> String {
        let params = validator.message_placeholders(ctx);
        let expand_ctx = ExpandContext {
            field_name: field.name(),
            language: self.language,
            params: &params,
        };

        if let Some(key) = validator.message_key_override() {
            let template = self.language.message(&[key.to_string()]);
            return placeholders::expand(&template, &expand_ctx);
        }

        let base = format!("validation.rules.{}", validator.name());
        let mut keys = Vec::new();
        let typed = validator.is_type_dependent().then(|| {
            let ty = field
                .declared_type()
                .unwrap_or_else(|| ctx.value_kind().name());
            format!("{base}.{ty}")
        });
        let in_array = field.targets_array_elements();
        match (&typed, in_array) {
            (Some(typed_key), true) => {
                keys.push(format!("{typed_key}.array"));
                keys.push(typed_key.clone());
            }
            (Some(typed_key), false) => keys.push(typed_key.clone()),
            (None, true) => keys.push(format!("{base}.array")),
            (None, false) => {}
        }
        keys.push(base);

        let template = self.language.message(&keys);
        placeholders::expand(&template, &expand_ctx)
    }
}

/// Join a resolved scope path with a hit path relative to that scope.
fn concat(scope: &Path, relative: &Path) -> Path {
    let mut steps: StepVec = scope.steps()[..scope.depth() - 1].iter().cloned().collect();
    steps.extend(relative.steps().iter().cloned());
    Path::from_steps(steps)
}
