//! Best-effort promotion of a mixed array to a homogeneous one.

use super::number::{number_as_f64, Coerced};
use super::Value;
use std::mem::discriminant;

/// On success of an array-typed field, attempt to give every element the
/// same variant. Elements already sharing a variant are left alone; mixed
/// integer/float elements are promoted to `Float`. Any `Null` element or a
/// non-numeric mix suppresses the conversion, leaving the array generic.
pub fn homogenize(items: &mut [Value]) {
    if items.is_empty() {
        return;
    }
    if items.iter().any(Value::is_null) {
        return;
    }

    let first = discriminant(&items[0]);
    if items.iter().all(|item| discriminant(item) == first) {
        return;
    }

    let mut floats = Vec::with_capacity(items.len());
    for item in items.iter() {
        match number_as_f64(item) {
            Coerced::Num(f) => floats.push(f),
            _ => return,
        }
    }
    for (item, f) in items.iter_mut().zip(floats) {
        *item = Value::Float(f);
    }
}
