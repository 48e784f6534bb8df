//! Custom JMESPath function extensions
//!
//! Implements the three function extensions this crate adds to the base
//! language:
//!
//! - `exclude(object, excludes)` - prune named keys from an object
//! - `map_merge(object, elements)` - merge a parent object into each element
//!   of an array, with the element's own keys winning on collision (the same
//!   precedence as the builtin `merge`, where the later operand overrides)
//! - `slice(to_be_sliced, start_from)` - suffix of a string or array from a
//!   0-based offset, accepting the offset as a number or a numeric string
//!
//! Each function declares a [`Signature`] consumed by the evaluator's own
//! argument checking, so a call with a non-conforming argument fails with the
//! evaluator's `InvalidType` error before the function body runs. The bodies
//! are pure: no mutation of inputs, no I/O, no per-call state.

use jmespath::functions::{ArgumentType, CustomFunction, Signature};
use jmespath::{Context, ErrorReason, JmespathError, Rcvar, Runtime, RuntimeError, Variable};

/// Install all three function extensions into a runtime.
///
/// Registration is by name, so any function the runtime already holds under
/// `exclude`, `map_merge` or `slice` is replaced. Everything else in the
/// runtime (builtins, other custom functions) is left untouched.
pub fn register(runtime: &mut Runtime) {
    runtime.register_function("exclude", Box::new(exclude_fn()));
    runtime.register_function("map_merge", Box::new(map_merge_fn()));
    runtime.register_function("slice", Box::new(slice_fn()));
}

/// Build the `exclude(object, excludes)` function.
///
/// Signature: `object, string|object|array`.
#[must_use]
pub fn exclude_fn() -> CustomFunction {
    CustomFunction::new(
        Signature::new(
            vec![
                ArgumentType::Object,
                ArgumentType::Union(vec![
                    ArgumentType::String,
                    ArgumentType::Object,
                    ArgumentType::Array,
                ]),
            ],
            None,
        ),
        Box::new(exclude_impl),
    )
}

/// Build the `map_merge(object, elements)` function.
///
/// Signature: `object, array[object]`. Declaring the element type lets the
/// evaluator reject a non-object element before the body runs.
#[must_use]
pub fn map_merge_fn() -> CustomFunction {
    CustomFunction::new(
        Signature::new(
            vec![
                ArgumentType::Object,
                ArgumentType::TypedArray(Box::new(ArgumentType::Object)),
            ],
            None,
        ),
        Box::new(map_merge_impl),
    )
}

/// Build the `slice(to_be_sliced, start_from)` function.
///
/// Signature: `string|array, number|string`.
#[must_use]
pub fn slice_fn() -> CustomFunction {
    CustomFunction::new(
        Signature::new(
            vec![
                ArgumentType::Union(vec![ArgumentType::String, ArgumentType::Array]),
                ArgumentType::Union(vec![ArgumentType::Number, ArgumentType::String]),
            ],
            None,
        ),
        Box::new(slice_impl),
    )
}

fn exclude_impl(args: &[Rcvar], ctx: &mut Context<'_>) -> Result<Rcvar, JmespathError> {
    let object = expect_object(&args[0], ctx, 0)?;
    let excludes = &*args[1];

    let retained = object
        .iter()
        .filter(|(key, _)| !names_key(excludes, key))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();
    Ok(Rcvar::new(Variable::Object(retained)))
}

fn map_merge_impl(args: &[Rcvar], ctx: &mut Context<'_>) -> Result<Rcvar, JmespathError> {
    let parent = expect_object(&args[0], ctx, 0)?;
    let elements = match &*args[1] {
        Variable::Array(items) => items,
        other => return Err(invalid_type(ctx, "array[object]", other, 1)),
    };

    let mut merged_items = Vec::with_capacity(elements.len());
    for element in elements {
        let fields = match &**element {
            Variable::Object(map) => map,
            other => return Err(invalid_type(ctx, "array[object]", other, 1)),
        };
        // Element keys override parent keys, matching builtin merge where
        // the later operand wins.
        let mut merged = parent.clone();
        merged.extend(fields.iter().map(|(k, v)| (k.clone(), v.clone())));
        merged_items.push(Rcvar::new(Variable::Object(merged)));
    }
    Ok(Rcvar::new(Variable::Array(merged_items)))
}

fn slice_impl(args: &[Rcvar], ctx: &mut Context<'_>) -> Result<Rcvar, JmespathError> {
    let offset = match &*args[1] {
        Variable::Number(_) => match args[1].as_number() {
            Some(number) => number.trunc() as i64,
            None => return Err(invalid_type(ctx, "number|string", &args[1], 1)),
        },
        Variable::String(text) => match text.trim().parse::<i64>() {
            Ok(parsed) => parsed,
            Err(_) => return Err(invalid_type(ctx, "number|string", &args[1], 1)),
        },
        other => return Err(invalid_type(ctx, "number|string", other, 1)),
    };

    match &*args[0] {
        Variable::String(text) => {
            // Slice on character boundaries, not bytes
            let start = clamp_offset(offset, text.chars().count());
            let suffix: String = text.chars().skip(start).collect();
            Ok(Rcvar::new(Variable::String(suffix)))
        }
        Variable::Array(items) => {
            let start = clamp_offset(offset, items.len());
            Ok(Rcvar::new(Variable::Array(items[start..].to_vec())))
        }
        other => Err(invalid_type(ctx, "string|array", other, 0)),
    }
}

/// True when `excludes` names `key`: equal to it (string form), holding it as
/// a key (object form), or containing it (array form, where non-string
/// members match nothing).
fn names_key(excludes: &Variable, key: &str) -> bool {
    match excludes {
        Variable::String(name) => name == key,
        Variable::Object(map) => map.contains_key(key),
        Variable::Array(items) => items
            .iter()
            .any(|item| item.as_string().is_some_and(|name| name == key)),
        _ => false,
    }
}

/// Resolve a possibly negative 0-based offset against a sequence length,
/// clamping out-of-range offsets to the nearest end.
fn clamp_offset(offset: i64, len: usize) -> usize {
    if offset < 0 {
        len.saturating_sub(usize::try_from(offset.unsigned_abs()).unwrap_or(usize::MAX))
    } else {
        usize::try_from(offset).map_or(len, |from| from.min(len))
    }
}

fn expect_object<'a>(
    arg: &'a Rcvar,
    ctx: &Context<'_>,
    position: usize,
) -> Result<&'a std::collections::BTreeMap<String, Rcvar>, JmespathError> {
    match &**arg {
        Variable::Object(map) => Ok(map),
        other => Err(invalid_type(ctx, "object", other, position)),
    }
}

fn invalid_type(
    ctx: &Context<'_>,
    expected: &str,
    actual: &Variable,
    position: usize,
) -> JmespathError {
    JmespathError::from_ctx(
        ctx,
        ErrorReason::Runtime(RuntimeError::InvalidType {
            expected: expected.to_owned(),
            actual: actual.get_type().to_string(),
            position,
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::{clamp_offset, names_key};
    use jmespath::Variable;

    #[test]
    fn clamp_offset_within_range() {
        assert_eq!(clamp_offset(0, 5), 0);
        assert_eq!(clamp_offset(3, 5), 3);
        assert_eq!(clamp_offset(5, 5), 5);
    }

    #[test]
    fn clamp_offset_past_end_is_len() {
        assert_eq!(clamp_offset(9, 5), 5);
    }

    #[test]
    fn clamp_offset_negative_counts_from_end() {
        assert_eq!(clamp_offset(-2, 5), 3);
        assert_eq!(clamp_offset(-5, 5), 0);
        // More negative than the length clamps to the start
        assert_eq!(clamp_offset(-9, 5), 0);
    }

    #[test]
    fn names_key_string_form_is_exact_match() {
        let excludes = Variable::String("id".to_owned());
        assert!(names_key(&excludes, "id"));
        assert!(!names_key(&excludes, "idx"));
    }

    #[test]
    fn names_key_array_form_ignores_non_strings() {
        let excludes = Variable::from_json(r#"[1, true, "id"]"#).unwrap();
        assert!(names_key(&excludes, "id"));
        assert!(!names_key(&excludes, "1"));
    }

    #[test]
    fn names_key_object_form_uses_keys() {
        let excludes = Variable::from_json(r#"{"id": false}"#).unwrap();
        assert!(names_key(&excludes, "id"));
        assert!(!names_key(&excludes, "false"));
    }
}
