//! Deep-merge utilities for configuration values.
//!
//! Merging overlays a sequence of sources onto a target value:
//!
//! - mappings merge recursively, key by key;
//! - arrays and scalars (including `null`) replace the target wholesale;
//! - keys absent from a source leave the target untouched;
//! - the reserved keys `__proto__` and `constructor` are never merged.

use serde_json::{Map, Value};

/// Keys that are skipped regardless of source content.
pub const RESERVED_KEYS: [&str; 2] = ["__proto__", "constructor"];

/// Returns `true` when `value` is a mapping that can be merged into.
///
/// # Examples
///
/// ```rust
/// use cascade_config::is_mergeable;
/// use serde_json::json;
///
/// assert!(is_mergeable(&json!({"a": 1})));
/// assert!(!is_mergeable(&json!([1, 2])));
/// assert!(!is_mergeable(&json!(null)));
/// ```
#[must_use]
pub const fn is_mergeable(value: &Value) -> bool {
    matches!(value, Value::Object(_))
}

/// Overlay each of `sources` onto `target` in order, mutating `target` in
/// place.
///
/// A source is only applied when both it and `target` are mappings; any other
/// combination leaves `target` unchanged for that source. Sources are consumed,
/// so the merged result never shares structure with them.
///
/// # Examples
///
/// ```rust
/// use cascade_config::deep_merge;
/// use serde_json::json;
///
/// let mut acc = json!({"a": 1, "b": {"c": 2, "d": 3}});
/// deep_merge(&mut acc, [json!({"b": {"c": 4, "e": 5}}), json!({"f": [6]})]);
/// assert_eq!(acc, json!({"a": 1, "b": {"c": 4, "d": 3, "e": 5}, "f": [6]}));
/// ```
pub fn deep_merge<I>(target: &mut Value, sources: I)
where
    I: IntoIterator<Item = Value>,
{
    for source in sources {
        let (Value::Object(target_map), Value::Object(source_map)) = (&mut *target, source) else {
            continue;
        };
        merge_map(target_map, source_map);
    }
}

/// By-value form of [`deep_merge`].
///
/// ```rust
/// use cascade_config::merged;
/// use serde_json::json;
///
/// let out = merged(json!({"a": [1, 2, 3]}), [json!({"a": [4]})]);
/// assert_eq!(out, json!({"a": [4]}));
/// ```
#[must_use]
pub fn merged<I>(mut target: Value, sources: I) -> Value
where
    I: IntoIterator<Item = Value>,
{
    deep_merge(&mut target, sources);
    target
}

fn merge_map(target: &mut Map<String, Value>, source: Map<String, Value>) {
    for (key, value) in source {
        if RESERVED_KEYS.contains(&key.as_str()) {
            continue;
        }
        match (target.get_mut(&key), value) {
            (Some(Value::Object(existing)), Value::Object(incoming)) => {
                merge_map(existing, incoming);
            }
            (Some(existing), incoming) => *existing = incoming,
            (None, incoming) => {
                target.insert(key, incoming);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rstest::rstest;
    use serde_json::{Value, json};

    use super::{deep_merge, is_mergeable, merged};

    #[test]
    fn deeply_merges_two_objects() {
        let mut target = json!({"a": 1, "b": {"c": 2, "d": 3}});
        deep_merge(&mut target, [json!({"b": {"c": 4, "e": 5}, "f": 6})]);
        assert_eq!(target, json!({"a": 1, "b": {"c": 4, "d": 3, "e": 5}, "f": 6}));
    }

    #[test]
    fn overrides_arrays_instead_of_merging_them() {
        let out = merged(json!({"a": [1, 2, 3]}), [json!({"a": [4, 5, 6]})]);
        assert_eq!(out, json!({"a": [4, 5, 6]}));
    }

    #[test]
    fn absent_keys_leave_target_untouched() {
        let out = merged(json!({"a": 1, "b": 2}), [json!({"c": 3})]);
        assert_eq!(out, json!({"a": 1, "b": 2, "c": 3}));
    }

    #[test]
    fn null_is_a_value_and_overrides() {
        let out = merged(json!({"a": {"b": 1}}), [json!({"a": null})]);
        assert_eq!(out, json!({"a": null}));
    }

    #[test]
    fn folds_multiple_sources_left_to_right() {
        let out = merged(
            json!({"a": 1}),
            [json!({"b": 2}), json!({"c": 3}), json!({"a": 10})],
        );
        assert_eq!(out, json!({"a": 10, "b": 2, "c": 3}));
    }

    #[test]
    fn zero_sources_is_a_no_op() {
        let out = merged(json!({"a": 1}), std::iter::empty());
        assert_eq!(out, json!({"a": 1}));
    }

    #[test]
    fn ignores_reserved_keys() {
        let out = merged(
            json!({"a": 1}),
            [json!({"b": 2, "__proto__": {"c": 3}, "constructor": {"d": 4}})],
        );
        assert_eq!(out, json!({"a": 1, "b": 2}));
    }

    #[test]
    fn nested_reserved_keys_are_skipped_too() {
        let out = merged(
            json!({"outer": {"x": 1}}),
            [json!({"outer": {"constructor": "evil", "y": 2}})],
        );
        assert_eq!(out, json!({"outer": {"x": 1, "y": 2}}));
    }

    #[rstest]
    #[case(json!([1]), json!({"a": 1}))]
    #[case(json!({"a": 1}), json!([1]))]
    #[case(json!("text"), json!({"a": 1}))]
    #[case(json!(null), json!({"a": 1}))]
    fn non_mapping_roots_are_not_merged(#[case] target: Value, #[case] source: Value) {
        let out = merged(target.clone(), [source]);
        assert_eq!(out, target);
    }

    #[test]
    fn mapping_replaces_scalar_in_nested_position() {
        let out = merged(json!({"a": 1}), [json!({"a": {"b": 2}})]);
        assert_eq!(out, json!({"a": {"b": 2}}));
    }

    #[test]
    fn mergeable_predicate_only_accepts_mappings() {
        assert!(is_mergeable(&json!({})));
        for value in [json!(null), json!([]), json!(1), json!("s"), json!(true)] {
            assert!(!is_mergeable(&value), "{value} should not be mergeable");
        }
    }

    fn leaf() -> impl Strategy<Value = Value> {
        prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::from),
            any::<i64>().prop_map(Value::from),
            "[a-z]{0,6}".prop_map(Value::from),
        ]
    }

    fn config_value() -> impl Strategy<Value = Value> {
        leaf().prop_recursive(4, 32, 4, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
                prop::collection::btree_map("[a-d]", inner, 0..4)
                    .prop_map(|map| Value::Object(map.into_iter().collect())),
            ]
        })
    }

    fn mapping() -> impl Strategy<Value = Value> {
        prop::collection::btree_map("[a-d]", config_value(), 0..5)
            .prop_map(|map| Value::Object(map.into_iter().collect()))
    }

    /// Reference overlay used to check `deep_merge` against.
    fn overlay(base: &Value, top: &Value) -> Value {
        match (base, top) {
            (Value::Object(b), Value::Object(t)) => {
                let mut out = b.clone();
                for (key, value) in t {
                    let next = match b.get(key) {
                        Some(existing) => overlay(existing, value),
                        None => value.clone(),
                    };
                    out.insert(key.clone(), next);
                }
                Value::Object(out)
            }
            (_, top_value) => top_value.clone(),
        }
    }

    proptest! {
        #[test]
        fn merging_a_value_with_itself_is_idempotent(value in mapping()) {
            let out = merged(value.clone(), [value.clone()]);
            prop_assert_eq!(out, value);
        }

        #[test]
        fn merge_matches_recursive_overlay(base in mapping(), top in mapping()) {
            let expected = overlay(&base, &top);
            let out = merged(base.clone(), [top.clone()]);
            prop_assert_eq!(out, expected);
        }

        #[test]
        fn every_source_key_is_present_after_merge(base in mapping(), top in mapping()) {
            let out = merged(base, [top.clone()]);
            let (Value::Object(out_map), Value::Object(top_map)) = (&out, &top) else {
                return Err(TestCaseError::fail("expected mappings"));
            };
            for key in top_map.keys() {
                prop_assert!(out_map.contains_key(key));
            }
        }
    }
}
