use proptest::prelude::*;
use types::Value;

/// An `Int` or `Text` value, weighted away from the all-zero/empty-string
/// values that collide with `NULL` on deserialize, so generic round-trip
/// properties don't need to special-case them at every call site.
pub fn arb_nonzero_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        (1..i32::MAX).prop_map(Value::Int),
        "[a-zA-Z]{1,16}".prop_map(Value::Text),
    ]
}

/// Any `Value`, including `Null`, `Int(0)`, and `Text("")`.
pub fn arb_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<i32>().prop_map(Value::Int),
        "[a-zA-Z]{0,16}".prop_map(Value::Text),
    ]
}
