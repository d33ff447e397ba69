// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::ecmascript::types::Value;

/// ### [7.1.4 ToNumber ( argument )](https://tc39.es/ecma262/#sec-tonumber)
///
/// Restricted to the value kinds that reach the storage layer; objects that
/// would require `ToPrimitive` coerce to NaN here.
pub fn to_number(value: &Value) -> f64 {
    match value {
        Value::Undefined => f64::NAN,
        Value::Null => 0.0,
        Value::Boolean(true) => 1.0,
        Value::Boolean(false) => 0.0,
        Value::Integer(value) => value.into_i64() as f64,
        Value::Number(value) => *value,
        Value::String(value) => string_to_number(value),
        _ => f64::NAN,
    }
}

fn string_to_number(value: &str) -> f64 {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    fast_float::parse::<f64, _>(trimmed).unwrap_or(f64::NAN)
}

/// ### [7.1.6 ToInt32 ( argument )](https://tc39.es/ecma262/#sec-toint32)
pub fn to_int32(value: f64) -> i32 {
    // 2. If number is not finite or is either +0𝔽 or -0𝔽, return +0𝔽.
    if !value.is_finite() || value == 0.0 {
        return 0;
    }
    // 3. Let int be truncate(ℝ(number)).
    let int = value.trunc();
    // 4. Let int32bit be int modulo 2^32.
    let int32bit = int.rem_euclid(4294967296.0);
    // 5. If int32bit ≥ 2^31, return 𝔽(int32bit - 2^32); otherwise return
    //    𝔽(int32bit).
    if int32bit >= 2147483648.0 {
        (int32bit - 4294967296.0) as i32
    } else {
        int32bit as i32
    }
}

/// ### [7.1.7 ToUint32 ( argument )](https://tc39.es/ecma262/#sec-touint32)
pub fn to_uint32(value: f64) -> u32 {
    if !value.is_finite() || value == 0.0 {
        return 0;
    }
    value.trunc().rem_euclid(4294967296.0) as u32
}

/// True when `value` can live in a 32-bit integer slot without observable
/// change. Negative zero is excluded; an integer slot cannot keep its sign.
pub fn is_representable_as_int(value: f64) -> bool {
    value as i32 as f64 == value && !is_negative_zero(value)
}

/// True when `value` can live in a 64-bit integer slot without observable
/// change.
pub fn is_representable_as_long(value: f64) -> bool {
    value.trunc() == value
        && (-9.223372036854776e18..9.223372036854776e18).contains(&value)
        && !is_negative_zero(value)
}

fn is_negative_zero(value: f64) -> bool {
    value == 0.0 && value.is_sign_negative()
}

#[test]
fn int32_conversion_wraps_modulo() {
    assert_eq!(to_int32(0.0), 0);
    assert_eq!(to_int32(-0.0), 0);
    assert_eq!(to_int32(3.7), 3);
    assert_eq!(to_int32(-3.7), -3);
    assert_eq!(to_int32(4294967296.0), 0);
    assert_eq!(to_int32(4294967297.0), 1);
    assert_eq!(to_int32(2147483648.0), -2147483648);
    assert_eq!(to_int32(f64::NAN), 0);
    assert_eq!(to_int32(f64::INFINITY), 0);
}

#[test]
fn representability_checks() {
    assert!(is_representable_as_int(0.0));
    assert!(is_representable_as_int(-7.0));
    assert!(!is_representable_as_int(-0.0));
    assert!(!is_representable_as_int(0.5));
    assert!(!is_representable_as_int(3e9));
    assert!(!is_representable_as_int(f64::NAN));

    assert!(is_representable_as_long(3e9));
    assert!(is_representable_as_long(-9.0e18));
    assert!(!is_representable_as_long(0.5));
    assert!(!is_representable_as_long(9.3e18));
    assert!(!is_representable_as_long(f64::INFINITY));
}

#[test]
fn string_coercion() {
    assert_eq!(to_number(&Value::from("")), 0.0);
    assert_eq!(to_number(&Value::from("  42  ")), 42.0);
    assert_eq!(to_number(&Value::from("1.5e3")), 1500.0);
    assert!(to_number(&Value::from("foo")).is_nan());
    assert!(to_number(&Value::Undefined).is_nan());
    assert_eq!(to_number(&Value::Null), 0.0);
}
