// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use core::cell::RefCell;
use core::fmt;
use std::rc::Rc;

use crate::SmallInteger;
use crate::ecmascript::builtins::Array;
use crate::ecmascript::execution::{Agent, JsResult};

/// ### [6.1 ECMAScript Language Types](https://tc39.es/ecma262/#sec-ecmascript-language-types)
///
/// The value currency of the engine: what boxed-any element slots hold and
/// what the iteration layer hands to callbacks. Integral numbers in the safe
/// range stay inline as a [`SmallInteger`]; everything else numeric is a
/// 64-bit float. Script objects are shared `Rc<RefCell<…>>` handles; the
/// array storage handle inside such an object is still singly owned.
#[derive(Clone, Default)]
pub enum Value {
    #[default]
    Undefined,
    Null,
    Boolean(bool),
    Integer(SmallInteger),
    Number(f64),
    String(Rc<str>),
    /// A native array-backed object.
    Array(Rc<RefCell<Array>>),
    /// A foreign object exposing the `length` + indexed-get contract.
    ArrayLike(Rc<RefCell<dyn ArrayLikeObject>>),
    /// A host list.
    List(Rc<RefCell<Vec<Value>>>),
    /// A host array.
    HostArray(Rc<[Value]>),
    Function(JsFunction),
}

/// The contract a foreign (host-defined) object must expose for the array
/// iteration layer to treat it as array-like.
pub trait ArrayLikeObject {
    fn length(&self) -> u32;

    fn get(&self, index: u32) -> Value;

    fn has(&self, index: u32) -> bool {
        index < self.length()
    }
}

impl Value {
    /// Creates a `Number` value, normalizing integral floats in the safe
    /// range into inline integers. Negative zero stays a float; an integer
    /// slot cannot preserve its sign.
    pub fn from_f64(value: f64) -> Value {
        let is_int = value.fract() == 0.0 && !(value == 0.0 && value.is_sign_negative());
        if is_int && (SmallInteger::MIN as f64..=SmallInteger::MAX as f64).contains(&value) {
            Value::Integer(SmallInteger::from_i64_unchecked(value as i64))
        } else {
            Value::Number(value)
        }
    }

    pub fn from_i64(value: i64) -> Value {
        SmallInteger::try_from(value)
            .map(Value::Integer)
            .unwrap_or(Value::Number(value as f64))
    }

    pub fn from_string(value: impl Into<Rc<str>>) -> Value {
        Value::String(value.into())
    }

    /// Wraps an array storage handle into a shared native array object.
    pub fn from_array(array: Array) -> Value {
        Value::Array(Rc::new(RefCell::new(array)))
    }

    pub fn from_array_like(source: impl ArrayLikeObject + 'static) -> Value {
        Value::ArrayLike(Rc::new(RefCell::new(source)))
    }

    pub fn from_list(list: Vec<Value>) -> Value {
        Value::List(Rc::new(RefCell::new(list)))
    }

    pub fn from_host_array(values: Vec<Value>) -> Value {
        Value::HostArray(values.into())
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Value::Integer(_) | Value::Number(_))
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Integer(a), Value::Number(b)) | (Value::Number(b), Value::Integer(a)) => {
                a.into_i64() as f64 == *b
            }
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => Rc::ptr_eq(a, b),
            (Value::ArrayLike(a), Value::ArrayLike(b)) => Rc::ptr_eq(a, b),
            (Value::List(a), Value::List(b)) => Rc::ptr_eq(a, b),
            (Value::HostArray(a), Value::HostArray(b)) => Rc::ptr_eq(a, b),
            (Value::Function(a), Value::Function(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "Undefined"),
            Value::Null => write!(f, "Null"),
            Value::Boolean(value) => f.debug_tuple("Boolean").field(value).finish(),
            Value::Integer(value) => f.debug_tuple("Integer").field(value).finish(),
            Value::Number(value) => f.debug_tuple("Number").field(value).finish(),
            Value::String(value) => f.debug_tuple("String").field(value).finish(),
            Value::Array(value) => f.debug_tuple("Array").field(&Rc::as_ptr(value)).finish(),
            Value::ArrayLike(_) => write!(f, "ArrayLike(..)"),
            Value::List(value) => f.debug_tuple("List").field(&value.borrow()).finish(),
            Value::HostArray(value) => f.debug_tuple("HostArray").field(value).finish(),
            Value::Function(value) => f.debug_tuple("Function").field(&value.name()).finish(),
        }
    }
}

/// Renders a value the way it is named in exception messages.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "undefined"),
            Value::Null => write!(f, "null"),
            Value::Boolean(value) => write!(f, "{value}"),
            Value::Integer(value) => write!(f, "{}", value.into_i64()),
            Value::Number(value) => {
                let mut buffer = ryu_js::Buffer::new();
                write!(f, "{}", buffer.format(*value))
            }
            Value::String(value) => write!(f, "{value}"),
            Value::Array(_) => write!(f, "[object Array]"),
            Value::ArrayLike(_) | Value::List(_) | Value::HostArray(_) => {
                write!(f, "[object Object]")
            }
            Value::Function(value) => {
                write!(f, "function {}() {{ [native code] }}", value.name())
            }
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Value {
        Value::Boolean(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Value {
        Value::Integer(SmallInteger::from(value))
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Value {
        Value::Integer(SmallInteger::from(value))
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Value {
        Value::from_i64(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Value {
        Value::from_f64(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Value {
        Value::String(value.into())
    }
}

impl From<SmallInteger> for Value {
    fn from(value: SmallInteger) -> Value {
        Value::Integer(value)
    }
}

type Behaviour = dyn Fn(&mut Agent, Value, &[Value]) -> JsResult<Value>;

/// A host-defined callable. This is the callable-invocation collaborator of
/// the iteration layer; the engine never inspects the body, only whether the
/// function is strict and how it is named in error messages.
#[derive(Clone)]
pub struct JsFunction(Rc<JsFunctionData>);

struct JsFunctionData {
    name: Box<str>,
    strict: bool,
    behaviour: Box<Behaviour>,
}

impl JsFunction {
    pub fn new(
        name: &str,
        strict: bool,
        behaviour: impl Fn(&mut Agent, Value, &[Value]) -> JsResult<Value> + 'static,
    ) -> JsFunction {
        JsFunction(Rc::new(JsFunctionData {
            name: name.into(),
            strict,
            behaviour: Box::new(behaviour),
        }))
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn is_strict(&self) -> bool {
        self.0.strict
    }

    pub(crate) fn call(&self, agent: &mut Agent, this_value: Value, args: &[Value]) -> JsResult<Value> {
        (self.0.behaviour)(agent, this_value, args)
    }
}

impl PartialEq for JsFunction {
    fn eq(&self, other: &JsFunction) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for JsFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsFunction")
            .field("name", &self.0.name)
            .field("strict", &self.0.strict)
            .finish_non_exhaustive()
    }
}

#[test]
fn from_f64_normalizes_safe_integers() {
    assert_eq!(Value::from_f64(3.0), Value::Integer(SmallInteger::from(3)));
    assert!(matches!(Value::from_f64(3.5), Value::Number(_)));
    assert!(matches!(Value::from_f64(-0.0), Value::Number(_)));
    assert!(matches!(Value::from_f64(f64::NAN), Value::Number(_)));
    assert!(matches!(Value::from_f64(1e300), Value::Number(_)));
}
