// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::SmallInteger;
use crate::ecmascript::execution::JsResult;
use crate::ecmascript::types::Value;

use super::data::{ArrayStorage, ElementsKind};

/// Fixed-capacity byte buffer exposed through the array storage interface.
///
/// Element kind is one unsigned byte, widened to a number on read. Only
/// bounded get and set are supported; every structural operation is an
/// engine-integration error and panics. This backing is terminal: it is
/// never wrapped by a filter and never converts to another representation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ByteElements {
    values: Box<[u8]>,
}

impl ByteElements {
    pub(crate) fn from_buffer(buffer: Box<[u8]>) -> ByteElements {
        ByteElements { values: buffer }
    }

    pub(crate) fn length(&self) -> u32 {
        self.values.len() as u32
    }

    pub(crate) fn ensure(self, index: u32) -> ArrayStorage {
        if index < self.length() {
            ArrayStorage::ByteView(self)
        } else {
            panic!("byte view storage cannot grow to index {index}")
        }
    }

    pub(crate) fn shrink(self, _length: u32) -> ArrayStorage {
        panic!("byte view storage has a fixed capacity")
    }

    pub(crate) fn shift_left(&mut self, _by: u32) {
        panic!("byte view storage does not support structural shifts")
    }

    pub(crate) fn shift_right(self, _by: u32) -> ArrayStorage {
        panic!("byte view storage does not support structural shifts")
    }

    pub(crate) fn get_int(&self, index: u32) -> i32 {
        self.values
            .get(index as usize)
            .map(|&byte| i32::from(byte))
            .unwrap_or(0)
    }

    pub(crate) fn get_long(&self, index: u32) -> i64 {
        i64::from(self.get_int(index))
    }

    pub(crate) fn get_double(&self, index: u32) -> f64 {
        f64::from(self.get_int(index))
    }

    pub(crate) fn get_object(&self, index: u32) -> Value {
        if index < self.length() {
            Value::Integer(SmallInteger::from(self.get_int(index)))
        } else {
            Value::Undefined
        }
    }

    pub(crate) fn set(self, index: u32, value: Value, strict: bool) -> JsResult<ArrayStorage> {
        match value {
            Value::Integer(value) => self.set_long(index, value.into_i64(), strict),
            Value::Number(value) => self.set_double(index, value, strict),
            value => panic!("byte view storage cannot hold non-numeric value {value}"),
        }
    }

    pub(crate) fn set_int(mut self, index: u32, value: i32, _strict: bool) -> JsResult<ArrayStorage> {
        if (index as usize) < self.values.len() {
            self.values[index as usize] = value as u8;
            Ok(ArrayStorage::ByteView(self))
        } else {
            panic!("byte view write out of bounds at index {index}")
        }
    }

    pub(crate) fn set_long(self, index: u32, value: i64, strict: bool) -> JsResult<ArrayStorage> {
        self.set_int(index, value as i32, strict)
    }

    pub(crate) fn set_double(self, index: u32, value: f64, strict: bool) -> JsResult<ArrayStorage> {
        self.set_int(index, value as i64 as i32, strict)
    }

    pub(crate) fn has(&self, index: u32) -> bool {
        index < self.length()
    }

    pub(crate) fn delete(self, _index: u32) -> ArrayStorage {
        panic!("byte view storage does not support element deletion")
    }

    pub(crate) fn delete_range(self, _from: u32, _to: u32) -> ArrayStorage {
        panic!("byte view storage does not support element deletion")
    }

    pub(crate) fn set_empty(self, _index: u32) -> ArrayStorage {
        panic!("byte view storage does not support holes")
    }

    pub(crate) fn set_empty_range(self, _from: u32, _to: u32) -> ArrayStorage {
        panic!("byte view storage does not support holes")
    }

    pub(crate) fn pop(self) -> (ArrayStorage, Value) {
        panic!("byte view storage does not support pop")
    }

    pub(crate) fn push(self, _values: &[Value]) -> ArrayStorage {
        panic!("byte view storage does not support push")
    }

    pub(crate) fn slice(&self, _from: u32, _to: u32) -> ArrayStorage {
        panic!("byte view storage does not support slicing")
    }

    pub(crate) fn convert(self, _kind: ElementsKind) -> ArrayStorage {
        panic!("byte view storage never converts")
    }

    pub(crate) fn next_index(&self, from: u32) -> Option<u32> {
        if from < self.length() { Some(from) } else { None }
    }
}

impl From<ByteElements> for ArrayStorage {
    fn from(elements: ByteElements) -> ArrayStorage {
        ArrayStorage::ByteView(elements)
    }
}
