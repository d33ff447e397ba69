// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::ecmascript::abstract_operations::type_conversion::{to_int32, to_number};
use crate::ecmascript::execution::JsResult;
use crate::ecmascript::types::Value;

use super::data::{ArrayStorage, ElementsKind, MAX_DENSE_LENGTH, next_size, push_dense};
use super::hole_filter::HoleRangeFilter;
use super::sparse_elements::SparseElements;

/// Dense storage of boxed values, the widest kind. The undefined sentinel is
/// representable here and is stored inline.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectElements {
    values: Vec<Value>,
    len: u32,
}

impl ObjectElements {
    pub(crate) fn from_raw_parts(values: Vec<Value>, len: u32) -> ObjectElements {
        debug_assert!(len as usize <= values.len());
        ObjectElements { values, len }
    }

    fn expand(&mut self, required: u32) {
        if (self.values.len() as u32) < required {
            self.values.resize(next_size(required) as usize, Value::Undefined);
        }
    }

    pub(crate) fn length(&self) -> u32 {
        self.len
    }

    pub(crate) fn ensure(mut self, index: u32) -> ArrayStorage {
        if index >= MAX_DENSE_LENGTH && index >= self.values.len() as u32 {
            return SparseElements::from_dense(ArrayStorage::Object(self), index + 1).ensure(index);
        }
        self.expand(index + 1);
        self.len = self.len.max(index + 1);
        ArrayStorage::Object(self)
    }

    pub(crate) fn shrink(mut self, length: u32) -> ArrayStorage {
        for slot in self.values.iter_mut().skip(length as usize) {
            *slot = Value::Undefined;
        }
        self.len = length.min(self.len);
        ArrayStorage::Object(self)
    }

    pub(crate) fn shift_left(&mut self, by: u32) {
        if by == 0 || self.len == 0 {
            return;
        }
        if by >= self.len {
            for slot in &mut self.values {
                *slot = Value::Undefined;
            }
            self.len = 0;
            return;
        }
        let len = self.len as usize;
        self.values[..len].rotate_left(by as usize);
        for slot in &mut self.values[len - by as usize..len] {
            *slot = Value::Undefined;
        }
        self.len -= by;
    }

    pub(crate) fn shift_right(mut self, by: u32) -> ArrayStorage {
        if by == 0 {
            return ArrayStorage::Object(self);
        }
        let new_len = self.len.saturating_add(by);
        if new_len > MAX_DENSE_LENGTH && new_len > self.values.len() as u32 {
            let len = self.len;
            return SparseElements::from_dense(ArrayStorage::Object(self), len).shift_right(by);
        }
        self.expand(new_len);
        let len = self.len as usize;
        self.values[..new_len as usize].rotate_right(by as usize);
        for slot in &mut self.values[0..by as usize] {
            *slot = Value::Undefined;
        }
        self.len = new_len;
        ArrayStorage::Object(self)
    }

    pub(crate) fn get_int(&self, index: u32) -> i32 {
        to_int32(self.get_double(index))
    }

    pub(crate) fn get_long(&self, index: u32) -> i64 {
        self.get_double(index) as i64
    }

    pub(crate) fn get_double(&self, index: u32) -> f64 {
        match self.values.get(index as usize) {
            Some(value) => to_number(value),
            None => f64::NAN,
        }
    }

    pub(crate) fn get_object(&self, index: u32) -> Value {
        if index < self.len {
            self.values
                .get(index as usize)
                .cloned()
                .unwrap_or(Value::Undefined)
        } else {
            Value::Undefined
        }
    }

    pub(crate) fn set(mut self, index: u32, value: Value, _strict: bool) -> JsResult<ArrayStorage> {
        debug_assert!((index as usize) < self.values.len(), "set before ensure");
        self.values[index as usize] = value;
        self.len = self.len.max(index + 1);
        Ok(ArrayStorage::Object(self))
    }

    pub(crate) fn set_int(self, index: u32, value: i32, strict: bool) -> JsResult<ArrayStorage> {
        self.set(index, Value::from(value), strict)
    }

    pub(crate) fn set_long(self, index: u32, value: i64, strict: bool) -> JsResult<ArrayStorage> {
        self.set(index, Value::from_i64(value), strict)
    }

    pub(crate) fn set_double(self, index: u32, value: f64, strict: bool) -> JsResult<ArrayStorage> {
        self.set(index, Value::from_f64(value), strict)
    }

    pub(crate) fn has(&self, index: u32) -> bool {
        index < self.len
    }

    pub(crate) fn delete(self, index: u32) -> ArrayStorage {
        self.set_empty(index)
    }

    pub(crate) fn delete_range(self, from: u32, to: u32) -> ArrayStorage {
        self.set_empty_range(from, to)
    }

    pub(crate) fn set_empty(self, index: u32) -> ArrayStorage {
        HoleRangeFilter::wrap(ArrayStorage::Object(self), index, index)
    }

    pub(crate) fn set_empty_range(self, from: u32, to: u32) -> ArrayStorage {
        HoleRangeFilter::wrap(ArrayStorage::Object(self), from, to)
    }

    pub(crate) fn pop(mut self) -> (ArrayStorage, Value) {
        if self.len == 0 {
            return (ArrayStorage::Object(self), Value::Undefined);
        }
        let index = (self.len - 1) as usize;
        let value = core::mem::take(&mut self.values[index]);
        self.len -= 1;
        (ArrayStorage::Object(self), value)
    }

    pub(crate) fn push(self, values: &[Value]) -> ArrayStorage {
        push_dense(ArrayStorage::Object(self), values)
    }

    pub(crate) fn slice(&self, from: u32, to: u32) -> ArrayStorage {
        let from = from.min(self.len) as usize;
        let to = (to.min(self.len) as usize).max(from);
        ArrayStorage::Object(ObjectElements::from_raw_parts(
            self.values[from..to].to_vec(),
            (to - from) as u32,
        ))
    }

    pub(crate) fn convert(self, kind: ElementsKind) -> ArrayStorage {
        match kind {
            ElementsKind::Object => ArrayStorage::Object(self),
            _ => unreachable!("elements cannot narrow"),
        }
    }

    pub(crate) fn next_index(&self, from: u32) -> Option<u32> {
        if from < self.len { Some(from) } else { None }
    }
}

impl From<ObjectElements> for ArrayStorage {
    fn from(elements: ObjectElements) -> ArrayStorage {
        ArrayStorage::Object(elements)
    }
}
