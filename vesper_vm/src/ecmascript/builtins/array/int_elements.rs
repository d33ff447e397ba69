// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::SmallInteger;
use crate::ecmascript::abstract_operations::type_conversion::{
    is_representable_as_int, is_representable_as_long,
};
use crate::ecmascript::execution::JsResult;
use crate::ecmascript::types::Value;

use super::data::{ArrayStorage, ElementsKind, MAX_DENSE_LENGTH, next_size, push_dense};
use super::hole_filter::HoleRangeFilter;
use super::long_elements::LongElements;
use super::number_elements::NumberElements;
use super::object_elements::ObjectElements;
use super::sparse_elements::SparseElements;

/// Dense storage of 32-bit integer elements, the narrowest kind and the one
/// every fresh array starts with.
///
/// The buffer is fully initialized up to its physical capacity; slots past
/// the virtual length hold zero so that growth never reads garbage. The
/// capacity is always at least the virtual length and grows by
/// [`next_size`] steps.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IntElements {
    values: Vec<i32>,
    len: u32,
}

impl IntElements {
    pub(crate) fn new() -> IntElements {
        IntElements {
            values: Vec::new(),
            len: 0,
        }
    }

    pub(crate) fn from_raw_parts(values: Vec<i32>, len: u32) -> IntElements {
        debug_assert!(len as usize <= values.len());
        IntElements { values, len }
    }

    fn expand(&mut self, required: u32) {
        if (self.values.len() as u32) < required {
            self.values.resize(next_size(required) as usize, 0);
        }
    }

    pub(crate) fn length(&self) -> u32 {
        self.len
    }

    pub(crate) fn ensure(mut self, index: u32) -> ArrayStorage {
        if index >= MAX_DENSE_LENGTH && index >= self.values.len() as u32 {
            return SparseElements::from_dense(ArrayStorage::Int(self), index + 1).ensure(index);
        }
        self.expand(index + 1);
        self.len = self.len.max(index + 1);
        ArrayStorage::Int(self)
    }

    pub(crate) fn shrink(mut self, length: u32) -> ArrayStorage {
        for slot in self.values.iter_mut().skip(length as usize) {
            *slot = 0;
        }
        self.len = length.min(self.len);
        ArrayStorage::Int(self)
    }

    pub(crate) fn shift_left(&mut self, by: u32) {
        if by == 0 || self.len == 0 {
            return;
        }
        if by >= self.len {
            for slot in &mut self.values {
                *slot = 0;
            }
            self.len = 0;
            return;
        }
        let len = self.len as usize;
        self.values.copy_within(by as usize..len, 0);
        for slot in &mut self.values[len - by as usize..len] {
            *slot = 0;
        }
        self.len -= by;
    }

    pub(crate) fn shift_right(mut self, by: u32) -> ArrayStorage {
        if by == 0 {
            return ArrayStorage::Int(self);
        }
        let new_len = self.len.saturating_add(by);
        if new_len > MAX_DENSE_LENGTH && new_len > self.values.len() as u32 {
            let len = self.len;
            return SparseElements::from_dense(ArrayStorage::Int(self), len).shift_right(by);
        }
        self.expand(new_len);
        let len = self.len as usize;
        self.values.copy_within(0..len, by as usize);
        for slot in &mut self.values[0..by as usize] {
            *slot = 0;
        }
        self.len = new_len;
        ArrayStorage::Int(self)
    }

    pub(crate) fn get_int(&self, index: u32) -> i32 {
        self.values.get(index as usize).copied().unwrap_or(0)
    }

    pub(crate) fn get_long(&self, index: u32) -> i64 {
        i64::from(self.get_int(index))
    }

    pub(crate) fn get_double(&self, index: u32) -> f64 {
        f64::from(self.get_int(index))
    }

    pub(crate) fn get_object(&self, index: u32) -> Value {
        if index < self.len {
            Value::Integer(SmallInteger::from(self.get_int(index)))
        } else {
            Value::Undefined
        }
    }

    pub(crate) fn set(self, index: u32, value: Value, strict: bool) -> JsResult<ArrayStorage> {
        match value {
            Value::Integer(value) => self.set_long(index, value.into_i64(), strict),
            Value::Number(value) => self.set_double(index, value, strict),
            // The undefined sentinel becomes a hole instead of forcing a
            // conversion to boxed storage.
            Value::Undefined => Ok(ArrayStorage::Int(self).set_empty(index)),
            _ => self.convert(ElementsKind::Object).set(index, value, strict),
        }
    }

    pub(crate) fn set_int(mut self, index: u32, value: i32, _strict: bool) -> JsResult<ArrayStorage> {
        debug_assert!((index as usize) < self.values.len(), "set before ensure");
        self.values[index as usize] = value;
        self.len = self.len.max(index + 1);
        Ok(ArrayStorage::Int(self))
    }

    pub(crate) fn set_long(self, index: u32, value: i64, strict: bool) -> JsResult<ArrayStorage> {
        if let Ok(value) = i32::try_from(value) {
            self.set_int(index, value, strict)
        } else {
            self.convert(ElementsKind::Long).set_long(index, value, strict)
        }
    }

    pub(crate) fn set_double(self, index: u32, value: f64, strict: bool) -> JsResult<ArrayStorage> {
        if is_representable_as_int(value) {
            self.set_int(index, value as i32, strict)
        } else if is_representable_as_long(value) {
            self.convert(ElementsKind::Long).set_long(index, value as i64, strict)
        } else {
            self.convert(ElementsKind::Number).set_double(index, value, strict)
        }
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
        HoleRangeFilter::wrap(ArrayStorage::Int(self), index, index)
    }

    pub(crate) fn set_empty_range(self, from: u32, to: u32) -> ArrayStorage {
        HoleRangeFilter::wrap(ArrayStorage::Int(self), from, to)
    }

    pub(crate) fn pop(mut self) -> (ArrayStorage, Value) {
        if self.len == 0 {
            return (ArrayStorage::Int(self), Value::Undefined);
        }
        let index = (self.len - 1) as usize;
        let value = self.values[index];
        self.values[index] = 0;
        self.len -= 1;
        (
            ArrayStorage::Int(self),
            Value::Integer(SmallInteger::from(value)),
        )
    }

    pub(crate) fn push(self, values: &[Value]) -> ArrayStorage {
        push_dense(ArrayStorage::Int(self), values)
    }

    pub(crate) fn slice(&self, from: u32, to: u32) -> ArrayStorage {
        let from = from.min(self.len) as usize;
        let to = (to.min(self.len) as usize).max(from);
        ArrayStorage::Int(IntElements::from_raw_parts(
            self.values[from..to].to_vec(),
            (to - from) as u32,
        ))
    }

    pub(crate) fn convert(self, kind: ElementsKind) -> ArrayStorage {
        match kind {
            ElementsKind::Int => ArrayStorage::Int(self),
            ElementsKind::Long => {
                let values = self.values.iter().map(|&value| i64::from(value)).collect();
                ArrayStorage::Long(LongElements::from_raw_parts(values, self.len))
            }
            ElementsKind::Number => {
                let values = self.values.iter().map(|&value| f64::from(value)).collect();
                ArrayStorage::Number(NumberElements::from_raw_parts(values, self.len))
            }
            ElementsKind::Object => {
                let values = self
                    .values
                    .iter()
                    .map(|&value| Value::Integer(SmallInteger::from(value)))
                    .collect();
                ArrayStorage::Object(ObjectElements::from_raw_parts(values, self.len))
            }
        }
    }

    pub(crate) fn next_index(&self, from: u32) -> Option<u32> {
        if from < self.len { Some(from) } else { None }
    }
}

impl From<IntElements> for ArrayStorage {
    fn from(elements: IntElements) -> ArrayStorage {
        ArrayStorage::Int(elements)
    }
}
