// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::ecmascript::abstract_operations::type_conversion::is_representable_as_long;
use crate::ecmascript::execution::JsResult;
use crate::ecmascript::types::Value;

use super::data::{ArrayStorage, ElementsKind, MAX_DENSE_LENGTH, next_size, push_dense};
use super::hole_filter::HoleRangeFilter;
use super::number_elements::NumberElements;
use super::object_elements::ObjectElements;
use super::sparse_elements::SparseElements;

/// Dense storage of 64-bit integer elements.
///
/// Reads as double are exact up to 2^53; a conversion to the float kind
/// beyond that re-expresses elements at double precision.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LongElements {
    values: Vec<i64>,
    len: u32,
}

impl LongElements {
    pub(crate) fn from_raw_parts(values: Vec<i64>, len: u32) -> LongElements {
        debug_assert!(len as usize <= values.len());
        LongElements { values, len }
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
            return SparseElements::from_dense(ArrayStorage::Long(self), index + 1).ensure(index);
        }
        self.expand(index + 1);
        self.len = self.len.max(index + 1);
        ArrayStorage::Long(self)
    }

    pub(crate) fn shrink(mut self, length: u32) -> ArrayStorage {
        for slot in self.values.iter_mut().skip(length as usize) {
            *slot = 0;
        }
        self.len = length.min(self.len);
        ArrayStorage::Long(self)
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
            return ArrayStorage::Long(self);
        }
        let new_len = self.len.saturating_add(by);
        if new_len > MAX_DENSE_LENGTH && new_len > self.values.len() as u32 {
            let len = self.len;
            return SparseElements::from_dense(ArrayStorage::Long(self), len).shift_right(by);
        }
        self.expand(new_len);
        let len = self.len as usize;
        self.values.copy_within(0..len, by as usize);
        for slot in &mut self.values[0..by as usize] {
            *slot = 0;
        }
        self.len = new_len;
        ArrayStorage::Long(self)
    }

    pub(crate) fn get_int(&self, index: u32) -> i32 {
        // Narrowing keeps the low 32 bits, as ToInt32 does for integers.
        self.get_long(index) as i32
    }

    pub(crate) fn get_long(&self, index: u32) -> i64 {
        self.values.get(index as usize).copied().unwrap_or(0)
    }

    pub(crate) fn get_double(&self, index: u32) -> f64 {
        self.get_long(index) as f64
    }

    pub(crate) fn get_object(&self, index: u32) -> Value {
        if index < self.len {
            Value::from_i64(self.get_long(index))
        } else {
            Value::Undefined
        }
    }

    pub(crate) fn set(self, index: u32, value: Value, strict: bool) -> JsResult<ArrayStorage> {
        match value {
            Value::Integer(value) => self.set_long(index, value.into_i64(), strict),
            Value::Number(value) => self.set_double(index, value, strict),
            Value::Undefined => Ok(ArrayStorage::Long(self).set_empty(index)),
            _ => self.convert(ElementsKind::Object).set(index, value, strict),
        }
    }

    pub(crate) fn set_int(self, index: u32, value: i32, strict: bool) -> JsResult<ArrayStorage> {
        self.set_long(index, i64::from(value), strict)
    }

    pub(crate) fn set_long(mut self, index: u32, value: i64, _strict: bool) -> JsResult<ArrayStorage> {
        debug_assert!((index as usize) < self.values.len(), "set before ensure");
        self.values[index as usize] = value;
        self.len = self.len.max(index + 1);
        Ok(ArrayStorage::Long(self))
    }

    pub(crate) fn set_double(self, index: u32, value: f64, strict: bool) -> JsResult<ArrayStorage> {
        if is_representable_as_long(value) {
            self.set_long(index, value as i64, strict)
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
        HoleRangeFilter::wrap(ArrayStorage::Long(self), index, index)
    }

    pub(crate) fn set_empty_range(self, from: u32, to: u32) -> ArrayStorage {
        HoleRangeFilter::wrap(ArrayStorage::Long(self), from, to)
    }

    pub(crate) fn pop(mut self) -> (ArrayStorage, Value) {
        if self.len == 0 {
            return (ArrayStorage::Long(self), Value::Undefined);
        }
        let index = (self.len - 1) as usize;
        let value = self.values[index];
        self.values[index] = 0;
        self.len -= 1;
        (ArrayStorage::Long(self), Value::from_i64(value))
    }

    pub(crate) fn push(self, values: &[Value]) -> ArrayStorage {
        push_dense(ArrayStorage::Long(self), values)
    }

    pub(crate) fn slice(&self, from: u32, to: u32) -> ArrayStorage {
        let from = from.min(self.len) as usize;
        let to = (to.min(self.len) as usize).max(from);
        ArrayStorage::Long(LongElements::from_raw_parts(
            self.values[from..to].to_vec(),
            (to - from) as u32,
        ))
    }

    pub(crate) fn convert(self, kind: ElementsKind) -> ArrayStorage {
        match kind {
            ElementsKind::Int => unreachable!("elements cannot narrow"),
            ElementsKind::Long => ArrayStorage::Long(self),
            ElementsKind::Number => {
                let values = self.values.iter().map(|&value| value as f64).collect();
                ArrayStorage::Number(NumberElements::from_raw_parts(values, self.len))
            }
            ElementsKind::Object => {
                let values = self.values.iter().map(|&value| Value::from_i64(value)).collect();
                ArrayStorage::Object(ObjectElements::from_raw_parts(values, self.len))
            }
        }
    }

    pub(crate) fn next_index(&self, from: u32) -> Option<u32> {
        if from < self.len { Some(from) } else { None }
    }
}

impl From<LongElements> for ArrayStorage {
    fn from(elements: LongElements) -> ArrayStorage {
        ArrayStorage::Long(elements)
    }
}
