// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::collections::BTreeMap;

use crate::ecmascript::abstract_operations::type_conversion::{to_int32, to_number};
use crate::ecmascript::execution::JsResult;
use crate::ecmascript::types::{MAX_ARRAY_INDEX, Value};

use super::data::{ArrayStorage, ElementsKind, MAX_DENSE_LENGTH};

/// Sparse storage: a dense prefix up to a per-instance ceiling plus an
/// ordered index→value map for everything at or past it.
///
/// The ceiling is at least the global dense threshold and is widened to
/// cover whatever dense data existed when the array went sparse, so the map
/// never holds an index the prefix covers. Reads and writes below the
/// ceiling delegate to the prefix; at or above it they go to the map, where
/// absence is the hole representation.
#[derive(Debug, Default)]
pub struct SparseElements {
    dense: Box<ArrayStorage>,
    sparse: BTreeMap<u32, Value>,
    max_dense_length: u32,
    len: u32,
}

impl SparseElements {
    pub(crate) fn from_dense(dense: ArrayStorage, length: u32) -> SparseElements {
        let max_dense_length = MAX_DENSE_LENGTH.max(dense.length());
        let len = length.max(dense.length());
        SparseElements {
            dense: Box::new(dense),
            sparse: BTreeMap::new(),
            max_dense_length,
            len,
        }
    }

    pub(crate) fn dense_kind(&self) -> ElementsKind {
        self.dense.elements_kind()
    }

    pub(crate) fn length(&self) -> u32 {
        self.len
    }

    fn take_dense(&mut self) -> ArrayStorage {
        core::mem::take(&mut *self.dense)
    }

    /// Writes into the dense prefix, marking any freshly uncovered gap as
    /// holes so growth never conjures live zero elements.
    fn write_dense(&mut self, index: u32, value: Value) {
        let length = self.dense.length();
        let mut dense = self.take_dense().ensure(index);
        if index > length {
            dense = dense.set_empty_range(length, index - 1);
        }
        *self.dense = dense
            .set(index, value, false)
            .expect("sparse prefix cannot refuse writes");
    }

    pub(crate) fn ensure(mut self, index: u32) -> ArrayStorage {
        if index < self.max_dense_length {
            *self.dense = self.take_dense().ensure(index);
        }
        self.len = self.len.max(index + 1);
        ArrayStorage::Sparse(self)
    }

    pub(crate) fn shrink(mut self, length: u32) -> ArrayStorage {
        self.sparse.split_off(&length);
        if length < self.dense.length() {
            *self.dense = self.take_dense().shrink(length);
        }
        self.len = length.min(self.len);
        ArrayStorage::Sparse(self)
    }

    pub(crate) fn shift_left(&mut self, by: u32) {
        if by == 0 {
            return;
        }
        self.dense.shift_left(by);
        let old = core::mem::take(&mut self.sparse);
        for (key, value) in old {
            if key < by {
                continue;
            }
            let new_key = key - by;
            if new_key < self.max_dense_length {
                // Map entries crossing the ceiling migrate into the prefix.
                self.write_dense(new_key, value);
            } else {
                self.sparse.insert(new_key, value);
            }
        }
        self.len = self.len.saturating_sub(by);
    }

    pub(crate) fn shift_right(mut self, by: u32) -> ArrayStorage {
        if by == 0 {
            return ArrayStorage::Sparse(self);
        }
        // Re-key the map upwards; indices pushed past the valid domain fall
        // off the end of the world.
        let old = core::mem::take(&mut self.sparse);
        for (key, value) in old {
            if let Some(new_key) = key.checked_add(by) {
                if new_key <= MAX_ARRAY_INDEX {
                    self.sparse.insert(new_key, value);
                }
            }
        }
        let dense_len = self.dense.length();
        if by >= MAX_DENSE_LENGTH {
            // The whole prefix crosses the ceiling; it restarts empty.
            for index in 0..dense_len {
                if self.dense.has(index) {
                    if let Some(new_key) = index.checked_add(by) {
                        if new_key <= MAX_ARRAY_INDEX {
                            self.sparse.insert(new_key, self.dense.get_object(index));
                        }
                    }
                }
            }
            *self.dense = self.take_dense().shrink(0);
        } else {
            // Dense elements that would land past the ceiling migrate out.
            let keep = (MAX_DENSE_LENGTH - by).min(dense_len);
            if dense_len > keep {
                for index in keep..dense_len {
                    if self.dense.has(index) {
                        self.sparse.insert(index + by, self.dense.get_object(index));
                    }
                }
                *self.dense = self.take_dense().shrink(keep);
            }
            *self.dense = self.take_dense().shift_right(by);
        }
        self.max_dense_length = MAX_DENSE_LENGTH.max(self.dense.length());
        self.len = self.len.saturating_add(by);
        ArrayStorage::Sparse(self)
    }

    pub(crate) fn get_int(&self, index: u32) -> i32 {
        if index < self.max_dense_length {
            self.dense.get_int(index)
        } else {
            match self.sparse.get(&index) {
                Some(value) => to_int32(to_number(value)),
                None => 0,
            }
        }
    }

    pub(crate) fn get_long(&self, index: u32) -> i64 {
        if index < self.max_dense_length {
            self.dense.get_long(index)
        } else {
            match self.sparse.get(&index) {
                Some(value) => to_number(value) as i64,
                None => 0,
            }
        }
    }

    pub(crate) fn get_double(&self, index: u32) -> f64 {
        if index < self.max_dense_length {
            self.dense.get_double(index)
        } else {
            match self.sparse.get(&index) {
                Some(value) => to_number(value),
                None => f64::NAN,
            }
        }
    }

    pub(crate) fn get_object(&self, index: u32) -> Value {
        if index < self.max_dense_length {
            self.dense.get_object(index)
        } else {
            self.sparse.get(&index).cloned().unwrap_or(Value::Undefined)
        }
    }

    pub(crate) fn set(mut self, index: u32, value: Value, strict: bool) -> JsResult<ArrayStorage> {
        if index < self.max_dense_length {
            let length = self.dense.length();
            let mut dense = self.take_dense().ensure(index);
            if index > length {
                dense = dense.set_empty_range(length, index - 1);
            }
            *self.dense = dense.set(index, value, strict)?;
        } else if value.is_undefined() {
            // Absence from the map is the hole representation.
            self.sparse.remove(&index);
        } else {
            self.sparse.insert(index, value);
        }
        self.len = self.len.max(index + 1);
        Ok(ArrayStorage::Sparse(self))
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
        if index < self.max_dense_length {
            self.dense.has(index)
        } else {
            self.sparse.contains_key(&index)
        }
    }

    pub(crate) fn delete(mut self, index: u32) -> ArrayStorage {
        if index < self.max_dense_length {
            if self.dense.has(index) {
                *self.dense = self.take_dense().delete(index);
            }
        } else {
            self.sparse.remove(&index);
        }
        ArrayStorage::Sparse(self)
    }

    pub(crate) fn delete_range(mut self, from: u32, to: u32) -> ArrayStorage {
        let dense_len = self.dense.length();
        if from < dense_len {
            let dense_to = to.min(dense_len - 1);
            *self.dense = self.take_dense().delete_range(from, dense_to);
        }
        let keys: Vec<u32> = self.sparse.range(from..=to).map(|(&key, _)| key).collect();
        for key in keys {
            self.sparse.remove(&key);
        }
        ArrayStorage::Sparse(self)
    }

    pub(crate) fn set_empty(self, index: u32) -> ArrayStorage {
        self.delete(index)
    }

    pub(crate) fn set_empty_range(self, from: u32, to: u32) -> ArrayStorage {
        self.delete_range(from, to)
    }

    pub(crate) fn pop(mut self) -> (ArrayStorage, Value) {
        if self.len == 0 {
            return (ArrayStorage::Sparse(self), Value::Undefined);
        }
        let index = self.len - 1;
        if index >= self.max_dense_length {
            let value = self.sparse.remove(&index).unwrap_or(Value::Undefined);
            self.len = index;
            (ArrayStorage::Sparse(self), value)
        } else if self.dense.length() == self.len {
            let (dense, value) = self.take_dense().pop();
            *self.dense = dense;
            self.len = index;
            (ArrayStorage::Sparse(self), value)
        } else {
            self.len = index;
            (ArrayStorage::Sparse(self), Value::Undefined)
        }
    }

    pub(crate) fn push(self, values: &[Value]) -> ArrayStorage {
        let mut storage = ArrayStorage::Sparse(self);
        for value in values {
            let index = storage.length();
            if index > MAX_ARRAY_INDEX {
                break;
            }
            storage = storage.ensure(index);
            storage = storage
                .set(index, value.clone(), false)
                .expect("append cannot hit an integrity filter");
        }
        storage
    }

    pub(crate) fn slice(&self, from: u32, to: u32) -> ArrayStorage {
        if to <= self.dense.length() {
            return self.dense.slice(from, to);
        }
        // The range leaves the prefix: rebuild element by element through
        // has/get so holes survive.
        let count = to.saturating_sub(from);
        if count == 0 {
            return ArrayStorage::default();
        }
        let mut storage = ArrayStorage::default()
            .ensure(count - 1)
            .set_empty_range(0, count - 1);
        let mut next = self.next_index(from);
        while let Some(index) = next {
            if index >= to {
                break;
            }
            storage = storage
                .set(index - from, self.get_object(index), false)
                .expect("fresh slice storage cannot refuse writes");
            next = self.next_index(index + 1);
        }
        storage
    }

    pub(crate) fn convert(mut self, kind: ElementsKind) -> ArrayStorage {
        *self.dense = self.take_dense().convert(kind);
        ArrayStorage::Sparse(self)
    }

    pub(crate) fn next_index(&self, from: u32) -> Option<u32> {
        if from < self.dense.length() {
            if let Some(index) = self.dense.next_index(from) {
                return Some(index);
            }
        }
        self.sparse.range(from..).next().map(|(&key, _)| key)
    }
}

impl From<SparseElements> for ArrayStorage {
    fn from(elements: SparseElements) -> ArrayStorage {
        ArrayStorage::Sparse(elements)
    }
}
