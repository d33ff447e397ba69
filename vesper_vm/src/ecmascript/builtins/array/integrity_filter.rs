// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::ecmascript::execution::{ExceptionType, JsError, JsResult};
use crate::ecmascript::types::Value;

use super::data::{ArrayStorage, ElementsKind};

/// Seal filter: deletion is refused, everything else passes through. The
/// strict/non-strict split of the refusal lives in
/// [`ArrayStorage::can_delete`]; the mutation entry points here are benign
/// no-ops for callers that skipped the guard.
#[derive(Debug)]
pub struct SealedFilter {
    inner: Box<ArrayStorage>,
}

impl SealedFilter {
    pub(crate) fn wrap(inner: ArrayStorage) -> ArrayStorage {
        ArrayStorage::Sealed(SealedFilter {
            inner: Box::new(inner),
        })
    }

    pub(crate) fn inner(&self) -> &ArrayStorage {
        &self.inner
    }

    fn take_inner(&mut self) -> ArrayStorage {
        core::mem::take(&mut *self.inner)
    }

    pub(crate) fn length(&self) -> u32 {
        self.inner.length()
    }

    pub(crate) fn ensure(mut self, index: u32) -> ArrayStorage {
        *self.inner = self.take_inner().ensure(index);
        ArrayStorage::Sealed(self)
    }

    pub(crate) fn shrink(mut self, length: u32) -> ArrayStorage {
        *self.inner = self.take_inner().shrink(length);
        ArrayStorage::Sealed(self)
    }

    pub(crate) fn shift_left(&mut self, by: u32) {
        self.inner.shift_left(by);
    }

    pub(crate) fn shift_right(mut self, by: u32) -> ArrayStorage {
        *self.inner = self.take_inner().shift_right(by);
        ArrayStorage::Sealed(self)
    }

    pub(crate) fn get_int(&self, index: u32) -> i32 {
        self.inner.get_int(index)
    }

    pub(crate) fn get_long(&self, index: u32) -> i64 {
        self.inner.get_long(index)
    }

    pub(crate) fn get_double(&self, index: u32) -> f64 {
        self.inner.get_double(index)
    }

    pub(crate) fn get_object(&self, index: u32) -> Value {
        self.inner.get_object(index)
    }

    pub(crate) fn set(mut self, index: u32, value: Value, strict: bool) -> JsResult<ArrayStorage> {
        *self.inner = self.take_inner().set(index, value, strict)?;
        Ok(ArrayStorage::Sealed(self))
    }

    pub(crate) fn set_int(mut self, index: u32, value: i32, strict: bool) -> JsResult<ArrayStorage> {
        *self.inner = self.take_inner().set_int(index, value, strict)?;
        Ok(ArrayStorage::Sealed(self))
    }

    pub(crate) fn set_long(mut self, index: u32, value: i64, strict: bool) -> JsResult<ArrayStorage> {
        *self.inner = self.take_inner().set_long(index, value, strict)?;
        Ok(ArrayStorage::Sealed(self))
    }

    pub(crate) fn set_double(
        mut self,
        index: u32,
        value: f64,
        strict: bool,
    ) -> JsResult<ArrayStorage> {
        *self.inner = self.take_inner().set_double(index, value, strict)?;
        Ok(ArrayStorage::Sealed(self))
    }

    pub(crate) fn has(&self, index: u32) -> bool {
        self.inner.has(index)
    }

    pub(crate) fn delete(self, _index: u32) -> ArrayStorage {
        ArrayStorage::Sealed(self)
    }

    pub(crate) fn delete_range(self, _from: u32, _to: u32) -> ArrayStorage {
        ArrayStorage::Sealed(self)
    }

    pub(crate) fn set_empty(mut self, index: u32) -> ArrayStorage {
        *self.inner = self.take_inner().set_empty(index);
        ArrayStorage::Sealed(self)
    }

    pub(crate) fn set_empty_range(mut self, from: u32, to: u32) -> ArrayStorage {
        *self.inner = self.take_inner().set_empty_range(from, to);
        ArrayStorage::Sealed(self)
    }

    pub(crate) fn pop(mut self) -> (ArrayStorage, Value) {
        let (inner, value) = self.take_inner().pop();
        *self.inner = inner;
        (ArrayStorage::Sealed(self), value)
    }

    pub(crate) fn push(mut self, values: &[Value]) -> ArrayStorage {
        *self.inner = self.take_inner().push(values);
        ArrayStorage::Sealed(self)
    }

    pub(crate) fn slice(&self, from: u32, to: u32) -> ArrayStorage {
        // The slice is a fresh ordinary array; integrity does not transfer.
        self.inner.slice(from, to)
    }

    pub(crate) fn convert(mut self, kind: ElementsKind) -> ArrayStorage {
        *self.inner = self.take_inner().convert(kind);
        ArrayStorage::Sealed(self)
    }

    pub(crate) fn next_index(&self, from: u32) -> Option<u32> {
        self.inner.next_index(from)
    }
}

/// Freeze filter: deletion and every value-changing write are refused. In
/// strict mode the refusal is a type error naming the index; otherwise the
/// write is silently ignored. A frozen array is also sealed.
#[derive(Debug)]
pub struct FrozenFilter {
    inner: Box<ArrayStorage>,
}

impl FrozenFilter {
    pub(crate) fn wrap(inner: ArrayStorage) -> ArrayStorage {
        ArrayStorage::Frozen(FrozenFilter {
            inner: Box::new(inner),
        })
    }

    pub(crate) fn inner(&self) -> &ArrayStorage {
        &self.inner
    }

    fn refuse_write(&self, index: u32, strict: bool) -> JsResult<()> {
        if strict {
            Err(JsError::new(
                ExceptionType::TypeError,
                format!("Cannot assign to read only property {index} of frozen array"),
            ))
        } else {
            Ok(())
        }
    }

    pub(crate) fn length(&self) -> u32 {
        self.inner.length()
    }

    /// Growth would make the frozen length observable; refuse quietly.
    pub(crate) fn ensure(self, _index: u32) -> ArrayStorage {
        ArrayStorage::Frozen(self)
    }

    pub(crate) fn shrink(self, _length: u32) -> ArrayStorage {
        ArrayStorage::Frozen(self)
    }

    pub(crate) fn shift_left(&mut self, _by: u32) {}

    pub(crate) fn shift_right(self, _by: u32) -> ArrayStorage {
        ArrayStorage::Frozen(self)
    }

    pub(crate) fn get_int(&self, index: u32) -> i32 {
        self.inner.get_int(index)
    }

    pub(crate) fn get_long(&self, index: u32) -> i64 {
        self.inner.get_long(index)
    }

    pub(crate) fn get_double(&self, index: u32) -> f64 {
        self.inner.get_double(index)
    }

    pub(crate) fn get_object(&self, index: u32) -> Value {
        self.inner.get_object(index)
    }

    pub(crate) fn set(self, index: u32, _value: Value, strict: bool) -> JsResult<ArrayStorage> {
        self.refuse_write(index, strict)?;
        Ok(ArrayStorage::Frozen(self))
    }

    pub(crate) fn set_int(self, index: u32, _value: i32, strict: bool) -> JsResult<ArrayStorage> {
        self.refuse_write(index, strict)?;
        Ok(ArrayStorage::Frozen(self))
    }

    pub(crate) fn set_long(self, index: u32, _value: i64, strict: bool) -> JsResult<ArrayStorage> {
        self.refuse_write(index, strict)?;
        Ok(ArrayStorage::Frozen(self))
    }

    pub(crate) fn set_double(self, index: u32, _value: f64, strict: bool) -> JsResult<ArrayStorage> {
        self.refuse_write(index, strict)?;
        Ok(ArrayStorage::Frozen(self))
    }

    pub(crate) fn has(&self, index: u32) -> bool {
        self.inner.has(index)
    }

    pub(crate) fn delete(self, _index: u32) -> ArrayStorage {
        ArrayStorage::Frozen(self)
    }

    pub(crate) fn delete_range(self, _from: u32, _to: u32) -> ArrayStorage {
        ArrayStorage::Frozen(self)
    }

    pub(crate) fn set_empty(self, _index: u32) -> ArrayStorage {
        ArrayStorage::Frozen(self)
    }

    pub(crate) fn set_empty_range(self, _from: u32, _to: u32) -> ArrayStorage {
        ArrayStorage::Frozen(self)
    }

    pub(crate) fn pop(self) -> (ArrayStorage, Value) {
        (ArrayStorage::Frozen(self), Value::Undefined)
    }

    pub(crate) fn push(self, _values: &[Value]) -> ArrayStorage {
        ArrayStorage::Frozen(self)
    }

    pub(crate) fn slice(&self, from: u32, to: u32) -> ArrayStorage {
        self.inner.slice(from, to)
    }

    pub(crate) fn convert(mut self, kind: ElementsKind) -> ArrayStorage {
        // Kind is internal representation, not an observable mutation.
        *self.inner = core::mem::take(&mut *self.inner).convert(kind);
        ArrayStorage::Frozen(self)
    }

    pub(crate) fn next_index(&self, from: u32) -> Option<u32> {
        self.inner.next_index(from)
    }
}
