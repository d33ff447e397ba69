// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Indexed array storage.
//!
//! An array object exposes a virtual `length` and indexed operations; its
//! physical storage is chosen dynamically and switches representation as
//! scripts write incompatible values, delete elements, or grow the array
//! into huge, mostly-empty sizes. [`Array`] is the owning handle the object
//! model talks to; [`ArrayStorage`] is the representation behind it.

mod array_like_iterator;
mod bit_vector;
#[cfg(feature = "byte-view")]
mod byte_elements;
mod data;
mod hole_filter;
mod int_elements;
mod integrity_filter;
mod iterator_action;
mod long_elements;
mod number_elements;
mod object_elements;
mod sparse_elements;

pub use array_like_iterator::ArrayLikeIterator;
pub use data::{ArrayStorage, ElementsKind};
pub use iterator_action::IteratorAction;

use crate::ecmascript::execution::{ExceptionType, JsError, JsResult};
use crate::ecmascript::types::{MAX_ARRAY_INDEX, PropertyDescriptor, Value};

#[cfg(feature = "byte-view")]
use byte_elements::ByteElements;
use integrity_filter::{FrozenFilter, SealedFilter};

/// The array storage handle: a virtual length plus a storage representation.
///
/// Mutating operations run the representation's move protocol internally —
/// the representation either mutates in place or replaces itself, and the
/// handle always repoints to the returned value. Strict-mode violations
/// surface as catchable [`JsError`]s before anything is mutated, so the
/// handle stays valid across a refused write.
#[derive(Debug, Default)]
pub struct Array {
    storage: ArrayStorage,
}

impl Array {
    /// An empty array; storage starts as a dense int backing.
    pub fn new() -> Array {
        Array {
            storage: ArrayStorage::default(),
        }
    }

    /// A fresh array of `length` whose every slot is a hole, as produced by
    /// `new Array(n)`.
    pub fn with_length(length: u32) -> Array {
        if length == 0 {
            return Array::new();
        }
        let storage = ArrayStorage::default()
            .ensure(length - 1)
            .set_empty_range(0, length - 1);
        Array { storage }
    }

    /// Exposes a fixed-capacity host byte buffer through the array
    /// interface. Only bounded get and set are supported on it.
    #[cfg(feature = "byte-view")]
    pub fn from_byte_buffer(buffer: impl Into<Box<[u8]>>) -> Array {
        Array {
            storage: ArrayStorage::ByteView(ByteElements::from_buffer(buffer.into())),
        }
    }

    pub fn storage(&self) -> &ArrayStorage {
        &self.storage
    }

    fn take_storage(&mut self) -> ArrayStorage {
        core::mem::take(&mut self.storage)
    }

    pub fn length(&self) -> u32 {
        self.storage.length()
    }

    pub fn elements_kind(&self) -> ElementsKind {
        self.storage.elements_kind()
    }

    pub fn is_sparse(&self) -> bool {
        self.storage.is_sparse()
    }

    pub fn is_sealed(&self) -> bool {
        self.storage.is_sealed()
    }

    pub fn is_frozen(&self) -> bool {
        self.storage.is_frozen()
    }

    /// Blocks structural deletion. Idempotent.
    pub fn seal(&mut self) {
        if !self.is_sealed() {
            self.storage = SealedFilter::wrap(self.take_storage());
        }
    }

    /// Blocks deletion and value mutation. A frozen array is also sealed.
    pub fn freeze(&mut self) {
        if !self.is_frozen() {
            self.storage = FrozenFilter::wrap(self.take_storage());
        }
    }

    /// Sets the virtual length. Growth leaves the new positions as holes;
    /// shrinking deletes the tail, clamping above sealed survivors.
    pub fn set_length(&mut self, length: u32) -> JsResult<()> {
        let current = self.length();
        if length == current {
            return Ok(());
        }
        if self.is_frozen() {
            return Err(JsError::new(
                ExceptionType::TypeError,
                "Cannot assign to read only property 'length' of frozen array",
            ));
        }
        if length > current {
            let storage = self.take_storage().ensure(length - 1);
            self.storage = storage.set_empty_range(current, length - 1);
            return Ok(());
        }
        let mut target = length;
        if self.is_sealed() {
            // Sealed elements are non-configurable; the length stops just
            // above the highest one that survives.
            let mut from = length;
            while let Some(index) = self.storage.next_index(from) {
                target = index + 1;
                if index == u32::MAX {
                    break;
                }
                from = index + 1;
            }
        }
        self.storage = self.take_storage().shrink(target);
        Ok(())
    }

    pub fn has(&self, index: u32) -> bool {
        self.storage.has(index)
    }

    pub fn get(&self, index: u32) -> Value {
        self.storage.get_object(index)
    }

    pub fn get_int(&self, index: u32) -> i32 {
        self.storage.get_int(index)
    }

    pub fn get_long(&self, index: u32) -> i64 {
        self.storage.get_long(index)
    }

    pub fn get_double(&self, index: u32) -> f64 {
        self.storage.get_double(index)
    }

    /// Next populated index at or past `from`, used to skip holes during
    /// iteration.
    pub fn next_index(&self, from: u32) -> Option<u32> {
        self.storage.next_index(from)
    }

    fn try_write(
        &mut self,
        index: u32,
        strict: bool,
        write: impl FnOnce(ArrayStorage) -> JsResult<ArrayStorage>,
    ) -> JsResult<()> {
        debug_assert!(index <= MAX_ARRAY_INDEX);
        self.storage.write_guard(index, strict)?;
        let length = self.length();
        if index >= length && self.is_sealed() {
            if strict {
                return Err(JsError::new(
                    ExceptionType::TypeError,
                    format!("Cannot add property {index}, array is not extensible"),
                ));
            }
            return Ok(());
        }
        let mut storage = self.take_storage().ensure(index);
        if index > length {
            // The gap uncovered by the growth is holes, not zeroes.
            storage = storage.set_empty_range(length, index - 1);
        }
        self.storage = write(storage).expect("write guard already checked");
        Ok(())
    }

    pub fn set(&mut self, index: u32, value: Value, strict: bool) -> JsResult<()> {
        self.try_write(index, strict, |storage| storage.set(index, value, strict))
    }

    pub fn set_int(&mut self, index: u32, value: i32, strict: bool) -> JsResult<()> {
        self.try_write(index, strict, |storage| storage.set_int(index, value, strict))
    }

    pub fn set_long(&mut self, index: u32, value: i64, strict: bool) -> JsResult<()> {
        self.try_write(index, strict, |storage| storage.set_long(index, value, strict))
    }

    pub fn set_double(&mut self, index: u32, value: f64, strict: bool) -> JsResult<()> {
        self.try_write(index, strict, |storage| {
            storage.set_double(index, value, strict)
        })
    }

    /// Deletes the element at `index`. Returns false when the deletion is
    /// refused in non-strict mode; strict refusal raises a type error.
    pub fn delete(&mut self, index: u32, strict: bool) -> JsResult<bool> {
        if !self.has(index) {
            return Ok(true);
        }
        if !self.storage.can_delete(index, strict)? {
            return Ok(false);
        }
        self.storage = self.take_storage().delete(index);
        Ok(true)
    }

    /// Deletes the inclusive index range `[from, to]`.
    pub fn delete_range(&mut self, from: u32, to: u32, strict: bool) -> JsResult<bool> {
        let length = self.length();
        if length == 0 || from >= length || from > to {
            return Ok(true);
        }
        let to = to.min(length - 1);
        if !self.storage.can_delete(from, strict)? {
            return Ok(false);
        }
        self.storage = self.take_storage().delete_range(from, to);
        Ok(true)
    }

    /// Marks `index` as a hole without touching the length.
    pub fn set_empty(&mut self, index: u32) {
        if index < self.length() {
            self.storage = self.take_storage().set_empty(index);
        }
    }

    /// Marks the inclusive range `[from, to]` as holes.
    pub fn set_empty_range(&mut self, from: u32, to: u32) {
        let length = self.length();
        if length == 0 || from >= length || from > to {
            return;
        }
        let to = to.min(length - 1);
        self.storage = self.take_storage().set_empty_range(from, to);
    }

    fn structural_guard(&self) -> JsResult<()> {
        if self.is_frozen() {
            return Err(JsError::new(
                ExceptionType::TypeError,
                "Cannot modify elements of frozen array",
            ));
        }
        if self.is_sealed() {
            return Err(JsError::new(
                ExceptionType::TypeError,
                "Cannot add or delete elements of sealed array",
            ));
        }
        Ok(())
    }

    /// Appends values, converting the backing once to the widest kind the
    /// arguments need. Returns the new length.
    pub fn push(&mut self, values: &[Value]) -> JsResult<u32> {
        if self.is_sealed() {
            return Err(JsError::new(
                ExceptionType::TypeError,
                format!(
                    "Cannot add property {}, array is not extensible",
                    self.length()
                ),
            ));
        }
        self.storage = self.take_storage().push(values);
        Ok(self.length())
    }

    /// Removes and returns the last element; `undefined` on an empty array.
    pub fn pop(&mut self) -> JsResult<Value> {
        if self.length() == 0 {
            return Ok(Value::Undefined);
        }
        if self.is_frozen() {
            return Err(JsError::new(
                ExceptionType::TypeError,
                "Cannot assign to read only property 'length' of frozen array",
            ));
        }
        if self.is_sealed() {
            return Err(JsError::new(
                ExceptionType::TypeError,
                format!("Cannot delete property {} of sealed array", self.length() - 1),
            ));
        }
        let (storage, value) = self.take_storage().pop();
        self.storage = storage;
        Ok(value)
    }

    /// Physical shift towards index 0, used by `shift()`.
    pub fn shift_left(&mut self, by: u32) -> JsResult<()> {
        if by == 0 {
            return Ok(());
        }
        self.structural_guard()?;
        self.storage.shift_left(by);
        Ok(())
    }

    /// Physical shift away from index 0, used by `unshift()`.
    pub fn shift_right(&mut self, by: u32) -> JsResult<()> {
        if by == 0 {
            return Ok(());
        }
        self.structural_guard()?;
        self.storage = self.take_storage().shift_right(by);
        Ok(())
    }

    /// Copies the half-open range `[from, to)` into a fresh array of the
    /// same kind, holes included. Negative-offset arithmetic happens in the
    /// caller before this layer.
    pub fn slice(&self, from: u32, to: u32) -> Array {
        Array {
            storage: self.storage.slice(from, to),
        }
    }

    /// Explicitly widens the backing; narrowing is an engine bug.
    pub fn convert(&mut self, kind: ElementsKind) {
        self.storage = self.take_storage().convert(kind);
    }

    /// Descriptor query for the property model. Ordinary backings report
    /// fully-permissive flags; sealed drops configurability, frozen also
    /// drops writability.
    pub fn own_element_descriptor(&self, index: u32) -> Option<PropertyDescriptor> {
        if !self.has(index) {
            return None;
        }
        let mut descriptor = PropertyDescriptor::new_data_descriptor(self.get(index));
        if self.is_sealed() {
            descriptor.configurable = Some(false);
        }
        if self.is_frozen() {
            descriptor.writable = Some(false);
        }
        Some(descriptor)
    }
}

impl FromIterator<Value> for Array {
    fn from_iter<T: IntoIterator<Item = Value>>(iter: T) -> Array {
        let values: Vec<Value> = iter.into_iter().collect();
        Array {
            storage: ArrayStorage::default().push(&values),
        }
    }
}
