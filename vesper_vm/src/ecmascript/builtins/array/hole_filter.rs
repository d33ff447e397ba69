// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::ecmascript::execution::JsResult;
use crate::ecmascript::types::Value;

use super::bit_vector::BitVector;
use super::data::{ArrayStorage, ElementsKind};

/// Hole tracking over a single contiguous deleted range `[lo, hi]`.
///
/// This is the cheap default: most deletions are one index or one run, and
/// adjacent deletions extend the range in place. A deletion that would
/// create a second, disjoint hole escalates to the per-index
/// [`HoleSetFilter`]. Overwriting the last remaining hole dissolves the
/// filter back to its inner representation.
///
/// An empty range (`lo > hi`) is a transient state left behind by shifts;
/// every predicate treats it as "no holes" and the next structural
/// operation normalizes it away.
#[derive(Debug)]
pub struct HoleRangeFilter {
    inner: Box<ArrayStorage>,
    lo: u32,
    hi: u32,
}

impl HoleRangeFilter {
    /// Marks `[lo, hi]` as holes over `inner`, merging into an existing
    /// hole filter instead of nesting.
    pub(crate) fn wrap(inner: ArrayStorage, lo: u32, hi: u32) -> ArrayStorage {
        match inner {
            ArrayStorage::HoleRange(filter) => filter.delete_range(lo, hi),
            ArrayStorage::HoleSet(filter) => filter.delete_range(lo, hi),
            inner => {
                debug_assert!(lo <= hi && hi < inner.length());
                ArrayStorage::HoleRange(HoleRangeFilter {
                    inner: Box::new(inner),
                    lo,
                    hi,
                })
            }
        }
    }

    pub(crate) fn inner(&self) -> &ArrayStorage {
        &self.inner
    }

    fn take_inner(&mut self) -> ArrayStorage {
        core::mem::take(&mut *self.inner)
    }

    fn into_inner(self) -> ArrayStorage {
        *self.inner
    }

    fn in_range(&self, index: u32) -> bool {
        (self.lo..=self.hi).contains(&index)
    }

    /// Trades the range for a per-index bitmap.
    fn escalate(self) -> ArrayStorage {
        let mut deleted = BitVector::new();
        if self.lo <= self.hi {
            deleted.set_range(self.lo, self.hi);
        }
        ArrayStorage::HoleSet(HoleSetFilter {
            inner: self.inner,
            deleted,
        })
    }

    /// Clears the hole flag at `index`, which must lie inside the range.
    /// The returned storage is ready for the actual write; boundary holes
    /// shrink the range, the last hole dissolves the filter, and a middle
    /// hole escalates.
    fn unhole(mut self, index: u32) -> ArrayStorage {
        debug_assert!(self.in_range(index));
        if self.lo == self.hi {
            return self.into_inner();
        }
        if index == self.lo {
            self.lo += 1;
            ArrayStorage::HoleRange(self)
        } else if index == self.hi {
            self.hi -= 1;
            ArrayStorage::HoleRange(self)
        } else {
            self.escalate()
        }
    }

    pub(crate) fn length(&self) -> u32 {
        self.inner.length()
    }

    pub(crate) fn ensure(mut self, index: u32) -> ArrayStorage {
        *self.inner = self.take_inner().ensure(index);
        ArrayStorage::HoleRange(self)
    }

    pub(crate) fn shrink(mut self, length: u32) -> ArrayStorage {
        *self.inner = self.take_inner().shrink(length);
        if self.lo >= length || self.lo > self.hi {
            // Every hole fell off the end.
            return self.into_inner();
        }
        self.hi = self.hi.min(length - 1);
        ArrayStorage::HoleRange(self)
    }

    pub(crate) fn shift_left(&mut self, by: u32) {
        self.inner.shift_left(by);
        if by == 0 || self.lo > self.hi {
            return;
        }
        if self.hi < by {
            // The whole range shifted out; leave the transient empty state.
            self.lo = 1;
            self.hi = 0;
        } else {
            self.hi -= by;
            self.lo = self.lo.saturating_sub(by);
        }
    }

    pub(crate) fn shift_right(mut self, by: u32) -> ArrayStorage {
        *self.inner = self.take_inner().shift_right(by);
        if self.lo <= self.hi {
            self.lo = self.lo.saturating_add(by);
            self.hi = self.hi.saturating_add(by);
        }
        ArrayStorage::HoleRange(self)
    }

    pub(crate) fn get_int(&self, index: u32) -> i32 {
        if self.in_range(index) { 0 } else { self.inner.get_int(index) }
    }

    pub(crate) fn get_long(&self, index: u32) -> i64 {
        if self.in_range(index) { 0 } else { self.inner.get_long(index) }
    }

    pub(crate) fn get_double(&self, index: u32) -> f64 {
        if self.in_range(index) {
            f64::NAN
        } else {
            self.inner.get_double(index)
        }
    }

    pub(crate) fn get_object(&self, index: u32) -> Value {
        if self.in_range(index) {
            Value::Undefined
        } else {
            self.inner.get_object(index)
        }
    }

    pub(crate) fn set(mut self, index: u32, value: Value, strict: bool) -> JsResult<ArrayStorage> {
        if value.is_undefined() && self.inner.elements_kind() != ElementsKind::Object {
            return Ok(self.delete(index));
        }
        if self.in_range(index) {
            return self.unhole(index).set(index, value, strict);
        }
        if self.lo > self.hi {
            return self.into_inner().set(index, value, strict);
        }
        *self.inner = self.take_inner().set(index, value, strict)?;
        Ok(ArrayStorage::HoleRange(self))
    }

    pub(crate) fn set_int(mut self, index: u32, value: i32, strict: bool) -> JsResult<ArrayStorage> {
        if self.in_range(index) {
            return self.unhole(index).set_int(index, value, strict);
        }
        if self.lo > self.hi {
            return self.into_inner().set_int(index, value, strict);
        }
        *self.inner = self.take_inner().set_int(index, value, strict)?;
        Ok(ArrayStorage::HoleRange(self))
    }

    pub(crate) fn set_long(mut self, index: u32, value: i64, strict: bool) -> JsResult<ArrayStorage> {
        if self.in_range(index) {
            return self.unhole(index).set_long(index, value, strict);
        }
        if self.lo > self.hi {
            return self.into_inner().set_long(index, value, strict);
        }
        *self.inner = self.take_inner().set_long(index, value, strict)?;
        Ok(ArrayStorage::HoleRange(self))
    }

    pub(crate) fn set_double(mut self, index: u32, value: f64, strict: bool) -> JsResult<ArrayStorage> {
        if self.in_range(index) {
            return self.unhole(index).set_double(index, value, strict);
        }
        if self.lo > self.hi {
            return self.into_inner().set_double(index, value, strict);
        }
        *self.inner = self.take_inner().set_double(index, value, strict)?;
        Ok(ArrayStorage::HoleRange(self))
    }

    pub(crate) fn has(&self, index: u32) -> bool {
        !self.in_range(index) && self.inner.has(index)
    }

    pub(crate) fn delete(mut self, index: u32) -> ArrayStorage {
        if self.lo > self.hi {
            self.lo = index;
            self.hi = index;
            return ArrayStorage::HoleRange(self);
        }
        if self.in_range(index) {
            return ArrayStorage::HoleRange(self);
        }
        if index + 1 == self.lo {
            self.lo = index;
            ArrayStorage::HoleRange(self)
        } else if index == self.hi + 1 {
            self.hi = index;
            ArrayStorage::HoleRange(self)
        } else {
            self.escalate().delete(index)
        }
    }

    pub(crate) fn delete_range(mut self, from: u32, to: u32) -> ArrayStorage {
        debug_assert!(from <= to);
        if self.lo > self.hi {
            self.lo = from;
            self.hi = to;
            return ArrayStorage::HoleRange(self);
        }
        if from <= self.hi.saturating_add(1) && to.saturating_add(1) >= self.lo {
            self.lo = self.lo.min(from);
            self.hi = self.hi.max(to);
            ArrayStorage::HoleRange(self)
        } else {
            self.escalate().delete_range(from, to)
        }
    }

    pub(crate) fn set_empty(self, index: u32) -> ArrayStorage {
        self.delete(index)
    }

    pub(crate) fn set_empty_range(self, from: u32, to: u32) -> ArrayStorage {
        self.delete_range(from, to)
    }

    pub(crate) fn pop(mut self) -> (ArrayStorage, Value) {
        let length = self.inner.length();
        if length == 0 {
            return (ArrayStorage::HoleRange(self), Value::Undefined);
        }
        let last = length - 1;
        if self.in_range(last) {
            // Popping a hole shortens the array without producing a value.
            *self.inner = self.take_inner().shrink(last);
            if self.lo == self.hi {
                return (self.into_inner(), Value::Undefined);
            }
            self.hi -= 1;
            (ArrayStorage::HoleRange(self), Value::Undefined)
        } else {
            let (inner, value) = self.take_inner().pop();
            *self.inner = inner;
            (ArrayStorage::HoleRange(self), value)
        }
    }

    pub(crate) fn push(mut self, values: &[Value]) -> ArrayStorage {
        *self.inner = self.take_inner().push(values);
        ArrayStorage::HoleRange(self)
    }

    pub(crate) fn slice(&self, from: u32, to: u32) -> ArrayStorage {
        let sliced = self.inner.slice(from, to);
        if self.lo > self.hi || to == 0 {
            return sliced;
        }
        let lo = self.lo.max(from);
        let hi = self.hi.min(to - 1);
        if lo > hi {
            return sliced;
        }
        HoleRangeFilter::wrap(sliced, lo - from, hi - from)
    }

    pub(crate) fn convert(mut self, kind: ElementsKind) -> ArrayStorage {
        *self.inner = self.take_inner().convert(kind);
        ArrayStorage::HoleRange(self)
    }

    pub(crate) fn next_index(&self, from: u32) -> Option<u32> {
        let mut candidate = self.inner.next_index(from);
        while let Some(index) = candidate {
            if !self.in_range(index) {
                return Some(index);
            }
            // Jump straight past the hole range instead of scanning it.
            candidate = self.inner.next_index(self.hi + 1);
        }
        None
    }
}

/// Hole tracking with a bit per index, the escalation target of
/// [`HoleRangeFilter`]. Once escalated, storage stays on the bitmap until
/// shrinking clears the last hole.
#[derive(Debug)]
pub struct HoleSetFilter {
    inner: Box<ArrayStorage>,
    deleted: BitVector,
}

impl HoleSetFilter {
    pub(crate) fn inner(&self) -> &ArrayStorage {
        &self.inner
    }

    fn take_inner(&mut self) -> ArrayStorage {
        core::mem::take(&mut *self.inner)
    }

    fn into_inner(self) -> ArrayStorage {
        *self.inner
    }

    /// Marks `deleted` over `inner`, merging into existing hole state
    /// instead of nesting filters.
    fn wrap_bits(inner: ArrayStorage, mut deleted: BitVector) -> ArrayStorage {
        if !deleted.any() {
            return inner;
        }
        match inner {
            ArrayStorage::HoleSet(mut filter) => {
                filter.deleted.union(&deleted);
                ArrayStorage::HoleSet(filter)
            }
            ArrayStorage::HoleRange(filter) => {
                if filter.lo <= filter.hi {
                    deleted.set_range(filter.lo, filter.hi);
                }
                HoleSetFilter::wrap_bits(*filter.inner, deleted)
            }
            inner => ArrayStorage::HoleSet(HoleSetFilter {
                inner: Box::new(inner),
                deleted,
            }),
        }
    }

    pub(crate) fn length(&self) -> u32 {
        self.inner.length()
    }

    pub(crate) fn ensure(mut self, index: u32) -> ArrayStorage {
        *self.inner = self.take_inner().ensure(index);
        ArrayStorage::HoleSet(self)
    }

    pub(crate) fn shrink(mut self, length: u32) -> ArrayStorage {
        *self.inner = self.take_inner().shrink(length);
        self.deleted.clear_from(length);
        if !self.deleted.any() {
            return self.into_inner();
        }
        ArrayStorage::HoleSet(self)
    }

    pub(crate) fn shift_left(&mut self, by: u32) {
        self.inner.shift_left(by);
        self.deleted.shift_left(by);
    }

    pub(crate) fn shift_right(mut self, by: u32) -> ArrayStorage {
        *self.inner = self.take_inner().shift_right(by);
        self.deleted.shift_right(by);
        ArrayStorage::HoleSet(self)
    }

    pub(crate) fn get_int(&self, index: u32) -> i32 {
        if self.deleted.test(index) {
            0
        } else {
            self.inner.get_int(index)
        }
    }

    pub(crate) fn get_long(&self, index: u32) -> i64 {
        if self.deleted.test(index) {
            0
        } else {
            self.inner.get_long(index)
        }
    }

    pub(crate) fn get_double(&self, index: u32) -> f64 {
        if self.deleted.test(index) {
            f64::NAN
        } else {
            self.inner.get_double(index)
        }
    }

    pub(crate) fn get_object(&self, index: u32) -> Value {
        if self.deleted.test(index) {
            Value::Undefined
        } else {
            self.inner.get_object(index)
        }
    }

    pub(crate) fn set(mut self, index: u32, value: Value, strict: bool) -> JsResult<ArrayStorage> {
        if value.is_undefined() && self.inner.elements_kind() != ElementsKind::Object {
            self.deleted.set(index);
            return Ok(ArrayStorage::HoleSet(self));
        }
        self.deleted.clear(index);
        *self.inner = self.take_inner().set(index, value, strict)?;
        Ok(ArrayStorage::HoleSet(self))
    }

    pub(crate) fn set_int(mut self, index: u32, value: i32, strict: bool) -> JsResult<ArrayStorage> {
        self.deleted.clear(index);
        *self.inner = self.take_inner().set_int(index, value, strict)?;
        Ok(ArrayStorage::HoleSet(self))
    }

    pub(crate) fn set_long(mut self, index: u32, value: i64, strict: bool) -> JsResult<ArrayStorage> {
        self.deleted.clear(index);
        *self.inner = self.take_inner().set_long(index, value, strict)?;
        Ok(ArrayStorage::HoleSet(self))
    }

    pub(crate) fn set_double(mut self, index: u32, value: f64, strict: bool) -> JsResult<ArrayStorage> {
        self.deleted.clear(index);
        *self.inner = self.take_inner().set_double(index, value, strict)?;
        Ok(ArrayStorage::HoleSet(self))
    }

    pub(crate) fn has(&self, index: u32) -> bool {
        !self.deleted.test(index) && self.inner.has(index)
    }

    pub(crate) fn delete(mut self, index: u32) -> ArrayStorage {
        self.deleted.set(index);
        ArrayStorage::HoleSet(self)
    }

    pub(crate) fn delete_range(mut self, from: u32, to: u32) -> ArrayStorage {
        debug_assert!(from <= to);
        self.deleted.set_range(from, to);
        ArrayStorage::HoleSet(self)
    }

    pub(crate) fn set_empty(self, index: u32) -> ArrayStorage {
        self.delete(index)
    }

    pub(crate) fn set_empty_range(self, from: u32, to: u32) -> ArrayStorage {
        self.delete_range(from, to)
    }

    pub(crate) fn pop(mut self) -> (ArrayStorage, Value) {
        let length = self.inner.length();
        if length == 0 {
            return (ArrayStorage::HoleSet(self), Value::Undefined);
        }
        let last = length - 1;
        if self.deleted.test(last) {
            self.deleted.clear(last);
            *self.inner = self.take_inner().shrink(last);
            if !self.deleted.any() {
                return (self.into_inner(), Value::Undefined);
            }
            (ArrayStorage::HoleSet(self), Value::Undefined)
        } else {
            let (inner, value) = self.take_inner().pop();
            *self.inner = inner;
            (ArrayStorage::HoleSet(self), value)
        }
    }

    pub(crate) fn push(mut self, values: &[Value]) -> ArrayStorage {
        *self.inner = self.take_inner().push(values);
        ArrayStorage::HoleSet(self)
    }

    pub(crate) fn slice(&self, from: u32, to: u32) -> ArrayStorage {
        let sliced = self.inner.slice(from, to);
        let bits = self.deleted.slice(from, to.min(self.inner.length()));
        HoleSetFilter::wrap_bits(sliced, bits)
    }

    pub(crate) fn convert(mut self, kind: ElementsKind) -> ArrayStorage {
        *self.inner = self.take_inner().convert(kind);
        ArrayStorage::HoleSet(self)
    }

    pub(crate) fn next_index(&self, from: u32) -> Option<u32> {
        let mut candidate = self.inner.next_index(from);
        while let Some(index) = candidate {
            if !self.deleted.test(index) {
                return Some(index);
            }
            candidate = self.inner.next_index(index + 1);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::super::data::ArrayStorage;
    use crate::ecmascript::types::Value;

    fn dense_ints(values: &[i32]) -> ArrayStorage {
        let mut storage = ArrayStorage::default();
        for (index, &value) in values.iter().enumerate() {
            storage = storage.ensure(index as u32);
            storage = storage.set_int(index as u32, value, false).unwrap();
        }
        storage
    }

    #[test]
    fn first_delete_creates_a_range() {
        let storage = dense_ints(&[1, 2, 3, 4, 5]).delete(1);
        assert!(matches!(storage, ArrayStorage::HoleRange(_)));
        assert!(!storage.has(1));
        assert_eq!(storage.get_object(1), Value::Undefined);
        assert_eq!(storage.length(), 5);
        assert_eq!(storage.get_int(2), 3);
    }

    #[test]
    fn adjacent_deletes_extend_the_range() {
        let storage = dense_ints(&[1, 2, 3, 4, 5]).delete(2).delete(1).delete(3);
        assert!(matches!(storage, ArrayStorage::HoleRange(_)));
        assert!(storage.has(0) && storage.has(4));
        assert!(!storage.has(1) && !storage.has(2) && !storage.has(3));
    }

    #[test]
    fn disjoint_delete_escalates_to_bitmap() {
        let storage = dense_ints(&[1, 2, 3, 4, 5]).delete(1).delete(3);
        assert!(matches!(storage, ArrayStorage::HoleSet(_)));
        assert!(!storage.has(1) && !storage.has(3));
        assert!(storage.has(0) && storage.has(2) && storage.has(4));
    }

    #[test]
    fn overwriting_the_last_hole_dissolves_the_filter() {
        let storage = dense_ints(&[1, 2, 3]).delete(1);
        let storage = storage.set_int(1, 9, false).unwrap();
        assert!(matches!(storage, ArrayStorage::Int(_)));
        assert_eq!(storage.get_int(1), 9);
        assert!(storage.has(1));
    }

    #[test]
    fn middle_write_escalates_then_reads_back() {
        let storage = dense_ints(&[0, 1, 2, 3, 4, 5]).delete_range(1, 4);
        let storage = storage.set_int(2, 7, false).unwrap();
        assert!(matches!(storage, ArrayStorage::HoleSet(_)));
        assert!(storage.has(2));
        assert_eq!(storage.get_int(2), 7);
        assert!(!storage.has(1) && !storage.has(3) && !storage.has(4));
    }

    #[test]
    fn popping_holes_shortens_without_values() {
        let (storage, value) = dense_ints(&[1, 2, 3]).delete(2).pop();
        assert_eq!(value, Value::Undefined);
        assert_eq!(storage.length(), 2);
        // The filter dissolved; the remaining elements are intact.
        assert!(matches!(storage, ArrayStorage::Int(_)));
        let (storage, value) = storage.pop();
        assert_eq!(value, Value::from(2));
        assert_eq!(storage.length(), 1);
    }

    #[test]
    fn next_index_skips_the_hole_run() {
        let storage = dense_ints(&[0, 1, 2, 3, 4, 5]).delete_range(1, 3);
        assert_eq!(storage.next_index(0), Some(0));
        assert_eq!(storage.next_index(1), Some(4));
        assert_eq!(storage.next_index(5), Some(5));
        assert_eq!(storage.next_index(6), None);
    }

    #[test]
    fn undefined_write_marks_a_hole_on_numeric_backings() {
        let storage = dense_ints(&[1, 2, 3]).delete(0);
        let storage = storage.set(1, Value::Undefined, false).unwrap();
        assert!(!storage.has(1));
        assert_eq!(storage.get_object(1), Value::Undefined);
        assert!(storage.has(2));
    }
}
