// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use core::cell::RefCell;
use std::rc::Rc;

use crate::ecmascript::builtins::Array;
use crate::ecmascript::types::{ArrayLikeObject, Value};

/// A cursor over an array-like source.
///
/// The variant is selected once, at construction, by inspecting the
/// source's concrete kind; anything that is not array-like gets the empty
/// cursor. Length and elements are re-resolved from the live source on
/// every step, so a callback that mutates the source mid-iteration —
/// growing it, deleting from it, or forcing a representation change — is
/// visible to subsequent steps while the cursor's own position survives.
#[derive(Debug)]
pub struct ArrayLikeIterator {
    source: IteratorSource,
    index: i64,
    reverse: bool,
    include_undefined: bool,
}

enum IteratorSource {
    /// A native array-backed object.
    Elements(Rc<RefCell<Array>>),
    /// A foreign object exposing the `length` + indexed-get contract.
    Foreign(Rc<RefCell<dyn ArrayLikeObject>>),
    /// A host list.
    List(Rc<RefCell<Vec<Value>>>),
    /// A host array.
    HostArray(Rc<[Value]>),
    Empty,
}

impl core::fmt::Debug for IteratorSource {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            IteratorSource::Elements(_) => write!(f, "Elements(..)"),
            IteratorSource::Foreign(_) => write!(f, "Foreign(..)"),
            IteratorSource::List(_) => write!(f, "List(..)"),
            IteratorSource::HostArray(_) => write!(f, "HostArray(..)"),
            IteratorSource::Empty => write!(f, "Empty"),
        }
    }
}

impl ArrayLikeIterator {
    /// Forward cursor over `source`, visiting `0..length`.
    pub fn array_like_iterator(source: &Value, include_undefined: bool) -> ArrayLikeIterator {
        ArrayLikeIterator {
            source: IteratorSource::classify(source),
            index: 0,
            reverse: false,
            include_undefined,
        }
    }

    /// Reverse cursor over `source`, visiting `length-1..=0`.
    pub fn reverse_array_like_iterator(
        source: &Value,
        include_undefined: bool,
    ) -> ArrayLikeIterator {
        let source = IteratorSource::classify(source);
        let index = i64::from(source.length()) - 1;
        ArrayLikeIterator {
            source,
            index,
            reverse: true,
            include_undefined,
        }
    }

    /// Live length of the underlying source.
    pub fn length(&self) -> u32 {
        self.source.length()
    }

    pub fn is_reverse(&self) -> bool {
        self.reverse
    }
}

impl IteratorSource {
    fn classify(value: &Value) -> IteratorSource {
        match value {
            Value::Array(array) => IteratorSource::Elements(array.clone()),
            Value::ArrayLike(source) => IteratorSource::Foreign(source.clone()),
            Value::List(list) => IteratorSource::List(list.clone()),
            Value::HostArray(values) => IteratorSource::HostArray(values.clone()),
            _ => IteratorSource::Empty,
        }
    }

    fn length(&self) -> u32 {
        match self {
            IteratorSource::Elements(array) => array.borrow().length(),
            IteratorSource::Foreign(source) => source.borrow().length(),
            IteratorSource::List(list) => list.borrow().len().min(u32::MAX as usize) as u32,
            IteratorSource::HostArray(values) => values.len().min(u32::MAX as usize) as u32,
            IteratorSource::Empty => 0,
        }
    }

    fn has(&self, index: u32) -> bool {
        match self {
            IteratorSource::Elements(array) => array.borrow().has(index),
            IteratorSource::Foreign(source) => source.borrow().has(index),
            // Host collections have no holes.
            IteratorSource::List(list) => (index as usize) < list.borrow().len(),
            IteratorSource::HostArray(values) => (index as usize) < values.len(),
            IteratorSource::Empty => false,
        }
    }

    fn get(&self, index: u32) -> Value {
        match self {
            IteratorSource::Elements(array) => array.borrow().get(index),
            IteratorSource::Foreign(source) => source.borrow().get(index),
            IteratorSource::List(list) => list
                .borrow()
                .get(index as usize)
                .cloned()
                .unwrap_or(Value::Undefined),
            IteratorSource::HostArray(values) => values
                .get(index as usize)
                .cloned()
                .unwrap_or(Value::Undefined),
            IteratorSource::Empty => Value::Undefined,
        }
    }
}

impl Iterator for ArrayLikeIterator {
    type Item = (u32, Value);

    fn next(&mut self) -> Option<(u32, Value)> {
        if self.reverse {
            while self.index >= 0 {
                let position = self.index as u32;
                self.index -= 1;
                if self.include_undefined || self.source.has(position) {
                    return Some((position, self.source.get(position)));
                }
            }
            None
        } else {
            while self.index < i64::from(self.source.length()) {
                let position = self.index as u32;
                self.index += 1;
                if self.include_undefined || self.source.has(position) {
                    return Some((position, self.source.get(position)));
                }
            }
            None
        }
    }
}
