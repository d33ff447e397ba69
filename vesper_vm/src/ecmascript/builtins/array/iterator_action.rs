// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::ecmascript::abstract_operations::operations_on_objects::call_function;
use crate::ecmascript::abstract_operations::testing_and_comparison::is_callable;
use crate::ecmascript::execution::{Agent, ExceptionType, JsResult};
use crate::ecmascript::types::{JsFunction, Value};

use super::array_like_iterator::ArrayLikeIterator;

/// The apply-callback-per-element driver behind the higher-order array
/// operations.
///
/// Construction validates that the callback is actually invocable and fixes
/// the receiver: a non-strict callback invoked without one gets the agent's
/// global receiver. [`apply`](IteratorAction::apply) then advances the
/// cursor, invoking the callback with `(value, index)` and handing each
/// result to the embedding action, which decides whether to continue —
/// search-style operations stop at the first hit.
#[derive(Debug)]
pub struct IteratorAction {
    iterator: ArrayLikeIterator,
    callback: JsFunction,
    this_arg: Value,
}

impl IteratorAction {
    /// Forward driver over `source`.
    pub fn new(
        agent: &mut Agent,
        source: &Value,
        callback: Value,
        this_arg: Value,
        include_undefined: bool,
    ) -> JsResult<IteratorAction> {
        let iterator = ArrayLikeIterator::array_like_iterator(source, include_undefined);
        IteratorAction::with_iterator(agent, iterator, callback, this_arg)
    }

    /// Reverse driver over `source`, for right-to-left operations.
    pub fn new_reverse(
        agent: &mut Agent,
        source: &Value,
        callback: Value,
        this_arg: Value,
        include_undefined: bool,
    ) -> JsResult<IteratorAction> {
        let iterator = ArrayLikeIterator::reverse_array_like_iterator(source, include_undefined);
        IteratorAction::with_iterator(agent, iterator, callback, this_arg)
    }

    fn with_iterator(
        agent: &mut Agent,
        iterator: ArrayLikeIterator,
        callback: Value,
        this_arg: Value,
    ) -> JsResult<IteratorAction> {
        // If IsCallable(callbackfn) is false, throw a TypeError exception.
        let Some(callback) = is_callable(&callback) else {
            return Err(agent
                .throw_exception(ExceptionType::TypeError, format!("{callback} is not a function")));
        };
        let callback = callback.clone();
        let this_arg = if this_arg.is_undefined() && !callback.is_strict() {
            agent.global_this().clone()
        } else {
            this_arg
        };
        Ok(IteratorAction {
            iterator,
            callback,
            this_arg,
        })
    }

    /// Runs the loop. `each` receives the element, its index, and the
    /// callback's result for it; returning `false` short-circuits the
    /// iteration.
    pub fn apply(
        &mut self,
        agent: &mut Agent,
        mut each: impl FnMut(&mut Agent, &Value, u32, Value) -> JsResult<bool>,
    ) -> JsResult<()> {
        while let Some((index, value)) = self.iterator.next() {
            let result = call_function(
                agent,
                &self.callback,
                self.this_arg.clone(),
                &[value.clone(), Value::from(index)],
            )?;
            if !each(agent, &value, index, result)? {
                break;
            }
        }
        Ok(())
    }
}
