// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::ecmascript::execution::{Agent, JsResult};
use crate::ecmascript::types::{JsFunction, Value};

/// ### [7.3.14 Call ( F, V \[ , argumentsList \] )](https://tc39.es/ecma262/#sec-call)
///
/// The caller has already established that `function` is callable; the
/// invocation itself may raise whatever the callback raises.
pub fn call_function(
    agent: &mut Agent,
    function: &JsFunction,
    this_value: Value,
    args: &[Value],
) -> JsResult<Value> {
    function.call(agent, this_value, args)
}
