// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use core::fmt;

use crate::ecmascript::types::Value;

/// Result type for operations that can raise a language-level exception.
pub type JsResult<T> = Result<T, JsError>;

/// ### [Agent](https://tc39.es/ecma262/#sec-agents)
///
/// The single-threaded execution context of the engine. One script execution
/// context owns one agent; it carries the global receiver handed to
/// non-strict callbacks and mints language-level exceptions.
///
/// Engine-integration bugs are not raised through the agent; they are fatal
/// panics (see the byte-view storage).
#[derive(Debug, Default)]
pub struct Agent {
    global_this: Value,
}

impl Agent {
    pub fn new() -> Agent {
        Agent {
            global_this: Value::Undefined,
        }
    }

    /// The value substituted as the receiver when a non-strict callback is
    /// invoked without one.
    pub fn global_this(&self) -> &Value {
        &self.global_this
    }

    pub fn set_global_this(&mut self, global_this: Value) {
        self.global_this = global_this;
    }

    pub fn throw_exception_with_static_message(
        &mut self,
        kind: ExceptionType,
        message: &'static str,
    ) -> JsError {
        JsError::new(kind, message)
    }

    pub fn throw_exception(&mut self, kind: ExceptionType, message: String) -> JsError {
        JsError::new(kind, message)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExceptionType {
    Error,
    EvalError,
    RangeError,
    ReferenceError,
    SyntaxError,
    TypeError,
    UriError,
}

impl ExceptionType {
    fn as_str(self) -> &'static str {
        match self {
            ExceptionType::Error => "Error",
            ExceptionType::EvalError => "EvalError",
            ExceptionType::RangeError => "RangeError",
            ExceptionType::ReferenceError => "ReferenceError",
            ExceptionType::SyntaxError => "SyntaxError",
            ExceptionType::TypeError => "TypeError",
            ExceptionType::UriError => "URIError",
        }
    }
}

/// A language-level exception value.
///
/// Catchable by script code, as opposed to engine-integration panics. The
/// kind and message are carried inline; there is no error-object heap in
/// this crate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsError {
    kind: ExceptionType,
    message: Box<str>,
}

impl JsError {
    pub fn new(kind: ExceptionType, message: impl Into<Box<str>>) -> JsError {
        JsError {
            kind,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ExceptionType {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for JsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind.as_str(), self.message)
    }
}

impl std::error::Error for JsError {}
