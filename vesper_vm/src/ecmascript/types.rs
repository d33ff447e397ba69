// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

mod property_descriptor;
mod property_key;
mod value;

pub use property_descriptor::PropertyDescriptor;
pub use property_key::{MAX_ARRAY_INDEX, PropertyKey, parse_array_index, to_long_index};
pub use value::{ArrayLikeObject, JsFunction, Value};
