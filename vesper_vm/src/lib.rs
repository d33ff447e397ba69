// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The array storage engine of the Vesper JavaScript virtual machine.
//!
//! Arrays expose a virtual `length` and indexed operations; behind them the
//! engine picks a physical representation — dense int, long, or double
//! buffers, boxed-value buffers, or a sparse prefix-plus-map — and switches
//! it as scripts write incompatible values, punch holes, or grow arrays into
//! huge, mostly-empty index ranges. Seal and freeze semantics, hole
//! observability, and the `2^32 - 2` index domain are handled here; the
//! generic property model, prototype chains, and garbage collection belong
//! to the host.

pub mod ecmascript;
mod small_integer;

pub use small_integer::SmallInteger;
