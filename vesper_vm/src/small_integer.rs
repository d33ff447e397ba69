// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

/// 56-bit signed integer.
///
/// Stored inline in a [`Value`](crate::ecmascript::types::Value) so that
/// every JavaScript safe integer stays unboxed; anything wider is carried as
/// a 64-bit float instead.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct SmallInteger {
    data: [u8; 7],
}

impl core::fmt::Debug for SmallInteger {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.into_i64())
    }
}

impl SmallInteger {
    pub const MIN: i64 = -(2i64.pow(56)) / 2 + 1;
    pub const MAX: i64 = (2i64.pow(56)) / 2 - 1;

    pub const fn zero() -> SmallInteger {
        SmallInteger { data: [0; 7] }
    }

    pub(crate) fn from_i64_unchecked(value: i64) -> SmallInteger {
        debug_assert!((Self::MIN..=Self::MAX).contains(&value));
        let bytes = value.to_le_bytes();
        let mut data = [0; 7];
        data.copy_from_slice(&bytes[0..7]);
        SmallInteger { data }
    }

    pub fn into_i64(self) -> i64 {
        let SmallInteger { data } = self;
        let mut bytes = [0; 8];
        bytes[0..7].copy_from_slice(&data);
        // Shift the 56-bit payload up and back down to sign-extend it.
        (i64::from_le_bytes(bytes) << 8) >> 8
    }
}

impl From<i32> for SmallInteger {
    fn from(value: i32) -> SmallInteger {
        SmallInteger::from_i64_unchecked(i64::from(value))
    }
}

impl From<u32> for SmallInteger {
    fn from(value: u32) -> SmallInteger {
        SmallInteger::from_i64_unchecked(i64::from(value))
    }
}

impl TryFrom<i64> for SmallInteger {
    type Error = ();

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(SmallInteger::from_i64_unchecked(value))
        } else {
            Err(())
        }
    }
}

impl From<SmallInteger> for i64 {
    fn from(value: SmallInteger) -> i64 {
        value.into_i64()
    }
}

#[test]
fn small_integer_round_trips() {
    for value in [0, 1, -1, 42, -42, SmallInteger::MIN, SmallInteger::MAX] {
        assert_eq!(SmallInteger::try_from(value).unwrap().into_i64(), value);
    }
    assert!(SmallInteger::try_from(SmallInteger::MAX + 1).is_err());
    assert!(SmallInteger::try_from(SmallInteger::MIN - 1).is_err());
    assert!(SmallInteger::try_from(i64::MAX).is_err());
}
