// Copyright 2025 the Stratum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Raw keys and their conversion to the canonical 32-bit ordering key.
//!
//! Every key that enters the tree is reduced to an `i32` whose natural order
//! matches the order of the raw values. The reduction is chosen once per
//! index through a [`KeyConverter`] and is reversible, so query results can be
//! reported in terms of the caller's own key type.

use chrono::{Datelike, NaiveDate, NaiveDateTime};

use crate::error::ConversionError;

/// Key value reserved for padding entries.
pub const SENTINEL_KEY: i32 = i32::MAX;

/// Days from 0001-01-01 (CE day 1) to 1970-01-01.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// A key as supplied by the caller, before conversion.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RawKey {
    /// Plain integer key.
    Int(i64),
    /// Calendar date.
    Date(NaiveDate),
    /// Date and time without a zone; only the date participates in ordering.
    Timestamp(NaiveDateTime),
}

impl RawKey {
    /// The kind of this key.
    pub const fn kind(&self) -> KeyKind {
        match self {
            Self::Int(_) => KeyKind::Int,
            Self::Date(_) => KeyKind::Date,
            Self::Timestamp(_) => KeyKind::Timestamp,
        }
    }
}

impl From<i32> for RawKey {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<i64> for RawKey {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<u32> for RawKey {
    fn from(v: u32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<NaiveDate> for RawKey {
    fn from(d: NaiveDate) -> Self {
        Self::Date(d)
    }
}

impl From<NaiveDateTime> for RawKey {
    fn from(t: NaiveDateTime) -> Self {
        Self::Timestamp(t)
    }
}

/// Discriminant of a [`RawKey`], used in error reports.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum KeyKind {
    /// [`RawKey::Int`].
    Int,
    /// [`RawKey::Date`].
    Date,
    /// [`RawKey::Timestamp`].
    Timestamp,
}

/// Strategy mapping raw keys to canonical keys and back.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum KeyConverter {
    /// Integers that fit in `i32`, unchanged.
    #[default]
    Identity,
    /// Dates as signed days since 1970-01-01. Timestamps floor to their date.
    DaysSinceEpoch,
    /// Dates as the decimal digits `yyyymmdd`. Years must lie in `0..=9999`.
    CalendarDigits,
}

impl KeyConverter {
    /// Map a raw key to its canonical ordering key.
    pub fn to_canonical(&self, raw: &RawKey) -> Result<i32, ConversionError> {
        match self {
            Self::Identity => match *raw {
                RawKey::Int(v) => i32::try_from(v).map_err(|_| ConversionError::OutOfRange(v)),
                other => Err(self.mismatch(&other)),
            },
            Self::DaysSinceEpoch => {
                let date = self.date_of(raw)?;
                Ok(date.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE)
            }
            Self::CalendarDigits => {
                let date = self.date_of(raw)?;
                let year = date.year();
                if !(0..=9999).contains(&year) {
                    return Err(ConversionError::OutOfRange(i64::from(year)));
                }
                let (month, day) = (date.month() as i32, date.day() as i32);
                Ok(year * 10_000 + month * 100 + day)
            }
        }
    }

    /// Map a canonical key back to the raw key it was produced from.
    ///
    /// Timestamps do not round-trip: they decode to the date they were floored to.
    pub fn from_canonical(&self, key: i32) -> Result<RawKey, ConversionError> {
        match self {
            Self::Identity => Ok(RawKey::Int(i64::from(key))),
            Self::DaysSinceEpoch => key
                .checked_add(UNIX_EPOCH_DAYS_FROM_CE)
                .and_then(NaiveDate::from_num_days_from_ce_opt)
                .map(RawKey::Date)
                .ok_or(ConversionError::InvalidCanonical(key)),
            Self::CalendarDigits => {
                if !(0..=99_991_231).contains(&key) {
                    return Err(ConversionError::InvalidCanonical(key));
                }
                let (month, day) = ((key / 100 % 100) as u32, (key % 100) as u32);
                NaiveDate::from_ymd_opt(key / 10_000, month, day)
                    .map(RawKey::Date)
                    .ok_or(ConversionError::InvalidCanonical(key))
            }
        }
    }

    /// The kind of raw key produced by [`KeyConverter::from_canonical`].
    pub const fn decoded_kind(&self) -> KeyKind {
        match self {
            Self::Identity => KeyKind::Int,
            Self::DaysSinceEpoch | Self::CalendarDigits => KeyKind::Date,
        }
    }

    fn date_of(&self, raw: &RawKey) -> Result<NaiveDate, ConversionError> {
        match *raw {
            RawKey::Date(d) => Ok(d),
            RawKey::Timestamp(t) => Ok(t.date()),
            RawKey::Int(_) => Err(self.mismatch(raw)),
        }
    }

    fn mismatch(&self, raw: &RawKey) -> ConversionError {
        ConversionError::KindMismatch {
            expected: self.decoded_kind(),
            found: raw.kind(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn identity_accepts_i32_range_only() {
        let c = KeyConverter::Identity;
        assert_eq!(c.to_canonical(&RawKey::from(-7_i32)), Ok(-7));
        assert_eq!(c.to_canonical(&RawKey::Int(i64::from(i32::MAX))), Ok(i32::MAX));
        assert_eq!(
            c.to_canonical(&RawKey::Int(1 << 40)),
            Err(ConversionError::OutOfRange(1 << 40))
        );
        assert_eq!(
            c.to_canonical(&RawKey::Date(date(2020, 1, 1))),
            Err(ConversionError::KindMismatch {
                expected: KeyKind::Int,
                found: KeyKind::Date
            })
        );
    }

    #[test]
    fn days_since_epoch_matches_unix_day_count() {
        let c = KeyConverter::DaysSinceEpoch;
        assert_eq!(c.to_canonical(&date(1970, 1, 1).into()), Ok(0));
        assert_eq!(c.to_canonical(&date(1969, 12, 31).into()), Ok(-1));
        assert_eq!(c.to_canonical(&date(1998, 12, 1).into()), Ok(10_561));
        let noon = date(1998, 12, 1).and_hms_opt(12, 30, 0).unwrap();
        assert_eq!(c.to_canonical(&noon.into()), Ok(10_561));
        assert_eq!(c.from_canonical(10_561), Ok(RawKey::Date(date(1998, 12, 1))));
    }

    #[test]
    fn days_since_epoch_rejects_unrepresentable_canonical() {
        let c = KeyConverter::DaysSinceEpoch;
        assert_eq!(
            c.from_canonical(i32::MAX),
            Err(ConversionError::InvalidCanonical(i32::MAX))
        );
    }

    #[test]
    fn calendar_digits_preserve_order_and_round_trip() {
        let c = KeyConverter::CalendarDigits;
        let a = c.to_canonical(&date(1994, 12, 31).into()).unwrap();
        let b = c.to_canonical(&date(1995, 1, 1).into()).unwrap();
        assert_eq!(a, 19_941_231);
        assert!(a < b);
        assert_eq!(c.from_canonical(b), Ok(RawKey::Date(date(1995, 1, 1))));
        assert_eq!(
            c.from_canonical(19_950_231),
            Err(ConversionError::InvalidCanonical(19_950_231))
        );
        assert_eq!(
            c.to_canonical(&date(-1, 1, 1).into()),
            Err(ConversionError::OutOfRange(-1))
        );
    }
}
