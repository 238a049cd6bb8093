use chrono::{DateTime, Utc};
use rowfeed_derive::Record;
use rust_decimal::Decimal;
use uuid::Uuid;

///
/// Sample
///

#[derive(Clone, Debug, PartialEq, Record)]
pub(crate) struct Sample {
    pub(crate) string_field: String,
    pub(crate) int_field: i32,
    pub(crate) nullable_int_field: Option<i32>,
}

impl Sample {
    pub(crate) fn new(string_field: &str, int_field: i32, nullable_int_field: Option<i32>) -> Self {
        Self {
            string_field: string_field.to_string(),
            int_field,
            nullable_int_field,
        }
    }
}

/// The two-row dataset most reader tests walk.
pub(crate) fn samples() -> Vec<Sample> {
    vec![Sample::new("abcd", 1, None), Sample::new("abcd", 1, Some(4))]
}

///
/// Renamed
///

#[derive(Clone, Debug, Record)]
#[record(rename_all = "PascalCase")]
pub(crate) struct Renamed {
    pub(crate) first_name: String,
    #[column(rename = "Years")]
    pub(crate) age: u16,
    #[column(skip)]
    pub(crate) secret: String,
    pub(crate) last_seen: Option<DateTime<Utc>>,
}

///
/// Ledger
/// One field per supported scalar kind.
///

#[derive(Clone, Debug, Record)]
pub(crate) struct Ledger {
    pub(crate) active: bool,
    pub(crate) flags: u8,
    pub(crate) grade: char,
    pub(crate) small: i16,
    pub(crate) count: i32,
    pub(crate) total: i64,
    pub(crate) ratio: f32,
    pub(crate) score: f64,
    pub(crate) label: String,
    pub(crate) amount: Decimal,
    pub(crate) id: Uuid,
    pub(crate) posted_at: DateTime<Utc>,
    pub(crate) payload: Vec<u8>,
}

impl Ledger {
    pub(crate) fn sample() -> Self {
        Self {
            active: true,
            flags: 7,
            grade: 'A',
            small: -3,
            count: 42,
            total: 9_000_000_000,
            ratio: 0.5,
            score: 2.25,
            label: "entry".to_string(),
            amount: Decimal::new(12_345, 2),
            id: Uuid::from_u128(0x1234),
            posted_at: DateTime::<Utc>::UNIX_EPOCH,
            payload: vec![1, 2, 3],
        }
    }
}
