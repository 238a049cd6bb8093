use crate::{
    column::{ColumnSet, Columns},
    error::{ErrorClass, ReaderError},
    member,
    reader::{IntoRecordReader, MissingRowPolicy, NameMatch, ReaderConfig, UNSPECIFIED_SIZE},
    test_fixtures::{Ledger, Sample, samples},
    value::{ColumnType, Value},
};
use chrono::{DateTime, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use std::{
    fmt,
    sync::{
        Arc,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
};
use tracing::{
    Event, Metadata, Subscriber,
    field::{Field, Visit},
    span,
};
use ulid::Ulid;
use uuid::Uuid;

// ---- helpers -----------------------------------------------------------

fn text(s: &str) -> Value {
    Value::Text(s.to_string())
}

fn explicit_mapping(set: ColumnSet<Sample>) -> Result<ColumnSet<Sample>, ReaderError> {
    set.member(member!(|s: Sample| s.string_field))?
        .column("IntField", ColumnType::Int32, |s: &Sample| s.int_field)?
        .member(member!(|s: Sample| s.nullable_int_field))?
        .column("Const", ColumnType::Int32, |_: &Sample| -1)
}

fn arb_sample() -> impl Strategy<Value = Sample> {
    ("[a-z]{0,6}", any::<i32>(), any::<Option<i32>>())
        .prop_map(|(s, i, n)| Sample::new(&s, i, n))
}

///
/// DropFlag
/// Iterator wrapper that records when it is dropped.
///

struct DropFlag {
    inner: std::vec::IntoIter<Sample>,
    dropped: Arc<AtomicBool>,
}

impl Iterator for DropFlag {
    type Item = Sample;

    fn next(&mut self) -> Option<Sample> {
        self.inner.next()
    }
}

impl Drop for DropFlag {
    fn drop(&mut self) {
        self.dropped.store(true, Ordering::SeqCst);
    }
}

///
/// Flicker
/// Iterator that yields again after reporting exhaustion.
///

struct Flicker {
    calls: usize,
}

impl Iterator for Flicker {
    type Item = Sample;

    fn next(&mut self) -> Option<Sample> {
        self.calls += 1;
        (self.calls % 2 == 1).then(|| Sample::new("again", 0, None))
    }
}

///
/// CloseEvents
/// Subscriber counting "record reader closed" events.
///

struct CloseEvents(Arc<AtomicUsize>);

struct Message(String);

impl Visit for Message {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.0 = format!("{value:?}");
        }
    }
}

impl Subscriber for CloseEvents {
    fn enabled(&self, _: &Metadata<'_>) -> bool {
        true
    }

    fn new_span(&self, _: &span::Attributes<'_>) -> span::Id {
        span::Id::from_u64(1)
    }

    fn record(&self, _: &span::Id, _: &span::Record<'_>) {}

    fn record_follows_from(&self, _: &span::Id, _: &span::Id) {}

    fn event(&self, event: &Event<'_>) {
        let mut message = Message(String::new());
        event.record(&mut message);

        if message.0 == "record reader closed" {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn enter(&self, _: &span::Id) {}

    fn exit(&self, _: &span::Id) {}
}

// ---- reading rows ------------------------------------------------------

#[test]
fn empty_source_reports_no_rows_but_keeps_columns() {
    let mut reader = Vec::<Sample>::new().into_record_reader();

    assert!(!reader.advance().unwrap());
    assert_eq!(reader.column_count(), 3);
    assert_eq!(reader.column_name(0).unwrap(), "string_field");
    assert_eq!(reader.rows_processed(), 0);
}

#[test]
fn automatic_mapping_reads_each_record_in_order() {
    let mut reader = samples().into_record_reader();
    let mut buffer = vec![Value::Null; 3];

    assert!(reader.advance().unwrap());
    assert_eq!(reader.values_into(&mut buffer).unwrap(), 3);
    assert_eq!(buffer, [text("abcd"), Value::Int32(1), Value::Null]);

    assert!(reader.advance().unwrap());
    assert_eq!(reader.values_into(&mut buffer).unwrap(), 3);
    assert_eq!(buffer, [text("abcd"), Value::Int32(1), Value::Int32(4)]);

    assert!(!reader.advance().unwrap());
    assert_eq!(reader.rows_processed(), 2);
}

#[test]
fn explicit_mapping_mixes_members_and_computed_columns() {
    let mut reader = samples().into_record_reader_with(explicit_mapping).unwrap();

    assert_eq!(reader.column_count(), 4);
    assert_eq!(reader.column_name(1).unwrap(), "IntField");
    assert_eq!(reader.ordinal("Const").unwrap(), 3);

    let rows: Vec<Vec<Value>> = reader.rows().collect::<Result<_, _>>().unwrap();

    assert_eq!(
        rows,
        [
            vec![text("abcd"), Value::Int32(1), Value::Null, Value::Int32(-1)],
            vec![
                text("abcd"),
                Value::Int32(1),
                Value::Int32(4),
                Value::Int32(-1)
            ],
        ]
    );
}

#[test]
fn literal_member_is_rejected_when_opening() {
    let err = samples()
        .into_record_reader_with(|m| m.member(member!(|s: Sample| -1)))
        .unwrap_err();

    assert_eq!(err.class(), ErrorClass::InvalidArgument);
}

#[test]
fn duplicate_column_names_are_rejected_when_opening() {
    let err = samples()
        .into_record_reader_with(|m| {
            m.column("A", ColumnType::Dynamic, |_: &Sample| -1)?
                .column("A", ColumnType::Dynamic, |_: &Sample| -1)
        })
        .unwrap_err();

    assert!(err.is_invalid_argument());
}

#[test]
fn empty_configurator_uses_automatic_mapping() {
    let reader = samples().into_record_reader_with(Ok).unwrap();

    assert_eq!(
        reader.columns().names().collect::<Vec<_>>(),
        ["string_field", "int_field", "nullable_int_field"]
    );
}

#[test]
fn borrowed_sources_read_without_taking_ownership() {
    let rows = samples();
    let mut reader = rows
        .iter()
        .into_record_reader_from(Columns::<Sample>::automatic());

    assert!(reader.advance().unwrap());
    assert_eq!(reader.current(), Some(&rows[0]));
    assert_eq!(reader.get_string(0).unwrap(), "abcd");
}

#[test]
fn values_into_writes_at_most_the_buffer_length() {
    let mut reader = samples().into_record_reader_with(explicit_mapping).unwrap();
    reader.advance().unwrap();

    let mut short = vec![Value::Null; 2];
    assert_eq!(reader.values_into(&mut short).unwrap(), 2);
    assert_eq!(short, [text("abcd"), Value::Int32(1)]);

    let mut long = vec![Value::Bool(true); 6];
    assert_eq!(reader.values_into(&mut long).unwrap(), 4);
    assert_eq!(long[3], Value::Int32(-1));
    assert_eq!(long[4], Value::Bool(true));
}

#[test]
fn rows_iterator_stops_after_an_error() {
    let mut reader = samples().into_record_reader();
    reader.close();

    let mut rows = reader.rows();

    assert!(matches!(rows.next(), Some(Err(ReaderError::Closed))));
    assert!(rows.next().is_none());
}

// ---- row state ---------------------------------------------------------

#[test]
fn exhausted_reader_keeps_returning_false() {
    let mut reader = samples().into_record_reader();
    while reader.advance().unwrap() {}

    for _ in 0..3 {
        assert!(!reader.advance().unwrap());
    }
    assert_eq!(reader.rows_processed(), 2);
}

#[test]
fn source_is_not_polled_after_reporting_exhaustion() {
    let mut reader = Flicker { calls: 0 }.into_record_reader();

    assert!(reader.advance().unwrap());
    assert!(!reader.advance().unwrap());
    assert!(!reader.advance().unwrap());
    assert_eq!(reader.rows_processed(), 1);
}

#[test]
fn value_reads_without_a_current_row_fail_by_default() {
    let mut reader = samples().into_record_reader();

    assert!(matches!(reader.value(0), Err(ReaderError::NoCurrentRow)));

    while reader.advance().unwrap() {}
    assert!(matches!(
        reader.value_by_name("int_field"),
        Err(ReaderError::NoCurrentRow)
    ));
    assert_eq!(
        ReaderError::NoCurrentRow.class(),
        reader.value(0).unwrap_err().class()
    );
}

#[test]
fn type_default_policy_returns_zero_values_without_a_row() {
    let config = ReaderConfig::default().with_missing_row(MissingRowPolicy::TypeDefault);
    let reader = samples()
        .into_record_reader_with(|m| {
            explicit_mapping(m)?.column("Any", ColumnType::Dynamic, |s: &Sample| s.int_field)
        })
        .unwrap()
        .with_config(config);

    assert_eq!(
        reader.current_values().unwrap(),
        [
            text(""),
            Value::Int32(0),
            Value::Int32(0),
            Value::Int32(0),
            Value::Null
        ]
    );
}

#[test]
fn close_is_idempotent_and_blocks_advance() {
    let mut reader = samples().into_record_reader();
    reader.advance().unwrap();

    reader.close();
    reader.close();

    assert!(reader.is_closed());
    assert!(reader.current().is_none());
    assert!(matches!(reader.advance(), Err(ReaderError::Closed)));
    assert_eq!(reader.rows_processed(), 1);
}

#[test]
fn close_releases_the_source() {
    let dropped = Arc::new(AtomicBool::new(false));
    let source = DropFlag {
        inner: samples().into_iter(),
        dropped: Arc::clone(&dropped),
    };
    let mut reader = source.into_record_reader();

    reader.advance().unwrap();
    assert!(!dropped.load(Ordering::SeqCst));

    reader.close();
    assert!(dropped.load(Ordering::SeqCst));
}

#[test]
fn dropping_an_open_reader_releases_the_source() {
    let dropped = Arc::new(AtomicBool::new(false));
    let source = DropFlag {
        inner: samples().into_iter(),
        dropped: Arc::clone(&dropped),
    };

    drop(source.into_record_reader());

    assert!(dropped.load(Ordering::SeqCst));
}

#[test]
fn drop_and_close_each_log_a_single_close() {
    let closes = Arc::new(AtomicUsize::new(0));

    tracing::subscriber::with_default(CloseEvents(Arc::clone(&closes)), || {
        drop(samples().into_record_reader());

        let mut reader = samples().into_record_reader();
        reader.close();
        reader.close();
        drop(reader);
    });

    assert_eq!(closes.load(Ordering::SeqCst), 2);
}

#[test]
fn single_flat_result_set() {
    let mut reader = Vec::<Sample>::new().into_record_reader();

    assert!(reader.has_rows());
    assert_eq!(reader.depth(), 0);
    assert!(!reader.next_result());
}

// ---- column lookup -----------------------------------------------------

#[test]
fn ordinal_lookup_reports_missing_names() {
    let reader = samples().into_record_reader();

    assert_eq!(reader.ordinal("nullable_int_field").unwrap(), 2);

    let err = reader.ordinal("String_Field").unwrap_err();
    assert!(matches!(err, ReaderError::ColumnNotFound { ref name } if name == "String_Field"));
    assert_eq!(err.class(), ErrorClass::NotFound);
}

#[test]
fn ordinal_out_of_range_is_reported_with_the_column_count() {
    let mut reader = samples().into_record_reader();
    reader.advance().unwrap();

    assert!(matches!(
        reader.value(3),
        Err(ReaderError::OrdinalOutOfRange {
            ordinal: 3,
            count: 3
        })
    ));
    assert!(reader.column_name(7).is_err());
    assert!(reader.type_name(3).is_err());
}

#[test]
fn case_insensitive_lookup_prefers_the_lowest_ordinal() {
    let config = ReaderConfig::default().with_name_match(NameMatch::IgnoreAsciiCase);
    let reader = samples()
        .into_record_reader_with(|m| {
            m.column("Name", ColumnType::Int32, |_: &Sample| 1)?
                .column("NAME", ColumnType::Int32, |_: &Sample| 2)
        })
        .unwrap()
        .with_config(config);

    assert_eq!(reader.ordinal("name").unwrap(), 0);
    assert_eq!(reader.ordinal("NAME").unwrap(), 0);
}

#[test]
fn column_types_and_labels() {
    let reader = samples().into_record_reader_with(explicit_mapping).unwrap();

    assert_eq!(reader.column_type(0).unwrap(), ColumnType::Text);
    assert_eq!(reader.type_name(3).unwrap(), "Int32");
}

// ---- typed getters -----------------------------------------------------

#[test]
fn typed_getters_read_exact_kinds() {
    let ledger = Ledger::sample();
    let mut reader = vec![ledger.clone()].into_record_reader();
    reader.advance().unwrap();

    assert!(reader.get_bool(0).unwrap());
    assert_eq!(reader.get_u8(1).unwrap(), 7);
    assert_eq!(reader.get_char(2).unwrap(), 'A');
    assert_eq!(reader.get_i16(3).unwrap(), -3);
    assert_eq!(reader.get_i32(4).unwrap(), 42);
    assert_eq!(reader.get_i64(5).unwrap(), 9_000_000_000);
    assert!((reader.get_f32(6).unwrap() - 0.5).abs() < f32::EPSILON);
    assert!((reader.get_f64(7).unwrap() - 2.25).abs() < f64::EPSILON);
    assert_eq!(reader.get_string(8).unwrap(), "entry");
    assert_eq!(reader.get_decimal(9).unwrap(), Decimal::new(12_345, 2));
    assert_eq!(reader.get_uuid(10).unwrap(), Uuid::from_u128(0x1234));
    assert_eq!(
        reader.get_timestamp(11).unwrap(),
        DateTime::<Utc>::UNIX_EPOCH
    );
    assert_eq!(reader.get::<Vec<u8>>(12).unwrap(), ledger.payload);
}

#[test]
fn ulid_columns_read_through_the_ulid_getter() {
    let id = Ulid::from_parts(42, 7);
    let mut reader = samples()
        .into_record_reader_with(|m| m.column("Id", ColumnType::Ulid, move |_: &Sample| id))
        .unwrap();
    reader.advance().unwrap();

    assert_eq!(reader.get_ulid(0).unwrap(), id);
}

#[test]
fn typed_getters_fail_on_mismatched_kinds() {
    let mut reader = samples().into_record_reader();
    reader.advance().unwrap();

    let err = reader.get_i64(1).unwrap_err();
    assert!(matches!(
        err,
        ReaderError::InvalidCast {
            ordinal: 1,
            expected: "Int64",
            found: "Int32"
        }
    ));
    assert_eq!(err.class(), ErrorClass::InvalidCast);

    assert!(matches!(
        reader.get_i32(2),
        Err(ReaderError::InvalidCast { found: "Null", .. })
    ));
    assert_eq!(reader.get::<Option<i32>>(2).unwrap(), None);
}

#[test]
fn declared_type_is_reported_as_given() {
    let config = ReaderConfig::default().with_missing_row(MissingRowPolicy::TypeDefault);
    let mut reader = samples()
        .into_record_reader_with(|m| m.column("Const", ColumnType::Text, |_: &Sample| -1))
        .unwrap()
        .with_config(config);

    assert_eq!(reader.column_type(0).unwrap(), ColumnType::Text);
    assert_eq!(reader.value(0).unwrap(), text(""));

    reader.advance().unwrap();
    assert_eq!(reader.value(0).unwrap(), Value::Int32(-1));
}

#[test]
fn text_columns_are_read_as_owned_strings() {
    let mut reader = samples().into_record_reader();
    reader.advance().unwrap();

    assert_eq!(reader.get::<String>(0).unwrap(), "abcd");
    assert!(matches!(
        reader.get::<&str>(0),
        Err(ReaderError::InvalidCast { ordinal: 0, .. })
    ));
}

#[test]
fn null_checks_follow_the_current_row() {
    let mut reader = samples().into_record_reader();

    reader.advance().unwrap();
    assert!(reader.is_null(2).unwrap());
    assert!(!reader.is_null(0).unwrap());

    reader.advance().unwrap();
    assert!(!reader.is_null(2).unwrap());
}

#[test]
fn range_extraction_is_unsupported() {
    let mut reader = samples().into_record_reader();
    reader.advance().unwrap();

    let mut bytes = [0u8; 4];
    let mut chars = ['\0'; 4];

    let err = reader.get_bytes(0, 0, Some(&mut bytes), 0, 4).unwrap_err();
    assert_eq!(err.class(), ErrorClass::Unsupported);
    assert!(matches!(
        reader.get_chars(0, 0, Some(&mut chars), 0, 4),
        Err(ReaderError::Unsupported {
            operation: "get_chars"
        })
    ));
    assert!(reader.get_bytes(0, 0, None, 0, 0).is_err());
}

// ---- schema & config ---------------------------------------------------

#[test]
fn schema_describes_columns_without_inferring_metadata() {
    let reader = samples().into_record_reader_with(explicit_mapping).unwrap();
    let schema = reader.schema();

    assert_eq!(schema.len(), 4);
    assert!(schema.iter().all(|c| c.size == UNSPECIFIED_SIZE));
    assert!(schema.iter().all(|c| !c.nullable && !c.is_key));
    assert_eq!(schema[3].ordinal, 3);

    let json = serde_json::to_value(&schema[1]).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "name": "IntField",
            "ordinal": 1,
            "column_type": "Int32",
            "size": -1,
            "nullable": false,
            "is_key": false,
        })
    );
}

#[test]
fn config_parses_from_toml() {
    let config = ReaderConfig::from_toml_str(
        r#"
missing_row = "type_default"
name_match = "ignore_ascii_case"
"#,
    )
    .unwrap();

    assert_eq!(config.missing_row, MissingRowPolicy::TypeDefault);
    assert_eq!(config.name_match, NameMatch::IgnoreAsciiCase);
    assert_eq!(
        ReaderConfig::from_toml_str("").unwrap(),
        ReaderConfig::default()
    );
}

#[test]
fn config_rejects_unknown_keys() {
    let err = ReaderConfig::from_toml_str("buffer_rows = 10").unwrap_err();

    assert!(matches!(err, ReaderError::Config { .. }));
}

// ---- properties --------------------------------------------------------

proptest! {
    #[test]
    fn advance_visits_every_record_once(rows in prop::collection::vec(arb_sample(), 0..16)) {
        let expected = rows.clone();
        let mut reader = rows.into_record_reader();
        let mut seen = Vec::new();

        while reader.advance().unwrap() {
            seen.push(reader.current().cloned().unwrap());
        }

        prop_assert_eq!(reader.rows_processed(), expected.len() as u64);
        prop_assert!(!reader.advance().unwrap());
        prop_assert_eq!(seen, expected);
    }

    #[test]
    fn named_and_positional_reads_agree(sample in arb_sample()) {
        let mut reader = vec![sample].into_record_reader_with(explicit_mapping).unwrap();
        reader.advance().unwrap();

        for ordinal in 0..reader.column_count() {
            let name = reader.column_name(ordinal).unwrap().to_string();
            prop_assert_eq!(reader.value_by_name(&name).unwrap(), reader.value(ordinal).unwrap());
        }
    }

    #[test]
    fn values_into_count_is_bounded(sample in arb_sample(), len in 0usize..8) {
        let mut reader = vec![sample].into_record_reader();
        reader.advance().unwrap();

        let mut buffer = vec![Value::Null; len];
        prop_assert_eq!(reader.values_into(&mut buffer).unwrap(), len.min(3));
    }
}
