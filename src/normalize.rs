//! Type normalization for BSON encoding
//!
//! The BSON encoder has no representation for arbitrary-precision decimals or
//! sub-millisecond timestamps, so those columns are downgraded before the
//! write phase: decimals become `Float64`, timestamps of any unit or timezone
//! become `Timestamp(Millisecond)`. Every other column passes through with
//! its physical array untouched. Running normalization twice is a no-op.

use crate::error::Result;
use arrow::array::RecordBatch;
use arrow::compute::cast;
use arrow::datatypes::{DataType, Field, Schema, TimeUnit};
use std::sync::Arc;

/// The target type for normalized timestamp columns
const TIMESTAMP_TARGET: DataType = DataType::Timestamp(TimeUnit::Millisecond, None);

/// Normalize a table so every column is representable in BSON
pub fn normalize_table(table: &RecordBatch) -> Result<RecordBatch> {
    let schema = table.schema();

    let mut changed = false;
    let mut fields = Vec::with_capacity(schema.fields().len());
    let mut columns = Vec::with_capacity(table.num_columns());

    for (field, column) in schema.fields().iter().zip(table.columns()) {
        match target_type(field.data_type()) {
            Some(target) => {
                let converted = cast(column, &target)?;
                fields.push(Field::new(field.name(), target, field.is_nullable()));
                columns.push(converted);
                changed = true;
            }
            None => {
                fields.push(field.as_ref().clone());
                columns.push(column.clone());
            }
        }
    }

    if !changed {
        return Ok(table.clone());
    }

    Ok(RecordBatch::try_new(Arc::new(Schema::new(fields)), columns)?)
}

/// The normalized type for a column, or None if it already passes through
fn target_type(data_type: &DataType) -> Option<DataType> {
    match data_type {
        DataType::Decimal128(_, _) | DataType::Decimal256(_, _) => Some(DataType::Float64),
        DataType::Timestamp(TimeUnit::Millisecond, None) => None,
        DataType::Timestamp(_, _) => Some(TIMESTAMP_TARGET),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{
        Array, Decimal128Array, Float64Array, Int64Array, StringArray,
        TimestampMillisecondArray, TimestampNanosecondArray,
    };
    use pretty_assertions::assert_eq;

    fn decimal_batch() -> RecordBatch {
        let fares = Decimal128Array::from(vec![Some(1250_i128), Some(725), None])
            .with_precision_and_scale(10, 2)
            .unwrap();
        let schema = Arc::new(Schema::new(vec![
            Field::new("fare", fares.data_type().clone(), true),
            Field::new("vendor", DataType::Utf8, true),
        ]));
        RecordBatch::try_new(
            schema,
            vec![
                Arc::new(fares),
                Arc::new(StringArray::from(vec![Some("CMT"), Some("VTS"), None])),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_decimal_columns_become_float64() {
        let table = normalize_table(&decimal_batch()).unwrap();
        assert_eq!(table.schema().field(0).data_type(), &DataType::Float64);

        let fares = table
            .column(0)
            .as_any()
            .downcast_ref::<Float64Array>()
            .unwrap();
        assert_eq!(fares.value(0), 12.5);
        assert_eq!(fares.value(1), 7.25);
        assert!(fares.is_null(2));
    }

    #[test]
    fn test_non_decimal_columns_pass_through_untouched() {
        let source = decimal_batch();
        let table = normalize_table(&source).unwrap();
        // same physical array, not a converted copy
        assert_eq!(table.column(1).as_ref(), source.column(1).as_ref());
        assert_eq!(table.schema().field(1), source.schema().field(1));
    }

    #[test]
    fn test_nanosecond_timestamps_become_millisecond() {
        let instant_ns = 1_650_000_000_123_456_789_i64;
        let pickups = TimestampNanosecondArray::from(vec![Some(instant_ns), None]);
        let schema = Arc::new(Schema::new(vec![Field::new(
            "pickup",
            pickups.data_type().clone(),
            true,
        )]));
        let batch = RecordBatch::try_new(schema, vec![Arc::new(pickups)]).unwrap();

        let table = normalize_table(&batch).unwrap();
        assert_eq!(
            table.schema().field(0).data_type(),
            &DataType::Timestamp(TimeUnit::Millisecond, None)
        );

        let pickups = table
            .column(0)
            .as_any()
            .downcast_ref::<TimestampMillisecondArray>()
            .unwrap();
        // second precision survives the unit downgrade
        assert_eq!(pickups.value(0), instant_ns / 1_000_000);
        assert!(pickups.is_null(1));
    }

    #[test]
    fn test_utc_timestamps_drop_timezone() {
        let pickups =
            TimestampNanosecondArray::from(vec![Some(1_650_000_000_000_000_000_i64)])
                .with_timezone("UTC");
        let schema = Arc::new(Schema::new(vec![Field::new(
            "pickup",
            pickups.data_type().clone(),
            true,
        )]));
        let batch = RecordBatch::try_new(schema, vec![Arc::new(pickups)]).unwrap();

        let table = normalize_table(&batch).unwrap();
        assert_eq!(
            table.schema().field(0).data_type(),
            &DataType::Timestamp(TimeUnit::Millisecond, None)
        );
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let once = normalize_table(&decimal_batch()).unwrap();
        let twice = normalize_table(&once).unwrap();
        assert_eq!(once.schema(), twice.schema());
        for (a, b) in once.columns().iter().zip(twice.columns()) {
            assert_eq!(a.as_ref(), b.as_ref());
        }
    }

    #[test]
    fn test_plain_table_is_untouched() {
        let schema = Arc::new(Schema::new(vec![Field::new("n", DataType::Int64, false)]));
        let batch =
            RecordBatch::try_new(schema, vec![Arc::new(Int64Array::from(vec![1, 2]))]).unwrap();
        let table = normalize_table(&batch).unwrap();
        assert_eq!(table.schema(), batch.schema());
        assert_eq!(table.column(0).as_ref(), batch.column(0).as_ref());
    }
}
