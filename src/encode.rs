//! Table to BSON document conversion
//!
//! The column-type contract lives here: one declared mapping from Arrow
//! types to BSON values, applied row by row. [`normalize_table`] exists to
//! guarantee every column a shard can produce lands in this mapping; a type
//! outside it is an encoding error.
//!
//! [`normalize_table`]: crate::normalize::normalize_table

use crate::error::{Error, Result};
use arrow::array::{Array, AsArray, RecordBatch};
use arrow::datatypes::{
    DataType, Date32Type, Float32Type, Float64Type, Int16Type, Int32Type, Int64Type, Int8Type,
    TimeUnit, TimestampMillisecondType, UInt16Type, UInt32Type, UInt64Type, UInt8Type,
};
use bson::{Bson, Document};

/// Milliseconds per day, for `Date32` (days since epoch) columns
const MILLIS_PER_DAY: i64 = 86_400_000;

/// Convert every row of a table into a BSON document
///
/// Column order in each document follows the table's column order.
pub fn table_to_documents(table: &RecordBatch) -> Result<Vec<Document>> {
    let schema = table.schema();
    let mut documents = Vec::with_capacity(table.num_rows());

    for row in 0..table.num_rows() {
        let mut document = Document::new();
        for (field, column) in schema.fields().iter().zip(table.columns()) {
            let value = encode_value(field.name(), column.as_ref(), row)?;
            document.insert(field.name().clone(), value);
        }
        documents.push(document);
    }

    Ok(documents)
}

/// Encode one slot of one column as a BSON value
fn encode_value(name: &str, column: &dyn Array, row: usize) -> Result<Bson> {
    if column.is_null(row) {
        return Ok(Bson::Null);
    }

    let value = match column.data_type() {
        DataType::Null => Bson::Null,
        DataType::Boolean => Bson::Boolean(column.as_boolean().value(row)),

        DataType::Int8 => Bson::Int32(column.as_primitive::<Int8Type>().value(row) as i32),
        DataType::Int16 => Bson::Int32(column.as_primitive::<Int16Type>().value(row) as i32),
        DataType::Int32 => Bson::Int32(column.as_primitive::<Int32Type>().value(row)),
        DataType::Int64 => Bson::Int64(column.as_primitive::<Int64Type>().value(row)),

        DataType::UInt8 => Bson::Int32(column.as_primitive::<UInt8Type>().value(row) as i32),
        DataType::UInt16 => Bson::Int32(column.as_primitive::<UInt16Type>().value(row) as i32),
        DataType::UInt32 => Bson::Int64(column.as_primitive::<UInt32Type>().value(row) as i64),
        DataType::UInt64 => {
            let raw = column.as_primitive::<UInt64Type>().value(row);
            let signed = i64::try_from(raw).map_err(|_| {
                Error::value_range(name, format!("{raw} does not fit in a BSON Int64"))
            })?;
            Bson::Int64(signed)
        }

        DataType::Float32 => {
            Bson::Double(column.as_primitive::<Float32Type>().value(row) as f64)
        }
        DataType::Float64 => Bson::Double(column.as_primitive::<Float64Type>().value(row)),

        DataType::Utf8 => Bson::String(column.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => Bson::String(column.as_string::<i64>().value(row).to_string()),

        DataType::Timestamp(TimeUnit::Millisecond, None) => {
            let millis = column.as_primitive::<TimestampMillisecondType>().value(row);
            Bson::DateTime(bson::DateTime::from_millis(millis))
        }
        DataType::Date32 => {
            let days = column.as_primitive::<Date32Type>().value(row);
            Bson::DateTime(bson::DateTime::from_millis(i64::from(days) * MILLIS_PER_DAY))
        }

        other => return Err(Error::encode(name, other)),
    };

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{
        BooleanArray, Float64Array, Int32Array, Int64Array, StringArray,
        TimestampMillisecondArray, TimestampNanosecondArray, UInt64Array,
    };
    use arrow::datatypes::{Field, Schema};
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn single_column(name: &str, array: Arc<dyn Array>) -> RecordBatch {
        let field = Field::new(name, array.data_type().clone(), true);
        RecordBatch::try_new(Arc::new(Schema::new(vec![field])), vec![array]).unwrap()
    }

    #[test]
    fn test_scalar_types() {
        let schema = Arc::new(Schema::new(vec![
            Field::new("count", DataType::Int32, false),
            Field::new("total", DataType::Int64, false),
            Field::new("fare", DataType::Float64, false),
            Field::new("vendor", DataType::Utf8, true),
            Field::new("flagged", DataType::Boolean, false),
        ]));
        let table = RecordBatch::try_new(
            schema,
            vec![
                Arc::new(Int32Array::from(vec![3])),
                Arc::new(Int64Array::from(vec![9_000_000_000_i64])),
                Arc::new(Float64Array::from(vec![12.5])),
                Arc::new(StringArray::from(vec![Some("CMT")])),
                Arc::new(BooleanArray::from(vec![true])),
            ],
        )
        .unwrap();

        let documents = table_to_documents(&table).unwrap();
        assert_eq!(documents.len(), 1);

        let doc = &documents[0];
        assert_eq!(doc.get("count"), Some(&Bson::Int32(3)));
        assert_eq!(doc.get("total"), Some(&Bson::Int64(9_000_000_000)));
        assert_eq!(doc.get("fare"), Some(&Bson::Double(12.5)));
        assert_eq!(doc.get("vendor"), Some(&Bson::String("CMT".to_string())));
        assert_eq!(doc.get("flagged"), Some(&Bson::Boolean(true)));
    }

    #[test]
    fn test_null_slots_encode_as_bson_null() {
        let table = single_column(
            "vendor",
            Arc::new(StringArray::from(vec![Some("CMT"), None])),
        );
        let documents = table_to_documents(&table).unwrap();
        assert_eq!(documents[1].get("vendor"), Some(&Bson::Null));
    }

    #[test]
    fn test_millisecond_timestamp_becomes_datetime() {
        let instant = Utc.with_ymd_and_hms(2022, 6, 1, 14, 30, 5).unwrap();
        let table = single_column(
            "pickup",
            Arc::new(TimestampMillisecondArray::from(vec![
                instant.timestamp_millis(),
            ])),
        );

        let documents = table_to_documents(&table).unwrap();
        let Some(Bson::DateTime(dt)) = documents[0].get("pickup") else {
            panic!("expected a BSON DateTime");
        };
        assert_eq!(dt.to_chrono(), instant);
    }

    #[test]
    fn test_nanosecond_timestamp_is_rejected() {
        // encoder only accepts what the normalizer produces
        let table = single_column(
            "pickup",
            Arc::new(TimestampNanosecondArray::from(vec![0_i64])),
        );
        let err = table_to_documents(&table).unwrap_err();
        assert!(matches!(err, Error::Encode { .. }));
    }

    #[test]
    fn test_uint64_overflow_is_rejected() {
        let table = single_column("big", Arc::new(UInt64Array::from(vec![u64::MAX])));
        let err = table_to_documents(&table).unwrap_err();
        assert!(matches!(err, Error::ValueRange { .. }));
    }

    #[test]
    fn test_empty_table_yields_no_documents() {
        let table = single_column("n", Arc::new(Int64Array::from(Vec::<i64>::new())));
        assert!(table_to_documents(&table).unwrap().is_empty());
    }
}
