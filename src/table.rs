//! Reading source files into Arrow tables
//!
//! A "table" here is one [`RecordBatch`] holding every row of one source
//! file: Parquet shards keep their embedded column types (including decimal
//! and nanosecond-timestamp columns), CSV files get their schema inferred
//! from a sample of rows.

use crate::error::{Error, Result};
use arrow::array::RecordBatch;
use arrow::compute::{cast_with_options, concat_batches, CastOptions};
use arrow::csv::reader::Format;
use arrow::csv::ReaderBuilder;
use arrow::datatypes::{DataType, Field, Schema, TimeUnit};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use std::fs::File;
use std::io::Seek;
use std::path::Path;
use std::sync::Arc;

/// The canonical date column of the weather CSV
pub const DATE_COLUMN: &str = "DATE";

/// Rows to sample when inferring a CSV schema
const CSV_SCHEMA_SAMPLE: usize = 1024;

/// Rows per batch while reading; batches are concatenated afterwards
const READ_BATCH_SIZE: usize = 8192;

/// Read a Parquet file into a single table
///
/// Column types come from the file's metadata; nothing is coerced here.
pub fn read_parquet(path: &Path) -> Result<RecordBatch> {
    let file = File::open(path).map_err(|_| Error::FileNotFound {
        path: path.display().to_string(),
    })?;

    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    let schema = builder.schema().clone();
    let reader = builder.with_batch_size(READ_BATCH_SIZE).build()?;

    let batches = reader.collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(concat_batches(&schema, &batches)?)
}

/// Read a delimited-text file into a single table
///
/// The schema is inferred from the first [`CSV_SCHEMA_SAMPLE`] rows. A column
/// named [`DATE_COLUMN`] is coerced to a millisecond timestamp; values that
/// fail to parse become null rather than failing the file.
pub fn read_csv(path: &Path) -> Result<RecordBatch> {
    let mut file = File::open(path).map_err(|_| Error::FileNotFound {
        path: path.display().to_string(),
    })?;

    let format = Format::default().with_header(true);
    let (schema, _) = format
        .infer_schema(&mut file, Some(CSV_SCHEMA_SAMPLE))
        .map_err(|e| Error::parse(path.display().to_string(), e.to_string()))?;
    file.rewind()?;

    // Read the date column as plain text regardless of what the sample
    // inferred: a date-typed column would fail the whole read on the first
    // unparseable value past the sample, while the safe cast below nulls it.
    let fields: Vec<Field> = schema
        .fields()
        .iter()
        .map(|f| {
            if f.name() == DATE_COLUMN {
                Field::new(DATE_COLUMN, DataType::Utf8, true)
            } else {
                f.as_ref().clone()
            }
        })
        .collect();
    let schema = Arc::new(Schema::new(fields));
    let reader = ReaderBuilder::new(schema.clone())
        .with_format(format)
        .with_batch_size(READ_BATCH_SIZE)
        .build(file)?;

    let batches = reader.collect::<std::result::Result<Vec<_>, _>>()?;
    let table = concat_batches(&schema, &batches)?;
    coerce_date_column(&table, DATE_COLUMN)
}

/// Coerce the named column to `Timestamp(Millisecond)` if it exists
///
/// Uses a safe cast: an unparseable value maps to null and the row survives.
/// A table without the column is returned unchanged.
pub fn coerce_date_column(table: &RecordBatch, column: &str) -> Result<RecordBatch> {
    let Some(index) = table.schema().index_of(column).ok() else {
        return Ok(table.clone());
    };

    let target = DataType::Timestamp(TimeUnit::Millisecond, None);
    if table.schema().field(index).data_type() == &target {
        return Ok(table.clone());
    }

    // safe: true turns parse failures into nulls (the missing marker)
    let options = CastOptions::default();
    let coerced = cast_with_options(table.column(index), &target, &options)?;

    let mut fields: Vec<Field> = table
        .schema()
        .fields()
        .iter()
        .map(|f| f.as_ref().clone())
        .collect();
    fields[index] = Field::new(column, target, true);

    let mut columns = table.columns().to_vec();
    columns[index] = coerced;

    Ok(RecordBatch::try_new(Arc::new(Schema::new(fields)), columns)?)
}
