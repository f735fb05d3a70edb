//! Chunked MongoDB writer
//!
//! Rows reach the collection in fixed-maximum-size windows, one `insert_many`
//! per window, each awaited before the next. The running total reported after
//! a file comes from `count_documents`, the database's authoritative state,
//! never a local counter.

use crate::encode::table_to_documents;
use crate::error::Result;
use arrow::array::RecordBatch;
use bson::{doc, Document};
use mongodb::{Client, Collection};
use tracing::debug;

/// Split a table into consecutive windows of at most `max_rows` rows
///
/// Windows are zero-copy slices, non-overlapping, in original row order, and
/// together cover every row exactly once. A zero-row table yields no windows.
pub fn partition_windows(table: &RecordBatch, max_rows: usize) -> Vec<RecordBatch> {
    assert!(max_rows > 0, "window size must be positive");

    let rows = table.num_rows();
    let mut windows = Vec::with_capacity(rows.div_ceil(max_rows));

    let mut start = 0;
    while start < rows {
        let length = max_rows.min(rows - start);
        windows.push(table.slice(start, length));
        start += length;
    }

    windows
}

/// The write side of a run: one bound target collection
pub struct MongoSink {
    collection: Collection<Document>,
}

impl MongoSink {
    /// Connect to MongoDB and bind the target collection
    pub async fn connect(uri: &str, database: &str, collection: &str) -> Result<Self> {
        let client = Client::with_uri_str(uri).await?;
        Ok(Self::from_client(&client, database, collection))
    }

    /// Bind the target collection on an existing client
    pub fn from_client(client: &Client, database: &str, collection: &str) -> Self {
        Self {
            collection: client.database(database).collection(collection),
        }
    }

    /// The bound collection's name
    pub fn name(&self) -> &str {
        self.collection.name()
    }

    /// Drop the collection so the run starts from empty
    ///
    /// Dropping a collection that does not exist succeeds.
    pub async fn reset(&self) -> Result<()> {
        self.collection.drop().await?;
        Ok(())
    }

    /// Insert a table's rows in windows of at most `batch_size` rows
    ///
    /// Returns the number of rows submitted. Any failed insert propagates
    /// immediately; windows already inserted stay in the collection.
    pub async fn write_table(&self, table: &RecordBatch, batch_size: usize) -> Result<usize> {
        let mut written = 0;
        for window in partition_windows(table, batch_size) {
            let documents = table_to_documents(&window)?;
            debug!(
                collection = self.name(),
                rows = documents.len(),
                "inserting window"
            );
            self.collection.insert_many(documents).await?;
            written += window.num_rows();
        }
        Ok(written)
    }

    /// The authoritative document count of the collection
    pub async fn count(&self) -> Result<u64> {
        Ok(self.collection.count_documents(doc! {}).await?)
    }
}
