//! The accumulated result set: tweet rows keyed by id, in insertion order.

use log::{debug, info};
use serde_json::Value;
use std::collections::{BTreeSet, HashMap};
use std::io::Write;
use std::path::Path;

use crate::error::Result;
use crate::record::{Field, TweetRecord, ENGAGEMENT_METRICS};

/// Header of the index column in exported files.
pub const TWEET_ID_COLUMN: &str = "tweet_id";

/// Derived column appended by [`TweetTable::normalize`].
pub const TOTAL_ENGAGEMENTS_COLUMN: &str = "total_engagements";

/// Nested column removed by [`TweetTable::normalize`] once its metrics are fanned out.
pub const PUBLIC_METRICS_COLUMN: &str = "public_metrics";

/// Tweet rows indexed by tweet id.
///
/// Inserting a record whose id is already present replaces that row in place,
/// so an id always maps to exactly one row and the original position is kept.
#[derive(Clone, Debug, Default)]
pub struct TweetTable {
    field_names: Vec<String>,
    records: Vec<TweetRecord>,
    index: HashMap<String, usize>,
    normalized: bool,
}

impl TweetTable {
    /// Creates an empty table whose field columns are `fields`, in order.
    pub fn new<S: AsRef<str>>(fields: &[S]) -> Self {
        Self {
            field_names: fields.iter().map(|f| f.as_ref().to_string()).collect(),
            ..Self::default()
        }
    }

    /// Number of distinct tweets held.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Whether [`TweetTable::normalize`] has run.
    pub fn is_normalized(&self) -> bool {
        self.normalized
    }

    /// Adds or replaces a row. Returns `true` if the id was new.
    pub fn insert(&mut self, record: TweetRecord) -> bool {
        match self.index.get(&record.id) {
            Some(&position) => {
                debug!("Replacing existing row for tweet {}", record.id);
                self.records[position] = record;
                false
            }
            None => {
                self.index.insert(record.id.clone(), self.records.len());
                self.records.push(record);
                true
            }
        }
    }

    /// Inserts every record, returning how many ids were new.
    pub fn extend<I: IntoIterator<Item = TweetRecord>>(&mut self, records: I) -> usize {
        records
            .into_iter()
            .map(|record| self.insert(record))
            .filter(|added| *added)
            .count()
    }

    /// Finds a row by tweet id.
    ///
    /// # Parameters
    ///
    /// - `id`: The tweet identifier used as the table's index
    ///
    /// # Returns
    ///
    /// The row for `id`, or `None` if no page has returned that tweet.
    pub fn get(&self, id: &str) -> Option<&TweetRecord> {
        self.index.get(id).map(|&position| &self.records[position])
    }

    /// Returns `true` if a row with this tweet id exists.
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// All rows in insertion order.
    pub fn records(&self) -> &[TweetRecord] {
        &self.records
    }

    /// Iterates over rows in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, TweetRecord> {
        self.records.iter()
    }

    /// Drops the nested `public_metrics` column and fills `total_engagements`
    /// on every row.
    pub fn normalize(&mut self) {
        self.field_names.retain(|name| name != PUBLIC_METRICS_COLUMN);
        for record in &mut self.records {
            record.remove_field(PUBLIC_METRICS_COLUMN);
            record.total_engagements = Some(record.engagement_sum());
        }
        self.normalized = true;
    }

    fn extra_metric_names(&self) -> Vec<String> {
        self.records
            .iter()
            .flat_map(|record| record.metrics.keys())
            .filter(|name| !ENGAGEMENT_METRICS.contains(&name.as_str()))
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Column names after the index column, in export order.
    pub fn columns(&self) -> Vec<String> {
        let mut columns = self.field_names.clone();
        columns.extend(
            ["followers_count", "verified", "hashtags"]
                .iter()
                .map(|name| name.to_string()),
        );
        columns.extend(ENGAGEMENT_METRICS.iter().map(|name| name.to_string()));
        columns.extend(self.extra_metric_names());
        if self.normalized {
            columns.push(TOTAL_ENGAGEMENTS_COLUMN.to_string());
        }
        columns
    }

    fn row(&self, record: &TweetRecord, extra_metrics: &[String]) -> Vec<String> {
        let mut row = Vec::with_capacity(self.field_names.len() + extra_metrics.len() + 9);
        row.push(record.id.clone());
        for name in &self.field_names {
            row.push(record.field(name).map(value_cell).unwrap_or_default());
        }
        row.push(number_cell(&record.followers_count));
        row.push(match record.verified {
            Field::Present(verified) => verified.to_string(),
            Field::Missing => String::new(),
        });
        row.push(match &record.hashtags {
            Field::Present(tags) => Value::from(tags.clone()).to_string(),
            Field::Missing => String::new(),
        });
        for name in ENGAGEMENT_METRICS.iter() {
            row.push(number_cell(&record.metric(name)));
        }
        for name in extra_metrics {
            row.push(number_cell(&record.metric(name)));
        }
        if self.normalized {
            row.push(
                record
                    .total_engagements
                    .map(|total| total.to_string())
                    .unwrap_or_default(),
            );
        }
        row
    }

    /// Writes the table as CSV: a header line, then one line per tweet.
    ///
    /// # Parameters
    ///
    /// - `writer`: Destination for the CSV text
    ///
    /// # Returns
    ///
    /// - `Ok(())`: Every row was written and the writer flushed
    /// - `Err(Error::Csv)` / `Err(Error::Io)`: If writing failed
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        let extra_metrics = self.extra_metric_names();

        let mut header = vec![TWEET_ID_COLUMN.to_string()];
        header.extend(self.columns());
        csv_writer.write_record(&header)?;

        for record in &self.records {
            csv_writer.write_record(self.row(record, &extra_metrics))?;
        }

        csv_writer.flush()?;
        Ok(())
    }

    /// Writes the table to a CSV file at `path`, replacing any existing file.
    pub fn export_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = std::fs::File::create(path)?;
        self.write_csv(std::io::BufWriter::new(file))?;
        info!(
            "Exported {} tweets to {}",
            self.len(),
            path.as_os_str().to_string_lossy()
        );
        Ok(())
    }
}

impl<'a> IntoIterator for &'a TweetTable {
    type Item = &'a TweetRecord;
    type IntoIter = std::slice::Iter<'a, TweetRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

fn value_cell(field: &Field<Value>) -> String {
    match field {
        Field::Present(Value::String(text)) => text.clone(),
        Field::Present(value) => value.to_string(),
        Field::Missing => String::new(),
    }
}

fn number_cell(field: &Field<u64>) -> String {
    field
        .present()
        .map(|value| value.to_string())
        .unwrap_or_default()
}
