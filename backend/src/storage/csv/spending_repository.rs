use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use csv::{Reader, Writer};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs::{self, File};
use std::io::BufReader;
use tracing::{debug, info, warn};

use super::connection::CsvConnection;
use crate::domain::models::SpendingRecord;
use crate::storage::traits::SpendingStorage;

/// Contents of the id sequence file next to the ledger
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SpendingSequence {
    next_id: i64,
}

/// CSV-based ledger of spending records
#[derive(Clone)]
pub struct SpendingRepository {
    connection: CsvConnection,
}

impl SpendingRepository {
    /// Create a new CSV spending repository
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    /// Read every record from the CSV file, in file order
    fn read_spending(&self) -> Result<Vec<SpendingRecord>> {
        self.connection.ensure_spending_file_exists()?;

        let file_path = self.connection.spending_file_path();
        let file = File::open(&file_path)
            .with_context(|| format!("opening {}", file_path.display()))?;
        let mut csv_reader = Reader::from_reader(BufReader::new(file));

        let mut records = Vec::new();
        for (line, result) in csv_reader.records().enumerate() {
            let row = result.with_context(|| format!("reading {}", file_path.display()))?;

            let id = row
                .get(0)
                .unwrap_or("")
                .trim()
                .parse::<i64>()
                .with_context(|| format!("row {}: invalid spending id", line + 1))?;
            let date_str = row.get(5).unwrap_or("");
            let date_time_utc = Self::parse_timestamp(date_str)
                .with_context(|| format!("row {}: invalid timestamp '{}'", line + 1, date_str))?;

            records.push(SpendingRecord {
                id: Some(id),
                name: row.get(1).unwrap_or("").to_string(),
                price: Self::parse_amount(row.get(2), "price", id),
                kilograms: Self::parse_amount(row.get(3), "kilograms", id),
                quantity: Self::parse_amount(row.get(4), "quantity", id),
                date_time_utc,
            });
        }

        Ok(records)
    }

    /// Numeric columns are read forgivingly: anything unparseable or negative
    /// counts as 0
    fn parse_amount(field: Option<&str>, column: &str, id: i64) -> f64 {
        let raw = field.unwrap_or("").trim();
        match raw.parse::<f64>() {
            Ok(value) if value.is_finite() && value >= 0.0 => value,
            _ => {
                warn!("Spending {}: unreadable {} '{}', using 0", id, column, raw);
                0.0
            }
        }
    }

    fn parse_timestamp(date_str: &str) -> Result<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(date_str.trim())
            .map(|date| date.with_timezone(&Utc))
            .map_err(|e| anyhow!(e))
    }

    /// Write all records back to the CSV file
    fn write_spending(&self, records: &[SpendingRecord]) -> Result<()> {
        let mut csv_writer = Writer::from_writer(Vec::new());
        csv_writer.write_record(["id", "name", "price", "kilograms", "quantity", "date_time_utc"])?;

        for record in records {
            let id = record
                .id
                .ok_or_else(|| anyhow!("refusing to write spending '{}' without an id", record.name))?;
            csv_writer.write_record([
                id.to_string(),
                record.name.clone(),
                record.price.to_string(),
                record.kilograms.to_string(),
                record.quantity.to_string(),
                record.date_time_utc.to_rfc3339_opts(SecondsFormat::Secs, false),
            ])?;
        }

        let bytes = csv_writer.into_inner().map_err(|e| anyhow!(e.to_string()))?;
        self.connection
            .write_atomically(&self.connection.spending_file_path(), &bytes)
    }

    /// Next id from the sequence file; 1 when the file does not exist yet
    fn read_next_id(&self) -> Result<i64> {
        let path = self.connection.spending_sequence_file_path();
        if !path.exists() {
            return Ok(1);
        }

        let yaml_content =
            fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
        let sequence: SpendingSequence = serde_yaml::from_str(&yaml_content)
            .with_context(|| format!("parsing {}", path.display()))?;
        Ok(sequence.next_id)
    }

    fn write_next_id(&self, next_id: i64) -> Result<()> {
        let yaml_content = serde_yaml::to_string(&SpendingSequence { next_id })?;
        self.connection.write_atomically(
            &self.connection.spending_sequence_file_path(),
            yaml_content.as_bytes(),
        )
    }

    fn local_date(&self, record: &SpendingRecord) -> NaiveDate {
        record
            .date_time_utc
            .with_timezone(&self.connection.reference_zone())
            .date_naive()
    }
}

impl SpendingStorage for SpendingRepository {
    fn insert_spending(&self, record: &SpendingRecord) -> Result<SpendingRecord> {
        let _guard = self.connection.lock_for_write();

        let mut records = self.read_spending()?;
        // A ledger edited by hand may already hold ids past the sequence
        let highest_stored = records.iter().filter_map(|r| r.id).max().unwrap_or(0);
        let next_id = self.read_next_id()?.max(highest_stored + 1);
        let stored = record.clone().with_id(next_id);
        records.push(stored.clone());
        self.write_spending(&records)?;
        self.write_next_id(next_id + 1)?;

        info!("Stored spending {} '{}' ({:.2})", next_id, stored.name, stored.price);
        Ok(stored)
    }

    fn list_all_spending(&self) -> Result<Vec<SpendingRecord>> {
        self.read_spending()
    }

    fn list_spending_by_date(&self, date: NaiveDate) -> Result<Vec<SpendingRecord>> {
        let mut records = self.read_spending()?;
        records.retain(|record| self.local_date(record) == date);
        debug!("Found {} spending records on {}", records.len(), date);
        Ok(records)
    }

    fn list_distinct_dates(&self) -> Result<Vec<NaiveDate>> {
        let records = self.read_spending()?;
        let dates: BTreeSet<NaiveDate> = records.iter().map(|record| self.local_date(record)).collect();
        Ok(dates.into_iter().collect())
    }

    fn delete_spending(&self, id: i64) -> Result<bool> {
        let _guard = self.connection.lock_for_write();

        let mut records = self.read_spending()?;
        let original_len = records.len();
        records.retain(|record| record.id != Some(id));

        if records.len() < original_len {
            self.write_spending(&records)?;
            info!("Deleted spending {}", id);
            Ok(true)
        } else {
            warn!("Spending {} not found, nothing deleted", id);
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::csv::test_utils::TestHelper;
    use chrono::FixedOffset;
    use std::fs;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn test_insert_assigns_sequential_ids() -> Result<()> {
        let helper = TestHelper::new()?;

        let first = helper.create_spending("Bread", 2.5, "2024-03-05T09:00:00Z")?;
        let second = helper.create_spending("Milk", 1.2, "2024-03-05T10:00:00Z")?;

        assert_eq!(first.id, Some(1));
        assert_eq!(second.id, Some(2));
        assert_eq!(helper.spending_repo.list_all_spending()?.len(), 2);
        Ok(())
    }

    #[test]
    fn test_next_id_follows_highest_after_deleting_older_record() -> Result<()> {
        let helper = TestHelper::new()?;
        helper.create_spending("A", 1.0, "2024-03-05T09:00:00Z")?;
        helper.create_spending("B", 1.0, "2024-03-05T09:00:00Z")?;
        helper.spending_repo.delete_spending(1)?;

        let third = helper.create_spending("C", 1.0, "2024-03-05T09:00:00Z")?;
        assert_eq!(third.id, Some(3));
        Ok(())
    }

    #[test]
    fn test_id_of_deleted_newest_record_is_never_reused() -> Result<()> {
        let helper = TestHelper::new()?;
        helper.create_spending("A", 1.0, "2024-03-05T09:00:00Z")?;
        let newest = helper.create_spending("B", 1.0, "2024-03-05T10:00:00Z")?;
        let newest_id = newest.id.unwrap();
        assert!(helper.spending_repo.delete_spending(newest_id)?);

        let replacement = helper.create_spending("C", 1.0, "2024-03-05T11:00:00Z")?;
        assert_ne!(replacement.id, Some(newest_id));
        assert_eq!(replacement.id, Some(3));

        // Retrying the earlier delete must not touch the new record
        assert!(!helper.spending_repo.delete_spending(newest_id)?);
        let names: Vec<String> = helper
            .spending_repo
            .list_all_spending()?
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["A", "C"]);
        Ok(())
    }

    #[test]
    fn test_sequence_survives_a_new_repository() -> Result<()> {
        let helper = TestHelper::new()?;
        helper.create_spending("A", 1.0, "2024-03-05T09:00:00Z")?;
        helper.spending_repo.delete_spending(1)?;

        let reopened = SpendingRepository::new(helper.env.connection.clone());
        let when = DateTime::parse_from_rfc3339("2024-03-06T09:00:00Z")?.with_timezone(&Utc);
        let stored = reopened.insert_spending(&SpendingRecord::new("B", 1.0, 0.0, 1.0, when)?)?;
        assert_eq!(stored.id, Some(2));
        Ok(())
    }

    #[test]
    fn test_hand_edited_ledger_ids_are_skipped() -> Result<()> {
        let helper = TestHelper::new()?;
        fs::write(
            helper.env.connection.spending_file_path(),
            "id,name,price,kilograms,quantity,date_time_utc\n7,Tea,2,0,1,2024-03-05T09:00:00Z\n",
        )?;

        let stored = helper.create_spending("Cake", 3.0, "2024-03-05T10:00:00Z")?;
        assert_eq!(stored.id, Some(8));
        Ok(())
    }

    #[test]
    fn test_round_trip_preserves_fields() -> Result<()> {
        let helper = TestHelper::new()?;
        let when = DateTime::parse_from_rfc3339("2024-03-05T09:15:30Z")?.with_timezone(&Utc);
        let record = SpendingRecord::new("Apples, red", 3.75, 1.5, 6.0, when)?;

        helper.spending_repo.insert_spending(&record)?;
        let stored = helper.spending_repo.list_all_spending()?;

        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].name, "Apples, red");
        assert_eq!(stored[0].price, 3.75);
        assert_eq!(stored[0].kilograms, 1.5);
        assert_eq!(stored[0].quantity, 6.0);
        assert_eq!(stored[0].date_time_utc, when);
        Ok(())
    }

    #[test]
    fn test_list_by_exact_date() -> Result<()> {
        let helper = TestHelper::new()?;
        helper.create_spending("Coffee", 3.0, "2024-03-05T08:00:00Z")?;
        helper.create_spending("Lunch", 9.0, "2024-03-05T12:30:00Z")?;
        helper.create_spending("Dinner", 15.0, "2024-03-06T19:00:00Z")?;

        let on_fifth = helper.spending_repo.list_spending_by_date(date(2024, 3, 5))?;
        let names: Vec<&str> = on_fifth.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Coffee", "Lunch"]);

        assert!(helper.spending_repo.list_spending_by_date(date(2024, 3, 7))?.is_empty());
        Ok(())
    }

    #[test]
    fn test_list_by_date_uses_reference_zone() -> Result<()> {
        let helper = TestHelper::with_zone(FixedOffset::west_opt(5 * 3600).unwrap())?;
        // 02:00 UTC on the 6th is still the evening of the 5th at UTC-5
        helper.create_spending("Late snack", 4.0, "2024-03-06T02:00:00Z")?;

        assert_eq!(helper.spending_repo.list_spending_by_date(date(2024, 3, 5))?.len(), 1);
        assert!(helper.spending_repo.list_spending_by_date(date(2024, 3, 6))?.is_empty());
        assert_eq!(helper.spending_repo.list_distinct_dates()?, vec![date(2024, 3, 5)]);
        Ok(())
    }

    #[test]
    fn test_distinct_dates_are_sorted_and_unique() -> Result<()> {
        let helper = TestHelper::new()?;
        helper.create_spending("C", 1.0, "2024-04-01T08:00:00Z")?;
        helper.create_spending("A", 1.0, "2024-03-05T08:00:00Z")?;
        helper.create_spending("B", 1.0, "2024-03-05T20:00:00Z")?;

        assert_eq!(
            helper.spending_repo.list_distinct_dates()?,
            vec![date(2024, 3, 5), date(2024, 4, 1)]
        );
        Ok(())
    }

    #[test]
    fn test_delete_is_idempotent() -> Result<()> {
        let helper = TestHelper::new()?;
        let stored = helper.create_spending("Bread", 2.5, "2024-03-05T09:00:00Z")?;
        let id = stored.id.unwrap();

        assert!(helper.spending_repo.delete_spending(id)?);
        assert!(!helper.spending_repo.delete_spending(id)?);
        assert!(!helper.spending_repo.delete_spending(999)?);
        assert!(helper.spending_repo.list_all_spending()?.is_empty());
        Ok(())
    }

    #[test]
    fn test_empty_store_lists_nothing() -> Result<()> {
        let helper = TestHelper::new()?;
        assert!(helper.spending_repo.list_all_spending()?.is_empty());
        assert!(helper.spending_repo.list_distinct_dates()?.is_empty());
        Ok(())
    }

    #[test]
    fn test_unreadable_amounts_read_as_zero() -> Result<()> {
        let helper = TestHelper::new()?;
        fs::write(
            helper.env.connection.spending_file_path(),
            "id,name,price,kilograms,quantity,date_time_utc\n1,Odd,abc,,2,2024-03-05T09:00:00Z\n",
        )?;

        let records = helper.spending_repo.list_all_spending()?;
        assert_eq!(records[0].price, 0.0);
        assert_eq!(records[0].kilograms, 0.0);
        assert_eq!(records[0].quantity, 2.0);
        Ok(())
    }

    #[test]
    fn test_negative_amounts_read_as_zero() -> Result<()> {
        let helper = TestHelper::new()?;
        fs::write(
            helper.env.connection.spending_file_path(),
            "id,name,price,kilograms,quantity,date_time_utc\n1,Refund,-5,-0.5,-1,2024-03-05T09:00:00Z\n",
        )?;

        let records = helper.spending_repo.list_all_spending()?;
        assert_eq!(records[0].price, 0.0);
        assert_eq!(records[0].kilograms, 0.0);
        assert_eq!(records[0].quantity, 0.0);
        assert_eq!(records[0].name, "Refund");
        Ok(())
    }

    #[test]
    fn test_corrupt_timestamp_is_an_error() -> Result<()> {
        let helper = TestHelper::new()?;
        fs::write(
            helper.env.connection.spending_file_path(),
            "id,name,price,kilograms,quantity,date_time_utc\n1,Odd,1,0,1,not-a-date\n",
        )?;

        assert!(helper.spending_repo.list_all_spending().is_err());
        Ok(())
    }
}
