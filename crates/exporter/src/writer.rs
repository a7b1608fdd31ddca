use crate::error::ExportError;
use crate::rows::{RecordRow, MONTHLY_COLUMNS, PRODUCT_COLUMNS, RECORD_COLUMNS};
use analytics::{MetricsCalculator, MonthlyAggregator, ProductAggregator};
use chrono::Local;
use configuration::ExportConfig;
use core_types::{is_valid_format, ProductionRecord};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// The three export files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    Records,
    ProductSummary,
    MonthlyAnalysis,
}

impl ExportKind {
    /// Prefix of the default, timestamped file name.
    pub fn file_prefix(&self) -> &'static str {
        match self {
            ExportKind::Records => "agricultural_data",
            ExportKind::ProductSummary => "agricultural_summary",
            ExportKind::MonthlyAnalysis => "monthly_analysis",
        }
    }
}

/// Writes CSV exports into the configured output directory.
#[derive(Debug, Clone)]
pub struct CsvExporter {
    config: ExportConfig,
}

impl CsvExporter {
    pub fn new(config: ExportConfig) -> Self {
        Self { config }
    }

    pub fn output_dir(&self) -> &Path {
        &self.config.output_dir
    }

    /// Every record with its derived metrics appended.
    pub fn export_records(
        &self,
        records: &[ProductionRecord],
        calculator: &MetricsCalculator,
        file_name: Option<&str>,
    ) -> Result<PathBuf, ExportError> {
        if records.is_empty() {
            return Err(ExportError::NoRecords);
        }
        let rows = records
            .iter()
            .map(|record| RecordRow::new(record, calculator.calculate(record), &self.config.date_format));
        let path = self.write(ExportKind::Records, file_name, &RECORD_COLUMNS, rows)?;
        tracing::info!(path = %path.display(), records = records.len(), "Exported production records.");
        Ok(path)
    }

    /// One row per distinct product name.
    pub fn export_product_summary(
        &self,
        records: &[ProductionRecord],
        calculator: &MetricsCalculator,
        file_name: Option<&str>,
    ) -> Result<PathBuf, ExportError> {
        if records.is_empty() {
            return Err(ExportError::NoRecords);
        }
        let summaries = ProductAggregator::new(calculator).aggregate(records)?;
        let path = self.write(
            ExportKind::ProductSummary,
            file_name,
            &PRODUCT_COLUMNS,
            summaries.iter(),
        )?;
        tracing::info!(path = %path.display(), products = summaries.len(), "Exported product summary.");
        Ok(path)
    }

    /// One row per harvest month, oldest first.
    ///
    /// When no record has a usable harvest date the file holds only the header.
    pub fn export_monthly_analysis(
        &self,
        records: &[ProductionRecord],
        calculator: &MetricsCalculator,
        file_name: Option<&str>,
    ) -> Result<PathBuf, ExportError> {
        if records.is_empty() {
            return Err(ExportError::NoRecords);
        }
        let months = MonthlyAggregator::new(calculator).aggregate(records)?;
        if months.is_empty() {
            tracing::warn!("No record has a usable harvest date; monthly analysis is header-only.");
        }
        let path = self.write(
            ExportKind::MonthlyAnalysis,
            file_name,
            &MONTHLY_COLUMNS,
            months.iter(),
        )?;
        tracing::info!(path = %path.display(), months = months.len(), "Exported monthly analysis.");
        Ok(path)
    }

    /// Resolves the target path, writes header and rows to a temporary file in
    /// the same directory and renames it into place once everything succeeded.
    fn write<I, R>(
        &self,
        kind: ExportKind,
        file_name: Option<&str>,
        header: &[&str],
        rows: I,
    ) -> Result<PathBuf, ExportError>
    where
        I: IntoIterator<Item = R>,
        R: Serialize,
    {
        for format in [&self.config.timestamp_format, &self.config.date_format] {
            if !is_valid_format(format) {
                return Err(ExportError::InvalidFormat(format.clone()));
            }
        }
        let target = self.target_path(kind, file_name)?;
        fs::create_dir_all(&self.config.output_dir)?;

        let mut temp = NamedTempFile::new_in(&self.config.output_dir)?;
        {
            let mut writer = csv::WriterBuilder::new()
                .has_headers(false)
                .from_writer(&mut temp);
            writer.write_record(header)?;
            for row in rows {
                writer.serialize(row)?;
            }
            writer.flush()?;
        }
        temp.as_file().sync_all()?;
        temp.persist(&target)?;
        Ok(target)
    }

    fn target_path(&self, kind: ExportKind, file_name: Option<&str>) -> Result<PathBuf, ExportError> {
        let name = match file_name {
            Some(name) => {
                let is_plain = Path::new(name)
                    .file_name()
                    .is_some_and(|plain| plain == name);
                if !is_plain {
                    return Err(ExportError::InvalidFileName(name.to_string()));
                }
                name.to_string()
            }
            None => format!(
                "{}_{}.csv",
                kind.file_prefix(),
                Local::now().format(&self.config.timestamp_format)
            ),
        };
        Ok(self.config.output_dir.join(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use core_types::{DateValue, NewProductionRecord, ProductionStatus};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn exporter(dir: &Path) -> CsvExporter {
        CsvExporter::new(ExportConfig {
            output_dir: dir.join("data"),
            ..ExportConfig::default()
        })
    }

    fn record(id: i64, name: &str, cost: Decimal, sale: Decimal, dates: Option<(&str, &str)>) -> ProductionRecord {
        let mut new = NewProductionRecord::new(name, dec!(100));
        new.cost_price = cost;
        new.sale_price = sale;
        new.status = ProductionStatus::Sold;
        let mut record = ProductionRecord::from_new(id, new, Utc::now());
        if let Some((planting, harvest)) = dates {
            record.planting_date = Some(DateValue::from(planting));
            record.harvest_date = Some(DateValue::from(harvest));
        }
        record
    }

    fn read_lines(path: &Path) -> Vec<String> {
        fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn records_export_appends_metrics_in_fixed_order() {
        let dir = tempfile::tempdir().unwrap();
        let records = vec![
            record(1, "Tomate", dec!(50), dec!(80), Some(("2024-01-01", "2024-03-01"))),
            record(2, "Milho", dec!(0), dec!(0), None),
        ];
        let path = exporter(dir.path())
            .export_records(&records, &MetricsCalculator::default(), Some("all.csv"))
            .unwrap();

        assert_eq!(path, dir.path().join("data").join("all.csv"));
        let lines = read_lines(&path);
        assert_eq!(lines[0], RECORD_COLUMNS.join(","));
        assert_eq!(lines.len(), 3);

        let first: Vec<&str> = lines[1].split(',').collect();
        assert_eq!(first[0], "1");
        assert_eq!(first[1], "Tomate");
        assert_eq!(first[5], "2024-01-01");
        assert_eq!(first[6], "2024-03-01");
        assert_eq!(first[7], "SOLD");
        assert_eq!(first[10], "30");
        assert_eq!(first[11], "60");
        assert_eq!(first[12], "2");
        assert_eq!(first[13], "0.8");
        assert_eq!(first[14], "0.5");
        assert_eq!(first[15], "60");

        let second: Vec<&str> = lines[2].split(',').collect();
        assert_eq!(second[5], "");
        assert_eq!(second[6], "");
        assert_eq!(&second[10..], ["0", "0", "0", "0", "0", "0"]);
    }

    #[test]
    fn product_summary_has_one_row_per_product() {
        let dir = tempfile::tempdir().unwrap();
        let records = vec![
            record(1, "Tomate", dec!(50), dec!(80), None),
            record(2, "Alface", dec!(10), dec!(0), None),
            record(3, "Tomate", dec!(30), dec!(45), None),
        ];
        let path = exporter(dir.path())
            .export_product_summary(&records, &MetricsCalculator::default(), None)
            .unwrap();

        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("agricultural_summary_") && name.ends_with(".csv"));

        let lines = read_lines(&path);
        assert_eq!(lines[0], PRODUCT_COLUMNS.join(","));
        assert_eq!(lines[1], "Tomate,200,80,125,45,56.25,0,0,2,0");
        assert!(lines[2].starts_with("Alface,100,10,0,-10,-100,"));
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn monthly_analysis_is_sorted_and_skips_undated() {
        let dir = tempfile::tempdir().unwrap();
        let records = vec![
            record(1, "Milho", dec!(50), dec!(80), Some(("2024-01-01", "2024-05-20"))),
            record(2, "Milho", dec!(50), dec!(80), Some(("2023-10-01", "2024-01-15"))),
            record(3, "Milho", dec!(50), dec!(80), None),
        ];
        let path = exporter(dir.path())
            .export_monthly_analysis(&records, &MetricsCalculator::default(), Some("m.csv"))
            .unwrap();

        let lines = read_lines(&path);
        assert_eq!(lines[0], MONTHLY_COLUMNS.join(","));
        assert!(lines[1].starts_with("2024-01,1,"));
        assert!(lines[2].starts_with("2024-05,1,"));
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn monthly_analysis_without_harvest_dates_is_header_only() {
        let dir = tempfile::tempdir().unwrap();
        let records = vec![record(1, "Milho", dec!(1), dec!(1), None)];
        let path = exporter(dir.path())
            .export_monthly_analysis(&records, &MetricsCalculator::default(), Some("m.csv"))
            .unwrap();
        assert_eq!(read_lines(&path), [MONTHLY_COLUMNS.join(",")]);
    }

    #[test]
    fn empty_input_fails_and_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = exporter(dir.path());
        let calc = MetricsCalculator::default();

        assert!(matches!(exporter.export_records(&[], &calc, None), Err(ExportError::NoRecords)));
        assert!(matches!(
            exporter.export_product_summary(&[], &calc, None),
            Err(ExportError::NoRecords)
        ));
        assert!(matches!(
            exporter.export_monthly_analysis(&[], &calc, None),
            Err(ExportError::NoRecords)
        ));
        assert!(!exporter.output_dir().exists());
    }

    #[test]
    fn nested_file_names_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let records = vec![record(1, "Milho", dec!(1), dec!(1), None)];
        let result = exporter(dir.path()).export_records(
            &records,
            &MetricsCalculator::default(),
            Some("../escape.csv"),
        );
        assert!(matches!(result, Err(ExportError::InvalidFileName(_))));
        assert!(!dir.path().join("escape.csv").exists());
    }

    #[test]
    fn names_with_commas_are_quoted() {
        let dir = tempfile::tempdir().unwrap();
        let records = vec![record(1, "Feijão, carioca", dec!(1), dec!(1), None)];
        let path = exporter(dir.path())
            .export_records(&records, &MetricsCalculator::default(), Some("q.csv"))
            .unwrap();
        assert!(read_lines(&path)[1].starts_with("1,\"Feijão, carioca\",100,"));
    }

    #[test]
    fn malformed_formats_fail_without_panicking() {
        let dir = tempfile::tempdir().unwrap();
        let records = vec![record(1, "Milho", dec!(1), dec!(1), None)];
        let calc = MetricsCalculator::default();

        let bad_timestamp = CsvExporter::new(ExportConfig {
            output_dir: dir.path().join("data"),
            timestamp_format: "%Q".to_string(),
            ..ExportConfig::default()
        });
        assert!(matches!(
            bad_timestamp.export_records(&records, &calc, None),
            Err(ExportError::InvalidFormat(_))
        ));

        let bad_date = CsvExporter::new(ExportConfig {
            output_dir: dir.path().join("data"),
            date_format: "%Y-%".to_string(),
            ..ExportConfig::default()
        });
        assert!(matches!(
            bad_date.export_records(&records, &calc, Some("r.csv")),
            Err(ExportError::InvalidFormat(_))
        ));
        assert!(!dir.path().join("data").exists());
    }

    /// Serializes like a normal row until told to fail.
    struct FlakyRow(bool);

    impl Serialize for FlakyRow {
        fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            if self.0 {
                return Err(serde::ser::Error::custom("row could not be encoded"));
            }
            serializer.serialize_str("ok")
        }
    }

    #[test]
    fn failure_mid_write_leaves_no_file_behind() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = exporter(dir.path());
        let rows = vec![FlakyRow(false), FlakyRow(false), FlakyRow(true), FlakyRow(false)];

        let result = exporter.write(ExportKind::Records, Some("partial.csv"), &["value"], rows);
        assert!(matches!(result, Err(ExportError::Csv(_))));

        let leftovers: Vec<_> = fs::read_dir(exporter.output_dir()).unwrap().collect();
        assert!(leftovers.is_empty(), "unexpected files: {leftovers:?}");
    }
}
