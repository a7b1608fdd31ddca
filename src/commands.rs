use crate::cli::{Commands, ExportTarget, RankBy, SearchArgs, TopArgs, UpdateArgs};
use crate::display::{self, RecordView};
use crate::seed;
use analytics::{rank, MetricsCalculator, ProductAggregator};
use anyhow::{bail, Context, Result};
use chrono::Local;
use configuration::Config;
use core_types::{NewProductionRecord, ProductionRecord, SearchFilter};
use database::RecordStore;
use exporter::CsvExporter;
use std::io::Write;
use std::path::PathBuf;

/// Everything a command needs: the record store plus the configured
/// calculator and exporter.
pub struct App {
    store: Box<dyn RecordStore>,
    calculator: MetricsCalculator,
    exporter: CsvExporter,
}

impl App {
    pub fn new(store: Box<dyn RecordStore>, config: &Config) -> Self {
        Self {
            store,
            calculator: MetricsCalculator::new(config.metrics.clone()),
            exporter: CsvExporter::new(config.export.clone()),
        }
    }

    /// Runs one command, writing user-facing output to `out`.
    pub async fn run(&self, command: Commands, out: &mut impl Write) -> Result<()> {
        match command {
            Commands::Create(args) => self.create(args.into(), out).await,
            Commands::List { json } => self.list(json, out).await,
            Commands::Show { id } => self.show(id, out).await,
            Commands::Update(args) => self.update(&args, out).await,
            Commands::Delete { id, yes } => self.delete(id, yes, out).await,
            Commands::Search(args) => self.search(args, out).await,
            Commands::Export(args) => {
                let paths = self.export(args.target, args.file.as_deref()).await?;
                for path in paths {
                    writeln!(out, "Exported {}", path.display())?;
                }
                Ok(())
            }
            Commands::Top(args) => self.top(&args, out).await,
            Commands::Seed(args) => self.seed(args.cycles_max, out).await,
        }
    }

    async fn create(&self, record: NewProductionRecord, out: &mut impl Write) -> Result<()> {
        let id = self
            .store
            .create(record)
            .await
            .context("Failed to create production record")?;
        writeln!(out, "Created production record {id}.")?;
        Ok(())
    }

    async fn list(&self, json: bool, out: &mut impl Write) -> Result<()> {
        let records = self.store.read_all().await.context("Failed to read records")?;
        if json {
            let views: Vec<RecordView> = records
                .iter()
                .map(|record| RecordView {
                    record,
                    metrics: self.calculator.calculate(record),
                })
                .collect();
            writeln!(out, "{}", serde_json::to_string_pretty(&views)?)?;
            return Ok(());
        }
        self.print_records(&records, out)
    }

    async fn show(&self, id: i64, out: &mut impl Write) -> Result<()> {
        let record = self
            .store
            .read_by_id(id)
            .await
            .with_context(|| format!("Failed to read production record {id}"))?;
        writeln!(out, "{}", display::record_detail(&record, &self.calculator))?;
        Ok(())
    }

    async fn update(&self, args: &UpdateArgs, out: &mut impl Write) -> Result<()> {
        let updated = self
            .store
            .update(args.id, &args.to_patch())
            .await
            .with_context(|| format!("Failed to update production record {}", args.id))?;
        writeln!(out, "Updated production record {}.", updated.id)?;
        writeln!(out, "{}", display::record_detail(&updated, &self.calculator))?;
        Ok(())
    }

    async fn delete(&self, id: i64, confirmed: bool, out: &mut impl Write) -> Result<()> {
        let record = self
            .store
            .read_by_id(id)
            .await
            .with_context(|| format!("Failed to read production record {id}"))?;
        if !confirmed {
            writeln!(
                out,
                "Would delete record {id} ({}, {}). Re-run with --yes to confirm.",
                record.product_name, record.status
            )?;
            return Ok(());
        }
        self.store
            .delete(id)
            .await
            .with_context(|| format!("Failed to delete production record {id}"))?;
        writeln!(out, "Deleted production record {id}.")?;
        Ok(())
    }

    async fn search(&self, args: SearchArgs, out: &mut impl Write) -> Result<()> {
        let filter = SearchFilter::from(args);
        let records = self.store.search(&filter).await.context("Search failed")?;
        self.print_records(&records, out)
    }

    /// Writes the requested CSV files and returns their paths.
    pub async fn export(&self, target: ExportTarget, file: Option<&str>) -> Result<Vec<PathBuf>> {
        if target == ExportTarget::All && file.is_some() {
            bail!("--file names a single file and cannot be combined with `export all`");
        }
        let records = self.store.read_all().await.context("Failed to read records")?;
        let calc = &self.calculator;

        let mut paths = Vec::new();
        if matches!(target, ExportTarget::Records | ExportTarget::All) {
            paths.push(
                self.exporter
                    .export_records(&records, calc, file)
                    .context("Record export failed")?,
            );
        }
        if matches!(target, ExportTarget::Summary | ExportTarget::All) {
            paths.push(
                self.exporter
                    .export_product_summary(&records, calc, file)
                    .context("Product summary export failed")?,
            );
        }
        if matches!(target, ExportTarget::Monthly | ExportTarget::All) {
            paths.push(
                self.exporter
                    .export_monthly_analysis(&records, calc, file)
                    .context("Monthly analysis export failed")?,
            );
        }
        Ok(paths)
    }

    async fn top(&self, args: &TopArgs, out: &mut impl Write) -> Result<()> {
        let records = self.store.read_all().await.context("Failed to read records")?;
        if records.is_empty() {
            writeln!(out, "No production records yet.")?;
            return Ok(());
        }
        let summaries = ProductAggregator::new(&self.calculator).aggregate(&records)?;
        let ranked = match args.by {
            RankBy::Roi => rank::top_by_roi(&summaries, args.n),
            RankBy::Efficiency => rank::top_by_efficiency(&summaries, args.n),
        };
        writeln!(out, "{}", display::ranking_table(&ranked))?;
        Ok(())
    }

    async fn seed(&self, cycles_max: u32, out: &mut impl Write) -> Result<()> {
        let today = Local::now().date_naive();
        let samples = seed::sample_records(&mut rand::rng(), today, cycles_max);
        let total = samples.len();

        let mut created = 0;
        for sample in samples {
            let name = sample.product_name.clone();
            match self.store.create(sample).await {
                Ok(_) => created += 1,
                Err(error) => tracing::warn!(product = %name, %error, "Failed to insert sample record."),
            }
        }
        tracing::info!(created, total, "Seeded sample records.");
        writeln!(out, "Created {created}/{total} sample records.")?;
        if created == 0 {
            bail!("No sample record could be inserted");
        }
        Ok(())
    }

    fn print_records(&self, records: &[ProductionRecord], out: &mut impl Write) -> Result<()> {
        if records.is_empty() {
            writeln!(out, "No production records found.")?;
            return Ok(());
        }
        writeln!(out, "{}", display::records_table(records, &self.calculator))?;
        writeln!(out, "{} record(s).", records.len())?;
        Ok(())
    }
}
