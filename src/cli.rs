use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use configuration::LogLevel;
use core_types::{NewProductionRecord, ProductionPatch, ProductionStatus, SearchFilter};
use rust_decimal::Decimal;
use std::path::PathBuf;

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Production records, profitability metrics and CSV exports for small farms.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file. Defaults to `config.toml` when present.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Keep records in process memory instead of PostgreSQL.
    #[arg(long, global = true)]
    pub memory: bool,

    /// Overrides `logging.level` from the configuration.
    #[arg(long, value_enum, global = true)]
    pub log_level: Option<LogLevel>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Register a new production lot.
    Create(CreateArgs),
    /// List every record, newest first.
    List {
        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
    /// Show one record with its derived metrics.
    Show { id: i64 },
    /// Change selected fields of a record.
    Update(UpdateArgs),
    /// Remove a record.
    Delete {
        id: i64,
        /// Confirm the deletion.
        #[arg(long)]
        yes: bool,
    },
    /// Find records by product name fragment and/or status.
    Search(SearchArgs),
    /// Write CSV files for external analysis.
    Export(ExportArgs),
    /// Rank products by a summary metric.
    Top(TopArgs),
    /// Insert sample records for the default crop list.
    Seed(SeedArgs),
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Crop name, e.g. "Tomate".
    #[arg(long)]
    pub product: String,
    #[arg(long)]
    pub quantity: Decimal,
    #[arg(long, default_value_t = Decimal::ZERO)]
    pub cost: Decimal,
    /// Zero while the lot is unsold.
    #[arg(long, default_value_t = Decimal::ZERO)]
    pub sale: Decimal,
    /// Planting date (format: YYYY-MM-DD).
    #[arg(long)]
    pub planted: Option<NaiveDate>,
    /// Harvest date (format: YYYY-MM-DD).
    #[arg(long)]
    pub harvested: Option<NaiveDate>,
    /// PLANTED, HARVESTED or SOLD.
    #[arg(long, default_value_t = ProductionStatus::Planted)]
    pub status: ProductionStatus,
}

impl From<CreateArgs> for NewProductionRecord {
    fn from(args: CreateArgs) -> Self {
        Self {
            product_name: args.product,
            quantity: args.quantity,
            cost_price: args.cost,
            sale_price: args.sale,
            planting_date: args.planted,
            harvest_date: args.harvested,
            status: args.status,
        }
    }
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    pub id: i64,
    #[arg(long)]
    pub product: Option<String>,
    #[arg(long)]
    pub quantity: Option<Decimal>,
    #[arg(long)]
    pub cost: Option<Decimal>,
    #[arg(long)]
    pub sale: Option<Decimal>,
    #[arg(long, conflicts_with = "clear_planting")]
    pub planted: Option<NaiveDate>,
    #[arg(long, conflicts_with = "clear_harvest")]
    pub harvested: Option<NaiveDate>,
    #[arg(long)]
    pub status: Option<ProductionStatus>,
    /// Remove the planting date.
    #[arg(long)]
    pub clear_planting: bool,
    /// Remove the harvest date.
    #[arg(long)]
    pub clear_harvest: bool,
}

impl UpdateArgs {
    pub fn to_patch(&self) -> ProductionPatch {
        let date_change = |value: Option<NaiveDate>, clear: bool| {
            if clear { Some(None) } else { value.map(Some) }
        };
        ProductionPatch {
            product_name: self.product.clone(),
            quantity: self.quantity,
            cost_price: self.cost,
            sale_price: self.sale,
            planting_date: date_change(self.planted, self.clear_planting),
            harvest_date: date_change(self.harvested, self.clear_harvest),
            status: self.status,
        }
    }
}

#[derive(Args, Debug, Default)]
pub struct SearchArgs {
    /// Case-insensitive fragment of the product name.
    #[arg(long)]
    pub product: Option<String>,
    #[arg(long)]
    pub status: Option<ProductionStatus>,
}

impl From<SearchArgs> for SearchFilter {
    fn from(args: SearchArgs) -> Self {
        Self {
            product_name: args.product,
            status: args.status,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportTarget {
    Records,
    Summary,
    Monthly,
    All,
}

#[derive(Args, Debug)]
pub struct ExportArgs {
    #[arg(value_enum)]
    pub target: ExportTarget,
    /// File name inside the export directory. Not allowed with `all`.
    #[arg(long)]
    pub file: Option<String>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum RankBy {
    Roi,
    Efficiency,
}

#[derive(Args, Debug)]
pub struct TopArgs {
    #[arg(value_enum)]
    pub by: RankBy,
    #[arg(short = 'n', long = "limit", default_value_t = 5)]
    pub n: usize,
}

#[derive(Args, Debug)]
pub struct SeedArgs {
    /// Upper bound of production cycles generated per crop.
    #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u32).range(1..=12))]
    pub cycles_max: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use rust_decimal_macros::dec;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn create_parses_prices_dates_and_status() {
        let cli = Cli::try_parse_from([
            "agrotrack", "--memory", "create", "--product", "Tomate", "--quantity", "100",
            "--cost", "50.5", "--planted", "2024-01-01", "--status", "sold",
        ])
        .unwrap();
        assert!(cli.memory);
        let Commands::Create(args) = cli.command else {
            panic!("expected create");
        };
        let new = NewProductionRecord::from(args);
        assert_eq!(new.cost_price, dec!(50.5));
        assert_eq!(new.sale_price, Decimal::ZERO);
        assert_eq!(new.planting_date, NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(new.status, ProductionStatus::Sold);
    }

    #[test]
    fn update_flags_become_a_patch() {
        let cli = Cli::try_parse_from([
            "agrotrack", "update", "4", "--sale", "80", "--clear-harvest",
        ])
        .unwrap();
        let Commands::Update(args) = cli.command else {
            panic!("expected update");
        };
        let patch = args.to_patch();
        assert_eq!(patch.sale_price, Some(dec!(80)));
        assert_eq!(patch.harvest_date, Some(None));
        assert_eq!(patch.planting_date, None);
        assert!(patch.product_name.is_none());
    }

    #[test]
    fn setting_and_clearing_a_date_conflict() {
        let result = Cli::try_parse_from([
            "agrotrack", "update", "4", "--planted", "2024-01-01", "--clear-planting",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn top_accepts_short_limit() {
        let cli = Cli::try_parse_from(["agrotrack", "top", "efficiency", "-n", "3"]).unwrap();
        let Commands::Top(args) = cli.command else {
            panic!("expected top");
        };
        assert_eq!(args.by, RankBy::Efficiency);
        assert_eq!(args.n, 3);
    }
}
