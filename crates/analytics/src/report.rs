use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Figures derived from a single record. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedMetrics {
    pub profit: Decimal,
    pub roi_percent: Decimal,
    /// Quantity produced per currency unit invested.
    pub production_efficiency: Decimal,
    pub revenue_per_unit: Decimal,
    pub cost_per_unit: Decimal,
    /// Whole days from planting to harvest, 0 when either date is unusable.
    pub growth_period_days: i64,
}

/// Totals for every record sharing one exact product name.
///
/// Field order is the column order of the product summary export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSummary {
    pub product_name: String,
    pub total_quantity: Decimal,
    pub total_cost: Decimal,
    pub total_revenue: Decimal,
    pub total_profit: Decimal,
    pub total_roi_percent: Decimal,
    pub count_planted: u64,
    pub count_harvested: u64,
    pub count_sold: u64,
    /// Mean over the records with a positive growth period only.
    pub avg_growth_period: Decimal,
    /// total_quantity / total_cost. Used for ranking, not exported.
    #[serde(skip)]
    pub efficiency: Decimal,
}

impl ProductSummary {
    pub fn record_count(&self) -> u64 {
        self.count_planted + self.count_harvested + self.count_sold
    }
}

/// Totals for every record harvested in one calendar month.
///
/// Field order is the column order of the monthly analysis export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlySummary {
    /// `YYYY-MM` of the harvest date.
    pub year_month: String,
    pub production_count: u64,
    pub total_quantity: Decimal,
    pub total_cost: Decimal,
    pub total_revenue: Decimal,
    pub total_profit: Decimal,
    pub roi_percent: Decimal,
    pub efficiency: Decimal,
    pub avg_quantity_per_production: Decimal,
}
