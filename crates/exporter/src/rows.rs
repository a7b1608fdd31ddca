use analytics::DerivedMetrics;
use core_types::ProductionRecord;
use rust_decimal::Decimal;
use serde::Serialize;

pub const RECORD_COLUMNS: [&str; 16] = [
    "id",
    "product_name",
    "quantity",
    "sale_price",
    "cost_price",
    "planting_date",
    "harvest_date",
    "production_status",
    "created_at",
    "updated_at",
    "profit",
    "roi_percent",
    "production_efficiency",
    "revenue_per_unit",
    "cost_per_unit",
    "growth_period_days",
];

pub const PRODUCT_COLUMNS: [&str; 10] = [
    "product_name",
    "total_quantity",
    "total_cost",
    "total_revenue",
    "total_profit",
    "total_roi_percent",
    "count_planted",
    "count_harvested",
    "count_sold",
    "avg_growth_period",
];

pub const MONTHLY_COLUMNS: [&str; 9] = [
    "year_month",
    "production_count",
    "total_quantity",
    "total_cost",
    "total_revenue",
    "total_profit",
    "roi_percent",
    "efficiency",
    "avg_quantity_per_production",
];

/// One line of the full-dataset export. Field order follows `RECORD_COLUMNS`.
#[derive(Debug, Serialize)]
pub(crate) struct RecordRow<'a> {
    id: i64,
    product_name: &'a str,
    quantity: Decimal,
    sale_price: Decimal,
    cost_price: Decimal,
    planting_date: String,
    harvest_date: String,
    production_status: &'static str,
    created_at: String,
    updated_at: String,
    profit: Decimal,
    roi_percent: Decimal,
    production_efficiency: Decimal,
    revenue_per_unit: Decimal,
    cost_per_unit: Decimal,
    growth_period_days: i64,
}

impl<'a> RecordRow<'a> {
    /// Dates render with `date_format`; absent dates become empty cells.
    pub(crate) fn new(
        record: &'a ProductionRecord,
        metrics: DerivedMetrics,
        date_format: &str,
    ) -> Self {
        let render = |value: Option<&core_types::DateValue>| {
            value.map(|v| v.render(date_format)).unwrap_or_default()
        };
        Self {
            id: record.id,
            product_name: &record.product_name,
            quantity: record.quantity,
            sale_price: record.sale_price,
            cost_price: record.cost_price,
            planting_date: render(record.planting_date.as_ref()),
            harvest_date: render(record.harvest_date.as_ref()),
            production_status: record.status.as_str(),
            created_at: record.created_at.format(date_format).to_string(),
            updated_at: record.updated_at.format(date_format).to_string(),
            profit: metrics.profit,
            roi_percent: metrics.roi_percent,
            production_efficiency: metrics.production_efficiency,
            revenue_per_unit: metrics.revenue_per_unit,
            cost_per_unit: metrics.cost_per_unit,
            growth_period_days: metrics.growth_period_days,
        }
    }
}
