use analytics::{DerivedMetrics, MetricsCalculator, ProductSummary};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};
use core_types::{DateValue, ProductionRecord};
use rust_decimal::Decimal;
use serde::Serialize;

/// A record together with its derived metrics, for JSON output.
#[derive(Debug, Serialize)]
pub struct RecordView<'a> {
    #[serde(flatten)]
    pub record: &'a ProductionRecord,
    pub metrics: DerivedMetrics,
}

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn date_cell(value: Option<&DateValue>, format: &str) -> String {
    value.map(|v| v.render(format)).unwrap_or_else(|| "-".to_string())
}

fn number(value: Decimal) -> Cell {
    Cell::new(value).set_alignment(CellAlignment::Right)
}

/// The listing used by `list` and `search`.
///
/// Profit and ROI are only shown once a lot has both a cost and a sale price.
pub fn records_table(records: &[ProductionRecord], calculator: &MetricsCalculator) -> Table {
    let format = &calculator.config().date_format;
    let mut table = new_table();
    table.set_header(vec![
        "ID", "Product", "Quantity", "Cost", "Sale", "Planted", "Harvested", "Status", "Profit",
        "ROI %",
    ]);

    for record in records {
        let priced = record.cost_price > Decimal::ZERO && record.sale_price > Decimal::ZERO;
        let metrics = calculator.calculate(record);
        let (profit, roi) = if priced {
            (number(metrics.profit), number(metrics.roi_percent))
        } else {
            (Cell::new("-"), Cell::new("-"))
        };
        table.add_row(vec![
            Cell::new(record.id),
            Cell::new(&record.product_name),
            number(record.quantity),
            number(record.cost_price),
            number(record.sale_price),
            Cell::new(date_cell(record.planting_date.as_ref(), format)),
            Cell::new(date_cell(record.harvest_date.as_ref(), format)),
            Cell::new(record.status),
            profit,
            roi,
        ]);
    }
    table
}

/// Field/value view of a single record and its metrics.
pub fn record_detail(record: &ProductionRecord, calculator: &MetricsCalculator) -> Table {
    let format = &calculator.config().date_format;
    let metrics = calculator.calculate(record);
    let mut table = new_table();
    table.set_header(vec!["Field", "Value"]);
    let rows: [(&str, String); 16] = [
        ("id", record.id.to_string()),
        ("product_name", record.product_name.clone()),
        ("quantity", record.quantity.to_string()),
        ("cost_price", record.cost_price.to_string()),
        ("sale_price", record.sale_price.to_string()),
        ("planting_date", date_cell(record.planting_date.as_ref(), format)),
        ("harvest_date", date_cell(record.harvest_date.as_ref(), format)),
        ("status", record.status.to_string()),
        ("created_at", record.created_at.to_rfc3339()),
        ("updated_at", record.updated_at.to_rfc3339()),
        ("profit", metrics.profit.to_string()),
        ("roi_percent", metrics.roi_percent.to_string()),
        ("production_efficiency", metrics.production_efficiency.to_string()),
        ("revenue_per_unit", metrics.revenue_per_unit.to_string()),
        ("cost_per_unit", metrics.cost_per_unit.to_string()),
        ("growth_period_days", metrics.growth_period_days.to_string()),
    ];
    for (field, value) in rows {
        table.add_row(vec![field.to_string(), value]);
    }
    table
}

/// Ranked product summaries.
pub fn ranking_table(ranked: &[ProductSummary]) -> Table {
    let mut table = new_table();
    table.set_header(vec![
        "#", "Product", "Lots", "Quantity", "Cost", "Revenue", "Profit", "ROI %", "Efficiency",
    ]);
    for (position, summary) in ranked.iter().enumerate() {
        table.add_row(vec![
            Cell::new(position + 1),
            Cell::new(&summary.product_name),
            Cell::new(summary.record_count()),
            number(summary.total_quantity),
            number(summary.total_cost),
            number(summary.total_revenue),
            number(summary.total_profit),
            number(summary.total_roi_percent),
            number(summary.efficiency),
        ]);
    }
    table
}
