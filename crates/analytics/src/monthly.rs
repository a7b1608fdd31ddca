use crate::engine::{ratio, MetricsCalculator};
use crate::error::AnalyticsError;
use crate::report::MonthlySummary;
use chrono::Datelike;
use core_types::ProductionRecord;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// Buckets records by the calendar month of their harvest date.
pub struct MonthlyAggregator<'a> {
    calculator: &'a MetricsCalculator,
}

#[derive(Debug, Default)]
struct MonthTotals {
    quantity: Decimal,
    cost: Decimal,
    revenue: Decimal,
    count: u64,
}

impl<'a> MonthlyAggregator<'a> {
    pub fn new(calculator: &'a MetricsCalculator) -> Self {
        Self { calculator }
    }

    /// Produces one summary per harvest month, oldest month first.
    ///
    /// Records without a harvest date, or whose harvest date does not parse,
    /// are left out entirely. A non-empty input where no record qualifies
    /// yields an empty list.
    pub fn aggregate(
        &self,
        records: &[ProductionRecord],
    ) -> Result<Vec<MonthlySummary>, AnalyticsError> {
        if records.is_empty() {
            return Err(AnalyticsError::NoRecords);
        }

        // (year, month) keys keep the map in chronological order.
        let mut months: BTreeMap<(i32, u32), MonthTotals> = BTreeMap::new();
        let mut skipped = 0usize;

        for record in records {
            let Some(harvest) = self.calculator.resolve(record.harvest_date.as_ref()) else {
                skipped += 1;
                continue;
            };
            let totals = months.entry((harvest.year(), harvest.month())).or_default();
            totals.quantity += record.quantity;
            totals.cost += record.cost_price;
            totals.revenue += record.sale_price;
            totals.count += 1;
        }

        if skipped > 0 {
            tracing::debug!(skipped, "Records without a usable harvest date left out of monthly analysis.");
        }

        Ok(months
            .into_iter()
            .map(|((year, month), totals)| self.finish(year, month, totals))
            .collect())
    }

    fn finish(&self, year: i32, month: u32, totals: MonthTotals) -> MonthlySummary {
        let config = self.calculator.config();
        let total_profit = totals.revenue - totals.cost;
        let roi_percent = total_profit
            .checked_mul(Decimal::ONE_HUNDRED)
            .map(|scaled| ratio(scaled, totals.cost, config.money_scale))
            .unwrap_or(Decimal::ZERO);

        MonthlySummary {
            year_month: format!("{year:04}-{month:02}"),
            production_count: totals.count,
            efficiency: ratio(totals.quantity, totals.cost, config.ratio_scale),
            avg_quantity_per_production: ratio(
                totals.quantity,
                Decimal::from(totals.count),
                config.quantity_average_scale,
            ),
            total_quantity: totals.quantity,
            total_cost: totals.cost,
            total_revenue: totals.revenue,
            total_profit,
            roi_percent,
        }
    }
}
