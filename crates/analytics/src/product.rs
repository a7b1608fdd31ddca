use crate::engine::{ratio, MetricsCalculator};
use crate::error::AnalyticsError;
use crate::report::ProductSummary;
use core_types::{ProductionRecord, ProductionStatus};
use rust_decimal::Decimal;
use std::collections::HashMap;

/// Groups records by exact product name.
pub struct ProductAggregator<'a> {
    calculator: &'a MetricsCalculator,
}

/// Running totals for one product while the records are scanned.
#[derive(Debug)]
struct ProductTotals {
    product_name: String,
    quantity: Decimal,
    cost: Decimal,
    revenue: Decimal,
    planted: u64,
    harvested: u64,
    sold: u64,
    growth_days: i64,
    growth_samples: i64,
}

impl ProductTotals {
    fn new(product_name: &str) -> Self {
        Self {
            product_name: product_name.to_string(),
            quantity: Decimal::ZERO,
            cost: Decimal::ZERO,
            revenue: Decimal::ZERO,
            planted: 0,
            harvested: 0,
            sold: 0,
            growth_days: 0,
            growth_samples: 0,
        }
    }
}

impl<'a> ProductAggregator<'a> {
    pub fn new(calculator: &'a MetricsCalculator) -> Self {
        Self { calculator }
    }

    /// Produces one summary per distinct product name, in first-seen order.
    ///
    /// Names are compared exactly: "Tomate" and "tomate" are two products.
    pub fn aggregate(
        &self,
        records: &[ProductionRecord],
    ) -> Result<Vec<ProductSummary>, AnalyticsError> {
        if records.is_empty() {
            return Err(AnalyticsError::NoRecords);
        }

        let mut index: HashMap<&str, usize> = HashMap::new();
        let mut groups: Vec<ProductTotals> = Vec::new();

        for record in records {
            let slot = *index.entry(record.product_name.as_str()).or_insert_with(|| {
                groups.push(ProductTotals::new(&record.product_name));
                groups.len() - 1
            });
            let totals = &mut groups[slot];

            totals.quantity += record.quantity;
            totals.cost += record.cost_price;
            totals.revenue += record.sale_price;
            match record.status {
                ProductionStatus::Planted => totals.planted += 1,
                ProductionStatus::Harvested => totals.harvested += 1,
                ProductionStatus::Sold => totals.sold += 1,
            }

            let growth = self.calculator.growth_period_days(
                record.planting_date.as_ref(),
                record.harvest_date.as_ref(),
            );
            if growth > 0 {
                totals.growth_days += growth;
                totals.growth_samples += 1;
            }
        }

        let summaries: Vec<ProductSummary> =
            groups.into_iter().map(|totals| self.finish(totals)).collect();
        tracing::debug!(products = summaries.len(), records = records.len(), "Aggregated by product.");
        Ok(summaries)
    }

    fn finish(&self, totals: ProductTotals) -> ProductSummary {
        let config = self.calculator.config();
        let total_profit = totals.revenue - totals.cost;
        let total_roi_percent = total_profit
            .checked_mul(Decimal::ONE_HUNDRED)
            .map(|scaled| ratio(scaled, totals.cost, config.money_scale))
            .unwrap_or(Decimal::ZERO);
        let avg_growth_period = ratio(
            Decimal::from(totals.growth_days),
            Decimal::from(totals.growth_samples),
            config.average_scale,
        );

        ProductSummary {
            efficiency: ratio(totals.quantity, totals.cost, config.ratio_scale),
            product_name: totals.product_name,
            total_quantity: totals.quantity,
            total_cost: totals.cost,
            total_revenue: totals.revenue,
            total_profit,
            total_roi_percent,
            count_planted: totals.planted,
            count_harvested: totals.harvested,
            count_sold: totals.sold,
            avg_growth_period,
        }
    }
}
