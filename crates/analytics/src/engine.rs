use crate::report::DerivedMetrics;
use chrono::NaiveDate;
use configuration::MetricsConfig;
use core_types::{DateValue, ProductionRecord};
use rust_decimal::Decimal;

/// A stateless calculator for deriving per-record metrics.
///
/// Every ratio guards its denominator: a non-positive denominator yields zero
/// instead of an error, an infinity or a panic.
#[derive(Debug, Clone, Default)]
pub struct MetricsCalculator {
    config: MetricsConfig,
}

impl MetricsCalculator {
    pub fn new(config: MetricsConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MetricsConfig {
        &self.config
    }

    /// Derives all metrics for one record.
    pub fn calculate(&self, record: &ProductionRecord) -> DerivedMetrics {
        let quantity = record.quantity;
        let cost = record.cost_price;
        let sale = record.sale_price;
        let money = self.config.money_scale;
        let ratio_dp = self.config.ratio_scale;

        // Profit and ROI only make sense once the lot has both a cost and a sale.
        let (profit, roi_percent) = if cost > Decimal::ZERO && sale > Decimal::ZERO {
            let profit = sale - cost;
            let roi = profit
                .checked_mul(Decimal::ONE_HUNDRED)
                .map(|scaled| ratio(scaled, cost, money))
                .unwrap_or(Decimal::ZERO);
            (profit.round_dp(money), roi)
        } else {
            (Decimal::ZERO, Decimal::ZERO)
        };

        let revenue_per_unit = if sale > Decimal::ZERO {
            ratio(sale, quantity, ratio_dp)
        } else {
            Decimal::ZERO
        };
        let cost_per_unit = if cost > Decimal::ZERO {
            ratio(cost, quantity, ratio_dp)
        } else {
            Decimal::ZERO
        };

        DerivedMetrics {
            profit,
            roi_percent,
            production_efficiency: ratio(quantity, cost, ratio_dp),
            revenue_per_unit,
            cost_per_unit,
            growth_period_days: self
                .growth_period_days(record.planting_date.as_ref(), record.harvest_date.as_ref()),
        }
    }

    /// Whole days between planting and harvest.
    ///
    /// Returns 0 when either date is missing or does not parse with the
    /// configured format.
    pub fn growth_period_days(
        &self,
        planting: Option<&DateValue>,
        harvest: Option<&DateValue>,
    ) -> i64 {
        match (self.resolve(planting), self.resolve(harvest)) {
            (Some(planting), Some(harvest)) => (harvest - planting).num_days(),
            _ => 0,
        }
    }

    /// Parses a date with the configured format, `None` on any failure.
    pub fn resolve(&self, value: Option<&DateValue>) -> Option<NaiveDate> {
        value.and_then(|v| v.resolve(&self.config.date_format))
    }
}

/// `numerator / denominator` rounded to `scale` places, or zero when the
/// denominator is not positive or the division overflows.
pub(crate) fn ratio(numerator: Decimal, denominator: Decimal, scale: u32) -> Decimal {
    if denominator <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    numerator
        .checked_div(denominator)
        .map(|value| value.round_dp(scale))
        .unwrap_or(Decimal::ZERO)
}
