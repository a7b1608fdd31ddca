//! Top-N selections over product summaries.
//!
//! Sorting is stable, so products with equal scores keep the order in which
//! the aggregator first met them.

use crate::report::ProductSummary;
use rust_decimal::Decimal;

/// The `n` products with the highest total ROI.
pub fn top_by_roi(summaries: &[ProductSummary], n: usize) -> Vec<ProductSummary> {
    top_by(summaries, n, |s| s.total_roi_percent)
}

/// The `n` products with the highest quantity per currency unit invested.
pub fn top_by_efficiency(summaries: &[ProductSummary], n: usize) -> Vec<ProductSummary> {
    top_by(summaries, n, |s| s.efficiency)
}

fn top_by<F>(summaries: &[ProductSummary], n: usize, metric: F) -> Vec<ProductSummary>
where
    F: Fn(&ProductSummary) -> Decimal,
{
    let mut ranked = summaries.to_vec();
    ranked.sort_by(|a, b| metric(b).cmp(&metric(a)));
    ranked.truncate(n);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn summary(name: &str, roi: Decimal, efficiency: Decimal) -> ProductSummary {
        ProductSummary {
            product_name: name.to_string(),
            total_quantity: Decimal::ZERO,
            total_cost: Decimal::ZERO,
            total_revenue: Decimal::ZERO,
            total_profit: Decimal::ZERO,
            total_roi_percent: roi,
            count_planted: 0,
            count_harvested: 0,
            count_sold: 1,
            avg_growth_period: Decimal::ZERO,
            efficiency,
        }
    }

    fn names(ranked: &[ProductSummary]) -> Vec<&str> {
        ranked.iter().map(|s| s.product_name.as_str()).collect()
    }

    #[test]
    fn roi_ranking_is_descending_and_truncated() {
        let summaries = vec![
            summary("Alface", dec!(10), dec!(1)),
            summary("Batata", dec!(75.5), dec!(1)),
            summary("Cebola", dec!(-5), dec!(1)),
            summary("Milho", dec!(40), dec!(1)),
        ];
        assert_eq!(names(&top_by_roi(&summaries, 2)), ["Batata", "Milho"]);
        assert_eq!(top_by_roi(&summaries, 10).len(), 4);
        assert!(top_by_roi(&summaries, 0).is_empty());
    }

    #[test]
    fn ties_keep_first_seen_order() {
        let summaries = vec![
            summary("Tomate", dec!(0), dec!(2.5)),
            summary("Pimentão", dec!(0), dec!(3)),
            summary("Abobrinha", dec!(0), dec!(2.50)),
            summary("Brócolis", dec!(0), dec!(2.5)),
        ];
        assert_eq!(
            names(&top_by_efficiency(&summaries, 4)),
            ["Pimentão", "Tomate", "Abobrinha", "Brócolis"]
        );
        assert_eq!(
            names(&top_by_roi(&summaries, 4)),
            ["Tomate", "Pimentão", "Abobrinha", "Brócolis"]
        );
    }
}
