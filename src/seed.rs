use chrono::{Duration, NaiveDate};
use core_types::{NewProductionRecord, ProductionStatus};
use rand::Rng;
use rust_decimal::Decimal;

/// Crops seeded by default.
pub const DEFAULT_CROPS: [&str; 10] = [
    "Tomate",
    "Alface",
    "Cenoura",
    "Milho",
    "Feijão",
    "Batata",
    "Cebola",
    "Pimentão",
    "Abobrinha",
    "Brócolis",
];

/// Days after harvest until a lot counts as sold.
const DAYS_UNTIL_SOLD: i64 = 30;

/// Status of a sample lot from the days elapsed since its harvest.
pub fn status_for(days_since_harvest: i64) -> ProductionStatus {
    if days_since_harvest > DAYS_UNTIL_SOLD {
        ProductionStatus::Sold
    } else if days_since_harvest > 0 {
        ProductionStatus::Harvested
    } else {
        ProductionStatus::Planted
    }
}

/// Builds sample lots for every crop.
///
/// Each crop gets between 1 and `cycles_max` cycles, planted 30 days apart per
/// crop and 45 days apart per cycle from 2024-01-15. Planted lots carry no
/// harvest date and only sold lots carry a sale price.
pub fn sample_records<R: Rng>(
    rng: &mut R,
    today: NaiveDate,
    cycles_max: u32,
) -> Vec<NewProductionRecord> {
    let base = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap_or(today);
    let mut records = Vec::new();

    for (crop_index, crop) in DEFAULT_CROPS.iter().enumerate() {
        let cycles = rng.random_range(1..=cycles_max.max(1));
        for cycle in 1..=cycles {
            let planting = base + Duration::days(crop_index as i64 * 30 + i64::from(cycle) * 45);
            let harvest = planting + Duration::days(rng.random_range(60..=120));

            // Amounts in cents so every value has exactly two decimals.
            let quantity = Decimal::new(rng.random_range(8_000..=60_000), 2);
            let cost = Decimal::new(rng.random_range(4_500..=22_000), 2);
            let margin = Decimal::new(rng.random_range(20..=80), 2);
            let sale = (cost * (Decimal::ONE + margin)).round_dp(2);

            let status = status_for((today - harvest).num_days());
            let mut record = NewProductionRecord::new(*crop, quantity);
            record.cost_price = cost;
            record.planting_date = Some(planting);
            record.status = status;
            if status != ProductionStatus::Planted {
                record.harvest_date = Some(harvest);
            }
            if status == ProductionStatus::Sold {
                record.sale_price = sale;
            }
            records.push(record);
        }
    }
    records
}
