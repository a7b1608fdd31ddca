use crate::date::{DateValue, DEFAULT_DATE_FORMAT};
use crate::enums::ProductionStatus;
use crate::error::CoreError;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One tracked planting-to-sale cycle of a crop, as held by the record store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionRecord {
    pub id: i64,
    pub product_name: String,
    pub quantity: Decimal,
    pub cost_price: Decimal,
    /// Zero means the lot has not been sold yet.
    pub sale_price: Decimal,
    pub planting_date: Option<DateValue>,
    pub harvest_date: Option<DateValue>,
    pub status: ProductionStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProductionRecord {
    /// Materialises a stored record from its creation input.
    pub fn from_new(id: i64, new: NewProductionRecord, now: DateTime<Utc>) -> Self {
        Self {
            id,
            product_name: new.product_name.trim().to_string(),
            quantity: new.quantity,
            cost_price: new.cost_price,
            sale_price: new.sale_price,
            planting_date: new.planting_date.map(DateValue::Parsed),
            harvest_date: new.harvest_date.map(DateValue::Parsed),
            status: new.status,
            created_at: now,
            updated_at: now,
        }
    }

    /// Checks the field invariants on an already-assembled record.
    pub fn validate(&self) -> Result<(), CoreError> {
        validate_name(&self.product_name)?;
        validate_quantity(self.quantity)?;
        validate_price("cost_price", self.cost_price)?;
        validate_price("sale_price", self.sale_price)?;
        let planting = self
            .planting_date
            .as_ref()
            .map(|d| resolve_strict("planting_date", d))
            .transpose()?;
        let harvest = self
            .harvest_date
            .as_ref()
            .map(|d| resolve_strict("harvest_date", d))
            .transpose()?;
        validate_date_order(planting, harvest)
    }

    /// Applies a partial update. Unset patch fields leave the record untouched.
    pub fn apply(&mut self, patch: &ProductionPatch, now: DateTime<Utc>) {
        if let Some(name) = &patch.product_name {
            self.product_name = name.trim().to_string();
        }
        if let Some(quantity) = patch.quantity {
            self.quantity = quantity;
        }
        if let Some(cost_price) = patch.cost_price {
            self.cost_price = cost_price;
        }
        if let Some(sale_price) = patch.sale_price {
            self.sale_price = sale_price;
        }
        if let Some(planting) = patch.planting_date {
            self.planting_date = planting.map(DateValue::Parsed);
        }
        if let Some(harvest) = patch.harvest_date {
            self.harvest_date = harvest.map(DateValue::Parsed);
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        self.updated_at = now;
    }
}

/// The input for creating a record. The store assigns id and timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProductionRecord {
    pub product_name: String,
    pub quantity: Decimal,
    #[serde(default)]
    pub cost_price: Decimal,
    #[serde(default)]
    pub sale_price: Decimal,
    #[serde(default)]
    pub planting_date: Option<NaiveDate>,
    #[serde(default)]
    pub harvest_date: Option<NaiveDate>,
    #[serde(default)]
    pub status: ProductionStatus,
}

impl NewProductionRecord {
    /// A planted lot with no prices and no dates.
    pub fn new(product_name: impl Into<String>, quantity: Decimal) -> Self {
        Self {
            product_name: product_name.into(),
            quantity,
            cost_price: Decimal::ZERO,
            sale_price: Decimal::ZERO,
            planting_date: None,
            harvest_date: None,
            status: ProductionStatus::Planted,
        }
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        validate_name(&self.product_name)?;
        validate_quantity(self.quantity)?;
        validate_price("cost_price", self.cost_price)?;
        validate_price("sale_price", self.sale_price)?;
        validate_date_order(self.planting_date, self.harvest_date)
    }
}

/// A partial update: `None` leaves a field unchanged.
///
/// Dates are doubly optional so that a patch can clear a date
/// (`Some(None)`) as well as set it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductionPatch {
    pub product_name: Option<String>,
    pub quantity: Option<Decimal>,
    pub cost_price: Option<Decimal>,
    pub sale_price: Option<Decimal>,
    pub planting_date: Option<Option<NaiveDate>>,
    pub harvest_date: Option<Option<NaiveDate>>,
    pub status: Option<ProductionStatus>,
}

impl ProductionPatch {
    pub fn is_empty(&self) -> bool {
        self.product_name.is_none()
            && self.quantity.is_none()
            && self.cost_price.is_none()
            && self.sale_price.is_none()
            && self.planting_date.is_none()
            && self.harvest_date.is_none()
            && self.status.is_none()
    }

    /// Validates the fields present in the patch. Date ordering against the
    /// stored record is checked once the patch has been merged.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.is_empty() {
            return Err(CoreError::EmptyPatch);
        }
        if let Some(name) = &self.product_name {
            validate_name(name)?;
        }
        if let Some(quantity) = self.quantity {
            validate_quantity(quantity)?;
        }
        if let Some(cost_price) = self.cost_price {
            validate_price("cost_price", cost_price)?;
        }
        if let Some(sale_price) = self.sale_price {
            validate_price("sale_price", sale_price)?;
        }
        if let (Some(planting), Some(harvest)) = (self.planting_date, self.harvest_date) {
            validate_date_order(planting, harvest)?;
        }
        Ok(())
    }
}

/// Criteria for `search`. Empty criteria match every record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchFilter {
    /// Case-insensitive substring of the product name.
    pub product_name: Option<String>,
    pub status: Option<ProductionStatus>,
}

impl SearchFilter {
    pub fn matches(&self, record: &ProductionRecord) -> bool {
        let name_ok = self.product_name.as_ref().is_none_or(|fragment| {
            record
                .product_name
                .to_lowercase()
                .contains(&fragment.to_lowercase())
        });
        let status_ok = self.status.is_none_or(|status| record.status == status);
        name_ok && status_ok
    }
}

fn validate_name(name: &str) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::validation("product_name", "must not be empty"));
    }
    Ok(())
}

/// Exclusive upper bound for quantities, the integer range of NUMERIC(14, 4).
pub const QUANTITY_LIMIT: i64 = 10_000_000_000;

/// Exclusive upper bound for prices, the integer range of NUMERIC(14, 2).
pub const PRICE_LIMIT: i64 = 1_000_000_000_000;

fn validate_quantity(value: Decimal) -> Result<(), CoreError> {
    validate_amount("quantity", value, QUANTITY_LIMIT)
}

fn validate_price(field: &str, value: Decimal) -> Result<(), CoreError> {
    validate_amount(field, value, PRICE_LIMIT)
}

fn validate_amount(field: &str, value: Decimal, limit: i64) -> Result<(), CoreError> {
    if value < Decimal::ZERO {
        return Err(CoreError::validation(field, format!("must be >= 0, got {value}")));
    }
    if value >= Decimal::from(limit) {
        return Err(CoreError::validation(field, format!("must be below {limit}, got {value}")));
    }
    Ok(())
}

fn validate_date_order(
    planting: Option<NaiveDate>,
    harvest: Option<NaiveDate>,
) -> Result<(), CoreError> {
    if let (Some(planting), Some(harvest)) = (planting, harvest) {
        if harvest < planting {
            return Err(CoreError::validation(
                "harvest_date",
                format!("{harvest} is before planting date {planting}"),
            ));
        }
    }
    Ok(())
}

fn resolve_strict(field: &str, value: &DateValue) -> Result<NaiveDate, CoreError> {
    value.resolve(DEFAULT_DATE_FORMAT).ok_or_else(|| {
        CoreError::validation(field, format!("'{value}' is not a YYYY-MM-DD date"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn new_record_rejects_bad_fields() {
        let mut new = NewProductionRecord::new("  ", dec!(10));
        assert!(matches!(new.validate(), Err(CoreError::Validation(f, _)) if f == "product_name"));

        new.product_name = "Milho".into();
        new.quantity = dec!(-1);
        assert!(matches!(new.validate(), Err(CoreError::Validation(f, _)) if f == "quantity"));

        new.quantity = dec!(1);
        new.sale_price = dec!(-0.01);
        assert!(matches!(new.validate(), Err(CoreError::Validation(f, _)) if f == "sale_price"));

        new.sale_price = dec!(0);
        new.planting_date = Some(date(2024, 5, 1));
        new.harvest_date = Some(date(2024, 4, 30));
        assert!(matches!(new.validate(), Err(CoreError::Validation(f, _)) if f == "harvest_date"));

        new.harvest_date = Some(date(2024, 5, 1));
        assert_eq!(new.validate(), Ok(()));
    }

    #[test]
    fn amounts_stay_within_column_range() {
        let mut new = NewProductionRecord::new("Milho", Decimal::MAX);
        assert!(matches!(new.validate(), Err(CoreError::Validation(f, _)) if f == "quantity"));

        new.quantity = dec!(10000000000);
        assert!(matches!(new.validate(), Err(CoreError::Validation(f, _)) if f == "quantity"));

        new.quantity = dec!(9999999999.9999);
        assert_eq!(new.validate(), Ok(()));

        new.cost_price = dec!(1000000000000);
        assert!(matches!(new.validate(), Err(CoreError::Validation(f, _)) if f == "cost_price"));

        new.cost_price = dec!(999999999999.99);
        new.sale_price = Decimal::MAX;
        assert!(matches!(new.validate(), Err(CoreError::Validation(f, _)) if f == "sale_price"));

        let patch = ProductionPatch {
            quantity: Some(Decimal::MAX),
            ..Default::default()
        };
        assert!(matches!(patch.validate(), Err(CoreError::Validation(f, _)) if f == "quantity"));
    }

    #[test]
    fn empty_patch_is_rejected() {
        assert_eq!(ProductionPatch::default().validate(), Err(CoreError::EmptyPatch));
    }

    #[test]
    fn apply_leaves_unset_fields_alone() {
        let created = Utc::now();
        let mut new = NewProductionRecord::new("Tomate", dec!(100));
        new.cost_price = dec!(50);
        new.planting_date = Some(date(2024, 1, 1));
        let mut record = ProductionRecord::from_new(7, new, created);

        let patch = ProductionPatch {
            sale_price: Some(dec!(80)),
            harvest_date: Some(Some(date(2024, 3, 1))),
            status: Some(ProductionStatus::Sold),
            ..Default::default()
        };
        let later = created + chrono::Duration::minutes(5);
        record.apply(&patch, later);

        assert_eq!(record.product_name, "Tomate");
        assert_eq!(record.cost_price, dec!(50));
        assert_eq!(record.sale_price, dec!(80));
        assert_eq!(record.planting_date, Some(DateValue::Parsed(date(2024, 1, 1))));
        assert_eq!(record.harvest_date, Some(DateValue::Parsed(date(2024, 3, 1))));
        assert_eq!(record.status, ProductionStatus::Sold);
        assert_eq!(record.created_at, created);
        assert_eq!(record.updated_at, later);
    }

    #[test]
    fn patch_can_clear_a_date() {
        let mut new = NewProductionRecord::new("Alface", dec!(20));
        new.harvest_date = Some(date(2024, 2, 2));
        let mut record = ProductionRecord::from_new(1, new, Utc::now());
        let patch = ProductionPatch {
            harvest_date: Some(None),
            ..Default::default()
        };
        record.apply(&patch, Utc::now());
        assert_eq!(record.harvest_date, None);
    }

    #[test]
    fn merged_record_catches_inverted_dates() {
        let mut new = NewProductionRecord::new("Cenoura", dec!(20));
        new.planting_date = Some(date(2024, 6, 1));
        let mut record = ProductionRecord::from_new(1, new, Utc::now());
        let patch = ProductionPatch {
            harvest_date: Some(Some(date(2024, 5, 1))),
            ..Default::default()
        };
        assert_eq!(patch.validate(), Ok(()));
        record.apply(&patch, Utc::now());
        assert!(record.validate().is_err());
    }

    #[test]
    fn search_filter_matches_fragment_and_status() {
        let mut new = NewProductionRecord::new("Tomate Cereja", dec!(5));
        new.status = ProductionStatus::Harvested;
        let record = ProductionRecord::from_new(1, new, Utc::now());

        assert!(SearchFilter::default().matches(&record));
        let by_name = SearchFilter {
            product_name: Some("tom".into()),
            status: None,
        };
        assert!(by_name.matches(&record));
        let wrong_status = SearchFilter {
            product_name: Some("tom".into()),
            status: Some(ProductionStatus::Sold),
        };
        assert!(!wrong_status.matches(&record));
    }
}
