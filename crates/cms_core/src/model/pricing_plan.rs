//! Pricing plan with monthly/annual billing.
//!
//! # Invariants
//! - Prices are non-negative integers in an unspecified minor unit.
//! - `features` and `limitations` keep the order they were given in.

use crate::model::entity::Entity;
use crate::model::schema::{CollectionSchema, FieldKind, FieldSpec};
use crate::model::validation::{require_entries, require_text, ValidationError};
use serde::{Deserialize, Serialize};

static PRICING_PLAN_FIELDS: [FieldSpec; 10] = [
    FieldSpec::required("name", FieldKind::Text),
    FieldSpec::optional("description", FieldKind::Text),
    FieldSpec::optional("icon", FieldKind::Text),
    FieldSpec::optional("color", FieldKind::Text),
    FieldSpec::optional("glow_color", FieldKind::Text),
    FieldSpec::optional("popular", FieldKind::Bool),
    FieldSpec::required("monthly_price", FieldKind::Count),
    FieldSpec::required("annual_price", FieldKind::Count),
    FieldSpec::optional("features", FieldKind::TextList),
    FieldSpec::optional("limitations", FieldKind::TextList),
];

static PRICING_PLAN_SCHEMA: CollectionSchema =
    CollectionSchema::new("pricing_plans", &PRICING_PLAN_FIELDS);

/// One pricing tier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingPlan {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub glow_color: String,
    /// Featured ("most popular") flag.
    #[serde(default)]
    pub popular: bool,
    pub monthly_price: u64,
    pub annual_price: u64,
    /// Included features.
    #[serde(default)]
    pub features: Vec<String>,
    /// Excluded features.
    #[serde(default)]
    pub limitations: Vec<String>,
}

impl PricingPlan {
    pub fn new(name: impl Into<String>, monthly_price: u64, annual_price: u64) -> Self {
        Self {
            name: name.into(),
            monthly_price,
            annual_price,
            ..Self::default()
        }
    }

    /// Amount saved per year by paying annually. Zero when annual billing
    /// is not cheaper.
    pub fn annual_savings(&self) -> u64 {
        self.monthly_price
            .saturating_mul(12)
            .saturating_sub(self.annual_price)
    }

    /// Annual saving as a whole percentage of twelve monthly payments,
    /// rounded to nearest. Zero for free plans.
    pub fn annual_discount_percent(&self) -> u64 {
        let yearly = u128::from(self.monthly_price) * 12;
        if yearly == 0 {
            return 0;
        }
        let savings = u128::from(self.annual_savings());
        let percent = (savings * 100 + yearly / 2) / yearly;
        u64::try_from(percent).unwrap_or(100)
    }
}

impl Entity for PricingPlan {
    const COLLECTION: &'static str = "pricing_plans";

    fn schema() -> &'static CollectionSchema {
        &PRICING_PLAN_SCHEMA
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require_text("name", &self.name)?;
        require_entries("features", &self.features)?;
        require_entries("limitations", &self.limitations)
    }
}

#[cfg(test)]
mod tests {
    use super::PricingPlan;

    #[test]
    fn savings_and_discount_follow_twelve_monthly_payments() {
        let plan = PricingPlan::new("Pro", 49, 470);
        assert_eq!(plan.annual_savings(), 118);
        assert_eq!(plan.annual_discount_percent(), 20);
    }

    #[test]
    fn free_or_overpriced_annual_plans_have_no_discount() {
        assert_eq!(PricingPlan::new("Free", 0, 0).annual_discount_percent(), 0);

        let overpriced = PricingPlan::new("Odd", 10, 200);
        assert_eq!(overpriced.annual_savings(), 0);
        assert_eq!(overpriced.annual_discount_percent(), 0);
    }
}
