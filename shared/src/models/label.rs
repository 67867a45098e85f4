//! Price Label Model

use std::fmt;
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::util::next_created_at;

/// Maximum number of feature lines on one label
pub const MAX_FEATURES: usize = 3;

/// Name shown in previews while the product name field is still empty
pub const PLACEHOLDER_PRODUCT_NAME: &str = "Product Name";

/// Label validation errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LabelError {
    #[error("Product name is required")]
    EmptyProductName,

    #[error("Price is required")]
    MissingPrice,

    #[error("Invalid price: {0}")]
    InvalidPrice(String),

    #[error("Price must be greater than zero")]
    NonPositivePrice,

    #[error("Price cannot be negative: {0}")]
    NegativePrice(Decimal),

    #[error("At most 3 features are allowed, got {0}")]
    TooManyFeatures(usize),
}

/// Read-only view of the fields a price label is rendered from.
///
/// Implemented by both committed records and drafts, so a live preview
/// can be encoded without the draft ever acquiring an identity.
pub trait LabelContent {
    fn product_name(&self) -> &str;
    fn price(&self) -> Decimal;
    /// Feature lines in display order. May contain blank entries.
    fn features(&self) -> &[String];
}

/// Opaque label identifier (UUID v4)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabelId(Uuid);

impl LabelId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for LabelId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for LabelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for LabelId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// A committed label waiting in the print queue.
///
/// Immutable once created: editing removes the record and repopulates a
/// [`Draft`] from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "QueuedLabelRecord")]
pub struct QueuedLabel {
    id: LabelId,
    product_name: String,
    #[serde(with = "rust_decimal::serde::str")]
    price: Decimal,
    features: Vec<String>,
    created_at: i64,
}

impl QueuedLabel {
    /// Create a new record with a fresh id.
    ///
    /// Blank features are dropped; the price is rounded to cents.
    pub fn new(
        product_name: impl Into<String>,
        price: Decimal,
        features: impl IntoIterator<Item = String>,
    ) -> Result<Self, LabelError> {
        Self::from_parts(
            LabelId::new(),
            product_name.into(),
            price,
            features.into_iter().collect(),
            next_created_at(),
        )
    }

    fn from_parts(
        id: LabelId,
        product_name: String,
        price: Decimal,
        features: Vec<String>,
        created_at: i64,
    ) -> Result<Self, LabelError> {
        if product_name.trim().is_empty() {
            return Err(LabelError::EmptyProductName);
        }
        if price < Decimal::ZERO {
            return Err(LabelError::NegativePrice(price));
        }

        let features: Vec<String> = features
            .into_iter()
            .filter(|f| !f.trim().is_empty())
            .collect();
        if features.len() > MAX_FEATURES {
            return Err(LabelError::TooManyFeatures(features.len()));
        }

        Ok(Self {
            id,
            product_name,
            price: round_cents(price),
            features,
            created_at,
        })
    }

    pub fn id(&self) -> LabelId {
        self.id
    }

    pub fn created_at(&self) -> i64 {
        self.created_at
    }
}

impl LabelContent for QueuedLabel {
    fn product_name(&self) -> &str {
        &self.product_name
    }

    fn price(&self) -> Decimal {
        self.price
    }

    fn features(&self) -> &[String] {
        &self.features
    }
}

/// Wire shape of a stored record, validated on the way in
#[derive(Deserialize)]
struct QueuedLabelRecord {
    id: LabelId,
    product_name: String,
    #[serde(with = "rust_decimal::serde::str")]
    price: Decimal,
    #[serde(default)]
    features: Vec<String>,
    created_at: i64,
}

impl TryFrom<QueuedLabelRecord> for QueuedLabel {
    type Error = LabelError;

    fn try_from(r: QueuedLabelRecord) -> Result<Self, Self::Error> {
        Self::from_parts(r.id, r.product_name, r.price, r.features, r.created_at)
    }
}

/// Transient form state behind the live preview.
///
/// Holds raw user input. It has no id and only becomes a [`QueuedLabel`]
/// through [`Draft::commit`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Draft {
    pub product_name: String,
    /// Price exactly as typed
    pub price: String,
    pub features: [String; MAX_FEATURES],
}

impl Draft {
    pub fn new() -> Self {
        Self::default()
    }

    /// True while neither name nor price has been typed (no preview shown)
    pub fn is_blank(&self) -> bool {
        self.product_name.trim().is_empty() && self.price.trim().is_empty()
    }

    /// Parsed price, if the input is a number
    pub fn parsed_price(&self) -> Option<Decimal> {
        Decimal::from_str(self.price.trim()).ok()
    }

    /// Validate the form and turn it into a queue record.
    pub fn commit(&self) -> Result<QueuedLabel, LabelError> {
        if self.product_name.trim().is_empty() {
            return Err(LabelError::EmptyProductName);
        }

        let raw = self.price.trim();
        if raw.is_empty() {
            return Err(LabelError::MissingPrice);
        }
        let price = Decimal::from_str(raw).map_err(|_| LabelError::InvalidPrice(raw.to_string()))?;
        if price <= Decimal::ZERO {
            return Err(LabelError::NonPositivePrice);
        }

        QueuedLabel::new(self.product_name.clone(), price, self.features.clone())
    }
}

impl From<&QueuedLabel> for Draft {
    fn from(label: &QueuedLabel) -> Self {
        let mut features: [String; MAX_FEATURES] = Default::default();
        for (slot, feature) in features.iter_mut().zip(&label.features) {
            slot.clone_from(feature);
        }
        Self {
            product_name: label.product_name.clone(),
            price: label.price.to_string(),
            features,
        }
    }
}

impl LabelContent for Draft {
    fn product_name(&self) -> &str {
        if self.product_name.trim().is_empty() {
            PLACEHOLDER_PRODUCT_NAME
        } else {
            &self.product_name
        }
    }

    /// Unparsable or negative input previews as zero
    fn price(&self) -> Decimal {
        self.parsed_price()
            .filter(|p| *p >= Decimal::ZERO)
            .unwrap_or(Decimal::ZERO)
    }

    fn features(&self) -> &[String] {
        &self.features
    }
}

/// Round to cents, half away from zero, always with two fraction digits
pub fn round_cents(price: Decimal) -> Decimal {
    let mut cents = price.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    cents.rescale(2);
    cents
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn features(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_new_filters_blank_features() {
        let label = QueuedLabel::new("Widget", d("9.99"), features(&["A", "", "  ", "B"])).unwrap();
        assert_eq!(label.features(), &["A".to_string(), "B".to_string()]);
    }

    #[test]
    fn test_new_rejects_too_many_features() {
        let err = QueuedLabel::new("Widget", d("1"), features(&["A", "B", "C", "D"])).unwrap_err();
        assert_eq!(err, LabelError::TooManyFeatures(4));
    }

    #[test]
    fn test_new_rejects_blank_name_and_negative_price() {
        assert_eq!(
            QueuedLabel::new("   ", d("1"), vec![]).unwrap_err(),
            LabelError::EmptyProductName
        );
        assert!(matches!(
            QueuedLabel::new("Widget", d("-0.01"), vec![]).unwrap_err(),
            LabelError::NegativePrice(_)
        ));
    }

    #[test]
    fn test_price_rounded_to_cents() {
        let label = QueuedLabel::new("Widget", d("2.345"), vec![]).unwrap();
        assert_eq!(label.price(), d("2.35"));
    }

    #[test]
    fn test_ids_are_unique_and_created_at_increases() {
        let a = QueuedLabel::new("A", d("1"), vec![]).unwrap();
        let b = QueuedLabel::new("B", d("1"), vec![]).unwrap();
        assert_ne!(a.id(), b.id());
        assert!(a.created_at() < b.created_at());
    }

    #[test]
    fn test_draft_commit_validation() {
        let mut draft = Draft::new();
        assert_eq!(draft.commit().unwrap_err(), LabelError::EmptyProductName);

        draft.product_name = "Federal 9mm".to_string();
        assert_eq!(draft.commit().unwrap_err(), LabelError::MissingPrice);

        draft.price = "abc".to_string();
        assert_eq!(
            draft.commit().unwrap_err(),
            LabelError::InvalidPrice("abc".to_string())
        );

        draft.price = "0".to_string();
        assert_eq!(draft.commit().unwrap_err(), LabelError::NonPositivePrice);

        draft.price = "250".to_string();
        draft.features[1] = "Full Metal Jacket".to_string();
        let label = draft.commit().unwrap();
        assert_eq!(label.price(), d("250"));
        assert_eq!(label.features(), &["Full Metal Jacket".to_string()]);
    }

    #[test]
    fn test_draft_preview_fallbacks() {
        let draft = Draft {
            price: "oops".to_string(),
            ..Draft::default()
        };
        assert!(!draft.is_blank());
        assert_eq!(LabelContent::product_name(&draft), PLACEHOLDER_PRODUCT_NAME);
        assert_eq!(LabelContent::price(&draft), Decimal::ZERO);
        assert!(Draft::new().is_blank());

        let negative = Draft {
            price: "-4".to_string(),
            ..Draft::default()
        };
        assert_eq!(LabelContent::price(&negative), Decimal::ZERO);
    }

    #[test]
    fn test_draft_from_label_repopulates_form() {
        let label = QueuedLabel::new("Widget", d("12.5"), features(&["A", "B"])).unwrap();
        let draft = Draft::from(&label);
        assert_eq!(draft.product_name, "Widget");
        assert_eq!(draft.price, "12.50");
        assert_eq!(draft.features, ["A".to_string(), "B".to_string(), String::new()]);

        let again = draft.commit().unwrap();
        assert_ne!(again.id(), label.id());
        assert_eq!(again.price(), label.price());
    }

    #[test]
    fn test_deserialize_revalidates() {
        let label = QueuedLabel::new("Widget", d("3"), features(&["A"])).unwrap();
        let json = serde_json::to_string(&label).unwrap();
        let back: QueuedLabel = serde_json::from_str(&json).unwrap();
        assert_eq!(back, label);

        let bad = json.replace("\"Widget\"", "\"  \"");
        assert!(serde_json::from_str::<QueuedLabel>(&bad).is_err());
    }

    #[test]
    fn test_stored_price_is_exact() {
        let label = QueuedLabel::new("Safe", d("123456789012345.67"), Vec::new()).unwrap();
        let json = serde_json::to_string(&label).unwrap();
        assert!(json.contains("\"123456789012345.67\""));

        let back: QueuedLabel = serde_json::from_str(&json).unwrap();
        assert_eq!(back.price().to_string(), "123456789012345.67");
    }
}
