//! Holding domain models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_with::rust::double_option;

use crate::errors::ValidationError;
use crate::{Error, Result};

/// A user's recorded position in one symbol: quantity plus cost basis.
///
/// Owned exclusively by its user; deleting the user cascades to their
/// holdings and snapshots.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Holding {
    pub id: String,
    pub user_id: String,
    /// Uppercased ticker symbol.
    pub symbol: String,
    pub name: String,
    pub purchase_price: Decimal,
    pub quantity: Decimal,
    pub purchase_date: DateTime<Utc>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input model for creating a new holding.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewHolding {
    pub user_id: String,
    pub symbol: String,
    pub name: String,
    pub purchase_price: Decimal,
    pub quantity: Decimal,
    /// Defaults to "now" when omitted.
    pub purchase_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

impl NewHolding {
    /// Validates the new holding data.
    pub fn validate(&self) -> Result<()> {
        if self.symbol.trim().is_empty() {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Symbol cannot be empty".to_string(),
            )));
        }
        if self.name.trim().is_empty() {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Name cannot be empty".to_string(),
            )));
        }
        if self.quantity <= Decimal::ZERO {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Quantity must be positive".to_string(),
            )));
        }
        if self.purchase_price < Decimal::ZERO {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Purchase price cannot be negative".to_string(),
            )));
        }
        Ok(())
    }

    /// The symbol as it is tracked system-wide: trimmed and uppercased,
    /// so one instrument never exists under two case variants.
    pub fn normalized_symbol(&self) -> String {
        self.symbol.trim().to_uppercase()
    }
}

/// Partial update for a holding.
///
/// Every field is optional; an unset field is a distinct state from a
/// field explicitly set to an empty/zero value, and only set fields are
/// applied. `notes` is doubly optional so that "clear the notes" and
/// "leave the notes alone" stay distinguishable in JSON
/// (`"notes": null` vs. the key being absent).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldingPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purchase_price: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purchase_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    pub notes: Option<Option<String>>,
}

impl HoldingPatch {
    /// Validates the fields that are present.
    pub fn validate(&self) -> Result<()> {
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err(Error::Validation(ValidationError::InvalidInput(
                    "Name cannot be empty".to_string(),
                )));
            }
        }
        if let Some(quantity) = self.quantity {
            if quantity <= Decimal::ZERO {
                return Err(Error::Validation(ValidationError::InvalidInput(
                    "Quantity must be positive".to_string(),
                )));
            }
        }
        if let Some(price) = self.purchase_price {
            if price < Decimal::ZERO {
                return Err(Error::Validation(ValidationError::InvalidInput(
                    "Purchase price cannot be negative".to_string(),
                )));
            }
        }
        Ok(())
    }

    /// True when no field is set; applying such a patch is a no-op.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.purchase_price.is_none()
            && self.quantity.is_none()
            && self.purchase_date.is_none()
            && self.notes.is_none()
    }

    /// Pure merge: returns a copy of `holding` with the set fields
    /// applied. Unset fields keep their current value.
    pub fn apply(&self, holding: &Holding) -> Holding {
        let mut updated = holding.clone();
        if let Some(name) = &self.name {
            updated.name = name.clone();
        }
        if let Some(price) = self.purchase_price {
            updated.purchase_price = price;
        }
        if let Some(quantity) = self.quantity {
            updated.quantity = quantity;
        }
        if let Some(date) = self.purchase_date {
            updated.purchase_date = date;
        }
        if let Some(notes) = &self.notes {
            updated.notes = notes.clone();
        }
        updated
    }
}
