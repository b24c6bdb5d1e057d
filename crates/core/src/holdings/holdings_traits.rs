//! Holding repository and service traits.
//!
//! These traits define the contract for holding operations without any
//! database-specific types, allowing for different storage implementations.

use async_trait::async_trait;

use super::holdings_model::{Holding, HoldingPatch, NewHolding};
use crate::errors::Result;

/// Trait defining the contract for Holding repository operations.
#[async_trait]
pub trait HoldingRepositoryTrait: Send + Sync {
    /// Creates a new holding.
    async fn create(&self, new_holding: NewHolding) -> Result<Holding>;

    /// Applies a partial update to a holding owned by `user_id`.
    ///
    /// Returns `NotFound` when the holding does not exist or belongs to
    /// another user.
    async fn update(&self, holding_id: &str, user_id: &str, patch: HoldingPatch)
        -> Result<Holding>;

    /// Deletes a holding owned by `user_id`.
    ///
    /// Returns the number of deleted records; `NotFound` when the holding
    /// does not exist or belongs to another user.
    async fn delete(&self, holding_id: &str, user_id: &str) -> Result<usize>;

    /// Retrieves a holding owned by `user_id`.
    fn get_by_id(&self, holding_id: &str, user_id: &str) -> Result<Holding>;

    /// Lists all holdings owned by a user.
    fn list_for_user(&self, user_id: &str) -> Result<Vec<Holding>>;
}

/// Trait defining the contract for Holding service operations.
#[async_trait]
pub trait HoldingServiceTrait: Send + Sync {
    /// Creates a new holding with business validation.
    async fn create_holding(&self, new_holding: NewHolding) -> Result<Holding>;

    /// Applies a partial update with business validation.
    async fn update_holding(
        &self,
        holding_id: &str,
        user_id: &str,
        patch: HoldingPatch,
    ) -> Result<Holding>;

    /// Deletes a holding.
    async fn delete_holding(&self, holding_id: &str, user_id: &str) -> Result<()>;

    /// Retrieves a holding by ID.
    fn get_holding(&self, holding_id: &str, user_id: &str) -> Result<Holding>;

    /// Lists all holdings of a user.
    fn list_holdings(&self, user_id: &str) -> Result<Vec<Holding>>;
}
