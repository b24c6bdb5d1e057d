use log::debug;
use std::sync::Arc;

use super::holdings_model::{Holding, HoldingPatch, NewHolding};
use super::holdings_traits::{HoldingRepositoryTrait, HoldingServiceTrait};
use crate::errors::Result;

/// Service for managing holdings.
pub struct HoldingService {
    repository: Arc<dyn HoldingRepositoryTrait>,
}

impl HoldingService {
    /// Creates a new HoldingService instance.
    pub fn new(repository: Arc<dyn HoldingRepositoryTrait>) -> Self {
        Self { repository }
    }
}

#[async_trait::async_trait]
impl HoldingServiceTrait for HoldingService {
    async fn create_holding(&self, new_holding: NewHolding) -> Result<Holding> {
        new_holding.validate()?;

        let mut normalized = new_holding;
        normalized.symbol = normalized.normalized_symbol();
        debug!(
            "Creating holding {} for user {}",
            normalized.symbol, normalized.user_id
        );

        self.repository.create(normalized).await
    }

    async fn update_holding(
        &self,
        holding_id: &str,
        user_id: &str,
        patch: HoldingPatch,
    ) -> Result<Holding> {
        patch.validate()?;
        if patch.is_empty() {
            return self.repository.get_by_id(holding_id, user_id);
        }
        self.repository.update(holding_id, user_id, patch).await
    }

    async fn delete_holding(&self, holding_id: &str, user_id: &str) -> Result<()> {
        self.repository.delete(holding_id, user_id).await?;
        Ok(())
    }

    fn get_holding(&self, holding_id: &str, user_id: &str) -> Result<Holding> {
        self.repository.get_by_id(holding_id, user_id)
    }

    fn list_holdings(&self, user_id: &str) -> Result<Vec<Holding>> {
        self.repository.list_for_user(user_id)
    }
}
