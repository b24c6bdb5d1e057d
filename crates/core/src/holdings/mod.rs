pub mod holdings_model;
pub mod holdings_service;
pub mod holdings_traits;

pub use holdings_model::{Holding, HoldingPatch, NewHolding};
pub use holdings_service::HoldingService;
pub use holdings_traits::{HoldingRepositoryTrait, HoldingServiceTrait};
