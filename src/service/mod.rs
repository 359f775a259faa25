//! Service layer: business logic orchestration.
//!
//! [`RelayService`] coordinates device connections, caching, and control
//! fan-out; [`InventoryService`] owns the stock records. Both emit events
//! through the [`super::domain::EventBus`].

pub mod inventory;
pub mod relay;

pub use inventory::InventoryService;
pub use relay::{ModeOutcome, RelayService};
