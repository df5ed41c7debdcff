//! `mealcost-records` — validated record schemas and the read-side
//! Record Store boundary.
//!
//! Records are validated once, at construction, so the costing code
//! downstream never has to re-check shapes. Persistence, CRUD and write
//! concurrency live in the surrounding application; this crate only
//! defines what the costing engine reads.

pub mod indirect;
pub mod memory;
pub mod production;
pub mod purchase;
pub mod store;

pub use indirect::IndirectCostRecord;
pub use memory::InMemoryRecordStore;
pub use production::ProductionRecord;
pub use purchase::{IngredientUnit, PurchaseRecord};
pub use store::{FetchError, FetchResult, RecordStore};
