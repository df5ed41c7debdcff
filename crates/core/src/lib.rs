//! `mealcost-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod error;
pub mod id;
pub mod money;
pub mod service;
pub mod value_object;

pub use error::{DomainError, DomainResult, ensure_range};
pub use id::{FacilityId, IngredientId, RecordId};
pub use money::{per_meal, round1, round2};
pub use service::MealService;
pub use value_object::ValueObject;
