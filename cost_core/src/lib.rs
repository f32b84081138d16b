//! # cost_core - Capital Cost Estimation Engine
//!
//! `cost_core` estimates the capital cost of process-plant equipment from
//! empirical cost correlations. Given a costing method, plant type,
//! equipment category, equipment type, and a sizing value, it looks up the
//! matching correlation record and applies either Hand's lumped
//! installation factor or the multi-factor (Lang-style) material-factor
//! formulas to produce purchased, installed/ISBL, and total fixed capital
//! costs.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: pure functions of (request, catalog); the catalog is
//!   immutable after load, so one instance can serve concurrent callers
//! - **JSON-First**: all inputs, outputs, and errors are serde-serializable
//! - **Rich Errors**: every failure is a typed, recoverable value the host
//!   can act on (re-prompt, reselect, retry)
//! - **Raw Numbers**: results are unformatted f64s; currency formatting
//!   belongs to the presentation layer
//!
//! ## Quick Start
//!
//! ```rust
//! use cost_core::catalog::Catalog;
//! use cost_core::estimate::{check_ready, compute, EstimationRequest};
//!
//! let catalog = Catalog::builtin();
//!
//! let request = EstimationRequest {
//!     method: "Hand".to_string(),
//!     plant_type: "Chemical".to_string(),
//!     equipment: "Heat exchanger".to_string(),
//!     equipment_type: "U-tube shell and tube".to_string(),
//!     sizing_value: 200.0,
//! };
//!
//! let (ready, _reasons) = check_ready(&request);
//! assert!(ready);
//!
//! let result = compute(&request, catalog).unwrap();
//! println!("Purchased: {:.2}", result.purchased_equipment_cost);
//! ```
//!
//! ## Modules
//!
//! - [`catalog`] - Reference catalog of cost-correlation records
//! - [`estimate`] - Request validation and cost calculation
//! - [`errors`] - Structured error types

pub mod catalog;
pub mod errors;
pub mod estimate;

// Re-export commonly used types at crate root for convenience
pub use catalog::{Catalog, CatalogField, CatalogRecord, FilterCriteria};
pub use errors::{EstimateError, EstimateResult, FieldError, FieldErrorKind};
pub use estimate::{
    check_ready, compute, validate_request, CostBreakdown, EstimationRequest, EstimationResult,
};
