//! # Cost Estimation
//!
//! Validates an [`EstimationRequest`] and computes a capital-cost estimate
//! against a [`Catalog`]. Both [`validate_request`] and [`compute`] are pure
//! functions of their inputs: no hidden state, no I/O, no logging, so the
//! same request and catalog always produce bit-identical results.
//!
//! ## Example
//!
//! ```rust
//! use cost_core::catalog::Catalog;
//! use cost_core::estimate::{compute, EstimationRequest};
//!
//! let catalog = Catalog::builtin();
//! let request = EstimationRequest {
//!     method: "Hand".to_string(),
//!     plant_type: "Chemical".to_string(),
//!     equipment: "Pump".to_string(),
//!     equipment_type: "Single-stage centrifugal".to_string(),
//!     sizing_value: 50.0,
//! };
//!
//! let result = compute(&request, catalog).unwrap();
//! assert!(result.purchased_equipment_cost > 0.0);
//! assert!(result.installed_equipment_cost().is_some());
//! ```

use serde::{Deserialize, Serialize};

use crate::catalog::{methods, Catalog};
use crate::errors::{EstimateError, EstimateResult, FieldError, FieldErrorKind};

/// A candidate estimation request: the four hierarchical selections plus the
/// sizing value. Constructed fresh per calculation attempt and validated
/// before any catalog lookup.
///
/// ## JSON Example
///
/// ```json
/// {
///   "method": "Hand",
///   "plant_type": "Chemical",
///   "equipment": "Pump",
///   "equipment_type": "Single-stage centrifugal",
///   "sizing_value": 50.0
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimationRequest {
    /// Costing method selection
    pub method: String,
    /// Plant process type selection
    pub plant_type: String,
    /// Equipment category selection
    pub equipment: String,
    /// Equipment type selection
    pub equipment_type: String,
    /// Sizing quantity, in the units the matching record declares
    pub sizing_value: f64,
}

/// Method-dependent portion of an estimation result.
///
/// Hand-method rows yield a single installed cost; every other method takes
/// the material-factor branch and yields ISBL plus total fixed capital.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CostBreakdown {
    /// Lumped installation-factor result
    Hand {
        /// Purchased cost times the record's installation factor
        installed_equipment_cost: f64,
    },
    /// Multi-factor Lang-style result
    MaterialFactor {
        /// Installed cost inside the battery limits
        isbl_cost: f64,
        /// ISBL grossed up for offsites, engineering, contingency, location
        total_fixed_capital_cost: f64,
    },
}

/// Output of a successful calculation. All values are raw numbers; display
/// formatting (currency symbols, thousands separators) belongs to the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimationResult {
    /// Base vendor cost from the power-law correlation
    pub purchased_equipment_cost: f64,
    /// Method-dependent installed/ISBL/total costs
    pub breakdown: CostBreakdown,
}

impl EstimationResult {
    /// Installed cost, when the Hand method was used
    pub fn installed_equipment_cost(&self) -> Option<f64> {
        match self.breakdown {
            CostBreakdown::Hand {
                installed_equipment_cost,
            } => Some(installed_equipment_cost),
            CostBreakdown::MaterialFactor { .. } => None,
        }
    }

    /// ISBL cost, when a material-factor method was used
    pub fn isbl_cost(&self) -> Option<f64> {
        match self.breakdown {
            CostBreakdown::MaterialFactor { isbl_cost, .. } => Some(isbl_cost),
            CostBreakdown::Hand { .. } => None,
        }
    }

    /// Total fixed capital cost, when a material-factor method was used
    pub fn total_fixed_capital_cost(&self) -> Option<f64> {
        match self.breakdown {
            CostBreakdown::MaterialFactor {
                total_fixed_capital_cost,
                ..
            } => Some(total_fixed_capital_cost),
            CostBreakdown::Hand { .. } => None,
        }
    }
}

/// Shape/presence validation of a request, without consulting any catalog.
///
/// Checks every field and returns the full batch of failures, never just the
/// first: each empty categorical field yields a Missing "must be selected"
/// error, and a sizing value that is not a strictly-positive finite number
/// yields an Invalid "must be a positive number" error. An empty list means
/// the request is well-formed.
pub fn validate_request(request: &EstimationRequest) -> Vec<FieldError> {
    let mut errors = Vec::new();

    for (field, value) in [
        ("method", &request.method),
        ("plant_type", &request.plant_type),
        ("equipment", &request.equipment),
        ("equipment_type", &request.equipment_type),
    ] {
        if value.trim().is_empty() {
            errors.push(FieldError::missing(field, "must be selected"));
        }
    }

    if !request.sizing_value.is_finite() || request.sizing_value <= 0.0 {
        errors.push(FieldError::invalid(
            "sizing_value",
            "must be a positive number",
        ));
    }

    errors
}

/// Whether a request is ready to compute, with human-readable reasons.
///
/// Wraps [`validate_request`]; messages are prefixed with `missing` or
/// `invalid` so hosts can phrase the two failure modes differently.
pub fn check_ready(request: &EstimationRequest) -> (bool, Vec<String>) {
    let errors = validate_request(request);
    let messages = errors
        .iter()
        .map(|e| match e.kind {
            FieldErrorKind::Missing => format!("missing {}: {}", e.field, e.message),
            FieldErrorKind::Invalid => format!("invalid {}: {}", e.field, e.message),
        })
        .collect();
    (errors.is_empty(), messages)
}

/// Compute a cost estimate for a request against a catalog.
///
/// Steps, each with its own typed failure:
/// 1. shape validation ([`EstimateError::InvalidRequest`] with the full
///    batch of field errors);
/// 2. point lookup of the matching record ([`EstimateError::NotFound`]);
/// 3. range check against the record's sizing bounds, applied only when
///    both bounds are declared, inclusive at both ends
///    ([`EstimateError::OutOfRange`]);
/// 4. purchased cost `a + b * S^n` ([`EstimateError::Computation`] if the
///    evaluation is not finite);
/// 5. the Hand branch when the record's method is exactly "Hand", the
///    material-factor branch for every other method value.
pub fn compute(request: &EstimationRequest, catalog: &Catalog) -> EstimateResult<EstimationResult> {
    let errors = validate_request(request);
    if !errors.is_empty() {
        return Err(EstimateError::InvalidRequest { errors });
    }

    let record = catalog.lookup_one(
        &request.method,
        &request.plant_type,
        &request.equipment,
        &request.equipment_type,
    )?;

    if let (Some(lower), Some(upper)) = (record.s_lower, record.s_upper) {
        if request.sizing_value < lower || request.sizing_value > upper {
            return Err(EstimateError::OutOfRange {
                value: request.sizing_value,
                lower,
                upper,
            });
        }
    }

    let purchased = record.a + record.b * request.sizing_value.powf(record.n);
    if !purchased.is_finite() {
        return Err(EstimateError::Computation {
            base: request.sizing_value,
            exponent: record.n,
        });
    }

    let breakdown = if record.method == methods::HAND {
        CostBreakdown::Hand {
            installed_equipment_cost: purchased * record.installation_factor,
        }
    } else {
        let isbl_cost = purchased
            * ((1.0 + record.piping_factor) * record.material_factor
                + (record.equipment_erection_factor
                    + record.electrical_factor
                    + record.instrumentation_and_control_factor
                    + record.civil_factor
                    + record.structures_and_buildings_factor
                    + record.lagging_and_paint_factor));
        let total_fixed_capital_cost = isbl_cost
            * (1.0 + record.offsites_factor)
            * (1.0 + record.design_and_engineering_factor + record.contingency)
            * record.location_factor;
        CostBreakdown::MaterialFactor {
            isbl_cost,
            total_fixed_capital_cost,
        }
    };

    Ok(EstimationResult {
        purchased_equipment_cost: purchased,
        breakdown,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogRecord;

    fn hand_record() -> CatalogRecord {
        CatalogRecord {
            method: "Hand".to_string(),
            plant_type: "Chemical".to_string(),
            equipment: "Pump".to_string(),
            equipment_type: "Single-stage centrifugal".to_string(),
            sizing_quantity: "Flow".to_string(),
            units: "L/s".to_string(),
            s_lower: Some(0.2),
            s_upper: Some(126.0),
            a: 1000.0,
            b: 500.0,
            n: 0.6,
            installation_factor: 2.5,
            material_factor: 0.0,
            equipment_erection_factor: 0.0,
            piping_factor: 0.0,
            instrumentation_and_control_factor: 0.0,
            electrical_factor: 0.0,
            civil_factor: 0.0,
            structures_and_buildings_factor: 0.0,
            lagging_and_paint_factor: 0.0,
            offsites_factor: 0.0,
            design_and_engineering_factor: 0.0,
            contingency: 0.0,
            location_factor: 0.0,
        }
    }

    fn material_record() -> CatalogRecord {
        CatalogRecord {
            method: "material factors".to_string(),
            plant_type: "Fluids processing".to_string(),
            equipment: "Heat exchanger".to_string(),
            equipment_type: "U-tube shell and tube".to_string(),
            sizing_quantity: "Area".to_string(),
            units: "m2".to_string(),
            s_lower: None,
            s_upper: None,
            a: 0.0,
            b: 1.0,
            n: 1.0,
            installation_factor: 0.0,
            material_factor: 1.2,
            equipment_erection_factor: 0.1,
            piping_factor: 0.1,
            instrumentation_and_control_factor: 0.1,
            electrical_factor: 0.1,
            civil_factor: 0.1,
            structures_and_buildings_factor: 0.1,
            lagging_and_paint_factor: 0.1,
            offsites_factor: 0.2,
            design_and_engineering_factor: 0.1,
            contingency: 0.05,
            location_factor: 1.0,
        }
    }

    fn test_catalog() -> Catalog {
        Catalog::new(vec![hand_record(), material_record()])
    }

    fn hand_request(sizing_value: f64) -> EstimationRequest {
        EstimationRequest {
            method: "Hand".to_string(),
            plant_type: "Chemical".to_string(),
            equipment: "Pump".to_string(),
            equipment_type: "Single-stage centrifugal".to_string(),
            sizing_value,
        }
    }

    fn material_request(sizing_value: f64) -> EstimationRequest {
        EstimationRequest {
            method: "material factors".to_string(),
            plant_type: "Fluids processing".to_string(),
            equipment: "Heat exchanger".to_string(),
            equipment_type: "U-tube shell and tube".to_string(),
            sizing_value,
        }
    }

    #[test]
    fn test_hand_method() {
        let result = compute(&hand_request(10.0), &test_catalog()).unwrap();

        // P = 1000 + 500 * 10^0.6 = 2990.54
        let expected_purchased = 1000.0 + 500.0 * 10f64.powf(0.6);
        assert!((result.purchased_equipment_cost - expected_purchased).abs() < 1e-9);
        assert!((result.purchased_equipment_cost - 2990.54).abs() < 0.01);

        // Installed = P * 2.5
        let installed = result.installed_equipment_cost().unwrap();
        assert!((installed - expected_purchased * 2.5).abs() < 1e-9);

        assert!(result.isbl_cost().is_none());
        assert!(result.total_fixed_capital_cost().is_none());
    }

    #[test]
    fn test_material_factor_method() {
        let result = compute(&material_request(100.0), &test_catalog()).unwrap();

        // P = 0 + 1 * 100^1 = 100
        assert!((result.purchased_equipment_cost - 100.0).abs() < 1e-9);

        // ISBL = 100 * ((1 + 0.1) * 1.2 + 6 * 0.1) = 192
        let isbl = result.isbl_cost().unwrap();
        assert!((isbl - 192.0).abs() < 1e-6);

        // Total = 192 * 1.2 * 1.15 * 1.0 = 264.96
        let total = result.total_fixed_capital_cost().unwrap();
        assert!((total - 264.96).abs() < 1e-6);

        assert!(result.installed_equipment_cost().is_none());
    }

    #[test]
    fn test_non_hand_method_takes_material_branch() {
        // Any method other than the literal "Hand" uses the factor formulas
        let mut record = material_record();
        record.method = "lang factors".to_string();
        let catalog = Catalog::new(vec![record]);

        let mut request = material_request(100.0);
        request.method = "lang factors".to_string();

        let result = compute(&request, &catalog).unwrap();
        assert!(result.isbl_cost().is_some());
        assert!(result.installed_equipment_cost().is_none());
    }

    #[test]
    fn test_range_law() {
        let catalog = test_catalog();

        // Inside, inclusive of both ends
        for value in [0.2, 10.0, 126.0] {
            assert!(compute(&hand_request(value), &catalog).is_ok());
        }

        // Outside either end
        for value in [0.1, 126.5] {
            let err = compute(&hand_request(value), &catalog).unwrap_err();
            assert_eq!(
                err,
                EstimateError::OutOfRange {
                    value,
                    lower: 0.2,
                    upper: 126.0,
                }
            );
        }
    }

    #[test]
    fn test_missing_bound_disables_range_check() {
        let mut record = hand_record();
        record.s_upper = None;
        let catalog = Catalog::new(vec![record]);

        // Far beyond the (absent) upper bound
        assert!(compute(&hand_request(1e6), &catalog).is_ok());
    }

    #[test]
    fn test_validate_request_batches_all_errors() {
        let request = EstimationRequest {
            method: String::new(),
            plant_type: String::new(),
            equipment: String::new(),
            equipment_type: String::new(),
            sizing_value: -1.0,
        };
        let errors = validate_request(&request);
        assert_eq!(errors.len(), 5);

        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            vec![
                "method",
                "plant_type",
                "equipment",
                "equipment_type",
                "sizing_value"
            ]
        );
    }

    #[test]
    fn test_validate_request_single_missing_field() {
        let mut request = hand_request(10.0);
        request.equipment_type = String::new();

        let errors = validate_request(&request);
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors[0],
            FieldError::missing("equipment_type", "must be selected")
        );
    }

    #[test]
    fn test_validate_sizing_value() {
        for bad in [0.0, -5.0, f64::NAN, f64::INFINITY] {
            let errors = validate_request(&hand_request(bad));
            assert_eq!(errors.len(), 1, "sizing_value {} should be flagged", bad);
            assert_eq!(errors[0].field, "sizing_value");
            assert_eq!(errors[0].kind, FieldErrorKind::Invalid);
        }

        assert!(validate_request(&hand_request(0.001)).is_empty());
    }

    #[test]
    fn test_check_ready_prefixes() {
        let mut request = hand_request(0.0);
        request.method = String::new();

        let (ready, messages) = check_ready(&request);
        assert!(!ready);
        assert_eq!(
            messages,
            vec![
                "missing method: must be selected",
                "invalid sizing_value: must be a positive number",
            ]
        );

        let (ready, messages) = check_ready(&hand_request(10.0));
        assert!(ready);
        assert!(messages.is_empty());
    }

    #[test]
    fn test_compute_rejects_invalid_request() {
        let mut request = hand_request(10.0);
        request.plant_type = String::new();

        let err = compute(&request, &test_catalog()).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_REQUEST");
    }

    #[test]
    fn test_compute_not_found() {
        let mut request = hand_request(10.0);
        request.equipment_type = "Reciprocating".to_string();

        let err = compute(&request, &test_catalog()).unwrap_err();
        assert_eq!(err.error_code(), "NOT_FOUND");
    }

    #[test]
    fn test_computation_error_on_overflow() {
        let mut record = material_record();
        record.n = 400.0;
        let catalog = Catalog::new(vec![record]);

        let err = compute(&material_request(1e300), &catalog).unwrap_err();
        assert_eq!(
            err,
            EstimateError::Computation {
                base: 1e300,
                exponent: 400.0,
            }
        );
    }

    #[test]
    fn test_compute_is_idempotent() {
        let catalog = test_catalog();
        let request = material_request(42.5);

        let first = compute(&request, &catalog).unwrap();
        let second = compute(&request, &catalog).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_result_serialization() {
        let result = compute(&material_request(100.0), &test_catalog()).unwrap();
        let json = serde_json::to_string(&result).unwrap();
        let roundtrip: EstimationResult = serde_json::from_str(&json).unwrap();
        assert_eq!(result, roundtrip);
    }
}
