//! # Reference Catalog
//!
//! The cost-correlation dataset: one [`CatalogRecord`] per equipment type,
//! keyed by (method, plant type, equipment, equipment type). The catalog is
//! loaded once, indexed for O(1) point lookup, and never mutated afterwards,
//! so a single instance can be shared freely across threads.
//!
//! ## Example
//!
//! ```rust
//! use cost_core::catalog::{Catalog, CatalogField, FilterCriteria};
//!
//! let catalog = Catalog::builtin();
//!
//! // Populate a method dropdown
//! let methods = catalog.distinct_values(CatalogField::Method, &FilterCriteria::new());
//! assert!(methods.contains(&"Hand".to_string()));
//!
//! // Narrow plant types to one method
//! let criteria = FilterCriteria::new().with_method("Hand");
//! let plants = catalog.distinct_values(CatalogField::PlantType, &criteria);
//! assert!(!plants.is_empty());
//! ```

use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::errors::{EstimateError, EstimateResult};

/// Observed costing-method names.
///
/// The method column is an open set: anything other than [`HAND`] takes the
/// material-factor branch of the calculation, so new method names in the
/// data do not require code changes.
pub mod methods {
    /// Single lumped installation factor (Hand's method)
    pub const HAND: &str = "Hand";
    /// Multi-factor Lang-style method
    pub const MATERIAL_FACTORS: &str = "material factors";
}

/// One row of the cost-correlation reference table.
///
/// Purchased cost follows the power-law correlation `a + b * S^n` in the
/// sizing quantity `S`. `installation_factor` applies only to Hand-method
/// rows; the eleven remaining factors apply only to material-factor rows.
/// Blank factor cells in the source data load as 0.0; blank bounds load as
/// `None` (unbounded), never as zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogRecord {
    /// Costing method (e.g. "Hand", "material factors")
    pub method: String,
    /// Plant process type the correlation applies to
    pub plant_type: String,
    /// Equipment category (e.g. "Pump", "Heat exchanger")
    pub equipment: String,
    /// Specific equipment type within the category
    pub equipment_type: String,

    /// Display label for the sizing quantity (e.g. "Flow", "Area")
    pub sizing_quantity: String,
    /// Display units for the sizing quantity (e.g. "L/s", "m2")
    pub units: String,

    /// Lower bound of the correlation's valid sizing range, if declared
    pub s_lower: Option<f64>,
    /// Upper bound of the correlation's valid sizing range, if declared
    pub s_upper: Option<f64>,

    /// Cost-correlation constant term
    pub a: f64,
    /// Cost-correlation coefficient
    pub b: f64,
    /// Cost-correlation exponent
    pub n: f64,

    /// Lumped installation multiplier (Hand method only)
    pub installation_factor: f64,

    // Material-factor method multipliers
    pub material_factor: f64,
    pub equipment_erection_factor: f64,
    pub piping_factor: f64,
    pub instrumentation_and_control_factor: f64,
    pub electrical_factor: f64,
    pub civil_factor: f64,
    pub structures_and_buildings_factor: f64,
    pub lagging_and_paint_factor: f64,
    pub offsites_factor: f64,
    pub design_and_engineering_factor: f64,
    pub contingency: f64,
    pub location_factor: f64,
}

impl CatalogRecord {
    /// Value of one of the four hierarchical key fields
    pub fn key_value(&self, field: CatalogField) -> &str {
        match field {
            CatalogField::Method => &self.method,
            CatalogField::PlantType => &self.plant_type,
            CatalogField::Equipment => &self.equipment,
            CatalogField::EquipmentType => &self.equipment_type,
        }
    }
}

/// The four hierarchical key fields of the catalog.
///
/// Filtering applies them in this order, so an empty intermediate result can
/// be attributed to the most specific failing criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CatalogField {
    Method,
    PlantType,
    Equipment,
    EquipmentType,
}

impl CatalogField {
    /// Hierarchical filter order, broadest first
    pub const HIERARCHY: [CatalogField; 4] = [
        CatalogField::Method,
        CatalogField::PlantType,
        CatalogField::Equipment,
        CatalogField::EquipmentType,
    ];

    /// Column name in the source data / request field name
    pub fn column_name(&self) -> &'static str {
        match self {
            CatalogField::Method => "method",
            CatalogField::PlantType => "plant_type",
            CatalogField::Equipment => "equipment",
            CatalogField::EquipmentType => "equipment_type",
        }
    }
}

impl std::fmt::Display for CatalogField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.column_name())
    }
}

/// Hierarchical filter criteria. `None` and empty strings both mean
/// "ignore this stage".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub method: Option<String>,
    pub plant_type: Option<String>,
    pub equipment: Option<String>,
    pub equipment_type: Option<String>,
}

impl FilterCriteria {
    /// Empty criteria (matches everything)
    pub fn new() -> Self {
        Self::default()
    }

    /// Narrow to one method
    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    /// Narrow to one plant type
    pub fn with_plant_type(mut self, plant_type: impl Into<String>) -> Self {
        self.plant_type = Some(plant_type.into());
        self
    }

    /// Narrow to one equipment category
    pub fn with_equipment(mut self, equipment: impl Into<String>) -> Self {
        self.equipment = Some(equipment.into());
        self
    }

    /// Narrow to one equipment type
    pub fn with_equipment_type(mut self, equipment_type: impl Into<String>) -> Self {
        self.equipment_type = Some(equipment_type.into());
        self
    }

    /// The effective criterion for one stage, if provided and non-empty
    fn stage_value(&self, field: CatalogField) -> Option<&str> {
        let value = match field {
            CatalogField::Method => self.method.as_deref(),
            CatalogField::PlantType => self.plant_type.as_deref(),
            CatalogField::Equipment => self.equipment.as_deref(),
            CatalogField::EquipmentType => self.equipment_type.as_deref(),
        };
        value.filter(|v| !v.is_empty())
    }
}

/// Four-part key for the point-lookup index
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct RecordKey {
    method: String,
    plant_type: String,
    equipment: String,
    equipment_type: String,
}

impl RecordKey {
    fn of(record: &CatalogRecord) -> Self {
        RecordKey {
            method: record.method.clone(),
            plant_type: record.plant_type.clone(),
            equipment: record.equipment.clone(),
            equipment_type: record.equipment_type.clone(),
        }
    }
}

/// Immutable, queryable table of cost-correlation records.
///
/// Records keep their load order for filtering and distinct-value queries;
/// a side index over the four-part key makes [`lookup_one`](Catalog::lookup_one)
/// O(1). When the data contains duplicate keys the first-loaded row wins,
/// matching first-row selection semantics.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    records: Vec<CatalogRecord>,
    index: HashMap<RecordKey, usize>,
}

impl Catalog {
    /// Build a catalog from records, indexing the four-part key
    pub fn new(records: Vec<CatalogRecord>) -> Self {
        let mut index = HashMap::with_capacity(records.len());
        for (i, record) in records.iter().enumerate() {
            index.entry(RecordKey::of(record)).or_insert(i);
        }
        Catalog { records, index }
    }

    /// Number of records in the catalog
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the catalog holds no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records in load order
    pub fn records(&self) -> &[CatalogRecord] {
        &self.records
    }

    /// Hierarchically filter records.
    ///
    /// Criteria are applied in [`CatalogField::HIERARCHY`] order; each
    /// provided non-empty criterion must leave at least one row, otherwise
    /// the filter fails with [`EstimateError::EmptyResult`] naming the
    /// first stage that emptied the result.
    pub fn filter(&self, criteria: &FilterCriteria) -> EstimateResult<Vec<&CatalogRecord>> {
        let mut rows: Vec<&CatalogRecord> = self.records.iter().collect();
        for field in CatalogField::HIERARCHY {
            let Some(value) = criteria.stage_value(field) else {
                continue;
            };
            rows.retain(|record| record.key_value(field) == value);
            if rows.is_empty() {
                return Err(EstimateError::EmptyResult {
                    stage: field.column_name().to_string(),
                    value: value.to_string(),
                });
            }
        }
        Ok(rows)
    }

    /// Distinct values of one key field among the rows matching `criteria`,
    /// in first-seen order. Empty cell values are skipped. Criteria that
    /// match nothing yield an empty list rather than an error, since this
    /// query exists to populate selection choices.
    pub fn distinct_values(&self, field: CatalogField, criteria: &FilterCriteria) -> Vec<String> {
        let rows = match self.filter(criteria) {
            Ok(rows) => rows,
            Err(_) => return Vec::new(),
        };
        let mut seen = HashSet::new();
        let mut values = Vec::new();
        for record in rows {
            let value = record.key_value(field);
            if !value.is_empty() && seen.insert(value.to_string()) {
                values.push(value.to_string());
            }
        }
        values
    }

    /// Look up the single record for a fully-specified key.
    ///
    /// All four criteria must be non-empty ([`EstimateError::MissingField`]
    /// otherwise). Fails with [`EstimateError::NotFound`] when no record
    /// matches; individually valid criteria do not guarantee a match, since
    /// the data may be inconsistent.
    pub fn lookup_one(
        &self,
        method: &str,
        plant_type: &str,
        equipment: &str,
        equipment_type: &str,
    ) -> EstimateResult<&CatalogRecord> {
        for (field, value) in [
            ("method", method),
            ("plant_type", plant_type),
            ("equipment", equipment),
            ("equipment_type", equipment_type),
        ] {
            if value.is_empty() {
                return Err(EstimateError::missing_field(field));
            }
        }

        let key = RecordKey {
            method: method.to_string(),
            plant_type: plant_type.to_string(),
            equipment: equipment.to_string(),
            equipment_type: equipment_type.to_string(),
        };
        match self.index.get(&key) {
            Some(&i) => Ok(&self.records[i]),
            None => Err(EstimateError::NotFound {
                method: method.to_string(),
                plant_type: plant_type.to_string(),
                equipment: equipment.to_string(),
                equipment_type: equipment_type.to_string(),
            }),
        }
    }

    /// Load a catalog from a CSV file on disk
    pub fn load_from_csv(path: &str) -> EstimateResult<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| EstimateError::file_error("open", path, e.to_string()))?;
        Self::from_csv_str(&text)
    }

    /// Parse a catalog from CSV text.
    ///
    /// Column matching is header-based and case-insensitive. The four key
    /// columns are required ([`EstimateError::Schema`] lists any that are
    /// absent, checked once here, not per query); all other columns are
    /// optional, with blank numeric cells read as absent (bounds) or 0.0
    /// (coefficients and factors). Rows without a method value are skipped.
    pub fn from_csv_str(text: &str) -> EstimateResult<Self> {
        let mut lines = text.lines();

        let header_line = lines.next().unwrap_or("");
        let headers: Vec<&str> = header_line.split(',').map(str::trim).collect();
        let col_index =
            |name: &str| -> Option<usize> { headers.iter().position(|h| h.eq_ignore_ascii_case(name)) };

        // Required key columns, checked up front
        let mut missing_columns = Vec::new();
        for field in CatalogField::HIERARCHY {
            if col_index(field.column_name()).is_none() {
                missing_columns.push(field.column_name().to_string());
            }
        }
        if !missing_columns.is_empty() {
            return Err(EstimateError::Schema { missing_columns });
        }

        let method_idx = col_index("method");
        let plant_idx = col_index("plant_type");
        let equipment_idx = col_index("equipment");
        let type_idx = col_index("equipment_type");

        let sizing_idx = col_index("sizing_quantity");
        let units_idx = col_index("units");
        let s_lower_idx = col_index("s_lower");
        let s_upper_idx = col_index("s_upper");
        let a_idx = col_index("a");
        let b_idx = col_index("b");
        let n_idx = col_index("n");
        let installation_idx = col_index("installation_factor");
        let material_idx = col_index("material_factor");
        let erection_idx = col_index("equipment_erection_factor");
        let piping_idx = col_index("piping_factor");
        let instrumentation_idx = col_index("instrumentation_and_control_factor");
        let electrical_idx = col_index("electrical_factor");
        let civil_idx = col_index("civil_factor");
        let structures_idx = col_index("structures_and_buildings_factor");
        let lagging_idx = col_index("lagging_and_paint_factor");
        let offsites_idx = col_index("offsites_factor");
        let design_idx = col_index("design_and_engineering_factor");
        let contingency_idx = col_index("contingency");
        let location_idx = col_index("location_factor");

        let mut records = Vec::new();
        for line in lines {
            if line.trim().is_empty() {
                continue;
            }
            let fields: Vec<&str> = line.split(',').map(str::trim).collect();

            let get_str = |idx: Option<usize>| -> String {
                idx.and_then(|i| fields.get(i)).unwrap_or(&"").to_string()
            };
            let get_opt_f64 = |idx: Option<usize>| -> Option<f64> {
                idx.and_then(|i| fields.get(i))
                    .and_then(|v| parse_optional_f64(v))
            };
            let get_f64 = |idx: Option<usize>| -> f64 { get_opt_f64(idx).unwrap_or(0.0) };

            let method = get_str(method_idx);
            if method.is_empty() {
                continue;
            }

            records.push(CatalogRecord {
                method,
                plant_type: get_str(plant_idx),
                equipment: get_str(equipment_idx),
                equipment_type: get_str(type_idx),
                sizing_quantity: get_str(sizing_idx),
                units: get_str(units_idx),
                s_lower: get_opt_f64(s_lower_idx),
                s_upper: get_opt_f64(s_upper_idx),
                a: get_f64(a_idx),
                b: get_f64(b_idx),
                n: get_f64(n_idx),
                installation_factor: get_f64(installation_idx),
                material_factor: get_f64(material_idx),
                equipment_erection_factor: get_f64(erection_idx),
                piping_factor: get_f64(piping_idx),
                instrumentation_and_control_factor: get_f64(instrumentation_idx),
                electrical_factor: get_f64(electrical_idx),
                civil_factor: get_f64(civil_idx),
                structures_and_buildings_factor: get_f64(structures_idx),
                lagging_and_paint_factor: get_f64(lagging_idx),
                offsites_factor: get_f64(offsites_idx),
                design_and_engineering_factor: get_f64(design_idx),
                contingency: get_f64(contingency_idx),
                location_factor: get_f64(location_idx),
            });
        }

        Ok(Catalog::new(records))
    }

    /// The built-in reference dataset embedded in the crate
    pub fn builtin() -> &'static Catalog {
        static BUILTIN: Lazy<Catalog> = Lazy::new(|| {
            Catalog::from_csv_str(include_str!("../assets/materials_factor.csv"))
                .expect("embedded catalog data is well-formed")
        });
        &BUILTIN
    }
}

/// Parse a numeric cell, treating blanks and non-numeric text as absent
fn parse_optional_f64(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}
