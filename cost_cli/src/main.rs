//! # Cost Estimator CLI
//!
//! Interactive command-line host for the cost_core estimation engine.
//! Walks the catalog hierarchy (method, plant type, equipment, equipment
//! type) with numbered menus, prompts for a sizing value, and prints the
//! cost estimate.
//!
//! ## Usage
//!
//! ```text
//! cost_cli [CATALOG_CSV] [--json]
//! ```
//!
//! Without a path the built-in reference dataset is used. With `--json`
//! the result is printed as JSON instead of formatted text.

use std::io::{self, BufRead, Write};

use cost_core::catalog::{Catalog, CatalogField, FilterCriteria};
use cost_core::errors::EstimateError;
use cost_core::estimate::{check_ready, compute, EstimationRequest};

fn prompt_line(prompt: &str) -> Option<String> {
    print!("{}", prompt);
    io::stdout().flush().ok()?;

    let mut input = String::new();
    io::stdin().lock().read_line(&mut input).ok()?;
    if input.is_empty() {
        // EOF
        return None;
    }
    Some(input.trim().to_string())
}

/// Numbered-menu selection. Re-prompts until a valid choice number is
/// entered; returns None on EOF or when there are no options to offer.
fn prompt_choice(label: &str, options: &[String]) -> Option<String> {
    if options.is_empty() {
        eprintln!("No {} choices available for the current selection.", label);
        return None;
    }

    println!("Choose {}:", label);
    for (i, option) in options.iter().enumerate() {
        println!("  {}. {}", i + 1, option);
    }

    loop {
        let input = prompt_line("Enter choice number: ")?;
        match input.parse::<usize>() {
            Ok(choice) if (1..=options.len()).contains(&choice) => {
                let selected = options[choice - 1].clone();
                println!("You selected {}: {}", label, selected);
                return Some(selected);
            }
            _ => println!(
                "Please enter a number between 1 and {}.",
                options.len()
            ),
        }
    }
}

/// Prompt for the sizing value, showing the record's quantity label, units,
/// and declared range when present. Re-prompts on non-numeric input.
fn prompt_sizing(
    quantity: &str,
    units: &str,
    s_lower: Option<f64>,
    s_upper: Option<f64>,
) -> Option<f64> {
    let prompt = match (s_lower, s_upper) {
        (Some(lower), Some(upper)) => format!(
            "Enter a value for {} in {} between {} and {}: ",
            quantity, units, lower, upper
        ),
        _ => format!("Enter a value for {} in {}: ", quantity, units),
    };

    loop {
        let input = prompt_line(&prompt)?;
        match input.parse::<f64>() {
            Ok(value) => return Some(value),
            Err(_) => println!("Please enter a numeric value."),
        }
    }
}

/// Format a cost as $#,###.## for display
fn format_usd(value: f64) -> String {
    let negative = value < 0.0;
    let text = format!("{:.2}", value.abs());
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::new();
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let sign = if negative { "-" } else { "" };
    format!("{}${}.{}", sign, grouped, frac_part)
}

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let json_output = args.iter().any(|a| a == "--json");
    let csv_path = args.iter().find(|a| !a.starts_with("--"));

    let loaded;
    let catalog: &Catalog = match csv_path {
        Some(path) => {
            loaded = match Catalog::load_from_csv(path) {
                Ok(catalog) => catalog,
                Err(e) => {
                    eprintln!("Failed to load catalog: {}", e);
                    std::process::exit(1);
                }
            };
            &loaded
        }
        None => Catalog::builtin(),
    };

    println!("Capital Cost Estimator");
    println!("======================");
    println!();

    // Cascading selection: each choice narrows the next menu
    let method_options = catalog.distinct_values(CatalogField::Method, &FilterCriteria::new());
    let Some(method) = prompt_choice("method", &method_options) else {
        return;
    };

    let criteria = FilterCriteria::new().with_method(&method);
    let plant_options = catalog.distinct_values(CatalogField::PlantType, &criteria);
    let Some(plant_type) = prompt_choice("plant type", &plant_options) else {
        return;
    };

    let criteria = criteria.with_plant_type(&plant_type);
    let equipment_options = catalog.distinct_values(CatalogField::Equipment, &criteria);
    let Some(equipment) = prompt_choice("equipment", &equipment_options) else {
        return;
    };

    let criteria = criteria.with_equipment(&equipment);
    let type_options = catalog.distinct_values(CatalogField::EquipmentType, &criteria);
    let Some(equipment_type) = prompt_choice("equipment type", &type_options) else {
        return;
    };

    let record = match catalog.lookup_one(&method, &plant_type, &equipment, &equipment_type) {
        Ok(record) => record,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    println!();
    loop {
        let Some(sizing_value) = prompt_sizing(
            &record.sizing_quantity,
            &record.units,
            record.s_lower,
            record.s_upper,
        ) else {
            return;
        };

        let request = EstimationRequest {
            method: method.clone(),
            plant_type: plant_type.clone(),
            equipment: equipment.clone(),
            equipment_type: equipment_type.clone(),
            sizing_value,
        };

        let (ready, reasons) = check_ready(&request);
        if !ready {
            for reason in reasons {
                println!("Error: {}", reason);
            }
            continue;
        }

        match compute(&request, catalog) {
            Ok(result) => {
                println!();
                if json_output {
                    match serde_json::to_string_pretty(&result) {
                        Ok(json) => println!("{}", json),
                        Err(e) => eprintln!("Failed to serialize result: {}", e),
                    }
                } else {
                    println!(
                        "Purchased equipment cost:  {}",
                        format_usd(result.purchased_equipment_cost)
                    );
                    if let Some(installed) = result.installed_equipment_cost() {
                        println!("Installed equipment cost:  {}", format_usd(installed));
                    }
                    if let Some(isbl) = result.isbl_cost() {
                        println!("ISBL cost:                 {}", format_usd(isbl));
                    }
                    if let Some(total) = result.total_fixed_capital_cost() {
                        println!("Total fixed capital cost:  {}", format_usd(total));
                    }
                }
                return;
            }
            // Host-side retry: a sizing value outside the correlation's
            // range just re-prompts
            Err(EstimateError::OutOfRange { lower, upper, .. }) => {
                println!(
                    "Error: the input value must be between {} and {}. Please try again.",
                    lower, upper
                );
            }
            Err(e) => {
                eprintln!("Calculation error: {}", e);
                std::process::exit(1);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_usd() {
        assert_eq!(format_usd(0.0), "$0.00");
        assert_eq!(format_usd(2990.536), "$2,990.54");
        assert_eq!(format_usd(1234567.891), "$1,234,567.89");
        assert_eq!(format_usd(-42.5), "-$42.50");
    }
}
