//! Form validation for vehicles and maintenance logs.
//!
//! Pure functions: every violated rule is collected in the order checked,
//! and a `Valid` result carries the parsed, trimmed input so handlers never
//! touch raw form strings again.

use rust_decimal::Decimal;
use serde::Serialize;
use time::{format_description::BorrowedFormatItem, macros::format_description, Date, OffsetDateTime};

pub const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

const MIN_YEAR: i32 = 1900;
const MAX_NAME_LEN: usize = 100;
const MAX_PLATE_LEN: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

#[derive(Debug)]
pub enum Validation<T> {
    Valid(T),
    Invalid(Vec<FieldError>),
}

/// Vehicle fields after validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VehicleInput {
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub plate_number: String,
}

/// Maintenance fields after validation. Description is free text and is not
/// validated here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaintenanceInput {
    pub maintenance_type: String,
    pub maintenance_date: Date,
    pub cost: Option<Decimal>,
}

pub fn validate_vehicle(brand: &str, model: &str, year: &str, plate: &str) -> Validation<VehicleInput> {
    let mut errors = Vec::new();

    let brand = brand.trim();
    if brand.is_empty() {
        errors.push(FieldError::new("brand", "Brand is required."));
    } else if brand.chars().count() > MAX_NAME_LEN {
        errors.push(FieldError::new("brand", "Brand must be 100 characters or fewer."));
    }

    let model = model.trim();
    if model.is_empty() {
        errors.push(FieldError::new("model", "Model is required."));
    } else if model.chars().count() > MAX_NAME_LEN {
        errors.push(FieldError::new("model", "Model must be 100 characters or fewer."));
    }

    let max_year = OffsetDateTime::now_utc().year() + 1;
    let parsed_year = match year.trim().parse::<i32>() {
        Ok(value) if (MIN_YEAR..=max_year).contains(&value) => Some(value),
        Ok(_) => {
            errors.push(FieldError::new(
                "year",
                format!("Year must be between {MIN_YEAR} and {max_year}."),
            ));
            None
        }
        Err(_) => {
            errors.push(FieldError::new("year", "Year must be a valid number."));
            None
        }
    };

    let plate = plate.trim();
    if plate.is_empty() {
        errors.push(FieldError::new("plate", "Plate number is required."));
    } else if plate.chars().count() > MAX_PLATE_LEN {
        errors.push(FieldError::new(
            "plate",
            "Plate number must be 50 characters or fewer.",
        ));
    }

    if !errors.is_empty() {
        return Validation::Invalid(errors);
    }
    let Some(year) = parsed_year else {
        return Validation::Invalid(errors);
    };
    Validation::Valid(VehicleInput {
        brand: brand.to_string(),
        model: model.to_string(),
        year,
        plate_number: plate.to_string(),
    })
}

pub fn validate_maintenance(
    maintenance_type: &str,
    date: &str,
    cost: Option<&str>,
) -> Validation<MaintenanceInput> {
    let mut errors = Vec::new();

    let maintenance_type = maintenance_type.trim();
    if maintenance_type.is_empty() {
        errors.push(FieldError::new("maintenance_type", "Maintenance type is required."));
    } else if maintenance_type.chars().count() > MAX_NAME_LEN {
        errors.push(FieldError::new(
            "maintenance_type",
            "Maintenance type must be 100 characters or fewer.",
        ));
    }

    let date = date.trim();
    let parsed_date = if date.is_empty() {
        errors.push(FieldError::new("maintenance_date", "Maintenance date is required."));
        None
    } else {
        match Date::parse(date, &DATE_FORMAT) {
            Ok(value) if value > OffsetDateTime::now_utc().date() => {
                errors.push(FieldError::new(
                    "maintenance_date",
                    "Maintenance date cannot be in the future.",
                ));
                None
            }
            Ok(value) => Some(value),
            Err(_) => {
                errors.push(FieldError::new(
                    "maintenance_date",
                    "Maintenance date must be a valid date.",
                ));
                None
            }
        }
    };

    let cost = match cost.map(str::trim).filter(|raw| !raw.is_empty()) {
        None => None,
        Some(raw) => match raw.parse::<Decimal>() {
            Ok(value) if value < Decimal::ZERO => {
                errors.push(FieldError::new("cost", "Cost cannot be negative."));
                None
            }
            Ok(value) if value > max_cost() => {
                errors.push(FieldError::new("cost", "Cost cannot exceed 999999.99."));
                None
            }
            Ok(value) => Some(value),
            Err(_) => {
                errors.push(FieldError::new("cost", "Cost must be a valid number."));
                None
            }
        },
    };

    if !errors.is_empty() {
        return Validation::Invalid(errors);
    }
    let Some(maintenance_date) = parsed_date else {
        return Validation::Invalid(errors);
    };
    Validation::Valid(MaintenanceInput {
        maintenance_type: maintenance_type.to_string(),
        maintenance_date,
        cost,
    })
}

fn max_cost() -> Decimal {
    Decimal::new(99_999_999, 2)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn messages<T>(result: Validation<T>) -> Vec<String> {
        match result {
            Validation::Valid(_) => Vec::new(),
            Validation::Invalid(errors) => errors.into_iter().map(|e| e.message).collect(),
        }
    }

    #[test]
    fn collects_all_violations_in_checked_order() {
        let result = validate_vehicle("", "X", "abc", "P");
        assert_eq!(
            messages(result),
            vec!["Brand is required.", "Year must be a valid number."]
        );
    }

    #[test]
    fn accepts_a_reasonable_vehicle_and_trims_fields() {
        match validate_vehicle(" Toyota ", "Corolla", " 2020 ", " ABC123 ") {
            Validation::Valid(input) => {
                assert_eq!(input.brand, "Toyota");
                assert_eq!(input.model, "Corolla");
                assert_eq!(input.year, 2020);
                assert_eq!(input.plate_number, "ABC123");
            }
            Validation::Invalid(errors) => panic!("unexpected errors: {errors:?}"),
        }
    }

    #[test]
    fn rejects_years_outside_the_allowed_range() {
        let max_year = OffsetDateTime::now_utc().year() + 1;
        let result = validate_vehicle("Toyota", "Corolla", "1899", "ABC123");
        assert_eq!(
            messages(result),
            vec![format!("Year must be between 1900 and {max_year}.")]
        );

        let too_new = (max_year + 1).to_string();
        assert!(matches!(
            validate_vehicle("Toyota", "Corolla", &too_new, "ABC123"),
            Validation::Invalid(_)
        ));
        let newest = max_year.to_string();
        assert!(matches!(
            validate_vehicle("Toyota", "Corolla", &newest, "ABC123"),
            Validation::Valid(_)
        ));
    }

    #[test]
    fn rejects_overlong_fields() {
        let long = "x".repeat(101);
        let result = validate_vehicle(&long, &long, "2020", &"p".repeat(51));
        assert_eq!(
            messages(result),
            vec![
                "Brand must be 100 characters or fewer.",
                "Model must be 100 characters or fewer.",
                "Plate number must be 50 characters or fewer.",
            ]
        );
    }

    #[test]
    fn whitespace_only_plate_is_missing() {
        let result = validate_vehicle("Toyota", "Corolla", "2020", "   ");
        assert_eq!(messages(result), vec!["Plate number is required."]);
    }

    #[test]
    fn maintenance_dated_today_is_accepted() {
        let today = OffsetDateTime::now_utc()
            .date()
            .format(&DATE_FORMAT)
            .expect("format today");
        match validate_maintenance("Oil change", &today, Some("49.99")) {
            Validation::Valid(input) => {
                assert_eq!(input.maintenance_type, "Oil change");
                assert_eq!(input.cost, Some(Decimal::new(4999, 2)));
            }
            Validation::Invalid(errors) => panic!("unexpected errors: {errors:?}"),
        }
    }

    #[test]
    fn maintenance_dated_tomorrow_is_rejected() {
        let tomorrow = OffsetDateTime::now_utc()
            .date()
            .next_day()
            .expect("tomorrow exists")
            .format(&DATE_FORMAT)
            .expect("format tomorrow");
        let result = validate_maintenance("Oil change", &tomorrow, None);
        assert_eq!(messages(result), vec!["Maintenance date cannot be in the future."]);
    }

    #[test]
    fn garbage_date_and_cost_each_get_a_distinct_error() {
        let result = validate_maintenance("Oil change", "not-a-date", Some("lots"));
        assert_eq!(
            messages(result),
            vec![
                "Maintenance date must be a valid date.",
                "Cost must be a valid number.",
            ]
        );
    }

    #[test]
    fn missing_date_and_type_are_both_reported() {
        let result = validate_maintenance(" ", "", None);
        assert_eq!(
            messages(result),
            vec!["Maintenance type is required.", "Maintenance date is required."]
        );
    }

    #[test]
    fn cost_bounds_are_enforced() {
        let result = validate_maintenance("Brakes", "2020-01-01", Some("-1"));
        assert_eq!(messages(result), vec!["Cost cannot be negative."]);

        let result = validate_maintenance("Brakes", "2020-01-01", Some("1000000"));
        assert_eq!(messages(result), vec!["Cost cannot exceed 999999.99."]);

        assert!(matches!(
            validate_maintenance("Brakes", "2020-01-01", Some("999999.99")),
            Validation::Valid(_)
        ));
    }

    #[test]
    fn empty_cost_means_no_cost() {
        match validate_maintenance("Brakes", "2020-01-01", Some("  ")) {
            Validation::Valid(input) => assert_eq!(input.cost, None),
            Validation::Invalid(errors) => panic!("unexpected errors: {errors:?}"),
        }
    }
}
