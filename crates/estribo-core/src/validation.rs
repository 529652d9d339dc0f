//! # Validation Module
//!
//! Input validation for everything written to the record store.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: CLI argument parsing (clap)                                  │
//! │  ├── Type checks (is it a number?)                                     │
//! │  └── Immediate operator feedback                                       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Repository writes (estribo-db)                               │
//! │  └── THIS MODULE: business rule validation                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / CHECK constraints                                      │
//! │  ├── UNIQUE (item, supplier) weights                                   │
//! │  └── Foreign key constraints                                           │
//! │                                                                         │
//! │  The engine never validates: it is total over whatever it is given.   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use estribo_core::validation::{validate_price_per_kg, validate_weight};
//!
//! assert!(validate_price_per_kg(2500.0).is_ok());
//! assert!(validate_weight(0.0).is_ok());
//! assert!(validate_price_per_kg(0.0).is_err());
//! ```

use crate::error::ValidationError;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest accepted supplier name.
pub const MAX_SUPPLIER_NAME_LEN: usize = 100;

/// Longest accepted size label.
pub const MAX_SIZE_LABEL_LEN: usize = 50;

/// Highest accepted profit margin, in percent.
pub const MAX_MARGIN_PCT: f64 = 1000.0;

/// Highest accepted output tax rate, in percent.
pub const MAX_TAX_PCT: f64 = 100.0;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a supplier name.
///
/// ## Rules
/// - Must not be empty after trimming
/// - At most [`MAX_SUPPLIER_NAME_LEN`] characters
pub fn validate_supplier_name(name: &str) -> ValidationResult<()> {
    validate_label("name", name, MAX_SUPPLIER_NAME_LEN)
}

/// Validates an item size label such as `"4.2mm 10x10"`.
pub fn validate_size_label(label: &str) -> ValidationResult<()> {
    validate_label("size_label", label, MAX_SIZE_LABEL_LEN)
}

fn validate_label(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a supplier's price per kilogram.
///
/// ## Rules
/// - Finite
/// - Strictly positive
pub fn validate_price_per_kg(price: f64) -> ValidationResult<()> {
    require_finite("price_per_kg", price)?;

    if price <= 0.0 {
        return Err(ValidationError::MustBePositive {
            field: "price_per_kg".to_string(),
        });
    }

    Ok(())
}

/// Validates an item's weight per unit, in kilograms.
///
/// Zero is allowed: it is what a missing weight means anyway.
pub fn validate_weight(weight_kg: f64) -> ValidationResult<()> {
    require_finite("weight_kg", weight_kg)?;
    require_range("weight_kg", weight_kg, 0.0, f64::MAX)
}

/// Validates a profit margin percentage (0 to [`MAX_MARGIN_PCT`]).
pub fn validate_margin_pct(margin_pct: f64) -> ValidationResult<()> {
    require_finite("margin_pct", margin_pct)?;
    require_range("margin_pct", margin_pct, 0.0, MAX_MARGIN_PCT)
}

/// Validates an output tax percentage (0 to [`MAX_TAX_PCT`]).
pub fn validate_tax_pct(tax_pct: f64) -> ValidationResult<()> {
    require_finite("tax_pct", tax_pct)?;
    require_range("tax_pct", tax_pct, 0.0, MAX_TAX_PCT)
}

/// Validates a fixed unit price.
///
/// Zero is allowed and switches fixed-price mode off for the item.
pub fn validate_unit_price(price: f64) -> ValidationResult<()> {
    require_finite("unit_price", price)?;
    require_range("unit_price", price, 0.0, f64::MAX)
}

fn require_finite(field: &str, value: f64) -> ValidationResult<()> {
    if !value.is_finite() {
        return Err(ValidationError::NotFinite {
            field: field.to_string(),
        });
    }
    Ok(())
}

fn require_range(field: &str, value: f64, min: f64, max: f64) -> ValidationResult<()> {
    if value < min || value > max {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min,
            max,
        });
    }
    Ok(())
}

// =============================================================================
// UUID Validators
// =============================================================================

/// Validates a record identifier (UUID string).
///
/// ## Example
/// ```rust
/// use estribo_core::validation::validate_id;
///
/// assert!(validate_id("550e8400-e29b-41d4-a716-446655440000").is_ok());
/// assert!(validate_id("not-a-uuid").is_err());
/// ```
pub fn validate_id(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: "id".to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_supplier_name() {
        assert!(validate_supplier_name("Acindar").is_ok());
        assert!(validate_supplier_name("").is_err());
        assert!(validate_supplier_name("   ").is_err());
        assert!(validate_supplier_name(&"A".repeat(101)).is_err());
        assert!(validate_supplier_name(&"A".repeat(100)).is_ok());
    }

    #[test]
    fn test_validate_size_label() {
        assert!(validate_size_label("4.2mm 10x10").is_ok());
        assert!(matches!(
            validate_size_label(""),
            Err(ValidationError::Required { .. })
        ));
        assert!(matches!(
            validate_size_label(&"x".repeat(51)),
            Err(ValidationError::TooLong { max: 50, .. })
        ));
    }

    #[test]
    fn test_validate_price_per_kg() {
        assert!(validate_price_per_kg(2500.0).is_ok());
        assert!(validate_price_per_kg(0.01).is_ok());
        assert!(validate_price_per_kg(0.0).is_err());
        assert!(validate_price_per_kg(-1.0).is_err());
        assert!(matches!(
            validate_price_per_kg(f64::NAN),
            Err(ValidationError::NotFinite { .. })
        ));
    }

    #[test]
    fn test_validate_weight() {
        assert!(validate_weight(0.0).is_ok());
        assert!(validate_weight(0.035).is_ok());
        assert!(validate_weight(-0.001).is_err());
        assert!(validate_weight(f64::INFINITY).is_err());
    }

    #[test]
    fn test_validate_percentages() {
        assert!(validate_margin_pct(0.0).is_ok());
        assert!(validate_margin_pct(90.0).is_ok());
        assert!(validate_margin_pct(1000.0).is_ok());
        assert!(validate_margin_pct(1000.1).is_err());
        assert!(validate_margin_pct(-5.0).is_err());

        assert!(validate_tax_pct(0.0).is_ok());
        assert!(validate_tax_pct(21.0).is_ok());
        assert!(validate_tax_pct(100.0).is_ok());
        assert!(validate_tax_pct(100.5).is_err());
    }

    #[test]
    fn test_validate_unit_price() {
        assert!(validate_unit_price(0.0).is_ok());
        assert!(validate_unit_price(300.0).is_ok());
        assert!(validate_unit_price(-1.0).is_err());
    }

    #[test]
    fn test_validate_id() {
        assert!(validate_id("550e8400-e29b-41d4-a716-446655440000").is_ok());
        assert!(validate_id("").is_err());
        assert!(validate_id("123").is_err());
    }
}
