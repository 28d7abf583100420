//! Validation utilities for the Produce Trading Platform

use chrono::NaiveDate;
use rust_decimal::Decimal;

// ============================================================================
// Trade Data Validations
// ============================================================================

/// Validate that a price is strictly positive
pub fn validate_positive_price(price: Decimal) -> Result<(), &'static str> {
    if price <= Decimal::ZERO {
        return Err("Price must be greater than zero");
    }
    Ok(())
}

/// Validate a price validity window (open-ended end is allowed)
pub fn validate_validity_window(
    valid_from: NaiveDate,
    valid_until: Option<NaiveDate>,
) -> Result<(), &'static str> {
    if let Some(until) = valid_until {
        if until < valid_from {
            return Err("valid_until cannot be before valid_from");
        }
    }
    Ok(())
}

/// Validate hub code format (3-6 uppercase alphanumeric, like UN/LOCODE short forms)
pub fn validate_hub_code(code: &str) -> Result<(), &'static str> {
    if code.len() < 3 {
        return Err("Hub code must be at least 3 characters");
    }
    if code.len() > 6 {
        return Err("Hub code must be at most 6 characters");
    }
    if !code.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()) {
        return Err("Hub code must be uppercase alphanumeric only");
    }
    Ok(())
}

/// Validate weekly quantity for a customer need
pub fn validate_weekly_quantity(quantity: Decimal) -> Result<(), &'static str> {
    if quantity <= Decimal::ZERO {
        return Err("Weekly quantity must be greater than zero");
    }
    Ok(())
}

/// Validate transit days for a transport route
pub fn validate_transit_days(days: i32) -> Result<(), &'static str> {
    if days < 0 {
        return Err("Transit days cannot be negative");
    }
    if days > 60 {
        return Err("Transit days exceed the maximum route length");
    }
    Ok(())
}

// ============================================================================
// General Validations
// ============================================================================

/// Validate email format (basic check)
pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if email.contains('@') && email.contains('.') && email.len() >= 5 {
        Ok(())
    } else {
        Err("Invalid email format")
    }
}

/// Validate business code format (3-10 uppercase alphanumeric)
pub fn validate_business_code(code: &str) -> Result<(), &'static str> {
    if code.len() < 3 {
        return Err("Business code must be at least 3 characters");
    }
    if code.len() > 10 {
        return Err("Business code must be at most 10 characters");
    }
    if !code.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()) {
        return Err("Business code must be uppercase alphanumeric only");
    }
    Ok(())
}

/// Validate password strength
pub fn validate_password(password: &str) -> Result<(), &'static str> {
    if password.len() < 8 {
        return Err("Password must be at least 8 characters");
    }
    Ok(())
}

/// Validate an international phone number (loose E.164-style check)
pub fn validate_phone(phone: &str) -> Result<(), &'static str> {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() < 7 || digits.len() > 15 {
        return Err("Phone number must contain 7-15 digits");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    // ========================================================================
    // Trade Data Validation Tests
    // ========================================================================

    #[test]
    fn test_validate_positive_price() {
        assert!(validate_positive_price(dec("12.50")).is_ok());
        assert!(validate_positive_price(dec("0.01")).is_ok());
        assert!(validate_positive_price(Decimal::ZERO).is_err());
        assert!(validate_positive_price(dec("-3")).is_err());
    }

    #[test]
    fn test_validate_validity_window_ordered() {
        let from = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let until = NaiveDate::from_ymd_opt(2025, 3, 31).unwrap();
        assert!(validate_validity_window(from, Some(until)).is_ok());
    }

    #[test]
    fn test_validate_validity_window_open_ended() {
        let from = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        assert!(validate_validity_window(from, None).is_ok());
    }

    #[test]
    fn test_validate_validity_window_inverted() {
        let from = NaiveDate::from_ymd_opt(2025, 3, 31).unwrap();
        let until = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        assert!(validate_validity_window(from, Some(until)).is_err());
    }

    #[test]
    fn test_validate_hub_code_valid() {
        assert!(validate_hub_code("VAL").is_ok());
        assert!(validate_hub_code("ROTT01").is_ok());
        assert!(validate_hub_code("ALM").is_ok());
    }

    #[test]
    fn test_validate_hub_code_invalid() {
        assert!(validate_hub_code("VA").is_err()); // Too short
        assert!(validate_hub_code("VALENCIA").is_err()); // Too long
        assert!(validate_hub_code("val").is_err()); // Lowercase
        assert!(validate_hub_code("VA-L").is_err()); // Special char
    }

    #[test]
    fn test_validate_weekly_quantity() {
        assert!(validate_weekly_quantity(dec("500")).is_ok());
        assert!(validate_weekly_quantity(Decimal::ZERO).is_err());
        assert!(validate_weekly_quantity(dec("-10")).is_err());
    }

    #[test]
    fn test_validate_transit_days() {
        assert!(validate_transit_days(0).is_ok());
        assert!(validate_transit_days(4).is_ok());
        assert!(validate_transit_days(60).is_ok());
        assert!(validate_transit_days(-1).is_err());
        assert!(validate_transit_days(61).is_err());
    }

    // ========================================================================
    // General Validation Tests
    // ========================================================================

    #[test]
    fn test_validate_email_valid() {
        assert!(validate_email("test@example.com").is_ok());
        assert!(validate_email("trader@brokerage.co.uk").is_ok());
    }

    #[test]
    fn test_validate_email_invalid() {
        assert!(validate_email("invalid").is_err());
        assert!(validate_email("no@domain").is_err());
        assert!(validate_email("@.").is_err());
    }

    #[test]
    fn test_validate_business_code_valid() {
        assert!(validate_business_code("PTP").is_ok());
        assert!(validate_business_code("FRESH1").is_ok());
        assert!(validate_business_code("ABCDEFGHIJ").is_ok());
    }

    #[test]
    fn test_validate_business_code_invalid() {
        assert!(validate_business_code("AB").is_err()); // Too short
        assert!(validate_business_code("ABCDEFGHIJK").is_err()); // Too long
        assert!(validate_business_code("abc").is_err()); // Lowercase
        assert!(validate_business_code("AB-C").is_err()); // Special char
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("password123").is_ok());
        assert!(validate_password("12345678").is_ok());
        assert!(validate_password("short").is_err());
    }

    #[test]
    fn test_validate_phone() {
        assert!(validate_phone("+34612345678").is_ok());
        assert!(validate_phone("0031 6 1234 5678").is_ok());
        assert!(validate_phone("12345").is_err());
        assert!(validate_phone("1234567890123456").is_err());
    }
}
