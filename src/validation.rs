//! Input validation for request payloads.
//!
//! Mirrors the column limits of the initial migration so bad input is
//! rejected with a 400 before it reaches the database.

use thiserror::Error;

use crate::models::{
    CreateEmployeeRequest, CreateMaterialRequest, CreateSheetRequest, LoginRequest, NameInput,
    RegisterSupplierRequest, ReviewRequest, SiteInput, SubmitOfferRequest, UpdateMaterialRequest,
    UpdateOfferRequest,
};

#[derive(Debug, Error, PartialEq)]
#[error("{field}: {reason}")]
pub struct ValidationError {
    pub field: &'static str,
    pub reason: String,
}

impl ValidationError {
    pub fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError>;
}

pub const MIN_PASSWORD_LEN: usize = 8;
pub const MAX_DELIVERY_DAYS: i32 = 365;
/// Extensions accepted by the Excel exchange.
pub const SHEET_EXTENSIONS: [&str; 3] = ["xlsx", "xls", "csv"];

fn required(field: &'static str, value: &str, max: usize) -> Result<(), ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::new(field, "must not be empty"));
    }
    if trimmed.chars().count() > max {
        return Err(ValidationError::new(field, format!("must be at most {max} characters")));
    }
    Ok(())
}

fn optional(field: &'static str, value: &Option<String>, max: usize) -> Result<(), ValidationError> {
    match value {
        Some(v) if v.chars().count() > max => {
            Err(ValidationError::new(field, format!("must be at most {max} characters")))
        }
        _ => Ok(()),
    }
}

fn email(value: &str) -> Result<(), ValidationError> {
    required("email", value, 254)?;
    let (local, domain) = value
        .split_once('@')
        .ok_or_else(|| ValidationError::new("email", "must contain '@'"))?;
    if local.is_empty() || !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
        return Err(ValidationError::new("email", "is not a valid address"));
    }
    Ok(())
}

fn password(value: &str) -> Result<(), ValidationError> {
    if value.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::new(
            "password",
            format!("must be at least {MIN_PASSWORD_LEN} characters"),
        ));
    }
    Ok(())
}

fn quantity(value: i32) -> Result<(), ValidationError> {
    if value <= 0 {
        return Err(ValidationError::new("quantity", "must be greater than zero"));
    }
    Ok(())
}

fn price(value: i64) -> Result<(), ValidationError> {
    if value <= 0 {
        return Err(ValidationError::new("unit_price_cents", "must be greater than zero"));
    }
    Ok(())
}

fn delivery_days(value: i32) -> Result<(), ValidationError> {
    if !(0..=MAX_DELIVERY_DAYS).contains(&value) {
        return Err(ValidationError::new(
            "delivery_days",
            format!("must be between 0 and {MAX_DELIVERY_DAYS}"),
        ));
    }
    Ok(())
}

/// Returns the lower-cased extension of an accepted spreadsheet file name.
pub fn sheet_extension(file_name: &str) -> Result<String, ValidationError> {
    let ext = std::path::Path::new(file_name)
        .extension()
        .and_then(std::ffi::OsStr::to_str)
        .map(str::to_ascii_lowercase)
        .ok_or_else(|| ValidationError::new("file_name", "must have an extension"))?;
    if !SHEET_EXTENSIONS.contains(&ext.as_str()) {
        return Err(ValidationError::new(
            "file_name",
            format!("must be one of {}", SHEET_EXTENSIONS.join(", ")),
        ));
    }
    Ok(ext)
}

impl Validate for LoginRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        required("email", &self.email, 254)?;
        required("password", &self.password, 256)
    }
}

impl Validate for RegisterSupplierRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        email(&self.email)?;
        password(&self.password)?;
        required("company_name", &self.company_name, 150)?;
        required("tax_number", &self.tax_number, 30)?;
        optional("phone", &self.phone, 30)?;
        optional("address", &self.address, 250)
    }
}

impl Validate for CreateEmployeeRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        email(&self.email)?;
        password(&self.password)?;
        required("full_name", &self.full_name, 100)?;
        optional("phone", &self.phone, 30)
    }
}

impl Validate for CreateMaterialRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        required("title", &self.title, 150)?;
        required("description", &self.description, 2000)?;
        quantity(self.quantity)?;
        required("unit", &self.unit, 20)
    }
}

impl Validate for UpdateMaterialRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        if let Some(title) = &self.title {
            required("title", title, 150)?;
        }
        if let Some(description) = &self.description {
            required("description", description, 2000)?;
        }
        if let Some(q) = self.quantity {
            quantity(q)?;
        }
        if let Some(unit) = &self.unit {
            required("unit", unit, 20)?;
        }
        Ok(())
    }
}

impl Validate for SubmitOfferRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        price(self.unit_price_cents)?;
        delivery_days(self.delivery_days)?;
        optional("note", &self.note, 1000)
    }
}

impl Validate for UpdateOfferRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        if let Some(p) = self.unit_price_cents {
            price(p)?;
        }
        if let Some(d) = self.delivery_days {
            delivery_days(d)?;
        }
        optional("note", &self.note, 1000)
    }
}

impl Validate for ReviewRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        optional("note", &self.note, 1000)
    }
}

impl Validate for SiteInput {
    fn validate(&self) -> Result<(), ValidationError> {
        required("name", &self.name, 100)?;
        required("address", &self.address, 250)
    }
}

impl Validate for NameInput {
    fn validate(&self) -> Result<(), ValidationError> {
        required("name", &self.name, 100)
    }
}

impl Validate for CreateSheetRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        required("file_name", &self.file_name, 200)?;
        sheet_extension(&self.file_name).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn material(quantity: i32) -> CreateMaterialRequest {
        CreateMaterialRequest {
            title: "Rebar 12mm".to_string(),
            description: "For the east wing slab".to_string(),
            quantity,
            unit: "t".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn rejects_non_positive_quantity() {
        assert_eq!(material(0).validate().unwrap_err().field, "quantity");
        assert_eq!(material(-4).validate().unwrap_err().field, "quantity");
        assert!(material(1).validate().is_ok());
    }

    #[test]
    fn enforces_length_limits() {
        let mut req = material(3);
        req.title = "x".repeat(151);
        assert_eq!(req.validate().unwrap_err().field, "title");
        req.title = "   ".to_string();
        assert_eq!(req.validate().unwrap_err().reason, "must not be empty");
    }

    #[test]
    fn email_shape() {
        assert!(email("buyer@site.example").is_ok());
        assert!(email("buyer.example").is_err());
        assert!(email("@site.example").is_err());
        assert!(email("buyer@localhost").is_err());
    }

    #[test]
    fn sheet_extensions() {
        assert_eq!(sheet_extension("Offers.XLSX").unwrap(), "xlsx");
        assert!(sheet_extension("offers.csv").is_ok());
        assert!(sheet_extension("payload.exe").is_err());
        assert!(sheet_extension("noext").is_err());
    }

    #[test]
    fn offer_bounds() {
        let ok = SubmitOfferRequest {
            unit_price_cents: 1250,
            delivery_days: 7,
            note: None,
        };
        assert!(ok.validate().is_ok());
        let free = SubmitOfferRequest {
            unit_price_cents: 0,
            ..ok.clone()
        };
        assert_eq!(free.validate().unwrap_err().field, "unit_price_cents");
        let slow = SubmitOfferRequest {
            delivery_days: 400,
            ..ok
        };
        assert_eq!(slow.validate().unwrap_err().field, "delivery_days");
    }
}
