use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::models::{
    CreateProductRequest, LoginRequest, Product, RegisterRequest, UpdateProductRequest,
    PLACEHOLDER_IMAGE,
};

static PRODUCT_URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https?://.+").expect("valid product url pattern"));

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,}$").expect("valid email pattern")
});

const MIN_NAME_LEN: usize = 2;
const MIN_PASSWORD_LEN: usize = 6;
const MIN_TARGET_PRICE: f64 = 0.01;

// ==============================================================================
// Validation Errors
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Every field-level problem found in a submitted form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors {
    pub errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    fn into_result<T>(self, value: impl FnOnce() -> T) -> Result<T, ValidationErrors> {
        if self.is_empty() {
            Ok(value())
        } else {
            Err(self)
        }
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

fn check_name(errors: &mut ValidationErrors, field: &'static str, name: &str) {
    let name = name.trim();
    if name.is_empty() {
        errors.push(field, "name is required");
    } else if name.chars().count() < MIN_NAME_LEN {
        errors.push(field, format!("must be at least {} characters", MIN_NAME_LEN));
    }
}

fn check_prices(errors: &mut ValidationErrors, current_price: Option<f64>, target_price: f64) {
    if let Some(current) = current_price {
        if !current.is_finite() || current < 0.0 {
            errors.push("current_price", "price must be a non-negative number");
        }
    }
    if !target_price.is_finite() || target_price < MIN_TARGET_PRICE {
        errors.push("target_price", "target price must be greater than 0");
    }
}

fn check_email(errors: &mut ValidationErrors, email: &str) {
    if email.trim().is_empty() {
        errors.push("email", "email is required");
    } else if !EMAIL_RE.is_match(email.trim()) {
        errors.push("email", "invalid email address");
    }
}

fn check_password(errors: &mut ValidationErrors, password: &str) {
    if password.is_empty() {
        errors.push("password", "password is required");
    } else if password.chars().count() < MIN_PASSWORD_LEN {
        errors.push(
            "password",
            format!("must be at least {} characters", MIN_PASSWORD_LEN),
        );
    }
}

/// Standalone email check, used by the password reset flow.
pub fn validate_email(email: &str) -> Result<String, ValidationErrors> {
    let mut errors = ValidationErrors::default();
    check_email(&mut errors, email);
    errors.into_result(|| email.trim().to_string())
}

// ==============================================================================
// Product Forms
// ==============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductForm {
    pub url: String,
    pub name: String,
    pub current_price: Option<f64>,
    pub target_price: f64,
    pub image: Option<String>,
}

impl ProductForm {
    pub fn validate(self) -> Result<CreateProductRequest, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let url = self.url.trim().to_string();
        if url.is_empty() {
            errors.push("url", "URL is required");
        } else if !PRODUCT_URL_RE.is_match(&url) {
            errors.push("url", "invalid URL");
        }
        check_name(&mut errors, "name", &self.name);
        check_prices(&mut errors, self.current_price, self.target_price);

        errors.into_result(|| CreateProductRequest {
            name: self.name.trim().to_string(),
            url,
            current_price: self.current_price.unwrap_or(0.0),
            target_price: self.target_price,
            image: self
                .image
                .filter(|i| !i.trim().is_empty())
                .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string()),
        })
    }
}

/// Edit form. The URL is not part of it: a product's URL is fixed at creation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductEditForm {
    pub name: Option<String>,
    pub current_price: Option<f64>,
    pub target_price: Option<f64>,
    pub image: Option<String>,
}

impl ProductEditForm {
    /// Fill unspecified fields from `existing`, then validate.
    pub fn validate_against(
        self,
        existing: &Product,
    ) -> Result<UpdateProductRequest, ValidationErrors> {
        let name = self.name.unwrap_or_else(|| existing.name.clone());
        let current_price = self.current_price.unwrap_or(existing.current_price);
        let target_price = self.target_price.unwrap_or(existing.target_price);

        let mut errors = ValidationErrors::default();
        check_name(&mut errors, "name", &name);
        check_prices(&mut errors, Some(current_price), target_price);

        errors.into_result(|| UpdateProductRequest {
            name: name.trim().to_string(),
            current_price,
            target_price,
            image: self
                .image
                .filter(|i| !i.trim().is_empty())
                .unwrap_or_else(|| existing.image.clone()),
        })
    }
}

// ==============================================================================
// Auth Forms
// ==============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(self) -> Result<LoginRequest, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        check_email(&mut errors, &self.email);
        check_password(&mut errors, &self.password);

        errors.into_result(|| LoginRequest {
            email: self.email.trim().to_string(),
            password: self.password,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegisterForm {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub accept_terms: bool,
}

impl RegisterForm {
    pub fn validate(self) -> Result<RegisterRequest, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        check_name(&mut errors, "full_name", &self.full_name);
        check_email(&mut errors, &self.email);
        check_password(&mut errors, &self.password);
        if self.confirm_password != self.password {
            errors.push("confirm_password", "passwords do not match");
        }
        if !self.accept_terms {
            errors.push("accept_terms", "you must accept the terms of service");
        }

        errors.into_result(|| RegisterRequest {
            email: self.email.trim().to_string(),
            password: self.password,
            full_name: Some(self.full_name.trim().to_string()),
        })
    }
}
