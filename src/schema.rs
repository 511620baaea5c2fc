//! Field registry for the accounts and listings entities.
//!
//! Each field is declared once with a fixed semantic type and its validation
//! bounds. Request validators and the listing query builder both read these
//! declarations, so a column is always bound and checked the same way.

use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{Category, ListingStatus},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    /// Short text, bounded by `max_chars`.
    Text,
    /// Unbounded text.
    LongText,
    Email,
    /// Plain-text secret; only ever hashed.
    Secret,
    Decimal,
    Uuid,
    Category,
    Status,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    /// Request field and column name.
    pub name: &'static str,
    pub ty: FieldType,
    pub required: bool,
    pub min_chars: usize,
    pub max_chars: Option<usize>,
}

impl Field {
    const fn new(name: &'static str, ty: FieldType) -> Self {
        Self {
            name,
            ty,
            required: false,
            min_chars: 0,
            max_chars: None,
        }
    }

    const fn required(mut self) -> Self {
        self.required = true;
        if self.min_chars == 0 {
            self.min_chars = 1;
        }
        self
    }

    const fn min(mut self, chars: usize) -> Self {
        self.min_chars = chars;
        self
    }

    const fn max(mut self, chars: usize) -> Self {
        self.max_chars = Some(chars);
        self
    }

    /// Checks a text value; `None` means the value passed.
    pub fn check_text(&self, value: Option<&str>) -> Option<String> {
        let value = value.map(str::trim).filter(|v| !v.is_empty());
        let Some(value) = value else {
            return self.required.then(|| format!("{} is required", self.name));
        };

        match self.ty {
            FieldType::Email if !is_email(value) => {
                Some(format!("{} must be a valid email address", self.name))
            }
            FieldType::Category if value.parse::<Category>().is_err() => Some(format!(
                "{} must be one of: {}",
                self.name,
                Category::ALL.map(|c| c.as_str()).join(", ")
            )),
            FieldType::Status if value.parse::<ListingStatus>().is_err() => Some(format!(
                "{} must be one of: {}",
                self.name,
                ListingStatus::ALL.map(|s| s.as_str()).join(", ")
            )),
            FieldType::Uuid if Uuid::parse_str(value).is_err() => {
                Some(format!("{} must be a valid id", self.name))
            }
            FieldType::Decimal if value.parse::<f64>().is_err() => {
                Some(format!("{} must be a number", self.name))
            }
            _ => self.check_length(value),
        }
    }

    pub fn check_number(&self, value: Option<f64>) -> Option<String> {
        match value {
            None => self.required.then(|| format!("{} is required", self.name)),
            Some(v) if !v.is_finite() || v < 0.0 => {
                Some(format!("{} must be a non-negative number", self.name))
            }
            Some(_) => None,
        }
    }

    fn check_length(&self, value: &str) -> Option<String> {
        let chars = value.chars().count();
        if chars < self.min_chars {
            return Some(format!(
                "{} must be at least {} characters",
                self.name, self.min_chars
            ));
        }
        match self.max_chars {
            Some(max) if chars > max => {
                Some(format!("{} must be at most {} characters", self.name, max))
            }
            _ => None,
        }
    }
}

/// `local@domain.tld`: no whitespace, exactly one `@`, a dot inside the domain.
pub fn is_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let mut parts = value.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };
    if local.is_empty() || domain.is_empty() {
        return false;
    }
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

pub mod account {
    use super::{Field, FieldType};

    pub const EMAIL: Field = Field::new("email", FieldType::Email).required().max(255);
    pub const PASSWORD: Field = Field::new("password", FieldType::Secret).required().min(6);
    pub const COMPANY_NAME: Field = Field::new("company_name", FieldType::Text)
        .required()
        .min(2)
        .max(255);
    pub const DESCRIPTION: Field = Field::new("description", FieldType::LongText);
    pub const LOCATION: Field = Field::new("location", FieldType::Text).max(255);
    pub const PHONE: Field = Field::new("phone", FieldType::Text).max(50);
    pub const WEBSITE: Field = Field::new("website", FieldType::Text).max(255);
}

pub mod listing {
    use super::{Field, FieldType};

    pub const OWNER_ID: Field = Field::new("owner_id", FieldType::Uuid);
    pub const TITLE: Field = Field::new("title", FieldType::Text).required().min(3).max(255);
    pub const DESCRIPTION: Field = Field::new("description", FieldType::LongText)
        .required()
        .min(10);
    pub const CATEGORY: Field = Field::new("category", FieldType::Category).required();
    pub const QUANTITY: Field = Field::new("quantity", FieldType::Text).required().max(50);
    pub const UNIT: Field = Field::new("unit", FieldType::Text).required().max(50);
    pub const LOCATION: Field = Field::new("location", FieldType::Text).max(255);
    pub const PRICE: Field = Field::new("price", FieldType::Decimal);
    pub const IMAGE_URL: Field = Field::new("image_url", FieldType::Text).max(500);
    pub const STATUS: Field = Field::new("status", FieldType::Status);
}

/// Whether an absent value fails a required field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// Create: required fields must be present.
    Enforce,
    /// Partial update: only present values are checked.
    IfPresent,
}

/// Collects per-field messages and fails once with all of them.
#[derive(Debug)]
pub struct Validator {
    presence: Presence,
    errors: Vec<String>,
}

impl Validator {
    pub fn new(presence: Presence) -> Self {
        Self {
            presence,
            errors: Vec::new(),
        }
    }

    pub fn text(&mut self, field: &Field, value: Option<&str>) -> &mut Self {
        if self.skips(value.is_none()) {
            return self;
        }
        if let Some(message) = field.check_text(value) {
            self.errors.push(message);
        }
        self
    }

    pub fn number(&mut self, field: &Field, value: Option<f64>) -> &mut Self {
        if self.skips(value.is_none()) {
            return self;
        }
        if let Some(message) = field.check_number(value) {
            self.errors.push(message);
        }
        self
    }

    /// Records `message` unless `holds`.
    pub fn rule(&mut self, holds: bool, message: impl Into<String>) -> &mut Self {
        if !holds {
            self.errors.push(message.into());
        }
        self
    }

    fn skips(&self, absent: bool) -> bool {
        absent && self.presence == Presence::IfPresent
    }

    pub fn finish(&mut self) -> AppResult<()> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(std::mem::take(&mut self.errors)))
        }
    }
}
