//! Delivery Address

use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Required address fields, in the order they are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressField {
    /// Street and house number
    Street,
    /// City
    City,
    /// State
    State,
    /// Postal code
    Zip,
    /// Contact phone number
    Phone,
}

impl AddressField {
    /// All required fields.
    pub const REQUIRED: [AddressField; 5] = [
        AddressField::Street,
        AddressField::City,
        AddressField::State,
        AddressField::Zip,
        AddressField::Phone,
    ];

    /// Form label for the field.
    pub fn label(self) -> &'static str {
        match self {
            AddressField::Street => "street",
            AddressField::City => "city",
            AddressField::State => "state",
            AddressField::Zip => "zip code",
            AddressField::Phone => "phone number",
        }
    }
}

impl Display for AddressField {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.label())
    }
}

/// Address validation errors.
#[derive(Debug, Error, PartialEq)]
pub enum AddressError {
    /// A required field is empty.
    #[error("please enter your {0}")]
    MissingField(AddressField),
}

/// Where an order should be delivered.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeliveryAddress {
    /// Street and house number
    pub street: String,

    /// City
    pub city: String,

    /// State
    pub state: String,

    /// Postal code
    pub zip: String,

    /// Contact phone number
    pub phone: String,

    /// Nearby landmark
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub landmark: Option<String>,

    /// Second phone number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alternate_phone: Option<String>,
}

impl DeliveryAddress {
    /// Value of a required field.
    pub fn field(&self, field: AddressField) -> &str {
        match field {
            AddressField::Street => &self.street,
            AddressField::City => &self.city,
            AddressField::State => &self.state,
            AddressField::Zip => &self.zip,
            AddressField::Phone => &self.phone,
        }
    }

    /// Check that every required field has a value.
    ///
    /// # Errors
    ///
    /// Returns [`AddressError::MissingField`] naming the first blank field.
    pub fn validate(&self) -> Result<(), AddressError> {
        AddressField::REQUIRED
            .into_iter()
            .find(|&field| self.field(field).trim().is_empty())
            .map_or(Ok(()), |field| Err(AddressError::MissingField(field)))
    }

    /// Single-line form stored on the order.
    pub fn delivery_line(&self) -> String {
        let mut line = format!(
            "{}, {}, {} - {}",
            self.street.trim(),
            self.city.trim(),
            self.state.trim(),
            self.zip.trim()
        );

        if let Some(landmark) = non_blank(self.landmark.as_deref()) {
            line.push_str(&format!(" (Landmark: {landmark})"));
        }

        line.push_str(&format!(" | Phone: {}", self.phone.trim()));

        if let Some(alternate) = non_blank(self.alternate_phone.as_deref()) {
            line.push_str(&format!(", Alt: {alternate}"));
        }

        line
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
