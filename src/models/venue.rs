//! Venue model (cricket centers, theaters) and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use super::enums::VenueKind;

/// A bookable physical location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Venue {
    pub id: Uuid,
    pub kind: VenueKind,
    pub name: String,
    pub location: String,
    /// Maximum people per slot
    pub capacity: i32,
    /// Number of courts (centers) or screens (theaters)
    pub units: i32,
    pub amenities: Vec<String>,
    pub is_active: bool,
    pub description: Option<String>,
    pub contact_number: Option<String>,
    pub address: Option<String>,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Create venue request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateVenue {
    #[serde(default)]
    pub kind: VenueKind,
    #[validate(length(min = 1, max = 200, message = "Name is required"))]
    pub name: String,
    #[validate(length(min = 1, max = 200, message = "Location is required"))]
    pub location: String,
    #[validate(range(min = 1, message = "Capacity must be positive"))]
    pub capacity: i32,
    #[validate(range(min = 1, message = "Unit count must be positive"))]
    pub units: i32,
    #[serde(default)]
    pub amenities: Vec<String>,
    pub is_active: Option<bool>,
    pub description: Option<String>,
    pub contact_number: Option<String>,
    pub address: Option<String>,
    pub image_url: Option<String>,
}

/// Update venue request
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateVenue {
    #[validate(length(min = 1, max = 200, message = "Name cannot be empty"))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 200, message = "Location cannot be empty"))]
    pub location: Option<String>,
    #[validate(range(min = 1, message = "Capacity must be positive"))]
    pub capacity: Option<i32>,
    #[validate(range(min = 1, message = "Unit count must be positive"))]
    pub units: Option<i32>,
    pub amenities: Option<Vec<String>>,
    pub is_active: Option<bool>,
    pub description: Option<String>,
    pub contact_number: Option<String>,
    pub address: Option<String>,
    pub image_url: Option<String>,
}

/// Query parameters for venue listing
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct VenueQuery {
    pub kind: Option<VenueKind>,
    /// Hide deactivated venues
    #[serde(default)]
    pub active_only: bool,
}

impl Venue {
    pub fn from_request(data: CreateVenue, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: data.kind,
            name: data.name,
            location: data.location,
            capacity: data.capacity,
            units: data.units,
            amenities: data.amenities,
            is_active: data.is_active.unwrap_or(true),
            description: data.description,
            contact_number: data.contact_number,
            address: data.address,
            image_url: data.image_url,
            created_at: now,
        }
    }

    /// Apply a partial update in place
    pub fn apply(&mut self, data: UpdateVenue) {
        if let Some(name) = data.name {
            self.name = name;
        }
        if let Some(location) = data.location {
            self.location = location;
        }
        if let Some(capacity) = data.capacity {
            self.capacity = capacity;
        }
        if let Some(units) = data.units {
            self.units = units;
        }
        if let Some(amenities) = data.amenities {
            self.amenities = amenities;
        }
        if let Some(is_active) = data.is_active {
            self.is_active = is_active;
        }
        if data.description.is_some() {
            self.description = data.description;
        }
        if data.contact_number.is_some() {
            self.contact_number = data.contact_number;
        }
        if data.address.is_some() {
            self.address = data.address;
        }
        if data.image_url.is_some() {
            self.image_url = data.image_url;
        }
    }
}
