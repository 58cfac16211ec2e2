//! Venues service

use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{
        venue::{CreateVenue, UpdateVenue},
        Venue, VenueKind,
    },
    repository::{Collection, Repository},
    scheduling::CascadeReport,
};

#[derive(Clone)]
pub struct VenuesService {
    repository: Repository,
}

impl VenuesService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// List venues, optionally of one kind and only active ones
    pub async fn list(&self, kind: Option<VenueKind>, active_only: bool) -> AppResult<Vec<Venue>> {
        self.repository
            .read(|s| {
                Ok(s.venues()
                    .iter()
                    .filter(|v| kind.map_or(true, |k| v.kind == k))
                    .filter(|v| !active_only || v.is_active)
                    .cloned()
                    .collect())
            })
            .await
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Venue> {
        self.repository.read(|s| s.venue(id).cloned()).await
    }

    pub async fn create(&self, data: CreateVenue) -> AppResult<Venue> {
        let now = self.repository.now();
        self.repository
            .write(&[Collection::Venues], |s| Ok(s.add_venue(data, now)))
            .await
    }

    pub async fn update(&self, id: Uuid, data: UpdateVenue) -> AppResult<Venue> {
        self.repository
            .write(&[Collection::Venues], |s| s.update_venue(id, data))
            .await
    }

    /// Delete a venue with its slots, bookings and calendar overrides
    pub async fn delete(&self, id: Uuid) -> AppResult<CascadeReport> {
        self.repository
            .write(
                &[
                    Collection::Venues,
                    Collection::Slots,
                    Collection::Bookings,
                    Collection::Calendar,
                ],
                |s| s.delete_venue(id),
            )
            .await
    }
}
