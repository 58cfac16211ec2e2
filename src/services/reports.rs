//! Reports service: dashboards and analytics

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::Booking,
    repository::Repository,
    scheduling::{
        reports::{self, AnalyticsSummary, PeriodUtilization, VenueOverview},
        TimeBucket,
    },
};

/// Paid bookings of a venue with their sum
#[derive(Debug, Serialize, ToSchema)]
pub struct PaymentHistory {
    pub venue_id: Uuid,
    pub bookings: Vec<Booking>,
    #[schema(value_type = String)]
    pub total: Decimal,
}

/// Bookings of a venue for today with their sum
#[derive(Debug, Serialize, ToSchema)]
pub struct TodaysBookings {
    pub venue_id: Uuid,
    pub date: NaiveDate,
    pub bookings: Vec<Booking>,
    #[schema(value_type = String)]
    pub revenue: Decimal,
}

#[derive(Clone)]
pub struct ReportsService {
    repository: Repository,
    buckets: Vec<TimeBucket>,
    months: u32,
}

impl ReportsService {
    pub fn new(repository: Repository, buckets: Vec<TimeBucket>, months: u32) -> Self {
        Self {
            repository,
            buckets,
            months,
        }
    }

    pub async fn todays_bookings(&self, venue_id: Uuid) -> AppResult<TodaysBookings> {
        let today = self.repository.today();
        let bookings = self
            .repository
            .read(|s| s.todays_bookings(venue_id, today))
            .await?;
        Ok(TodaysBookings {
            venue_id,
            date: today,
            revenue: reports::revenue(&bookings),
            bookings,
        })
    }

    pub async fn payment_history(&self, venue_id: Uuid) -> AppResult<PaymentHistory> {
        let bookings = self.repository.read(|s| s.payment_history(venue_id)).await?;
        Ok(PaymentHistory {
            venue_id,
            total: reports::revenue(&bookings),
            bookings,
        })
    }

    pub async fn overview(&self, venue_id: Uuid) -> AppResult<VenueOverview> {
        let today = self.repository.today();
        self.repository.read(|s| s.overview(venue_id, today)).await
    }

    /// Utilization per configured time-of-day bucket
    pub async fn utilization(
        &self,
        venue_id: Option<Uuid>,
        date: Option<NaiveDate>,
    ) -> AppResult<Vec<PeriodUtilization>> {
        let buckets = &self.buckets;
        self.repository
            .read(|s| s.utilization(venue_id, date, buckets))
            .await
    }

    pub async fn analytics(&self) -> AppResult<AnalyticsSummary> {
        let today = self.repository.today();
        let months = self.months;
        self.repository.read(|s| Ok(s.analytics(today, months))).await
    }
}
