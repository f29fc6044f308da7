use serde::Serialize;

use crate::domain::models::{booking::Booking, ticket::Ticket};

#[derive(Serialize)]
pub struct BookingCreatedResponse {
    pub booking: Booking,
    pub ticket: Ticket,
}

#[derive(Serialize)]
pub struct BannerUploadResponse {
    pub banner_url: String,
}
