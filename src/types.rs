use chrono::{DateTime, NaiveDate, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::format::DisplayFormat;

lazy_static! {
    static ref TIME_OF_DAY: Regex = Regex::new(r"^([01][0-9]|2[0-3]):[0-5][0-9]$").unwrap();
    static ref PHONE_NUMBER: Regex = Regex::new(r"^\+?[0-9 ()-]{6,20}$").unwrap();
}

/// A booking row as stored by the hosted backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub date: NaiveDate,
    pub time: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewBooking {
    pub date: NaiveDate,
    pub time: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub notes: Option<String>,
}

/// Booking form payload.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct BookingRequest {
    pub date: NaiveDate,
    #[validate(regex(path = *TIME_OF_DAY, message = "time must be given as HH:MM"))]
    pub time: String,
    #[validate(length(
        min = 1,
        max = 100,
        message = "name must be between 1 and 100 characters"
    ))]
    pub name: String,
    #[validate(email(message = "email address is invalid"))]
    pub email: String,
    #[validate(regex(path = *PHONE_NUMBER, message = "phone number is invalid"))]
    pub phone: Option<String>,
    #[validate(length(max = 1000, message = "notes must be at most 1000 characters"))]
    pub notes: Option<String>,
}

impl BookingRequest {
    /// Trims text fields and turns blank optional fields into `None`.
    /// Validation runs on the normalized request.
    pub fn normalized(self) -> Self {
        Self {
            date: self.date,
            time: self.time.trim().to_string(),
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: non_blank(self.phone),
            notes: non_blank(self.notes),
        }
    }
}

impl From<BookingRequest> for NewBooking {
    fn from(request: BookingRequest) -> Self {
        let request = request.normalized();
        Self {
            date: request.date,
            time: request.time,
            name: request.name,
            email: request.email,
            phone: request.phone,
            notes: request.notes,
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// What the booking form shows after a successful submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingConfirmation {
    pub id: Uuid,
    pub date: String,
    pub time: String,
    pub message: String,
}

impl BookingConfirmation {
    pub fn new(booking: &Booking, display: &DisplayFormat) -> Self {
        let date = display.format_date(booking.date);
        let time = display
            .format_time(&booking.time)
            .unwrap_or_else(|_| booking.time.clone());
        let message = format!(
            "Thank you {}, your booking on {date} at {time} is confirmed.",
            booking.name
        );

        Self {
            id: booking.id,
            date,
            time,
            message,
        }
    }
}
