use crate::backend_client::BackendError;
use crate::types::{Booking, NewBooking};
use async_trait::async_trait;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookingBackend: Send + Sync + 'static {
    async fn create_booking(&self, booking: &NewBooking) -> Result<Booking, BackendError>;
}
