use crate::thirdparty::ThirdPartyError;

/// Seat reservation contract
#[cfg_attr(test, mockall::automock)]
pub trait SeatReservationService: Send + Sync {
    fn reserve_seat(&self, account_id: i64, total_seats_to_allocate: u32) -> Result<(), ThirdPartyError>;
}

/// Seat reservation service that records the booking in the log and accepts it
#[derive(Debug, Clone, Default)]
pub struct LoggingSeatReservation;

impl LoggingSeatReservation {
    pub fn new() -> Self {
        Self
    }
}

impl SeatReservationService for LoggingSeatReservation {
    fn reserve_seat(&self, account_id: i64, total_seats_to_allocate: u32) -> Result<(), ThirdPartyError> {
        if account_id <= 0 {
            return Err(ThirdPartyError::Rejected(
                "invalid accountId - must be greater than 0".to_string(),
            ));
        }

        tracing::info!(account_id, seats = total_seats_to_allocate, "Seats reserved");
        Ok(())
    }
}
