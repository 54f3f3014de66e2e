// External collaborators invoked by the ticket service
//
// Payment and seat reservation are owned by other systems. This module fixes
// the contract the ticket service relies on and ships in-process defaults
// the binary uses until real integrations are wired in.

pub mod paymentgateway;
pub mod seatbooking;

pub use paymentgateway::{LoggingPaymentGateway, TicketPaymentService};
pub use seatbooking::{LoggingSeatReservation, SeatReservationService};

#[cfg(test)]
pub use paymentgateway::MockTicketPaymentService;
#[cfg(test)]
pub use seatbooking::MockSeatReservationService;

/// Error raised by a collaborator that rejects its inputs
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ThirdPartyError {
    /// An argument had the wrong shape (e.g. "accountId must be an integer")
    #[error("{0}")]
    TypeError(String),

    /// The collaborator refused the call for its own reasons
    #[error("{0}")]
    Rejected(String),
}
