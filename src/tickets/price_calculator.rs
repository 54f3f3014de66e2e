use crate::tickets::{TicketType, TicketTypeRequest};

/// Most seats a single purchase may reserve
pub const MAX_TICKETS_PER_PURCHASE: u32 = 25;

/// Service for calculating basket cost and seat totals
pub struct PriceCalculator;

impl PriceCalculator {
    /// Price of a single ticket of the given type
    pub const fn unit_price(ticket_type: TicketType) -> u64 {
        match ticket_type {
            TicketType::Infant => 0,
            TicketType::Child => 15,
            TicketType::Adult => 25,
        }
    }

    /// Calculate the cost of one basket line (unit price * count)
    pub fn calculate_subtotal(request: &TicketTypeRequest) -> u64 {
        Self::unit_price(request.ticket_type()).saturating_mul(u64::from(request.no_of_tickets()))
    }

    /// Calculate total cost for a basket
    ///
    /// # Returns
    /// Sum of all line subtotals; order of the lines does not matter
    pub fn calculate_total(requests: &[TicketTypeRequest]) -> u64 {
        requests
            .iter()
            .map(Self::calculate_subtotal)
            .fold(0u64, u64::saturating_add)
    }

    /// Calculate seats needed for a basket
    ///
    /// Adults and children take one seat each, infants none.
    pub fn calculate_seats(requests: &[TicketTypeRequest]) -> u64 {
        requests
            .iter()
            .filter(|request| request.ticket_type().requires_seat())
            .map(|request| u64::from(request.no_of_tickets()))
            .sum()
    }
}
