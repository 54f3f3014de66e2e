use std::sync::Arc;

use crate::thirdparty::{SeatReservationService, TicketPaymentService};
use crate::tickets::{
    InvalidPurchaseError, PriceCalculator, PurchaseReceipt, PurchaseRequest, PurchaseRuleError,
    TicketPriceResponse, TicketType, TicketTypeRequest, MAX_TICKETS_PER_PURCHASE,
};

/// Totals for a basket that passed every rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatedBasket {
    pub cost: u64,
    pub seats: u32,
}

/// Service for ticket purchase business logic
///
/// Holds no per-purchase state; every call works on its own basket.
#[derive(Clone)]
pub struct TicketService {
    payment_service: Arc<dyn TicketPaymentService>,
    seat_reservation_service: Arc<dyn SeatReservationService>,
}

impl TicketService {
    /// Create a new TicketService
    pub fn new(
        payment_service: Arc<dyn TicketPaymentService>,
        seat_reservation_service: Arc<dyn SeatReservationService>,
    ) -> Self {
        Self {
            payment_service,
            seat_reservation_service,
        }
    }

    /// Purchase a basket of tickets for an account
    ///
    /// # Arguments
    /// * `account_id` - Account paying for and holding the tickets
    /// * `requests` - Basket of ticket requests
    ///
    /// # Returns
    /// Receipt with seats reserved and amount charged
    ///
    /// # Validation
    /// - At least one adult ticket must be in the basket
    /// - Account id must be greater than 0
    /// - At most 25 seats per purchase
    ///
    /// Payment is taken before seats are reserved. If the reservation fails
    /// the payment is not refunded.
    pub fn purchase_tickets(
        &self,
        account_id: i64,
        requests: &[TicketTypeRequest],
    ) -> Result<PurchaseReceipt, InvalidPurchaseError> {
        tracing::debug!(account_id, lines = requests.len(), "Purchasing tickets");

        self.try_purchase(account_id, requests).map_err(|reason| {
            tracing::warn!(account_id, %reason, "Purchase rejected");
            InvalidPurchaseError::from(reason)
        })
    }

    /// Purchase tickets from a raw wire payload
    ///
    /// Malformed lines or account ids are reported through the same
    /// `InvalidPurchaseError` as rule violations.
    pub fn purchase(&self, request: &PurchaseRequest) -> Result<PurchaseReceipt, InvalidPurchaseError> {
        let (account_id, requests) = Self::basket_from_request(request).map_err(|reason| {
            tracing::warn!(%reason, "Malformed purchase request");
            InvalidPurchaseError::from(reason)
        })?;

        self.purchase_tickets(account_id, &requests)
    }

    /// Check the basket-level rules and compute its totals
    ///
    /// Rules are checked in order and the first failure is returned:
    /// adult present, account id positive, seat cap.
    pub fn validate_basket(
        account_id: i64,
        requests: &[TicketTypeRequest],
    ) -> Result<ValidatedBasket, PurchaseRuleError> {
        Self::ensure_adult_present(requests)?;
        Self::ensure_valid_account(account_id)?;
        let seats = Self::seats_within_cap(requests)?;

        Ok(ValidatedBasket {
            cost: PriceCalculator::calculate_total(requests),
            seats,
        })
    }

    /// Turn a raw wire payload into an account id and a typed basket
    ///
    /// Ticket types are checked first, as each line is built. The raw
    /// account id and counts are then checked against the basket rules in
    /// the same order as `validate_basket`, with malformed counts reported
    /// last. Lines whose count is not an integer do not count as an adult
    /// and do not take seats.
    pub fn basket_from_request(
        request: &PurchaseRequest,
    ) -> Result<(i64, Vec<TicketTypeRequest>), PurchaseRuleError> {
        let lines = request
            .ticket_type_requests
            .iter()
            .map(|line| -> Result<_, PurchaseRuleError> {
                Ok((line.ticket_type.parse::<TicketType>()?, line))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let well_formed: Vec<TicketTypeRequest> = lines
            .iter()
            .filter_map(|(ticket_type, line)| {
                line.no_of_tickets
                    .as_u64()
                    .and_then(|n| u32::try_from(n).ok())
                    .map(|n| TicketTypeRequest::new(*ticket_type, n))
            })
            .collect();

        Self::ensure_adult_present(&well_formed)?;

        let account_id = request
            .account_id
            .as_i64()
            .ok_or(PurchaseRuleError::AccountIdNotInteger)?;
        Self::ensure_valid_account(account_id)?;

        Self::seats_within_cap(&well_formed)?;

        let requests = lines
            .into_iter()
            .map(|(_, line)| TicketTypeRequest::try_from(line))
            .collect::<Result<Vec<_>, _>>()?;

        Ok((account_id, requests))
    }

    /// Published price list, one row per ticket type
    pub fn price_list() -> Vec<TicketPriceResponse> {
        TicketType::ALL
            .iter()
            .map(|&ticket_type| TicketPriceResponse {
                ticket_type,
                price: PriceCalculator::unit_price(ticket_type),
                requires_seat: ticket_type.requires_seat(),
            })
            .collect()
    }

    fn ensure_adult_present(requests: &[TicketTypeRequest]) -> Result<(), PurchaseRuleError> {
        let adult_present = requests
            .iter()
            .any(|r| r.ticket_type() == TicketType::Adult && r.no_of_tickets() > 0);
        if adult_present {
            Ok(())
        } else {
            Err(PurchaseRuleError::AdultRequired)
        }
    }

    fn ensure_valid_account(account_id: i64) -> Result<(), PurchaseRuleError> {
        if account_id <= 0 {
            return Err(PurchaseRuleError::InvalidAccountId);
        }
        Ok(())
    }

    fn seats_within_cap(requests: &[TicketTypeRequest]) -> Result<u32, PurchaseRuleError> {
        let too_many = PurchaseRuleError::TooManyTickets {
            max: MAX_TICKETS_PER_PURCHASE,
        };
        let seats = u32::try_from(PriceCalculator::calculate_seats(requests))
            .map_err(|_| too_many.clone())?;
        if seats > MAX_TICKETS_PER_PURCHASE {
            return Err(too_many);
        }
        Ok(seats)
    }

    fn try_purchase(
        &self,
        account_id: i64,
        requests: &[TicketTypeRequest],
    ) -> Result<PurchaseReceipt, PurchaseRuleError> {
        let ValidatedBasket { cost, seats } = Self::validate_basket(account_id, requests)?;

        self.payment_service.make_payment(account_id, cost)?;
        self.seat_reservation_service.reserve_seat(account_id, seats)?;

        tracing::info!(account_id, seats, cost, "Tickets purchased");

        Ok(PurchaseReceipt {
            account_id,
            seats,
            cost,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::thirdparty::{MockSeatReservationService, MockTicketPaymentService, ThirdPartyError};
    use mockall::{predicate::eq, Sequence};
    use serde_json::json;

    fn basket(lines: &[(TicketType, u32)]) -> Vec<TicketTypeRequest> {
        lines
            .iter()
            .map(|&(ticket_type, count)| TicketTypeRequest::new(ticket_type, count))
            .collect()
    }

    /// Service whose collaborators must never be called
    fn untouched_service() -> TicketService {
        let mut payment = MockTicketPaymentService::new();
        payment.expect_make_payment().never();
        let mut seats = MockSeatReservationService::new();
        seats.expect_reserve_seat().never();
        TicketService::new(Arc::new(payment), Arc::new(seats))
    }

    /// Service expecting exactly one payment then one reservation
    fn expecting_service(account_id: i64, cost: u64, seat_count: u32) -> TicketService {
        let mut seq = Sequence::new();

        let mut payment = MockTicketPaymentService::new();
        payment
            .expect_make_payment()
            .with(eq(account_id), eq(cost))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(()));

        let mut seats = MockSeatReservationService::new();
        seats
            .expect_reserve_seat()
            .with(eq(account_id), eq(seat_count))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(()));

        TicketService::new(Arc::new(payment), Arc::new(seats))
    }

    #[test]
    fn test_family_purchase() {
        let service = expecting_service(1, 65, 3);
        let requests = basket(&[
            (TicketType::Adult, 2),
            (TicketType::Child, 1),
            (TicketType::Infant, 1),
        ]);

        let receipt = service.purchase_tickets(1, &requests).unwrap();
        assert_eq!(
            receipt,
            PurchaseReceipt {
                account_id: 1,
                seats: 3,
                cost: 65
            }
        );
    }

    #[test]
    fn test_infants_do_not_affect_price_or_seats() {
        let service = expecting_service(1, 25, 1);
        let requests = basket(&[(TicketType::Adult, 1), (TicketType::Infant, 2)]);

        let receipt = service.purchase_tickets(1, &requests).unwrap();
        assert_eq!(receipt.cost, 25);
        assert_eq!(receipt.seats, 1);
    }

    #[test]
    fn test_large_family_purchase() {
        let service = expecting_service(42, 295, 13);
        let requests = basket(&[
            (TicketType::Adult, 10),
            (TicketType::Child, 3),
            (TicketType::Infant, 4),
        ]);

        let receipt = service.purchase_tickets(42, &requests).unwrap();
        assert_eq!(receipt.account_id, 42);
        assert_eq!(receipt.cost, 295);
        assert_eq!(receipt.seats, 13);
    }

    #[test]
    fn test_exactly_max_seats_is_allowed() {
        let service = expecting_service(1, 25 * 20 + 15 * 5, 25);
        let requests = basket(&[
            (TicketType::Adult, 20),
            (TicketType::Child, 5),
            (TicketType::Infant, 10),
        ]);

        assert!(service.purchase_tickets(1, &requests).is_ok());
    }

    #[test]
    fn test_no_adult_is_rejected() {
        let service = untouched_service();
        let requests = basket(&[
            (TicketType::Adult, 0),
            (TicketType::Child, 1),
            (TicketType::Infant, 1),
        ]);

        let err = service.purchase_tickets(1, &requests).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid purchase exception: child and infant tickets cannot be purchased without an adult"
        );
    }

    #[test]
    fn test_empty_basket_is_rejected() {
        let err = untouched_service().purchase_tickets(1, &[]).unwrap_err();
        assert_eq!(err.reason(), &PurchaseRuleError::AdultRequired);
    }

    #[test]
    fn test_more_than_max_seats_is_rejected() {
        let service = untouched_service();
        let requests = basket(&[
            (TicketType::Adult, 25),
            (TicketType::Child, 15),
            (TicketType::Infant, 2),
        ]);

        let err = service.purchase_tickets(1, &requests).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid purchase exception: cannot purchase more than 25 tickets"
        );
    }

    #[test]
    fn test_infants_do_not_count_towards_max() {
        let service = expecting_service(1, 25 * 25, 25);
        let requests = basket(&[(TicketType::Adult, 25), (TicketType::Infant, 100)]);

        assert!(service.purchase_tickets(1, &requests).is_ok());
    }

    #[test]
    fn test_non_positive_account_is_rejected_before_collaborators() {
        let requests = basket(&[(TicketType::Adult, 1)]);

        for account_id in [0, -1, i64::MIN] {
            let err = untouched_service()
                .purchase_tickets(account_id, &requests)
                .unwrap_err();
            assert_eq!(
                err.to_string(),
                "Invalid purchase exception: invalid accountId - must be greater than 0"
            );
        }
    }

    #[test]
    fn test_adult_rule_is_checked_before_account() {
        let requests = basket(&[(TicketType::Child, 1)]);
        let err = untouched_service().purchase_tickets(0, &requests).unwrap_err();
        assert_eq!(err.reason(), &PurchaseRuleError::AdultRequired);
    }

    #[test]
    fn test_account_is_checked_before_seat_cap() {
        let requests = basket(&[(TicketType::Adult, 30)]);
        let err = untouched_service().purchase_tickets(-5, &requests).unwrap_err();
        assert_eq!(err.reason(), &PurchaseRuleError::InvalidAccountId);
    }

    #[test]
    fn test_payment_failure_skips_reservation() {
        let mut payment = MockTicketPaymentService::new();
        payment
            .expect_make_payment()
            .times(1)
            .returning(|_, _| Err(ThirdPartyError::TypeError("totalAmountToPay must be an integer".to_string())));
        let mut seats = MockSeatReservationService::new();
        seats.expect_reserve_seat().never();
        let service = TicketService::new(Arc::new(payment), Arc::new(seats));

        let err = service
            .purchase_tickets(1, &basket(&[(TicketType::Adult, 1)]))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid purchase exception: totalAmountToPay must be an integer"
        );
    }

    #[test]
    fn test_reservation_failure_yields_no_receipt() {
        let mut payment = MockTicketPaymentService::new();
        payment.expect_make_payment().times(1).returning(|_, _| Ok(()));
        let mut seats = MockSeatReservationService::new();
        seats
            .expect_reserve_seat()
            .times(1)
            .returning(|_, _| Err(ThirdPartyError::TypeError("totalSeatsToAllocate must be an integer".to_string())));
        let service = TicketService::new(Arc::new(payment), Arc::new(seats));

        let err = service
            .purchase_tickets(1, &basket(&[(TicketType::Adult, 2), (TicketType::Child, 1)]))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid purchase exception: totalSeatsToAllocate must be an integer"
        );
        assert!(matches!(err.reason(), PurchaseRuleError::Collaborator(_)));
    }

    #[test]
    fn test_purchase_from_wire_payload() {
        let service = expecting_service(1, 65, 3);
        let request: PurchaseRequest = serde_json::from_value(json!({
            "accountId": 1,
            "ticketTypeRequests": [
                { "type": "ADULT", "noOfTickets": 2 },
                { "type": "CHILD", "noOfTickets": 1 },
                { "type": "INFANT", "noOfTickets": 1 }
            ]
        }))
        .unwrap();

        assert_eq!(service.purchase(&request).unwrap().cost, 65);
    }

    #[test]
    fn test_wire_payload_with_unknown_type() {
        let request: PurchaseRequest = serde_json::from_value(json!({
            "accountId": 1,
            "ticketTypeRequests": [
                { "type": "ADULT", "noOfTickets": 2 },
                { "type": "CAT", "noOfTickets": 1 },
                { "type": "IANT", "noOfTickets": 1 }
            ]
        }))
        .unwrap();

        let err = untouched_service().purchase(&request).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid purchase exception: type must be ADULT, CHILD, or INFANT"
        );
    }

    fn wire_request(account_id: serde_json::Value, lines: serde_json::Value) -> PurchaseRequest {
        serde_json::from_value(json!({
            "accountId": account_id,
            "ticketTypeRequests": lines
        }))
        .unwrap()
    }

    fn wire_rejection(request: &PurchaseRequest) -> PurchaseRuleError {
        untouched_service().purchase(request).unwrap_err().reason().clone()
    }

    #[test]
    fn test_wire_payload_with_string_count() {
        let request = wire_request(
            json!(1),
            json!([
                { "type": "ADULT", "noOfTickets": 2 },
                { "type": "CHILD", "noOfTickets": "1" }
            ]),
        );

        let err = untouched_service().purchase(&request).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid purchase exception: noOfTickets must be an integer"
        );
    }

    #[test]
    fn test_wire_adult_rule_wins_over_string_account() {
        let request = wire_request(
            json!("a"),
            json!([
                { "type": "ADULT", "noOfTickets": 0 },
                { "type": "CHILD", "noOfTickets": 1 }
            ]),
        );
        assert_eq!(wire_rejection(&request), PurchaseRuleError::AdultRequired);
    }

    #[test]
    fn test_wire_adult_rule_wins_over_malformed_count() {
        let request = wire_request(
            json!(1),
            json!([
                { "type": "ADULT", "noOfTickets": 0 },
                { "type": "CHILD", "noOfTickets": "x" }
            ]),
        );
        assert_eq!(wire_rejection(&request), PurchaseRuleError::AdultRequired);
    }

    #[test]
    fn test_wire_adult_with_malformed_count_is_not_an_adult() {
        let request = wire_request(json!(1), json!([{ "type": "ADULT", "noOfTickets": "2" }]));
        assert_eq!(wire_rejection(&request), PurchaseRuleError::AdultRequired);
    }

    #[test]
    fn test_wire_account_rule_wins_over_malformed_count() {
        let request = wire_request(
            json!(0),
            json!([
                { "type": "ADULT", "noOfTickets": 2 },
                { "type": "CHILD", "noOfTickets": 1.5 }
            ]),
        );
        assert_eq!(wire_rejection(&request), PurchaseRuleError::InvalidAccountId);
    }

    #[test]
    fn test_wire_string_account_wins_over_malformed_count() {
        let request = wire_request(
            json!("a"),
            json!([
                { "type": "ADULT", "noOfTickets": 2 },
                { "type": "CHILD", "noOfTickets": "x" }
            ]),
        );
        assert_eq!(wire_rejection(&request), PurchaseRuleError::AccountIdNotInteger);
    }

    #[test]
    fn test_wire_seat_cap_wins_over_malformed_count() {
        let request = wire_request(
            json!(1),
            json!([
                { "type": "ADULT", "noOfTickets": 25 },
                { "type": "CHILD", "noOfTickets": 15 },
                { "type": "INFANT", "noOfTickets": -1 }
            ]),
        );
        assert_eq!(
            wire_rejection(&request),
            PurchaseRuleError::TooManyTickets { max: MAX_TICKETS_PER_PURCHASE }
        );
    }

    #[test]
    fn test_wire_unknown_type_wins_over_everything() {
        let request = wire_request(
            json!("a"),
            json!([
                { "type": "CHILD", "noOfTickets": "x" },
                { "type": "CAT", "noOfTickets": 1 }
            ]),
        );
        assert_eq!(wire_rejection(&request), PurchaseRuleError::InvalidTicketType);
    }

    #[test]
    fn test_basket_from_request_builds_typed_basket() {
        let request = wire_request(
            json!(7),
            json!([
                { "type": "ADULT", "noOfTickets": 2 },
                { "type": "INFANT", "noOfTickets": 1 }
            ]),
        );

        let (account_id, basket) = TicketService::basket_from_request(&request).unwrap();
        assert_eq!(account_id, 7);
        assert_eq!(
            basket,
            vec![
                TicketTypeRequest::new(TicketType::Adult, 2),
                TicketTypeRequest::new(TicketType::Infant, 1),
            ]
        );
    }

    #[test]
    fn test_wire_payload_with_string_account() {
        let request: PurchaseRequest = serde_json::from_value(json!({
            "accountId": "a",
            "ticketTypeRequests": [{ "type": "ADULT", "noOfTickets": 2 }]
        }))
        .unwrap();

        let err = untouched_service().purchase(&request).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid purchase exception: accountId must be an integer"
        );
    }

    #[test]
    fn test_price_list() {
        let prices = TicketService::price_list();
        assert_eq!(prices.len(), 3);
        assert_eq!(prices[0].ticket_type, TicketType::Adult);
        assert_eq!(prices[0].price, 25);
        assert!(prices[0].requires_seat);
        assert_eq!(prices[2].ticket_type, TicketType::Infant);
        assert_eq!(prices[2].price, 0);
        assert!(!prices[2].requires_seat);
    }
}
