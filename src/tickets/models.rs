use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::tickets::PurchaseRuleError;

/// Ticket category a purchase line asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum TicketType {
    Adult,
    Child,
    Infant,
}

impl TicketType {
    /// All ticket types, in price-list order
    pub const ALL: [TicketType; 3] = [TicketType::Adult, TicketType::Child, TicketType::Infant];

    /// Convert ticket type to its wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketType::Adult => "ADULT",
            TicketType::Child => "CHILD",
            TicketType::Infant => "INFANT",
        }
    }

    /// Whether a ticket of this type occupies a seat
    pub fn requires_seat(&self) -> bool {
        !matches!(self, TicketType::Infant)
    }
}

impl std::fmt::Display for TicketType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for TicketType {
    type Err = PurchaseRuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ADULT" => Ok(TicketType::Adult),
            "CHILD" => Ok(TicketType::Child),
            "INFANT" => Ok(TicketType::Infant),
            _ => Err(PurchaseRuleError::InvalidTicketType),
        }
    }
}

/// A single line of a basket: how many tickets of one type
///
/// Fields are private; once built a request cannot be changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TicketTypeRequest {
    ticket_type: TicketType,
    no_of_tickets: u32,
}

impl TicketTypeRequest {
    pub fn new(ticket_type: TicketType, no_of_tickets: u32) -> Self {
        Self {
            ticket_type,
            no_of_tickets,
        }
    }

    /// Build a request from an untyped ticket type name
    ///
    /// Fails with `InvalidTicketType` when the name is not ADULT, CHILD or INFANT.
    pub fn parse(ticket_type: &str, no_of_tickets: u32) -> Result<Self, PurchaseRuleError> {
        Ok(Self::new(ticket_type.parse()?, no_of_tickets))
    }

    pub fn ticket_type(&self) -> TicketType {
        self.ticket_type
    }

    pub fn no_of_tickets(&self) -> u32 {
        self.no_of_tickets
    }
}

/// Raw purchase line as it arrives over the wire
///
/// `noOfTickets` is kept as raw JSON so a non-integer count can be reported
/// with the domain message rather than a generic deserialization failure.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TicketLineRequest {
    #[serde(rename = "type")]
    pub ticket_type: String,
    #[schema(value_type = i64)]
    pub no_of_tickets: serde_json::Value,
}

impl TryFrom<&TicketLineRequest> for TicketTypeRequest {
    type Error = PurchaseRuleError;

    fn try_from(line: &TicketLineRequest) -> Result<Self, Self::Error> {
        let ticket_type: TicketType = line.ticket_type.parse()?;
        let no_of_tickets = line
            .no_of_tickets
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .ok_or(PurchaseRuleError::TicketCountNotInteger)?;

        Ok(Self::new(ticket_type, no_of_tickets))
    }
}

/// Request DTO for purchasing a basket of tickets
///
/// Converted into a typed basket by `TicketService::basket_from_request`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseRequest {
    #[schema(value_type = i64)]
    pub account_id: serde_json::Value,
    pub ticket_type_requests: Vec<TicketLineRequest>,
}

/// Outcome of a successful purchase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseReceipt {
    pub account_id: i64,
    pub seats: u32,
    pub cost: u64,
}

/// One row of the published price list
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TicketPriceResponse {
    #[serde(rename = "type")]
    pub ticket_type: TicketType,
    pub price: u64,
    pub requires_seat: bool,
}
