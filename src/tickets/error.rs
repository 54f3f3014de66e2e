use crate::thirdparty::ThirdPartyError;

/// A single rule violated by a purchase attempt
///
/// Shape errors come from building requests, basket errors from checking the
/// whole basket, and collaborator errors from the payment or seat services.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PurchaseRuleError {
    #[error("type must be ADULT, CHILD, or INFANT")]
    InvalidTicketType,

    #[error("noOfTickets must be an integer")]
    TicketCountNotInteger,

    #[error("accountId must be an integer")]
    AccountIdNotInteger,

    #[error("child and infant tickets cannot be purchased without an adult")]
    AdultRequired,

    #[error("invalid accountId - must be greater than 0")]
    InvalidAccountId,

    #[error("cannot purchase more than {max} tickets")]
    TooManyTickets { max: u32 },

    #[error(transparent)]
    Collaborator(#[from] ThirdPartyError),
}

/// The one error kind callers of a purchase ever see
///
/// Wraps the first rule that failed and keeps its message as a suffix.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid purchase exception: {reason}")]
pub struct InvalidPurchaseError {
    #[source]
    reason: PurchaseRuleError,
}

impl InvalidPurchaseError {
    /// The rule that caused the purchase to be rejected
    pub fn reason(&self) -> &PurchaseRuleError {
        &self.reason
    }
}

impl From<PurchaseRuleError> for InvalidPurchaseError {
    fn from(reason: PurchaseRuleError) -> Self {
        Self { reason }
    }
}
