use crate::thirdparty::ThirdPartyError;

/// Payment gateway contract
///
/// Takes the full amount for a purchase in one call.
#[cfg_attr(test, mockall::automock)]
pub trait TicketPaymentService: Send + Sync {
    fn make_payment(&self, account_id: i64, total_amount_to_pay: u64) -> Result<(), ThirdPartyError>;
}

/// Payment gateway that records the charge in the log and accepts it
#[derive(Debug, Clone, Default)]
pub struct LoggingPaymentGateway;

impl LoggingPaymentGateway {
    pub fn new() -> Self {
        Self
    }
}

impl TicketPaymentService for LoggingPaymentGateway {
    fn make_payment(&self, account_id: i64, total_amount_to_pay: u64) -> Result<(), ThirdPartyError> {
        if account_id <= 0 {
            return Err(ThirdPartyError::Rejected(
                "invalid accountId - must be greater than 0".to_string(),
            ));
        }

        tracing::info!(
            account_id,
            amount = total_amount_to_pay,
            "Payment taken"
        );
        Ok(())
    }
}
