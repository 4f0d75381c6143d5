use serde::{Deserialize, Serialize};

pub const DEFAULT_PAYMENT_AMOUNT: u32 = 499;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    #[default]
    Card,
    PayPal,
}

impl PaymentMethod {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Card => "Credit Card",
            Self::PayPal => "PayPal",
        }
    }
}

/// Card fields are captured for the demo dialog only. Number and CVV never leave the
/// session in serialized form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardDetails {
    #[serde(default, skip_serializing)]
    pub number: String,
    #[serde(default)]
    pub expiry: String,
    #[serde(default, skip_serializing)]
    pub cvv: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    #[default]
    Idle,
    Processing,
    Complete,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PaymentError {
    #[error("payment is only available after submission and before it has been paid")]
    Unavailable,
    #[error("enter the cardholder name and card number to pay by card")]
    NotReady,
    #[error("a payment is already being processed")]
    InFlight,
    #[error("no payment is being processed")]
    NotInFlight,
    #[error("payment has already completed")]
    AlreadyComplete,
}

/// Mock payment dialog: `Idle -> Processing -> Complete`, no decline path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentDialog {
    open: bool,
    method: PaymentMethod,
    card: CardDetails,
    status: PaymentStatus,
    amount: u32,
}

impl Default for PaymentDialog {
    fn default() -> Self {
        Self::with_amount(DEFAULT_PAYMENT_AMOUNT)
    }
}

impl PaymentDialog {
    pub fn with_amount(amount: u32) -> Self {
        Self {
            open: false,
            method: PaymentMethod::default(),
            card: CardDetails::default(),
            status: PaymentStatus::Idle,
            amount,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn method(&self) -> PaymentMethod {
        self.method
    }

    pub fn card(&self) -> &CardDetails {
        &self.card
    }

    pub fn status(&self) -> PaymentStatus {
        self.status
    }

    pub fn amount(&self) -> u32 {
        self.amount
    }

    pub(crate) fn open(&mut self) -> Result<(), PaymentError> {
        if self.status == PaymentStatus::Complete {
            return Err(PaymentError::AlreadyComplete);
        }
        self.open = true;
        Ok(())
    }

    /// Closing is refused while a payment is processing; the mock cannot be cancelled.
    pub(crate) fn close(&mut self) -> Result<(), PaymentError> {
        if self.status == PaymentStatus::Processing {
            return Err(PaymentError::InFlight);
        }
        self.open = false;
        Ok(())
    }

    pub(crate) fn select_method(&mut self, method: PaymentMethod) -> Result<(), PaymentError> {
        self.ensure_editable()?;
        self.method = method;
        Ok(())
    }

    pub(crate) fn update_card(&mut self, card: CardDetails) -> Result<(), PaymentError> {
        self.ensure_editable()?;
        self.card = card;
        Ok(())
    }

    /// Mirrors the enabled state of the "Pay" button.
    pub fn can_pay(&self) -> bool {
        if self.status != PaymentStatus::Idle {
            return false;
        }
        match self.method {
            PaymentMethod::PayPal => true,
            PaymentMethod::Card => !self.card.name.is_empty() && !self.card.number.is_empty(),
        }
    }

    pub(crate) fn begin(&mut self) -> Result<(), PaymentError> {
        match self.status {
            PaymentStatus::Processing => return Err(PaymentError::InFlight),
            PaymentStatus::Complete => return Err(PaymentError::AlreadyComplete),
            PaymentStatus::Idle => {}
        }
        if !self.can_pay() {
            return Err(PaymentError::NotReady);
        }
        self.open = true;
        self.status = PaymentStatus::Processing;
        Ok(())
    }

    pub(crate) fn complete(&mut self) -> Result<(), PaymentError> {
        if self.status != PaymentStatus::Processing {
            return Err(PaymentError::NotInFlight);
        }
        self.status = PaymentStatus::Complete;
        self.open = false;
        Ok(())
    }

    fn ensure_editable(&self) -> Result<(), PaymentError> {
        match self.status {
            PaymentStatus::Idle => Ok(()),
            PaymentStatus::Processing => Err(PaymentError::InFlight),
            PaymentStatus::Complete => Err(PaymentError::AlreadyComplete),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn card_payment_needs_name_and_number() {
        let mut dialog = PaymentDialog::default();
        assert!(!dialog.can_pay());
        assert_eq!(dialog.begin(), Err(PaymentError::NotReady));

        dialog
            .update_card(CardDetails {
                name: "Ada Lovelace".to_string(),
                number: "4242 4242 4242 4242".to_string(),
                ..CardDetails::default()
            })
            .expect("idle dialog is editable");
        assert!(dialog.can_pay());
    }

    #[test]
    fn paypal_needs_no_details() {
        let mut dialog = PaymentDialog::default();
        dialog
            .select_method(PaymentMethod::PayPal)
            .expect("idle dialog is editable");
        assert!(dialog.can_pay());
    }

    #[test]
    fn processing_blocks_edits_close_and_reentry() {
        let mut dialog = PaymentDialog::default();
        dialog
            .select_method(PaymentMethod::PayPal)
            .expect("idle dialog is editable");
        dialog.begin().expect("payment starts");

        assert!(!dialog.can_pay());
        assert_eq!(dialog.begin(), Err(PaymentError::InFlight));
        assert_eq!(dialog.close(), Err(PaymentError::InFlight));
        assert_eq!(
            dialog.select_method(PaymentMethod::Card),
            Err(PaymentError::InFlight)
        );

        dialog.complete().expect("payment completes");
        assert_eq!(dialog.status(), PaymentStatus::Complete);
        assert!(!dialog.is_open());
        assert_eq!(dialog.begin(), Err(PaymentError::AlreadyComplete));
        assert_eq!(dialog.open(), Err(PaymentError::AlreadyComplete));
    }

    #[test]
    fn card_number_is_not_serialized() {
        let card = CardDetails {
            number: "4242".to_string(),
            cvv: "123".to_string(),
            name: "Ada".to_string(),
            expiry: "12/30".to_string(),
        };
        let json = serde_json::to_value(&card).expect("serializes");
        assert!(json.get("number").is_none());
        assert!(json.get("cvv").is_none());
        assert_eq!(json["name"], "Ada");
    }
}
