// PaymentView - a payment read together with its (possibly cleared) customer.

use std::fmt;

use chrono::{DateTime, Utc};

use crate::domain::{Customer, MonthlyPayment};

/// A borrowed view of a monthly payment and the customer it points at.
///
/// Values derived from the customer are computed on every read, so they
/// follow later changes to the customer's installation.
#[derive(Debug, Clone, Copy)]
pub struct PaymentView<'a> {
    /// The payment.
    pub payment: &'a MonthlyPayment,
    /// The linked customer, or `None` if the link was cleared.
    pub customer: Option<&'a Customer>,
}

impl PaymentView<'_> {
    /// When the customer's service was installed, which is when billing
    /// starts.
    ///
    /// Returns `None` when the payment has no customer, or the customer's
    /// installation is not [`Installed`](crate::InstallationStatus::Installed).
    #[must_use]
    pub fn initial_payment_at(&self) -> Option<DateTime<Utc>> {
        self.customer
            .filter(|customer| customer.is_installed())
            .and_then(|customer| customer.date_installation)
    }
}

/// Shows the paying customer's name, or the invoice number once the
/// customer is gone.
impl fmt::Display for PaymentView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.customer {
            Some(customer) => fmt::Display::fmt(customer, f),
            None => write!(f, "invoice {} (no customer)", self.payment.invoice),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone};
    use rust_decimal::Decimal;
    use uuid::Uuid;

    use super::*;
    use crate::domain::{CustomerData, Dni, InstallationStatus, MonthlyPaymentData};

    fn customer(status: InstallationStatus, installed: Option<DateTime<Utc>>) -> Customer {
        let mut data =
            CustomerData::new(Dni::new("0101").unwrap(), "Ana", "Lopez", Decimal::new(5000, 2));
        data.status_installation = status;
        data.date_installation = installed;
        Customer::new(Uuid::new_v4(), data, Utc::now())
    }

    fn payment(customer: Option<&Customer>) -> MonthlyPayment {
        MonthlyPayment::new(
            Uuid::new_v4(),
            MonthlyPaymentData::new(
                customer.map(Customer::id),
                "F-001",
                Decimal::new(2500, 2),
                NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            ),
        )
    }

    #[test]
    fn installed_customer_yields_installation_date() {
        let at = Utc.with_ymd_and_hms(2024, 4, 20, 15, 0, 0).unwrap();
        let customer = customer(InstallationStatus::Installed, Some(at));
        let payment = payment(Some(&customer));

        let view = PaymentView {
            payment: &payment,
            customer: Some(&customer),
        };
        assert_eq!(view.initial_payment_at(), Some(at));
        assert_eq!(view.to_string(), "Ana Lopez");
    }

    #[test]
    fn pending_customer_yields_nothing() {
        let at = Utc.with_ymd_and_hms(2024, 4, 20, 15, 0, 0).unwrap();
        let customer = customer(InstallationStatus::Pending, Some(at));
        let payment = payment(Some(&customer));

        let view = PaymentView {
            payment: &payment,
            customer: Some(&customer),
        };
        assert_eq!(view.initial_payment_at(), None);
    }

    #[test]
    fn missing_customer_yields_nothing() {
        let payment = payment(None);
        let view = PaymentView {
            payment: &payment,
            customer: None,
        };
        assert_eq!(view.initial_payment_at(), None);
        assert_eq!(view.to_string(), "invoice F-001 (no customer)");
    }
}
