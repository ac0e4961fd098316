use std::path::Path;

use billing::{Dni, MonthlyPaymentData, PaymentView};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde_json::json;
use tracing::instrument;

use super::terminal::Colorize;
use crate::cli::{find_customer, open};

#[derive(Debug, clap::Parser)]
pub struct Command {
    #[command(subcommand)]
    command: PaymentCommand,
}

#[derive(Debug, clap::Parser)]
enum PaymentCommand {
    /// Record a monthly payment from a customer
    Add(Add),

    /// List payments, oldest first
    List(List),
}

impl Command {
    pub fn run(self, root: &Path) -> anyhow::Result<()> {
        match self.command {
            PaymentCommand::Add(command) => command.run(root),
            PaymentCommand::List(command) => command.run(root),
        }
    }
}

#[derive(Debug, clap::Parser)]
struct Add {
    /// DNI of the paying customer
    dni: Dni,

    /// Invoice number
    #[arg(long)]
    invoice: String,

    /// Amount paid
    #[arg(long)]
    amount: Decimal,

    /// Payment date (YYYY-MM-DD); defaults to today
    #[arg(long)]
    date: Option<NaiveDate>,
}

impl Add {
    #[instrument(skip(self), fields(dni = %self.dni))]
    fn run(self, root: &Path) -> anyhow::Result<()> {
        let mut directory = open(root)?;
        let customer = find_customer(directory.store(), &self.dni)?.id();
        let date = self.date.unwrap_or_else(|| Utc::now().date_naive());

        let data = MonthlyPaymentData::new(Some(customer), self.invoice, self.amount, date);
        let id = directory.store_mut().create_payment(data)?;
        directory.flush()?;

        println!("{}", format!("✅ Recorded payment {id}").success());
        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
struct List {
    /// Only show payments from this customer
    #[arg(long)]
    customer: Option<Dni>,

    /// Print JSON instead of a table
    #[arg(long)]
    json: bool,
}

impl List {
    #[instrument(level = "debug", skip(self))]
    fn run(self, root: &Path) -> anyhow::Result<()> {
        let directory = open(root)?;
        let store = directory.store();

        let only = match &self.customer {
            Some(dni) => Some(find_customer(store, dni)?.id()),
            None => None,
        };
        let views: Vec<PaymentView<'_>> = store
            .payment_views()
            .filter(|view| only.is_none() || view.payment.customer == only)
            .collect();

        if self.json {
            let rows: Vec<_> = views
                .iter()
                .map(|view| {
                    json!({
                        "payment": view.payment,
                        "customer": view.customer.map(|customer| customer.dni.as_str()),
                        "initial_payment_at": view.initial_payment_at(),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&rows)?);
            return Ok(());
        }

        if views.is_empty() {
            println!("{}", "No payments".dim());
            return Ok(());
        }

        for view in views {
            let payment = view.payment;
            let payer = view.to_string();
            let since = view
                .initial_payment_at()
                .map_or_else(|| "-".to_string(), |at| at.date_naive().to_string());
            println!(
                "{}  {:<12} {:>8}  {payer:<32} {}",
                payment.date,
                payment.invoice,
                payment.amount,
                format!("billed since {since}").dim()
            );
        }
        Ok(())
    }
}
