use std::path::Path;

use billing::{Customer, CustomerData, Dni, Membership, Store};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde_json::json;
use tracing::instrument;

use super::terminal::{Colorize, Tone};
use crate::cli::{find_customer, open, prompt_to_proceed};

#[derive(Debug, clap::Parser)]
pub struct Command {
    #[command(subcommand)]
    command: CustomerCommand,
}

#[derive(Debug, clap::Parser)]
enum CustomerCommand {
    /// Register a new customer
    Add(Add),

    /// Show a customer and everything linked to it
    Show(Show),

    /// List customers
    List(List),

    /// Mark a customer's service as installed
    Install(Install),

    /// Deactivate a customer without deleting any records
    Deactivate(Deactivate),

    /// Delete a customer and its addresses
    ///
    /// Payments, work orders and materials are kept without a customer.
    Delete(Delete),
}

impl Command {
    pub fn run(self, root: &Path) -> anyhow::Result<()> {
        match self.command {
            CustomerCommand::Add(command) => command.run(root),
            CustomerCommand::Show(command) => command.run(root),
            CustomerCommand::List(command) => command.run(root),
            CustomerCommand::Install(command) => command.run(root),
            CustomerCommand::Deactivate(command) => command.run(root),
            CustomerCommand::Delete(command) => command.run(root),
        }
    }
}

#[derive(Debug, clap::Parser)]
struct Add {
    /// National identity document number
    dni: Dni,

    /// Given names
    #[arg(long)]
    names: String,

    /// Family names
    #[arg(long)]
    last_names: String,

    /// Monthly contract price
    #[arg(long)]
    price: Decimal,

    /// Contact e-mail
    #[arg(long, default_value = "")]
    email: String,

    /// Contact phone number
    #[arg(long, default_value = "")]
    phone: String,

    /// Service plan: cable, internet or cable+internet (or C, I, A)
    #[arg(long, default_value = "C")]
    membership: Membership,
}

impl Add {
    #[instrument(skip(self), fields(dni = %self.dni))]
    fn run(self, root: &Path) -> anyhow::Result<()> {
        let mut directory = open(root)?;

        let data = CustomerData::new(self.dni, self.names, self.last_names, self.price)
            .with_email(self.email)
            .with_phone(self.phone)
            .with_membership(self.membership);
        let id = directory.store_mut().create_customer(data)?;
        directory.flush()?;

        let customer = directory
            .store()
            .customer(id)
            .ok_or_else(|| anyhow::anyhow!("customer {id} vanished after creation"))?;
        println!(
            "{}",
            format!("✅ Added {customer} ({})", customer.dni).success()
        );
        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
struct Show {
    /// National identity document number
    dni: Dni,

    /// Print JSON instead of text
    #[arg(long)]
    json: bool,
}

impl Show {
    #[instrument(level = "debug", skip(self))]
    fn run(self, root: &Path) -> anyhow::Result<()> {
        let directory = open(root)?;
        let store = directory.store();
        let customer = find_customer(store, &self.dni)?;

        if self.json {
            output_json(store, customer)
        } else {
            output_pretty(store, customer);
            Ok(())
        }
    }
}

fn output_pretty(store: &Store, customer: &Customer) {
    println!("# {customer}");
    println!("  {} {}", "DNI:       ".dim(), customer.dni);
    println!("  {} {}", "E-mail:    ".dim(), customer.email);
    println!("  {} {}", "Phone:     ".dim(), customer.phone);
    println!("  {} {}", "Contract:  ".dim(), customer.price_contract);
    println!("  {} {}", "Plan:      ".dim(), customer.membership.label());
    let status = customer.status_installation;
    println!(
        "  {} {}",
        "Status:    ".dim(),
        status.label().tone(Tone::of_status(status))
    );
    if let Some(at) = customer.date_installation {
        println!("  {} {at}", "Installed: ".dim());
    }
    if !customer.active {
        println!("  {}", "inactive".warning());
    }

    let id = customer.id();
    let addresses: Vec<_> = store.addresses_of(id).collect();
    if !addresses.is_empty() {
        println!("\n{}", "Addresses".dim());
        for address in addresses {
            println!("  {address} ({})", address.sector);
        }
    }

    let mut payments: Vec<_> = store.payments_of(id).collect();
    payments.sort_by_key(|payment| payment.date);
    if !payments.is_empty() {
        println!("\n{}", "Payments".dim());
        for payment in payments {
            println!("  {}  {:>8}  {}", payment.date, payment.amount, payment.invoice);
        }
    }

    let orders: Vec<_> = store.work_orders_of(id).collect();
    if !orders.is_empty() {
        println!("\n{}", "Work orders".dim());
        for order in orders {
            println!("  {}  {}  {}", order.date, order.number_of_order, order.description);
        }
    }

    let materials: Vec<_> = store.materials_of(id).collect();
    if !materials.is_empty() {
        println!("\n{}", "Materials".dim());
        for line in materials {
            println!("  {} x {} @ {}", line.quantity, line.material, line.price);
        }
    }
}

fn output_json(store: &Store, customer: &Customer) -> anyhow::Result<()> {
    let id = customer.id();
    let output = json!({
        "customer": customer,
        "addresses": store.addresses_of(id).collect::<Vec<_>>(),
        "payments": store.payments_of(id).collect::<Vec<_>>(),
        "work_orders": store.work_orders_of(id).collect::<Vec<_>>(),
        "materials": store.materials_of(id).collect::<Vec<_>>(),
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

#[derive(Debug, clap::Parser)]
struct List {
    /// Include deactivated customers
    #[arg(long)]
    all: bool,

    /// Print JSON instead of a table
    #[arg(long)]
    json: bool,
}

impl List {
    #[instrument(level = "debug", skip(self))]
    fn run(self, root: &Path) -> anyhow::Result<()> {
        let directory = open(root)?;
        let customers: Vec<&Customer> = directory
            .store()
            .customers()
            .filter(|customer| self.all || customer.active)
            .collect();

        if self.json {
            serde_json::to_writer_pretty(std::io::stdout(), &customers)?;
            println!();
            return Ok(());
        }

        if customers.is_empty() {
            println!("{}", "No customers".dim());
            return Ok(());
        }

        for customer in customers {
            let name = customer.full_name();
            let line = format!(
                "{:<12} {name:<32} {:<18} {:<10} {:>8}",
                customer.dni.as_str(),
                customer.membership.label(),
                customer.status_installation.label(),
                customer.price_contract,
            );
            if customer.active {
                println!("{line}");
            } else {
                println!("{}", line.dim());
            }
        }
        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
struct Install {
    /// National identity document number
    dni: Dni,

    /// Installation time (RFC 3339); defaults to now
    #[arg(long)]
    at: Option<DateTime<Utc>>,
}

impl Install {
    #[instrument(skip(self), fields(dni = %self.dni))]
    fn run(self, root: &Path) -> anyhow::Result<()> {
        let mut directory = open(root)?;
        let id = find_customer(directory.store(), &self.dni)?.id();
        let at = self.at.unwrap_or_else(Utc::now);

        let customer = directory.store_mut().install_customer(id, at)?;
        let message = format!("✅ Installed service for {customer} at {at}");
        directory.flush()?;

        println!("{}", message.success());
        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
struct Deactivate {
    /// National identity document number
    dni: Dni,
}

impl Deactivate {
    #[instrument(skip(self), fields(dni = %self.dni))]
    fn run(self, root: &Path) -> anyhow::Result<()> {
        let mut directory = open(root)?;
        let id = find_customer(directory.store(), &self.dni)?.id();

        let customer = directory.store_mut().deactivate_customer(id)?;
        let message = format!("✅ Deactivated {customer}");
        directory.flush()?;

        println!("{}", message.success());
        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
struct Delete {
    /// National identity document number
    dni: Dni,

    /// Skip confirmation prompts
    #[arg(long, short)]
    yes: bool,
}

impl Delete {
    #[instrument(skip(self), fields(dni = %self.dni))]
    fn run(self, root: &Path) -> anyhow::Result<()> {
        let mut directory = open(root)?;
        let store = directory.store();
        let customer = find_customer(store, &self.dni)?;
        let id = customer.id();

        if !self.yes {
            println!("Will delete {customer} ({})", customer.dni);
            println!(
                "  {} address(es) will be deleted",
                store.addresses_of(id).count()
            );
            println!(
                "  {} payment(s), {} work order(s) and {} material line(s) will be kept \
                 without a customer",
                store.payments_of(id).count(),
                store.work_orders_of(id).count(),
                store.materials_of(id).count()
            );
            prompt_to_proceed()?;
        }

        let removal = directory.store_mut().delete_customer(id)?;
        directory.flush()?;

        println!(
            "{}",
            format!("✅ Deleted {}", removal.customer).success()
        );
        println!(
            "  {} address(es) deleted, {} payment(s), {} work order(s) and {} material \
             line(s) detached",
            removal.addresses_removed.len(),
            removal.payments_detached.len(),
            removal.work_orders_detached.len(),
            removal.materials_detached.len()
        );
        Ok(())
    }
}
