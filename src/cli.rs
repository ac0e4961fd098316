use std::{
    io::{self, BufRead},
    path::{Path, PathBuf},
};

mod address;
mod category;
mod customer;
mod init;
mod material;
mod order;
mod payment;
mod product;
mod terminal;

use billing::{Customer, Directory, Dni, Store};
use clap::ArgAction;

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// The directory holding the `.billing` records folder
    #[arg(short, long, default_value = ".", global = true)]
    root: PathBuf,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);
        self.command.run(&self.root)
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug, clap::Parser)]
enum Command {
    /// Create the records folder
    Init,

    /// Manage customers
    Customer(customer::Command),

    /// Manage customer addresses
    Address(address::Command),

    /// Record and list monthly payments
    Payment(payment::Command),

    /// Record work orders
    Order(order::Command),

    /// Record materials used for installations
    Material(material::Command),

    /// Manage product categories
    Category(category::Command),

    /// Manage the product catalogue
    Product(product::Command),
}

impl Command {
    fn run(self, root: &Path) -> anyhow::Result<()> {
        match self {
            Self::Init => init::run(root),
            Self::Customer(command) => command.run(root),
            Self::Address(command) => command.run(root),
            Self::Payment(command) => command.run(root),
            Self::Order(command) => command.run(root),
            Self::Material(command) => command.run(root),
            Self::Category(command) => command.run(root),
            Self::Product(command) => command.run(root),
        }
    }
}

/// Opens the records folder, failing with a hint if it was never created.
fn open(root: &Path) -> anyhow::Result<Directory> {
    if !root.join(".billing").exists() {
        anyhow::bail!(
            "No records found in {} (run `billing init` first)",
            root.display()
        );
    }
    Ok(Directory::open(root.to_path_buf())?)
}

fn find_customer<'a>(store: &'a Store, dni: &Dni) -> anyhow::Result<&'a Customer> {
    store
        .find_by_dni(dni)
        .ok_or_else(|| anyhow::anyhow!("No customer with DNI {dni}"))
}

fn prompt_to_proceed() -> io::Result<()> {
    eprint!("\nProceed? (y/N) ");
    let stdin = io::stdin();
    let mut line = String::new();
    stdin.lock().read_line(&mut line)?;
    if !line.trim().eq_ignore_ascii_case("y") {
        println!("Cancelled");
        std::process::exit(130);
    }
    Ok(())
}
