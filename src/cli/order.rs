use std::path::Path;

use billing::{Dni, WorkOrderData};
use chrono::{NaiveDate, Utc};
use tracing::instrument;

use super::terminal::Colorize;
use crate::cli::{find_customer, open};

#[derive(Debug, clap::Parser)]
pub struct Command {
    #[command(subcommand)]
    command: OrderCommand,
}

#[derive(Debug, clap::Parser)]
enum OrderCommand {
    /// Record a work order for a customer
    Add(Add),
}

impl Command {
    pub fn run(self, root: &Path) -> anyhow::Result<()> {
        match self.command {
            OrderCommand::Add(command) => command.run(root),
        }
    }
}

#[derive(Debug, clap::Parser)]
struct Add {
    /// DNI of the customer the work is for
    dni: Dni,

    /// Order number
    #[arg(long)]
    number: String,

    /// Scheduled date (YYYY-MM-DD); defaults to today
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Description of the work
    #[arg(long, default_value = "")]
    description: String,
}

impl Add {
    #[instrument(skip(self), fields(dni = %self.dni))]
    fn run(self, root: &Path) -> anyhow::Result<()> {
        let mut directory = open(root)?;
        let customer = find_customer(directory.store(), &self.dni)?.id();
        let date = self.date.unwrap_or_else(|| Utc::now().date_naive());

        let data = WorkOrderData::new(Some(customer), self.number, date, self.description);
        let id = directory.store_mut().create_work_order(data)?;
        directory.flush()?;

        println!("{}", format!("✅ Recorded work order {id}").success());
        Ok(())
    }
}
