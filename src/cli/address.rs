use std::path::Path;

use billing::{AddressData, Dni};
use tracing::instrument;

use super::terminal::Colorize;
use crate::cli::{find_customer, open};

#[derive(Debug, clap::Parser)]
pub struct Command {
    #[command(subcommand)]
    command: AddressCommand,
}

#[derive(Debug, clap::Parser)]
enum AddressCommand {
    /// Add an address to a customer
    Add(Add),
}

impl Command {
    pub fn run(self, root: &Path) -> anyhow::Result<()> {
        match self.command {
            AddressCommand::Add(command) => command.run(root),
        }
    }
}

#[derive(Debug, clap::Parser)]
struct Add {
    /// DNI of the customer the address belongs to
    dni: Dni,

    /// Neighbourhood or sector
    #[arg(long)]
    sector: String,

    /// Main street
    #[arg(long)]
    principal: String,

    /// Cross street
    #[arg(long)]
    secondary: String,
}

impl Add {
    #[instrument(skip(self), fields(dni = %self.dni))]
    fn run(self, root: &Path) -> anyhow::Result<()> {
        let mut directory = open(root)?;
        let customer = find_customer(directory.store(), &self.dni)?.id();

        let data = AddressData::new(customer, self.sector, self.principal, self.secondary);
        let id = directory.store_mut().create_address(data)?;
        directory.flush()?;

        println!("{}", format!("✅ Added address {id}").success());
        Ok(())
    }
}
