use std::path::Path;

use billing::{Dni, InstallationMaterialsData};
use rust_decimal::Decimal;
use tracing::instrument;

use super::terminal::Colorize;
use crate::cli::{find_customer, open};

#[derive(Debug, clap::Parser)]
pub struct Command {
    #[command(subcommand)]
    command: MaterialCommand,
}

#[derive(Debug, clap::Parser)]
enum MaterialCommand {
    /// Record material used for a customer's installation
    Add(Add),
}

impl Command {
    pub fn run(self, root: &Path) -> anyhow::Result<()> {
        match self.command {
            MaterialCommand::Add(command) => command.run(root),
        }
    }
}

#[derive(Debug, clap::Parser)]
struct Add {
    /// DNI of the customer the material was installed for
    dni: Dni,

    /// Material description
    #[arg(long)]
    material: String,

    /// Quantity used
    #[arg(long)]
    quantity: i32,

    /// Unit price
    #[arg(long)]
    price: Decimal,
}

impl Add {
    #[instrument(skip(self), fields(dni = %self.dni))]
    fn run(self, root: &Path) -> anyhow::Result<()> {
        let mut directory = open(root)?;
        let customer = find_customer(directory.store(), &self.dni)?.id();

        let data = InstallationMaterialsData::new(
            Some(customer),
            self.material,
            self.quantity,
            self.price,
        );
        let id = directory.store_mut().create_material(data)?;
        directory.flush()?;

        println!("{}", format!("✅ Recorded materials {id}").success());
        Ok(())
    }
}
