use std::path::Path;

use billing::{CategoryData, Error};
use tracing::instrument;
use uuid::Uuid;

use super::terminal::Colorize;
use crate::cli::open;

#[derive(Debug, clap::Parser)]
pub struct Command {
    #[command(subcommand)]
    command: CategoryCommand,
}

#[derive(Debug, clap::Parser)]
enum CategoryCommand {
    /// Create a product category
    Add {
        /// Category name
        name: String,
    },

    /// List categories and how many products each holds
    List,

    /// Delete a category that no product refers to
    Delete {
        /// The category to delete
        id: Uuid,
    },
}

impl Command {
    #[instrument(skip(self))]
    pub fn run(self, root: &Path) -> anyhow::Result<()> {
        match self.command {
            CategoryCommand::Add { name } => add(root, name),
            CategoryCommand::List => list(root),
            CategoryCommand::Delete { id } => delete(root, id),
        }
    }
}

fn add(root: &Path, name: String) -> anyhow::Result<()> {
    let mut directory = open(root)?;
    let id = directory
        .store_mut()
        .create_category(CategoryData::new(name))?;
    directory.flush()?;

    println!("{}", format!("✅ Added category {id}").success());
    Ok(())
}

fn list(root: &Path) -> anyhow::Result<()> {
    let directory = open(root)?;
    let store = directory.store();

    let mut categories: Vec<_> = store.categories().collect();
    categories.sort_by(|a, b| a.name.cmp(&b.name));

    if categories.is_empty() {
        println!("{}", "No categories".dim());
    }
    for category in categories {
        let products = store.products_in(category.id()).count();
        println!(
            "{}  {:<24} {}",
            category.id(),
            category.name,
            format!("{products} product(s)").dim()
        );
    }
    Ok(())
}

fn delete(root: &Path, id: Uuid) -> anyhow::Result<()> {
    let mut directory = open(root)?;

    match directory.store_mut().delete_category(id) {
        Ok(category) => {
            directory.flush()?;
            println!("{}", format!("✅ Deleted category {category}").success());
            Ok(())
        }
        Err(Error::ReferentialIntegrity { products, .. }) => {
            let store = directory.store();
            eprintln!(
                "{}",
                format!("Category is still used by {} product(s):", products.len()).warning()
            );
            for product in products.iter().filter_map(|&id| store.product(id)) {
                eprintln!("  {}  {product}", product.id());
            }
            anyhow::bail!("Cannot delete category {id}");
        }
        Err(e) => Err(e.into()),
    }
}
