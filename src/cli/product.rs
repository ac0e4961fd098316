use std::path::Path;

use billing::{Product, ProductData};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::instrument;
use uuid::Uuid;

use super::terminal::Colorize;
use crate::cli::{open, prompt_to_proceed};

#[derive(Debug, clap::Parser)]
pub struct Command {
    #[command(subcommand)]
    command: ProductCommand,
}

#[derive(Debug, clap::Parser)]
enum ProductCommand {
    /// Add a product to the catalogue
    Add(Add),

    /// Set a product's inventory count
    Stock {
        /// The product to update
        id: Uuid,

        /// The new inventory count
        #[arg(allow_negative_numbers = true)]
        inventory: i32,
    },

    /// List products
    List(List),

    /// Delete a product
    Delete {
        /// The product to delete
        id: Uuid,

        /// Skip confirmation prompts
        #[arg(long, short)]
        yes: bool,
    },
}

impl Command {
    pub fn run(self, root: &Path) -> anyhow::Result<()> {
        match self.command {
            ProductCommand::Add(command) => command.run(root),
            ProductCommand::Stock { id, inventory } => stock(root, id, inventory),
            ProductCommand::List(command) => command.run(root),
            ProductCommand::Delete { id, yes } => delete(root, id, yes),
        }
    }
}

#[derive(Debug, clap::Parser)]
struct Add {
    /// Product title
    #[arg(long)]
    title: String,

    /// Unit price
    #[arg(long)]
    price: Decimal,

    /// Units in stock
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    inventory: i32,

    /// Product description
    #[arg(long, default_value = "")]
    description: String,

    /// Category the product belongs to
    #[arg(long)]
    category: Option<Uuid>,
}

impl Add {
    #[instrument(skip(self))]
    fn run(self, root: &Path) -> anyhow::Result<()> {
        let mut directory = open(root)?;

        let mut data = ProductData::new(self.title, self.price, self.inventory)
            .with_description(self.description);
        if let Some(category) = self.category {
            data = data.in_category(category);
        }
        let id = directory.store_mut().create_product(data)?;
        directory.flush()?;

        println!("{}", format!("✅ Added product {id}").success());
        Ok(())
    }
}

#[instrument]
fn stock(root: &Path, id: Uuid, inventory: i32) -> anyhow::Result<()> {
    let mut directory = open(root)?;

    let product = directory
        .store_mut()
        .update_product(id, |data| data.inventory = inventory)?;
    let message = format!("✅ {product} now has {} in stock", product.inventory);
    directory.flush()?;

    println!("{}", message.success());
    Ok(())
}

#[derive(Debug, clap::Parser)]
struct List {
    /// Only show products in this category
    #[arg(long)]
    category: Option<Uuid>,

    /// Print JSON instead of a table
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct ProductRow<'a> {
    #[serde(flatten)]
    product: &'a Product,
    category_name: Option<&'a str>,
}

impl List {
    #[instrument(level = "debug", skip(self))]
    fn run(self, root: &Path) -> anyhow::Result<()> {
        let directory = open(root)?;
        let store = directory.store();

        let mut products: Vec<_> = match self.category {
            Some(category) => store.products_in(category).collect(),
            None => store.products().collect(),
        };
        products.sort_by(|a, b| a.title.cmp(&b.title));

        let rows: Vec<ProductRow<'_>> = products
            .into_iter()
            .map(|product| ProductRow {
                product,
                category_name: product
                    .category
                    .and_then(|id| store.category(id))
                    .map(|category| category.name.as_str()),
            })
            .collect();

        if self.json {
            serde_json::to_writer_pretty(std::io::stdout(), &rows)?;
            println!();
            return Ok(());
        }

        if rows.is_empty() {
            println!("{}", "No products".dim());
        }
        for row in rows {
            let product = row.product;
            let stock = product.inventory.to_string();
            let stock = if product.inventory > 0 {
                stock
            } else {
                stock.warning()
            };
            println!(
                "{}  {:<28} {:>8} {:>6}  {}",
                product.id(),
                product.title,
                product.price,
                stock,
                row.category_name.unwrap_or("-").dim()
            );
        }
        Ok(())
    }
}

#[instrument]
fn delete(root: &Path, id: Uuid, yes: bool) -> anyhow::Result<()> {
    let mut directory = open(root)?;

    if !yes {
        let Some(product) = directory.store().product(id) else {
            anyhow::bail!("Product {id} not found");
        };
        println!("Will delete product {product}");
        prompt_to_proceed()?;
    }

    let product = directory.store_mut().delete_product(id)?;
    directory.flush()?;

    println!("{}", format!("✅ Deleted product {product}").success());
    Ok(())
}
