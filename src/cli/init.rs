use std::path::Path;

use billing::Directory;
use tracing::instrument;

use super::terminal::Colorize;

#[instrument]
pub fn run(root: &Path) -> anyhow::Result<()> {
    let state_dir = root.join(".billing");
    if state_dir.exists() {
        anyhow::bail!("Records already initialized (found existing .billing directory)");
    }

    Directory::init(root.to_path_buf())?;

    println!(
        "{}",
        format!("✅ Initialized billing records in {}", root.display()).success()
    );
    println!("  Created: .billing/config.toml");
    println!("  Created: .billing/records.yaml");
    println!();
    println!("Next steps:");
    println!("  billing customer add 0101 --names Ana --last-names Lopez --price 50.00");

    Ok(())
}
