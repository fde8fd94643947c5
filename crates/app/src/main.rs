use anyhow::Context;

use stockroom_infra::{InventoryStore, JsonFileStore, StoreConfig};

fn main() -> anyhow::Result<()> {
    stockroom_observability::init();

    let config = StoreConfig::from_env().context("invalid stockroom configuration")?;
    let gateway = JsonFileStore::new(&config.data_dir)
        .with_context(|| format!("failed to open data directory {}", config.data_dir.display()))?;
    let store = InventoryStore::open(gateway, config.policy).context("failed to load inventory")?;

    let summary = store.get_dashboard_summary();
    tracing::info!(
        data_dir = %config.data_dir.display(),
        total_parts = summary.total_parts,
        low_stock = summary.low_stock_count,
        recent_entries = summary.recent_entries,
        recent_exits = summary.recent_exits,
        "inventory loaded"
    );

    // The export collaborator consumes this on stdout.
    let report = store.low_stock_report();
    println!(
        "{}",
        serde_json::to_string_pretty(&report).context("failed to encode low stock report")?
    );

    Ok(())
}
