//! Reconcile an inventory snapshot file and print the report as JSON.
//!
//! Without an inventory, every inventory present in the snapshot is
//! reconciled.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use shrinkwatch_core::InventoryId;
use shrinkwatch_reconciliation::{
    InMemoryInventorySource, InventoryScope, InventorySnapshot, LocalScheduler, ReconciliationConfig,
    ReconciliationJob,
};

#[derive(Parser, Debug)]
#[command(name = "shrinkwatch")]
#[command(about = "Detect inventory shrinkage from a product and RFID scan snapshot")]
#[command(version)]
struct Args {
    /// Snapshot JSON with `products` and `rfidScans`
    #[arg(env = "SHRINKWATCH_SNAPSHOT")]
    snapshot: PathBuf,

    /// Only reconcile this inventory
    #[arg(env = "SHRINKWATCH_INVENTORY")]
    inventory: Option<InventoryId>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    shrinkwatch_observability::init();

    let raw = std::fs::read_to_string(&args.snapshot)
        .with_context(|| format!("failed to read snapshot {}", args.snapshot.display()))?;
    let snapshot = InventorySnapshot::from_json(&raw)?;
    let source = InMemoryInventorySource::from_snapshot(snapshot);

    let config = ReconciliationConfig::from_env();
    tracing::info!(snapshot = %args.snapshot.display(), ?config, "reconciling snapshot");

    let (scheduler, inventory_ids) = match args.inventory {
        Some(id) => (LocalScheduler::for_inventory(id.clone()), vec![id]),
        None => (LocalScheduler::new(InventoryScope::Any), source.inventory_ids()),
    };

    let jobs: Vec<ReconciliationJob> = inventory_ids
        .into_iter()
        .map(|id| ReconciliationJob::new(id).with_config(config))
        .collect();

    let reports = scheduler
        .run_all(&jobs, &source)
        .into_iter()
        .collect::<Result<Vec<_>, _>>()?;

    for report in &reports {
        tracing::info!(inventory = %report.inventory_id, "{}", report.headline());
    }

    println!("{}", serde_json::to_string_pretty(&reports)?);
    Ok(())
}
