use anyhow::Context;

use lodgebase_infra::{Facade, LodgebaseConfig};

fn main() -> anyhow::Result<()> {
    let config = LodgebaseConfig::from_env()?;
    lodgebase_observability::init(config.log_format);

    tracing::info!(delete_policy = ?config.delete_policy, "seeding in-memory facade");

    let facade = Facade::from_config(&config);
    let seeded = lodgebase_seed::seed(&facade)?;
    let details = facade
        .place_details(&seeded.place_id)
        .context("seeded place is missing")?;

    let rendered =
        serde_json::to_string_pretty(&details).context("failed to render place details")?;
    println!("{rendered}");

    Ok(())
}
