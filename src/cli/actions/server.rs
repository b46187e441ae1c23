use crate::cli::actions::Action;
use crate::{auth, consulta, consulta::AppState, dataset::Dataset};
use anyhow::{anyhow, Context, Result};
use std::sync::Arc;
use tracing::info;

/// Handle the server action
pub async fn handle(action: Action) -> Result<()> {
    let Action::Server {
        port,
        secrets,
        dataset,
    } = action
    else {
        return Err(anyhow!("not a server action"));
    };

    // Fatal before any search surface is reachable: missing or malformed
    // credentials never fall back to a default set.
    let credentials = auth::load(&secrets).context("Failed to load credentials")?;

    let dataset = Dataset::from_csv_path(&dataset)?;

    info!(
        "loaded {} rows, {} columns, {} users",
        dataset.len(),
        dataset.columns().len(),
        credentials.len()
    );

    let state = Arc::new(AppState::new(credentials, dataset));

    consulta::new(port, state).await
}
