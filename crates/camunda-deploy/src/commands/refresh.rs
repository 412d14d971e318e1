use super::{Context, fail};
use colored::Colorize;

pub async fn handle(ctx: &Context, key: &str) -> anyhow::Result<()> {
    let mut state = ctx.states.load().await?;
    let current = state
        .get(key)
        .map(|r| r.state.clone())
        .ok_or_else(|| anyhow::anyhow!("Deployment '{}' is not tracked in state", key))?;

    let refreshed = ctx
        .provider
        .deployment_resource()
        .read(current)
        .await
        .map_err(fail)?;

    if refreshed.key != key {
        if state.get(&refreshed.key).is_some() {
            anyhow::bail!(
                "Cannot rename '{}': deployment '{}' is already tracked in state",
                key,
                refreshed.key
            );
        }
        println!(
            "{}",
            format!("Deployment '{}' is now named '{}'", key, refreshed.key).yellow()
        );
        state.remove(key);
    }

    let id = refreshed.id.clone().unwrap_or_default();
    let new_key = refreshed.key.clone();
    state.set(refreshed);
    ctx.states.save(&state).await?;

    println!(
        "{}",
        format!("✓ Deployment '{}' refreshed (id {})", new_key, id)
            .green()
            .bold()
    );
    Ok(())
}
