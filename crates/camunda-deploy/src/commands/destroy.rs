use super::{Context, fail};
use colored::Colorize;

pub async fn handle(ctx: &Context, key: &str) -> anyhow::Result<()> {
    let mut state = ctx.states.load().await?;
    let Some(record) = state.get(key).cloned() else {
        println!(
            "{}",
            format!("ℹ Deployment '{}' is not tracked in state", key).dimmed()
        );
        return Ok(());
    };

    println!("{}", format!("Deleting deployment '{}'...", key).yellow());
    ctx.provider
        .deployment_resource()
        .delete(record.state)
        .await
        .map_err(fail)?;

    state.remove(key);
    ctx.states.save(&state).await?;

    println!();
    println!(
        "{}",
        format!("✓ Deployment '{}' deleted", key).green().bold()
    );
    Ok(())
}
