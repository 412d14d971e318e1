use super::{Context, fail};
use colored::Colorize;

pub async fn handle(ctx: &Context, import_id: &str) -> anyhow::Result<()> {
    let resource = ctx.provider.deployment_resource();

    let bootstrap = resource.import_state(import_id);
    let imported = resource.read(bootstrap).await.map_err(fail)?;

    let mut state = ctx.states.load().await?;
    if state.get(&imported.key).is_some() {
        anyhow::bail!("Deployment '{}' is already tracked in state", imported.key);
    }

    let key = imported.key.clone();
    state.set(imported);
    ctx.states.save(&state).await?;

    println!(
        "{}",
        format!("✓ Imported deployment '{}'", key).green().bold()
    );
    Ok(())
}
