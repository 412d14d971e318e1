use crate::state::StateManager;
use colored::Colorize;

pub async fn handle(states: &StateManager, json: bool) -> anyhow::Result<()> {
    let state = states.load().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&state)?);
        return Ok(());
    }

    if state.deployments.is_empty() {
        println!("{}", "ℹ No deployments tracked".dimmed());
        return Ok(());
    }

    for (key, record) in &state.deployments {
        println!("{}", key.cyan().bold());
        println!(
            "  id:        {}",
            record.state.id.as_deref().unwrap_or("-")
        );
        if let Some(tenant) = &record.state.tenant {
            println!("  tenant:    {}", tenant);
        }
        println!("  resources:");
        for file in &record.state.resources {
            println!("    - {} ({} bytes)", file.name, file.content.len());
        }
        println!(
            "  updated:   {}",
            record.updated_at.format("%Y-%m-%d %H:%M:%S UTC")
        );
    }
    Ok(())
}
