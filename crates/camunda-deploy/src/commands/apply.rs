use super::{Context, fail};
use crate::manifest::Manifest;
use colored::Colorize;
use std::path::Path;

pub async fn handle(ctx: &Context, manifest: &Path) -> anyhow::Result<()> {
    let plan = Manifest::load(manifest)?;
    println!("{}", format!("Applying deployment '{}'...", plan.key).yellow());

    let mut state = ctx.states.load().await?;
    let resource = ctx.provider.deployment_resource();
    let prior = state.get(&plan.key).map(|r| r.state.clone());

    let applied = match prior {
        None => {
            println!("  {} {}", "+".green(), "create".green());
            resource.create(plan).await.map_err(fail)?
        }
        Some(prior) if prior.tenant == plan.tenant && prior.resources == plan.resources => {
            println!();
            println!("{}", "ℹ No changes".dimmed());
            return Ok(());
        }
        Some(prior) if prior.requires_replace(&plan) => {
            println!("  {} {}", "-/+".yellow(), "replace (tenant changed)".yellow());
            let key = prior.key.clone();
            resource.delete(prior).await.map_err(fail)?;
            state.remove(&key);
            ctx.states.save(&state).await?;
            resource.create(plan).await.map_err(fail)?
        }
        Some(prior) => {
            println!("  {} {}", "~".yellow(), "update".yellow());
            resource.update(&prior, plan).await.map_err(fail)?
        }
    };

    let id = applied.id.clone().unwrap_or_default();
    let key = applied.key.clone();
    state.set(applied);
    ctx.states.save(&state).await?;

    println!();
    println!(
        "{}",
        format!("✓ Deployment '{}' applied (id {})", key, id)
            .green()
            .bold()
    );
    Ok(())
}
