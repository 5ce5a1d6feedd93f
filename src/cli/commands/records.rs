//! Lead unit record commands.

use std::path::Path;

use console::style;

use leadunit::models::{ContentItem, EntityId, LeadUnitForm, Organization, SaveMode, SearchPayload};
use leadunit::services::{build_lead_unit_payload, LeadUnitService};

use super::helpers::{arrow, print_json, success, truncate};

/// List records matching a filter.
pub async fn cmd_search(
    service: &LeadUnitService,
    params: SearchPayload,
    json: bool,
) -> anyhow::Result<()> {
    let page = service.search(&params).await?;

    if json {
        return print_json(&page);
    }

    if page.is_empty() {
        println!("{} No lead units found", style("!").yellow());
        return Ok(());
    }

    println!("{:<10} {:<15} {:<35} {:<8} Start", "ID", "Code", "Name", "Status");
    println!("{}", "-".repeat(80));
    for item in &page.content {
        println!(
            "{:<10} {:<15} {:<35} {:<8} {}",
            item.id.as_ref().map(ToString::to_string).unwrap_or_default(),
            truncate(item.code.as_deref().unwrap_or("-"), 14),
            truncate(item.name.as_deref().unwrap_or("-"), 34),
            item.status.map(|s| s.to_string()).unwrap_or_default(),
            item.start_date.as_deref().unwrap_or("")
        );
    }
    println!(
        "\n{} of {} (page {})",
        page.content.len(),
        page.total_elements,
        page.number
    );
    Ok(())
}

pub async fn cmd_detail(service: &LeadUnitService, id: &str) -> anyhow::Result<()> {
    let detail = service.get_detail(&EntityId::parse(id)).await?;
    print_json(&detail)
}

pub async fn cmd_delete(service: &LeadUnitService, id: &str) -> anyhow::Result<()> {
    let id = EntityId::parse(id);
    service.process_delete_action(&id).await?;
    eprintln!("{} Deleted lead unit {}", success(), id);
    Ok(())
}

/// Print everything the edit screen loads for a record.
pub async fn cmd_edit_data(service: &LeadUnitService, id: Option<&str>) -> anyhow::Result<()> {
    let id = id.map(EntityId::parse);
    let data = service.get_lead_unit_update_data(id.as_ref()).await;
    print_json(&data)
}

/// Create a record, or update it when `id` is given.
///
/// `form` is a JSON object of record fields. `select` lists the organization
/// ids that should end up linked.
pub async fn cmd_save(
    service: &LeadUnitService,
    form: &Path,
    id: Option<&str>,
    select: &[String],
    dry_run: bool,
) -> anyhow::Result<()> {
    let contents = tokio::fs::read_to_string(form)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", form.display(), e))?;
    let form: LeadUnitForm = serde_json::from_str(&contents)?;
    let selected: Vec<Organization> = select
        .iter()
        .map(|s| Organization::new(EntityId::parse(s)))
        .collect();

    let (mode, existing): (SaveMode, Option<ContentItem>) = match id {
        Some(id) => {
            let detail = service.get_detail(&EntityId::parse(id)).await?;
            (SaveMode::Edit, Some(detail))
        }
        None => (SaveMode::Add, None),
    };

    let payload = build_lead_unit_payload(&form, &selected, mode, existing.as_ref());
    if dry_run {
        return print_json(&payload);
    }

    service.save_update(&payload, mode).await?;
    eprintln!("{} Saved lead unit ({})", success(), mode.as_str());
    if let Some(links) = &payload.organization_details {
        eprintln!("  {} {} organization link(s) sent", arrow(), links.len());
    }
    Ok(())
}
