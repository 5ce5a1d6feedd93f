//! Reference data: organizations and budget categories.

use console::style;

use leadunit::services::LeadUnitService;

use super::helpers::{print_json, truncate};

pub async fn cmd_units(service: &LeadUnitService, search: &str, json: bool) -> anyhow::Result<()> {
    let page = service.get_list_unit(search).await?;
    if json {
        return print_json(&page);
    }

    println!("\n{}", style("Organizations").bold());
    println!("{}", "-".repeat(60));
    for unit in &page.content {
        println!(
            "{:<15} {:<15} {}",
            unit.organization_id.to_string(),
            truncate(unit.code.as_deref().unwrap_or("-"), 14),
            unit.label()
        );
    }
    println!("\n{} organization(s)", page.content.len());
    Ok(())
}

pub async fn cmd_budgets(service: &LeadUnitService, json: bool) -> anyhow::Result<()> {
    let budgets = service.budget_common().await?;
    if json {
        return print_json(&budgets);
    }

    println!("\n{}", style("Budget categories").bold());
    println!("{}", "-".repeat(60));
    for budget in &budgets {
        println!(
            "{:<20} {}",
            budget.code.as_deref().unwrap_or("-"),
            budget.name.as_deref().unwrap_or("")
        );
    }
    Ok(())
}
