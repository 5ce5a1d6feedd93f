//! Spreadsheet import and export commands.

use std::path::{Path, PathBuf};

use console::style;
use serde_json::{json, Value};

use leadunit::services::{
    import_key, save_error_workbook, Blob, DirectorySink, FileSink, LeadUnitService,
    SPREADSHEET_MIME,
};

use super::helpers::{arrow, print_json, success};

/// Name used when the server does not suggest one.
const DEFAULT_EXPORT_FILENAME: &str = "risk-focal-units.xlsx";

/// Upload parsed rows and, optionally, commit them straight away.
pub async fn cmd_import(
    service: &LeadUnitService,
    file: &Path,
    confirm: bool,
) -> anyhow::Result<()> {
    let contents = tokio::fs::read_to_string(file)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", file.display(), e))?;
    let rows: Value = serde_json::from_str(&contents)?;

    let response = service.import_excel_data(&rows).await?;
    let Some(key) = import_key(&response) else {
        // Nothing to confirm; show whatever the server sent back
        return print_json(&response);
    };

    eprintln!("{} Import validated", success());
    eprintln!("  {} Key: {}", arrow(), key);

    if confirm {
        service.confirm_source(key).await?;
        eprintln!("{} Import confirmed", success());
    } else {
        eprintln!(
            "  {} Run 'leadunit confirm {}' to commit it",
            style("!").yellow(),
            key
        );
    }
    Ok(())
}

pub async fn cmd_confirm(service: &LeadUnitService, key: &str) -> anyhow::Result<()> {
    service.confirm_source(key).await?;
    eprintln!("{} Import {} confirmed", success(), key);
    Ok(())
}

/// Download the export for a filter into `output`.
pub async fn cmd_export(
    service: &LeadUnitService,
    search: &str,
    status: Option<i32>,
    output: PathBuf,
) -> anyhow::Result<()> {
    let filter = json!({ "search": search, "status": status });
    let file = service.export(&filter).await?;

    let blob = Blob {
        mime_type: file
            .content_type
            .clone()
            .unwrap_or_else(|| SPREADSHEET_MIME.to_string()),
        bytes: file.bytes,
    };
    let filename = file
        .filename
        .unwrap_or_else(|| DEFAULT_EXPORT_FILENAME.to_string());

    let path = DirectorySink::new(output).save(&blob, &filename)?;
    eprintln!("{} Exported to {}", success(), path.display());
    Ok(())
}

/// Decode a Base64 error workbook returned by an import and save it.
/// `input` of `-` reads standard input.
pub async fn cmd_decode_errors(input: &Path, output: PathBuf) -> anyhow::Result<()> {
    let encoded = if input == Path::new("-") {
        tokio::task::spawn_blocking(|| std::io::read_to_string(std::io::stdin())).await??
    } else {
        tokio::fs::read_to_string(input)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", input.display(), e))?
    };

    let sink = DirectorySink::new(output);
    let path = save_error_workbook(&sink, &encoded)?;
    eprintln!("{} Saved import errors to {}", success(), path.display());
    Ok(())
}
