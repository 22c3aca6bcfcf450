//! CLI command bodies. Each returns the text to print.


use anyhow::Context;
use nppatch_core::labels::LabelCatalog;
use nppatch_core::package::InstallInfo;
use nppatch_core::permission_set::PermissionSet;
use nppatch_core::save_result::{construct_error_message_with, SaveResult};
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Resolved text for a single label key.
pub fn label(catalog: &LabelCatalog, key: &str) -> String {
    catalog.resolve(key).to_string()
}

/// `key = text` lines for every label under `prefix`, sorted by key.
pub fn list_labels(catalog: &LabelCatalog, prefix: &str) -> String {
    catalog
        .entries_with_prefix(prefix)
        .map(|(key, text)| format!("{key} = {text}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Read a save result from `file`, or from stdin when no file is given.
pub fn read_save_result(file: Option<&str>) -> anyhow::Result<SaveResult> {
    let content = match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read save result from {path}"))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read save result from stdin")?;
            buf
        }
    };
    parse_save_result(&content)
}

fn parse_save_result(content: &str) -> anyhow::Result<SaveResult> {
    if content.trim().is_empty() {
        anyhow::bail!("save result is empty. Usage: nppatch error <file.json>");
    }
    Ok(SaveResult::from_json(content)?)
}

/// Header and detail for a save result, as text or as `ErrorInfo` JSON.
pub fn error_message(
    catalog: &LabelCatalog,
    save_result: &SaveResult,
    json: bool,
) -> anyhow::Result<String> {
    let info = construct_error_message_with(catalog, save_result);
    debug!(
        "composed error message from {} entries",
        save_result.errors.len()
    );
    if json {
        Ok(serde_json::to_string_pretty(&info)?)
    } else {
        Ok(info.to_string())
    }
}

/// Install banner for a package version.
pub fn package_info(version: &str, package_id: &str) -> anyhow::Result<String> {
    let info = InstallInfo::new(version, package_id)?;
    Ok(info.render())
}

/// Generate the admin permission set and return a summary of what was written.
pub fn generate_permission_set(objects_dir: &str, output: &str) -> anyhow::Result<String> {
    let set = PermissionSet::from_objects_dir(Path::new(objects_dir))?;
    set.write(Path::new(output))?;

    let mut lines = vec![
        format!("Generated permission set: {output}"),
        format!("Objects with permissions: {}", set.object_permissions.len()),
        format!(
            "Skipped fields (required/master-detail): {}",
            set.skipped_fields.len()
        ),
    ];
    lines.extend(set.skipped_fields.iter().map(|f| format!("  - {f}")));
    lines.push(format!(
        "Total field permissions: {}",
        set.field_permissions.len()
    ));
    Ok(lines.join("\n"))
}
