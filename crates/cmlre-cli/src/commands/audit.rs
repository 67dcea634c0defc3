//! Audit trail commands.

use anyhow::{Context, Result};
use cmlre::{AuditQuery, AuditSinkKind, JsonLinesSink, Platform};
use comfy_table::Cell;

use crate::style::colors::SemanticStyle;
use crate::style::{print_data_table, print_hint, print_warn};

pub fn show(
    platform: &Platform,
    action: Option<String>,
    user: Option<String>,
    limit: Option<usize>,
) -> Result<()> {
    let config = platform.config();
    if config.audit.sink != AuditSinkKind::File {
        print_warn(&format!(
            "Audit sink is '{}'; entries are not persisted",
            config.audit.sink
        ));
        print_hint("Set [audit] sink = \"file\" in cmlre.toml or CMLRE_AUDIT__SINK=file");
        return Ok(());
    }

    let entries = JsonLinesSink::read_all(&config.audit.path)
        .with_context(|| format!("Failed to read {}", config.audit.path.display()))?;

    let query = AuditQuery {
        user_id: user.map(Into::into),
        action,
        limit,
        ..AuditQuery::default()
    };

    let rows = query
        .apply(&entries)
        .into_iter()
        .map(|entry| {
            vec![
                Cell::new(entry.timestamp.to_rfc3339()),
                Cell::new(entry.user_name.as_str()),
                Cell::new(entry.action.as_str()),
                Cell::new(entry.resource.as_str()),
                Cell::new(entry.id.to_string().muted()),
            ]
        })
        .collect();
    print_data_table(&["Timestamp", "User", "Action", "Resource", "ID"], rows, "entry");
    Ok(())
}
