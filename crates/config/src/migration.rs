use super::errors::ConfigError;
use std::path::Path;
use std::sync::Arc;
use toml_edit::{Array, DocumentMut, Item, Table, Value};

/// Migrates config file to latest format if needed
pub async fn migrate_config_if_needed<P: AsRef<Path>>(
    path: P,
    events: Option<&Arc<craftwatch_events::EventBus>>,
) -> Result<(), ConfigError> {
    let content = tokio::fs::read_to_string(path.as_ref()).await?;
    let mut doc = content.parse::<DocumentMut>()?;
    let mut added_fields = Vec::new();

    migrate_server_section(&mut doc, &mut added_fields)?;
    migrate_dashboard_section(&mut doc, &mut added_fields)?;

    // Only write if we added fields
    if !added_fields.is_empty() {
        tokio::fs::write(path.as_ref(), doc.to_string()).await?;

        if let Some(event_bus) = events {
            event_bus.emit(craftwatch_events::AppEvent::ConfigMigrated {
                added_fields: added_fields.clone(),
            });
        }
    }

    Ok(())
}

fn migrate_server_section(
    doc: &mut DocumentMut,
    added_fields: &mut Vec<String>,
) -> Result<(), ConfigError> {
    let server = ensure_table(doc, "server", added_fields)?;

    ensure_field(server, "host", Value::from("0.0.0.0"), added_fields);
    ensure_field(server, "port", Value::from(8080), added_fields);
    ensure_field(server, "tcp_nodelay", Value::from(true), added_fields);
    ensure_field(server, "timeout_secs", Value::from(30), added_fields);
    ensure_field(server, "max_concurrent_requests", Value::from(256), added_fields);
    ensure_field(server, "enable_compression", Value::from(true), added_fields);

    if !server.contains_key("allowed_origins") {
        let mut arr = Array::new();
        arr.push("*");
        server["allowed_origins"] = Item::Value(Value::Array(arr));
        added_fields.push("server.allowed_origins".to_string());
    }

    Ok(())
}

fn migrate_dashboard_section(
    doc: &mut DocumentMut,
    added_fields: &mut Vec<String>,
) -> Result<(), ConfigError> {
    let dashboard = ensure_table(doc, "dashboard", added_fields)?;

    ensure_field(dashboard, "default_host", Value::from("xaprosmp.xyz"), added_fields);
    ensure_field(dashboard, "default_edition", Value::from("java"), added_fields);
    ensure_field(dashboard, "timeout_ms", Value::from(2500), added_fields);
    ensure_field(dashboard, "timeout_control", Value::from(false), added_fields);
    ensure_field(dashboard, "auto_refresh", Value::from(true), added_fields);
    ensure_field(dashboard, "refresh_interval_secs", Value::from(30), added_fields);

    Ok(())
}

fn ensure_table<'a>(
    doc: &'a mut DocumentMut,
    key: &str,
    added_fields: &mut Vec<String>,
) -> Result<&'a mut Table, ConfigError> {
    if !doc.contains_key(key) {
        doc[key] = Item::Table(Table::new());
        added_fields.push(key.to_string());
    }

    doc[key]
        .as_table_mut()
        .ok_or_else(|| ConfigError::MigrationError(format!("Invalid [{}] section in config", key)))
}

fn ensure_field(
    table: &mut Table,
    key: &str,
    default_value: Value,
    added_fields: &mut Vec<String>,
) {
    if !table.contains_key(key) {
        table[key] = Item::Value(default_value);
        added_fields.push(key.to_string());
    }
}
