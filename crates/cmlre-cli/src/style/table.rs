//! Table formatting using comfy-table.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};

use super::colors::SemanticStyle;

fn base_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn header_cell(text: &str) -> Cell {
    if super::plain() {
        Cell::new(text)
    } else {
        Cell::new(text).add_attribute(Attribute::Bold).fg(Color::Cyan)
    }
}

/// A ✓ / ✗ cell for a granted or withheld capability.
pub fn grant_cell(granted: bool) -> Cell {
    match (granted, super::plain()) {
        (true, true) => Cell::new("✓"),
        (false, true) => Cell::new("✗"),
        (true, false) => Cell::new("✓").fg(Color::Green),
        (false, false) => Cell::new("✗").fg(Color::Red),
    }
}

/// Creates a table with a bold header row.
pub fn data_table(columns: &[&str], rows: Vec<Vec<Cell>>) -> Table {
    let mut table = base_table();
    table.set_header(columns.iter().map(|c| header_cell(c)).collect::<Vec<_>>());
    for row in rows {
        table.add_row(row);
    }
    table
}

/// Prints a table followed by a row-count footer.
pub fn print_data_table(columns: &[&str], rows: Vec<Vec<Cell>>, noun: &str) {
    let count = rows.len();
    println!("{}", data_table(columns, rows));
    println!("{}", format!("({count} {})", pluralize(noun, count)).muted());
}

fn pluralize(noun: &str, count: usize) -> String {
    match (count, noun.strip_suffix('y')) {
        (1, _) => noun.to_string(),
        (_, Some(stem)) => format!("{stem}ies"),
        (_, None) => format!("{noun}s"),
    }
}

/// Creates a key-value info table (two columns: key and value).
pub fn info_table(entries: &[(&str, String)]) -> Table {
    let mut table = base_table();
    for (key, value) in entries {
        let key_cell = if super::plain() {
            Cell::new(key)
        } else {
            Cell::new(key).fg(Color::DarkGrey)
        };
        table.add_row(vec![key_cell, Cell::new(value)]);
    }
    table
}

pub fn print_info_table(entries: &[(&str, String)]) {
    println!("{}", info_table(entries));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pluralize() {
        assert_eq!(pluralize("entry", 1), "entry");
        assert_eq!(pluralize("entry", 2), "entries");
        assert_eq!(pluralize("user", 0), "users");
        assert_eq!(pluralize("module", 4), "modules");
    }
}
