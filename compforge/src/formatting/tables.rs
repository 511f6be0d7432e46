//! Table formatting utilities using comfy-table.

use comfy_table::{Cell, Table};

/// One line of the resolved-projects table.
pub struct ProjectRow {
    pub role: &'static str,
    pub build_system: &'static str,
    pub src_dir: String,
}

/// Prints SDKs and components in build order.
pub fn print_project_table(rows: &[ProjectRow]) {
    let mut table = Table::new();
    table
        .set_header(vec![
            Cell::new("Role").add_attribute(comfy_table::Attribute::Bold),
            Cell::new("Build System").add_attribute(comfy_table::Attribute::Bold),
            Cell::new("Source").add_attribute(comfy_table::Attribute::Bold),
        ])
        .load_preset(comfy_table::presets::UTF8_FULL)
        .apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS)
        .set_content_arrangement(comfy_table::ContentArrangement::Dynamic);

    for row in rows {
        let role_color = if row.role == "SDK" {
            comfy_table::Color::Cyan
        } else {
            comfy_table::Color::White
        };
        table.add_row(vec![
            Cell::new(row.role).fg(role_color),
            Cell::new(row.build_system).fg(comfy_table::Color::DarkGrey),
            Cell::new(&row.src_dir),
        ]);
    }

    println!("{}", table);
}
