use super::ui;
use crate::core::catalog::{self, CurrencyRecord};
use crate::core::theme::Theme;
use comfy_table::Cell;

pub fn run(query: &str, theme: Theme) -> anyhow::Result<()> {
    let results = catalog::search(query.trim());
    println!("{}", render_records(&results, theme));
    Ok(())
}

/// Catalog records as a table, or a hint when nothing matched.
pub fn render_records(records: &[&'static CurrencyRecord], theme: Theme) -> String {
    if records.is_empty() {
        return "No currencies match your search.".to_string();
    }

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Code", theme),
        ui::header_cell("Currency", theme),
        ui::header_cell("Country", theme),
        ui::header_cell("Symbol", theme),
    ]);
    for record in records {
        table.add_row(vec![
            Cell::new(format!("{} {}", record.emblem, record.code)),
            Cell::new(record.name),
            Cell::new(record.country),
            Cell::new(record.symbol),
        ]);
    }
    table.to_string()
}
