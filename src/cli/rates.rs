use super::ui;
use crate::core::coordinator::RefreshCoordinator;
use crate::core::rates::RateSource;
use crate::core::session::{Session, SessionView};
use crate::core::theme::Theme;
use anyhow::Result;
use chrono::{DateTime, Utc};
use comfy_table::{Cell, Color};
use std::sync::Arc;
use tracing::debug;

pub const EMPTY_STATE_MESSAGE: &str =
    "No currencies added yet. Use `add <CODE>` to start tracking a currency.";

/// One manual refresh, printed as a table. Fails if the refresh reported an error.
pub async fn run(session: Session, source: Arc<dyn RateSource>, theme: Theme) -> Result<()> {
    let handle = RefreshCoordinator::spawn(session, source);

    let spinner = ui::new_spinner("Fetching exchange rates...");
    handle.refresh().await?;
    let view = handle.settled().await?;
    spinner.finish_and_clear();

    println!("{}", render_view(&view, theme, Utc::now()));

    if let Some(error) = &view.last_error {
        anyhow::bail!("{error}");
    }
    debug!("Displayed {} currencies", view.currencies.len());
    Ok(())
}

/// Renders the heading, the error banner, and the tracked currencies.
pub fn render_view(view: &SessionView, theme: Theme, now: DateTime<Utc>) -> String {
    let mut out = String::new();

    let updated = view
        .last_updated
        .map(|last| ui::format_last_updated(now, last))
        .unwrap_or_else(|| "never".to_string());
    out.push_str(&format!(
        "{} {}\n",
        ui::style_text(
            &format!("Base: {}", view.base_currency_code),
            ui::StyleType::Title
        ),
        ui::style_text(&format!("(updated {updated})"), ui::StyleType::Subtle),
    ));

    if let Some(error) = &view.last_error {
        out.push_str(&format!(
            "{} {}\n",
            ui::style_text(error, ui::StyleType::Error),
            ui::style_text("(type `dismiss` to hide)", ui::StyleType::Subtle),
        ));
    }

    if view.currencies.is_empty() {
        out.push_str(EMPTY_STATE_MESSAGE);
        return out;
    }

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("", theme),
        ui::header_cell("Code", theme),
        ui::header_cell("Currency", theme),
        ui::header_cell("Country", theme),
        ui::header_cell(&format!("1 {} =", view.base_currency_code), theme),
        ui::header_cell("Amount", theme),
    ]);

    for entry in &view.currencies {
        let record = entry.record;
        let star = if entry.is_favorite {
            Cell::new("★").fg(Color::Yellow)
        } else {
            Cell::new("")
        };
        table.add_row(vec![
            star,
            Cell::new(format!("{} {}", record.emblem, record.code)),
            Cell::new(record.name),
            Cell::new(record.country),
            ui::format_optional_cell(entry.rate, |r| ui::format_rate(Some(r))),
            ui::format_optional_cell(entry.rate, |r| ui::format_amount(record.symbol, Some(r))),
        ]);
    }

    out.push_str(&table.to_string());
    out
}
