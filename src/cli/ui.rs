use crate::core::theme::Theme;
use chrono::{DateTime, Local, Utc};
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Defines different styles for text elements.
pub enum StyleType {
    Title,
    Label,
    Error,
    Subtle,
    Favorite,
}

/// Applies a consistent style to a string.
pub fn style_text(text: &str, style_type: StyleType) -> String {
    let styled = match style_type {
        StyleType::Title => style(text).bold().underlined(),
        StyleType::Label => style(text).bold(),
        StyleType::Error => style(text).red(),
        StyleType::Subtle => style(text).dim(),
        StyleType::Favorite => style(text).yellow().bold(),
    };
    styled.to_string()
}

fn accent(theme: Theme) -> Color {
    match theme {
        Theme::Light => Color::Blue,
        Theme::Dark => Color::Cyan,
    }
}

/// Creates a new `comfy_table::Table` with standard styling.
pub fn new_styled_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Creates a styled header cell for a table.
pub fn header_cell(text: &str, theme: Theme) -> Cell {
    Cell::new(text)
        .fg(accent(theme))
        .add_attribute(Attribute::Bold)
}

/// Formats an `Option<T>` into a right aligned `Cell`. `None` is displayed as "...".
pub fn format_optional_cell<T>(value: Option<T>, format_fn: impl Fn(T) -> String) -> Cell {
    value.map_or(
        Cell::new(PENDING)
            .fg(Color::DarkGrey)
            .set_alignment(CellAlignment::Right),
        |v| Cell::new(format_fn(v)).set_alignment(CellAlignment::Right),
    )
}

/// Placeholder for a rate that is not available yet.
pub const PENDING: &str = "...";

pub fn format_rate(rate: Option<f64>) -> String {
    rate.map_or(PENDING.to_string(), |r| format!("{r:.4}"))
}

/// Symbol followed by the amount with two decimals and thousands separators.
pub fn format_amount(symbol: &str, amount: Option<f64>) -> String {
    amount.map_or(PENDING.to_string(), |a| {
        format!("{symbol} {}", group_thousands(a))
    })
}

fn group_thousands(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (whole, fraction) = fixed.split_once('.').unwrap_or((&fixed, "00"));

    let mut grouped = String::new();
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if value < 0.0 { "-" } else { "" };
    format!("{sign}{grouped}.{fraction}")
}

/// Relative description of when rates were last refreshed.
pub fn format_last_updated(now: DateTime<Utc>, last: DateTime<Utc>) -> String {
    let minutes = (now - last).num_minutes();
    if minutes < 1 {
        return "Just now".to_string();
    }
    if minutes < 60 {
        return format!("{minutes} min ago");
    }
    let hours = minutes / 60;
    if hours < 24 {
        let plural = if hours > 1 { "s" } else { "" };
        return format!("{hours} hour{plural} ago");
    }
    last.with_timezone(&Local).format("%Y-%m-%d").to_string()
}

/// Creates a spinner shown while a refresh is in flight.
pub fn new_spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(spinner_style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        spinner.set_style(spinner_style);
    }
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration as ChronoDuration;

    #[test]
    fn test_format_rate() {
        assert_eq!(format_rate(Some(0.92)), "0.9200");
        assert_eq!(format_rate(Some(150.123456)), "150.1235");
        assert_eq!(format_rate(None), "...");
    }

    #[test]
    fn test_format_amount_groups_thousands() {
        assert_eq!(format_amount("¥", Some(150.1)), "¥ 150.10");
        assert_eq!(format_amount("₫", Some(25432.456)), "₫ 25,432.46");
        assert_eq!(format_amount("Rp", Some(1234567.0)), "Rp 1,234,567.00");
        assert_eq!(format_amount("$", Some(-1000.0)), "$ -1,000.00");
        assert_eq!(format_amount("€", None), "...");
    }

    #[test]
    fn test_format_last_updated() {
        let now = Utc::now();
        assert_eq!(format_last_updated(now, now), "Just now");
        assert_eq!(
            format_last_updated(now, now - ChronoDuration::seconds(59)),
            "Just now"
        );
        assert_eq!(
            format_last_updated(now, now - ChronoDuration::minutes(5)),
            "5 min ago"
        );
        assert_eq!(
            format_last_updated(now, now - ChronoDuration::minutes(60)),
            "1 hour ago"
        );
        assert_eq!(
            format_last_updated(now, now - ChronoDuration::hours(5)),
            "5 hours ago"
        );

        let old = now - ChronoDuration::days(3);
        assert_eq!(
            format_last_updated(now, old),
            old.with_timezone(&Local).format("%Y-%m-%d").to_string()
        );
    }

    #[test]
    fn test_optional_cell_placeholder() {
        let cell = format_optional_cell(None::<f64>, |v| format!("{v:.2}"));
        assert_eq!(cell.content(), "...");
        let cell = format_optional_cell(Some(1.5), |v| format!("{v:.2}"));
        assert_eq!(cell.content(), "1.50");
    }
}
