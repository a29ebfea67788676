use super::ui;
use crate::core::theme::{Theme, ThemePreference};
use anyhow::Result;

/// Prints the stored theme, flipping it first when `toggle` is set.
pub async fn run(preference: &ThemePreference, toggle: bool) -> Result<()> {
    let theme = if toggle {
        Theme::from_dark(preference.toggle().await?)
    } else {
        preference.theme().await
    };
    println!("Theme: {}", ui::style_text(theme_name(theme), ui::StyleType::Label));
    Ok(())
}

pub fn theme_name(theme: Theme) -> &'static str {
    match theme {
        Theme::Light => "light",
        Theme::Dark => "dark",
    }
}
