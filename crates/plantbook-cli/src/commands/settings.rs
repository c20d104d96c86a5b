use std::str::FromStr;

use anyhow::{Result, anyhow};
use clap::Subcommand;
use clap::builder::BoolishValueParser;

use plantbook_application::PreferencesLoad;
use plantbook_core::preferences::ColorChoice;

use crate::app::AppContext;
use crate::render;

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum SettingsAction {
    /// Print the stored preferences
    Show,
    /// Show vegetables (true/false)
    Vegetables {
        #[arg(action = clap::ArgAction::Set, value_parser = BoolishValueParser::new())]
        value: bool,
    },
    /// Show edible plants (true/false)
    Edible {
        #[arg(action = clap::ArgAction::Set, value_parser = BoolishValueParser::new())]
        value: bool,
    },
    /// Preferred flower color ("any" clears it)
    FlowerColor { color: String },
    /// Preferred fruit color ("any" clears it)
    FruitColor { color: String },
}

/// Normalizes a color argument.
///
/// Returns the lowercase color name, or an empty string for `any`/`none`/empty.
pub fn parse_color(input: &str) -> Result<String> {
    let input = input.trim();
    if input.is_empty() || input.eq_ignore_ascii_case("any") || input.eq_ignore_ascii_case("none") {
        return Ok(String::new());
    }

    ColorChoice::from_str(input)
        .map(|color| color.as_ref().to_string())
        .map_err(|_| {
            let known: Vec<String> = ColorChoice::all().iter().map(|c| c.to_string()).collect();
            anyhow!("Unknown color '{}'. Choose one of: {}, any", input, known.join(", "))
        })
}

/// `plantbook settings ...`
pub async fn run(app: &AppContext, action: SettingsAction) -> Result<()> {
    if let PreferencesLoad::Unreadable(reason) = app.preferences.load_preferences().await {
        tracing::warn!("[Settings] Starting from defaults: {}", reason);
    }

    let prefs = match action {
        SettingsAction::Show => app.preferences.current().await,
        SettingsAction::Vegetables { value } => app.preferences.toggle_vegetables(value).await,
        SettingsAction::Edible { value } => app.preferences.toggle_edible(value).await,
        SettingsAction::FlowerColor { color } => {
            app.preferences.set_flower_color(parse_color(&color)?).await
        }
        SettingsAction::FruitColor { color } => {
            app.preferences.set_fruit_color(parse_color(&color)?).await
        }
    };

    render::print_settings(&prefs);
    Ok(())
}
