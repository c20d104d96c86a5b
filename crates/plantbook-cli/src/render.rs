//! Text rendering of the three screens.
//!
//! Functions here return plain lines; coloring happens when printing.

use colored::Colorize;

use plantbook_core::detail::PlantDetail;
use plantbook_core::listing::ListingState;
use plantbook_core::plant::PlantRecord;
use plantbook_core::preferences::PreferenceSet;

pub fn listing_lines(state: &ListingState) -> Vec<String> {
    if state.loading {
        return vec!["Loading plants...".to_string()];
    }
    if let Some(error) = &state.last_error {
        return vec![format!("Could not load plants: {}", error)];
    }
    if state.results.is_empty() {
        return vec!["No plants found.".to_string()];
    }

    state
        .results
        .iter()
        .enumerate()
        .map(|(i, plant)| format!("{:>3}. {}", i + 1, row_label(plant)))
        .collect()
}

fn row_label(plant: &PlantRecord) -> String {
    let name = plant.display_name();
    if plant.scientific_name.is_empty() || plant.scientific_name == name {
        name.to_string()
    } else {
        format!("{} ({})", name, plant.scientific_name)
    }
}

pub fn detail_lines(record: &PlantRecord) -> Vec<String> {
    PlantDetail::from(record).lines()
}

pub fn settings_lines(prefs: &PreferenceSet) -> Vec<String> {
    vec![
        format!("Vegetables:   {}", on_off(prefs.want_vegetables)),
        format!("Edible:       {}", on_off(prefs.want_edible)),
        format!("Flower color: {}", color_or_any(&prefs.flower_color)),
        format!("Fruit color:  {}", color_or_any(&prefs.fruit_color)),
    ]
}

fn on_off(value: bool) -> &'static str {
    if value { "on" } else { "off" }
}

fn color_or_any(color: &str) -> &str {
    if color.is_empty() { "any" } else { color }
}

pub fn print_listing(state: &ListingState) {
    let lines = listing_lines(state);
    if state.last_error.is_some() {
        for line in lines {
            eprintln!("{}", line.red());
        }
    } else if state.loading || state.results.is_empty() {
        for line in lines {
            println!("{}", line.bright_black());
        }
    } else {
        for line in lines {
            println!("{}", line.bright_blue());
        }
    }
}

pub fn print_detail(record: &PlantRecord) {
    let mut lines = detail_lines(record).into_iter();
    if let Some(title) = lines.next() {
        println!("{}", title.bright_magenta().bold());
    }
    for line in lines {
        println!("{}", line);
    }
}

pub fn print_settings(prefs: &PreferenceSet) {
    println!("{}", "Settings".bright_magenta().bold());
    for line in settings_lines(prefs) {
        println!("  {}", line.cyan());
    }
}
