//! Preference domain models.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};

/// The four user display preferences.
///
/// Created all-default at startup and changed one field at a time through
/// [`PreferenceSet::apply`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferenceSet {
    /// Show vegetables.
    pub want_vegetables: bool,
    /// Show edible plants.
    pub want_edible: bool,
    /// Preferred flower color, empty when unset.
    pub flower_color: String,
    /// Preferred fruit color, empty when unset.
    pub fruit_color: String,
}

/// A single-field update to a [`PreferenceSet`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreferenceChange {
    Vegetables(bool),
    Edible(bool),
    FlowerColor(String),
    FruitColor(String),
}

impl PreferenceSet {
    /// Creates a preference set with every field at its default.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy with `change` applied and the other three fields kept.
    pub fn apply(&self, change: PreferenceChange) -> Self {
        let mut next = self.clone();
        match change {
            PreferenceChange::Vegetables(value) => next.want_vegetables = value,
            PreferenceChange::Edible(value) => next.want_edible = value,
            PreferenceChange::FlowerColor(color) => next.flower_color = color,
            PreferenceChange::FruitColor(color) => next.fruit_color = color,
        }
        next
    }

    /// Builds the lookup filter token matching these preferences.
    ///
    /// Pairs are joined with `&`; an all-default set yields an empty token,
    /// which the lookup client treats as the unfiltered listing.
    pub fn to_filter_token(&self) -> String {
        let mut pairs = Vec::new();
        if self.want_vegetables {
            pairs.push("filter[vegetable]=true".to_string());
        }
        if self.want_edible {
            pairs.push("filter_not[edible_part]=null".to_string());
        }
        if !self.flower_color.is_empty() {
            pairs.push(format!("filter[flower_color]={}", self.flower_color));
        }
        if !self.fruit_color.is_empty() {
            pairs.push(format!("filter[fruit_color]={}", self.fruit_color));
        }
        pairs.join("&")
    }
}

/// Colors offered by the flower and fruit color pickers.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, AsRefStr,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ColorChoice {
    Red,
    Blue,
    Green,
    Yellow,
    White,
    Black,
    Purple,
}

impl ColorChoice {
    /// Every selectable color, in picker order.
    pub fn all() -> Vec<ColorChoice> {
        ColorChoice::iter().collect()
    }

    /// Label shown next to the picker entry.
    pub fn label(&self) -> &'static str {
        match self {
            ColorChoice::Red => "Red",
            ColorChoice::Blue => "Blue",
            ColorChoice::Green => "Green",
            ColorChoice::Yellow => "Yellow",
            ColorChoice::White => "White",
            ColorChoice::Black => "Black",
            ColorChoice::Purple => "Purple",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_new_is_all_default() {
        let prefs = PreferenceSet::new();
        assert!(!prefs.want_vegetables);
        assert!(!prefs.want_edible);
        assert!(prefs.flower_color.is_empty());
        assert!(prefs.fruit_color.is_empty());
    }

    #[test]
    fn test_apply_changes_only_one_field() {
        let prefs = PreferenceSet {
            want_vegetables: true,
            want_edible: false,
            flower_color: "red".to_string(),
            fruit_color: "blue".to_string(),
        };

        let next = prefs.apply(PreferenceChange::Edible(true));
        assert_eq!(
            next,
            PreferenceSet {
                want_edible: true,
                ..prefs.clone()
            }
        );

        let next = prefs.apply(PreferenceChange::FruitColor("white".to_string()));
        assert_eq!(next.fruit_color, "white");
        assert_eq!(next.flower_color, "red");
        assert!(next.want_vegetables);
    }

    #[test]
    fn test_filter_token_empty_for_defaults() {
        assert_eq!(PreferenceSet::new().to_filter_token(), "");
    }

    #[test]
    fn test_filter_token_combines_fields() {
        let prefs = PreferenceSet {
            want_vegetables: true,
            want_edible: true,
            flower_color: "yellow".to_string(),
            fruit_color: String::new(),
        };
        assert_eq!(
            prefs.to_filter_token(),
            "filter[vegetable]=true&filter_not[edible_part]=null&filter[flower_color]=yellow"
        );
    }

    #[test]
    fn test_color_choice_parsing_and_display() {
        assert_eq!(ColorChoice::from_str("Purple").unwrap(), ColorChoice::Purple);
        assert_eq!(ColorChoice::Green.to_string(), "green");
        assert!(ColorChoice::from_str("magenta").is_err());
        assert_eq!(ColorChoice::all().len(), 7);
        assert_eq!(ColorChoice::all()[0], ColorChoice::Red);
    }
}
