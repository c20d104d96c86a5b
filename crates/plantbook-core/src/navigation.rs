//! Screen navigation.
//!
//! Two tabs, Plants and Settings. The Plants tab is a stack of Listing and
//! Details; the selected record is the only payload that crosses from the
//! listing to the detail screen.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::plant::PlantRecord;

/// Top-level tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Tab {
    #[default]
    Plants,
    Settings,
}

/// Screens stacked inside the Plants tab.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PlantsRoute {
    #[default]
    Listing,
    Details(PlantRecord),
}

/// Current tab plus the Plants stack position.
#[derive(Debug, Clone, Default)]
pub struct Navigator {
    tab: Tab,
    plants_route: PlantsRoute,
}

impl Navigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    pub fn plants_route(&self) -> &PlantsRoute {
        &self.plants_route
    }

    /// Switches tabs; the Plants stack keeps its position.
    pub fn switch_tab(&mut self, tab: Tab) {
        self.tab = tab;
    }

    /// Pushes the detail screen for `record` onto the Plants stack.
    pub fn open_details(&mut self, record: PlantRecord) {
        self.tab = Tab::Plants;
        self.plants_route = PlantsRoute::Details(record);
    }

    /// Pops back to the listing. Returns false if already there.
    pub fn back(&mut self) -> bool {
        match self.plants_route {
            PlantsRoute::Listing => false,
            PlantsRoute::Details(_) => {
                self.plants_route = PlantsRoute::Listing;
                true
            }
        }
    }
}
