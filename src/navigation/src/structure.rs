//! Per-organisation navigation template

use serde::{Deserialize, Serialize};

use crate::node::Menu;

/// Complete navigation tree of one organisation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuStructure {
    organisation_name: String,
    root_menu: Menu,
}

impl MenuStructure {
    pub fn new(organisation_name: impl Into<String>, root_menu: Menu) -> Self {
        Self {
            organisation_name: organisation_name.into(),
            root_menu,
        }
    }

    pub fn organisation_name(&self) -> &str {
        &self.organisation_name
    }

    pub fn root_menu(&self) -> &Menu {
        &self.root_menu
    }

    pub fn into_root_menu(self) -> Menu {
        self.root_menu
    }
}
