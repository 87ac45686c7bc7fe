// Snapshot module
// Everything the store returns for one displayed year

use serde::{Deserialize, Serialize};

use crate::models::activity::{Activity, PlacedActivity};
use crate::models::event::Event;
use crate::models::leave::Leave;
use crate::models::settings::Settings;

/// Wholesale payload for a displayed year.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearSnapshot {
    #[serde(default)]
    pub events: Vec<Event>,
    #[serde(default)]
    pub activities: Vec<Activity>,
    #[serde(default)]
    pub placed_activities: Vec<PlacedActivity>,
    #[serde(default)]
    pub leaves: Vec<Leave>,
    #[serde(default)]
    pub settings: Settings,
}
