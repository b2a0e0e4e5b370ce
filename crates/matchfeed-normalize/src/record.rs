//! Provider-native record shape.

use serde::{Deserialize, Serialize};

/// One record as shipped by the data provider.
///
/// Field names mirror the provider's JSON (camelCase). Timestamps are
/// period-relative; coordinates are on the provider's 0–100 pitch grid with
/// the attacking goal at x = 100.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderRecord {
    /// Provider event type (e.g. `"shot"`, `"pass"`, `"foul"`).
    #[serde(rename = "type")]
    pub type_name: String,
    /// Match period (1 = first half, 2 = second half, 3+ = extra time).
    pub period: u32,
    /// Minute within the period — or absolute, on feeds that pre-apply the
    /// period offset.
    pub minute: u32,
    /// Second within the minute.
    #[serde(default)]
    pub second: u32,
    /// Team name as the provider spells it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team: Option<String>,
    /// Player name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player: Option<String>,
    /// Shot outcome: `"goal"`, `"saved"`, `"on_target"`, `"off_target"`, ….
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<String>,
    /// Card color for card records.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_color: Option<String>,
    /// For passes: whether the pass produced a goal.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assisted_goal: Option<bool>,
    /// For passes: whether the pass produced a shot.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assisted_shot: Option<bool>,
    /// Pass end x-coordinate (0–100, attacking goal at 100).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_x: Option<f64>,
    /// Pass end y-coordinate (0–100).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_y: Option<f64>,
}
