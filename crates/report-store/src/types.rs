//! Catalog, session and registration records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// An organizational unit that reports can target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    pub id: u32,
    pub name: String,
}

impl Unit {
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Result of toggling a unit in a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    Added,
    Removed,
}

/// In-progress unit selection for one user.
///
/// A user with no stored session has no selection in progress. `Selecting`
/// always holds at least one unit; removing the last one goes back to
/// `Empty`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum RegistrationSession {
    #[serde(rename_all = "camelCase")]
    Empty { started_at: DateTime<Utc> },
    #[serde(rename_all = "camelCase")]
    Selecting {
        selected_units: Vec<Unit>,
        started_at: DateTime<Utc>,
    },
}

impl RegistrationSession {
    pub fn new() -> Self {
        RegistrationSession::Empty {
            started_at: Utc::now(),
        }
    }

    fn from_units(units: Vec<Unit>, started_at: DateTime<Utc>) -> Self {
        if units.is_empty() {
            RegistrationSession::Empty { started_at }
        } else {
            RegistrationSession::Selecting {
                selected_units: units,
                started_at,
            }
        }
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        match self {
            RegistrationSession::Empty { started_at }
            | RegistrationSession::Selecting { started_at, .. } => *started_at,
        }
    }

    /// Selected units in selection order.
    pub fn selected_units(&self) -> &[Unit] {
        match self {
            RegistrationSession::Empty { .. } => &[],
            RegistrationSession::Selecting { selected_units, .. } => selected_units,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.selected_units().is_empty()
    }

    pub fn contains(&self, unit_id: u32) -> bool {
        self.selected_units().iter().any(|u| u.id == unit_id)
    }

    /// Remove the unit if selected, otherwise append it at the end.
    pub fn toggle(self, unit: &Unit) -> (Self, Toggle) {
        let started_at = self.started_at();
        let mut units = match self {
            RegistrationSession::Empty { .. } => Vec::new(),
            RegistrationSession::Selecting { selected_units, .. } => selected_units,
        };

        let outcome = match units.iter().position(|u| u.id == unit.id) {
            Some(index) => {
                units.remove(index);
                Toggle::Removed
            }
            None => {
                units.push(unit.clone());
                Toggle::Added
            }
        };

        (Self::from_units(units, started_at), outcome)
    }
}

impl Default for RegistrationSession {
    fn default() -> Self {
        Self::new()
    }
}

/// Session documents written before sessions carried a `state` tag.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UntaggedSession {
    #[serde(default)]
    selected_units: Vec<Option<Unit>>,
    started_at: Option<DateTime<Utc>>,
}

impl From<UntaggedSession> for RegistrationSession {
    fn from(doc: UntaggedSession) -> Self {
        let units = doc.selected_units.into_iter().flatten().collect();
        RegistrationSession::from_units(units, doc.started_at.unwrap_or_else(Utc::now))
    }
}

/// Whether a registration receives notifications.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistrationStatus {
    Active,
    /// Anything other than `active`, including a missing field.
    #[default]
    #[serde(other)]
    Inactive,
}

/// Finalized registration for one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRegistration {
    #[serde(default)]
    pub display_name: String,

    #[serde(default)]
    pub picture_url: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty", deserialize_with = "skip_null_units")]
    pub units: Vec<Unit>,

    /// Single-unit records from before multi-select.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_id: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_name: Option<String>,

    /// Preset label, when registered through a preset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    #[serde(default)]
    pub registered_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub status: RegistrationStatus,
}

impl UserRegistration {
    /// Build an active registration timestamped now.
    pub fn new(
        display_name: impl Into<String>,
        picture_url: impl Into<String>,
        units: Vec<Unit>,
        role: Option<String>,
    ) -> Self {
        Self {
            display_name: display_name.into(),
            picture_url: picture_url.into(),
            units,
            unit_id: None,
            unit_name: None,
            role,
            registered_at: Some(Utc::now()),
            status: RegistrationStatus::Active,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == RegistrationStatus::Active
    }

    /// Registered unit names, falling back to the single legacy unit.
    pub fn unit_names(&self) -> Vec<&str> {
        if !self.units.is_empty() {
            return self.units.iter().map(|u| u.name.as_str()).collect();
        }
        self.unit_name.as_deref().into_iter().collect()
    }

    pub fn covers_unit(&self, unit_name: &str) -> bool {
        self.unit_names().into_iter().any(|name| name == unit_name)
    }
}

/// Unit lists as Firebase returns them: an array with null holes, or an
/// object keyed by index once an entry has been deleted by hand.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredUnits {
    List(Vec<Option<Unit>>),
    Indexed(HashMap<String, Option<Unit>>),
}

fn skip_null_units<'de, D>(deserializer: D) -> Result<Vec<Unit>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let units = match Option::<StoredUnits>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(StoredUnits::List(items)) => items.into_iter().flatten().collect(),
        Some(StoredUnits::Indexed(items)) => {
            let mut indexed: Vec<(u64, Unit)> = items
                .into_iter()
                .filter_map(|(key, unit)| Some((key.parse().unwrap_or(u64::MAX), unit?)))
                .collect();
            indexed.sort_by_key(|(index, _)| *index);
            indexed.into_iter().map(|(_, unit)| unit).collect()
        }
    };
    Ok(units)
}
