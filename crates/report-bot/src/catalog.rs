//! Unit catalog, role presets and free-text unit resolution.

use report_store::Unit;
use serde::Deserialize;

/// Units written to an empty store on first start.
const DEFAULT_UNITS: &[(u32, &str)] = &[
    (1, "Production Line 1"),
    (2, "Production Line 2"),
    (3, "Production Line 3"),
    (4, "Warehouse"),
    (5, "Logistics"),
    (6, "Quality Control"),
    (7, "Quality Assurance"),
    (8, "Mechanical Maintenance"),
    (9, "Electrical Maintenance"),
    (10, "Instrument & Control"),
    (11, "Utilities"),
    (12, "Boiler House"),
    (13, "Water Treatment"),
    (14, "Laboratory"),
    (15, "Safety & Environment"),
    (16, "Security"),
    (17, "Human Resources"),
    (18, "Administration"),
    (19, "Procurement"),
    (20, "Engineering Projects"),
    (21, "Central Workshop"),
    (22, "Canteen"),
];

/// Role shortcuts that register a fixed set of units in one step.
const DEFAULT_PRESETS: &[(&str, &[u32])] = &[
    ("Maintenance Supervisor", &[8, 9, 10, 21]),
    ("Production Manager", &[1, 2, 3, 6]),
    ("Warehouse Supervisor", &[4, 5, 19]),
    ("Safety Officer", &[15, 16, 12, 13]),
];

pub fn default_units() -> Vec<Unit> {
    DEFAULT_UNITS
        .iter()
        .map(|(id, name)| Unit::new(*id, *name))
        .collect()
}

pub fn default_presets() -> Vec<Preset> {
    DEFAULT_PRESETS
        .iter()
        .map(|(label, ids)| Preset::new(*label, ids.to_vec()))
        .collect()
}

/// A named shortcut for a predefined set of units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preset {
    pub label: String,
    pub unit_ids: Vec<u32>,
}

impl Preset {
    pub fn new(label: impl Into<String>, unit_ids: Vec<u32>) -> Self {
        Self {
            label: label.into(),
            unit_ids,
        }
    }
}

/// How a message that is not an exact unit name is resolved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPolicy {
    /// First unit in catalog order whose name contains the text or is
    /// contained in it.
    #[default]
    FirstMatch,
    /// Substring matches count only when exactly one unit qualifies.
    RejectAmbiguous,
}

/// Outcome of resolving free text against the catalog.
#[derive(Debug, PartialEq, Eq)]
pub enum UnitMatch<'a> {
    Found(&'a Unit),
    Ambiguous(Vec<&'a Unit>),
    NotFound,
}

/// Catalog snapshot used to classify one message.
#[derive(Debug, Clone)]
pub struct Catalog {
    units: Vec<Unit>,
    presets: Vec<Preset>,
    policy: MatchPolicy,
}

impl Catalog {
    pub fn new(units: Vec<Unit>, presets: Vec<Preset>, policy: MatchPolicy) -> Self {
        Self {
            units,
            presets,
            policy,
        }
    }

    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    pub fn presets(&self) -> &[Preset] {
        &self.presets
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Preset whose label equals the case-folded text.
    pub fn preset(&self, normalized: &str) -> Option<&Preset> {
        self.presets
            .iter()
            .find(|p| p.label.to_lowercase() == normalized)
    }

    /// Units of a preset in preset order; ids missing from the catalog are
    /// dropped.
    pub fn preset_units(&self, preset: &Preset) -> Vec<Unit> {
        preset
            .unit_ids
            .iter()
            .filter_map(|id| self.units.iter().find(|u| u.id == *id))
            .cloned()
            .collect()
    }

    /// Resolve trimmed message text to a unit: exact name first, then
    /// case-sensitive substring in either direction.
    pub fn resolve(&self, text: &str) -> UnitMatch<'_> {
        if text.is_empty() {
            return UnitMatch::NotFound;
        }

        if let Some(unit) = self.units.iter().find(|u| u.name == text) {
            return UnitMatch::Found(unit);
        }

        let mut candidates = self
            .units
            .iter()
            .filter(|u| !u.name.is_empty() && (text.contains(u.name.as_str()) || u.name.contains(text)));

        match self.policy {
            MatchPolicy::FirstMatch => candidates
                .next()
                .map_or(UnitMatch::NotFound, UnitMatch::Found),
            MatchPolicy::RejectAmbiguous => {
                let candidates: Vec<&Unit> = candidates.collect();
                match candidates.len() {
                    0 => UnitMatch::NotFound,
                    1 => UnitMatch::Found(candidates[0]),
                    _ => UnitMatch::Ambiguous(candidates),
                }
            }
        }
    }
}
