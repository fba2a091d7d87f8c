use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::dataset::{Dataset, Facility, ServiceFlag, ServiceFlags};

/// Number of states in Nigeria — a domain constant, never inferred
/// from whatever subset the dataset happens to cover.
pub const NIGERIA_STATE_COUNT: usize = 36;

/// Type sentinel meaning "no type filter".
pub const ALL_TYPES: &str = "All";

/// The named services a caller can filter on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Service {
    MaternalHealth,
    EmergencyTransport,
    FamilyPlanning,
    MalariaTreatment,
}

impl Service {
    pub fn label(&self) -> &'static str {
        match self {
            Self::MaternalHealth => "Maternal Health",
            Self::EmergencyTransport => "Emergency Transport",
            Self::FamilyPlanning => "Family Planning",
            Self::MalariaTreatment => "Malaria Treatment",
        }
    }

    fn flag(&self, services: &ServiceFlags) -> ServiceFlag {
        match self {
            Self::MaternalHealth => services.maternal_health,
            Self::EmergencyTransport => services.emergency_transport,
            Self::FamilyPlanning => services.family_planning,
            Self::MalariaTreatment => services.malaria_treatment,
        }
    }
}

/// Which predicates to apply to a dataset. `Default` matches everything;
/// empty and sentinel values are no-ops, never zero-result filters.
#[derive(Debug, Clone, Default)]
pub struct FilterSpec {
    /// Exact match on the type display label; `None` or "All" disables.
    pub facility_type: Option<String>,
    /// A facility must have every requested service flag definitely set.
    pub services: BTreeSet<Service>,
    /// Case-insensitive substring over name, state and LGA.
    pub search_term: Option<String>,
    /// Exact-match region filters. `lga` is meaningful alongside `state`,
    /// but is applied independently if supplied alone.
    pub state: Option<String>,
    pub lga: Option<String>,
}

impl FilterSpec {
    pub fn with_state(state: impl Into<String>) -> Self {
        Self {
            state: Some(state.into()),
            ..Self::default()
        }
    }
}

/// Narrow a dataset to the rows matching every predicate in the spec.
///
/// Stable: result rows keep their input order. The result is always a
/// subset of the input — filtering never invents rows.
pub fn filter(dataset: &Dataset, spec: &FilterSpec) -> Dataset {
    let needle = spec
        .search_term
        .as_deref()
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase);

    let matching = dataset
        .iter()
        .filter(|f| matches(f, spec, needle.as_deref()))
        .cloned()
        .collect();
    Dataset::new(matching)
}

fn matches(facility: &Facility, spec: &FilterSpec, needle: Option<&str>) -> bool {
    if let Some(wanted) = spec.facility_type.as_deref() {
        if wanted != ALL_TYPES && !wanted.is_empty() && facility.facility_type != wanted {
            return false;
        }
    }

    // AND across requested services: a partial match is no match.
    if !spec.services.iter().all(|s| s.flag(&facility.services).is_yes()) {
        return false;
    }

    if let Some(state) = spec.state.as_deref() {
        if !state.is_empty() && facility.state != state {
            return false;
        }
    }

    if let Some(lga) = spec.lga.as_deref() {
        if !lga.is_empty() && facility.lga != lga {
            return false;
        }
    }

    if let Some(needle) = needle {
        let hit = facility.name.to_lowercase().contains(needle)
            || facility.state.to_lowercase().contains(needle)
            || facility.lga.to_lowercase().contains(needle);
        if !hit {
            return false;
        }
    }

    true
}

/// Headline numbers for a loaded dataset.
#[derive(Debug, Clone, Serialize)]
pub struct DatasetStats {
    pub total_facilities: usize,
    pub facility_types: BTreeMap<String, usize>,
    pub states: usize,
    pub lgas: usize,
    pub with_electricity: usize,
    pub with_water: usize,
    pub with_emergency: usize,
}

pub fn stats(dataset: &Dataset) -> DatasetStats {
    let mut facility_types: BTreeMap<String, usize> = BTreeMap::new();
    let mut lgas = BTreeSet::new();
    let mut with_electricity = 0;
    let mut with_water = 0;
    let mut with_emergency = 0;

    for facility in dataset {
        *facility_types.entry(facility.facility_type.clone()).or_default() += 1;
        lgas.insert(facility.lga.as_str());
        if facility.services.electricity.is_yes() {
            with_electricity += 1;
        }
        if facility.services.improved_water.is_yes() {
            with_water += 1;
        }
        if facility.services.emergency_transport.is_yes() {
            with_emergency += 1;
        }
    }

    DatasetStats {
        total_facilities: dataset.len(),
        facility_types,
        states: NIGERIA_STATE_COUNT,
        lgas: lgas.len(),
        with_electricity,
        with_water,
        with_emergency,
    }
}

/// Distinct states and their LGAs, both sorted, for region pickers.
#[derive(Debug, Clone, Serialize)]
pub struct LocationOptions {
    pub states: Vec<String>,
    pub lgas_by_state: BTreeMap<String, Vec<String>>,
}

pub fn location_options(dataset: &Dataset) -> LocationOptions {
    let mut lga_sets: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    for facility in dataset {
        lga_sets
            .entry(facility.state.clone())
            .or_default()
            .insert(facility.lga.clone());
    }

    LocationOptions {
        states: lga_sets.keys().cloned().collect(),
        lgas_by_state: lga_sets
            .into_iter()
            .map(|(state, lgas)| (state, lgas.into_iter().collect()))
            .collect(),
    }
}
