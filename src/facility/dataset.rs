use serde::{Deserialize, Serialize};

/// Tri-state service availability decoded from the source tokens.
///
/// Only the literal tokens `TRUE`/`FALSE` carry meaning; everything
/// else is `Unknown` — never a guessed boolean.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ServiceFlag {
    Yes,
    No,
    #[default]
    Unknown,
}

impl ServiceFlag {
    pub fn from_token(token: &str) -> Self {
        match token {
            "TRUE" => Self::Yes,
            "FALSE" => Self::No,
            _ => Self::Unknown,
        }
    }

    /// True only for a definite `Yes` — `Unknown` never counts.
    pub fn is_yes(self) -> bool {
        matches!(self, Self::Yes)
    }
}

/// Service availability flags carried by every facility row.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ServiceFlags {
    pub maternal_health: ServiceFlag,
    pub emergency_transport: ServiceFlag,
    pub skilled_birth_attendant: ServiceFlag,
    pub electricity: ServiceFlag,
    pub c_section: ServiceFlag,
    pub improved_water: ServiceFlag,
    pub improved_sanitation: ServiceFlag,
    pub vaccine_storage: ServiceFlag,
    pub antenatal_care: ServiceFlag,
    pub family_planning: ServiceFlag,
    pub malaria_treatment: ServiceFlag,
}

/// One healthcare facility from the external dataset. Never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Facility {
    pub name: String,
    pub facility_type: String,
    pub state: String,
    pub lga: String,
    pub latitude: f64,
    pub longitude: f64,
    pub services: ServiceFlags,
}

/// An immutable, ordered collection of loaded facilities.
///
/// Built once at load time; the query engine only ever reads it.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    facilities: Vec<Facility>,
}

impl Dataset {
    pub(crate) fn new(facilities: Vec<Facility>) -> Self {
        Self { facilities }
    }

    pub fn len(&self) -> usize {
        self.facilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facilities.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Facility> {
        self.facilities.iter()
    }

    pub fn as_slice(&self) -> &[Facility] {
        &self.facilities
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Facility;
    type IntoIter = std::slice::Iter<'a, Facility>;

    fn into_iter(self) -> Self::IntoIter {
        self.facilities.iter()
    }
}
