use crate::models::Commuter;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

/// Minimum population for two-way clustering
pub const MIN_ROSTER_SIZE: usize = 2;

/// Errors raised while loading or validating the reference roster
#[derive(Debug, Error)]
pub enum RosterError {
    #[error("Failed to read roster file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse roster file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Roster needs at least {min} commuters, found {found}")]
    TooSmall { min: usize, found: usize },

    #[error("Duplicate commuter id {0} in roster")]
    DuplicateId(u32),

    #[error("Commuter {0} has an invalid home or work coordinate")]
    InvalidCoordinate(u32),

    #[error("Commuter id {0} is reserved for query commuters")]
    ReservedId(u32),
}

/// Fixed reference population of known commuters
///
/// A roster is validated once on construction and is read-only afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Roster {
    commuters: Vec<Commuter>,
}

#[derive(Deserialize)]
struct RosterFile {
    commuters: Vec<Commuter>,
}

impl Roster {
    pub fn new(commuters: Vec<Commuter>) -> Result<Self, RosterError> {
        if commuters.len() < MIN_ROSTER_SIZE {
            return Err(RosterError::TooSmall {
                min: MIN_ROSTER_SIZE,
                found: commuters.len(),
            });
        }

        let mut seen = HashSet::with_capacity(commuters.len());
        for commuter in &commuters {
            if commuter.id == u32::MAX {
                return Err(RosterError::ReservedId(commuter.id));
            }
            if !seen.insert(commuter.id) {
                return Err(RosterError::DuplicateId(commuter.id));
            }
            if !commuter.home.is_valid() || !commuter.work.is_valid() {
                return Err(RosterError::InvalidCoordinate(commuter.id));
            }
        }

        Ok(Self { commuters })
    }

    /// Parse a roster from TOML seed data (`[[commuters]]` tables)
    pub fn from_toml_str(source: &str) -> Result<Self, RosterError> {
        let file: RosterFile = toml::from_str(source)?;
        Self::new(file.commuters)
    }

    /// Load a roster from a TOML seed-data file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, RosterError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    pub fn commuters(&self) -> &[Commuter] {
        &self.commuters
    }

    pub fn len(&self) -> usize {
        self.commuters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commuters.is_empty()
    }

    pub fn contains_id(&self, id: u32) -> bool {
        self.commuters.iter().any(|c| c.id == id)
    }

    /// Id for a transient query commuter, guaranteed not to collide with the roster
    ///
    /// `Roster::new` rejects `u32::MAX`, so `max + 1` always fits.
    pub fn next_id(&self) -> u32 {
        self.commuters
            .iter()
            .map(|c| c.id)
            .max()
            .map_or(1, |max| max + 1)
    }
}
