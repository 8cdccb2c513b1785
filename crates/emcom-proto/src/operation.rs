//! Emergency operation kinds and role levels.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// An emergency operation that must be requested and then approved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationType {
    /// Distribuição de Recursos de Emergência (resource distribution).
    Dre,
    /// Ativação de Comunicações de Emergência (emergency comms activation).
    Ace,
    /// Operação de Evacuação em Massa (mass evacuation).
    Oem,
}

impl OperationType {
    /// All operation kinds, least to most critical.
    pub const ALL: [OperationType; 3] = [Self::Dre, Self::Ace, Self::Oem];

    /// Wire code (`DRE`, `ACE`, `OEM`).
    pub fn code(&self) -> &'static str {
        match self {
            Self::Dre => "DRE",
            Self::Ace => "ACE",
            Self::Oem => "OEM",
        }
    }
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Error returned for an operation code outside `DRE|ACE|OEM`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown operation type: {0}")]
pub struct UnknownOperation(pub String);

impl FromStr for OperationType {
    type Err = UnknownOperation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|op| op.code().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownOperation(s.to_string()))
    }
}

/// Privilege rank of a user. Higher ranks include every lower privilege.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RoleLevel {
    /// Level 0, profile `todos`.
    Public = 0,
    /// Level 1, profile `Coordenador Regional`.
    RegionalCoordinator = 1,
    /// Level 2, profile `Operador de Nivel Medio`.
    MidLevelOperator = 2,
    /// Level 3, profile `Administrador`.
    Administrator = 3,
}

impl RoleLevel {
    /// Every level, lowest first.
    pub const ALL: [RoleLevel; 4] = [
        Self::Public,
        Self::RegionalCoordinator,
        Self::MidLevelOperator,
        Self::Administrator,
    ];

    /// Numeric level (0-3).
    pub fn level(self) -> u8 {
        self as u8
    }

    /// Look up a level by its number.
    pub fn from_level(level: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.level() == level)
    }

    /// Canonical profile name as written to the user store.
    pub fn profile_name(self) -> &'static str {
        match self {
            Self::Public => "todos",
            Self::RegionalCoordinator => "Coordenador Regional",
            Self::MidLevelOperator => "Operador de Nivel Medio",
            Self::Administrator => "Administrador",
        }
    }

    /// Map a profile name (case-insensitive) to its level.
    pub fn from_profile(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|r| r.profile_name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for RoleLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.profile_name())
    }
}
