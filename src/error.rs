use std::fmt;

use crate::entities::PowerUpKind;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PurchaseRefusal {
    UnknownWeapon,
    AlreadyOwned,
    InsufficientFunds { cost: u32, money: u32 },
}

impl fmt::Display for PurchaseRefusal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownWeapon => write!(f, "no such weapon"),
            Self::AlreadyOwned => write!(f, "already owned"),
            Self::InsufficientFunds { cost, money } => {
                write!(f, "costs ${cost}, you have ${money}")
            }
        }
    }
}

/// Rejected operations.  None of these are fatal: the caller reports them
/// and carries on with the state unchanged.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameError {
    InvalidPurchase {
        weapon: String,
        reason: PurchaseRefusal,
    },
    InvalidEquip { weapon: String },
    SessionNotRunning,
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPurchase { weapon, reason } => {
                write!(f, "cannot buy {weapon}: {reason}")
            }
            Self::InvalidEquip { weapon } => write!(f, "cannot equip {weapon}: not owned"),
            Self::SessionNotRunning => write!(f, "session is not running"),
        }
    }
}

impl std::error::Error for GameError {}

/// Problems with a weapon / power-up catalog, raised only while loading it.
#[derive(Debug)]
pub enum CatalogError {
    Parse(serde_json::Error),
    NoWeapons,
    DuplicateWeapon { id: String },
    ZeroFireRate { id: String },
    UnknownStartingWeapon { id: String },
    NoPowerUps,
    DuplicatePowerUp { kind: PowerUpKind },
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(e) => write!(f, "invalid catalog json: {e}"),
            Self::NoWeapons => write!(f, "catalog lists no weapons"),
            Self::DuplicateWeapon { id } => write!(f, "weapon id {id} appears twice"),
            Self::ZeroFireRate { id } => write!(f, "weapon {id} has a zero fire rate"),
            Self::UnknownStartingWeapon { id } => {
                write!(f, "starting weapon {id} is not in the catalog")
            }
            Self::NoPowerUps => write!(f, "catalog lists no power-ups"),
            Self::DuplicatePowerUp { kind } => write!(f, "power-up {kind:?} appears twice"),
        }
    }
}

impl std::error::Error for CatalogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e)
    }
}
