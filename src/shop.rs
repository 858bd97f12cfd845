/// Weapon inventory and the shop operations over it.

use tracing::info;

use crate::catalog::{Catalog, WeaponSpec};
use crate::entities::Player;
use crate::error::{GameError, PurchaseRefusal};

#[derive(Clone, Debug, PartialEq)]
pub struct WeaponSlot {
    pub spec: WeaponSpec,
    pub owned: bool,
}

/// Every catalog weapon with its owned flag, plus the equipped one.
/// The equipped weapon is always owned.
#[derive(Clone, Debug, PartialEq)]
pub struct Inventory {
    slots: Vec<WeaponSlot>,
    current: usize,
}

impl Inventory {
    /// Only the catalog's starting weapon is owned.  Expects a validated
    /// catalog; an unknown starting weapon falls back to the first entry.
    pub fn from_catalog(catalog: &Catalog) -> Self {
        let current = catalog
            .weapons
            .iter()
            .position(|w| w.id == catalog.starting_weapon)
            .unwrap_or(0);
        let slots = catalog
            .weapons
            .iter()
            .enumerate()
            .map(|(i, spec)| WeaponSlot {
                spec: spec.clone(),
                owned: i == current,
            })
            .collect();
        Self { slots, current }
    }

    pub fn current(&self) -> &WeaponSpec {
        &self.slots[self.current].spec
    }

    pub fn slots(&self) -> &[WeaponSlot] {
        &self.slots
    }

    pub fn is_owned(&self, id: &str) -> bool {
        self.index_of(id).is_some_and(|i| self.slots[i].owned)
    }

    fn index_of(&self, id: &str) -> Option<usize> {
        self.slots.iter().position(|s| s.spec.id == id)
    }
}

/// Buy `id`: deducts the cost, marks it owned and equips it.
pub fn purchase(player: &mut Player, id: &str) -> Result<(), GameError> {
    let refuse = |reason| GameError::InvalidPurchase {
        weapon: id.to_string(),
        reason,
    };
    let index = player
        .inventory
        .index_of(id)
        .ok_or_else(|| refuse(PurchaseRefusal::UnknownWeapon))?;
    let slot = &player.inventory.slots[index];
    if slot.owned {
        return Err(refuse(PurchaseRefusal::AlreadyOwned));
    }
    let cost = slot.spec.cost;
    if player.money < cost {
        return Err(refuse(PurchaseRefusal::InsufficientFunds {
            cost,
            money: player.money,
        }));
    }

    player.money -= cost;
    player.inventory.slots[index].owned = true;
    player.inventory.current = index;
    info!(weapon = id, cost, money = player.money, "weapon purchased");
    Ok(())
}

pub fn equip(player: &mut Player, id: &str) -> Result<(), GameError> {
    match player.inventory.index_of(id) {
        Some(index) if player.inventory.slots[index].owned => {
            player.inventory.current = index;
            Ok(())
        }
        _ => Err(GameError::InvalidEquip {
            weapon: id.to_string(),
        }),
    }
}
