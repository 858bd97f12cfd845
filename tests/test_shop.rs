use arena_shooter::catalog::Catalog;
use arena_shooter::config::GameConfig;
use arena_shooter::entities::Player;
use arena_shooter::error::{GameError, PurchaseRefusal};
use arena_shooter::session::new_world;
use arena_shooter::shop::{equip, purchase};

fn make_player(catalog: &Catalog) -> Player {
    new_world(&GameConfig::default(), catalog).player
}

#[test]
fn purchase_deducts_marks_owned_and_equips() {
    let catalog = Catalog::arsenal();
    let mut p = make_player(&catalog);
    purchase(&mut p, "laserCannon").unwrap();
    assert_eq!(p.money, 200);
    assert!(p.inventory.is_owned("laserCannon"));
    assert_eq!(p.inventory.current().id, "laserCannon");
}

#[test]
fn cannot_buy_an_owned_weapon() {
    let catalog = Catalog::arsenal();
    let mut p = make_player(&catalog);
    let err = purchase(&mut p, "plasmaRifle").unwrap_err();
    assert_eq!(
        err,
        GameError::InvalidPurchase {
            weapon: "plasmaRifle".into(),
            reason: PurchaseRefusal::AlreadyOwned,
        }
    );
    assert_eq!(p.money, 2000);
}

#[test]
fn insufficient_funds_leave_state_unchanged() {
    let catalog = Catalog::arsenal();
    let mut p = make_player(&catalog);
    purchase(&mut p, "laserCannon").unwrap();

    let err = purchase(&mut p, "rocketLauncher").unwrap_err();
    assert_eq!(
        err,
        GameError::InvalidPurchase {
            weapon: "rocketLauncher".into(),
            reason: PurchaseRefusal::InsufficientFunds { cost: 2000, money: 200 },
        }
    );
    assert_eq!(p.money, 200);
    assert!(!p.inventory.is_owned("rocketLauncher"));
    assert_eq!(p.inventory.current().id, "laserCannon");
}

#[test]
fn exact_funds_are_enough() {
    let catalog = Catalog::arsenal();
    let mut p = make_player(&catalog);
    purchase(&mut p, "rocketLauncher").unwrap();
    assert_eq!(p.money, 0);
}

#[test]
fn unknown_weapon_is_refused() {
    let catalog = Catalog::classic();
    let mut p = make_player(&catalog);
    let err = purchase(&mut p, "plasmaRifle").unwrap_err();
    assert!(matches!(
        err,
        GameError::InvalidPurchase {
            reason: PurchaseRefusal::UnknownWeapon,
            ..
        }
    ));
}

#[test]
fn equip_requires_ownership() {
    let catalog = Catalog::classic();
    let mut p = make_player(&catalog);
    assert_eq!(
        equip(&mut p, "sniper"),
        Err(GameError::InvalidEquip {
            weapon: "sniper".into()
        })
    );
    assert_eq!(p.inventory.current().id, "pistol");

    purchase(&mut p, "sniper").unwrap();
    equip(&mut p, "pistol").unwrap();
    assert_eq!(p.inventory.current().id, "pistol");
    equip(&mut p, "sniper").unwrap();
    assert_eq!(p.inventory.current().id, "sniper");
}

#[test]
fn refusals_read_well() {
    let err = GameError::InvalidPurchase {
        weapon: "railgun".into(),
        reason: PurchaseRefusal::InsufficientFunds { cost: 2500, money: 10 },
    };
    assert_eq!(err.to_string(), "cannot buy railgun: costs $2500, you have $10");
}
