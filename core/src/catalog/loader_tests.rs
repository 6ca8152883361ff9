//! Tests for catalog construction and pack merging

use std::fs;

use super::*;

#[test]
fn builtin_catalog_has_the_five_encounters_in_ladder_order() {
    let catalog = Catalog::builtin();
    let ids: Vec<&str> = catalog.encounters().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, ["wolf", "troll", "golem", "elemental", "dragon"]);
}

#[test]
fn builtin_wolf_matches_reference_numbers() {
    let catalog = Catalog::builtin();
    let wolf = catalog.encounter("wolf").expect("wolf exists");
    assert_eq!(wolf.base_hp, 200);
    assert_eq!(wolf.base_attack, 20);
    assert_eq!(wolf.base_defense, 0);
    assert!(!wolf.is_boss);
    assert!(wolf.unlocked_by.is_none());
    assert_eq!(wolf.abilities, ["bite", "howl"]);
}

#[test]
fn builtin_dragon_is_a_boss_with_item_chance() {
    let catalog = Catalog::builtin();
    let dragon = catalog.encounter("dragon").expect("dragon exists");
    assert!(dragon.is_boss);
    assert_eq!(dragon.rewards.item_chance, Some(60.0));
    assert_eq!(dragon.unlocked_by.as_deref(), Some("elemental"));
}

#[test]
fn unlock_chain_walks_the_full_ladder() {
    let catalog = Catalog::builtin();
    let mut current = "dragon".to_string();
    let mut chain = vec![current.clone()];
    while let Some(prev) = catalog
        .encounter(&current)
        .and_then(|e| e.unlocked_by.clone())
    {
        chain.push(prev.clone());
        current = prev;
    }
    assert_eq!(chain, ["dragon", "elemental", "golem", "troll", "wolf"]);
}

#[test]
fn kit_resolves_in_declaration_order() {
    let catalog = Catalog::builtin();
    let dragon = catalog.encounter("dragon").expect("dragon exists");
    let kit = catalog.kit_of(dragon);
    let ids: Vec<&str> = kit.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(ids, ["claw_strike", "fire_breath", "sky_rage", "last_breath"]);
}

#[test]
fn pack_file_adds_and_overrides() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(
        dir.path().join("basilisk.toml"),
        r#"
[[ability]]
id = "venom_spit"
name = "Venom Spit"
kind = "single_attack"
freeze_chance = 0.1

[[encounter]]
id = "basilisk"
name = "Cave Basilisk"
level = 3
base_hp = 400
base_attack = 30
abilities = ["venom_spit"]
unlocked_by = "wolf"
rewards = { crystals = [5, 9], gold = [40, 70], exp = [30, 50] }

[[encounter]]
id = "wolf"
name = "Dire Wolf"
level = 1
base_hp = 250
base_attack = 22
abilities = ["bite"]
rewards = { crystals = [2, 4], gold = [20, 35], exp = [15, 25] }
"#,
    )
    .expect("write pack");

    let catalog = Catalog::with_packs(dir.path()).expect("catalog loads");

    let basilisk = catalog.encounter("basilisk").expect("pack encounter");
    assert_eq!(basilisk.base_hp, 400);
    assert_eq!(
        catalog.ability("venom_spit").map(|a| a.kind),
        Some(AbilityKind::SingleAttack)
    );

    // Override keeps ladder position but swaps the data.
    let wolf = catalog.encounter("wolf").expect("wolf exists");
    assert_eq!(wolf.name, "Dire Wolf");
    assert_eq!(wolf.base_hp, 250);
    let ids: Vec<&str> = catalog.encounters().map(|e| e.id.as_str()).collect();
    assert_eq!(ids[0], "wolf");
    assert_eq!(ids.len(), 6);
}

#[test]
fn pack_with_unknown_ability_reference_fails_validation() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(
        dir.path().join("broken.toml"),
        r#"
[[encounter]]
id = "ghost"
name = "Ghost"
level = 2
base_hp = 100
base_attack = 10
abilities = ["spectral_touch"]
rewards = { crystals = [1, 2], gold = [5, 10], exp = [5, 10] }
"#,
    )
    .expect("write pack");

    let err = Catalog::with_packs(dir.path()).expect_err("must fail");
    assert!(matches!(err, CatalogError::UnknownAbility { .. }));
}

#[test]
fn missing_pack_dir_yields_builtin_catalog() {
    let dir = tempfile::tempdir().expect("tempdir");
    let missing = dir.path().join("nope");
    let catalog = Catalog::with_packs(&missing).expect("no packs is fine");
    assert_eq!(catalog.encounters().count(), 5);
}
