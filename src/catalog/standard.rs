//! Built-in ruleset used by the runner and the tests
//!
//! Ids are assigned by position, so the order of the tables below is part
//! of the ruleset.

use super::*;
use crate::core::types::{AttackType, WeaponClass};

pub mod ids {
    //! Well-known ids of the standard catalog

    use crate::core::types::{EffectId, ItemId, SkillId, SpecialId};

    pub const COMBAT: SkillId = SkillId(0);
    pub const RIDING: SkillId = SkillId(1);
    pub const CROSSBOW: SkillId = SkillId(2);
    pub const LONGBOW: SkillId = SkillId(3);
    pub const TACTICS: SkillId = SkillId(4);
    pub const HEALING: SkillId = SkillId(5);
    pub const MAGICAL_HEALING: SkillId = SkillId(6);
    pub const FIRE: SkillId = SkillId(7);
    pub const FEAR: SkillId = SkillId(8);
    pub const FORCE_SHIELD: SkillId = SkillId(9);
    pub const DISPEL_ILLUSIONS: SkillId = SkillId(10);

    pub const DAZZLE: EffectId = EffectId(0);
    pub const FRIGHT: EffectId = EffectId(1);
    pub const COURAGE: EffectId = EffectId(2);

    pub const FIREBALL: SpecialId = SpecialId(0);
    pub const AURA_OF_FEAR: SpecialId = SpecialId(1);
    pub const ENERGY_SHIELD: SpecialId = SpecialId(2);
    pub const DAZZLING_LIGHT: SpecialId = SpecialId(3);
    pub const SPIRIT_WARD: SpecialId = SpecialId(4);
    pub const DISPEL: SpecialId = SpecialId(5);
    pub const RALLY: SpecialId = SpecialId(6);

    pub const SILVER: ItemId = ItemId(0);
    pub const LEADER: ItemId = ItemId(1);
    pub const VIKING: ItemId = ItemId(2);
    pub const OGRE: ItemId = ItemId(3);
    pub const SWORD: ItemId = ItemId(4);
    pub const SPEAR: ItemId = ItemId(5);
    pub const PIKE: ItemId = ItemId(6);
    pub const LANCE: ItemId = ItemId(7);
    pub const LONGBOW_ITEM: ItemId = ItemId(8);
    pub const CROSSBOW_ITEM: ItemId = ItemId(9);
    pub const DAGGER: ItemId = ItemId(10);
    pub const LEATHER: ItemId = ItemId(11);
    pub const CHAIN: ItemId = ItemId(12);
    pub const PLATE: ItemId = ItemId(13);
    pub const HORSE: ItemId = ItemId(14);
    pub const WINGED_HORSE: ItemId = ItemId(15);
    pub const AMULET: ItemId = ItemId(16);
    pub const SHIELDSTONE: ItemId = ItemId(17);
    pub const STAFF_OF_LIGHT: ItemId = ItemId(18);
    pub const HERBS: ItemId = ItemId(19);
    pub const HEALING_POTION: ItemId = ItemId(20);
    pub const WOLF: ItemId = ItemId(21);
    pub const TROLL: ItemId = ItemId(22);
    pub const IRON: ItemId = ItemId(23);
    pub const WOOD: ItemId = ItemId(24);
    pub const FUR: ItemId = ItemId(25);
    pub const PEARLS: ItemId = ItemId(26);
    pub const RUNESWORD: ItemId = ItemId(27);
    pub const PHANTOM_WOLF: ItemId = ItemId(28);
    pub const CLOAK: ItemId = ItemId(29);
    pub const WAR_HORN: ItemId = ItemId(30);
}

use ids::*;

impl Catalog {
    /// The standard ruleset
    pub fn standard() -> Self {
        Self {
            items: standard_items(),
            skills: standard_skills(),
            specials: standard_specials(),
            effects: standard_effects(),
            healing: HealingRules {
                herbs: Some(HERBS),
                potion: Some(HEALING_POTION),
                ..HealingRules::default()
            },
            core: CoreSkills {
                combat: COMBAT,
                riding: RIDING,
                tactics: TACTICS,
                healing: HEALING,
                magical_healing: MAGICAL_HEALING,
            },
            silver: Some(SILVER),
        }
    }
}

fn standard_skills() -> Vec<SkillDef> {
    vec![
        SkillDef::new("combat", "COMB"),
        SkillDef::new("riding", "RIDI"),
        SkillDef::new("crossbow", "XBOW"),
        SkillDef::new("longbow", "LBOW"),
        SkillDef::new("tactics", "TACT"),
        SkillDef::new("healing", "HEAL"),
        SkillDef {
            magic: true,
            ..SkillDef::new("magical healing", "MHEA")
        },
        SkillDef::spell("fire", "FIRE", FIREBALL),
        SkillDef::spell("create aura of fear", "FEAR", AURA_OF_FEAR),
        SkillDef::spell("force shield", "FSHI", ENERGY_SHIELD),
        SkillDef::spell("dispel illusions", "DISP", DISPEL),
    ]
}

fn standard_effects() -> Vec<EffectDef> {
    vec![
        EffectDef {
            one_shot: true,
            ..EffectDef::new("dazzle", -2)
        },
        EffectDef {
            defense_mods: vec![DefenseMod {
                attack_type: AttackType::Combat,
                value: -2,
            }],
            ..EffectDef::new("fright", -2)
        },
        EffectDef {
            cancels: Some(FRIGHT),
            ..EffectDef::new("courage", 1)
        },
    ]
}

fn standard_specials() -> Vec<SpecialDef> {
    vec![
        SpecialDef {
            flags: vec![SpecialFlag::UseLevel],
            damage: vec![SpecialDamage::new(
                Some(AttackType::Energy),
                2,
                10,
                WeaponClass::MagicEnergy,
            )],
            description: "shoots a Fireball".into(),
            ..SpecialDef::new("fireball")
        },
        SpecialDef {
            flags: vec![SpecialFlag::UseLevel],
            targets: vec![TargetFilter::NoMonster, TargetFilter::EffectExcept],
            effects: vec![COURAGE],
            damage: vec![SpecialDamage::new(
                Some(AttackType::Spirit),
                2,
                10,
                WeaponClass::MagicSpirit,
            )
            .with_effect(FRIGHT)],
            description: "casts Aura of Fear".into(),
            ..SpecialDef::new("aura of fear")
        },
        SpecialDef {
            flags: vec![SpecialFlag::Shield],
            shields: vec![AttackType::Energy],
            description: "casts Force Shield".into(),
            ..SpecialDef::new("energy shield")
        },
        SpecialDef {
            flags: vec![SpecialFlag::UseLevel],
            damage: vec![
                SpecialDamage::new(None, 2, 4, WeaponClass::MagicEnergy).with_effect(DAZZLE)
            ],
            description: "shines a dazzling light".into(),
            ..SpecialDef::new("dazzling light")
        },
        SpecialDef {
            flags: vec![SpecialFlag::Shield],
            shields: vec![AttackType::Spirit, AttackType::Weather],
            description: "raises a spirit ward".into(),
            ..SpecialDef::new("spirit ward")
        },
        SpecialDef {
            flags: vec![SpecialFlag::UseLevel, SpecialFlag::NoBuilding],
            targets: vec![TargetFilter::Illusion],
            damage: vec![SpecialDamage::new(
                Some(AttackType::Energy),
                0,
                10,
                WeaponClass::MagicEnergy,
            )],
            description: "casts Dispel Illusions".into(),
            ..SpecialDef::new("dispel illusions")
        },
        SpecialDef {
            damage: vec![SpecialDamage::cleansing(FRIGHT, 2, 4)],
            description: "rallies the frightened".into(),
            ..SpecialDef::new("rally")
        },
    ]
}

fn man(name: &str, abbr: &str, hits: i32) -> ItemDef {
    ItemDef {
        man: Some(ManDef { hits }),
        ..ItemDef::new(name, abbr).with_weight(10, 50).with_capacity(15, 0, 0)
    }
}

fn weapon(name: &str, abbr: &str, def: WeaponDef) -> ItemDef {
    ItemDef {
        weapon: Some(def),
        ..ItemDef::new(name, abbr)
            .with_kinds(&[ItemKind::Normal])
            .with_weight(1, 60)
    }
}

fn armor(name: &str, abbr: &str, def: ArmorDef, kind: ItemKind, price: u32) -> ItemDef {
    ItemDef {
        armor: Some(def),
        ..ItemDef::new(name, abbr).with_kinds(&[kind]).with_weight(1, price)
    }
}

fn battle(name: &str, abbr: &str, def: BattleItemDef) -> ItemDef {
    ItemDef {
        battle: Some(def),
        ..ItemDef::new(name, abbr)
            .with_kinds(&[ItemKind::Magic])
            .with_weight(0, 500)
    }
}

fn monster(name: &str, abbr: &str, def: MonsterDef, kinds: &[ItemKind]) -> ItemDef {
    ItemDef {
        monster: Some(def),
        ..ItemDef::new(name, abbr).with_kinds(kinds).with_weight(50, 0)
    }
}

fn standard_items() -> Vec<ItemDef> {
    vec![
        ItemDef::new("silver", "SILV").with_weight(0, 1),
        man("leader", "LEAD", 1),
        man("viking", "VIKI", 1),
        man("ogre", "OGRE", 3),
        weapon("sword", "SWOR", WeaponDef::sword()),
        weapon("spear", "SPEA", WeaponDef::spear()),
        weapon("pike", "PIKE", WeaponDef::pike()),
        weapon("lance", "LANC", WeaponDef::lance()),
        weapon("longbow", "LBOW", WeaponDef::longbow(LONGBOW)),
        weapon("crossbow", "XBOW", WeaponDef::crossbow(CROSSBOW)),
        weapon("dagger", "DAGG", WeaponDef::dagger()),
        armor("leather armor", "LARM", ArmorDef::leather(), ItemKind::Normal, 30),
        armor("chain armor", "CARM", ArmorDef::chain(), ItemKind::Normal, 100),
        armor("plate armor", "PARM", ArmorDef::plate(), ItemKind::Advanced, 400),
        ItemDef {
            mount: Some(MountDef {
                skill: RIDING,
                min_bonus: 1,
                max_bonus: 3,
                max_hampered_bonus: 3,
                special: None,
                special_level: 0,
            }),
            ..ItemDef::new("horse", "HORS")
                .with_kinds(&[ItemKind::Normal])
                .with_weight(50, 50)
                .with_capacity(70, 70, 0)
        },
        ItemDef {
            mount: Some(MountDef {
                skill: RIDING,
                min_bonus: 3,
                max_bonus: 5,
                max_hampered_bonus: 3,
                special: None,
                special_level: 0,
            }),
            ..ItemDef::new("winged horse", "WING")
                .with_kinds(&[ItemKind::Advanced])
                .with_weight(50, 500)
                .with_capacity(70, 70, 70)
        },
        battle(
            "amulet of invulnerability",
            "AOFI",
            BattleItemDef {
                flags: vec![BattleItemFlag::Invulnerability],
                special: None,
                level: 0,
            },
        ),
        battle(
            "shieldstone",
            "SHST",
            BattleItemDef {
                flags: vec![BattleItemFlag::Shield],
                special: Some(SPIRIT_WARD),
                level: 3,
            },
        ),
        battle(
            "staff of light",
            "STAF",
            BattleItemDef {
                flags: vec![BattleItemFlag::MageOnly, BattleItemFlag::Special],
                special: Some(DAZZLING_LIGHT),
                level: 3,
            },
        ),
        ItemDef::new("herbs", "HERB")
            .with_kinds(&[ItemKind::Normal])
            .with_weight(0, 20),
        ItemDef::new("healing potion", "HPOT")
            .with_kinds(&[ItemKind::Magic])
            .with_weight(0, 50),
        monster(
            "wolf",
            "WOLF",
            MonsterDef {
                attack_level: 1,
                defense: [1, 0, 0, 0, 1, 1],
                attacks: 1,
                hits: 1,
                regen: 0,
                tactics: 0,
                special: None,
                special_level: 0,
                silver: 10,
                spoils: Some(ItemKind::Trade),
            },
            &[],
        ),
        monster(
            "troll",
            "TROL",
            MonsterDef {
                attack_level: 3,
                defense: [3, 0, 0, 0, 3, 3],
                attacks: 3,
                hits: 10,
                regen: 5,
                tactics: 1,
                special: None,
                special_level: 0,
                silver: 300,
                spoils: Some(ItemKind::Normal),
            },
            &[],
        ),
        ItemDef::new("iron", "IRON")
            .with_kinds(&[ItemKind::Normal])
            .with_weight(5, 60),
        ItemDef::new("wood", "WOOD")
            .with_kinds(&[ItemKind::Normal])
            .with_weight(5, 50),
        ItemDef::new("fur", "FUR")
            .with_kinds(&[ItemKind::Trade])
            .with_weight(1, 30),
        ItemDef::new("pearls", "PEAR")
            .with_kinds(&[ItemKind::Trade])
            .with_weight(0, 150),
        ItemDef {
            weapon: Some(WeaponDef {
                attack_bonus: 4,
                defense_bonus: 4,
                ..WeaponDef::sword()
            }),
            battle: Some(BattleItemDef {
                flags: vec![BattleItemFlag::Special],
                special: Some(FIREBALL),
                level: 3,
            }),
            ..ItemDef::new("runesword", "RUNE")
                .with_kinds(&[ItemKind::Magic])
                .with_weight(1, 1000)
        },
        monster(
            "phantom wolf",
            "IWOL",
            MonsterDef {
                attack_level: 1,
                defense: [0; AttackType::COUNT],
                attacks: 1,
                hits: 1,
                regen: 0,
                tactics: 0,
                special: None,
                special_level: 0,
                silver: 0,
                spoils: None,
            },
            &[ItemKind::Illusion, ItemKind::Special],
        ),
        armor("cloak of invulnerability", "CLOA", ArmorDef::cloak(), ItemKind::Magic, 2000),
        battle(
            "war horn",
            "HORN",
            BattleItemDef {
                flags: vec![BattleItemFlag::Special],
                special: Some(RALLY),
                level: 1,
            },
        ),
    ]
}
