use combat_odds::{
    damage_pmf, simulate_combat, simulate_sequence, Attack, Combatant, DamageParams,
    HealthState, SearchConfig, UnitStats, UnitTable,
};
use proptest::prelude::*;

fn params() -> impl Strategy<Value = DamageParams> {
    (0..150i32, 0..=100i32, 0..=100i32, -0.2f64..0.4, 1.0f64..2.5).prop_map(
        |(base_damage, atk_health, def_health, terrain_defense, crit_multiplier)| DamageParams {
            base_damage,
            atk_health,
            def_health,
            terrain_defense,
            crit_multiplier,
        },
    )
}

fn table() -> UnitTable {
    UnitTable::new()
        .with_unit(
            "soldier",
            UnitStats::new(1.5, true)
                .with_damage("soldier", 55)
                .with_damage("knight", 25),
        )
        .with_unit(
            "knight",
            UnitStats::new(1.5, true)
                .with_damage("soldier", 75)
                .with_damage("knight", 55),
        )
}

proptest! {
    #[test]
    fn damage_never_decreases_with_luck(p in params(), a in 0.0f64..1.0, b in 0.0f64..1.0) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(p.damage(lo) <= p.damage(hi));
    }

    #[test]
    fn pmf_is_normalized(p in params(), depth in 1u32..=4) {
        let pmf = damage_pmf(&p, &SearchConfig::with_depth(depth)).unwrap();
        prop_assert!(!pmf.is_empty());
        prop_assert!(pmf.iter().all(|(_, mass)| (0.0..=1.0).contains(&mass)));
        prop_assert!((pmf.total() - 1.0).abs() <= 10f64.powi(-(depth as i32)));
    }

    #[test]
    fn real_hits_never_bottom_out_at_zero(p in params()) {
        let pmf = damage_pmf(&p, &SearchConfig::default()).unwrap();
        if p.raw(0.0) > 0.001 {
            prop_assert!(pmf.min_damage().unwrap() >= 1);
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn exchange_is_normalized(
        atk_health in 1..=100i32,
        def_health in 1..=100i32,
        atk_terrain in -0.2f64..0.4,
        def_terrain in -0.2f64..0.4,
        knight_attacks in any::<bool>(),
        crit in any::<bool>(),
    ) {
        let table = table();
        let (atk_name, def_name) = if knight_attacks { ("knight", "soldier") } else { ("soldier", "knight") };
        let atk = Combatant::new(table.spawn(atk_name, atk_health).unwrap(), atk_terrain).with_crit(crit);
        let def = Combatant::new(table.spawn(def_name, def_health).unwrap(), def_terrain);
        let dist = simulate_combat(&table, &atk, &def, &SearchConfig::with_depth(3)).unwrap();

        prop_assert!((dist.total() - 1.0).abs() < 1e-9);
        for ((a, d), _) in dist.iter() {
            prop_assert!((0..=atk_health).contains(&a));
            prop_assert!((0..=def_health).contains(&d));
        }
    }

    #[test]
    fn sequence_conserves_mass(
        def_health in 1..=100i32,
        attackers in prop::collection::vec((1..=100i32, any::<bool>()), 1..4),
    ) {
        let table = table();
        let def = Combatant::new(table.spawn("soldier", def_health).unwrap(), 0.1);
        let attacks: Vec<Attack> = attackers
            .iter()
            .map(|&(health, lethal)| Attack {
                attacker: Combatant::new(table.spawn("knight", health).unwrap(), 0.0),
                requires_lethal: lethal,
            })
            .collect();
        let history = simulate_sequence(&table, &def, &attacks, &SearchConfig::with_depth(2)).unwrap();

        prop_assert_eq!(history.len(), attacks.len() + 1);
        for pair in history.steps().windows(2) {
            let (before, after) = (&pair[0], &pair[1]);
            prop_assert!((after.total() - 1.0).abs() < 1e-9);
            for (state, p) in before.iter() {
                if state.is_terminal() {
                    prop_assert!(after.get(state) >= p - 1e-12);
                }
            }
        }
        prop_assert!(history.iter().all(|d| d.get(HealthState::Alive(0)) == 0.0));
    }
}
