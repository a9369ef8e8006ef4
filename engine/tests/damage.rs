use combat_odds::DamageParams;

fn params(base_damage: i32, atk_health: i32, terrain_defense: f64, crit: f64) -> DamageParams {
    DamageParams {
        base_damage,
        atk_health,
        def_health: 100,
        terrain_defense,
        crit_multiplier: crit,
    }
}

#[test]
fn luck_swing_is_ten_points_at_full_health() {
    let p = params(55, 100, 0.0, 1.0);
    assert_eq!(p.damage(0.0), 55);
    assert_eq!(p.damage(1.0), 65);
}

#[test]
fn crit_keeps_swing_width_and_centre() {
    // 2x crit: luck bonus spans 0.025..0.075 before the multiplier.
    let p = params(55, 100, 0.0, 2.0);
    assert_eq!(p.damage(0.0), 115);
    assert_eq!(p.damage(1.0), 125);
}

#[test]
fn terrain_shifts_damage_toward_the_favoured_side() {
    let open = params(55, 100, 0.0, 1.0).damage(0.5);
    let forest = params(55, 100, 0.3, 1.0).damage(0.5);
    let swamp = params(55, 100, -0.2, 1.0).damage(0.5);
    assert!(forest < open);
    assert!(swamp > open);
}

#[test]
fn any_real_hit_deals_at_least_one() {
    let p = params(20, 1, 0.0, 1.0);
    assert!(p.raw(0.0) > 0.001);
    assert_eq!(p.damage(0.0), 1);
    assert_eq!(p.damage(0.99), 1);
}

#[test]
fn dead_attacker_deals_nothing() {
    let p = params(55, 0, 0.0, 1.0);
    assert_eq!(p.damage(0.0), 0);
    assert_eq!(p.damage(1.0), 0);
}

#[test]
fn batch_matches_scalar() {
    let p = params(73, 64, 0.2, 1.5);
    let lucks = [0.0, 0.13, 0.5, 0.77, 0.999];
    let batch = p.damage_many(&lucks);
    let scalar: Vec<i32> = lucks.iter().map(|&l| p.damage(l)).collect();
    assert_eq!(batch, scalar);
}
