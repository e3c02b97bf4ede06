use labyrinth::{Cave, CaveRules, MazeRng};

fn cross_pattern() -> Cave {
    let mut cave = Cave::new(3, 3).unwrap();
    for (r, c) in [(0, 0), (0, 2), (1, 1), (2, 0), (2, 2)] {
        cave.set_alive(r, c, true);
    }
    cave
}

#[test]
fn test_generate_extremes() {
    let mut rng = MazeRng::seeded(12);
    let mut cave = Cave::new(20, 30).unwrap();

    cave.generate(0.0, &mut rng);
    assert_eq!(cave.alive_count(), 0);

    cave.generate(1.0, &mut rng);
    assert_eq!(cave.alive_count(), 600);
}

#[test]
fn test_cross_pattern_step() {
    let mut cave = cross_pattern();
    let stable = cave.step(CaveRules::new(3, 2).unwrap());

    assert!(!stable);
    for (r, c) in [(0, 0), (0, 1), (1, 0), (1, 1), (2, 2)] {
        assert!(cave.is_alive(r, c), "({}, {}) should be alive", r, c);
    }
}

#[test]
fn test_death_threshold_toggles_center() {
    let mut survives = cross_pattern();
    survives.step(CaveRules::new(3, 4).unwrap());
    assert!(survives.is_alive(1, 1));

    let mut dies = cross_pattern();
    dies.step(CaveRules::new(3, 5).unwrap());
    assert!(!dies.is_alive(1, 1));
}

#[test]
fn test_empty_cave_fills_from_border() {
    // Off-grid neighbours count as alive, so corners see five of them
    let mut cave = Cave::new(5, 5).unwrap();
    cave.step(CaveRules::new(4, 3).unwrap());
    assert!(cave.is_alive(0, 0));
    assert!(cave.is_alive(4, 4));
    assert!(!cave.is_alive(2, 2));
}

#[test]
fn test_run_until_stable() {
    let mut rng = MazeRng::seeded(21);
    let mut cave = Cave::new(30, 30).unwrap();
    cave.generate(0.5, &mut rng);

    let rules = CaveRules::default();
    let generations = cave
        .run_until_stable(rules, 1000)
        .expect("seeded cave settles well before the cap");
    assert!(generations >= 1);

    let settled = cave.clone();
    assert!(cave.step(rules));
    assert_eq!(cave.cells(), settled.cells());
}

#[test]
fn test_run_until_stable_respects_cap() {
    let mut cave = cross_pattern();
    assert_eq!(cave.run_until_stable(CaveRules::new(3, 2).unwrap(), 0), None);
    assert_eq!(cave.cells(), cross_pattern().cells());
}
