//! Integration tests for probability primitives and dice.

mod common;

use delve_random::{DiceDef, GeneratorRegistry, RandomExt, StreamId, calc_dice};

const TRIALS: u32 = 50_000;

#[test]
fn test_random2_is_uniform_on_every_stream() {
    let mut registry = common::seeded_registry();
    for stream in StreamId::ALL {
        let source = registry.stream(stream);
        let freq = common::frequencies(6, TRIALS, || usize::try_from(source.random2(6)).unwrap());
        for f in freq {
            common::assert_close(f, 1.0 / 6.0, 0.01);
        }
    }
}

#[test]
fn test_mixed_operand_chances_converge() {
    let mut rng = common::seeded_registry();
    let cases: [(&str, f64, Box<dyn Fn(&mut GeneratorRegistry) -> bool>); 4] = [
        ("int", 0.3, Box::new(|r: &mut GeneratorRegistry| r.x_chance_in_y(3, 10))),
        ("real", 0.3, Box::new(|r: &mut GeneratorRegistry| r.x_chance_in_y(0.3, 1.0))),
        ("real over int", 0.25, Box::new(|r: &mut GeneratorRegistry| r.x_chance_in_y(2.5_f64, 10_i32))),
        ("one in", 0.125, Box::new(|r: &mut GeneratorRegistry| r.one_chance_in(8))),
    ];
    for (name, expected, chance) in &cases {
        let hits = (0..TRIALS).filter(|_| chance(&mut rng)).count();
        let rate = f64::from(u32::try_from(hits).unwrap()) / f64::from(TRIALS);
        assert!((rate - expected).abs() < 0.01, "{name}: rate {rate}");
    }
}

#[test]
fn test_three_d_six_distribution() {
    let mut rng = common::seeded_registry();
    let dice: DiceDef = "3d6".parse().unwrap();
    let mut total = 0i64;
    let mut tens = 0u32;
    for _ in 0..TRIALS {
        let roll = dice.roll(&mut rng);
        assert!((3..=18).contains(&roll));
        total += i64::from(roll);
        if roll == 10 {
            tens += 1;
        }
    }
    #[allow(clippy::cast_precision_loss)]
    let mean = total as f64 / f64::from(TRIALS);
    common::assert_close(mean, dice.average(), 0.05);
    // P(3d6 = 10) = 27 / 216.
    common::assert_close(f64::from(tens) / f64::from(TRIALS), 27.0 / 216.0, 0.008);
}

#[test]
fn test_calc_dice_average_maximum_matches_target() {
    let mut rng = common::seeded_registry();
    let mut max_total = 0i64;
    let n = 10_000;
    for _ in 0..n {
        max_total += i64::from(calc_dice(&mut rng, 3, 20).max());
    }
    #[allow(clippy::cast_precision_loss)]
    let mean_max = max_total as f64 / f64::from(n);
    common::assert_close(mean_max, 20.0, 0.1);
}

#[test]
fn test_averaged_ranges_concentrate_on_midpoint() {
    let mut rng = common::seeded_registry();
    let spread = |rng: &mut GeneratorRegistry, rolls: i32| -> f64 {
        let mut sq = 0.0;
        for _ in 0..TRIALS {
            let d = f64::from(rng.random_range_avg(0, 20, rolls) - 10);
            sq += d * d;
        }
        sq / f64::from(TRIALS)
    };
    let single = spread(&mut rng, 1);
    let triple = spread(&mut rng, 3);
    assert!(triple < single / 2.0, "single {single}, triple {triple}");
}

#[test]
fn test_div_rand_round_is_unbiased() {
    let mut rng = common::seeded_registry();
    let sum: i64 = (0..TRIALS).map(|_| i64::from(rng.div_rand_round(5, 2))).sum();
    #[allow(clippy::cast_precision_loss)]
    let mean = sum as f64 / f64::from(TRIALS);
    common::assert_close(mean, 2.5, 0.02);
}

#[test]
fn test_maybe_family_is_deterministic_when_asked() {
    let mut a = GeneratorRegistry::with_seed(1);
    let mut b = GeneratorRegistry::with_seed(2);
    for (num, size) in [(3, 6), (1, 20), (0, 4)] {
        assert_eq!(a.maybe_roll_dice(num, size, false), b.maybe_roll_dice(num, size, false));
    }
    assert_eq!(a.maybe_random2(9, false), 4);
    assert_eq!(a.maybe_random_div(30, 3, false), 5);
}
