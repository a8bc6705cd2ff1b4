use approx::assert_abs_diff_eq;

use seismichazard::magdist::gutenbergrichtermagfreqdist::GutenbergRichterMagFreqDist;
use seismichazard::magdist::magfreqdisterror::MagFreqDistError;

fn expected_rate(a: f64, b: f64, mag: f64, delta: f64) -> f64 {
    10.0_f64.powf(a - b * (mag - delta / 2.0)) - 10.0_f64.powf(a - b * (mag + delta / 2.0))
}

#[test]
fn increment_mag_upper_round_trip() {
    let tcr = 123.0;
    let b_value = 2.0;
    let min = 10.3;
    let max = 15.7;
    let delta = 0.6;
    let num = 10;

    let mut mfd = GutenbergRichterMagFreqDist::new(b_value, tcr, min, max, num).unwrap();
    assert_abs_diff_eq!(mfd.mag_upper(), max, epsilon = 1e-5);
    assert_abs_diff_eq!(mfd.mag_lower(), min, epsilon = 1e-5);
    assert_eq!(mfd.num(), num);
    assert_abs_diff_eq!(mfd.delta(), delta, epsilon = 1e-6);
    assert_abs_diff_eq!(mfd.tot_cum_rate(), tcr, epsilon = 1e-5);
    let tmr = mfd.total_moment_rate();
    let a = mfd.a_value();

    mfd.increment_mag_upper(2.3).unwrap();
    assert_abs_diff_eq!(mfd.mag_upper(), 18.1, epsilon = 1e-5);
    assert_abs_diff_eq!(mfd.mag_lower(), min, epsilon = 1e-5);
    assert_eq!(mfd.num(), num + 4);
    assert_abs_diff_eq!(mfd.delta(), delta, epsilon = 1e-6);
    assert_abs_diff_eq!(mfd.b_value(), 2.0, epsilon = 1e-5);
    assert_abs_diff_eq!(mfd.total_moment_rate(), tmr, epsilon = 1e15);

    mfd.increment_mag_upper(-2.65).unwrap();
    assert_abs_diff_eq!(mfd.mag_upper(), max, epsilon = 1e-5);
    assert_abs_diff_eq!(mfd.mag_lower(), min, epsilon = 1e-5);
    assert_eq!(mfd.num(), num);
    assert_abs_diff_eq!(mfd.delta(), delta, epsilon = 1e-6);
    assert_abs_diff_eq!(mfd.b_value(), 2.0, epsilon = 1e-5);
    assert_abs_diff_eq!(mfd.total_moment_rate(), tmr, epsilon = 1e15);
    assert_abs_diff_eq!(mfd.tot_cum_rate(), tcr, epsilon = 1e-5);
    assert_eq!(mfd.a_value(), a);
}

#[test]
fn set_mag_upper_snaps_to_grid() {
    let tcr = 3.0;
    let b = 4.0;
    let min = 2.0 + 0.0125;
    let max = 4.0 - 0.0125;
    let num = 80;
    let delta = 0.025;

    let mut mfd = GutenbergRichterMagFreqDist::new(b, tcr, min, max, num).unwrap();
    assert_abs_diff_eq!(mfd.delta(), delta, epsilon = 1e-6);
    assert_eq!(mfd.num(), num);
    let tmr = mfd.total_moment_rate();
    let a = mfd.a_value();

    mfd.set_mag_upper(3.7).unwrap();
    assert_eq!(mfd.mag_lower(), min);
    assert_abs_diff_eq!(mfd.delta(), delta, epsilon = 1e-6);
    assert_eq!(mfd.mag_upper(), 3.6875);
    assert_eq!(mfd.num(), 68);

    for i in 0..mfd.num() {
        let computed = mfd.y(i).unwrap();
        let expected = expected_rate(a, b, mfd.x(i).unwrap(), delta);
        assert_abs_diff_eq!(computed, expected, epsilon = 1e-5);
    }

    mfd.set_mag_upper(4.0).unwrap();
    assert_eq!(mfd.mag_lower(), min);
    assert_eq!(mfd.mag_upper(), max);
    assert_abs_diff_eq!(mfd.b_value(), b, epsilon = 1e-5);
    assert_abs_diff_eq!(mfd.total_moment_rate(), tmr, epsilon = 1e15);
    assert_abs_diff_eq!(mfd.a_value(), a, epsilon = 1e-2);
    assert_abs_diff_eq!(mfd.tot_cum_rate(), tcr, epsilon = 1e-1);
    assert_abs_diff_eq!(mfd.delta(), delta, epsilon = 1e-6);
}

#[test]
fn a_value_is_recovered_from_cum_rate() {
    let a = 14.4;
    let b = 4.5;
    let min = 3.0;
    let max = 6.0;
    let num = 250;

    let delta = (max - min + 1.0) / num as f64;
    assert_abs_diff_eq!(delta, 0.016, epsilon = 1e-3);

    let tcr = 10.0_f64.powf(a - b * (min - delta / 2.0)) - 10.0_f64.powf(a - b * (max + delta / 2.0));
    assert_abs_diff_eq!(tcr, 8.63, epsilon = 1e-2);

    let mfd = GutenbergRichterMagFreqDist::new(b, tcr, min, max, num).unwrap();
    assert_abs_diff_eq!(mfd.a_value(), 14.4, epsilon = 1e-2);
}

#[test]
fn set_ab_keeps_range() {
    let mut mfd = GutenbergRichterMagFreqDist::new(7.3, 12.0, 5.0, 7.0, 100).unwrap();
    mfd.set_ab(22.0, 15.0).unwrap();

    assert_abs_diff_eq!(mfd.a_value(), 22.0, epsilon = 1e-2);
    assert_eq!(mfd.b_value(), 15.0);
    assert_eq!(mfd.mag_lower(), 5.0);
    assert_eq!(mfd.mag_upper(), 7.0);
    assert_abs_diff_eq!(mfd.delta(), 0.02, epsilon = 1e-3);
    assert_eq!(mfd.num(), 100);

    let delta = mfd.delta();
    for i in 0..mfd.num() {
        let expected = expected_rate(22.0, 15.0, mfd.x(i).unwrap(), delta);
        assert_abs_diff_eq!(mfd.y(i).unwrap(), expected, epsilon = 1e-5);
    }
}

#[test]
fn increment_b_keeps_moment_rate() {
    let mut mfd = GutenbergRichterMagFreqDist::new(2.2, 5.0, 1.0, 4.0, 4).unwrap();
    let old_tmr = mfd.total_moment_rate();
    mfd.increment_b(-0.4).unwrap();

    assert_eq!(mfd.b_value(), 2.2 - 0.4);
    assert_eq!(mfd.mag_lower(), 1.0);
    assert_eq!(mfd.mag_upper(), 4.0);
    assert_eq!(mfd.delta(), 1.0);
    assert_abs_diff_eq!(mfd.total_moment_rate(), old_tmr, epsilon = 1e8);
}

#[test]
fn invalid_parameters_are_reported() {
    for (b, tcr, min, max, num) in [
        (1.0, 5.0, 5.0, 7.0, 1),
        (1.0, 5.0, 7.0, 7.0, 10),
        (1.0, -2.0, 5.0, 7.0, 10),
        (-1.0, 5.0, 5.0, 7.0, 10)
    ] {
        assert!(matches!(
            GutenbergRichterMagFreqDist::new(b, tcr, min, max, num),
            Err(MagFreqDistError::InvalidParameter(_))
        ));
    }
}

#[test]
fn statistics_match_direct_recomputation_after_mutation() {
    let mut mfd = GutenbergRichterMagFreqDist::new(1.1, 2.5, 5.05, 7.95, 30).unwrap();
    mfd.increment_mag_upper(0.4).unwrap();
    mfd.increment_b(0.2).unwrap();

    let direct_rate: f64 = (0..mfd.num()).map(|i| mfd.y(i).unwrap()).sum();
    let direct_moment: f64 = (0..mfd.num())
        .map(|i| mfd.y(i).unwrap() * 10.0_f64.powf(1.5 * mfd.x(i).unwrap() + 16.05))
        .sum();
    assert!(((mfd.tot_cum_rate() - direct_rate) / direct_rate).abs() < 1e-10);
    assert!(((mfd.total_moment_rate() - direct_moment) / direct_moment).abs() < 1e-10);
}
