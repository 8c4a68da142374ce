use super::*;

const HALF: i64 = 1 << 31;
const ONE: i64 = 1 << 32;

fn close(a: i64, b: i64, tol: i64) -> bool {
    (a - b).abs() <= tol
}

#[test]
fn key_angles() {
    assert_eq!(sin_pi(0), 0);
    assert_eq!(sin_pi(HALF), ONE_Q30);
    assert_eq!(sin_pi(ONE), 0);
    assert_eq!(sin_pi(ONE + HALF), -ONE_Q30);
    assert_eq!(sin_pi(-HALF), -ONE_Q30);
}

#[test]
fn interpolation_is_accurate() {
    // sin(pi / 6) = 0.5
    let x = ONE / 6;
    assert!(close(sin_pi(x), ONE_Q30 / 2, 1 << 16), "{}", sin_pi(x));
    // sin(pi / 4) = 0.7071
    let x = ONE / 4;
    assert!(close(sin_pi(x), 759_250_125, 1 << 12), "{}", sin_pi(x));
}

#[test]
fn sine_is_odd_and_periodic() {
    for x in [1i64 << 20, 3 << 28, 5 << 30, 7 << 29] {
        assert_eq!(sin_pi(-x), -sin_pi(x));
        assert_eq!(sin_pi(x + 2 * ONE), sin_pi(x));
    }
}

#[test]
fn sinc_at_integers_vanishes() {
    assert_eq!(sinc(0), ONE_Q30);
    for k in 1..5i64 {
        assert_eq!(sinc(k * ONE), 0);
        assert_eq!(sinc(-k * ONE), 0);
    }
}

#[test]
fn sinc_at_half() {
    // sinc(0.5) = 2 / pi = 0.63662
    let v = sinc(HALF);
    assert!(close(v, 683_565_276, 1 << 12), "{v}");
    assert_eq!(sinc(-HALF), v);
}
