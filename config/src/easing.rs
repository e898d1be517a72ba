//! Easing curves used by [`crate::AnimationDefinition`].
//!
//! Shipped as a closed enum of pure functions rather than boxed callbacks:
//! every curve is `(t, params) -> eased_t` with `t` and the result both in
//! `[0.0, 1.0]` (callers are responsible for clamping out-of-range `t`).

use serde::Deserialize;

/// Extra parameters a handful of curves (the cubic-bezier family and the
/// spring-like ones) need beyond `t`. Unused fields are ignored by curves
/// that don't need them, matching the frozen `c1..c4,n1,d1` parameter set
/// named in the config.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct EasingParams {
    pub c1: f64,
    pub c2: f64,
    pub c3: f64,
    pub c4: f64,
    pub n1: f64,
    pub d1: f64,
}

impl Default for EasingParams {
    fn default() -> Self {
        // Defaults reproduce the standard "back" overshoot and the
        // canonical bounce constants used by the named curves below.
        Self {
            c1: 1.70158,
            c2: 1.70158 * 1.525,
            c3: 1.70158 + 1.0,
            c4: (2.0 * std::f64::consts::PI) / 3.0,
            n1: 7.5625,
            d1: 2.75,
        }
    }
}

/// A closed set of named easing curves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Curve {
    Linear,
    EaseInSine,
    EaseOutSine,
    EaseInOutSine,
    EaseInQuad,
    EaseOutQuad,
    EaseInOutQuad,
    EaseInCubic,
    EaseOutCubic,
    EaseInOutCubic,
    EaseInQuart,
    EaseOutQuart,
    EaseInOutQuart,
    EaseInQuint,
    EaseOutQuint,
    EaseInOutQuint,
    EaseInExpo,
    EaseOutExpo,
    EaseInOutExpo,
    EaseInCirc,
    EaseOutCirc,
    EaseInOutCirc,
    EaseInBack,
    EaseOutBack,
    EaseInOutBack,
    EaseInElastic,
    EaseOutElastic,
    EaseInOutElastic,
    EaseInBounce,
    EaseOutBounce,
    EaseInOutBounce,
}

impl Default for Curve {
    fn default() -> Self {
        Curve::EaseOutCubic
    }
}

fn bounce_out(t: f64, p: &EasingParams) -> f64 {
    let n1 = p.n1;
    let d1 = p.d1;
    if t < 1.0 / d1 {
        n1 * t * t
    } else if t < 2.0 / d1 {
        let t = t - 1.5 / d1;
        n1 * t * t + 0.75
    } else if t < 2.5 / d1 {
        let t = t - 2.25 / d1;
        n1 * t * t + 0.9375
    } else {
        let t = t - 2.625 / d1;
        n1 * t * t + 0.984375
    }
}

impl Curve {
    /// Evaluate this curve at progress `t` (expected in `[0.0, 1.0]`).
    pub fn ease(self, t: f64, p: &EasingParams) -> f64 {
        use Curve::*;
        match self {
            Linear => t,
            EaseInSine => 1.0 - (t * std::f64::consts::FRAC_PI_2).cos(),
            EaseOutSine => (t * std::f64::consts::FRAC_PI_2).sin(),
            EaseInOutSine => -((std::f64::consts::PI * t).cos() - 1.0) / 2.0,
            EaseInQuad => t * t,
            EaseOutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            EaseInOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            EaseInCubic => t * t * t,
            EaseOutCubic => 1.0 - (1.0 - t).powi(3),
            EaseInOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            EaseInQuart => t.powi(4),
            EaseOutQuart => 1.0 - (1.0 - t).powi(4),
            EaseInOutQuart => {
                if t < 0.5 {
                    8.0 * t.powi(4)
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(4) / 2.0
                }
            }
            EaseInQuint => t.powi(5),
            EaseOutQuint => 1.0 - (1.0 - t).powi(5),
            EaseInOutQuint => {
                if t < 0.5 {
                    16.0 * t.powi(5)
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(5) / 2.0
                }
            }
            EaseInExpo => {
                if t == 0.0 {
                    0.0
                } else {
                    2f64.powf(10.0 * t - 10.0)
                }
            }
            EaseOutExpo => {
                if t == 1.0 {
                    1.0
                } else {
                    1.0 - 2f64.powf(-10.0 * t)
                }
            }
            EaseInOutExpo => {
                if t == 0.0 {
                    0.0
                } else if t == 1.0 {
                    1.0
                } else if t < 0.5 {
                    2f64.powf(20.0 * t - 10.0) / 2.0
                } else {
                    (2.0 - 2f64.powf(-20.0 * t + 10.0)) / 2.0
                }
            }
            EaseInCirc => 1.0 - (1.0 - t * t).sqrt(),
            EaseOutCirc => (1.0 - (t - 1.0).powi(2)).sqrt(),
            EaseInOutCirc => {
                if t < 0.5 {
                    (1.0 - (1.0 - (2.0 * t).powi(2)).sqrt()) / 2.0
                } else {
                    ((1.0 - (-2.0 * t + 2.0).powi(2)).sqrt() + 1.0) / 2.0
                }
            }
            EaseInBack => p.c3 * t * t * t - p.c1 * t * t,
            EaseOutBack => 1.0 + p.c3 * (t - 1.0).powi(3) + p.c1 * (t - 1.0).powi(2),
            EaseInOutBack => {
                if t < 0.5 {
                    ((2.0 * t).powi(2) * ((p.c2 + 1.0) * 2.0 * t - p.c2)) / 2.0
                } else {
                    ((2.0 * t - 2.0).powi(2) * ((p.c2 + 1.0) * (t * 2.0 - 2.0) + p.c2) + 2.0) / 2.0
                }
            }
            EaseInElastic => {
                if t == 0.0 {
                    0.0
                } else if t == 1.0 {
                    1.0
                } else {
                    -(2f64.powf(10.0 * t - 10.0)) * ((t * 10.0 - 10.75) * p.c4).sin()
                }
            }
            EaseOutElastic => {
                if t == 0.0 {
                    0.0
                } else if t == 1.0 {
                    1.0
                } else {
                    2f64.powf(-10.0 * t) * ((t * 10.0 - 0.75) * p.c4).sin() + 1.0
                }
            }
            EaseInOutElastic => {
                if t == 0.0 {
                    0.0
                } else if t == 1.0 {
                    1.0
                } else if t < 0.5 {
                    -(2f64.powf(20.0 * t - 10.0) * ((20.0 * t - 11.125) * p.c4 / 1.5).sin()) / 2.0
                } else {
                    (2f64.powf(-20.0 * t + 10.0) * ((20.0 * t - 11.125) * p.c4 / 1.5).sin()) / 2.0
                        + 1.0
                }
            }
            EaseInBounce => 1.0 - bounce_out(1.0 - t, p),
            EaseOutBounce => bounce_out(t, p),
            EaseInOutBounce => {
                if t < 0.5 {
                    (1.0 - bounce_out(1.0 - 2.0 * t, p)) / 2.0
                } else {
                    (1.0 + bounce_out(2.0 * t - 1.0, p)) / 2.0
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_is_identity() {
        let p = EasingParams::default();
        assert_eq!(Curve::Linear.ease(0.0, &p), 0.0);
        assert_eq!(Curve::Linear.ease(0.5, &p), 0.5);
        assert_eq!(Curve::Linear.ease(1.0, &p), 1.0);
    }

    #[test]
    fn all_curves_start_and_end_near_bounds() {
        let p = EasingParams::default();
        let curves = [
            Curve::Linear,
            Curve::EaseInSine,
            Curve::EaseOutSine,
            Curve::EaseInOutSine,
            Curve::EaseInQuad,
            Curve::EaseOutQuad,
            Curve::EaseInOutQuad,
            Curve::EaseInCubic,
            Curve::EaseOutCubic,
            Curve::EaseInOutCubic,
            Curve::EaseInQuart,
            Curve::EaseOutQuart,
            Curve::EaseInOutQuart,
            Curve::EaseInQuint,
            Curve::EaseOutQuint,
            Curve::EaseInOutQuint,
            Curve::EaseInExpo,
            Curve::EaseOutExpo,
            Curve::EaseInOutExpo,
            Curve::EaseInCirc,
            Curve::EaseOutCirc,
            Curve::EaseInOutCirc,
            Curve::EaseInBack,
            Curve::EaseOutBack,
            Curve::EaseInOutBack,
            Curve::EaseInElastic,
            Curve::EaseOutElastic,
            Curve::EaseInOutElastic,
            Curve::EaseInBounce,
            Curve::EaseOutBounce,
            Curve::EaseInOutBounce,
        ];
        for c in curves {
            let start = c.ease(0.0, &p);
            let end = c.ease(1.0, &p);
            assert!((start).abs() < 1e-6, "{c:?} start={start}");
            assert!((end - 1.0).abs() < 1e-6, "{c:?} end={end}");
        }
    }

    #[test]
    fn bounce_out_monotonic_envelope_reaches_one() {
        let p = EasingParams::default();
        assert!((Curve::EaseOutBounce.ease(1.0, &p) - 1.0).abs() < 1e-9);
    }
}
