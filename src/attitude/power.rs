use super::sample::AttitudeSample;
use super::state::PointingMode;

/// Coefficients for the synthetic power-draw estimate. This is an analytic
/// proxy for slew effort, not a physical model; the values are configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerModel {
    pub idle_power_w: f64,
    pub heading_rate_coeff: f64,
    pub tilt_rate_coeff: f64,
    pub focus_overhead_w: f64,
}

impl PowerModel {
    pub fn energy_w(&self, heading_rate_deg_s: f64, tilt_rate_deg_s: f64, mode: PointingMode) -> f64 {
        let mut power = self.idle_power_w
            + self.heading_rate_coeff * heading_rate_deg_s * heading_rate_deg_s
            + self.tilt_rate_coeff * tilt_rate_deg_s * tilt_rate_deg_s;
        if mode == PointingMode::Focus {
            power += self.focus_overhead_w;
        }
        power
    }
}

/// Signed shortest angular path from `prev_deg` to `curr_deg`, in (-180, 180].
/// Keeps a move from 350 to 10 degrees from reading as a -340 degree swing.
pub fn angular_delta(prev_deg: f64, curr_deg: f64) -> f64 {
    let mut delta = (curr_deg - prev_deg).rem_euclid(360.0);
    if delta > 180.0 {
        delta -= 360.0;
    }
    delta
}

/// Angular rates between two consecutive samples. A non-positive time delta
/// (clock anomaly, duplicate tick) holds the previous rates instead of
/// dividing by zero.
pub fn update_rates(
    prev: &AttitudeSample,
    curr: &AttitudeSample,
    dt_s: f64,
    held_rates: (f64, f64),
) -> (f64, f64) {
    if dt_s <= 0.0 {
        return held_rates;
    }
    let heading_rate = angular_delta(prev.heading_deg, curr.heading_deg) / dt_s;
    let tilt_rate = (curr.tilt_deg - prev.tilt_deg) / dt_s;
    (heading_rate, tilt_rate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    const MODEL: PowerModel = PowerModel {
        idle_power_w: 10.0,
        heading_rate_coeff: 0.4,
        tilt_rate_coeff: 0.6,
        focus_overhead_w: 5.0,
    };

    fn sample(heading: f64, tilt: f64) -> AttitudeSample {
        AttitudeSample {
            timestamp: Utc::now(),
            heading_deg: heading,
            tilt_deg: tilt,
            range_km: 400.0,
        }
    }

    #[test]
    fn test_angular_delta_shortest_path_across_wrap() {
        assert_eq!(angular_delta(350.0, 10.0), 20.0);
        assert_eq!(angular_delta(10.0, 350.0), -20.0);
    }

    #[test]
    fn test_angular_delta_plain_cases() {
        assert_eq!(angular_delta(0.0, 90.0), 90.0);
        assert_eq!(angular_delta(90.0, 0.0), -90.0);
        assert_eq!(angular_delta(45.0, 45.0), 0.0);
        // Exactly opposite points resolve to the positive half
        assert_eq!(angular_delta(0.0, 180.0), 180.0);
    }

    #[test]
    fn test_rates_from_consecutive_samples() {
        let prev = sample(350.0, 10.0);
        let curr = sample(10.0, 14.0);
        let (heading_rate, tilt_rate) = update_rates(&prev, &curr, 5.0, (0.0, 0.0));
        assert!((heading_rate - 4.0).abs() < 1e-12);
        assert!((tilt_rate - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_zero_dt_holds_previous_rates() {
        let prev = sample(0.0, 0.0);
        let curr = sample(90.0, 45.0);
        assert_eq!(update_rates(&prev, &curr, 0.0, (1.25, -0.5)), (1.25, -0.5));
        assert_eq!(update_rates(&prev, &curr, -3.0, (1.25, -0.5)), (1.25, -0.5));
    }

    #[test]
    fn test_energy_is_idle_at_rest() {
        assert_eq!(MODEL.energy_w(0.0, 0.0, PointingMode::Lookdown), 10.0);
    }

    #[test]
    fn test_energy_adds_focus_overhead() {
        let lookdown = MODEL.energy_w(1.0, 1.0, PointingMode::Lookdown);
        let focus = MODEL.energy_w(1.0, 1.0, PointingMode::Focus);
        assert!((focus - lookdown - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_energy_strictly_increases_with_rate_magnitude() {
        let mut last = MODEL.energy_w(0.0, 0.0, PointingMode::Lookdown);
        for rate in [0.5, 1.0, 2.0, 4.0] {
            let e = MODEL.energy_w(rate, 0.0, PointingMode::Lookdown);
            assert!(e > last, "energy not increasing at heading rate {}", rate);
            last = e;
        }

        let mut last = MODEL.energy_w(0.0, 0.0, PointingMode::Lookdown);
        for rate in [0.5, 1.0, 2.0, 4.0] {
            let e = MODEL.energy_w(0.0, -rate, PointingMode::Lookdown);
            assert!(e > last, "energy not increasing at tilt rate {}", rate);
            last = e;
        }
    }
}
