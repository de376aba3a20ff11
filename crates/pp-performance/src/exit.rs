//! Nozzle exit specification.

use crate::error::{PerformanceError, PerformanceResult};
use pp_core::units::{Pressure, atm, to_atm};
use serde::{Deserialize, Serialize};

/// How the nozzle exit is fixed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ExitCondition {
    /// Exit static pressure
    Pressure(Pressure),
    /// Ae/At on the diverging side
    SupersonicAreaRatio(f64),
    /// Ae/At on the converging side
    SubsonicAreaRatio(f64),
}

impl ExitCondition {
    /// Build from a tag and a value. Pressures are taken in atmospheres.
    ///
    /// Accepted tags: `pressure`, `supersonic`, `subsonic` (case-insensitive).
    pub fn from_tag(tag: &str, value: f64) -> PerformanceResult<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "pressure" => Ok(Self::Pressure(atm(value))),
            "supersonic" | "supersonic_area_ratio" => Ok(Self::SupersonicAreaRatio(value)),
            "subsonic" | "subsonic_area_ratio" => Ok(Self::SubsonicAreaRatio(value)),
            _ => Err(PerformanceError::BadRatioType {
                tag: tag.to_string(),
            }),
        }
    }

    /// Check the value against a chamber pressure [atm].
    pub fn validate(&self, chamber_pressure_atm: f64) -> PerformanceResult<()> {
        match *self {
            Self::Pressure(p) => {
                let value = to_atm(p);
                if !(value.is_finite() && value > 0.0 && value < chamber_pressure_atm) {
                    return Err(PerformanceError::BadExitPressure {
                        value,
                        chamber: chamber_pressure_atm,
                    });
                }
            }
            Self::SupersonicAreaRatio(value) | Self::SubsonicAreaRatio(value) => {
                if !(value.is_finite() && value > 1.0) {
                    return Err(PerformanceError::BadAreaRatio { value });
                }
            }
        }
        Ok(())
    }

    /// First estimate of `ln(Pc/Pe)` for an area ratio, from the throat
    /// pressure ratio and isentropic exponent. `None` for a pressure exit.
    pub(crate) fn seed_log_pressure_ratio(&self, pc_pt: f64, throat_gamma: f64) -> Option<f64> {
        match *self {
            Self::Pressure(_) => None,
            Self::SupersonicAreaRatio(ae) => Some(if ae < 2.0 {
                pc_pt.ln() + (3.294 * ae * ae + 1.535 * ae.ln()).sqrt()
            } else {
                throat_gamma + 1.4 * ae.ln()
            }),
            Self::SubsonicAreaRatio(ae) => {
                let l = ae.ln();
                let base = pc_pt.ln() / (ae + 10.587 * l.powi(3) + 9.454 * l);
                Some(if ae < 1.09 { 0.9 * base } else { base })
            }
        }
    }

    pub fn area_ratio(&self) -> Option<f64> {
        match *self {
            Self::Pressure(_) => None,
            Self::SupersonicAreaRatio(ae) | Self::SubsonicAreaRatio(ae) => Some(ae),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_parse() {
        assert_eq!(
            ExitCondition::from_tag("Supersonic", 4.0).unwrap(),
            ExitCondition::SupersonicAreaRatio(4.0)
        );
        assert_eq!(
            ExitCondition::from_tag("subsonic", 1.5).unwrap(),
            ExitCondition::SubsonicAreaRatio(1.5)
        );
        let p = ExitCondition::from_tag("pressure", 1.0).unwrap();
        assert!(matches!(p, ExitCondition::Pressure(v) if (to_atm(v) - 1.0).abs() < 1e-12));
    }

    #[test]
    fn unknown_tag_is_bad_ratio_type() {
        let err = ExitCondition::from_tag("throat", 2.0).unwrap_err();
        assert!(matches!(err, PerformanceError::BadRatioType { .. }));
    }

    #[test]
    fn area_ratio_must_exceed_one() {
        for ae in [0.5, 1.0, f64::NAN, f64::INFINITY] {
            let err = ExitCondition::SupersonicAreaRatio(ae).validate(68.0).unwrap_err();
            assert!(matches!(err, PerformanceError::BadAreaRatio { .. }));
            assert!(ExitCondition::SubsonicAreaRatio(ae).validate(68.0).is_err());
        }
        assert!(ExitCondition::SupersonicAreaRatio(1.0001).validate(68.0).is_ok());
    }

    #[test]
    fn exit_pressure_below_chamber() {
        assert!(ExitCondition::Pressure(atm(1.0)).validate(68.0).is_ok());
        for p in [0.0, -1.0, 68.0, 100.0] {
            let err = ExitCondition::Pressure(atm(p)).validate(68.0).unwrap_err();
            assert!(matches!(err, PerformanceError::BadExitPressure { .. }));
        }
    }

    #[test]
    fn seeds_follow_regime() {
        let pc_pt = 1.8_f64;
        let near = ExitCondition::SupersonicAreaRatio(1.5).seed_log_pressure_ratio(pc_pt, 1.2).unwrap();
        assert!(near > pc_pt.ln());
        let far = ExitCondition::SupersonicAreaRatio(10.0).seed_log_pressure_ratio(pc_pt, 1.2).unwrap();
        assert!((far - (1.2 + 1.4 * 10.0_f64.ln())).abs() < 1e-12);

        let sub = ExitCondition::SubsonicAreaRatio(1.05).seed_log_pressure_ratio(pc_pt, 1.2).unwrap();
        assert!(sub > 0.0 && sub < pc_pt.ln());
        assert!(ExitCondition::Pressure(atm(1.0)).seed_log_pressure_ratio(pc_pt, 1.2).is_none());
    }

    #[test]
    fn serde_shape() {
        let json = serde_json::to_string(&ExitCondition::SupersonicAreaRatio(4.0)).unwrap();
        assert_eq!(json, r#"{"type":"supersonic_area_ratio","value":4.0}"#);
    }
}
