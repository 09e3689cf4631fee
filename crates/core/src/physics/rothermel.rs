//! Rothermel-style Rate of Spread Model
//!
//! Closed-form surface fire spread rate used by the cellular automaton. The model
//! keeps Rothermel's structure (reaction intensity scaled by wind and slope factors,
//! divided by a packing term) with simplified empirical coefficients, live-fuel
//! curing and an exponential live-moisture damping term.
//!
//! # References
//! - Rothermel, R.C. (1972). "A mathematical model for predicting fire spread in wildland fuels."
//!   USDA Forest Service Research Paper INT-115.
//! - Scott, J.H. & Burgan, R.E. (2005). "Standard Fire Behavior Fuel Models."
//!   USDA Forest Service RMRS-GTR-153 (dynamic live herbaceous load transfer).

use crate::core_types::fuel::{FuelCode, FuelGroup, FuelModel, FuelTable};
use crate::core_types::readings::EnvironmentReadings;
use crate::error::CoreResult;
use serde::{Deserialize, Serialize};

/// Oven-dry particle density used for the packing ratio (canonical variant)
pub const PARTICLE_DENSITY: f64 = 512.0;

/// Packing ratio floor (canonical variant)
pub const MIN_PACKING_RATIO: f64 = 1e-4;

/// Spread rates below this are treated as no spread
pub const MIN_SPREAD_RATE: f64 = 0.1;

/// Historical particle density used by the legacy variant
const LEGACY_PARTICLE_DENSITY: f64 = 550.0;

/// Historical packing ratio floor used by the legacy variant
const LEGACY_MIN_PACKING_RATIO: f64 = 0.02;

/// Whether a fire front will advance through a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpreadStatus {
    Spread,
    NoSpread,
}

/// Result of a spread-rate evaluation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpreadRate {
    /// Rate of spread (distance/time in the fuel table's units)
    pub ros: f64,
    pub status: SpreadStatus,
}

impl SpreadRate {
    /// Zero rate, no spread
    pub const NONE: SpreadRate = SpreadRate {
        ros: 0.0,
        status: SpreadStatus::NoSpread,
    };

    /// Whether the fire spreads
    pub fn spreads(&self) -> bool {
        self.status == SpreadStatus::Spread
    }
}

/// Formula variant of the spread model
///
/// `Canonical` is the complete model. `Legacy` reproduces an earlier variant
/// (different particle density and packing floor, no live-moisture damping, rate
/// floored at 0.1 instead of clamped to zero) for ablation comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RosVariant {
    #[default]
    Canonical,
    Legacy,
}

/// Calculate the rate of spread with the canonical model
///
/// # Formula
/// ```text
/// R = I_R × (1 + Φ_w + Φ_s) / (β × σ) × exp(-0.1 × (LFM - 30)) × k_group
/// ```
///
/// Where:
/// - **I_R** = Reaction intensity, see [`reaction_intensity`]
/// - **Φ_w** = Wind factor `0.4 × (U / σ)²`
/// - **Φ_s** = Slope factor `5.275 × tan(θ)^1.35`
/// - **β** = Packing ratio `max(ρ_b / ρ_p, 1e-4)`
/// - **σ** = Surface-area-to-volume ratio of dead 1-hr fuel
/// - **LFM** = Live fuel moisture (%)
/// - **k_group** = Fuel group multiplier
///
/// Fuel too wet to burn (ambient moisture above the extinction moisture) and
/// non-burnable fuel return [`SpreadRate::NONE`]. Rates below 0.1, negative rates
/// and NaN are clamped to zero with [`SpreadStatus::NoSpread`].
///
/// # Example
/// ```
/// use firebreak_core::core_types::{EnvironmentReadings, FuelTable};
/// use firebreak_core::physics::rothermel::rate_of_spread;
///
/// let table = FuelTable::scott_burgan();
/// let grass = table.get_str("GR2").unwrap();
/// let rate = rate_of_spread(grass, &EnvironmentReadings::bone_dry());
/// assert!(rate.spreads());
/// ```
pub fn rate_of_spread(fuel: &FuelModel, readings: &EnvironmentReadings) -> SpreadRate {
    rate_of_spread_with(RosVariant::Canonical, fuel, readings)
}

/// Calculate the rate of spread with an explicit formula variant
pub fn rate_of_spread_with(
    variant: RosVariant,
    fuel: &FuelModel,
    readings: &EnvironmentReadings,
) -> SpreadRate {
    let group = fuel.code.group();
    if group == FuelGroup::NonBurnable {
        return SpreadRate::NONE;
    }

    let moisture = *readings.ambient_moisture;
    let live_fuel_moisture = *readings.live_fuel_moisture;

    // 1. Live herbaceous load cured into the dead 1-hr class
    let cured_load = fuel.load_live_herb * curing_transfer_ratio(group, live_fuel_moisture);
    let load_1hr = fuel.load_1hr + cured_load;

    // 2. Too wet to burn
    if moisture > *fuel.extinction_moisture {
        return SpreadRate::NONE;
    }

    let sigma = fuel.sav_ratio;
    if sigma <= 0.0 || fuel.fuel_bed_depth <= 0.0 {
        return SpreadRate::NONE;
    }

    // 3. Reaction intensity
    let intensity = reaction_intensity(
        fuel.heat_content,
        load_1hr,
        fuel.load_10hr,
        fuel.load_100hr,
        moisture,
    );

    // 4. Packing ratio
    let (particle_density, min_packing) = match variant {
        RosVariant::Canonical => (PARTICLE_DENSITY, MIN_PACKING_RATIO),
        RosVariant::Legacy => (LEGACY_PARTICLE_DENSITY, LEGACY_MIN_PACKING_RATIO),
    };
    let dead_load = fuel.total_dead_load() + cured_load;
    let beta = packing_ratio(dead_load, fuel.fuel_bed_depth, particle_density, min_packing);

    // 5. Wind and slope
    let phi_wind = wind_factor(readings.wind_speed, sigma);
    let phi_slope = slope_factor(*readings.slope);

    // 6. Base spread rate
    let mut ros = intensity * (1.0 + phi_wind + phi_slope) / (beta * sigma);

    match variant {
        RosVariant::Canonical => {
            // 7-8. Live moisture damping, group multiplier
            ros *= live_moisture_damping(live_fuel_moisture);
            ros *= group.spread_multiplier();

            // 9. Threshold
            if !ros.is_finite() || ros < MIN_SPREAD_RATE {
                return SpreadRate::NONE;
            }
            SpreadRate {
                ros,
                status: SpreadStatus::Spread,
            }
        }
        RosVariant::Legacy => {
            ros *= group.spread_multiplier();
            if ros.is_nan() {
                return SpreadRate::NONE;
            }
            SpreadRate {
                ros: ros.max(MIN_SPREAD_RATE),
                status: SpreadStatus::Spread,
            }
        }
    }
}

/// Fraction of live herbaceous load transferred to dead 1-hr load
///
/// Herbaceous and shrub groups cure as live fuel moisture drops:
///
/// | LFM (%) | Transfer |
/// |---------|----------|
/// | ≥ 120   | 0.00     |
/// | ≥ 90    | 0.33     |
/// | ≥ 75    | 0.50     |
/// | ≥ 60    | 0.67     |
/// | < 60    | 1.00     |
///
/// Other groups are treated as fully cured (1.0).
pub fn curing_transfer_ratio(group: FuelGroup, live_fuel_moisture: f64) -> f64 {
    if !group.has_curing() {
        return 1.0;
    }
    if live_fuel_moisture >= 120.0 {
        0.0
    } else if live_fuel_moisture >= 90.0 {
        0.33
    } else if live_fuel_moisture >= 75.0 {
        0.50
    } else if live_fuel_moisture >= 60.0 {
        0.67
    } else {
        1.0
    }
}

/// Reaction intensity
///
/// # Formula
/// ```text
/// I_R = h × (w_1 + 0.5 × w_10 + 0.2 × w_100) × (1 - M)
/// ```
///
/// Coarser size classes contribute less to the flaming front.
pub fn reaction_intensity(
    heat_content: f64,
    load_1hr: f64,
    load_10hr: f64,
    load_100hr: f64,
    moisture: f64,
) -> f64 {
    heat_content * (load_1hr + 0.5 * load_10hr + 0.2 * load_100hr) * (1.0 - moisture)
}

/// Packing ratio `β = max((Σ w_dead / δ) / ρ_p, floor)`
pub fn packing_ratio(dead_load: f64, bed_depth: f64, particle_density: f64, floor: f64) -> f64 {
    let bulk_density = dead_load / bed_depth;
    (bulk_density / particle_density).max(floor)
}

/// Wind factor `Φ_w = 0.4 × (U / σ)²`
pub fn wind_factor(wind_speed: f64, sav_ratio: f64) -> f64 {
    0.4 * (wind_speed / sav_ratio).powi(2)
}

/// Slope factor `Φ_s = 5.275 × tan(θ)^1.35`, with θ taken in degrees
///
/// Slope magnitude only; steeper terrain always accelerates spread.
pub fn slope_factor(slope: f64) -> f64 {
    let tan_slope = slope.abs().to_radians().tan();
    if !tan_slope.is_finite() || tan_slope <= 0.0 {
        return 0.0;
    }
    5.275 * tan_slope.powf(1.35)
}

/// Live moisture damping `exp(-0.1 × (LFM - 30))`
pub fn live_moisture_damping(live_fuel_moisture: f64) -> f64 {
    (-0.1 * (live_fuel_moisture - 30.0)).exp()
}

impl FuelTable {
    /// Look up a fuel code and evaluate the canonical spread model
    ///
    /// Non-burnable codes short-circuit to [`SpreadRate::NONE`] without a lookup.
    ///
    /// # Errors
    /// Returns [`crate::CoreError::UnknownFuelCode`] if a burnable code is absent
    /// from the table. This is a configuration defect, not a recoverable condition.
    pub fn rate_of_spread(
        &self,
        code: FuelCode,
        readings: &EnvironmentReadings,
    ) -> CoreResult<SpreadRate> {
        if code.is_non_burnable() {
            return Ok(SpreadRate::NONE);
        }
        let fuel = self.get(code)?;
        Ok(rate_of_spread(fuel, readings))
    }
}
