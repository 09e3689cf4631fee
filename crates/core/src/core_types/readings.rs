//! Environmental readings frozen into each grid cell
//!
//! Readings are fetched by an external environment builder (weather and land-cover
//! services) before any simulation runs. The builder delivers [`PartialReadings`];
//! fields it could not obtain are substituted with documented defaults when the
//! readings are resolved. Nothing in the simulation loop performs I/O.

use crate::core_types::units::{Celsius, Fraction, Percent};
use serde::{Deserialize, Serialize};

/// Default ambient moisture fraction when the reading is missing
pub const DEFAULT_AMBIENT_MOISTURE: f64 = 0.1;
/// Default air temperature (°C) when the reading is missing
pub const DEFAULT_TEMPERATURE: f64 = 25.0;
/// Default wind speed when the reading is missing
pub const DEFAULT_WIND_SPEED: f64 = 5.0;
/// Lower clamp for live fuel moisture (%)
pub const MIN_LIVE_FUEL_MOISTURE: f64 = 30.0;
/// Upper clamp for live fuel moisture (%)
pub const MAX_LIVE_FUEL_MOISTURE: f64 = 120.0;
/// Horizontal distance between the two elevation samples used for slope (m)
pub const SLOPE_SAMPLE_DISTANCE: f64 = 500.0;

/// Fully resolved readings for one cell
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentReadings {
    /// Ambient (surface soil) moisture fraction
    pub ambient_moisture: Fraction,
    /// Air temperature
    pub temperature: Celsius,
    /// Wind speed in the units of the weather provider
    pub wind_speed: f64,
    /// Terrain slope. Fed to the spread model's `tan(slope°)` term as-is.
    pub slope: Percent,
    /// Live fuel moisture content, always within [30, 120]
    pub live_fuel_moisture: Percent,
    /// Elevation (m)
    pub elevation: f64,
}

impl Default for EnvironmentReadings {
    fn default() -> Self {
        PartialReadings::default().resolve()
    }
}

impl EnvironmentReadings {
    /// Readings that let every burnable fuel spread at full probability:
    /// bone-dry fuel, fully cured live load, flat terrain, moderate wind.
    pub fn bone_dry() -> Self {
        Self {
            ambient_moisture: Fraction::ZERO,
            temperature: Celsius::new(35.0),
            wind_speed: DEFAULT_WIND_SPEED,
            slope: Percent::ZERO,
            live_fuel_moisture: Percent::new(MIN_LIVE_FUEL_MOISTURE),
            elevation: 0.0,
        }
    }

    /// Copy with a different ambient moisture
    pub fn with_ambient_moisture(mut self, moisture: f64) -> Self {
        self.ambient_moisture = Fraction::clamped(moisture);
        self
    }

    /// Copy with a different wind speed
    pub fn with_wind_speed(mut self, wind_speed: f64) -> Self {
        self.wind_speed = wind_speed.max(0.0);
        self
    }

    /// Copy with a different slope
    pub fn with_slope(mut self, slope: f64) -> Self {
        self.slope = Percent::new(slope.abs());
        self
    }

    /// Copy with a different live fuel moisture (clamped to [30, 120])
    pub fn with_live_fuel_moisture(mut self, lfm: f64) -> Self {
        self.live_fuel_moisture =
            Percent::new(lfm).clamp_to(MIN_LIVE_FUEL_MOISTURE, MAX_LIVE_FUEL_MOISTURE);
        self
    }
}

/// Readings as delivered by an environment builder. Any field may be missing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PartialReadings {
    pub ambient_moisture: Option<f64>,
    pub temperature: Option<f64>,
    pub wind_speed: Option<f64>,
    pub slope: Option<f64>,
    pub live_fuel_moisture: Option<f64>,
    pub elevation: Option<f64>,
    /// Elevation sampled [`SLOPE_SAMPLE_DISTANCE`] metres away, used to derive slope
    /// when no slope reading is present
    pub neighbor_elevation: Option<f64>,
}

impl PartialReadings {
    /// Resolve into complete readings, substituting defaults:
    /// - ambient moisture 0.1, temperature 25 °C, wind speed 5
    /// - slope derived from the elevation pair, else 0
    /// - live fuel moisture estimated from soil moisture and temperature when
    ///   missing, always clamped to [30, 120]
    pub fn resolve(&self) -> EnvironmentReadings {
        let ambient_moisture = Fraction::clamped(
            self.ambient_moisture
                .filter(|m| m.is_finite())
                .unwrap_or(DEFAULT_AMBIENT_MOISTURE),
        );
        let temperature = self
            .temperature
            .filter(|t| t.is_finite() && *t >= *Celsius::ABSOLUTE_ZERO)
            .unwrap_or(DEFAULT_TEMPERATURE);
        let wind_speed = self
            .wind_speed
            .filter(|w| w.is_finite())
            .unwrap_or(DEFAULT_WIND_SPEED)
            .max(0.0);
        let elevation = self.elevation.filter(|e| e.is_finite()).unwrap_or(0.0);

        let slope = match (self.slope, self.neighbor_elevation) {
            (Some(slope), _) if slope.is_finite() => slope.abs(),
            (_, Some(neighbor)) if neighbor.is_finite() => {
                slope_percent(elevation, neighbor, SLOPE_SAMPLE_DISTANCE)
            }
            _ => 0.0,
        };

        let live_fuel_moisture = self
            .live_fuel_moisture
            .filter(|m| m.is_finite())
            .unwrap_or_else(|| estimate_live_fuel_moisture(*ambient_moisture, temperature))
            .clamp(MIN_LIVE_FUEL_MOISTURE, MAX_LIVE_FUEL_MOISTURE);

        EnvironmentReadings {
            ambient_moisture,
            temperature: Celsius::new(temperature),
            wind_speed,
            slope: Percent::new(slope),
            live_fuel_moisture: Percent::new(live_fuel_moisture),
            elevation,
        }
    }
}

impl From<EnvironmentReadings> for PartialReadings {
    fn from(r: EnvironmentReadings) -> Self {
        Self {
            ambient_moisture: Some(*r.ambient_moisture),
            temperature: Some(*r.temperature),
            wind_speed: Some(r.wind_speed),
            slope: Some(*r.slope),
            live_fuel_moisture: Some(*r.live_fuel_moisture),
            elevation: Some(r.elevation),
            neighbor_elevation: None,
        }
    }
}

/// Location-keyed accessor for on-demand readings, implemented by environment
/// builders. Locations are grid cells `(x, y)`.
pub trait ReadingsSource {
    /// Readings for the cell at `(x, y)`
    fn readings_at(&self, x: usize, y: usize) -> PartialReadings;
}

impl<F> ReadingsSource for F
where
    F: Fn(usize, usize) -> PartialReadings,
{
    fn readings_at(&self, x: usize, y: usize) -> PartialReadings {
        self(x, y)
    }
}

/// Estimate live fuel moisture content (%) from topsoil moisture and temperature
///
/// # Formula
/// ```text
/// LFMC = 30 + 100 × SM                  (SM = 0-10 cm soil moisture fraction)
/// LFMC -= 1.5 × (T - 25)                when T > 25 °C
/// LFMC  = clamp(LFMC, 30, 120)
/// ```
pub fn estimate_live_fuel_moisture(soil_moisture: f64, temperature: f64) -> f64 {
    let mut lfmc = 30.0 + 100.0 * soil_moisture;
    if temperature > 25.0 {
        lfmc -= (temperature - 25.0) * 1.5;
    }
    lfmc.clamp(MIN_LIVE_FUEL_MOISTURE, MAX_LIVE_FUEL_MOISTURE)
}

/// Slope in percent from two elevation samples `distance` metres apart
///
/// Returns the magnitude; direction of the slope is not tracked.
pub fn slope_percent(elevation: f64, neighbor_elevation: f64, distance: f64) -> f64 {
    if distance <= 0.0 {
        return 0.0;
    }
    ((neighbor_elevation - elevation) / distance * 100.0).abs()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_missing_readings_use_defaults() {
        let r = PartialReadings::default().resolve();
        assert_relative_eq!(*r.ambient_moisture, 0.1);
        assert_relative_eq!(*r.temperature, 25.0);
        assert_relative_eq!(r.wind_speed, 5.0);
        assert_relative_eq!(*r.slope, 0.0);
        // 30 + 100 × 0.1 = 40, no temperature penalty at 25 °C
        assert_relative_eq!(*r.live_fuel_moisture, 40.0);
    }

    #[test]
    fn test_live_fuel_moisture_clamped() {
        let wet = PartialReadings {
            live_fuel_moisture: Some(300.0),
            ..Default::default()
        };
        assert_relative_eq!(*wet.resolve().live_fuel_moisture, 120.0);

        let parched = PartialReadings {
            live_fuel_moisture: Some(5.0),
            ..Default::default()
        };
        assert_relative_eq!(*parched.resolve().live_fuel_moisture, 30.0);
    }

    #[test]
    fn test_live_fuel_moisture_estimate_heat_penalty() {
        // 30 + 25 = 55, minus 1.5 × 10 = 40
        assert_relative_eq!(estimate_live_fuel_moisture(0.25, 35.0), 40.0);
        assert_relative_eq!(estimate_live_fuel_moisture(0.25, 20.0), 55.0);
        assert_relative_eq!(estimate_live_fuel_moisture(2.0, 20.0), 120.0);
    }

    #[test]
    fn test_slope_from_elevation_pair() {
        let r = PartialReadings {
            elevation: Some(1000.0),
            neighbor_elevation: Some(950.0),
            ..Default::default()
        }
        .resolve();
        assert_relative_eq!(*r.slope, 10.0);
    }

    #[test]
    fn test_explicit_slope_wins_over_elevations() {
        let r = PartialReadings {
            slope: Some(-4.0),
            elevation: Some(0.0),
            neighbor_elevation: Some(500.0),
            ..Default::default()
        }
        .resolve();
        assert_relative_eq!(*r.slope, 4.0);
    }

    #[test]
    fn test_closure_is_readings_source() {
        let source = |x: usize, _y: usize| PartialReadings {
            wind_speed: Some(x as f64),
            ..Default::default()
        };
        assert_eq!(source.readings_at(7, 0).wind_speed, Some(7.0));
    }
}
