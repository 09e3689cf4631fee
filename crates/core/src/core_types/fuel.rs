//! Surface fuel models and the fuel parameter table
//!
//! Fuel codes follow the Scott & Burgan (2005) standard fire behavior fuel models:
//! a two-letter group prefix (`GR`, `GS`, `SH`, `TU`, `TL`, `SB`, `NB`) followed by a
//! model number. The bare code `NB` is the non-burnable sentinel written onto cells
//! covered by a firebreak.
//!
//! Table units follow the published model sheets: loads in tons/acre, SAV ratio in
//! 1/ft, fuel bed depth in ft, heat content in BTU/lb. Extinction moisture is stored
//! as a fraction so it compares directly with ambient moisture readings.
//!
//! # Scientific References
//! - Scott, J.H. & Burgan, R.E. (2005). "Standard Fire Behavior Fuel Models: A
//!   Comprehensive Set for Use with Rothermel's Surface Fire Spread Model."
//!   USDA Forest Service RMRS-GTR-153.

use crate::core_types::units::Fraction;
use crate::error::{CoreError, CoreResult};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Fuel group, determined by the two-letter prefix of a fuel code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FuelGroup {
    /// `GR` - grass
    Grass,
    /// `GS` - grass-shrub mix
    GrassShrub,
    /// `SH` - shrub
    Shrub,
    /// `TU` - timber understory
    TimberUnderstory,
    /// `TL` - timber litter
    TimberLitter,
    /// `SB` - slash/blowdown
    SlashBlowdown,
    /// `NB` - non-burnable (urban, water, snow, bare ground, firebreaks)
    NonBurnable,
}

impl FuelGroup {
    /// All groups, in table order
    pub const ALL: [FuelGroup; 7] = [
        FuelGroup::Grass,
        FuelGroup::GrassShrub,
        FuelGroup::Shrub,
        FuelGroup::TimberUnderstory,
        FuelGroup::TimberLitter,
        FuelGroup::SlashBlowdown,
        FuelGroup::NonBurnable,
    ];

    /// Two-letter code prefix
    pub const fn prefix(self) -> &'static str {
        match self {
            FuelGroup::Grass => "GR",
            FuelGroup::GrassShrub => "GS",
            FuelGroup::Shrub => "SH",
            FuelGroup::TimberUnderstory => "TU",
            FuelGroup::TimberLitter => "TL",
            FuelGroup::SlashBlowdown => "SB",
            FuelGroup::NonBurnable => "NB",
        }
    }

    /// Parse a group from a code prefix (case-insensitive)
    pub fn from_prefix(prefix: &str) -> Option<Self> {
        FuelGroup::ALL
            .into_iter()
            .find(|group| group.prefix().eq_ignore_ascii_case(prefix))
    }

    /// Spread-rate multiplier applied after the Rothermel calculation.
    ///
    /// Grass fires run fastest, timber litter slowest, non-burnable never.
    pub const fn spread_multiplier(self) -> f64 {
        match self {
            FuelGroup::Grass => 1.2,
            FuelGroup::GrassShrub => 1.1,
            FuelGroup::Shrub => 0.9,
            FuelGroup::TimberUnderstory => 0.8,
            FuelGroup::TimberLitter => 0.7,
            FuelGroup::SlashBlowdown => 1.0,
            FuelGroup::NonBurnable => 0.0,
        }
    }

    /// Whether live herbaceous load cures into dead load with moisture stress
    pub const fn has_curing(self) -> bool {
        matches!(
            self,
            FuelGroup::Grass | FuelGroup::GrassShrub | FuelGroup::Shrub
        )
    }

    /// Default display colour (RGB) for cells of this group
    pub const fn display_color(self) -> [u8; 3] {
        match self {
            FuelGroup::Grass => [214, 196, 94],
            FuelGroup::GrassShrub => [170, 170, 80],
            FuelGroup::Shrub => [120, 140, 60],
            FuelGroup::TimberUnderstory => [60, 110, 50],
            FuelGroup::TimberLitter => [34, 85, 34],
            FuelGroup::SlashBlowdown => [120, 90, 50],
            FuelGroup::NonBurnable => [160, 160, 160],
        }
    }
}

/// Fuel model code such as `GR2` or `TL8`
///
/// Serialized as its textual form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FuelCode {
    group: FuelGroup,
    number: u8,
}

impl FuelCode {
    /// Non-burnable sentinel (`NB`) written by firebreaks
    pub const NON_BURNABLE: FuelCode = FuelCode {
        group: FuelGroup::NonBurnable,
        number: 0,
    };

    /// Create a code from group and model number
    pub const fn new(group: FuelGroup, number: u8) -> Self {
        Self { group, number }
    }

    /// Fuel group of this code
    pub const fn group(self) -> FuelGroup {
        self.group
    }

    /// Model number within the group (0 for a bare prefix such as `NB`)
    pub const fn number(self) -> u8 {
        self.number
    }

    /// Whether this code can never carry fire
    pub const fn is_non_burnable(self) -> bool {
        matches!(self.group, FuelGroup::NonBurnable)
    }
}

impl fmt::Display for FuelCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.number == 0 {
            write!(f, "{}", self.group.prefix())
        } else {
            write!(f, "{}{}", self.group.prefix(), self.number)
        }
    }
}

impl FromStr for FuelCode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let invalid = || CoreError::InvalidFuelCode(s.to_string());

        let prefix = trimmed.get(..2).ok_or_else(invalid)?;
        let group = FuelGroup::from_prefix(prefix).ok_or_else(invalid)?;
        let digits = &trimmed[2..];
        let number = if digits.is_empty() {
            0
        } else {
            digits.parse::<u8>().map_err(|_| invalid())?
        };

        Ok(FuelCode { group, number })
    }
}

impl TryFrom<String> for FuelCode {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<FuelCode> for String {
    fn from(code: FuelCode) -> Self {
        code.to_string()
    }
}

/// Parameters of one surface fuel model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FuelModel {
    pub code: FuelCode,
    /// Dead 1-hr fuel load (tons/acre)
    pub load_1hr: f64,
    /// Dead 10-hr fuel load (tons/acre)
    pub load_10hr: f64,
    /// Dead 100-hr fuel load (tons/acre)
    pub load_100hr: f64,
    /// Live herbaceous fuel load (tons/acre)
    pub load_live_herb: f64,
    /// Surface-area-to-volume ratio of dead 1-hr fuel (1/ft)
    pub sav_ratio: f64,
    /// Dead fuel moisture of extinction
    pub extinction_moisture: Fraction,
    /// Heat content (BTU/lb)
    pub heat_content: f64,
    /// Fuel bed depth (ft)
    pub fuel_bed_depth: f64,
}

/// Standard heat content for all Scott & Burgan models (BTU/lb)
pub const STANDARD_HEAT_CONTENT: f64 = 8000.0;

impl FuelModel {
    /// Build a model from the published table columns
    ///
    /// # Arguments
    /// * `code` - Fuel model code
    /// * `loads` - `[1-hr, 10-hr, 100-hr, live herbaceous]` loads (tons/acre)
    /// * `sav_ratio` - Dead 1-hr SAV ratio (1/ft)
    /// * `fuel_bed_depth` - Depth (ft)
    /// * `extinction_percent` - Dead fuel extinction moisture (%)
    pub fn from_table_row(
        code: FuelCode,
        loads: [f64; 4],
        sav_ratio: f64,
        fuel_bed_depth: f64,
        extinction_percent: f64,
    ) -> Self {
        Self {
            code,
            load_1hr: loads[0],
            load_10hr: loads[1],
            load_100hr: loads[2],
            load_live_herb: loads[3],
            sav_ratio,
            extinction_moisture: Fraction::clamped(extinction_percent / 100.0),
            heat_content: STANDARD_HEAT_CONTENT,
            fuel_bed_depth,
        }
    }

    /// Non-burnable model for a given NB code (all loads zero)
    pub fn non_burnable(code: FuelCode) -> Self {
        Self {
            code,
            load_1hr: 0.0,
            load_10hr: 0.0,
            load_100hr: 0.0,
            load_live_herb: 0.0,
            sav_ratio: 0.0,
            extinction_moisture: Fraction::ZERO,
            heat_content: 0.0,
            fuel_bed_depth: 0.0,
        }
    }

    /// Total dead fuel load (1-hr + 10-hr + 100-hr)
    pub fn total_dead_load(&self) -> f64 {
        self.load_1hr + self.load_10hr + self.load_100hr
    }

    /// Whether this model can never carry fire
    pub fn is_non_burnable(&self) -> bool {
        self.code.is_non_burnable()
    }

    /// Check that the parameters are physically meaningful
    ///
    /// Extinction moisture must be a fraction in `[0, 1]`, not a percent. Loads
    /// and heat content must be finite and non-negative. Burnable models also
    /// need a positive surface-area-to-volume ratio and fuel bed depth.
    ///
    /// # Errors
    /// Returns [`CoreError::InvalidConfig`] naming the code and the bad field
    pub fn validate(&self) -> CoreResult<()> {
        let invalid = |field: &str, value: f64| {
            Err(CoreError::InvalidConfig(format!(
                "fuel model {}: {} out of range ({})",
                self.code, field, value
            )))
        };

        let extinction = *self.extinction_moisture;
        if !(0.0..=1.0).contains(&extinction) {
            return invalid("extinction moisture", extinction);
        }
        for (field, value) in [
            ("1-hr load", self.load_1hr),
            ("10-hr load", self.load_10hr),
            ("100-hr load", self.load_100hr),
            ("live herbaceous load", self.load_live_herb),
            ("heat content", self.heat_content),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return invalid(field, value);
            }
        }
        if self.is_non_burnable() {
            return Ok(());
        }
        if !(self.sav_ratio.is_finite() && self.sav_ratio > 0.0) {
            return invalid("surface-area-to-volume ratio", self.sav_ratio);
        }
        if !(self.fuel_bed_depth.is_finite() && self.fuel_bed_depth > 0.0) {
            return invalid("fuel bed depth", self.fuel_bed_depth);
        }
        Ok(())
    }
}

/// Lookup table from fuel code to fuel model parameters
#[derive(Debug, Clone, Default)]
pub struct FuelTable {
    models: FxHashMap<FuelCode, FuelModel>,
}

impl FuelTable {
    /// Empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// The 40 standard Scott & Burgan (2005) fuel models plus the non-burnable
    /// models `NB`, `NB1`, `NB2`, `NB3`, `NB8` and `NB9`.
    pub fn scott_burgan() -> Self {
        use FuelGroup::{
            Grass, GrassShrub, NonBurnable, SlashBlowdown, Shrub, TimberLitter,
            TimberUnderstory,
        };

        // (group, number, [1hr, 10hr, 100hr, live herb], SAV 1hr, depth, Mx%)
        #[rustfmt::skip]
        let rows: [(FuelGroup, u8, [f64; 4], f64, f64, f64); 40] = [
            (Grass, 1, [0.10, 0.00, 0.00, 0.30], 2200.0, 0.4, 15.0),
            (Grass, 2, [0.10, 0.00, 0.00, 1.00], 2000.0, 1.0, 15.0),
            (Grass, 3, [0.10, 0.40, 0.00, 1.50], 1500.0, 2.0, 30.0),
            (Grass, 4, [0.25, 0.00, 0.00, 1.90], 2000.0, 2.0, 15.0),
            (Grass, 5, [0.40, 0.00, 0.00, 2.50], 1800.0, 1.5, 40.0),
            (Grass, 6, [0.10, 0.00, 0.00, 3.40], 2200.0, 1.5, 40.0),
            (Grass, 7, [1.00, 0.00, 0.00, 5.40], 2000.0, 3.0, 15.0),
            (Grass, 8, [0.50, 1.00, 0.00, 7.30], 1500.0, 4.0, 30.0),
            (Grass, 9, [1.00, 1.00, 0.00, 9.00], 1800.0, 5.0, 40.0),
            (GrassShrub, 1, [0.20, 0.00, 0.00, 0.50], 2000.0, 0.9, 15.0),
            (GrassShrub, 2, [0.50, 0.50, 0.00, 0.60], 2000.0, 1.5, 15.0),
            (GrassShrub, 3, [0.30, 0.25, 0.00, 1.45], 1800.0, 1.8, 40.0),
            (GrassShrub, 4, [1.90, 0.30, 0.10, 3.40], 1800.0, 2.1, 40.0),
            (Shrub, 1, [0.25, 0.25, 0.00, 0.15], 2000.0, 1.0, 15.0),
            (Shrub, 2, [1.35, 2.40, 0.75, 0.00], 2000.0, 1.0, 15.0),
            (Shrub, 3, [0.45, 3.00, 0.00, 0.00], 1600.0, 2.4, 40.0),
            (Shrub, 4, [0.85, 1.15, 0.20, 0.00], 2000.0, 3.0, 30.0),
            (Shrub, 5, [3.60, 2.10, 0.00, 0.00], 750.0, 6.0, 15.0),
            (Shrub, 6, [2.90, 1.45, 0.00, 0.00], 750.0, 2.0, 30.0),
            (Shrub, 7, [3.50, 5.30, 2.20, 0.00], 750.0, 6.0, 15.0),
            (Shrub, 8, [2.05, 3.40, 0.85, 0.00], 750.0, 3.0, 40.0),
            (Shrub, 9, [4.50, 2.45, 0.00, 1.55], 750.0, 4.4, 40.0),
            (TimberUnderstory, 1, [0.20, 0.90, 1.50, 0.20], 2000.0, 0.6, 20.0),
            (TimberUnderstory, 2, [0.95, 1.80, 1.25, 0.00], 2000.0, 1.0, 30.0),
            (TimberUnderstory, 3, [1.10, 0.15, 0.25, 0.65], 1800.0, 1.3, 30.0),
            (TimberUnderstory, 4, [4.50, 0.00, 0.00, 0.00], 2300.0, 0.5, 12.0),
            (TimberUnderstory, 5, [4.00, 4.00, 3.00, 0.00], 1500.0, 1.0, 25.0),
            (TimberLitter, 1, [1.00, 2.20, 3.60, 0.00], 2000.0, 0.2, 30.0),
            (TimberLitter, 2, [1.40, 2.30, 2.20, 0.00], 2000.0, 0.2, 25.0),
            (TimberLitter, 3, [0.50, 2.20, 2.80, 0.00], 2000.0, 0.3, 20.0),
            (TimberLitter, 4, [0.50, 1.50, 4.20, 0.00], 2000.0, 0.4, 25.0),
            (TimberLitter, 5, [1.15, 2.50, 4.40, 0.00], 2000.0, 0.6, 25.0),
            (TimberLitter, 6, [2.40, 1.20, 1.20, 0.00], 2000.0, 0.3, 25.0),
            (TimberLitter, 7, [0.30, 1.40, 8.10, 0.00], 2000.0, 0.4, 25.0),
            (TimberLitter, 8, [5.80, 1.40, 1.10, 0.00], 1800.0, 0.3, 35.0),
            (TimberLitter, 9, [6.65, 3.30, 4.15, 0.00], 1800.0, 0.6, 35.0),
            (SlashBlowdown, 1, [1.50, 3.00, 11.00, 0.00], 2000.0, 1.0, 25.0),
            (SlashBlowdown, 2, [4.50, 4.25, 4.00, 0.00], 2000.0, 1.0, 25.0),
            (SlashBlowdown, 3, [5.50, 2.75, 3.00, 0.00], 2000.0, 1.2, 25.0),
            (SlashBlowdown, 4, [5.25, 3.50, 5.25, 0.00], 2000.0, 2.7, 25.0),
        ];

        let mut table = Self::new();
        for (group, number, loads, sav, depth, extinction) in rows {
            let code = FuelCode::new(group, number);
            table.insert(FuelModel::from_table_row(code, loads, sav, depth, extinction));
        }
        for number in [0, 1, 2, 3, 8, 9] {
            table.insert(FuelModel::non_burnable(FuelCode::new(NonBurnable, number)));
        }
        table
    }

    /// Insert or replace a model
    pub fn insert(&mut self, model: FuelModel) {
        self.models.insert(model.code, model);
    }

    /// Look up a fuel model
    ///
    /// # Errors
    /// Returns [`CoreError::UnknownFuelCode`] if the code is absent. This signals a
    /// configuration defect; callers must not substitute a default fuel.
    pub fn get(&self, code: FuelCode) -> CoreResult<&FuelModel> {
        self.models
            .get(&code)
            .ok_or_else(|| CoreError::UnknownFuelCode(code.to_string()))
    }

    /// Parse and look up a textual code such as `"GS2"`
    ///
    /// # Errors
    /// Returns [`CoreError::InvalidFuelCode`] for unparseable text and
    /// [`CoreError::UnknownFuelCode`] for codes missing from the table.
    pub fn get_str(&self, code: &str) -> CoreResult<&FuelModel> {
        self.get(code.parse()?)
    }

    /// Whether the table contains a code
    pub fn contains(&self, code: FuelCode) -> bool {
        self.models.contains_key(&code)
    }

    /// Number of models in the table
    pub fn len(&self) -> usize {
        self.models.len()
    }

    /// Whether the table is empty
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Load a table from a JSON array of [`FuelModel`]
    ///
    /// # Errors
    /// Returns an error if the JSON cannot be parsed, or
    /// [`CoreError::InvalidConfig`] if a model fails [`FuelModel::validate`]
    pub fn from_json(json: &str) -> CoreResult<Self> {
        let models: Vec<FuelModel> = serde_json::from_str(json)?;
        let mut table = Self::new();
        for model in models {
            model.validate()?;
            table.insert(model);
        }
        Ok(table)
    }

    /// Serialize the table as a JSON array, sorted by code for stable output
    ///
    /// # Errors
    /// Returns an error if serialization fails
    pub fn to_json(&self) -> CoreResult<String> {
        let mut models: Vec<&FuelModel> = self.models.values().collect();
        models.sort_by_key(|m| m.code.to_string());
        Ok(serde_json::to_string_pretty(&models)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display_codes() {
        let code: FuelCode = "gs2".parse().unwrap();
        assert_eq!(code.group(), FuelGroup::GrassShrub);
        assert_eq!(code.number(), 2);
        assert_eq!(code.to_string(), "GS2");

        let nb: FuelCode = "NB".parse().unwrap();
        assert_eq!(nb, FuelCode::NON_BURNABLE);
        assert_eq!(nb.to_string(), "NB");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            "XX1".parse::<FuelCode>(),
            Err(CoreError::InvalidFuelCode(_))
        ));
        assert!("G".parse::<FuelCode>().is_err());
        assert!("GRx".parse::<FuelCode>().is_err());
    }

    #[test]
    fn test_scott_burgan_table_contents() {
        let table = FuelTable::scott_burgan();
        assert_eq!(table.len(), 46);

        let gr2 = table.get_str("GR2").unwrap();
        assert_eq!(gr2.load_live_herb, 1.0);
        assert!((*gr2.extinction_moisture - 0.15).abs() < 1e-12);
        assert!(table.get_str("NB").unwrap().is_non_burnable());
    }

    #[test]
    fn test_unknown_code_is_fatal_lookup() {
        let table = FuelTable::scott_burgan();
        let err = table.get_str("GR42").unwrap_err();
        assert!(matches!(err, CoreError::UnknownFuelCode(ref c) if c == "GR42"));
    }

    #[test]
    fn test_json_round_trip_preserves_models() {
        let table = FuelTable::scott_burgan();
        let json = table.to_json().unwrap();
        let loaded = FuelTable::from_json(&json).unwrap();
        assert_eq!(loaded.len(), table.len());
        assert_eq!(
            loaded.get_str("TL8").unwrap(),
            table.get_str("TL8").unwrap()
        );
    }

    #[test]
    fn test_from_json_rejects_out_of_range_models() {
        let table = FuelTable::scott_burgan();
        let gr2 = *table.get_str("GR2").unwrap();

        // Extinction moisture given as a percent instead of a fraction
        let mut json = serde_json::to_value(vec![gr2]).unwrap();
        json[0]["extinction_moisture"] = serde_json::json!(15.0);
        let err = FuelTable::from_json(&json.to_string()).unwrap_err();
        assert!(matches!(err, CoreError::InvalidConfig(ref m) if m.contains("GR2")));

        let flat = FuelModel {
            fuel_bed_depth: 0.0,
            ..gr2
        };
        let no_surface = FuelModel {
            sav_ratio: -1.0,
            ..gr2
        };
        for bad in [flat, no_surface] {
            let json = serde_json::to_string(&vec![bad]).unwrap();
            assert!(matches!(
                FuelTable::from_json(&json),
                Err(CoreError::InvalidConfig(_))
            ));
        }

        // Non-burnable models carry no geometry and still load
        let nb = *table.get_str("NB").unwrap();
        let json = serde_json::to_string(&vec![nb, gr2]).unwrap();
        assert_eq!(FuelTable::from_json(&json).unwrap().len(), 2);
    }

    #[test]
    fn test_group_multipliers_order() {
        assert!(FuelGroup::Grass.spread_multiplier() > FuelGroup::TimberLitter.spread_multiplier());
        assert_eq!(FuelGroup::NonBurnable.spread_multiplier(), 0.0);
    }
}
