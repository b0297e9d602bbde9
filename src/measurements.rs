//////////////////////////////////////////////////////////////////////
// named body measurements (inches), size presets, validation, and the
// one derived value (collar length) that drafting writes back once.

use std::collections::BTreeMap;
use std::fmt;

use phf::phf_map;

use crate::errors::*;

// name of the derived key; never accepted from user input
pub const COLLAR_LENGTH: &str = "collar_length_calculated";

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash)]
pub enum MeasurementKey {
    HalfChest,
    GarmentLength,
    NeckWidthHalf,
    FrontNeckDrop,
    BackNeckDrop,
    ShoulderWidth,
    ShoulderSlope,
    ArmholeDepth,
    SleeveLength,
    SleeveBicep,
    SleeveCuff,
    CollarHeight,
    PlacketWidth,
    PlacketLength,
}

impl MeasurementKey {

    pub const ALL: [MeasurementKey; 14] = [
        MeasurementKey::HalfChest,
        MeasurementKey::GarmentLength,
        MeasurementKey::NeckWidthHalf,
        MeasurementKey::FrontNeckDrop,
        MeasurementKey::BackNeckDrop,
        MeasurementKey::ShoulderWidth,
        MeasurementKey::ShoulderSlope,
        MeasurementKey::ArmholeDepth,
        MeasurementKey::SleeveLength,
        MeasurementKey::SleeveBicep,
        MeasurementKey::SleeveCuff,
        MeasurementKey::CollarHeight,
        MeasurementKey::PlacketWidth,
        MeasurementKey::PlacketLength,
    ];

    pub fn name(self) -> &'static str {
        match self {
            MeasurementKey::HalfChest => "half_chest",
            MeasurementKey::GarmentLength => "garment_length",
            MeasurementKey::NeckWidthHalf => "neck_width_half",
            MeasurementKey::FrontNeckDrop => "front_neck_drop",
            MeasurementKey::BackNeckDrop => "back_neck_drop",
            MeasurementKey::ShoulderWidth => "shoulder_width",
            MeasurementKey::ShoulderSlope => "shoulder_slope",
            MeasurementKey::ArmholeDepth => "armhole_depth",
            MeasurementKey::SleeveLength => "sleeve_length",
            MeasurementKey::SleeveBicep => "sleeve_bicep",
            MeasurementKey::SleeveCuff => "sleeve_cuff",
            MeasurementKey::CollarHeight => "collar_height",
            MeasurementKey::PlacketWidth => "placket_width",
            MeasurementKey::PlacketLength => "placket_length",
        }
    }

}

impl fmt::Display for MeasurementKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

// define a lookup table matching measurement names to keys
pub static MEASUREMENT_KEYS: phf::Map<&'static str, MeasurementKey> = phf_map! {
    "half_chest" => MeasurementKey::HalfChest,
    "garment_length" => MeasurementKey::GarmentLength,
    "neck_width_half" => MeasurementKey::NeckWidthHalf,
    "front_neck_drop" => MeasurementKey::FrontNeckDrop,
    "back_neck_drop" => MeasurementKey::BackNeckDrop,
    "shoulder_width" => MeasurementKey::ShoulderWidth,
    "shoulder_slope" => MeasurementKey::ShoulderSlope,
    "armhole_depth" => MeasurementKey::ArmholeDepth,
    "sleeve_length" => MeasurementKey::SleeveLength,
    "sleeve_bicep" => MeasurementKey::SleeveBicep,
    "sleeve_cuff" => MeasurementKey::SleeveCuff,
    "collar_height" => MeasurementKey::CollarHeight,
    "placket_width" => MeasurementKey::PlacketWidth,
    "placket_length" => MeasurementKey::PlacketLength,
};

// 0-input function generating a preset measurement set
pub type SizeFunc = fn() -> MeasurementSet;

// define a lookup table matching size names to presets
pub const SIZE_PRESETS: phf::Map<&'static str, SizeFunc> = phf_map! {
    "xs" => MeasurementSet::size_xs,
    "s" => MeasurementSet::size_s,
    "m" => MeasurementSet::size_m,
    "l" => MeasurementSet::size_l,
    "xl" => MeasurementSet::size_xl,
};

//////////////////////////////////////////////////////////////////////

#[derive(Debug, Clone, PartialEq, Default)]
pub struct MeasurementSet {
    size: Option<String>,
    values: BTreeMap<MeasurementKey, f64>,
    collar_length: Option<f64>,  // derived, written once per run
}

impl MeasurementSet {

    pub fn new() -> Self {
        Default::default()
    }

    // values in MeasurementKey::ALL order
    fn from_table(size: &str, table: [f64; 14]) -> Self {

        let mut ms = MeasurementSet::new();
        ms.size = Some(size.to_string());

        for (&key, &value) in MeasurementKey::ALL.iter().zip(table.iter()) {
            ms.values.insert(key, value);
        }

        ms

    }

    pub fn from_pairs(pairs: &[(MeasurementKey, f64)]) -> Self {

        let mut ms = MeasurementSet::new();

        for &(key, value) in pairs {
            ms.values.insert(key, value);
        }

        ms

    }

    pub fn size_xs() -> Self {
        Self::from_table("XS", [17.0, 24.0, 2.875, 2.625, 0.75, 4.25, 1.5, 7.75,
                                6.75, 6.5, 5.5, 3.0, 1.5, 4.75])
    }

    pub fn size_s() -> Self {
        Self::from_table("S", [18.0, 24.5, 3.0, 2.75, 0.75, 4.5, 1.5, 8.0,
                               7.0, 7.0, 6.0, 3.0, 1.5, 5.0])
    }

    pub fn size_m() -> Self {
        Self::from_table("M", [19.0, 25.0, 3.125, 2.875, 0.75, 4.75, 1.5, 8.25,
                               7.25, 7.5, 6.5, 3.0, 1.5, 5.25])
    }

    pub fn size_l() -> Self {
        Self::from_table("L", [20.5, 25.5, 3.25, 3.0, 0.875, 5.0, 1.625, 8.625,
                               7.5, 8.25, 7.0, 3.0, 1.5, 5.5])
    }

    pub fn size_xl() -> Self {
        Self::from_table("XL", [22.0, 26.0, 3.375, 3.125, 0.875, 5.25, 1.75, 9.0,
                                7.75, 9.0, 7.5, 3.25, 1.625, 5.75])
    }

    // look up a preset by case-insensitive name
    pub fn preset(name: &str) -> Result<Self> {

        match SIZE_PRESETS.get(name.to_lowercase().as_str()) {
            Some(f) => Ok(f()),
            None => {
                let mut names: Vec<&str> = Vec::new();
                names.extend(SIZE_PRESETS.keys());
                names.sort();
                bail!("unknown size \"{:}\", expected one of: {:}", name, names.join(", "))
            }
        }

    }

    pub fn size_name(&self) -> Option<&str> {
        self.size.as_deref()
    }

    // raw insert; values are checked by validate() before drafting
    pub fn set(&mut self, key: MeasurementKey, value: f64) -> Option<f64> {
        self.values.insert(key, value)
    }

    pub fn get(&self, key: MeasurementKey) -> Result<f64> {
        match self.values.get(&key) {
            Some(&value) => Ok(value),
            None => Err(ErrorKind::MissingMeasurement(key.name().to_string()).into())
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (MeasurementKey, f64)> + '_ {
        self.values.iter().map(|(&k, &v)| (k, v))
    }

    // every listed key is present, finite and positive
    pub fn validate_keys(&self, keys: &[MeasurementKey]) -> Result<()> {

        for &key in keys {
            let value = self.get(key)?;
            check_positive(key.name(), value)?;
        }

        Ok(())

    }

    pub fn validate(&self) -> Result<()> {
        self.validate_keys(&MeasurementKey::ALL)
    }

    pub fn collar_length(&self) -> Option<f64> {
        self.collar_length
    }

    // write-once: a second write in the same run is an error
    pub fn record_collar_length(&mut self, length: f64) -> Result<()> {

        if self.collar_length.is_some() {
            return Err(ErrorKind::DerivedAlreadySet(COLLAR_LENGTH.to_string()).into());
        }

        check_positive(COLLAR_LENGTH, length)?;

        self.collar_length = Some(length);

        Ok(())

    }

}

pub fn check_positive(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ErrorKind::InvalidMeasurement(name.to_string(), value).into())
    }
}

//////////////////////////////////////////////////////////////////////
