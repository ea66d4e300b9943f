//! Radio module payloads and tuning bounds

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::error::ModelError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RadioBand {
    Am,
    Fm,
    Xm,
}

impl fmt::Display for RadioBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RadioBand::Am => "AM",
            RadioBand::Fm => "FM",
            RadioBand::Xm => "XM",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RadioState {
    Acquiring,
    Acquired,
    Multicast,
    NotFound,
}

/// Radio control state; optional fields as for climate.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RadioControlData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency_integer: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency_fraction: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub band: Option<RadioBand>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rds_data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available_h_ds: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hd_channel: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signal_strength: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signal_change_threshold: Option<u8>,
    /// `None` covers both an absent field and an explicit `null`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radio_enable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<RadioState>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RadioControlData {
    /// Overlay every field present in `update` onto `self`.
    pub fn apply(&mut self, update: &RadioControlData) {
        macro_rules! overlay {
            ($($field:ident),*) => {
                $(if update.$field.is_some() {
                    self.$field = update.$field.clone();
                })*
            };
        }
        overlay!(
            frequency_integer,
            frequency_fraction,
            band,
            rds_data,
            available_h_ds,
            hd_channel,
            signal_strength,
            signal_change_threshold,
            radio_enable,
            state
        );
        for (key, value) in &update.extra {
            self.extra.insert(key.clone(), value.clone());
        }
    }

    /// Tuned frequency in band units (MHz for FM, kHz for AM, channel for XM).
    pub fn frequency(&self) -> Option<f64> {
        self.frequency_integer
            .map(|i| f64::from(i) + f64::from(self.frequency_fraction.unwrap_or(0)) / 10.0)
    }
}

/// Inclusive tuning range of one band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrequencyBounds {
    pub band: RadioBand,
    pub min: f64,
    pub max: f64,
    /// Whether `frequencyFraction` is meaningful for this band.
    pub fractional: bool,
}

impl FrequencyBounds {
    /// Standard ranges: FM 87.5-108.0 MHz, AM 535-1705 kHz, XM channels 1-1000.
    pub fn for_band(band: RadioBand) -> Self {
        match band {
            RadioBand::Fm => Self {
                band,
                min: 87.5,
                max: 108.0,
                fractional: true,
            },
            RadioBand::Am => Self {
                band,
                min: 535.0,
                max: 1705.0,
                fractional: false,
            },
            RadioBand::Xm => Self {
                band,
                min: 1.0,
                max: 1000.0,
                fractional: false,
            },
        }
    }

    /// Check `integer`/`fraction` against this band.
    pub fn check(&self, integer: u16, fraction: u8) -> Result<(), ModelError> {
        if fraction > 9 {
            return Err(ModelError::InvalidData(format!(
                "frequencyFraction must be within 0-9, got {}",
                fraction
            )));
        }
        if !self.fractional && fraction != 0 {
            return Err(ModelError::InvalidData(format!(
                "frequencyFraction is not supported on {} band",
                self.band
            )));
        }

        let value = f64::from(integer) + f64::from(fraction) / 10.0;
        if value < self.min || value > self.max {
            return Err(ModelError::InvalidData(format!(
                "Frequency {} is out of {} range {}-{}",
                value, self.band, self.min, self.max
            )));
        }
        Ok(())
    }
}

/// What a radio module supports.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RadioControlCapabilities {
    pub module_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radio_enable_available: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radio_band_available: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radio_frequency_available: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hd_channel_available: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rds_data_available: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available_h_ds_available: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_available: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signal_strength_available: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signal_change_threshold_available: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
