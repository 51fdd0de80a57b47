use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Climate {
    Hot,
    Humid,
    Mild,
    Cold,
}

impl Climate {
    pub fn as_str(self) -> &'static str {
        match self {
            Climate::Hot => "hot",
            Climate::Humid => "humid",
            Climate::Mild => "mild",
            Climate::Cold => "cold",
        }
    }
}

impl fmt::Display for Climate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Climate {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "hot" => Ok(Climate::Hot),
            "humid" => Ok(Climate::Humid),
            "mild" => Ok(Climate::Mild),
            "cold" => Ok(Climate::Cold),
            _ => Err(ValidationError::UnknownClimate(s.to_string())),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Female,
    Male,
    Other,
}

impl Gender {
    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Female => "female",
            Gender::Male => "male",
            Gender::Other => "other",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "female" => Ok(Gender::Female),
            "male" => Ok(Gender::Male),
            "other" => Ok(Gender::Other),
            _ => Err(ValidationError::UnknownGender(s.to_string())),
        }
    }
}

/// Personal attributes used to derive the daily target. Every field may be
/// unset; unset fields are never filled in with calculation defaults.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq)]
pub struct Profile {
    /// Body weight in kilograms
    pub weight: Option<f64>,
    pub climate: Option<Climate>,
    pub gender: Option<Gender>,
}

/// A partial profile change. `None` leaves the stored field as it is.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ProfileUpdate {
    pub weight: Option<f64>,
    pub climate: Option<Climate>,
    pub gender: Option<Gender>,
}

impl ProfileUpdate {
    pub fn weight(weight: f64) -> Self {
        Self {
            weight: Some(weight),
            ..Self::default()
        }
    }

    pub fn climate(climate: Climate) -> Self {
        Self {
            climate: Some(climate),
            ..Self::default()
        }
    }

    pub fn gender(gender: Gender) -> Self {
        Self {
            gender: Some(gender),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.weight.is_none() && self.climate.is_none() && self.gender.is_none()
    }

    /// Rejects weights that are not finite or not above zero.
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self.weight {
            Some(weight) if !weight.is_finite() || weight <= 0.0 => {
                Err(ValidationError::InvalidWeight(weight))
            }
            _ => Ok(()),
        }
    }
}

impl Profile {
    pub fn merge(&mut self, update: ProfileUpdate) {
        if let Some(weight) = update.weight {
            self.weight = Some(weight);
        }
        if let Some(climate) = update.climate {
            self.climate = Some(climate);
        }
        if let Some(gender) = update.gender {
            self.gender = Some(gender);
        }
    }
}
