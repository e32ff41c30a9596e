/***************************************/
/*        3rd party libraries          */
/***************************************/
use serde::Deserialize;
use serde::Serialize;
use std::fs;

/***************************************/
/*           Local modules             */
/***************************************/
use crate::shared::{CommandError, Floor};

/***************************************/
/*       Public data structures        */
/***************************************/
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct SimConfig {
    pub building: BuildingConfig,
    pub timing: TimingConfig,
}

/// Restart-sensitive parameters: changing any of these only takes effect
/// through a full reset, because cars have to be recreated.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct BuildingConfig {
    pub car_count: usize,
    pub min_floor: Floor,
    pub max_floor: Floor,
}

/// Durations in ticks. These apply live: a running car picks up the new
/// value the next time it schedules a transition.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct TimingConfig {
    pub floor_travel_ticks: u32,
    pub door_operation_ticks: u32,
    pub door_stay_ticks: u32,
}

impl Default for SimConfig {
    fn default() -> SimConfig {
        SimConfig {
            building: BuildingConfig::default(),
            timing: TimingConfig::default(),
        }
    }
}

impl Default for BuildingConfig {
    fn default() -> BuildingConfig {
        BuildingConfig {
            car_count: 2,
            min_floor: -1,
            max_floor: 3,
        }
    }
}

impl Default for TimingConfig {
    fn default() -> TimingConfig {
        TimingConfig {
            floor_travel_ticks: 3,
            door_operation_ticks: 1,
            door_stay_ticks: 3,
        }
    }
}

impl SimConfig {
    pub fn validate(&self) -> Result<(), CommandError> {
        if self.building.car_count < 1 {
            return Err(CommandError::InvalidConfiguration(
                "car_count must be at least 1".to_string(),
            ));
        }
        if self.building.max_floor <= self.building.min_floor {
            return Err(CommandError::InvalidConfiguration(
                "max_floor must be greater than min_floor".to_string(),
            ));
        }
        if self.timing.floor_travel_ticks == 0 {
            return Err(CommandError::InvalidConfiguration(
                "floor_travel_ticks must be positive".to_string(),
            ));
        }
        if self.timing.door_operation_ticks == 0 {
            return Err(CommandError::InvalidConfiguration(
                "door_operation_ticks must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn floor_in_range(&self, floor: Floor) -> bool {
        floor >= self.building.min_floor && floor <= self.building.max_floor
    }

    pub fn car_in_range(&self, car: usize) -> bool {
        car < self.building.car_count
    }

    /// Applies a configuration change atomically. Timing changes go live;
    /// a change to the building section (car count or floor range) is
    /// rejected with `RestartRequired` and leaves everything untouched.
    pub fn apply_update(&mut self, new: SimConfig) -> Result<(), CommandError> {
        new.validate()?;
        if new.building != self.building {
            return Err(CommandError::RestartRequired);
        }
        self.timing = new.timing;
        Ok(())
    }
}

/***************************************/
/*             Public API              */
/***************************************/
pub fn load_config(path: &str) -> Result<SimConfig, Box<dyn std::error::Error>> {
    let config_str = fs::read_to_string(path)?;
    let config: SimConfig = toml::from_str(&config_str)?;
    config.validate()?;
    Ok(config)
}
