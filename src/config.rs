//! Configuration system for the leafcutter colony simulation.
//!
//! Parameters are grouped by ecological subsystem and loaded from YAML.
//! Every record is validated when it is built or loaded; a configuration
//! that is handed back to the caller always satisfies every bound.

use crate::error::{ConfigError, ValidationError, Violation};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Location of the shipped default parameters, relative to the working directory
pub const DEFAULT_CONFIG_PATH: &str = "data/default_params.yaml";

/// Plant regeneration mechanics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlantRegenerationConfig {
    /// Steps between regeneration attempts
    pub interval: u32,
    /// Chance of a new plant per attempt (0.0 - 1.0)
    pub probability: f64,
    /// Maximum plants on the grid
    pub max_plants: u32,
}

/// Ant reproduction mechanics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReproductionConfig {
    /// Fungus nutrition needed for one reproduction
    pub food_threshold: u32,
    /// Steps between reproduction attempts
    pub larvae_period: u32,
    /// New ants per successful reproduction
    pub larvae_per_cycle: u32,
}

/// Multipliers applied while a climate phase is active.
///
/// Rain phases read `predator_spawn_reduction` and dry phases read
/// `predator_spawn_increase`; either may be left out of the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClimateEffects {
    /// Plant regeneration rate modifier
    pub plant_regen_multiplier: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub predator_spawn_reduction: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub predator_spawn_increase: Option<f64>,
}

/// Climate cycle configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClimateConfig {
    /// Steps between climate changes
    pub cycle_length: u32,
    /// Steps of rainy weather
    pub rain_duration: u32,
    /// Steps of dry weather
    pub dry_duration: u32,
    pub rain_effects: ClimateEffects,
    pub dry_effects: ClimateEffects,
}

/// Predator-prey balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredatorBalanceConfig {
    /// Optimal ants per predator
    pub target_ant_predator_ratio: f64,
    /// Rate of spawn adjustment (0.0 - 1.0)
    pub spawn_adjustment_rate: f64,
    /// Baseline predator spawn probability
    pub base_spawn_chance: f64,
}

/// Parasite behavior
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParasiteDynamicsConfig {
    /// Probability of a new parasite per step (0.0 - 1.0)
    pub spread_chance: f64,
    /// Distance for parasite effects
    pub infection_radius: u32,
}

/// Complete simulation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Grid dimensions (NxN)
    pub grid_size: u32,
    /// Total simulation steps
    pub simulation_steps: u32,
    /// Delay between frames in seconds
    pub animation_speed: f64,

    pub initial_ants: u32,
    pub initial_plants: u32,
    pub initial_fungi: u32,
    pub initial_parasites: u32,
    pub initial_predators: u32,

    pub plant_regeneration: PlantRegenerationConfig,
    pub reproduction: ReproductionConfig,
    pub climate: ClimateConfig,
    pub predator_balance: PredatorBalanceConfig,
    pub parasite_dynamics: ParasiteDynamicsConfig,
}

// Bound checks. NaN is rejected by every float bound.

fn positive_int(field: &str, value: u32) -> Result<(), ValidationError> {
    if value == 0 {
        return Err(ValidationError::new(field, Violation::Positive));
    }
    Ok(())
}

fn int_in_range(field: &str, value: u32, min: u32, max: u32) -> Result<(), ValidationError> {
    if value < min || value > max {
        return Err(ValidationError::new(
            field,
            Violation::Range {
                min: min as f64,
                max: max as f64,
            },
        ));
    }
    Ok(())
}

fn positive(field: &str, value: f64) -> Result<(), ValidationError> {
    if value.is_nan() || value <= 0.0 {
        return Err(ValidationError::new(field, Violation::Positive));
    }
    Ok(())
}

fn non_negative(field: &str, value: f64) -> Result<(), ValidationError> {
    if value.is_nan() || value < 0.0 {
        return Err(ValidationError::new(field, Violation::NonNegative));
    }
    Ok(())
}

fn unit_interval(field: &str, value: f64) -> Result<(), ValidationError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(ValidationError::new(
            field,
            Violation::Range { min: 0.0, max: 1.0 },
        ));
    }
    Ok(())
}

fn at_most(
    field: &str,
    value: u32,
    limit_field: &'static str,
    limit: u32,
) -> Result<(), ValidationError> {
    if value > limit {
        return Err(ValidationError::new(
            field,
            Violation::AtMost {
                limit_field,
                limit: limit as f64,
            },
        ));
    }
    Ok(())
}

/// Convert a decoder failure into a validation error naming the offending field
fn schema_error(err: serde_path_to_error::Error<serde_yaml::Error>) -> ValidationError {
    let message = err.inner().to_string();
    let mut field = match err.path().to_string() {
        root if root == "." => String::new(),
        path => path,
    };

    // A missing key is reported at its parent record; name the key itself
    if let Some(key) = missing_field(&message) {
        if field.is_empty() {
            field = key.to_string();
        } else {
            field = format!("{}.{}", field, key);
        }
    }

    if field.is_empty() {
        ValidationError::schema(message)
    } else {
        ValidationError::new(field, Violation::Schema(message))
    }
}

fn missing_field(message: &str) -> Option<&str> {
    let rest = message.split("missing field `").nth(1)?;
    rest.split('`').next()
}

impl PlantRegenerationConfig {
    pub fn new(interval: u32, probability: f64, max_plants: u32) -> Result<Self, ValidationError> {
        let config = Self {
            interval,
            probability,
            max_plants,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        positive_int("interval", self.interval)?;
        unit_interval("probability", self.probability)?;
        positive_int("max_plants", self.max_plants)
    }
}

impl ReproductionConfig {
    pub fn new(
        food_threshold: u32,
        larvae_period: u32,
        larvae_per_cycle: u32,
    ) -> Result<Self, ValidationError> {
        let config = Self {
            food_threshold,
            larvae_period,
            larvae_per_cycle,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        positive_int("food_threshold", self.food_threshold)?;
        positive_int("larvae_period", self.larvae_period)?;
        positive_int("larvae_per_cycle", self.larvae_per_cycle)
    }
}

impl ClimateEffects {
    pub fn new(
        plant_regen_multiplier: f64,
        predator_spawn_reduction: Option<f64>,
        predator_spawn_increase: Option<f64>,
    ) -> Result<Self, ValidationError> {
        let effects = Self {
            plant_regen_multiplier,
            predator_spawn_reduction,
            predator_spawn_increase,
        };
        effects.validate()?;
        Ok(effects)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        non_negative("plant_regen_multiplier", self.plant_regen_multiplier)?;
        if let Some(reduction) = self.predator_spawn_reduction {
            non_negative("predator_spawn_reduction", reduction)?;
        }
        if let Some(increase) = self.predator_spawn_increase {
            non_negative("predator_spawn_increase", increase)?;
        }
        Ok(())
    }
}

impl ClimateConfig {
    pub fn new(
        cycle_length: u32,
        rain_duration: u32,
        dry_duration: u32,
        rain_effects: ClimateEffects,
        dry_effects: ClimateEffects,
    ) -> Result<Self, ValidationError> {
        let config = Self {
            cycle_length,
            rain_duration,
            dry_duration,
            rain_effects,
            dry_effects,
        };
        config.validate()?;
        Ok(config)
    }

    /// Per-field bounds first, then each duration against the cycle length
    pub fn validate(&self) -> Result<(), ValidationError> {
        positive_int("cycle_length", self.cycle_length)?;
        positive_int("rain_duration", self.rain_duration)?;
        positive_int("dry_duration", self.dry_duration)?;
        self.rain_effects
            .validate()
            .map_err(|e| e.nested("rain_effects"))?;
        self.dry_effects
            .validate()
            .map_err(|e| e.nested("dry_effects"))?;

        at_most(
            "rain_duration",
            self.rain_duration,
            "cycle_length",
            self.cycle_length,
        )?;
        at_most(
            "dry_duration",
            self.dry_duration,
            "cycle_length",
            self.cycle_length,
        )
    }
}

impl PredatorBalanceConfig {
    pub fn new(
        target_ant_predator_ratio: f64,
        spawn_adjustment_rate: f64,
        base_spawn_chance: f64,
    ) -> Result<Self, ValidationError> {
        let config = Self {
            target_ant_predator_ratio,
            spawn_adjustment_rate,
            base_spawn_chance,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        positive("target_ant_predator_ratio", self.target_ant_predator_ratio)?;
        unit_interval("spawn_adjustment_rate", self.spawn_adjustment_rate)?;
        non_negative("base_spawn_chance", self.base_spawn_chance)
    }
}

impl ParasiteDynamicsConfig {
    pub fn new(spread_chance: f64, infection_radius: u32) -> Result<Self, ValidationError> {
        let config = Self {
            spread_chance,
            infection_radius,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        // infection_radius is unsigned, so non-negativity holds by construction
        unit_interval("spread_chance", self.spread_chance)
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self::builtin()
    }
}

impl SimulationConfig {
    /// Compiled-in defaults, identical to the shipped `data/default_params.yaml`
    pub fn builtin() -> Self {
        Self {
            grid_size: 20,
            simulation_steps: 100,
            animation_speed: 0.2,
            initial_ants: 30,
            initial_plants: 40,
            initial_fungi: 10,
            initial_parasites: 5,
            initial_predators: 3,
            plant_regeneration: PlantRegenerationConfig {
                interval: 5,
                probability: 0.3,
                max_plants: 60,
            },
            reproduction: ReproductionConfig {
                food_threshold: 15,
                larvae_period: 10,
                larvae_per_cycle: 1,
            },
            climate: ClimateConfig {
                cycle_length: 25,
                rain_duration: 10,
                dry_duration: 15,
                rain_effects: ClimateEffects {
                    plant_regen_multiplier: 2.0,
                    predator_spawn_reduction: Some(0.5),
                    predator_spawn_increase: None,
                },
                dry_effects: ClimateEffects {
                    plant_regen_multiplier: 0.3,
                    predator_spawn_reduction: None,
                    predator_spawn_increase: Some(1.5),
                },
            },
            predator_balance: PredatorBalanceConfig {
                target_ant_predator_ratio: 10.0,
                spawn_adjustment_rate: 0.1,
                base_spawn_chance: 0.05,
            },
            parasite_dynamics: ParasiteDynamicsConfig {
                spread_chance: 0.05,
                infection_radius: 1,
            },
        }
    }

    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ConfigError::NotFound(path.to_path_buf()),
            _ => ConfigError::Io(e),
        })?;

        let config = Self::from_yaml_slice(&bytes)?;
        log::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Parse and validate an in-memory YAML document
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        Self::from_yaml_slice(yaml.as_bytes())
    }

    /// Parse and validate raw YAML bytes; invalid UTF-8 is a schema error
    pub fn from_yaml_slice(yaml: &[u8]) -> Result<Self, ConfigError> {
        let config: SimulationConfig =
            serde_path_to_error::deserialize(serde_yaml::Deserializer::from_slice(yaml))
                .map_err(schema_error)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path`, substituting the builtin defaults only if the file is absent.
    ///
    /// Any other failure, including an invalid file, is returned unchanged.
    pub fn get_default_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        match Self::from_file(&path) {
            Err(ConfigError::NotFound(missing)) => {
                log::info!(
                    "{} not found, using builtin defaults",
                    missing.display()
                );
                let config = Self::builtin();
                config.validate()?;
                Ok(config)
            }
            other => other,
        }
    }

    /// Default configuration: the shipped parameter file, else the builtin values
    pub fn get_default() -> Result<Self, ConfigError> {
        Self::get_default_from(DEFAULT_CONFIG_PATH)
    }

    /// Serialize to a YAML document
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        serde_yaml::to_string(self).map_err(ConfigError::Serialization)
    }

    /// Save configuration to a YAML file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let yaml = self.to_yaml()?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    /// Validate every field, then the root cross-field invariant.
    ///
    /// Stops at the first violation; field paths are dotted
    /// (`climate.rain_duration`).
    pub fn validate(&self) -> Result<(), ValidationError> {
        int_in_range("grid_size", self.grid_size, 5, 100)?;
        positive_int("simulation_steps", self.simulation_steps)?;
        non_negative("animation_speed", self.animation_speed)?;

        self.plant_regeneration
            .validate()
            .map_err(|e| e.nested("plant_regeneration"))?;
        self.reproduction
            .validate()
            .map_err(|e| e.nested("reproduction"))?;
        self.climate.validate().map_err(|e| e.nested("climate"))?;
        self.predator_balance
            .validate()
            .map_err(|e| e.nested("predator_balance"))?;
        self.parasite_dynamics
            .validate()
            .map_err(|e| e.nested("parasite_dynamics"))?;

        at_most(
            "initial_plants",
            self.initial_plants,
            "plant_regeneration.max_plants",
            self.plant_regeneration.max_plants,
        )
    }

    /// Total entities seeded at start-up
    pub fn initial_population(&self) -> u64 {
        [
            self.initial_ants,
            self.initial_plants,
            self.initial_fungi,
            self.initial_parasites,
            self.initial_predators,
        ]
        .iter()
        .map(|&n| n as u64)
        .sum()
    }

    /// Format the configuration as a one-line summary
    pub fn summary(&self) -> String {
        format!(
            "Grid:{}x{} | Steps:{} | Ants:{} Plants:{}/{} Fungi:{} Parasites:{} Predators:{} | Cycle:{} (rain {}, dry {})",
            self.grid_size,
            self.grid_size,
            self.simulation_steps,
            self.initial_ants,
            self.initial_plants,
            self.plant_regeneration.max_plants,
            self.initial_fungi,
            self.initial_parasites,
            self.initial_predators,
            self.climate.cycle_length,
            self.climate.rain_duration,
            self.climate.dry_duration,
        )
    }
}
