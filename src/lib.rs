//! # leafcutter
//!
//! Configuration and ecological balance rules for a leafcutter ant colony
//! simulation (ants, plants, fungi, parasites, predators).
//!
//! ## Features
//!
//! - **Validated**: every parameter is range-checked on load, with two
//!   cross-field invariants (climate durations, initial plants)
//! - **Configurable**: YAML parameter files with a builtin fallback
//! - **Balance rules**: climate phases, spawn chances and ecosystem health
//!   scoring as pure functions over population counts
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use leafcutter::SimulationConfig;
//!
//! // Shipped data/default_params.yaml, or the builtin values if it is missing
//! let config = SimulationConfig::get_default().unwrap();
//! println!("{}", config.summary());
//!
//! // Explicit file: fails if absent or invalid
//! let custom = SimulationConfig::from_file("my_params.yaml").unwrap();
//! assert!(custom.initial_plants <= custom.plant_regeneration.max_plants);
//! ```
//!
//! ## Balance
//!
//! ```rust
//! use leafcutter::balance::{EcosystemBalance, PopulationCounts};
//! use leafcutter::SimulationConfig;
//!
//! let config = SimulationConfig::builtin();
//! let balance = EcosystemBalance::new(config.clone());
//! let (score, assessment) = balance.sustainability(&PopulationCounts::initial(&config));
//! println!("{:.2} {}", score, assessment);
//! ```

pub mod balance;
pub mod climate;
pub mod config;
pub mod error;

// Re-export main types
pub use climate::{Climate, ClimateCycle};
pub use config::{SimulationConfig, DEFAULT_CONFIG_PATH};
pub use error::{ConfigError, ValidationError, Violation};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
