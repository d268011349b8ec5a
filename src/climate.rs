//! Climate cycle: alternating rain and dry phases.

use crate::config::{ClimateConfig, ClimateEffects};
use serde::{Deserialize, Serialize};

/// The two climate phases
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Climate {
    Rain,
    Dry,
}

impl Climate {
    /// Effect multipliers configured for this phase
    pub fn effects<'a>(&self, config: &'a ClimateConfig) -> &'a ClimateEffects {
        match self {
            Climate::Rain => &config.rain_effects,
            Climate::Dry => &config.dry_effects,
        }
    }

    /// Plant regeneration multiplier for this phase
    pub fn plant_regen_multiplier(&self, config: &ClimateConfig) -> f64 {
        self.effects(config).plant_regen_multiplier
    }

    /// Predator spawn multiplier for this phase.
    ///
    /// Rain reads `predator_spawn_reduction`, dry reads
    /// `predator_spawn_increase`. A missing field leaves spawning unchanged.
    pub fn predator_spawn_multiplier(&self, config: &ClimateConfig) -> f64 {
        let value = match self {
            Climate::Rain => config.rain_effects.predator_spawn_reduction,
            Climate::Dry => config.dry_effects.predator_spawn_increase,
        };
        value.unwrap_or(1.0)
    }

    pub fn next(&self) -> Climate {
        match self {
            Climate::Rain => Climate::Dry,
            Climate::Dry => Climate::Rain,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Climate::Rain => "rain",
            Climate::Dry => "dry",
        }
    }
}

/// Tracks the active phase across simulation steps
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ClimateCycle {
    pub current: Climate,
    /// Steps spent in the current phase
    pub timer: u32,
    pub cycle_length: u32,
}

impl ClimateCycle {
    /// Cycles always open with a dry phase
    pub fn new(config: &ClimateConfig) -> Self {
        Self {
            current: Climate::Dry,
            timer: 0,
            cycle_length: config.cycle_length,
        }
    }

    /// Advance one step, switching phase once the timer reaches the cycle length
    pub fn advance(&mut self) -> Climate {
        self.timer += 1;
        if self.timer >= self.cycle_length {
            self.current = self.current.next();
            self.timer = 0;
            log::debug!("Climate switched to {}", self.current.name());
        }
        self.current
    }

    /// Phase after `step` advances from a fresh cycle
    pub fn phase_at(step: u64, cycle_length: u32) -> Climate {
        if cycle_length == 0 {
            return Climate::Dry;
        }
        if (step / cycle_length as u64) % 2 == 0 {
            Climate::Dry
        } else {
            Climate::Rain
        }
    }

    /// Steps remaining before the next switch
    pub fn steps_until_switch(&self) -> u32 {
        self.cycle_length.saturating_sub(self.timer)
    }
}
