//! Ecological balance rules.
//!
//! Stateless scoring and spawn-chance functions over population counts and
//! the simulation configuration. The caller owns the entities and the grid;
//! only counts cross this boundary.

use crate::climate::Climate;
use crate::config::SimulationConfig;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;
use std::path::Path;

/// Optimal ant population range (inclusive)
const OPTIMAL_ANTS: (u32, u32) = (20, 60);
/// Optimal total food sources (plants + fungi)
const OPTIMAL_FOOD: u64 = 30;
/// Parasite pressure above which the impact becomes severe
const PARASITE_PRESSURE_LIMIT: f64 = 0.2;

/// Entity counts at one point in time
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopulationCounts {
    pub ants: u32,
    pub plants: u32,
    pub fungi: u32,
    pub parasites: u32,
    pub predators: u32,
}

impl PopulationCounts {
    /// Counts at start-up, as seeded from the configuration
    pub fn initial(config: &SimulationConfig) -> Self {
        Self {
            ants: config.initial_ants,
            plants: config.initial_plants,
            fungi: config.initial_fungi,
            parasites: config.initial_parasites,
            predators: config.initial_predators,
        }
    }

    pub fn food_sources(&self) -> u64 {
        self.plants as u64 + self.fungi as u64
    }

    /// Number of entity kinds with at least one member
    pub fn kinds_present(&self) -> usize {
        [
            self.ants,
            self.plants,
            self.fungi,
            self.parasites,
            self.predators,
        ]
        .iter()
        .filter(|&&n| n > 0)
        .count()
    }
}

/// Health metrics, each in 0.0 (critical) to 1.0 (optimal)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HealthReport {
    pub population: f64,
    pub food: f64,
    pub predator_balance: f64,
    pub parasite_impact: f64,
    pub diversity: f64,
    pub overall: f64,
}

/// Qualitative sustainability band
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Assessment {
    Thriving,
    Stable,
    Vulnerable,
    AtRisk,
    Critical,
}

impl Assessment {
    pub fn from_score(score: f64) -> Self {
        if score >= 0.8 {
            Assessment::Thriving
        } else if score >= 0.6 {
            Assessment::Stable
        } else if score >= 0.4 {
            Assessment::Vulnerable
        } else if score >= 0.2 {
            Assessment::AtRisk
        } else {
            Assessment::Critical
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Assessment::Thriving => "Thriving: The ecosystem is well-balanced and sustainable",
            Assessment::Stable => "Stable: The ecosystem is maintaining equilibrium",
            Assessment::Vulnerable => "Vulnerable: The ecosystem shows signs of instability",
            Assessment::AtRisk => "At Risk: The ecosystem is struggling to maintain balance",
            Assessment::Critical => "Critical: The ecosystem is approaching collapse",
        }
    }
}

impl fmt::Display for Assessment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Colony extinction risk
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
    Extinct,
}

impl RiskLevel {
    pub fn assess(counts: &PopulationCounts) -> Self {
        let ants = counts.ants;
        if ants == 0 {
            RiskLevel::Extinct
        } else if ants <= 3 {
            RiskLevel::Critical
        } else if ants <= 10 || counts.predators > ants / 2 {
            RiskLevel::High
        } else if counts.fungi == 0 && counts.plants == 0 {
            RiskLevel::High
        } else if ants <= 20 {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
            RiskLevel::Critical => "Critical",
            RiskLevel::Extinct => "Extinct",
        }
    }
}

/// Scores ecosystem health against the configured balance targets
#[derive(Clone, Debug)]
pub struct EcosystemBalance {
    config: SimulationConfig,
    pub history: VecDeque<HealthReport>,
    /// Oldest reports are dropped beyond this many; unbounded when `None`
    history_limit: Option<usize>,
}

impl EcosystemBalance {
    pub fn new(config: SimulationConfig) -> Self {
        Self {
            config,
            history: VecDeque::new(),
            history_limit: None,
        }
    }

    /// Keep at most `limit` recorded reports
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = Some(limit);
        self.trim_history();
        self
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Analyze the health of the ecosystem
    pub fn analyze(&self, counts: &PopulationCounts) -> HealthReport {
        let population = population_health(counts.ants);
        let food = food_health(counts.food_sources());
        let predator_balance = self.predator_health(counts.ants, counts.predators);
        let parasite_impact = parasite_health(counts.ants, counts.parasites);
        let diversity = diversity_health(counts.kinds_present());

        HealthReport {
            population,
            food,
            predator_balance,
            parasite_impact,
            diversity,
            overall: (population + food + predator_balance + parasite_impact + diversity) / 5.0,
        }
    }

    /// Overall health weighted by stability factors
    pub fn sustainability(&self, counts: &PopulationCounts) -> (f64, Assessment) {
        let overall = self.analyze(counts).overall;

        let ants = counts.ants as f64;
        let predator_ratio = counts.predators as f64 / ants.max(1.0);

        let population_stable = counts.ants >= 10;
        let food_sufficient = counts.food_sources() as f64 >= ants * 0.5;
        let predator_balanced = (0.05..=0.2).contains(&predator_ratio);

        let score = overall
            * (if population_stable { 1.0 } else { 0.6 })
            * (if food_sufficient { 1.0 } else { 0.7 })
            * (if predator_balanced { 1.0 } else { 0.8 });

        (score, Assessment::from_score(score))
    }

    /// Record the current state for trend analysis
    pub fn record(&mut self, counts: &PopulationCounts) -> HealthReport {
        let report = self.analyze(counts);
        self.history.push_back(report.clone());
        self.trim_history();
        report
    }

    fn trim_history(&mut self) {
        if let Some(limit) = self.history_limit {
            while self.history.len() > limit {
                self.history.pop_front();
            }
        }
    }

    /// Save recorded history to a JSON file
    pub fn save_history<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(&self.history)?;
        std::fs::write(path, json)
    }

    fn predator_health(&self, ants: u32, predators: u32) -> f64 {
        if ants == 0 {
            return if predators == 0 { 1.0 } else { 0.0 };
        }
        if predators == 0 {
            return 0.8;
        }

        let target = self.config.predator_balance.target_ant_predator_ratio;
        let ratio = ants as f64 / predators as f64;
        let difference = (ratio - target).abs() / target;
        (1.0 - difference).max(0.0)
    }
}

fn population_health(ants: u32) -> f64 {
    let (low, high) = OPTIMAL_ANTS;
    if ants == 0 {
        0.0
    } else if ants < low {
        ants as f64 / low as f64
    } else if ants <= high {
        1.0
    } else {
        let excess = (ants - high) as f64;
        1.0 - (excess / high as f64).min(0.5)
    }
}

fn food_health(food_sources: u64) -> f64 {
    if food_sources >= OPTIMAL_FOOD {
        1.0
    } else {
        food_sources as f64 / OPTIMAL_FOOD as f64
    }
}

fn parasite_health(ants: u32, parasites: u32) -> f64 {
    if ants == 0 {
        return 0.0;
    }
    if parasites == 0 {
        return 1.0;
    }

    let pressure = parasites as f64 / ants as f64;
    if pressure <= PARASITE_PRESSURE_LIMIT {
        1.0 - pressure * 0.5
    } else {
        (1.0 - pressure).max(0.0)
    }
}

fn diversity_health(kinds: usize) -> f64 {
    match kinds {
        k if k >= 4 => 1.0,
        3 => 0.8,
        2 => 0.5,
        _ => 0.0,
    }
}

/// Chance that a plant regrows this step
pub fn plant_regen_chance(
    step: u64,
    plants: u32,
    climate: Climate,
    config: &SimulationConfig,
) -> f64 {
    let regen = &config.plant_regeneration;
    if step % regen.interval as u64 != 0 || plants >= regen.max_plants {
        return 0.0;
    }

    let multiplier = climate.plant_regen_multiplier(&config.climate);
    (regen.probability * multiplier).clamp(0.0, 1.0)
}

/// Predators the current ant population should support
pub fn target_predators(ants: u32, config: &SimulationConfig) -> u32 {
    let ratio = config.predator_balance.target_ant_predator_ratio;
    ((ants as f64 / ratio).floor() as u32).max(1)
}

/// Chance that a predator spawns this step.
///
/// Spawning speeds up below the target predator count and slows above it,
/// then the climate phase scales the result.
pub fn predator_spawn_chance(
    counts: &PopulationCounts,
    climate: Climate,
    config: &SimulationConfig,
) -> f64 {
    if counts.ants == 0 {
        return 0.0;
    }

    let target = target_predators(counts.ants, config);
    let adjustment = match counts.predators.cmp(&target) {
        std::cmp::Ordering::Less => 1.5,
        std::cmp::Ordering::Greater => 0.3,
        std::cmp::Ordering::Equal => 1.0,
    };
    let multiplier = adjustment * climate.predator_spawn_multiplier(&config.climate);

    (config.predator_balance.base_spawn_chance * multiplier).clamp(0.0, 1.0)
}

/// Return true with the given probability
pub fn roll<R: Rng + ?Sized>(rng: &mut R, chance: f64) -> bool {
    rng.gen::<f64>() < chance
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use tempfile::tempdir;

    fn counts(ants: u32, plants: u32, fungi: u32, parasites: u32, predators: u32) -> PopulationCounts {
        PopulationCounts {
            ants,
            plants,
            fungi,
            parasites,
            predators,
        }
    }

    #[test]
    fn test_population_health() {
        assert_eq!(population_health(0), 0.0);
        assert!((population_health(10) - 0.5).abs() < 1e-9);
        assert_eq!(population_health(20), 1.0);
        assert_eq!(population_health(60), 1.0);
        // 30 over: penalty 0.5 (capped)
        assert!((population_health(90) - 0.5).abs() < 1e-9);
        assert!((population_health(500) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_parasite_health() {
        assert_eq!(parasite_health(0, 5), 0.0);
        assert_eq!(parasite_health(10, 0), 1.0);
        // 2/20 = 0.1 pressure: 1 - 0.05
        assert!((parasite_health(20, 2) - 0.95).abs() < 1e-9);
        // 5/10 = 0.5 pressure
        assert!((parasite_health(10, 5) - 0.5).abs() < 1e-9);
        assert_eq!(parasite_health(10, 20), 0.0);
    }

    #[test]
    fn test_predator_health() {
        let balance = EcosystemBalance::new(SimulationConfig::builtin());
        assert_eq!(balance.predator_health(0, 0), 1.0);
        assert_eq!(balance.predator_health(0, 2), 0.0);
        assert_eq!(balance.predator_health(30, 0), 0.8);
        assert!((balance.predator_health(30, 3) - 1.0).abs() < 1e-9);
        // ratio 15 vs target 10
        assert!((balance.predator_health(30, 2) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_analyze_default_population() {
        let config = SimulationConfig::builtin();
        let balance = EcosystemBalance::new(config.clone());
        let report = balance.analyze(&PopulationCounts::initial(&config));

        assert_eq!(report.population, 1.0);
        assert_eq!(report.food, 1.0);
        assert!((report.predator_balance - 1.0).abs() < 1e-9);
        assert_eq!(report.diversity, 1.0);
        assert!(report.overall > 0.9 && report.overall <= 1.0);
    }

    #[test]
    fn test_sustainability_bands() {
        let config = SimulationConfig::builtin();
        let balance = EcosystemBalance::new(config.clone());

        let (score, assessment) = balance.sustainability(&PopulationCounts::initial(&config));
        assert!(score >= 0.8);
        assert_eq!(assessment, Assessment::Thriving);

        let (score, assessment) = balance.sustainability(&counts(0, 0, 0, 0, 0));
        assert!(score < 0.2);
        assert_eq!(assessment, Assessment::Critical);
    }

    #[test]
    fn test_risk_levels() {
        assert_eq!(RiskLevel::assess(&counts(0, 10, 10, 0, 0)), RiskLevel::Extinct);
        assert_eq!(RiskLevel::assess(&counts(3, 10, 10, 0, 0)), RiskLevel::Critical);
        assert_eq!(RiskLevel::assess(&counts(8, 10, 10, 0, 0)), RiskLevel::High);
        assert_eq!(RiskLevel::assess(&counts(30, 10, 10, 0, 16)), RiskLevel::High);
        assert_eq!(RiskLevel::assess(&counts(30, 0, 0, 0, 1)), RiskLevel::High);
        assert_eq!(RiskLevel::assess(&counts(15, 10, 10, 0, 1)), RiskLevel::Medium);
        assert_eq!(RiskLevel::assess(&counts(30, 10, 10, 0, 3)), RiskLevel::Low);
    }

    #[test]
    fn test_plant_regen_chance() {
        let config = SimulationConfig::builtin();

        // Off-interval and at-cap steps never regrow
        assert_eq!(plant_regen_chance(3, 10, Climate::Rain, &config), 0.0);
        assert_eq!(plant_regen_chance(5, 60, Climate::Rain, &config), 0.0);

        assert!((plant_regen_chance(5, 10, Climate::Rain, &config) - 0.6).abs() < 1e-9);
        assert!((plant_regen_chance(10, 10, Climate::Dry, &config) - 0.09).abs() < 1e-9);
    }

    #[test]
    fn test_plant_regen_chance_clamped() {
        let mut config = SimulationConfig::builtin();
        config.plant_regeneration.probability = 0.8;
        assert_eq!(plant_regen_chance(5, 0, Climate::Rain, &config), 1.0);
    }

    #[test]
    fn test_predator_spawn_chance() {
        let config = SimulationConfig::builtin();

        assert_eq!(predator_spawn_chance(&counts(0, 0, 0, 0, 0), Climate::Dry, &config), 0.0);

        // 30 ants -> target 3
        assert_eq!(target_predators(30, &config), 3);
        assert_eq!(target_predators(5, &config), 1);

        let below = predator_spawn_chance(&counts(30, 0, 0, 0, 1), Climate::Dry, &config);
        assert!((below - 0.05 * 1.5 * 1.5).abs() < 1e-9);

        let balanced = predator_spawn_chance(&counts(30, 0, 0, 0, 3), Climate::Rain, &config);
        assert!((balanced - 0.05 * 0.5).abs() < 1e-9);

        let above = predator_spawn_chance(&counts(30, 0, 0, 0, 9), Climate::Rain, &config);
        assert!((above - 0.05 * 0.3 * 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_roll_extremes() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        for _ in 0..100 {
            assert!(!roll(&mut rng, 0.0));
            assert!(roll(&mut rng, 1.0));
        }
    }

    #[test]
    fn test_roll_frequency() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let hits = (0..10_000).filter(|_| roll(&mut rng, 0.3)).count();
        assert!((2_700..3_300).contains(&hits));
    }

    #[test]
    fn test_food_sources_does_not_overflow() {
        let huge = counts(u32::MAX, u32::MAX, u32::MAX, 0, 0);
        assert_eq!(huge.food_sources(), 2 * u32::MAX as u64);

        let balance = EcosystemBalance::new(SimulationConfig::builtin());
        let report = balance.analyze(&huge);
        assert_eq!(report.food, 1.0);
        balance.sustainability(&huge);
    }

    #[test]
    fn test_history_limit() {
        let config = SimulationConfig::builtin();
        let mut balance = EcosystemBalance::new(config).with_history_limit(2);

        balance.record(&counts(5, 0, 0, 0, 0));
        balance.record(&counts(30, 20, 20, 2, 3));
        let last = balance.record(&counts(0, 0, 0, 0, 0));
        assert_eq!(balance.history.len(), 2);
        assert_eq!(balance.history[1], last);
        assert!((balance.history[0].population - 1.0).abs() < 1e-9);

        balance.clear_history();
        assert!(balance.history.is_empty());
    }

    #[test]
    fn test_history_export() {
        let config = SimulationConfig::builtin();
        let mut balance = EcosystemBalance::new(config.clone());
        balance.record(&PopulationCounts::initial(&config));
        balance.record(&counts(5, 2, 0, 0, 0));
        assert_eq!(balance.history.len(), 2);

        let dir = tempdir().unwrap();
        let path = dir.path().join("history.json");
        balance.save_history(&path).unwrap();

        let json = std::fs::read_to_string(&path).unwrap();
        let loaded: Vec<HealthReport> = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded.len(), 2);
        assert!((loaded[1].overall - balance.history[1].overall).abs() < 1e-9);
    }
}
