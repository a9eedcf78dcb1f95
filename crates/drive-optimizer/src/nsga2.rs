// ─────────────────────────────────────────────────────────────────────
// SCPN Inverter Drive — NSGA-II Driver
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Generational loop: evaluate the initial population once, then per
//! generation breed N offspring, evaluate only those, and keep the best N
//! of parents ∪ offspring. Output is the final rank-1 set sorted by power
//! loss.

use crate::evaluation::evaluate_batch;
use crate::individual::{Individual, Parameters};
use crate::operators::{make_offspring, random_parameters, GaussianMutation};
use crate::sorting::select_survivors;
use drive_types::config::OptimizerConfig;
use drive_types::error::DriveResult;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

/// Summary of one generation, handed to progress observers.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationStats {
    pub generation: usize,
    pub front_size: usize,
    pub best_power_loss: f64,
    pub best_peak_temperature: f64,
    pub best_speed_deviation: f64,
}

impl GenerationStats {
    fn from_population(generation: usize, population: &[Individual]) -> Self {
        let best = |m: usize| {
            population
                .iter()
                .map(|i| i.objectives[m])
                .fold(f64::INFINITY, f64::min)
        };
        GenerationStats {
            generation,
            front_size: population.iter().filter(|i| i.rank == 1).count(),
            best_power_loss: best(0),
            best_peak_temperature: best(1),
            best_speed_deviation: best(2),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Nsga2Optimizer {
    pub config: OptimizerConfig,
    mutation: GaussianMutation,
}

impl Nsga2Optimizer {
    pub fn new(config: OptimizerConfig) -> DriveResult<Self> {
        config.validate()?;
        let mutation = GaussianMutation::new(config.mutation_prob, config.mutation_sigma)?;
        Ok(Nsga2Optimizer { config, mutation })
    }

    /// Pareto front of the last generation, ascending by power loss.
    pub fn optimize(&self) -> Vec<Individual> {
        self.optimize_with(|_| {})
    }

    pub fn optimize_with<F: FnMut(&GenerationStats)>(&self, mut observe: F) -> Vec<Individual> {
        let cfg = &self.config;
        let n = cfg.population_size;
        let mut rng = StdRng::seed_from_u64(cfg.seed);

        let initial: Vec<Parameters> = (0..n).map(|_| random_parameters(&mut rng)).collect();
        let mut population = select_survivors(self.evaluate(&initial, 0), n);

        for generation in 1..=cfg.generations {
            let children = make_offspring(
                &population,
                n,
                cfg.tournament_size,
                cfg.crossover_prob,
                &self.mutation,
                &mut rng,
            );
            population.extend(self.evaluate(&children, generation));
            population = select_survivors(population, n);

            let stats = GenerationStats::from_population(generation, &population);
            info!(
                generation,
                front_size = stats.front_size,
                best_power_loss = stats.best_power_loss,
                best_peak_temperature = stats.best_peak_temperature,
                best_speed_deviation = stats.best_speed_deviation,
                "generation complete"
            );
            observe(&stats);
        }

        let mut front: Vec<Individual> = population.into_iter().filter(|i| i.rank == 1).collect();
        front.sort_by(|a, b| a.objectives[0].total_cmp(&b.objectives[0]));
        front
    }

    fn evaluate(&self, candidates: &[Parameters], generation: usize) -> Vec<Individual> {
        let objectives = evaluate_batch(
            candidates,
            self.config.evaluation_duration,
            self.config.seed,
            generation,
            self.config.parallel,
        );
        candidates
            .iter()
            .zip(objectives)
            .map(|(p, o)| Individual {
                objectives: o,
                ..Individual::new(*p)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use drive_types::error::DriveError;

    fn tiny(parallel: bool) -> OptimizerConfig {
        OptimizerConfig {
            population_size: 4,
            generations: 2,
            evaluation_duration: 0.005,
            seed: 5,
            parallel,
            ..OptimizerConfig::default()
        }
    }

    #[test]
    fn test_rejects_bad_config() {
        let cfg = OptimizerConfig { population_size: 1, ..OptimizerConfig::default() };
        assert!(matches!(Nsga2Optimizer::new(cfg), Err(DriveError::ConfigError(_))));
    }

    #[test]
    fn test_minimal_run_gives_finite_front() {
        let cfg = OptimizerConfig {
            population_size: 2,
            generations: 1,
            evaluation_duration: 0.005,
            ..OptimizerConfig::default()
        };
        let front = Nsga2Optimizer::new(cfg).unwrap().optimize();
        assert!(!front.is_empty());
        for ind in &front {
            assert_eq!(ind.rank, 1);
            assert!(ind.objectives.iter().all(|o| o.is_finite()));
        }
    }

    #[test]
    fn test_front_sorted_and_non_dominated() {
        let mut generations = 0;
        let front = Nsga2Optimizer::new(tiny(true))
            .unwrap()
            .optimize_with(|_| generations += 1);
        assert_eq!(generations, 2);
        for w in front.windows(2) {
            assert!(w[0].objectives[0] <= w[1].objectives[0]);
        }
        for a in &front {
            for b in &front {
                assert!(!a.dominates(b));
            }
        }
    }

    #[test]
    fn test_deterministic_across_parallelism() {
        let par = Nsga2Optimizer::new(tiny(true)).unwrap().optimize();
        let seq = Nsga2Optimizer::new(tiny(false)).unwrap().optimize();
        assert_eq!(par, seq);
    }
}
