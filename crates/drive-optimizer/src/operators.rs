// ─────────────────────────────────────────────────────────────────────
// SCPN Inverter Drive — Genetic Operators
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Sampling, tournament selection, blend crossover and Gaussian mutation.
//! Every operator clamps its output into the parameter bounds.

use crate::individual::{clamp_to_bounds, Individual, Parameters, PARAMETER_BOUNDS};
use crate::sorting::crowded_cmp;
use drive_types::error::{DriveError, DriveResult};
use rand::Rng;
use rand_distr::{Distribution, Normal};
use std::cmp::Ordering;

/// Uniform sample inside the bounds.
pub fn random_parameters<R: Rng + ?Sized>(rng: &mut R) -> Parameters {
    PARAMETER_BOUNDS.map(|(lo, hi)| rng.gen_range(lo..=hi))
}

/// Best of `size` uniformly drawn members by crowded comparison.
pub fn tournament_select<'a, R: Rng + ?Sized>(
    population: &'a [Individual],
    size: usize,
    rng: &mut R,
) -> &'a Individual {
    let mut best = &population[rng.gen_range(0..population.len())];
    for _ in 1..size.max(1) {
        let challenger = &population[rng.gen_range(0..population.len())];
        if crowded_cmp(challenger, best) == Ordering::Less {
            best = challenger;
        }
    }
    best
}

/// Arithmetic crossover with an independent blend factor per gene.
pub fn blend_crossover<R: Rng + ?Sized>(
    a: &Parameters,
    b: &Parameters,
    rng: &mut R,
) -> (Parameters, Parameters) {
    let mut first = *a;
    let mut second = *b;
    for k in 0..first.len() {
        let alpha: f64 = rng.gen();
        first[k] = alpha * a[k] + (1.0 - alpha) * b[k];
        second[k] = (1.0 - alpha) * a[k] + alpha * b[k];
    }
    (clamp_to_bounds(first), clamp_to_bounds(second))
}

/// Per-gene Gaussian kernels with σ = fraction·range.
#[derive(Debug, Clone, Copy)]
pub struct GaussianMutation {
    pub probability: f64,
    kernels: [Normal<f64>; 4],
}

impl GaussianMutation {
    /// `probability` must lie in [0, 1] and `sigma_fraction` be finite and >= 0.
    pub fn new(probability: f64, sigma_fraction: f64) -> DriveResult<Self> {
        if !(0.0..=1.0).contains(&probability) {
            return Err(DriveError::ConfigError(format!(
                "mutation probability must be in [0, 1], got {probability}"
            )));
        }
        // rand_distr accepts a negative std_dev, so reject it here.
        if !(sigma_fraction.is_finite() && sigma_fraction >= 0.0) {
            return Err(DriveError::ConfigError(format!(
                "mutation sigma fraction must be finite and >= 0, got {sigma_fraction}"
            )));
        }
        let kernel = |sigma: f64| {
            Normal::new(0.0, sigma)
                .map_err(|e| DriveError::ConfigError(format!("mutation kernel: {e}")))
        };
        let mut kernels = [kernel(0.0)?; 4];
        for (k, &(lo, hi)) in kernels.iter_mut().zip(PARAMETER_BOUNDS.iter()) {
            *k = kernel(sigma_fraction * (hi - lo))?;
        }
        Ok(GaussianMutation { probability, kernels })
    }

    pub fn mutate<R: Rng + ?Sized>(&self, parameters: &Parameters, rng: &mut R) -> Parameters {
        let mut out = *parameters;
        for (x, kernel) in out.iter_mut().zip(self.kernels.iter()) {
            if rng.gen::<f64>() < self.probability {
                *x += kernel.sample(rng);
            }
        }
        clamp_to_bounds(out)
    }
}

/// `n` children from tournament-selected parent pairs.
pub fn make_offspring<R: Rng + ?Sized>(
    population: &[Individual],
    n: usize,
    tournament_size: usize,
    crossover_prob: f64,
    mutation: &GaussianMutation,
    rng: &mut R,
) -> Vec<Parameters> {
    let mut children = Vec::with_capacity(n + 1);
    while children.len() < n {
        let a = tournament_select(population, tournament_size, rng).parameters;
        let b = tournament_select(population, tournament_size, rng).parameters;
        let (c1, c2) = if rng.gen::<f64>() < crossover_prob {
            blend_crossover(&a, &b, rng)
        } else {
            (a, b)
        };
        children.push(mutation.mutate(&c1, rng));
        children.push(mutation.mutate(&c2, rng));
    }
    children.truncate(n);
    children
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn in_bounds(p: &Parameters) -> bool {
        p.iter()
            .zip(PARAMETER_BOUNDS.iter())
            .all(|(x, &(lo, hi))| (lo..=hi).contains(x))
    }

    #[test]
    fn test_random_parameters_in_bounds() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..1000 {
            assert!(in_bounds(&random_parameters(&mut rng)));
        }
    }

    #[test]
    fn test_crossover_children_between_parents() {
        let mut rng = StdRng::seed_from_u64(12);
        let a = [2_000.0, 0.1, 0.0, 0.0];
        let b = [20_000.0, 1.0, 1.0, 10.0];
        let (c1, c2) = blend_crossover(&a, &b, &mut rng);
        for k in 0..4 {
            assert!((c1[k] + c2[k] - (a[k] + b[k])).abs() < 1e-9, "children mirror about the midpoint");
        }
        assert!(in_bounds(&c1) && in_bounds(&c2));
    }

    #[test]
    fn test_mutation_clamps() {
        let mut rng = StdRng::seed_from_u64(13);
        let wild = GaussianMutation::new(1.0, 10.0).unwrap();
        for _ in 0..500 {
            assert!(in_bounds(&wild.mutate(&[20_000.0, 1.0, 1.0, 10.0], &mut rng)));
        }
        let off = GaussianMutation::new(0.0, 0.1).unwrap();
        let p = [5_000.0, 0.5, 0.5, 5.0];
        assert_eq!(off.mutate(&p, &mut rng), p);
    }

    #[test]
    fn test_bad_mutation_settings_rejected() {
        for (prob, sigma) in [(0.1, -1.0), (0.1, -1e-12), (0.1, f64::NAN), (0.1, f64::INFINITY), (-0.1, 0.1), (1.5, 0.1), (f64::NAN, 0.1)] {
            match GaussianMutation::new(prob, sigma) {
                Err(DriveError::ConfigError(_)) => {}
                other => panic!("({prob}, {sigma}) accepted: {other:?}"),
            }
        }
        assert!(GaussianMutation::new(0.0, 0.0).is_ok());
        assert!(GaussianMutation::new(1.0, 0.5).is_ok());
    }

    #[test]
    fn test_tournament_prefers_better_rank() {
        let mut rng = StdRng::seed_from_u64(14);
        let mut good = Individual::new([3_000.0, 0.5, 0.5, 5.0]);
        good.rank = 1;
        let mut bad = Individual::new([9_000.0, 0.5, 0.5, 5.0]);
        bad.rank = 2;
        let pop = vec![good.clone(), bad];
        let wins = (0..1000)
            .filter(|_| tournament_select(&pop, 2, &mut rng).rank == 1)
            .count();
        // Loses only when both draws pick the worse member (p = 1/4).
        assert!(wins > 650 && wins < 850, "wins {wins}");
    }

    #[test]
    fn test_offspring_count() {
        let mut rng = StdRng::seed_from_u64(15);
        let pop: Vec<Individual> = (0..5).map(|_| Individual::new(random_parameters(&mut rng))).collect();
        let m = GaussianMutation::new(0.1, 0.1).unwrap();
        let kids = make_offspring(&pop, 5, 2, 0.9, &m, &mut rng);
        assert_eq!(kids.len(), 5);
        assert!(kids.iter().all(in_bounds));
    }
}
