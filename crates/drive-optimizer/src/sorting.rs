// ─────────────────────────────────────────────────────────────────────
// SCPN Inverter Drive — Non-Dominated Sorting
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Fast non-dominated sort and per-front crowding distance.

use crate::individual::{Individual, N_OBJECTIVES};
use ndarray::{Array2, ArrayView1};
use std::cmp::Ordering;

/// Objective matrix, one row per individual.
pub fn objective_matrix(population: &[Individual]) -> Array2<f64> {
    Array2::from_shape_fn((population.len(), N_OBJECTIVES), |(i, m)| {
        population[i].objectives[m]
    })
}

/// Assign `rank` (1 = best) and return the fronts as index lists.
pub fn non_dominated_sort(population: &mut [Individual]) -> Vec<Vec<usize>> {
    let n = population.len();
    let mut domination_count = vec![0usize; n];
    let mut dominated: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut fronts: Vec<Vec<usize>> = vec![Vec::new()];

    for i in 0..n {
        for j in 0..n {
            if i == j {
                continue;
            }
            if population[i].dominates(&population[j]) {
                dominated[i].push(j);
            } else if population[j].dominates(&population[i]) {
                domination_count[i] += 1;
            }
        }
        if domination_count[i] == 0 {
            population[i].rank = 1;
            fronts[0].push(i);
        }
    }

    let mut current = 0;
    while !fronts[current].is_empty() {
        let mut next = Vec::new();
        for &i in &fronts[current] {
            for &j in &dominated[i] {
                domination_count[j] -= 1;
                if domination_count[j] == 0 {
                    population[j].rank = current + 2;
                    next.push(j);
                }
            }
        }
        current += 1;
        fronts.push(next);
    }
    fronts.pop();
    fronts
}

/// Crowding distance within one front. Boundary members get +∞.
pub fn assign_crowding_distance(population: &mut [Individual], front: &[usize]) {
    for &i in front {
        population[i].crowding_distance = 0.0;
    }
    if front.len() <= 2 {
        for &i in front {
            population[i].crowding_distance = f64::INFINITY;
        }
        return;
    }

    let members: Vec<Individual> = front.iter().map(|&i| population[i].clone()).collect();
    let objectives = objective_matrix(&members);
    let last = front.len() - 1;

    for column in objectives.columns() {
        let order = sorted_order(column);
        let range = column[order[last]] - column[order[0]];
        // A flat objective carries no spread information.
        if !(range.is_finite() && range > 0.0) {
            continue;
        }
        population[front[order[0]]].crowding_distance = f64::INFINITY;
        population[front[order[last]]].crowding_distance = f64::INFINITY;
        for k in 1..last {
            let gap = (column[order[k + 1]] - column[order[k - 1]]) / range;
            population[front[order[k]]].crowding_distance += gap;
        }
    }
}

fn sorted_order(column: ArrayView1<'_, f64>) -> Vec<usize> {
    let mut order: Vec<usize> = (0..column.len()).collect();
    order.sort_by(|&a, &b| column[a].total_cmp(&column[b]));
    order
}

/// Crowded-comparison order: lower rank first, then larger crowding distance.
pub fn crowded_cmp(a: &Individual, b: &Individual) -> Ordering {
    a.rank
        .cmp(&b.rank)
        .then_with(|| b.crowding_distance.total_cmp(&a.crowding_distance))
}

/// Sort, crowd every front and keep the best `n` by [`crowded_cmp`].
pub fn select_survivors(mut population: Vec<Individual>, n: usize) -> Vec<Individual> {
    let fronts = non_dominated_sort(&mut population);
    for front in &fronts {
        assign_crowding_distance(&mut population, front);
    }
    population.sort_by(crowded_cmp);
    population.truncate(n);
    population
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_objectives(objs: &[[f64; 3]]) -> Vec<Individual> {
        objs.iter()
            .map(|o| Individual {
                objectives: *o,
                ..Individual::new([10_000.0, 0.5, 0.5, 5.0])
            })
            .collect()
    }

    #[test]
    fn test_fronts_and_ranks() {
        let mut pop = with_objectives(&[
            [2.0, 2.0, 2.0], // dominated by 1
            [1.0, 1.0, 1.0],
            [0.5, 3.0, 1.0], // trades off with 1
            [3.0, 3.0, 3.0], // dominated by 0
        ]);
        let fronts = non_dominated_sort(&mut pop);
        assert_eq!(fronts.len(), 3);
        assert_eq!(fronts[0], vec![1, 2]);
        assert_eq!(pop[1].rank, 1);
        assert_eq!(pop[0].rank, 2);
        assert_eq!(pop[3].rank, 3);
    }

    #[test]
    fn test_crowding_boundaries_infinite() {
        let mut pop = with_objectives(&[
            [0.0, 4.0, 1.0],
            [1.0, 3.0, 1.0],
            [3.0, 1.0, 1.0],
            [4.0, 0.0, 1.0],
        ]);
        let front = vec![0, 1, 2, 3];
        assign_crowding_distance(&mut pop, &front);
        assert!(pop[0].crowding_distance.is_infinite());
        assert!(pop[3].crowding_distance.is_infinite());
        // Interior: (3−0)/4 + (4−1)/4 on the two spread objectives.
        assert!((pop[1].crowding_distance - 1.5).abs() < 1e-12, "{}", pop[1].crowding_distance);
        assert!((pop[2].crowding_distance - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_flat_objective_marks_no_boundary() {
        let mut pop = with_objectives(&[[1.0, 2.0, 3.0]; 3]);
        assign_crowding_distance(&mut pop, &[0, 1, 2]);
        assert!(pop.iter().all(|i| i.crowding_distance == 0.0),
            "{:?}", pop.iter().map(|i| i.crowding_distance).collect::<Vec<_>>());

        // Only the spread objective sets boundaries; the interior stays finite.
        let mut pop = with_objectives(&[[0.0, 1.0, 1.0], [1.0, 1.0, 1.0], [2.0, 1.0, 1.0]]);
        assign_crowding_distance(&mut pop, &[0, 1, 2]);
        assert!(pop[0].crowding_distance.is_infinite());
        assert!(pop[2].crowding_distance.is_infinite());
        assert!((pop[1].crowding_distance - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_survivors_prefer_rank_then_spread() {
        let pop = with_objectives(&[
            [5.0, 5.0, 5.0],
            [0.0, 4.0, 1.0],
            [1.0, 3.0, 1.0],
            [2.0, 2.0, 1.0],
            [4.0, 0.0, 1.0],
        ]);
        let kept = select_survivors(pop, 3);
        assert_eq!(kept.len(), 3);
        assert!(kept.iter().all(|i| i.rank == 1));
        let losses: Vec<f64> = kept.iter().map(|i| i.objectives[0]).collect();
        assert!(losses.contains(&0.0) && losses.contains(&4.0), "extremes kept: {losses:?}");
    }

    #[test]
    fn test_unfit_sinks_to_last_front() {
        let mut pop = with_objectives(&[[f64::MAX; 3], [1.0, 1.0, 1.0]]);
        non_dominated_sort(&mut pop);
        assert_eq!(pop[1].rank, 1);
        assert_eq!(pop[0].rank, 2);
    }

    #[test]
    fn test_objective_matrix_shape() {
        let pop = with_objectives(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]);
        let m = objective_matrix(&pop);
        assert_eq!(m.shape(), &[2, 3]);
        assert_eq!(m[[1, 2]], 6.0);
    }
}
