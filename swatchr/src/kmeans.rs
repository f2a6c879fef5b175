//! Iterative centroid-based clustering (k-means) over RGB pixel samples
//!
//! Clustering is a pure function of `(samples, k, seed, convergence, max_iter)`:
//! there is no ambient random state, so a fixed seed always reproduces the
//! same palette for the same samples.

use crate::error::{PaletteError, Result};
use palette::Srgb;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Default convergence tolerance: the summed centroid movement, in channel units
pub const DEFAULT_CONVERGENCE: f32 = 1e-3;

/// Default iteration budget for a clustering run
pub const DEFAULT_MAX_ITER: u32 = 300;

/// A position in 3-dimensional channel space
type Point = [f32; 3];

/// Squared euclidean distance between two points in channel space
fn squared_distance(x: Point, y: Point) -> f32 {
	let dr = x[0] - y[0];
	let dg = x[1] - y[1];
	let db = x[2] - y[2];
	dr * dr + dg * dg + db * db
}

/// Widen an 8-bit sample into channel space
fn to_point(color: Srgb<u8>) -> Point {
	[f32::from(color.red), f32::from(color.green), f32::from(color.blue)]
}

/// Round a centroid to the nearest valid 8-bit color
fn to_srgb(point: Point) -> Srgb<u8> {
	// Centroids are means of 8-bit samples, so clamping only guards rounding at the range ends
	#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
	Srgb::new(
		point[0].clamp(0.0, 255.0).round() as u8,
		point[1].clamp(0.0, 255.0).round() as u8,
		point[2].clamp(0.0, 255.0).round() as u8,
	)
}

/// Result from running k-means
#[derive(Debug, Clone)]
pub struct KmeansResult {
	/// Final centroid colors, rounded and clamped to the 8-bit channel range
	pub centroids: Vec<Srgb<u8>>,
	/// Number of samples assigned to each centroid
	pub counts: Vec<u32>,
	/// Number of elapsed iterations
	pub iterations: u32,
}

/// Choose the starting centroids using the k-means++ algorithm
///
/// Always produces exactly `k` centroids: once every sample coincides with a
/// chosen centroid, the remaining slots duplicate randomly chosen samples and
/// are later handled by the empty cluster policy in [`update_centroids`].
fn kmeans_plus_plus(k: u8, rng: &mut impl Rng, points: &[Point]) -> Vec<Point> {
	use rand::{
		distributions::{WeightedError::*, WeightedIndex},
		prelude::Distribution,
	};

	let mut centroids = Vec::with_capacity(usize::from(k));
	let mut weights = vec![f32::INFINITY; points.len()];

	// Pick any random first centroid
	centroids.push(points[rng.gen_range(0..points.len())]);

	// Pick each next centroid with a weighted probability based off the squared distance to its closest centroid
	for i in 1..usize::from(k) {
		let centroid = centroids[i - 1];
		for (weight, &point) in weights.iter_mut().zip(points) {
			*weight = f32::min(*weight, squared_distance(point, centroid));
		}

		match WeightedIndex::new(&weights) {
			Ok(sampler) => centroids.push(points[sampler.sample(rng)]),
			// All points exactly match a centroid, so any further pick is a duplicate
			Err(AllWeightsZero) => centroids.push(points[rng.gen_range(0..points.len())]),
			Err(InvalidWeight | NoItem | TooMany) => {
				unreachable!("distances are >= 0 and points is non-empty")
			},
		}
	}

	centroids
}

/// Assign each sample to its nearest centroid by squared distance
///
/// Ties break to the lowest cluster index: the scan is in index order and
/// only a strictly smaller distance moves the assignment.
fn update_assignments(points: &[Point], centroids: &[Point], assignment: &mut [usize]) {
	for (&point, slot) in points.iter().zip(assignment) {
		let mut min_dist = f32::INFINITY;
		let mut min_center = 0;
		for (i, &centroid) in centroids.iter().enumerate() {
			let dist = squared_distance(point, centroid);
			if dist < min_dist {
				min_dist = dist;
				min_center = i;
			}
		}
		*slot = min_center;
	}
}

/// Recompute each centroid as the channel-wise mean of its assigned samples
/// and return the total centroid movement
///
/// A cluster with no members is reseeded to the first sample not already
/// claimed by another reseed this pass and whose cluster keeps at least one
/// member; if no such sample remains, the centroid is retained as is.
/// Reseeding happens before the means are taken, so the new centroids always
/// reflect the final assignment of this pass.
fn update_centroids(points: &[Point], assignment: &mut [usize], centroids: &mut [Point]) -> f32 {
	let k = centroids.len();

	let mut counts = vec![0_u32; k];
	for &center in assignment.iter() {
		counts[center] += 1;
	}

	// The cursor only moves forward, so a sample claimed by an earlier reseed
	// (its cluster now has exactly one member) is never claimed twice.
	let mut cursor = 0;
	for i in 0..k {
		if counts[i] > 0 {
			continue;
		}
		while cursor < points.len() && counts[assignment[cursor]] <= 1 {
			cursor += 1;
		}
		if cursor < points.len() {
			counts[assignment[cursor]] -= 1;
			assignment[cursor] = i;
			counts[i] = 1;
			cursor += 1;
		}
	}

	let mut sums = vec![[0.0_f64; 3]; k];
	for (point, &center) in points.iter().zip(assignment.iter()) {
		let sum = &mut sums[center];
		sum[0] += f64::from(point[0]);
		sum[1] += f64::from(point[1]);
		sum[2] += f64::from(point[2]);
	}

	let mut total_delta = 0.0;
	for ((centroid, sum), &n) in centroids.iter_mut().zip(&sums).zip(&counts) {
		// A cluster that stayed empty retains its previous centroid
		if n == 0 {
			continue;
		}
		let n = f64::from(n);
		// Sums may need greater precision, but the average can fall back down to a reduced precision
		#[allow(clippy::cast_possible_truncation)]
		let new_centroid = [(sum[0] / n) as f32, (sum[1] / n) as f32, (sum[2] / n) as f32];
		total_delta += squared_distance(*centroid, new_centroid).sqrt();
		*centroid = new_centroid;
	}

	total_delta
}

/// Run k-means over the given samples, producing exactly `k` clusters
///
/// Iteration stops once the summed centroid movement falls to `convergence`
/// or below, or after `max_iter` iterations, whichever comes first. The run
/// is deterministic for a fixed seed and is never retried internally.
///
/// # Errors
///
/// Returns [`PaletteError::InvalidClusterCount`] if `k` is zero or exceeds
/// the number of samples.
pub fn run(samples: &[Srgb<u8>], k: u8, seed: u64, convergence: f32, max_iter: u32) -> Result<KmeansResult> {
	if k < 1 || usize::from(k) > samples.len() {
		return Err(PaletteError::InvalidClusterCount { k, samples: samples.len() });
	}

	let points = samples.iter().copied().map(to_point).collect::<Vec<_>>();
	let mut rng = ChaCha8Rng::seed_from_u64(seed);
	let mut centroids = kmeans_plus_plus(k, &mut rng, &points);
	let mut assignment = vec![0_usize; points.len()];

	let mut iterations = 0;
	let mut total_delta = f32::INFINITY;
	while iterations < max_iter && total_delta > convergence {
		update_assignments(&points, &centroids, &mut assignment);
		total_delta = update_centroids(&points, &mut assignment, &mut centroids);
		iterations += 1;
	}

	let mut counts = vec![0_u32; usize::from(k)];
	for &center in &assignment {
		counts[center] += 1;
	}

	Ok(KmeansResult {
		centroids: centroids.into_iter().map(to_srgb).collect(),
		counts,
		iterations,
	})
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
	use super::*;
	use approx::assert_relative_eq;

	fn srgb_samples(colors: &[(u8, u8, u8)]) -> Vec<Srgb<u8>> {
		colors.iter().map(|&(r, g, b)| Srgb::new(r, g, b)).collect()
	}

	fn test_samples() -> Vec<Srgb<u8>> {
		srgb_samples(&[
			(12, 240, 3),
			(44, 17, 201),
			(91, 87, 86),
			(255, 0, 12),
			(7, 7, 7),
			(201, 190, 14),
			(100, 149, 237),
			(250, 250, 250),
		])
	}

	#[test]
	fn kmeans_plus_plus_always_yields_k_centroids() {
		let points = test_samples().iter().copied().map(to_point).collect::<Vec<_>>();
		for k in 1..=8 {
			let mut rng = ChaCha8Rng::seed_from_u64(0);
			let centroids = kmeans_plus_plus(k, &mut rng, &points);
			assert_eq!(centroids.len(), usize::from(k));
		}
	}

	#[test]
	fn kmeans_plus_plus_duplicates_once_samples_are_exhausted() {
		let points = vec![[5.0, 5.0, 5.0]; 4];
		let mut rng = ChaCha8Rng::seed_from_u64(0);
		let centroids = kmeans_plus_plus(3, &mut rng, &points);
		assert_eq!(centroids, vec![[5.0, 5.0, 5.0]; 3]);
	}

	#[test]
	fn update_centroids_reports_total_movement() {
		let points = vec![[0.0, 0.0, 0.0], [10.0, 0.0, 0.0]];
		let mut assignment = vec![0, 1];
		let mut centroids = vec![[2.0, 0.0, 0.0], [10.0, 0.0, 0.0]];

		let total_delta = update_centroids(&points, &mut assignment, &mut centroids);

		// Only the first centroid moves, from x = 2 to x = 0
		assert_relative_eq!(total_delta, 2.0);
		assert_eq!(centroids, vec![[0.0, 0.0, 0.0], [10.0, 0.0, 0.0]]);
	}

	#[test]
	fn ties_assign_to_the_lowest_cluster_index() {
		let points = vec![[1.0, 1.0, 1.0]];
		let centroids = vec![[0.0, 0.0, 0.0], [2.0, 2.0, 2.0]];
		let mut assignment = vec![usize::MAX];

		update_assignments(&points, &centroids, &mut assignment);

		assert_eq!(assignment, vec![0]);
	}

	#[test]
	fn single_cluster_is_the_mean_color() {
		let samples = srgb_samples(&[(10, 20, 30), (20, 30, 40)]);
		let result = run(&samples, 1, 0, DEFAULT_CONVERGENCE, DEFAULT_MAX_ITER).unwrap();

		assert_eq!(result.centroids, vec![Srgb::new(15, 25, 35)]);
		assert_eq!(result.counts, vec![2]);
	}

	#[test]
	fn centroids_round_to_the_nearest_channel_value() {
		let samples = srgb_samples(&[(0, 0, 255), (1, 1, 254)]);
		let result = run(&samples, 1, 0, DEFAULT_CONVERGENCE, DEFAULT_MAX_ITER).unwrap();

		// Channel means of 0.5 and 254.5 round away from zero
		assert_eq!(result.centroids, vec![Srgb::new(1, 1, 255)]);
	}

	#[test]
	fn k_equal_to_sample_count_gives_one_cluster_per_distinct_sample() {
		let samples = test_samples();
		#[allow(clippy::cast_possible_truncation)]
		let k = samples.len() as u8;
		let result = run(&samples, k, 0, DEFAULT_CONVERGENCE, DEFAULT_MAX_ITER).unwrap();

		assert_eq!(result.centroids.len(), samples.len());
		assert!(result.counts.iter().all(|&n| n == 1));

		let mut centroids = result.centroids;
		let mut expected = samples;
		centroids.sort_by_key(|c| (c.red, c.green, c.blue));
		expected.sort_by_key(|c| (c.red, c.green, c.blue));
		assert_eq!(centroids, expected);
	}

	#[test]
	fn duplicate_samples_reseed_instead_of_crashing() {
		let samples = srgb_samples(&[(7, 7, 7), (7, 7, 7), (7, 7, 7)]);
		let result = run(&samples, 2, 0, DEFAULT_CONVERGENCE, DEFAULT_MAX_ITER).unwrap();

		assert_eq!(result.centroids, vec![Srgb::new(7, 7, 7); 2]);
		assert_eq!(result.counts.iter().sum::<u32>(), 3);
		assert!(result.counts.iter().all(|&n| n > 0));
	}

	#[test]
	fn zero_clusters_is_an_invalid_count() {
		let samples = test_samples();
		let result = run(&samples, 0, 0, DEFAULT_CONVERGENCE, DEFAULT_MAX_ITER);

		assert!(matches!(
			result,
			Err(PaletteError::InvalidClusterCount { k: 0, samples: 8 })
		));
	}

	#[test]
	fn more_clusters_than_samples_is_an_invalid_count() {
		let samples = test_samples();
		let result = run(&samples, 9, 0, DEFAULT_CONVERGENCE, DEFAULT_MAX_ITER);

		assert!(matches!(
			result,
			Err(PaletteError::InvalidClusterCount { k: 9, samples: 8 })
		));
	}

	#[test]
	fn same_seed_reproduces_the_same_result() {
		let samples = test_samples();
		let first = run(&samples, 3, 42, DEFAULT_CONVERGENCE, DEFAULT_MAX_ITER).unwrap();
		let second = run(&samples, 3, 42, DEFAULT_CONVERGENCE, DEFAULT_MAX_ITER).unwrap();

		assert_eq!(first.centroids, second.centroids);
		assert_eq!(first.counts, second.counts);
		assert_eq!(first.iterations, second.iterations);
	}

	#[test]
	fn iteration_budget_is_respected() {
		let samples = test_samples();
		let result = run(&samples, 3, 0, 0.0, 1).unwrap();

		assert_eq!(result.iterations, 1);
	}
}
