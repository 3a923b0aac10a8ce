//! Synthetic adobe degradation dataset.
//!
//! Generates a wall-section feature table whose distributions and couplings
//! mirror observed degradation surveys without exposing real site data. The
//! generator is deterministic for a given seed.

use std::path::Path;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Exp, Gamma, Normal, Poisson};

use crate::config::{DEFAULT_SYNTH_SAMPLES, DEFAULT_SYNTH_SEED};
use crate::error::{Result, WallmapError};

/// Options for dataset generation.
#[derive(Debug, Clone)]
pub struct SynthOptions {
    pub n_samples: usize,
    pub seed: u64,
}

impl Default for SynthOptions {
    fn default() -> Self {
        Self {
            n_samples: DEFAULT_SYNTH_SAMPLES,
            seed: DEFAULT_SYNTH_SEED,
        }
    }
}

/// Generated dataset: column names plus row-major cells, ready for CSV.
#[derive(Debug)]
pub struct SyntheticDataset {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

struct Sampler {
    rng: StdRng,
}

impl Sampler {
    fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn poisson(&mut self, lambda: f64, n: usize) -> Result<Vec<f64>> {
        let dist = Poisson::new(lambda).map_err(|e| WallmapError::InsufficientData {
            message: format!("bad Poisson parameter {}: {}", lambda, e),
        })?;
        Ok((0..n).map(|_| dist.sample(&mut self.rng)).collect())
    }

    fn normal(&mut self, mean: f64, std_dev: f64, n: usize) -> Result<Vec<f64>> {
        let dist = Normal::new(mean, std_dev).map_err(|e| WallmapError::InsufficientData {
            message: format!("bad Normal parameters: {}", e),
        })?;
        Ok((0..n).map(|_| dist.sample(&mut self.rng)).collect())
    }

    fn gamma(&mut self, shape: f64, scale: f64, n: usize) -> Result<Vec<f64>> {
        let dist = Gamma::new(shape, scale).map_err(|e| WallmapError::InsufficientData {
            message: format!("bad Gamma parameters: {}", e),
        })?;
        Ok((0..n).map(|_| dist.sample(&mut self.rng)).collect())
    }

    fn exponential(&mut self, scale: f64, n: usize) -> Result<Vec<f64>> {
        let dist = Exp::new(1.0 / scale).map_err(|e| WallmapError::InsufficientData {
            message: format!("bad Exponential parameter: {}", e),
        })?;
        Ok((0..n).map(|_| dist.sample(&mut self.rng)).collect())
    }

    fn uniform(&mut self, n: usize) -> Vec<f64> {
        (0..n).map(|_| self.rng.gen::<f64>()).collect()
    }

    fn weighted_choice(&mut self, values: &[i64], weights: &[f64], n: usize) -> Vec<f64> {
        (0..n)
            .map(|_| {
                let roll: f64 = self.rng.gen();
                let mut acc = 0.0;
                for (value, weight) in values.iter().zip(weights) {
                    acc += weight;
                    if roll < acc {
                        return *value as f64;
                    }
                }
                values[values.len() - 1] as f64
            })
            .collect()
    }
}

fn clip_int(values: &[f64], lo: f64, hi: f64) -> Vec<f64> {
    values.iter().map(|v| v.clamp(lo, hi).trunc()).collect()
}

fn clip(values: &[f64], lo: f64, hi: f64) -> Vec<f64> {
    values.iter().map(|v| v.clamp(lo, hi)).collect()
}

fn zip_add(a: &[f64], b: &[f64]) -> Vec<f64> {
    a.iter().zip(b).map(|(x, y)| x + y).collect()
}

fn scaled(values: &[f64], factor: f64) -> Vec<f64> {
    values.iter().map(|v| v * factor).collect()
}

/// Generate the synthetic dataset.
pub fn generate(options: &SynthOptions) -> Result<SyntheticDataset> {
    let n = options.n_samples;
    if n == 0 {
        return Err(WallmapError::InsufficientData {
            message: "sample count must be positive".to_string(),
        });
    }
    let mut s = Sampler::new(options.seed);

    let wall_ids: Vec<String> = (1..=n).map(|i| format!("Wall_{:03}", i)).collect();

    // Geometric drivers. Height is a 1-5 scale where 5 means minimal
    // remaining wall; foundation exposure in inches.
    let height = s.weighted_choice(&[1, 2, 3, 4, 5], &[0.10, 0.25, 0.35, 0.20, 0.10], n);
    let foundation_height = clip_int(&s.gamma(2.0, 6.0, n)?, 0.0, 48.0);

    // Structural degradation, coupled to height and foundation exposure.
    let out_of_plane = {
        let base = s.poisson(2.0, n)?;
        let effect: Vec<f64> = height.iter().map(|h| (h - 3.0) * 0.5).collect();
        clip_int(&zip_add(&base, &effect), 0.0, 5.0)
    };
    let structural_cracking = {
        let base = s.poisson(2.0, n)?;
        let coupled = zip_add(
            &zip_add(&base, &scaled(&out_of_plane, 0.3)),
            &scaled(&foundation_height, 0.05),
        );
        clip_int(&coupled, 0.0, 5.0)
    };
    let cap_deterioration = {
        let base = s.poisson(2.5, n)?;
        let effect: Vec<f64> = height.iter().map(|h| (5.0 - h) * 0.4).collect();
        clip_int(&zip_add(&base, &effect), 0.0, 5.0)
    };
    let cracking_junction = clip_int(&s.poisson(1.5, n)?, 0.0, 5.0);

    // Sills share one latent degradation process, so the pair stays
    // strongly correlated.
    let sill_latent = s.poisson(2.0, n)?;
    let sill_noise = s.normal(0.0, 0.5, n)?;
    let sill_1 = clip_int(&zip_add(&sill_latent, &sill_noise), 0.0, 5.0);
    let sill_2 = clip_int(&zip_add(&sill_latent, &scaled(&sill_noise, 0.8)), 0.0, 5.0);

    // Surface coats share a base process; the lintel couples to coat 1.
    let coat_base = s.poisson(2.0, n)?;
    let coat_1_cracking = clip_int(&zip_add(&coat_base, &s.normal(0.0, 1.0, n)?), 0.0, 5.0);
    let coat_1_loss = clip_int(&zip_add(&scaled(&coat_base, 0.6), &s.poisson(1.0, n)?), 0.0, 5.0);
    let coat_2_cracking = clip_int(&zip_add(&coat_base, &s.normal(0.0, 1.2, n)?), 0.0, 5.0);
    let coat_2_loss = clip_int(&zip_add(&scaled(&coat_base, 0.5), &s.poisson(1.0, n)?), 0.0, 5.0);
    let lintel_deterioration = clip_int(
        &zip_add(&scaled(&coat_1_cracking, 0.6), &s.poisson(1.0, n)?),
        0.0,
        5.0,
    );

    // Surface loss bands: most at the exposed top, least mid-wall.
    let surface_loss_top = clip_int(&s.poisson(2.5, n)?, 0.0, 5.0);
    let surface_loss_mid = clip_int(&s.poisson(1.5, n)?, 0.0, 5.0);
    let surface_loss_low = clip_int(
        &zip_add(&s.poisson(2.0, n)?, &scaled(&foundation_height, 0.05)),
        0.0,
        5.0,
    );

    // Foundation condition, driven by exposure.
    let foundation_effect = scaled(&foundation_height, 0.08);
    let foundation_displacement_1 =
        clip_int(&zip_add(&s.poisson(1.0, n)?, &foundation_effect), 0.0, 5.0);
    let foundation_displacement_2 = clip_int(
        &zip_add(&s.poisson(1.0, n)?, &scaled(&foundation_effect, 0.9)),
        0.0,
        5.0,
    );
    let foundation_mortar_1 = clip_int(&s.poisson(2.0, n)?, 0.0, 5.0);
    let foundation_mortar_2 = clip_int(
        &zip_add(&foundation_mortar_1, &s.normal(0.0, 0.5, n)?),
        0.0,
        5.0,
    );
    let foundation_stone_det = clip_int(
        &zip_add(&s.poisson(2.0, n)?, &scaled(&foundation_height, 0.05)),
        0.0,
        5.0,
    );

    // Treatment history: interventions follow damage.
    let treatment: Vec<f64> = {
        let rolls = s.uniform(n);
        (0..n)
            .map(|i| {
                let prob = 0.3 + 0.01 * (structural_cracking[i] + out_of_plane[i]);
                if rolls[i] < prob { 1.0 } else { 0.0 }
            })
            .collect()
    };
    let bracing: Vec<f64> = {
        let rolls = s.uniform(n);
        (0..n)
            .map(|i| {
                let prob = 0.2 + 0.05 * (out_of_plane[i] + structural_cracking[i]);
                if rolls[i] < prob { 1.0 } else { 0.0 }
            })
            .collect()
    };
    let bracing_score = {
        let scores = s.weighted_choice(&[1, 2, 3, 4, 5], &[0.10, 0.20, 0.30, 0.25, 0.15], n);
        (0..n)
            .map(|i| if bracing[i] == 1.0 { scores[i] } else { 0.0 })
            .collect::<Vec<f64>>()
    };

    let animal_activity = clip_int(&s.poisson(0.5, n)?, 0.0, 3.0);
    let fireplace = s.weighted_choice(&[0, 1, 2], &[0.7, 0.2, 0.1], n);

    // LiDAR-derived surface metrics.
    let point_cloud_mean = s.normal(0.0, 2.5, n)?;
    let point_cloud_deviation: Vec<f64> =
        s.exponential(1.5, n)?.iter().map(|v| v.abs()).collect();

    // Weighted total degradation score, the modeling target.
    let score_noise = s.normal(0.0, 2.0, n)?;
    let total_scr: Vec<f64> = (0..n)
        .map(|i| {
            let raw = cap_deterioration[i] * 3.0
                + out_of_plane[i] * 2.8
                + height[i] * 2.5
                + structural_cracking[i] * 2.5
                + coat_1_cracking[i] * 1.5
                + coat_2_cracking[i] * 1.5
                + sill_1[i] * 1.2
                + sill_2[i] * 1.2
                + lintel_deterioration[i] * 1.8
                + surface_loss_top[i] * 1.0
                + surface_loss_mid[i] * 0.8
                + surface_loss_low[i] * 1.0
                + foundation_height[i] * 0.15
                + foundation_stone_det[i] * 1.5
                + bracing[i] * 1.5
                + score_noise[i];
            raw.clamp(0.0, 100.0)
        })
        .collect();

    let numeric_columns: Vec<(&str, &[f64])> = vec![
        ("Height", &height),
        ("Foundation Height", &foundation_height),
        ("Out of Plane", &out_of_plane),
        ("Structural Cracking", &structural_cracking),
        ("Cap Deterioration", &cap_deterioration),
        ("Cracking Junction", &cracking_junction),
        ("Sill 1", &sill_1),
        ("Sill 2", &sill_2),
        ("Coat 1 Cracking", &coat_1_cracking),
        ("Coat 1 Loss", &coat_1_loss),
        ("Coat 2 Cracking", &coat_2_cracking),
        ("Coat 2 Loss", &coat_2_loss),
        ("Lintel Deterioration", &lintel_deterioration),
        ("Surface Loss Top", &surface_loss_top),
        ("Surface Loss Mid", &surface_loss_mid),
        ("Surface Loss Low", &surface_loss_low),
        ("Foundation Displacement 1", &foundation_displacement_1),
        ("Foundation Displacement 2", &foundation_displacement_2),
        ("Foundation Mortar 1", &foundation_mortar_1),
        ("Foundation Mortar 2", &foundation_mortar_2),
        ("Foundation Stone Det", &foundation_stone_det),
        ("Treatment", &treatment),
        ("Bracing", &bracing),
        ("Bracing Score", &bracing_score),
        ("Animal Activity", &animal_activity),
        ("Fireplace", &fireplace),
        ("Point Cloud Mean", &point_cloud_mean),
        ("Point Cloud Deviation", &point_cloud_deviation),
        ("Total Scr", &total_scr),
    ];

    let mut columns = vec!["Wall ID".to_string()];
    columns.extend(numeric_columns.iter().map(|(name, _)| name.to_string()));

    let rows: Vec<Vec<String>> = (0..n)
        .map(|i| {
            let mut row = vec![wall_ids[i].clone()];
            for (name, values) in &numeric_columns {
                let v = values[i];
                // Integer-valued scales print without a decimal point.
                let cell = match *name {
                    "Point Cloud Mean" | "Point Cloud Deviation" | "Total Scr" => {
                        format!("{:.4}", v)
                    }
                    _ => format!("{}", v as i64),
                };
                row.push(cell);
            }
            row
        })
        .collect();

    Ok(SyntheticDataset { columns, rows })
}

/// Generate and write the dataset as CSV.
pub fn write_synthetic_csv(options: &SynthOptions, path: &Path) -> Result<()> {
    let dataset = generate(options)?;
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(&dataset.columns)?;
    for row in &dataset.rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    tracing::info!(
        "wrote {} synthetic wall sections to {}",
        dataset.rows.len(),
        path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_shape_and_wall_ids() {
        let dataset = generate(&SynthOptions::default()).unwrap();
        assert_eq!(dataset.rows.len(), DEFAULT_SYNTH_SAMPLES);
        assert_eq!(dataset.columns[0], "Wall ID");
        assert_eq!(dataset.rows[0][0], "Wall_001");
        assert_eq!(dataset.rows[66][0], "Wall_067");
        for row in &dataset.rows {
            assert_eq!(row.len(), dataset.columns.len());
        }
    }

    #[test]
    fn test_deterministic_for_seed() {
        let a = generate(&SynthOptions::default()).unwrap();
        let b = generate(&SynthOptions::default()).unwrap();
        assert_eq!(a.rows, b.rows);
    }

    #[test]
    fn test_seeds_differ() {
        let a = generate(&SynthOptions::default()).unwrap();
        let b = generate(&SynthOptions {
            seed: 7,
            ..SynthOptions::default()
        })
        .unwrap();
        assert_ne!(a.rows, b.rows);
    }

    #[test]
    fn test_value_ranges() {
        let dataset = generate(&SynthOptions::default()).unwrap();
        let col = |name: &str| dataset.columns.iter().position(|c| c == name).unwrap();
        let height = col("Height");
        let foundation = col("Foundation Height");
        let total = col("Total Scr");
        let bracing = col("Bracing");
        for row in &dataset.rows {
            let h: i64 = row[height].parse().unwrap();
            assert!((1..=5).contains(&h));
            let f: i64 = row[foundation].parse().unwrap();
            assert!((0..=48).contains(&f));
            let t: f64 = row[total].parse().unwrap();
            assert!((0.0..=100.0).contains(&t));
            let b: i64 = row[bracing].parse().unwrap();
            assert!(b == 0 || b == 1);
        }
    }

    #[test]
    fn test_bracing_score_zero_without_bracing() {
        let dataset = generate(&SynthOptions::default()).unwrap();
        let col = |name: &str| dataset.columns.iter().position(|c| c == name).unwrap();
        let bracing = col("Bracing");
        let score = col("Bracing Score");
        for row in &dataset.rows {
            if row[bracing] == "0" {
                assert_eq!(row[score], "0");
            } else {
                let s: i64 = row[score].parse().unwrap();
                assert!((1..=5).contains(&s));
            }
        }
    }

    #[test]
    fn test_zero_samples_is_error() {
        let options = SynthOptions {
            n_samples: 0,
            ..SynthOptions::default()
        };
        assert!(generate(&options).is_err());
    }

    #[test]
    fn test_csv_output() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("synthetic.csv");
        write_synthetic_csv(
            &SynthOptions {
                n_samples: 5,
                seed: 1,
            },
            &path,
        )
        .unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert!(lines.next().unwrap().starts_with("Wall ID,Height"));
        assert_eq!(lines.count(), 5);
    }
}
