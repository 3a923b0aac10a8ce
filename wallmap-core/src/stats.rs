//! Correlation analysis over the wide feature table.
//!
//! Produces the pairwise Pearson matrix with two-tailed p-values, a
//! significant-relationships CSV, sampling-adequacy metrics (KMO and
//! Bartlett's test of sphericity) as JSON, and a masked heatmap PNG.

use std::path::Path;

use nalgebra::DMatrix;
use serde::Serialize;
use statrs::distribution::{ChiSquared, ContinuousCDF, StudentsT};

use crate::config::DEFAULT_ALPHA;
use crate::error::{Result, WallmapError};
use crate::model::{ColorScale, FeatureTable, Rgb};
use crate::render::legend::fill_rect;
use crate::render::{build_colorbar, font, write_png};

/// Options for a correlation run.
#[derive(Debug, Clone)]
pub struct StatsOptions {
    /// Column names excluded from the analysis (identifiers, scores).
    pub drop: Vec<String>,
    /// Significance threshold for reporting and masking.
    pub alpha: f64,
}

impl Default for StatsOptions {
    fn default() -> Self {
        Self {
            drop: Vec::new(),
            alpha: DEFAULT_ALPHA,
        }
    }
}

/// Pairwise correlation results over the analyzed variables.
#[derive(Debug)]
pub struct CorrelationAnalysis {
    /// Variable names in matrix order.
    pub variables: Vec<String>,
    /// Pearson correlation coefficients. NaN where a pair has fewer than
    /// three complete observations or a constant column.
    pub r: DMatrix<f64>,
    /// Two-tailed p-values. NaN wherever `r` is NaN, and for every pair
    /// where either column contains a missing value: such pairs are
    /// masked out of the significance report entirely.
    pub p: DMatrix<f64>,
    /// Complete-case observation count (rows with no missing value).
    pub n_complete: usize,
}

/// One reported relationship with `p < alpha`.
#[derive(Debug, Clone, PartialEq)]
pub struct SignificantPair {
    pub var_a: String,
    pub var_b: String,
    pub r: f64,
    pub p: f64,
}

/// Sampling-adequacy metrics serialized to JSON.
#[derive(Debug, Serialize)]
pub struct StatisticalMetrics {
    pub n_variables: usize,
    pub n_comparisons: usize,
    pub bonferroni_alpha: f64,
    pub kmo_overall: f64,
    pub bartlett_chi2: f64,
    pub bartlett_df: usize,
    pub bartlett_p: f64,
}

/// Numeric columns of the table with the dropped names removed.
/// Cell values are `None` where the table holds a missing marker.
fn numeric_columns(
    table: &FeatureTable,
    drop: &[String],
) -> (Vec<String>, Vec<Vec<Option<f64>>>) {
    let mut names = Vec::new();
    let mut columns = Vec::new();
    for (i, name) in table.columns.iter().enumerate() {
        if drop.iter().any(|d| d == name) {
            continue;
        }
        let column: Vec<Option<f64>> = table.rows.iter().map(|row| row[i].as_f64()).collect();
        names.push(name.clone());
        columns.push(column);
    }
    (names, columns)
}

/// Pearson r over the rows where both columns have a value.
/// Returns NaN for fewer than three shared observations or zero variance.
fn pearson(a: &[Option<f64>], b: &[Option<f64>]) -> (f64, usize) {
    let pairs: Vec<(f64, f64)> = a
        .iter()
        .zip(b.iter())
        .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
        .collect();
    let n = pairs.len();
    if n < 3 {
        return (f64::NAN, n);
    }
    let mean_x = pairs.iter().map(|(x, _)| x).sum::<f64>() / n as f64;
    let mean_y = pairs.iter().map(|(_, y)| y).sum::<f64>() / n as f64;
    let mut sxy = 0.0;
    let mut sxx = 0.0;
    let mut syy = 0.0;
    for (x, y) in &pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    if sxx == 0.0 || syy == 0.0 {
        return (f64::NAN, n);
    }
    ((sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0), n)
}

/// Two-tailed p-value for a Pearson r at sample size n.
fn pearson_p_value(r: f64, n: usize) -> f64 {
    if !r.is_finite() || n < 3 {
        return f64::NAN;
    }
    let df = (n - 2) as f64;
    let denom = 1.0 - r * r;
    if denom <= 0.0 {
        return 0.0;
    }
    let t = r.abs() * (df / denom).sqrt();
    match StudentsT::new(0.0, 1.0, df) {
        Ok(dist) => 2.0 * (1.0 - dist.cdf(t)),
        Err(_) => f64::NAN,
    }
}

/// Compute the full correlation analysis over the numeric columns.
pub fn correlate(table: &FeatureTable, options: &StatsOptions) -> Result<CorrelationAnalysis> {
    let (variables, columns) = numeric_columns(table, &options.drop);
    let p_vars = variables.len();
    if p_vars < 2 {
        return Err(WallmapError::InsufficientData {
            message: format!("need at least 2 numeric columns, found {}", p_vars),
        });
    }

    let has_missing: Vec<bool> = columns
        .iter()
        .map(|c| c.iter().any(|v| v.is_none()))
        .collect();

    let mut r = DMatrix::from_element(p_vars, p_vars, 1.0);
    let mut p = DMatrix::from_element(p_vars, p_vars, 0.0);
    for i in 0..p_vars {
        for j in (i + 1)..p_vars {
            let (rij, n) = pearson(&columns[i], &columns[j]);
            // A column with any missing value masks all of its pairs.
            let pij = if has_missing[i] || has_missing[j] {
                f64::NAN
            } else {
                pearson_p_value(rij, n)
            };
            r[(i, j)] = rij;
            r[(j, i)] = rij;
            p[(i, j)] = pij;
            p[(j, i)] = pij;
        }
    }

    let n_complete = (0..table.rows.len())
        .filter(|&row| columns.iter().all(|c| c[row].is_some()))
        .count();

    Ok(CorrelationAnalysis {
        variables,
        r,
        p,
        n_complete,
    })
}

impl CorrelationAnalysis {
    /// Pairs with `p < alpha`, ordered by |r| descending.
    pub fn significant_pairs(&self, alpha: f64) -> Vec<SignificantPair> {
        let mut pairs = Vec::new();
        for i in 0..self.variables.len() {
            for j in (i + 1)..self.variables.len() {
                let p = self.p[(i, j)];
                if p.is_finite() && p < alpha {
                    pairs.push(SignificantPair {
                        var_a: self.variables[i].clone(),
                        var_b: self.variables[j].clone(),
                        r: self.r[(i, j)],
                        p,
                    });
                }
            }
        }
        pairs.sort_by(|a, b| {
            b.r.abs()
                .partial_cmp(&a.r.abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        pairs
    }

    /// KMO and Bartlett metrics for the analyzed matrix.
    ///
    /// Fails when the correlation matrix contains NaN entries or is
    /// singular, since both measures need its inverse and determinant.
    pub fn metrics(&self, alpha: f64) -> Result<StatisticalMetrics> {
        let p_vars = self.variables.len();
        let n_comparisons = p_vars * (p_vars - 1) / 2;

        if self.r.iter().any(|v| !v.is_finite()) {
            return Err(WallmapError::InsufficientData {
                message: "correlation matrix contains undefined entries".to_string(),
            });
        }

        let kmo_overall = kmo(&self.r)?;
        let (bartlett_chi2, bartlett_df, bartlett_p) =
            bartlett(&self.r, self.n_complete)?;

        Ok(StatisticalMetrics {
            n_variables: p_vars,
            n_comparisons,
            bonferroni_alpha: alpha / n_comparisons as f64,
            kmo_overall,
            bartlett_chi2,
            bartlett_df,
            bartlett_p,
        })
    }
}

/// Kaiser-Meyer-Olkin measure of sampling adequacy.
///
/// Partial correlations come off the inverse correlation matrix:
/// `q_ij = -inv_ij / sqrt(inv_ii * inv_jj)`.
fn kmo(r: &DMatrix<f64>) -> Result<f64> {
    let inv = r
        .clone()
        .try_inverse()
        .ok_or_else(|| WallmapError::InsufficientData {
            message: "correlation matrix is singular".to_string(),
        })?;

    let p = r.nrows();
    let mut sum_r2 = 0.0;
    let mut sum_q2 = 0.0;
    for i in 0..p {
        for j in 0..p {
            if i == j {
                continue;
            }
            let q = -inv[(i, j)] / (inv[(i, i)] * inv[(j, j)]).sqrt();
            sum_r2 += r[(i, j)] * r[(i, j)];
            sum_q2 += q * q;
        }
    }
    if sum_r2 + sum_q2 == 0.0 {
        return Err(WallmapError::InsufficientData {
            message: "all off-diagonal correlations are zero".to_string(),
        });
    }
    Ok(sum_r2 / (sum_r2 + sum_q2))
}

/// Bartlett's test of sphericity: chi-squared statistic, degrees of
/// freedom, p-value.
fn bartlett(r: &DMatrix<f64>, n: usize) -> Result<(f64, usize, f64)> {
    let p = r.nrows();
    if n < p + 2 {
        return Err(WallmapError::InsufficientData {
            message: format!(
                "Bartlett's test needs more than {} complete rows, found {}",
                p + 1,
                n
            ),
        });
    }
    let det = r.determinant();
    if det <= 0.0 {
        return Err(WallmapError::InsufficientData {
            message: "correlation matrix determinant is not positive".to_string(),
        });
    }
    let chi2 = -((n - 1) as f64 - (2.0 * p as f64 + 5.0) / 6.0) * det.ln();
    let df = p * (p - 1) / 2;
    let p_value = match ChiSquared::new(df as f64) {
        Ok(dist) => 1.0 - dist.cdf(chi2),
        Err(_) => f64::NAN,
    };
    Ok((chi2, df, p_value))
}

/// Write the significant-relationships CSV, ordered by |r| descending.
pub fn write_significant_pairs(pairs: &[SignificantPair], path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["Variable 1", "Variable 2", "Correlation", "p-value"])?;
    for pair in pairs {
        writer.write_record([
            pair.var_a.as_str(),
            pair.var_b.as_str(),
            &format!("{:.6}", pair.r),
            &format!("{:.6}", pair.p),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// Write the metrics JSON.
pub fn write_metrics(metrics: &StatisticalMetrics, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(metrics)?;
    std::fs::write(path, json)?;
    Ok(())
}

const HEATMAP_CELL: u32 = 24;
const HEATMAP_LABEL_CHARS: usize = 18;

/// Render the correlation heatmap: coolwarm cells, insignificant pairs
/// masked white, variable labels on the left, colorbar on the right.
pub fn render_heatmap(analysis: &CorrelationAnalysis, alpha: f64) -> image::RgbImage {
    let p = analysis.variables.len();
    let labels: Vec<String> = analysis
        .variables
        .iter()
        .map(|v| {
            let mut label: String = v.chars().take(HEATMAP_LABEL_CHARS).collect();
            if v.chars().count() > HEATMAP_LABEL_CHARS {
                label.push('~');
            }
            label
        })
        .collect();
    let label_w = labels
        .iter()
        .map(|l| font::text_width(l))
        .max()
        .unwrap_or(0)
        + 8;

    let grid = p as u32 * HEATMAP_CELL;
    let bar = build_colorbar(ColorScale::Coolwarm, -1.0, 1.0, "r");
    let width = label_w + grid + 10 + bar.width();
    let height = (label_w + grid).max(bar.height() + 4);

    let mut image = image::RgbImage::from_pixel(width, height, Rgb::WHITE.to_pixel());
    let grid_x = label_w;
    let grid_y = label_w;

    for i in 0..p {
        for j in 0..p {
            let r = analysis.r[(i, j)];
            let pv = analysis.p[(i, j)];
            let significant = i == j || (pv.is_finite() && pv < alpha);
            let color = if significant && r.is_finite() {
                ColorScale::Coolwarm.sample((r + 1.0) / 2.0)
            } else {
                Rgb::WHITE
            };
            let x0 = grid_x + j as u32 * HEATMAP_CELL;
            let y0 = grid_y + i as u32 * HEATMAP_CELL;
            for dy in 0..HEATMAP_CELL {
                for dx in 0..HEATMAP_CELL {
                    image.put_pixel(x0 + dx, y0 + dy, color.to_pixel());
                }
            }
        }
    }

    for (i, label) in labels.iter().enumerate() {
        let y = grid_y + i as u32 * HEATMAP_CELL + (HEATMAP_CELL - font::CHAR_H) / 2;
        font::draw_text(&mut image, 2, y as i64, label, Rgb::BLACK);
    }

    for (x, y, pixel) in bar.enumerate_pixels() {
        let px = grid_x + grid + 10 + x;
        let py = 2 + y;
        if px < image.width() && py < image.height() {
            image.put_pixel(px, py, *pixel);
        }
    }

    image
}

const FREQUENCY_TOP_N: usize = 10;
const FREQUENCY_ROW_HEIGHT: u32 = 18;
const FREQUENCY_MAX_BAR: u32 = 200;

/// How often each variable appears across the significant pairs, most
/// frequent first, ties broken by name.
pub fn variable_frequencies(pairs: &[SignificantPair]) -> Vec<(String, usize)> {
    let mut counts: std::collections::BTreeMap<&str, usize> = std::collections::BTreeMap::new();
    for pair in pairs {
        *counts.entry(pair.var_a.as_str()).or_insert(0) += 1;
        *counts.entry(pair.var_b.as_str()).or_insert(0) += 1;
    }
    let mut out: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(name, count)| (name.to_string(), count))
        .collect();
    out.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    out
}

/// Horizontal bar chart of the most frequent variables in the significant
/// relationships, one labeled bar per variable, longest count first.
pub fn render_frequency_chart(pairs: &[SignificantPair]) -> image::RgbImage {
    let bar_color = Rgb::new(135, 206, 235);
    let top: Vec<(String, usize)> = variable_frequencies(pairs)
        .into_iter()
        .take(FREQUENCY_TOP_N)
        .collect();

    let title = format!("Top {} variables by significant pairs", top.len());
    let label_w = top
        .iter()
        .map(|(name, _)| font::text_width(name))
        .max()
        .unwrap_or(0)
        .max(font::text_width(&title))
        + 8;
    let max_count = top.iter().map(|(_, c)| *c).max().unwrap_or(1) as u32;
    let title_h = font::CHAR_H + 6;
    let width = label_w + FREQUENCY_MAX_BAR + 40;
    let height = title_h + (top.len() as u32).max(1) * FREQUENCY_ROW_HEIGHT + 4;

    let mut image = image::RgbImage::from_pixel(width, height, Rgb::WHITE.to_pixel());
    font::draw_text(&mut image, 2, 2, &title, Rgb::BLACK);

    for (i, (name, count)) in top.iter().enumerate() {
        let y = title_h + i as u32 * FREQUENCY_ROW_HEIGHT;
        let text_y = (y + (FREQUENCY_ROW_HEIGHT - font::CHAR_H) / 2) as i64;
        font::draw_text(&mut image, 2, text_y, name, Rgb::BLACK);

        let bar_w = (*count as u32 * FREQUENCY_MAX_BAR) / max_count;
        fill_rect(
            &mut image,
            label_w,
            y + 2,
            bar_w.max(1),
            FREQUENCY_ROW_HEIGHT - 4,
            bar_color,
        );
        font::draw_text(
            &mut image,
            (label_w + bar_w + 4) as i64,
            text_y,
            &count.to_string(),
            Rgb::BLACK,
        );
    }

    image
}

/// Run the full analysis and write the output artifacts next to
/// `prefix` (`{prefix}significant_relationships.csv`,
/// `{prefix}statistical_metrics.json`, `{prefix}heatmap.png`,
/// `{prefix}significant_frequency.png`).
pub fn run_stats(
    table: &FeatureTable,
    options: &StatsOptions,
    out_dir: &Path,
    prefix: &str,
) -> Result<Vec<std::path::PathBuf>> {
    std::fs::create_dir_all(out_dir)?;
    let analysis = correlate(table, options)?;

    let pairs = analysis.significant_pairs(options.alpha);
    tracing::info!(
        "{} of {} pairs significant at alpha {}",
        pairs.len(),
        analysis.variables.len() * (analysis.variables.len() - 1) / 2,
        options.alpha
    );

    let csv_path = out_dir.join(format!("{}significant_relationships.csv", prefix));
    write_significant_pairs(&pairs, &csv_path)?;

    let mut written = vec![csv_path];

    match analysis.metrics(options.alpha) {
        Ok(metrics) => {
            let json_path = out_dir.join(format!("{}statistical_metrics.json", prefix));
            write_metrics(&metrics, &json_path)?;
            written.push(json_path);
        }
        Err(err) => {
            tracing::warn!("skipping adequacy metrics: {}", err);
        }
    }

    let heatmap = render_heatmap(&analysis, options.alpha);
    let png_path = out_dir.join(format!("{}heatmap.png", prefix));
    write_png(&heatmap, &png_path)?;
    written.push(png_path);

    let chart = render_frequency_chart(&pairs);
    let chart_path = out_dir.join(format!("{}significant_frequency.png", prefix));
    write_png(&chart, &chart_path)?;
    written.push(chart_path);

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FeatureValue;
    use pretty_assertions::assert_eq;

    fn table_from_columns(columns: &[(&str, Vec<f64>)]) -> FeatureTable {
        let names: Vec<String> = columns.iter().map(|(n, _)| n.to_string()).collect();
        let rows = columns[0].1.len();
        let ids: Vec<String> = (0..rows).map(|i| format!("W{:03}", i)).collect();
        let data: Vec<Vec<FeatureValue>> = (0..rows)
            .map(|i| {
                columns
                    .iter()
                    .map(|(_, col)| FeatureValue::Float(col[i]))
                    .collect()
            })
            .collect();
        FeatureTable::new(names, ids, data)
    }

    #[test]
    fn test_pearson_perfect_correlation() {
        let a: Vec<Option<f64>> = vec![Some(1.0), Some(2.0), Some(3.0), Some(4.0)];
        let b: Vec<Option<f64>> = vec![Some(2.0), Some(4.0), Some(6.0), Some(8.0)];
        let (r, n) = pearson(&a, &b);
        assert_eq!(n, 4);
        assert!((r - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_pearson_skips_missing_rows() {
        let a: Vec<Option<f64>> = vec![Some(1.0), None, Some(3.0), Some(4.0), Some(5.0)];
        let b: Vec<Option<f64>> = vec![Some(1.0), Some(9.0), Some(3.0), None, Some(5.0)];
        let (r, n) = pearson(&a, &b);
        assert_eq!(n, 3);
        assert!((r - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_pearson_constant_column_is_nan() {
        let a: Vec<Option<f64>> = vec![Some(2.0), Some(2.0), Some(2.0), Some(2.0)];
        let b: Vec<Option<f64>> = vec![Some(1.0), Some(2.0), Some(3.0), Some(4.0)];
        let (r, _) = pearson(&a, &b);
        assert!(r.is_nan());
    }

    #[test]
    fn test_p_value_small_for_strong_correlation() {
        // 20 nearly-collinear points.
        let a: Vec<Option<f64>> = (0..20).map(|i| Some(i as f64)).collect();
        let b: Vec<Option<f64>> = (0..20)
            .map(|i| Some(2.0 * i as f64 + if i % 2 == 0 { 0.1 } else { -0.1 }))
            .collect();
        let (r, n) = pearson(&a, &b);
        let p = pearson_p_value(r, n);
        assert!(p < 0.001);
    }

    #[test]
    fn test_significant_pairs_sorted_by_magnitude() {
        let xs: Vec<f64> = (0..30).map(|i| i as f64).collect();
        let strong: Vec<f64> = xs.iter().map(|x| 3.0 * x + (x * 7.0).sin()).collect();
        let weaker: Vec<f64> = xs
            .iter()
            .map(|x| x + 12.0 * (x * 13.0).sin())
            .collect();
        let table = table_from_columns(&[
            ("X", xs),
            ("Strong", strong),
            ("Weaker", weaker),
        ]);
        let analysis = correlate(&table, &StatsOptions::default()).unwrap();
        let pairs = analysis.significant_pairs(0.05);
        assert!(!pairs.is_empty());
        for window in pairs.windows(2) {
            assert!(window[0].r.abs() >= window[1].r.abs());
        }
        assert_eq!(pairs[0].var_a, "X");
        assert_eq!(pairs[0].var_b, "Strong");
    }

    #[test]
    fn test_missing_column_masks_its_pairs() {
        // One missing cell in B: every pair involving B gets a NaN
        // p-value and drops out of the significance report, even though
        // the pairwise-complete correlation itself is strong.
        let n = 20;
        let ids: Vec<String> = (0..n).map(|i| format!("W{:03}", i)).collect();
        let rows: Vec<Vec<FeatureValue>> = (0..n)
            .map(|i| {
                let b = if i == 5 {
                    FeatureValue::Missing
                } else {
                    FeatureValue::Float(2.0 * i as f64)
                };
                vec![FeatureValue::Float(i as f64), b]
            })
            .collect();
        let table = FeatureTable::new(vec!["A".to_string(), "B".to_string()], ids, rows);

        let analysis = correlate(&table, &StatsOptions::default()).unwrap();
        assert!(analysis.r[(0, 1)].is_finite());
        assert!(analysis.p[(0, 1)].is_nan());
        assert!(analysis.significant_pairs(0.05).is_empty());
    }

    #[test]
    fn test_drop_excludes_columns() {
        let table = table_from_columns(&[
            ("Total Scr", (0..10).map(|i| i as f64).collect()),
            ("A", (0..10).map(|i| (i * 2) as f64).collect()),
            ("B", (0..10).map(|i| (10 - i) as f64).collect()),
        ]);
        let options = StatsOptions {
            drop: vec!["Total Scr".to_string()],
            alpha: 0.05,
        };
        let analysis = correlate(&table, &options).unwrap();
        assert_eq!(analysis.variables, vec!["A".to_string(), "B".to_string()]);
    }

    #[test]
    fn test_metrics_identity_matrix_behaviour() {
        // Near-independent columns: Bartlett should not reject strongly and
        // the chi-squared statistic stays small.
        let n = 40;
        let a: Vec<f64> = (0..n).map(|i| (i as f64 * 0.7).sin()).collect();
        let b: Vec<f64> = (0..n).map(|i| ((i as f64) * 1.3 + 2.0).cos()).collect();
        let c: Vec<f64> = (0..n).map(|i| ((i * i) % 17) as f64).collect();
        let table = table_from_columns(&[("A", a), ("B", b), ("C", c)]);
        let analysis = correlate(&table, &StatsOptions::default()).unwrap();
        let metrics = analysis.metrics(0.05).unwrap();
        assert_eq!(metrics.n_variables, 3);
        assert_eq!(metrics.n_comparisons, 3);
        assert_eq!(metrics.bartlett_df, 3);
        assert!((metrics.bonferroni_alpha - 0.05 / 3.0).abs() < 1e-12);
        assert!(metrics.kmo_overall >= 0.0 && metrics.kmo_overall <= 1.0);
    }

    #[test]
    fn test_metrics_fail_on_undefined_correlations() {
        let table = table_from_columns(&[
            ("Const", vec![1.0; 10]),
            ("A", (0..10).map(|i| i as f64).collect()),
        ]);
        let analysis = correlate(&table, &StatsOptions::default()).unwrap();
        assert!(analysis.metrics(0.05).is_err());
    }

    #[test]
    fn test_too_few_columns_is_error() {
        let table = table_from_columns(&[("Only", (0..5).map(|i| i as f64).collect())]);
        assert!(matches!(
            correlate(&table, &StatsOptions::default()),
            Err(WallmapError::InsufficientData { .. })
        ));
    }

    fn pair(a: &str, b: &str, r: f64) -> SignificantPair {
        SignificantPair {
            var_a: a.to_string(),
            var_b: b.to_string(),
            r,
            p: 0.01,
        }
    }

    #[test]
    fn test_variable_frequencies_count_both_sides() {
        let pairs = vec![
            pair("Height", "Total Scr", 0.9),
            pair("Height", "Out of Plane", 0.8),
            pair("Out of Plane", "Total Scr", 0.7),
        ];
        let freqs = variable_frequencies(&pairs);
        assert_eq!(freqs.len(), 3);
        // All appear twice; ties order by name.
        assert_eq!(freqs[0], ("Height".to_string(), 2));
        assert_eq!(freqs[1], ("Out of Plane".to_string(), 2));
        assert_eq!(freqs[2], ("Total Scr".to_string(), 2));
    }

    #[test]
    fn test_frequency_chart_rows_follow_counts() {
        let pairs = vec![
            pair("Height", "Total Scr", 0.9),
            pair("Height", "Out of Plane", 0.8),
        ];
        let freqs = variable_frequencies(&pairs);
        assert_eq!(freqs[0], ("Height".to_string(), 2));

        let image = render_frequency_chart(&pairs);
        let title_h = crate::render::font::CHAR_H + 6;
        assert_eq!(image.height(), title_h + 3 * FREQUENCY_ROW_HEIGHT + 4);
        assert!(image.width() > FREQUENCY_MAX_BAR);
    }

    #[test]
    fn test_frequency_chart_empty_pairs() {
        let image = render_frequency_chart(&[]);
        assert!(image.width() > 0);
        assert!(image.height() > 0);
    }

    #[test]
    fn test_heatmap_masks_diagonal_red() {
        let table = table_from_columns(&[
            ("A", (0..12).map(|i| i as f64).collect()),
            ("B", (0..12).map(|i| (i as f64) * -1.0).collect()),
        ]);
        let analysis = correlate(&table, &StatsOptions::default()).unwrap();
        let image = render_heatmap(&analysis, 0.05);
        assert!(image.width() > 2 * HEATMAP_CELL);
        assert!(image.height() >= 2 * HEATMAP_CELL);
    }
}
