// カテゴリ評定の一致度モジュール
//
// 分割表・集計行列の構築と、Cohenのカッパ係数、Fleissのカッパ係数、
// Scottのπ、Krippendorffのα、Spearman順位相関の内部実装。

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use statrs::distribution::{ContinuousCDF, Normal};

use crate::dataframe::{is_missing, DataFrame};
use crate::error::{Error, Result};
use crate::stats::{AlphaMetric, CohenKappaResult, ContingencyTable, RatingCounts};

/// カテゴリラベルの比較
///
/// 両方が数値として解釈できる場合は数値順、それ以外は辞書順で比較する。
/// 文字列格納のテーブルで "10" が "2" の後に並ぶようにするための規則。
pub(crate) fn compare_categories(a: &str, b: &str) -> Ordering {
    match (a.parse::<f64>(), b.parse::<f64>()) {
        (Ok(x), Ok(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        _ => a.cmp(b),
    }
}

/// 観測値からカテゴリ集合を推定する（欠損値は除外、ソート済み）
fn inferred_categories<'a, I>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a String>,
{
    let mut distinct: Vec<String> = values
        .into_iter()
        .filter(|value| !is_missing(value))
        .cloned()
        .collect::<HashSet<String>>()
        .into_iter()
        .collect();
    distinct.sort_by(|a, b| compare_categories(a, b));
    distinct
}

/// 明示的に指定されたカテゴリ集合を検証する
fn explicit_categories(categories: &[&str]) -> Result<Vec<String>> {
    if categories.is_empty() {
        return Err(Error::InvalidInput(
            "カテゴリ集合が空です".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for category in categories {
        if !seen.insert(*category) {
            return Err(Error::InvalidInput(format!(
                "カテゴリが重複しています: {}",
                category
            )));
        }
    }

    Ok(categories.iter().map(|c| c.to_string()).collect())
}

/// 分割表を構築する内部実装
pub(crate) fn crosstab_impl(
    df: &DataFrame,
    rater_a: &str,
    rater_b: &str,
    categories: Option<&[&str]>,
) -> Result<ContingencyTable> {
    let values_a = df.column_values(rater_a)?;
    let values_b = df.column_values(rater_b)?;

    let categories = match categories {
        Some(explicit) => explicit_categories(explicit)?,
        None => inferred_categories(values_a.iter().chain(values_b.iter())),
    };

    let positions: HashMap<&str, usize> = categories
        .iter()
        .enumerate()
        .map(|(i, category)| (category.as_str(), i))
        .collect();

    let n_categories = categories.len();
    let mut counts = vec![vec![0usize; n_categories]; n_categories];
    let mut missing_dropped = 0usize;
    let mut outside_dropped = 0usize;

    for (a, b) in values_a.iter().zip(values_b.iter()) {
        if is_missing(a) || is_missing(b) {
            missing_dropped += 1;
            continue;
        }
        match (positions.get(a.as_str()), positions.get(b.as_str())) {
            (Some(&i), Some(&j)) => counts[i][j] += 1,
            _ => outside_dropped += 1,
        }
    }

    if missing_dropped > 0 {
        log::debug!("欠損値を含む {} 件の評定ペアを除外しました", missing_dropped);
    }
    if outside_dropped > 0 {
        log::warn!(
            "カテゴリ集合に含まれない {} 件の評定ペアを分割表から除外しました",
            outside_dropped
        );
    }

    Ok(ContingencyTable::new(categories, counts))
}

/// Cohenのカッパ係数の内部実装
///
/// 分散はFleiss, Cohen & Everitt (1969) の漸近公式による。
pub(crate) fn cohens_kappa_impl(
    df: &DataFrame,
    rater_a: &str,
    rater_b: &str,
    categories: Option<&[&str]>,
) -> Result<CohenKappaResult> {
    let table = crosstab_impl(df, rater_a, rater_b, categories)?;
    let n = table.n_observations();

    if n == 0 {
        return Err(Error::EmptyData(
            "カッパ係数の計算には評定データが必要です".to_string(),
        ));
    }

    let q = table.categories().len();
    let n_f = n as f64;

    // 相対度数と周辺分布
    let probs: Vec<Vec<f64>> = table
        .counts()
        .iter()
        .map(|row| row.iter().map(|&c| c as f64 / n_f).collect())
        .collect();
    let freq_row: Vec<f64> = probs.iter().map(|row| row.iter().sum()).collect();
    let freq_col: Vec<f64> = (0..q)
        .map(|j| probs.iter().map(|row| row[j]).sum())
        .collect();

    let observed = (0..q).map(|i| probs[i][i]).sum::<f64>();
    let expected = (0..q).map(|i| freq_row[i] * freq_col[i]).sum::<f64>();

    if expected >= 1.0 - 1e-12 {
        return Err(Error::InvalidInput(
            "全ての評定が単一のカテゴリに集中しているため、カッパ係数が定義できません".to_string(),
        ));
    }

    let kappa = (observed - expected) / (1.0 - expected);

    // 漸近分散
    let mut term_a = 0.0;
    for i in 0..q {
        term_a += probs[i][i] * (1.0 - (freq_row[i] + freq_col[i]) * (1.0 - kappa)).powi(2);
    }
    let mut term_b = 0.0;
    for i in 0..q {
        for j in 0..q {
            if i != j {
                term_b += probs[i][j] * (freq_col[i] + freq_row[j]).powi(2);
            }
        }
    }
    term_b *= (1.0 - kappa).powi(2);
    let term_c = (kappa - expected * (1.0 - kappa)).powi(2);
    let var_kappa = (term_a + term_b - term_c) / (1.0 - expected).powi(2) / n_f;

    // 帰無仮説（カッパ=0）のもとでの分散
    let term_c0 = (0..q)
        .map(|i| freq_col[i] * freq_row[i] * (freq_col[i] + freq_row[i]))
        .sum::<f64>();
    let var_kappa0 = (expected + expected.powi(2) - term_c0) / (1.0 - expected).powi(2) / n_f;

    let z_value = kappa / var_kappa0.sqrt();
    let p_value = normal_two_sided(z_value)?;

    Ok(CohenKappaResult {
        kappa,
        std_err: var_kappa.max(0.0).sqrt(),
        z_value,
        p_value,
        observed_agreement: observed,
        expected_agreement: expected,
    })
}

/// 対象×評価者のテーブルを対象×カテゴリの集計行列に変換する内部実装
pub(crate) fn aggregate_raters_impl(
    df: &DataFrame,
    categories: Option<&[&str]>,
) -> Result<RatingCounts> {
    if df.is_empty() {
        return Err(Error::EmptyData(
            "集計には評定データが必要です".to_string(),
        ));
    }

    let column_names = df.column_names();
    let categories = match categories {
        Some(explicit) => explicit_categories(explicit)?,
        None => {
            let mut all_values = Vec::new();
            for name in &column_names {
                all_values.extend(df.column_values(name)?.iter());
            }
            inferred_categories(all_values)
        }
    };

    let positions: HashMap<&str, usize> = categories
        .iter()
        .enumerate()
        .map(|(i, category)| (category.as_str(), i))
        .collect();

    let mut counts = vec![vec![0usize; categories.len()]; df.row_count()];
    let mut outside_dropped = 0usize;

    for name in &column_names {
        let values = df.column_values(name)?;
        for (row, value) in values.iter().enumerate() {
            if is_missing(value) {
                continue;
            }
            match positions.get(value.as_str()) {
                Some(&j) => counts[row][j] += 1,
                None => outside_dropped += 1,
            }
        }
    }

    if outside_dropped > 0 {
        log::warn!(
            "カテゴリ集合に含まれない {} 件の評定を集計から除外しました",
            outside_dropped
        );
    }

    Ok(RatingCounts::new(categories, counts))
}

/// Fleissのカッパ係数の内部実装
pub(crate) fn fleiss_kappa_impl(df: &DataFrame, categories: Option<&[&str]>) -> Result<f64> {
    let n_raters = df.column_count();
    if n_raters < 2 {
        return Err(Error::InsufficientData(
            "Fleissのカッパ係数には少なくとも2人の評価者が必要です".to_string(),
        ));
    }

    let aggregated = aggregate_raters_impl(df, categories)?;
    let counts = aggregated.counts();
    let n_subjects = counts.len();

    // 各対象が同じ数の評定を持つことを確認する
    for (row, sum) in aggregated.row_sums().iter().enumerate() {
        if *sum != n_raters {
            return Err(Error::InvalidInput(format!(
                "対象 {} の評定数 ({}) が評価者数 ({}) と一致しません",
                row, sum, n_raters
            )));
        }
    }

    let q = aggregated.categories().len();
    let n = n_raters as f64;
    let total = (n_subjects * n_raters) as f64;

    // カテゴリごとの周辺比率
    let p_cat: Vec<f64> = (0..q)
        .map(|j| counts.iter().map(|row| row[j] as f64).sum::<f64>() / total)
        .collect();

    // 対象ごとの一致度
    let p_subject: Vec<f64> = counts
        .iter()
        .map(|row| {
            let sum_sq = row.iter().map(|&c| (c * c) as f64).sum::<f64>();
            (sum_sq - n) / (n * (n - 1.0))
        })
        .collect();

    let p_bar = p_subject.iter().sum::<f64>() / n_subjects as f64;
    let p_bar_e = p_cat.iter().map(|p| p * p).sum::<f64>();

    if p_bar_e >= 1.0 - 1e-12 {
        return Err(Error::InvalidInput(
            "全ての評定が単一のカテゴリに集中しているため、カッパ係数が定義できません".to_string(),
        ));
    }

    Ok((p_bar - p_bar_e) / (1.0 - p_bar_e))
}

/// Scottのπの内部実装
///
/// 偶然一致率に両評価者をプールした周辺比率を使う点だけが
/// Cohenのカッパ係数と異なる。
pub(crate) fn scotts_pi_impl(df: &DataFrame, rater_a: &str, rater_b: &str) -> Result<f64> {
    let table = crosstab_impl(df, rater_a, rater_b, None)?;
    let n = table.n_observations();

    if n == 0 {
        return Err(Error::EmptyData(
            "Scottのπの計算には評定データが必要です".to_string(),
        ));
    }

    let n_f = n as f64;
    let q = table.categories().len();
    let row_sums = table.row_sums();
    let col_sums = table.col_sums();

    let observed = (0..q).map(|i| table.counts()[i][i] as f64).sum::<f64>() / n_f;
    let expected = (0..q)
        .map(|i| {
            let pooled = (row_sums[i] as f64 / n_f + col_sums[i] as f64 / n_f) / 2.0;
            pooled * pooled
        })
        .sum::<f64>();

    if expected >= 1.0 - 1e-12 {
        return Err(Error::InvalidInput(
            "全ての評定が単一のカテゴリに集中しているため、Scottのπが定義できません".to_string(),
        ));
    }

    Ok((observed - expected) / (1.0 - expected))
}

/// Krippendorffのαの内部実装
///
/// 一致行列（coincidence matrix）による定式化を使う。評定が2つ未満の
/// 対象は寄与しない。
pub(crate) fn krippendorff_alpha_impl(df: &DataFrame, metric: AlphaMetric) -> Result<f64> {
    if df.is_empty() {
        return Err(Error::EmptyData(
            "Krippendorffのαの計算には評定データが必要です".to_string(),
        ));
    }

    // 各対象の欠損値を除いた評定を収集する
    let column_names = df.column_names();
    let mut columns = Vec::with_capacity(column_names.len());
    for name in &column_names {
        columns.push(df.column_values(name)?);
    }

    let mut units: Vec<Vec<&String>> = Vec::with_capacity(df.row_count());
    for row in 0..df.row_count() {
        let unit: Vec<&String> = columns
            .iter()
            .map(|values| &values[row])
            .filter(|value| !is_missing(value))
            .collect();
        if unit.len() >= 2 {
            units.push(unit);
        }
    }

    if units.is_empty() {
        return Err(Error::InsufficientData(
            "評定が2つ以上ある対象がありません".to_string(),
        ));
    }
    if units.len() < df.row_count() {
        log::debug!(
            "評定が2つ未満の {} 件の対象を除外しました",
            df.row_count() - units.len()
        );
    }

    let categories = inferred_categories(units.iter().flat_map(|unit| unit.iter().copied()));
    let q = categories.len();
    if q < 2 {
        return Err(Error::InvalidInput(
            "カテゴリが1つしかないため、Krippendorffのαが定義できません".to_string(),
        ));
    }

    // 間隔尺度・比率尺度ではカテゴリラベルを数値として解釈する
    let numeric_categories: Vec<f64> = if metric == AlphaMetric::Nominal {
        Vec::new()
    } else {
        categories
            .iter()
            .map(|category| {
                category.parse::<f64>().map_err(|_| {
                    Error::Cast(format!(
                        "カテゴリ '{}' を数値に変換できません",
                        category
                    ))
                })
            })
            .collect::<Result<Vec<f64>>>()?
    };

    let positions: HashMap<&str, usize> = categories
        .iter()
        .enumerate()
        .map(|(i, category)| (category.as_str(), i))
        .collect();

    // 一致行列の構築
    let mut coincidence = vec![vec![0.0f64; q]; q];
    for unit in &units {
        let m = unit.len() as f64;
        let mut unit_counts = vec![0usize; q];
        for value in unit {
            unit_counts[positions[value.as_str()]] += 1;
        }
        for c in 0..q {
            for k in 0..q {
                let pairs = if c == k {
                    unit_counts[c] * unit_counts[c].saturating_sub(1)
                } else {
                    unit_counts[c] * unit_counts[k]
                };
                coincidence[c][k] += pairs as f64 / (m - 1.0);
            }
        }
    }

    let n_total: f64 = coincidence.iter().map(|row| row.iter().sum::<f64>()).sum();
    let marginals: Vec<f64> = coincidence.iter().map(|row| row.iter().sum()).collect();

    let delta_sq = |c: usize, k: usize| -> f64 {
        match metric {
            AlphaMetric::Nominal => {
                if c == k {
                    0.0
                } else {
                    1.0
                }
            }
            AlphaMetric::Interval => {
                let diff = numeric_categories[c] - numeric_categories[k];
                diff * diff
            }
            AlphaMetric::Ratio => {
                let sum = numeric_categories[c] + numeric_categories[k];
                if sum == 0.0 {
                    0.0
                } else {
                    let ratio = (numeric_categories[c] - numeric_categories[k]) / sum;
                    ratio * ratio
                }
            }
        }
    };

    let mut observed_disagreement = 0.0;
    let mut expected_disagreement = 0.0;
    for c in 0..q {
        for k in 0..q {
            observed_disagreement += coincidence[c][k] * delta_sq(c, k);
            expected_disagreement += marginals[c] * marginals[k] * delta_sq(c, k);
        }
    }
    expected_disagreement /= n_total - 1.0;

    if expected_disagreement == 0.0 {
        return Err(Error::InvalidInput(
            "期待不一致が0のため、Krippendorffのαが定義できません".to_string(),
        ));
    }

    Ok(1.0 - observed_disagreement / expected_disagreement)
}

/// Spearman順位相関係数の内部実装
pub(crate) fn spearman_corr_impl(df: &DataFrame, rater_a: &str, rater_b: &str) -> Result<f64> {
    let values_a = df.numeric_values(rater_a)?;
    let values_b = df.numeric_values(rater_b)?;

    // 両方の評定がある行だけを使う
    let pairs: Vec<(f64, f64)> = values_a
        .iter()
        .zip(values_b.iter())
        .filter_map(|(a, b)| match (a, b) {
            (Some(x), Some(y)) => Some((*x, *y)),
            _ => None,
        })
        .collect();

    if pairs.len() < 2 {
        return Err(Error::InsufficientData(
            "順位相関の計算には少なくとも2組の評定が必要です".to_string(),
        ));
    }

    let x: Vec<f64> = pairs.iter().map(|(a, _)| *a).collect();
    let y: Vec<f64> = pairs.iter().map(|(_, b)| *b).collect();

    let ranks_x = average_ranks(&x);
    let ranks_y = average_ranks(&y);

    pearson(&ranks_x, &ranks_y)
}

/// 平均順位を割り当てる（同順位には平均順位）
fn average_ranks(values: &[f64]) -> Vec<f64> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| {
        values[a]
            .partial_cmp(&values[b])
            .unwrap_or(Ordering::Equal)
    });

    let mut ranks = vec![0.0; values.len()];
    let mut i = 0;
    while i < values.len() {
        let mut j = i;
        // 同じ値のデータを見つける
        while j + 1 < values.len()
            && (values[order[j + 1]] - values[order[i]]).abs() < f64::EPSILON
        {
            j += 1;
        }

        let rank_avg = (i + j + 2) as f64 / 2.0;
        for position in &order[i..=j] {
            ranks[*position] = rank_avg;
        }
        i = j + 1;
    }

    ranks
}

/// Pearson相関係数（分散が0の場合はエラー）
fn pearson(x: &[f64], y: &[f64]) -> Result<f64> {
    let n = x.len() as f64;
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (a, b) in x.iter().zip(y.iter()) {
        cov += (a - mean_x) * (b - mean_y);
        var_x += (a - mean_x).powi(2);
        var_y += (b - mean_y).powi(2);
    }

    let denominator = (var_x * var_y).sqrt();
    if denominator == 0.0 {
        return Err(Error::InvalidInput(
            "相関係数を計算できません: 分散が0です".to_string(),
        ));
    }

    Ok(cov / denominator)
}

/// 両側p値を標準正規分布から計算
fn normal_two_sided(z: f64) -> Result<f64> {
    let normal = Normal::new(0.0, 1.0)
        .map_err(|e| Error::OperationFailed(format!("正規分布の構築に失敗しました: {}", e)))?;
    Ok(2.0 * (1.0 - normal.cdf(z.abs())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::Series;

    fn two_rater_frame(a: &[&str], b: &[&str]) -> DataFrame {
        let mut df = DataFrame::new();
        df.add_column(
            "Rater1".to_string(),
            Series::from_strings(a, Some("Rater1".to_string())).unwrap(),
        )
        .unwrap();
        df.add_column(
            "Rater2".to_string(),
            Series::from_strings(b, Some("Rater2".to_string())).unwrap(),
        )
        .unwrap();
        df
    }

    fn three_rater_frame(a: &[&str], b: &[&str], c: &[&str]) -> DataFrame {
        let mut df = two_rater_frame(a, b);
        df.add_column(
            "Rater3".to_string(),
            Series::from_strings(c, Some("Rater3".to_string())).unwrap(),
        )
        .unwrap();
        df
    }

    #[test]
    fn test_compare_categories_numeric_aware() {
        assert_eq!(compare_categories("2", "10"), Ordering::Less);
        assert_eq!(compare_categories("b", "a"), Ordering::Greater);
        assert_eq!(compare_categories("1", "abc"), Ordering::Less);
    }

    #[test]
    fn test_crosstab_zero_filled() {
        let df = two_rater_frame(&["1", "2", "3", "4", "5"], &["2", "3", "3", "4", "5"]);
        let table = crosstab_impl(&df, "Rater1", "Rater2", None).unwrap();

        assert_eq!(table.categories(), &["1", "2", "3", "4", "5"]);
        assert_eq!(table.n_observations(), 5);
        // 行和は一方の評価者のカテゴリ度数、列和はもう一方の度数
        assert_eq!(table.row_sums(), vec![1, 1, 1, 1, 1]);
        assert_eq!(table.col_sums(), vec![0, 1, 2, 1, 1]);
        // 出現しなかった組み合わせは0で埋められる
        assert_eq!(table.counts()[0][0], 0);
        assert_eq!(table.counts()[0][1], 1);
        assert_eq!(table.counts()[2][2], 1);
    }

    #[test]
    fn test_crosstab_explicit_categories() {
        let df = two_rater_frame(&["1", "2", "1"], &["1", "2", "3"]);
        let table = crosstab_impl(&df, "Rater1", "Rater2", Some(&["1", "2"])).unwrap();

        // カテゴリ "3" を含むペアは除外される
        assert_eq!(table.categories(), &["1", "2"]);
        assert_eq!(table.n_observations(), 2);

        let duplicated = crosstab_impl(&df, "Rater1", "Rater2", Some(&["1", "1"]));
        assert!(matches!(duplicated, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_cohens_kappa_known_value() {
        let df = two_rater_frame(&["1", "2", "3", "4", "5"], &["2", "3", "3", "4", "5"]);
        let result = cohens_kappa_impl(&df, "Rater1", "Rater2", None).unwrap();

        assert!((result.kappa - 0.5).abs() < 1e-10);
        assert!((result.observed_agreement - 0.6).abs() < 1e-10);
        assert!((result.expected_agreement - 0.2).abs() < 1e-10);
        assert!((result.std_err - 0.2524876234590521).abs() < 1e-10);
        assert!((result.z_value - 2.357022603955158).abs() < 1e-10);
        assert!((result.p_value - 0.018422125454099048).abs() < 1e-9);
    }

    #[test]
    fn test_cohens_kappa_partial_agreement() {
        let df = two_rater_frame(&["1", "2", "3", "1", "2"], &["1", "2", "3", "1", "3"]);
        let result = cohens_kappa_impl(&df, "Rater1", "Rater2", None).unwrap();

        assert!((result.kappa - 0.7058823529411765).abs() < 1e-10);
        assert!((result.std_err - 0.2404782055902291).abs() < 1e-10);
    }

    #[test]
    fn test_cohens_kappa_single_category() {
        let df = two_rater_frame(&["1", "1"], &["1", "1"]);
        let result = cohens_kappa_impl(&df, "Rater1", "Rater2", None);
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_aggregate_raters_row_sums() {
        let df = three_rater_frame(
            &["1", "2", "3", "4", "5"],
            &["2", "3", "3", "4", "5"],
            &["3", "4", "5", "2", "5"],
        );
        let aggregated = aggregate_raters_impl(&df, None).unwrap();

        assert_eq!(aggregated.categories(), &["1", "2", "3", "4", "5"]);
        // 全ての行の合計は評価者数に一致する
        assert_eq!(aggregated.row_sums(), vec![3, 3, 3, 3, 3]);
        // 対象0は {1, 2, 3} を1回ずつ割り当てられている
        assert_eq!(aggregated.counts()[0], vec![1, 1, 1, 0, 0]);
    }

    #[test]
    fn test_fleiss_kappa_known_value() {
        let df = three_rater_frame(
            &["1", "2", "3", "4", "5"],
            &["2", "3", "3", "4", "5"],
            &["3", "4", "5", "2", "5"],
        );
        let kappa = fleiss_kappa_impl(&df, None).unwrap();
        assert!((kappa - 0.1379310344827586).abs() < 1e-10);
    }

    #[test]
    fn test_fleiss_kappa_incomplete_table() {
        let df = three_rater_frame(&["1", "2"], &["1", "NA"], &["1", "2"]);
        let result = fleiss_kappa_impl(&df, None);
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_fleiss_kappa_categories_not_covering() {
        let df = three_rater_frame(&["1", "2"], &["1", "2"], &["1", "3"]);
        let result = fleiss_kappa_impl(&df, Some(&["1", "2"]));
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_scotts_pi_known_value() {
        let df = two_rater_frame(&["1", "2", "3", "4", "5"], &["2", "3", "3", "4", "5"]);
        let pi = scotts_pi_impl(&df, "Rater1", "Rater2").unwrap();
        assert!((pi - 0.4871794871794871).abs() < 1e-10);
    }

    #[test]
    fn test_krippendorff_alpha_nominal() {
        let df = three_rater_frame(
            &["1", "2", "3", "1", "2"],
            &["1", "2", "3", "1", "3"],
            &["1", "2", "3", "1", "2"],
        );
        let alpha = krippendorff_alpha_impl(&df, AlphaMetric::Nominal).unwrap();
        assert!((alpha - 0.8108108108108107).abs() < 1e-10);
    }

    #[test]
    fn test_krippendorff_alpha_with_missing() {
        // 評定が2つ未満の対象（後ろの2行）は除外される
        let df = two_rater_frame(
            &["1", "2", "3", "3", "2", "1", "4", "1", "2", "NA", "NA"],
            &["1", "2", "3", "3", "2", "2", "4", "1", "2", "5", "NA"],
        );
        let nominal = krippendorff_alpha_impl(&df, AlphaMetric::Nominal).unwrap();
        assert!((nominal - 0.8521739130434782).abs() < 1e-10);

        let interval = krippendorff_alpha_impl(&df, AlphaMetric::Interval).unwrap();
        assert!((interval - 0.9427609427609428).abs() < 1e-10);
    }

    #[test]
    fn test_krippendorff_alpha_non_numeric_interval() {
        let df = two_rater_frame(&["low", "high"], &["low", "low"]);
        let result = krippendorff_alpha_impl(&df, AlphaMetric::Interval);
        assert!(matches!(result, Err(Error::Cast(_))));
    }

    #[test]
    fn test_spearman_corr_known_value() {
        let df = two_rater_frame(&["1", "2", "3", "4", "5"], &["2", "3", "3", "4", "5"]);
        let rho = spearman_corr_impl(&df, "Rater1", "Rater2").unwrap();
        assert!((rho - 0.9746794344808964).abs() < 1e-10);
    }

    #[test]
    fn test_spearman_corr_constant_column() {
        let df = two_rater_frame(&["1", "2", "3"], &["2", "2", "2"]);
        let result = spearman_corr_impl(&df, "Rater1", "Rater2");
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_average_ranks_with_ties() {
        let ranks = average_ranks(&[2.0, 3.0, 3.0, 4.0, 5.0]);
        assert_eq!(ranks, vec![1.0, 2.5, 2.5, 4.0, 5.0]);
    }
}
