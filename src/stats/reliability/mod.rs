// 連続値評定の信頼性係数モジュール
//
// 級内相関係数（ICC）とCronbachのαの内部実装。ICCは2元配置の
// 分散分析による平方和分解から6つのモデルを一括で計算する。

use std::collections::HashMap;

use statrs::distribution::{ContinuousCDF, FisherSnedecor};

use crate::dataframe::{is_missing, DataFrame, MeltOptions};
use crate::error::{Error, Result};
use crate::stats::{IccEntry, IccModel, IccResults, RaterColumns};

/// 級内相関係数の内部実装
pub(crate) fn icc_impl(
    df: &DataFrame,
    targets: &str,
    raters: RaterColumns<'_>,
) -> Result<IccResults> {
    // 長形式への正規化
    let melted;
    let (frame, targets_col, raters_col, ratings_col): (&DataFrame, String, String, String) =
        match raters {
            RaterColumns::Wide(columns) if columns.len() > 1 => {
                let options = MeltOptions {
                    id_vars: Some(vec![targets.to_string()]),
                    value_vars: Some(columns.iter().map(|c| c.to_string()).collect()),
                    var_name: Some("rater".to_string()),
                    value_name: Some("score".to_string()),
                };
                melted = df.melt(&options)?;
                (
                    &melted,
                    targets.to_string(),
                    "rater".to_string(),
                    "score".to_string(),
                )
            }
            RaterColumns::Wide(columns) => {
                // 列が1つだけの場合は、その列を評価者ラベルと見なして
                // 長形式として扱う
                let column = columns.first().ok_or_else(|| {
                    Error::InvalidInput("評価者列が指定されていません".to_string())
                })?;
                let ratings = guess_ratings_column(df)?;
                (df, targets.to_string(), column.to_string(), ratings)
            }
            RaterColumns::Long(column) => {
                let ratings = guess_ratings_column(df)?;
                (df, targets.to_string(), column.to_string(), ratings)
            }
        };

    let target_values = frame.column_values(&targets_col)?;
    let rater_values = frame.column_values(&raters_col)?;
    let score_values = frame.numeric_values(&ratings_col)?;

    // 欠損値を含む行を除外して (対象, 評価者, 評定) の組を集める
    let mut observations = Vec::with_capacity(frame.row_count());
    let mut dropped = 0usize;
    for row in 0..frame.row_count() {
        if is_missing(&target_values[row]) || is_missing(&rater_values[row]) {
            dropped += 1;
            continue;
        }
        match score_values[row] {
            Some(score) => observations.push((
                target_values[row].as_str(),
                rater_values[row].as_str(),
                score,
            )),
            None => dropped += 1,
        }
    }
    if dropped > 0 {
        log::debug!("欠損値を含む {} 行を除外しました", dropped);
    }

    // 出現順で一意な対象と評価者を集める
    let mut target_labels: Vec<&str> = Vec::new();
    let mut target_index: HashMap<&str, usize> = HashMap::new();
    let mut rater_labels: Vec<&str> = Vec::new();
    let mut rater_index: HashMap<&str, usize> = HashMap::new();
    for &(target, rater, _) in &observations {
        if !target_index.contains_key(target) {
            target_index.insert(target, target_labels.len());
            target_labels.push(target);
        }
        if !rater_index.contains_key(rater) {
            rater_index.insert(rater, rater_labels.len());
            rater_labels.push(rater);
        }
    }

    let n = target_labels.len();
    let k = rater_labels.len();
    if n < 2 {
        return Err(Error::InsufficientData(
            "ICCの計算には少なくとも2つの対象が必要です".to_string(),
        ));
    }
    if k < 2 {
        return Err(Error::InsufficientData(
            "ICCの計算には少なくとも2人の評価者が必要です".to_string(),
        ));
    }

    // 完全なクロスデザイン（全ての対象×評価者の組に評定が1つ）を検証する
    let mut grid = vec![vec![None; k]; n];
    for (target, rater, score) in &observations {
        let i = target_index[target];
        let j = rater_index[rater];
        if grid[i][j].is_some() {
            return Err(Error::InvalidInput(format!(
                "対象 '{}' と評価者 '{}' の組に複数の評定があります",
                target, rater
            )));
        }
        grid[i][j] = Some(*score);
    }
    for (i, row) in grid.iter().enumerate() {
        for (j, cell) in row.iter().enumerate() {
            if cell.is_none() {
                return Err(Error::InvalidInput(format!(
                    "対象 '{}' が評価者 '{}' に評定されていません: ICCには完全なクロスデザインが必要です",
                    target_labels[i], rater_labels[j]
                )));
            }
        }
    }

    let n_f = n as f64;
    let k_f = k as f64;
    let total = n_f * k_f;

    // 平方和分解
    let grand_mean = grid
        .iter()
        .flat_map(|row| row.iter())
        .map(|cell| cell.unwrap_or(0.0))
        .sum::<f64>()
        / total;

    let target_means: Vec<f64> = grid
        .iter()
        .map(|row| row.iter().map(|cell| cell.unwrap_or(0.0)).sum::<f64>() / k_f)
        .collect();
    let rater_means: Vec<f64> = (0..k)
        .map(|j| grid.iter().map(|row| row[j].unwrap_or(0.0)).sum::<f64>() / n_f)
        .collect();

    let ss_total = grid
        .iter()
        .flat_map(|row| row.iter())
        .map(|cell| (cell.unwrap_or(0.0) - grand_mean).powi(2))
        .sum::<f64>();
    let ss_targets = k_f
        * target_means
            .iter()
            .map(|mean| (mean - grand_mean).powi(2))
            .sum::<f64>();
    let ss_raters = n_f
        * rater_means
            .iter()
            .map(|mean| (mean - grand_mean).powi(2))
            .sum::<f64>();
    let ss_error = ss_total - ss_targets - ss_raters;

    let msb = ss_targets / (n_f - 1.0);
    let msj = ss_raters / (k_f - 1.0);
    let mse = ss_error / ((n_f - 1.0) * (k_f - 1.0));
    let msw = (ss_total - ss_targets) / (n_f * (k_f - 1.0));

    // Shrout & Fleissの6つのモデル
    let icc1 = (msb - msw) / (msb + (k_f - 1.0) * msw);
    let icc2 = (msb - mse) / (msb + (k_f - 1.0) * mse + k_f * (msj - mse) / n_f);
    let icc3 = (msb - mse) / (msb + (k_f - 1.0) * mse);
    let icc1k = (msb - msw) / msb;
    let icc2k = (msb - mse) / (msb + (msj - mse) / n_f);
    let icc3k = (msb - mse) / msb;

    // F統計量とp値
    let df1 = n - 1;
    let df2_within = n * (k - 1);
    let df2_error = (n - 1) * (k - 1);
    let f_within = msb / msw;
    let f_error = msb / mse;
    let p_within = f_survival(f_within, df1 as f64, df2_within as f64)?;
    let p_error = f_survival(f_error, df1 as f64, df2_error as f64)?;

    // 95%信頼区間
    let f1_lower = f_within / f_quantile(0.975, df1 as f64, df2_within as f64)?;
    let f1_upper = f_within * f_quantile(0.975, df2_within as f64, df1 as f64)?;
    let l1 = (f1_lower - 1.0) / (f1_lower + (k_f - 1.0));
    let u1 = (f1_upper - 1.0) / (f1_upper + (k_f - 1.0));

    let f3_lower = f_error / f_quantile(0.975, df1 as f64, df2_error as f64)?;
    let f3_upper = f_error * f_quantile(0.975, df2_error as f64, df1 as f64)?;
    let l3 = (f3_lower - 1.0) / (f3_lower + (k_f - 1.0));
    let u3 = (f3_upper - 1.0) / (f3_upper + (k_f - 1.0));

    // ICC2系列はSatterthwaite近似による自由度を使う
    let f_raters = msj / mse;
    let v_num = (df2_error as f64)
        * (k_f * icc2 * f_raters + n_f * (1.0 + (k_f - 1.0) * icc2) - k_f * icc2).powi(2);
    let v_den = (df1 as f64) * k_f.powi(2) * icc2.powi(2) * f_raters.powi(2)
        + (n_f * (1.0 + (k_f - 1.0) * icc2) - k_f * icc2).powi(2);
    let v = v_num / v_den;
    let f2_upper = f_quantile(0.975, n_f - 1.0, v)?;
    let f2_lower = f_quantile(0.975, v, n_f - 1.0)?;
    let l2 = n_f * (msb - f2_upper * mse)
        / (f2_upper * (k_f * msj + (k_f * n_f - k_f - n_f) * mse) + n_f * msb);
    let u2 = n_f * (f2_lower * msb - mse)
        / (k_f * msj + (k_f * n_f - k_f - n_f) * mse + n_f * f2_lower * msb);

    let l1k = 1.0 - 1.0 / f1_lower;
    let u1k = 1.0 - 1.0 / f1_upper;
    let l2k = l2 * k_f / (1.0 + l2 * (k_f - 1.0));
    let u2k = u2 * k_f / (1.0 + u2 * (k_f - 1.0));
    let l3k = 1.0 - 1.0 / f3_lower;
    let u3k = 1.0 - 1.0 / f3_upper;

    let rows = [
        (IccModel::Icc1, icc1, f_within, df2_within, p_within, (l1, u1)),
        (IccModel::Icc2, icc2, f_error, df2_error, p_error, (l2, u2)),
        (IccModel::Icc3, icc3, f_error, df2_error, p_error, (l3, u3)),
        (
            IccModel::Icc1k,
            icc1k,
            f_within,
            df2_within,
            p_within,
            (l1k, u1k),
        ),
        (
            IccModel::Icc2k,
            icc2k,
            f_error,
            df2_error,
            p_error,
            (l2k, u2k),
        ),
        (
            IccModel::Icc3k,
            icc3k,
            f_error,
            df2_error,
            p_error,
            (l3k, u3k),
        ),
    ];

    let entries = rows
        .into_iter()
        .map(|(model, icc, f_value, df2, p_value, ci95)| IccEntry {
            model,
            description: model.description(),
            icc,
            f_value,
            df1,
            df2,
            p_value,
            ci95,
        })
        .collect();

    Ok(IccResults::new(entries))
}

/// 長形式のテーブルから評定値の列を決定する
///
/// `score` という名前の列があればそれを使い、なければ3番目の列を推定する。
fn guess_ratings_column(df: &DataFrame) -> Result<String> {
    if df.contains_column("score") {
        return Ok("score".to_string());
    }

    let columns = df.column_names();
    if columns.len() < 3 {
        return Err(Error::InvalidInput(
            "長形式のテーブルから評定値の列を推定できません: 'score' 列がなく、列数が3未満です"
                .to_string(),
        ));
    }

    log::warn!("評定値の列として3番目の列 '{}' を使用します", columns[2]);
    Ok(columns[2].clone())
}

/// Cronbachのαの内部実装
pub(crate) fn cronbach_alpha_impl(df: &DataFrame, raters: &[&str]) -> Result<f64> {
    if raters.len() < 2 {
        return Err(Error::InsufficientData(
            "Cronbachのαには少なくとも2つの評価者列が必要です".to_string(),
        ));
    }

    let columns: Vec<Vec<Option<f64>>> = raters
        .iter()
        .map(|name| df.numeric_values(name))
        .collect::<Result<Vec<_>>>()?;

    // 全ての評定が揃っている対象だけを使う
    let mut items: Vec<Vec<f64>> = vec![Vec::new(); raters.len()];
    let mut totals: Vec<f64> = Vec::new();
    let mut dropped = 0usize;
    for row in 0..df.row_count() {
        let cells: Option<Vec<f64>> = columns.iter().map(|column| column[row]).collect();
        match cells {
            Some(cells) => {
                for (item, value) in items.iter_mut().zip(cells.iter()) {
                    item.push(*value);
                }
                totals.push(cells.iter().sum());
            }
            None => dropped += 1,
        }
    }
    if dropped > 0 {
        log::debug!("欠損値を含む {} 行を除外しました", dropped);
    }

    if totals.len() < 2 {
        return Err(Error::InsufficientData(
            "Cronbachのαの計算には少なくとも2つの対象が必要です".to_string(),
        ));
    }

    let item_variance_sum: f64 = items.iter().map(|values| variance(values)).sum();
    let total_variance = variance(&totals);
    if total_variance == 0.0 {
        return Err(Error::InvalidInput(
            "合計得点の分散が0のため、Cronbachのαが定義できません".to_string(),
        ));
    }

    let k = raters.len() as f64;
    Ok(k / (k - 1.0) * (1.0 - item_variance_sum / total_variance))
}

/// 不偏分散
fn variance(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    values.iter().map(|value| (value - mean).powi(2)).sum::<f64>() / (n - 1.0)
}

/// F分布の上側確率
fn f_survival(f_value: f64, df1: f64, df2: f64) -> Result<f64> {
    if !f_value.is_finite() {
        return Ok(0.0);
    }
    if f_value <= 0.0 {
        return Ok(1.0);
    }
    let dist = f_distribution(df1, df2)?;
    Ok(1.0 - dist.cdf(f_value))
}

/// F分布の分位点
fn f_quantile(p: f64, df1: f64, df2: f64) -> Result<f64> {
    let dist = f_distribution(df1, df2)?;
    Ok(dist.inverse_cdf(p))
}

fn f_distribution(df1: f64, df2: f64) -> Result<FisherSnedecor> {
    FisherSnedecor::new(df1, df2)
        .map_err(|e| Error::OperationFailed(format!("F分布の構築に失敗しました: {}", e)))
}
