// 評価者間・評価者内信頼性統計モジュール
//
// このモジュールは、評定テーブルから信頼性統計量を直接計算するための
// 便利関数を提供します。級内相関係数（ICC）、Cohenのカッパ係数、
// Fleissのカッパ係数のほか、Scottのπ、Krippendorffのα、
// Spearman順位相関、Cronbachのαが実装されています。

pub mod agreement;
pub mod reliability;

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::dataframe::DataFrame;
use crate::error::{Error, Result};

/// ICCのモデル種別
///
/// Shrout & Fleissの6つのモデルに対応する。単一測定（ICC1〜ICC3）と
/// 平均測定（ICC1k〜ICC3k）の2系列がある。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum IccModel {
    /// 1元配置変量モデル・単一測定
    Icc1,
    /// 2元配置変量モデル・単一測定
    Icc2,
    /// 2元配置混合モデル・単一測定
    Icc3,
    /// 1元配置変量モデル・平均測定
    Icc1k,
    /// 2元配置変量モデル・平均測定
    Icc2k,
    /// 2元配置混合モデル・平均測定
    Icc3k,
}

impl IccModel {
    /// 慣用的なモデル名
    pub fn label(&self) -> &'static str {
        match self {
            IccModel::Icc1 => "ICC1",
            IccModel::Icc2 => "ICC2",
            IccModel::Icc3 => "ICC3",
            IccModel::Icc1k => "ICC1k",
            IccModel::Icc2k => "ICC2k",
            IccModel::Icc3k => "ICC3k",
        }
    }

    /// モデルの説明
    pub fn description(&self) -> &'static str {
        match self {
            IccModel::Icc1 => "Single raters absolute",
            IccModel::Icc2 => "Single random raters",
            IccModel::Icc3 => "Single fixed raters",
            IccModel::Icc1k => "Average raters absolute",
            IccModel::Icc2k => "Average random raters",
            IccModel::Icc3k => "Average fixed raters",
        }
    }

    /// 全モデルを定義順で返す
    pub fn all() -> [IccModel; 6] {
        [
            IccModel::Icc1,
            IccModel::Icc2,
            IccModel::Icc3,
            IccModel::Icc1k,
            IccModel::Icc2k,
            IccModel::Icc3k,
        ]
    }
}

impl fmt::Display for IccModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for IccModel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "ICC1" => Ok(IccModel::Icc1),
            "ICC2" => Ok(IccModel::Icc2),
            "ICC3" => Ok(IccModel::Icc3),
            "ICC1k" => Ok(IccModel::Icc1k),
            "ICC2k" => Ok(IccModel::Icc2k),
            "ICC3k" => Ok(IccModel::Icc3k),
            _ => Err(Error::KeyNotFound(format!("未知のICCモデル: {}", s))),
        }
    }
}

/// ICC結果テーブルの1行
#[derive(Debug, Clone, Serialize)]
pub struct IccEntry {
    /// モデル種別
    pub model: IccModel,
    /// モデルの説明
    pub description: &'static str,
    /// ICC点推定値
    pub icc: f64,
    /// F統計量
    pub f_value: f64,
    /// 分子の自由度
    pub df1: usize,
    /// 分母の自由度
    pub df2: usize,
    /// p値
    pub p_value: f64,
    /// 95%信頼区間（下限, 上限）
    pub ci95: (f64, f64),
}

/// ICC全モデルの結果テーブル
#[derive(Debug, Clone, Serialize)]
pub struct IccResults {
    entries: Vec<IccEntry>,
}

impl IccResults {
    pub(crate) fn new(entries: Vec<IccEntry>) -> Self {
        IccResults { entries }
    }

    /// 全エントリを定義順で取得
    pub fn entries(&self) -> &[IccEntry] {
        &self.entries
    }

    /// 指定モデルの行を取得
    pub fn get(&self, model: IccModel) -> Option<&IccEntry> {
        self.entries.iter().find(|entry| entry.model == model)
    }

    /// 指定モデルのICC点推定値を取得
    ///
    /// 行が存在しない場合は `KeyNotFound` エラーを返す。
    pub fn value(&self, model: IccModel) -> Result<f64> {
        self.get(model)
            .map(|entry| entry.icc)
            .ok_or_else(|| Error::KeyNotFound(format!("ICCモデル {} の結果がありません", model)))
    }
}

/// Cohenのカッパ係数の結果
#[derive(Debug, Clone, Serialize)]
pub struct CohenKappaResult {
    /// カッパ点推定値
    pub kappa: f64,
    /// 漸近標準誤差
    pub std_err: f64,
    /// 帰無仮説（カッパ=0）のもとでのz統計量
    pub z_value: f64,
    /// 両側p値
    pub p_value: f64,
    /// 観測一致率
    pub observed_agreement: f64,
    /// 偶然一致率
    pub expected_agreement: f64,
}

/// 分割表: カテゴリ集合に沿った正方行列の度数表
///
/// 行は一方の評価者、列はもう一方の評価者のカテゴリに対応し、
/// 出現しなかった組み合わせは0で埋められる。
#[derive(Debug, Clone, Serialize)]
pub struct ContingencyTable {
    categories: Vec<String>,
    counts: Vec<Vec<usize>>,
}

impl ContingencyTable {
    pub(crate) fn new(categories: Vec<String>, counts: Vec<Vec<usize>>) -> Self {
        ContingencyTable { categories, counts }
    }

    /// カテゴリ集合を取得
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// 度数行列を取得
    pub fn counts(&self) -> &[Vec<usize>] {
        &self.counts
    }

    /// 表に含まれる観測数
    pub fn n_observations(&self) -> usize {
        self.counts.iter().map(|row| row.iter().sum::<usize>()).sum()
    }

    /// 行ごとの度数合計
    pub fn row_sums(&self) -> Vec<usize> {
        self.counts
            .iter()
            .map(|row| row.iter().sum::<usize>())
            .collect()
    }

    /// 列ごとの度数合計
    pub fn col_sums(&self) -> Vec<usize> {
        let n = self.categories.len();
        let mut sums = vec![0; n];
        for row in &self.counts {
            for (j, count) in row.iter().enumerate() {
                sums[j] += count;
            }
        }
        sums
    }
}

/// 対象×カテゴリの集計行列（Fleissのカッパ係数の入力）
///
/// 各行は1つの対象に対して、各カテゴリを割り当てた評価者の人数を持つ。
#[derive(Debug, Clone, Serialize)]
pub struct RatingCounts {
    categories: Vec<String>,
    counts: Vec<Vec<usize>>,
}

impl RatingCounts {
    pub(crate) fn new(categories: Vec<String>, counts: Vec<Vec<usize>>) -> Self {
        RatingCounts { categories, counts }
    }

    /// カテゴリ集合を取得
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// 度数行列を取得
    pub fn counts(&self) -> &[Vec<usize>] {
        &self.counts
    }

    /// 対象ごとの度数合計（完全なテーブルでは評価者数に一致する）
    pub fn row_sums(&self) -> Vec<usize> {
        self.counts
            .iter()
            .map(|row| row.iter().sum::<usize>())
            .collect()
    }
}

/// ICC計算における評価者列の指定
///
/// ワイド形式では評価者ごとの列のリストを、長形式では評価者ラベルを
/// 持つ単一の列名を指定する。
#[derive(Debug, Clone, Copy)]
pub enum RaterColumns<'a> {
    /// ワイド形式: 評価者ごとの列のリスト
    Wide(&'a [&'a str]),
    /// 長形式: 評価者ラベルを持つ列
    Long(&'a str),
}

/// Krippendorffのαの距離メトリック
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AlphaMetric {
    /// 名義尺度（不一致は全て等距離）
    Nominal,
    /// 間隔尺度（差の2乗）
    Interval,
    /// 比率尺度（相対差の2乗）
    Ratio,
}

/// 級内相関係数（ICC）を計算し、指定モデルの点推定値を返す
///
/// # 説明
/// ワイド形式（対象ごとに1行、評価者ごとに1列）と長形式
/// （対象×評価者ごとに1行）の両方の評定テーブルを受け付けます。
/// ワイド形式は内部で長形式に変換されます。長形式では、`score` という
/// 名前の列があればそれを評定値として使い、なければ3番目の列を推定します。
///
/// # 引数
/// * `df` - 評定テーブル
/// * `targets` - 対象（被験者）ラベルを持つ列名
/// * `raters` - 評価者列の指定（ワイド形式は列リスト、長形式は列名）
/// * `model` - 返すICCモデル
///
/// # 例
/// ```rust
/// use ratrs::stats::{self, IccModel, RaterColumns};
/// use ratrs::{DataFrame, Series};
///
/// let mut df = DataFrame::new();
/// df.add_column(
///     "Subject".to_string(),
///     Series::from_strings(&["1", "2", "3", "4"], Some("Subject".to_string())).unwrap(),
/// )
/// .unwrap();
/// df.add_column(
///     "Rater1".to_string(),
///     Series::from_strings(&["3.4", "5.1", "2.8", "6.2"], Some("Rater1".to_string())).unwrap(),
/// )
/// .unwrap();
/// df.add_column(
///     "Rater2".to_string(),
///     Series::from_strings(&["3.6", "5.3", "2.9", "6.0"], Some("Rater2".to_string())).unwrap(),
/// )
/// .unwrap();
/// df.add_column(
///     "Rater3".to_string(),
///     Series::from_strings(&["3.5", "5.0", "3.1", "6.1"], Some("Rater3".to_string())).unwrap(),
/// )
/// .unwrap();
///
/// let raters = ["Rater1", "Rater2", "Rater3"];
/// let value = stats::icc(&df, "Subject", RaterColumns::Wide(&raters), IccModel::Icc3k).unwrap();
/// assert!(value > 0.99);
/// ```
pub fn icc(
    df: &DataFrame,
    targets: &str,
    raters: RaterColumns<'_>,
    model: IccModel,
) -> Result<f64> {
    reliability::icc_impl(df, targets, raters)?.value(model)
}

/// 級内相関係数（ICC）を計算し、全6モデルの結果テーブルを返す
///
/// # 説明
/// 各行はICC点推定値、F統計量、自由度、p値、95%信頼区間を持ちます。
/// 入力形式の扱いは [`icc`] と同じです。
pub fn icc_results(
    df: &DataFrame,
    targets: &str,
    raters: RaterColumns<'_>,
) -> Result<IccResults> {
    reliability::icc_impl(df, targets, raters)
}

/// Cohenのカッパ係数の点推定値を計算
///
/// # 説明
/// 2人の評価者によるカテゴリ評定の一致度を、偶然の一致を補正して
/// 測定します。カテゴリ集合を指定しない場合は、両列の観測値の和集合を
/// ソートして使用します。
///
/// # 例
/// ```rust
/// use ratrs::stats;
/// use ratrs::{DataFrame, Series};
///
/// let mut df = DataFrame::new();
/// df.add_column(
///     "Rater1".to_string(),
///     Series::from_strings(&["1", "2", "3", "4", "5"], Some("Rater1".to_string())).unwrap(),
/// )
/// .unwrap();
/// df.add_column(
///     "Rater2".to_string(),
///     Series::from_strings(&["2", "3", "3", "4", "5"], Some("Rater2".to_string())).unwrap(),
/// )
/// .unwrap();
///
/// let kappa = stats::cohens_kappa(&df, "Rater1", "Rater2", None).unwrap();
/// assert!((kappa - 0.5).abs() < 1e-10);
/// ```
pub fn cohens_kappa(
    df: &DataFrame,
    rater_a: &str,
    rater_b: &str,
    categories: Option<&[&str]>,
) -> Result<f64> {
    agreement::cohens_kappa_impl(df, rater_a, rater_b, categories).map(|result| result.kappa)
}

/// Cohenのカッパ係数を計算し、標準誤差を含む完全な結果を返す
///
/// # 説明
/// 点推定値に加えて、Fleiss-Cohen-Everittの漸近標準誤差、
/// 帰無仮説のもとでのz統計量と両側p値、観測一致率、偶然一致率を返します。
pub fn cohens_kappa_results(
    df: &DataFrame,
    rater_a: &str,
    rater_b: &str,
    categories: Option<&[&str]>,
) -> Result<CohenKappaResult> {
    agreement::cohens_kappa_impl(df, rater_a, rater_b, categories)
}

/// Fleissのカッパ係数を計算
///
/// # 説明
/// 行が対象、列が評価者のテーブルから、3人以上の評価者に一般化された
/// カッパ係数を計算します。カテゴリ集合を指定しない場合は、テーブル内の
/// 全ての distinct な値を使用します。
///
/// # 例
/// ```rust
/// use ratrs::stats;
/// use ratrs::{DataFrame, Series};
///
/// let mut df = DataFrame::new();
/// df.add_column(
///     "Rater1".to_string(),
///     Series::from_strings(&["1", "2", "3", "1", "2"], Some("Rater1".to_string())).unwrap(),
/// )
/// .unwrap();
/// df.add_column(
///     "Rater2".to_string(),
///     Series::from_strings(&["1", "2", "3", "1", "3"], Some("Rater2".to_string())).unwrap(),
/// )
/// .unwrap();
/// df.add_column(
///     "Rater3".to_string(),
///     Series::from_strings(&["1", "2", "3", "1", "2"], Some("Rater3".to_string())).unwrap(),
/// )
/// .unwrap();
///
/// let kappa = stats::fleiss_kappa(&df, None).unwrap();
/// assert!((kappa - 0.7972972972972973).abs() < 1e-10);
/// ```
pub fn fleiss_kappa(df: &DataFrame, categories: Option<&[&str]>) -> Result<f64> {
    agreement::fleiss_kappa_impl(df, categories)
}

/// 2つの評定列から分割表を構築
///
/// # 説明
/// カテゴリ集合に沿った正方行列を返します。出現しなかったカテゴリの
/// 組み合わせは省略されず、0として含まれます。明示的なカテゴリ集合を
/// 指定した場合、集合に含まれない観測値は表から除外されます。
pub fn crosstab(
    df: &DataFrame,
    rater_a: &str,
    rater_b: &str,
    categories: Option<&[&str]>,
) -> Result<ContingencyTable> {
    agreement::crosstab_impl(df, rater_a, rater_b, categories)
}

/// 対象×評価者のテーブルを対象×カテゴリの集計行列に変換
///
/// # 説明
/// 各対象について、各カテゴリを割り当てた評価者の人数を数えます。
/// 完全なテーブルでは全ての行の合計が評価者数に一致します。
pub fn aggregate_raters(df: &DataFrame, categories: Option<&[&str]>) -> Result<RatingCounts> {
    agreement::aggregate_raters_impl(df, categories)
}

/// Scottのπを計算
///
/// # 説明
/// 2人の評価者の一致度を、両者の周辺分布をプールした偶然一致率で
/// 補正して測定します。
pub fn scotts_pi(df: &DataFrame, rater_a: &str, rater_b: &str) -> Result<f64> {
    agreement::scotts_pi_impl(df, rater_a, rater_b)
}

/// Krippendorffのαを計算
///
/// # 説明
/// 行が対象、列が評価者のテーブルから信頼性係数αを計算します。
/// 欠損値（`"NA"` または空文字列）を許容し、評定が2つ未満の対象は
/// 計算から除外されます。間隔尺度・比率尺度のメトリックでは、
/// カテゴリラベルが数値として解釈できる必要があります。
pub fn krippendorff_alpha(df: &DataFrame, metric: AlphaMetric) -> Result<f64> {
    agreement::krippendorff_alpha_impl(df, metric)
}

/// Spearman順位相関係数を計算
///
/// # 説明
/// 2人の評価者の評定値を平均順位に変換し、順位間のPearson相関係数を
/// 返します。同順位には平均順位を割り当てます。
pub fn spearman_corr(df: &DataFrame, rater_a: &str, rater_b: &str) -> Result<f64> {
    agreement::spearman_corr_impl(df, rater_a, rater_b)
}

/// Cronbachのαを計算
///
/// # 説明
/// ワイド形式のテーブルから内的整合性信頼性を計算します。
/// 同じテーブルに対するICC3kと代数的に一致します。
pub fn cronbach_alpha(df: &DataFrame, raters: &[&str]) -> Result<f64> {
    reliability::cronbach_alpha_impl(df, raters)
}
