// DataFrame実装モジュール
pub mod transform;

pub use transform::MeltOptions;

use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::index::RangeIndex;
use crate::series::Series;

/// 欠損値を表す文字列
const NA_VALUE: &str = "NA";

/// データフレーム構造体: 名前付き列の集合
///
/// 行は観測値、列は名前付きフィールドを表す。評定テーブルとしては
/// ワイド形式（対象ごとに1行、評価者ごとに1列）と長形式
/// （対象×評価者×評定ごとに1行）の両方を保持できる。
/// セルは文字列として保持され、`"NA"` または空文字列は欠損値を表す。
///
/// # 例
/// ```rust
/// use ratrs::{DataFrame, Series};
///
/// let mut df = DataFrame::new();
/// df.add_column(
///     "Rater1".to_string(),
///     Series::from_strings(&["1", "2", "3"], Some("Rater1".to_string())).unwrap(),
/// )
/// .unwrap();
/// assert_eq!(df.row_count(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct DataFrame {
    /// 列名から列データへのマッピング
    columns: HashMap<String, Series<String>>,

    /// 列の挿入順序
    column_order: Vec<String>,

    /// 行インデックス
    index: RangeIndex,
}

impl Default for DataFrame {
    fn default() -> Self {
        Self::new()
    }
}

impl DataFrame {
    /// 空のデータフレームを作成
    pub fn new() -> Self {
        DataFrame {
            columns: HashMap::new(),
            column_order: Vec::new(),
            index: RangeIndex::empty(),
        }
    }

    /// 列を追加
    ///
    /// 既存の列と行数が一致しない場合はエラーを返す。
    pub fn add_column(&mut self, name: String, series: Series<String>) -> Result<()> {
        if self.columns.contains_key(&name) {
            return Err(Error::DuplicateColumnName(name));
        }

        if !self.column_order.is_empty() && series.len() != self.row_count() {
            return Err(Error::InconsistentRowCount {
                expected: self.row_count(),
                found: series.len(),
            });
        }

        // 最初の列で行インデックスを確定する
        if self.column_order.is_empty() {
            self.index = RangeIndex::from_range(0..series.len())?;
        }

        self.column_order.push(name.clone());
        self.columns.insert(name, series);
        Ok(())
    }

    /// 行数を取得
    pub fn row_count(&self) -> usize {
        self.column_order
            .first()
            .and_then(|name| self.columns.get(name))
            .map(|series| series.len())
            .unwrap_or(0)
    }

    /// 列数を取得
    pub fn column_count(&self) -> usize {
        self.column_order.len()
    }

    /// データフレームが空かどうか
    pub fn is_empty(&self) -> bool {
        self.column_order.is_empty() || self.row_count() == 0
    }

    /// 列名の一覧を挿入順で取得
    pub fn column_names(&self) -> Vec<String> {
        self.column_order.clone()
    }

    /// 列が存在するかどうか
    pub fn contains_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    /// 列を取得
    pub fn get_column(&self, name: &str) -> Option<&Series<String>> {
        self.columns.get(name)
    }

    /// 行インデックスを取得
    pub fn index(&self) -> &RangeIndex {
        &self.index
    }

    /// 列の値を文字列スライスとして取得
    ///
    /// 列が存在しない場合は `ColumnNotFound` エラーを返す。
    pub fn column_values(&self, name: &str) -> Result<&[String]> {
        self.columns
            .get(name)
            .map(|series| series.values())
            .ok_or_else(|| Error::ColumnNotFound(name.to_string()))
    }

    /// 列の値を数値として取得
    ///
    /// 欠損値（`"NA"` または空文字列）は `None` になる。
    /// 数値として解釈できないセルは `Cast` エラーを返す。
    pub fn numeric_values(&self, name: &str) -> Result<Vec<Option<f64>>> {
        let values = self.column_values(name)?;
        values
            .iter()
            .map(|value| parse_numeric_cell(name, value))
            .collect()
    }
}

/// セルが欠損値かどうか
pub(crate) fn is_missing(value: &str) -> bool {
    value.is_empty() || value == NA_VALUE
}

/// セルを数値として解釈する
pub(crate) fn parse_numeric_cell(column: &str, value: &str) -> Result<Option<f64>> {
    if is_missing(value) {
        return Ok(None);
    }

    value.trim().parse::<f64>().map(Some).map_err(|_| {
        Error::Cast(format!(
            "列 '{}' の値 '{}' を数値に変換できません",
            column, value
        ))
    })
}
