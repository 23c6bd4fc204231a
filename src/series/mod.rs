use std::fmt::Debug;

use crate::error::Result;
use crate::index::RangeIndex;

/// Series構造体: 一次元の値の配列
#[derive(Debug, Clone)]
pub struct Series<T>
where
    T: Debug + Clone,
{
    /// Seriesのデータ値
    values: Vec<T>,

    /// インデックスラベル
    index: RangeIndex,

    /// 名前（オプション）
    name: Option<String>,
}

impl<T> Series<T>
where
    T: Debug + Clone,
{
    /// 新しいSeriesをベクトルから作成
    pub fn new(values: Vec<T>, name: Option<String>) -> Result<Self> {
        let len = values.len();
        let index = RangeIndex::from_range(0..len)?;

        Ok(Series {
            values,
            index,
            name,
        })
    }

    /// Seriesの長さを取得
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Seriesが空かどうか
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// 位置から値を取得
    pub fn get(&self, pos: usize) -> Option<&T> {
        self.values.get(pos)
    }

    /// 値の配列を取得
    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// 名前を取得
    pub fn name(&self) -> Option<&String> {
        self.name.as_ref()
    }

    /// インデックスを取得
    pub fn index(&self) -> &RangeIndex {
        &self.index
    }

    /// 名前を設定
    pub fn with_name(mut self, name: String) -> Self {
        self.name = Some(name);
        self
    }
}

impl Series<String> {
    /// 文字列スライスからSeriesを作成
    ///
    /// 評定テーブルの構築を簡略化するためのヘルパー。
    pub fn from_strings(values: &[&str], name: Option<String>) -> Result<Self> {
        Series::new(values.iter().map(|s| s.to_string()).collect(), name)
    }
}
