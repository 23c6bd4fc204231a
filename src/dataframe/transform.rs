use super::DataFrame;
use crate::error::{Error, Result};
use crate::series::Series;

/// データフレームの形状変換オプション - melt操作
#[derive(Debug, Clone)]
pub struct MeltOptions {
    /// 固定する列の名前（識別列）
    pub id_vars: Option<Vec<String>>,
    /// 可変列の名前（値列）
    pub value_vars: Option<Vec<String>>,
    /// 変数名の列名
    pub var_name: Option<String>,
    /// 値の列名
    pub value_name: Option<String>,
}

impl Default for MeltOptions {
    fn default() -> Self {
        Self {
            id_vars: None,
            value_vars: None,
            var_name: Some("variable".to_string()),
            value_name: Some("value".to_string()),
        }
    }
}

impl DataFrame {
    /// データフレームを長形式に変換（ワイド形式から長形式へ）
    ///
    /// Pythonのpandas DataFrame.meltに相当します。
    /// 各行について値列を順に展開するため、出力は行メジャー順になり、
    /// 元の (識別値, 変数名, 値) の組は全て正確に1回ずつ現れます。
    ///
    /// # 引数
    /// * `options` - melt操作のオプション
    ///
    /// # 戻り値
    /// 長形式に変換されたデータフレーム
    ///
    /// # 例
    /// ```rust
    /// use ratrs::{DataFrame, MeltOptions, Series};
    ///
    /// let mut df = DataFrame::new();
    /// df.add_column(
    ///     "Subject".to_string(),
    ///     Series::from_strings(&["1", "2"], Some("Subject".to_string())).unwrap(),
    /// )
    /// .unwrap();
    /// df.add_column(
    ///     "Rater1".to_string(),
    ///     Series::from_strings(&["3.4", "5.1"], Some("Rater1".to_string())).unwrap(),
    /// )
    /// .unwrap();
    /// df.add_column(
    ///     "Rater2".to_string(),
    ///     Series::from_strings(&["3.6", "5.3"], Some("Rater2".to_string())).unwrap(),
    /// )
    /// .unwrap();
    ///
    /// let options = MeltOptions {
    ///     id_vars: Some(vec!["Subject".to_string()]),
    ///     value_vars: Some(vec!["Rater1".to_string(), "Rater2".to_string()]),
    ///     var_name: Some("rater".to_string()),
    ///     value_name: Some("score".to_string()),
    /// };
    ///
    /// let melted = df.melt(&options).unwrap();
    /// assert_eq!(melted.row_count(), 4); // 2行 x 2列
    /// assert_eq!(melted.column_names(), vec!["Subject", "rater", "score"]);
    /// ```
    pub fn melt(&self, options: &MeltOptions) -> Result<DataFrame> {
        // 列名のチェック
        let all_columns = self.column_names();
        let id_vars = if let Some(ref id_vars) = options.id_vars {
            for col in id_vars {
                if !all_columns.contains(col) {
                    return Err(Error::ColumnNotFound(col.clone()));
                }
            }
            id_vars.clone()
        } else {
            Vec::new()
        };

        // 値列の決定
        let value_vars = if let Some(ref value_vars) = options.value_vars {
            for col in value_vars {
                if !all_columns.contains(col) {
                    return Err(Error::ColumnNotFound(col.clone()));
                }
            }
            value_vars.clone()
        } else {
            // id_varsに含まれていない全ての列
            all_columns
                .iter()
                .filter(|col| !id_vars.contains(col))
                .cloned()
                .collect()
        };

        if value_vars.is_empty() {
            return Err(Error::EmptyData(
                "melt対象の値列がありません".to_string(),
            ));
        }

        // 変数名と値の列名
        let var_name = options
            .var_name
            .clone()
            .unwrap_or_else(|| "variable".to_string());
        let value_name = options
            .value_name
            .clone()
            .unwrap_or_else(|| "value".to_string());

        let n_rows = self.row_count();
        let total_rows = n_rows * value_vars.len();

        let mut id_columns: Vec<Vec<String>> =
            vec![Vec::with_capacity(total_rows); id_vars.len()];
        let mut var_values = Vec::with_capacity(total_rows);
        let mut value_values = Vec::with_capacity(total_rows);

        // 行メジャー順で展開する
        for row in 0..n_rows {
            for var in &value_vars {
                for (slot, id_var) in id_columns.iter_mut().zip(id_vars.iter()) {
                    let values = self.column_values(id_var)?;
                    slot.push(values[row].clone());
                }

                var_values.push(var.clone());

                let values = self.column_values(var)?;
                value_values.push(values[row].clone());
            }
        }

        // 識別列、変数名列、値列の順で構築する
        let mut result = DataFrame::new();
        for (id_var, values) in id_vars.iter().zip(id_columns) {
            result.add_column(
                id_var.clone(),
                Series::new(values, Some(id_var.clone()))?,
            )?;
        }
        result.add_column(
            var_name.clone(),
            Series::new(var_values, Some(var_name.clone()))?,
        )?;
        result.add_column(
            value_name.clone(),
            Series::new(value_values, Some(value_name))?,
        )?;

        Ok(result)
    }
}
