use thiserror::Error;

/// エラー型の定義
#[derive(Error, Debug)]
pub enum Error {
    #[error("列が見つかりません: {0}")]
    ColumnNotFound(String),

    #[error("列名が重複しています: {0}")]
    DuplicateColumnName(String),

    #[error("行数が一致しません: 期待値 {expected}, 実際 {found}")]
    InconsistentRowCount { expected: usize, found: usize },

    #[error("インデックスエラー: {0}")]
    Index(String),

    #[error("データがありません: {0}")]
    EmptyData(String),

    #[error("データ不足エラー: {0}")]
    InsufficientData(String),

    #[error("無効な入力です: {0}")]
    InvalidInput(String),

    #[error("型変換エラー: {0}")]
    Cast(String),

    #[error("キーが見つかりません: {0}")]
    KeyNotFound(String),

    #[error("操作に失敗しました: {0}")]
    OperationFailed(String),
}

/// クレート全体で使用するResult型のエイリアス
pub type Result<T> = std::result::Result<T, Error>;
