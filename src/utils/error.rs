use crate::domain::model::RecordAddress;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LensError {
    #[error("Record {record} implements neither known capability profile")]
    UnrecognizedRecord { record: RecordAddress },

    #[error("External read failed ({target} {query}): {reason}")]
    ExternalReadFailure {
        target: String,
        query: String,
        reason: String,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },
}

impl LensError {
    pub fn external(target: impl Into<String>, query: impl Into<String>, reason: impl Into<String>) -> Self {
        LensError::ExternalReadFailure {
            target: target.into(),
            query: query.into(),
            reason: reason.into(),
        }
    }

    /// 是否為外部資料源（registry / record）讀取失敗
    pub fn is_external(&self) -> bool {
        matches!(self, LensError::ExternalReadFailure { .. })
    }

    /// CLI 結束碼：1 設定錯誤、2 外部讀取失敗、3 無法辨識的 record、4 其他
    pub fn exit_code(&self) -> i32 {
        match self {
            LensError::ConfigError { .. }
            | LensError::MissingConfigError { .. }
            | LensError::InvalidConfigValueError { .. }
            | LensError::ConfigValidationError { .. } => 1,
            LensError::ExternalReadFailure { .. } => 2,
            LensError::UnrecognizedRecord { .. } => 3,
            LensError::IoError(_) | LensError::SerializationError(_) => 4,
        }
    }
}

pub type Result<T> = std::result::Result<T, LensError>;
