pub(crate) type DatasetResult<T> = Result<T, DatasetError>;

macro_rules! bail {
    ($($arg:tt)*) => {{
        return Err(DatasetError::Other(format!($($arg)*)));
    }};
}

pub(crate) use bail;

#[derive(Debug, thiserror::Error)]
pub(crate) enum DatasetError {
    #[error(transparent)]
    IO(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error("{0}")]
    InvalidDataset(String),

    #[error("{0}")]
    Other(String),
}

impl DatasetError {
    #[inline]
    pub(crate) fn invalid<T: ToString>(s: T) -> Self {
        Self::InvalidDataset(s.to_string())
    }
}
