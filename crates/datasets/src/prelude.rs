pub(crate) use crate::dataset::{resolve, Dataset};
pub(crate) use crate::error::{bail, DatasetError, DatasetResult};
pub(crate) use crate::progress::ProgressBarBuilder;
pub(crate) use crate::readme::Readme;
