use clap::Parser;
use log::warn;

use crate::prelude::*;

/// Create a dataset (not implemented yet).
#[derive(Debug, Parser)]
pub(crate) struct Create {}

impl Create {
    pub(crate) fn execute(self) -> DatasetResult<()> {
        warn!("the `create` command is not implemented yet");
        Ok(())
    }
}
