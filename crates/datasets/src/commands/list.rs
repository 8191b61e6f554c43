use std::io::{stdout, Write};

use clap::Parser;

use crate::prelude::*;

/// Show a short description for each of the available datasets.
#[derive(Debug, Default, Parser)]
pub(crate) struct List {
    /// List sub-datasets.
    #[arg(short, long)]
    recursive: bool,

    /// Include more detailed descriptions if available.
    #[arg(short, long)]
    verbose: bool,

    /// The datasets to list. A dataset is either given by its
    /// absolute path or by its name (`<root>/<sub>/...`). Setting a
    /// dataset implies `--recursive`.
    #[arg(value_name = "dataset")]
    datasets: Vec<String>,
}

impl List {
    pub(crate) fn execute(self, roots: &[Dataset]) -> DatasetResult<()> {
        let mut wtr = stdout().lock();
        self.write_listing(&mut wtr, roots)?;
        wtr.flush()?;
        Ok(())
    }

    fn write_listing<W: Write>(
        &self,
        wtr: &mut W,
        roots: &[Dataset],
    ) -> DatasetResult<()> {
        let (datasets, recursive) = if self.datasets.is_empty() {
            if roots.is_empty() {
                writeln!(wtr, "No datasets found.")?;
                return Ok(());
            }

            (roots.to_vec(), self.recursive)
        } else {
            let datasets = self
                .datasets
                .iter()
                .map(|reference| resolve(reference, roots))
                .collect::<DatasetResult<Vec<_>>>()?;

            (datasets, true)
        };

        writeln!(wtr, "Datasets:")?;
        for dataset in datasets.iter() {
            self.write_dataset(wtr, dataset, recursive)?;
        }

        writeln!(wtr)?;
        Ok(())
    }

    fn write_dataset<W: Write>(
        &self,
        wtr: &mut W,
        dataset: &Dataset,
        recursive: bool,
    ) -> DatasetResult<()> {
        let line =
            format!(" - {:<15}     {}", dataset.name(), dataset.description());
        writeln!(wtr, "{}", line.trim_end())?;

        if self.verbose {
            writeln!(
                wtr,
                "   {:<15}     Location: {}",
                "",
                dataset.path().display()
            )?;
        }

        if recursive {
            for sub in dataset.subdatasets()? {
                self.write_dataset(wtr, &sub, recursive)?;
            }
        }

        Ok(())
    }
}
