use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

pub(crate) struct ProgressBarBuilder {
    template: &'static str,
    quiet: bool,
    len: Option<u64>,
}

impl ProgressBarBuilder {
    /// Creates a new builder. A quiet progress bar is never drawn.
    pub(crate) fn new(template: &'static str, quiet: bool) -> Self {
        Self {
            template,
            quiet,
            len: None,
        }
    }

    /// Sets the number of expected steps.
    pub(crate) fn len(mut self, len: u64) -> Self {
        self.len = Some(len);
        self
    }

    pub(crate) fn build(self) -> ProgressBar {
        if self.quiet {
            return ProgressBar::hidden();
        }

        let pbar = match self.len {
            Some(len) => ProgressBar::new(len),
            None => ProgressBar::new_spinner(),
        };

        pbar.set_draw_target(ProgressDrawTarget::stderr());
        pbar.set_style(
            ProgressStyle::with_template(self.template)
                .expect("valid progress template"),
        );
        pbar
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_bar_quiet() {
        let pbar = ProgressBarBuilder::new("{pos}", true).len(3).build();
        assert!(pbar.is_hidden());
    }

    #[test]
    fn progress_bar_len() {
        let pbar = ProgressBarBuilder::new("{pos}/{len}", false)
            .len(3)
            .build();
        assert_eq!(pbar.length(), Some(3));
    }
}
