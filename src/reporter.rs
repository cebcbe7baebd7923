use crate::AppResult;
use console::{Style, Term};
use indicatif::ProgressBar;

/// Where user-facing status lines go: straight to the terminal, or above a running progress bar.
#[derive(Debug, Clone)]
pub struct AppReporter<'a> {
    inner: AppReporterInner<'a>,
}

impl<'a> AppReporter<'a> {
    pub fn report<S>(&self, message: S) -> AppResult<()>
    where
        S: AsRef<str>,
    {
        match &self.inner {
            AppReporterInner::Term(term) => Ok(term.write_line(message.as_ref())?),
            AppReporterInner::ProgressBar(progress_bar) => {
                progress_bar.println(message.as_ref());
                Ok(())
            }
        }
    }

    pub fn warn<S>(&self, message: S) -> AppResult<()>
    where
        S: AsRef<str>,
    {
        self.report(
            format!(
                "{}: {}",
                Style::new().bold().yellow().apply_to("Warning"),
                message.as_ref()
            )
            .as_str(),
        )
    }

    /// Runs `f` with the progress bar hidden, so interactive prompts are not overdrawn.
    pub fn suspend<F, R>(&self, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        match &self.inner {
            AppReporterInner::Term(_) => f(),
            AppReporterInner::ProgressBar(progress_bar) => progress_bar.suspend(f),
        }
    }
}

#[derive(Debug, Clone)]
enum AppReporterInner<'a> {
    Term(&'a Term),
    ProgressBar(&'a ProgressBar),
}

impl<'a> From<&'a Term> for AppReporter<'a> {
    fn from(term: &'a Term) -> Self {
        AppReporter {
            inner: AppReporterInner::Term(term),
        }
    }
}

impl<'a> From<&'a ProgressBar> for AppReporter<'a> {
    fn from(progress_bar: &'a ProgressBar) -> Self {
        AppReporter {
            inner: AppReporterInner::ProgressBar(progress_bar),
        }
    }
}
