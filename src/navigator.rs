//! Leaving the presentation for the destination site.

use std::io::Write;
use std::sync::Mutex;

use tracing::info;

use crate::error::NavigationError;

/// Performs the session's single external navigation.
pub trait Navigator: Send + Sync {
    /// Navigates to `url`.
    ///
    /// # Errors
    ///
    /// Returns a [`NavigationError`] if the destination could not be opened.
    fn redirect(&self, url: &str) -> Result<(), NavigationError>;
}

/// Opens the destination in the system browser.
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserNavigator;

impl Navigator for BrowserNavigator {
    fn redirect(&self, url: &str) -> Result<(), NavigationError> {
        info!(url, "opening destination in browser");
        webbrowser::open(url).map_err(|source| NavigationError::Browser {
            url: url.to_owned(),
            source,
        })
    }
}

/// Prints `navigate <url>` to a writer instead of opening anything.
pub struct StdoutNavigator {
    out: Mutex<Box<dyn Write + Send>>,
}

impl StdoutNavigator {
    /// Writes navigation lines to `writer`.
    #[must_use]
    pub fn new(writer: Box<dyn Write + Send>) -> Self {
        Self {
            out: Mutex::new(writer),
        }
    }
}

impl Default for StdoutNavigator {
    fn default() -> Self {
        Self::new(Box::new(std::io::stdout()))
    }
}

impl std::fmt::Debug for StdoutNavigator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StdoutNavigator").finish_non_exhaustive()
    }
}

impl Navigator for StdoutNavigator {
    fn redirect(&self, url: &str) -> Result<(), NavigationError> {
        let mut out = self
            .out
            .lock()
            .map_err(|_| NavigationError::Io(std::io::Error::other("navigator output poisoned")))?;
        writeln!(out, "navigate {url}")?;
        out.flush()?;
        Ok(())
    }
}
