//! The state one CLI run works on.

use crate::config::LendingSettings;
use crate::output::Formatter;
use libris_domain::{Clock, Library, SystemClock};

/// A library plus everything needed to talk about it.
///
/// The library lives exactly as long as the session; nothing is saved.
pub struct Session<C: Clock = SystemClock> {
    /// The catalog and its members
    pub library: Library<C>,

    /// Renders results
    pub formatter: Formatter,

    /// Fallbacks for blank or malformed numbers
    pub lending: LendingSettings,
}

impl<C: Clock> Session<C> {
    /// Create a new session.
    pub fn new(library: Library<C>, formatter: Formatter, lending: LendingSettings) -> Self {
        Self {
            library,
            formatter,
            lending,
        }
    }
}
