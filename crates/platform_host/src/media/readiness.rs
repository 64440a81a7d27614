//! Shared readiness flag for the remote player's externally loaded script.

use std::{cell::Cell, rc::Rc};

#[derive(Debug, Clone, Default)]
/// Write-once readiness broker.
///
/// The host's script-load callback calls [`ProviderReadiness::mark_ready`]; controllers poll
/// [`ProviderReadiness::is_ready`]. Clones share the same flag.
pub struct ProviderReadiness {
    ready: Rc<Cell<bool>>,
}

impl ProviderReadiness {
    /// Creates a broker in the not-ready state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a broker that is already ready.
    pub fn ready() -> Self {
        let readiness = Self::default();
        readiness.mark_ready();
        readiness
    }

    /// Marks the provider ready. Returns `true` only for the first call.
    pub fn mark_ready(&self) -> bool {
        !self.ready.replace(true)
    }

    /// Returns whether the provider has signalled readiness.
    pub fn is_ready(&self) -> bool {
        self.ready.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn readiness_is_written_once_and_shared_by_clones() {
        let readiness = ProviderReadiness::new();
        let observer = readiness.clone();
        assert!(!observer.is_ready());

        assert!(readiness.mark_ready());
        assert!(!readiness.mark_ready());
        assert!(observer.is_ready());
    }
}
