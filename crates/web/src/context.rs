use vetcard_core::{Principal, SessionSnapshot};

/// Session as seen by one request.
///
/// Taken once per request so every handler in the chain observes the same
/// state, even if a concurrent login or logout lands mid-request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    snapshot: SessionSnapshot,
}

impl SessionContext {
    pub fn new(snapshot: SessionSnapshot) -> Self {
        Self { snapshot }
    }

    pub fn snapshot(&self) -> &SessionSnapshot {
        &self.snapshot
    }

    pub fn principal(&self) -> Option<&Principal> {
        self.snapshot.principal()
    }
}
