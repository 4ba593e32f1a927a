use std::cell::Cell;
use std::rc::Rc;

/// Game-session epoch. Bumped on every start and quit so that responses
/// from a previous session are discarded instead of landing on fresh
/// state. Cheap to clone into async flows and event closures.
#[derive(Clone, Debug, Default)]
pub struct Session {
    epoch: Rc<Cell<u64>>,
}

impl PartialEq for Session {
    // Sessions compare by identity; there is one per app instance.
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.epoch, &other.epoch)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionToken(u64);

impl Session {
    pub fn token(&self) -> SessionToken {
        SessionToken(self.epoch.get())
    }

    /// Invalidates every outstanding token and returns the new one.
    pub fn bump(&self) -> SessionToken {
        self.epoch.set(self.epoch.get() + 1);
        self.token()
    }

    pub fn is_current(&self, token: SessionToken) -> bool {
        token.0 == self.epoch.get()
    }
}
