use crate::model::{Role, User};

/// The one user currently signed in, if any.
#[derive(Debug, Default)]
pub struct Session {
    current: Option<User>,
}

impl Session {
    pub fn login(&mut self, user: User) {
        self.current = Some(user);
    }

    /// Returns whether someone was signed in.
    pub fn logout(&mut self) -> bool {
        self.current.take().is_some()
    }

    pub fn current(&self) -> Option<&User> {
        self.current.as_ref()
    }

    pub fn role(&self) -> Option<Role> {
        self.current.as_ref().map(|u| u.role)
    }
}
