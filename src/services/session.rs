use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::error::AppError;
use crate::models::DEFAULT_AUTHOR;

/// The signed-in identity handed to every page at construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
}

impl Session {
    pub fn new(user_id: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            email: None,
            display_name: None,
        }
    }

    pub fn with_email(mut self, email: &str) -> Self {
        self.email = Some(email.to_string());
        self
    }

    pub fn with_display_name(mut self, name: &str) -> Self {
        self.display_name = Some(name.to_string());
        self
    }

    /// The inbox is keyed by email; sessions without one cannot use it.
    pub fn require_email(&self) -> Result<&str, AppError> {
        self.email
            .as_deref()
            .filter(|e| !e.trim().is_empty())
            .ok_or_else(|| AppError::Auth("An email address is required for the inbox.".to_string()))
    }

    /// Author label for posts: display name, then email, then a generic label.
    pub fn author_label(&self) -> String {
        [self.display_name.as_deref(), self.email.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|s| !s.is_empty())
            .unwrap_or(DEFAULT_AUTHOR)
            .to_string()
    }
}

/// Process-wide auth state owned by the top-level shell.
///
/// Pages never read this directly; the shell resolves a [`Session`] from it
/// and passes that down.
pub struct AuthState {
    tx: watch::Sender<Option<Session>>,
}

impl Default for AuthState {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthState {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx }
    }

    pub fn sign_in(&self, session: Session) {
        log::info!("Signed in as {}", session.user_id);
        self.tx.send_replace(Some(session));
    }

    pub fn sign_out(&self) {
        if self.tx.send_replace(None).is_some() {
            log::info!("Signed out");
        }
    }

    pub fn current(&self) -> Option<Session> {
        self.tx.borrow().clone()
    }

    pub fn require(&self) -> Result<Session, AppError> {
        self.current()
            .ok_or_else(|| AppError::Auth("Please sign in to continue.".to_string()))
    }

    /// Notified on every sign-in and sign-out.
    pub fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn author_label_falls_back_in_order() {
        let base = Session::new("u1");
        assert_eq!(base.author_label(), "Team Member");
        assert_eq!(base.clone().with_email("a@b.co").author_label(), "a@b.co");
        assert_eq!(
            base.with_email("a@b.co").with_display_name("Ada").author_label(),
            "Ada"
        );
        assert_eq!(
            Session::new("u2").with_display_name("  ").with_email("x@y.z").author_label(),
            "x@y.z"
        );
    }

    #[test]
    fn require_email_rejects_missing_or_blank() {
        assert!(Session::new("u1").require_email().is_err());
        assert!(Session::new("u1").with_email(" ").require_email().is_err());
        assert_eq!(Session::new("u1").with_email("a@b.co").require_email().unwrap(), "a@b.co");
    }

    #[tokio::test]
    async fn auth_state_notifies_listeners() {
        let auth = AuthState::new();
        let mut rx = auth.subscribe();
        assert!(auth.require().is_err());

        auth.sign_in(Session::new("u1"));
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().as_ref().map(|s| s.user_id.clone()), Some("u1".to_string()));

        auth.sign_out();
        rx.changed().await.unwrap();
        assert!(rx.borrow().is_none());
        assert!(auth.current().is_none());
    }
}
