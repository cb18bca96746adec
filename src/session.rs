use std::path::PathBuf;

use crate::error::{MatchlyError, Result};
use crate::models::Session;

/// Where a saved session lives, selected by the remember-me flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Written to disk; survives restarts.
    Durable,
    /// Held in memory; gone when the process exits.
    Process,
}

fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("matchly")
}

/// Stores the current session in one of two retention scopes. The durable
/// scope is consulted first, matching the original lookup order.
pub struct SessionStore {
    root: PathBuf,
    process: Option<Session>,
}

impl SessionStore {
    pub fn open() -> Self {
        Self::with_root(config_dir())
    }

    pub fn with_root(root: PathBuf) -> Self {
        Self { root, process: None }
    }

    pub fn session_path(&self) -> PathBuf {
        self.root.join("session.json")
    }

    fn load_durable(&self) -> Option<Session> {
        let content = std::fs::read_to_string(self.session_path()).ok()?;
        // A corrupt session file reads as logged out.
        serde_json::from_str(&content).ok()
    }

    pub fn current(&self) -> Option<Session> {
        self.load_durable().or_else(|| self.process.clone())
    }

    pub fn scope_of_current(&self) -> Option<Scope> {
        if self.load_durable().is_some() {
            Some(Scope::Durable)
        } else if self.process.is_some() {
            Some(Scope::Process)
        } else {
            None
        }
    }

    pub fn save(&mut self, session: &Session, remember: bool) -> Result<()> {
        if remember {
            std::fs::create_dir_all(&self.root)?;
            let json = serde_json::to_string_pretty(session)
                .map_err(|e| MatchlyError::Session(e.to_string()))?;
            std::fs::write(self.session_path(), format!("{json}\n"))?;
        } else {
            self.process = Some(session.clone());
        }
        Ok(())
    }

    /// Rewrite the session in whichever scope currently holds it (process
    /// scope when none does).
    pub fn update(&mut self, session: &Session) -> Result<()> {
        let remember = matches!(self.scope_of_current(), Some(Scope::Durable));
        self.save(session, remember)
    }

    /// Clear both scopes.
    pub fn clear(&mut self) -> Result<()> {
        self.process = None;
        let path = self.session_path();
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Session {
        Session {
            id: "123".to_string(),
            email: "jane@example.com".to_string(),
            name: "Jane".to_string(),
            has_profile: false,
            token: "demo-abc".to_string(),
        }
    }

    #[test]
    fn durable_save_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = SessionStore::with_root(dir.path().to_path_buf());
        store.save(&sample(), true).unwrap();

        let reopened = SessionStore::with_root(dir.path().to_path_buf());
        assert_eq!(reopened.current(), Some(sample()));
        assert_eq!(reopened.scope_of_current(), Some(Scope::Durable));
    }

    #[test]
    fn process_save_does_not_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = SessionStore::with_root(dir.path().to_path_buf());
        store.save(&sample(), false).unwrap();
        assert_eq!(store.current(), Some(sample()));
        assert_eq!(store.scope_of_current(), Some(Scope::Process));

        let reopened = SessionStore::with_root(dir.path().to_path_buf());
        assert_eq!(reopened.current(), None);
    }

    #[test]
    fn durable_scope_wins_over_process() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = SessionStore::with_root(dir.path().to_path_buf());
        let mut other = sample();
        other.name = "Remembered".to_string();
        store.save(&sample(), false).unwrap();
        store.save(&other, true).unwrap();
        assert_eq!(store.current().unwrap().name, "Remembered");
    }

    #[test]
    fn update_keeps_existing_scope() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = SessionStore::with_root(dir.path().to_path_buf());
        store.save(&sample(), true).unwrap();

        let mut profiled = sample();
        profiled.has_profile = true;
        store.update(&profiled).unwrap();

        let reopened = SessionStore::with_root(dir.path().to_path_buf());
        assert!(reopened.current().unwrap().has_profile);
    }

    #[test]
    fn clear_removes_both_scopes() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = SessionStore::with_root(dir.path().to_path_buf());
        store.save(&sample(), false).unwrap();
        store.save(&sample(), true).unwrap();
        store.clear().unwrap();
        assert!(store.current().is_none());
        assert!(!store.session_path().exists());
    }

    #[test]
    fn corrupt_session_file_reads_as_logged_out() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("session.json"), "{not json").unwrap();
        let store = SessionStore::with_root(dir.path().to_path_buf());
        assert!(store.current().is_none());
    }
}
