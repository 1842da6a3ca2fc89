// CropCure - app/auth.rs
//
// Session state holder: the single source of truth for who is signed in.
//
// Architecture:
//   - `SessionHolder` lives on the UI thread inside `AppState` and is passed
//     by reference to every view; there is no global lookup.
//   - Provider calls run on a background thread and report back over an
//     mpsc channel, polled once per frame (the same shape as analysis jobs).
//   - Durable storage is only touched from the UI thread, so a late worker
//     can never overwrite a newer stored value.
//   - Overlapping requests are ignored while an operation is in flight.
//
// This is not a security boundary; nothing ever validates the stored record.

use crate::core::model::AuthUser;
use crate::platform::storage::DurableStorage;
use crate::util::constants::SESSION_STORAGE_KEY;
use crate::util::error::AuthError;
use std::sync::{mpsc, Arc};
use std::time::{Duration, Instant};

// =============================================================================
// Provider seam
// =============================================================================

/// Identity provider used for sign-in and sign-out.
pub trait AuthProvider: Send + Sync {
    /// Short provider name for logs and the sign-in button.
    fn name(&self) -> &str;

    fn sign_in(&self) -> Result<AuthUser, AuthError>;

    fn sign_out(&self, user: &AuthUser) -> Result<(), AuthError>;
}

/// Stand-in for a Google sign-in that always returns the same test user.
#[derive(Debug, Default)]
pub struct MockGoogleProvider;

impl MockGoogleProvider {
    pub fn mock_user() -> AuthUser {
        AuthUser {
            id: "user123".to_string(),
            name: "Test User".to_string(),
            email: "test@example.com".to_string(),
            avatar_url: Some(
                "https://ui-avatars.com/api/?name=Test+User&background=22c55e&color=fff"
                    .to_string(),
            ),
        }
    }
}

impl AuthProvider for MockGoogleProvider {
    fn name(&self) -> &str {
        "Google"
    }

    fn sign_in(&self) -> Result<AuthUser, AuthError> {
        Ok(Self::mock_user())
    }

    fn sign_out(&self, _user: &AuthUser) -> Result<(), AuthError> {
        Ok(())
    }
}

// =============================================================================
// Requests and events
// =============================================================================

/// Whether a sign-in/sign-out request was acted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthRequest {
    Started,
    /// Another operation is in flight, or there was nothing to do.
    Ignored,
}

/// Completed transitions reported by `SessionHolder::poll`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEvent {
    SignedIn { name: String },
    SignInFailed { error: String },
    /// Signed in, but the session could not be stored for the next launch.
    NotRemembered { error: String },
    SignedOut,
    SignOutFailed { error: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AuthOp {
    SignIn,
    SignOut,
}

impl AuthOp {
    fn label(&self) -> &'static str {
        match self {
            AuthOp::SignIn => "Sign-in",
            AuthOp::SignOut => "Sign-out",
        }
    }
}

#[derive(Debug)]
enum AuthOutcome {
    SignedIn(Result<AuthUser, AuthError>),
    SignedOut(Result<(), AuthError>),
}

struct PendingAuth {
    op: AuthOp,
    rx: mpsc::Receiver<AuthOutcome>,
}

// =============================================================================
// SessionHolder
// =============================================================================

/// Owns the current session and its durable copy.
pub struct SessionHolder {
    storage: Arc<dyn DurableStorage>,
    provider: Arc<dyn AuthProvider>,
    user: Option<AuthUser>,
    restored: bool,
    pending: Option<PendingAuth>,
    revision: u64,
}

impl SessionHolder {
    /// Create an empty holder. `loading()` stays true until `restore()`.
    pub fn new(storage: Arc<dyn DurableStorage>, provider: Arc<dyn AuthProvider>) -> Self {
        Self {
            storage,
            provider,
            user: None,
            restored: false,
            pending: None,
            revision: 0,
        }
    }

    /// The signed-in user, if any.
    pub fn user(&self) -> Option<&AuthUser> {
        self.user.as_ref()
    }

    pub fn is_signed_in(&self) -> bool {
        self.user.is_some()
    }

    /// True until restoration finishes and while a provider call is in flight.
    pub fn loading(&self) -> bool {
        !self.restored || self.pending.is_some()
    }

    /// Incremented on every state transition.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    fn bump(&mut self) {
        self.revision += 1;
    }

    /// Install the stored session, if there is a usable one.
    ///
    /// Never fails: unreadable or malformed content is logged and treated as
    /// "no session". Malformed entries are removed so the next start is clean.
    pub fn restore(&mut self) {
        match self.storage.read(SESSION_STORAGE_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<AuthUser>(&raw) {
                Ok(user) if user.is_well_formed() => {
                    tracing::info!(user_id = %user.id, "Session restored");
                    self.user = Some(user);
                }
                Ok(_) => {
                    tracing::warn!("Stored session has no user id; discarding");
                    self.discard_stored();
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Stored session is malformed; discarding");
                    self.discard_stored();
                }
            },
            Ok(None) => tracing::debug!("No stored session"),
            Err(e) => tracing::warn!(error = %e, "Cannot read stored session; starting signed out"),
        }

        self.restored = true;
        self.bump();
    }

    fn discard_stored(&self) {
        if let Err(e) = self.storage.remove(SESSION_STORAGE_KEY) {
            tracing::warn!(error = %e, "Failed to remove malformed session entry");
        }
    }

    /// Start a sign-in. Ignored while any auth operation is in flight.
    pub fn sign_in(&mut self) -> AuthRequest {
        if self.pending.is_some() {
            tracing::debug!("Sign-in ignored: auth operation already in flight");
            return AuthRequest::Ignored;
        }

        let (tx, rx) = mpsc::channel();
        let provider = Arc::clone(&self.provider);
        std::thread::spawn(move || {
            let outcome = provider.sign_in();
            // Receiver dropped means the holder is gone; nothing to report.
            let _ = tx.send(AuthOutcome::SignedIn(outcome));
        });

        self.pending = Some(PendingAuth {
            op: AuthOp::SignIn,
            rx,
        });
        self.bump();
        tracing::info!(provider = self.provider.name(), "Sign-in started");
        AuthRequest::Started
    }

    /// Sign out. The in-memory session and the stored entry are cleared
    /// immediately; the provider is notified in the background.
    pub fn sign_out(&mut self) -> AuthRequest {
        if self.pending.is_some() {
            tracing::debug!("Sign-out ignored: auth operation already in flight");
            return AuthRequest::Ignored;
        }

        let Some(user) = self.user.take() else {
            self.discard_stored();
            return AuthRequest::Ignored;
        };

        if let Err(e) = self.storage.remove(SESSION_STORAGE_KEY) {
            tracing::warn!(error = %e, "Failed to remove stored session during sign-out");
        }

        let (tx, rx) = mpsc::channel();
        let provider = Arc::clone(&self.provider);
        std::thread::spawn(move || {
            let outcome = provider.sign_out(&user);
            let _ = tx.send(AuthOutcome::SignedOut(outcome));
        });

        self.pending = Some(PendingAuth {
            op: AuthOp::SignOut,
            rx,
        });
        self.bump();
        tracing::info!("Sign-out started");
        AuthRequest::Started
    }

    /// Collect the result of the in-flight operation, if it has finished.
    pub fn poll(&mut self) -> Vec<AuthEvent> {
        let Some(pending) = self.pending.as_ref() else {
            return Vec::new();
        };

        let op = pending.op;
        let outcome = match pending.rx.try_recv() {
            Ok(outcome) => outcome,
            Err(mpsc::TryRecvError::Empty) => return Vec::new(),
            Err(mpsc::TryRecvError::Disconnected) => {
                tracing::error!(operation = op.label(), "Auth worker exited without a result");
                let lost = AuthError::WorkerLost {
                    operation: op.label(),
                };
                match op {
                    AuthOp::SignIn => AuthOutcome::SignedIn(Err(lost)),
                    AuthOp::SignOut => AuthOutcome::SignedOut(Err(lost)),
                }
            }
        };

        self.pending = None;
        self.bump();

        match outcome {
            AuthOutcome::SignedIn(Ok(user)) => self.install(user),
            AuthOutcome::SignedIn(Err(e)) => {
                tracing::error!(error = %e, "Sign-in failed");
                vec![AuthEvent::SignInFailed {
                    error: e.to_string(),
                }]
            }
            AuthOutcome::SignedOut(Ok(())) => {
                tracing::info!("Signed out");
                vec![AuthEvent::SignedOut]
            }
            AuthOutcome::SignedOut(Err(e)) => {
                // Local state was already cleared; only the provider call failed.
                tracing::error!(error = %e, "Sign-out failed at provider");
                vec![AuthEvent::SignOutFailed {
                    error: e.to_string(),
                }]
            }
        }
    }

    fn install(&mut self, user: AuthUser) -> Vec<AuthEvent> {
        let mut events = vec![AuthEvent::SignedIn {
            name: user.name.clone(),
        }];

        let stored = serde_json::to_string(&user)
            .map_err(|e| AuthError::Serialize { source: e })
            .and_then(|json| {
                self.storage
                    .write(SESSION_STORAGE_KEY, &json)
                    .map_err(AuthError::from)
            });
        if let Err(e) = stored {
            tracing::warn!(error = %e, "Signed in but session could not be stored");
            events.push(AuthEvent::NotRemembered {
                error: e.to_string(),
            });
        }

        tracing::info!(user_id = %user.id, "Signed in");
        self.user = Some(user);
        events
    }

    /// Poll until no operation is in flight or `timeout` elapses.
    ///
    /// For headless callers and tests; the GUI polls once per frame instead.
    pub fn wait_idle(&mut self, timeout: Duration) -> Vec<AuthEvent> {
        let deadline = Instant::now() + timeout;
        let mut events = Vec::new();
        while self.pending.is_some() && Instant::now() < deadline {
            events.extend(self.poll());
            if self.pending.is_some() {
                std::thread::sleep(Duration::from_millis(2));
            }
        }
        events
    }
}

impl std::fmt::Debug for SessionHolder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionHolder")
            .field("user_id", &self.user.as_ref().map(|u| u.id.as_str()))
            .field("restored", &self.restored)
            .field("pending", &self.pending.as_ref().map(|p| p.op))
            .field("revision", &self.revision)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::storage::{FileStorage, MemoryStorage};
    use crate::util::error::StorageError;
    use tempfile::TempDir;

    const WAIT: Duration = Duration::from_secs(5);

    struct FailingProvider;

    impl AuthProvider for FailingProvider {
        fn name(&self) -> &str {
            "failing"
        }

        fn sign_in(&self) -> Result<AuthUser, AuthError> {
            Err(AuthError::Provider {
                operation: "sign-in",
                reason: "popup closed".to_string(),
            })
        }

        fn sign_out(&self, _user: &AuthUser) -> Result<(), AuthError> {
            Err(AuthError::Provider {
                operation: "sign-out",
                reason: "network".to_string(),
            })
        }
    }

    /// Storage whose writes always fail.
    struct ReadOnlyStorage;

    impl DurableStorage for ReadOnlyStorage {
        fn read(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Ok(None)
        }

        fn write(&self, key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Io {
                path: key.into(),
                operation: "write",
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
            })
        }

        fn remove(&self, _key: &str) -> Result<(), StorageError> {
            Ok(())
        }
    }

    fn holder(storage: Arc<dyn DurableStorage>) -> SessionHolder {
        SessionHolder::new(storage, Arc::new(MockGoogleProvider))
    }

    fn signed_in(storage: Arc<dyn DurableStorage>) -> SessionHolder {
        let mut h = holder(storage);
        h.restore();
        assert_eq!(h.sign_in(), AuthRequest::Started);
        h.wait_idle(WAIT);
        assert!(h.is_signed_in());
        h
    }

    #[test]
    fn test_loading_until_restored() {
        let mut h = holder(Arc::new(MemoryStorage::new()));
        assert!(h.loading());
        h.restore();
        assert!(!h.loading());
        assert!(h.user().is_none());
    }

    #[test]
    fn test_sign_in_then_restart_restores_same_user() {
        let storage: Arc<dyn DurableStorage> = Arc::new(MemoryStorage::new());
        let first = signed_in(Arc::clone(&storage));
        let id = first.user().unwrap().id.clone();
        drop(first);

        let mut second = holder(storage);
        second.restore();
        assert_eq!(second.user().map(|u| u.id.as_str()), Some(id.as_str()));
    }

    #[test]
    fn test_sign_out_removes_stored_entry() {
        let dir = TempDir::new().unwrap();
        let storage = Arc::new(FileStorage::new(dir.path()));
        let mut h = signed_in(storage.clone());
        assert!(storage.entry_path(SESSION_STORAGE_KEY).exists());

        assert_eq!(h.sign_out(), AuthRequest::Started);
        assert!(!h.is_signed_in(), "memory is cleared before the provider returns");
        let events = h.wait_idle(WAIT);
        assert_eq!(events, vec![AuthEvent::SignedOut]);
        assert!(!storage.entry_path(SESSION_STORAGE_KEY).exists());

        let mut restarted = holder(storage);
        restarted.restore();
        assert!(restarted.user().is_none());
    }

    #[test]
    fn test_malformed_storage_is_treated_as_no_session() {
        let storage = Arc::new(MemoryStorage::new());
        storage.write(SESSION_STORAGE_KEY, "{not json").unwrap();

        let mut h = holder(storage.clone());
        h.restore();
        assert!(!h.loading());
        assert!(h.user().is_none());
        assert!(storage.read(SESSION_STORAGE_KEY).unwrap().is_none());
    }

    #[test]
    fn test_record_without_id_is_discarded() {
        let storage = Arc::new(MemoryStorage::new());
        storage
            .write(SESSION_STORAGE_KEY, r#"{"id":"","name":"A","email":"a@b.c"}"#)
            .unwrap();
        let mut h = holder(storage);
        h.restore();
        assert!(h.user().is_none());
    }

    #[test]
    fn test_overlapping_sign_in_is_ignored() {
        let mut h = holder(Arc::new(MemoryStorage::new()));
        h.restore();
        assert_eq!(h.sign_in(), AuthRequest::Started);
        assert!(h.loading());
        assert_eq!(h.sign_in(), AuthRequest::Ignored);
        assert_eq!(h.sign_out(), AuthRequest::Ignored);

        let events = h.wait_idle(WAIT);
        assert_eq!(
            events,
            vec![AuthEvent::SignedIn {
                name: "Test User".to_string()
            }]
        );
        assert!(!h.loading());
    }

    #[test]
    fn test_failed_sign_in_leaves_session_unchanged() {
        let storage = Arc::new(MemoryStorage::new());
        let mut h = SessionHolder::new(storage.clone(), Arc::new(FailingProvider));
        h.restore();

        h.sign_in();
        let events = h.wait_idle(WAIT);
        assert!(matches!(events.as_slice(), [AuthEvent::SignInFailed { .. }]));
        assert!(!h.loading());
        assert!(h.user().is_none());
        assert!(storage.read(SESSION_STORAGE_KEY).unwrap().is_none());
    }

    #[test]
    fn test_failed_sign_out_still_clears_locally() {
        let storage = Arc::new(MemoryStorage::new());
        let user = MockGoogleProvider::mock_user();
        storage
            .write(SESSION_STORAGE_KEY, &serde_json::to_string(&user).unwrap())
            .unwrap();

        let mut h = SessionHolder::new(storage.clone(), Arc::new(FailingProvider));
        h.restore();
        assert!(h.is_signed_in());

        h.sign_out();
        let events = h.wait_idle(WAIT);
        assert!(matches!(events.as_slice(), [AuthEvent::SignOutFailed { .. }]));
        assert!(h.user().is_none());
        assert!(storage.read(SESSION_STORAGE_KEY).unwrap().is_none());
    }

    #[test]
    fn test_unwritable_storage_still_signs_in() {
        let mut h = holder(Arc::new(ReadOnlyStorage));
        h.restore();
        h.sign_in();
        let events = h.wait_idle(WAIT);
        assert!(h.is_signed_in());
        assert!(events
            .iter()
            .any(|e| matches!(e, AuthEvent::NotRemembered { .. })));
    }

    #[test]
    fn test_revision_advances_on_transitions() {
        let mut h = holder(Arc::new(MemoryStorage::new()));
        let r0 = h.revision();
        h.restore();
        let r1 = h.revision();
        h.sign_in();
        h.wait_idle(WAIT);
        let r2 = h.revision();
        assert!(r0 < r1 && r1 < r2);
    }
}
