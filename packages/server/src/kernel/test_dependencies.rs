// TestDependencies - mock implementations for testing
//
// Provides in-memory services that can be injected into ServerDeps for
// tests: a mock user directory with per-role failure toggles, and
// in-memory alert store / email queue / audit log with call capture.

use anyhow::Result;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::common::{Role, UserId};
use crate::domains::notifications::audit::AuditEntry;
use crate::domains::notifications::models::Alert;
use crate::kernel::alert_feed::AlertFeed;
use crate::kernel::deps::ServerDeps;
use crate::kernel::traits::{
    BaseAlertStore, BaseAuditLog, BaseEmailQueue, BaseUserDirectory, DirectoryUser, EmailRequest,
};

// =============================================================================
// Mock User Directory
// =============================================================================

pub struct MockUserDirectory {
    users: Mutex<HashMap<Role, Vec<DirectoryUser>>>,
    failing_roles: Mutex<HashSet<Role>>,
    hanging_roles: Mutex<HashSet<Role>>,
    calls: Mutex<Vec<Role>>,
}

impl MockUserDirectory {
    pub fn new() -> Self {
        Self {
            users: Mutex::new(HashMap::new()),
            failing_roles: Mutex::new(HashSet::new()),
            hanging_roles: Mutex::new(HashSet::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Add an active user holding the given role. Returns the generated id.
    pub fn add_user(&self, role: Role, name: &str) -> UserId {
        let id = UserId::new();
        let user = DirectoryUser {
            id,
            display_name: name.to_string(),
            email: format!("{}@example.org", name.to_lowercase().replace(' ', ".")),
            role,
        };
        self.users.lock().unwrap().entry(role).or_default().push(user);
        id
    }

    /// Register a pre-built user under a role (e.g. to model the same user
    /// reachable via two requested roles).
    pub fn add(&self, role: Role, user: DirectoryUser) {
        self.users.lock().unwrap().entry(role).or_default().push(user);
    }

    /// Make lookups for the given role fail (directory unreachable).
    pub fn fail_role(&self, role: Role) {
        self.failing_roles.lock().unwrap().insert(role);
    }

    /// Make lookups for the given role hang forever (directory stalled).
    pub fn hang_role(&self, role: Role) {
        self.hanging_roles.lock().unwrap().insert(role);
    }

    /// Roles that were looked up, in order.
    pub fn calls(&self) -> Vec<Role> {
        self.calls.lock().unwrap().clone()
    }
}

impl Default for MockUserDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseUserDirectory for MockUserDirectory {
    async fn active_users(&self, role: Role) -> Result<Vec<DirectoryUser>> {
        self.calls.lock().unwrap().push(role);

        if self.failing_roles.lock().unwrap().contains(&role) {
            anyhow::bail!("directory unreachable");
        }

        // Lock released before awaiting: the future must stay Send.
        let stalled = self.hanging_roles.lock().unwrap().contains(&role);
        if stalled {
            std::future::pending::<()>().await;
        }

        Ok(self
            .users
            .lock()
            .unwrap()
            .get(&role)
            .cloned()
            .unwrap_or_default())
    }
}

// =============================================================================
// In-Memory Alert Store
// =============================================================================

pub struct InMemoryAlertStore {
    alerts: Mutex<Vec<Alert>>,
    keys: Mutex<HashSet<String>>,
    fail_writes: AtomicBool,
}

impl InMemoryAlertStore {
    pub fn new() -> Self {
        Self {
            alerts: Mutex::new(Vec::new()),
            keys: Mutex::new(HashSet::new()),
            fail_writes: AtomicBool::new(false),
        }
    }

    /// Make subsequent writes fail (channel failure).
    pub fn fail_writes(&self) {
        self.fail_writes.store(true, Ordering::SeqCst);
    }

    /// All stored alerts, in insertion order.
    pub fn alerts(&self) -> Vec<Alert> {
        self.alerts.lock().unwrap().clone()
    }

    /// Visible alerts for one user.
    pub fn alerts_for(&self, user_id: UserId) -> Vec<Alert> {
        self.alerts
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.user_id == user_id)
            .cloned()
            .collect()
    }
}

impl Default for InMemoryAlertStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseAlertStore for InMemoryAlertStore {
    async fn insert_if_absent(&self, alert: &Alert) -> Result<bool> {
        if self.fail_writes.load(Ordering::SeqCst) {
            anyhow::bail!("alert store write failed");
        }

        // Key set and row vec share one lock order; the key insert is the
        // atomic insert-if-absent.
        if !self.keys.lock().unwrap().insert(alert.dedup_key.clone()) {
            return Ok(false);
        }
        self.alerts.lock().unwrap().push(alert.clone());
        Ok(true)
    }

    async fn find_by_user(&self, user_id: UserId) -> Result<Vec<Alert>> {
        let mut alerts = self.alerts_for(user_id);
        alerts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(alerts)
    }
}

// =============================================================================
// In-Memory Email Queue
// =============================================================================

pub struct InMemoryEmailQueue {
    sent: Mutex<Vec<EmailRequest>>,
    fail_writes: AtomicBool,
}

impl InMemoryEmailQueue {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail_writes: AtomicBool::new(false),
        }
    }

    pub fn fail_writes(&self) {
        self.fail_writes.store(true, Ordering::SeqCst);
    }

    /// All enqueued requests, in order.
    pub fn requests(&self) -> Vec<EmailRequest> {
        self.sent.lock().unwrap().clone()
    }
}

impl Default for InMemoryEmailQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseEmailQueue for InMemoryEmailQueue {
    async fn enqueue(&self, request: EmailRequest) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            anyhow::bail!("email queue unavailable");
        }
        self.sent.lock().unwrap().push(request);
        Ok(())
    }
}

// =============================================================================
// In-Memory Audit Log
// =============================================================================

pub struct InMemoryAuditLog {
    entries: Mutex<Vec<AuditEntry>>,
    fail_writes: AtomicBool,
}

impl InMemoryAuditLog {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            fail_writes: AtomicBool::new(false),
        }
    }

    pub fn fail_writes(&self) {
        self.fail_writes.store(true, Ordering::SeqCst);
    }

    pub fn entries(&self) -> Vec<AuditEntry> {
        self.entries.lock().unwrap().clone()
    }
}

impl Default for InMemoryAuditLog {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseAuditLog for InMemoryAuditLog {
    async fn append(&self, entry: &AuditEntry) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            anyhow::bail!("audit log write failed");
        }
        self.entries.lock().unwrap().push(entry.clone());
        Ok(())
    }
}

// =============================================================================
// TestDependencies
// =============================================================================

/// Concrete handles to every mock plus a ready-made `ServerDeps`.
///
/// Tests keep the concrete `Arc<Mock*>` handles for assertions while the
/// pipeline sees only the trait objects inside `deps`.
pub struct TestDependencies {
    pub directory: Arc<MockUserDirectory>,
    pub alert_store: Arc<InMemoryAlertStore>,
    pub email_queue: Arc<InMemoryEmailQueue>,
    pub audit_log: Arc<InMemoryAuditLog>,
    pub deps: ServerDeps,
}

impl TestDependencies {
    pub fn new() -> Self {
        let directory = Arc::new(MockUserDirectory::new());
        let alert_store = Arc::new(InMemoryAlertStore::new());
        let email_queue = Arc::new(InMemoryEmailQueue::new());
        let audit_log = Arc::new(InMemoryAuditLog::new());

        let deps = ServerDeps::new(
            directory.clone(),
            alert_store.clone(),
            email_queue.clone(),
            audit_log.clone(),
            AlertFeed::new(),
            Duration::from_millis(200),
            "https://app.gridsense.example".to_string(),
        );

        Self {
            directory,
            alert_store,
            email_queue,
            audit_log,
            deps,
        }
    }
}

impl Default for TestDependencies {
    fn default() -> Self {
        Self::new()
    }
}
