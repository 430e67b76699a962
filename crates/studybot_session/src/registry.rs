//! Session registry: join, leave and status queries.

use crate::active::{ActiveSession, ServerSlot};

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use studybot_core::{
    ActiveSessionSnapshot, ChannelId, Clock, JoinOutcome, LeaveOutcome, ServerId, SystemClock,
    UserId, studied_minutes,
};
use studybot_error::StudyBotResult;
use studybot_interface::{Notifier, StudyStore};
use tokio::sync::Mutex;
use tracing::{debug, error, info, instrument, warn};

/// Process-wide registry of running study sessions, keyed by server.
///
/// The outer map is only locked long enough to find or create a server's
/// slot and is never held across an `.await`. Each slot has its own async
/// mutex, so requests for one server run strictly in arrival order while
/// other servers proceed independently. Store calls are made while holding
/// the slot lock.
///
/// A server's entry is dropped when its last participant leaves, unless
/// another task holds the slot at that moment. A skipped entry stays empty
/// and is reused by the next join.
///
/// # Example
/// ```no_run
/// use std::sync::Arc;
/// use studybot_core::JoinOutcome;
/// use studybot_database::SqliteStudyStore;
/// use studybot_interface::Notifier;
/// use studybot_session::SessionRegistry;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store = Arc::new(SqliteStudyStore::in_memory()?);
/// let (notifier, _receivers) = Notifier::channel();
/// let registry = SessionRegistry::new(store, notifier);
///
/// assert_eq!(registry.join(1, 7, 3).await?, JoinOutcome::Started);
/// # Ok(())
/// # }
/// ```
pub struct SessionRegistry {
    pub(crate) store: Arc<dyn StudyStore>,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) notifier: Notifier,
    servers: RwLock<HashMap<ServerId, Arc<Mutex<ServerSlot>>>>,
}

impl SessionRegistry {
    /// Creates an empty registry backed by `store`.
    pub fn new(store: Arc<dyn StudyStore>, notifier: Notifier) -> Self {
        Self {
            store,
            clock: Arc::new(SystemClock),
            notifier,
            servers: RwLock::new(HashMap::new()),
        }
    }

    /// Use `clock` for session timing.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// The store this registry writes through.
    pub fn store(&self) -> &Arc<dyn StudyStore> {
        &self.store
    }

    /// Slot for `server_id`, created on first use.
    fn slot(&self, server_id: ServerId) -> Arc<Mutex<ServerSlot>> {
        if let Some(slot) = self.servers.read().get(&server_id) {
            return Arc::clone(slot);
        }
        Arc::clone(self.servers.write().entry(server_id).or_default())
    }

    /// Slot for `server_id` if the server has ever had a session.
    pub(crate) fn existing_slot(&self, server_id: ServerId) -> Option<Arc<Mutex<ServerSlot>>> {
        self.servers.read().get(&server_id).cloned()
    }

    /// Drops the entry for `server_id` if it has no session and nobody else
    /// holds the slot.
    ///
    /// New holders can only clone the slot out of the map, so while the write
    /// lock is held a strong count of one means no task is waiting on it.
    fn prune_slot(&self, server_id: ServerId) {
        let mut servers = self.servers.write();
        let Some(slot) = servers.get(&server_id) else {
            return;
        };
        if Arc::strong_count(slot) != 1 {
            return;
        }
        let idle = slot.try_lock().is_ok_and(|slot| slot.session.is_none());
        if idle {
            servers.remove(&server_id);
            debug!(server_id, "Dropped idle server entry");
        }
    }

    /// Number of servers the registry currently holds an entry for.
    pub fn tracked_servers(&self) -> usize {
        self.servers.read().len()
    }

    /// Every known slot, in server id order.
    pub(crate) fn slots(&self) -> Vec<(ServerId, Arc<Mutex<ServerSlot>>)> {
        let mut slots: Vec<_> = self
            .servers
            .read()
            .iter()
            .map(|(server_id, slot)| (*server_id, Arc::clone(slot)))
            .collect();
        slots.sort_unstable_by_key(|(server_id, _)| *server_id);
        slots
    }

    /// Adds `user_id` to the session in `server_id`, starting one if needed.
    ///
    /// A repeated join is a no-op that writes nothing.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the session cannot be recorded; the
    /// registry is left unchanged.
    #[instrument(skip(self))]
    pub async fn join(
        &self,
        server_id: ServerId,
        user_id: UserId,
        channel_id: ChannelId,
    ) -> StudyBotResult<JoinOutcome> {
        let slot = self.slot(server_id);
        let mut slot = slot.lock().await;

        if let Some(session) = slot.session.as_mut() {
            if session.participants.contains(&user_id) {
                debug!("User already in session");
                return Ok(JoinOutcome::AlreadyJoined);
            }

            self.store
                .touch_user_session(user_id, server_id, session.session_id)
                .await?;
            session.participants.insert(user_id);
            info!(
                session_id = session.session_id,
                participants = session.participants.len(),
                "User joined study session"
            );
            return Ok(JoinOutcome::Joined);
        }

        let session_id = self.store.start_session(server_id).await?;
        if let Err(e) = self
            .store
            .touch_user_session(user_id, server_id, session_id)
            .await
        {
            // Do not leave an open session row nobody is in
            if let Err(close_err) = self.store.end_session(session_id).await {
                warn!(error = %close_err, session_id, "Failed to close abandoned session");
            }
            return Err(e);
        }

        let mut session = ActiveSession::new(session_id, self.clock.now(), channel_id);
        session.participants.insert(user_id);
        slot.session = Some(session);

        info!(session_id, "Study session started");
        Ok(JoinOutcome::Started)
    }

    /// Removes `user_id` from the session in `server_id`.
    ///
    /// The user is credited with the whole minutes elapsed since the session
    /// started. When the last participant leaves the session is closed and
    /// removed from the registry.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the studied minutes cannot be recorded; the
    /// user then stays in the session.
    #[instrument(skip(self))]
    pub async fn leave(&self, server_id: ServerId, user_id: UserId) -> StudyBotResult<LeaveOutcome> {
        let Some(handle) = self.existing_slot(server_id) else {
            return Ok(LeaveOutcome::NotInSession);
        };
        let mut slot = handle.lock().await;

        let Some(session) = slot.session.as_mut() else {
            return Ok(LeaveOutcome::NotInSession);
        };
        if !session.participants.contains(&user_id) {
            debug!("User not in session");
            return Ok(LeaveOutcome::NotInSession);
        }

        let minutes = studied_minutes(session.start_time, self.clock.now());
        if minutes > 0 {
            self.store
                .add_study_minutes(user_id, server_id, minutes)
                .await?;
        }
        session.participants.remove(&user_id);

        let remaining = session.participants.len();
        if remaining > 0 {
            info!(minutes, remaining, "User left study session");
            return Ok(LeaveOutcome::LeftSessionContinues {
                remaining,
                studied_minutes: minutes,
            });
        }

        let session_id = session.session_id;
        slot.session = None;

        match self.store.end_session(session_id).await {
            Ok(true) => info!(session_id, minutes, "Study session ended"),
            Ok(false) => warn!(session_id, "Session was already closed in storage"),
            Err(e) => error!(error = %e, session_id, "Failed to close session in storage"),
        }

        drop(slot);
        drop(handle);
        self.prune_slot(server_id);

        Ok(LeaveOutcome::LeftSessionEnded {
            studied_minutes: minutes,
        })
    }

    /// Frozen copy of the session running in `server_id`.
    pub async fn get_active(&self, server_id: ServerId) -> Option<ActiveSessionSnapshot> {
        let slot = self.existing_slot(server_id)?;
        let slot = slot.lock().await;
        slot.session.as_ref().map(|s| s.snapshot(server_id))
    }

    /// Frozen copies of every running session, in server id order.
    pub async fn active_sessions(&self) -> Vec<ActiveSessionSnapshot> {
        let mut snapshots = Vec::new();
        for (server_id, slot) in self.slots() {
            if let Some(session) = slot.lock().await.session.as_ref() {
                snapshots.push(session.snapshot(server_id));
            }
        }
        snapshots
    }
}
