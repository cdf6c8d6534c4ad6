//! The in-memory session table.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use ashen_veil_core::ids::ChatId;
use ashen_veil_narrative::domain::aggregates::Session;
use tokio::sync::{Mutex as AsyncMutex, MutexGuard as AsyncMutexGuard, watch};

type ChatQueues = Arc<Mutex<HashMap<ChatId, ChatQueue>>>;

/// Process-wide table of story sessions, one per chat.
///
/// Entries are only touched for the chat a command targets. An event takes
/// its place in the chat's queue with [`SessionTable::enqueue`] as soon as it
/// arrives, then holds the [`ChatTurn`] for the whole script. Events for one
/// chat are therefore handled in arrival order while other chats proceed.
#[derive(Debug, Default)]
pub struct SessionTable {
    sessions: Mutex<HashMap<ChatId, Session>>,
    queues: ChatQueues,
    persisting: AsyncMutex<()>,
}

/// Ticket counter for one chat. Removed once every ticket has been served.
#[derive(Debug)]
struct ChatQueue {
    issued: u64,
    serving: watch::Sender<u64>,
    abandoned: BTreeSet<u64>,
}

/// A place in a chat's queue, taken without waiting.
///
/// Dropping a ticket before its turn comes gives the place up; later tickets
/// are not held back by it.
#[derive(Debug)]
#[must_use = "a ticket gives up its place when dropped"]
pub struct ChatTicket {
    chat_id: ChatId,
    number: u64,
    serving: watch::Receiver<u64>,
    queues: ChatQueues,
}

/// Exclusive use of a chat, released on drop.
#[derive(Debug)]
#[must_use = "the chat is released when the turn is dropped"]
pub struct ChatTurn {
    _ticket: ChatTicket,
}

impl ChatTicket {
    /// Waits until every earlier ticket for the chat has been released.
    pub async fn turn(mut self) -> ChatTurn {
        let number = self.number;
        // The sender outlives every unserved ticket, so this cannot fail.
        let _ = self.serving.wait_for(|serving| *serving == number).await;
        ChatTurn { _ticket: self }
    }
}

impl Drop for ChatTicket {
    fn drop(&mut self) {
        let mut queues = self.queues.lock().unwrap_or_else(PoisonError::into_inner);
        let Some(queue) = queues.get_mut(&self.chat_id) else {
            return;
        };
        if *queue.serving.borrow() != self.number {
            queue.abandoned.insert(self.number);
            return;
        }

        let mut next = self.number + 1;
        while queue.abandoned.remove(&next) {
            next += 1;
        }
        if next == queue.issued {
            queues.remove(&self.chat_id);
        } else {
            queue.serving.send_replace(next);
        }
    }
}

impl SessionTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn sessions(&self) -> MutexGuard<'_, HashMap<ChatId, Session>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn queues(&self) -> MutexGuard<'_, HashMap<ChatId, ChatQueue>> {
        self.queues.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Takes the next place in `chat_id`'s queue. Never waits, so the order
    /// of calls is the order in which turns are granted.
    pub fn enqueue(&self, chat_id: ChatId) -> ChatTicket {
        let mut queues = self.queues();
        let queue = queues.entry(chat_id).or_insert_with(|| ChatQueue {
            issued: 0,
            serving: watch::Sender::new(0),
            abandoned: BTreeSet::new(),
        });
        let number = queue.issued;
        queue.issued += 1;
        ChatTicket {
            chat_id,
            number,
            serving: queue.serving.subscribe(),
            queues: Arc::clone(&self.queues),
        }
    }

    /// Waits for exclusive use of the snapshot file. Held from taking the
    /// table copy until the write finishes, so saves land in the order the
    /// copies were taken.
    pub async fn lock_persistence(&self) -> AsyncMutexGuard<'_, ()> {
        self.persisting.lock().await
    }

    /// Number of chats with an event queued or in progress.
    #[must_use]
    pub fn busy_chats(&self) -> usize {
        self.queues().len()
    }

    /// Copy of the chat's session.
    #[must_use]
    pub fn get(&self, chat_id: ChatId) -> Option<Session> {
        self.sessions().get(&chat_id).cloned()
    }

    /// Stores `session`, replacing any previous one for the same chat.
    pub fn insert(&self, session: Session) -> Option<Session> {
        self.sessions().insert(session.chat_id(), session)
    }

    /// Removes the chat's session.
    pub fn remove(&self, chat_id: ChatId) -> Option<Session> {
        self.sessions().remove(&chat_id)
    }

    /// Runs `f` against the chat's session, if there is one.
    pub fn update<R>(&self, chat_id: ChatId, f: impl FnOnce(&mut Session) -> R) -> Option<R> {
        self.sessions().get_mut(&chat_id).map(f)
    }

    /// Copy of every session, ordered by chat.
    #[must_use]
    pub fn snapshot(&self) -> BTreeMap<ChatId, Session> {
        self.sessions()
            .iter()
            .map(|(chat_id, session)| (*chat_id, session.clone()))
            .collect()
    }

    /// Replaces the whole table.
    pub fn replace_all(&self, sessions: BTreeMap<ChatId, Session>) {
        *self.sessions() = sessions.into_iter().collect();
    }

    /// Number of live sessions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions().len()
    }

    /// Whether the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use ashen_veil_core::ids::UserId;

    use super::*;

    fn session(chat: i64) -> Session {
        Session::new(ChatId(chat), UserId(chat), None)
    }

    #[test]
    fn test_insert_replaces_previous_session_for_chat() {
        // Arrange
        let table = SessionTable::new();
        table.insert(session(1));

        // Act
        let replaced = table.insert(Session::new(ChatId(1), UserId(99), None));

        // Assert
        assert!(replaced.is_some());
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(ChatId(1)).unwrap().owner_id(), UserId(99));
    }

    #[test]
    fn test_update_on_missing_chat_returns_none() {
        let table = SessionTable::new();

        let result = table.update(ChatId(5), |session| session.dispatch("a1_pkg"));

        assert!(result.is_none());
        assert!(table.is_empty());
    }

    #[test]
    fn test_replace_all_drops_sessions_missing_from_the_new_set() {
        let table = SessionTable::new();
        table.insert(session(1));
        table.insert(session(2));

        table.replace_all(BTreeMap::from([(ChatId(3), session(3))]));

        assert_eq!(table.snapshot().keys().copied().collect::<Vec<_>>(), vec![ChatId(3)]);
    }

    #[tokio::test]
    async fn test_turns_follow_enqueue_order_within_a_chat_only() {
        // Arrange
        let table = SessionTable::new();
        let first = table.enqueue(ChatId(1));
        let second = table.enqueue(ChatId(1));
        let other = table.enqueue(ChatId(2));

        // Act
        let other_turn = tokio::time::timeout(Duration::from_millis(50), other.turn()).await;
        let second = tokio::spawn(second.turn());
        tokio::time::sleep(Duration::from_millis(50)).await;
        let second_waited = !second.is_finished();
        drop(first);

        // Assert
        assert!(other_turn.is_ok());
        assert!(second_waited);
        assert!(
            tokio::time::timeout(Duration::from_millis(50), second)
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn test_abandoned_ticket_does_not_hold_back_later_ones() {
        // Arrange
        let table = SessionTable::new();
        let first = table.enqueue(ChatId(1));
        let abandoned = table.enqueue(ChatId(1));
        let third = table.enqueue(ChatId(1));

        // Act
        drop(abandoned);
        let turn = first.turn().await;
        drop(turn);

        // Assert
        assert!(
            tokio::time::timeout(Duration::from_millis(50), third.turn())
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn test_queue_entries_are_dropped_once_a_chat_goes_idle() {
        // Arrange
        let table = SessionTable::new();

        // Act
        for chat in 0..100 {
            let turn = table.enqueue(ChatId(chat)).turn().await;
            assert_eq!(table.busy_chats(), 1);
            drop(turn);
        }

        // Assert
        assert_eq!(table.busy_chats(), 0);
    }
}
