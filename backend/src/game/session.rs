use std::time::{Duration, Instant};

use dashmap::DashMap;
use uuid::Uuid;

use crate::{error::GameError, game::battlefield::Battlefield};

/// Display name of the computer opponent
pub const BOT_NAME: &str = "Bot";

/// One side of a game
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerModel {
    pub player_id: Uuid,
    pub player_name: String,
    pub battlefield: Battlefield,
}

impl PlayerModel {
    pub fn new(player_name: impl Into<String>, battlefield: Battlefield) -> Self {
        Self {
            player_id: Uuid::new_v4(),
            player_name: player_name.into(),
            battlefield,
        }
    }

    pub fn ship_count(&self) -> usize {
        self.battlefield.ship_count()
    }
}

/// In-memory state of a single-player game against the bot
#[derive(Debug, Clone)]
pub struct GameSession {
    pub game_id: Uuid,
    pub player: PlayerModel,
    pub enemy: PlayerModel,
    pub active_player: Uuid,
    pub created_at: Instant,
    pub last_activity: Instant,
}

impl GameSession {
    /// Start a game; the human player moves first
    pub fn new(player: PlayerModel, enemy: PlayerModel) -> Self {
        let now = Instant::now();
        Self {
            game_id: Uuid::new_v4(),
            active_player: player.player_id,
            player,
            enemy,
            created_at: now,
            last_activity: now,
        }
    }

    pub fn touch(&mut self) {
        self.last_activity = Instant::now();
    }

    pub fn is_idle(&self, now: Instant, timeout: Duration) -> bool {
        now.saturating_duration_since(self.last_activity) > timeout
    }
}

/// Live games keyed by game id, with an index from the human player's id
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: DashMap<Uuid, GameSession>,
    player_index: DashMap<Uuid, Uuid>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&self, session: GameSession) {
        let game_id = session.game_id;
        let player_id = session.player.player_id;
        self.sessions.insert(game_id, session);
        self.player_index.insert(player_id, game_id);
    }

    /// Snapshot of a session
    pub fn get(&self, game_id: Uuid) -> Result<GameSession, GameError> {
        self.sessions
            .get(&game_id)
            .map(|session| session.value().clone())
            .ok_or(GameError::GameNotFound(game_id))
    }

    pub fn find_game_by_player(&self, player_id: Uuid) -> Option<Uuid> {
        self.player_index.get(&player_id).map(|game_id| *game_id)
    }

    /// Run `f` against a session while holding its shard lock
    pub fn update<T, F>(&self, game_id: Uuid, f: F) -> Result<T, GameError>
    where
        F: FnOnce(&mut GameSession) -> Result<T, GameError>,
    {
        let mut session = self
            .sessions
            .get_mut(&game_id)
            .ok_or(GameError::GameNotFound(game_id))?;
        f(session.value_mut())
    }

    pub fn remove(&self, game_id: Uuid) -> Result<GameSession, GameError> {
        let (_, session) = self
            .sessions
            .remove(&game_id)
            .ok_or(GameError::GameNotFound(game_id))?;
        self.player_index.remove(&session.player.player_id);
        Ok(session)
    }

    /// Drop sessions idle for longer than `timeout`, returning their ids
    pub fn remove_idle(&self, now: Instant, timeout: Duration) -> Vec<Uuid> {
        // Collect first; removing while iterating would deadlock on the shard
        let stale: Vec<Uuid> = self
            .sessions
            .iter()
            .filter(|entry| entry.is_idle(now, timeout))
            .map(|entry| *entry.key())
            .collect();

        stale
            .into_iter()
            .filter(|game_id| self.remove(*game_id).is_ok())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
