use std::time::{Duration, Instant};

use uuid::Uuid;

use crate::{
    config::{GameConfig, UnknownPlayerPolicy},
    error::GameError,
    game::{
        generator::BattlefieldGenerator,
        session::{GameSession, PlayerModel, SessionStore, BOT_NAME},
    },
};

/// Owns every live single-player game and the rules for changing them
pub struct GameSessionManager {
    store: SessionStore,
    generator: BattlefieldGenerator,
    unknown_player_policy: UnknownPlayerPolicy,
    max_player_name_length: usize,
}

impl GameSessionManager {
    pub fn new(config: &GameConfig) -> Self {
        Self::with_generator(config, BattlefieldGenerator::default())
    }

    pub fn with_generator(config: &GameConfig, generator: BattlefieldGenerator) -> Self {
        Self {
            store: SessionStore::new(),
            generator,
            unknown_player_policy: config.unknown_player_policy,
            max_player_name_length: config.max_player_name_length,
        }
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Start a new game, or re-roll the battlefield of a known player.
    ///
    /// Re-rolling touches only the player's ship layout; the game id, the bot
    /// and the player's id and name stay as they were. A `player_name` that
    /// differs from the stored one is ignored on re-roll.
    pub fn create_or_update(
        &self,
        player_id: Option<Uuid>,
        player_name: &str,
    ) -> Result<GameSession, GameError> {
        let player_name = self.validate_player_name(player_name)?;

        let Some(player_id) = player_id else {
            return self.create_game(player_name);
        };

        match self.regenerate_battlefield(player_id) {
            Err(GameError::PlayerNotFound(_))
                if self.unknown_player_policy == UnknownPlayerPolicy::Create =>
            {
                tracing::info!(
                    "Unknown player {} requested a battlefield, starting a new game",
                    player_id
                );
                self.create_game(player_name)
            }
            result => result,
        }
    }

    pub fn get_game(&self, game_id: Uuid) -> Result<GameSession, GameError> {
        self.store.get(game_id)
    }

    pub fn delete_game(&self, game_id: Uuid) -> Result<(), GameError> {
        let session = self.store.remove(game_id)?;
        tracing::info!(
            "Deleted game {} of player {} after {:?}",
            game_id,
            session.player.player_id,
            session.created_at.elapsed()
        );
        Ok(())
    }

    /// Remove games nobody has touched within `timeout`
    pub fn sweep_idle(&self, timeout: Duration) -> usize {
        let removed = self.store.remove_idle(Instant::now(), timeout);
        for game_id in &removed {
            tracing::info!("Removed idle game {} (timeout expired)", game_id);
        }
        removed.len()
    }

    fn create_game(&self, player_name: String) -> Result<GameSession, GameError> {
        let player = PlayerModel::new(player_name, self.generator.generate()?);
        let enemy = PlayerModel::new(BOT_NAME, self.generator.generate()?);
        let session = GameSession::new(player, enemy);

        self.store.put(session.clone());

        tracing::info!(
            "Created game {} for player {} ({})",
            session.game_id,
            session.player.player_name,
            session.player.player_id
        );
        Ok(session)
    }

    fn regenerate_battlefield(&self, player_id: Uuid) -> Result<GameSession, GameError> {
        let game_id = self
            .store
            .find_game_by_player(player_id)
            .ok_or(GameError::PlayerNotFound(player_id))?;

        let session = self
            .store
            .update(game_id, |session| {
                session.player.battlefield =
                    self.generator.regenerate(&session.player.battlefield)?;
                session.touch();
                Ok(session.clone())
            })
            // The game may have been deleted between the lookup and the update
            .map_err(|e| match e {
                GameError::GameNotFound(_) => GameError::PlayerNotFound(player_id),
                other => other,
            })?;

        tracing::info!(
            "Regenerated battlefield for player {} in game {}",
            player_id,
            game_id
        );
        Ok(session)
    }

    fn validate_player_name(&self, player_name: &str) -> Result<String, GameError> {
        let trimmed = player_name.trim();
        if trimmed.is_empty() {
            return Err(GameError::Validation(
                "playerName must not be empty".to_string(),
            ));
        }
        if trimmed.chars().count() > self.max_player_name_length {
            return Err(GameError::Validation(format!(
                "playerName must be at most {} characters",
                self.max_player_name_length
            )));
        }
        Ok(trimmed.to_string())
    }
}
