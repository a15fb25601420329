use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::game::{Battlefield, GameSession, Orientation, PlayerModel, Ship};

/// Request body of `POST /single_player/random_battlefield`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreparingModel {
    /// Absent or null starts a new game
    #[serde(default)]
    pub player_id: Option<Uuid>,
    pub player_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrientationUi {
    Horizontal,
    Vertical,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipUi {
    pub row: usize,
    pub col: usize,
    pub length: usize,
    pub orientation: OrientationUi,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattlefieldUi {
    pub size: usize,
    pub ships: Vec<ShipUi>,
    /// `cells[row][col]` is true where a ship segment sits
    pub cells: Vec<Vec<bool>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerModelUi {
    pub player_id: Uuid,
    pub player_name: String,
    #[serde(rename = "battleField")]
    pub battle_field: BattlefieldUi,
    pub size_of_ships: usize,
}

/// Game view returned by the single-player endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameModelUi {
    pub game_id: Uuid,
    pub player_model: PlayerModelUi,
    pub enemy_model: PlayerModelUi,
    pub active_player: Uuid,
}

impl From<Orientation> for OrientationUi {
    fn from(orientation: Orientation) -> Self {
        match orientation {
            Orientation::Horizontal => OrientationUi::Horizontal,
            Orientation::Vertical => OrientationUi::Vertical,
        }
    }
}

impl From<&Ship> for ShipUi {
    fn from(ship: &Ship) -> Self {
        Self {
            row: ship.row,
            col: ship.col,
            length: ship.length,
            orientation: ship.orientation.into(),
        }
    }
}

impl From<&Battlefield> for BattlefieldUi {
    fn from(field: &Battlefield) -> Self {
        Self {
            size: field.size(),
            ships: field.ships().iter().map(ShipUi::from).collect(),
            cells: field.occupancy(),
        }
    }
}

impl From<&PlayerModel> for PlayerModelUi {
    fn from(player: &PlayerModel) -> Self {
        Self {
            player_id: player.player_id,
            player_name: player.player_name.clone(),
            battle_field: BattlefieldUi::from(&player.battlefield),
            size_of_ships: player.ship_count(),
        }
    }
}

impl From<&GameSession> for GameModelUi {
    fn from(session: &GameSession) -> Self {
        Self {
            game_id: session.game_id,
            player_model: PlayerModelUi::from(&session.player),
            enemy_model: PlayerModelUi::from(&session.enemy),
            active_player: session.active_player,
        }
    }
}
