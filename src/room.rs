//! Hosting several two-player games at once.
//!
//! Each room owns its own [`Game`]; rooms share nothing. The lobby takes `&mut self`
//! for every request, so whoever drives it serializes incoming requests and the rules
//! engine itself needs no locking. Events are plain records a transport can forward.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::RoomError;
use crate::game::{Game, UndoResult};
use crate::history::Snapshot;
use crate::types::{Color, Outcome, Position};

pub type RoomId = String;

pub const PLAYERS_PER_ROOM: usize = 2;
pub const MAX_ROOMS: usize = 1000;
/// Rooms older than this are dropped by [`Lobby::prune`]
pub const ROOM_TTL_HOURS: i64 = 48;

/// Something every participant of a room should hear about
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum RoomEvent {
    /// Sent to the joining player only
    ColorAssigned { color: Color },
    /// Full state for a player who just joined
    StateSync { snapshot: Snapshot, can_undo: bool },
    PlayerCount { count: usize },
    MoveApplied {
        from: Position,
        to: Position,
        snapshot: Snapshot,
        outcome: Outcome,
    },
    Undone { snapshot: Snapshot, can_undo: bool },
}

#[derive(Debug, Clone)]
pub struct Room {
    game: Game,
    seats: Vec<Color>,
    created_at: DateTime<Utc>,
}

impl Room {
    fn new(created_at: DateTime<Utc>) -> Self {
        Self {
            game: Game::new(),
            seats: Vec::with_capacity(PLAYERS_PER_ROOM),
            created_at,
        }
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn players(&self) -> usize {
        self.seats.len()
    }

    pub fn is_seated(&self, color: Color) -> bool {
        self.seats.contains(&color)
    }

    /// White if white's seat is free, then black
    fn free_seat(&self) -> Option<Color> {
        [Color::White, Color::Black]
            .into_iter()
            .find(|color| !self.is_seated(*color))
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn state_sync(&self) -> RoomEvent {
        RoomEvent::StateSync {
            snapshot: self.game.snapshot(),
            can_undo: self.game.can_undo(),
        }
    }
}

fn generate_room_id() -> RoomId {
    let bytes: [u8; 8] = rand::thread_rng().gen();
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

#[derive(Debug, Default)]
pub struct Lobby {
    rooms: HashMap<RoomId, Room>,
}

impl Lobby {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open an empty room under a fresh random id
    pub fn create_room(&mut self) -> RoomId {
        let mut id = generate_room_id();
        while self.rooms.contains_key(&id) {
            id = generate_room_id();
        }
        self.insert_room(id.clone());
        log::info!("created room {id}");
        id
    }

    pub fn room(&self, room_id: &str) -> Option<&Room> {
        self.rooms.get(room_id)
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    /// Expired and surplus rooms are dropped before every insert
    fn insert_room(&mut self, room_id: RoomId) {
        let now = Utc::now();
        self.evict(now, MAX_ROOMS - 1);
        self.rooms.insert(room_id, Room::new(now));
    }

    fn room_mut(&mut self, room_id: &str) -> Result<&mut Room, RoomError> {
        self.rooms
            .get_mut(room_id)
            .ok_or_else(|| RoomError::UnknownRoom(room_id.to_string()))
    }

    /// Take a seat in `room_id`, opening the room if it does not exist yet.
    ///
    /// The first player gets white and the second black; anyone after that is turned
    /// away. A seat freed by [`Lobby::leave`] goes to the next joiner. Returns the color,
    /// a full state sync and the new player count.
    pub fn join(&mut self, room_id: &str) -> Result<Vec<RoomEvent>, RoomError> {
        if !self.rooms.contains_key(room_id) {
            self.insert_room(room_id.to_string());
        }
        let room = self.room_mut(room_id)?;

        let Some(color) = room.free_seat() else {
            log::warn!("room {room_id} is full, turning player away");
            return Err(RoomError::Full(room_id.to_string()));
        };
        room.seats.push(color);
        log::info!(
            "player joined room {room_id} as {}, {} seated",
            color.to_human(),
            room.players()
        );

        Ok(vec![
            RoomEvent::ColorAssigned { color },
            room.state_sync(),
            RoomEvent::PlayerCount {
                count: room.players(),
            },
        ])
    }

    /// Free the seat held by `color`. The room goes away with its last player.
    ///
    /// Returns the new player count for whoever is still seated.
    pub fn leave(&mut self, room_id: &str, color: Color) -> Result<RoomEvent, RoomError> {
        let room = self.room_mut(room_id)?;
        if !room.is_seated(color) {
            return Err(RoomError::NotSeated(color));
        }
        room.seats.retain(|seated| *seated != color);
        let count = room.players();
        log::info!("{} left room {room_id}, {count} seated", color.to_human());

        if count == 0 {
            self.rooms.remove(room_id);
            log::info!("closed empty room {room_id}");
        }
        Ok(RoomEvent::PlayerCount { count })
    }

    /// Play a move on behalf of the player holding `color`.
    ///
    /// A request from the side not on move is refused before the engine sees it; two
    /// racing requests from the right side resolve naturally since the second one is
    /// checked against the already updated position.
    pub fn submit_move(
        &mut self,
        room_id: &str,
        color: Color,
        from: Position,
        to: Position,
    ) -> Result<RoomEvent, RoomError> {
        let room = self.room_mut(room_id)?;
        if !room.is_seated(color) {
            log::debug!("room {room_id}: move from unseated {}", color.to_human());
            return Err(RoomError::NotSeated(color));
        }
        if room.game.side_to_move() != color {
            log::debug!("room {room_id}: {} moved out of turn", color.to_human());
            return Err(RoomError::NotYourTurn(color));
        }

        let outcome = room.game.apply_move(from, to)?;
        Ok(RoomEvent::MoveApplied {
            from,
            to,
            snapshot: room.game.snapshot(),
            outcome,
        })
    }

    /// Take back the last move in the room. `None` when there is nothing to undo.
    pub fn undo(&mut self, room_id: &str) -> Result<Option<RoomEvent>, RoomError> {
        let room = self.room_mut(room_id)?;
        match room.game.undo() {
            UndoResult::Restored => Ok(Some(RoomEvent::Undone {
                snapshot: room.game.snapshot(),
                can_undo: room.game.can_undo(),
            })),
            UndoResult::NothingToUndo => Ok(None),
        }
    }

    /// Drop rooms older than the TTL, then the oldest rooms beyond `MAX_ROOMS`
    pub fn prune(&mut self, now: DateTime<Utc>) {
        self.evict(now, MAX_ROOMS);
    }

    fn evict(&mut self, now: DateTime<Utc>, keep: usize) {
        let ttl = Duration::hours(ROOM_TTL_HOURS);
        let before = self.rooms.len();
        self.rooms.retain(|_, room| now - room.created_at < ttl);

        while self.rooms.len() > keep {
            let Some(oldest_id) = self
                .rooms
                .iter()
                .min_by_key(|(_, room)| room.created_at)
                .map(|(id, _)| id.clone())
            else {
                break;
            };
            self.rooms.remove(&oldest_id);
        }

        let dropped = before - self.rooms.len();
        if dropped > 0 {
            log::info!("pruned {dropped} rooms");
        }
    }
}
