//! Mutable session state: players, turn order, messages.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::entity::Player;
use crate::error::{CoreError, CoreResult};
use crate::world::World;

/// Who won the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Winner {
    /// A single player won.
    Player(String),
    /// All players won jointly.
    Both,
}

/// The mutable state of one pass-and-play session.
///
/// Owns the world graph and the player set exclusively; the turn engine is
/// the only writer while a session runs. Messages are an append/drain
/// buffer: the engine appends within a turn, the driver drains before the
/// next prompt.
#[derive(Debug, Clone)]
pub struct GameState {
    /// The location graph. Replaced wholesale by scenario setup, then
    /// mutated only through item pickup.
    pub world: World,
    players: HashMap<String, Player>,
    turn_order: Vec<String>,
    current_turn_index: usize,
    turn_number: u32,
    active: bool,
    winner: Option<Winner>,
    messages: Vec<String>,
    /// Per player, the set of location ids that player has searched.
    inspected_rooms: HashMap<String, HashSet<String>>,
}

impl GameState {
    /// Create a session. Turn order follows the order of `players`, which
    /// is fixed for the lifetime of the session.
    pub fn new(world: World, players: Vec<Player>) -> Self {
        let turn_order: Vec<String> = players.iter().map(|p| p.id.clone()).collect();
        let players = players.into_iter().map(|p| (p.id.clone(), p)).collect();
        Self {
            world,
            players,
            turn_order,
            current_turn_index: 0,
            turn_number: 1,
            active: true,
            winner: None,
            messages: Vec::new(),
            inspected_rooms: HashMap::new(),
        }
    }

    /// Look up a player by id.
    pub fn player(&self, player_id: &str) -> CoreResult<&Player> {
        self.players
            .get(player_id)
            .ok_or_else(|| CoreError::PlayerNotFound(player_id.to_string()))
    }

    /// Mutable lookup of a player by id.
    pub fn player_mut(&mut self, player_id: &str) -> CoreResult<&mut Player> {
        self.players
            .get_mut(player_id)
            .ok_or_else(|| CoreError::PlayerNotFound(player_id.to_string()))
    }

    /// Iterate over players in turn order.
    pub fn players(&self) -> impl Iterator<Item = &Player> {
        self.turn_order.iter().filter_map(|id| self.players.get(id))
    }

    /// The fixed turn order of player ids.
    pub fn turn_order(&self) -> &[String] {
        &self.turn_order
    }

    /// Id of the player whose turn it is.
    pub fn current_player_id(&self) -> Option<&str> {
        self.turn_order
            .get(self.current_turn_index)
            .map(String::as_str)
    }

    /// Advance to the next player, wrapping around. Completing a full
    /// round increments the turn number.
    pub fn advance_turn(&mut self) {
        if self.turn_order.is_empty() {
            return;
        }
        self.current_turn_index = (self.current_turn_index + 1) % self.turn_order.len();
        if self.current_turn_index == 0 {
            self.turn_number += 1;
        }
    }

    /// The current round number, starting at 1.
    pub fn turn_number(&self) -> u32 {
        self.turn_number
    }

    /// Whether the session is still running.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// End the session, recording the winner (or `None` for a loss or an
    /// abandoned session). Terminal: there is no way back to an active
    /// session.
    pub fn end_session(&mut self, winner: Option<Winner>) {
        self.active = false;
        self.winner = winner;
    }

    /// The recorded winner, if the session ended with one.
    pub fn winner(&self) -> Option<&Winner> {
        self.winner.as_ref()
    }

    /// Append an outgoing message.
    pub fn push_message(&mut self, message: impl Into<String>) {
        self.messages.push(message.into());
    }

    /// Take all pending messages, leaving the queue empty.
    pub fn drain_messages(&mut self) -> Vec<String> {
        std::mem::take(&mut self.messages)
    }

    /// Record that a player has inspected a location. Idempotent.
    pub fn mark_inspected(&mut self, player_id: &str, location_id: &str) {
        self.inspected_rooms
            .entry(player_id.to_string())
            .or_default()
            .insert(location_id.to_string());
    }

    /// Whether a player has previously inspected a location.
    pub fn has_inspected(&self, player_id: &str, location_id: &str) -> bool {
        self.inspected_rooms
            .get(player_id)
            .is_some_and(|rooms| rooms.contains(location_id))
    }
}
