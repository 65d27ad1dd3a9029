use serde::{Serialize, ser::SerializeTuple as _};

use crate::core::{Card, PlayerId, Position};

/// Event type names used in the third column of a transcript.
pub mod event_type {
    pub const CREATE_ENVIRONMENT: &str = "CREATE_ENVIRONMENT";
    pub const P1_MAX_CARDS: &str = "P1_MAX_CARDS";
    pub const P2_MAX_CARDS: &str = "P2_MAX_CARDS";
    pub const P1_MAX_TURNS: &str = "P1_MAX_TURNS";
    pub const P2_MAX_TURNS: &str = "P2_MAX_TURNS";
    pub const PLAYER_INITIAL_LOCATION: &str = "PLAYER_INITIAL_LOCATION";
    pub const PLAYER_MOVE: &str = "PLAYER_MOVE";
    pub const PLAYER_PICKUP_CARD: &str = "PLAYER_PICKUP_CARD";
    pub const PLAYER_DROP_CARD: &str = "PLAYER_DROP_CARD";
    pub const CHAT_MESSAGE_PREFIX: &str = "CHAT_MESSAGE_PREFIX";
    pub const TASK_COMPLETE_CLICKED: &str = "TASK_COMPLETE_CLICKED";

    /// Bookkeeping events that carry no game information.
    pub const METADATA: [&str; 8] = [
        "ORIGINAL_FILENAME",
        "COLLECTION_SITE",
        "TASK_COMPLETED",
        "PLAYER_1",
        "PLAYER_2",
        "PLAYER_1_TASK_ID",
        "PLAYER_2_TASK_ID",
        "GOAL_DESCRIPTION",
    ];
}

/// A single game event from the transcript.
///
/// Each variant carries only the data relevant to it. Event types the parser
/// does not know are kept as [`Move::Unrecognized`] so the move log stays
/// aligned with the transcript; replay treats them as no-ops.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::IsVariant)]
pub enum Move {
    PlayerMove {
        player: PlayerId,
        to: Position,
    },
    PickupCard {
        player: PlayerId,
        at: Position,
        card: Card,
    },
    DropCard {
        player: PlayerId,
        at: Position,
        card: Card,
    },
    ChatMessage {
        player: PlayerId,
        text: String,
        /// Whether the message refers to any card, decided once at parse time.
        mentions_card: bool,
    },
    TaskComplete {
        player: PlayerId,
    },
    Unrecognized {
        agent: String,
        event_type: String,
        payload: String,
    },
}

impl Move {
    #[must_use]
    pub fn player(&self) -> Option<PlayerId> {
        match self {
            Move::PlayerMove { player, .. }
            | Move::PickupCard { player, .. }
            | Move::DropCard { player, .. }
            | Move::ChatMessage { player, .. }
            | Move::TaskComplete { player } => Some(*player),
            Move::Unrecognized { agent, .. } => PlayerId::from_agent(agent),
        }
    }

    #[must_use]
    pub fn event_type(&self) -> &str {
        match self {
            Move::PlayerMove { .. } => event_type::PLAYER_MOVE,
            Move::PickupCard { .. } => event_type::PLAYER_PICKUP_CARD,
            Move::DropCard { .. } => event_type::PLAYER_DROP_CARD,
            Move::ChatMessage { .. } => event_type::CHAT_MESSAGE_PREFIX,
            Move::TaskComplete { .. } => event_type::TASK_COMPLETE_CLICKED,
            Move::Unrecognized { event_type, .. } => event_type,
        }
    }

    /// Short human-readable rendering of the move's payload.
    #[must_use]
    pub fn data(&self) -> String {
        match self {
            Move::PlayerMove { to, .. } => format!("[{to}]"),
            Move::PickupCard { at, card, .. } | Move::DropCard { at, card, .. } => {
                format!("[{at}],{card}")
            }
            Move::ChatMessage { text, .. } => text.clone(),
            Move::TaskComplete { .. } => String::new(),
            Move::Unrecognized { payload, .. } => payload.clone(),
        }
    }

    /// Whether this is a chat message that refers to a card.
    #[must_use]
    pub fn mentions_card(&self) -> bool {
        matches!(
            self,
            Move::ChatMessage {
                mentions_card: true,
                ..
            }
        )
    }
}

/// Serialized as a `[player, event_type, data]` triple; `player` is `null`
/// for moves not attributed to a player.
impl Serialize for Move {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut tuple = serializer.serialize_tuple(3)?;
        tuple.serialize_element(&self.player())?;
        tuple.serialize_element(self.event_type())?;
        tuple.serialize_element(&self.data())?;
        tuple.end()
    }
}

/// A move together with where it appeared in the transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordedMove {
    /// 1-based CSV record number.
    pub line: usize,
    /// Milliseconds since the start of the game, when recorded.
    pub timestamp: Option<u64>,
    #[serde(rename = "move")]
    pub action: Move,
}

/// Per-player limits and start locations announced in the transcript header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GameConfig {
    pub max_cards: [Option<u32>; 2],
    pub max_turns: [Option<u32>; 2],
    pub initial_locations: [Option<Position>; 2],
}

impl GameConfig {
    #[must_use]
    pub fn max_cards(&self, player: PlayerId) -> Option<u32> {
        self.max_cards[player.index()]
    }

    #[must_use]
    pub fn max_turns(&self, player: PlayerId) -> Option<u32> {
        self.max_turns[player.index()]
    }

    #[must_use]
    pub fn initial_location(&self, player: PlayerId) -> Option<Position> {
        self.initial_locations[player.index()]
    }
}
