use std::{fs::File, io, path::Path};

use crate::{
    TranscriptError, TranscriptErrorKind,
    core::{Board, Card, CardPlacement, PlayerId, Position, mention},
};

use super::moves::{GameConfig, Move, RecordedMove, event_type};

const SECTION_MARKER: &str = "NEW_SECTION";

/// A parsed transcript: the static world plus the append-only move log.
///
/// Parsing is all-or-nothing; a transcript that parsed successfully always
/// has a board, and every move in it carries well-formed coordinates and
/// cards. Game states are derived on demand with [`Transcript::step`] and
/// [`Transcript::evolve`].
#[derive(Debug, Clone)]
pub struct Transcript {
    board: Board,
    placement: CardPlacement,
    config: GameConfig,
    moves: Vec<RecordedMove>,
}

impl Transcript {
    pub fn from_path<P>(path: P) -> Result<Self, TranscriptError>
    where
        P: AsRef<Path>,
    {
        let file = File::open(path.as_ref())
            .map_err(|e| TranscriptError::new(0, csv::Error::from(e).into()))?;
        Self::from_reader(io::BufReader::new(file))
    }

    /// Parses CSV records of the form `agent,timestamp,eventType,payload`.
    pub fn from_reader<R>(reader: R) -> Result<Self, TranscriptError>
    where
        R: io::Read,
    {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let mut builder = TranscriptBuilder::default();
        for (i, record) in reader.records().enumerate() {
            let line = i + 1;
            let record = record.map_err(|e| TranscriptError::new(line, e.into()))?;
            let fields = record.iter().collect::<Vec<_>>();
            builder
                .push_row(line, &fields)
                .map_err(|kind| TranscriptError::new(line, kind))?;
        }
        builder.finish()
    }

    /// Parses already-split records.
    pub fn from_rows<I, R, S>(rows: I) -> Result<Self, TranscriptError>
    where
        I: IntoIterator<Item = R>,
        R: AsRef<[S]>,
        S: AsRef<str>,
    {
        let mut builder = TranscriptBuilder::default();
        for (i, row) in rows.into_iter().enumerate() {
            let line = i + 1;
            let fields: Vec<&str> = row.as_ref().iter().map(|s| s.as_ref()).collect();
            builder
                .push_row(line, &fields)
                .map_err(|kind| TranscriptError::new(line, kind))?;
        }
        builder.finish()
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Card distribution before any move is applied.
    #[must_use]
    pub fn placement(&self) -> &CardPlacement {
        &self.placement
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub fn moves(&self) -> &[RecordedMove] {
        &self.moves
    }

    #[must_use]
    pub fn num_moves(&self) -> usize {
        self.moves.len()
    }
}

#[derive(Debug, Default)]
struct TranscriptBuilder {
    board: Option<Board>,
    placement: CardPlacement,
    config: GameConfig,
    moves: Vec<RecordedMove>,
}

impl TranscriptBuilder {
    fn push_row(&mut self, line: usize, fields: &[&str]) -> Result<(), TranscriptErrorKind> {
        let &[agent, timestamp, event, payload] = fields else {
            return Err(TranscriptErrorKind::FieldCount(fields.len()));
        };
        let timestamp = parse_timestamp(timestamp)?;

        let action = match event {
            event_type::CREATE_ENVIRONMENT => {
                let (board, placement) = decode_environment(payload)?;
                log::debug!(
                    "environment: {}x{} board, {} cards",
                    board.height(),
                    board.width(),
                    placement.num_cards()
                );
                self.board = Some(board);
                self.placement = placement;
                return Ok(());
            }
            event_type::P1_MAX_CARDS => {
                self.config.max_cards[0] = Some(parse_integer(event, payload)?);
                return Ok(());
            }
            event_type::P2_MAX_CARDS => {
                self.config.max_cards[1] = Some(parse_integer(event, payload)?);
                return Ok(());
            }
            event_type::P1_MAX_TURNS => {
                self.config.max_turns[0] = Some(parse_integer(event, payload)?);
                return Ok(());
            }
            event_type::P2_MAX_TURNS => {
                self.config.max_turns[1] = Some(parse_integer(event, payload)?);
                return Ok(());
            }
            event_type::PLAYER_INITIAL_LOCATION => {
                let player = player_of(agent, event)?;
                let pos = parse_position(payload)?;
                let board = self
                    .board
                    .as_mut()
                    .ok_or(TranscriptErrorKind::BoardNotCreated)?;
                if !board.mark_player_start(pos, player) {
                    return Err(TranscriptErrorKind::OutOfBounds(pos));
                }
                self.config.initial_locations[player.index()] = Some(pos);
                return Ok(());
            }
            event_type::PLAYER_MOVE => Move::PlayerMove {
                player: player_of(agent, event)?,
                to: parse_position(payload)?,
            },
            event_type::PLAYER_PICKUP_CARD => {
                let (at, card) = parse_card_payload(payload)?;
                Move::PickupCard {
                    player: player_of(agent, event)?,
                    at,
                    card,
                }
            }
            event_type::PLAYER_DROP_CARD => {
                let (at, card) = parse_card_payload(payload)?;
                Move::DropCard {
                    player: player_of(agent, event)?,
                    at,
                    card,
                }
            }
            event_type::CHAT_MESSAGE_PREFIX => Move::ChatMessage {
                player: player_of(agent, event)?,
                text: payload.to_owned(),
                mentions_card: mention::mentions_card(payload),
            },
            event_type::TASK_COMPLETE_CLICKED => Move::TaskComplete {
                player: player_of(agent, event)?,
            },
            _ if event_type::METADATA.contains(&event) => return Ok(()),
            _ => {
                log::debug!("line {line}: unrecognized event type '{event}'");
                Move::Unrecognized {
                    agent: agent.to_owned(),
                    event_type: event.to_owned(),
                    payload: payload.to_owned(),
                }
            }
        };

        self.moves.push(RecordedMove {
            line,
            timestamp,
            action,
        });
        Ok(())
    }

    fn finish(self) -> Result<Transcript, TranscriptError> {
        let board = self
            .board
            .ok_or_else(|| TranscriptError::new(0, TranscriptErrorKind::MissingEnvironment))?;
        Ok(Transcript {
            board,
            placement: self.placement,
            config: self.config,
            moves: self.moves,
        })
    }
}

/// Decodes a `CREATE_ENVIRONMENT` payload into the board and initial card placement.
///
/// The payload is a `;`-separated list: row strings up to the first token
/// starting with `NEW_SECTION`, then `"<row>,<col>:<card>"` entries (the
/// first one carrying the `NEW_SECTION` prefix). Empty tokens are skipped.
///
/// # Example
///
/// ```
/// use wildcard_engine::{Cell, Position, decode_environment};
///
/// let (board, placement) = decode_environment("---;-b ;NEW_SECTION1,2:QS;0,1:AD").unwrap();
/// assert_eq!(board.cell(Position::new(1, 1)), Some(Cell::HiddenWall));
/// assert_eq!(placement.position_of("QS".parse().unwrap()), Some(Position::new(1, 2)));
/// ```
pub fn decode_environment(payload: &str) -> Result<(Board, CardPlacement), TranscriptErrorKind> {
    let mut tokens = payload.split(';').peekable();

    let mut rows = vec![];
    while let Some(token) = tokens.next_if(|t| !t.starts_with(SECTION_MARKER)) {
        if !token.is_empty() {
            rows.push(token);
        }
    }
    let board = Board::from_rows(rows)?;

    let mut placement = CardPlacement::new();
    for token in tokens {
        let token = token.strip_prefix(SECTION_MARKER).unwrap_or(token);
        if token.trim().is_empty() {
            continue;
        }
        let (pos, card) = parse_card_payload(token)?;
        placement.insert(pos, card);
    }
    Ok((board, placement))
}

fn parse_timestamp(s: &str) -> Result<Option<u64>, TranscriptErrorKind> {
    let s = s.trim();
    if s.is_empty() {
        return Ok(None);
    }
    s.parse()
        .map(Some)
        .map_err(|_| TranscriptErrorKind::InvalidTimestamp(s.to_owned()))
}

fn parse_integer(event: &str, payload: &str) -> Result<u32, TranscriptErrorKind> {
    payload
        .trim()
        .parse()
        .map_err(|_| TranscriptErrorKind::InvalidInteger {
            event_type: event.to_owned(),
            value: payload.to_owned(),
        })
}

fn parse_position(s: &str) -> Result<Position, TranscriptErrorKind> {
    Position::parse(s).ok_or_else(|| TranscriptErrorKind::InvalidCoordinates(s.to_owned()))
}

fn parse_card_payload(s: &str) -> Result<(Position, Card), TranscriptErrorKind> {
    let invalid = || TranscriptErrorKind::InvalidCardPayload(s.to_owned());
    let (pos, card) = s.split_once(':').ok_or_else(invalid)?;
    let pos = Position::parse(pos).ok_or_else(invalid)?;
    let card = card.parse()?;
    Ok((pos, card))
}

fn player_of(agent: &str, event: &str) -> Result<PlayerId, TranscriptErrorKind> {
    PlayerId::from_agent(agent).ok_or_else(|| TranscriptErrorKind::UnknownAgent {
        event_type: event.to_owned(),
        agent: agent.to_owned(),
    })
}
