use std::fmt;

use serde::{Deserialize, Serialize};

use super::player::PlayerId;

/// A grid coordinate as written in transcripts: `"<row>,<col>"`.
///
/// Serialized as a `[row, col]` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    #[must_use]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Parses `"<row>,<col>"`. Exactly two non-negative integers are required.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let (row, col) = s.split_once(',')?;
        let row = row.trim().parse().ok()?;
        let col = col.trim().parse().ok()?;
        Some(Self { row, col })
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.row, self.col)
    }
}

impl Serialize for Position {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        (self.row, self.col).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Position {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let (row, col) = <(usize, usize)>::deserialize(deserializer)?;
        Ok(Self { row, col })
    }
}

/// Classification of a single board cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum Cell {
    Open,
    Wall,
    /// Wall the players cannot see until they are next to it.
    HiddenWall,
    PlayerStart(PlayerId),
}

impl Cell {
    /// Decodes one character of an environment row string.
    #[must_use]
    pub const fn from_char(c: char) -> Self {
        match c {
            '-' => Cell::Wall,
            'b' => Cell::HiddenWall,
            _ => Cell::Open,
        }
    }

    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Cell::Open => '.',
            Cell::Wall => '-',
            Cell::HiddenWall => 'b',
            Cell::PlayerStart(PlayerId::One) => '1',
            Cell::PlayerStart(PlayerId::Two) => '2',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("board row {row} has {actual} cells, expected {expected}")]
pub struct RaggedBoardError {
    pub row: usize,
    pub expected: usize,
    pub actual: usize,
}

/// The static layout of a game world: walls, hidden walls and open floor.
///
/// Built once from the `CREATE_ENVIRONMENT` event; afterwards only the
/// player start cells are marked while the transcript header is read.
///
/// Serialized as a list of row strings using [`Cell::as_char`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Board {
    /// Builds a board from its row strings. All rows must have the same length.
    pub fn from_rows<I, S>(rows: I) -> Result<Self, RaggedBoardError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut width = None;
        let mut height = 0;
        let mut cells = vec![];
        for (row, line) in rows.into_iter().enumerate() {
            let start = cells.len();
            cells.extend(line.as_ref().chars().map(Cell::from_char));
            let actual = cells.len() - start;
            let expected = *width.get_or_insert(actual);
            if actual != expected {
                return Err(RaggedBoardError {
                    row,
                    expected,
                    actual,
                });
            }
            height += 1;
        }
        Ok(Self {
            width: width.unwrap_or(0),
            height,
            cells,
        })
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    #[must_use]
    pub fn contains(&self, pos: Position) -> bool {
        pos.row < self.height && pos.col < self.width
    }

    #[must_use]
    pub fn cell(&self, pos: Position) -> Option<Cell> {
        self.contains(pos)
            .then(|| self.cells[pos.row * self.width + pos.col])
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> + '_ {
        self.cells.chunks(self.width.max(1))
    }

    pub(crate) fn mark_player_start(&mut self, pos: Position, player: PlayerId) -> bool {
        if !self.contains(pos) {
            return false;
        }
        self.cells[pos.row * self.width + pos.col] = Cell::PlayerStart(player);
        true
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            for cell in row {
                write!(f, "{}", cell.as_char())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl Serialize for Board {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_seq(
            self.rows()
                .map(|row| row.iter().map(|c| c.as_char()).collect::<String>()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rows_decodes_cells() {
        let board = Board::from_rows(["--b-", "- x-", "----"]).unwrap();
        assert_eq!(board.width(), 4);
        assert_eq!(board.height(), 3);
        assert_eq!(board.cell(Position::new(0, 0)), Some(Cell::Wall));
        assert_eq!(board.cell(Position::new(0, 2)), Some(Cell::HiddenWall));
        assert_eq!(board.cell(Position::new(1, 1)), Some(Cell::Open));
        assert_eq!(board.cell(Position::new(1, 2)), Some(Cell::Open));
        assert_eq!(board.cell(Position::new(3, 0)), None);
        assert_eq!(board.cell(Position::new(0, 4)), None);
    }

    #[test]
    fn test_from_rows_rejects_ragged_rows() {
        let err = Board::from_rows(["---", "--", "---"]).unwrap_err();
        assert_eq!(
            err,
            RaggedBoardError {
                row: 1,
                expected: 3,
                actual: 2,
            }
        );
    }

    #[test]
    fn test_mark_player_start() {
        let mut board = Board::from_rows(["   ", "   "]).unwrap();
        assert!(board.mark_player_start(Position::new(1, 2), PlayerId::Two));
        assert!(!board.mark_player_start(Position::new(2, 0), PlayerId::One));
        assert_eq!(
            board.cell(Position::new(1, 2)),
            Some(Cell::PlayerStart(PlayerId::Two))
        );
        assert_eq!(board.to_string(), "...\n..2\n");
    }

    #[test]
    fn test_position_parse() {
        assert_eq!(Position::parse("8,10"), Some(Position::new(8, 10)));
        assert_eq!(Position::parse(" 3 , 4"), Some(Position::new(3, 4)));
        assert_eq!(Position::parse("8"), None);
        assert_eq!(Position::parse("8,10,2"), None);
        assert_eq!(Position::parse("-1,2"), None);
        assert_eq!(Position::parse("a,b"), None);
    }

    #[test]
    fn test_serialize_board_as_rows() {
        let board = Board::from_rows(["-b", " -"]).unwrap();
        let json = serde_json::to_string(&board).unwrap();
        assert_eq!(json, r#"["-b",".-"]"#);
    }
}
