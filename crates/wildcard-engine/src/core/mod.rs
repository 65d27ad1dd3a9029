pub use self::{board::*, card::*, placement::*, player::*};

pub(crate) mod board;
pub(crate) mod card;
pub mod mention;
pub(crate) mod placement;
pub(crate) mod player;
