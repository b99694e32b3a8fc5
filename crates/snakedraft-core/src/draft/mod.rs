pub mod league;
pub mod lineup;
pub mod pick;
pub mod player;
pub mod team;
