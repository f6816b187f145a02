pub mod auto_close;
pub mod game;
pub mod lifecycle;
