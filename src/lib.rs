//! Rock, paper and scissors sprites chase their prey around a 500x500 arena.
//! Touching a prey converts it to the hunter's kind; the round ends when one
//! kind holds every sprite.
//!
//! [`world`] holds the simulation, [`session`] the menu / round / game-over
//! flow, and [`game`] draws it all with ggez.

pub mod config;
pub mod entity;
pub mod game;
pub mod session;
pub mod spatial;
pub mod ui;
pub mod world;
