#![warn(clippy::all, rust_2018_idioms)]

mod app;
pub use app::{App, AppError};

pub mod assets;
pub mod canvas;
pub mod collision;
pub mod config;
pub mod drawable;
pub mod entity;
pub mod game;
pub mod geometry;
pub mod input;
pub mod scene;
