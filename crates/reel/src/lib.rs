pub mod app;
pub mod carousel;
pub mod cli;
pub mod commands;
pub mod config;
pub mod deck;
pub mod frame_loop;
pub mod theme;
