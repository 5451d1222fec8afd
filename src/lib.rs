pub mod app;
pub mod config;
pub mod models;
pub mod normalize;
pub mod pages;
pub mod tmdb;
pub mod utils;
