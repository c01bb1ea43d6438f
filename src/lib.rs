//! HTTP service for sharing music recommendations.
//!
//! Users submit a song name with a YouTube link, vote it up or down, and browse by
//! recency, top score, or a random pick that leans towards well-liked songs.
//! A recommendation whose score drops below -5 is deleted on the spot.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod services;
