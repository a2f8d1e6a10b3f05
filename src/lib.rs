pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod domain;
pub mod dto;
pub mod infrastructure;
pub mod models;
pub mod seed;
pub mod services;
