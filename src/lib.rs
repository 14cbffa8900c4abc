//! Marketplace backend library
//!
//! JWT access/refresh tokens, bcrypt password hashing, role guards and
//! session resolution, plus the category, product and review CRUD surfaces
//! built on them.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod repository;
pub mod routes;
pub mod services;
pub mod state;
