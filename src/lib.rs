//! Workout tracking REST backend.
//!
//! Two iterations of the API are served from the same code: an open one
//! where workouts are global, and a secured one where users sign up, receive
//! a bearer token, and only ever see the workouts they created.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod state;
pub mod users;
pub mod validation;
pub mod workouts;
