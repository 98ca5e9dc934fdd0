//! Discussion Service
//!
//! CRUD service for discussions over PostgreSQL, exposed through REST
//! endpoints and a structured query endpoint behind bearer authentication.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
