//! Prospect Pessoa Física API Library
//!
//! This library provides the core functionality of the prospect service:
//! CPF normalization, the in-memory service queue, prospect storage
//! (PostgreSQL or in-memory), validation and the HTTP handlers.
//!
//! # Modules
//!
//! - `api`: API-layer components.
//! - `core`: Core business logic.
//! - `data`: Data access layer.
//! - `config`: Configuration management.
//! - `cpf`: CPF normalization.
//! - `db`: Database connection and schema bootstrap.
//! - `db_storage`: PostgreSQL prospect store.
//! - `errors`: Error handling types and their HTTP mapping.
//! - `handlers`: HTTP request handlers.
//! - `models`: Domain and request models.
//! - `openapi`: OpenAPI document and Swagger UI.
//! - `queue`: In-memory service queue.
//! - `routes`: Router assembly.
//! - `services`: Prospect business operations.
//! - `store`: Storage trait and in-memory store.
//! - `validation`: Request field validation.

pub mod api;
pub mod core;
pub mod data;

// Re-export primary modules for shared use in tests and other binaries
pub mod config;
pub mod cpf;
pub mod db;
pub mod db_storage;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod openapi;
pub mod queue;
pub mod routes;
pub mod services;
pub mod store;
pub mod validation;
