//! # Product Search
//!
//! A SQLite-backed product catalog with case-insensitive keyword search.
//!
//! A product matches a keyword when its name, description, brand or
//! category contains the keyword as a substring, ignoring case. There is no
//! tokenization or ranking; results come back in ascending id order.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   ┌──────────┐
//! │   CLI    │   │   HTTP   │
//! │(psearch) │   │  (axum)  │
//! └────┬─────┘   └────┬─────┘
//!      └──────┬───────┘
//!             ▼
//!      ┌──────────────┐   ┌──────────┐
//!      │ ProductStore │──▶│  SQLite  │
//!      └──────────────┘   └──────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! psearch init                       # create database
//! psearch import products.json       # load a catalog
//! psearch search "acme"              # keyword search
//! psearch serve                      # start HTTP API
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Product types |
//! | [`store`] | Storage trait, SQLite and in-memory backends |
//! | [`search`] | Keyword search entry point |
//! | [`catalog`] | Add, import, list, get, delete commands |
//! | [`export`] | JSON export |
//! | [`stats`] | Catalog statistics |
//! | [`server`] | HTTP API |
//! | [`db`] | Database connection |
//! | [`migrate`] | Schema migrations |
//! | [`error`] | Storage error type |

pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod export;
pub mod migrate;
pub mod models;
pub mod search;
pub mod server;
pub mod stats;
pub mod store;
