//! # Campus FAQ
//!
//! A multilingual campus FAQ answering and triage service.
//!
//! Campus FAQ scores inbound questions against a fixed question/answer
//! corpus, answers confident matches, and routes everything else to a
//! human triage queue. Queries in any supported language are translated
//! to English for matching and answers are translated back, with a
//! best-effort provider chain that degrades to the original text rather
//! than failing the chat.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   ┌───────────────┐   ┌──────────────┐
//! │  Query   │──▶│ Language      │──▶│ Matcher       │
//! │ (any     │   │ Bridge        │   │ normalize +   │
//! │  lang)   │   │ detect/xlate  │   │ score corpus  │
//! └──────────┘   └──────┬────────┘   └──────┬───────┘
//!                       │                   │
//!                       │        answer ◀───┤───▶ escalate
//!                       ▼                   ▼        ▼
//!                 ┌──────────┐        ┌─────────┐ ┌────────┐
//!                 │ TTL      │        │ translate│ │ Triage │
//!                 │ cache    │        │ back     │ │ SQLite │
//!                 └──────────┘        └─────────┘ └────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! cfaq init                          # create database
//! cfaq ask "library hours"          # one-shot query
//! cfaq ask "hola, ¿horario?" --language es
//! cfaq queries list --status open   # triage queue
//! cfaq queries resolve <id> "Answer text"
//! cfaq serve http                   # start HTTP server
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Core data types |
//! | [`corpus`] | FAQ corpus loading and validation |
//! | [`text`] | Normalization and tokenization |
//! | [`score`] | Lexical relevance scoring |
//! | [`matcher`] | Corpus matching and escalation policy |
//! | [`lang`] | Heuristic language detection |
//! | [`cache`] | TTL translation cache |
//! | [`translate`] | Translation provider implementations |
//! | [`bridge`] | Language bridge orchestration |
//! | [`triage`] | Triage queue persistence |
//! | [`pipeline`] | End-to-end query flow |
//! | [`server`] | HTTP server |
//! | [`db`] | Database connection |
//! | [`migrate`] | Schema migrations |

pub mod bridge;
pub mod cache;
pub mod config;
pub mod corpus;
pub mod db;
pub mod lang;
pub mod matcher;
pub mod migrate;
pub mod models;
pub mod pipeline;
pub mod score;
pub mod server;
pub mod text;
pub mod translate;
pub mod triage;
