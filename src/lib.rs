//! # Citadel - a terminal GraphQL data browser
//!
//! Citadel fetches and displays character, episode and user/post data from a
//! GraphQL API in the terminal, built on [ratatui](https://ratatui.rs/) and
//! the Elm Architecture (TEA):
//!
//! 1. **Model**: application state ([`app::App`])
//! 2. **Message**: events that can change the state
//! 3. **Update**: processes messages and updates the model
//! 4. **View**: renders the UI from the current model
//! 5. **Subscriptions**: external event sources (terminal input)
//! 6. **Commands**: asynchronous operations that produce messages
//!
//! ## Core Components
//!
//! - [`query::QueryHandle`]: the remote-query state machine. One logical
//!   query per screen, with attempt sequencing so a slow superseded response
//!   can never overwrite a fresher state.
//! - [`view::present`]: the total mapping from a [`query::QueryState`] to
//!   exactly one presentation (loading, failure, not-found, no-results,
//!   content).
//! - [`transport::GraphqlClient`]: the single shared HTTP/GraphQL boundary
//!   with error classification and a process-wide response cache.
//! - [`api`]: the typed query contracts whose field names are the wire
//!   contract.
//!
//! The runtime pieces ([`application::Application`], [`runtime::Runtime`],
//! [`command::Command`], [`subscription::Subscription`]) follow the TEA
//! pattern as adapted for TUI applications.

pub mod api;
pub mod app;
pub mod application;
pub mod command;
pub mod config;
pub mod prelude;
pub mod query;
pub mod runtime;
pub mod subscription;
pub mod transport;
pub mod view;
