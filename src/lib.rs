//! Terminal browser for the Rick and Morty character API.
//!
//! The crate is a thin presentation layer over a remote GraphQL endpoint:
//! a query client ([`api`]), a pagination controller ([`feed`]), a species
//! autocomplete matcher ([`suggest`]), a sort/color view-model ([`view`]),
//! two-language UI strings ([`i18n`]), and a ratatui front end
//! ([`app`], [`ui`]).

pub mod api;
pub mod app;
pub mod config;
pub mod feed;
pub mod i18n;
pub mod logging;
pub mod suggest;
pub mod ui;
pub mod view;
