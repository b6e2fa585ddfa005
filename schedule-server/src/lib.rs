//! Class schedule and bus departure server.
//!
//! A small personal web app that shows an uploaded class-schedule image
//! and the next departures for user-defined bus routes, all kept in a
//! local JSON file.

pub mod config;
pub mod domain;
pub mod store;
pub mod web;
