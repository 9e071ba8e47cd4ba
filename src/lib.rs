//! A routable public-transit catalogue.
//!
//! Build phase: ingest a network document into a [`catalogue::Catalogue`],
//! construct a [`router::Router`] over it and persist everything with
//! [`snapshot::save`]. Serve phase: [`snapshot::load`] the artifact back
//! and answer stat and route queries without repeating the build.

pub mod catalogue;
pub mod document;
pub mod router;
pub mod shared;
pub mod snapshot;
