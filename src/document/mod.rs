use std::{
    io::{self, Read},
    path::Path,
};

use serde::Deserialize;
use thiserror::Error;
use tracing::info;

pub mod builder;
mod models;
mod response;

pub use models::*;
pub use response::answers;

use crate::{catalogue::Catalogue, router::RoutingSettings};

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Builder error: {0}")]
    Build(#[from] builder::Error),
    #[error("Document has no routing_settings block")]
    MissingRoutingSettings,
    #[error("Document has no serialization_settings block")]
    MissingSerializationSettings,
}

/// The structured input document: network description, settings blocks
/// and the query batch.
///
/// A document either parses whole or not at all, so applying one can
/// never leave a half-mutated catalogue behind.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub base_requests: Vec<BaseRequest>,
    #[serde(default)]
    pub stat_requests: Vec<StatRequest>,
    pub routing_settings: Option<RoutingSettingsRequest>,
    pub serialization_settings: Option<SerializationSettingsRequest>,
}

impl Document {
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, Error> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn from_json(json: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(json)?)
    }

    /// Loads the base requests into a catalogue: stops first, then road
    /// distances, then bus lines, so every name a later phase mentions
    /// is already registered.
    pub fn apply(&self, catalogue: &mut Catalogue) {
        let mut stops = 0;
        let mut buses = 0;
        for request in &self.base_requests {
            if let BaseRequest::Stop {
                name,
                latitude,
                longitude,
                ..
            } = request
            {
                catalogue.add_stop(
                    name,
                    crate::shared::geo::Coordinate {
                        latitude: *latitude,
                        longitude: *longitude,
                    },
                );
                stops += 1;
            }
        }
        for request in &self.base_requests {
            if let BaseRequest::Stop {
                name,
                road_distances,
                ..
            } = request
            {
                catalogue.set_distances(
                    name,
                    road_distances.iter().map(|(to, meters)| (to.as_str(), *meters)),
                );
            }
        }
        for request in &self.base_requests {
            if let BaseRequest::Bus {
                name,
                is_roundtrip,
                stops,
            } = request
            {
                catalogue.add_bus(name, *is_roundtrip, stops.iter().map(String::as_str));
                buses += 1;
            }
        }
        info!(stops, buses, "catalogue loaded");
    }

    /// The routing settings converted to internal units.
    /// Absence is fatal for any operation that needs a router.
    pub fn routing_settings(&self) -> Result<RoutingSettings, Error> {
        let settings = self
            .routing_settings
            .as_ref()
            .ok_or(Error::MissingRoutingSettings)?;
        Ok(RoutingSettings::from_kmh(
            settings.bus_wait_time,
            settings.bus_velocity,
        ))
    }

    /// The configured snapshot artifact path.
    /// Absence is fatal for persist and load operations.
    pub fn snapshot_path(&self) -> Result<&Path, Error> {
        Ok(&self
            .serialization_settings
            .as_ref()
            .ok_or(Error::MissingSerializationSettings)?
            .file)
    }
}
