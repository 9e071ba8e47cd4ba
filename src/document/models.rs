use std::{collections::HashMap, path::PathBuf};

use serde::Deserialize;

/// One entry of the document's `base_requests` array.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum BaseRequest {
    Stop {
        name: String,
        latitude: f64,
        longitude: f64,
        #[serde(default)]
        road_distances: HashMap<String, u32>,
    },
    Bus {
        name: String,
        is_roundtrip: bool,
        stops: Vec<String>,
    },
}

/// One entry of the document's `stat_requests` array.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum StatRequest {
    Bus { id: i64, name: String },
    Stop { id: i64, name: String },
    Route { id: i64, from: String, to: String },
}

/// `routing_settings` block, in document units (minutes, km/h).
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RoutingSettingsRequest {
    pub bus_wait_time: u32,
    pub bus_velocity: f64,
}

/// `serialization_settings` block naming the snapshot artifact.
#[derive(Debug, Clone, Deserialize)]
pub struct SerializationSettingsRequest {
    pub file: PathBuf,
}
