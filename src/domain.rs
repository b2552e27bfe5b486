use crate::geo::Coordinates;
use std::collections::BTreeMap;

// NotFound/InvalidInput on a single request are reported back to the caller as a
// per-request error and never abort the batch. Corrupt/Internal are fatal.
#[derive(thiserror::Error, Debug)]
pub enum CatalogueError {
    #[error("not found")]
    NotFound,
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("corrupt serialized state: {0}")]
    Corrupt(String),
    #[error("internal invariant violated: {0}")]
    Internal(String),
}

pub type CatalogueResult<T> = Result<T, CatalogueError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    InvalidInput,
    Corrupt,
    Internal,
}

impl CatalogueError {
    // Classifies this error for the CLI layer.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CatalogueError::NotFound => ErrorKind::NotFound,
            CatalogueError::InvalidInput(_) => ErrorKind::InvalidInput,
            CatalogueError::Corrupt(_) => ErrorKind::Corrupt,
            CatalogueError::Internal(_) => ErrorKind::Internal,
        }
    }
}

// A stop referenced only as someone else's neighbor (not yet declared itself) is a
// dummy: coords defaults to (0, 0) until a real declaration for it arrives.
#[derive(Debug, Clone, Default)]
pub struct Stop {
    pub name: String,
    pub coords: Coordinates,
    pub neighbor_distances: BTreeMap<String, f64>,
}

#[derive(Debug, Clone)]
pub struct Bus {
    pub name: String,
    pub stops: Vec<String>,
    pub is_circular: bool,
}

impl Bus {
    // Number of stop visits along the effective traversal: the declared length for a
    // circular route, or 2N - 1 for a there-and-back route.
    pub fn effective_stop_count(&self) -> usize {
        if self.is_circular {
            self.stops.len()
        } else {
            2 * self.stops.len() - 1
        }
    }

    // Stop name visited at position i of the effective traversal.
    pub fn stop_at(&self, i: usize) -> &str {
        let n = self.stops.len();
        if i < n {
            &self.stops[i]
        } else {
            &self.stops[2 * n - 2 - i]
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StopInfo {
    pub name: String,
    pub buses: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BusInfo {
    pub name: String,
    pub stops_count: usize,
    pub unique_stops_count: usize,
    pub route_length: f64,
    pub route_curvature: f64,
}

// Ordered (stop_name, coords) pairs as a bus declares them, for the renderer.
pub struct BusExtendedInfo {
    pub name: String,
    pub is_circular: bool,
    pub stops_and_coordinates: Vec<(String, Coordinates)>,
}

#[derive(Debug, Clone, Copy)]
pub struct RoutingSettings {
    pub bus_velocity: f64,
    pub bus_wait_time: u32,
}

// Opaque to the core. Round-tripped through the serializer but never interpreted
// outside crate::render.
#[derive(Debug, Clone)]
pub struct RenderSettings {
    pub width: f64,
    pub height: f64,
    pub padding: f64,
    pub stop_radius: f64,
    pub line_width: f64,
    pub bus_label_font_size: f64,
    pub bus_label_offset: (f64, f64),
    pub stop_label_font_size: f64,
    pub stop_label_offset: (f64, f64),
    pub underlayer_color: String,
    pub underlayer_width: f64,
    pub color_palette: Vec<String>,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            width: 600.0,
            height: 400.0,
            padding: 50.0,
            stop_radius: 5.0,
            line_width: 14.0,
            bus_label_font_size: 20.0,
            bus_label_offset: (7.0, 15.0),
            stop_label_font_size: 20.0,
            stop_label_offset: (7.0, -3.0),
            underlayer_color: "white".to_string(),
            underlayer_width: 3.0,
            color_palette: vec!["green".to_string(), "red".to_string(), "blue".to_string()],
        }
    }
}

// Either standing at a stop until boarding, or riding a bus for a number of hops.
// No empty/monostate variant here.
#[derive(Debug, Clone, PartialEq)]
pub enum RouteStep {
    Wait { stop_name: String, time: f64 },
    Ride { bus_name: String, span_count: u32, time: f64 },
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct RouteInfo {
    pub total_time: f64,
    pub items: Vec<RouteStep>,
}
