use crate::domain::RenderSettings;
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Debug, Deserialize, Default)]
pub struct InputBlob {
    #[serde(default)]
    pub base_requests: Vec<BaseRequest>,
    #[serde(default)]
    pub stat_requests: Vec<StatRequest>,
    pub render_settings: Option<RawRenderSettings>,
    pub routing_settings: Option<RawRoutingSettings>,
    pub serialization_settings: Option<SerializationSettings>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
pub enum BaseRequest {
    Stop {
        name: String,
        latitude: f64,
        longitude: f64,
        #[serde(default)]
        road_distances: std::collections::BTreeMap<String, f64>,
    },
    Bus {
        name: String,
        stops: Vec<String>,
        is_roundtrip: bool,
    },
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
pub enum StatRequest {
    Stop { id: i64, name: String },
    Bus { id: i64, name: String },
    Map { id: i64 },
    Route { id: i64, from: String, to: String },
}

impl StatRequest {
    pub fn id(&self) -> i64 {
        match self {
            StatRequest::Stop { id, .. } | StatRequest::Bus { id, .. } | StatRequest::Map { id } | StatRequest::Route { id, .. } => *id,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SerializationSettings {
    pub file: String,
}

#[derive(Debug, Deserialize)]
pub struct RawRoutingSettings {
    pub bus_velocity: f64,
    pub bus_wait_time: u32,
}

// Passed through to crate::render untouched save for the (x, y) pairs that arrive
// as two-element JSON arrays. The core never interprets these fields itself.
#[derive(Debug, Deserialize)]
pub struct RawRenderSettings {
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

impl From<RawRenderSettings> for RenderSettings {
    fn from(raw: RawRenderSettings) -> Self {
        Self {
            width: raw.width,
            height: raw.height,
            padding: raw.padding,
            stop_radius: raw.stop_radius,
            line_width: raw.line_width,
            bus_label_font_size: raw.bus_label_font_size,
            bus_label_offset: raw.bus_label_offset,
            stop_label_font_size: raw.stop_label_font_size,
            stop_label_offset: raw.stop_label_offset,
            underlayer_color: raw.underlayer_color,
            underlayer_width: raw.underlayer_width,
            color_palette: raw.color_palette,
        }
    }
}

pub fn not_found_response(id: i64) -> Value {
    json!({ "request_id": id, "error_message": "not found" })
}

pub fn bus_response(id: i64, stop_count: usize, unique_stop_count: usize, route_length: f64, curvature: f64) -> Value {
    json!({
        "request_id": id,
        "curvature": curvature,
        "route_length": route_length.round() as i64,
        "stop_count": stop_count,
        "unique_stop_count": unique_stop_count,
    })
}

pub fn stop_response(id: i64, buses: &[String]) -> Value {
    json!({ "request_id": id, "buses": buses })
}

pub fn map_response(id: i64, svg: &str) -> Value {
    json!({ "request_id": id, "map": svg })
}

pub fn route_response(id: i64, total_time: f64, items: Vec<Value>) -> Value {
    json!({ "request_id": id, "total_time": total_time, "items": items })
}

pub fn wait_item(stop_name: &str, time: f64) -> Value {
    json!({ "type": "Wait", "stop_name": stop_name, "time": time })
}

pub fn ride_item(bus_name: &str, span_count: u32, time: f64) -> Value {
    json!({ "type": "Bus", "bus": bus_name, "span_count": span_count, "time": time })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_minimal_input_blob() {
        let blob: InputBlob = serde_json::from_str(
            r#"{
                "base_requests": [
                    {"type": "Stop", "name": "A", "latitude": 1.0, "longitude": 2.0, "road_distances": {"B": 100.0}},
                    {"type": "Bus", "name": "1", "stops": ["A", "B"], "is_roundtrip": false}
                ],
                "stat_requests": [
                    {"id": 1, "type": "Stop", "name": "A"},
                    {"id": 2, "type": "Route", "from": "A", "to": "B"}
                ],
                "routing_settings": {"bus_velocity": 40.0, "bus_wait_time": 6}
            }"#,
        )
        .unwrap();

        assert_eq!(blob.base_requests.len(), 2);
        assert_eq!(blob.stat_requests.len(), 2);
        assert_eq!(blob.stat_requests[1].id(), 2);
    }

    #[test]
    fn missing_optional_sections_default_to_empty() {
        let blob: InputBlob = serde_json::from_str("{}").unwrap();
        assert!(blob.base_requests.is_empty());
        assert!(blob.stat_requests.is_empty());
        assert!(blob.render_settings.is_none());
    }
}
