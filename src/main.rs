use std::fs::File;
use std::io::{self, Read, Write};
use std::process::ExitCode;

use transport_catalogue::domain::{ErrorKind, RenderSettings, RouteStep};
use transport_catalogue::render::render_map;
use transport_catalogue::request::{
    bus_response, map_response, not_found_response, ride_item, route_response, stop_response, wait_item, InputBlob, StatRequest,
};
use transport_catalogue::serialize::{deserialize_from_reader, serialize_to_writer};
use transport_catalogue::{build_router, extended_bus_infos, ingest};

fn main() -> ExitCode {
    env_logger::init();

    let mode = std::env::args().nth(1);
    let result = match mode.as_deref() {
        Some("make_base") => make_base(),
        Some("process_requests") => process_requests(),
        _ => {
            log::error!("usage: transport_catalogue <make_base|process_requests>");
            return ExitCode::FAILURE;
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            log::error!("{message}");
            ExitCode::FAILURE
        }
    }
}

fn make_base() -> Result<(), String> {
    let mut input = String::new();
    io::stdin().read_to_string(&mut input).map_err(|e| e.to_string())?;
    let blob: InputBlob = serde_json::from_str(&input).map_err(|e| format!("invalid input blob: {e}"))?;

    let catalogue = ingest(blob.base_requests).map_err(|e| e.to_string())?;

    let routing_settings = blob
        .routing_settings
        .map(|r| transport_catalogue::domain::RoutingSettings { bus_velocity: r.bus_velocity, bus_wait_time: r.bus_wait_time })
        .ok_or("missing routing_settings")?;
    let router = build_router(&catalogue, routing_settings).map_err(|e| e.to_string())?;

    let render_settings: RenderSettings = blob.render_settings.map(Into::into).unwrap_or_default();

    let serialization_settings = blob.serialization_settings.ok_or("missing serialization_settings")?;
    let mut file = File::create(&serialization_settings.file).map_err(|e| e.to_string())?;
    serialize_to_writer(&catalogue, &render_settings, &router, &mut file).map_err(|e| e.to_string())?;

    Ok(())
}

fn process_requests() -> Result<(), String> {
    let mut input = String::new();
    io::stdin().read_to_string(&mut input).map_err(|e| e.to_string())?;
    let blob: InputBlob = serde_json::from_str(&input).map_err(|e| format!("invalid input blob: {e}"))?;

    let serialization_settings = blob.serialization_settings.ok_or("missing serialization_settings")?;
    let mut file = File::open(&serialization_settings.file).map_err(|e| e.to_string())?;
    let (catalogue, render_settings, router) = deserialize_from_reader(&mut file).map_err(|e| e.to_string())?;

    let mut responses = Vec::with_capacity(blob.stat_requests.len());
    for request in &blob.stat_requests {
        let id = request.id();
        let response = match request {
            StatRequest::Stop { name, .. } => match catalogue.get_stop_info(name) {
                Ok(info) => stop_response(id, &info.buses),
                Err(e) if e.kind() == ErrorKind::NotFound => not_found_response(id),
                Err(e) => return Err(e.to_string()),
            },
            StatRequest::Bus { name, .. } => match catalogue.get_bus_info(name) {
                Ok(info) => bus_response(id, info.stops_count, info.unique_stops_count, info.route_length, info.route_curvature),
                Err(e) if e.kind() == ErrorKind::NotFound => not_found_response(id),
                Err(e) => return Err(e.to_string()),
            },
            StatRequest::Map { .. } => {
                let buses = extended_bus_infos(&catalogue).map_err(|e| e.to_string())?;
                let svg = render_map(&render_settings, &buses);
                map_response(id, &svg)
            }
            StatRequest::Route { from, to, .. } => match router.get_route(from, to) {
                Ok(route) => {
                    let items = route
                        .items
                        .iter()
                        .map(|step| match step {
                            RouteStep::Wait { stop_name, time } => wait_item(stop_name, *time),
                            RouteStep::Ride { bus_name, span_count, time } => ride_item(bus_name, *span_count, *time),
                        })
                        .collect();
                    route_response(id, route.total_time, items)
                }
                Err(e) if e.kind() == ErrorKind::NotFound => not_found_response(id),
                Err(e) => return Err(e.to_string()),
            },
        };
        responses.push(response);
    }

    let output = serde_json::Value::Array(responses);
    io::stdout().write_all(output.to_string().as_bytes()).map_err(|e| e.to_string())?;

    Ok(())
}
