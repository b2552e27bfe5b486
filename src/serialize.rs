use crate::catalogue::Catalogue;
use crate::domain::{Bus, CatalogueError, CatalogueResult, RenderSettings, RouteStep, RoutingSettings, Stop};
use crate::geo::Coordinates;
use crate::graph::{EdgeId, Graph, VertexId};
use crate::router::TransportRouter;
use prost::Message;
use std::collections::HashMap;
use std::io::{Read, Write};

pub mod proto {
    include!(concat!(env!("OUT_DIR"), "/transport_catalogue_serialize.rs"));
}

pub fn serialize_to_writer<W: Write>(
    catalogue: &Catalogue,
    render_settings: &RenderSettings,
    router: &TransportRouter,
    writer: &mut W,
) -> CatalogueResult<()> {
    let message = build_message(catalogue, render_settings, router);
    writer.write_all(&message.encode_to_vec()).map_err(|e| CatalogueError::Internal(e.to_string()))
}

pub fn deserialize_from_reader<R: Read>(reader: &mut R) -> CatalogueResult<(Catalogue, RenderSettings, TransportRouter)> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes).map_err(|e| CatalogueError::Internal(e.to_string()))?;
    let message = proto::TransportCatalogue::decode(bytes.as_slice()).map_err(|e| CatalogueError::Corrupt(e.to_string()))?;
    rebuild(message)
}

fn build_message(catalogue: &Catalogue, render_settings: &RenderSettings, router: &TransportRouter) -> proto::TransportCatalogue {
    let stop = (0..catalogue.stop_count())
        .map(|id| {
            let s = catalogue.stop(id);
            let neighbor = catalogue
                .distances()
                .filter(|&(from, _, _)| from == id)
                .map(|(_, to, distance)| proto::StopIdAndDistance { stop_id: to as u32, distance })
                .collect();
            proto::Stop {
                name: s.name.clone(),
                coords: Some(proto::Coordinates { lat: s.coords.lat, lon: s.coords.lon }),
                neighbor,
            }
        })
        .collect();

    let bus = catalogue
        .buses()
        .iter()
        .map(|b| proto::Bus {
            name: b.name.clone(),
            is_circular: b.is_circular,
            stop_id: b.stops.iter().map(|name| catalogue.stop_id(name).expect("bus references a known stop") as u32).collect(),
        })
        .collect();

    let renderer_settings = Some(proto::RenderSettings {
        width: render_settings.width,
        height: render_settings.height,
        padding: render_settings.padding,
        stop_radius: render_settings.stop_radius,
        line_width: render_settings.line_width,
        bus_label_font_size: render_settings.bus_label_font_size,
        bus_label_offset: vec![render_settings.bus_label_offset.0, render_settings.bus_label_offset.1],
        stop_label_font_size: render_settings.stop_label_font_size,
        stop_label_offset: vec![render_settings.stop_label_offset.0, render_settings.stop_label_offset.1],
        underlayer_color: render_settings.underlayer_color.clone(),
        underlayer_width: render_settings.underlayer_width,
        color_palette: render_settings.color_palette.clone(),
    });

    let routing_settings = router.routing_settings();
    let graph_edges = (0..router.graph().edge_count())
        .map(|id| {
            let e = router.graph().get_edge(id);
            proto::Edge { from: e.from as u32, to: e.to as u32, weight: e.weight }
        })
        .collect();

    let stopname_to_vertex_pair = router
        .stopname_vertex_pairs()
        .map(|(name, wait_vertex, ride_vertex)| proto::StopnameToVertexPair {
            key: name.to_string(),
            value: Some(proto::StopVertexPair { wait_vertex: wait_vertex as u32, ride_vertex: ride_vertex as u32 }),
        })
        .collect();

    let edge_id_to_route_step = router
        .route_steps()
        .map(|(edge_id, step)| proto::EdgeIdToRouteStep {
            key: edge_id as u32,
            value: Some(match step {
                RouteStep::Wait { stop_name, time } => proto::RouteStep {
                    step: Some(proto::route_step::Step::WaitItem(proto::WaitItem { stop_name: stop_name.clone(), time: *time })),
                },
                RouteStep::Ride { bus_name, span_count, time } => proto::RouteStep {
                    step: Some(proto::route_step::Step::RideItem(proto::RideItem {
                        bus_name: bus_name.clone(),
                        span_count: *span_count,
                        time: *time,
                    })),
                },
            }),
        })
        .collect();

    let router_message = Some(proto::Router {
        routing_settings: Some(proto::RoutingSettings { bus_velocity: routing_settings.bus_velocity, bus_wait_time: routing_settings.bus_wait_time }),
        graph: Some(proto::Graph { edge: graph_edges }),
        stopname_to_vertex_pair,
        edge_id_to_route_step,
    });

    proto::TransportCatalogue { stop, bus, renderer_settings, router: router_message }
}

fn rebuild(message: proto::TransportCatalogue) -> CatalogueResult<(Catalogue, RenderSettings, TransportRouter)> {
    let mut stops = Vec::with_capacity(message.stop.len());
    let mut distances = HashMap::new();
    for (id, s) in message.stop.iter().enumerate() {
        let coords = s.coords.as_ref().ok_or_else(|| CatalogueError::Corrupt("stop missing coordinates".to_string()))?;
        stops.push(Stop { name: s.name.clone(), coords: Coordinates::new(coords.lat, coords.lon), neighbor_distances: Default::default() });
        for n in &s.neighbor {
            distances.insert((id, n.stop_id as usize), n.distance);
        }
    }

    let stop_name_at = |id: u32| -> CatalogueResult<String> {
        stops.get(id as usize).map(|s| s.name.clone()).ok_or_else(|| CatalogueError::Corrupt("bus references an unknown stop id".to_string()))
    };
    let mut buses = Vec::with_capacity(message.bus.len());
    for b in &message.bus {
        let stop_names = b.stop_id.iter().map(|&id| stop_name_at(id)).collect::<CatalogueResult<Vec<_>>>()?;
        buses.push(Bus { name: b.name.clone(), stops: stop_names, is_circular: b.is_circular });
    }

    let catalogue = Catalogue::from_parts(stops, distances, buses);

    let renderer_settings = message.renderer_settings.ok_or_else(|| CatalogueError::Corrupt("missing renderer settings".to_string()))?;
    let render_settings = RenderSettings {
        width: renderer_settings.width,
        height: renderer_settings.height,
        padding: renderer_settings.padding,
        stop_radius: renderer_settings.stop_radius,
        line_width: renderer_settings.line_width,
        bus_label_font_size: renderer_settings.bus_label_font_size,
        bus_label_offset: pair(&renderer_settings.bus_label_offset)?,
        stop_label_font_size: renderer_settings.stop_label_font_size,
        stop_label_offset: pair(&renderer_settings.stop_label_offset)?,
        underlayer_color: renderer_settings.underlayer_color,
        underlayer_width: renderer_settings.underlayer_width,
        color_palette: renderer_settings.color_palette,
    };

    let router_message = message.router.ok_or_else(|| CatalogueError::Corrupt("missing router block".to_string()))?;
    let routing_settings_message = router_message.routing_settings.ok_or_else(|| CatalogueError::Corrupt("missing routing settings".to_string()))?;
    let routing_settings = RoutingSettings { bus_velocity: routing_settings_message.bus_velocity, bus_wait_time: routing_settings_message.bus_wait_time };

    let mut graph = Graph::new();
    let vertex_count = router_message.stopname_to_vertex_pair.iter().map(|p| p.value.as_ref().map(|v| v.ride_vertex + 1).unwrap_or(0)).max().unwrap_or(0);
    graph.set_vertex_count(vertex_count as usize);
    for e in &router_message.graph.unwrap_or_default().edge {
        graph.add_edge(e.from as VertexId, e.to as VertexId, e.weight);
    }

    let mut stopname_to_vertex = HashMap::new();
    for entry in &router_message.stopname_to_vertex_pair {
        let pair = entry.value.as_ref().ok_or_else(|| CatalogueError::Corrupt("vertex pair missing".to_string()))?;
        stopname_to_vertex.insert(entry.key.clone(), (pair.wait_vertex as VertexId, pair.ride_vertex as VertexId));
    }

    let mut edge_to_step: HashMap<EdgeId, RouteStep> = HashMap::new();
    for entry in &router_message.edge_id_to_route_step {
        let step = match entry.value.as_ref().and_then(|v| v.step.as_ref()) {
            Some(proto::route_step::Step::WaitItem(w)) => RouteStep::Wait { stop_name: w.stop_name.clone(), time: w.time },
            Some(proto::route_step::Step::RideItem(r)) => RouteStep::Ride { bus_name: r.bus_name.clone(), span_count: r.span_count, time: r.time },
            None => return Err(CatalogueError::Corrupt("route step missing both variants".to_string())),
        };
        edge_to_step.insert(entry.key as EdgeId, step);
    }

    let mut router = TransportRouter::new();
    router.restore(routing_settings, graph, stopname_to_vertex, edge_to_step);

    Ok((catalogue, render_settings, router))
}

fn pair(values: &[f64]) -> CatalogueResult<(f64, f64)> {
    match values {
        [a, b] => Ok((*a, *b)),
        _ => Err(CatalogueError::Corrupt("expected a two-element offset".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Bus as DomainBus;
    use crate::domain::Stop as DomainStop;
    use crate::geo::Coordinates as GeoCoordinates;
    use std::io::Cursor;

    fn build_catalogue() -> (Catalogue, RenderSettings, TransportRouter) {
        let mut catalogue = Catalogue::new();
        let mut a = DomainStop { name: "A".to_string(), coords: GeoCoordinates::new(0.0, 0.0), neighbor_distances: Default::default() };
        a.neighbor_distances.insert("B".to_string(), 4000.0);
        catalogue.add_stop(a).unwrap();
        catalogue.add_stop(DomainStop { name: "B".to_string(), coords: GeoCoordinates::new(0.0, 0.05), neighbor_distances: Default::default() }).unwrap();
        catalogue
            .add_bus(DomainBus { name: "1".to_string(), stops: vec!["A".into(), "B".into(), "A".into()], is_circular: true })
            .unwrap();

        let mut router = TransportRouter::new();
        router.set_up(&catalogue, RoutingSettings { bus_velocity: 40.0, bus_wait_time: 6 }).unwrap();

        (catalogue, RenderSettings::default(), router)
    }

    #[test]
    fn round_trip_preserves_stat_and_route_answers() {
        let (catalogue, render_settings, router) = build_catalogue();

        let mut bytes = Vec::new();
        serialize_to_writer(&catalogue, &render_settings, &router, &mut bytes).unwrap();

        let (restored_catalogue, restored_render_settings, restored_router) = deserialize_from_reader(&mut Cursor::new(bytes)).unwrap();

        assert_eq!(restored_catalogue.get_bus_info("1").unwrap(), catalogue.get_bus_info("1").unwrap());
        assert_eq!(restored_catalogue.get_stop_info("A").unwrap(), catalogue.get_stop_info("A").unwrap());
        assert_eq!(restored_render_settings.width, render_settings.width);

        let original_route = router.get_route("A", "B").unwrap();
        let restored_route = restored_router.get_route("A", "B").unwrap();
        assert!((original_route.total_time - restored_route.total_time).abs() < 1e-6);
        assert_eq!(original_route.items, restored_route.items);
    }
}
