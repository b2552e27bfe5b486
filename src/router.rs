// Every stop expands to a wait vertex and a ride vertex, so that boarding a bus
// always costs exactly one wait edge and changing buses always forces a trip back
// through a wait vertex.

use crate::catalogue::Catalogue;
use crate::dijkstra::Dijkstra;
use crate::domain::{CatalogueError, CatalogueResult, RouteInfo, RouteStep, RoutingSettings};
use crate::graph::{EdgeId, Graph, VertexId};
use std::collections::HashMap;

const METERS_PER_KILOMETER: f64 = 1000.0;
const MINUTES_PER_HOUR: f64 = 60.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RouterState {
    Empty,
    Built,
    Invalid,
}

#[derive(Debug, Clone, Copy)]
struct StopVertexPair {
    wait_vertex: VertexId,
    ride_vertex: VertexId,
}

pub struct TransportRouter {
    state: RouterState,
    routing_settings: RoutingSettings,
    graph: Graph,
    dijkstra: Dijkstra,
    stopname_to_vertex: HashMap<String, StopVertexPair>,
    edge_to_step: HashMap<EdgeId, RouteStep>,
}

impl Default for TransportRouter {
    fn default() -> Self {
        Self {
            state: RouterState::Empty,
            routing_settings: RoutingSettings { bus_velocity: 1.0, bus_wait_time: 0 },
            graph: Graph::new(),
            dijkstra: Dijkstra::new(),
            stopname_to_vertex: HashMap::new(),
            edge_to_step: HashMap::new(),
        }
    }
}

impl TransportRouter {
    pub fn new() -> Self {
        Self::default()
    }

    // Builds the transfer graph, runs Dijkstra once, moves the router into Built.
    pub fn set_up(&mut self, catalogue: &Catalogue, routing_settings: RoutingSettings) -> CatalogueResult<()> {
        if routing_settings.bus_velocity <= 0.0 {
            self.state = RouterState::Invalid;
            return Err(CatalogueError::InvalidInput("bus_velocity must be positive".to_string()));
        }

        self.routing_settings = routing_settings;
        self.graph = Graph::new();
        self.stopname_to_vertex.clear();
        self.edge_to_step.clear();

        let stop_names: Vec<String> = catalogue.stop_names().map(str::to_string).collect();
        self.graph.set_vertex_count(stop_names.len() * 2);

        for (idx, name) in stop_names.iter().enumerate() {
            let wait_vertex = idx * 2;
            let ride_vertex = wait_vertex + 1;
            self.stopname_to_vertex.insert(name.clone(), StopVertexPair { wait_vertex, ride_vertex });
            let wait_time = routing_settings.bus_wait_time as f64;
            let edge_id = self.graph.add_edge(wait_vertex, ride_vertex, wait_time);
            self.edge_to_step.insert(edge_id, RouteStep::Wait { stop_name: name.clone(), time: wait_time });
        }

        let meters_to_minutes = (1.0 / METERS_PER_KILOMETER) * (1.0 / routing_settings.bus_velocity) * MINUTES_PER_HOUR;

        let bus_names: Vec<String> = catalogue.bus_names().map(str::to_string).collect();
        for bus_name in &bus_names {
            let bus = catalogue.get_bus_extended_info(bus_name)?;
            let stop_count = bus.stops_and_coordinates.len();
            let effective_count = if bus.is_circular { stop_count } else { 2 * stop_count - 1 };
            let stop_at = |i: usize| -> &str {
                if i < stop_count {
                    &bus.stops_and_coordinates[i].0
                } else {
                    &bus.stops_and_coordinates[2 * stop_count - 2 - i].0
                }
            };

            for i in 0..effective_count - 1 {
                let mut meters = 0.0;
                for j in (i + 1)..effective_count {
                    meters += catalogue.get_distance(stop_at(j - 1), stop_at(j))?;
                    let time = meters * meters_to_minutes;
                    let ride_vertex = self.stopname_to_vertex[stop_at(i)].ride_vertex;
                    let wait_vertex = self.stopname_to_vertex[stop_at(j)].wait_vertex;
                    let edge_id = self.graph.add_edge(ride_vertex, wait_vertex, time);
                    self.edge_to_step.insert(
                        edge_id,
                        RouteStep::Ride { bus_name: bus_name.clone(), span_count: (j - i) as u32, time },
                    );
                }
            }
        }

        self.dijkstra.update(&self.graph);
        self.state = RouterState::Built;
        Ok(())
    }

    pub fn get_route(&self, from_stop: &str, to_stop: &str) -> CatalogueResult<RouteInfo> {
        if self.state != RouterState::Built {
            return Err(CatalogueError::Internal("router queried before it was built".to_string()));
        }

        let from = self.stopname_to_vertex.get(from_stop).ok_or(CatalogueError::NotFound)?;
        let to = self.stopname_to_vertex.get(to_stop).ok_or(CatalogueError::NotFound)?;

        if from_stop == to_stop {
            return Ok(RouteInfo::default());
        }

        let built = self.dijkstra.build_route(&self.graph, from.wait_vertex, to.wait_vertex).ok_or(CatalogueError::NotFound)?;

        let items = built
            .edges
            .iter()
            .map(|&edge_id| self.edge_to_step.get(&edge_id).cloned().ok_or_else(|| CatalogueError::Internal("edge with no route step".to_string())))
            .collect::<CatalogueResult<Vec<_>>>()?;

        Ok(RouteInfo { total_time: built.weight, items })
    }

    pub fn routing_settings(&self) -> RoutingSettings {
        self.routing_settings
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn stopname_vertex_pairs(&self) -> impl Iterator<Item = (&str, usize, usize)> {
        self.stopname_to_vertex.iter().map(|(name, pair)| (name.as_str(), pair.wait_vertex, pair.ride_vertex))
    }

    pub fn route_steps(&self) -> impl Iterator<Item = (EdgeId, &RouteStep)> {
        self.edge_to_step.iter().map(|(&id, step)| (id, step))
    }

    // Rebuilds router state from serialized parts without re-running catalogue-derived
    // graph construction. Label cache is still rebuilt from the replayed edge list.
    pub fn restore(
        &mut self,
        routing_settings: RoutingSettings,
        graph: Graph,
        stopname_to_vertex: HashMap<String, (VertexId, VertexId)>,
        edge_to_step: HashMap<EdgeId, RouteStep>,
    ) {
        self.routing_settings = routing_settings;
        self.graph = graph;
        self.stopname_to_vertex =
            stopname_to_vertex.into_iter().map(|(name, (wait_vertex, ride_vertex))| (name, StopVertexPair { wait_vertex, ride_vertex })).collect();
        self.edge_to_step = edge_to_step;
        self.dijkstra.update(&self.graph);
        self.state = RouterState::Built;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Bus, Stop};
    use crate::geo::Coordinates;

    fn stop(name: &str, lat: f64, lon: f64) -> Stop {
        Stop { name: name.to_string(), coords: Coordinates::new(lat, lon), neighbor_distances: Default::default() }
    }

    // Scenario S3: two-stop circular bus, symmetric declared distances.
    #[test]
    fn s3_simple_two_stop_route() {
        let mut tc = Catalogue::new();
        let mut a = stop("A", 0.0, 0.0);
        a.neighbor_distances.insert("B".to_string(), 4000.0);
        let mut b = stop("B", 0.0, 0.05);
        b.neighbor_distances.insert("A".to_string(), 4000.0);
        tc.add_stop(a).unwrap();
        tc.add_stop(b).unwrap();
        tc.add_bus(Bus { name: "1".to_string(), stops: vec!["A".into(), "B".into(), "A".into()], is_circular: true }).unwrap();

        let mut router = TransportRouter::new();
        router.set_up(&tc, RoutingSettings { bus_velocity: 40.0, bus_wait_time: 6 }).unwrap();

        let route = router.get_route("A", "B").unwrap();
        assert!((route.total_time - 12.0).abs() < 1e-9, "got {}", route.total_time);
        assert_eq!(
            route.items,
            vec![
                RouteStep::Wait { stop_name: "A".to_string(), time: 6.0 },
                RouteStep::Ride { bus_name: "1".to_string(), span_count: 1, time: 6.0 },
            ]
        );
    }

    // Scenario S4: a transfer forces exactly two waits and two rides.
    #[test]
    fn s4_transfer_has_two_waits_and_two_rides() {
        let mut tc = Catalogue::new();
        let mut a = stop("A", 0.0, 0.0);
        a.neighbor_distances.insert("B".to_string(), 1000.0);
        let mut b = stop("B", 0.0, 0.01);
        b.neighbor_distances.insert("A".to_string(), 1000.0);
        b.neighbor_distances.insert("C".to_string(), 1000.0);
        let mut c = stop("C", 0.0, 0.02);
        c.neighbor_distances.insert("B".to_string(), 1000.0);
        tc.add_stop(a).unwrap();
        tc.add_stop(b).unwrap();
        tc.add_stop(c).unwrap();
        tc.add_bus(Bus { name: "bus1".to_string(), stops: vec!["A".into(), "B".into()], is_circular: false }).unwrap();
        tc.add_bus(Bus { name: "bus2".to_string(), stops: vec!["B".into(), "C".into()], is_circular: false }).unwrap();

        let mut router = TransportRouter::new();
        router.set_up(&tc, RoutingSettings { bus_velocity: 40.0, bus_wait_time: 2 }).unwrap();

        let route = router.get_route("A", "C").unwrap();
        let waits = route.items.iter().filter(|s| matches!(s, RouteStep::Wait { .. })).count();
        let rides = route.items.iter().filter(|s| matches!(s, RouteStep::Ride { .. })).count();
        assert_eq!(waits, 2);
        assert_eq!(rides, 2);
    }

    // Scenario S5: unknown stop reports not-found, independent of other queries.
    #[test]
    fn s5_unknown_stop_is_not_found() {
        let mut tc = Catalogue::new();
        tc.add_stop(stop("A", 0.0, 0.0)).unwrap();
        let mut router = TransportRouter::new();
        router.set_up(&tc, RoutingSettings { bus_velocity: 40.0, bus_wait_time: 2 }).unwrap();

        assert!(matches!(router.get_route("X", "A"), Err(CatalogueError::NotFound)));
    }

    #[test]
    fn route_to_self_is_free_and_empty() {
        let mut tc = Catalogue::new();
        let mut a = stop("A", 0.0, 0.0);
        a.neighbor_distances.insert("B".to_string(), 1000.0);
        tc.add_stop(a).unwrap();
        tc.add_stop(stop("B", 0.0, 0.01)).unwrap();
        tc.add_bus(Bus { name: "1".to_string(), stops: vec!["A".into(), "B".into()], is_circular: false }).unwrap();

        let mut router = TransportRouter::new();
        router.set_up(&tc, RoutingSettings { bus_velocity: 40.0, bus_wait_time: 5 }).unwrap();

        let route = router.get_route("A", "A").unwrap();
        assert_eq!(route.total_time, 0.0);
        assert!(route.items.is_empty());
    }

    #[test]
    fn route_always_starts_with_a_wait_of_the_configured_duration() {
        let mut tc = Catalogue::new();
        let mut a = stop("A", 0.0, 0.0);
        a.neighbor_distances.insert("B".to_string(), 1000.0);
        tc.add_stop(a).unwrap();
        tc.add_stop(stop("B", 0.0, 0.01)).unwrap();
        tc.add_bus(Bus { name: "1".to_string(), stops: vec!["A".into(), "B".into()], is_circular: false }).unwrap();

        let mut router = TransportRouter::new();
        router.set_up(&tc, RoutingSettings { bus_velocity: 40.0, bus_wait_time: 7 }).unwrap();

        let route = router.get_route("A", "B").unwrap();
        match &route.items[0] {
            RouteStep::Wait { time, .. } => assert_eq!(*time, 7.0),
            other => panic!("expected first step to be a Wait, got {other:?}"),
        }
    }
}
