use crate::domain::{Bus, BusExtendedInfo, BusInfo, CatalogueError, CatalogueResult, Stop, StopInfo};
use crate::geo;
use std::collections::HashMap;

type StopId = usize;
type BusId = usize;

// Stops and buses live in Vecs that only ever grow, referenced elsewhere by dense
// integer id rather than by pointer. Nothing moves out from under a held id.
#[derive(Debug, Default)]
pub struct Catalogue {
    stops: Vec<Stop>,
    stop_ids: HashMap<String, StopId>,
    buses: Vec<Bus>,
    bus_ids: HashMap<String, BusId>,
    // Directed road distance between an ordered pair of stop ids.
    distances: HashMap<(StopId, StopId), f64>,
    // Every bus id that visits a given stop id, sorted and deduplicated by name at
    // query time in get_stop_info.
    stop_buses: Vec<Vec<BusId>>,
}

impl Catalogue {
    pub fn new() -> Self {
        Self::default()
    }

    fn get_or_create_stop(&mut self, name: &str) -> StopId {
        if let Some(&id) = self.stop_ids.get(name) {
            return id;
        }
        let id = self.stops.len();
        self.stops.push(Stop { name: name.to_string(), ..Default::default() });
        self.stop_ids.insert(name.to_string(), id);
        self.stop_buses.push(Vec::new());
        id
    }

    // Fails only on an empty name.
    pub fn add_stop(&mut self, stop: Stop) -> CatalogueResult<()> {
        if stop.name.is_empty() {
            return Err(CatalogueError::InvalidInput("stop name must not be empty".to_string()));
        }

        let from_id = self.get_or_create_stop(&stop.name);
        self.stops[from_id].coords = stop.coords;

        for (neighbor_name, &distance) in stop.neighbor_distances.iter() {
            let to_id = self.get_or_create_stop(neighbor_name);
            self.distances.insert((from_id, to_id), distance);
            self.distances.entry((to_id, from_id)).or_insert(distance);
        }
        // Later declarations win for collisions. Everything else from prior declarations survives.
        self.stops[from_id].neighbor_distances.extend(stop.neighbor_distances);

        Ok(())
    }

    // Distances for every consecutive pair along the effective traversal are resolved
    // (declared, mirrored, or falling back to great-circle distance) and cached now,
    // so get_distance is guaranteed to succeed for them once ingestion completes.
    pub fn add_bus(&mut self, bus: Bus) -> CatalogueResult<()> {
        if bus.name.is_empty() {
            return Err(CatalogueError::InvalidInput("bus name must not be empty".to_string()));
        }
        if bus.stops.len() < 2 {
            return Err(CatalogueError::InvalidInput("bus must have at least two stops".to_string()));
        }

        let stop_ids: Vec<StopId> = bus.stops.iter().map(|name| self.get_or_create_stop(name)).collect();

        let bus_id = self.buses.len();
        for &stop_id in &stop_ids {
            self.stop_buses[stop_id].push(bus_id);
        }

        let effective_count = bus.effective_stop_count();
        let traversal: Vec<StopId> = (0..effective_count)
            .map(|i| {
                let n = stop_ids.len();
                if i < n {
                    stop_ids[i]
                } else {
                    stop_ids[2 * n - 2 - i]
                }
            })
            .collect();
        for window in traversal.windows(2) {
            self.resolve_distance(window[0], window[1]);
        }

        self.buses.push(bus);
        self.bus_ids.insert(self.buses[bus_id].name.clone(), bus_id);

        Ok(())
    }

    // Declared value if present, the mirrored reverse if that was declared instead,
    // or the great-circle fallback.
    fn resolve_distance(&mut self, from: StopId, to: StopId) -> f64 {
        if let Some(&d) = self.distances.get(&(from, to)) {
            return d;
        }
        if let Some(&d) = self.distances.get(&(to, from)) {
            self.distances.insert((from, to), d);
            return d;
        }
        let d = geo::compute_distance(self.stops[from].coords, self.stops[to].coords);
        self.distances.insert((from, to), d);
        d
    }

    pub fn stop_id(&self, name: &str) -> CatalogueResult<StopId> {
        self.stop_ids.get(name).copied().ok_or(CatalogueError::NotFound)
    }

    fn bus_id(&self, name: &str) -> CatalogueResult<BusId> {
        self.bus_ids.get(name).copied().ok_or(CatalogueError::NotFound)
    }

    // Does not fall back to great-circle distance; that happens during ingestion
    // in add_bus, not here.
    pub fn get_distance(&self, from: &str, to: &str) -> CatalogueResult<f64> {
        let from_id = self.stop_id(from)?;
        let to_id = self.stop_id(to)?;
        self.distances.get(&(from_id, to_id)).copied().ok_or(CatalogueError::NotFound)
    }

    pub fn get_stop_info(&self, name: &str) -> CatalogueResult<StopInfo> {
        let stop_id = self.stop_id(name)?;
        let mut buses: Vec<String> = self.stop_buses[stop_id].iter().map(|&id| self.buses[id].name.clone()).collect();
        buses.sort();
        buses.dedup();
        Ok(StopInfo { name: name.to_string(), buses })
    }

    pub fn get_bus_info(&self, name: &str) -> CatalogueResult<BusInfo> {
        let bus_id = self.bus_id(name)?;
        let bus = &self.buses[bus_id];

        let stops_count = bus.effective_stop_count();

        let unique_stops_count = bus.stops.iter().collect::<std::collections::HashSet<_>>().len();

        let mut route_length = 0.0;
        let mut geo_length = 0.0;
        for i in 0..stops_count - 1 {
            let a = bus.stop_at(i);
            let b = bus.stop_at(i + 1);
            route_length += self.get_distance(a, b)?;
            let a_id = self.stop_id(a)?;
            let b_id = self.stop_id(b)?;
            geo_length += geo::compute_distance(self.stops[a_id].coords, self.stops[b_id].coords);
        }

        let route_curvature = if geo_length > 0.0 { route_length / geo_length } else { 1.0 };

        Ok(BusInfo { name: name.to_string(), stops_count, unique_stops_count, route_length, route_curvature })
    }

    pub fn get_bus_extended_info(&self, name: &str) -> CatalogueResult<BusExtendedInfo> {
        let bus_id = self.bus_id(name)?;
        let bus = &self.buses[bus_id];
        let stops_and_coordinates = bus
            .stops
            .iter()
            .map(|stop_name| {
                let stop_id = self.stop_ids[stop_name];
                (stop_name.clone(), self.stops[stop_id].coords)
            })
            .collect();
        Ok(BusExtendedInfo { name: name.to_string(), is_circular: bus.is_circular, stops_and_coordinates })
    }

    // Stop names in insertion order. Used by the serializer for dense id assignment
    // and by the router to enumerate vertices deterministically.
    pub fn stop_names(&self) -> impl Iterator<Item = &str> {
        self.stops.iter().map(|s| s.name.as_str())
    }

    // Bus names in insertion order.
    pub fn bus_names(&self) -> impl Iterator<Item = &str> {
        self.buses.iter().map(|b| b.name.as_str())
    }

    pub fn stop(&self, id: StopId) -> &Stop {
        &self.stops[id]
    }

    pub fn stop_count(&self) -> usize {
        self.stops.len()
    }

    // Every resolved directed distance, keyed by stop id pair. The full table, not
    // just the declarations. Used by the serializer.
    pub fn distances(&self) -> impl Iterator<Item = (StopId, StopId, f64)> + '_ {
        self.distances.iter().map(|(&(from, to), &d)| (from, to, d))
    }

    pub fn buses(&self) -> &[Bus] {
        &self.buses
    }

    // Rebuilds a catalogue from serialized parts, reconstructing the name/id indices
    // and each stop's back-set of buses. Used by the deserializer.
    pub fn from_parts(stops: Vec<Stop>, distances: HashMap<(StopId, StopId), f64>, buses: Vec<Bus>) -> Self {
        let stop_ids: HashMap<String, StopId> = stops.iter().enumerate().map(|(id, s)| (s.name.clone(), id)).collect();

        let mut stop_buses: Vec<Vec<BusId>> = vec![Vec::new(); stops.len()];
        let mut bus_ids = HashMap::new();
        for (bus_id, bus) in buses.iter().enumerate() {
            bus_ids.insert(bus.name.clone(), bus_id);
            for stop_name in &bus.stops {
                if let Some(&stop_id) = stop_ids.get(stop_name) {
                    stop_buses[stop_id].push(bus_id);
                }
            }
        }

        Self { stops, stop_ids, buses, bus_ids, distances, stop_buses }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Bus;
    use crate::geo::Coordinates;
    use std::collections::BTreeMap;

    fn stop(name: &str, lat: f64, lon: f64, neighbors: &[(&str, f64)]) -> Stop {
        Stop {
            name: name.to_string(),
            coords: Coordinates::new(lat, lon),
            neighbor_distances: neighbors.iter().map(|(n, d)| (n.to_string(), *d)).collect::<BTreeMap<_, _>>(),
        }
    }

    // Scenario S1 from the spec: asymmetric distance mirrors on ingestion.
    #[test]
    fn s1_distance_mirrors_and_circular_route_length() {
        let mut tc = Catalogue::new();
        tc.add_stop(stop("A", 55.611087, 37.208290, &[("B", 3900.0)])).unwrap();
        tc.add_stop(stop("B", 55.595884, 37.209755, &[])).unwrap();
        tc.add_bus(Bus { name: "256".to_string(), stops: vec!["A".into(), "B".into(), "A".into()], is_circular: true }).unwrap();

        assert_eq!(tc.get_distance("B", "A").unwrap(), 3900.0);

        let info = tc.get_bus_info("256").unwrap();
        assert_eq!(info.route_length, 7800.0);
        assert!(info.route_curvature >= 1.0 - 1e-9);
    }

    // Scenario S2: non-circular bus, declared forward and a differing reverse distance.
    #[test]
    fn s2_non_circular_route_length_and_counts() {
        let mut tc = Catalogue::new();
        tc.add_stop(stop("A", 0.0, 0.0, &[("B", 1000.0)])).unwrap();
        tc.add_stop(stop("B", 0.0, 0.001, &[("C", 2000.0)])).unwrap();
        tc.add_stop(stop("C", 0.0, 0.002, &[("B", 2500.0)])).unwrap();
        tc.add_bus(Bus { name: "750".to_string(), stops: vec!["A".into(), "B".into(), "C".into()], is_circular: false }).unwrap();

        let info = tc.get_bus_info("750").unwrap();
        assert_eq!(info.stops_count, 5);
        assert_eq!(info.unique_stops_count, 3);
        assert_eq!(info.route_length, 1000.0 + 2000.0 + 2500.0 + 1000.0);
    }

    #[test]
    fn unknown_stop_is_not_found() {
        let tc = Catalogue::new();
        assert!(matches!(tc.get_stop_info("nowhere"), Err(CatalogueError::NotFound)));
    }

    #[test]
    fn stop_with_no_buses_has_empty_bus_list() {
        let mut tc = Catalogue::new();
        tc.add_stop(stop("Lonely", 1.0, 1.0, &[])).unwrap();
        let info = tc.get_stop_info("Lonely").unwrap();
        assert!(info.buses.is_empty());
    }

    #[test]
    fn stop_buses_are_sorted_and_deduplicated() {
        let mut tc = Catalogue::new();
        tc.add_stop(stop("A", 0.0, 0.0, &[])).unwrap();
        tc.add_stop(stop("B", 0.0, 0.0, &[])).unwrap();
        tc.add_bus(Bus { name: "9".to_string(), stops: vec!["A".into(), "B".into(), "A".into()], is_circular: true }).unwrap();
        tc.add_bus(Bus { name: "3".to_string(), stops: vec!["A".into(), "B".into(), "A".into()], is_circular: true }).unwrap();

        let info = tc.get_stop_info("A").unwrap();
        assert_eq!(info.buses, vec!["3".to_string(), "9".to_string()]);
    }

    #[test]
    fn empty_stop_name_is_invalid_input() {
        let mut tc = Catalogue::new();
        assert!(matches!(tc.add_stop(stop("", 0.0, 0.0, &[])), Err(CatalogueError::InvalidInput(_))));
    }
}
