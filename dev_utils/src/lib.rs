use transport_catalogue::catalogue::Catalogue;
use transport_catalogue::domain::{Bus, RoutingSettings, Stop};
use transport_catalogue::geo::Coordinates;
use transport_catalogue::router::TransportRouter;

pub fn example_routing_settings() -> RoutingSettings {
    RoutingSettings { bus_velocity: 40.0, bus_wait_time: 6 }
}

// Three bus lines over a short grid of stops, one deliberate transfer point.
pub fn build_small_catalogue() -> Catalogue {
    let mut catalogue = Catalogue::new();
    let stops = [("A", 55.74, 37.60), ("B", 55.75, 37.61), ("C", 55.76, 37.62), ("D", 55.77, 37.63), ("E", 55.78, 37.64)];
    for (name, lat, lon) in stops {
        catalogue.add_stop(Stop { name: name.to_string(), coords: Coordinates::new(lat, lon), neighbor_distances: Default::default() }).unwrap();
    }

    catalogue.add_bus(Bus { name: "1".to_string(), stops: vec!["A".into(), "B".into(), "C".into()], is_circular: false }).unwrap();
    catalogue.add_bus(Bus { name: "2".to_string(), stops: vec!["C".into(), "D".into(), "E".into()], is_circular: false }).unwrap();
    catalogue.add_bus(Bus { name: "3".to_string(), stops: vec!["A".into(), "E".into(), "A".into()], is_circular: true }).unwrap();

    catalogue
}

pub fn build_small_router(catalogue: &Catalogue) -> TransportRouter {
    let mut router = TransportRouter::new();
    router.set_up(catalogue, example_routing_settings()).unwrap();
    router
}

// stop_count stops laid out on a line, each consecutive pair joined by a short bus
// route, plus a handful of long express routes skipping ahead.
pub fn build_generated_catalogue(stop_count: usize) -> Catalogue {
    let mut catalogue = Catalogue::new();
    let rng = fastrand::Rng::with_seed(1);

    for i in 0..stop_count {
        let name = format!("stop_{i}");
        let lat = 55.0 + (i as f64) * 0.001;
        let lon = 37.0 + (i as f64) * 0.001;
        catalogue.add_stop(Stop { name, coords: Coordinates::new(lat, lon), neighbor_distances: Default::default() }).unwrap();
    }

    for i in 0..stop_count.saturating_sub(1) {
        let stops = vec![format!("stop_{i}"), format!("stop_{}", i + 1)];
        catalogue.add_bus(Bus { name: format!("local_{i}"), stops, is_circular: false }).unwrap();
    }

    let express_count = stop_count / 10;
    for i in 0..express_count {
        let start = i * 10;
        let end = (start + rng.usize(5..10)).min(stop_count.saturating_sub(1));
        if end <= start {
            continue;
        }
        let stops = vec![format!("stop_{start}"), format!("stop_{end}")];
        catalogue.add_bus(Bus { name: format!("express_{i}"), stops, is_circular: false }).unwrap();
    }

    catalogue
}
