pub mod catalogue;
pub mod dijkstra;
pub mod domain;
pub mod geo;
pub mod graph;
pub mod render;
pub mod request;
pub mod router;
pub mod serialize;

use catalogue::Catalogue;
use domain::{Bus, CatalogueResult, RoutingSettings, Stop};
use geo::Coordinates;
use request::BaseRequest;
use router::TransportRouter;

// Order among base_requests is preserved exactly as received; dummy-stop creation
// backfills whatever a Bus references before its Stop request arrives.
pub fn ingest(base_requests: Vec<BaseRequest>) -> CatalogueResult<Catalogue> {
    let mut catalogue = Catalogue::new();
    for request in base_requests {
        match request {
            BaseRequest::Stop { name, latitude, longitude, road_distances } => {
                catalogue.add_stop(Stop { name, coords: Coordinates::new(latitude, longitude), neighbor_distances: road_distances })?;
            }
            BaseRequest::Bus { name, stops, is_roundtrip } => {
                catalogue.add_bus(Bus { name, stops, is_circular: is_roundtrip })?;
            }
        }
    }
    Ok(catalogue)
}

pub fn build_router(catalogue: &Catalogue, routing_settings: RoutingSettings) -> CatalogueResult<TransportRouter> {
    let mut router = TransportRouter::new();
    router.set_up(catalogue, routing_settings)?;
    Ok(router)
}

// Collects every bus's extended stop/coordinate list, in catalogue insertion order,
// for the renderer.
pub fn extended_bus_infos(catalogue: &Catalogue) -> CatalogueResult<Vec<domain::BusExtendedInfo>> {
    catalogue.bus_names().map(|name| catalogue.get_bus_extended_info(name)).collect()
}

pub use domain::{CatalogueError, ErrorKind};
pub use render::render_map;
