use crate::domain::{BusExtendedInfo, RenderSettings};
use crate::geo::Coordinates;

// Projects (lat, lon) onto an SVG canvas by independently normalizing each axis to
// [padding, dimension - padding], flipping latitude so north points up.
struct Projection {
    min_lon: f64,
    lon_scale: f64,
    max_lat: f64,
    lat_scale: f64,
    padding: f64,
}

impl Projection {
    fn fit(points: &[Coordinates], width: f64, height: f64, padding: f64) -> Self {
        if points.is_empty() {
            return Self { min_lon: 0.0, lon_scale: 0.0, max_lat: 0.0, lat_scale: 0.0, padding };
        }

        let min_lon = points.iter().map(|p| p.lon).fold(f64::INFINITY, f64::min);
        let max_lon = points.iter().map(|p| p.lon).fold(f64::NEG_INFINITY, f64::max);
        let min_lat = points.iter().map(|p| p.lat).fold(f64::INFINITY, f64::min);
        let max_lat = points.iter().map(|p| p.lat).fold(f64::NEG_INFINITY, f64::max);

        let usable_width = (width - 2.0 * padding).max(0.0);
        let usable_height = (height - 2.0 * padding).max(0.0);
        let lon_span = max_lon - min_lon;
        let lat_span = max_lat - min_lat;

        Self {
            min_lon,
            lon_scale: if lon_span > 0.0 { usable_width / lon_span } else { 0.0 },
            max_lat,
            lat_scale: if lat_span > 0.0 { usable_height / lat_span } else { 0.0 },
            padding,
        }
    }

    fn project(&self, coords: Coordinates) -> (f64, f64) {
        let x = (coords.lon - self.min_lon) * self.lon_scale + self.padding;
        let y = (self.max_lat - coords.lat) * self.lat_scale + self.padding;
        (x, y)
    }
}

// Renders every bus's route as a polyline, colored round-robin from
// settings.color_palette, followed by a circle for every stop any bus visits.
pub fn render_map(settings: &RenderSettings, buses: &[BusExtendedInfo]) -> String {
    let all_points: Vec<Coordinates> = buses.iter().flat_map(|b| b.stops_and_coordinates.iter().map(|(_, c)| *c)).collect();
    let projection = Projection::fit(&all_points, settings.width, settings.height, settings.padding);

    let mut svg = String::new();
    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" version=\"1.1\" width=\"{}\" height=\"{}\">\n",
        settings.width, settings.height
    ));

    let palette_len = settings.color_palette.len().max(1);
    for (i, bus) in buses.iter().enumerate() {
        if bus.stops_and_coordinates.is_empty() {
            continue;
        }
        let color = settings.color_palette.get(i % palette_len).map(String::as_str).unwrap_or("black");
        let points: Vec<String> = bus
            .stops_and_coordinates
            .iter()
            .map(|(_, c)| {
                let (x, y) = projection.project(*c);
                format!("{x},{y}")
            })
            .collect();
        svg.push_str(&format!(
            "  <polyline points=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{}\"/>\n",
            points.join(" "),
            color,
            settings.line_width
        ));
    }

    let mut seen = std::collections::BTreeSet::new();
    for bus in buses {
        for (name, coords) in &bus.stops_and_coordinates {
            if !seen.insert(name.clone()) {
                continue;
            }
            let (x, y) = projection.project(*coords);
            svg.push_str(&format!(
                "  <circle cx=\"{x}\" cy=\"{y}\" r=\"{}\" fill=\"white\"/>\n  <text x=\"{x}\" y=\"{y}\" dx=\"{}\" dy=\"{}\" font-size=\"{}\">{}</text>\n",
                settings.stop_radius, settings.stop_label_offset.0, settings.stop_label_offset.1, settings.stop_label_font_size, name
            ));
        }
    }

    svg.push_str("</svg>");
    svg
}
