use anyhow::Result;
use xmltree::{Element, EmitterConfig, XMLNode};

use coverage::{Color, GridLabel, GridLine, Marker, Scene, SectorOverlay};
use geom::LonLat;

use crate::{GRID_FOLDER, PERIMETER_NAME, SECTORS_FOLDER};

/// What to serve the exported file as
pub const KML_MIME_TYPE: &str = "application/vnd.google-earth.kml+xml";
/// Opacity of sector fills
pub const SECTOR_ALPHA: f64 = 0.3;
/// Opacity of grid lines and labels
pub const GRID_ALPHA: f64 = 0.8;

const KML_NAMESPACE: &str = "http://www.opengis.net/kml/2.2";
const DOCUMENT_NAME: &str = "BTS coverage";
const SECTOR_OUTLINE_WIDTH: f64 = 2.0;
const GRID_LINE_WIDTH: f64 = 1.0;
const PERIMETER_WIDTH: f64 = 3.0;

/// Serializes sectors and a grid into one KML document, with a folder for each. Every grid shape
/// uses `color`. Coordinates are written as `lon,lat,0`.
pub fn export_vector_markup(
    sectors: &[SectorOverlay],
    lines: &[GridLine],
    labels: &[GridLabel],
    perimeter: &[LonLat],
    color: Color,
) -> Result<String> {
    Document {
        sectors,
        markers: &[],
        lines,
        labels,
        perimeter,
        grid_color: color,
        label_color: color,
    }
    .write()
}

/// Like `export_vector_markup`, but also includes the cell markers, and labels use the grid's
/// label color.
pub fn export_scene(scene: &Scene) -> Result<String> {
    let mut doc = Document {
        sectors: &scene.sectors,
        markers: &scene.markers,
        lines: &[],
        labels: &[],
        perimeter: &[],
        grid_color: Color::BLACK,
        label_color: Color::BLACK,
    };
    if let Some((ref spec, ref grid)) = scene.grid {
        doc.lines = grid.lines.as_slice();
        doc.labels = grid.labels.as_slice();
        doc.perimeter = grid.perimeter.as_slice();
        doc.grid_color = spec.color;
        doc.label_color = spec.label_color;
    }
    doc.write()
}

struct Document<'a> {
    sectors: &'a [SectorOverlay],
    markers: &'a [Marker],
    lines: &'a [GridLine],
    labels: &'a [GridLabel],
    perimeter: &'a [LonLat],
    grid_color: Color,
    label_color: Color,
}

impl<'a> Document<'a> {
    fn write(&self) -> Result<String> {
        debug!(
            "Exporting KML with {} sectors, {} markers, {} grid lines, {} labels",
            self.sectors.len(),
            self.markers.len(),
            self.lines.len(),
            self.labels.len()
        );
        let mut bytes = Vec::new();
        self.to_xml()
            .write_with_config(&mut bytes, EmitterConfig::new().perform_indent(true))?;
        Ok(String::from_utf8(bytes)?)
    }

    fn to_xml(&self) -> Element {
        let mut sectors = vec![text_element("name", SECTORS_FOLDER.to_string())];
        for overlay in self.sectors {
            sectors.push(sector_placemark(overlay));
        }
        for marker in self.markers {
            sectors.push(placemark(
                Some(marker.tooltip.clone()),
                None,
                point(marker.position),
            ));
        }

        let mut grid = vec![text_element("name", GRID_FOLDER.to_string())];
        let line_color = self.grid_color.to_kml(GRID_ALPHA);
        for line in self.lines {
            grid.push(placemark(
                None,
                Some(element("Style", vec![line_style(&line_color, GRID_LINE_WIDTH)])),
                line_string(&[line.pt1, line.pt2]),
            ));
        }
        for label in self.labels {
            grid.push(label_placemark(label, self.label_color));
        }
        if !self.perimeter.is_empty() {
            grid.push(placemark(
                Some(PERIMETER_NAME.to_string()),
                Some(element("Style", vec![line_style(&line_color, PERIMETER_WIDTH)])),
                line_string(self.perimeter),
            ));
        }

        let document = element(
            "Document",
            vec![
                text_element("name", DOCUMENT_NAME.to_string()),
                element("Folder", sectors),
                element("Folder", grid),
            ],
        );
        let mut root = element("kml", vec![document]);
        // The only attribute in the document
        root.attributes.insert("xmlns".to_string(), KML_NAMESPACE.to_string());
        root
    }
}

fn sector_placemark(overlay: &SectorOverlay) -> Element {
    let color = overlay.sector.color;
    let style = element(
        "Style",
        vec![
            line_style(&color.to_kml(1.0), SECTOR_OUTLINE_WIDTH),
            element(
                "PolyStyle",
                vec![text_element("color", color.to_kml(SECTOR_ALPHA))],
            ),
        ],
    );
    let ring = element("LinearRing", vec![coordinates(&overlay.polygon.closed_ring())]);
    let polygon = element("Polygon", vec![element("outerBoundaryIs", vec![ring])]);
    placemark(Some(overlay.sector.name.clone()), Some(style), polygon)
}

fn label_placemark(label: &GridLabel, color: Color) -> Element {
    // No icon, just the text
    let style = element(
        "Style",
        vec![
            element("IconStyle", vec![text_element("scale", "0".to_string())]),
            element(
                "LabelStyle",
                vec![text_element("color", color.to_kml(GRID_ALPHA))],
            ),
        ],
    );
    placemark(Some(label.text.clone()), Some(style), point(label.anchor))
}

fn placemark(name: Option<String>, style: Option<Element>, geometry: Element) -> Element {
    let mut children = Vec::new();
    if let Some(name) = name {
        children.push(text_element("name", name));
    }
    if let Some(style) = style {
        children.push(style);
    }
    children.push(geometry);
    element("Placemark", children)
}

fn point(pt: LonLat) -> Element {
    element("Point", vec![coordinates(&[pt])])
}

fn line_string(pts: &[LonLat]) -> Element {
    element("LineString", vec![coordinates(pts)])
}

fn line_style(color: &str, width: f64) -> Element {
    element(
        "LineStyle",
        vec![
            text_element("color", color.to_string()),
            text_element("width", width.to_string()),
        ],
    )
}

fn coordinates(pts: &[LonLat]) -> Element {
    let tuples: Vec<String> = pts
        .iter()
        .map(|pt| format!("{},{},0", pt.longitude, pt.latitude))
        .collect();
    text_element("coordinates", tuples.join(" "))
}

fn element(name: &str, children: Vec<Element>) -> Element {
    let mut elem = Element::new(name);
    elem.children = children.into_iter().map(XMLNode::Element).collect();
    elem
}

fn text_element(name: &str, text: String) -> Element {
    let mut elem = Element::new(name);
    elem.children.push(XMLNode::Text(text));
    elem
}
