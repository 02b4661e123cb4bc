use anyhow::{Context, Result};

use abstutil::prettyprint_usize;
use geom::LonLat;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShapeKind {
    Point,
    LineString,
    Polygon,
}

/// One placemark from a KML file.
#[derive(Clone, Debug, PartialEq)]
pub struct KmlShape {
    pub name: Option<String>,
    /// The name of the closest enclosing folder
    pub group: Option<String>,
    pub kind: ShapeKind,
    /// For polygons, only the outer ring. Rings are closed.
    pub points: Vec<LonLat>,
}

/// Reads every placemark from a .kml file.
pub fn load(path: &str) -> Result<Vec<KmlShape>> {
    let raw = fs_err::read_to_string(path)?;
    let shapes = parse(&raw).with_context(|| format!("parsing {}", path))?;
    info!("Got {} shapes from {}", prettyprint_usize(shapes.len()), path);
    Ok(shapes)
}

/// Extracts every placemark with a point, line string, or polygon, in document order.
pub fn parse(raw: &str) -> Result<Vec<KmlShape>> {
    let tree = roxmltree::Document::parse(raw)?;
    let root = tree.root_element();
    if root.tag_name().name() != "kml" {
        bail!("The root element is <{}>, not <kml>", root.tag_name().name());
    }
    let mut shapes = Vec::new();
    recurse(root, None, &mut shapes)?;
    Ok(shapes)
}

fn recurse(node: roxmltree::Node, group: Option<&str>, shapes: &mut Vec<KmlShape>) -> Result<()> {
    match node.tag_name().name() {
        "Placemark" => {
            shapes.push(placemark(node, group)?);
        }
        "Folder" => {
            let group = child_text(node, "name").or(group);
            for child in node.children() {
                recurse(child, group, shapes)?;
            }
        }
        _ => {
            for child in node.children() {
                recurse(child, group, shapes)?;
            }
        }
    }
    Ok(())
}

fn placemark(node: roxmltree::Node, group: Option<&str>) -> Result<KmlShape> {
    let name = child_text(node, "name").map(|x| x.to_string());
    for child in node.children() {
        let (kind, coordinates) = match child.tag_name().name() {
            "Point" => (ShapeKind::Point, child),
            "LineString" => (ShapeKind::LineString, child),
            "Polygon" => match child
                .descendants()
                .find(|n| n.tag_name().name() == "outerBoundaryIs")
            {
                Some(outer) => (ShapeKind::Polygon, outer),
                None => bail!("Polygon {:?} has no outer boundary", name),
            },
            _ => continue,
        };
        let points = match coordinates
            .descendants()
            .find(|n| n.tag_name().name() == "coordinates")
        {
            Some(n) => parse_coordinates(n.text().unwrap_or(""))?,
            None => bail!("{:?} {:?} has no coordinates", kind, name),
        };
        if points.is_empty() {
            bail!("{:?} {:?} has no points", kind, name);
        }
        if kind == ShapeKind::Polygon && points[0] != points[points.len() - 1] {
            bail!("Polygon {:?} isn't closed", name);
        }
        return Ok(KmlShape {
            name,
            group: group.map(|x| x.to_string()),
            kind,
            points,
        });
    }
    bail!("Placemark {:?} has no Point, LineString, or Polygon", name)
}

fn child_text<'a>(node: roxmltree::Node<'a, '_>, tag: &str) -> Option<&'a str> {
    node.children()
        .find(|n| n.tag_name().name() == tag)
        .and_then(|n| n.text())
        .map(|x| x.trim())
}

fn parse_coordinates(raw: &str) -> Result<Vec<LonLat>> {
    raw.split_whitespace()
        .map(|tuple| parse_pt(tuple).ok_or_else(|| anyhow!("Malformed coordinates: {}", tuple)))
        .collect()
}

fn parse_pt(input: &str) -> Option<LonLat> {
    let coords: Vec<&str> = input.split(',').collect();
    // (lon, lat) with an optional elevation, which is ignored
    if coords.len() != 2 && coords.len() != 3 {
        return None;
    }
    match (coords[0].parse::<f64>(), coords[1].parse::<f64>()) {
        (Ok(lon), Ok(lat)) => Some(LonLat::new(lon, lat)),
        _ => None,
    }
}
