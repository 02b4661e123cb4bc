use anyhow::Result;

use abstutil::prettyprint_usize;
use coverage::{CoverageConfig, Scene};

pub fn run(config: CoverageConfig, output: Option<String>, kml_path: Option<String>) -> Result<()> {
    let scene = build(&config)?;
    let geojson = serde_json::to_string_pretty(&scene.to_geojson())?;
    match output {
        Some(path) => {
            fs_err::write(&path, geojson)?;
            info!("Wrote {}", path);
        }
        None => println!("{}", geojson),
    }
    if let Some(path) = kml_path {
        write_kml(&scene, &path)?;
    }
    Ok(())
}

pub fn export_kml(config: CoverageConfig, output: String) -> Result<()> {
    let scene = build(&config)?;
    write_kml(&scene, &output)
}

fn build(config: &CoverageConfig) -> Result<Scene> {
    let scene = Scene::build(config)?;
    match scene.footprint {
        Some(ref footprint) => info!(
            "{} sectors make up a footprint of {} polygons",
            scene.sectors.len(),
            footprint.to_geo().0.len()
        ),
        None => warn!("No cells are enabled, so there's nothing to draw"),
    }
    if let Some((ref spec, ref grid)) = scene.grid {
        let (rows, cols) = grid.num_cells();
        info!(
            "{} grid has {} rows and {} columns, with {} labels",
            spec.cell_size,
            prettyprint_usize(rows),
            prettyprint_usize(cols),
            prettyprint_usize(grid.labels.len())
        );
    }
    for layer in scene.tile_layers() {
        debug!("Basemap layer {}: {}", layer.name, layer.url);
    }
    Ok(scene)
}

fn write_kml(scene: &Scene, path: &str) -> Result<()> {
    let raw = kml::export_scene(scene)?;
    fs_err::write(path, raw)?;
    info!("Wrote {} ({})", path, kml::KML_MIME_TYPE);
    Ok(())
}
