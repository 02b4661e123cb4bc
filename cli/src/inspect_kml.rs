use std::collections::BTreeSet;

use anyhow::Result;

use abstutil::{plain_list_names, prettyprint_usize};

pub fn run(path: String) -> Result<()> {
    let shapes = kml::load(&path)?;
    let mut groups = BTreeSet::new();
    for shape in &shapes {
        let group = shape.group.as_deref().unwrap_or("-");
        groups.insert(group.to_string());
        println!(
            "{}\t{:?}\t{}\t{} points, starting at {}",
            group,
            shape.kind,
            shape.name.as_deref().unwrap_or("-"),
            shape.points.len(),
            shape.points[0]
        );
    }
    if groups.is_empty() {
        println!("{} has no shapes", path);
    } else {
        println!(
            "{} shapes in {}",
            prettyprint_usize(shapes.len()),
            plain_list_names(groups)
        );
    }
    Ok(())
}
