use crate::models::TrendPoint;
use crate::tree::VisualTree;
use anyhow::{Context, Result, bail};
use csv::ReaderBuilder;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Load a trendline series from CSV with an `x,y` header.
pub fn load_csv<P: AsRef<Path>>(path: P) -> Result<Vec<TrendPoint>> {
    let path = path.as_ref();
    let mut rdr = ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;
    let mut out = Vec::new();
    for (i, row) in rdr.deserialize::<TrendPoint>().enumerate() {
        let p = row.with_context(|| format!("{} row {}", path.display(), i + 1))?;
        out.push(p);
    }
    Ok(out)
}

/// Load a trendline series from a JSON array of `{"x": .., "y": ..}`.
pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Vec<TrendPoint>> {
    let path = path.as_ref();
    let f = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let points = serde_json::from_reader(f).with_context(|| format!("parsing {}", path.display()))?;
    Ok(points)
}

/// Load a series, choosing the reader by file extension.
pub fn load_series<P: AsRef<Path>>(path: P) -> Result<Vec<TrendPoint>> {
    let path = path.as_ref();
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("csv") => load_csv(path),
        Some("json") => load_json(path),
        other => bail!("unsupported series format: {:?}", other.unwrap_or("")),
    }
}

/// Save a composed tree as pretty JSON.
pub fn save_tree_json<P: AsRef<Path>>(tree: &VisualTree, path: P) -> Result<()> {
    let mut f = File::create(path)?;
    let s = serde_json::to_string_pretty(tree)?;
    f.write_all(s.as_bytes())?;
    Ok(())
}
