use std::io::Write;
use std::path::Path;

use serde::Serialize;

use super::pairs::PairIndex;
use crate::error::{DatasetError, Result};

/// One CSV row per pair, in index order.
#[derive(Debug, Serialize)]
struct ManifestRow<'a> {
    index: usize,
    scene_id: &'a str,
    scan_number: Option<u64>,
    input: String,
    output: String,
}

/// Write the pair list as CSV with header
/// `index,scene_id,scan_number,input,output`.
///
/// `scan_number` is empty when the output file stem is not an integer.
pub fn write_manifest<W: Write>(index: &PairIndex, writer: W) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    for (i, entry) in index.iter().enumerate() {
        csv.serialize(ManifestRow {
            index: i,
            scene_id: &entry.scene_id,
            scan_number: entry.scan_number(),
            input: entry.input.display().to_string(),
            output: entry.output.display().to_string(),
        })?;
    }
    csv.flush().map_err(|e| DatasetError::Csv(e.into()))?;
    Ok(())
}

pub fn write_manifest_file(index: &PairIndex, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path).map_err(|e| DatasetError::io(path, e))?;
    write_manifest(index, file)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_row_per_pair() {
        let tmp = tempfile::TempDir::new().unwrap();
        for tag in ["16_1024", "64_1024"] {
            let dir = tmp.path().join("town01").join(tag);
            std::fs::create_dir_all(&dir).unwrap();
            std::fs::write(dir.join("000.rimg"), b"").unwrap();
            std::fs::write(dir.join("frame_a.rimg"), b"").unwrap();
        }
        let index = PairIndex::build(
            tmp.path(),
            &["town01".to_string()],
            "16_1024".parse().unwrap(),
            "64_1024".parse().unwrap(),
        )
        .unwrap();

        let mut out = Vec::new();
        write_manifest(&index, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "index,scene_id,scan_number,input,output");
        assert!(lines[1].starts_with("0,town01,0,"));
        assert!(lines[2].starts_with("1,town01,,"));
        assert!(lines[2].ends_with("frame_a.rimg"));
    }
}
