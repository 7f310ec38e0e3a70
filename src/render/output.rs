//! Persisting extraction results to disk.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::model::SectionRegistry;

use super::text::{render_section, sanitize_file_name};

/// Write flat text to `path`, creating parent directories as needed.
pub fn write_flat<P: AsRef<Path>>(path: P, text: &str) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| Error::output(parent, e))?;
    }
    fs::write(path, text).map_err(|e| Error::output(path, e))?;
    log::info!("Text successfully extracted to {}", path.display());
    Ok(())
}

/// Write one `<title>.txt` file per non-empty section into `dir`.
///
/// The directory is created if absent. Titles that sanitize to the same
/// name get a numeric suffix. Returns the written paths in section order.
pub fn write_sections<P: AsRef<Path>>(dir: P, sections: &SectionRegistry) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir).map_err(|e| Error::output(dir, e))?;

    let mut used = HashSet::new();
    let mut written = Vec::new();

    for section in sections.non_empty() {
        let stem = sanitize_file_name(&section.title);
        let name = unique_name(&stem, &mut used);
        if name != stem {
            log::warn!(
                "Section '{}' collides with an earlier file name, writing {}.txt",
                section.title,
                name
            );
        }

        let path = dir.join(format!("{}.txt", name));
        fs::write(&path, render_section(section)).map_err(|e| Error::output(&path, e))?;
        log::info!("Saved section: {}", path.display());
        written.push(path);
    }

    if written.is_empty() {
        log::warn!("No section contained text; nothing written to {}", dir.display());
    }
    Ok(written)
}

/// Pick `stem`, or `stem_2`, `stem_3`, ... if already taken.
fn unique_name(stem: &str, used: &mut HashSet<String>) -> String {
    let mut candidate = stem.to_string();
    let mut n = 2;
    while !used.insert(candidate.clone()) {
        candidate = format!("{}_{}", stem, n);
        n += 1;
    }
    candidate
}
