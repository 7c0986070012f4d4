//! Intervention files
//!
//! Each `*.json` file in the interventions directory holds one
//! [`ControlRequest`]. Files are applied in name order; applied files are
//! deleted, and files that fail to parse or are rejected by the controller
//! move to a `rejected/` subdirectory so they are reported once.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use society_events::ControlRequest;

use super::SocietyController;

/// Directory to watch for intervention files
pub const INTERVENTIONS_DIR: &str = "interventions";

/// Subdirectory of the interventions directory holding failed files
pub const REJECTED_DIR: &str = "rejected";

/// Read every parseable intervention in `dir`, sorted by file name.
pub fn scan_interventions(dir: &Path) -> Vec<(PathBuf, ControlRequest)> {
    read_interventions(dir)
        .into_iter()
        .filter_map(|(path, request)| request.ok().map(|r| (path, r)))
        .collect()
}

fn read_interventions(dir: &Path) -> Vec<(PathBuf, Result<ControlRequest, String>)> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(_) => return Vec::new(),
    };

    let mut paths: Vec<PathBuf> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter(|path| path.extension().and_then(|s| s.to_str()) == Some("json"))
        .collect();
    paths.sort();

    paths
        .into_iter()
        .map(|path| {
            let request = fs::read_to_string(&path)
                .map_err(|e| format!("could not read intervention file: {}", e))
                .and_then(|content| {
                    serde_json::from_str::<ControlRequest>(&content)
                        .map_err(|e| format!("could not parse intervention file: {}", e))
                });
            (path, request)
        })
        .collect()
}

/// Apply pending interventions to the controller. Returns how many succeeded.
pub fn apply_interventions(dir: &Path, controller: &mut SocietyController) -> usize {
    let mut applied = 0;
    for (path, request) in read_interventions(dir) {
        let request = match request {
            Ok(request) => request,
            Err(reason) => {
                warn!(path = %path.display(), %reason, "intervention unreadable");
                reject(dir, &path);
                continue;
            }
        };

        let response = controller.handle(request);
        if let Some(reason) = response.reason() {
            warn!(path = %path.display(), reason, "intervention rejected");
            reject(dir, &path);
            continue;
        }

        applied += 1;
        info!(path = %path.display(), "intervention applied");
        if let Err(e) = fs::remove_file(&path) {
            warn!(path = %path.display(), error = %e, "could not delete intervention file");
        }
    }
    applied
}

fn reject(dir: &Path, path: &Path) {
    let Some(name) = path.file_name() else {
        return;
    };
    let rejected = dir.join(REJECTED_DIR);
    let moved = fs::create_dir_all(&rejected).and_then(|_| fs::rename(path, rejected.join(name)));
    if let Err(e) = moved {
        warn!(path = %path.display(), error = %e, "could not move rejected intervention");
    }
}
