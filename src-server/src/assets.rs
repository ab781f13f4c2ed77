//! Service worker generation
//!
//! The worker pre-caches every file under the static directory. Its cache
//! name is a content hash of those files, so a new build evicts the caches
//! left by the previous one.

use std::fs;
use std::io;
use std::path::Path;

const TEMPLATE: &str = include_str!("../assets/service-worker.js");
const CACHE_PREFIX: &str = "todoissimus-";
pub const SERVICE_WORKER_PATH: &str = "service-worker.js";

/// A file under the static directory, addressed by its URL path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    pub path: String,
    pub bytes: Vec<u8>,
}

/// Rendered service worker script
#[derive(Debug, Clone)]
pub struct ServiceWorker {
    pub cache_name: String,
    pub script: String,
}

impl ServiceWorker {
    /// Build the worker for the files currently in `static_dir`.
    ///
    /// A missing directory yields a worker that only caches `/`.
    pub fn build(static_dir: &Path) -> Self {
        let assets = match collect_assets(static_dir) {
            Ok(assets) => assets,
            Err(e) => {
                tracing::warn!("cannot read static dir {}: {}", static_dir.display(), e);
                Vec::new()
            }
        };
        Self::from_assets(&assets)
    }

    pub fn from_assets(assets: &[Asset]) -> Self {
        let cache_name = cache_name(assets);
        let mut urls = vec!["/".to_string()];
        urls.extend(assets.iter().map(|a| format!("/{}", a.path)));
        let urls = serde_json::to_string(&urls).unwrap_or_else(|_| "[]".to_string());
        let script = TEMPLATE
            .replace("__CACHE_NAME__", &cache_name)
            .replace("__ASSETS__", &urls);
        Self { cache_name, script }
    }
}

/// Every regular file under `dir`, sorted by path, minus any stale worker
pub fn collect_assets(dir: &Path) -> io::Result<Vec<Asset>> {
    let mut assets = Vec::new();
    walk(dir, dir, &mut assets)?;
    assets.retain(|a| a.path != SERVICE_WORKER_PATH);
    assets.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(assets)
}

fn walk(root: &Path, dir: &Path, out: &mut Vec<Asset>) -> io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let file_type = entry.file_type()?;
        if file_type.is_dir() {
            walk(root, &path, out)?;
        } else if file_type.is_file() {
            let Ok(relative) = path.strip_prefix(root) else {
                continue;
            };
            let url_path = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            out.push(Asset {
                path: url_path,
                bytes: fs::read(&path)?,
            });
        }
    }
    Ok(())
}

/// `todoissimus-` plus the first 16 hex chars of a blake3 digest over the
/// sorted assets
pub fn cache_name(assets: &[Asset]) -> String {
    let mut hasher = blake3::Hasher::new();
    for asset in assets {
        hasher.update(asset.path.as_bytes());
        hasher.update(&[0]);
        hasher.update(&(asset.bytes.len() as u64).to_le_bytes());
        hasher.update(&asset.bytes);
    }
    let hex = hasher.finalize().to_hex();
    format!("{}{}", CACHE_PREFIX, &hex.as_str()[..16])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, rel: &str, body: &str) {
        let path = dir.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, body).unwrap();
    }

    #[test]
    fn test_collect_assets_sorted_relative() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "index.html", "<html></html>");
        write(tmp.path(), "pkg/app.wasm", "wasm");
        write(tmp.path(), "app.css", "body{}");
        write(tmp.path(), "service-worker.js", "stale");

        let assets = collect_assets(tmp.path()).unwrap();
        let paths: Vec<_> = assets.iter().map(|a| a.path.as_str()).collect();
        assert_eq!(paths, vec!["app.css", "index.html", "pkg/app.wasm"]);
    }

    #[test]
    fn test_cache_name_tracks_content() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "index.html", "v1");
        let first = ServiceWorker::build(tmp.path());
        let again = ServiceWorker::build(tmp.path());
        assert_eq!(first.cache_name, again.cache_name);
        assert!(first.cache_name.starts_with("todoissimus-"));
        assert_eq!(first.cache_name.len(), "todoissimus-".len() + 16);

        write(tmp.path(), "index.html", "v2");
        let changed = ServiceWorker::build(tmp.path());
        assert_ne!(first.cache_name, changed.cache_name);
    }

    #[test]
    fn test_script_lists_assets() {
        let assets = vec![Asset {
            path: "index.html".into(),
            bytes: b"x".to_vec(),
        }];
        let worker = ServiceWorker::from_assets(&assets);
        assert!(worker.script.contains(&format!("'{}'", worker.cache_name)));
        assert!(worker.script.contains(r#"["/","/index.html"]"#));
        assert!(!worker.script.contains("__ASSETS__"));
    }

    #[test]
    fn test_missing_dir_still_builds() {
        let tmp = tempfile::tempdir().unwrap();
        let worker = ServiceWorker::build(&tmp.path().join("absent"));
        assert!(worker.script.contains(r#"["/"]"#));
    }
}
