use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AssetResolveError {
    #[error("failed to create cache directory: {0}")]
    CacheDir(#[source] std::io::Error),
    #[error("download failed for {url}: {source}")]
    Download {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("failed to write asset to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not determine cache directory")]
    NoCacheDir,
}

/// Progress callback: `(bytes_downloaded, total_bytes)`.
/// `total_bytes` is 0 if the server didn't provide Content-Length.
pub type ProgressFn = Box<dyn Fn(u64, u64) + Send>;

/// Resolve an auxiliary asset (e.g. the label font) by name.
///
/// Resolution order:
/// 1. User cache directory (platform-specific)
/// 2. Local directory passed by the caller
/// 3. Download from URL to cache
pub fn resolve(
    name: &str,
    url: &str,
    local_dir: Option<&Path>,
    progress: Option<ProgressFn>,
) -> Result<PathBuf, AssetResolveError> {
    let cache_dir = asset_cache_dir()?;
    let cached_path = cache_dir.join(name);
    if cached_path.exists() {
        return Ok(cached_path);
    }

    if let Some(dir) = local_dir {
        let local_path = dir.join(name);
        if local_path.exists() {
            return Ok(local_path);
        }
    }

    log::info!("Downloading {name} to {}", cache_dir.display());
    fs::create_dir_all(&cache_dir).map_err(AssetResolveError::CacheDir)?;
    download(url, &cached_path, progress)?;
    Ok(cached_path)
}

/// Platform-specific asset cache directory.
///
/// - macOS: `~/Library/Application Support/swingpose/assets/`
/// - Linux: `$XDG_CACHE_HOME/swingpose/assets/` or `~/.cache/swingpose/assets/`
/// - Windows: `%LOCALAPPDATA%/swingpose/assets/`
pub fn asset_cache_dir() -> Result<PathBuf, AssetResolveError> {
    #[cfg(target_os = "macos")]
    {
        dirs::data_dir()
            .map(|d| d.join("swingpose").join("assets"))
            .ok_or(AssetResolveError::NoCacheDir)
    }
    #[cfg(not(target_os = "macos"))]
    {
        dirs::cache_dir()
            .map(|d| d.join("swingpose").join("assets"))
            .ok_or(AssetResolveError::NoCacheDir)
    }
}

fn download(url: &str, dest: &Path, progress: Option<ProgressFn>) -> Result<(), AssetResolveError> {
    let response = reqwest::blocking::get(url)
        .and_then(|r| r.error_for_status())
        .map_err(|e| AssetResolveError::Download {
            url: url.to_string(),
            source: e,
        })?;

    let total = response.content_length().unwrap_or(0);
    let bytes = response.bytes().map_err(|e| AssetResolveError::Download {
        url: url.to_string(),
        source: e,
    })?;

    // Written under a temporary name and renamed so a failed download never
    // leaves a truncated asset in the cache.
    let temp_path = dest.with_extension("part");
    let write_err = |e| AssetResolveError::Write {
        path: temp_path.clone(),
        source: e,
    };
    let mut file = fs::File::create(&temp_path).map_err(write_err)?;

    let mut downloaded: u64 = 0;
    for chunk in bytes.chunks(256 * 1024) {
        file.write_all(chunk).map_err(write_err)?;
        downloaded += chunk.len() as u64;
        if let Some(ref cb) = progress {
            cb(downloaded, total);
        }
    }
    file.flush().map_err(write_err)?;
    drop(file);

    fs::rename(&temp_path, dest).map_err(|e| AssetResolveError::Write {
        path: dest.to_path_buf(),
        source: e,
    })?;

    Ok(())
}
