//! Control page assets.
//!
//! The device serves copies compiled into flash. On desktop the assets can be
//! read from a directory instead, so the page can be edited without a rebuild.

use std::fs;
use std::path::Path;

use crate::error::AssetError;

/// File name of the control page inside an assets directory.
pub const INDEX_FILE: &str = "index.html";

/// File name of the stylesheet inside an assets directory.
pub const STYLE_FILE: &str = "style.css";

/// Marker in the control page replaced by the WebSocket path.
pub const WS_PATH_PLACEHOLDER: &str = "{{WS_PATH}}";

/// Control page HTML and CSS bodies.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StaticAssets {
    /// Body served on `GET /`.
    pub html: String,
    /// Body served on `GET /style.css`.
    pub css: String,
}

impl StaticAssets {
    /// Assets compiled into the binary from `www/`.
    pub fn embedded() -> Self {
        Self {
            html: include_str!("../../www/index.html").to_string(),
            css: include_str!("../../www/style.css").to_string(),
        }
    }

    /// Read `index.html` and `style.css` from `dir`.
    ///
    /// A file that cannot be read is logged and served as an empty body.
    pub fn load(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            html: read_or_empty(&dir.join(INDEX_FILE)),
            css: read_or_empty(&dir.join(STYLE_FILE)),
        }
    }

    /// Embedded assets when `dir` is empty, otherwise [`load`](Self::load).
    pub fn from_dir_or_embedded(dir: &str) -> Self {
        if dir.is_empty() {
            Self::embedded()
        } else {
            Self::load(dir)
        }
    }

    /// Point the page's socket at `ws_path`.
    pub fn with_ws_path(mut self, ws_path: &str) -> Self {
        self.html = self.html.replace(WS_PATH_PLACEHOLDER, ws_path);
        self
    }
}

fn read_asset(path: &Path) -> Result<String, AssetError> {
    fs::read_to_string(path).map_err(|source| AssetError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn read_or_empty(path: &Path) -> String {
    match read_asset(path) {
        Ok(body) => {
            tracing::debug!(path = %path.display(), bytes = body.len(), "asset loaded");
            body
        }
        Err(e) => {
            tracing::warn!(error = %e, cause = ?std::error::Error::source(&e), "serving empty asset");
            String::new()
        }
    }
}
