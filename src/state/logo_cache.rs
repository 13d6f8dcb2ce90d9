use log::debug;
use reqwest::{Client, Url};
use std::path::PathBuf;
use std::time::Duration;

const LOGO_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, thiserror::Error)]
pub enum LogoError {
    #[error("logo url {0} has no file name")]
    BadUrl(String),
    #[error("download of {url} failed: {source}")]
    Download {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("could not write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Team logos on disk, laid out as `<root>/<league>/<file>`.
#[derive(Debug, Clone)]
pub struct LogoCache {
    client: Client,
    root: PathBuf,
    timeout: Duration,
}

impl LogoCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            client: Client::builder()
                .user_agent("sports-status/0.1 (terminal scoreboard)")
                .build()
                .unwrap_or_default(),
            root: root.into(),
            timeout: LOGO_TIMEOUT,
        }
    }

    /// Upper bound on a single download, connect through last byte.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// `https://a.espncdn.com/i/teamlogos/nfl/500-dark/scoreboard/kc.png`
    /// lands at `<root>/nfl/kc.png`.
    pub fn local_path(&self, url: &str) -> Option<PathBuf> {
        let parsed = Url::parse(url).ok()?;
        let segments: Vec<&str> = parsed.path_segments()?.collect();
        let file = segments.last().filter(|name| !name.is_empty())?;
        let league = segments
            .len()
            .checked_sub(4)
            .and_then(|i| segments.get(i))
            .filter(|s| !s.is_empty())
            .copied()
            .unwrap_or("other");
        Some(self.root.join(league).join(file))
    }

    /// Download `url` unless it is already cached. Returns the local path.
    pub async fn fetch(&self, url: &str) -> Result<PathBuf, LogoError> {
        let path = self
            .local_path(url)
            .ok_or_else(|| LogoError::BadUrl(url.to_owned()))?;

        if tokio::fs::try_exists(&path).await.unwrap_or(false) {
            return Ok(path);
        }

        let download = |source| LogoError::Download { url: url.to_owned(), source };
        let bytes = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(download)?
            .bytes()
            .await
            .map_err(download)?;

        let io = |source| LogoError::Io { path: path.clone(), source };
        if let Some(dir) = path.parent() {
            tokio::fs::create_dir_all(dir).await.map_err(io)?;
        }

        // a file at `path` always holds a complete download
        let partial = path.with_extension("part");
        let written = match tokio::fs::write(&partial, &bytes).await {
            Ok(()) => tokio::fs::rename(&partial, &path).await,
            Err(e) => Err(e),
        };
        if let Err(e) = written {
            let _ = tokio::fs::remove_file(&partial).await;
            return Err(io(e));
        }

        debug!("cached logo {url} at {}", path.display());
        Ok(path)
    }
}
