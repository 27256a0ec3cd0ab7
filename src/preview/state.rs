//! Asynchronous preview state: the logo slot and the QR panel.
//!
//! Both slots are small state machines that are driven in two steps: a
//! synchronous `sync`/`begin` that decides whether work is needed, and a
//! `complete` that lands the result. Completions that no longer match the
//! current request are ignored, so an older load finishing late cannot
//! overwrite a newer one.

use serde::Serialize;

use crate::render::qr::QrBitmap;

/// Logo slot.
///
/// ```text
/// NoLogo ──source set──► Loading ──ok──► Loaded
///                          │  ▲
///                          │  └──source changed── Loaded / Errored
///                          └──err──► Errored
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum LogoState {
    #[default]
    NoLogo,
    Loading {
        source: String,
    },
    Loaded {
        source: String,
        width: u32,
        height: u32,
    },
    Errored {
        source: String,
    },
}

impl LogoState {
    pub fn source(&self) -> Option<&str> {
        match self {
            LogoState::NoLogo => None,
            LogoState::Loading { source }
            | LogoState::Loaded { source, .. }
            | LogoState::Errored { source } => Some(source),
        }
    }

    /// Follow a change of the logo source. Returns the source to load when a
    /// new load has to start.
    pub fn sync(&mut self, source: Option<&str>) -> Option<String> {
        match source {
            None => {
                *self = LogoState::NoLogo;
                None
            }
            Some(source) if self.source() == Some(source) => None,
            Some(source) => {
                *self = LogoState::Loading {
                    source: source.to_string(),
                };
                Some(source.to_string())
            }
        }
    }

    /// Land a load result. Ignored unless `source` is the one currently
    /// loading. Returns whether the state changed.
    pub fn complete(&mut self, source: &str, size: Option<(u32, u32)>) -> bool {
        match self {
            LogoState::Loading { source: current } if current == source => {
                let source = std::mem::take(current);
                *self = match size {
                    Some((width, height)) => LogoState::Loaded {
                        source,
                        width,
                        height,
                    },
                    None => LogoState::Errored { source },
                };
                true
            }
            _ => false,
        }
    }
}

/// What the QR panel shows.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum QrStatus {
    /// No survey URL yet: "QR Code" placeholder.
    #[default]
    Idle,
    Loading,
    Ready {
        data_uri: String,
    },
    Failed {
        message: String,
    },
}

/// A QR generation the caller should run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrRequest {
    pub version: u64,
    pub url: String,
}

/// Versioned QR panel. Each URL change bumps the version; only the result of
/// the latest request lands.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct QrPanel {
    version: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<String>,
    status: QrStatus,
}

impl QrPanel {
    pub fn status(&self) -> &QrStatus {
        &self.status
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Follow a change of the survey URL. Returns the generation to run, if
    /// any. An unchanged URL starts nothing.
    pub fn begin(&mut self, url: Option<&str>) -> Option<QrRequest> {
        let url = url.filter(|u| !u.trim().is_empty());
        if url == self.url.as_deref() {
            return None;
        }

        self.version += 1;
        self.url = url.map(str::to_string);
        match url {
            None => {
                self.status = QrStatus::Idle;
                None
            }
            Some(url) => {
                self.status = QrStatus::Loading;
                Some(QrRequest {
                    version: self.version,
                    url: url.to_string(),
                })
            }
        }
    }

    /// Land a generation result. Returns `false` for stale versions.
    pub fn complete(&mut self, version: u64, result: Result<&QrBitmap, String>) -> bool {
        if version != self.version || self.status != QrStatus::Loading {
            return false;
        }
        self.status = match result {
            Ok(bitmap) => QrStatus::Ready {
                data_uri: bitmap.data_uri.clone(),
            },
            Err(message) => QrStatus::Failed { message },
        };
        true
    }
}

/// Everything the layout variants read besides the design itself.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct PreviewState {
    pub logo: LogoState,
    pub qr: QrPanel,
    /// Bumped whenever a logo finishes loading, so displays keyed on it
    /// re-render the content subtree.
    pub content_key: u64,
}

impl PreviewState {
    /// Land a logo result, bumping the content key on success.
    pub fn complete_logo(&mut self, source: &str, size: Option<(u32, u32)>) -> bool {
        let changed = self.logo.complete(source, size);
        if changed && matches!(self.logo, LogoState::Loaded { .. }) {
            self.content_key += 1;
        }
        changed
    }
}
