//! Fetch boundary for the two sheet exports.

use serde::Serialize;
use std::future::Future;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SheetKind {
    Vendor,
    Internal,
}

impl SheetKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Vendor => "vendor task sheet",
            Self::Internal => "internal readiness sheet",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("no location configured for the {}", .0.label())]
    Unconfigured(SheetKind),
    #[error("failed to read the {} from {}: {source}", .kind.label(), .path.display())]
    Io {
        kind: SheetKind,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("the {} is empty", .0.label())]
    Empty(SheetKind),
}

/// Supplies raw CSV text for each sheet.
pub trait SheetSource: Send + Sync {
    fn fetch(&self, kind: SheetKind) -> impl Future<Output = Result<String, SourceError>> + Send;
}

/// Both sheet texts, fetched together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetTexts {
    pub vendor_csv: String,
    pub internal_csv: String,
}

/// Fetches both sheets concurrently; either failure aborts the pair.
pub async fn fetch_sheets<S: SheetSource>(source: &S) -> Result<SheetTexts, SourceError> {
    let (vendor_csv, internal_csv) = tokio::try_join!(
        fetch_non_empty(source, SheetKind::Vendor),
        fetch_non_empty(source, SheetKind::Internal),
    )?;
    Ok(SheetTexts {
        vendor_csv,
        internal_csv,
    })
}

async fn fetch_non_empty<S: SheetSource>(
    source: &S,
    kind: SheetKind,
) -> Result<String, SourceError> {
    let text = source.fetch(kind).await?;
    if text.trim().is_empty() {
        return Err(SourceError::Empty(kind));
    }
    Ok(text)
}

/// Reads sheet exports from local files.
#[derive(Debug, Clone, Default)]
pub struct FileSheetSource {
    vendor: Option<PathBuf>,
    internal: Option<PathBuf>,
}

impl FileSheetSource {
    pub fn new(vendor: Option<PathBuf>, internal: Option<PathBuf>) -> Self {
        Self { vendor, internal }
    }

    fn path(&self, kind: SheetKind) -> Option<&PathBuf> {
        match kind {
            SheetKind::Vendor => self.vendor.as_ref(),
            SheetKind::Internal => self.internal.as_ref(),
        }
    }
}

impl SheetSource for FileSheetSource {
    fn fetch(&self, kind: SheetKind) -> impl Future<Output = Result<String, SourceError>> + Send {
        let path = self.path(kind).cloned();
        async move {
            let path = path.ok_or(SourceError::Unconfigured(kind))?;
            tokio::fs::read_to_string(&path)
                .await
                .map_err(|source| SourceError::Io { kind, path, source })
        }
    }
}

/// Sheet texts already held in memory, such as request bodies.
#[derive(Debug, Clone, Default)]
pub struct InlineSheetSource {
    vendor_csv: String,
    internal_csv: String,
}

impl InlineSheetSource {
    pub fn new(vendor_csv: impl Into<String>, internal_csv: impl Into<String>) -> Self {
        Self {
            vendor_csv: vendor_csv.into(),
            internal_csv: internal_csv.into(),
        }
    }
}

impl SheetSource for InlineSheetSource {
    fn fetch(&self, kind: SheetKind) -> impl Future<Output = Result<String, SourceError>> + Send {
        let text = match kind {
            SheetKind::Vendor => self.vendor_csv.clone(),
            SheetKind::Internal => self.internal_csv.clone(),
        };
        async move { Ok(text) }
    }
}
