//! Download the LANCE AMSR2 granules that are ready for near-real-time use.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Serialize;
use tb_common::{TbError, TbResult};
use tracing::{info, instrument, warn};

use crate::auth::{AuthError, CredentialSource, EarthdataSession};
use crate::catalog::GranuleCatalog;
use crate::config::FetcherConfig;
use crate::download::{download_granule, DownloadError};
use crate::granules::{filter_out_last_day, GranuleInfo, GranuleParser};

/// What happened to each granule in a run.
#[derive(Debug, Default, Clone, Serialize, PartialEq)]
pub struct FetchReport {
    /// Newly written files
    pub downloaded: Vec<PathBuf>,
    /// Files left alone because they were already on disk
    pub already_present: Vec<PathBuf>,
    /// Granules no URL could deliver
    pub skipped: Vec<String>,
}

/// Options for one fetch run.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub output_dir: PathBuf,
    /// Replace files already present in `output_dir`
    pub overwrite: bool,
    /// Fail the run on the first granule that cannot be downloaded
    pub strict: bool,
}

/// Catalog search plus an authenticated download session.
pub struct LanceFetcher<C> {
    catalog: C,
    session: EarthdataSession,
    parser: GranuleParser,
    short_name: String,
    /// Longest wait for a response or the next body chunk
    idle_timeout: Duration,
}

impl<C: GranuleCatalog> LanceFetcher<C> {
    pub fn new(
        catalog: C,
        config: &FetcherConfig,
        credentials: CredentialSource,
    ) -> TbResult<Self> {
        Ok(Self {
            catalog,
            session: EarthdataSession::new(config, credentials)?,
            parser: GranuleParser::new(&config.expected_file_version)?,
            short_name: config.short_name.clone(),
            idle_timeout: config.timeout(),
        })
    }

    /// Download every trusted granule in the catalog.
    ///
    /// The latest day is left out unless it is a final granule. Missing
    /// Earthdata credentials end the run; any other failure only costs the
    /// granule it happened on, unless `options.strict` is set.
    #[instrument(skip(self), fields(short_name = %self.short_name))]
    pub async fn download_latest_lance_files(
        &mut self,
        options: &FetchOptions,
    ) -> TbResult<FetchReport> {
        let entries = self.catalog.search(&self.short_name).await?;
        let granules = filter_out_last_day(self.parser.granules_by_date(&entries)?);
        info!(
            listed = entries.len(),
            trusted = granules.len(),
            "Selected granules"
        );

        tokio::fs::create_dir_all(&options.output_dir).await?;

        let mut report = FetchReport::default();
        for (date, granule) in &granules {
            let output_path = options.output_dir.join(&granule.filename);
            if !options.overwrite && tokio::fs::metadata(&output_path).await.is_ok() {
                info!(%date, filename = %granule.filename, "Already present, skipping");
                report.already_present.push(output_path);
                continue;
            }

            match self.fetch_granule(granule, &options.output_dir).await {
                Ok(path) => report.downloaded.push(path),
                Err(err @ TbError::AuthenticationError(_)) => return Err(err),
                Err(err) if options.strict => return Err(err),
                Err(err) => {
                    warn!(%date, filename = %granule.filename, error = %err, "Skipping granule");
                    report.skipped.push(granule.filename.clone());
                }
            }
        }

        info!(
            downloaded = report.downloaded.len(),
            already_present = report.already_present.len(),
            skipped = report.skipped.len(),
            "Fetch complete"
        );
        Ok(report)
    }

    /// Try each of the granule's URLs in order.
    ///
    /// Login and transfer failures on one URL fall through to the next.
    /// Missing credentials are reported only if no URL delivered the file.
    async fn fetch_granule(
        &mut self,
        granule: &GranuleInfo,
        output_dir: &Path,
    ) -> TbResult<PathBuf> {
        let mut failures = Vec::new();
        let mut missing_credentials = None;

        for url in &granule.data_urls {
            match self.session.ensure_authenticated(url).await {
                Ok(()) => {}
                Err(err @ AuthError::MissingCredentials { .. }) => {
                    warn!(%url, error = %err, "Login required, trying next URL");
                    failures.push(err.to_string());
                    missing_credentials = Some(err);
                    continue;
                }
                Err(err) => {
                    warn!(%url, error = %err, "Host not ready, trying next URL");
                    failures.push(err.to_string());
                    continue;
                }
            }

            let client = self.session.client();
            match download_granule(client, url, output_dir, &granule.filename, self.idle_timeout)
                .await
            {
                Ok(path) => return Ok(path),
                Err(err @ DownloadError::NotFound { .. }) => {
                    warn!(%url, "Granule not found, trying next URL");
                    failures.push(err.to_string());
                }
                Err(err) => {
                    warn!(%url, error = %err, "Download failed, trying next URL");
                    failures.push(err.to_string());
                }
            }
        }

        if let Some(err) = missing_credentials {
            return Err(err.into());
        }

        let reason = if failures.is_empty() {
            "no download URLs in catalog entry".to_string()
        } else {
            failures.join("; ")
        };
        Err(TbError::RemoteFetchError {
            granule: granule.filename.clone(),
            reason,
        })
    }
}
