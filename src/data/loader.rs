use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use std::thread::JoinHandle;

use futures::future::join_all;
use log::{debug, error, info, warn};
use reqwest::{Client, StatusCode};
use thiserror::Error;
use url::Url;

use super::model::{SurveyRow, SurveyTable};
use crate::config::{DashboardConfig, Source};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Everything that can go wrong while loading one source.
///
/// None of these escape [`load_or_empty`]; they are logged and the source
/// degrades to an empty table.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("invalid source location {location:?}: {reason}")]
    InvalidLocation { location: String, reason: String },
    #[error("request to {url} failed: {source}")]
    Transport {
        url: Url,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} answered {status}")]
    Status { url: Url, status: StatusCode },
    #[error("reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("no header line containing {marker} found")]
    MissingHeader { marker: String },
    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),
}

// ---------------------------------------------------------------------------
// Source locations
// ---------------------------------------------------------------------------

/// Where a source is read from: a remote URL or a local file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceLocation {
    Url(Url),
    File(PathBuf),
}

fn is_remote(s: &str) -> bool {
    s.starts_with("http://") || s.starts_with("https://")
}

fn invalid(location: &str, reason: impl ToString) -> LoadError {
    LoadError::InvalidLocation {
        location: location.to_string(),
        reason: reason.to_string(),
    }
}

impl SourceLocation {
    /// Resolve a source file name against a base URL or directory.
    ///
    /// An absolute URL as `name` wins over the base.
    pub fn resolve(base: &str, name: &str) -> Result<Self, LoadError> {
        if is_remote(name) {
            return Url::parse(name)
                .map(SourceLocation::Url)
                .map_err(|e| invalid(name, e));
        }

        if is_remote(base) {
            let mut base_url = Url::parse(base).map_err(|e| invalid(base, e))?;
            if !base_url.path().ends_with('/') {
                let dir = format!("{}/", base_url.path());
                base_url.set_path(&dir);
            }
            let url = base_url.join(name).map_err(|e| invalid(name, e))?;
            return Ok(SourceLocation::Url(url));
        }

        if base.starts_with("file://") {
            let dir = Url::parse(base)
                .map_err(|e| invalid(base, e))?
                .to_file_path()
                .map_err(|()| invalid(base, "not a local file path"))?;
            return Ok(SourceLocation::File(dir.join(name)));
        }

        Ok(SourceLocation::File(Path::new(base).join(name)))
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceLocation::Url(url) => write!(f, "{url}"),
            SourceLocation::File(path) => write!(f, "{}", path.display()),
        }
    }
}

// ---------------------------------------------------------------------------
// Fetch + parse
// ---------------------------------------------------------------------------

/// Read the raw text of a source.
pub async fn fetch_text(client: &Client, location: &SourceLocation) -> Result<String, LoadError> {
    match location {
        SourceLocation::Url(url) => {
            let transport = |source: reqwest::Error| LoadError::Transport {
                url: url.clone(),
                source,
            };
            let response = client.get(url.clone()).send().await.map_err(transport)?;
            let status = response.status();
            if !status.is_success() {
                return Err(LoadError::Status {
                    url: url.clone(),
                    status,
                });
            }
            response.text().await.map_err(transport)
        }
        SourceLocation::File(path) => {
            tokio::fs::read_to_string(path)
                .await
                .map_err(|source| LoadError::Io {
                    path: path.clone(),
                    source,
                })
        }
    }
}

/// Parse survey CSV text.
///
/// Layout: an arbitrary metadata preamble, then a header line containing
/// `marker`, then ordinary comma-separated records. Records may be shorter
/// than the header. Records without a `Purposes` value are dropped.
pub fn parse_survey_csv(text: &str, marker: &str) -> Result<SurveyTable, LoadError> {
    let start = header_offset(text, marker).ok_or_else(|| LoadError::MissingHeader {
        marker: marker.to_string(),
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(text[start..].as_bytes());
    let columns: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

    let mut rows = Vec::new();
    let mut dropped = 0usize;
    for record in reader.records() {
        let record = record?;
        let row: SurveyRow = columns
            .iter()
            .zip(record.iter())
            .map(|(column, cell)| (column.as_str(), cell))
            .collect();

        if row.purpose().map_or(true, str::is_empty) {
            dropped += 1;
            continue;
        }
        rows.push(row);
    }

    debug!(
        "parsed {} rows ({dropped} without purpose dropped), columns {columns:?}",
        rows.len()
    );
    Ok(SurveyTable::new(columns, rows))
}

/// Byte offset of the first line containing `marker`.
fn header_offset(text: &str, marker: &str) -> Option<usize> {
    let mut offset = 0;
    for line in text.split_inclusive('\n') {
        if line.contains(marker) {
            return Some(offset);
        }
        offset += line.len();
    }
    None
}

/// Fetch and parse one source.
pub async fn load_source(
    client: &Client,
    location: &SourceLocation,
    marker: &str,
) -> Result<SurveyTable, LoadError> {
    let text = fetch_text(client, location).await?;
    parse_survey_csv(&text, marker)
}

/// Load one configured source, degrading any failure to an empty table.
pub async fn load_or_empty(client: &Client, source: Source, config: &DashboardConfig) -> SurveyTable {
    let name = config.sources.file_for(source);
    let location = match SourceLocation::resolve(&config.base, name) {
        Ok(location) => location,
        Err(e) => {
            error!("{source}: {e}");
            return SurveyTable::default();
        }
    };

    match load_source(client, &location, &config.header_marker).await {
        Ok(table) => {
            info!("{source}: loaded {} rows from {location}", table.len());
            table
        }
        Err(e) => {
            error!("{source}: failed to load {location}: {e}");
            SurveyTable::default()
        }
    }
}

/// Load all four sources concurrently and wait for every one of them.
///
/// A failing source never cancels its siblings; it just comes back empty.
pub async fn load_all(client: &Client, config: &DashboardConfig) -> Vec<(Source, SurveyTable)> {
    let loads = Source::ALL.iter().map(|&source| async move {
        (source, load_or_empty(client, source, config).await)
    });
    join_all(loads).await
}

// ---------------------------------------------------------------------------
// Background loading
// ---------------------------------------------------------------------------

/// A finished load, handed from the loader thread to the UI.
#[derive(Debug)]
pub struct LoadedSource {
    pub source: Source,
    pub table: SurveyTable,
}

/// Run [`load_all`] on a dedicated tokio runtime thread.
///
/// Each table is sent over `sender`; `notify` is called once everything
/// has been sent so the UI can wake up.
pub fn spawn_loads(
    config: DashboardConfig,
    sender: Sender<LoadedSource>,
    notify: impl Fn() + Send + 'static,
) -> std::io::Result<JoinHandle<()>> {
    std::thread::Builder::new()
        .name("source-loader".into())
        .spawn(move || {
            let results = match run_loads(&config) {
                Ok(results) => results,
                Err(e) => {
                    error!("could not start loader: {e:#}");
                    Source::ALL
                        .iter()
                        .map(|&source| (source, SurveyTable::default()))
                        .collect()
                }
            };

            for (source, table) in results {
                if sender.send(LoadedSource { source, table }).is_err() {
                    warn!("UI went away before {source} was delivered");
                    return;
                }
            }
            notify();
        })
}

fn run_loads(config: &DashboardConfig) -> anyhow::Result<Vec<(Source, SurveyTable)>> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let client = Client::builder().build()?;
    Ok(runtime.block_on(load_all(&client, config)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const GENDER_CSV: &str = "\
Internet use by purpose
Source: household survey,,,
Unit: % of individuals,,,

\"Breakdowns\",\"Purposes\",\"2023\",\"2024\"
Males,Using e-mail,79,80
Females,Using e-mail,74,75
Males,,12,13
Males
Females,Participating in social networks,.,66
";

    #[test]
    fn preamble_is_skipped_and_rows_without_purpose_dropped() {
        // Both the empty `Purposes` cell and the one-field `Males` record go.
        let table = parse_survey_csv(GENDER_CSV, "\"Breakdowns\"").unwrap();
        assert_eq!(table.columns, vec!["Breakdowns", "Purposes", "2023", "2024"]);
        assert_eq!(table.len(), 3);
        assert!(table.rows.iter().all(|r| r.purpose().is_some_and(|p| !p.is_empty())));
        assert_eq!(table.rows[0].get("2024"), Some("80"));
        assert_eq!(table.rows[2].value("2023"), None);
    }

    #[test]
    fn missing_marker_is_missing_header() {
        let text = "Breakdowns,Purposes,2024\nMales,Using e-mail,80\n";
        let err = parse_survey_csv(text, "\"Breakdowns\"").unwrap_err();
        assert!(matches!(err, LoadError::MissingHeader { .. }));
    }

    #[test]
    fn short_records_keep_present_cells() {
        let text = "\"Breakdowns\",\"Purposes\",\"2023\",\"2024\"\nAll,Using e-mail,70\n";
        let table = parse_survey_csv(text, "\"Breakdowns\"").unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.rows[0].value("2023"), Some(70.0));
        assert_eq!(table.rows[0].get("2024"), None);
    }

    #[test]
    fn crlf_line_endings_parse() {
        let text = "meta\r\n\"Breakdowns\",\"Purposes\",\"2024\"\r\nAll,Using e-mail,70\r\n";
        let table = parse_survey_csv(text, "\"Breakdowns\"").unwrap();
        assert_eq!(table.rows[0].value("2024"), Some(70.0));
    }

    #[test]
    fn resolve_against_directory_and_url() {
        assert_eq!(
            SourceLocation::resolve("data", "AGE.csv").unwrap(),
            SourceLocation::File(PathBuf::from("data").join("AGE.csv"))
        );
        assert_eq!(
            SourceLocation::resolve("https://example.org/survey", "AGE.csv").unwrap(),
            SourceLocation::Url(Url::parse("https://example.org/survey/AGE.csv").unwrap())
        );
        assert_eq!(
            SourceLocation::resolve("data", "http://mirror.example.org/AGE.csv").unwrap(),
            SourceLocation::Url(Url::parse("http://mirror.example.org/AGE.csv").unwrap())
        );
    }

    #[tokio::test]
    async fn load_source_reads_local_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Gender.csv");
        std::fs::write(&path, GENDER_CSV).unwrap();

        let client = Client::new();
        let table = load_source(&client, &SourceLocation::File(path), "\"Breakdowns\"")
            .await
            .unwrap();
        assert_eq!(table.len(), 3);
    }

    #[tokio::test]
    async fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let client = Client::new();
        let err = load_source(
            &client,
            &SourceLocation::File(dir.path().join("absent.csv")),
            "\"Breakdowns\"",
        )
        .await
        .unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }

    /// Serve every connection on a local port with `response`, then close it.
    async fn serve(response: &'static str) -> std::net::SocketAddr {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            while let Ok((mut stream, _)) = listener.accept().await {
                let mut buf = [0u8; 1024];
                let _ = stream.read(&mut buf).await;
                let _ = stream.write_all(response.as_bytes()).await;
                let _ = stream.shutdown().await;
            }
        });
        addr
    }

    fn local_client() -> Client {
        Client::builder().no_proxy().build().unwrap()
    }

    #[tokio::test]
    async fn http_error_status_is_a_status_error_and_degrades_to_empty() {
        let addr = serve("HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n").await;
        let base = format!("http://{addr}/data");
        let client = local_client();

        let location = SourceLocation::resolve(&base, "Gender.csv").unwrap();
        let err = load_source(&client, &location, "\"Breakdowns\"").await.unwrap_err();
        assert!(matches!(err, LoadError::Status { status, .. } if status == StatusCode::NOT_FOUND));

        let config = DashboardConfig {
            base,
            ..DashboardConfig::default()
        };
        assert!(load_or_empty(&client, Source::Gender, &config).await.is_empty());
    }

    #[tokio::test]
    async fn http_success_is_parsed() {
        let addr = serve(
            "HTTP/1.1 200 OK\r\nContent-Length: 51\r\nConnection: close\r\n\r\n\
\"Breakdowns\",\"Purposes\",\"2024\"\nAll,Using e-mail,70\n",
        )
        .await;
        let location = SourceLocation::resolve(&format!("http://{addr}"), "AGE.csv").unwrap();
        let table = load_source(&local_client(), &location, "\"Breakdowns\"").await.unwrap();
        assert_eq!(table.rows[0].value("2024"), Some(70.0));
    }

    #[tokio::test]
    async fn refused_connection_is_a_transport_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let location = SourceLocation::resolve(&format!("http://{addr}"), "Geography.csv").unwrap();
        let err = load_source(&local_client(), &location, "\"Breakdowns\"").await.unwrap_err();
        assert!(matches!(err, LoadError::Transport { .. }));
    }

    #[tokio::test]
    async fn load_all_degrades_failures_independently() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("Gender.csv"), GENDER_CSV).unwrap();
        std::fs::write(dir.path().join("AGE.csv"), "no header here\n1,2,3\n").unwrap();

        let config = DashboardConfig {
            base: dir.path().display().to_string(),
            ..DashboardConfig::default()
        };
        let client = Client::new();
        let results = load_all(&client, &config).await;

        assert_eq!(results.len(), 4);
        let rows = |wanted: Source| {
            results
                .iter()
                .find(|(source, _)| *source == wanted)
                .map(|(_, table)| table.len())
        };
        assert_eq!(rows(Source::Gender), Some(3));
        assert_eq!(rows(Source::Age), Some(0));
        assert_eq!(rows(Source::Geography), Some(0));
        assert_eq!(rows(Source::Overtime), Some(0));
    }

    #[test]
    fn spawned_loads_deliver_every_source() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("Overtime.csv"), GENDER_CSV).unwrap();
        let config = DashboardConfig {
            base: dir.path().display().to_string(),
            ..DashboardConfig::default()
        };

        let (tx, rx) = std::sync::mpsc::channel();
        let handle = spawn_loads(config, tx, || {}).unwrap();
        handle.join().unwrap();

        let delivered: Vec<LoadedSource> = rx.try_iter().collect();
        assert_eq!(delivered.len(), 4);
        let overtime = delivered
            .iter()
            .find(|l| l.source == Source::Overtime)
            .unwrap();
        assert_eq!(overtime.table.len(), 3);
    }
}
