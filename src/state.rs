use std::collections::BTreeMap;
use std::sync::mpsc::{self, Receiver, TryRecvError};

use log::error;

use crate::chart::ChartBoard;
use crate::color::PurposePalette;
use crate::config::{DashboardConfig, Source};
use crate::dashboard::render_source;
use crate::data::loader::{spawn_loads, LoadedSource};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Progress of one source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    Pending,
    /// Rows loaded and charts rendered.
    Loaded { rows: usize, charts: usize },
    /// Load failed or the source had no rows.
    Empty,
}

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: DashboardConfig,
    pub palette: PurposePalette,

    /// Charts currently on screen.
    pub board: ChartBoard,

    pub status: BTreeMap<Source, LoadStatus>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Finished loads arrive here while a load is running.
    receiver: Option<Receiver<LoadedSource>>,
}

impl AppState {
    pub fn new(config: DashboardConfig) -> Self {
        let palette = PurposePalette::from_config(&config);
        Self {
            config,
            palette,
            board: ChartBoard::default(),
            status: BTreeMap::new(),
            status_message: None,
            receiver: None,
        }
    }

    /// Kick off loading every source in the background.
    ///
    /// `notify` is called from the loader thread once results are waiting.
    pub fn start_loading(&mut self, notify: impl Fn() + Send + 'static) {
        self.board.clear();
        self.status = Source::ALL
            .iter()
            .map(|&source| (source, LoadStatus::Pending))
            .collect();
        self.status_message = None;

        let (sender, receiver) = mpsc::channel();
        match spawn_loads(self.config.clone(), sender, notify) {
            Ok(_) => self.receiver = Some(receiver),
            Err(e) => {
                error!("could not spawn loader thread: {e}");
                self.status_message = Some(format!("Error: {e}"));
                self.receiver = None;
            }
        }
    }

    /// Drain finished loads without blocking.
    pub fn poll_loads(&mut self) {
        let Some(receiver) = self.receiver.take() else {
            return;
        };

        let mut finished = false;
        let mut arrived = Vec::new();
        loop {
            match receiver.try_recv() {
                Ok(loaded) => arrived.push(loaded),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    finished = true;
                    break;
                }
            }
        }

        for loaded in arrived {
            self.ingest(loaded);
        }
        if !finished {
            self.receiver = Some(receiver);
        }
    }

    /// Render the charts of one loaded source.
    pub fn ingest(&mut self, loaded: LoadedSource) {
        let LoadedSource { source, table } = loaded;
        let status = if table.is_empty() {
            LoadStatus::Empty
        } else {
            let charts = render_source(source, &table, &self.config, &self.palette, &mut self.board);
            LoadStatus::Loaded {
                rows: table.len(),
                charts,
            }
        };
        self.status.insert(source, status);
    }

    pub fn is_loading(&self) -> bool {
        self.status.values().any(|s| *s == LoadStatus::Pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{SurveyRow, SurveyTable};

    fn gender_table() -> SurveyTable {
        let rows = vec![
            [("Breakdowns", "Males"), ("Purposes", "Using e-mail"), ("2024", "80")]
                .into_iter()
                .collect::<SurveyRow>(),
        ];
        SurveyTable::new(vec![], rows)
    }

    #[test]
    fn ingest_renders_and_records_status() {
        let mut state = AppState::new(DashboardConfig::default());
        state.ingest(LoadedSource {
            source: Source::Gender,
            table: gender_table(),
        });
        state.ingest(LoadedSource {
            source: Source::Age,
            table: SurveyTable::default(),
        });

        assert_eq!(
            state.status.get(&Source::Gender),
            Some(&LoadStatus::Loaded { rows: 1, charts: 1 })
        );
        assert_eq!(state.status.get(&Source::Age), Some(&LoadStatus::Empty));
        assert_eq!(state.board.len(), 1);
    }

    #[test]
    fn poll_drains_channel_and_stops_after_disconnect() {
        let mut state = AppState::new(DashboardConfig::default());
        state.status = Source::ALL.iter().map(|&s| (s, LoadStatus::Pending)).collect();
        let (tx, rx) = mpsc::channel();
        state.receiver = Some(rx);

        tx.send(LoadedSource {
            source: Source::Gender,
            table: gender_table(),
        })
        .unwrap();
        state.poll_loads();
        assert!(state.receiver.is_some());
        assert!(state.is_loading());

        drop(tx);
        state.poll_loads();
        assert!(state.receiver.is_none());
        assert_eq!(state.board.len(), 1);
    }
}
