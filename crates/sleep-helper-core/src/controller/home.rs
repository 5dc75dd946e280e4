use crate::{
    catalog::{AudioCategory, AudioEntry, CatalogStore},
    controller::Screen,
};

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::watch;
use tracing::{debug, instrument, warn};

/// What the home screen renders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HomeState {
    /// Bundled white-noise tracks.
    pub white_noise: Vec<AudioEntry>,
    /// Bundled stories.
    pub stories: Vec<AudioEntry>,
    /// Recordings found on disk.
    pub recordings: Vec<AudioEntry>,
    /// True while the categories are being queried.
    pub is_loading: bool,
    /// Message for the last failed query.
    pub error: Option<String>,
}

impl HomeState {
    /// Entries listed under `category`.
    pub fn list(&self, category: AudioCategory) -> &[AudioEntry] {
        match category {
            AudioCategory::WhiteNoise => &self.white_noise,
            AudioCategory::Story => &self.stories,
            AudioCategory::Recording => &self.recordings,
        }
    }

    fn list_mut(&mut self, category: AudioCategory) -> &mut Vec<AudioEntry> {
        match category {
            AudioCategory::WhiteNoise => &mut self.white_noise,
            AudioCategory::Story => &mut self.stories,
            AudioCategory::Recording => &mut self.recordings,
        }
    }
}

/// Catalog lists for the home screen.
pub struct HomeController {
    catalog: Arc<CatalogStore>,
    state_tx: watch::Sender<HomeState>,
}

impl HomeController {
    /// Controller with empty lists; call [`load_data`](Self::load_data) or
    /// enter the screen to fill them.
    pub fn new(catalog: Arc<CatalogStore>) -> Self {
        let (state_tx, _) = watch::channel(HomeState::default());
        Self { catalog, state_tx }
    }

    /// Current snapshot.
    pub fn state(&self) -> HomeState {
        self.state_tx.borrow().clone()
    }

    /// Receiver observing every update.
    pub fn subscribe(&self) -> watch::Receiver<HomeState> {
        self.state_tx.subscribe()
    }

    /// Re-query every category.
    ///
    /// Categories are loaded one after another and each list is published
    /// before the next query starts. A failed category keeps its previous list.
    #[instrument(skip(self))]
    pub async fn load_data(&self) {
        self.state_tx.send_modify(|state| {
            state.is_loading = true;
            state.error = None;
        });

        for category in AudioCategory::ALL {
            match self.catalog.list_by_category(category).await {
                Ok(entries) => {
                    debug!(?category, count = entries.len(), "Category loaded");
                    self.state_tx
                        .send_modify(|state| *state.list_mut(category) = entries);
                }
                Err(e) => {
                    warn!(?category, error = %e, "Failed to load category");
                    self.state_tx
                        .send_modify(|state| state.error = Some(e.user_message()));
                }
            }
        }

        self.state_tx.send_modify(|state| state.is_loading = false);
    }
}

#[async_trait]
impl Screen for HomeController {
    async fn on_enter(&mut self) {
        self.load_data().await;
    }

    async fn on_exit(&mut self) {}
}
