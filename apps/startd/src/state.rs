use std::sync::Arc;

use tokio::sync::Mutex;

use crate::config::Config;
use crate::source::collaborators::{IconProvider, Launcher, ShortcutResolver};
use crate::screen::StartScreen;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// The one start screen. Holding the lock for a whole event keeps
    /// reconcile → layout passes strictly sequential.
    pub screen: Arc<Mutex<StartScreen>>,
    pub resolver: Arc<dyn ShortcutResolver>,
    pub icons: Arc<dyn IconProvider>,
    pub launcher: Arc<dyn Launcher>,
}
