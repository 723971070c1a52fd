use crate::domain_model::Route;
use crate::domain_port::Navigator;
use crate::logger::*;
use std::sync::Mutex;

/// Keeps the visited routes in memory, newest last.
#[derive(Debug)]
pub struct HistoryNavigator {
    history: Mutex<Vec<Route>>,
}

impl HistoryNavigator {
    pub fn new(start: Route) -> Self {
        Self {
            history: Mutex::new(vec![start]),
        }
    }

    pub fn current(&self) -> Route {
        self.history
            .lock()
            .ok()
            .and_then(|h| h.last().copied())
            .unwrap_or(Route::Landing)
    }

    pub fn history(&self) -> Vec<Route> {
        self.history.lock().map(|h| h.clone()).unwrap_or_default()
    }
}

impl Default for HistoryNavigator {
    fn default() -> Self {
        Self::new(Route::Landing)
    }
}

impl Navigator for HistoryNavigator {
    fn navigate(&self, route: Route) {
        info!(%route, "navigate");
        if let Ok(mut history) = self.history.lock() {
            history.push(route);
        }
    }
}
