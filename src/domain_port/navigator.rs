use crate::domain_model::Route;

/// Moves the UI to another view.
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}
