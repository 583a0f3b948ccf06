use std::sync::Arc;

use enjoyrecord_search::Catalog;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    /// Shared admin secret; `None` leaves the admin routes open.
    pub admin_password: Option<String>,
}

impl AppState {
    pub fn new(catalog: Catalog, admin_password: Option<String>) -> Self {
        Self {
            catalog: Arc::new(catalog),
            admin_password: admin_password
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty()),
        }
    }

    pub fn admin_configured(&self) -> bool {
        self.admin_password.is_some()
    }
}
