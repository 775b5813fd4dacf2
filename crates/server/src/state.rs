use paddy_store::Stores;

/// Shared across handlers as `Arc<AppState>`.
pub struct AppState {
    pub stores: Stores,
}

impl AppState {
    pub fn new(stores: Stores) -> Self {
        Self { stores }
    }
}
