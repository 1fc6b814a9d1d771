use crate::store::StoreClient;

/// Application state shared by every handler
pub struct AppState {
  pub store: StoreClient,
}

impl AppState {
  pub fn new(store: StoreClient) -> Self {
    Self { store }
  }
}
