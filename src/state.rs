use crate::{
    services::auth_service::{SessionService, SessionSettings},
    store::Store,
};

#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub session: SessionSettings,
}

impl AppState {
    pub fn new(store: Store, session: SessionSettings) -> Self {
        Self { store, session }
    }

    pub fn sessions(&self) -> SessionService {
        SessionService::new(&self.store, self.session.clone())
    }
}
