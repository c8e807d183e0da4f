use reqora_application::RequestService;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub request_service: RequestService,
}
