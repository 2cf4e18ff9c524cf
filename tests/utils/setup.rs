use axum::Router;

use set_designer::{build_router, AppState};

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

/// The full router over in-memory repositories
pub struct TestApp {
    pub router: Router,
}

pub struct TestAppBuilder {
    state: AppState,
}

impl TestAppBuilder {
    pub fn new() -> Self {
        Self {
            state: AppState::in_memory(),
        }
    }

    #[allow(dead_code)]
    pub fn with_state(mut self, state: AppState) -> Self {
        self.state = state;
        self
    }

    pub fn build(self) -> TestApp {
        TestApp {
            router: build_router(self.state),
        }
    }
}
