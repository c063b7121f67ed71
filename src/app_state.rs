use crate::config::Config;
use crate::repositories::Repositories;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub repositories: Repositories,
}

impl AppState {
    pub fn new(config: Config, repositories: Repositories) -> Self {
        Self {
            config,
            repositories,
        }
    }
}
