use std::sync::Arc;

use crate::config::AppConfig;
use crate::rfo::logo::{FsLogoStore, LogoStore, MemoryLogoStore};
use crate::rfo::ticket::TicketGenerator;

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub tickets: TicketGenerator,
    pub logo_store: Arc<dyn LogoStore + Send + Sync>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let logo_store: Arc<dyn LogoStore + Send + Sync> = match &config.logo_dir {
            Some(dir) => {
                log::info!("Persisting current logo under {}", dir.display());
                Arc::new(FsLogoStore::new(dir.clone()))
            }
            None => {
                log::info!("RFO_LOGO_DIR not set, keeping current logo in memory");
                Arc::new(MemoryLogoStore::new())
            }
        };
        Self::with_logo_store(config, logo_store)
    }

    pub fn with_logo_store(
        config: AppConfig,
        logo_store: Arc<dyn LogoStore + Send + Sync>,
    ) -> Self {
        let tickets = TicketGenerator::new(config.ticket_prefix.clone());
        Self {
            config,
            tickets,
            logo_store,
        }
    }
}
