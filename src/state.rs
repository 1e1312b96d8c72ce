//! The process-wide facade state and its lock.
//!
//! All mutable facade state lives here, behind one `RwLock`. Writers hold the
//! lock only to swap handles; anything that can block on I/O (building a
//! logger, flushing a superseded one) happens outside it.

use std::sync::LazyLock;

use logfacade_core::{default_config, Environment, Logger, SugaredLogger};
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Active handles plus the environment they were configured for.
#[derive(Debug)]
pub(crate) struct FacadeState {
    pub(crate) logger: Option<Logger>,
    pub(crate) sugar: Option<SugaredLogger>,
    pub(crate) environment: Environment,
}

static STATE: LazyLock<RwLock<FacadeState>> = LazyLock::new(|| RwLock::new(FacadeState::startup()));

impl FacadeState {
    /// Development defaults, built on first use of the facade. Without a
    /// working baseline logger the process cannot continue.
    fn startup() -> Self {
        let config = default_config(Environment::Development);
        match Logger::build(&config) {
            Ok(logger) => {
                let mut state = FacadeState {
                    logger: None,
                    sugar: None,
                    environment: config.environment,
                };
                let _ = state.install(logger, config.environment);
                state
            }
            Err(err) => {
                eprintln!("Failed to initialize logger: {}", err);
                std::process::exit(1);
            }
        }
    }

    /// Swap in a new handle, returning the one it replaces.
    pub(crate) fn install(&mut self, logger: Logger, environment: Environment) -> Option<Logger> {
        self.sugar = Some(logger.sugar());
        self.environment = environment;
        self.logger.replace(logger)
    }

    /// Drop to the uninitialized state, returning the handle that was active.
    pub(crate) fn clear(&mut self) -> Option<Logger> {
        self.sugar = None;
        self.logger.take()
    }
}

pub(crate) fn read() -> RwLockReadGuard<'static, FacadeState> {
    STATE.read()
}

pub(crate) fn write() -> RwLockWriteGuard<'static, FacadeState> {
    STATE.write()
}
