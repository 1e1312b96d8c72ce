//! Routing of `tracing` events into the facade.

use logfacade_core::{EngineLayer, Logger};
use tracing_subscriber::prelude::*;
use tracing_subscriber::util::TryInitError;

use crate::facade;

/// Layer that records every `tracing` event through whichever handle is
/// active at the time of the event.
///
/// Compose it with other layers when the application owns its subscriber:
///
/// ```ignore
/// use tracing_subscriber::prelude::*;
///
/// tracing_subscriber::registry()
///     .with(logfacade::tracing_layer())
///     .with(tracing_subscriber::fmt::layer())
///     .init();
/// ```
pub fn tracing_layer() -> EngineLayer<fn() -> Option<Logger>> {
    EngineLayer::new(facade::handle as fn() -> Option<Logger>)
}

/// Install [`tracing_layer`] as the global default subscriber.
///
/// Fails if a global subscriber is already set.
pub fn install_tracing_bridge() -> Result<(), TryInitError> {
    tracing_subscriber::registry().with(tracing_layer()).try_init()
}
