//! Connection session: gateway, settings store and product availability

use std::sync::Arc;
use tracing::info;

use crate::command::check_product_command;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::gateway::{Gateway, HttpGateway};
use crate::store::Store;

/// One configured connection to a remote system, shared by every CLI
/// operation. Product availability is probed lazily and cached until
/// [`Session::reload`].
pub struct Session {
    config: Config,
    gateway: Arc<dyn Gateway>,
    store: Store,
    product_available: Option<bool>,
}

impl Session {
    pub fn connect(config: Config) -> Result<Session> {
        let gateway = HttpGateway::new(
            &config.connection.base_url,
            config.connection.token.as_deref(),
        )?;
        let store = Store::new(&config.settings_file);
        Ok(Session {
            gateway: Arc::new(gateway),
            store,
            config,
            product_available: None,
        })
    }

    /// Session over an already-built gateway. Used by tests to substitute
    /// a scripted transport.
    pub fn with_gateway(config: Config, gateway: Arc<dyn Gateway>) -> Session {
        let store = Store::new(&config.settings_file);
        Session {
            gateway,
            store,
            config,
            product_available: None,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn gateway(&self) -> &dyn Gateway {
        self.gateway.as_ref()
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn product_library(&self) -> &str {
        &self.config.connection.product_library
    }

    /// Whether the conversion utility exists in the configured product
    /// library. A transport failure propagates; a failed object check is
    /// just `false`.
    pub async fn check_product(&mut self) -> Result<bool> {
        if let Some(available) = self.product_available {
            return Ok(available);
        }
        let command = check_product_command(self.product_library());
        let result = self.gateway.run_command(&command).await?;
        let available = result.succeeded();
        info!(
            library = self.product_library(),
            available, "checked conversion utility"
        );
        self.product_available = Some(available);
        Ok(available)
    }

    /// Error out unless the conversion utility is installed.
    pub async fn ensure_product(&mut self) -> Result<()> {
        if self.check_product().await? {
            Ok(())
        } else {
            Err(Error::ProductUnavailable(self.product_library().to_string()))
        }
    }

    /// Drop cached probe results so the next check hits the remote again.
    pub fn reload(&mut self) {
        self.product_available = None;
    }
}
