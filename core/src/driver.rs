//! Entry point tying a `Client` to the endpoint groups.

use crate::client::{Client, Executor};
use crate::endpoints::{Channels, Endpoint, Posts, Reactions, Teams, Users};
use crate::options::DriverOptions;

/// Owns the transport; endpoint groups borrow it.
#[derive(Debug, Clone)]
pub struct Driver<E> {
    options: DriverOptions,
    client: Client<E>,
}

impl<E: Executor> Driver<E> {
    pub fn new(options: DriverOptions, executor: E) -> Self {
        let client = Client::new(&options, executor);
        Self { options, client }
    }

    pub fn options(&self) -> &DriverOptions {
        &self.options
    }

    pub fn client(&self) -> &Client<E> {
        &self.client
    }

    pub fn teams(&self) -> Teams<'_> {
        Teams::new(&self.client)
    }

    pub fn channels(&self) -> Channels<'_> {
        Channels::new(&self.client)
    }

    pub fn posts(&self) -> Posts<'_> {
        Posts::new(&self.client)
    }

    pub fn reactions(&self) -> Reactions<'_> {
        Reactions::new(&self.client)
    }

    pub fn users(&self) -> Users<'_> {
        Users::new(&self.client)
    }
}

#[cfg(feature = "ureq")]
impl Driver<crate::ureq_executor::UreqExecutor> {
    /// Driver over a blocking ureq agent configured from `options`.
    pub fn with_ureq(options: DriverOptions) -> Self {
        let executor = crate::ureq_executor::UreqExecutor::new(&options);
        Self::new(options, executor)
    }
}
