//! Portal user operations.

use tracing::instrument;

use super::client::Client;
use super::error::Result;
use super::request::Request;
use super::types::{Envelope, User};

impl Client {
    /// List the portal's users.
    #[instrument(skip(self))]
    pub fn get_users(&self) -> Result<Vec<User>> {
        Ok(self
            .query::<Envelope<Vec<User>>>(Request::new("/api/2.0/people/filter.json"))?
            .into_inner())
    }
}
