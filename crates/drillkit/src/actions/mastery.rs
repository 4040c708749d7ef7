//! Mastery updates.

use tracing::debug;

use crate::client::DrillClient;
use crate::error::Result;
use crate::types::CardUpdate;

/// Provides access to mastery update operations.
///
/// Obtained via [`DrillClient::mastery()`].
#[derive(Debug)]
pub struct MasteryActions<'a> {
    pub(crate) client: &'a DrillClient,
}

impl<'a> MasteryActions<'a> {
    /// Push a batch of mastery updates.
    ///
    /// An empty batch is not sent.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use drillkit::{CardUpdate, DrillClient};
    /// # async fn example() -> drillkit::Result<()> {
    /// let client = DrillClient::new();
    /// client
    ///     .mastery()
    ///     .update(&[CardUpdate::known(1, true), CardUpdate::known(2, false)])
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn update(&self, updates: &[CardUpdate]) -> Result<()> {
        if updates.is_empty() {
            return Ok(());
        }

        debug!(count = updates.len(), "Pushing mastery updates");
        self.client
            .post_json("update mastery", "update", updates)
            .await
    }
}
