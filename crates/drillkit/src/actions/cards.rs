//! Deck retrieval.

use tracing::debug;

use crate::client::DrillClient;
use crate::error::Result;
use crate::types::Card;

/// Provides access to deck operations.
///
/// Obtained via [`DrillClient::cards()`].
#[derive(Debug)]
pub struct CardActions<'a> {
    pub(crate) client: &'a DrillClient,
}

impl<'a> CardActions<'a> {
    /// Fetch every card the webhook serves.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use drillkit::DrillClient;
    /// # async fn example() -> drillkit::Result<()> {
    /// let client = DrillClient::new();
    /// for card in client.cards().list().await? {
    ///     println!("{} = {}", card.term, card.gloss);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn list(&self) -> Result<Vec<Card>> {
        let cards: Vec<Card> = self.client.get_json("list cards", "").await?;
        debug!(count = cards.len(), "Fetched cards");
        Ok(cards)
    }
}
