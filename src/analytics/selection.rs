//! Selection State
//!
//! Tracks which channel of the current list is shown in detail.

use super::error::{AnalyticsError, AnalyticsResult};
use super::types::LinkedChannel;

/// The current channel list and the active channel within it
#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    channels: Vec<LinkedChannel>,
    selected: Option<String>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a freshly aggregated list
    ///
    /// Keeps the prior selection when it is still listed, otherwise
    /// selects the first channel (or nothing for an empty list).
    pub fn replace(&mut self, channels: Vec<LinkedChannel>) {
        let keep = self
            .selected
            .as_deref()
            .is_some_and(|url| channels.iter().any(|c| c.url == url));

        if !keep {
            self.selected = channels.first().map(|c| c.url.clone());
        }
        self.channels = channels;
    }

    /// Select a channel by URL
    ///
    /// An unknown URL leaves the selection unchanged.
    pub fn select(&mut self, url: &str) -> AnalyticsResult<&LinkedChannel> {
        let channel = self
            .channels
            .iter()
            .find(|c| c.url == url)
            .ok_or_else(|| AnalyticsError::UnknownChannelSelected(url.to_string()))?;

        self.selected = Some(channel.url.clone());
        Ok(channel)
    }

    /// The selected channel, if any
    pub fn current(&self) -> Option<&LinkedChannel> {
        let url = self.selected.as_deref()?;
        self.channels.iter().find(|c| c.url == url)
    }

    pub fn channels(&self) -> &[LinkedChannel] {
        &self.channels
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }
}
