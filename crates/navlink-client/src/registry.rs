//! Subscription registry: which subscription ids map to which watched topic.

use std::collections::HashMap;

use tracing::debug;

use crate::control::Channel;
use crate::topic::WatchedTopic;

/// An active subscription. The id equals the advertised channel id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Subscription {
    pub id: u32,
    pub channel_id: u32,
    pub topic: WatchedTopic,
}

/// Subscription table for one connection.
///
/// Cleared on every (re)connect; ids from an earlier connection never
/// resolve against a later one.
#[derive(Debug, Default)]
pub struct SubscriptionRegistry {
    entries: HashMap<u32, Subscription>,
}

impl SubscriptionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget every subscription.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Record a subscription for each advertised channel whose topic is
    /// watched and return the new entries in advertisement order.
    ///
    /// A re-advertised channel id replaces the earlier entry.
    pub fn subscribe_advertised(&mut self, channels: &[Channel]) -> Vec<Subscription> {
        let mut added = Vec::new();
        for channel in channels {
            let Some(topic) = WatchedTopic::from_topic(&channel.topic) else {
                continue;
            };
            let subscription = Subscription {
                id: channel.id,
                channel_id: channel.id,
                topic,
            };
            if let Some(previous) = self.entries.insert(subscription.id, subscription) {
                debug!(
                    subscription_id = subscription.id,
                    previous = %previous.topic,
                    topic = %topic,
                    "subscription replaced"
                );
            }
            added.push(subscription);
        }
        added
    }

    /// Drop subscriptions for withdrawn channels. Returns how many were removed.
    pub fn remove_channels(&mut self, channel_ids: &[u32]) -> usize {
        let before = self.entries.len();
        self.entries
            .retain(|_, subscription| !channel_ids.contains(&subscription.channel_id));
        before - self.entries.len()
    }

    /// Topic for a subscription id, if any.
    pub fn resolve(&self, subscription_id: u32) -> Option<WatchedTopic> {
        self.entries.get(&subscription_id).map(|s| s.topic)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Subscription> {
        self.entries.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn channel(id: u32, topic: &str) -> Channel {
        Channel {
            id,
            topic: topic.to_string(),
            encoding: "cdr".to_string(),
            schema_name: String::new(),
        }
    }

    #[test]
    fn only_watched_topics_subscribe() {
        let mut registry = SubscriptionRegistry::new();
        let added = registry.subscribe_advertised(&[
            channel(1, "/gps/heading"),
            channel(2, "/tf"),
            channel(3, "/sensor_status"),
        ]);

        assert_eq!(added.len(), 2);
        assert_eq!(added[0].id, 1);
        assert_eq!(added[1].channel_id, 3);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.resolve(1), Some(WatchedTopic::Heading));
        assert_eq!(registry.resolve(2), None);
        assert_eq!(registry.resolve(3), Some(WatchedTopic::SensorStatus));
    }

    #[test]
    fn readvertised_id_replaces_topic() {
        let mut registry = SubscriptionRegistry::new();
        registry.subscribe_advertised(&[channel(7, "/gps/fix")]);
        registry.subscribe_advertised(&[channel(7, "/gps/fix_filtered")]);

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.resolve(7), Some(WatchedTopic::FixFiltered));
    }

    #[test]
    fn clear_forgets_everything() {
        let mut registry = SubscriptionRegistry::new();
        registry.subscribe_advertised(&[channel(1, "/gps/heading")]);
        registry.clear();

        assert!(registry.is_empty());
        assert_eq!(registry.resolve(1), None);
    }

    #[test]
    fn remove_channels_counts_removed() {
        let mut registry = SubscriptionRegistry::new();
        registry.subscribe_advertised(&[
            channel(1, "/gps/heading"),
            channel(2, "/gps/fix"),
            channel(3, "/sensor_status"),
        ]);

        assert_eq!(registry.remove_channels(&[2, 3, 42]), 2);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.iter().next().map(|s| s.id), Some(1));
    }
}
