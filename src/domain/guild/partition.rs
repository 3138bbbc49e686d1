//! Splitting a user's guilds by bot presence.

use std::collections::HashSet;

use serde::Serialize;

use super::guild::Guild;

/// Guilds split into those that already have the target bot and the rest.
///
/// The two lists are disjoint and together hold every input guild exactly
/// once, in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GuildPartition {
    pub with_bot: Vec<Guild>,
    pub others: Vec<Guild>,
}

impl GuildPartition {
    /// Splits `guilds` using a per-guild presence verdict.
    ///
    /// Duplicate guild IDs keep their first occurrence.
    pub fn split<F>(guilds: Vec<Guild>, mut has_bot: F) -> Self
    where
        F: FnMut(&Guild) -> bool,
    {
        let mut seen = HashSet::new();
        let mut partition = Self::default();
        for guild in guilds {
            if !seen.insert(guild.id.clone()) {
                continue;
            }
            if has_bot(&guild) {
                partition.with_bot.push(guild);
            } else {
                partition.others.push(guild);
            }
        }
        partition
    }

    /// Every guild goes to `with_bot`. Used when no product was named and
    /// when presence cannot be determined at all.
    pub fn all_with_bot(guilds: Vec<Guild>) -> Self {
        Self::split(guilds, |_| true)
    }

    pub fn len(&self) -> usize {
        self.with_bot.len() + self.others.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn guild(id: &str) -> Guild {
        Guild {
            id: id.to_string(),
            name: id.to_string(),
            icon: None,
        }
    }

    #[test]
    fn split_routes_by_verdict() {
        let guilds = vec![guild("1"), guild("2"), guild("3")];
        let partition = GuildPartition::split(guilds, |g| g.id != "2");

        let with: Vec<_> = partition.with_bot.iter().map(|g| g.id.as_str()).collect();
        let others: Vec<_> = partition.others.iter().map(|g| g.id.as_str()).collect();
        assert_eq!(with, vec!["1", "3"]);
        assert_eq!(others, vec!["2"]);
    }

    #[test]
    fn duplicates_are_dropped() {
        let guilds = vec![guild("1"), guild("1"), guild("2")];
        let partition = GuildPartition::split(guilds, |_| false);
        assert_eq!(partition.len(), 2);
    }

    #[test]
    fn all_with_bot_leaves_others_empty() {
        let partition = GuildPartition::all_with_bot(vec![guild("1"), guild("2")]);
        assert_eq!(partition.with_bot.len(), 2);
        assert!(partition.others.is_empty());
    }

    #[test]
    fn empty_input_gives_empty_partition() {
        assert!(GuildPartition::split(vec![], |_| true).is_empty());
    }

    proptest! {
        #[test]
        fn partition_is_total_and_disjoint(
            ids in proptest::collection::hash_set("[0-9]{17,19}", 0..40),
            verdicts in proptest::collection::vec(any::<bool>(), 40),
        ) {
            let guilds: Vec<Guild> = ids.iter().map(|id| guild(id)).collect();
            let mut index = 0;
            let partition = GuildPartition::split(guilds.clone(), |_| {
                let v = verdicts[index];
                index += 1;
                v
            });

            let with: HashSet<_> = partition.with_bot.iter().map(|g| g.id.clone()).collect();
            let others: HashSet<_> = partition.others.iter().map(|g| g.id.clone()).collect();

            prop_assert!(with.is_disjoint(&others));
            let union: HashSet<_> = with.union(&others).cloned().collect();
            prop_assert_eq!(union, ids);
            prop_assert_eq!(partition.len(), guilds.len());
        }
    }
}
