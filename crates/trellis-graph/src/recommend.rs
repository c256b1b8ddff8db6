//! Item recommendations from a bipartite user/item interaction graph.
//!
//! An item is recommended to a user when other users who share an item
//! with them also interacted with it. Each such co-occurrence adds one
//! point to the item's score.

use crate::error::{GraphError, Result, VertexClass};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use tracing::debug;

pub type UserId = usize;
pub type ItemId = usize;

/// A recommended item and its co-occurrence score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Recommendation {
    pub item: ItemId,
    pub score: usize,
}

/// User/item interaction store.
#[derive(Debug, Clone, Default)]
pub struct Recommender {
    /// Items of each user, in interaction order.
    user_items: Vec<Vec<ItemId>>,
    /// Users of each item, kept sorted by id.
    item_users: Vec<Vec<UserId>>,
}

impl Recommender {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a user and returns its id.
    pub fn add_user(&mut self) -> UserId {
        self.user_items.push(Vec::new());
        self.user_items.len() - 1
    }

    /// Registers an item and returns its id.
    pub fn add_item(&mut self) -> ItemId {
        self.item_users.push(Vec::new());
        self.item_users.len() - 1
    }

    pub fn user_count(&self) -> usize {
        self.user_items.len()
    }

    pub fn item_count(&self) -> usize {
        self.item_users.len()
    }

    /// Records that `user` interacted with `item`. Recording the same pair
    /// twice has no further effect.
    pub fn add_interaction(&mut self, user: UserId, item: ItemId) -> Result<()> {
        self.check_user(user)?;
        self.check_item(item)?;

        let users = &mut self.item_users[item];
        if let Err(position) = users.binary_search(&user) {
            users.insert(position, user);
            self.user_items[user].push(item);
        }
        Ok(())
    }

    /// Items `user` interacted with, in the order they were recorded.
    pub fn interactions(&self, user: UserId) -> Result<&[ItemId]> {
        self.check_user(user)?;
        Ok(&self.user_items[user])
    }

    /// Users who interacted with `item`, in id order.
    pub fn users_of(&self, item: ItemId) -> Result<&[UserId]> {
        self.check_item(item)?;
        Ok(&self.item_users[item])
    }

    /// Ranks items `user` has not seen by co-occurrence.
    ///
    /// For every item of `user`, every other user of that item (in id
    /// order) adds one point to each of their items that `user` lacks.
    /// Highest score first; equal scores keep the order items were first
    /// scored in.
    pub fn recommend(&self, user: UserId) -> Result<Vec<Recommendation>> {
        self.check_user(user)?;
        let own = &self.user_items[user];
        let seen: HashSet<ItemId> = own.iter().copied().collect();

        let mut slot: HashMap<ItemId, usize> = HashMap::new();
        let mut scored: Vec<Recommendation> = Vec::new();

        for &item in own {
            for &other in &self.item_users[item] {
                if other == user {
                    continue;
                }
                for &candidate in &self.user_items[other] {
                    if seen.contains(&candidate) {
                        continue;
                    }
                    let index = *slot.entry(candidate).or_insert_with(|| {
                        scored.push(Recommendation {
                            item: candidate,
                            score: 0,
                        });
                        scored.len() - 1
                    });
                    scored[index].score += 1;
                }
            }
        }

        scored.sort_by(|a, b| b.score.cmp(&a.score));
        debug!(user, candidates = scored.len(), "recommendations scored");
        Ok(scored)
    }

    fn check_user(&self, user: UserId) -> Result<()> {
        if user < self.user_count() {
            Ok(())
        } else {
            Err(GraphError::InvalidVertex {
                class: VertexClass::User,
                id: user,
                count: self.user_count(),
            })
        }
    }

    fn check_item(&self, item: ItemId) -> Result<()> {
        if item < self.item_count() {
            Ok(())
        } else {
            Err(GraphError::InvalidVertex {
                class: VertexClass::Item,
                id: item,
                count: self.item_count(),
            })
        }
    }
}
