//! In-memory account and shop registry.
//!
//! Plain key-value lookup for the single-process run; nothing is persisted.

use std::collections::HashMap;

use uuid::Uuid;

use crate::domain::{Account, Shop};

#[derive(Debug, Default)]
pub struct InMemoryStore {
    accounts: HashMap<Uuid, Account>,
    // keyed by lowercased shop id
    shops: HashMap<String, Shop>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn upsert_account(&mut self, account: Account) -> Uuid {
        let id = account.id;
        self.accounts.insert(id, account);
        id
    }

    pub fn accounts(&self) -> impl Iterator<Item = &Account> {
        self.accounts.values()
    }

    pub fn find_account_by_user_id(&self, user_id: &str) -> Option<&Account> {
        self.accounts.values().find(|account| {
            account
                .user_id
                .as_deref()
                .is_some_and(|id| id.eq_ignore_ascii_case(user_id))
        })
    }

    pub fn save_shop(&mut self, shop: Shop) {
        self.shops.insert(shop.shop_id.to_ascii_lowercase(), shop);
    }

    pub fn shop(&self, shop_id: &str) -> Option<&Shop> {
        self.shops.get(&shop_id.to_ascii_lowercase())
    }
}
