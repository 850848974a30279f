// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Account lifecycle with the two account rules enforced: the active-account
//! cap and the refusal to delete an account that still has transactions.

use tracing::{info, warn};

use crate::error::{LedgerError, Result};
use crate::models::{Account, MAX_ACTIVE_ACCOUNTS};
use crate::store::{LedgerStore, TransactionFilter};

pub struct AccountBook<'a, S> {
    store: &'a S,
}

impl<'a, S: LedgerStore> AccountBook<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Inserts the account and returns it with its assigned id.
    pub async fn create(&self, account: &Account) -> Result<Account> {
        if account.name.trim().is_empty() {
            return Err(LedgerError::Validation("Account name cannot be empty".into()));
        }
        if account.active {
            self.ensure_active_slot().await?;
        }
        let id = self.store.insert_account(account).await?;
        info!(account_id = id, name = %account.name, "account created");
        Ok(Account {
            id,
            ..account.clone()
        })
    }

    /// Persists edits. Re-activating an inactive account needs a free slot.
    pub async fn update(&self, account: &Account) -> Result<()> {
        let current = self
            .store
            .account(account.id)
            .await?
            .ok_or_else(|| LedgerError::not_found("Account", account.id))?;
        if account.active && !current.active {
            self.ensure_active_slot().await?;
        }
        self.store.update_account(account).await
    }

    pub async fn set_active(&self, id: i64, active: bool) -> Result<Account> {
        let mut account = self
            .store
            .account(id)
            .await?
            .ok_or_else(|| LedgerError::not_found("Account", id))?;
        account.active = active;
        self.update(&account).await?;
        Ok(account)
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        let linked = self
            .store
            .count_transactions(&TransactionFilter::all().for_account(id))
            .await?;
        if linked > 0 {
            warn!(account_id = id, linked, "refusing to delete account with transactions");
            return Err(LedgerError::AccountHasTransactions {
                account_id: id,
                count: linked,
            });
        }
        let templates = self
            .store
            .recurrences(false)
            .await?
            .iter()
            .filter(|t| t.account_id == id)
            .count();
        if templates > 0 {
            warn!(account_id = id, templates, "refusing to delete account with recurring templates");
            return Err(LedgerError::AccountHasRecurrences {
                account_id: id,
                count: templates,
            });
        }
        self.store.delete_account(id).await?;
        info!(account_id = id, "account deleted");
        Ok(())
    }

    async fn ensure_active_slot(&self) -> Result<()> {
        let active = self.store.count_active_accounts().await?;
        if active >= MAX_ACTIVE_ACCOUNTS {
            warn!(active, "active account limit reached");
            return Err(LedgerError::ActiveAccountLimit {
                max: MAX_ACTIVE_ACCOUNTS,
            });
        }
        Ok(())
    }
}
