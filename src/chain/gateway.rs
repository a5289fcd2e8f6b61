//! Internal custody gateway integration.
//!
//! The gateway fronts the chain nodes and exposes two endpoints the
//! engine needs: a blocking transfer submission and a balance read.
//! A transfer response is only returned once the gateway has seen the
//! transaction confirmed.
//!
//! Auth: `Authorization: Bearer {key}` on every request.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use rust_decimal::Decimal;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{BalanceService, TransferService};
use crate::config::{AppConfig, ChainConfig};
use crate::types::{TxReference, WalletCredential};

// ---------------------------------------------------------------------------
// API request/response types (gateway JSON → Rust)
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct TransferRequest<'a> {
    from_key: &'a str,
    to_address: &'a str,
    amount: Decimal,
}

#[derive(Debug, Deserialize)]
struct TransferResponse {
    tx_hash: String,
}

#[derive(Debug, Deserialize)]
struct BalanceResponse {
    balance: Decimal,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Custody gateway client.
pub struct WalletGateway {
    http: Client,
    base_url: String,
    api_key: SecretString,
}

impl WalletGateway {
    pub fn new(base_url: &str, timeout_secs: u64, api_key: SecretString) -> Result<Self> {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .user_agent("sweeper/0.1.0 (deposit-sweep-engine)")
            .build()
            .context("Failed to build HTTP client for wallet gateway")?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    /// Build a gateway client from config, resolving the API key from
    /// the environment.
    pub fn from_config(config: &ChainConfig) -> Result<Self> {
        let api_key = AppConfig::resolve_env(&config.api_key_env)?;
        Self::new(
            &config.gateway_url,
            config.request_timeout_secs,
            SecretString::new(api_key),
        )
    }
}

// ---------------------------------------------------------------------------
// Trait implementations
// ---------------------------------------------------------------------------

#[async_trait]
impl TransferService for WalletGateway {
    async fn send(
        &self,
        from: &WalletCredential,
        to_address: &str,
        amount: Decimal,
    ) -> Result<TxReference> {
        let url = format!("{}/transfers", self.base_url);
        let body = TransferRequest {
            from_key: from.expose(),
            to_address,
            amount,
        };

        let resp = self
            .http
            .post(&url)
            .bearer_auth(self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .context("Gateway transfer request failed")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("Gateway transfer error {status}: {body}");
        }

        let transfer: TransferResponse = resp
            .json()
            .await
            .context("Failed to parse gateway transfer response")?;

        debug!(to = %to_address, %amount, tx_hash = %transfer.tx_hash, "Gateway transfer confirmed");
        Ok(TxReference::new(transfer.tx_hash))
    }
}

#[async_trait]
impl BalanceService for WalletGateway {
    async fn balance_of(&self, wallet_address: &str) -> Result<Decimal> {
        let url = format!("{}/wallets/{wallet_address}/balance", self.base_url);

        let resp = self
            .http
            .get(&url)
            .bearer_auth(self.api_key.expose_secret())
            .send()
            .await
            .context("Gateway balance request failed")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("Gateway balance error {status}: {body}");
        }

        let balance: BalanceResponse = resp
            .json()
            .await
            .context("Failed to parse gateway balance response")?;

        Ok(balance.balance)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
