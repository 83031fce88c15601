//! The transaction assembler: one request in, one signed-and-submitted
//! transaction (or typed failure) out.

use chrono::Utc;
use tracing::{debug, info, warn};
use url::Url;

use tx_rpc::RpcClient;
use tx_wire::{
    create_associated_account, derive_associated_token_address, sign_transaction,
    spl_token_transfer, AccountLedger, CompiledMessage, SigningCapability,
};

use crate::config::EngineConfig;
use crate::error::TransferError;
use crate::submit;
use crate::types::{TransferReceipt, TransferRequest, UnsignedTransfer};

/// Sequences a transfer request through blockhash fetch, account
/// derivation, existence probes, compilation, signing, and submission.
///
/// Probe failures are policy, not fatal:
///
/// - A failed *sender* probe assumes the account exists. The transfer is
///   allowed to proceed and fail naturally on-chain instead of being
///   blocked by a flaky endpoint.
/// - A failed *recipient* probe assumes the account is absent and emits
///   the create instruction. Creation is idempotent, so guessing wrong
///   costs nothing; transferring into a nonexistent account would.
///
/// Only a probe that *succeeds* and reports the sender account missing
/// aborts the request ([`TransferError::SenderAccountMissing`]).
#[derive(Debug)]
pub struct TransactionAssembler {
    rpc: RpcClient,
    config: EngineConfig,
}

impl TransactionAssembler {
    /// Build the RPC client from `config` and wrap it.
    pub fn from_config(config: EngineConfig) -> Result<Self, TransferError> {
        let endpoint: Url = config
            .rpc_url
            .parse()
            .map_err(|e| TransferError::Config(format!("invalid rpc url: {e}")))?;

        let rpc = RpcClient::with_timeouts(
            endpoint,
            config.connect_timeout(),
            config.request_timeout(),
        )?;

        Ok(TransactionAssembler { rpc, config })
    }

    /// Wrap an existing client (shared transports, tests).
    pub fn new(rpc: RpcClient, config: EngineConfig) -> Self {
        TransactionAssembler { rpc, config }
    }

    pub fn rpc(&self) -> &RpcClient {
        &self.rpc
    }

    /// Assemble the transaction and stop before signing, for flows where
    /// external wallet software signs and broadcasts.
    pub async fn assemble_transfer(
        &self,
        request: &TransferRequest,
    ) -> Result<UnsignedTransfer, TransferError> {
        let blockhash = self.rpc.latest_blockhash(self.config.commitment).await?;

        let sender_token_account =
            derive_associated_token_address(&request.sender, &request.mint)?;
        let recipient_token_account =
            derive_associated_token_address(&request.recipient, &request.mint)?;

        let sender_exists = match self
            .rpc
            .account_exists(&sender_token_account, self.config.commitment)
            .await
        {
            Ok(exists) => exists,
            Err(e) => {
                warn!(
                    account = %sender_token_account,
                    error = %e,
                    "sender existence probe failed; assuming the account exists"
                );
                true
            }
        };

        tokio::time::sleep(self.config.probe_delay()).await;

        let recipient_exists = match self
            .rpc
            .account_exists(&recipient_token_account, self.config.commitment)
            .await
        {
            Ok(exists) => exists,
            Err(e) => {
                warn!(
                    account = %recipient_token_account,
                    error = %e,
                    "recipient existence probe failed; assuming the account is absent"
                );
                false
            }
        };

        if !sender_exists {
            return Err(TransferError::SenderAccountMissing);
        }

        let mut instructions = Vec::with_capacity(2);
        if !recipient_exists {
            debug!(
                account = %recipient_token_account,
                "recipient token account absent; prepending create instruction"
            );
            instructions.push(create_associated_account(
                &request.sender,
                &recipient_token_account,
                &request.recipient,
                &request.mint,
            ));
        }
        instructions.push(spl_token_transfer(
            &sender_token_account,
            &recipient_token_account,
            &request.sender,
            request.amount,
        )?);

        let table = AccountLedger::compile(&request.sender, &instructions)?;
        let message = CompiledMessage::compile(&table, blockhash, &instructions)?;
        let bytes = message.serialize_transaction()?;

        info!(
            amount = request.amount,
            mint = %request.mint,
            recipient = %request.recipient,
            instructions = message.instructions.len(),
            "transfer assembled"
        );

        Ok(UnsignedTransfer {
            bytes,
            message,
            fee_payer: request.sender,
            sender_token_account,
            recipient_token_account,
            creates_recipient_account: !recipient_exists,
        })
    }

    /// Assemble, sign locally through `signer`, and submit.
    pub async fn send_transfer(
        &self,
        request: &TransferRequest,
        signer: &dyn SigningCapability,
    ) -> Result<TransferReceipt, TransferError> {
        let unsigned = self.assemble_transfer(request).await?;
        let signed = sign_transaction(&unsigned.bytes, signer)?;
        let signature = submit::submit(&self.rpc, &signed, &self.config.send).await?;

        info!(%signature, amount = request.amount, "transfer submitted");

        Ok(TransferReceipt {
            signature,
            amount: request.amount,
            mint: request.mint,
            recipient: request.recipient,
            timestamp: Utc::now(),
        })
    }
}
