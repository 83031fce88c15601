//! Message compilation and transaction serialization.
//!
//! Consumes the ordered account table from [`crate::ledger`], a recent
//! blockhash, and the instruction list; produces the three-byte header and
//! the exact wire bytes described in the crate docs. Indices are a single
//! byte each, which caps the key table at 256 entries.

use crate::compact;
use crate::error::WireError;
use crate::ledger::{AccountRef, Instruction};
use crate::pubkey::Pubkey;
use crate::signer::SIGNATURE_LEN;

/// Hard cap imposed by single-byte account indices.
pub const MAX_ACCOUNT_KEYS: usize = 256;

/// The signature count must fit a one-byte compact-u16 so that the message
/// region always starts at `1 + 64 * num_required_signatures`.
pub const MAX_REQUIRED_SIGNATURES: u8 = 127;

/// The three leading bytes of every message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageHeader {
    pub num_required_signatures: u8,
    pub num_readonly_signed: u8,
    pub num_readonly_unsigned: u8,
}

/// An instruction with every account reference resolved to an index into
/// the message's key table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledInstruction {
    pub program_id_index: u8,
    pub account_indices: Vec<u8>,
    pub data: Vec<u8>,
}

/// A fully compiled message: ordered key table, header, blockhash, and
/// index-resolved instructions.
#[derive(Debug, Clone)]
pub struct CompiledMessage {
    pub header: MessageHeader,
    pub account_keys: Vec<Pubkey>,
    pub recent_blockhash: [u8; 32],
    pub instructions: Vec<CompiledInstruction>,
}

impl CompiledMessage {
    /// Compile `instructions` against the canonically ordered `accounts`
    /// table produced by [`crate::ledger::AccountLedger::compile`].
    pub fn compile(
        accounts: &[AccountRef],
        recent_blockhash: [u8; 32],
        instructions: &[Instruction],
    ) -> Result<Self, WireError> {
        if accounts.len() > MAX_ACCOUNT_KEYS {
            return Err(WireError::Encoding(format!(
                "account table has {} keys, limit is {MAX_ACCOUNT_KEYS}",
                accounts.len()
            )));
        }

        let header = Self::header_for(accounts)?;
        let account_keys: Vec<Pubkey> = accounts.iter().map(|e| e.pubkey).collect();

        let mut compiled = Vec::with_capacity(instructions.len());
        for ix in instructions {
            let program_id_index = Self::index_of(&account_keys, &ix.program_id)?;

            let mut account_indices = Vec::with_capacity(ix.accounts.len());
            for account in &ix.accounts {
                account_indices.push(Self::index_of(&account_keys, &account.pubkey)?);
            }

            if ix.data.len() > u16::MAX as usize {
                return Err(WireError::Encoding(format!(
                    "instruction data is {} bytes, limit is {}",
                    ix.data.len(),
                    u16::MAX
                )));
            }

            compiled.push(CompiledInstruction {
                program_id_index,
                account_indices,
                data: ix.data.clone(),
            });
        }

        Ok(CompiledMessage {
            header,
            account_keys,
            recent_blockhash,
            instructions: compiled,
        })
    }

    /// Header counts derived purely from the ordered table.
    ///
    /// `num_required_signatures` is the length of the leading contiguous
    /// signer run; a signer appearing after a non-signer means the table
    /// was not canonically ordered.
    fn header_for(accounts: &[AccountRef]) -> Result<MessageHeader, WireError> {
        let leading_signers = accounts
            .iter()
            .position(|e| !e.is_signer)
            .unwrap_or(accounts.len());

        let total_signers = accounts.iter().filter(|e| e.is_signer).count();
        if total_signers != leading_signers {
            return Err(WireError::Compile(
                "account table not in canonical order: signer after non-signer".into(),
            ));
        }

        if leading_signers > MAX_REQUIRED_SIGNATURES as usize {
            return Err(WireError::Encoding(format!(
                "{leading_signers} required signatures, limit is {MAX_REQUIRED_SIGNATURES}"
            )));
        }

        let readonly_signed = accounts
            .iter()
            .filter(|e| e.is_signer && !e.is_writable)
            .count();
        let readonly_unsigned = accounts
            .iter()
            .filter(|e| !e.is_signer && !e.is_writable)
            .count();

        Ok(MessageHeader {
            num_required_signatures: leading_signers as u8,
            num_readonly_signed: readonly_signed as u8,
            num_readonly_unsigned: readonly_unsigned as u8,
        })
    }

    fn index_of(keys: &[Pubkey], key: &Pubkey) -> Result<u8, WireError> {
        keys.iter()
            .position(|k| k == key)
            .map(|i| i as u8)
            .ok_or_else(|| {
                WireError::Compile(format!("account {key} is not in the key table"))
            })
    }

    /// Serialize the signable region: header, key table, blockhash,
    /// instructions.
    pub fn serialize_message(&self) -> Result<Vec<u8>, WireError> {
        let mut buf = Vec::with_capacity(self.message_size_hint());

        buf.push(self.header.num_required_signatures);
        buf.push(self.header.num_readonly_signed);
        buf.push(self.header.num_readonly_unsigned);

        compact::encode(self.account_keys.len() as u16, &mut buf);
        for key in &self.account_keys {
            buf.extend_from_slice(key.as_bytes());
        }

        buf.extend_from_slice(&self.recent_blockhash);

        if self.instructions.len() > u16::MAX as usize {
            return Err(WireError::Encoding(format!(
                "{} instructions, limit is {}",
                self.instructions.len(),
                u16::MAX
            )));
        }
        compact::encode(self.instructions.len() as u16, &mut buf);
        for ix in &self.instructions {
            buf.push(ix.program_id_index);

            compact::encode(ix.account_indices.len() as u16, &mut buf);
            buf.extend_from_slice(&ix.account_indices);

            compact::encode(ix.data.len() as u16, &mut buf);
            buf.extend_from_slice(&ix.data);
        }

        Ok(buf)
    }

    /// Serialize the whole transaction with zero-filled signature slots:
    /// compact-u16 signature count, one 64-byte placeholder per required
    /// signer, then the message. Ready for [`crate::signer::sign_transaction`]
    /// or for handoff to external wallet software.
    pub fn serialize_transaction(&self) -> Result<Vec<u8>, WireError> {
        let message = self.serialize_message()?;
        let num_sigs = self.header.num_required_signatures as usize;

        let mut wire = Vec::with_capacity(1 + num_sigs * SIGNATURE_LEN + message.len());
        compact::encode(num_sigs as u16, &mut wire);
        wire.resize(wire.len() + num_sigs * SIGNATURE_LEN, 0);
        wire.extend_from_slice(&message);

        Ok(wire)
    }

    fn message_size_hint(&self) -> usize {
        3 + compact::MAX_ENCODED_LEN
            + self.account_keys.len() * Pubkey::LEN
            + 32
            + compact::MAX_ENCODED_LEN
            + self
                .instructions
                .iter()
                .map(|ix| 1 + 2 * compact::MAX_ENCODED_LEN + ix.account_indices.len() + ix.data.len())
                .sum::<usize>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::AccountLedger;

    fn key(byte: u8) -> Pubkey {
        Pubkey::new([byte; 32])
    }

    /// A payer, one writable destination, one program; one instruction
    /// with a 9-byte payload. Three accounts, one signer.
    fn sample() -> (Vec<AccountRef>, Vec<Instruction>) {
        let payer = key(1);
        let dest = key(2);
        let program = key(9);

        let instructions = vec![Instruction {
            program_id: program,
            accounts: vec![
                AccountRef::signer_writable(payer),
                AccountRef::writable(dest),
            ],
            data: vec![3, 0x40, 0x42, 0x0f, 0, 0, 0, 0, 0],
        }];

        let table = AccountLedger::compile(&payer, &instructions).unwrap();
        (table, instructions)
    }

    // -- header -------------------------------------------------------------

    #[test]
    fn header_counts_for_sample() {
        let (table, instructions) = sample();
        let msg = CompiledMessage::compile(&table, [0; 32], &instructions).unwrap();

        assert_eq!(msg.header.num_required_signatures, 1);
        assert_eq!(msg.header.num_readonly_signed, 0);
        // Only the program id is read-only.
        assert_eq!(msg.header.num_readonly_unsigned, 1);
    }

    #[test]
    fn required_signatures_equal_leading_signer_run() {
        let payer = key(1);
        let program = key(9);
        let instructions = vec![Instruction {
            program_id: program,
            accounts: vec![
                AccountRef::signer_readonly(key(2)),
                AccountRef::writable(key(3)),
            ],
            data: vec![],
        }];

        let table = AccountLedger::compile(&payer, &instructions).unwrap();
        let msg = CompiledMessage::compile(&table, [0; 32], &instructions).unwrap();

        let leading_run = table.iter().take_while(|e| e.is_signer).count();
        assert_eq!(msg.header.num_required_signatures as usize, leading_run);
        assert_eq!(msg.header.num_required_signatures, 2);
        assert_eq!(msg.header.num_readonly_signed, 1);
    }

    #[test]
    fn unordered_table_is_rejected() {
        let table = vec![
            AccountRef::readonly(key(2)),
            AccountRef::signer_writable(key(1)),
        ];
        let err = CompiledMessage::compile(&table, [0; 32], &[]).unwrap_err();
        assert!(err.to_string().contains("canonical order"));
    }

    // -- index resolution ---------------------------------------------------

    #[test]
    fn instruction_indices_point_at_table_positions() {
        let (table, instructions) = sample();
        let msg = CompiledMessage::compile(&table, [0; 32], &instructions).unwrap();

        let ix = &msg.instructions[0];
        let program_pos = msg
            .account_keys
            .iter()
            .position(|k| *k == key(9))
            .unwrap();
        assert_eq!(ix.program_id_index as usize, program_pos);

        let payer_pos = msg.account_keys.iter().position(|k| *k == key(1)).unwrap();
        let dest_pos = msg.account_keys.iter().position(|k| *k == key(2)).unwrap();
        assert_eq!(ix.account_indices, vec![payer_pos as u8, dest_pos as u8]);
    }

    #[test]
    fn unknown_account_is_rejected() {
        let (table, _) = sample();
        let rogue = Instruction {
            program_id: key(9),
            accounts: vec![AccountRef::writable(key(77))],
            data: vec![],
        };
        let err = CompiledMessage::compile(&table, [0; 32], &[rogue]).unwrap_err();
        assert!(err.to_string().contains("not in the key table"));
    }

    // -- serialization ------------------------------------------------------

    #[test]
    fn message_starts_with_header_bytes() {
        let (table, instructions) = sample();
        let msg = CompiledMessage::compile(&table, [0; 32], &instructions).unwrap();
        let bytes = msg.serialize_message().unwrap();

        assert_eq!(bytes[0], msg.header.num_required_signatures);
        assert_eq!(bytes[1], msg.header.num_readonly_signed);
        assert_eq!(bytes[2], msg.header.num_readonly_unsigned);
    }

    #[test]
    fn message_embeds_blockhash_after_key_table() {
        let (table, instructions) = sample();
        let blockhash = [0xCC; 32];
        let msg = CompiledMessage::compile(&table, blockhash, &instructions).unwrap();
        let bytes = msg.serialize_message().unwrap();

        let offset = 3 + 1 + 32 * msg.account_keys.len();
        assert_eq!(&bytes[offset..offset + 32], &blockhash);
    }

    #[test]
    fn transaction_length_matches_formula() {
        // 1 (sig count) + 64*S + 3 (header) + accounts + 32 (blockhash)
        // + instructions.
        let (table, instructions) = sample();
        let msg = CompiledMessage::compile(&table, [0; 32], &instructions).unwrap();
        let wire = msg.serialize_transaction().unwrap();

        let s = msg.header.num_required_signatures as usize;
        let accounts_bytes = 1 + 32 * msg.account_keys.len();
        let instructions_bytes: usize = 1
            + msg
                .instructions
                .iter()
                .map(|ix| 1 + 1 + ix.account_indices.len() + 1 + ix.data.len())
                .sum::<usize>();

        assert_eq!(
            wire.len(),
            1 + 64 * s + 3 + accounts_bytes + 32 + instructions_bytes
        );
    }

    #[test]
    fn transaction_length_hand_counted() {
        // 1 signer, 3 accounts, 1 instruction with 2 account refs and a
        // 9-byte payload:
        //   1 sig count + 64 slot + 3 header + 1 key count + 96 keys
        //   + 32 blockhash + 1 ix count + 1 program index + 1 ref count
        //   + 2 refs + 1 data len + 9 data = 212.
        let (table, instructions) = sample();
        let msg = CompiledMessage::compile(&table, [0; 32], &instructions).unwrap();
        let wire = msg.serialize_transaction().unwrap();
        assert_eq!(wire.len(), 212);
    }

    #[test]
    fn signature_slots_are_zero_filled() {
        let (table, instructions) = sample();
        let msg = CompiledMessage::compile(&table, [0; 32], &instructions).unwrap();
        let wire = msg.serialize_transaction().unwrap();

        assert_eq!(wire[0], 1);
        assert!(wire[1..65].iter().all(|&b| b == 0));
    }

    #[test]
    fn transaction_embeds_message_after_slots() {
        let (table, instructions) = sample();
        let msg = CompiledMessage::compile(&table, [0xAB; 32], &instructions).unwrap();
        let message = msg.serialize_message().unwrap();
        let wire = msg.serialize_transaction().unwrap();
        assert_eq!(&wire[65..], &message[..]);
    }

    // -- limits -------------------------------------------------------------

    #[test]
    fn oversized_key_table_is_rejected() {
        // 300 distinct writable accounts plus payer and program overflow
        // the u8 index space.
        let payer = key(1);
        let program = Pubkey::new([9; 32]);
        let accounts: Vec<AccountRef> = (0..300u16)
            .map(|i| {
                let mut bytes = [0xF0u8; 32];
                bytes[0] = (i >> 8) as u8;
                bytes[1] = (i & 0xff) as u8;
                AccountRef::writable(Pubkey::new(bytes))
            })
            .collect();

        let instructions = vec![Instruction {
            program_id: program,
            accounts,
            data: vec![],
        }];

        let table = AccountLedger::compile(&payer, &instructions).unwrap();
        assert!(table.len() > MAX_ACCOUNT_KEYS);

        let err = CompiledMessage::compile(&table, [0; 32], &instructions).unwrap_err();
        assert!(err.to_string().contains("limit is 256"));
    }

    #[test]
    fn too_many_signers_is_rejected() {
        let payer = key(1);
        let program = Pubkey::new([9; 32]);
        let accounts: Vec<AccountRef> = (2..=140u8)
            .map(|i| AccountRef::signer_writable(key(i)))
            .collect();

        let instructions = vec![Instruction {
            program_id: program,
            accounts,
            data: vec![],
        }];

        let table = AccountLedger::compile(&payer, &instructions).unwrap();
        let err = CompiledMessage::compile(&table, [0; 32], &instructions).unwrap_err();
        assert!(err.to_string().contains("required signatures"));
    }
}
