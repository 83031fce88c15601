//! Account reference collection and canonical ordering.
//!
//! Every account a transaction touches appears exactly once in the message
//! key table, with signer/writable flags merged across all of its uses.
//! The table order is what the runtime trusts: signers first, writable
//! before read-only, fee payer at index 0.

use crate::error::WireError;
use crate::pubkey::Pubkey;

/// One account usage inside an instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountRef {
    pub pubkey: Pubkey,
    pub is_signer: bool,
    pub is_writable: bool,
}

impl AccountRef {
    pub fn signer_writable(pubkey: Pubkey) -> Self {
        AccountRef {
            pubkey,
            is_signer: true,
            is_writable: true,
        }
    }

    pub fn signer_readonly(pubkey: Pubkey) -> Self {
        AccountRef {
            pubkey,
            is_signer: true,
            is_writable: false,
        }
    }

    pub fn writable(pubkey: Pubkey) -> Self {
        AccountRef {
            pubkey,
            is_signer: false,
            is_writable: true,
        }
    }

    pub fn readonly(pubkey: Pubkey) -> Self {
        AccountRef {
            pubkey,
            is_signer: false,
            is_writable: false,
        }
    }

    /// Ordering tier: writable signers < read-only signers < writable
    /// non-signers < read-only non-signers.
    fn tier(&self) -> u8 {
        match (self.is_signer, self.is_writable) {
            (true, true) => 0,
            (true, false) => 1,
            (false, true) => 2,
            (false, false) => 3,
        }
    }
}

/// An instruction before compilation: the program to invoke, the accounts
/// it reads and writes (in the order the program expects), and an opaque
/// data payload.
#[derive(Debug, Clone)]
pub struct Instruction {
    pub program_id: Pubkey,
    pub accounts: Vec<AccountRef>,
    pub data: Vec<u8>,
}

/// Collects and deduplicates every account reference a set of instructions
/// touches, then produces the canonically ordered key table.
#[derive(Debug, Default)]
pub struct AccountLedger {
    entries: Vec<AccountRef>,
}

impl AccountLedger {
    /// Build the ordered, deduplicated account table for `instructions`
    /// with `fee_payer` pinned at index 0.
    ///
    /// The fee payer is recorded as signer + writable. Each instruction
    /// account merges into an existing entry by OR-ing both flags; program
    /// ids join the table as non-signer read-only (still flag-merged if the
    /// same key appears elsewhere).
    pub fn compile(
        fee_payer: &Pubkey,
        instructions: &[Instruction],
    ) -> Result<Vec<AccountRef>, WireError> {
        if fee_payer.is_zero() {
            return Err(WireError::Compile(
                "fee payer must not be the zero address".into(),
            ));
        }

        let mut ledger = AccountLedger::default();
        ledger.record(AccountRef::signer_writable(*fee_payer));

        for ix in instructions {
            for account in &ix.accounts {
                ledger.record(*account);
            }
            ledger.record(AccountRef::readonly(ix.program_id));
        }

        // Stable sort keeps insertion order within a tier, so the fee
        // payer stays at index 0 of the leading tier.
        ledger.entries.sort_by_key(AccountRef::tier);

        Ok(ledger.entries)
    }

    fn record(&mut self, account: AccountRef) {
        match self
            .entries
            .iter_mut()
            .find(|e| e.pubkey == account.pubkey)
        {
            Some(entry) => {
                entry.is_signer |= account.is_signer;
                entry.is_writable |= account.is_writable;
            }
            None => self.entries.push(account),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(byte: u8) -> Pubkey {
        Pubkey::new([byte; 32])
    }

    fn ix(program: Pubkey, accounts: Vec<AccountRef>) -> Instruction {
        Instruction {
            program_id: program,
            accounts,
            data: vec![],
        }
    }

    // -- dedup and flag merging --------------------------------------------

    #[test]
    fn fee_payer_is_first_and_signer_writable() {
        let payer = key(1);
        let table = AccountLedger::compile(&payer, &[]).unwrap();

        assert_eq!(table.len(), 1);
        assert_eq!(table[0].pubkey, payer);
        assert!(table[0].is_signer);
        assert!(table[0].is_writable);
    }

    #[test]
    fn duplicate_accounts_collapse_to_one_entry() {
        let payer = key(1);
        let shared = key(2);
        let program = key(9);

        let instructions = [
            ix(program, vec![AccountRef::writable(shared)]),
            ix(program, vec![AccountRef::writable(shared)]),
        ];

        let table = AccountLedger::compile(&payer, &instructions).unwrap();
        let occurrences = table.iter().filter(|e| e.pubkey == shared).count();
        assert_eq!(occurrences, 1);
    }

    #[test]
    fn flags_merge_by_logical_or() {
        let payer = key(1);
        let account = key(2);
        let program = key(9);

        // First use read-only, second use writable signer.
        let instructions = [
            ix(program, vec![AccountRef::readonly(account)]),
            ix(program, vec![AccountRef::signer_writable(account)]),
        ];

        let table = AccountLedger::compile(&payer, &instructions).unwrap();
        let entry = table.iter().find(|e| e.pubkey == account).unwrap();
        assert!(entry.is_signer);
        assert!(entry.is_writable);
    }

    #[test]
    fn program_id_joins_as_readonly_nonsigner() {
        let payer = key(1);
        let program = key(9);

        let table = AccountLedger::compile(&payer, &[ix(program, vec![])]).unwrap();
        let entry = table.iter().find(|e| e.pubkey == program).unwrap();
        assert!(!entry.is_signer);
        assert!(!entry.is_writable);
    }

    #[test]
    fn program_id_keeps_stronger_flags_from_other_uses() {
        let payer = key(1);
        let program = key(9);

        // The program key also appears as a writable account elsewhere.
        let instructions = [ix(program, vec![AccountRef::writable(program)])];

        let table = AccountLedger::compile(&payer, &instructions).unwrap();
        let entry = table.iter().find(|e| e.pubkey == program).unwrap();
        assert!(entry.is_writable);
        assert!(!entry.is_signer);
    }

    #[test]
    fn fee_payer_flags_survive_weaker_uses() {
        let payer = key(1);
        let program = key(9);

        // The fee payer shows up again as a plain read-only account.
        let instructions = [ix(program, vec![AccountRef::readonly(payer)])];

        let table = AccountLedger::compile(&payer, &instructions).unwrap();
        assert_eq!(table[0].pubkey, payer);
        assert!(table[0].is_signer);
        assert!(table[0].is_writable);
    }

    // -- ordering -----------------------------------------------------------

    #[test]
    fn table_is_tier_ordered() {
        let payer = key(1);
        let program = key(9);

        let instructions = [ix(
            program,
            vec![
                AccountRef::readonly(key(5)),
                AccountRef::signer_readonly(key(4)),
                AccountRef::writable(key(3)),
                AccountRef::signer_writable(key(2)),
            ],
        )];

        let table = AccountLedger::compile(&payer, &instructions).unwrap();

        let tiers: Vec<u8> = table.iter().map(AccountRef::tier).collect();
        for pair in tiers.windows(2) {
            assert!(pair[0] <= pair[1], "tiers out of order: {tiers:?}");
        }

        // Fee payer leads the writable-signer tier.
        assert_eq!(table[0].pubkey, payer);
    }

    #[test]
    fn signers_form_leading_contiguous_run() {
        let payer = key(1);
        let program = key(9);

        let instructions = [ix(
            program,
            vec![
                AccountRef::writable(key(3)),
                AccountRef::signer_readonly(key(4)),
                AccountRef::readonly(key(5)),
            ],
        )];

        let table = AccountLedger::compile(&payer, &instructions).unwrap();

        let first_nonsigner = table
            .iter()
            .position(|e| !e.is_signer)
            .unwrap_or(table.len());
        assert!(
            table[first_nonsigner..].iter().all(|e| !e.is_signer),
            "signer found after first non-signer"
        );
    }

    #[test]
    fn insertion_order_is_stable_within_a_tier() {
        let payer = key(1);
        let program = key(9);

        let instructions = [ix(
            program,
            vec![
                AccountRef::writable(key(7)),
                AccountRef::writable(key(3)),
                AccountRef::writable(key(5)),
            ],
        )];

        let table = AccountLedger::compile(&payer, &instructions).unwrap();
        let writables: Vec<Pubkey> = table
            .iter()
            .filter(|e| !e.is_signer && e.is_writable)
            .map(|e| e.pubkey)
            .collect();
        assert_eq!(writables, vec![key(7), key(3), key(5)]);
    }

    // -- malformed input ----------------------------------------------------

    #[test]
    fn zero_fee_payer_is_rejected() {
        let err = AccountLedger::compile(&Pubkey::ZERO, &[]).unwrap_err();
        assert!(err.to_string().contains("fee payer"));
    }
}
