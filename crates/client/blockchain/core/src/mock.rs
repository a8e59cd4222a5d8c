//! Mock chain for testing.
//!
//! Simulates the session contract and its stablecoin in memory, including the
//! contract's revert rules, so orchestration code can be exercised without a
//! node. Several handles created with [`MockChain::as_account`] share one
//! chain, which lets tests play every participant of a session.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use session_core::{Address, Session, SessionId};

use crate::revert::RevertReason;
use crate::traits::{CallError, ChainTransport, SessionReader, TokenReader, TozlowChain, TransportError};
use crate::types::{BlockHeader, ContractCall, FeeParams, Receipt, TransactionData, TransactionId};

const MOCK_CONTRACT: Address = Address::from_bytes([0xc0; 20]);
const MOCK_TOKEN: Address = Address::from_bytes([0x05; 20]);

/// A write the mock accepted, in submission order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubmittedCall {
    pub from: Address,
    pub call: ContractCall,
    pub fees: FeeParams,
    pub transaction_id: TransactionId,
}

#[derive(Clone, Debug)]
struct MockSession {
    session: Session,
    participants: Vec<Address>,
    deposited: HashSet<Address>,
    voted: HashSet<Address>,
    absence_votes: HashMap<Address, u64>,
}

/// Contract + token storage.
#[derive(Clone, Debug, Default)]
struct ChainState {
    now: u64,
    sessions: Vec<MockSession>,
    allowances: HashMap<(Address, Address), u128>,
    balances: HashMap<Address, u128>,
}

#[derive(Debug, Default)]
struct Inner {
    /// Latest state, written by confirmed transactions.
    state: ChainState,
    /// What reads observe; trails `state` by `read_lag` reads after a write.
    visible: ChainState,
    read_lag: usize,
    lag_remaining: usize,

    base_fee: Option<u128>,
    fail_block_reads: bool,
    block_number: u64,

    fail_next_submit: Option<CallError>,
    fail_next_confirmation: bool,
    submitted: Vec<SubmittedCall>,
    receipts: HashMap<TransactionId, Result<Receipt, CallError>>,
    transaction_counter: u64,
}

/// Mock chain client for testing without network.
#[derive(Clone)]
pub struct MockChain {
    inner: Arc<Mutex<Inner>>,
    account: Address,
}

impl MockChain {
    pub fn new(account: Address) -> Self {
        let inner = Inner {
            base_fee: Some(20_000_000),
            ..Default::default()
        };
        Self {
            inner: Arc::new(Mutex::new(inner)),
            account,
        }
    }

    /// Another handle on the same chain, signing as `account`.
    pub fn as_account(&self, account: Address) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            account,
        }
    }

    // ------------------------------------------------------------------------
    // Test setup
    // ------------------------------------------------------------------------

    pub fn set_time(&self, now: u64) {
        self.seed(|state| state.now = now);
    }

    pub fn advance_time(&self, seconds: u64) {
        self.seed(|state| state.now += seconds);
    }

    pub fn set_base_fee(&self, base_fee: Option<u128>) {
        self.inner.lock().unwrap().base_fee = base_fee;
    }

    pub fn fail_block_reads(&self, fail: bool) {
        self.inner.lock().unwrap().fail_block_reads = fail;
    }

    pub fn mint(&self, owner: Address, amount: u128) {
        self.seed(|state| *state.balances.entry(owner).or_default() += amount);
    }

    pub fn set_allowance(&self, owner: Address, spender: Address, amount: u128) {
        self.seed(|state| {
            state.allowances.insert((owner, spender), amount);
        });
    }

    /// Insert a session directly, bypassing `createSession` checks.
    pub fn insert_session(&self, mut session: Session, participants: Vec<Address>) -> SessionId {
        let mut id = SessionId(0);
        self.seed(|state| {
            id = SessionId(state.sessions.len() as u64);
            session.id = id;
            session.participant_count = participants.len() as u8;
            state.sessions.push(MockSession {
                session,
                participants,
                deposited: HashSet::new(),
                voted: HashSet::new(),
                absence_votes: HashMap::new(),
            });
        });
        id
    }

    /// Make the next `submit` fail with `error` before anything is broadcast.
    pub fn fail_next_submit(&self, error: CallError) {
        self.inner.lock().unwrap().fail_next_submit = Some(error);
    }

    /// Make the next submitted transaction be included but fail.
    pub fn fail_next_confirmation(&self) {
        self.inner.lock().unwrap().fail_next_confirmation = true;
    }

    /// After each confirmed write, the next `reads` view calls still see the
    /// state from before it, like a load-balanced RPC behind the sequencer.
    pub fn set_read_lag(&self, reads: usize) {
        self.inner.lock().unwrap().read_lag = reads;
    }

    // ------------------------------------------------------------------------
    // Inspection
    // ------------------------------------------------------------------------

    pub fn submitted(&self) -> Vec<SubmittedCall> {
        self.inner.lock().unwrap().submitted.clone()
    }

    pub fn submitted_named(&self, function: &str) -> usize {
        self.inner
            .lock()
            .unwrap()
            .submitted
            .iter()
            .filter(|s| s.call.function_name() == function)
            .count()
    }

    pub fn balance(&self, owner: Address) -> u128 {
        let inner = self.inner.lock().unwrap();
        inner.state.balances.get(&owner).copied().unwrap_or(0)
    }

    // ------------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------------

    fn seed(&self, f: impl FnOnce(&mut ChainState)) {
        let mut inner = self.inner.lock().unwrap();
        f(&mut inner.state);
        inner.visible = inner.state.clone();
        inner.lag_remaining = 0;
    }

    fn read<T>(&self, f: impl FnOnce(&ChainState) -> T) -> T {
        let mut inner = self.inner.lock().unwrap();
        if inner.lag_remaining > 0 {
            inner.lag_remaining -= 1;
        } else {
            inner.visible = inner.state.clone();
        }
        f(&inner.visible)
    }

    fn read_session<T>(
        &self,
        id: SessionId,
        f: impl FnOnce(&MockSession) -> T,
    ) -> Result<T, TransportError> {
        self.read(|state| {
            state
                .sessions
                .get(id.0 as usize)
                .map(f)
                .ok_or_else(|| TransportError::InvalidResponse(format!("unknown session {id}")))
        })
    }

    fn next_tx_id(inner: &mut Inner) -> TransactionId {
        inner.transaction_counter += 1;
        let mut bytes = [0u8; 32];
        bytes[24..].copy_from_slice(&inner.transaction_counter.to_be_bytes());
        TransactionId::from_bytes(bytes)
    }
}

/// Contract rules, applied to a scratch copy of the state.
fn execute(state: &mut ChainState, from: Address, call: &ContractCall) -> Result<(), RevertReason> {
    let now = state.now;
    match call {
        ContractCall::Approve { spender, amount } => {
            state.allowances.insert((from, *spender), *amount);
            Ok(())
        }
        ContractCall::CreateSession {
            amount_per_person,
            deadline,
            voting_period,
            participants,
        } => {
            if participants.len() < 3 {
                return Err(RevertReason::NotEnoughParticipants);
            }
            if participants.len() > 5 {
                return Err(RevertReason::TooManyParticipants);
            }
            let id = SessionId(state.sessions.len() as u64);
            state.sessions.push(MockSession {
                session: Session {
                    id,
                    host: from,
                    amount_per_person: *amount_per_person,
                    deadline: *deadline,
                    voting_period: *voting_period,
                    finalized: false,
                    active: false,
                    participant_count: participants.len() as u8,
                },
                participants: participants.clone(),
                deposited: HashSet::new(),
                voted: HashSet::new(),
                absence_votes: HashMap::new(),
            });
            Ok(())
        }
        ContractCall::Deposit { session_id } => {
            let entry = state
                .sessions
                .get_mut(session_id.0 as usize)
                .ok_or(RevertReason::NotParticipant)?;
            if now >= entry.session.deadline {
                return Err(RevertReason::DeadlineReached);
            }
            if entry.session.finalized {
                return Err(RevertReason::AlreadyFinalized);
            }
            if !entry.participants.contains(&from) {
                return Err(RevertReason::NotParticipant);
            }
            if entry.deposited.contains(&from) {
                return Err(RevertReason::AlreadyDeposited);
            }

            let amount = entry.session.amount_per_person;
            let allowance = state.allowances.entry((from, MOCK_CONTRACT)).or_default();
            let balance = state.balances.entry(from).or_default();
            if *allowance < amount || *balance < amount {
                return Err(RevertReason::TransferFailed);
            }
            *allowance -= amount;
            *balance -= amount;
            *state.balances.entry(MOCK_CONTRACT).or_default() += amount;

            entry.deposited.insert(from);
            if entry.participants.iter().all(|p| entry.deposited.contains(p)) {
                entry.session.active = true;
            }
            Ok(())
        }
        ContractCall::CastVote { session_id, suspect } => {
            let entry = state
                .sessions
                .get_mut(session_id.0 as usize)
                .ok_or(RevertReason::NotParticipant)?;
            if now < entry.session.deadline {
                return Err(RevertReason::VotingNotOpen);
            }
            if now >= entry.session.voting_end() {
                return Err(RevertReason::VotingClosed);
            }
            if entry.session.finalized {
                return Err(RevertReason::AlreadyFinalized);
            }
            if !entry.session.active {
                return Err(RevertReason::SessionNotActive);
            }
            if !entry.participants.contains(&from) {
                return Err(RevertReason::NotParticipant);
            }
            if !entry.participants.contains(suspect) {
                return Err(RevertReason::InvalidAbsent);
            }
            if from == *suspect {
                return Err(RevertReason::CannotVoteSelf);
            }
            if !entry.voted.insert(from) {
                return Err(RevertReason::AlreadyVoted);
            }
            *entry.absence_votes.entry(*suspect).or_default() += 1;
            Ok(())
        }
        ContractCall::FinalizeSession { session_id } => {
            let entry = state
                .sessions
                .get_mut(session_id.0 as usize)
                .ok_or(RevertReason::VotingNotOpen)?;
            if now < entry.session.voting_end() {
                return Err(RevertReason::VotingNotOpen);
            }
            if entry.session.finalized {
                return Err(RevertReason::AlreadyFinalized);
            }
            entry.session.finalized = true;
            Ok(())
        }
    }
}

#[async_trait]
impl ChainTransport for MockChain {
    async fn latest_block(&self) -> Result<BlockHeader, TransportError> {
        let mut inner = self.inner.lock().unwrap();
        if inner.fail_block_reads {
            return Err(TransportError::NetworkError("mock block read failure".into()));
        }
        inner.block_number += 1;
        Ok(BlockHeader {
            number: inner.block_number,
            timestamp: inner.state.now,
            base_fee_per_gas: inner.base_fee,
        })
    }

    async fn submit(&self, tx: TransactionData) -> Result<TransactionId, CallError> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(error) = inner.fail_next_submit.take() {
            return Err(error);
        }

        // Reverts surface at submission, the way gas estimation reports them.
        let mut scratch = inner.state.clone();
        execute(&mut scratch, self.account, &tx.call).map_err(CallError::Revert)?;

        let transaction_id = Self::next_tx_id(&mut inner);
        inner.block_number += 1;
        let outcome = if std::mem::take(&mut inner.fail_next_confirmation) {
            Err(CallError::FailedOnChain(transaction_id))
        } else {
            inner.state = scratch;
            inner.lag_remaining = inner.read_lag;
            Ok(Receipt {
                transaction_id,
                block_number: inner.block_number,
                gas_used: 50_000,
            })
        };

        inner.receipts.insert(transaction_id, outcome);
        inner.submitted.push(SubmittedCall {
            from: self.account,
            call: tx.call,
            fees: tx.fees,
            transaction_id,
        });
        Ok(transaction_id)
    }

    async fn wait_for_confirmation(&self, tx: &TransactionId) -> Result<Receipt, CallError> {
        let inner = self.inner.lock().unwrap();
        inner
            .receipts
            .get(tx)
            .cloned()
            .unwrap_or_else(|| Err(CallError::Other(format!("unknown transaction {tx}"))))
    }

    fn account(&self) -> Address {
        self.account
    }

    async fn health_check(&self) -> Result<(), TransportError> {
        Ok(())
    }
}

#[async_trait]
impl SessionReader for MockChain {
    async fn session_count(&self) -> Result<u64, TransportError> {
        Ok(self.read(|state| state.sessions.len() as u64))
    }

    async fn get_session(&self, id: SessionId) -> Result<Session, TransportError> {
        self.read_session(id, |entry| entry.session.clone())
    }

    async fn participant_at(&self, id: SessionId, index: u8) -> Result<Address, TransportError> {
        self.read_session(id, |entry| entry.participants.get(index as usize).copied())?
            .ok_or_else(|| TransportError::InvalidResponse(format!("no participant {index} in session {id}")))
    }

    async fn has_deposited(&self, id: SessionId, who: Address) -> Result<bool, TransportError> {
        self.read_session(id, |entry| entry.deposited.contains(&who))
    }

    async fn has_voted(&self, id: SessionId, who: Address) -> Result<bool, TransportError> {
        self.read_session(id, |entry| entry.voted.contains(&who))
    }

    async fn absence_vote_count(&self, id: SessionId, who: Address) -> Result<u64, TransportError> {
        self.read_session(id, |entry| entry.absence_votes.get(&who).copied().unwrap_or(0))
    }
}

#[async_trait]
impl TokenReader for MockChain {
    async fn allowance(&self, owner: Address, spender: Address) -> Result<u128, TransportError> {
        Ok(self.read(|state| state.allowances.get(&(owner, spender)).copied().unwrap_or(0)))
    }

    async fn balance_of(&self, owner: Address) -> Result<u128, TransportError> {
        Ok(self.read(|state| state.balances.get(&owner).copied().unwrap_or(0)))
    }
}

impl TozlowChain for MockChain {
    fn name(&self) -> &str {
        "MockChain"
    }

    fn network(&self) -> &str {
        "mock-network"
    }

    fn contract_address(&self) -> Address {
        MOCK_CONTRACT
    }

    fn token_address(&self) -> Address {
        MOCK_TOKEN
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(n: u8) -> Address {
        Address::from_bytes([n; 20])
    }

    fn fresh_session(deadline: u64) -> Session {
        Session {
            id: SessionId(0),
            host: addr(1),
            amount_per_person: 1_000,
            deadline,
            voting_period: 100,
            finalized: false,
            active: false,
            participant_count: 0,
        }
    }

    async fn send(chain: &MockChain, call: ContractCall) -> Result<Receipt, CallError> {
        let tx = chain.submit(TransactionData::new(call, FeeParams::default())).await?;
        chain.wait_for_confirmation(&tx).await
    }

    #[tokio::test]
    async fn test_mock_session_lifecycle() {
        let host = MockChain::new(addr(1));
        host.set_time(10);
        let id = host.insert_session(fresh_session(100), vec![addr(1), addr(2), addr(3)]);

        for n in 1..=3 {
            let chain = host.as_account(addr(n));
            chain.mint(addr(n), 1_000);
            send(&chain, ContractCall::Approve { spender: MOCK_CONTRACT, amount: 1_000 })
                .await
                .unwrap();
            send(&chain, ContractCall::Deposit { session_id: id }).await.unwrap();
        }

        let session = host.get_session(id).await.unwrap();
        assert!(session.active);
        assert_eq!(host.balance(MOCK_CONTRACT), 3_000);

        host.set_time(100);
        send(&host, ContractCall::CastVote { session_id: id, suspect: addr(2) })
            .await
            .unwrap();
        assert_eq!(host.absence_vote_count(id, addr(2)).await.unwrap(), 1);
        assert!(host.has_voted(id, addr(1)).await.unwrap());

        host.set_time(200);
        send(&host, ContractCall::FinalizeSession { session_id: id }).await.unwrap();
        assert!(host.get_session(id).await.unwrap().finalized);
    }

    #[tokio::test]
    async fn test_mock_enforces_contract_reverts() {
        let chain = MockChain::new(addr(1));
        chain.set_time(10);
        let id = chain.insert_session(fresh_session(100), vec![addr(1), addr(2), addr(3)]);

        let err = send(&chain, ContractCall::Deposit { session_id: id }).await.unwrap_err();
        assert_eq!(err, CallError::Revert(RevertReason::TransferFailed));

        let err = send(&chain, ContractCall::CastVote { session_id: id, suspect: addr(2) })
            .await
            .unwrap_err();
        assert_eq!(err, CallError::Revert(RevertReason::VotingNotOpen));

        let outsider = chain.as_account(addr(9));
        let err = send(&outsider, ContractCall::Deposit { session_id: id }).await.unwrap_err();
        assert_eq!(err, CallError::Revert(RevertReason::NotParticipant));

        assert!(chain.submitted().is_empty());
    }

    #[tokio::test]
    async fn test_read_lag_hides_fresh_writes() {
        let chain = MockChain::new(addr(1));
        chain.set_read_lag(2);

        send(&chain, ContractCall::Approve { spender: MOCK_CONTRACT, amount: 5 })
            .await
            .unwrap();

        assert_eq!(chain.allowance(addr(1), MOCK_CONTRACT).await.unwrap(), 0);
        assert_eq!(chain.allowance(addr(1), MOCK_CONTRACT).await.unwrap(), 0);
        assert_eq!(chain.allowance(addr(1), MOCK_CONTRACT).await.unwrap(), 5);
    }

    #[tokio::test]
    async fn test_block_reads_can_fail() {
        let chain = MockChain::new(addr(1));
        assert_eq!(chain.latest_block().await.unwrap().base_fee_per_gas, Some(20_000_000));

        chain.fail_block_reads(true);
        assert!(chain.latest_block().await.is_err());
    }

    #[tokio::test]
    async fn test_failed_confirmation_leaves_state_untouched() {
        let chain = MockChain::new(addr(1));
        chain.fail_next_confirmation();

        let tx = chain
            .submit(TransactionData::new(
                ContractCall::Approve { spender: MOCK_CONTRACT, amount: 5 },
                FeeParams::default(),
            ))
            .await
            .unwrap();
        assert_eq!(chain.wait_for_confirmation(&tx).await, Err(CallError::FailedOnChain(tx)));
        assert_eq!(chain.allowance(addr(1), MOCK_CONTRACT).await.unwrap(), 0);
        assert_eq!(chain.submitted_named("approve"), 1);
    }
}
