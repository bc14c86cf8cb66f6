//! Lock lifecycle and settlement flows against a live marketplace.

use lockshop_crypto::Signer;
use lockshop_crypto::TypedDomain;
use lockshop_keyledger::{KeyLedger, MinterSet};
use lockshop_market::{
    FungibleLedger, LocksmithRegistry, MarketError, Marketplace, NewLockRequestMessage,
    TokenLedger,
};
use lockshop_types::{unix_now, Address, Ask, Eip712Signature, FeeConfig};
use std::sync::Arc;

const LOCKSMITH_SEED: [u8; 32] = [42u8; 32];
const CONTENT_HASH: &str = "QmNzSrLQW52TwnGqe2MaADT14UFJ5Mz4eHHveNceHq9KcY";
const CHAIN_ID: u64 = 31337;

struct Harness {
    market: Marketplace,
    keys: Arc<KeyLedger>,
    token: Arc<TokenLedger>,
    token_address: Address,
    locksmith: Signer,
    owner: Address,
    fee_to: Address,
}

fn harness() -> Harness {
    let minters = Arc::new(MinterSet::new());
    let ledger_address = Address::new([0xC1u8; 20]);
    let keys = Arc::new(KeyLedger::new(
        minters.clone(),
        TypedDomain::new("ContentKey", "1", CHAIN_ID, ledger_address),
    ));

    let locksmith = Signer::from_secret_bytes(&LOCKSMITH_SEED).unwrap();
    let locksmiths = Arc::new(LocksmithRegistry::new(&locksmith.address()));

    let token = Arc::new(TokenLedger::new());
    let market_address = Address::new([0xC2u8; 20]);
    let fee_to = Address::new([0xFEu8; 20]);
    let market = Marketplace::new(
        market_address,
        CHAIN_ID,
        keys.clone(),
        locksmiths,
        token.clone(),
        FeeConfig {
            fee_to,
            fee_bps: 250,
        },
    );
    minters.grant(&market.address());

    Harness {
        market,
        keys,
        token,
        token_address: Address::new([0x70u8; 20]),
        locksmith,
        owner: Address::new([0x01u8; 20]),
        fee_to,
    }
}

fn ask(harness: &Harness) -> Ask {
    Ask {
        owner: harness.owner,
        token: harness.token_address,
        amount: 114_514_191_981_000_000,
        period: 3600 * 24 * 180,
        is_transfer_allowed: true,
    }
}

fn signed_request(
    harness: &Harness,
    signer: &Signer,
    content_hash: &str,
    terms: &Ask,
    deadline: u64,
) -> Eip712Signature {
    let message = NewLockRequestMessage {
        content_hash: content_hash.to_string(),
        token: terms.token,
        amount: terms.amount,
        period: terms.period,
        deadline,
    };
    let raw = signer.sign_typed(harness.market.domain(), &message).unwrap();
    Eip712Signature {
        v: raw.v,
        r: raw.r,
        s: raw.s,
        deadline,
    }
}

#[test]
fn master_is_registered_locksmith() {
    let harness = harness();
    let terms = ask(&harness);
    let deadline = unix_now() + 3600;

    let signature = signed_request(&harness, &harness.locksmith, CONTENT_HASH, &terms, deadline);
    assert!(harness
        .market
        .verify_new_lock_request(CONTENT_HASH, &terms, &signature)
        .unwrap());
}

#[test]
fn recover_exposes_the_raw_signer() {
    let harness = harness();
    let terms = ask(&harness);
    let deadline = unix_now() + 3600;

    let signature = signed_request(&harness, &harness.locksmith, CONTENT_HASH, &terms, deadline);
    let recovered = harness
        .market
        .recover_new_lock_request(CONTENT_HASH, &terms, &signature)
        .unwrap();
    assert_eq!(recovered, harness.locksmith.address());
}

#[test]
fn outdated_approval_is_rejected() {
    let harness = harness();
    let terms = ask(&harness);
    let deadline = unix_now() - 3600;

    let signature = signed_request(&harness, &harness.locksmith, CONTENT_HASH, &terms, deadline);
    let err = harness
        .market
        .verify_new_lock_request(CONTENT_HASH, &terms, &signature)
        .unwrap_err();
    assert!(matches!(err, MarketError::ExpiredSignature));
    assert_eq!(
        err.to_string(),
        "Locksmith::verifyNewLockRequest: sig deadline expired"
    );
}

#[test]
fn stranger_approval_verifies_false_and_cannot_create() {
    let harness = harness();
    let terms = ask(&harness);
    let deadline = unix_now() + 3600;
    let stranger = Signer::from_secret_bytes(&[7u8; 32]).unwrap();

    let signature = signed_request(&harness, &stranger, CONTENT_HASH, &terms, deadline);
    assert!(!harness
        .market
        .verify_new_lock_request(CONTENT_HASH, &terms, &signature)
        .unwrap());

    let err = harness
        .market
        .new_lock(CONTENT_HASH, terms, &signature)
        .unwrap_err();
    assert!(matches!(err, MarketError::NotLocksmith));
    assert!(harness.market.asks(CONTENT_HASH).is_none());
}

#[test]
fn new_lock_stores_the_submitted_terms() {
    let harness = harness();
    let terms = ask(&harness);
    let deadline = unix_now() + 3600;

    let signature = signed_request(&harness, &harness.locksmith, CONTENT_HASH, &terms, deadline);
    harness
        .market
        .new_lock(CONTENT_HASH, terms.clone(), &signature)
        .unwrap();

    assert_eq!(harness.market.asks(CONTENT_HASH), Some(terms));
}

#[test]
fn duplicate_lock_is_rejected() {
    let harness = harness();
    let terms = ask(&harness);
    let deadline = unix_now() + 3600;

    let signature = signed_request(&harness, &harness.locksmith, CONTENT_HASH, &terms, deadline);
    harness
        .market
        .new_lock(CONTENT_HASH, terms.clone(), &signature)
        .unwrap();

    let err = harness
        .market
        .new_lock(CONTENT_HASH, terms, &signature)
        .unwrap_err();
    assert!(matches!(err, MarketError::LockExists { .. }));
}

#[test]
fn owner_can_set_ask() {
    let harness = harness();
    let terms = ask(&harness);
    let deadline = unix_now() + 3600;

    let signature = signed_request(&harness, &harness.locksmith, CONTENT_HASH, &terms, deadline);
    harness
        .market
        .new_lock(CONTENT_HASH, terms.clone(), &signature)
        .unwrap();

    let repriced = Ask {
        amount: 19_198_100_000,
        ..terms
    };
    harness
        .market
        .set_ask(&harness.owner, CONTENT_HASH, repriced)
        .unwrap();

    assert_eq!(
        harness.market.asks(CONTENT_HASH).unwrap().amount,
        19_198_100_000
    );
}

#[test]
fn set_ask_by_other_caller_is_rejected() {
    let harness = harness();
    let terms = ask(&harness);
    let deadline = unix_now() + 3600;

    let signature = signed_request(&harness, &harness.locksmith, CONTENT_HASH, &terms, deadline);
    harness
        .market
        .new_lock(CONTENT_HASH, terms.clone(), &signature)
        .unwrap();

    let outsider = Address::new([0x99u8; 20]);
    let err = harness
        .market
        .set_ask(&outsider, CONTENT_HASH, Ask { amount: 1, ..terms })
        .unwrap_err();
    assert!(matches!(err, MarketError::SetAskForbidden));
    assert_eq!(err.to_string(), "SET_ASK::EITHER OWNER OR EMPTY");
}

#[test]
fn set_ask_bootstraps_an_unset_owner() {
    let harness = harness();
    let terms = ask(&harness);

    // no lock yet: anyone may establish the terms, owner included
    harness
        .market
        .set_ask(&harness.owner, CONTENT_HASH, terms.clone())
        .unwrap();
    assert_eq!(harness.market.asks(CONTENT_HASH), Some(terms.clone()));

    // ownership is now established; other callers are shut out
    let outsider = Address::new([0x99u8; 20]);
    let err = harness
        .market
        .set_ask(&outsider, CONTENT_HASH, Ask { amount: 1, ..terms })
        .unwrap_err();
    assert!(matches!(err, MarketError::SetAskForbidden));
}

#[test]
fn owner_mints_keys_directly() {
    let harness = harness();
    let terms = ask(&harness);
    let deadline = unix_now() + 3600;

    let signature = signed_request(&harness, &harness.locksmith, CONTENT_HASH, &terms, deadline);
    harness
        .market
        .new_lock(CONTENT_HASH, terms.clone(), &signature)
        .unwrap();

    let recipient = Address::new([0x08u8; 20]);
    let minted_at = unix_now();
    let key_id = harness
        .market
        .mint_key(&harness.owner, &recipient, CONTENT_HASH)
        .unwrap();

    assert_eq!(harness.keys.balance_of(&recipient), 1);
    let listed = harness.keys.list_keys(&recipient);
    assert_eq!(listed[0].0, key_id);
    assert_eq!(listed[0].1.content_hash, CONTENT_HASH);
    assert!(listed[0].1.transferable);
    assert!(listed[0].1.expire_at >= minted_at + terms.period);
}

#[test]
fn mint_key_by_other_caller_is_rejected() {
    let harness = harness();
    let terms = ask(&harness);
    let deadline = unix_now() + 3600;

    let signature = signed_request(&harness, &harness.locksmith, CONTENT_HASH, &terms, deadline);
    harness
        .market
        .new_lock(CONTENT_HASH, terms, &signature)
        .unwrap();

    let outsider = Address::new([0x99u8; 20]);
    let recipient = Address::new([0x08u8; 20]);
    let err = harness
        .market
        .mint_key(&outsider, &recipient, CONTENT_HASH)
        .unwrap_err();
    assert!(matches!(err, MarketError::Unauthorized));
    assert_eq!(harness.keys.balance_of(&recipient), 0);
}

#[test]
fn buy_pays_owner_splits_fee_and_mints() {
    let harness = harness();
    let terms = ask(&harness);
    let deadline = unix_now() + 3600;

    let signature = signed_request(&harness, &harness.locksmith, CONTENT_HASH, &terms, deadline);
    harness
        .market
        .new_lock(CONTENT_HASH, terms.clone(), &signature)
        .unwrap();

    let buyer = Address::new([0x03u8; 20]);
    harness.token.mint(&buyer, terms.amount);
    harness
        .token
        .approve(&buyer, &harness.market.address(), terms.amount);

    let key_id = harness.market.buy_key(&buyer, CONTENT_HASH).unwrap();

    let fee = terms.amount * 250 / 10_000;
    assert_eq!(harness.token.balance_of(&harness.owner), terms.amount - fee);
    assert_eq!(harness.token.balance_of(&harness.fee_to), fee);
    assert_eq!(harness.token.balance_of(&buyer), 0);
    assert_eq!(harness.token.balance_of(&harness.market.address()), 0);

    assert_eq!(harness.keys.balance_of(&buyer), 1);
    let (listed_id, data) = harness.keys.list_keys(&buyer).remove(0);
    assert_eq!(listed_id, key_id);
    assert_eq!(data.content_hash, CONTENT_HASH);
    assert!(data.transferable);
}

#[test]
fn buy_without_funds_fails_and_changes_nothing() {
    let harness = harness();
    let terms = ask(&harness);
    let deadline = unix_now() + 3600;

    let signature = signed_request(&harness, &harness.locksmith, CONTENT_HASH, &terms, deadline);
    harness
        .market
        .new_lock(CONTENT_HASH, terms, &signature)
        .unwrap();

    let buyer = Address::new([0x03u8; 20]);
    let err = harness.market.buy_key(&buyer, CONTENT_HASH).unwrap_err();
    assert!(err.to_string().contains("transfer amount exceeds balance"));

    assert_eq!(harness.token.balance_of(&harness.owner), 0);
    assert_eq!(harness.token.balance_of(&harness.fee_to), 0);
    assert_eq!(harness.keys.balance_of(&buyer), 0);
}

#[test]
fn buy_without_allowance_fails_and_changes_nothing() {
    let harness = harness();
    let terms = ask(&harness);
    let deadline = unix_now() + 3600;

    let signature = signed_request(&harness, &harness.locksmith, CONTENT_HASH, &terms, deadline);
    harness
        .market
        .new_lock(CONTENT_HASH, terms.clone(), &signature)
        .unwrap();

    let buyer = Address::new([0x03u8; 20]);
    harness.token.mint(&buyer, terms.amount);

    let err = harness.market.buy_key(&buyer, CONTENT_HASH).unwrap_err();
    assert!(err.to_string().contains("transfer amount exceeds allowance"));
    assert_eq!(harness.token.balance_of(&buyer), terms.amount);
    assert_eq!(harness.keys.balance_of(&buyer), 0);
}

#[test]
fn buy_on_missing_lock_fails() {
    let harness = harness();
    let buyer = Address::new([0x03u8; 20]);

    let err = harness.market.buy_key(&buyer, "never-listed").unwrap_err();
    assert!(matches!(err, MarketError::LockNotFound { .. }));
}

#[test]
fn buyer_keys_follow_the_current_ask() {
    let harness = harness();
    let terms = ask(&harness);
    let deadline = unix_now() + 3600;

    let signature = signed_request(&harness, &harness.locksmith, CONTENT_HASH, &terms, deadline);
    harness
        .market
        .new_lock(CONTENT_HASH, terms.clone(), &signature)
        .unwrap();

    // owner flips transferability and reprices before the sale
    let repriced = Ask {
        amount: 1_000,
        is_transfer_allowed: false,
        ..terms
    };
    harness
        .market
        .set_ask(&harness.owner, CONTENT_HASH, repriced)
        .unwrap();

    let buyer = Address::new([0x03u8; 20]);
    harness.token.mint(&buyer, 1_000);
    harness.token.approve(&buyer, &harness.market.address(), 1_000);

    harness.market.buy_key(&buyer, CONTENT_HASH).unwrap();

    let (_, data) = harness.keys.list_keys(&buyer).remove(0);
    assert!(!data.transferable);
    assert_eq!(harness.token.balance_of(&buyer), 0);
}
