mod common;

use common::{bob, token, Fixture};
use dvita_nullables::{DEFAULT_GAS_PER_CALL, DEFAULT_NETWORK_FEE};
use dvita_transactions::{decode_calls, WitnessScope};
use dvita_types::{ContractArg, StackValue};
use dvita_wallet_core::{
    pipeline::CONFIRM_PROMPT, register_by_name, token as tokens, unregister_by_name,
    PipelineOutcome, TransferRequest, WalletError, GAS_FACTOR,
};

fn transfer_to(to: &str, amount: &str) -> TransferRequest {
    TransferRequest {
        token: token(),
        to: to.to_string(),
        amount: amount.to_string(),
        from: None,
        data: None,
        cosigners: Vec::new(),
    }
}

#[tokio::test]
async fn confirmed_transfer_is_relayed_once() {
    let f = Fixture::answering("yes");
    let outcome = tokens::transfer(&f.ctx(), transfer_to(&bob().to_string(), "1.5"))
        .await
        .unwrap();

    let relayed = f.node.relayed();
    assert_eq!(relayed.len(), 1);
    assert_eq!(outcome, PipelineOutcome::Relayed(relayed[0].hash().unwrap()));

    let draft = relayed[0].draft();
    assert_eq!(draft.system_fee, DEFAULT_GAS_PER_CALL);
    assert_eq!(draft.network_fee, DEFAULT_NETWORK_FEE);
    assert_eq!(draft.valid_until_block, 1000 + 5760);
    assert_eq!(relayed[0].witnesses().len(), 1);

    let calls = decode_calls(&draft.script).unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].contract, token());
    assert_eq!(calls[0].method, "transfer");
    assert_eq!(
        calls[0].args,
        vec![
            ContractArg::ByteArray(f.sender.as_bytes().to_vec()),
            ContractArg::ByteArray(bob().as_bytes().to_vec()),
            ContractArg::Integer(150),
            ContractArg::Any,
        ]
    );
}

#[tokio::test]
async fn signers_are_restricted_to_token_and_gas() {
    let f = Fixture::answering("y");
    let cosigner = dvita_types::Account::new([0xC0; 20]);
    let mut request = transfer_to(&bob().to_string(), "1");
    request.cosigners = vec![cosigner, f.sender];
    // The co-signer has no key, so signing fails after confirmation.
    let err = tokens::transfer(&f.ctx(), request).await.unwrap_err();
    assert!(matches!(err, WalletError::Signing(_)));
    assert!(f.node.relayed().is_empty());

    let estimate = &f.node.invocations()[f.node.invocations().len() - 2];
    let accounts: Vec<_> = estimate.signers.iter().map(|s| s.account).collect();
    assert_eq!(accounts, vec![f.sender, cosigner]);
    for signer in &estimate.signers {
        assert_eq!(
            signer.scopes,
            WitnessScope::CALLED_BY_ENTRY | WitnessScope::CUSTOM_CONTRACTS
        );
        assert_eq!(
            signer.allowed_contracts,
            vec![token(), f.config.contracts.gas_token]
        );
    }
}

#[tokio::test]
async fn confirmation_shows_fees_in_gas() {
    let f = Fixture::answering("no");
    tokens::transfer(&f.ctx(), transfer_to(&bob().to_string(), "1"))
        .await
        .unwrap();
    let asked = f.prompt.asked();
    assert_eq!(asked.len(), 1);
    assert_eq!(
        asked[0],
        format!("Network fee: 0.00100000\tTotal fee: 0.01100000 GAS\n{CONFIRM_PROMPT}")
    );
}

#[tokio::test]
async fn declined_transfer_relays_nothing() {
    for answer in ["no", "", "n", "yess", "ok"] {
        let f = Fixture::answering(answer);
        let outcome = tokens::transfer(&f.ctx(), transfer_to(&bob().to_string(), "1"))
            .await
            .unwrap();
        assert_eq!(outcome, PipelineOutcome::Declined, "{answer:?}");
        assert!(f.node.relayed().is_empty());
    }
}

#[tokio::test]
async fn closed_input_declines() {
    let f = Fixture::new();
    let outcome = tokens::transfer(&f.ctx(), transfer_to(&bob().to_string(), "1"))
        .await
        .unwrap();
    assert_eq!(outcome, PipelineOutcome::Declined);
    assert!(f.node.relayed().is_empty());
}

#[tokio::test]
async fn faulting_estimate_aborts_before_confirmation() {
    let f = Fixture::answering("yes");
    f.node.fault(token(), "transfer", "insufficient funds");
    let err = tokens::transfer(&f.ctx(), transfer_to(&bob().to_string(), "1"))
        .await
        .unwrap_err();
    assert!(matches!(err, WalletError::InvocationFault { .. }));
    assert!(f.prompt.asked().is_empty());
    assert!(f.node.relayed().is_empty());
}

#[tokio::test]
async fn false_result_aborts() {
    let f = Fixture::answering("yes");
    f.node.respond(token(), "transfer", StackValue::Boolean(false));
    let err = tokens::transfer(&f.ctx(), transfer_to(&bob().to_string(), "1"))
        .await
        .unwrap_err();
    assert!(matches!(err, WalletError::InvocationFault { .. }));
    assert!(f.node.relayed().is_empty());
}

#[tokio::test]
async fn null_result_from_transfer_aborts() {
    let f = Fixture::answering("yes");
    f.node.respond(token(), "transfer", StackValue::Null);
    let err = tokens::transfer(&f.ctx(), transfer_to(&bob().to_string(), "1"))
        .await
        .unwrap_err();
    assert!(matches!(err, WalletError::InvocationFault { .. }), "{err}");
    assert!(f.prompt.asked().is_empty());
    assert!(f.node.relayed().is_empty());
}

#[tokio::test]
async fn null_result_from_handle_transfer_aborts() {
    let f = Fixture::answering("yes");
    let ledger = f.config.contracts.social_ledger;
    f.node.respond(ledger, "transferFromAddressToHandle", StackValue::Null);
    let err = tokens::transfer(&f.ctx(), transfer_to("@carol", "1"))
        .await
        .unwrap_err();
    assert!(matches!(err, WalletError::InvocationFault { .. }), "{err}");
    assert!(f.node.relayed().is_empty());
}

#[tokio::test]
async fn estimate_above_ceiling_aborts() {
    let mut f = Fixture::answering("yes");
    f.config.transfer_max_gas = DEFAULT_GAS_PER_CALL / 2;
    let err = tokens::transfer(&f.ctx(), transfer_to(&bob().to_string(), "1"))
        .await
        .unwrap_err();
    assert!(matches!(err, WalletError::InvocationFault { .. }), "{err}");
    assert!(f.prompt.asked().is_empty());
    assert!(f.node.relayed().is_empty());
}

#[tokio::test]
async fn insufficient_gas_fails_draft() {
    let f = Fixture::answering("yes");
    f.node.respond(
        f.config.contracts.gas_token,
        "balanceOf",
        StackValue::Integer(i128::from(DEFAULT_GAS_PER_CALL)),
    );
    let err = tokens::transfer(&f.ctx(), transfer_to(&bob().to_string(), "1"))
        .await
        .unwrap_err();
    assert!(matches!(err, WalletError::DraftBuild(_)), "{err}");
    assert!(f.prompt.asked().is_empty());
    assert!(f.node.relayed().is_empty());
}

#[tokio::test]
async fn relay_failure_is_reported_not_retried() {
    let f = Fixture::answering("yes");
    f.node.fail_relays("already exists");
    let err = tokens::transfer(&f.ctx(), transfer_to(&bob().to_string(), "1"))
        .await
        .unwrap_err();
    assert!(matches!(err, WalletError::Relay(_)));
    assert!(f.node.relayed().is_empty());
    assert_eq!(f.prompt.asked().len(), 1);
}

#[tokio::test]
async fn amount_precision_is_enforced() {
    let f = Fixture::answering("yes");
    for amount in ["1.234", "-1", "abc", "0"] {
        let err = tokens::transfer(&f.ctx(), transfer_to(&bob().to_string(), amount))
            .await
            .unwrap_err();
        assert!(matches!(err, WalletError::ScaleConversion(_)), "{amount}: {err}");
    }
    assert!(f.node.relayed().is_empty());
}

#[tokio::test]
async fn transfer_to_handle_goes_through_proxy_ledger() {
    let f = Fixture::answering("yes");
    let ledger = f.config.contracts.social_ledger;
    f.node.respond(ledger, "transferFromAddressToHandle", StackValue::Boolean(true));

    tokens::transfer(&f.ctx(), transfer_to("@carol", "2"))
        .await
        .unwrap();

    let relayed = f.node.relayed();
    assert_eq!(relayed.len(), 1);
    let draft = relayed[0].draft();
    let calls = decode_calls(&draft.script).unwrap();
    assert_eq!(calls[0].contract, ledger);
    assert_eq!(calls[0].method, "transferFromAddressToHandle");
    assert_eq!(
        calls[0].args,
        vec![
            ContractArg::ByteArray(f.sender.as_bytes().to_vec()),
            ContractArg::ByteArray(b"@carol".to_vec()),
            ContractArg::ByteArray(token().as_bytes().to_vec()),
            ContractArg::Integer(200),
        ]
    );
    assert_eq!(
        draft.signers[0].allowed_contracts,
        vec![token(), f.config.contracts.gas_token]
    );
}

#[tokio::test]
async fn transfer_to_domain_name_uses_resolved_account() {
    let f = Fixture::answering("yes");
    f.register_name(bob());
    tokens::transfer(&f.ctx(), transfer_to("bob.id.dvita.com", "0.01"))
        .await
        .unwrap();
    let draft = f.node.relayed()[0].draft().clone();
    let calls = decode_calls(&draft.script).unwrap();
    assert_eq!(calls[0].args[1], ContractArg::ByteArray(bob().as_bytes().to_vec()));
    assert_eq!(calls[0].args[2], ContractArg::Integer(1));
}

#[tokio::test]
async fn register_relays_naming_transaction() {
    let f = Fixture::answering("yes");
    let naming = f.config.contracts.naming_service;
    f.node.respond(naming, "register", StackValue::Boolean(true));

    assert!(register_by_name(&f.ctx(), "bob.id.dvita.com", bob(), f.sender).await);

    let relayed = f.node.relayed();
    assert_eq!(relayed.len(), 1);
    let draft = relayed[0].draft();
    assert_eq!(
        draft.signers[0].allowed_contracts,
        vec![naming, f.config.contracts.gas_token]
    );
    let calls = decode_calls(&draft.script).unwrap();
    assert_eq!(calls[0].method, "register");
    assert_eq!(
        calls[0].args,
        vec![
            ContractArg::ByteArray(b"bob.id.dvita.com".to_vec()),
            ContractArg::ByteArray(bob().as_bytes().to_vec()),
        ]
    );
    let estimate = &f.node.invocations()[0];
    assert_eq!(estimate.gas_limit, f.config.test_mode_gas);
}

#[tokio::test]
async fn register_accepts_a_void_result() {
    let f = Fixture::answering("yes");
    f.node
        .respond(f.config.contracts.naming_service, "register", StackValue::Null);
    assert!(register_by_name(&f.ctx(), "bob.id.dvita.com", bob(), f.sender).await);
    assert_eq!(f.node.relayed().len(), 1);
}

#[tokio::test]
async fn register_failures_are_false() {
    let f = Fixture::answering("yes");
    f.node
        .fault(f.config.contracts.naming_service, "register", "name taken");
    assert!(!register_by_name(&f.ctx(), "bob.id.dvita.com", bob(), f.sender).await);
    assert!(f.node.relayed().is_empty());

    let declined = Fixture::answering("no");
    declined
        .node
        .respond(declined.config.contracts.naming_service, "register", StackValue::Null);
    assert!(!register_by_name(&declined.ctx(), "bob.id.dvita.com", bob(), declined.sender).await);
    assert!(declined.node.relayed().is_empty());
}

#[tokio::test]
async fn unregister_relays_with_name_only() {
    let f = Fixture::answering("y");
    f.node
        .respond(f.config.contracts.naming_service, "unregister", StackValue::Null);
    assert!(unregister_by_name(&f.ctx(), "bob.id.dvita.com", f.sender).await);

    let draft = f.node.relayed()[0].draft().clone();
    let calls = decode_calls(&draft.script).unwrap();
    assert_eq!(calls[0].method, "unregister");
    assert_eq!(
        calls[0].args,
        vec![ContractArg::ByteArray(b"bob.id.dvita.com".to_vec())]
    );
}

#[tokio::test]
async fn unregister_with_unreachable_node_is_false() {
    let f = Fixture::answering("yes");
    f.node.set_unreachable(true);
    assert!(!unregister_by_name(&f.ctx(), "bob.id.dvita.com", f.sender).await);
}

#[tokio::test]
async fn sender_defaults_to_wallet_account_and_pays_fee() {
    let f = Fixture::answering("yes");
    f.node.respond(
        f.config.contracts.gas_token,
        "balanceOf",
        StackValue::Integer(i128::from(GAS_FACTOR)),
    );
    tokens::transfer(&f.ctx(), transfer_to(&bob().to_string(), "1"))
        .await
        .unwrap();
    let draft = f.node.relayed()[0].draft().clone();
    assert_eq!(draft.sender(), Some(&f.sender));
}
