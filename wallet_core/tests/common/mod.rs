#![allow(dead_code)]

use dvita_nullables::{NullNode, NullPrompt};
use dvita_types::{Account, StackValue};
use dvita_wallet_core::{ClientConfig, ClientContext, SigningService, Wallet, GAS_FACTOR};

pub fn token() -> Account {
    Account::new([0xAA; 20])
}

pub fn bob() -> Account {
    Account::new([0xB0; 20])
}

/// Node with one 2-decimal token, a funded sender and an operator answering `answer`.
pub struct Fixture {
    pub node: NullNode,
    pub prompt: NullPrompt,
    pub wallet: Wallet,
    pub config: ClientConfig,
    pub sender: Account,
}

impl Fixture {
    pub fn new() -> Self {
        let config = ClientConfig::default();
        let wallet = Wallet::from_seed(&[1u8; 32]);
        let sender = wallet.default_account().unwrap();

        let node = NullNode::new();
        node.token(token(), "Token", "TKN", 2);
        node.respond(token(), "transfer", StackValue::Boolean(true));
        node.respond(
            config.contracts.gas_token,
            "balanceOf",
            StackValue::Integer(10 * i128::from(GAS_FACTOR)),
        );

        Self {
            node,
            prompt: NullPrompt::new(),
            wallet,
            config,
            sender,
        }
    }

    pub fn answering(answer: &str) -> Self {
        let fixture = Self::new();
        fixture.prompt.push_answer(answer);
        fixture
    }

    /// `name` resolves to `account` through the naming service.
    pub fn register_name(&self, name_account: Account) {
        self.node.respond(
            self.config.contracts.naming_service,
            "resolve",
            StackValue::ByteString(name_account.as_bytes().to_vec()),
        );
    }

    pub fn ctx(&self) -> ClientContext<'_> {
        ClientContext {
            node: &self.node,
            signer: &self.wallet,
            prompt: &self.prompt,
            config: &self.config,
        }
    }
}
