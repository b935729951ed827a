use proptest::prelude::*;

use dvita_types::{Account, TokenAmount, TxHash};

proptest! {
    /// Account hex form: display -> from_hex produces the identical account.
    #[test]
    fn account_hex_roundtrip(bytes in prop::array::uniform20(0u8..)) {
        let account = Account::new(bytes);
        let parsed = Account::from_hex(&account.to_string()).unwrap();
        prop_assert_eq!(parsed, account);
    }

    /// Account address form round-trips for any version byte.
    #[test]
    fn account_address_roundtrip(bytes in prop::array::uniform20(0u8..), version in 0u8..) {
        let account = Account::new(bytes);
        let address = account.to_address(version);
        prop_assert_eq!(Account::from_address(&address, version).unwrap(), account);
    }

    /// Account::is_zero is true only for all-zero bytes.
    #[test]
    fn account_is_zero_correct(bytes in prop::array::uniform20(0u8..)) {
        prop_assert_eq!(Account::new(bytes).is_zero(), bytes == [0u8; 20]);
    }

    /// Account bincode serialization roundtrip.
    #[test]
    fn account_bincode_roundtrip(bytes in prop::array::uniform20(0u8..)) {
        let account = Account::new(bytes);
        let encoded = bincode::serialize(&account).unwrap();
        let decoded: Account = bincode::deserialize(&encoded).unwrap();
        prop_assert_eq!(decoded, account);
    }

    /// TxHash::is_zero is true only for all-zero bytes.
    #[test]
    fn tx_hash_is_zero_correct(bytes in prop::array::uniform32(0u8..)) {
        prop_assert_eq!(TxHash::new(bytes).is_zero(), bytes == [0u8; 32]);
    }

    /// Displaying a raw amount and parsing it back is exact.
    #[test]
    fn amount_display_parse_roundtrip(raw in 0u128..u128::MAX / 1000, decimals in 0u8..=18) {
        let amount = TokenAmount::from_raw(raw, decimals);
        let parsed = TokenAmount::parse(&amount.to_string(), decimals).unwrap();
        prop_assert_eq!(parsed.raw(), raw);
    }

    /// Whole numbers scale by exactly 10^decimals.
    #[test]
    fn amount_whole_units_scale(units in 0u64..1_000_000_000, decimals in 0u8..=18) {
        let amount = TokenAmount::parse(&units.to_string(), decimals).unwrap();
        prop_assert_eq!(amount.raw(), units as u128 * 10u128.pow(decimals as u32));
    }

    /// With zero decimals any non-zero fraction is rejected.
    #[test]
    fn amount_fraction_rejected_without_decimals(units in 0u64..1_000_000, frac in 1u32..1_000) {
        let text = format!("{units}.{frac}");
        prop_assert!(TokenAmount::parse(&text, 0).is_err());
    }

    /// Displayed amounts always carry exactly `decimals` fractional digits.
    #[test]
    fn amount_display_fraction_width(raw in 0u128..1_000_000_000_000, decimals in 1u8..=18) {
        let shown = TokenAmount::from_raw(raw, decimals).to_string();
        let (_, frac) = shown.split_once('.').unwrap();
        prop_assert_eq!(frac.len(), decimals as usize);
    }
}
