use proptest::prelude::*;

use disperse_asset::{CallContext, Host, NativeAsset};
use disperse_engine::{BatchRequest, Commitment, DisperseContract, DisperseError, EngineConfig};
use disperse_nullables::{test_address, HostBuilder, NullCommitStore};
use disperse_types::{Address, PPM_DENOMINATOR};

const CONTRACT: Address = Address::new([0xcc; 20]);
const CALLER: Address = Address::new([0xaa; 20]);

fn contract() -> DisperseContract<NullCommitStore> {
    DisperseContract::new(CONTRACT, EngineConfig::default(), NullCommitStore::new())
}

/// Scale arbitrary positive weights so they sum to exactly one million.
fn normalize(raw: &[u128]) -> Vec<u128> {
    let sum: u128 = raw.iter().sum();
    let mut weights: Vec<u128> = raw.iter().map(|w| w * PPM_DENOMINATOR / sum).collect();
    let assigned: u128 = weights.iter().sum();
    if let Some(last) = weights.last_mut() {
        *last += PPM_DENOMINATOR - assigned;
    }
    weights
}

proptest! {
    /// In fixed mode every recipient receives exactly the requested amount.
    #[test]
    fn fixed_native_pays_exact_amounts(amounts in prop::collection::vec(0u128..1_000_000_000_000_000_000_000, 1..20)) {
        let total: u128 = amounts.iter().sum();
        prop_assume!(total > 0);
        let mut host = HostBuilder::new().native(CALLER, total).build();
        let recipients: Vec<Address> = (1..=amounts.len() as u8).map(test_address).collect();
        let batch = BatchRequest::new(recipients.clone(), amounts.clone(), false);

        let receipt = contract()
            .disperse_native(&mut host, &CallContext::with_value(CALLER, total), &batch)
            .unwrap();

        prop_assert_eq!(receipt.distributed, total);
        prop_assert_eq!(receipt.dust, 0);
        for (recipient, amount) in recipients.iter().zip(&amounts) {
            prop_assert_eq!(host.native().balance_of(recipient), *amount);
        }
        prop_assert_eq!(host.native().balance_of(&CALLER), 0);
        prop_assert_eq!(host.native().balance_of(&CONTRACT), 0);
    }

    /// Percentage payouts are floored shares; the contract keeps less than one unit per recipient.
    #[test]
    fn percentage_native_floors_each_share(
        raw in prop::collection::vec(1u128..1_000, 1..12),
        total in 1u128..u64::MAX as u128,
    ) {
        let weights = normalize(&raw);
        let recipients: Vec<Address> = (1..=weights.len() as u8).map(test_address).collect();
        let mut host = HostBuilder::new().native(CALLER, total).build();
        let batch = BatchRequest::new(recipients.clone(), weights.clone(), true);

        let receipt = contract()
            .disperse_native(&mut host, &CallContext::with_value(CALLER, total), &batch)
            .unwrap();

        for (recipient, weight) in recipients.iter().zip(&weights) {
            prop_assert_eq!(host.native().balance_of(recipient), total * weight / PPM_DENOMINATOR);
        }
        prop_assert!(receipt.dust < weights.len() as u128);
        prop_assert_eq!(receipt.distributed + receipt.dust, total);
        prop_assert_eq!(host.native().balance_of(&CONTRACT), receipt.dust);
    }

    /// Weights that do not sum to one million are rejected before any funds move.
    #[test]
    fn bad_weight_sum_moves_nothing(
        weights in prop::collection::vec(0u128..600_000, 1..6),
        total in 1u128..1_000_000_000,
    ) {
        prop_assume!(weights.iter().sum::<u128>() != PPM_DENOMINATOR);
        let recipients: Vec<Address> = (1..=weights.len() as u8).map(test_address).collect();
        let mut host = HostBuilder::new().native(CALLER, total).build();
        let batch = BatchRequest::new(recipients.clone(), weights, true);

        let result = contract().disperse_native(&mut host, &CallContext::with_value(CALLER, total), &batch);

        let is_weight_mismatch = matches!(result, Err(DisperseError::WeightSumMismatch { .. }));
        prop_assert!(is_weight_mismatch);
        prop_assert_eq!(host.native().balance_of(&CALLER), total);
        for recipient in &recipients {
            prop_assert_eq!(host.native().balance_of(recipient), 0);
        }
    }

    /// The escrow total is the running sum of every successful commit.
    #[test]
    fn native_commits_accumulate(deposits in prop::collection::vec(1u128..1_000_000_000_000_000_000, 1..10)) {
        let funded: u128 = deposits.iter().sum();
        let mut host = HostBuilder::new().native(CALLER, funded).build();
        let contract = contract();

        let mut running = 0u128;
        for deposit in &deposits {
            let receipt = contract
                .commit(&mut host, &CallContext::with_value(CALLER, *deposit), Commitment::Native)
                .unwrap();
            running += deposit;
            prop_assert_eq!(receipt.new_total, running);
            prop_assert_eq!(contract.get_native_amount(&CALLER), running);
        }
        prop_assert_eq!(host.native().balance_of(&CONTRACT), funded);
    }
}
