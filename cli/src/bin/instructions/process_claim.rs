use solana_rpc_client_api::config::RpcSendTransactionConfig;
use solana_sdk::compute_budget::ComputeBudgetInstruction;

use crate::*;

const COMPUTE_UNIT_LIMIT: u32 = 1_000_000;

/// 5 lamports spread over the full compute unit limit.
const BASE_MICRO_LAMPORTS_PER_CU: u64 = 5;

fn priority_fee_ixs(multiplier: u64) -> Vec<Instruction> {
    vec![
        ComputeBudgetInstruction::set_compute_unit_limit(COMPUTE_UNIT_LIMIT),
        ComputeBudgetInstruction::set_compute_unit_price(
            BASE_MICRO_LAMPORTS_PER_CU.saturating_mul(multiplier),
        ),
    ]
}

pub async fn process_claim(args: &Args, claim_args: &ClaimArgs) -> Result<()> {
    let keypair = args.read_keypair()?;
    let claimant = keypair.pubkey();
    info!("Claiming tokens for user {claimant}...");

    let api = HttpClaimApi::new(ClaimApiConfig::new(&claim_args.api_url))?;
    let response = get_user_claim_with_retry(&api, &claimant, &VerificationConfig::default()).await?;
    info!(
        "api allocation: {} from distributor {}",
        response.amount, response.merkle_tree
    );

    let client = args.distributor_client();
    let mut ixs = vec![];
    if claim_args.mode == ClaimMode::Execute {
        ixs.extend(priority_fee_ixs(claim_args.priority_fee_multiplier));
    }
    ixs.extend(
        client
            .build_claim(
                &response.merkle_tree,
                &claimant,
                response.amount,
                response.proof,
            )
            .await?,
    );

    let rpc = client.fetcher();
    let blockhash = rpc.get_latest_blockhash().await?;
    let tx = Transaction::new_signed_with_payer(&ixs, Some(&claimant), &[&keypair], blockhash);

    match claim_args.mode {
        ClaimMode::Execute => {
            info!("Sending.");
            let signature = rpc
                .send_and_confirm_transaction_with_spinner_and_config(
                    &tx,
                    CommitmentConfig::confirmed(),
                    RpcSendTransactionConfig {
                        skip_preflight: true,
                        ..RpcSendTransactionConfig::default()
                    },
                )
                .await?;
            println!("successfully claimed tokens with signature {signature}");
        }
        ClaimMode::Simulate => {
            let simulation = rpc.simulate_transaction(&tx).await?.value;
            for log in simulation.logs.unwrap_or_default() {
                println!("{log}");
            }
            if let Some(units) = simulation.units_consumed {
                println!("units consumed: {units}");
            }
            match simulation.err {
                Some(err) => bail!("simulation failed: {err:?}"),
                None => println!("simulation succeeded"),
            }
        }
    }

    Ok(())
}
