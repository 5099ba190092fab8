use crate::*;

pub async fn process_check_api_returns_all_keys(verify_args: &CheckApiReturnsAllKeysArgs) -> Result<()> {
    let entries = AllocationEntry::load_csv(&verify_args.csv_path, verify_args.decimals_in_csv)?;
    info!("loaded {} allocations from csv", entries.len());

    let proof_store = verify_args
        .merkle_tree_path
        .as_deref()
        .map(ProofStore::load_dir)
        .transpose()?;

    let api = HttpClaimApi::new(ClaimApiConfig::new(&verify_args.api_url))?;
    let mut engine = VerificationEngine::new(api, VerificationConfig::default());
    if let Some(proof_store) = &proof_store {
        engine = engine.with_proof_store(proof_store);
    }

    let report = engine.run(&entries).await?;

    if proof_store.is_some() {
        println!(
            "Verification successfully completed! API data for {} users fully matches CSV and merkle tree data.",
            report.addresses_checked
        );
    } else {
        println!(
            "Verification successfully completed! API data for {} users fully matches CSV data.",
            report.addresses_checked
        );
    }
    Ok(())
}
