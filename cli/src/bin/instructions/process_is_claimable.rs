use crate::*;

pub async fn process_is_claimable(args: &Args, is_claimable_args: &IsClaimableArgs) -> Result<()> {
    let client = args.distributor_client();
    let slot = match is_claimable_args.slot {
        Some(slot) => slot,
        None => client.fetcher().get_slot().await?,
    };

    let claimable = client
        .is_claimable(&is_claimable_args.distributor_address, slot)
        .await?;

    println!("{claimable}");
    Ok(())
}
