use crate::*;

pub async fn process_get_distributor_stats(
    args: &Args,
    stats_args: &GetDistributorStatsArgs,
) -> Result<()> {
    let client = args.distributor_client();
    let stats = client.stats_for(&stats_args.distributor_address).await?;

    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}
