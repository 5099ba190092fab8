use crate::*;

pub async fn process_get_all_distributors_stats(
    args: &Args,
    stats_args: &GetAllDistributorsStatsArgs,
) -> Result<()> {
    let distributors = read_pubkeys_file(&stats_args.distributors_file)?;
    info!("fetching stats for {} distributors", distributors.len());

    let client = args.distributor_client();
    let stats = client.stats_for_many(&distributors).await?;

    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}
