use crate::*;

pub async fn process_get_user_claimed(
    args: &Args,
    user_claimed_args: &GetUserClaimedArgs,
) -> Result<()> {
    let client = args.distributor_client();
    let claimed = client
        .has_claimed(
            &user_claimed_args.user_address,
            &user_claimed_args.distributor_address,
        )
        .await?;

    println!("{claimed}");
    Ok(())
}
