use crate::*;

pub async fn process_check_user_claim_status(
    args: &Args,
    claim_status_args: &CheckUserClaimStatusArgs,
) -> Result<()> {
    let users = match (
        &claim_status_args.user_address_file,
        &claim_status_args.user_address,
    ) {
        (Some(path), None) => read_pubkeys_file(path)?,
        (None, Some(user)) => vec![*user],
        _ => bail!("exactly one of --user-address or --user-address-file is required"),
    };

    let api = HttpClaimApi::new(ClaimApiConfig::new(&claim_status_args.api_url_base))?;
    let client = args.distributor_client();
    let retry_config = VerificationConfig::default();

    for user in users {
        let response = get_user_claim_with_retry(&api, &user, &retry_config).await?;
        let claimed = client.has_claimed(&user, &response.merkle_tree).await?;

        if claimed {
            println!(
                "User {user} has already claimed their allocation: {}",
                response.amount
            );
        } else {
            println!(
                "User {user} has not claimed their allocation: {}",
                response.amount
            );
        }
    }

    Ok(())
}
