pub mod process_check_api_returns_all_keys;
pub mod process_check_user_claim_status;
pub mod process_claim;
pub mod process_get_all_distributors_stats;
pub mod process_get_distributor_stats;
pub mod process_get_user_claimed;
pub mod process_is_claimable;

pub use process_check_api_returns_all_keys::*;
pub use process_check_user_claim_status::*;
pub use process_claim::*;
pub use process_get_all_distributors_stats::*;
pub use process_get_distributor_stats::*;
pub use process_get_user_claimed::*;
pub use process_is_claimable::*;
