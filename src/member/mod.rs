//! Member roster management.

mod add_endpoint;
pub(crate) mod core;
mod list_endpoint;
mod remove_endpoint;
mod stats_endpoint;

pub use add_endpoint::add_member_endpoint;
pub use core::{
    Member, MemberId, Role, count_members, create_member, create_member_table, delete_member,
    get_all_members, get_member, member_directory,
};
pub use list_endpoint::{get_member_endpoint, list_members_endpoint};
pub use remove_endpoint::remove_member_endpoint;
pub use stats_endpoint::stats_endpoint;
