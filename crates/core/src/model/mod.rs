//! The genders data model: nodes, attrval-groups, and the loaded
//! database that indexes them.

mod database;
mod group;
mod node;

pub use database::Database;
pub use group::{AttrVal, Group, GroupId};
pub use node::{Node, MAX_HOSTNAME_LEN};
