//! Revenue targets: recurring goals tracked against the income and sale
//! transactions inside the current period window.

mod create;
mod db;
mod delete;
mod edit;
mod list;
pub mod period;
pub mod progress;

pub use create::{create_target_endpoint, get_new_target_page};
pub use db::{
    Target, TargetFormData, TargetStatus, TargetTitle, create_target, create_target_table,
    delete_target, get_all_targets, get_target, update_target,
};
pub(crate) use db::persist_progress;
pub use delete::delete_target_endpoint;
pub use edit::{edit_target_endpoint, get_edit_target_page};
pub use list::get_targets_page;
pub use period::{Period, PeriodWindow, period_window};
pub use progress::{TargetRefresh, derive_status, refresh_all_targets, refresh_target};
