//! Receivables: money customers owe the shop, settled into income
//! transactions that refresh revenue targets.

mod create;
mod db;
mod delete;
mod list;
mod settle;

pub use create::{create_receivable_endpoint, get_new_receivable_page};
pub use db::{
    Receivable, ReceivableFormData, ReceivableListEntry, ReceivableStatus, create_receivable,
    create_receivable_table, delete_receivable, get_all_receivables, get_receivable,
    settle_receivable,
};
pub use delete::delete_receivable_endpoint;
pub use list::get_receivables_page;
pub use settle::settle_receivable_endpoint;
