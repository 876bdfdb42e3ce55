//! Financial transactions: the income, expense and sale events that drive
//! revenue target progress.

mod create;
mod db;
mod delete;
mod list;

pub use create::{
    CreateTransactionEndpointState, TransactionFormData, create_transaction_endpoint,
    get_new_transaction_page,
};
pub use db::{
    NewTransaction, Transaction, TransactionKind, count_transactions, create_transaction,
    create_transaction_table, delete_transaction, get_transaction, get_transactions_page,
    sum_revenue_between,
};
pub use delete::delete_transaction_endpoint;
pub use list::get_transactions_list_page;
