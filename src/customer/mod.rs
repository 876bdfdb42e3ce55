//! Customer records and their CRUD pages.

mod create;
mod db;
mod delete;
mod edit;
mod list;

pub use create::{create_customer_endpoint, get_new_customer_page};
pub use db::{
    Customer, CustomerFormData, CustomerName, create_customer, create_customer_table,
    delete_customer, get_all_customers, get_customer, update_customer,
};
pub use delete::delete_customer_endpoint;
pub use edit::{edit_customer_endpoint, get_edit_customer_page};
pub use list::get_customers_page;
