//! Service (repair) orders and their CRUD pages, including the completion
//! flow that records income and refreshes revenue targets.

mod complete;
mod create;
mod db;
mod delete;
mod edit;
mod list;

pub use complete::complete_service_endpoint;
pub use create::{create_service_endpoint, get_new_service_page};
pub use db::{
    Service, ServiceFormData, ServiceListEntry, ServiceStatus, complete_service, create_service,
    create_service_table, delete_service, get_all_services, get_service, update_service,
};
pub use delete::delete_service_endpoint;
pub use edit::{edit_service_endpoint, get_edit_service_page};
pub use list::get_services_page;
