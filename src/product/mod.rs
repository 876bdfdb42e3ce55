//! Product records and their CRUD pages.

mod create;
mod db;
mod delete;
mod edit;
mod list;

pub use create::{create_product_endpoint, get_new_product_page};
pub use db::{
    Product, ProductFormData, ProductName, create_product, create_product_table, decrement_stock,
    delete_product, get_all_products, get_product, update_product,
};
pub use delete::delete_product_endpoint;
pub use edit::{edit_product_endpoint, get_edit_product_page};
pub use list::get_products_page;
