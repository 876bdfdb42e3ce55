//! Creates a database pre-populated with demo data for manual testing.

use clap::Parser;
use rusqlite::{Connection, params};
use time::{Duration, OffsetDateTime};

use motodesk::initialize_db;

/// Create a Motodesk database with demo data.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path for the new SQLite database.
    #[arg(long, default_value = "demo.db")]
    db_path: String,
}

fn main() {
    let args = Args::parse();

    let connection = Connection::open(&args.db_path).expect("Could not open database file.");
    initialize_db(&connection).expect("Could not initialize the database.");

    let today = OffsetDateTime::now_utc().date();

    connection
        .execute_batch(
            "INSERT INTO customer (name, phone, email, address, notes) VALUES
                ('Mere Brown', '0211234567', 'mere@example.com', '12 Harbour St', ''),
                ('Hemi Grey', '0217654321', '', '', 'Fleet customer'),
                ('Ava Clarke', '0221112223', 'ava@example.com', '', '');

            INSERT INTO product (name, barcode, price, stock) VALUES
                ('Brake pads', '9400100001', 39.99, 14),
                ('Drive belt', '9400100002', 64.50, 6),
                ('Helmet', '9400100003', 125.00, 9),
                ('Front tyre', '9400100004', 89.00, 4);",
        )
        .expect("Could not insert demo customers and products.");

    connection
        .execute(
            "INSERT INTO service (customer_id, vehicle, problem, cost, status, opened_on) \
            VALUES (1, 'Vespa GTS 300', 'Brakes squealing', 180.0, 'pending', ?1), \
                   (2, 'Honda PCX 125', 'Will not start', 260.0, 'in_progress', ?1)",
            params![today - Duration::days(2)],
        )
        .expect("Could not insert demo services.");

    connection
        .execute(
            "INSERT INTO \"transaction\" (kind, amount, date, description, customer_id) VALUES \
                ('sale', 125.0, ?1, 'Helmet', 3), \
                ('income', 180.0, ?2, 'Service: Vespa GTS 300', 1), \
                ('expense', 420.0, ?3, 'Parts order', NULL)",
            params![
                today,
                today - Duration::days(1),
                today - Duration::days(3)
            ],
        )
        .expect("Could not insert demo transactions.");

    connection
        .execute(
            "INSERT INTO receivable (customer_id, amount, due_on, status, notes) \
            VALUES (2, 260.0, ?1, 'outstanding', 'Fleet repair, invoice sent')",
            params![today + Duration::days(14)],
        )
        .expect("Could not insert demo receivables.");

    connection
        .execute(
            "INSERT INTO target \
            (title, target_amount, current_amount, period, start_date, end_date, status, description, updated_at) \
            VALUES ('Monthly revenue', 5000.0, 0, 'monthly', ?1, ?1, 'active', 'Keep the lights on', ?1), \
                   ('Daily takings', 400.0, 0, 'daily', ?1, ?1, 'active', '', ?1)",
            params![today],
        )
        .expect("Could not insert demo targets.");

    println!(
        "Created demo database at {} - remember to set a password with reset_password.",
        args.db_path
    );
}
