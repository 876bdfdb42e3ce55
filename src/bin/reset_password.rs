//! A maintenance tool for resetting the admin password from the command line.
//!
//! Useful when the password has been forgotten, since the web app has no way
//! to recover it.

use clap::Parser;
use rusqlite::Connection;

use motodesk::{
    Error, PasswordHash, UserID, ValidatedPassword, count_users, create_user, initialize_db,
    set_user_password,
};

/// Reset the admin password for a Motodesk database.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long)]
    db_path: String,
}

fn main() {
    let args = Args::parse();

    let connection = Connection::open(&args.db_path).expect("Could not open database file.");
    initialize_db(&connection).expect("Could not initialize the database.");

    let password_hash = loop {
        let password = rpassword::prompt_password("New password: ")
            .expect("Could not read password from stdin.");
        let confirmation = rpassword::prompt_password("Confirm new password: ")
            .expect("Could not read password from stdin.");

        if password != confirmation {
            eprintln!("Passwords do not match, try again.");
            continue;
        }

        let validated_password = match ValidatedPassword::new(&password) {
            Ok(validated_password) => validated_password,
            Err(Error::TooWeak(feedback)) => {
                eprintln!("Password is too weak: {feedback}");
                continue;
            }
            Err(error) => panic!("Could not validate password: {error}"),
        };

        break PasswordHash::new(validated_password, PasswordHash::DEFAULT_COST)
            .expect("Could not hash password.");
    };

    let user_count = count_users(&connection).expect("Could not read the user table.");

    if user_count == 0 {
        create_user(password_hash, &connection).expect("Could not create the admin user.");
        println!("Admin user created.");
    } else {
        set_user_password(UserID::new(1), password_hash, &connection)
            .expect("Could not update the admin password.");
        println!("Admin password updated.");
    }
}
