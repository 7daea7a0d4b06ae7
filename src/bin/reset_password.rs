use std::{error::Error, io, path::PathBuf, process::exit};

use clap::Parser;
use rusqlite::Connection;

use penta_rs::{
    PasswordHash, User, ValidatedPassword, get_user_by_email, parse_email, update_password,
};

/// A utility for changing the password of a registered user.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long, env = "PENTA_DB_PATH")]
    db_path: PathBuf,

    /// The email the user signed up with.
    #[arg(long)]
    email: String,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    if !args.db_path.is_file() {
        print_error(format!("File does not exist at {:?}!", args.db_path));
        exit(1);
    }

    let connection = Connection::open(&args.db_path)?;
    let user = match find_user(&args.email, &connection) {
        Ok(user) => user,
        Err(error) => {
            print_error(error);
            exit(1);
        }
    };
    println!("Resetting password for {} <{}>", user.name, user.email);

    let Some(password_hash) = get_new_password_hash(&user) else {
        return Ok(());
    };

    update_password(user.id, &password_hash, &connection)?;
    println!("Password updated successfully!");

    Ok(())
}

fn find_user(raw_email: &str, connection: &Connection) -> Result<User, penta_rs::Error> {
    let email = parse_email(raw_email)?;

    get_user_by_email(&email, connection).map_err(|error| match error {
        penta_rs::Error::NotFound => penta_rs::Error::UserNotFound,
        error => error,
    })
}

fn get_new_password_hash(user: &User) -> Option<PasswordHash> {
    loop {
        println!();

        let first_password = prompt("Enter a new password: ")?;

        let user_inputs = [user.name.as_str(), user.email.as_str()];
        let password = match ValidatedPassword::new(&first_password, &user_inputs) {
            Ok(password) => password,
            Err(error) => {
                print_error(error);
                continue;
            }
        };

        let second_password = prompt("Enter the same password again: ")?;

        if first_password != second_password {
            print_error("Passwords must match, try again.");
            continue;
        }

        match PasswordHash::new(password, PasswordHash::DEFAULT_COST) {
            Ok(password_hash) => return Some(password_hash),
            Err(error) => {
                print_error(format!("Could not hash password: {error}. Try again."));
            }
        }
    }
}

/// Read a password without echoing it, or `None` if the user gave up.
fn prompt(message: &str) -> Option<String> {
    match rpassword::prompt_password(message) {
        Ok(password) => Some(password),
        Err(error) if error.kind() == io::ErrorKind::UnexpectedEof => None,
        Err(error) => {
            print_error(format!("Could not read password from stdin: {error}"));
            None
        }
    }
}

fn print_error(error: impl ToString) {
    eprintln!(
        "\x1b[31;1m{}\x1b[0m",
        capitalise_first_char(&error.to_string())
    )
}

fn capitalise_first_char(string: &str) -> String {
    let mut chars = string.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    first.to_uppercase().chain(chars).collect()
}
