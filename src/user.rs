//! Code for creating the user table and reading and writing user accounts.

use std::{fmt::Display, str::FromStr};

use email_address::EmailAddress;
use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};

use crate::{Error, PasswordHash};

/// A newtype wrapper for integer user IDs.
///
/// This is also the `id` claim of the tokens issued at log-in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct UserID(i64);

impl UserID {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for UserID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A registered user of the dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: UserID,
    /// The display name given at sign-up.
    pub name: String,
    /// Unique across all users.
    pub email: EmailAddress,
    pub password_hash: PasswordHash,
}

/// Parse `raw_email`, rejecting anything that is not a valid address.
///
/// # Errors
/// Returns [Error::InvalidEmail] with the original text.
pub fn parse_email(raw_email: &str) -> Result<EmailAddress, Error> {
    EmailAddress::from_str(raw_email.trim()).map_err(|_| Error::InvalidEmail(raw_email.to_owned()))
}

/// Create the user table.
///
/// # Errors
///
/// This function will return an error if the SQL query failed.
pub fn create_user_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS user (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                email TEXT UNIQUE NOT NULL,
                password TEXT NOT NULL
                )",
        (),
    )?;

    Ok(())
}

/// Insert a new user into the database.
///
/// # Errors
///
/// This function will return an error if:
/// - `name` is empty or only whitespace,
/// - `email` is already registered, [Error::DuplicateEmail],
/// - there was an unexpected SQL error.
pub fn create_user(
    name: &str,
    email: EmailAddress,
    password_hash: PasswordHash,
    connection: &Connection,
) -> Result<User, Error> {
    let name = name.trim();

    if name.is_empty() {
        return Err(Error::EmptyName);
    }

    connection.execute(
        "INSERT INTO user (name, email, password) VALUES (?1, ?2, ?3)",
        (name, email.as_str(), password_hash.as_str()),
    )?;

    Ok(User {
        id: UserID::new(connection.last_insert_rowid()),
        name: name.to_owned(),
        email,
        password_hash,
    })
}

/// Get the user registered with `email`.
///
/// # Errors
///
/// This function will return an error if:
/// - `email` does not belong to a registered user, [Error::NotFound],
/// - there was an unexpected SQL error.
pub fn get_user_by_email(email: &EmailAddress, connection: &Connection) -> Result<User, Error> {
    connection
        .prepare("SELECT id, name, email, password FROM user WHERE email = :email")?
        .query_row(&[(":email", email.as_str())], map_user_row)
        .map_err(|error| error.into())
}

/// Replace the password hash of the user with `user_id`.
///
/// # Errors
///
/// Returns [Error::NotFound] if no user has the ID, or [Error::SqlError] if an
/// SQL related error occurred.
pub fn update_password(
    user_id: UserID,
    password_hash: &PasswordHash,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE user SET password = ?1 WHERE id = ?2",
        (password_hash.as_str(), user_id.as_i64()),
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

/// Get the number of users in the database.
///
/// # Errors
///
/// Returns a [Error::SqlError] if an SQL related error occurred.
pub fn count_users(connection: &Connection) -> Result<usize, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM user;", [], |row| row.get(0))
        .map_err(|error| error.into())
}

fn map_user_row(row: &Row) -> Result<User, rusqlite::Error> {
    let raw_email: String = row.get(2)?;
    let email = EmailAddress::from_str(&raw_email).map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Text, Box::new(error))
    })?;

    Ok(User {
        id: UserID::new(row.get(0)?),
        name: row.get(1)?,
        email,
        password_hash: PasswordHash::from_hash(row.get(3)?),
    })
}

#[cfg(test)]
mod user_tests {
    use rusqlite::Connection;

    use crate::{Error, PasswordHash};

    use super::{
        UserID, count_users, create_user, create_user_table, get_user_by_email, parse_email,
        update_password,
    };

    fn get_db_connection() -> Connection {
        let conn =
            Connection::open_in_memory().expect("Could not create in-memory SQLite database");
        create_user_table(&conn).expect("Could not create user table");

        conn
    }

    fn hash(raw: &str) -> PasswordHash {
        PasswordHash::from_hash(raw.to_owned())
    }

    #[test]
    fn parse_email_rejects_invalid_address() {
        assert_eq!(
            parse_email("not-an-email"),
            Err(Error::InvalidEmail("not-an-email".to_owned()))
        );
        assert!(parse_email("jane@example.com").is_ok());
    }

    #[test]
    fn create_user_succeeds() {
        let db_connection = get_db_connection();
        let email = parse_email("jane@example.com").unwrap();

        let user = create_user(" Jane ", email.clone(), hash("hunter2"), &db_connection).unwrap();

        assert!(user.id.as_i64() > 0);
        assert_eq!(user.name, "Jane");
        assert_eq!(user.email, email);
    }

    #[test]
    fn create_user_rejects_empty_name() {
        let db_connection = get_db_connection();
        let email = parse_email("jane@example.com").unwrap();

        let result = create_user("   ", email, hash("hunter2"), &db_connection);

        assert_eq!(result, Err(Error::EmptyName));
        assert_eq!(count_users(&db_connection).unwrap(), 0);
    }

    #[test]
    fn create_user_rejects_duplicate_email() {
        let db_connection = get_db_connection();
        let email = parse_email("jane@example.com").unwrap();
        create_user("Jane", email.clone(), hash("hunter2"), &db_connection).unwrap();

        let result = create_user("Janet", email, hash("hunter3"), &db_connection);

        assert_eq!(result, Err(Error::DuplicateEmail));
    }

    #[test]
    fn get_user_by_email_returns_inserted_user() {
        let db_connection = get_db_connection();
        let email = parse_email("jane@example.com").unwrap();
        let inserted = create_user("Jane", email.clone(), hash("hunter2"), &db_connection).unwrap();

        let retrieved = get_user_by_email(&email, &db_connection).unwrap();

        assert_eq!(retrieved, inserted);
    }

    #[test]
    fn get_user_by_email_fails_for_unknown_email() {
        let db_connection = get_db_connection();
        let email = parse_email("nobody@example.com").unwrap();

        assert_eq!(
            get_user_by_email(&email, &db_connection),
            Err(Error::NotFound)
        );
    }

    #[test]
    fn update_password_replaces_hash() {
        let db_connection = get_db_connection();
        let email = parse_email("jane@example.com").unwrap();
        let user = create_user("Jane", email.clone(), hash("hunter2"), &db_connection).unwrap();

        update_password(user.id, &hash("hunter3"), &db_connection).unwrap();

        let retrieved = get_user_by_email(&email, &db_connection).unwrap();
        assert_eq!(retrieved.password_hash, hash("hunter3"));
    }

    #[test]
    fn update_password_fails_for_unknown_user() {
        let db_connection = get_db_connection();

        let result = update_password(UserID::new(42), &hash("hunter3"), &db_connection);

        assert_eq!(result, Err(Error::NotFound));
    }

    #[test]
    fn returns_correct_count() {
        let db_connection = get_db_connection();

        let count = count_users(&db_connection).expect("Could not get user count");
        assert_eq!(0, count, "Want zero users before insertion, got {count}");

        let email = parse_email("jane@example.com").unwrap();
        create_user("Jane", email, hash("hunter2"), &db_connection).unwrap();

        let count = count_users(&db_connection).expect("Could not get user count");
        assert_eq!(1, count, "Want one user after insertion, got {count}");
    }
}
