use serde::Deserialize;

use crate::error::{AppResult, ValidationErrors};

pub const REQUIRED: &str = "Обязательное поле.";
pub const USERNAME_TAKEN: &str = "Пользователь с таким логином уже существует!";
pub const EMAIL_TAKEN: &str = "Пользователь с такой почтой уже существует!";

pub const USERNAME_MAX: usize = 150;
pub const EMAIL_MAX: usize = 254;
pub const NAME_MAX: usize = 150;

#[derive(Debug, Default, Deserialize)]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub password: Option<String>,
}

/// A registration payload that passed field validation. Uniqueness is
/// checked against the database separately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
}

fn required(
    errors: &mut ValidationErrors,
    field: &str,
    value: &Option<String>,
    max_len: usize,
) -> String {
    let value = value.as_deref().map(str::trim).unwrap_or_default();
    if value.is_empty() {
        errors.add(field, REQUIRED);
    } else if value.chars().count() > max_len {
        errors.add(
            field,
            format!("Убедитесь, что это значение содержит не более {} символов.", max_len),
        );
    }
    value.to_string()
}

/// Usernames follow the `^[\w.@+-]+$` shape.
pub fn is_valid_username(username: &str) -> bool {
    !username.is_empty()
        && username
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '_' | '.' | '@' | '+' | '-'))
}

/// `local@domain` where the domain has at least two non-empty dot-separated labels.
pub fn is_valid_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && domain.split('.').all(|label| !label.is_empty())
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    }
}

pub fn validate_registration(req: &RegisterRequest) -> AppResult<NewUser> {
    let mut errors = ValidationErrors::new();

    let email = required(&mut errors, "email", &req.email, EMAIL_MAX);
    if !email.is_empty() && !is_valid_email(&email) {
        errors.add("email", "Введите правильный адрес электронной почты.");
    }

    let username = required(&mut errors, "username", &req.username, USERNAME_MAX);
    if !username.is_empty() && !is_valid_username(&username) {
        errors.add(
            "username",
            "Логин может содержать только буквы, цифры и символы @/./+/-/_.",
        );
    }

    let first_name = required(&mut errors, "first_name", &req.first_name, NAME_MAX);
    let last_name = required(&mut errors, "last_name", &req.last_name, NAME_MAX);

    let password = req.password.clone().unwrap_or_default();
    if password.is_empty() {
        errors.add("password", REQUIRED);
    }

    errors.into_result()?;

    Ok(NewUser {
        email,
        username,
        first_name,
        last_name,
        password,
    })
}
