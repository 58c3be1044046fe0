//! NNTP command builders and response parsers

pub mod article;
pub mod group;
pub mod list;
pub mod over;
pub mod response;

pub use article::*;
pub use group::*;
pub use list::*;
pub use over::*;
pub use response::*;

/// Build AUTHINFO USER command
pub fn authinfo_user(username: &str) -> String {
    format!("AUTHINFO USER {}\r\n", username)
}

/// Build AUTHINFO PASS command
pub fn authinfo_pass(password: &str) -> String {
    format!("AUTHINFO PASS {}\r\n", password)
}

/// Build POST command (RFC 3977 §6.3.1)
///
/// The server answers 340 when it will accept the article, which is then
/// sent dot-stuffed and terminated by ".\r\n".
pub fn post() -> &'static str {
    "POST\r\n"
}

/// Build QUIT command
pub fn quit() -> &'static str {
    "QUIT\r\n"
}

/// Command line as it may be logged: passwords are masked
pub fn redact(command: &str) -> String {
    let trimmed = command.trim_end();
    if trimmed
        .get(..13)
        .is_some_and(|p| p.eq_ignore_ascii_case("AUTHINFO PASS"))
    {
        "AUTHINFO PASS ****".to_string()
    } else {
        trimmed.to_string()
    }
}
