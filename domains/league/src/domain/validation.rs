//! Validation helpers for league input

use matchday_common::{Error, Result};
use regex::Regex;

/// Maximum length of team and player names
pub const MAX_NAME_LENGTH: usize = 100;

lazy_static::lazy_static! {
    /// Kit color: a hex code (#RGB or #RRGGBB) or a plain color name
    /// such as "Red" or "Sky Blue"
    pub static ref COLOR_REGEX: Regex =
        Regex::new(r"^(#[0-9A-Fa-f]{3}|#[0-9A-Fa-f]{6}|[A-Za-z]+( [A-Za-z]+)*)$").unwrap();
}

fn validate_name(kind: &str, name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::Validation(format!("{} name cannot be empty", kind)));
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(Error::Validation(format!(
            "{} name cannot exceed {} characters",
            kind, MAX_NAME_LENGTH
        )));
    }
    Ok(())
}

pub fn validate_team_name(name: &str) -> Result<()> {
    validate_name("Team", name)
}

pub fn validate_player_name(name: &str) -> Result<()> {
    validate_name("Player", name)
}

/// Validate a kit color
pub fn validate_color(color: &str) -> Result<()> {
    if color.len() > 30 || !COLOR_REGEX.is_match(color) {
        return Err(Error::Validation(format!("Invalid color: {}", color)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_regex() {
        // Valid colors
        assert!(validate_color("Red").is_ok());
        assert!(validate_color("Sky Blue").is_ok());
        assert!(validate_color("#fff").is_ok());
        assert!(validate_color("#00FF7f").is_ok());

        // Invalid colors
        assert!(validate_color("").is_err());
        assert!(validate_color("#ggg").is_err());
        assert!(validate_color("#12345").is_err());
        assert!(validate_color(" Red").is_err());
        assert!(validate_color("Red  Blue").is_err());
        assert!(validate_color("red;drop").is_err());
        assert!(validate_color(&"a".repeat(31)).is_err());
    }

    #[test]
    fn test_names() {
        assert!(validate_team_name("Reds").is_ok());
        assert!(validate_team_name("   ").is_err());
        assert!(validate_player_name(&"x".repeat(MAX_NAME_LENGTH)).is_ok());
        assert!(validate_player_name(&"x".repeat(MAX_NAME_LENGTH + 1)).is_err());
    }
}
