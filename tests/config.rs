use std::collections::HashMap;

use gemini_check::config::{
    API_BASE_VAR, API_KEY_VAR, CANDIDATES_VAR, Config, Credential, DEFAULT_CANDIDATES,
};
use gemini_check::v1beta::API_BASE;

fn config_from(vars: &[(&str, &str)]) -> Config {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    Config::from_lookup(|key| vars.get(key).cloned())
}

#[test]
fn redacts_long_keys() {
    for key in ["abcdefgh", "AIzaSyD-1234567890abcdefXYZ", "ključ-tajna-vrijednost"] {
        let credential = Credential::new(key).unwrap();
        let chars: Vec<char> = key.chars().collect();
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        let middle: String = chars[4..chars.len() - 4].iter().collect();

        let redacted = credential.redacted();
        assert_eq!(redacted, format!("{head}...{tail}"));
        if !middle.is_empty() {
            assert!(!redacted.contains(&middle));
        }
    }
}

#[test]
fn short_keys_reveal_nothing() {
    let credential = Credential::new("abc1234").unwrap();
    assert_eq!(credential.redacted(), "...");
}

#[test]
fn formatting_never_shows_full_key() {
    let credential = Credential::new("AIzaSyD-secret-middle-part-0000").unwrap();
    assert_eq!(format!("{credential}"), "AIza...0000");
    assert!(!format!("{credential:?}").contains("secret"));
    assert_eq!(credential.expose(), "AIzaSyD-secret-middle-part-0000");
}

#[test]
fn empty_or_blank_key_is_missing() {
    assert!(Credential::new("").is_none());
    assert!(Credential::new("   \n").is_none());
    assert!(config_from(&[]).api_key.is_none());
    assert!(config_from(&[(API_KEY_VAR, "")]).api_key.is_none());
}

#[test]
fn key_is_trimmed() {
    let config = config_from(&[(API_KEY_VAR, "  my-api-key-value \n")]);
    assert_eq!(config.api_key.unwrap().expose(), "my-api-key-value");
}

#[test]
fn defaults_apply() {
    let config = config_from(&[(API_KEY_VAR, "my-api-key-value")]);
    assert_eq!(config.api_base, API_BASE);
    assert_eq!(config.candidates, DEFAULT_CANDIDATES);
}

#[test]
fn overrides_apply() {
    let config = config_from(&[
        (API_BASE_VAR, "http://localhost:8080/v1beta/"),
        (CANDIDATES_VAR, " gemini-2.0-flash, ,gemini-1.5-pro "),
    ]);
    assert_eq!(config.api_base, "http://localhost:8080/v1beta");
    assert_eq!(config.candidates, ["gemini-2.0-flash", "gemini-1.5-pro"]);
}

#[test]
fn blank_candidate_list_falls_back() {
    let config = config_from(&[(CANDIDATES_VAR, " , ")]);
    assert_eq!(config.candidates, DEFAULT_CANDIDATES);
}
