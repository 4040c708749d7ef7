//! Tests for reading decks from local files.

#![cfg(feature = "files")]

use std::io::Write;

use drillkit_engine::{Deck, Difficulty, Error};

fn write_temp(suffix: &str, content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_toml_deck() {
    let file = write_temp(
        ".toml",
        r#"
[[cards]]
id = 1
term = "Hola"
gloss = "Hello"
usage = "¡Hola! ¿Cómo estás?"
difficulty = "easy"

[[cards]]
id = 2
term = "Mucho gusto"
gloss = "Nice to meet you"
usage = "Mucho gusto, me llamo Ana."
known = true
"#,
    );

    let deck = Deck::from_path(file.path()).unwrap();
    assert_eq!(deck.len(), 2);
    assert_eq!(deck.get(1).unwrap().tier(), Difficulty::Easy);
    assert!(deck.get(2).unwrap().is_known());
    assert_eq!(deck.active_subset().keys(), vec![1]);
}

#[test]
fn test_json_deck() {
    let file = write_temp(
        ".json",
        r#"[{"row_number": 5, "spanish": "Adiós", "english": "Goodbye", "usage": "Adiós, amigo."}]"#,
    );

    let deck = Deck::from_path(file.path()).unwrap();
    assert_eq!(deck.keys(), vec![5]);
}

#[test]
fn test_unsupported_extension() {
    let file = write_temp(".csv", "1,Hola,Hello");
    assert!(matches!(
        Deck::from_path(file.path()),
        Err(Error::UnsupportedFormat(_))
    ));
}

#[test]
fn test_missing_file() {
    assert!(matches!(
        Deck::from_path("/nonexistent/deck.toml"),
        Err(Error::Io(_))
    ));
}

#[test]
fn test_invalid_toml() {
    let file = write_temp(".toml", "[[cards]\nid = ");
    assert!(matches!(
        Deck::from_path(file.path()),
        Err(Error::TomlParse(_))
    ));
}
