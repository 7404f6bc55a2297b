//! Keyboard-style intent parsing for stdin and scripted sessions.

use crawl_core::Direction;
use thiserror::Error;

/// One accepted input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Input {
    /// Directional intent for the player.
    Intent(Direction),
    /// End the session.
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unrecognised input `{0}`")]
pub(crate) struct UnknownInput(String);

fn parse_word(word: &str) -> Option<Input> {
    let input = match word.to_ascii_lowercase().as_str() {
        "h" | "a" | "left" => Input::Intent(Direction::Left),
        "l" | "d" | "right" => Input::Intent(Direction::Right),
        "k" | "w" | "up" => Input::Intent(Direction::Up),
        "j" | "s" | "down" => Input::Intent(Direction::Down),
        "q" | "quit" => Input::Quit,
        _ => return None,
    };
    Some(input)
}

/// Parses a line or script. Tokens are separated by whitespace or commas;
/// a token that is not a known word is read as a run of single-key inputs,
/// so `lljk` is four intents.
pub(crate) fn parse_inputs(text: &str) -> Result<Vec<Input>, UnknownInput> {
    let mut inputs = Vec::new();
    for token in text
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|token| !token.is_empty())
    {
        if let Some(input) = parse_word(token) {
            inputs.push(input);
            continue;
        }
        for key in token.chars() {
            let mut buffer = [0; 4];
            let key = key.encode_utf8(&mut buffer);
            inputs.push(parse_word(key).ok_or_else(|| UnknownInput(token.to_owned()))?);
        }
    }
    Ok(inputs)
}
