//! Morse signalling through the brick speaker

use crate::config::MorseConfig;
use crate::drivers::ToneDevice;
use crate::error::Result;
use std::thread;

/// One Morse element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Symbol {
    Dot,
    Dash,
}

impl Symbol {
    /// Length in dot units
    pub fn units(&self) -> u32 {
        match self {
            Self::Dot => 1,
            Self::Dash => 3,
        }
    }
}

/// Symbols of one character
pub type Letter = Vec<Symbol>;

/// Letters of one word
pub type Word = Vec<Letter>;

const GAP_SYMBOL: u32 = 1;
const GAP_LETTER: u32 = 3;
const GAP_WORD: u32 = 7;

fn code(c: char) -> Option<&'static str> {
    let code = match c.to_ascii_uppercase() {
        'A' => ".-",
        'B' => "-...",
        'C' => "-.-.",
        'D' => "-..",
        'E' => ".",
        'F' => "..-.",
        'G' => "--.",
        'H' => "....",
        'I' => "..",
        'J' => ".---",
        'K' => "-.-",
        'L' => ".-..",
        'M' => "--",
        'N' => "-.",
        'O' => "---",
        'P' => ".--.",
        'Q' => "--.-",
        'R' => ".-.",
        'S' => "...",
        'T' => "-",
        'U' => "..-",
        'V' => "...-",
        'W' => ".--",
        'X' => "-..-",
        'Y' => "-.--",
        'Z' => "--..",
        '0' => "-----",
        '1' => ".----",
        '2' => "..---",
        '3' => "...--",
        '4' => "....-",
        '5' => ".....",
        '6' => "-....",
        '7' => "--...",
        '8' => "---..",
        '9' => "----.",
        '.' => ".-.-.-",
        ',' => "--..--",
        '?' => "..--..",
        '!' => "-.-.--",
        '/' => "-..-.",
        '=' => "-...-",
        '+' => ".-.-.",
        '-' => "-....-",
        '@' => ".--.-.",
        _ => return None,
    };
    Some(code)
}

/// Encode a character, `None` when it has no Morse code
pub fn encode_char(c: char) -> Option<Letter> {
    code(c).map(|s| {
        s.chars()
            .map(|m| if m == '-' { Symbol::Dash } else { Symbol::Dot })
            .collect()
    })
}

/// Encode text into words of letters. Unknown characters are skipped.
pub fn encode(text: &str) -> Vec<Word> {
    text.split_whitespace()
        .map(|word| {
            word.chars()
                .filter_map(|c| {
                    let letter = encode_char(c);
                    if letter.is_none() {
                        log::warn!("Morse: no code for {:?}, skipping", c);
                    }
                    letter
                })
                .collect::<Word>()
        })
        .filter(|word| !word.is_empty())
        .collect()
}

/// Dot/dash rendering, letters separated by spaces and words by " / "
pub fn to_pattern(text: &str) -> String {
    encode(text)
        .iter()
        .map(|word| {
            word.iter()
                .map(|letter| {
                    letter
                        .iter()
                        .map(|s| if *s == Symbol::Dash { '-' } else { '.' })
                        .collect::<String>()
                })
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join(" / ")
}

/// Play `message` as tone pulses, blocking until done
pub fn play<T: ToneDevice + ?Sized>(tone: &T, message: &str, config: &MorseConfig) -> Result<()> {
    log::debug!("Playing message: {}", message);
    log::trace!("Morse repr: {}", to_pattern(message));

    let unit = config.unit();
    for (w, word) in encode(message).iter().enumerate() {
        if w > 0 {
            thread::sleep(unit * GAP_WORD);
        }
        for (l, letter) in word.iter().enumerate() {
            if l > 0 {
                thread::sleep(unit * GAP_LETTER);
            }
            for (s, symbol) in letter.iter().enumerate() {
                if s > 0 {
                    thread::sleep(unit * GAP_SYMBOL);
                }
                tone.play_tone_and_wait(config.frequency_hz, unit * symbol.units())?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sos() {
        assert_eq!(to_pattern("SOS"), "... --- ...");
        assert_eq!(to_pattern("sos"), "... --- ...");
    }

    #[test]
    fn test_words_and_unknown_chars() {
        assert_eq!(to_pattern("hi  there"), ".... .. / - .... . .-. .");
        assert_eq!(to_pattern("a#b"), ".- -...");
        assert!(encode("### ~~").is_empty());
    }

    #[test]
    fn test_encode_char() {
        assert_eq!(
            encode_char('k'),
            Some(vec![Symbol::Dash, Symbol::Dot, Symbol::Dash])
        );
        assert_eq!(encode_char('%'), None);
    }
}
