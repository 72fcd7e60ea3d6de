// Stop-word sets.
//
// The language list comes from the `stop-words` crate. On top of it sits a
// fixed set of filler words that dominate chatbot-style survey prompts
// ("hola", "dame", "ejemplo", ...) and carry no topical signal.

use std::collections::HashSet;

use anyhow::Result;
use stop_words::{get, LANGUAGE};

/// Prompt filler that shows up in nearly every response.
pub const CUSTOM_STOP_WORDS: &[&str] = &[
    "hola", "cuales", "a", "b", "c", "d", "dos", "hacer", "siguientes", "opciones", "puedes",
    "dame", "puede", "si", "test", "ejemplo", "ejemplos",
];

/// Resolve a language name to the `stop-words` list.
fn language(name: &str) -> Result<LANGUAGE> {
    Ok(match name.trim().to_lowercase().as_str() {
        "spanish" | "es" => LANGUAGE::Spanish,
        "english" | "en" => LANGUAGE::English,
        "portuguese" | "pt" => LANGUAGE::Portuguese,
        "french" | "fr" => LANGUAGE::French,
        "german" | "de" => LANGUAGE::German,
        "italian" | "it" => LANGUAGE::Italian,
        other => anyhow::bail!(
            "Unsupported stop-word language '{other}'. \
             Use spanish, english, portuguese, french, german or italian."
        ),
    })
}

/// Build the full stop set: language list + custom filler + caller extras.
pub fn build_stop_words(language_name: &str, extra: &[String]) -> Result<HashSet<String>> {
    let mut stop: HashSet<String> = get(language(language_name)?)
        .into_iter()
        .map(|w| w.to_lowercase())
        .collect();
    stop.extend(CUSTOM_STOP_WORDS.iter().map(|w| w.to_string()));
    stop.extend(extra.iter().map(|w| w.to_lowercase()));
    Ok(stop)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spanish_set_contains_language_and_custom_words() {
        let stop = build_stop_words("spanish", &[]).unwrap();
        assert!(stop.contains("de"));
        assert!(stop.contains("que"));
        assert!(stop.contains("hola"));
        assert!(stop.contains("ejemplos"));
        assert!(!stop.contains("python"));
    }

    #[test]
    fn test_extra_words_are_lowercased() {
        let stop = build_stop_words("english", &["Gracias".to_string()]).unwrap();
        assert!(stop.contains("gracias"));
        assert!(stop.contains("the"));
    }

    #[test]
    fn test_unknown_language_fails() {
        assert!(build_stop_words("klingon", &[]).is_err());
    }
}
