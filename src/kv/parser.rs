use regex::Regex; 
use tracing::trace; 

use super::handler::KeyValueHandler; 

/// Splits an input string into key/value pairs and hands every pair to 
/// every handler, in handler order. 
pub trait KeyValueParser: Send + Sync {
    /// Tokenizes `input`. An empty input is a no-op. 
    fn parse(&self, input: &str, handlers: &mut [&mut dyn KeyValueHandler]); 
} 

fn emit(handlers: &mut [&mut dyn KeyValueHandler], key: &str, value: &str) {
    for handler in handlers.iter_mut() {
        handler.handle(key, value); 
    }
} 

/// Regex driven tokenizer. 
/// 
/// The input is split on `pair_delimiter` into segments and every segment is 
/// split on `key_value_delimiter`: 
/// 
/// * one delimiter gives `(key, value)`, or `(key, "")` when the value is empty 
/// * no delimiter gives `(key, "")`, a bare flag 
/// * a segment with two or more delimiters is skipped silently, as are empty 
///   segments and a lone delimiter 
#[derive(Debug, Clone)] 
pub struct DelimitedKeyValueParser {
    pair_delimiter: Regex, 
    key_value_delimiter: Regex, 
} 

impl DelimitedKeyValueParser {
    /// Builds a parser from two regex patterns. 
    pub fn new(pair_delimiter: &str, key_value_delimiter: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            pair_delimiter: Regex::new(pair_delimiter)?, 
            key_value_delimiter: Regex::new(key_value_delimiter)?, 
        })
    } 

    /// `&` / `=`, the grammar of query strings and form bodies. 
    pub fn query() -> Result<Self, regex::Error> {
        Self::new("&", "=") 
    } 

    /// Comma / equals with optional whitespace around both, the grammar of 
    /// the parameter list in an `Authorization: OAuth ...` header. 
    pub fn header() -> Result<Self, regex::Error> {
        Self::new(r"\s*,\s*", r"\s*=\s*") 
    } 
} 

impl KeyValueParser for DelimitedKeyValueParser {
    fn parse(&self, input: &str, handlers: &mut [&mut dyn KeyValueHandler]) {
        if input.is_empty() {
            return; 
        } 
        for segment in self.pair_delimiter.split(input) {
            let parts: Vec<&str> = self.key_value_delimiter.split(segment).collect(); 
            match parts.as_slice() {
                [""] | ["", ""] => {} 
                [key] => emit(handlers, key, ""), 
                [key, value] => emit(handlers, key, value), 
                _ => trace!(segment, parts = parts.len(), "Skipping malformed key-value segment"), 
            } 
        } 
    } 
} 

/// Emits a fixed list of pairs whenever it is asked to parse a non-empty 
/// input, ignoring the input's content. 
/// 
/// Used to push trusted or pre-supplied pairs through the same handlers as 
/// parsed ones. 
#[derive(Debug, Clone, Default)] 
pub struct ConstKeyValueParser {
    pairs: Vec<(String, String)>, 
} 

impl ConstKeyValueParser {
    pub fn new<K: Into<String>, V: Into<String>>(key: K, value: V) -> Self {
        Self { pairs: vec![(key.into(), value.into())] } 
    } 

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>, 
        K: Into<String>, 
        V: Into<String>, 
    {
        Self { pairs: pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect() } 
    } 

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs 
    } 
} 

impl KeyValueParser for ConstKeyValueParser {
    fn parse(&self, input: &str, handlers: &mut [&mut dyn KeyValueHandler]) {
        if input.is_empty() {
            return; 
        } 
        for (key, value) in &self.pairs {
            emit(handlers, key, value); 
        } 
    } 
} 

#[cfg(test)] 
mod tests {
    use super::*; 
    use crate::kv::handler::DuplicateKeyValueHandler; 

    fn run(parser: &dyn KeyValueParser, input: &str) -> Vec<(String, String)> {
        let mut collected = DuplicateKeyValueHandler::new(); 
        parser.parse(input, &mut [&mut collected]); 
        collected.into_pairs() 
    } 

    fn pairs(expected: &[(&str, &str)]) -> Vec<(String, String)> {
        expected.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect() 
    } 

    #[test]
    fn query_pairs_come_out_in_order() {
        let parser = DelimitedKeyValueParser::query().unwrap(); 
        assert_eq!(run(&parser, "k1=v1&k2=v2&k1=v3"), pairs(&[("k1", "v1"), ("k2", "v2"), ("k1", "v3")])); 
    }

    #[test]
    fn bare_key_gets_empty_value() {
        let parser = DelimitedKeyValueParser::query().unwrap(); 
        assert_eq!(run(&parser, "flag&a=1&b="), pairs(&[("flag", ""), ("a", "1"), ("b", "")])); 
    }

    #[test]
    fn segment_with_two_equals_is_dropped() {
        let parser = DelimitedKeyValueParser::query().unwrap(); 
        assert_eq!(run(&parser, "a=1=2&b=2"), pairs(&[("b", "2")])); 
    }

    #[test]
    fn trailing_extra_equals_still_drops_segment() {
        let parser = DelimitedKeyValueParser::query().unwrap(); 
        assert_eq!(run(&parser, "a=1=&b==&c=2"), pairs(&[("c", "2")])); 
    }

    #[test]
    fn empty_segments_and_input_are_ignored() {
        let parser = DelimitedKeyValueParser::query().unwrap(); 
        assert!(run(&parser, "").is_empty()); 
        assert_eq!(run(&parser, "a=1&&b=2&"), pairs(&[("a", "1"), ("b", "2")])); 
        assert!(run(&parser, "=").is_empty()); 
    }

    #[test]
    fn header_grammar_tolerates_whitespace() {
        let parser = DelimitedKeyValueParser::header().unwrap(); 
        assert_eq!(
            run(&parser, "oauth_token=\"tk2\" ,  oauth_nonce = \"n\""), 
            pairs(&[("oauth_token", "\"tk2\""), ("oauth_nonce", "\"n\"")])
        ); 
    }

    #[test]
    fn every_handler_sees_every_pair() {
        let parser = DelimitedKeyValueParser::query().unwrap(); 
        let mut first = DuplicateKeyValueHandler::new(); 
        let mut second = DuplicateKeyValueHandler::new(); 
        parser.parse("a=1&b=2", &mut [&mut first, &mut second]); 
        assert_eq!(first.pairs(), second.pairs()); 
        assert_eq!(first.pairs().len(), 2); 
    }

    #[test]
    fn const_parser_ignores_input_content() {
        let parser = ConstKeyValueParser::from_pairs([("x", "1"), ("y", "2")]); 
        assert_eq!(run(&parser, "whatever=else"), pairs(&[("x", "1"), ("y", "2")])); 
        assert!(run(&parser, "").is_empty()); 
    }

    #[test]
    fn invalid_pattern_is_an_error() {
        assert!(DelimitedKeyValueParser::new("(", "=").is_err()); 
    }
}
