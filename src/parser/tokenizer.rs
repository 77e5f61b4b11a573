use super::error::LexError;
use super::locations::{Locatable, Location, Span};
use const_format::concatcp;
use derivative::Derivative;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

/// A single lexeme. Equality compares kind and text only, never the span.
#[derive(Clone, Debug, Derivative)]
#[derivative(PartialEq)]
pub struct Token {
    pub(crate) typ: TokenType,
    pub(crate) lexeme: String,
    #[derivative(PartialEq = "ignore")]
    pub(crate) span: Span,
}

impl Token {
    pub fn new(typ: TokenType, lexeme: &str) -> Self {
        Self {
            typ,
            lexeme: lexeme.to_string(),
            span: Span::default(),
        }
    }
    pub fn typ(&self) -> TokenType {
        self.typ
    }
    pub fn lexeme(&self) -> &str {
        &self.lexeme
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}('{}')", self.typ, self.lexeme)
    }
}

impl Locatable for Token {
    fn span(&self) -> Span {
        self.span
    }
}

#[allow(non_camel_case_types)]
#[allow(clippy::upper_case_acronyms)]
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum TokenType {
    INT,
    FLOAT,
    IDENTIFIER,
    BOOL,
    NULL,
    EQUALS,
    OPENPAREN,
    CLOSEPAREN,
    BINARYOPERATOR,
    OPENBRACE,
    CLOSEBRACE,
    OPENBRACKET,
    CLOSEBRACKET,
    QUOTATION,
    GREATER,
    LESSER,
    EQUALSCOMPARE,
    NOTEQUALSCOMPARE,
    EXCLAMATION,
    EXPONENTIAL,
    AMPERSAND,
    AND,
    OR,
    ARROW,
    DOT,
    COLON,
    SEMICOLON,
    COMMA,
    IF,
    ELIF,
    ELSE,
    FOR,
    WHILE,
    BREAK,
    FUNC,
    NOT,
    TRY,
    CATCH,
    CONST,
    VAR,
    NEWLINE,
    EOF,
}

const EQUALSCOMPARE: (&str, TokenType) = ("==", TokenType::EQUALSCOMPARE);
const NOTEQUALSCOMPARE: (&str, TokenType) = ("!=", TokenType::NOTEQUALSCOMPARE);
const AND: (&str, TokenType) = ("&&", TokenType::AND);
const OR: (&str, TokenType) = ("||", TokenType::OR);
const ARROW: (&str, TokenType) = ("->", TokenType::ARROW);
const EQUALS: (&str, TokenType) = ("=", TokenType::EQUALS);
const EXCLAMATION: (&str, TokenType) = ("!", TokenType::EXCLAMATION);
const AMPERSAND: (&str, TokenType) = ("&", TokenType::AMPERSAND);
const PIPE: (&str, TokenType) = ("|", TokenType::COMMA);
const PLUS: (&str, TokenType) = ("+", TokenType::BINARYOPERATOR);
const MINUS: (&str, TokenType) = ("-", TokenType::BINARYOPERATOR);
const STAR: (&str, TokenType) = ("*", TokenType::BINARYOPERATOR);
const SLASH: (&str, TokenType) = ("/", TokenType::BINARYOPERATOR);
const PERCENT: (&str, TokenType) = ("%", TokenType::BINARYOPERATOR);
const OPENPAREN: (&str, TokenType) = ("(", TokenType::OPENPAREN);
const CLOSEPAREN: (&str, TokenType) = (")", TokenType::CLOSEPAREN);
const OPENBRACE: (&str, TokenType) = ("{", TokenType::OPENBRACE);
const CLOSEBRACE: (&str, TokenType) = ("}", TokenType::CLOSEBRACE);
const OPENBRACKET: (&str, TokenType) = ("[", TokenType::OPENBRACKET);
const CLOSEBRACKET: (&str, TokenType) = ("]", TokenType::CLOSEBRACKET);
const LESSER: (&str, TokenType) = ("<", TokenType::LESSER);
const GREATER: (&str, TokenType) = (">", TokenType::GREATER);
const DOT: (&str, TokenType) = (".", TokenType::DOT);
const COLON: (&str, TokenType) = (":", TokenType::COLON);
const SEMICOLON: (&str, TokenType) = (";", TokenType::SEMICOLON);
const COMMA: (&str, TokenType) = (",", TokenType::COMMA);
const QUOTATION: (&str, TokenType) = ("\"", TokenType::QUOTATION);
const EXPONENTIAL: (&str, TokenType) = ("^", TokenType::EXPONENTIAL);

// Two-character operators first, so that their one-character prefixes only
// match as a fallback.
const SIMPLE_TOKENS: [(&str, TokenType); 28] = [
    EQUALSCOMPARE,
    NOTEQUALSCOMPARE,
    AND,
    OR,
    ARROW,
    EQUALS,
    EXCLAMATION,
    AMPERSAND,
    PIPE,
    PLUS,
    MINUS,
    STAR,
    SLASH,
    PERCENT,
    OPENPAREN,
    CLOSEPAREN,
    OPENBRACE,
    CLOSEBRACE,
    OPENBRACKET,
    CLOSEBRACKET,
    LESSER,
    GREATER,
    DOT,
    COLON,
    SEMICOLON,
    COMMA,
    QUOTATION,
    EXPONENTIAL,
];

const LINE_COMMENT: &str = ">>";
const BLOCK_COMMENT_START: &str = ">>>";
const BLOCK_COMMENT_END: &str = "<<<";

const WHITESPACE_CHARS: &str = " \t\r\n";
const DIGITS: &str = "0-9";
const LETTERS: &str = "A-Za-z";
const S_WHITESPACE: &str = concatcp!("^[", WHITESPACE_CHARS, "]+");
const S_NUMBER: &str = concatcp!("^[", DIGITS, "][", DIGITS, ".]*");
const S_NAME: &str = concatcp!("^[", LETTERS, "]+");

static WHITESPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(S_WHITESPACE).expect("Error compiling regex."));
static NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(S_NUMBER).expect("Error compiling regex."));
static NAME: Lazy<Regex> = Lazy::new(|| Regex::new(S_NAME).expect("Error compiling regex."));

static KEYWORDS: Lazy<HashMap<&'static str, TokenType>> = Lazy::new(|| {
    HashMap::from([
        ("if", TokenType::IF),
        ("elif", TokenType::ELIF),
        ("else", TokenType::ELSE),
        ("for", TokenType::FOR),
        ("while", TokenType::WHILE),
        ("break", TokenType::BREAK),
        ("func", TokenType::FUNC),
        ("not", TokenType::NOT),
        ("try", TokenType::TRY),
        ("catch", TokenType::CATCH),
        ("null", TokenType::NULL),
        ("true", TokenType::BOOL),
        ("false", TokenType::BOOL),
        ("const", TokenType::CONST),
        ("var", TokenType::VAR),
    ])
});

pub struct Tokenizer<'a> {
    source: &'a str,
    start: usize,
    location: Location,
    tokens: Vec<Token>,
}

impl<'a> Tokenizer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            start: 0,
            location: Location::start(),
            tokens: vec![],
        }
    }

    pub fn tokenize(mut self) -> Result<Vec<Token>, LexError> {
        let source = self.source;
        while self.start < source.len() {
            let rest = &source[self.start..];

            if let Some(m) = WHITESPACE.find(rest) {
                self.skip(m.as_str());
                continue;
            }
            if rest.starts_with(BLOCK_COMMENT_START) {
                self.block_comment(rest)?;
                continue;
            }
            if rest.starts_with(LINE_COMMENT) {
                let end = rest.find('\n').map_or(rest.len(), |i| i + 1);
                self.skip(&rest[..end]);
                continue;
            }
            if let Some(m) = NUMBER.find(rest) {
                self.number(m.as_str())?;
                continue;
            }
            if let Some(m) = NAME.find(rest) {
                let lexeme = m.as_str().to_ascii_lowercase();
                let typ = KEYWORDS
                    .get(lexeme.as_str())
                    .copied()
                    .unwrap_or(TokenType::IDENTIFIER);
                self.push(typ, lexeme, m.as_str());
                continue;
            }
            if let Some((lexeme, typ)) = SIMPLE_TOKENS
                .iter()
                .find(|(lexeme, _)| rest.starts_with(lexeme))
            {
                self.push(*typ, lexeme.to_string(), lexeme);
                continue;
            }
            let character = rest.chars().next().unwrap_or_default();
            return Err(LexError::UnrecognizedCharacter {
                character,
                location: self.location,
            });
        }
        self.tokens.push(Token {
            typ: TokenType::EOF,
            lexeme: "".to_string(),
            span: Span::at(self.location),
        });
        Ok(self.tokens)
    }

    fn block_comment(&mut self, rest: &str) -> Result<(), LexError> {
        let body = &rest[BLOCK_COMMENT_START.len()..];
        match body.find(BLOCK_COMMENT_END) {
            Some(i) => {
                let end = BLOCK_COMMENT_START.len() + i + BLOCK_COMMENT_END.len();
                self.skip(&rest[..end]);
                Ok(())
            }
            None => Err(LexError::UnterminatedComment {
                location: self.location,
            }),
        }
    }

    fn number(&mut self, literal: &str) -> Result<(), LexError> {
        let typ = match literal.matches('.').count() {
            0 => TokenType::INT,
            1 => TokenType::FLOAT,
            _ => {
                return Err(LexError::MalformedNumber {
                    literal: literal.to_string(),
                    location: self.location,
                })
            }
        };
        self.push(typ, literal.to_string(), literal);
        Ok(())
    }

    fn skip(&mut self, text: &str) {
        self.start += text.len();
        self.location.advance(text);
    }

    fn push(&mut self, typ: TokenType, lexeme: String, consumed: &str) {
        let start = self.location;
        self.skip(consumed);
        self.tokens.push(Token {
            typ,
            lexeme,
            span: Span::new(start, self.location),
        });
    }
}

pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    Tokenizer::new(source).tokenize()
}

#[cfg(test)]
mod tests {
    use super::TokenType as TT;
    use super::*;

    fn kinds(source: &str) -> Vec<TT> {
        tokenize(source)
            .expect("source should tokenize")
            .iter()
            .map(Token::typ)
            .collect()
    }

    #[test]
    fn empty_input_is_just_eof() {
        assert_eq!(tokenize("").unwrap(), vec![Token::new(TT::EOF, "")]);
        assert_eq!(kinds(" \t\r\n "), vec![TT::EOF]);
    }

    #[test]
    fn numbers() {
        assert_eq!(
            tokenize("42 3.5 7.").unwrap(),
            vec![
                Token::new(TT::INT, "42"),
                Token::new(TT::FLOAT, "3.5"),
                Token::new(TT::FLOAT, "7."),
                Token::new(TT::EOF, ""),
            ]
        );
    }

    #[test]
    fn second_dot_is_malformed() {
        assert!(matches!(
            tokenize("1.2.3"),
            Err(LexError::MalformedNumber { ref literal, .. }) if literal == "1.2.3"
        ));
    }

    #[test]
    fn two_character_operators_and_fallbacks() {
        assert_eq!(
            kinds("== != && || -> = ! & | -"),
            vec![
                TT::EQUALSCOMPARE,
                TT::NOTEQUALSCOMPARE,
                TT::AND,
                TT::OR,
                TT::ARROW,
                TT::EQUALS,
                TT::EXCLAMATION,
                TT::AMPERSAND,
                TT::COMMA,
                TT::BINARYOPERATOR,
                TT::EOF,
            ]
        );
    }

    #[test]
    fn lone_pipe_keeps_its_text() {
        let tokens = tokenize("a | b").unwrap();
        assert_eq!(tokens[1], Token::new(TT::COMMA, "|"));
    }

    #[test]
    fn arithmetic_operators_share_a_kind() {
        let tokens = tokenize("+-*/%").unwrap();
        let lexemes: Vec<&str> = tokens.iter().map(Token::lexeme).collect();
        assert_eq!(lexemes, vec!["+", "-", "*", "/", "%", ""]);
        assert!(tokens[..5].iter().all(|t| t.typ == TT::BINARYOPERATOR));
    }

    #[test]
    fn keywords_are_case_insensitive() {
        assert_eq!(
            tokenize("VAR Const TRUE null foo").unwrap(),
            vec![
                Token::new(TT::VAR, "var"),
                Token::new(TT::CONST, "const"),
                Token::new(TT::BOOL, "true"),
                Token::new(TT::NULL, "null"),
                Token::new(TT::IDENTIFIER, "foo"),
                Token::new(TT::EOF, ""),
            ]
        );
    }

    #[test]
    fn identifiers_stop_at_digits_and_underscores() {
        assert_eq!(
            kinds("abc1"),
            vec![TT::IDENTIFIER, TT::INT, TT::EOF]
        );
        assert!(matches!(
            tokenize("a_b"),
            Err(LexError::UnrecognizedCharacter { character: '_', .. })
        ));
    }

    #[test]
    fn line_comments_are_discarded() {
        assert_eq!(kinds(">> comment\n1"), vec![TT::INT, TT::EOF]);
        assert_eq!(kinds("1 >> trailing"), vec![TT::INT, TT::EOF]);
    }

    #[test]
    fn block_comments_are_discarded() {
        assert_eq!(
            kinds("1 >>> a\n b <<< 2"),
            vec![TT::INT, TT::INT, TT::EOF]
        );
        assert!(matches!(
            tokenize(">>> open"),
            Err(LexError::UnterminatedComment { .. })
        ));
        assert!(matches!(
            tokenize(">>> almost << "),
            Err(LexError::UnterminatedComment { .. })
        ));
    }

    #[test]
    fn single_greater_is_an_operator() {
        assert_eq!(kinds("a > b"), vec![TT::IDENTIFIER, TT::GREATER, TT::IDENTIFIER, TT::EOF]);
    }

    #[test]
    fn unrecognized_character_reports_location() {
        match tokenize("1 +\n  @") {
            Err(LexError::UnrecognizedCharacter { character, location }) => {
                assert_eq!(character, '@');
                assert_eq!(location, Location { line: 2, column: 3 });
            }
            other => panic!("unexpected result {other:?}"),
        }
    }

    #[test]
    fn spans_point_into_the_source() {
        let tokens = tokenize("var x\n= 10;").unwrap();
        assert_eq!(tokens[3].span.start, Location { line: 2, column: 3 });
        assert_eq!(tokens[3].span.end, Location { line: 2, column: 5 });
    }
}
