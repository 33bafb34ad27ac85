//! Lex a GPR string into a series of tokens for later parsing

use thiserror::Error;

use crate::io::gpr_parse::token::Token;

pub struct Lexer {
    source: Vec<char>,
    tokens: Vec<Token>,
    start: usize,
    current: usize,
}

impl Lexer {
    pub fn new(source: &str) -> Self {
        Lexer {
            source: source.chars().collect(),
            tokens: Vec::new(),
            start: 0,
            current: 0,
        }
    }

    /// Convert the source GPR string into a token vector ending in Eof
    pub fn lex(&mut self) -> Result<Vec<Token>, LexerError> {
        while !self.is_at_end() {
            self.start = self.current;
            self.scan_token()?;
        }
        self.tokens.push(Token::Eof);
        Ok(std::mem::take(&mut self.tokens))
    }

    fn scan_token(&mut self) -> Result<(), LexerError> {
        let c: char = self.advance();
        match c {
            // Single Character Tokens
            '(' => self.add_token(Token::LeftParen),
            ')' => self.add_token(Token::RightParen),
            // Identifiers and Operators; gene ids may lead with a digit
            'a'..='z' | 'A'..='Z' | '0'..='9' | '_' => self.read_identifier(),
            // Whitespace
            ' ' | '\r' | '\n' | '\t' => {}
            invalid => return Err(LexerError::InvalidCharacter(invalid)),
        };
        Ok(())
    }

    fn advance(&mut self) -> char {
        let char_at_current = self.source[self.current];
        self.current += 1;
        char_at_current
    }

    fn read_identifier(&mut self) {
        while Lexer::is_identifier_char(self.peek()) {
            self.advance();
        }

        let text: String = self.source[self.start..self.current].iter().collect();

        match text.as_str() {
            "and" | "And" | "AND" => self.add_token(Token::And),
            "or" | "Or" | "OR" => self.add_token(Token::Or),
            "not" | "Not" | "NOT" => self.add_token(Token::Not),
            gene => self.add_token(Token::Identifier(gene.to_string())),
        }
    }

    fn is_identifier_char(c: char) -> bool {
        matches!(c, 'a'..='z' | 'A'..='Z' | '0'..='9' | '_' | '.')
    }

    fn peek(&self) -> char {
        if self.is_at_end() {
            return '\0';
        }
        self.source[self.current]
    }

    fn add_token(&mut self, token: Token) {
        self.tokens.push(token);
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.source.len()
    }
}

#[derive(Clone, Debug, Error)]
pub enum LexerError {
    #[error("invalid character '{0}' in GPR rule")]
    InvalidCharacter(char),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_gene() {
        let mut lexer = Lexer::new("Rv0023");
        let tokens = lexer.lex().unwrap();
        assert_eq!(
            tokens,
            vec![Token::Identifier(String::from("Rv0023")), Token::Eof]
        );
    }

    #[test]
    fn grouping() {
        let mut lexer = Lexer::new("(Rv0023 or Rv0123)");
        let tokens = lexer.lex().unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::LeftParen,
                Token::Identifier(String::from("Rv0023")),
                Token::Or,
                Token::Identifier(String::from("Rv0123")),
                Token::RightParen,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn keywords_are_case_insensitive() {
        let mut lexer = Lexer::new("a AND b Or not c");
        let tokens = lexer.lex().unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Identifier(String::from("a")),
                Token::And,
                Token::Identifier(String::from("b")),
                Token::Or,
                Token::Not,
                Token::Identifier(String::from("c")),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn seed_style_gene_ids() {
        let mut lexer = Lexer::new("83333.1.peg.1 or b0002");
        let tokens = lexer.lex().unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Identifier(String::from("83333.1.peg.1")),
                Token::Or,
                Token::Identifier(String::from("b0002")),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn invalid_character() {
        let mut lexer = Lexer::new("geneA & geneB");
        assert!(matches!(
            lexer.lex(),
            Err(LexerError::InvalidCharacter('&'))
        ));
    }
}
