//! Parse lexed GPR tokens into an AST

use indexmap::IndexMap;
use thiserror::Error;

use crate::io::gpr_parse::token::Token;
use crate::metabolic_model::gene::Gene;
use crate::metabolic_model::model::{Gpr, GprOperatorType};

/*
GPR Grammar:
expression -> binary
binary -> unary (("AND" | "OR") unary )*;
unary -> "NOT" unary | primary  ;
primary -> GENE | "(" expression ")" ;

e.g. ( Gene1 AND Gene2) OR (Gene3 AND NOT Gene4)
 */

/// GPR Parser
pub struct GprParser<'gm> {
    /// Vector of tokens from the GPR string
    tokens: Vec<Token>,
    /// Current token being processed
    current: usize,
    /// Map containing the Genes
    pub(crate) gene_map: &'gm mut IndexMap<String, Gene>,
}

impl<'gm> GprParser<'gm> {
    /// Create a new GprParser
    pub fn new(tokens: Vec<Token>, gene_map: &mut IndexMap<String, Gene>) -> GprParser {
        GprParser {
            tokens,
            current: 0,
            gene_map,
        }
    }

    // region Parsing Functions

    /// Parse the token vector into a GPR AST
    pub fn parse(&mut self) -> Result<Gpr, ParseError> {
        let gpr = self.binary()?;
        if !self.is_at_end() {
            // Tokens remain after a complete expression
            return Err(ParseError::EarlyTermination);
        }
        Ok(gpr)
    }

    fn binary(&mut self) -> Result<Gpr, ParseError> {
        let mut expr = self.unary()?;

        while self.match_token(&[Token::And, Token::Or]) {
            let operator = match self.previous() {
                Token::Or => GprOperatorType::Or,
                Token::And => GprOperatorType::And,
                _ => return Err(ParseError::InvalidBinaryOperator),
            };
            let right = self.unary()?;
            expr = Gpr::new_binary_operation(expr, operator, right)
                .map_err(|_| ParseError::InvalidBinaryOperator)?;
        }
        Ok(expr)
    }

    fn unary(&mut self) -> Result<Gpr, ParseError> {
        if self.match_token(&[Token::Not]) {
            let operand = self.unary()?;
            return Gpr::new_unary_operation(GprOperatorType::Not, operand)
                .map_err(|_| ParseError::InvalidUnaryOperator);
        }
        self.primary()
    }

    fn primary(&mut self) -> Result<Gpr, ParseError> {
        if let Some(identifier) = self.match_identifier() {
            self.insert_if_needed(&identifier);
            return Ok(Gpr::new_gene_node(&identifier));
        }

        if self.match_token(&[Token::LeftParen]) {
            let expr = self.binary()?;
            self.consume(Token::RightParen, "Expect ')' after expression.")?;
            return Ok(expr);
        }

        Err(ParseError::ExpectedExpression)
    }

    // endregion Parsing Functions

    // region Parsing Helper Functions

    /// Check whether the token at the current position matches one of the provided
    /// `tokens`, if it does advance and return true, otherwise return false
    fn match_token(&mut self, tokens: &[Token]) -> bool {
        for token in tokens {
            if self.check(token) {
                self.advance();
                return true;
            }
        }
        false
    }

    /// Like [`Self::match_token`], but for identifiers; returns the gene id when
    /// the current token is an identifier
    fn match_identifier(&mut self) -> Option<String> {
        if self.is_at_end() {
            return None;
        }
        if let Token::Identifier(id) = self.peek().clone() {
            self.advance();
            return Some(id);
        }
        None
    }

    /// Check whether the current token matches the provided `token`
    fn check(&self, token: &Token) -> bool {
        if self.is_at_end() {
            return false;
        }
        self.peek() == token
    }

    /// Advance one position unless at the end of the token vector
    fn advance(&mut self) {
        if !self.is_at_end() {
            self.current += 1;
        }
    }

    /// Check whether the parser is at the end of the token vector
    fn is_at_end(&self) -> bool {
        *self.peek() == Token::Eof
    }

    /// Get a reference to the current token
    fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    /// Get a copy of the previous token
    fn previous(&self) -> Token {
        self.tokens[self.current - 1].clone()
    }

    /// Check whether the current token matches an input token, if it matches
    /// advance, otherwise return an error. Used for matching closing parenthesis.
    fn consume(&mut self, token: Token, msg: &str) -> Result<(), ParseError> {
        if self.check(&token) {
            self.advance();
            return Ok(());
        }
        Err(ParseError::MissingToken(msg.to_string()))
    }

    // endregion Parsing Helper Functions

    // region Gene Map Functions

    /// Insert a placeholder gene when the rule references an id the gene map
    /// does not know yet
    fn insert_if_needed(&mut self, gene_id: &str) {
        if !self.gene_map.contains_key(gene_id) {
            self.gene_map.insert(
                gene_id.to_string(),
                Gene::new(gene_id.to_string(), None, None, None),
            );
        }
    }

    // endregion Gene Map Functions
}

/// Enum representing possible parse errors
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ParseError {
    /// Token was expected to be a binary operator but was not
    #[error("Invalid binary operator encountered, expected only `and` and `or`")]
    InvalidBinaryOperator,
    /// Token was expected to be a unary operator but was not
    #[error("Invalid unary operator encountered, expected only `not`")]
    InvalidUnaryOperator,
    /// Missing expected token (e.g. a right parenthesis)
    #[error("Missing expected token: {0}")]
    MissingToken(String),
    /// No expression found when one was expected
    #[error("No expression found, check that the GPR string is not empty")]
    ExpectedExpression,
    /// Expression was not completed when parsing terminated
    #[error("Parsing terminated early, check for a `not` between two gene identifiers/grouped expressions")]
    EarlyTermination,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::gpr_parse::lexer::Lexer;
    use crate::metabolic_model::model::GprOperation;

    fn parse(rule: &str) -> Result<(Gpr, IndexMap<String, Gene>), ParseError> {
        let tokens = Lexer::new(rule).lex().unwrap();
        let mut gene_map = IndexMap::new();
        let gpr = GprParser::new(tokens, &mut gene_map).parse()?;
        Ok((gpr, gene_map))
    }

    #[test]
    fn single_gene() {
        let (gpr, gene_map) = parse("Rv1304").unwrap();
        assert!(matches!(gpr, Gpr::GeneNode(ref gene) if gene == "Rv1304"));
        assert!(gene_map.contains_key("Rv1304"));
    }

    #[test]
    fn and_expression() {
        let (gpr, _) = parse("Rv1304 and Rv0023").unwrap();
        match gpr {
            Gpr::Operation(GprOperation::And { left, right }) => {
                assert!(matches!(*left, Gpr::GeneNode(ref gene) if gene == "Rv1304"));
                assert!(matches!(*right, Gpr::GeneNode(ref gene) if gene == "Rv0023"));
            }
            other => panic!("expected an and operation, parsed {:?}", other),
        }
    }

    #[test]
    fn or_expression() {
        let (gpr, _) = parse("Rv1304 or Rv0023").unwrap();
        assert!(matches!(
            gpr,
            Gpr::Operation(GprOperation::Or { .. })
        ));
    }

    #[test]
    fn not_expression() {
        let (gpr, _) = parse("not Rv0023").unwrap();
        match gpr {
            Gpr::Operation(GprOperation::Not { val }) => {
                assert!(matches!(*val, Gpr::GeneNode(ref gene) if gene == "Rv0023"));
            }
            other => panic!("expected a not operation, parsed {:?}", other),
        }
    }

    #[test]
    fn grouping_binds_tighter() {
        let (gpr, _) = parse("(Rv3141 or Rv0023) and Rv0018").unwrap();
        match gpr {
            Gpr::Operation(GprOperation::And { left, right }) => {
                assert!(matches!(
                    *left,
                    Gpr::Operation(GprOperation::Or { .. })
                ));
                assert!(matches!(*right, Gpr::GeneNode(ref gene) if gene == "Rv0018"));
            }
            other => panic!("expected an and operation, parsed {:?}", other),
        }
    }

    #[test]
    fn chained_binary_is_left_associative() {
        let (gpr, _) = parse("Rv0001 and Rv0002 and Rv0003").unwrap();
        match gpr {
            Gpr::Operation(GprOperation::And { left, right }) => {
                assert!(matches!(*right, Gpr::GeneNode(ref gene) if gene == "Rv0003"));
                assert!(matches!(
                    *left,
                    Gpr::Operation(GprOperation::And { .. })
                ));
            }
            other => panic!("expected an and operation, parsed {:?}", other),
        }
    }

    #[test]
    fn genes_are_registered() {
        let (_, gene_map) = parse("(b0001 and b0002) or b0003").unwrap();
        assert_eq!(gene_map.len(), 3);
        assert!(gene_map.contains_key("b0002"));
    }

    #[test]
    fn missing_close_paren() {
        assert!(matches!(
            parse("(Rv0001 and Rv0002"),
            Err(ParseError::MissingToken(_))
        ));
    }

    #[test]
    fn empty_rule_is_an_error() {
        assert!(matches!(parse(""), Err(ParseError::ExpectedExpression)));
    }

    #[test]
    fn dangling_not_between_genes() {
        assert!(matches!(
            parse("Rv0001 not Rv0023"),
            Err(ParseError::EarlyTermination)
        ));
    }
}
