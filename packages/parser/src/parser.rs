use crate::ast::{Path, Segment};
use crate::error::{PathResult, PathSyntaxError};
use crate::lexer::{lex, Token, TokenSpan};
use geostory_common::Value;

/// Parse a path expression into a typed path
pub fn parse(source: &str) -> PathResult<Path> {
    Parser::new(source)?.parse_path()
}

/// Recursive descent parser for path expressions
pub struct Parser<'src> {
    tokens: Vec<(Token<'src>, TokenSpan)>,
    pos: usize,
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str) -> PathResult<Self> {
        let mut tokens = Vec::new();
        for result in lex(source) {
            match result {
                Ok(spanned) => tokens.push((spanned.token, spanned.span)),
                Err(e) => return Err(PathSyntaxError::LexError { span: e.span }),
            }
        }
        Ok(Self { tokens, pos: 0 })
    }

    /// Parse a complete path
    pub fn parse_path(&mut self) -> PathResult<Path> {
        let mut path = Path::root();
        if self.is_at_end() {
            return Ok(path);
        }

        self.parse_head(&mut path)?;

        while let Some((token, span)) = self.advance() {
            match token {
                Token::Dot => self.parse_dotted(&mut path)?,
                Token::LBracket => self.parse_bracket(&mut path, false)?,
                other => {
                    return Err(PathSyntaxError::unexpected_token(
                        span,
                        "'.' or '['",
                        describe(&other),
                    ))
                }
            }
        }

        Ok(path)
    }

    fn parse_head(&mut self, path: &mut Path) -> PathResult<()> {
        let (token, span) = self.expect_any("property name, index or '['")?;
        if let Some(name) = token.as_name() {
            path.push(Segment::Property(name.to_string()));
            return Ok(());
        }
        match token {
            Token::Integer(digits) => {
                path.push(Segment::Index(parse_index(digits, span)?));
                Ok(())
            }
            Token::LBracket => self.parse_bracket(path, true),
            Token::LBrace => Err(PathSyntaxError::invalid_predicate(
                span,
                "predicate must follow an array segment",
            )),
            other => Err(PathSyntaxError::unexpected_token(
                span,
                "property name, index or '['",
                describe(&other),
            )),
        }
    }

    /// Segment after a dot: a name or an index
    fn parse_dotted(&mut self, path: &mut Path) -> PathResult<()> {
        let (token, span) = self.expect_any("property name or index after '.'")?;
        if let Some(name) = token.as_name() {
            path.push(Segment::Property(name.to_string()));
            return Ok(());
        }
        match token {
            Token::Integer(digits) => {
                path.push(Segment::Index(parse_index(digits, span)?));
                Ok(())
            }
            // `a.0.1` lexes the two indices as one float
            Token::Float(text) if text.chars().all(|c| c.is_ascii_digit() || c == '.') => {
                for part in text.split('.') {
                    path.push(Segment::Index(parse_index(part, span)?));
                }
                Ok(())
            }
            Token::LBrace => Err(PathSyntaxError::invalid_predicate(
                span,
                "predicate must be enclosed in brackets",
            )),
            other => Err(PathSyntaxError::unexpected_token(
                span,
                "property name or index after '.'",
                describe(&other),
            )),
        }
    }

    /// Bracketed segment; the opening bracket is already consumed
    fn parse_bracket(&mut self, path: &mut Path, is_head: bool) -> PathResult<()> {
        let (token, span) = self.expect_any("index, quoted name or predicate")?;
        let segment = match token {
            Token::Integer(digits) => Segment::Index(parse_index(digits, span)?),
            // not an index: never matches an array element
            Token::Float(text) => Segment::Property(text.to_string()),
            Token::String(raw) => Segment::Property(decode_string(raw, span)?),
            Token::SingleQuoteString(raw) => Segment::Property(unescape_single(raw)),
            Token::LBrace if is_head => {
                return Err(PathSyntaxError::invalid_predicate(
                    span,
                    "predicate must follow an array segment",
                ))
            }
            Token::LBrace => self.parse_predicate(span)?,
            other => {
                return Err(PathSyntaxError::unexpected_token(
                    span,
                    "index, quoted name or predicate",
                    describe(&other),
                ))
            }
        };
        self.expect(Token::RBracket, "']'")?;
        path.push(segment);
        Ok(())
    }

    /// `{key: literal}`; the opening brace is already consumed
    fn parse_predicate(&mut self, open: TokenSpan) -> PathResult<Segment> {
        let (token, span) = self.expect_any("predicate key")?;
        let key = match token {
            Token::String(raw) => decode_string(raw, span)?,
            Token::SingleQuoteString(raw) => unescape_single(raw),
            Token::RBrace => {
                return Err(PathSyntaxError::invalid_predicate(
                    TokenSpan {
                        start: open.start,
                        end: span.end,
                    },
                    "predicate must have exactly one key",
                ))
            }
            other => match other.as_name() {
                Some(name) => name.to_string(),
                None => {
                    return Err(PathSyntaxError::unexpected_token(
                        span,
                        "predicate key",
                        describe(&other),
                    ))
                }
            },
        };

        self.expect(Token::Colon, "':'")?;

        let (token, span) = self.expect_any("predicate value")?;
        let value = match token {
            Token::String(raw) => Value::from(decode_string(raw, span)?),
            Token::SingleQuoteString(raw) => Value::from(unescape_single(raw)),
            Token::Integer(text) | Token::Float(text) => decode_number(text, span)?,
            Token::True => Value::Bool(true),
            Token::False => Value::Bool(false),
            Token::Null => Value::Null,
            Token::LBrace | Token::LBracket => {
                return Err(PathSyntaxError::invalid_predicate(
                    span,
                    "predicate value must be a string, number, boolean or null",
                ))
            }
            other => {
                return Err(PathSyntaxError::unexpected_token(
                    span,
                    "predicate value",
                    describe(&other),
                ))
            }
        };

        match self.advance() {
            Some((Token::RBrace, _)) => Ok(Segment::Predicate { key, value }),
            Some((Token::Comma, span)) => Err(PathSyntaxError::invalid_predicate(
                span,
                "predicate must have exactly one key",
            )),
            Some((other, span)) => Err(PathSyntaxError::unexpected_token(
                span,
                "'}'",
                describe(&other),
            )),
            None => Err(PathSyntaxError::unexpected_end("'}'")),
        }
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn advance(&mut self) -> Option<(Token<'src>, TokenSpan)> {
        let next = self.tokens.get(self.pos).cloned();
        if next.is_some() {
            self.pos += 1;
        }
        next
    }

    fn expect_any(&mut self, expected: &str) -> PathResult<(Token<'src>, TokenSpan)> {
        self.advance()
            .ok_or_else(|| PathSyntaxError::unexpected_end(expected))
    }

    fn expect(&mut self, token: Token<'src>, expected: &str) -> PathResult<TokenSpan> {
        match self.advance() {
            Some((found, span)) if found == token => Ok(span),
            Some((found, span)) => Err(PathSyntaxError::unexpected_token(
                span,
                expected,
                describe(&found),
            )),
            None => Err(PathSyntaxError::unexpected_end(expected)),
        }
    }
}

fn describe(token: &Token<'_>) -> String {
    match token {
        Token::Ident(name) => format!("'{}'", name),
        Token::Integer(text) | Token::Float(text) => text.to_string(),
        Token::String(raw) => raw.to_string(),
        Token::SingleQuoteString(raw) => format!("'{}'", raw),
        Token::True => "'true'".to_string(),
        Token::False => "'false'".to_string(),
        Token::Null => "'null'".to_string(),
        Token::LBracket => "'['".to_string(),
        Token::RBracket => "']'".to_string(),
        Token::LBrace => "'{'".to_string(),
        Token::RBrace => "'}'".to_string(),
        Token::Dot => "'.'".to_string(),
        Token::Colon => "':'".to_string(),
        Token::Comma => "','".to_string(),
    }
}

fn parse_index(digits: &str, span: TokenSpan) -> PathResult<i64> {
    digits
        .parse::<i64>()
        .map_err(|_| PathSyntaxError::unexpected_token(span, "index", digits))
}

/// Decode a double-quoted token with JSON escape rules
fn decode_string(raw: &str, span: TokenSpan) -> PathResult<String> {
    serde_json::from_str::<String>(raw)
        .map_err(|e| PathSyntaxError::invalid_predicate(span, format!("invalid string literal: {}", e)))
}

fn decode_number(text: &str, span: TokenSpan) -> PathResult<Value> {
    serde_json::from_str::<serde_json::Number>(text)
        .map(Value::Number)
        .map_err(|e| PathSyntaxError::invalid_predicate(span, format!("invalid number literal: {}", e)))
}

fn unescape_single(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(escaped) = chars.next() {
                out.push(escaped);
            }
        } else {
            out.push(c);
        }
    }
    out
}
