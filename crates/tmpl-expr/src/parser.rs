//! Recursive descent over the expression token stream.

use crate::ast::*;
use crate::error::ExprError;
use crate::lexer::{Lexer, Token, TokenKind};
use source_map::Span;

/// Parses one `{...}` expression into construct spans.
pub struct Parser {
    tokens: Vec<Token>,
    /// Current position in the token stream.
    pos: usize,
    /// Exclusive limit of the token range being parsed.
    end: usize,
}

impl Parser {
    /// Lexes `text`, failing on the first invalid token.
    pub fn new(text: &str) -> Result<Self, ExprError> {
        let tokens = Lexer::new(text)
            .collect::<Result<Vec<_>, _>>()
            .map_err(ExprError::InvalidToken)?;
        let end = tokens.len();
        Ok(Self {
            tokens,
            pos: 0,
            end,
        })
    }

    /// Parses the whole expression.
    pub fn parse(mut self) -> Result<Expr, ExprError> {
        match self.tokens.first() {
            Some(t) if t.kind == TokenKind::LBrace => {}
            _ => return Err(ExprError::NotBraced),
        }

        let close = self.matching(0)?;
        if close + 1 != self.tokens.len() {
            return Err(ExprError::Trailing(self.tokens[close + 1].span));
        }

        let whole = Span::new(self.tokens[0].span.start, self.tokens[close].span.end);
        self.end = close;
        self.pos = 1;

        let expr = match self.peek() {
            None => return Err(ExprError::Empty),
            Some(TokenKind::If) => Expr::If(self.parse_if()?),
            Some(TokenKind::For) => Expr::For(self.parse_for()?),
            Some(TokenKind::While) => Expr::While(self.parse_while()?),
            Some(TokenKind::Switch) => Expr::Switch(self.parse_switch()?),
            Some(_) => {
                let inner = Span::new(
                    self.tokens[1].span.start,
                    self.tokens[close - 1].span.end,
                );
                self.pos = close;
                Expr::Text(TextExpr { span: whole, inner })
            }
        };

        if self.pos != self.end {
            return Err(ExprError::Trailing(self.tokens[self.pos].span));
        }

        Ok(expr)
    }

    // === Token helpers ===

    fn peek(&self) -> Option<TokenKind> {
        (self.pos < self.end).then(|| self.tokens[self.pos].kind)
    }

    /// The span of the current token, or an empty span where the range ends.
    fn here(&self) -> Span {
        if self.pos < self.end {
            self.tokens[self.pos].span
        } else {
            let at = self
                .tokens
                .get(self.end)
                .or_else(|| self.tokens.last())
                .map(|t| t.span.start)
                .unwrap_or_default();
            Span::empty(at)
        }
    }

    fn expect(&mut self, kind: TokenKind, expected: &'static str) -> Result<Token, ExprError> {
        if self.peek() == Some(kind) {
            let token = self.tokens[self.pos];
            self.pos += 1;
            Ok(token)
        } else {
            Err(ExprError::Expected {
                expected,
                span: self.here(),
            })
        }
    }

    /// Finds the index of the delimiter closing the one at `open`.
    fn matching(&self, open: usize) -> Result<usize, ExprError> {
        let mut stack: Vec<TokenKind> = Vec::new();
        for idx in open..self.end {
            let token = self.tokens[idx];
            if token.kind.is_open() {
                stack.push(token.kind);
            } else if token.kind.is_close() {
                let opener = stack.pop().ok_or(ExprError::Unbalanced(token.span))?;
                if !pairs(opener, token.kind) {
                    return Err(ExprError::Unbalanced(token.span));
                }
                if stack.is_empty() {
                    return Ok(idx);
                }
            }
        }
        Err(ExprError::Unbalanced(self.tokens[open].span))
    }

    // === Pieces ===

    fn group(&mut self) -> Result<Group, ExprError> {
        if self.peek() != Some(TokenKind::LParen) {
            return Err(ExprError::Expected {
                expected: "'('",
                span: self.here(),
            });
        }
        let open = self.tokens[self.pos];
        let close_idx = self.matching(self.pos)?;
        let close = self.tokens[close_idx];
        self.pos = close_idx + 1;
        Ok(Group {
            span: Span::new(open.span.start, close.span.end),
            inner: Span::new(open.span.end, close.span.start),
        })
    }

    fn capture(&mut self) -> Result<Option<Span>, ExprError> {
        if self.peek() != Some(TokenKind::Pipe) {
            return Ok(None);
        }
        let open = self.tokens[self.pos];
        let close_idx = (self.pos + 1..self.end)
            .find(|&i| self.tokens[i].kind == TokenKind::Pipe)
            .ok_or(ExprError::Expected {
                expected: "closing '|'",
                span: open.span,
            })?;
        let close = self.tokens[close_idx];
        self.pos = close_idx + 1;
        Ok(Some(Span::new(open.span.end, close.span.start)))
    }

    /// Parses a parenthesised body, or a bare one running up to a `stop`
    /// token or an unmatched closing delimiter.
    fn body(&mut self, stop: &[TokenKind]) -> Result<Body, ExprError> {
        if self.peek() == Some(TokenKind::LParen) {
            let group = self.group()?;
            return Ok(Body {
                span: group.span,
                inner: group.inner,
                parenthesized: true,
            });
        }

        let start = self.pos;
        let mut depth = 0usize;
        while let Some(kind) = self.peek() {
            if depth == 0 && (stop.contains(&kind) || kind.is_close()) {
                break;
            }
            if kind.is_open() {
                depth += 1;
            } else if kind.is_close() {
                depth -= 1;
            }
            self.pos += 1;
        }

        if self.pos == start {
            return Err(ExprError::Expected {
                expected: "a body",
                span: self.here(),
            });
        }

        let span = Span::new(
            self.tokens[start].span.start,
            self.tokens[self.pos - 1].span.end,
        );
        Ok(Body {
            span,
            inner: span,
            parenthesized: false,
        })
    }

    // === Constructs ===

    fn parse_if(&mut self) -> Result<IfExpr, ExprError> {
        let keyword = self.expect(TokenKind::If, "'if'")?;
        let condition = self.group()?;
        let capture = self.capture()?;
        let then_body = self.body(&[TokenKind::Else])?;
        let mut end = then_body.span.end;

        let else_branch = if self.peek() == Some(TokenKind::Else) {
            self.pos += 1;
            if self.peek() == Some(TokenKind::If) {
                let nested = self.parse_if()?;
                end = nested.span.end;
                Some(ElseBranch::If(Box::new(nested)))
            } else {
                let body = self.body(&[])?;
                end = body.span.end;
                Some(ElseBranch::Body(body))
            }
        } else {
            None
        };

        Ok(IfExpr {
            span: Span::new(keyword.span.start, end),
            condition,
            capture,
            then_body,
            else_branch,
        })
    }

    fn parse_for(&mut self) -> Result<ForExpr, ExprError> {
        let keyword = self.expect(TokenKind::For, "'for'")?;
        let iterable = self.group()?;
        let capture = self.capture()?;
        let body = self.body(&[])?;
        Ok(ForExpr {
            span: Span::new(keyword.span.start, body.span.end),
            iterable,
            capture,
            body,
        })
    }

    fn parse_while(&mut self) -> Result<WhileExpr, ExprError> {
        let keyword = self.expect(TokenKind::While, "'while'")?;
        let condition = self.group()?;
        let continue_expr = if self.peek() == Some(TokenKind::Colon) {
            self.pos += 1;
            Some(self.group()?)
        } else {
            None
        };
        let capture = self.capture()?;
        let body = self.body(&[])?;
        Ok(WhileExpr {
            span: Span::new(keyword.span.start, body.span.end),
            condition,
            continue_expr,
            capture,
            body,
        })
    }

    fn parse_switch(&mut self) -> Result<SwitchExpr, ExprError> {
        let keyword = self.expect(TokenKind::Switch, "'switch'")?;
        let subject = self.group()?;
        if self.peek() != Some(TokenKind::LBrace) {
            return Err(ExprError::Expected {
                expected: "'{'",
                span: self.here(),
            });
        }
        let open = self.pos;
        let close = self.matching(open)?;

        let outer_end = self.end;
        self.end = close;
        self.pos = open + 1;

        let mut cases = Vec::new();
        while self.peek().is_some() {
            cases.push(self.parse_case()?);
            if self.peek() == Some(TokenKind::Comma) {
                self.pos += 1;
            }
        }

        self.end = outer_end;
        self.pos = close + 1;

        Ok(SwitchExpr {
            span: Span::new(keyword.span.start, self.tokens[close].span.end),
            subject,
            cases,
        })
    }

    fn parse_case(&mut self) -> Result<SwitchCase, ExprError> {
        let start = self.pos;
        let mut depth = 0usize;
        loop {
            match self.peek() {
                None => {
                    return Err(ExprError::Expected {
                        expected: "'=>'",
                        span: self.here(),
                    })
                }
                Some(TokenKind::FatArrow) if depth == 0 => break,
                Some(kind) if kind.is_open() => depth += 1,
                Some(kind) if kind.is_close() => depth = depth.saturating_sub(1),
                Some(_) => {}
            }
            self.pos += 1;
        }

        if self.pos == start {
            return Err(ExprError::Expected {
                expected: "a case pattern",
                span: self.here(),
            });
        }

        let pattern = Span::new(
            self.tokens[start].span.start,
            self.tokens[self.pos - 1].span.end,
        );
        self.pos += 1;

        let capture = self.capture()?;
        let body = self.body(&[TokenKind::Comma])?;
        Ok(SwitchCase {
            span: Span::new(pattern.start, body.span.end),
            pattern,
            capture,
            body,
        })
    }
}

fn pairs(open: TokenKind, close: TokenKind) -> bool {
    matches!(
        (open, close),
        (TokenKind::LParen, TokenKind::RParen)
            | (TokenKind::LBrace, TokenKind::RBrace)
            | (TokenKind::LBracket, TokenKind::RBracket)
    )
}
